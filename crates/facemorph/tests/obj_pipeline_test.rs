//! End-to-end test over OBJ files and a region table on disk.

use std::path::PathBuf;

use facemorph::*;

/// A unit quad in the xy plane, with the top edge raised by `lift` along z.
fn quad(lift: f32) -> String {
    format!("v 0 0 0\nv 1 0 0\nv 1 1 {lift}\nv 0 1 {lift}\nf 1 2 3\nf 1 3 4\n")
}

struct TempDir(PathBuf);

impl TempDir {
    fn new(name: &str) -> Self {
        let dir = std::env::temp_dir().join(format!("facemorph-{name}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        Self(dir)
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.0);
    }
}

#[test]
fn test_obj_pipeline() {
    init_logging();
    let dir = TempDir::new("pipeline");
    std::fs::write(dir.0.join("base.obj"), quad(0.0)).unwrap();
    std::fs::write(dir.0.join("donor.obj"), quad(1.0)).unwrap();
    std::fs::write(
        dir.0.join("regions.json"),
        r#"{ "chin": { "tip": [2], "edge": [3] } }"#,
    )
    .unwrap();

    let source = ObjMeshSource::new(&dir.0);
    let triangles = source.triangles("base").unwrap();
    assert_eq!(triangles, vec![[0, 1, 2], [0, 2, 3]]);

    let mut morpher = Morpher::new(MorphOptions::default(), source, HeadlessRenderer::new()).unwrap();
    morpher
        .load_region_table(&RegionFile(dir.0.join("regions.json")))
        .unwrap();
    assert!(morpher.morphing_enabled());

    morpher.load_avatar("base").unwrap();
    morpher.select_reference_mesh(Region::Chin, "donor").unwrap();
    morpher.set_region_slider(Region::Chin, 1.0).unwrap();

    // Donor centroid sits 0.5 higher in z, so the raised edge moves by 0.5.
    let out = morpher.composited_positions().unwrap().positions();
    assert!((out[2].z - 0.5).abs() < 1e-5);
    assert!((out[3].z - 0.5).abs() < 1e-5);
    assert_eq!(out[0], Vec3::ZERO);

    let normals = vertex_normals(&out, &triangles);
    assert_eq!(normals.len(), 4);
    assert!(normals.iter().all(|n| (n.length() - 1.0).abs() < 1e-4));
}

#[test]
fn test_missing_region_table_disables_morphing() {
    let dir = TempDir::new("no-regions");
    std::fs::write(dir.0.join("base.obj"), quad(0.0)).unwrap();

    let mut morpher = Morpher::new(
        MorphOptions::default(),
        ObjMeshSource::new(&dir.0),
        HeadlessRenderer::new(),
    )
    .unwrap();
    assert!(matches!(
        morpher.load_region_table(&RegionFile(dir.0.join("regions.json"))),
        Err(MorphError::Io(_))
    ));
    assert!(!morpher.morphing_enabled());
    assert!(morpher.load_avatar("base").is_ok());
}
