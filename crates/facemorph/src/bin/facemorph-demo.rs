//! Headless morph demonstration over OBJ heads.
//!
//! Run with: cargo run --bin facemorph-demo -- <dir> <base-id> <region> <ref-id>...
//!
//! `<dir>` holds `<id>.obj` meshes sharing one topology, `regions.json`, and
//! optionally `options.json`.

use std::path::Path;
use std::process::ExitCode;

use facemorph::{
    init_logging, vertex_normals, HeadlessRenderer, MorphError, MorphOptions, Morpher,
    ObjMeshSource, Region, RegionFile, Result,
};

fn run(dir: &Path, base: &str, region: Region, references: &[String]) -> Result<()> {
    let options_path = dir.join("options.json");
    let options = if options_path.exists() {
        MorphOptions::from_path(&options_path)?
    } else {
        MorphOptions::default()
    };

    let source = ObjMeshSource::new(dir);
    let triangles = source.triangles(base)?;
    let mut morpher = Morpher::new(options, source, HeadlessRenderer::new())?;
    morpher.load_region_table(&RegionFile(dir.join("regions.json")))?;
    morpher.load_avatar(base)?;

    for reference in references {
        match morpher.select_reference_mesh(region, reference.as_str()) {
            Ok(slot) => log::info!("'{reference}' -> slot {slot}"),
            Err(e) => log::warn!("skipping '{reference}': {e}"),
        }
    }

    let status = morpher.region_status(region);
    if status.assigned_count == 0 {
        return Err(MorphError::RegionNotReady(region));
    }
    #[allow(clippy::cast_precision_loss)]
    let share = 1.0 / status.assigned_count as f32;
    let applied = morpher.set_region_weights(region, &vec![share; status.assigned_count])?;
    log::info!("applied {applied} weights of {share:.3} to {region}");

    let morphed = morpher.composited_positions()?.positions();
    let original = morpher
        .base_mesh()
        .map(facemorph::MeshBuffer::positions)
        .ok_or(MorphError::NoVisibleMesh)?;
    let max_displacement = original
        .iter()
        .zip(&morphed)
        .map(|(a, b)| a.distance(*b))
        .fold(0.0_f32, f32::max);

    let normals = vertex_normals(&morphed, &triangles);
    log::info!(
        "{} vertices, {} triangles, {} normals, max displacement {max_displacement:.5}",
        morphed.len(),
        triangles.len(),
        normals.len()
    );
    for event in morpher.renderer_mut().take_events() {
        log::debug!("render event: {event:?}");
    }
    Ok(())
}

fn main() -> ExitCode {
    init_logging();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 4 {
        eprintln!("usage: facemorph-demo <dir> <base-id> <region> <ref-id>...");
        return ExitCode::FAILURE;
    }
    let region: Region = match args[2].parse() {
        Ok(region) => region,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    match run(Path::new(&args[0]), &args[1], region, &args[3..]) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
