//! OBJ files on disk as a mesh source.

use std::path::{Path, PathBuf};

use facemorph_core::{MeshBuffer, MorphError, Result};

use crate::provisioning::MeshSource;

/// Loads `<dir>/<id>.obj`, merging all objects in the file into one buffer.
#[derive(Debug, Clone)]
pub struct ObjMeshSource {
    dir: PathBuf,
}

/// Positions and triangles of an OBJ file.
struct ObjMesh {
    positions: Vec<f32>,
    triangles: Vec<[u32; 3]>,
}

impl ObjMeshSource {
    /// Creates a source reading from `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the path an id resolves to.
    pub fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.obj"))
    }

    /// Loads the triangles of a mesh, for normal recomputation.
    pub fn triangles(&self, id: &str) -> Result<Vec<[u32; 3]>> {
        Ok(load(id, &self.path_for(id))?.triangles)
    }
}

fn load(id: &str, path: &Path) -> Result<ObjMesh> {
    let (models, _materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
    )
    .map_err(|e| MorphError::MeshFetchFailed {
        id: id.to_string(),
        reason: format!("{}: {e}", path.display()),
    })?;

    let mut positions = Vec::new();
    let mut triangles = Vec::new();
    for model in models {
        let mesh = model.mesh;
        let vertex_offset = (positions.len() / 3) as u32;
        positions.extend_from_slice(&mesh.positions);
        triangles.extend(mesh.indices.chunks_exact(3).map(|tri| {
            [
                tri[0] + vertex_offset,
                tri[1] + vertex_offset,
                tri[2] + vertex_offset,
            ]
        }));
    }
    Ok(ObjMesh {
        positions,
        triangles,
    })
}

impl MeshSource for ObjMeshSource {
    fn fetch_mesh(&self, id: &str) -> Result<MeshBuffer> {
        let mesh = load(id, &self.path_for(id))?;
        log::info!(
            "loaded '{id}': {} vertices, {} triangles",
            mesh.positions.len() / 3,
            mesh.triangles.len()
        );
        MeshBuffer::new(mesh.positions, 3)
    }
}
