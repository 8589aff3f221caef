//! Avatar provisioning and mesh sources.
//!
//! The provisioning service hands out avatars from templates. Every call takes
//! an explicit [`Session`]; there is no process-wide token.

use std::collections::HashMap;

use facemorph_core::{MeshBuffer, MorphError, Result};

/// An authenticated session with the provisioning service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    token: String,
    valid: bool,
}

impl Session {
    /// Creates a live session from an access token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            valid: true,
        }
    }

    /// Returns the access token, or an error once the session was invalidated.
    pub fn token(&self) -> Result<&str> {
        if self.valid {
            Ok(&self.token)
        } else {
            Err(MorphError::SessionExpired)
        }
    }

    /// Returns whether the session can still be used.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Ends the session (logout or app reset).
    pub fn invalidate(&mut self) {
        self.valid = false;
    }
}

/// A template avatar offered by the provisioning service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarHandle {
    pub id: String,
    pub image_url: Option<String>,
}

/// Identity of an avatar created from a template.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AvatarId(pub String);

/// The avatar provisioning service.
pub trait AvatarProvisioner {
    /// Starts an anonymous session.
    fn create_session(&mut self) -> Result<Session>;

    /// Lists the available templates.
    fn list_templates(&self, session: &Session) -> Result<Vec<AvatarHandle>>;

    /// Looks up one template.
    fn fetch_template(&self, session: &Session, id: &str) -> Result<AvatarHandle>;

    /// Creates (or reuses) the avatar for a template.
    fn assign_template(&mut self, session: &Session, template_id: &str) -> Result<AvatarId>;
}

/// Delivers vertex buffers for avatar and reference meshes.
pub trait MeshSource {
    /// Fetches the head mesh of an avatar.
    fn fetch_mesh(&self, id: &str) -> Result<MeshBuffer>;
}

impl<S: MeshSource + ?Sized> MeshSource for &S {
    fn fetch_mesh(&self, id: &str) -> Result<MeshBuffer> {
        (**self).fetch_mesh(id)
    }
}

/// Converts any error from a mesh source into [`MorphError::MeshFetchFailed`].
pub(crate) fn as_fetch_error(id: &str, error: MorphError) -> MorphError {
    match error {
        MorphError::MeshFetchFailed { .. } => error,
        other => MorphError::MeshFetchFailed {
            id: id.to_string(),
            reason: other.to_string(),
        },
    }
}

/// In-memory provisioning service over a fixed template list.
///
/// Assigning a template twice returns the avatar created the first time.
#[derive(Debug, Clone, Default)]
pub struct StaticProvisioner {
    templates: Vec<AvatarHandle>,
    assigned: HashMap<String, AvatarId>,
    sessions_issued: u64,
}

impl StaticProvisioner {
    /// Creates a provisioner offering the given templates.
    pub fn new(templates: Vec<AvatarHandle>) -> Self {
        Self {
            templates,
            ..Self::default()
        }
    }
}

impl AvatarProvisioner for StaticProvisioner {
    fn create_session(&mut self) -> Result<Session> {
        self.sessions_issued += 1;
        Ok(Session::new(format!("anon-{}", self.sessions_issued)))
    }

    fn list_templates(&self, session: &Session) -> Result<Vec<AvatarHandle>> {
        session.token()?;
        Ok(self.templates.clone())
    }

    fn fetch_template(&self, session: &Session, id: &str) -> Result<AvatarHandle> {
        session.token()?;
        self.templates
            .iter()
            .find(|template| template.id == id)
            .cloned()
            .ok_or_else(|| MorphError::MeshFetchFailed {
                id: id.to_string(),
                reason: "unknown template".to_string(),
            })
    }

    fn assign_template(&mut self, session: &Session, template_id: &str) -> Result<AvatarId> {
        let template = self.fetch_template(session, template_id)?;
        let avatar = self
            .assigned
            .entry(template.id)
            .or_insert_with(|| AvatarId(format!("avatar-{template_id}")))
            .clone();
        log::debug!("template '{template_id}' -> avatar '{}'", avatar.0);
        Ok(avatar)
    }
}

/// In-memory mesh source.
#[derive(Debug, Clone, Default)]
pub struct MemoryMeshSource {
    meshes: HashMap<String, MeshBuffer>,
}

impl MemoryMeshSource {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a mesh.
    pub fn insert(&mut self, id: impl Into<String>, mesh: MeshBuffer) {
        self.meshes.insert(id.into(), mesh);
    }

    /// Builder form of [`MemoryMeshSource::insert`].
    #[must_use]
    pub fn with(mut self, id: impl Into<String>, mesh: MeshBuffer) -> Self {
        self.insert(id, mesh);
        self
    }
}

impl MeshSource for MemoryMeshSource {
    fn fetch_mesh(&self, id: &str) -> Result<MeshBuffer> {
        self.meshes
            .get(id)
            .cloned()
            .ok_or_else(|| MorphError::MeshFetchFailed {
                id: id.to_string(),
                reason: "not found".to_string(),
            })
    }
}
