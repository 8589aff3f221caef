//! Configuration options for the morph pipeline.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MorphError, Result};

/// Reference caps the interpolation controls support: a single slider, or
/// the three-anchor 2-D picker.
pub const SUPPORTED_REFERENCE_CAPS: [usize; 2] = [1, 3];

/// Options for the morph pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MorphOptions {
    /// Maximum number of reference meshes per region (1 or 3).
    pub max_references_per_region: usize,

    /// Whether recoloring tints the existing texture instead of swapping in
    /// a neutral one.
    pub preserve_texture_on_recolor: bool,
}

impl Default for MorphOptions {
    fn default() -> Self {
        Self {
            max_references_per_region: 3,
            preserve_texture_on_recolor: false,
        }
    }
}

impl MorphOptions {
    /// Checks the options for values the pipeline cannot honor.
    pub fn validate(&self) -> Result<()> {
        if !SUPPORTED_REFERENCE_CAPS.contains(&self.max_references_per_region) {
            return Err(MorphError::InvalidOptions(format!(
                "max_references_per_region must be one of {SUPPORTED_REFERENCE_CAPS:?}, got {}",
                self.max_references_per_region
            )));
        }
        Ok(())
    }

    /// Parses and validates options from JSON. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Reads options from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = MorphOptions::default();
        assert_eq!(options.max_references_per_region, 3);
        assert!(!options.preserve_texture_on_recolor);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_partial_json() {
        let options = MorphOptions::from_json_str(r#"{"preserve_texture_on_recolor": true}"#).unwrap();
        assert_eq!(options.max_references_per_region, 3);
        assert!(options.preserve_texture_on_recolor);

        let options = MorphOptions::from_json_str(r#"{"max_references_per_region": 1}"#).unwrap();
        assert_eq!(options.max_references_per_region, 1);
    }

    #[test]
    fn test_rejects_unsupported_cap() {
        assert!(matches!(
            MorphOptions::from_json_str(r#"{"max_references_per_region": 2}"#),
            Err(MorphError::InvalidOptions(_))
        ));
    }
}
