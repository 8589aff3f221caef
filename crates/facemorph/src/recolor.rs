//! Material recolor planning for avatar parts.
//!
//! This module decides *what* to do to each material when a swatch is picked
//! or an aging slider moves; loading textures and compiling shaders belong to
//! the renderer.

use std::fmt;
use std::str::FromStr;

use facemorph_core::{MorphError, MorphOptions, Result};
use serde::{Deserialize, Serialize};

/// An sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Creates a color from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Creates a color from `0xRRGGBB`.
    pub const fn from_u32(hex: u32) -> Self {
        Self::new((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }

    /// Linear interpolation toward `other`; `t` is clamped to `[0, 1]`.
    #[must_use]
    pub fn lerp(self, other: Rgb, t: f32) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| {
            let value = f32::from(a) + (f32::from(b) - f32::from(a)) * t;
            value.round().clamp(0.0, 255.0) as u8
        };
        Rgb::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = MorphError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || MorphError::InvalidColor(s.to_string());
        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let value = u32::from_str_radix(hex, 16).map_err(|_| invalid())?;
        Ok(Rgb::from_u32(value))
    }
}

/// Target of gray-hair aging.
pub const GRAY_HAIR: Rgb = Rgb::from_u32(0x0066_6666);

/// Mask whose red channel marks where wrinkles darken the skin.
pub const WRINKLE_MASK: &str = "models/wrinkleMask.png";

/// An avatar part that can be recolored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecolorPart {
    Skin,
    Eyes,
    Hair,
    Top,
    Bottom,
    Shoes,
}

impl RecolorPart {
    /// Every part, in panel order.
    pub const ALL: [RecolorPart; 6] = [
        RecolorPart::Skin,
        RecolorPart::Eyes,
        RecolorPart::Hair,
        RecolorPart::Top,
        RecolorPart::Bottom,
        RecolorPart::Shoes,
    ];

    /// Names of the meshes that make up this part.
    pub fn mesh_names(self) -> &'static [&'static str] {
        match self {
            RecolorPart::Skin => &["Wolf3D_Head", "Wolf3D_Body"],
            RecolorPart::Eyes => &["EyeLeft", "EyeRight"],
            RecolorPart::Hair => &["Wolf3D_Hair"],
            RecolorPart::Top => &["Wolf3D_Outfit_Top"],
            RecolorPart::Bottom => &["Wolf3D_Outfit_Bottom"],
            RecolorPart::Shoes => &["Wolf3D_Outfit_Footwear"],
        }
    }

    /// The swatches offered for this part.
    pub fn palette(self) -> [Rgb; 5] {
        let hex: [u32; 5] = match self {
            RecolorPart::Skin => [0xf4c1a1, 0xd4a17a, 0xe0ac69, 0xc68642, 0x472000],
            RecolorPart::Eyes => [0x5579cf, 0x55795c, 0x8d5524, 0x5e503f, 0x000000],
            RecolorPart::Hair => [0x1a1a1a, 0x774936, 0xb87333, 0xae9819, 0x999999],
            RecolorPart::Top => [0x5f5f5f, 0x9e2a2b, 0x6266da, 0xf4a261, 0x256024],
            RecolorPart::Bottom => [0x5f5f5f, 0x9e2a2b, 0x1b3764, 0xf4a261, 0x256024],
            RecolorPart::Shoes => [0x2b2b2b, 0xb158af, 0x2a5129, 0x2b2d42, 0x520000],
        };
        hex.map(Rgb::from_u32)
    }

    /// Neutral (white) texture swapped in for a given mesh of this part.
    fn neutral_texture(self, mesh: &str) -> Option<&'static str> {
        match (self, mesh) {
            (RecolorPart::Skin, "Wolf3D_Head") => Some("models/whiteFace.png"),
            (RecolorPart::Skin, _) => Some("models/whiteSkin.png"),
            (RecolorPart::Hair, _) => Some("models/whiteHair.png"),
            (RecolorPart::Top, _) => Some("models/whiteShirt.png"),
            (RecolorPart::Bottom, _) => Some("models/whitePants.png"),
            (RecolorPart::Shoes, _) => Some("models/whiteShoes.png"),
            (RecolorPart::Eyes, _) => None,
        }
    }
}

/// What to do to one material.
#[derive(Debug, Clone, PartialEq)]
pub enum MaterialEdit {
    /// Multiply the existing material by the color, keeping its texture.
    Tint { mesh: &'static str, color: Rgb },
    /// Replace the material with a neutral texture tinted by the color.
    NeutralTexture {
        mesh: &'static str,
        texture: &'static str,
        color: Rgb,
    },
    /// Tint only the masked area (the iris) of the original texture.
    MaskedTint { mesh: &'static str, color: Rgb },
    /// Darken the skin texture toward shadow where the mask is set, scaled
    /// by `strength` in `[0, 1]`.
    Wrinkle {
        mesh: &'static str,
        mask: &'static str,
        strength: f32,
    },
}

/// Plans the material edits for recoloring a part.
pub fn plan_recolor(part: RecolorPart, color: Rgb, options: &MorphOptions) -> Vec<MaterialEdit> {
    part.mesh_names()
        .iter()
        .map(|&mesh| {
            if options.preserve_texture_on_recolor {
                return MaterialEdit::Tint { mesh, color };
            }
            if part == RecolorPart::Eyes {
                return MaterialEdit::MaskedTint { mesh, color };
            }
            match part.neutral_texture(mesh) {
                Some(texture) => MaterialEdit::NeutralTexture {
                    mesh,
                    texture,
                    color,
                },
                None => MaterialEdit::Tint { mesh, color },
            }
        })
        .collect()
}

/// Hair color for a gray-hair intensity, or `None` to restore the original.
pub fn gray_hair(original: Rgb, intensity: f32) -> Option<Rgb> {
    (intensity > 0.0).then(|| original.lerp(GRAY_HAIR, intensity))
}

/// Head material for a wrinkle strength, or `None` to restore the original
/// skin material. Strength is clamped to `[0, 1]`.
pub fn wrinkles(strength: f32) -> Option<MaterialEdit> {
    (strength > 0.0).then(|| MaterialEdit::Wrinkle {
        mesh: "Wolf3D_Head",
        mask: WRINKLE_MASK,
        strength: strength.min(1.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let color: Rgb = "#5579CF".parse().unwrap();
        assert_eq!(color, Rgb::new(0x55, 0x79, 0xcf));
        assert_eq!(color.to_string(), "#5579cf");
        assert!("5579cf".parse::<Rgb>().is_err());
        assert!("#55".parse::<Rgb>().is_err());
        assert!("#zzzzzz".parse::<Rgb>().is_err());
    }

    #[test]
    fn test_neutral_texture_plan() {
        let options = MorphOptions::default();
        let edits = plan_recolor(RecolorPart::Skin, GRAY_HAIR, &options);
        assert_eq!(
            edits,
            vec![
                MaterialEdit::NeutralTexture {
                    mesh: "Wolf3D_Head",
                    texture: "models/whiteFace.png",
                    color: GRAY_HAIR
                },
                MaterialEdit::NeutralTexture {
                    mesh: "Wolf3D_Body",
                    texture: "models/whiteSkin.png",
                    color: GRAY_HAIR
                },
            ]
        );
    }

    #[test]
    fn test_eyes_use_mask() {
        let options = MorphOptions::default();
        let color = RecolorPart::Eyes.palette()[0];
        let edits = plan_recolor(RecolorPart::Eyes, color, &options);
        assert_eq!(edits.len(), 2);
        assert!(edits
            .iter()
            .all(|edit| matches!(edit, MaterialEdit::MaskedTint { .. })));
    }

    #[test]
    fn test_preserve_texture_tints() {
        let options = MorphOptions {
            preserve_texture_on_recolor: true,
            ..MorphOptions::default()
        };
        let color = Rgb::new(1, 2, 3);
        assert_eq!(
            plan_recolor(RecolorPart::Hair, color, &options),
            vec![MaterialEdit::Tint {
                mesh: "Wolf3D_Hair",
                color
            }]
        );
    }

    #[test]
    fn test_gray_hair() {
        let black = Rgb::new(0, 0, 0);
        assert_eq!(gray_hair(black, 0.0), None);
        assert_eq!(gray_hair(black, 1.0), Some(GRAY_HAIR));
        assert_eq!(gray_hair(black, 0.5), Some(Rgb::new(0x33, 0x33, 0x33)));
        assert_eq!(gray_hair(black, 7.0), Some(GRAY_HAIR));
    }

    #[test]
    fn test_wrinkles() {
        assert_eq!(wrinkles(0.0), None);
        assert_eq!(wrinkles(-0.2), None);
        assert_eq!(
            wrinkles(0.4),
            Some(MaterialEdit::Wrinkle {
                mesh: "Wolf3D_Head",
                mask: WRINKLE_MASK,
                strength: 0.4
            })
        );
        assert!(matches!(
            wrinkles(3.0),
            Some(MaterialEdit::Wrinkle { strength, .. }) if strength == 1.0
        ));
    }
}
