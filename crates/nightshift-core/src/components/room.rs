//! Room scene components: props, feature lights/paintings/screens, artifacts.

use super::common::{Color, Vec3};
use nightshift_logic::constants::visuals;
use serde::{Deserialize, Serialize};

/// A generic, targetable object in a room (furniture, plants, rugs).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prop {
    pub name: String,
}

impl Prop {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Where an entity sits, relative to the room it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Local position within the room
    pub local: Vec3,
    /// Index of the owning room in the catalogue
    pub room: usize,
}

impl Position {
    pub fn new(local: Vec3, room: usize) -> Self {
        Self { local, room }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visibility {
    pub visible: bool,
}

impl Visibility {
    pub const VISIBLE: Self = Self { visible: true };
    pub const HIDDEN: Self = Self { visible: false };
}

impl Default for Visibility {
    fn default() -> Self {
        Self::VISIBLE
    }
}

/// The room's ceiling light.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Light {
    /// Non-negative brightness
    pub intensity: f32,
    pub color: Color,
}

impl Light {
    pub fn new(intensity: f32, color: Color) -> Self {
        Self {
            intensity: intensity.max(0.0),
            color,
        }
    }
}

/// A framed canvas whose color can be swapped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Painting {
    pub color: Color,
}

/// A TV or monitor face.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Screen {
    pub color: Color,
    pub emissive: Color,
    pub emissive_intensity: f32,
}

impl Screen {
    /// A switched-off screen: dark face, no glow.
    pub fn off(color: Color) -> Self {
        Self {
            color,
            emissive: Color::BLACK,
            emissive_intensity: 0.0,
        }
    }
}

/// What an introduced artifact looks like.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArtifactKind {
    /// Translucent floating orb
    Apparition,
    /// Dark humanoid figure with glowing eyes
    Intruder,
}

/// Something an anomaly placed into the room; despawned when the anomaly is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    pub kind: ArtifactKind,
    pub color: Color,
    pub accent: Option<Color>,
    pub opacity: f32,
}

impl Artifact {
    pub fn apparition() -> Self {
        Self {
            kind: ArtifactKind::Apparition,
            color: Color::from_hex(visuals::APPARITION_COLOR),
            accent: None,
            opacity: visuals::APPARITION_OPACITY,
        }
    }

    pub fn intruder() -> Self {
        Self {
            kind: ArtifactKind::Intruder,
            color: Color::from_hex(visuals::INTRUDER_BODY_COLOR),
            accent: Some(Color::from_hex(visuals::INTRUDER_EYE_COLOR)),
            opacity: 1.0,
        }
    }

    /// Room-local spot where this kind of artifact appears.
    pub fn offset(&self) -> Vec3 {
        match self.kind {
            ArtifactKind::Apparition => Vec3::from_array(visuals::APPARITION_OFFSET),
            ArtifactKind::Intruder => Vec3::from_array(visuals::INTRUDER_OFFSET),
        }
    }
}
