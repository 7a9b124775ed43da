/*
 * Configuration Module
 *
 * Typed assembly-time descriptors. Every struct rejects unknown keys, so a
 * misspelled descriptor fails when the scene file is parsed. Controller
 * descriptors are only read while a scene is assembled; nothing here is
 * consulted per frame.
 */

use std::path::Path;

use glam::{Mat4, Quat, Vec3};
use serde::Deserialize;

use crate::drawable::MeshHandle;
use crate::errors::Result;
use crate::input::Key;
use crate::keyframes::KeyFrames;
use crate::params::BoidsParams;
use crate::transform::{rotate, scale, translate, AxisAngle};

fn enabled_when_present() -> bool {
    true
}

fn default_axis() -> Vec3 {
    Vec3::Y
}

fn default_increase() -> Key {
    Key::DEFAULT_INCREASE
}

fn default_decrease() -> Key {
    Key::DEFAULT_DECREASE
}

// Key-driven rotation around a fixed axis
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RotationControl {
    // A descriptor written in a scene file is active unless it says otherwise
    #[serde(default = "enabled_when_present")]
    pub enabled: bool,
    #[serde(default = "default_axis")]
    pub axis: Vec3,
    // Degrees added or removed per trigger
    #[serde(default)]
    pub angle_increment: f32,
    #[serde(default = "default_increase")]
    pub increase_trigger: Key,
    #[serde(default = "default_decrease")]
    pub decrease_trigger: Key,
}

impl Default for RotationControl {
    fn default() -> Self {
        Self {
            enabled: false,
            axis: default_axis(),
            angle_increment: 0.0,
            increase_trigger: default_increase(),
            decrease_trigger: default_decrease(),
        }
    }
}

impl RotationControl {
    pub fn new(axis: Vec3, angle_increment: f32) -> Self {
        Self {
            enabled: true,
            axis,
            angle_increment,
            ..Self::default()
        }
    }

    pub fn with_triggers(mut self, increase: Key, decrease: Key) -> Self {
        self.increase_trigger = increase;
        self.decrease_trigger = decrease;
        self
    }
}

// Keyed translate / rotate / scale tracks as `(time, value)` pairs
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeyFrameConfig {
    #[serde(default = "enabled_when_present")]
    pub enabled: bool,
    #[serde(default)]
    pub translate_track: Vec<(f32, Vec3)>,
    #[serde(default)]
    pub rotate_track: Vec<(f32, AxisAngle)>,
    #[serde(default)]
    pub scale_track: Vec<(f32, Vec3)>,
}

impl Default for KeyFrameConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            translate_track: Vec::new(),
            rotate_track: Vec::new(),
            scale_track: Vec::new(),
        }
    }
}

// Validated tracks, ready to drive a keyframe controller
#[derive(Clone, Debug, Default, PartialEq)]
pub struct KeyFrameTracks {
    pub translate: KeyFrames<Vec3>,
    pub rotate: KeyFrames<Quat>,
    pub scale: KeyFrames<Vec3>,
}

impl KeyFrameConfig {
    pub fn new(
        translate_track: Vec<(f32, Vec3)>,
        rotate_track: Vec<(f32, AxisAngle)>,
        scale_track: Vec<(f32, Vec3)>,
    ) -> Self {
        Self {
            enabled: true,
            translate_track,
            rotate_track,
            scale_track,
        }
    }

    pub fn tracks(&self) -> Result<KeyFrameTracks> {
        Ok(KeyFrameTracks {
            translate: KeyFrames::new("translate", self.translate_track.iter().copied())?,
            rotate: KeyFrames::new(
                "rotate",
                self.rotate_track.iter().map(|&(time, rotation)| (time, rotation.to_quat())),
            )?,
            scale: KeyFrames::new("scale", self.scale_track.iter().copied())?,
        })
    }
}

// Controllers requested when an entity is attached. A missing descriptor
// leaves the entity's own descriptor in place.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnimationConfig {
    #[serde(default)]
    pub rotation_control: Option<RotationControl>,
    #[serde(default)]
    pub keyframes: Option<KeyFrameConfig>,
}

impl AnimationConfig {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn rotation(control: RotationControl) -> Self {
        Self {
            rotation_control: Some(control),
            keyframes: None,
        }
    }

    pub fn keyframes(keyframes: KeyFrameConfig) -> Self {
        Self {
            rotation_control: None,
            keyframes: Some(keyframes),
        }
    }

    pub fn with_rotation(mut self, control: RotationControl) -> Self {
        self.rotation_control = Some(control);
        self
    }

    pub fn with_keyframes(mut self, keyframes: KeyFrameConfig) -> Self {
        self.keyframes = Some(keyframes);
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementRotation {
    AxisAngle(AxisAngle),
    // Column-major 4x4 matrix used as-is
    Matrix(Mat4),
}

impl PlacementRotation {
    pub fn to_matrix(self) -> Mat4 {
        match self {
            PlacementRotation::AxisAngle(rotation) => rotation.to_matrix(),
            PlacementRotation::Matrix(matrix) => matrix,
        }
    }
}

// Partial pose update; absent fields keep their current value
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Placement {
    #[serde(default)]
    pub position: Option<Vec3>,
    #[serde(default)]
    pub scaling: Option<Vec3>,
    #[serde(default)]
    pub rotation: Option<PlacementRotation>,
}

impl Placement {
    pub fn at(position: Vec3) -> Self {
        Self {
            position: Some(position),
            ..Self::default()
        }
    }

    pub fn with_scaling(mut self, scaling: Vec3) -> Self {
        self.scaling = Some(scaling);
        self
    }

    pub fn with_rotation(mut self, axis: Vec3, angle: f32) -> Self {
        self.rotation = Some(PlacementRotation::AxisAngle(AxisAngle { axis, angle }));
        self
    }

    pub fn with_rotation_matrix(mut self, matrix: Mat4) -> Self {
        self.rotation = Some(PlacementRotation::Matrix(matrix));
        self
    }
}

// Where a whole flock sits in the scene; rotation needs both axis and angle
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BoidsPlacement {
    #[serde(default)]
    pub position: Option<Vec3>,
    #[serde(default)]
    pub scaling: Option<Vec3>,
    #[serde(default)]
    pub rotation: Option<AxisAngle>,
}

impl BoidsPlacement {
    pub fn transform(&self) -> Mat4 {
        let position = self.position.map_or(Mat4::IDENTITY, translate);
        let rotation = self
            .rotation
            .map_or(Mat4::IDENTITY, |r| rotate(r.axis, r.angle));
        let scaling = self.scaling.map_or(Mat4::IDENTITY, scale);
        position * rotation * scaling
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntityDescription {
    pub name: String,
    #[serde(default)]
    pub meshes: Vec<MeshHandle>,
    #[serde(default)]
    pub placement: Placement,
    #[serde(default)]
    pub rotation_control: Option<RotationControl>,
    #[serde(default)]
    pub keyframes: Option<KeyFrameConfig>,
    #[serde(default)]
    pub children: Vec<EntityDescription>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlockDescription {
    // Mesh drawn for every agent
    pub mesh: MeshHandle,
    #[serde(default)]
    pub params: BoidsParams,
    #[serde(default)]
    pub placement: BoidsPlacement,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneDescription {
    #[serde(default)]
    pub entities: Vec<EntityDescription>,
    #[serde(default)]
    pub flocks: Vec<FlockDescription>,
}

impl SceneDescription {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        log::info!("loading scene description from {}", path.as_ref().display());
        Self::from_json(&text)
    }
}
