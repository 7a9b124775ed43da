/*
 * Errors Module
 *
 * Failures that can happen while a scene is being assembled: malformed or
 * unknown configuration, keyframe tracks whose times do not increase, and
 * flock parameters that cannot be packed or simulated. Nothing in the
 * per-frame path returns these; numeric degeneracies are recovered locally.
 */

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SceneError {
    // Keyframe times must be strictly increasing
    #[error("keyframe times in the {track} track must increase: key {index} at t={current} follows t={previous}")]
    NonIncreasingKeyTimes {
        track: &'static str,
        index: usize,
        previous: f32,
        current: f32,
    },

    // The lattice packing needs n^3 agents
    #[error("boid count {0} is not a perfect cube")]
    NotAPerfectCube(usize),

    #[error("invalid value for {name}: {value}")]
    InvalidParameter { name: &'static str, value: f32 },

    // Unknown descriptor keys end up here through serde
    #[error("scene configuration error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SceneError>;
