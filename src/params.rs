/*
 * Simulation Parameters Module
 *
 * This module defines the BoidsParams struct holding every tunable of a
 * flock. The defaults reproduce the reference flock (perception 2, step 0.1,
 * max speed 2, max force 5). It also provides validation, the ranges used
 * by the UI sliders and a snapshot the UI keeps to detect its own edits.
 */

use serde::Deserialize;

use crate::errors::{Result, SceneError};

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct BoidsParams {
    // Number of agents; must be a perfect cube for the lattice packing
    pub count: usize,
    pub perception: f32,
    // Fixed simulation step, never derived from frame time
    pub deltat: f32,
    pub max_speed: f32,
    pub max_force: f32,
    // Uniform scale applied to each agent's body
    pub scaling: f32,
    // Evaluate the steering rules on the rayon pool
    pub parallel: bool,
    // Restrict neighbour scans to a uniform grid of perception-sized cells
    pub spatial_grid: bool,
    pub seed: Option<u64>,
}

// The parameters the UI can edit, captured before a frame's widgets run
#[derive(Clone, Debug, PartialEq)]
pub struct ParamSnapshot {
    count: usize,
    perception: f32,
    max_speed: f32,
    max_force: f32,
    parallel: bool,
    spatial_grid: bool,
}

impl Default for BoidsParams {
    fn default() -> Self {
        Self {
            count: 27,
            perception: 2.0,
            deltat: 1e-1,
            max_speed: 2.0,
            max_force: 5.0,
            scaling: 1.0,
            parallel: false,
            spatial_grid: false,
            seed: None,
        }
    }
}

impl BoidsParams {
    // Agents per lattice edge
    pub fn lattice_side(&self) -> usize {
        (self.count as f64).cbrt().round() as usize
    }

    pub fn validate(&self) -> Result<()> {
        let side = self.lattice_side();
        if side * side * side != self.count {
            return Err(SceneError::NotAPerfectCube(self.count));
        }
        self.validate_dynamics()
    }

    // Checks every scalar but leaves the agent count alone
    pub fn validate_dynamics(&self) -> Result<()> {
        let non_negative = [
            ("perception", self.perception),
            ("max_speed", self.max_speed),
            ("max_force", self.max_force),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(SceneError::InvalidParameter { name, value });
            }
        }

        let positive = [("deltat", self.deltat), ("scaling", self.scaling)];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(SceneError::InvalidParameter { name, value });
            }
        }
        Ok(())
    }

    // Take a snapshot of current parameter values for change detection
    pub fn snapshot(&self) -> ParamSnapshot {
        ParamSnapshot {
            count: self.count,
            perception: self.perception,
            max_speed: self.max_speed,
            max_force: self.max_force,
            parallel: self.parallel,
            spatial_grid: self.spatial_grid,
        }
    }

    // Get parameter ranges for UI sliders
    pub fn get_lattice_side_range() -> std::ops::RangeInclusive<usize> {
        1..=12
    }

    pub fn get_perception_range() -> std::ops::RangeInclusive<f32> {
        0.0..=10.0
    }

    pub fn get_max_speed_range() -> std::ops::RangeInclusive<f32> {
        0.1..=10.0
    }

    pub fn get_max_force_range() -> std::ops::RangeInclusive<f32> {
        0.0..=20.0
    }
}

impl ParamSnapshot {
    // Returns (count_changed, any_changed) for `current` against this snapshot
    pub fn detect_changes(&self, current: &BoidsParams) -> (bool, bool) {
        let count_changed = self.count != current.count;
        let any_changed = count_changed
            || self.perception != current.perception
            || self.max_speed != current.max_speed
            || self.max_force != current.max_force
            || self.parallel != current.parallel
            || self.spatial_grid != current.spatial_grid;
        (count_changed, any_changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let params = BoidsParams::default();
        assert!(params.validate().is_ok());
        assert_eq!(params.lattice_side(), 3);
    }

    #[test]
    fn count_must_be_a_cube() {
        let params = BoidsParams { count: 10, ..BoidsParams::default() };
        assert!(matches!(params.validate(), Err(SceneError::NotAPerfectCube(10))));
        let params = BoidsParams { count: 125, ..BoidsParams::default() };
        assert!(params.validate().is_ok());
    }

    #[test]
    fn rejects_bad_scalars() {
        let params = BoidsParams { deltat: 0.0, ..BoidsParams::default() };
        assert!(matches!(params.validate(), Err(SceneError::InvalidParameter { name: "deltat", .. })));
        let params = BoidsParams { perception: f32::NAN, ..BoidsParams::default() };
        assert!(params.validate().is_err());
    }

    #[test]
    fn snapshot_tracks_edits() {
        let mut params = BoidsParams::default();
        let before = params.snapshot();
        assert_eq!(before.detect_changes(&params), (false, false));
        params.max_force = 1.0;
        assert_eq!(before.detect_changes(&params), (false, true));
        params.count = 64;
        assert_eq!(before.detect_changes(&params), (true, true));
    }

    #[test]
    fn untracked_fields_do_not_count_as_edits() {
        let params = BoidsParams::default();
        let before = params.snapshot();
        let reseeded = BoidsParams {
            seed: Some(3),
            deltat: 0.05,
            ..params
        };
        assert_eq!(before.detect_changes(&reseeded), (false, false));
    }

    #[test]
    fn unknown_parameter_is_rejected() {
        assert!(serde_json::from_str::<BoidsParams>(r#"{ "perceptoin": 3 }"#).is_err());
        let params: BoidsParams = serde_json::from_str(r#"{ "count": 8, "seed": 7 }"#).unwrap();
        assert_eq!(params.count, 8);
        assert_eq!(params.seed, Some(7));
        assert_eq!(params.max_speed, 2.0);
    }
}
