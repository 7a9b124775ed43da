/*
 * Transform Module
 *
 * Affine primitives used by every node in the scene graph. Matrices are glam
 * column-major `Mat4`s acting on column vectors, so a child placed under a
 * parent ends up at `parent * local` and a pose is always `T * R * S`.
 * Angles are given in degrees.
 */

use glam::{Mat4, Quat, Vec3};
use serde::Deserialize;

// Vectors shorter than this are treated as zero before normalising
pub const EPSILON: f32 = 1e-6;

#[inline]
pub fn identity() -> Mat4 {
    Mat4::IDENTITY
}

#[inline]
pub fn translate(offset: Vec3) -> Mat4 {
    Mat4::from_translation(offset)
}

#[inline]
pub fn scale(factors: Vec3) -> Mat4 {
    Mat4::from_scale(factors)
}

// Rotation of `degrees` around `axis`; a zero axis yields the identity
pub fn rotate(axis: Vec3, degrees: f32) -> Mat4 {
    Mat4::from_quat(rotation_quat(axis, degrees))
}

pub fn rotation_quat(axis: Vec3, degrees: f32) -> Quat {
    if axis.length_squared() <= EPSILON * EPSILON {
        return Quat::IDENTITY;
    }
    Quat::from_axis_angle(axis.normalize(), degrees.to_radians())
}

// Left to right product, so `compose(&[a, b, c]) == a * b * c`
pub fn compose(matrices: &[Mat4]) -> Mat4 {
    matrices.iter().fold(Mat4::IDENTITY, |acc, m| acc * *m)
}

// Unsigned angle in degrees between two directions, 0 when either is zero
pub fn angle_between(a: Vec3, b: Vec3) -> f32 {
    let (a, b) = (a.normalize_or_zero(), b.normalize_or_zero());
    if a == Vec3::ZERO || b == Vec3::ZERO {
        return 0.0;
    }
    a.dot(b).clamp(-1.0, 1.0).acos().to_degrees()
}

// Turns a body heading from `old` to `new` without introducing roll:
// `rotate(new, 180) * rotate(old x new, angle) * rotate(old, 180)`.
//
// When the headings are parallel the cross product vanishes. Identical
// headings keep the middle term at identity; opposite headings turn half a
// revolution around a vector orthogonal to `old`.
pub fn heading_change(old: Vec3, new: Vec3) -> Mat4 {
    let angle = angle_between(old, new);
    let mut axis = old.cross(new);
    if axis.length_squared() <= EPSILON * EPSILON {
        if angle > 90.0 {
            axis = old.normalize_or_zero().any_orthonormal_vector();
            log::trace!("heading reversal with parallel vectors, using {axis:?} as turn axis");
        } else {
            axis = Vec3::ZERO;
        }
    }
    rotate(new, 180.0) * rotate(axis, angle) * rotate(old, 180.0)
}

// A pose split into its parts; the cached matrix is rebuilt whenever
// one of them changes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    translation: Vec3,
    rotation: Mat4,
    scaling: Vec3,
    matrix: Mat4,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Mat4::IDENTITY,
            scaling: Vec3::ONE,
            matrix: Mat4::IDENTITY,
        }
    }
}

impl Transform {
    pub fn new(translation: Vec3, rotation: Mat4, scaling: Vec3) -> Self {
        let mut transform = Self {
            translation,
            rotation,
            scaling,
            matrix: Mat4::IDENTITY,
        };
        transform.recompute();
        transform
    }

    pub fn matrix(&self) -> Mat4 {
        self.matrix
    }

    pub fn translation(&self) -> Vec3 {
        self.translation
    }

    pub fn rotation(&self) -> Mat4 {
        self.rotation
    }

    pub fn scaling(&self) -> Vec3 {
        self.scaling
    }

    pub fn set_translation(&mut self, translation: Vec3) {
        self.translation = translation;
        self.recompute();
    }

    pub fn set_rotation(&mut self, rotation: Mat4) {
        self.rotation = rotation;
        self.recompute();
    }

    pub fn set_scaling(&mut self, scaling: Vec3) {
        self.scaling = scaling;
        self.recompute();
    }

    fn recompute(&mut self) {
        self.matrix = translate(self.translation) * self.rotation * scale(self.scaling);
    }
}

// Axis and angle (degrees) as they appear in configuration files
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AxisAngle {
    pub axis: Vec3,
    pub angle: f32,
}

impl AxisAngle {
    pub fn to_quat(self) -> Quat {
        rotation_quat(self.axis, self.angle)
    }

    pub fn to_matrix(self) -> Mat4 {
        rotate(self.axis, self.angle)
    }
}
