/*
 * Boids Scene - Module Definitions
 *
 * This file defines the module structure of the scene-graph animation
 * engine and the flocking simulation that lives inside it. The viewer
 * modules (app, camera, renderer, ui, debug) drive the library from a
 * nannou window.
 */

// Re-export key components for easier access
pub use boid::{Agent, Steering};
pub use clock::SessionClock;
pub use config::{
    AnimationConfig, BoidsPlacement, KeyFrameConfig, Placement, RotationControl, SceneDescription,
};
pub use controls::{KeyFrameControlNode, RotationControlNode};
pub use drawable::{DrawCommand, DrawContext, DrawList, Drawable, MeshHandle, Renderer};
pub use entity::Entity;
pub use errors::{Result, SceneError};
pub use input::Key;
pub use keyframes::{Interpolatable, KeyFrames};
pub use node::Node;
pub use params::BoidsParams;
pub use physics::Boids;
pub use scene::Scene;
pub use spatial_grid::SpatialGrid;

// Define modules
pub mod assembly;
pub mod boid;
pub mod clock;
pub mod config;
pub mod controls;
pub mod drawable;
pub mod entity;
pub mod errors;
pub mod input;
pub mod keyframes;
pub mod node;
pub mod params;
pub mod physics;
pub mod scene;
pub mod spatial_grid;
pub mod transform;

pub mod app;
pub mod camera;
pub mod debug;
pub mod renderer;
pub mod ui;

// Constants
// Agents bounce off the faces of the cube [-10, 10]^3
pub const DOMAIN_HALF_EXTENT: f32 = 10.0;
// Distance between neighbouring agents of the initial lattice
pub const LATTICE_SPACING: f32 = 3.0;
// Screen-space length of a drawn agent heading, in pixels
pub const BOID_SIZE: f32 = 6.0;
