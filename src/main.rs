/*
 * Boids Scene Viewer
 *
 * Opens a window on a small animated scene: an entity turned with the
 * Left / Right keys, a keyframed satellite and a flock of boids bouncing
 * inside a cube. Pass a JSON scene description as the first argument to
 * load a different scene. Set RUST_LOG to control logging.
 */

use boids_scene::app;

fn main() {
    env_logger::init();
    nannou::app(app::model).update(app::update).run();
}
