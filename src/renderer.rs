/*
 * Renderer Module
 *
 * Paints a recorded DrawList with nannou's 2D draw API. Each draw command
 * is shown as its projected origin plus a short stroke along the local +Z
 * axis, which is the heading of an agent body. The flock's domain cube is
 * drawn as a wireframe for reference.
 *
 * Projection runs on the CPU: clip = projection * view * model * p, then the
 * perspective divide maps to a window-centred pixel grid with y up.
 */

use glam::{Mat4, Vec3};
use nannou::prelude::*;

use crate::drawable::{DrawList, MeshHandle};
use crate::{BOID_SIZE, DOMAIN_HALF_EXTENT};

// Project a point in model space to window pixels relative to the window
// centre; points behind the camera yield None
pub fn to_screen(clip_from_model: Mat4, point: Vec3, width: f32, height: f32) -> Option<glam::Vec2> {
    let clip = clip_from_model * point.extend(1.0);
    if clip.w <= f32::EPSILON {
        return None;
    }
    let ndc = clip.truncate() / clip.w;
    Some(glam::Vec2::new(ndc.x * width / 2.0, ndc.y * height / 2.0))
}

// Stable per-mesh hue so different meshes are told apart on screen
fn mesh_colour(mesh: MeshHandle) -> Hsv {
    let hue = (mesh.0 as f32 * 0.618_034).fract();
    hsv(hue, 0.65, 0.95)
}

pub fn draw_commands(draw: &Draw, list: &DrawList, window_rect: Rect) {
    let (width, height) = (window_rect.w(), window_rect.h());
    for command in list.commands() {
        let clip_from_model = command.projection * command.view * command.model;
        let Some(origin) = to_screen(clip_from_model, Vec3::ZERO, width, height) else {
            continue;
        };
        let colour = mesh_colour(command.mesh);
        draw.ellipse()
            .x_y(origin.x, origin.y)
            .radius(BOID_SIZE / 2.0)
            .color(colour);

        if let Some(tip) = to_screen(clip_from_model, Vec3::Z, width, height) {
            let heading = (tip - origin).clamp_length_max(BOID_SIZE * 3.0);
            draw.line()
                .start(pt2(origin.x, origin.y))
                .end(pt2(origin.x + heading.x, origin.y + heading.y))
                .weight(1.5)
                .color(colour);
        }
    }
}

// Wireframe of the cube agents are kept inside
pub fn draw_domain_bounds(draw: &Draw, projection: Mat4, view: Mat4, window_rect: Rect) {
    let (width, height) = (window_rect.w(), window_rect.h());
    let clip_from_world = projection * view;
    let h = DOMAIN_HALF_EXTENT;
    let corner = |i: usize| {
        Vec3::new(
            if i & 1 == 0 { -h } else { h },
            if i & 2 == 0 { -h } else { h },
            if i & 4 == 0 { -h } else { h },
        )
    };

    for a in 0..8 {
        for bit in [1, 2, 4] {
            let b = a | bit;
            if a == b {
                continue;
            }
            let start = to_screen(clip_from_world, corner(a), width, height);
            let end = to_screen(clip_from_world, corner(b), width, height);
            if let (Some(start), Some(end)) = (start, end) {
                draw.line()
                    .start(pt2(start.x, start.y))
                    .end(pt2(end.x, end.y))
                    .weight(1.0)
                    .color(rgba(0.3, 0.3, 0.3, 1.0));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Camera;

    #[test]
    fn origin_projects_to_window_centre() {
        let camera = Camera::new();
        let clip = camera.projection_matrix(2.0) * camera.view_matrix();
        let centre = to_screen(clip, Vec3::ZERO, 800.0, 400.0).unwrap();
        assert!(centre.length() < 1e-3);
    }

    #[test]
    fn points_behind_the_camera_are_skipped() {
        let camera = Camera::new();
        let clip = camera.projection_matrix(1.0) * camera.view_matrix();
        let behind = camera.eye() * 2.0;
        assert!(to_screen(clip, behind, 800.0, 800.0).is_none());
    }
}
