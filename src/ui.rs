/*
 * UI Module
 *
 * This module builds the egui panel of the viewer. It exposes the flock
 * parameters and the pause switch, and shows the debug metrics.
 * Edits are found by comparing against a snapshot taken before the widgets run.
 */

use nannou_egui::{egui, Egui};

use crate::debug::DebugInfo;
use crate::params::BoidsParams;

pub struct UiResponse {
    pub reset_flock: bool,
    pub count_changed: bool,
    pub params_changed: bool,
}

// Update the UI and report what the user changed this frame
pub fn update_ui(
    egui: &mut Egui,
    params: &mut BoidsParams,
    paused: &mut bool,
    show_debug: &mut bool,
    debug_info: &DebugInfo,
) -> UiResponse {
    let mut reset_flock = false;

    let before = params.snapshot();

    let ctx = egui.begin_frame();

    egui::Window::new("Flock Controls")
        .default_pos([10.0, 10.0])
        .show(&ctx, |ui| {
            ui.collapsing("Flock", |ui| {
                let mut side = params.lattice_side();
                ui.add(egui::Slider::new(&mut side, BoidsParams::get_lattice_side_range()).text("Lattice Side"));
                params.count = side * side * side;
                ui.label(format!("Agents: {}", params.count));

                if ui.button("Reset Flock").clicked() {
                    reset_flock = true;
                }
            });

            ui.collapsing("Steering", |ui| {
                ui.add(egui::Slider::new(&mut params.perception, BoidsParams::get_perception_range()).text("Perception"));
                ui.add(egui::Slider::new(&mut params.max_speed, BoidsParams::get_max_speed_range()).text("Max Speed"));
                ui.add(egui::Slider::new(&mut params.max_force, BoidsParams::get_max_force_range()).text("Max Force"));
                ui.label(format!("Step: {:.2}", params.deltat));
            });

            ui.collapsing("Performance Tuning", |ui| {
                ui.checkbox(&mut params.parallel, "Enable Parallel Processing");
                ui.checkbox(&mut params.spatial_grid, "Enable Spatial Grid");

                ui.separator();

                ui.label(format!("FPS: {:.1}", debug_info.fps));
                ui.label(format!("Frame time: {:.2} ms", debug_info.frame_time.as_secs_f64() * 1000.0));
                ui.label(format!("Draw calls: {}", debug_info.draw_calls));
            });

            ui.collapsing("Controls", |ui| {
                ui.label("Orbit: click and drag");
                ui.label("Zoom: mouse wheel");
                ui.label("Left / Right: rotate controlled entities");
            });

            ui.checkbox(show_debug, "Show Debug Info");
            ui.checkbox(paused, "Pause Simulation");
        });

    let (count_changed, params_changed) = before.detect_changes(params);
    UiResponse {
        reset_flock,
        count_changed,
        params_changed,
    }
}

// Draw debug information in the top-left corner of the window
pub fn draw_debug_info(draw: &nannou::Draw, debug_info: &DebugInfo, window_rect: nannou::geom::Rect) {
    let margin = 20.0;
    let line_height = 20.0;
    let panel_width = 200.0;
    let panel_height = line_height * 5.0 + margin;
    let panel_x = window_rect.left() + panel_width / 2.0;
    let panel_y = window_rect.top() - panel_height / 2.0;

    draw.rect()
        .x_y(panel_x, panel_y)
        .w_h(panel_width, panel_height)
        .color(nannou::color::rgba(0.0, 0.0, 0.0, 0.7));

    let text_x = window_rect.left() + margin;
    let text_y = window_rect.top() - margin;

    let debug_texts = [
        format!("FPS: {:.1}", debug_info.fps),
        format!("Frame time: {:.2} ms", debug_info.frame_time.as_secs_f64() * 1000.0),
        format!("Agents: {}", debug_info.agents),
        format!("Draw calls: {}", debug_info.draw_calls),
        format!("Session time: {:.1} s", debug_info.session_time),
    ];

    for (i, text) in debug_texts.iter().enumerate() {
        let y = text_y - (i as f32 * line_height);
        draw.text(text)
            .x_y(text_x + 70.0, y)
            .color(nannou::color::WHITE)
            .font_size(14);
    }
}
