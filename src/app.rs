/*
 * Application Module
 *
 * This module defines the viewer model and the nannou callbacks that drive
 * the scene. Each frame:
 * - the egui panel may rebuild the flock with new parameters
 * - the session clock is sampled once
 * - the scene graph is traversed into a DrawList (this also steps the flock)
 * - `view` paints the recorded commands
 *
 * Key presses are translated into scene triggers and broadcast through the
 * whole graph.
 */

use glam::{Vec2, Vec3};
use nannou::prelude::*;
use nannou::winit::event::{MouseButton, MouseScrollDelta, TouchPhase, VirtualKeyCode};
use nannou_egui::Egui;

use crate::camera::Camera;
use crate::clock::SessionClock;
use crate::config::{
    AnimationConfig, BoidsPlacement, KeyFrameConfig, Placement, RotationControl, SceneDescription,
};
use crate::debug::DebugInfo;
use crate::drawable::{DrawContext, DrawList, MeshHandle};
use crate::entity::Entity;
use crate::errors::Result;
use crate::input;
use crate::params::BoidsParams;
use crate::renderer;
use crate::scene::{build_flock, Scene};
use crate::transform::AxisAngle;
use crate::ui;

const FLOCK_MESH: MeshHandle = MeshHandle(3);

// Main model for the application
pub struct Model {
    pub scene: Scene,
    pub params: BoidsParams,
    pub flock_mesh: MeshHandle,
    pub flock_placement: BoidsPlacement,
    pub clock: SessionClock,
    pub paused: bool,
    pub show_debug: bool,
    pub egui: Egui,
    pub debug_info: DebugInfo,
    pub camera: Camera,
    pub mouse_position: Vec2,
    pub draw_list: DrawList,
}

// A base entity turned with Left / Right, a keyframed satellite and a flock
pub fn default_scene(params: &BoidsParams) -> Result<Scene> {
    let mut base = Entity::new("base")
        .with_mesh(MeshHandle(1))
        .placed(&Placement::at(Vec3::new(0.0, -12.0, 0.0)).with_scaling(Vec3::splat(2.0)));

    let satellite = Entity::new("satellite")
        .with_mesh(MeshHandle(2))
        .placed(&Placement::at(Vec3::new(4.0, 0.0, 0.0)));
    let bobbing = KeyFrameConfig::new(
        vec![(0.0, Vec3::ZERO), (2.0, Vec3::new(0.0, 3.0, 0.0)), (4.0, Vec3::ZERO)],
        vec![
            (0.0, AxisAngle { axis: Vec3::Y, angle: 0.0 }),
            (3.0, AxisAngle { axis: Vec3::Y, angle: 120.0 }),
        ],
        vec![(0.0, Vec3::ONE), (1.5, Vec3::splat(1.5)), (3.0, Vec3::ONE)],
    );
    base.add(satellite, AnimationConfig::keyframes(bobbing))?;

    let mut scene = Scene::new();
    scene.add(base, AnimationConfig::rotation(RotationControl::new(Vec3::Y, 5.0)))?;
    scene.add_boids(build_flock(0, params.clone(), FLOCK_MESH)?, &BoidsPlacement::default());
    Ok(scene)
}

// Scene from the JSON file named on the command line, or the default scene.
// The first flock of a loaded file is the one the panel controls.
fn load_scene() -> Result<(Scene, BoidsParams, MeshHandle, BoidsPlacement)> {
    match std::env::args().nth(1) {
        Some(path) => {
            let description = SceneDescription::from_path(&path)?;
            let scene = Scene::from_description(&description)?;
            let (params, mesh, placement) = match description.flocks.first() {
                Some(flock) => (flock.params.clone(), flock.mesh, flock.placement),
                None => (BoidsParams::default(), FLOCK_MESH, BoidsPlacement::default()),
            };
            Ok((scene, params, mesh, placement))
        }
        None => {
            let params = BoidsParams::default();
            let scene = default_scene(&params)?;
            Ok((scene, params, FLOCK_MESH, BoidsPlacement::default()))
        }
    }
}

// Initialize the model
pub fn model(app: &App) -> Model {
    // 80% of the primary monitor, or a fixed size when none is reported
    let (window_width, window_height) = app
        .primary_monitor()
        .map(|monitor| {
            let size = monitor.size();
            (size.width as f32 * 0.8, size.height as f32 * 0.8)
        })
        .unwrap_or((1280.0, 800.0));

    let window_id = app
        .new_window()
        .title("Boids Scene")
        .size(window_width as u32, window_height as u32)
        .view(view)
        .key_pressed(key_pressed)
        .mouse_moved(mouse_moved)
        .mouse_pressed(mouse_pressed)
        .mouse_released(mouse_released)
        .mouse_wheel(mouse_wheel)
        .raw_event(raw_window_event)
        .build()
        .expect("failed to build the main window");

    let window = app.window(window_id).expect("main window closed during setup");
    let egui = Egui::from_window(&window);

    let (scene, params, flock_mesh, flock_placement) = match load_scene() {
        Ok(loaded) => loaded,
        Err(err) => {
            log::error!("could not load the scene ({err}), falling back to an empty scene");
            (Scene::new(), BoidsParams::default(), FLOCK_MESH, BoidsPlacement::default())
        }
    };

    Model {
        scene,
        params,
        flock_mesh,
        flock_placement,
        clock: SessionClock::new(),
        paused: false,
        show_debug: false,
        egui,
        debug_info: DebugInfo::default(),
        camera: Camera::new(),
        mouse_position: Vec2::ZERO,
        draw_list: DrawList::new(),
    }
}

// Replace flock 0 with a fresh one built from the panel parameters
fn reset_flock(model: &mut Model) {
    match build_flock(0, model.params.clone(), model.flock_mesh) {
        Ok(boids) => {
            log::info!("flock reset with {} agents", boids.len());
            model.scene.add_boids(boids, &model.flock_placement);
        }
        Err(err) => log::warn!("flock parameters rejected: {err}"),
    }
}

// Update the model
pub fn update(app: &App, model: &mut Model, update: Update) {
    model.debug_info.fps = app.fps();
    model.debug_info.frame_time = update.since_last;

    let response = ui::update_ui(
        &mut model.egui,
        &mut model.params,
        &mut model.paused,
        &mut model.show_debug,
        &model.debug_info,
    );
    if response.reset_flock || response.count_changed || response.params_changed {
        reset_flock(model);
    }

    if model.paused != model.clock.is_paused() {
        if model.paused {
            model.clock.pause();
        } else {
            model.clock.resume();
        }
    }
    if model.paused {
        return;
    }

    let window_rect = app.window_rect();
    let projection = model.camera.projection_matrix(window_rect.w() / window_rect.h());
    let view = model.camera.view_matrix();
    let time = model.clock.sample();

    model.draw_list.clear();
    let mut ctx = DrawContext::new(projection, view, time, &mut model.draw_list);
    model.scene.draw(&mut ctx);

    model.debug_info.draw_calls = model.draw_list.len();
    model.debug_info.agents = model.draw_list.models_of(model.flock_mesh).len();
    model.debug_info.session_time = time;
}

// Render the last recorded frame
pub fn view(app: &App, model: &Model, frame: Frame) {
    let draw = app.draw();
    draw.background().color(BLACK);

    let window_rect = app.window_rect();
    let projection = model.camera.projection_matrix(window_rect.w() / window_rect.h());
    renderer::draw_domain_bounds(&draw, projection, model.camera.view_matrix(), window_rect);
    renderer::draw_commands(&draw, &model.draw_list, window_rect);

    if model.show_debug {
        ui::draw_debug_info(&draw, &model.debug_info, window_rect);
    }

    if let Err(err) = draw.to_frame(app, &frame) {
        log::error!("failed to draw the frame: {err:?}");
    }
    if let Err(err) = model.egui.draw_to_frame(&frame) {
        log::error!("failed to draw the ui: {err:?}");
    }
}

const LETTERS: [(VirtualKeyCode, char); 26] = [
    (VirtualKeyCode::A, 'a'),
    (VirtualKeyCode::B, 'b'),
    (VirtualKeyCode::C, 'c'),
    (VirtualKeyCode::D, 'd'),
    (VirtualKeyCode::E, 'e'),
    (VirtualKeyCode::F, 'f'),
    (VirtualKeyCode::G, 'g'),
    (VirtualKeyCode::H, 'h'),
    (VirtualKeyCode::I, 'i'),
    (VirtualKeyCode::J, 'j'),
    (VirtualKeyCode::K, 'k'),
    (VirtualKeyCode::L, 'l'),
    (VirtualKeyCode::M, 'm'),
    (VirtualKeyCode::N, 'n'),
    (VirtualKeyCode::O, 'o'),
    (VirtualKeyCode::P, 'p'),
    (VirtualKeyCode::Q, 'q'),
    (VirtualKeyCode::R, 'r'),
    (VirtualKeyCode::S, 's'),
    (VirtualKeyCode::T, 't'),
    (VirtualKeyCode::U, 'u'),
    (VirtualKeyCode::V, 'v'),
    (VirtualKeyCode::W, 'w'),
    (VirtualKeyCode::X, 'x'),
    (VirtualKeyCode::Y, 'y'),
    (VirtualKeyCode::Z, 'z'),
];

const FUNCTION_KEYS: [VirtualKeyCode; 12] = [
    VirtualKeyCode::F1,
    VirtualKeyCode::F2,
    VirtualKeyCode::F3,
    VirtualKeyCode::F4,
    VirtualKeyCode::F5,
    VirtualKeyCode::F6,
    VirtualKeyCode::F7,
    VirtualKeyCode::F8,
    VirtualKeyCode::F9,
    VirtualKeyCode::F10,
    VirtualKeyCode::F11,
    VirtualKeyCode::F12,
];

// Translate a window key into a scene trigger
pub fn map_key(key: VirtualKeyCode) -> Option<input::Key> {
    let mapped = match key {
        VirtualKeyCode::Left => input::Key::Left,
        VirtualKeyCode::Right => input::Key::Right,
        VirtualKeyCode::Up => input::Key::Up,
        VirtualKeyCode::Down => input::Key::Down,
        VirtualKeyCode::PageUp => input::Key::PageUp,
        VirtualKeyCode::PageDown => input::Key::PageDown,
        VirtualKeyCode::Space => input::Key::Space,
        other => {
            if let Some((_, c)) = LETTERS.iter().find(|(code, _)| *code == other) {
                input::Key::Char(*c)
            } else {
                let position = FUNCTION_KEYS.iter().position(|code| *code == other)?;
                input::Key::Function(position as u8 + 1)
            }
        }
    };
    Some(mapped)
}

// Key pressed event handler
pub fn key_pressed(_app: &App, model: &mut Model, key: VirtualKeyCode) {
    if model.egui.ctx().wants_keyboard_input() {
        return;
    }
    if let Some(trigger) = map_key(key) {
        log::debug!("key {trigger:?}");
        model.scene.dispatch_input(trigger);
    }
}

// Mouse moved event handler
pub fn mouse_moved(_app: &App, model: &mut Model, pos: Point2) {
    let new_pos = Vec2::new(pos.x, pos.y);
    model.camera.drag(new_pos);
    model.mouse_position = new_pos;
}

// Mouse pressed event handler
pub fn mouse_pressed(_app: &App, model: &mut Model, button: MouseButton) {
    if button == MouseButton::Left && !model.egui.ctx().is_pointer_over_area() {
        model.camera.start_drag(model.mouse_position);
    }
}

// Mouse released event handler
pub fn mouse_released(_app: &App, model: &mut Model, button: MouseButton) {
    if button == MouseButton::Left {
        model.camera.end_drag();
    }
}

// Mouse wheel event handler for zooming
pub fn mouse_wheel(_app: &App, model: &mut Model, delta: MouseScrollDelta, _phase: TouchPhase) {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => model.camera.zoom(y),
        MouseScrollDelta::PixelDelta(pos) => model.camera.zoom(pos.y as f32 * 0.01),
    }
}

// Pass raw window events to egui
pub fn raw_window_event(_app: &App, model: &mut Model, event: &nannou::winit::event::WindowEvent) {
    model.egui.handle_raw_event(event);
}
