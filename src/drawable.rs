/*
 * Drawable Module
 *
 * The capability every scene-graph element exposes, and the narrow interface
 * to whatever backend turns mesh handles into pixels.
 *
 * - `Drawable::draw` is required; `Drawable::on_key` defaults to ignoring the
 *   key, so elements without input handling are skipped silently.
 * - `Renderer` receives one call per mesh per leaf with the final
 *   projection, view and model matrices.
 * - `DrawList` is a `Renderer` that only records what it was asked to draw;
 *   the viewer paints from it and tests inspect it.
 */

use glam::Mat4;
use serde::Deserialize;

use crate::input::Key;

// Opaque reference to a mesh owned by the rendering backend
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(transparent)]
pub struct MeshHandle(pub u32);

pub trait Renderer {
    fn draw_mesh(&mut self, mesh: MeshHandle, projection: &Mat4, view: &Mat4, model: &Mat4);
}

// Per-frame values threaded through a traversal
pub struct DrawContext<'a> {
    pub projection: Mat4,
    pub view: Mat4,
    // Elapsed session seconds, sampled once for the whole frame
    pub time: f32,
    pub renderer: &'a mut dyn Renderer,
}

impl<'a> DrawContext<'a> {
    pub fn new(projection: Mat4, view: Mat4, time: f32, renderer: &'a mut dyn Renderer) -> Self {
        Self {
            projection,
            view,
            time,
            renderer,
        }
    }

    pub fn draw_mesh(&mut self, mesh: MeshHandle, model: &Mat4) {
        self.renderer.draw_mesh(mesh, &self.projection, &self.view, model);
    }
}

pub trait Drawable {
    fn draw(&mut self, ctx: &mut DrawContext<'_>, model: Mat4);

    fn on_key(&mut self, _key: Key) {}
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawCommand {
    pub mesh: MeshHandle,
    pub projection: Mat4,
    pub view: Mat4,
    pub model: Mat4,
}

#[derive(Default, Debug)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    // Model matrices recorded for one mesh, in draw order
    pub fn models_of(&self, mesh: MeshHandle) -> Vec<Mat4> {
        self.commands
            .iter()
            .filter(|command| command.mesh == mesh)
            .map(|command| command.model)
            .collect()
    }
}

impl Renderer for DrawList {
    fn draw_mesh(&mut self, mesh: MeshHandle, projection: &Mat4, view: &Mat4, model: &Mat4) {
        self.commands.push(DrawCommand {
            mesh,
            projection: *projection,
            view: *view,
            model: *model,
        });
    }
}
