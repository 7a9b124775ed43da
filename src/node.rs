/*
 * Node Module
 *
 * The scene-graph container. A node owns its children outright, keyed by a
 * unique name, and remembers the order they were added in; that order is
 * the draw and input order. Because children are owned boxes a subtree can
 * only ever have one parent, so the graph stays a tree.
 */

use glam::Mat4;

use crate::drawable::{DrawContext, Drawable};
use crate::input::Key;

pub struct Node {
    pub transform: Mat4,
    children: Vec<(String, Box<dyn Drawable>)>,
}

impl Default for Node {
    fn default() -> Self {
        Self::new()
    }
}

impl Node {
    pub fn new() -> Self {
        Self::with_transform(Mat4::IDENTITY)
    }

    pub fn with_transform(transform: Mat4) -> Self {
        Self {
            transform,
            children: Vec::new(),
        }
    }

    // Insert a child, or replace the one already registered under `name`
    // while keeping its position in the draw order
    pub fn add(&mut self, name: impl Into<String>, child: Box<dyn Drawable>) {
        let name = name.into();
        match self.children.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => {
                log::debug!("replacing child {name}");
                slot.1 = child;
            }
            None => self.children.push((name, child)),
        }
    }

    // Builder form of `add`
    pub fn with_child(mut self, name: impl Into<String>, child: impl Drawable + 'static) -> Self {
        self.add(name, Box::new(child));
        self
    }

    pub fn remove(&mut self, name: &str) -> Option<Box<dyn Drawable>> {
        let index = self.children.iter().position(|(existing, _)| existing == name)?;
        Some(self.children.remove(index).1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.children.iter().any(|(existing, _)| existing == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.children.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    // Forward a key to every child in insertion order
    pub fn dispatch_input(&mut self, key: Key) {
        for (_, child) in &mut self.children {
            child.on_key(key);
        }
    }

    // Draw children under an already composed model matrix
    pub(crate) fn draw_children(&mut self, ctx: &mut DrawContext<'_>, model: Mat4) {
        for (_, child) in &mut self.children {
            child.draw(ctx, model);
        }
    }
}

impl Drawable for Node {
    fn draw(&mut self, ctx: &mut DrawContext<'_>, parent_model: Mat4) {
        let model = parent_model * self.transform;
        self.draw_children(ctx, model);
    }

    fn on_key(&mut self, key: Key) {
        self.dispatch_input(key);
    }
}
