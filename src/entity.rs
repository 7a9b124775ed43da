/*
 * Entity Module
 *
 * A named scene object: an optional set of meshes, a placement pose, nested
 * child entities and the two animation descriptors that decide which
 * controller nodes wrap it when it is attached to a parent.
 *
 * The placement pose is not applied by the entity itself; assembly wraps the
 * entity in a node carrying it, so controllers compose around the pose.
 */

use glam::{Mat4, Vec3};

use crate::assembly;
use crate::config::{AnimationConfig, KeyFrameConfig, Placement, RotationControl};
use crate::drawable::{DrawContext, Drawable, MeshHandle};
use crate::errors::Result;
use crate::input::Key;
use crate::node::Node;
use crate::transform::Transform;

pub struct Entity {
    name: String,
    meshes: Vec<MeshHandle>,
    transform: Transform,
    children: Node,
    pub rotation_control: RotationControl,
    pub keyframes: KeyFrameConfig,
}

impl Entity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            meshes: Vec::new(),
            transform: Transform::default(),
            children: Node::new(),
            rotation_control: RotationControl::default(),
            keyframes: KeyFrameConfig::default(),
        }
    }

    pub fn with_mesh(mut self, mesh: MeshHandle) -> Self {
        self.meshes.push(mesh);
        self
    }

    pub fn with_meshes(mut self, meshes: impl IntoIterator<Item = MeshHandle>) -> Self {
        self.meshes.extend(meshes);
        self
    }

    pub fn placed(mut self, placement: &Placement) -> Self {
        self.set_position(placement);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn meshes(&self) -> &[MeshHandle] {
        &self.meshes
    }

    pub fn transform(&self) -> Mat4 {
        self.transform.matrix()
    }

    pub fn translation(&self) -> Vec3 {
        self.transform.translation()
    }

    pub fn children(&self) -> &Node {
        &self.children
    }

    // Update only the parts of the pose the placement names
    pub fn set_position(&mut self, placement: &Placement) {
        if let Some(position) = placement.position {
            self.transform.set_translation(position);
        }
        if let Some(scaling) = placement.scaling {
            self.transform.set_scaling(scaling);
        }
        if let Some(rotation) = placement.rotation {
            self.transform.set_rotation(rotation.to_matrix());
        }
    }

    // Attach a child entity, wrapped in the controllers its descriptors ask for
    pub fn add(&mut self, child: Entity, animation: AnimationConfig) -> Result<()> {
        let (name, node) = assembly::assemble(child, animation)?;
        log::debug!("{}: attached {name}", self.name);
        self.children.add(name, node);
        Ok(())
    }
}

impl Drawable for Entity {
    fn draw(&mut self, ctx: &mut DrawContext<'_>, model: Mat4) {
        for mesh in &self.meshes {
            ctx.draw_mesh(*mesh, &model);
        }
        self.children.draw_children(ctx, model);
    }

    fn on_key(&mut self, key: Key) {
        self.children.dispatch_input(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawable::DrawList;
    use crate::transform::{rotate, scale, translate};

    #[test]
    fn set_position_only_touches_named_parts() {
        let mut entity = Entity::new("cube").placed(&Placement::at(Vec3::new(1.0, 2.0, 3.0)).with_scaling(Vec3::splat(2.0)));
        entity.set_position(&Placement::default().with_rotation(Vec3::Y, 90.0));
        let expected = translate(Vec3::new(1.0, 2.0, 3.0)) * rotate(Vec3::Y, 90.0) * scale(Vec3::splat(2.0));
        assert_eq!(entity.transform(), expected);
        assert_eq!(entity.translation(), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn draws_own_meshes_then_children() {
        let mut parent = Entity::new("parent").with_meshes([MeshHandle(1), MeshHandle(2)]);
        let child = Entity::new("child")
            .with_mesh(MeshHandle(3))
            .placed(&Placement::at(Vec3::X));
        parent.add(child, AnimationConfig::none()).unwrap();

        let mut list = DrawList::new();
        let mut ctx = DrawContext::new(Mat4::IDENTITY, Mat4::IDENTITY, 0.0, &mut list);
        parent.draw(&mut ctx, translate(Vec3::Y));

        let meshes: Vec<_> = list.commands().iter().map(|c| c.mesh).collect();
        assert_eq!(meshes, vec![MeshHandle(1), MeshHandle(2), MeshHandle(3)]);
        assert_eq!(list.models_of(MeshHandle(1))[0], translate(Vec3::Y));
        assert_eq!(list.models_of(MeshHandle(3))[0], translate(Vec3::Y) * translate(Vec3::X));
    }

    #[test]
    fn nested_rotation_controls_receive_keys() {
        let mut parent = Entity::new("parent");
        let child = Entity::new("child").with_mesh(MeshHandle(5));
        parent
            .add(child, AnimationConfig::rotation(RotationControl::new(Vec3::Z, 90.0)))
            .unwrap();
        parent.on_key(Key::Right);

        let mut list = DrawList::new();
        let mut ctx = DrawContext::new(Mat4::IDENTITY, Mat4::IDENTITY, 0.0, &mut list);
        parent.draw(&mut ctx, Mat4::IDENTITY);
        let model = list.models_of(MeshHandle(5))[0];
        let x = model.transform_vector3(Vec3::X);
        approx::assert_relative_eq!(x.y, 1.0, epsilon = 1e-5);
    }
}
