/*
 * Scene Module
 *
 * The root of the scene graph and the entry points the frame loop uses:
 * attach entities and flocks, forward key presses, draw one frame.
 */

use glam::Mat4;

use crate::assembly;
use crate::config::{AnimationConfig, BoidsPlacement, EntityDescription, SceneDescription};
use crate::drawable::{DrawContext, Drawable, MeshHandle};
use crate::entity::Entity;
use crate::errors::Result;
use crate::input::Key;
use crate::node::Node;
use crate::params::BoidsParams;
use crate::physics::Boids;

#[derive(Default)]
pub struct Scene {
    root: Node,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    // Attach an entity under the root. An entity added again under the same
    // name replaces the earlier subtree.
    pub fn add(&mut self, entity: Entity, animation: AnimationConfig) -> Result<()> {
        let (name, node) = assembly::assemble(entity, animation)?;
        log::info!("scene: attached {name}");
        self.root.add(name, node);
        Ok(())
    }

    // Attach a flock as `Boid{index}`, wrapped in a node carrying its placement
    pub fn add_boids(&mut self, boids: Boids, placement: &BoidsPlacement) {
        let index = boids.index();
        let mut node = Node::with_transform(placement.transform());
        node.add(format!("boids{index}"), Box::new(boids));
        log::info!("scene: attached flock {index}");
        self.root.add(format!("Boid{index}"), Box::new(node));
    }

    pub fn dispatch_input(&mut self, key: Key) {
        self.root.dispatch_input(key);
    }

    pub fn draw(&mut self, ctx: &mut DrawContext<'_>) {
        self.root.draw(ctx, Mat4::IDENTITY);
    }

    pub fn from_description(description: &SceneDescription) -> Result<Self> {
        let mut scene = Self::new();
        for entity in &description.entities {
            scene.add(build_entity(entity)?, AnimationConfig::none())?;
        }
        for (index, flock) in description.flocks.iter().enumerate() {
            let boids = build_flock(index, flock.params.clone(), flock.mesh)?;
            scene.add_boids(boids, &flock.placement);
        }
        Ok(scene)
    }
}

// A flock whose agents are each drawn as a `boid_{i}` entity holding `mesh`
pub fn build_flock(index: usize, params: BoidsParams, mesh: MeshHandle) -> Result<Boids> {
    Boids::new(index, params, |i| Box::new(Entity::new(format!("boid_{i}")).with_mesh(mesh)))
}

fn build_entity(description: &EntityDescription) -> Result<Entity> {
    let mut entity = Entity::new(description.name.clone())
        .with_meshes(description.meshes.iter().copied())
        .placed(&description.placement);
    if let Some(control) = &description.rotation_control {
        entity.rotation_control = control.clone();
    }
    if let Some(keyframes) = &description.keyframes {
        entity.keyframes = keyframes.clone();
    }
    for child in &description.children {
        entity.add(build_entity(child)?, AnimationConfig::none())?;
    }
    Ok(entity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawable::DrawList;
    use crate::transform::{rotate, translate};
    use approx::assert_relative_eq;
    use glam::Vec3;

    fn draw(scene: &mut Scene, time: f32) -> DrawList {
        let mut list = DrawList::new();
        let mut ctx = DrawContext::new(Mat4::IDENTITY, Mat4::IDENTITY, time, &mut list);
        scene.draw(&mut ctx);
        list
    }

    #[test]
    fn flock_is_wrapped_in_its_placement() {
        let params = BoidsParams {
            count: 1,
            seed: Some(4),
            ..BoidsParams::default()
        };
        let boids = Boids::new(3, params, |_| Box::new(Entity::new("body").with_mesh(MeshHandle(2)))).unwrap();
        let placement = BoidsPlacement {
            position: Some(Vec3::new(0.0, 5.0, 0.0)),
            ..BoidsPlacement::default()
        };
        let mut scene = Scene::new();
        scene.add_boids(boids, &placement);
        assert_eq!(scene.root().names().collect::<Vec<_>>(), vec!["Boid3"]);

        let list = draw(&mut scene, 0.0);
        let origin = list.models_of(MeshHandle(2))[0].w_axis;
        // one step from the origin moves at most deltat * initial speed
        assert!((origin.y - 5.0).abs() < 1.0);
    }

    #[test]
    fn readding_replaces_the_subtree() {
        let mut scene = Scene::new();
        let cube = |x: f32| Entity::new("cube").with_mesh(MeshHandle(1)).placed(&crate::config::Placement::at(Vec3::new(x, 0.0, 0.0)));
        scene.add(cube(1.0), AnimationConfig::none()).unwrap();
        scene.add(cube(4.0), AnimationConfig::none()).unwrap();
        assert_eq!(scene.root().len(), 1);

        let models = draw(&mut scene, 0.0).models_of(MeshHandle(1));
        assert_eq!(models, vec![translate(Vec3::new(4.0, 0.0, 0.0))]);
    }

    #[test]
    fn description_builds_nested_entities_and_controllers() {
        let description = SceneDescription::from_json(
            r#"{
                "entities": [{
                    "name": "base",
                    "meshes": [1],
                    "rotation_control": { "axis": [0, 0, 1], "angle_increment": 90 },
                    "children": [{
                        "name": "arm",
                        "meshes": [2],
                        "placement": { "position": [1, 0, 0] }
                    }]
                }],
                "flocks": [{ "mesh": 9, "params": { "count": 8, "seed": 11 } }]
            }"#,
        )
        .unwrap();
        let mut scene = Scene::from_description(&description).unwrap();
        assert_eq!(scene.root().names().collect::<Vec<_>>(), vec!["base", "Boid0"]);

        scene.dispatch_input(Key::Right);
        let list = draw(&mut scene, 0.0);
        assert_eq!(list.models_of(MeshHandle(9)).len(), 8);

        let arm = list.models_of(MeshHandle(2))[0];
        let expected = rotate(Vec3::Z, 90.0) * translate(Vec3::X);
        for (a, b) in arm.to_cols_array().iter().zip(expected.to_cols_array().iter()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-5);
        }
    }

    #[test]
    fn bad_flock_count_fails_to_build() {
        let description =
            SceneDescription::from_json(r#"{ "flocks": [{ "mesh": 0, "params": { "count": 10 } }] }"#).unwrap();
        assert!(Scene::from_description(&description).is_err());
    }
}
