/*
 * Animation Controllers Module
 *
 * Two wrapper nodes that animate the single child they own:
 * - RotationControlNode: an angle around a fixed axis, nudged up or down by
 *   configured key triggers
 * - KeyFrameControlNode: translate / rotate / scale tracks sampled at the
 *   frame's session time, composed as T * R * S
 */

use glam::{Mat4, Quat, Vec3};

use crate::config::{KeyFrameTracks, RotationControl};
use crate::drawable::{DrawContext, Drawable};
use crate::input::Key;
use crate::transform::{rotate, scale, translate};

pub struct RotationControlNode {
    control: RotationControl,
    baseline: Mat4,
    accumulated_angle: f32,
    child_name: String,
    child: Box<dyn Drawable>,
}

impl RotationControlNode {
    pub fn new(control: &RotationControl, child_name: impl Into<String>, child: Box<dyn Drawable>) -> Self {
        Self {
            control: control.clone(),
            baseline: Mat4::IDENTITY,
            accumulated_angle: 0.0,
            child_name: child_name.into(),
            child,
        }
    }

    // Transform applied before the controlled rotation
    pub fn with_baseline(mut self, baseline: Mat4) -> Self {
        self.baseline = baseline;
        self
    }

    pub fn accumulated_angle(&self) -> f32 {
        self.accumulated_angle
    }

    pub fn effective_transform(&self) -> Mat4 {
        self.baseline * rotate(self.control.axis, self.accumulated_angle)
    }
}

impl Drawable for RotationControlNode {
    fn draw(&mut self, ctx: &mut DrawContext<'_>, model: Mat4) {
        let model = model * self.effective_transform();
        self.child.draw(ctx, model);
    }

    fn on_key(&mut self, key: Key) {
        if key == self.control.increase_trigger {
            self.accumulated_angle += self.control.angle_increment;
            log::debug!("{}: rotation angle now {}", self.child_name, self.accumulated_angle);
        }
        if key == self.control.decrease_trigger {
            self.accumulated_angle -= self.control.angle_increment;
            log::debug!("{}: rotation angle now {}", self.child_name, self.accumulated_angle);
        }
        self.child.on_key(key);
    }
}

pub struct KeyFrameControlNode {
    tracks: KeyFrameTracks,
    child: Box<dyn Drawable>,
}

impl KeyFrameControlNode {
    pub fn new(tracks: KeyFrameTracks, name: &str, child: Box<dyn Drawable>) -> Self {
        log::debug!(
            "{name}: keyframes ({} translate, {} rotate, {} scale keys)",
            tracks.translate.len(),
            tracks.rotate.len(),
            tracks.scale.len()
        );
        Self { tracks, child }
    }

    // Pose at session time `time`; empty tracks contribute identity parts
    pub fn transform_at(&self, time: f32) -> Mat4 {
        let translation = self.tracks.translate.value(time).unwrap_or(Vec3::ZERO);
        let rotation = self.tracks.rotate.value(time).unwrap_or(Quat::IDENTITY);
        let scaling = self.tracks.scale.value(time).unwrap_or(Vec3::ONE);
        translate(translation) * Mat4::from_quat(rotation) * scale(scaling)
    }
}

impl Drawable for KeyFrameControlNode {
    fn draw(&mut self, ctx: &mut DrawContext<'_>, model: Mat4) {
        let model = model * self.transform_at(ctx.time);
        self.child.draw(ctx, model);
    }

    fn on_key(&mut self, key: Key) {
        self.child.on_key(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KeyFrameConfig;
    use crate::drawable::{DrawList, MeshHandle};
    use crate::keyframes::KeyFrames;
    use crate::node::Node;
    use crate::transform::AxisAngle;
    use approx::assert_relative_eq;
    use std::sync::{Arc, Mutex};

    struct Leaf;

    impl Drawable for Leaf {
        fn draw(&mut self, ctx: &mut DrawContext<'_>, model: Mat4) {
            ctx.draw_mesh(MeshHandle(0), &model);
        }
    }

    struct KeyLog(Arc<Mutex<Vec<Key>>>);

    impl Drawable for KeyLog {
        fn draw(&mut self, _ctx: &mut DrawContext<'_>, _model: Mat4) {}

        fn on_key(&mut self, key: Key) {
            self.0.lock().unwrap().push(key);
        }
    }

    fn rotation_node(increment: f32) -> RotationControlNode {
        RotationControlNode::new(&RotationControl::new(Vec3::Y, increment), "child", Box::new(Leaf))
    }

    #[test]
    fn triggers_accumulate_in_any_order() {
        let mut node = rotation_node(2.5);
        let presses = [Key::Right, Key::Left, Key::Right, Key::Right, Key::Up, Key::Left, Key::Right];
        for key in presses {
            node.on_key(key);
        }
        // four increases, two decreases
        assert_relative_eq!(node.accumulated_angle(), 2.0 * 2.5);
    }

    #[test]
    fn effective_transform_is_idempotent() {
        let mut node = rotation_node(15.0).with_baseline(translate(Vec3::X));
        node.on_key(Key::Right);
        let first = node.effective_transform();
        assert_eq!(first, node.effective_transform());
        assert_eq!(first, translate(Vec3::X) * rotate(Vec3::Y, 15.0));
    }

    #[test]
    fn keys_are_forwarded_to_the_wrapped_child() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let control = RotationControl::new(Vec3::Z, 1.0).with_triggers(Key::Up, Key::Down);
        let mut node = RotationControlNode::new(&control, "log", Box::new(KeyLog(seen.clone())));
        node.on_key(Key::Char('a'));
        node.on_key(Key::Up);
        assert_eq!(*seen.lock().unwrap(), vec![Key::Char('a'), Key::Up]);
        assert_relative_eq!(node.accumulated_angle(), 1.0);
    }

    #[test]
    fn rotation_is_applied_when_drawing() {
        let mut node = rotation_node(90.0);
        node.on_key(Key::Right);
        let mut list = DrawList::new();
        let mut ctx = DrawContext::new(Mat4::IDENTITY, Mat4::IDENTITY, 0.0, &mut list);
        node.draw(&mut ctx, translate(Vec3::Z));
        assert_eq!(list.commands()[0].model, translate(Vec3::Z) * rotate(Vec3::Y, 90.0));
    }

    #[test]
    fn keyframe_node_samples_frame_time() {
        let tracks = KeyFrameConfig::new(
            vec![(0.0, Vec3::ZERO), (2.0, Vec3::new(4.0, 0.0, 0.0))],
            vec![],
            vec![],
        )
        .tracks()
        .unwrap();
        let mut node = KeyFrameControlNode::new(tracks, "child", Box::new(Node::new().with_child("leaf", Leaf)));

        let mut list = DrawList::new();
        for time in [1.0, 3.0] {
            let mut ctx = DrawContext::new(Mat4::IDENTITY, Mat4::IDENTITY, time, &mut list);
            node.draw(&mut ctx, Mat4::IDENTITY);
        }
        let models = list.models_of(MeshHandle(0));
        assert_eq!(models[0].w_axis.x, 2.0);
        assert_eq!(models[0], models[1]);
    }

    #[test]
    fn tracks_loop_independently() {
        let tracks = KeyFrameTracks {
            translate: KeyFrames::new("translate", [(0.0, Vec3::ZERO), (2.0, Vec3::X * 2.0)]).unwrap(),
            rotate: KeyFrames::default(),
            scale: KeyFrames::new("scale", [(0.0, Vec3::ONE), (3.0, Vec3::splat(4.0))]).unwrap(),
        };
        let node = KeyFrameControlNode::new(tracks, "child", Box::new(Leaf));

        // t = 2.5: translation has wrapped to 0.5, scale is still in its first loop
        let pose = node.transform_at(2.5);
        assert_relative_eq!(pose.w_axis.x, 0.5, epsilon = 1e-6);
        assert_relative_eq!(pose.x_axis.x, 3.5, epsilon = 1e-6);
    }

    #[test]
    fn rotate_track_turns_the_child() {
        let tracks = KeyFrameConfig::new(
            vec![],
            vec![
                (0.0, AxisAngle { axis: Vec3::Y, angle: 0.0 }),
                (1.0, AxisAngle { axis: Vec3::Y, angle: 90.0 }),
            ],
            vec![],
        )
        .tracks()
        .unwrap();
        let node = KeyFrameControlNode::new(tracks, "child", Box::new(Leaf));
        let forward = node.transform_at(1.0).transform_vector3(Vec3::Z);
        assert_relative_eq!(forward.x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(forward.z, 0.0, epsilon = 1e-5);
    }
}
