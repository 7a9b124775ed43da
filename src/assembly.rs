/*
 * Assembly Module
 *
 * Decides which nodes wrap an entity when it is attached to a parent:
 *
 *   {name}_keyframe?  ->  {name}_rot?  ->  placement node  ->  {name}_tmp (entity)
 *
 * The placement node carries the entity's pose. A rotation controller is
 * added only if the rotation descriptor is enabled, and a keyframe
 * controller only if the keyframe descriptor is enabled, so the tree never
 * holds do-nothing wrappers. The outermost node is attached under the
 * entity's own name, which makes re-attaching an entity replace it.
 */

use crate::config::AnimationConfig;
use crate::controls::{KeyFrameControlNode, RotationControlNode};
use crate::drawable::Drawable;
use crate::entity::Entity;
use crate::errors::Result;
use crate::node::Node;

// Returns the attachment name and the wrapped subtree. Keyframe tracks are
// validated before anything is built.
pub fn assemble(mut entity: Entity, animation: AnimationConfig) -> Result<(String, Box<dyn Drawable>)> {
    if let Some(control) = animation.rotation_control {
        entity.rotation_control = control;
    }
    if let Some(keyframes) = animation.keyframes {
        entity.keyframes = keyframes;
    }

    let name = entity.name().to_owned();
    let tracks = if entity.keyframes.enabled {
        Some(entity.keyframes.tracks()?)
    } else {
        None
    };
    let rotation = entity
        .rotation_control
        .enabled
        .then(|| entity.rotation_control.clone());

    let placed = Node::with_transform(entity.transform()).with_child(format!("{name}_tmp"), entity);
    let mut wrapped: Box<dyn Drawable> = Box::new(placed);

    if let Some(control) = rotation {
        log::debug!("{name}: rotation control around {:?}", control.axis);
        wrapped = Box::new(RotationControlNode::new(&control, format!("{name}_rot"), wrapped));
    }
    if let Some(tracks) = tracks {
        wrapped = Box::new(KeyFrameControlNode::new(tracks, &format!("{name}_keyframe"), wrapped));
    }

    Ok((name, wrapped))
}
