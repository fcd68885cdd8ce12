//! Core domain: camera setup, transform sync, and tally bookkeeping.

use bevy::ecs::message::MessageReader;
use bevy::prelude::*;

use crate::core::{GrubCollected, SessionStats};
use crate::physics::{Body, Facing};

pub(crate) fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}

pub(crate) fn tally_collected(
    mut collected: MessageReader<GrubCollected>,
    mut stats: ResMut<SessionStats>,
) {
    for _ in collected.read() {
        stats.grubs_collected += 1;
        info!(
            "Grub collected: {}/{}",
            stats.grubs_collected, stats.grubs_total
        );
    }
}

/// Mirror simulation positions into render transforms. World space is
/// y-down with positions at the box top-left; rendering truncates the
/// sub-pixel remainder.
pub(crate) fn sync_transforms(
    mut query: Query<(&Body, &mut Transform, Option<&Facing>, Option<&mut Sprite>)>,
) {
    for (body, mut transform, facing, sprite) in &mut query {
        let center = body.center();
        transform.translation.x = center.x.trunc();
        transform.translation.y = -center.y.trunc();
        if let (Some(facing), Some(mut sprite)) = (facing, sprite) {
            sprite.flip_x = *facing == Facing::Left;
        }
    }
}
