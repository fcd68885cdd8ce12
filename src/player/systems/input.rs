//! Player domain: keyboard sampling.
//!
//! Runs in `Update` so no key edge is lost between fixed ticks; edge flags
//! accumulate until the tick's Flush set clears them.

use bevy::prelude::*;

use crate::player::resources::PlayerInput;

pub(crate) fn read_input(keys: Res<ButtonInput<KeyCode>>, mut input: ResMut<PlayerInput>) {
    input.holding_left = keys.pressed(KeyCode::KeyA) || keys.pressed(KeyCode::ArrowLeft);
    input.holding_right = keys.pressed(KeyCode::KeyD) || keys.pressed(KeyCode::ArrowRight);
    input.holding_up = keys.pressed(KeyCode::KeyW) || keys.pressed(KeyCode::ArrowUp);
    input.holding_down = keys.pressed(KeyCode::KeyS) || keys.pressed(KeyCode::ArrowDown);
    input.jump_held = keys.pressed(KeyCode::Space);

    input.axis = match (input.holding_left, input.holding_right) {
        (true, false) => -1.0,
        (false, true) => 1.0,
        _ => 0.0,
    };

    input.jump_pressed |= keys.just_pressed(KeyCode::Space);
    input.jump_released |= keys.just_released(KeyCode::Space);
    input.dash_pressed |=
        keys.just_pressed(KeyCode::ShiftLeft) || keys.just_pressed(KeyCode::KeyK);
}

pub(crate) fn clear_input_edges(mut input: ResMut<PlayerInput>) {
    input.clear_edges();
}
