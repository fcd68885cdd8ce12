//! Player domain: systems.

mod input;
mod locomotion;

pub(crate) use input::{clear_input_edges, read_input};
pub(crate) use locomotion::{
    apply_actions, falling_volume, shape_move_intent, update_player_state,
};
