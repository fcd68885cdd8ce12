//! Core domain: game states, session resources, and tick ordering.

mod events;
mod resources;
mod state;
mod systems;


use bevy::prelude::*;

pub use events::GrubCollected;
pub use resources::{SessionConfig, SessionStats};
pub use state::GameState;

/// Simulation tick rate. All timers are counted in these ticks.
pub const TICK_RATE: i32 = 60;

/// Ordering of the fixed-tick simulation pass. One full pass completes
/// before the next input sample is consumed.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TickSet {
    /// Player actions triggered by input edges (jump, dash, release).
    Actions,
    /// Movement-vector shaping and AI intent.
    Intent,
    /// The shared kinematic step.
    Integrate,
    /// Player post-step state machine.
    PostStep,
    /// Interactable contact scripts.
    Contact,
    /// Fades, respawn sequencing, camera.
    Flow,
    /// Animation clocks and particle drift.
    Anim,
    /// Input edge flush.
    Flush,
}

pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<GameState>()
            .init_resource::<SessionConfig>()
            .init_resource::<SessionStats>()
            .add_message::<GrubCollected>()
            .configure_sets(
                FixedUpdate,
                (
                    TickSet::Actions,
                    TickSet::Intent,
                    TickSet::Integrate,
                    TickSet::PostStep,
                    TickSet::Contact,
                    TickSet::Flow,
                    TickSet::Anim,
                    TickSet::Flush,
                )
                    .chain()
                    .run_if(in_state(GameState::Run)),
            )
            .add_systems(Startup, systems::setup_camera)
            .add_systems(
                FixedUpdate,
                systems::tally_collected.in_set(TickSet::Flow),
            )
            .add_systems(Update, systems::sync_transforms);
    }
}
