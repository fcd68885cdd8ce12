//! Core domain: session configuration and progression tallies.

use bevy::prelude::*;
use rand::Rng;

#[derive(Resource, Debug)]
pub struct SessionConfig {
    /// Seeds the cosmetic RNG so a session's particle noise is reproducible.
    pub seed: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: rand::rng().random(),
        }
    }
}

/// Session-wide tallies. Entities report events (collected, died) rather
/// than mutating these directly.
#[derive(Resource, Debug, Default)]
pub struct SessionStats {
    pub deaths: u32,
    pub grubs_collected: u32,
    pub grubs_total: u32,
}
