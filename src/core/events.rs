//! Core domain: session-level messages.

use bevy::ecs::message::Message;

/// Fired once when a grub's collection script reaches its break checkpoint.
#[derive(Debug)]
pub struct GrubCollected;

impl Message for GrubCollected {}
