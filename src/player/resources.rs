//! Player domain: tuning and sampled-input resources.

use bevy::prelude::*;
use serde::Deserialize;

/// Movement tuning. Tick constants are tunable parameters, not contracts;
/// defaults are the shipped feel. Loadable from `assets/tuning.ron`.
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    /// Horizontal input scale in pixels per tick.
    pub run_scale: f32,
    /// Grounded jump impulse (negative is up).
    pub jump_velocity: f32,
    pub air_jump_velocity: f32,
    pub max_air_jumps: u8,
    pub max_dashes: u8,
    /// Divisor applied to upward velocity on jump release.
    pub variable_jump_shear: f32,
    /// Coyote buffer: ticks of airtime still treated as grounded.
    pub coyote_buffer: i32,
    /// Gravity is divided near the jump apex when |vy| is inside this band.
    pub low_grav_threshold: f32,
    pub low_grav_divisor: f32,
    /// Horizontal scale while dashing.
    pub dash_scale: f32,
    pub dash_ticks: i32,
    pub dash_cooldown_ticks: i32,
    /// Fall speed cap while wall sliding.
    pub wall_slide_velocity: f32,
    pub wall_jump_velocity: f32,
    /// Ticks of forced movement after a wall jump.
    pub wall_jump_cutoff: i32,
    /// Ticks of zeroed movement after the cutoff.
    pub wall_jump_stall: i32,
    /// Ticks after leaving a wall during which a wall jump still fires.
    pub wall_jump_buffer: i32,
    /// Cloak-dash intangibility window.
    pub cloak_ticks: i32,
    /// Post-respawn intangibility window.
    pub intangibility_ticks: i32,
    /// Falling past this Y requests a death fade, unless inside the depths.
    pub depths_y: f32,
    pub depths_x: f32,
    /// Run ticks between footstep cues.
    pub run_cue_interval: i32,
    pub run_particle_interval: i32,
    /// Slide ticks between grip-loop cues.
    pub slide_cue_interval: i32,
    pub hitstun_particles: u32,
    /// Falling ticks before a landing counts as hard.
    pub hard_landing_ticks: i32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            run_scale: 1.8,
            jump_velocity: -5.05,
            air_jump_velocity: -4.6,
            max_air_jumps: 1,
            max_dashes: 1,
            variable_jump_shear: 12.0,
            coyote_buffer: 4,
            low_grav_threshold: 0.6,
            low_grav_divisor: 1.3,
            dash_scale: 4.0,
            dash_ticks: 15,
            dash_cooldown_ticks: 22,
            wall_slide_velocity: 1.33,
            wall_jump_velocity: -4.6,
            wall_jump_cutoff: 8,
            wall_jump_stall: 2,
            wall_jump_buffer: 10,
            cloak_ticks: 20,
            intangibility_ticks: 60,
            depths_y: 400.0,
            depths_x: -300.0,
            run_cue_interval: 120,
            run_particle_interval: 10,
            slide_cue_interval: 150,
            hitstun_particles: 80,
            hard_landing_ticks: 60,
        }
    }
}

/// Input state sampled once per tick before the state machine runs. Edge
/// flags accumulate between fixed ticks and are flushed at tick end.
#[derive(Resource, Debug, Default)]
pub struct PlayerInput {
    /// -1, 0, or 1.
    pub axis: f32,
    pub holding_left: bool,
    pub holding_right: bool,
    pub holding_up: bool,
    pub holding_down: bool,
    pub jump_held: bool,
    pub jump_pressed: bool,
    pub jump_released: bool,
    pub dash_pressed: bool,
}

impl PlayerInput {
    pub fn clear_edges(&mut self) {
        self.jump_pressed = false;
        self.jump_released = false;
        self.dash_pressed = false;
    }
}
