//! Player domain: tests for action eligibility and the tick state machine.

use bevy::ecs::message::MessageReader;
use bevy::prelude::*;

use super::actions::{release_jump, try_dash, try_jump, JumpKind};
use super::components::{
    Abilities, Charges, Player, PlayerControl, PlayerTimers, SpawnAnchor, WallGrip,
};
use super::resources::{PlayerInput, PlayerTuning};
use super::{spawn_player, systems, PLAYER_SIZE};
use crate::anim::{ActionTag, AnimationController, EntityKind};
use crate::core::TICK_RATE;
use crate::fx::{AudioCue, CueAction, ParticleBurst, SoundId};
use crate::physics::{
    integrate_bodies, Body, Contacts, Facing, Gravity, MoveIntent, Velocity,
};
use crate::tilemap::{TileKind, TileMap, TileRecord};
use crate::transition::FadeRequest;

fn tuning() -> PlayerTuning {
    PlayerTuning::default()
}

struct ActionState {
    control: PlayerControl,
    abilities: Abilities,
    timers: PlayerTimers,
    grip: WallGrip,
    charges: Charges,
    velocity: Velocity,
    input: PlayerInput,
}

fn grounded_state() -> ActionState {
    ActionState {
        control: PlayerControl::default(),
        abilities: Abilities::default(),
        timers: PlayerTimers::default(),
        grip: WallGrip::default(),
        charges: Charges { jumps: 1, dashes: 1 },
        velocity: Velocity::default(),
        input: PlayerInput::default(),
    }
}

fn jump(state: &mut ActionState) -> Option<JumpKind> {
    try_jump(
        &tuning(),
        &state.control,
        &state.abilities,
        &mut state.timers,
        &mut state.grip,
        &mut state.charges,
        &mut state.velocity,
    )
}

fn dash(state: &mut ActionState, facing: Facing) -> Option<super::DashStart> {
    try_dash(
        &tuning(),
        &state.input,
        &state.control,
        &state.abilities,
        facing,
        &mut state.timers,
        &mut state.grip,
        &mut state.charges,
        &mut state.velocity,
    )
}

// -----------------------------------------------------------------------------
// Jump eligibility
// -----------------------------------------------------------------------------

#[test]
fn test_grounded_jump() {
    let mut state = grounded_state();
    assert_eq!(jump(&mut state), Some(JumpKind::Ground));
    assert_eq!(state.velocity.0.y, tuning().jump_velocity);
    // Grounded jumps do not consume the air-jump charge.
    assert_eq!(state.charges.jumps, 1);
}

#[test]
fn test_coyote_window_allows_grounded_jump() {
    let mut state = grounded_state();
    state.timers.air_time = tuning().coyote_buffer * 2;
    assert_eq!(jump(&mut state), Some(JumpKind::Ground));
}

#[test]
fn test_air_jump_requires_wings() {
    let mut state = grounded_state();
    state.timers.air_time = tuning().coyote_buffer * 2 + 1;
    assert_eq!(jump(&mut state), None);

    state.abilities.wings = true;
    assert_eq!(jump(&mut state), Some(JumpKind::Air));
    assert_eq!(state.velocity.0.y, tuning().air_jump_velocity);
    assert_eq!(state.charges.jumps, 0);
    assert_eq!(state.timers.air_jumping, 1);

    // The charge is spent.
    state.timers.air_time = tuning().coyote_buffer * 2 + 1;
    assert_eq!(jump(&mut state), None);
}

#[test]
fn test_jump_blocked_while_dashing() {
    let mut state = grounded_state();
    state.timers.dash = tuning().coyote_buffer;
    assert_eq!(jump(&mut state), None);
}

#[test]
fn test_jump_blocked_without_control() {
    let mut state = grounded_state();
    state.control.can_move = false;
    assert_eq!(jump(&mut state), None);
}

#[test]
fn test_wall_jump_pushes_away_from_wall() {
    let mut state = grounded_state();
    state.abilities.claw = true;
    state.timers.wall_slide = 5;
    state.timers.wall_jump = tuning().wall_jump_buffer + 5;
    state.grip.on_right = true;

    assert_eq!(jump(&mut state), Some(JumpKind::Wall { dir_right: false }));
    assert_eq!(state.velocity.0.y, tuning().wall_jump_velocity);
    assert_eq!(state.timers.wall_jump, 0);
}

#[test]
fn test_wall_jump_requires_claw() {
    let mut state = grounded_state();
    state.charges.jumps = 0;
    state.timers.air_time = 100;
    state.timers.wall_slide = 5;
    state.timers.wall_jump = tuning().wall_jump_buffer + 5;

    assert_eq!(jump(&mut state), None);
}

// -----------------------------------------------------------------------------
// Jump release
// -----------------------------------------------------------------------------

#[test]
fn test_release_shears_upward_velocity() {
    let cfg = tuning();
    let mut timers = PlayerTimers {
        wall_jump: cfg.wall_jump_cutoff + 10,
        ..default()
    };
    let mut velocity = Velocity(Vec2::new(0.0, cfg.jump_velocity));

    release_jump(&cfg, &mut timers, &mut velocity);
    assert_eq!(velocity.0.y, cfg.jump_velocity / cfg.variable_jump_shear);
}

#[test]
fn test_release_inside_lockout_shears_less() {
    let cfg = tuning();
    let mut timers = PlayerTimers {
        wall_jump: 4,
        ..default()
    };
    let mut velocity = Velocity(Vec2::new(0.0, -4.0));

    release_jump(&cfg, &mut timers, &mut velocity);
    assert_eq!(velocity.0.y, -4.0 / (cfg.variable_jump_shear / 4.0));
    // The lockout clock is accelerated so control comes back sooner.
    assert_eq!(timers.wall_jump, 6);
}

#[test]
fn test_release_ignores_downward_velocity() {
    let cfg = tuning();
    let mut timers = PlayerTimers::default();
    let mut velocity = Velocity(Vec2::new(0.0, 2.0));

    release_jump(&cfg, &mut timers, &mut velocity);
    assert_eq!(velocity.0.y, 2.0);
}

// -----------------------------------------------------------------------------
// Dash eligibility and direction
// -----------------------------------------------------------------------------

fn dash_ready(state: &mut ActionState) {
    state.abilities.dash = true;
    state.timers.wall_jump = tuning().wall_jump_buffer + 20;
    state.timers.dash_cooldown = tuning().dash_cooldown_ticks + 5;
}

#[test]
fn test_dash_follows_facing() {
    let mut state = grounded_state();
    dash_ready(&mut state);

    let start = dash(&mut state, Facing::Right).expect("dash should fire");
    assert!(start.dir_right);
    assert_eq!(state.timers.dash, tuning().dash_ticks);
    assert_eq!(state.charges.dashes, 0);
    assert_eq!(state.velocity.0.y, 0.0);
    assert_eq!(state.timers.dash_cooldown, -tuning().dash_ticks);
}

#[test]
fn test_dash_held_direction_wins_during_lockout() {
    let mut state = grounded_state();
    dash_ready(&mut state);
    state.timers.wall_jump = 5;
    state.input.holding_left = true;

    let start = dash(&mut state, Facing::Right).expect("dash should fire");
    assert!(!start.dir_right);
    assert_eq!(state.timers.dash, -tuning().dash_ticks);
}

#[test]
fn test_dash_no_direction_during_lockout_fails() {
    let mut state = grounded_state();
    dash_ready(&mut state);
    state.timers.wall_jump = 5;

    assert_eq!(dash(&mut state, Facing::Right), None);
    assert_eq!(state.charges.dashes, 1);
}

#[test]
fn test_dash_from_slide_goes_away_from_wall() {
    let mut state = grounded_state();
    dash_ready(&mut state);
    state.timers.sliding_time = tuning().coyote_buffer + 3;
    state.grip.on_right = true;

    let start = dash(&mut state, Facing::Right).expect("dash should fire");
    assert!(!start.dir_right);
    assert_eq!(state.timers.sliding_time, 0);
}

#[test]
fn test_dash_gated_by_cooldown() {
    let mut state = grounded_state();
    dash_ready(&mut state);
    state.timers.dash_cooldown = tuning().dash_cooldown_ticks;
    assert_eq!(dash(&mut state, Facing::Right), None);
}

#[test]
fn test_dash_requires_ability_and_charge() {
    let mut state = grounded_state();
    state.timers.wall_jump = 30;
    state.timers.dash_cooldown = 30;
    assert_eq!(dash(&mut state, Facing::Right), None);

    state.abilities.dash = true;
    state.charges.dashes = 0;
    assert_eq!(dash(&mut state, Facing::Right), None);
}

#[test]
fn test_cloak_dash_opens_intangibility_window() {
    let mut state = grounded_state();
    dash_ready(&mut state);
    state.abilities.cloak = true;

    let start = dash(&mut state, Facing::Left).expect("dash should fire");
    assert!(start.cloaked);
    assert_eq!(state.timers.cloak, tuning().cloak_ticks);
    assert!(state.timers.is_cloaked());
}

// -----------------------------------------------------------------------------
// Full-tick behavior
// -----------------------------------------------------------------------------

fn solid(map: &mut TileMap, cell: IVec2) {
    map.insert(TileRecord {
        kind: TileKind::Stone,
        variant: 0,
        grid_pos: cell,
    });
}

fn wide_floor() -> TileMap {
    let mut map = TileMap::default();
    for x in -10..=10 {
        solid(&mut map, IVec2::new(x, 1));
    }
    map
}

fn tick_app(map: TileMap) -> App {
    let mut app = App::new();
    app.add_message::<AudioCue>()
        .add_message::<ParticleBurst>()
        .add_message::<FadeRequest>()
        .insert_resource(PlayerTuning::default())
        .insert_resource(PlayerInput::default())
        .insert_resource(map)
        .add_systems(
            Update,
            (
                systems::apply_actions,
                systems::shape_move_intent,
                integrate_bodies,
                systems::update_player_state,
                systems::clear_input_edges,
            )
                .chain(),
        );
    app
}

fn spawn_test_player(app: &mut App, pos: Vec2) -> Entity {
    app.world_mut()
        .spawn((
            Player,
            Body::new(pos, PLAYER_SIZE),
            Velocity::default(),
            Gravity::default(),
            Contacts::default(),
            MoveIntent::default(),
            Facing::default(),
            Abilities::default(),
            Charges { jumps: 0, dashes: 0 },
            PlayerTimers::default(),
            WallGrip::default(),
            PlayerControl::default(),
            SpawnAnchor(pos),
            AnimationController::new(EntityKind::Player, ActionTag::Idle),
        ))
        .id()
}

#[test]
fn test_landing_replenishes_charges() {
    let mut app = tick_app(wide_floor());
    let player = spawn_test_player(&mut app, Vec2::new(0.0, -30.0));

    for _ in 0..60 {
        app.update();
    }

    let charges = app.world().get::<Charges>(player).unwrap();
    assert_eq!(charges.jumps, 1);
    assert_eq!(charges.dashes, 1);
    let body = app.world().get::<Body>(player).unwrap();
    assert_eq!(body.aabb().bottom(), 16.0);
}

#[test]
fn test_dash_decays_and_regates() {
    let mut app = tick_app(wide_floor());
    let player = spawn_test_player(&mut app, Vec2::new(0.0, 2.0));
    {
        let world = app.world_mut();
        let mut abilities = world.get_mut::<Abilities>(player).unwrap();
        abilities.dash = true;
        let mut charges = world.get_mut::<Charges>(player).unwrap();
        charges.dashes = 1;
        let mut timers = world.get_mut::<PlayerTimers>(player).unwrap();
        timers.wall_jump = 40;
        timers.dash_cooldown = 40;
    }

    app.world_mut().resource_mut::<PlayerInput>().dash_pressed = true;
    app.update();

    let first = app.world().get::<PlayerTimers>(player).unwrap().dash;
    assert_eq!(first, PlayerTuning::default().dash_ticks - 1);

    // Strictly monotonic decay to zero; a second press mid-dash is ignored.
    let mut last = first;
    while last > 0 {
        app.world_mut().resource_mut::<PlayerInput>().dash_pressed = true;
        app.update();
        let dash = app.world().get::<PlayerTimers>(player).unwrap().dash;
        assert!(dash < last);
        last = dash;
    }

    // A few grounded ticks after the dash ends refill the charge.
    for _ in 0..5 {
        app.update();
    }
    assert_eq!(
        app.world().get::<Charges>(player).unwrap().dashes,
        PlayerTuning::default().max_dashes
    );

    // Refused until the cooldown elapses, then fires again.
    app.world_mut().resource_mut::<PlayerInput>().dash_pressed = true;
    app.update();
    assert_eq!(app.world().get::<PlayerTimers>(player).unwrap().dash, 0);

    while app.world().get::<PlayerTimers>(player).unwrap().dash_cooldown
        <= PlayerTuning::default().dash_cooldown_ticks
    {
        app.update();
    }
    app.world_mut().resource_mut::<PlayerInput>().dash_pressed = true;
    app.update();
    assert_ne!(app.world().get::<PlayerTimers>(player).unwrap().dash, 0);
}

#[test]
fn test_wall_slide_requires_claw_and_caps_fall_speed() {
    let mut map = wide_floor();
    for y in -4..=0 {
        solid(&mut map, IVec2::new(2, y));
    }

    for has_claw in [false, true] {
        let mut app = tick_app(map_clone(&map));
        let player = spawn_test_player(&mut app, Vec2::new(20.0, -60.0));
        if has_claw {
            app.world_mut()
                .get_mut::<Abilities>(player)
                .unwrap()
                .claw = true;
        }

        let mut slid = false;
        for _ in 0..50 {
            {
                let mut input = app.world_mut().resource_mut::<PlayerInput>();
                input.axis = 1.0;
                input.holding_right = true;
            }
            app.update();

            let grip = app.world().get::<WallGrip>(player).unwrap();
            if grip.sliding {
                slid = true;
                let velocity = app.world().get::<Velocity>(player).unwrap();
                assert!(velocity.0.y <= PlayerTuning::default().wall_slide_velocity);
            }
        }

        assert_eq!(slid, has_claw);
    }
}

fn map_clone(map: &TileMap) -> TileMap {
    let mut copy = TileMap::new(map.tile_size);
    for record in map.records() {
        copy.insert(record.clone());
    }
    copy
}

#[test]
fn test_spawn_player_assembles_full_kit() {
    let mut world = World::new();
    let pos = Vec2::new(8.0, -20.0);
    let entity = {
        let mut commands = world.commands();
        spawn_player(&mut commands, pos)
    };
    world.flush();

    assert_eq!(world.get::<Body>(entity).unwrap().pos, pos);
    assert_eq!(world.get::<SpawnAnchor>(entity).unwrap().0, pos);
    assert_eq!(world.get::<Charges>(entity).unwrap().jumps, 1);
    assert!(world.get::<PlayerControl>(entity).unwrap().can_move);
    assert!(world.get::<Sprite>(entity).is_some());
    assert!(world.get::<Transform>(entity).is_some());
}

// -----------------------------------------------------------------------------
// Falling cue
// -----------------------------------------------------------------------------

#[derive(Resource, Default)]
struct FallingVolumes(Vec<f32>);

fn collect_falling_volumes(mut cues: MessageReader<AudioCue>, mut log: ResMut<FallingVolumes>) {
    for cue in cues.read() {
        if cue.sound == SoundId::Falling
            && let CueAction::Volume(level) = cue.action
        {
            log.0.push(level);
        }
    }
}

#[test]
fn test_falling_volume_ramps_over_a_second() {
    assert_eq!(systems::falling_volume(TICK_RATE), 0.0);
    let mid = systems::falling_volume(TICK_RATE + TICK_RATE / 2);
    assert!(mid > 0.0 && mid < 1.0);
    assert!(systems::falling_volume(TICK_RATE + 20) < systems::falling_volume(TICK_RATE + 40));
    assert_eq!(systems::falling_volume(TICK_RATE * 3), 1.0);
}

#[test]
fn test_long_fall_ramps_the_falling_cue() {
    let mut app = tick_app(TileMap::default());
    app.init_resource::<FallingVolumes>();
    app.add_systems(Update, collect_falling_volumes);
    spawn_test_player(&mut app, Vec2::ZERO);

    // Long enough for the ramp to start (one second of falling) and reach
    // full volume a second later, past the coyote grace at the start.
    for _ in 0..TICK_RATE * 3 {
        app.update();
    }

    let volumes = &app.world().resource::<FallingVolumes>().0;
    assert!(!volumes.is_empty());
    assert!(volumes.windows(2).all(|pair| pair[0] <= pair[1]));
    assert_eq!(*volumes.last().unwrap(), 1.0);
}

#[test]
fn test_suspended_control_ignores_input() {
    let mut app = tick_app(wide_floor());
    let player = spawn_test_player(&mut app, Vec2::new(0.0, 2.0));
    app.world_mut()
        .get_mut::<PlayerControl>(player)
        .unwrap()
        .can_move = false;

    for _ in 0..20 {
        {
            let mut input = app.world_mut().resource_mut::<PlayerInput>();
            input.axis = 1.0;
            input.holding_right = true;
            input.jump_pressed = true;
        }
        app.update();
    }

    let body = app.world().get::<Body>(player).unwrap();
    assert_eq!(body.pos.x, 0.0);
    // Gravity still ran; the body is seated on the floor, not frozen.
    assert_eq!(body.aabb().bottom(), 16.0);
}
