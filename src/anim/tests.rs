//! Animation domain: tests for clocks and the template table.

use super::{template, ActionTag, AnimTemplate, AnimationClock, AnimationController, EntityKind};

// -----------------------------------------------------------------------------
// Clock tests
// -----------------------------------------------------------------------------

#[test]
fn test_looping_clock_wraps() {
    let mut clock = AnimationClock::from_template(AnimTemplate {
        total_frames: 2,
        frames_per_image: 3,
        looping: true,
    });

    for _ in 0..6 {
        clock.tick();
    }
    assert_eq!(clock.frame_counter, 0);
    assert!(!clock.finished);
}

#[test]
fn test_one_shot_clock_latches_finished() {
    let mut clock = AnimationClock::from_template(AnimTemplate {
        total_frames: 4,
        frames_per_image: 2,
        looping: false,
    });

    for _ in 0..20 {
        clock.tick();
    }
    assert!(clock.finished);
    // Holds the last frame rather than wrapping.
    assert_eq!(clock.frame_counter, 7);
    assert_eq!(clock.image_index(), 3);
}

#[test]
fn test_image_index_paces_by_frames_per_image() {
    let mut clock = AnimationClock::from_template(AnimTemplate {
        total_frames: 4,
        frames_per_image: 5,
        looping: true,
    });

    assert_eq!(clock.image_index(), 0);
    for _ in 0..5 {
        clock.tick();
    }
    assert_eq!(clock.image_index(), 1);
    for _ in 0..5 {
        clock.tick();
    }
    assert_eq!(clock.image_index(), 2);
}

// -----------------------------------------------------------------------------
// Controller tests
// -----------------------------------------------------------------------------

#[test]
fn test_set_action_resets_clock_on_change() {
    let mut controller = AnimationController::new(EntityKind::Player, ActionTag::Idle);
    controller.clock.tick();
    controller.clock.tick();

    controller.set_action(ActionTag::Run);
    assert_eq!(controller.action, ActionTag::Run);
    assert_eq!(controller.clock.frame_counter, 0);
}

#[test]
fn test_set_action_is_noop_when_unchanged() {
    let mut controller = AnimationController::new(EntityKind::Player, ActionTag::Run);
    controller.clock.tick();
    controller.clock.tick();

    controller.set_action(ActionTag::Run);
    assert_eq!(controller.clock.frame_counter, 2);
}

// -----------------------------------------------------------------------------
// Template table tests
// -----------------------------------------------------------------------------

#[test]
fn test_unmatched_pair_falls_back_to_idle_loop() {
    let fallback = template(EntityKind::Saw, ActionTag::Hitstun);
    assert!(fallback.looping);
    assert_eq!(fallback.total_frames, 4);
}

#[test]
fn test_player_dash_is_one_shot() {
    let dash = template(EntityKind::Player, ActionTag::Dash);
    assert!(!dash.looping);
    let cloak = template(EntityKind::Player, ActionTag::Cloak);
    assert!(!cloak.looping);
}

#[test]
fn test_grub_collect_is_one_shot() {
    assert!(!template(EntityKind::Grub, ActionTag::Collect).looping);
}
