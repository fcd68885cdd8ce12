mod anim;
mod core;
mod fx;
mod interact;
mod level;
mod physics;
mod player;
mod tilemap;
mod transition;

use bevy::prelude::*;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Mothlight".to_string(),
                resolution: (1280, 960).into(),
                resizable: true,
                ..default()
            }),
            ..default()
        }))
        .insert_resource(Time::<Fixed>::from_hz(60.0))
        .add_plugins((
            core::CorePlugin,
            level::LevelPlugin,
            physics::PhysicsPlugin,
            player::PlayerPlugin,
            interact::InteractPlugin,
            anim::AnimPlugin,
            fx::FxPlugin,
            transition::TransitionPlugin,
        ))
        .run();
}
