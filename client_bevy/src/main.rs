mod constants;
mod coord;
mod game;

use bevy::prelude::*;
use bevy::window::{PresentMode, WindowResolution};
use plinko_core::GameConfig;

use constants::{WINDOW_HEIGHT, WINDOW_WIDTH};
use game::{AudioCuePlugin, BoardPlugin, CorePlugin, HudPlugin, InputPlugin, PlayPlugin};

fn main() {
    let (config, config_warning) = config_from_env();

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Plinko".to_string(),
                resolution: WindowResolution::new(WINDOW_WIDTH, WINDOW_HEIGHT),
                present_mode: PresentMode::AutoVsync,
                resizable: true,
                ..default()
            }),
            ..default()
        }))
        .add_plugins(CorePlugin {
            config,
            config_warning,
        })
        .add_plugins(BoardPlugin)
        .add_plugins(PlayPlugin)
        .add_plugins(InputPlugin)
        .add_plugins(AudioCuePlugin)
        .add_plugins(HudPlugin)
        .run();
}

/// Config from the file named by `PLINKO_CONFIG`, else defaults. A bad file
/// falls back to defaults and returns the reason, to be logged once logging is up.
#[cfg(not(target_arch = "wasm32"))]
fn config_from_env() -> (GameConfig, Option<String>) {
    match std::env::var("PLINKO_CONFIG") {
        Ok(path) => match GameConfig::load(&path) {
            Ok(config) => (config, None),
            Err(e) => (GameConfig::default(), Some(e)),
        },
        Err(_) => (GameConfig::default(), None),
    }
}

#[cfg(target_arch = "wasm32")]
fn config_from_env() -> (GameConfig, Option<String>) {
    (GameConfig::default(), None)
}
