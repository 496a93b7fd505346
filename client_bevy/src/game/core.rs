use bevy::core_pipeline::tonemapping::Tonemapping;
use bevy::prelude::*;
use plinko_core::physics::RapierWorld;
use plinko_core::{GameConfig, GameEvent, GameSession};

use crate::constants::{
    color_from_hex, Colors, CAMERA_FOV_DEGREES, CAMERA_POSITION, CAMERA_TARGET,
    FILL_LIGHT_ILLUMINANCE, KEY_LIGHT_ILLUMINANCE, LISTENER_GAP,
};

#[derive(SystemSet, Debug, Hash, Eq, PartialEq, Clone)]
pub(crate) enum UpdateSet {
    Input,
    Simulate,
    Visuals,
}

#[derive(States, Debug, Clone, Copy, Default, Eq, PartialEq, Hash)]
pub(crate) enum AppState {
    /// Waiting for the board asset
    #[default]
    Loading,
    Playing,
}

/// The running game. Visual handles are Bevy entities.
#[derive(Resource, Deref, DerefMut)]
pub(crate) struct Game(pub(crate) GameSession<RapierWorld, Entity>);

/// A game event from the most recent frame.
#[derive(Message, Clone, Copy)]
pub(crate) struct FrameEvent(pub(crate) GameEvent);

#[derive(Message, Clone, Copy, Default)]
pub(crate) struct DropBallMessage;

#[derive(Component)]
pub(crate) struct MainCamera;

pub struct CorePlugin {
    pub config: GameConfig,
    /// Why the configured file was not used, if it wasn't
    pub config_warning: Option<String>,
}

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        if let Some(reason) = &self.config_warning {
            warn!("Ignoring PLINKO_CONFIG, using defaults: {}", reason);
        }

        let world = RapierWorld::new(self.config.physics.gravity_y);
        match GameSession::new(self.config.clone(), world) {
            Ok(session) => {
                info!(
                    "Game session ready (dt {:.4}s, {} bucket zones)",
                    self.config.physics.fixed_dt,
                    self.config.buckets.zones.len()
                );
                app.insert_resource(Game(session));
            }
            Err(e) => {
                error!("Invalid game configuration: {}", e);
                app.add_systems(Startup, exit_on_bad_config);
            }
        }

        app.init_state::<AppState>()
            .add_message::<FrameEvent>()
            .add_message::<DropBallMessage>()
            .insert_resource(ClearColor(color_from_hex(Colors::BACKGROUND)))
            .configure_sets(
                Update,
                (UpdateSet::Input, UpdateSet::Simulate, UpdateSet::Visuals)
                    .chain()
                    .run_if(resource_exists::<Game>),
            )
            .add_systems(Startup, (setup_camera, setup_lights));
    }
}

fn exit_on_bad_config(mut exit: MessageWriter<AppExit>) {
    exit.write(AppExit::error());
}

fn setup_camera(mut commands: Commands) {
    commands.spawn((
        Camera3d::default(),
        Projection::from(PerspectiveProjection {
            fov: CAMERA_FOV_DEGREES.to_radians(),
            ..default()
        }),
        // Tonemapping LUTs are not bundled.
        Tonemapping::None,
        Transform::from_translation(CAMERA_POSITION).looking_at(CAMERA_TARGET, Vec3::Y),
        SpatialListener::new(LISTENER_GAP),
        MainCamera,
    ));
}

fn setup_lights(mut commands: Commands) {
    commands.spawn((
        DirectionalLight {
            illuminance: KEY_LIGHT_ILLUMINANCE,
            ..default()
        },
        Transform::from_xyz(1.0, 1.0, 1.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
    // Fill from the camera side stands in for ambient light.
    commands.spawn((
        DirectionalLight {
            illuminance: FILL_LIGHT_ILLUMINANCE,
            ..default()
        },
        Transform::from_translation(CAMERA_POSITION).looking_at(CAMERA_TARGET, Vec3::Y),
    ));
}
