use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use plinko_core::picking::{ButtonRect, Ray};

use crate::constants::{color_from_hex, Colors};
use crate::coord::{from_bevy_vec3, to_bevy_vec3};

use super::{DropBallMessage, Game, MainCamera, UpdateSet};

pub struct InputPlugin;

/// The clickable "drop ball" button in world space.
#[derive(Resource)]
pub(crate) struct DropButton(ButtonRect);

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_drop_button.run_if(resource_exists::<Game>))
            .add_systems(
                Update,
                (pointer_input, keyboard_input).in_set(UpdateSet::Input),
            );
    }
}

fn spawn_drop_button(
    mut commands: Commands,
    game: Res<Game>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let rect = ButtonRect::from_config(&game.config().button);
    commands.spawn((
        Mesh3d(meshes.add(Rectangle::new(rect.half_width * 2.0, rect.half_height * 2.0))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: color_from_hex(Colors::BUTTON),
            unlit: true,
            double_sided: true,
            cull_mode: None,
            ..default()
        })),
        Transform::from_translation(to_bevy_vec3(rect.center)),
        Name::new("drop-button"),
    ));
    commands.insert_resource(DropButton(rect));
}

fn pointer_input(
    mouse: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    button: Option<Res<DropButton>>,
    q_window: Query<&Window, With<PrimaryWindow>>,
    q_camera: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    mut drops: MessageWriter<DropBallMessage>,
) {
    let Some(button) = button else {
        return;
    };

    let mut presses: Vec<Vec2> = touches.iter_just_pressed().map(|t| t.position()).collect();
    if mouse.just_pressed(MouseButton::Left) {
        let Ok(window) = q_window.single() else {
            return;
        };
        presses.extend(window.cursor_position());
    }
    if presses.is_empty() {
        return;
    }

    let Ok((camera, camera_transform)) = q_camera.single() else {
        return;
    };
    for screen in presses {
        let Ok(ray) = camera.viewport_to_world(camera_transform, screen) else {
            continue;
        };
        let ray = Ray {
            origin: from_bevy_vec3(ray.origin),
            direction: from_bevy_vec3(*ray.direction),
        };
        if button.0.hit(&ray) {
            drops.write(DropBallMessage);
        }
    }
}

fn keyboard_input(keys: Res<ButtonInput<KeyCode>>, mut drops: MessageWriter<DropBallMessage>) {
    if keys.just_pressed(KeyCode::Space) || keys.just_pressed(KeyCode::Enter) {
        drops.write(DropBallMessage);
    }
}
