//! Bevy side of the scene seam: game visuals are entities, poses are Transforms.

use std::collections::HashMap;

use bevy::ecs::system::SystemParam;
use bevy::gltf::GltfAssetLabel;
use bevy::prelude::*;
use plinko_core::math::Pose;
use plinko_core::scene::{SceneGraph, VisualKind};

use crate::constants::{
    color_from_hex, Colors, BUCKET_ASSET, COIN_VISUAL_RADIUS, COIN_VISUAL_THICKNESS,
};
use crate::coord::{apply_pose, pose_to_transform, to_bevy_vec3};

/// Marks an entity whose Transform is driven by the game session.
#[derive(Component)]
pub(crate) struct SceneVisual;

/// Shared meshes and materials for game visuals.
#[derive(Resource)]
pub(crate) struct VisualAssets {
    unit_sphere: Handle<Mesh>,
    coin: Handle<Mesh>,
    coin_material: Handle<StandardMaterial>,
    pin_material: Handle<StandardMaterial>,
    bucket: Handle<Scene>,
    /// Ball materials by RGB color
    ball_materials: HashMap<u32, Handle<StandardMaterial>>,
}

pub(crate) fn setup_visual_assets(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.insert_resource(VisualAssets {
        unit_sphere: meshes.add(Sphere::new(1.0).mesh().uv(32, 18)),
        coin: meshes.add(Cylinder::new(COIN_VISUAL_RADIUS, COIN_VISUAL_THICKNESS)),
        coin_material: materials.add(StandardMaterial {
            base_color: color_from_hex(Colors::COIN),
            metallic: 0.8,
            perceptual_roughness: 0.3,
            ..default()
        }),
        pin_material: materials.add(StandardMaterial {
            base_color: color_from_hex(Colors::PIN).with_alpha(0.35),
            alpha_mode: AlphaMode::Blend,
            unlit: true,
            ..default()
        }),
        bucket: asset_server.load(GltfAssetLabel::Scene(0).from_asset(BUCKET_ASSET)),
        ball_materials: HashMap::new(),
    });
}

#[derive(SystemParam)]
pub(crate) struct BevyScene<'w, 's> {
    commands: Commands<'w, 's>,
    transforms: Query<'w, 's, &'static mut Transform, With<SceneVisual>>,
    assets: ResMut<'w, VisualAssets>,
    materials: ResMut<'w, Assets<StandardMaterial>>,
}

impl<'w, 's> BevyScene<'w, 's> {
    pub(crate) fn commands(&mut self) -> &mut Commands<'w, 's> {
        &mut self.commands
    }

    /// Plain board panel behind the pins, for when the board asset is unavailable.
    pub(crate) fn spawn_backboard(&mut self, meshes: &mut Assets<Mesh>, center: Vec3, size: Vec3) {
        let material = self.materials.add(StandardMaterial {
            base_color: color_from_hex(Colors::BACKBOARD),
            perceptual_roughness: 0.9,
            ..default()
        });
        self.commands.spawn((
            Mesh3d(meshes.add(Cuboid::from_size(size))),
            MeshMaterial3d(material),
            Transform::from_translation(center),
        ));
    }

    fn ball_material(&mut self, color: u32) -> Handle<StandardMaterial> {
        if let Some(material) = self.assets.ball_materials.get(&color) {
            return material.clone();
        }
        let material = self.materials.add(StandardMaterial {
            base_color: color_from_hex(color),
            perceptual_roughness: 0.4,
            ..default()
        });
        self.assets.ball_materials.insert(color, material.clone());
        material
    }
}

impl SceneGraph for BevyScene<'_, '_> {
    type Handle = Entity;

    fn spawn_visual(&mut self, kind: VisualKind, pose: Pose) -> Entity {
        let transform = pose_to_transform(pose);
        match kind {
            VisualKind::Ball { radius, color } => {
                let material = self.ball_material(color);
                self.commands
                    .spawn((
                        Mesh3d(self.assets.unit_sphere.clone()),
                        MeshMaterial3d(material),
                        transform.with_scale(Vec3::splat(radius)),
                        SceneVisual,
                    ))
                    .id()
            }
            VisualKind::Coin => self
                .commands
                .spawn((
                    Mesh3d(self.assets.coin.clone()),
                    MeshMaterial3d(self.assets.coin_material.clone()),
                    transform,
                    SceneVisual,
                ))
                .id(),
            VisualKind::Pin { radius, .. } => self
                .commands
                .spawn((
                    Mesh3d(self.assets.unit_sphere.clone()),
                    MeshMaterial3d(self.assets.pin_material.clone()),
                    transform.with_scale(Vec3::splat(radius)),
                    SceneVisual,
                ))
                .id(),
            VisualKind::Bucket { index, scale } => self
                .commands
                .spawn((
                    SceneRoot(self.assets.bucket.clone()),
                    transform.with_scale(to_bevy_vec3(scale)),
                    Name::new(format!("bucket-{}", index)),
                    SceneVisual,
                ))
                .id(),
        }
    }

    fn despawn_visual(&mut self, entity: Entity) {
        if let Ok(mut entity) = self.commands.get_entity(entity) {
            entity.despawn();
        }
    }

    fn set_pose(&mut self, entity: Entity, pose: Pose) {
        if let Ok(mut transform) = self.transforms.get_mut(entity) {
            apply_pose(&mut transform, pose);
        } else if let Ok(mut pending) = self.commands.get_entity(entity) {
            // Spawned this frame: the Transform arrives with the queued spawn.
            pending
                .entry::<Transform>()
                .and_modify(move |mut transform| apply_pose(&mut transform, pose));
        }
    }
}
