//! Board loading: read the board asset's node list, derive pins and bounds,
//! build the static world, then start play. A missing or broken asset falls
//! back to a synthetic pin grid.

use std::collections::HashSet;

use bevy::asset::LoadState;
use bevy::camera::primitives::MeshAabb;
use bevy::gltf::{Gltf, GltfMesh, GltfNode};
use bevy::prelude::*;
use plinko_core::board::{derive_board_layout, synthetic_layout, Aabb, BoardLayout, BoardNode};
use plinko_core::math;

use crate::constants::BOARD_ASSET;
use crate::coord::{from_bevy_vec3, to_bevy_vec3};

use super::scene::{setup_visual_assets, BevyScene};
use super::{AppState, Game};

pub struct BoardPlugin;

#[derive(Resource)]
struct BoardAsset(Handle<Gltf>);

impl Plugin for BoardPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, (setup_visual_assets, load_board_asset))
            .add_systems(
                Update,
                build_board_when_loaded
                    .run_if(in_state(AppState::Loading))
                    .run_if(resource_exists::<Game>),
            );
    }
}

fn load_board_asset(mut commands: Commands, asset_server: Res<AssetServer>) {
    commands.insert_resource(BoardAsset(asset_server.load(BOARD_ASSET)));
}

/// Corners of a local box carried into board space.
fn transformed_corners(center: Vec3, half_extents: Vec3, global: &GlobalTransform) -> [math::Vec3; 8] {
    Aabb::from_center_half_extents(from_bevy_vec3(center), from_bevy_vec3(half_extents))
        .corners()
        .map(|c| from_bevy_vec3(global.transform_point(to_bevy_vec3(c))))
}

fn mesh_bounds(
    handle: &Handle<GltfMesh>,
    global: &GlobalTransform,
    gltf_meshes: &Assets<GltfMesh>,
    meshes: &Assets<Mesh>,
) -> Option<Aabb> {
    let corners: Vec<math::Vec3> = gltf_meshes
        .get(handle)?
        .primitives
        .iter()
        .filter_map(|primitive| meshes.get(&primitive.mesh)?.compute_aabb())
        .flat_map(|aabb| transformed_corners(aabb.center.into(), aabb.half_extents.into(), global))
        .collect();
    Aabb::from_points(corners)
}

/// Walk the node tree depth-first from its roots, measuring each mesh in board space.
fn board_nodes(
    gltf: &Gltf,
    nodes: &Assets<GltfNode>,
    gltf_meshes: &Assets<GltfMesh>,
    meshes: &Assets<Mesh>,
) -> Vec<BoardNode> {
    let children: HashSet<AssetId<GltfNode>> = gltf
        .nodes
        .iter()
        .filter_map(|handle| nodes.get(handle))
        .flat_map(|node| node.children.iter().map(|child| child.id()))
        .collect();

    let mut stack: Vec<(&Handle<GltfNode>, GlobalTransform)> = gltf
        .nodes
        .iter()
        .filter(|handle| !children.contains(&handle.id()))
        .rev()
        .map(|handle| (handle, GlobalTransform::IDENTITY))
        .collect();

    let mut out = Vec::with_capacity(gltf.nodes.len());
    while let Some((handle, parent)) = stack.pop() {
        let Some(node) = nodes.get(handle) else {
            continue;
        };
        let global = parent.mul_transform(node.transform);
        out.push(BoardNode {
            name: node.name.clone(),
            translation: from_bevy_vec3(node.transform.translation),
            scale: from_bevy_vec3(node.transform.scale),
            has_mesh: node.mesh.is_some(),
            mesh_bounds: node
                .mesh
                .as_ref()
                .and_then(|mesh| mesh_bounds(mesh, &global, gltf_meshes, meshes)),
        });
        stack.extend(node.children.iter().rev().map(|child| (child, global)));
    }
    out
}

#[allow(clippy::too_many_arguments)]
fn build_board_when_loaded(
    asset_server: Res<AssetServer>,
    board: Res<BoardAsset>,
    gltfs: Res<Assets<Gltf>>,
    gltf_nodes: Res<Assets<GltfNode>>,
    gltf_meshes: Res<Assets<GltfMesh>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut game: ResMut<Game>,
    mut scene: BevyScene,
    mut next_state: ResMut<NextState<AppState>>,
) {
    let layout = match asset_server.load_state(&board.0) {
        LoadState::Loaded => {
            let Some(gltf) = gltfs.get(&board.0) else {
                return;
            };
            let nodes = board_nodes(gltf, &gltf_nodes, &gltf_meshes, &meshes);
            match derive_board_layout(&nodes, game.config()) {
                Ok(layout) => {
                    let yaw = game.config().board.yaw;
                    match gltf.default_scene.clone().or_else(|| gltf.scenes.first().cloned()) {
                        Some(board_scene) => {
                            scene.commands().spawn((
                                SceneRoot(board_scene),
                                Transform::from_rotation(Quat::from_rotation_y(yaw)),
                                Name::new("board"),
                            ));
                        }
                        None => warn!("{} has no scene to display", BOARD_ASSET),
                    }
                    layout
                }
                Err(e) => {
                    warn!("Unusable board asset ({}), using synthetic board", e);
                    synthetic_board(&game, &mut scene, &mut meshes)
                }
            }
        }
        LoadState::Failed(err) => {
            error!("Failed to load {} ({}), using synthetic board", BOARD_ASSET, err);
            synthetic_board(&game, &mut scene, &mut meshes)
        }
        _ => return,
    };

    game.build_board(&layout, &mut scene);
    info!("Board ready with {} pins", layout.pins.len());
    next_state.set(AppState::Playing);
}

fn synthetic_board(game: &Game, scene: &mut BevyScene, meshes: &mut Assets<Mesh>) -> BoardLayout {
    let layout = synthetic_layout(game.config());
    let bounds = layout.bounds;
    let mut center = to_bevy_vec3(bounds.center());
    center.z = bounds.min.z;
    scene.spawn_backboard(meshes, center, Vec3::new(bounds.width(), bounds.height(), 0.1));
    layout
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn assert_close(a: f32, b: f32) {
        assert!((a - b).abs() < 1e-5, "{} != {}", a, b);
    }

    #[test]
    fn mesh_corners_follow_scale_rotation_and_translation() {
        let global = GlobalTransform::from(
            Transform::from_xyz(1.0, 2.0, 0.0)
                .with_rotation(Quat::from_rotation_y(FRAC_PI_2))
                .with_scale(Vec3::new(2.0, 1.0, 1.0)),
        );
        let corners = transformed_corners(Vec3::ZERO, Vec3::ONE, &global);
        let bounds = Aabb::from_points(corners).unwrap();
        assert_close(bounds.min.x, 0.0);
        assert_close(bounds.max.x, 2.0);
        assert_close(bounds.min.y, 1.0);
        assert_close(bounds.max.y, 3.0);
        assert_close(bounds.min.z, -2.0);
        assert_close(bounds.max.z, 2.0);
    }

    #[test]
    fn parent_transform_carries_into_child_corners() {
        let parent = GlobalTransform::from(Transform::from_xyz(0.0, 5.0, 0.0));
        let child = parent.mul_transform(Transform::from_scale(Vec3::splat(3.0)));
        let bounds = Aabb::from_points(transformed_corners(Vec3::new(0.0, 1.0, 0.0), Vec3::ONE, &child)).unwrap();
        assert_close(bounds.min.y, 5.0);
        assert_close(bounds.max.y, 11.0);
        assert_close(bounds.width(), 6.0);
    }
}
