//! Board geometry derived from the board asset (or a synthetic grid).
//!
//! The asset side only has to hand over a flat list of named nodes. Everything
//! else (pins, walls, bucket floors) is derived here.

use std::f32::consts::{FRAC_1_SQRT_2, FRAC_PI_4};

use crate::config::GameConfig;
use crate::math::{self, vec3, Quat, Vec3};

/// Bucket side walls are fixed-size slats beside each bucket.
const BUCKET_WALL_OFFSET_X: f32 = 1.5;
const BUCKET_WALL_Y: f32 = 1.5;
const BUCKET_WALL_HALF_EXTENTS: Vec3 = vec3(0.1, 1.0, 1.5);

/// Synthetic board extents
const SYNTH_TOP_Y: f32 = 12.0;
/// Lowest pin row stays this high, clear of the bucket slats.
const SYNTH_BOTTOM_Y: f32 = 4.0;
const SYNTH_HALF_WIDTH: f32 = 7.7;
const SYNTH_HALF_DEPTH: f32 = 0.5;

/// A node from the board asset.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardNode {
    pub name: String,
    /// Local translation
    pub translation: Vec3,
    pub scale: Vec3,
    pub has_mesh: bool,
    /// Mesh bounds in board space (node hierarchy applied), when the asset
    /// adapter could measure them.
    pub mesh_bounds: Option<Aabb>,
}

/// Which of the two pin sounds a pin plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PinCue {
    Low,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinPlacement {
    pub position: Vec3,
    /// Visual radius. The collider is scaled up from this.
    pub radius: f32,
    pub cue: PinCue,
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn from_point(p: Vec3) -> Self {
        Self { min: p, max: p }
    }

    pub fn from_center_half_extents(center: Vec3, half: Vec3) -> Self {
        Self {
            min: math::sub(center, half),
            max: math::add(center, half),
        }
    }

    /// Smallest box holding every point, `None` for no points.
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        let mut points = points.into_iter();
        let mut aabb = Self::from_point(points.next()?);
        for p in points {
            aabb.include(p);
        }
        Some(aabb)
    }

    pub fn corners(&self) -> [Vec3; 8] {
        let (a, b) = (self.min, self.max);
        [
            vec3(a.x, a.y, a.z),
            vec3(b.x, a.y, a.z),
            vec3(a.x, b.y, a.z),
            vec3(b.x, b.y, a.z),
            vec3(a.x, a.y, b.z),
            vec3(b.x, a.y, b.z),
            vec3(a.x, b.y, b.z),
            vec3(b.x, b.y, b.z),
        ]
    }

    pub fn include(&mut self, p: Vec3) {
        self.min = math::min(self.min, p);
        self.max = math::max(self.max, p);
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn depth(&self) -> f32 {
        self.max.z - self.min.z
    }

    pub fn center(&self) -> Vec3 {
        math::scale(math::add(self.min, self.max), 0.5)
    }
}

/// Static box collider placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxPlacement {
    pub center: Vec3,
    pub half_extents: Vec3,
    pub rotation: Quat,
}

impl BoxPlacement {
    pub const fn new(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            center,
            half_extents,
            rotation: Quat::IDENTITY,
        }
    }

    pub fn rotated(self, rotation: Quat) -> Self {
        Self { rotation, ..self }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BucketPlacement {
    pub index: usize,
    /// Where the bucket model sits
    pub origin: Vec3,
    /// Scoring floor
    pub floor: BoxPlacement,
    pub side_wall: BoxPlacement,
    /// Ridge along the top of the side wall so no ball can settle on it
    pub side_wall_cap: BoxPlacement,
}

/// What the core needs from a board: pins and an overall bounding box.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardLayout {
    pub pins: Vec<PinPlacement>,
    pub bounds: Aabb,
    /// Vertical position of the board origin; walls are centred on it.
    pub origin_y: f32,
}

impl BoardLayout {
    /// Smallest surface-to-surface distance between two pin colliders.
    /// `None` with fewer than two pins.
    pub fn narrowest_gap(&self, collider_scale: f32) -> Option<f32> {
        let mut narrowest: Option<f32> = None;
        for (i, a) in self.pins.iter().enumerate() {
            for b in &self.pins[i + 1..] {
                let d = math::sub(a.position, b.position);
                let gap = math::dot(d, d).sqrt() - (a.radius + b.radius) * collider_scale;
                narrowest = Some(narrowest.map_or(gap, |n| n.min(gap)));
            }
        }
        narrowest
    }
}

fn cue_for(index: usize, config: &GameConfig) -> PinCue {
    if index < config.pins.low_cue_count {
        PinCue::Low
    } else {
        PinCue::High
    }
}

/// Derive pins and bounds from the board asset's nodes.
///
/// Mesh nodes whose name contains the configured marker become pins. The bounds
/// cover every mesh node's measured `mesh_bounds`; a node without them counts as
/// a box of half extents `|scale|` around its translation (unit primitives span
/// -1..1). Everything is rotated by the board yaw.
pub fn derive_board_layout(nodes: &[BoardNode], config: &GameConfig) -> Result<BoardLayout, String> {
    let yaw = Quat::from_rotation_y(config.board.yaw);
    let marker = config.pins.name_marker.as_str();

    let mut corners = Vec::new();
    let mut pins = Vec::new();

    for node in nodes.iter().filter(|n| n.has_mesh) {
        let local = node.mesh_bounds.unwrap_or_else(|| {
            let half = vec3(node.scale.x.abs(), node.scale.y.abs(), node.scale.z.abs());
            Aabb::from_center_half_extents(node.translation, half)
        });
        corners.extend(local.corners().into_iter().map(|c| yaw.rotate(c)));

        if node.name.contains(marker) {
            let radius = node.scale.x.abs() / 2.0;
            if radius <= 0.0 {
                tracing::warn!(name = %node.name, "skipping pin with zero radius");
                continue;
            }
            pins.push(PinPlacement {
                position: yaw.rotate(node.translation),
                radius,
                cue: cue_for(pins.len(), config),
            });
        }
    }

    let bounds = Aabb::from_points(corners).ok_or_else(|| "board asset has no mesh nodes".to_string())?;
    if pins.is_empty() {
        tracing::warn!(marker, "board asset has no pin nodes");
    }
    let layout = BoardLayout {
        pins,
        bounds,
        origin_y: 0.0,
    };
    if let Some(gap) = layout.narrowest_gap(config.pins.collider_scale) {
        if gap < config.ball.radius * 2.0 {
            tracing::warn!(gap, "board has pins closer than a ball diameter");
        }
    }
    tracing::info!(
        pins = layout.pins.len(),
        width = layout.bounds.width(),
        height = layout.bounds.height(),
        "board layout derived"
    );

    Ok(layout)
}

/// Centre distance between diagonal neighbours of the synthetic grid: one ball
/// diameter plus both pin colliders plus one ball radius of slack.
pub fn synthetic_pitch(config: &GameConfig) -> f32 {
    let pin = config.board.synthetic_pin_radius * config.pins.collider_scale;
    config.ball.radius * 3.0 + pin * 2.0
}

/// A staggered pin grid standing in for the board asset.
///
/// Diagonal neighbours sit one pitch apart on a 3-4-5 triangle, so columns are
/// 1.2 pitch apart and rows 0.8. Rows stop above the bucket slats and pins
/// too close to a side wall are left out, which keeps a ball-wide channel there.
pub fn synthetic_layout(config: &GameConfig) -> BoardLayout {
    let pitch = synthetic_pitch(config);
    let col_spacing = pitch * 1.2;
    let row_spacing = pitch * 0.8;
    let radius = config.board.synthetic_pin_radius;
    let collider = radius * config.pins.collider_scale;

    let fitting_rows = ((SYNTH_TOP_Y - SYNTH_BOTTOM_Y) / row_spacing) as usize + 1;
    let rows = config.board.synthetic_rows.min(fitting_rows);
    let cols = config.board.synthetic_cols;
    let row_width = (cols.saturating_sub(1)) as f32 * col_spacing;

    let wall_face =
        SYNTH_HALF_WIDTH / config.walls.inset_divisor - config.walls.side_thickness / 2.0;
    let max_x = wall_face - (pitch - collider);

    let mut pins = Vec::with_capacity(rows * cols);
    for row in 0..rows {
        let y = SYNTH_TOP_Y - row as f32 * row_spacing;
        // Offset every other row to form the zigzag
        let x_offset = if row % 2 == 0 { 0.0 } else { col_spacing * 0.5 };
        for col in 0..cols {
            let x = -row_width * 0.5 + col as f32 * col_spacing + x_offset;
            if x.abs() > max_x {
                continue;
            }
            pins.push(PinPlacement {
                position: vec3(x, y, 0.0),
                radius,
                cue: cue_for(pins.len(), config),
            });
        }
    }

    BoardLayout {
        pins,
        bounds: Aabb::new(
            vec3(-SYNTH_HALF_WIDTH, 0.0, -SYNTH_HALF_DEPTH),
            vec3(SYNTH_HALF_WIDTH, SYNTH_TOP_Y + 1.0, SYNTH_HALF_DEPTH),
        ),
        origin_y: 0.0,
    }
}

/// Containment walls around the board: left, right, back, front, floor.
pub fn wall_placements(layout: &BoardLayout, config: &GameConfig) -> Vec<BoxPlacement> {
    let walls = &config.walls;
    let b = layout.bounds;
    let width = b.width();
    let height = b.height();
    let y = layout.origin_y;

    let side_half = vec3(walls.side_thickness / 2.0, height * 2.0, walls.side_depth / 2.0);
    let panel_half = vec3(width / 2.0, height * 2.0, walls.panel_depth / 2.0);

    vec![
        BoxPlacement::new(vec3(b.min.x / walls.inset_divisor, y, 0.0), side_half),
        BoxPlacement::new(vec3(b.max.x / walls.inset_divisor, y, 0.0), side_half),
        BoxPlacement::new(vec3(0.0, y, b.min.z - walls.back_offset + 1.0), panel_half),
        BoxPlacement::new(vec3(0.0, y, walls.front_z), panel_half),
        BoxPlacement::new(
            vec3(0.0, walls.floor_y, 0.0),
            vec3(width / 2.0, 1.0, walls.floor_depth / 2.0),
        ),
    ]
}

/// A square bar turned 45 degrees, its side corners flush with the slat top.
fn side_wall_cap(x: f32) -> BoxPlacement {
    let half = BUCKET_WALL_HALF_EXTENTS;
    let side = half.x * FRAC_1_SQRT_2;
    BoxPlacement::new(vec3(x, BUCKET_WALL_Y + half.y, 0.0), vec3(side, side, half.z))
        .rotated(Quat::from_rotation_z(FRAC_PI_4))
}

pub fn bucket_placements(config: &GameConfig) -> Vec<BucketPlacement> {
    let buckets = &config.buckets;
    (0..buckets.count)
        .map(|index| {
            let x = buckets.start_x + index as f32 * buckets.spacing;
            BucketPlacement {
                index,
                origin: vec3(x, buckets.y, 0.0),
                floor: BoxPlacement::new(
                    vec3(x, buckets.y + buckets.floor_offset_y, 0.0),
                    buckets.floor_half_extents,
                ),
                side_wall: BoxPlacement::new(
                    vec3(-x - BUCKET_WALL_OFFSET_X, BUCKET_WALL_Y, 0.0),
                    BUCKET_WALL_HALF_EXTENTS,
                ),
                side_wall_cap: side_wall_cap(-x - BUCKET_WALL_OFFSET_X),
            }
        })
        .collect()
}
