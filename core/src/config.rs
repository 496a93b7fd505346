use std::path::Path;

use crate::buckets::BucketZone;
use crate::math::{vec3, Vec3};

/// Physics world settings
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PhysicsConfig {
    /// Downward acceleration along -Y (m/s^2)
    pub gravity_y: f32,
    /// Simulated seconds advanced per rendered frame
    pub fixed_dt: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity_y: -9.0,
            fixed_dt: 1.0 / 60.0,
        }
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BallConfig {
    pub radius: f32,
    pub drop_height: f32,
    /// Horizontal drop range, `[min, max)`
    pub drop_x_min: f32,
    pub drop_x_max: f32,
    pub color: u32,
    pub mass: f32,
    pub restitution: f32,
    pub friction: f32,
}

impl Default for BallConfig {
    fn default() -> Self {
        Self {
            radius: 0.4,
            drop_height: 14.0,
            drop_x_min: -1.5,
            drop_x_max: 1.5,
            color: 0xffffff,
            mass: 1.0,
            restitution: 0.6,
            friction: 0.3,
        }
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CoinConfig {
    /// Collider radius. The visual is a wider flat disc.
    pub radius: f32,
    pub mass: f32,
    /// Oldest coins are despawned once more than this many are alive
    pub max_live: usize,
}

impl Default for CoinConfig {
    fn default() -> Self {
        Self {
            radius: 0.1,
            mass: 1.0,
            max_live: 200,
        }
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PinConfig {
    /// Board mesh nodes whose name contains this marker become pins
    pub name_marker: String,
    /// Collider radius relative to the visual radius
    pub collider_scale: f32,
    pub restitution: f32,
    /// Pins created before this index use the low cue, the rest the high cue
    pub low_cue_count: usize,
    /// Wallet credit per pin hit
    pub score: u32,
}

impl Default for PinConfig {
    fn default() -> Self {
        Self {
            name_marker: "Cylinder".to_string(),
            collider_scale: 1.3,
            restitution: 0.8,
            low_cue_count: 5,
            score: 1,
        }
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BucketConfig {
    /// Landing x-ranges and their multipliers
    pub zones: Vec<BucketZone>,
    pub count: usize,
    pub start_x: f32,
    pub spacing: f32,
    pub y: f32,
    pub floor_half_extents: Vec3,
    /// Floor box offset below the bucket origin
    pub floor_offset_y: f32,
    /// Visual model scale
    pub model_scale: Vec3,
}

impl Default for BucketConfig {
    fn default() -> Self {
        Self {
            zones: vec![
                BucketZone::new(-6.0, -4.9, 1),
                BucketZone::new(-4.2, -2.4, 2),
                BucketZone::new(-0.96, 0.8, 3),
                BucketZone::new(2.1, 4.0, 4),
                BucketZone::new(5.5, 6.0, 5),
            ],
            count: 5,
            start_x: -6.0,
            spacing: 3.0,
            y: 3.0,
            floor_half_extents: vec3(2.0, 0.2, 1.0),
            floor_offset_y: -2.0,
            model_scale: vec3(8.0, 3.0, 5.0),
        }
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WallConfig {
    /// Side walls sit at `bounds.x / inset_divisor`
    pub inset_divisor: f32,
    pub side_thickness: f32,
    pub side_depth: f32,
    pub back_offset: f32,
    pub front_z: f32,
    pub panel_depth: f32,
    pub floor_y: f32,
    pub floor_depth: f32,
}

impl Default for WallConfig {
    fn default() -> Self {
        Self {
            inset_divisor: 1.1,
            side_thickness: 0.5,
            side_depth: 10.0,
            back_offset: 1.5,
            front_z: 0.5,
            panel_depth: 0.2,
            floor_y: -1.0,
            floor_depth: 20.0,
        }
    }
}

/// On-screen "Add Ball" button, a rectangle in the plane z = `center.z`.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ButtonConfig {
    pub center: Vec3,
    pub width: f32,
    pub height: f32,
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self {
            center: vec3(0.0, 0.5, 14.0),
            width: 1.0,
            height: 0.5,
        }
    }
}

/// Board asset handling
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BoardConfig {
    /// Rotation of the board around +Y (radians)
    pub yaw: f32,
    /// Synthetic board used when no asset is available
    pub synthetic_rows: usize,
    pub synthetic_cols: usize,
    pub synthetic_pin_radius: f32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            yaw: std::f32::consts::PI,
            synthetic_rows: 9,
            synthetic_cols: 9,
            synthetic_pin_radius: 0.12,
        }
    }
}

/// Complete game configuration
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameConfig {
    pub physics: PhysicsConfig,
    pub ball: BallConfig,
    pub coin: CoinConfig,
    pub pins: PinConfig,
    pub buckets: BucketConfig,
    pub walls: WallConfig,
    pub button: ButtonConfig,
    pub board: BoardConfig,
    /// Seed for ball drop positions. `None` draws from OS entropy.
    pub rng_seed: Option<u64>,
}

impl GameConfig {
    pub fn from_json_str(json: &str) -> Result<Self, String> {
        let config: GameConfig =
            serde_json::from_str(json).map_err(|e| format!("invalid config JSON: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, String> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.physics.fixed_dt.is_finite() || self.physics.fixed_dt <= 0.0 {
            return Err("physics.fixedDt must be finite and > 0".to_string());
        }
        if !self.physics.gravity_y.is_finite() {
            return Err("physics.gravityY must be finite".to_string());
        }
        if !(self.ball.radius > 0.0) {
            return Err("ball.radius must be > 0".to_string());
        }
        if !(self.ball.mass > 0.0) || !(self.coin.mass > 0.0) {
            return Err("ball.mass and coin.mass must be > 0".to_string());
        }
        if !(self.ball.drop_x_min < self.ball.drop_x_max) {
            return Err("ball.dropXMin must be < ball.dropXMax".to_string());
        }
        if !(self.coin.radius > 0.0) {
            return Err("coin.radius must be > 0".to_string());
        }
        if !(self.pins.collider_scale > 0.0) {
            return Err("pins.colliderScale must be > 0".to_string());
        }
        if self.pins.name_marker.is_empty() {
            return Err("pins.nameMarker must not be empty".to_string());
        }
        if !(self.walls.inset_divisor > 0.0) {
            return Err("walls.insetDivisor must be > 0".to_string());
        }
        if !(self.button.width > 0.0 && self.button.height > 0.0) {
            return Err("button width and height must be > 0".to_string());
        }
        if !(self.board.synthetic_pin_radius > 0.0) {
            return Err("board.syntheticPinRadius must be > 0".to_string());
        }
        let synthetic = crate::board::synthetic_layout(self);
        if let Some(gap) = synthetic.narrowest_gap(self.pins.collider_scale) {
            if gap < self.ball.radius * 2.0 {
                return Err(format!(
                    "synthetic board gap {:.3} cannot pass a ball of radius {}",
                    gap, self.ball.radius
                ));
            }
        }
        crate::buckets::BucketZones::new(self.buckets.zones.clone()).map(|_| ())
    }
}
