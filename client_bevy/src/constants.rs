use bevy::prelude::Vec3;

pub const WINDOW_WIDTH: u32 = 960;
pub const WINDOW_HEIGHT: u32 = 720;

pub const CAMERA_POSITION: Vec3 = Vec3::new(0.0, 2.0, 17.0);
pub const CAMERA_TARGET: Vec3 = Vec3::new(0.0, 3.0, 0.0);
pub const CAMERA_FOV_DEGREES: f32 = 75.0;

pub const KEY_LIGHT_ILLUMINANCE: f32 = 4_000.0;
pub const FILL_LIGHT_ILLUMINANCE: f32 = 1_500.0;

/// Coin mesh is a flat disc, larger than its collider.
pub const COIN_VISUAL_RADIUS: f32 = 0.5;
pub const COIN_VISUAL_THICKNESS: f32 = 0.2;

pub const PIN_SOUND_VOLUME: f32 = 0.5;
pub const LISTENER_GAP: f32 = 0.5;

pub const BOARD_ASSET: &str = "board.gltf";
pub const BUCKET_ASSET: &str = "obj_winBox.glb";
pub const LOW_SOUND_ASSET: &str = "sounds/low.mp3";
pub const HIGH_SOUND_ASSET: &str = "sounds/high.mp3";

#[derive(Clone, Copy)]
pub struct Colors;

impl Colors {
    pub const BACKGROUND: u32 = 0x000000;
    pub const COIN: u32 = 0xffd700;
    pub const PIN: u32 = 0x00ff00;
    pub const BUTTON: u32 = 0x0b6623;
    pub const BACKBOARD: u32 = 0x3b2a1a;
    pub const HUD_TEXT: u32 = 0xffffff;
    pub const HUD_DIM: u32 = 0x888888;
}

pub fn color_from_hex(rgb: u32) -> bevy::prelude::Color {
    let r = ((rgb >> 16) & 0xff) as f32 / 255.0;
    let g = ((rgb >> 8) & 0xff) as f32 / 255.0;
    let b = (rgb & 0xff) as f32 / 255.0;
    bevy::prelude::Color::srgb(r, g, b)
}
