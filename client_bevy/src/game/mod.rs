mod audio;
mod board;
mod core;
mod hud;
mod input;
mod play;
mod scene;

pub use audio::AudioCuePlugin;
pub use board::BoardPlugin;
pub use core::CorePlugin;
pub(crate) use core::{AppState, DropBallMessage, FrameEvent, Game, MainCamera, UpdateSet};
pub use hud::HudPlugin;
pub use input::InputPlugin;
pub use play::PlayPlugin;
