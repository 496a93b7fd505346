use bevy::prelude::*;
use plinko_core::GameEvent;

use crate::constants::{color_from_hex, Colors};

use super::{AppState, FrameEvent, Game, UpdateSet};

pub struct HudPlugin;

const HUD_RIGHT: f32 = 16.0;
const WALLET_TOP: f32 = 10.0;
const LAST_DROP_TOP: f32 = 40.0;
const COUNTS_TOP: f32 = 62.0;
const HINT_BOTTOM: f32 = 12.0;

#[derive(Component)]
struct HudWalletText;

#[derive(Component)]
struct HudLastDropText;

#[derive(Component)]
struct HudCountsText;

#[derive(Component)]
struct HudHintText;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_hud)
            .add_systems(
                Update,
                (update_wallet_ui, update_last_drop_ui, update_counts_ui)
                    .in_set(UpdateSet::Visuals),
            )
            .add_systems(OnEnter(AppState::Playing), show_play_hint);
    }
}

fn spawn_hud(mut commands: Commands) {
    let large = TextFont::from_font_size(22.0);
    let small = TextFont::from_font_size(12.0);

    commands.spawn((
        Node {
            position_type: PositionType::Absolute,
            right: Val::Px(HUD_RIGHT),
            top: Val::Px(WALLET_TOP),
            ..default()
        },
        Text::new("$ 0"),
        large,
        TextColor(color_from_hex(Colors::COIN)),
        HudWalletText,
    ));

    commands.spawn((
        Node {
            position_type: PositionType::Absolute,
            right: Val::Px(HUD_RIGHT),
            top: Val::Px(LAST_DROP_TOP),
            ..default()
        },
        Text::new(""),
        small.clone(),
        TextColor(color_from_hex(Colors::HUD_TEXT)),
        HudLastDropText,
    ));

    commands.spawn((
        Node {
            position_type: PositionType::Absolute,
            right: Val::Px(HUD_RIGHT),
            top: Val::Px(COUNTS_TOP),
            ..default()
        },
        Text::new(""),
        small.clone(),
        TextColor(color_from_hex(Colors::HUD_DIM)),
        HudCountsText,
    ));

    commands.spawn((
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(HUD_RIGHT),
            bottom: Val::Px(HINT_BOTTOM),
            ..default()
        },
        Text::new("Loading board..."),
        small,
        TextColor(color_from_hex(Colors::HUD_DIM)),
        HudHintText,
    ));
}

fn show_play_hint(mut q_hint: Query<&mut Text, With<HudHintText>>) {
    if let Ok(mut text) = q_hint.single_mut() {
        text.0 = "Click the green button or press Space to drop a ball".to_string();
    }
}

fn update_wallet_ui(game: Res<Game>, mut q_wallet: Query<&mut Text, With<HudWalletText>>) {
    let Ok(mut text) = q_wallet.single_mut() else {
        return;
    };
    let label = format!("$ {}", game.wallet());
    if text.0 != label {
        text.0 = label;
    }
}

fn update_last_drop_ui(
    mut events: MessageReader<FrameEvent>,
    mut q_last: Query<&mut Text, With<HudLastDropText>>,
) {
    let Some(multiplier) = events.read().fold(None, |last, FrameEvent(event)| match event {
        GameEvent::BallScored { multiplier, .. } => Some(*multiplier),
        _ => last,
    }) else {
        return;
    };
    if let Ok(mut text) = q_last.single_mut() {
        text.0 = if multiplier > 0 {
            format!("Last drop: x{}", multiplier)
        } else {
            "Last drop: missed".to_string()
        };
    }
}

fn update_counts_ui(game: Res<Game>, mut q_counts: Query<&mut Text, With<HudCountsText>>) {
    let Ok(mut text) = q_counts.single_mut() else {
        return;
    };
    let label = format!("balls {}  coins {}", game.ball_count(), game.coin_count());
    if text.0 != label {
        text.0 = label;
    }
}
