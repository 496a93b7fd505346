//! Pin strike sounds, positioned at the struck pin.

use bevy::audio::Volume;
use bevy::prelude::*;
use plinko_core::board::PinCue;
use plinko_core::GameEvent;

use crate::constants::{HIGH_SOUND_ASSET, LOW_SOUND_ASSET, PIN_SOUND_VOLUME};
use crate::coord::to_bevy_vec3;

use super::{FrameEvent, UpdateSet};

pub struct AudioCuePlugin;

#[derive(Resource)]
struct PinSounds {
    low: Handle<AudioSource>,
    high: Handle<AudioSource>,
}

impl PinSounds {
    fn for_cue(&self, cue: PinCue) -> Handle<AudioSource> {
        match cue {
            PinCue::Low => self.low.clone(),
            PinCue::High => self.high.clone(),
        }
    }
}

impl Plugin for AudioCuePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, load_pin_sounds)
            .add_systems(Update, play_pin_sounds.in_set(UpdateSet::Visuals));
    }
}

fn load_pin_sounds(mut commands: Commands, asset_server: Res<AssetServer>) {
    commands.insert_resource(PinSounds {
        low: asset_server.load(LOW_SOUND_ASSET),
        high: asset_server.load(HIGH_SOUND_ASSET),
    });
}

fn play_pin_sounds(
    mut commands: Commands,
    sounds: Res<PinSounds>,
    mut events: MessageReader<FrameEvent>,
) {
    for FrameEvent(event) in events.read() {
        let GameEvent::PinStruck { cue, position, .. } = *event else {
            continue;
        };
        // One-shot player per strike so overlapping hits don't cut each other off.
        commands.spawn((
            AudioPlayer::new(sounds.for_cue(cue)),
            PlaybackSettings::DESPAWN
                .with_spatial(true)
                .with_volume(Volume::Linear(PIN_SOUND_VOLUME)),
            Transform::from_translation(to_bevy_vec3(position)),
        ));
    }
}
