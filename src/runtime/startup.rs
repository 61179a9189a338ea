use crate::audio::PlaybackHandle;
use crate::config;
use crate::player::{PlayerController, RepeatMode};

/// Apply the configured playback defaults before the first frame.
pub fn apply_playback_defaults<H: PlaybackHandle>(
    player: &mut PlayerController<H>,
    settings: &config::Settings,
) {
    player.set_volume(settings.audio.initial_volume);
    player.set_repeat(RepeatMode::from(settings.playback.repeat));
    // Shuffle last: enabling it while repeat is `one` moves repeat to `all`.
    player.set_shuffle(settings.playback.shuffle);
    player.set_queue_visible(settings.ui.queue_open);
    player.start();
}
