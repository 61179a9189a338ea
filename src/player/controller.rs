use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::audio::{DurationProbe, MediaEvent, PlaybackHandle};
use crate::catalog::Track;

use super::api::{PlayerApi, TrackChanged};
use super::history::{History, NavigationSnapshot};
use super::order::{next_index, prev_index};
use super::state::{PlaybackState, RepeatMode};
use super::view::{PlayIcon, PlayerView, format_time};

/// Owns the playback state, the one playback handle and the player view.
///
/// Every mutation goes through a method here and runs to completion before
/// the next event is handled; the view is updated in the same call.
pub struct PlayerController<H: PlaybackHandle> {
    tracks: Vec<Track>,
    state: PlaybackState,
    queue_open: bool,
    elapsed: Duration,
    duration: Option<Duration>,
    handle: H,
    view: PlayerView,
    history: History,
    subscribers: Vec<Sender<TrackChanged>>,
    rng: StdRng,
}

impl<H: PlaybackHandle> PlayerController<H> {
    pub fn new(tracks: Vec<Track>, handle: H, history_limit: usize) -> Self {
        let view = PlayerView::with_rows(&tracks);
        let state = PlaybackState {
            volume: handle.volume(),
            ..PlaybackState::default()
        };
        let mut controller = Self {
            tracks,
            state,
            queue_open: false,
            elapsed: Duration::ZERO,
            duration: None,
            handle,
            view,
            history: History::new(history_limit),
            subscribers: Vec::new(),
            rng: StdRng::from_os_rng(),
        };
        controller.refresh_controls();
        controller
    }

    /// Replace the random source used for shuffle picks.
    #[cfg(test)]
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    /// Show the first track and seed the navigation history. The source is
    /// assigned lazily on the first play.
    pub fn start(&mut self) {
        let index = self.state.current_index;
        if let Some(track) = self.tracks.get(index) {
            self.view.show_track(index, track);
        }
        self.history.replace(self.snapshot());
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn view(&self) -> &PlayerView {
        &self.view
    }

    pub fn queue_open(&self) -> bool {
        self.queue_open
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn duration(&self) -> Option<Duration> {
        self.duration
    }

    #[cfg(test)]
    pub(crate) fn history(&self) -> &History {
        &self.history
    }

    #[cfg(test)]
    pub(crate) fn handle(&self) -> &H {
        &self.handle
    }

    #[cfg(test)]
    pub(crate) fn handle_mut(&mut self) -> &mut H {
        &mut self.handle
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.tracks.get(self.state.current_index)
    }

    /// Register for [`TrackChanged`] notifications.
    pub fn subscribe(&mut self) -> Receiver<TrackChanged> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    /// Make track `index` current and assign its source. Out-of-range
    /// indices are ignored.
    pub fn load_track(&mut self, index: usize) {
        let Some(track) = self.tracks.get(index) else {
            log::warn!("ignoring load of track {index}, playlist has {}", self.tracks.len());
            return;
        };
        log::debug!("loading track {index}: {}", track.display());

        self.state.current_index = index;
        self.handle.load(&track.src);
        self.view.show_track(index, track);

        self.elapsed = Duration::ZERO;
        self.duration = None;
        self.view.show_time(self.elapsed, self.duration);

        self.notify_track_changed();
    }

    pub fn play(&mut self) {
        self.handle.play();
        self.state.is_playing = true;
        self.view.play_icon = PlayIcon::Pause;
    }

    pub fn pause(&mut self) {
        self.handle.pause();
        self.state.is_playing = false;
        self.view.play_icon = PlayIcon::Play;
    }

    /// Play/pause button. Loads the current track first if nothing has been
    /// loaded yet.
    pub fn toggle_play(&mut self) {
        if self.tracks.is_empty() {
            return;
        }
        if self.state.is_playing {
            self.pause();
            return;
        }
        if !self.handle.has_source() {
            self.load_track(self.state.current_index);
        }
        self.play();
    }

    /// Advance the playlist. `auto` is true when called because the current
    /// track ended on its own.
    pub fn next_track(&mut self, auto: bool) {
        if self.tracks.is_empty() {
            return;
        }
        let last = self.tracks.len() - 1;

        if auto && self.state.repeat == RepeatMode::One {
            self.seek(Duration::ZERO);
            self.play();
            return;
        }

        if auto
            && self.state.repeat == RepeatMode::Off
            && !self.state.shuffle
            && self.state.current_index == last
        {
            log::debug!("end of playlist reached");
            self.pause();
            self.seek(Duration::ZERO);
            return;
        }

        let was_playing = self.state.is_playing;
        let next = next_index(
            self.state.current_index,
            self.state.shuffle,
            self.tracks.len(),
            &mut self.rng,
        );
        self.load_track(next);
        if was_playing || auto {
            self.play();
        }
        self.push_history();
    }

    /// Step back one track, keeping the current play/pause state.
    pub fn prev_track(&mut self) {
        if self.tracks.is_empty() {
            return;
        }
        let was_playing = self.state.is_playing;
        let prev = prev_index(
            self.state.current_index,
            self.state.shuffle,
            self.tracks.len(),
            &mut self.rng,
        );
        self.load_track(prev);
        if was_playing {
            self.play();
        }
        self.push_history();
    }

    pub fn toggle_shuffle(&mut self) {
        self.set_shuffle(!self.state.shuffle);
    }

    /// Turning shuffle on while repeating one track switches repeat to `All`.
    pub fn set_shuffle(&mut self, on: bool) {
        self.state.shuffle = on;
        if on && self.state.repeat == RepeatMode::One {
            self.state.repeat = RepeatMode::All;
        }
        self.refresh_controls();
    }

    pub fn cycle_repeat(&mut self) {
        self.set_repeat(self.state.repeat.cycled());
    }

    /// Repeating one track turns shuffle off.
    pub fn set_repeat(&mut self, mode: RepeatMode) {
        self.state.repeat = mode;
        if mode == RepeatMode::One {
            self.state.shuffle = false;
        }
        self.refresh_controls();
    }

    /// Move the playback position, clamped to the known duration.
    pub fn seek(&mut self, position: Duration) {
        let position = match self.duration {
            Some(d) => position.min(d),
            None => position,
        };
        self.handle.seek(position);
        self.elapsed = position;
        self.view.show_time(self.elapsed, self.duration);
    }

    /// Progress slider drag: `fraction` of the track's duration.
    pub fn seek_to_fraction(&mut self, fraction: f64) {
        if let Some(d) = self.duration {
            self.seek(d.mul_f64(fraction.clamp(0.0, 1.0)));
        }
    }

    pub fn scrub_by(&mut self, seconds: i64) {
        let target = (self.elapsed.as_secs() as i64).saturating_add(seconds).max(0);
        self.seek(Duration::from_secs(target as u64));
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.handle.set_volume(volume.clamp(0.0, 1.0));
        self.state.volume = self.handle.volume();
        self.view.show_volume(self.state.volume);
    }

    pub fn nudge_volume(&mut self, delta: f32) {
        self.set_volume(self.state.volume + delta);
    }

    pub fn toggle_queue(&mut self) {
        self.set_queue_visible(!self.queue_open);
        self.push_history();
    }

    pub fn set_queue_visible(&mut self, open: bool) {
        self.queue_open = open;
        self.view.queue_open = open;
    }

    /// Load and play track `index`, as if its queue row was clicked.
    pub fn play_at(&mut self, index: usize) {
        if index >= self.tracks.len() {
            return;
        }
        self.load_track(index);
        self.play();
        self.push_history();
    }

    pub fn go_back(&mut self) {
        if let Some(snapshot) = self.history.back() {
            self.restore(snapshot);
        }
    }

    pub fn go_forward(&mut self) {
        if let Some(snapshot) = self.history.forward() {
            self.restore(snapshot);
        }
    }

    /// Apply a navigation snapshot without recording a new one.
    pub fn restore(&mut self, snapshot: NavigationSnapshot) {
        if snapshot.index < self.tracks.len() && snapshot.index != self.state.current_index {
            let was_playing = self.state.is_playing;
            self.load_track(snapshot.index);
            if was_playing {
                self.play();
            }
        }
        self.set_queue_visible(snapshot.queue_open);
    }

    pub fn on_media_event(&mut self, event: MediaEvent) {
        match event {
            MediaEvent::MetadataLoaded { duration } => {
                self.duration = duration;
                if let (Some(d), Some(row)) =
                    (duration, self.view.rows.get_mut(self.state.current_index))
                {
                    row.time_label.get_or_insert_with(|| format_time(d));
                }
                self.view.show_time(self.elapsed, self.duration);
            }
            MediaEvent::TimeUpdate { elapsed } => {
                self.elapsed = elapsed;
                self.view.show_time(self.elapsed, self.duration);
            }
            MediaEvent::Ended => self.next_track(true),
            MediaEvent::VolumeChanged { volume } => {
                self.state.volume = volume;
                self.view.show_volume(volume);
            }
        }
    }

    /// Handle every event the playback handle has queued, in order.
    pub fn pump_media_events(&mut self) {
        while let Some(event) = self.handle.poll_event() {
            self.on_media_event(event);
        }
    }

    /// Fill in a queue row's time label. Rows that no longer exist are skipped.
    pub fn apply_prefetched_duration(&mut self, probe: DurationProbe) {
        if let Some(row) = self.view.rows.get_mut(probe.index) {
            row.time_label = Some(format_time(probe.duration));
        }
    }

    fn snapshot(&self) -> NavigationSnapshot {
        NavigationSnapshot {
            index: self.state.current_index,
            queue_open: self.queue_open,
        }
    }

    fn push_history(&mut self) {
        let snapshot = self.snapshot();
        self.history.push(snapshot);
    }

    fn notify_track_changed(&mut self) {
        let event = TrackChanged {
            index: self.state.current_index,
        };
        self.subscribers.retain(|tx| tx.send(event).is_ok());
    }

    fn refresh_controls(&mut self) {
        self.view.shuffle_active = self.state.shuffle;
        self.view.repeat = self.state.repeat;
        self.view.queue_open = self.queue_open;
        self.view.play_icon = if self.state.is_playing {
            PlayIcon::Pause
        } else {
            PlayIcon::Play
        };
        self.view.show_volume(self.state.volume);
    }
}

impl<H: PlaybackHandle> PlayerApi for PlayerController<H> {
    fn playlist(&self) -> &[Track] {
        &self.tracks
    }

    fn play_at(&mut self, index: usize) {
        PlayerController::play_at(self, index);
    }

    fn current_index(&self) -> usize {
        self.state.current_index
    }
}
