//! Audio-related small types shared by the playback handle and the controller.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Notifications raised by a playback handle, mirroring what a native
/// audio element reports.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MediaEvent {
    /// The source opened; `duration` is known for most formats.
    MetadataLoaded { duration: Option<Duration> },
    /// Periodic position report while playing, and after every seek.
    TimeUpdate { elapsed: Duration },
    /// The source played through to its end.
    Ended,
    /// The output volume changed.
    VolumeChanged { volume: f32 },
}

/// Transport operations the player controller needs from the platform.
///
/// Implementations own exactly one source at a time. Events for a source that
/// has since been replaced must not be returned from [`poll_event`].
///
/// [`poll_event`]: PlaybackHandle::poll_event
pub trait PlaybackHandle {
    /// Replace the current source. Does not start playback.
    fn load(&mut self, src: &Path);
    /// Whether any source has been assigned yet.
    fn has_source(&self) -> bool;
    fn play(&mut self);
    fn pause(&mut self);
    fn seek(&mut self, position: Duration);
    fn set_volume(&mut self, volume: f32);
    fn volume(&self) -> f32;
    /// Next pending event, if any. Never blocks.
    fn poll_event(&mut self) -> Option<MediaEvent>;
}

#[derive(Debug)]
pub(super) enum AudioCmd {
    /// Open `path` as the new source, tagged with the load `generation`.
    Load { generation: u64, path: PathBuf },
    /// Start or resume playback.
    Play,
    /// Pause playback, keeping the position.
    Pause,
    /// Jump to an absolute position in the current source.
    Seek(Duration),
    /// Set the output volume.
    SetVolume(f32),
    /// Stop and shut the audio thread down.
    Quit,
}

/// A [`MediaEvent`] stamped with the load generation it belongs to.
#[derive(Debug, Clone, Copy)]
pub(super) struct TaggedEvent {
    pub generation: u64,
    pub event: MediaEvent,
}

/// Result of probing one queue row's duration in the background.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationProbe {
    pub index: usize,
    pub duration: Duration,
}
