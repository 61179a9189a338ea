//! Audio playback: the playback-handle seam, its `rodio` implementation and
//! background duration probes for queue rows.

mod player;
mod prefetch;
mod sink;
mod thread;
mod types;

pub use player::AudioPlayer;
pub use prefetch::{probe_duration, spawn_duration_prefetch};
pub use types::{DurationProbe, MediaEvent, PlaybackHandle};

#[cfg(test)]
pub(crate) mod fake;
