//! Render model for the player: everything the UI shows about playback,
//! kept in sync by the controller.

use std::time::Duration;

use crate::catalog::Track;

use super::state::RepeatMode;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum PlayIcon {
    #[default]
    Play,
    Pause,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum VolumeIcon {
    Muted,
    Low,
    #[default]
    High,
}

impl VolumeIcon {
    /// Muted at exactly zero, low below one half, high otherwise.
    pub fn for_volume(volume: f32) -> Self {
        if volume <= 0.0 {
            Self::Muted
        } else if volume < 0.5 {
            Self::Low
        } else {
            Self::High
        }
    }
}

/// One line of the queue panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueRow {
    pub index: usize,
    pub title: String,
    pub artist: String,
    /// Filled in once the duration probe for this row resolves.
    pub time_label: Option<String>,
    pub current: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerView {
    pub title: String,
    pub artist: String,
    pub cover: String,
    pub banner: String,
    pub artist_bar: String,
    pub artist_img: String,
    pub elapsed_text: String,
    pub duration_text: String,
    /// Progress slider position in `[0, 1]`.
    pub progress: f64,
    pub play_icon: PlayIcon,
    pub volume_icon: VolumeIcon,
    pub volume: f32,
    pub shuffle_active: bool,
    pub repeat: RepeatMode,
    pub queue_open: bool,
    pub rows: Vec<QueueRow>,
}

impl PlayerView {
    pub(super) fn with_rows(tracks: &[Track]) -> Self {
        Self {
            elapsed_text: format_time(Duration::ZERO),
            duration_text: format_time(Duration::ZERO),
            rows: tracks
                .iter()
                .enumerate()
                .map(|(index, t)| QueueRow {
                    index,
                    title: t.title.clone(),
                    artist: t.artist.clone(),
                    time_label: None,
                    current: false,
                })
                .collect(),
            ..Self::default()
        }
    }

    pub(super) fn show_track(&mut self, index: usize, track: &Track) {
        self.title = track.title.clone();
        self.artist = track.artist.clone();
        self.cover = track.cover.clone();
        self.artist_img = track.artist_img.clone();
        self.banner = if track.artist.trim().is_empty() {
            track.title.clone()
        } else {
            format!("{} · {}", track.title, track.artist)
        };
        self.artist_bar = track.artist.clone();
        for row in &mut self.rows {
            row.current = row.index == index;
        }
    }

    pub(super) fn show_time(&mut self, elapsed: Duration, duration: Option<Duration>) {
        self.elapsed_text = format_time(elapsed);
        self.duration_text = format_time(duration.unwrap_or(Duration::ZERO));
        self.progress = match duration {
            Some(d) if !d.is_zero() => (elapsed.as_secs_f64() / d.as_secs_f64()).clamp(0.0, 1.0),
            _ => 0.0,
        };
    }

    pub(super) fn show_volume(&mut self, volume: f32) {
        self.volume = volume;
        self.volume_icon = VolumeIcon::for_volume(volume);
    }
}

/// Format a `Duration` as `m:ss`.
pub fn format_time(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}
