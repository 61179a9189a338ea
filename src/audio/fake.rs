//! In-memory playback handle for tests.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::types::{MediaEvent, PlaybackHandle};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Load(PathBuf),
    Play,
    Pause,
    Seek(Duration),
    SetVolume(f32),
}

#[derive(Debug)]
pub struct FakeHandle {
    pub calls: Vec<Call>,
    pub pending: VecDeque<MediaEvent>,
    pub source: Option<PathBuf>,
    volume: f32,
}

impl Default for FakeHandle {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            pending: VecDeque::new(),
            source: None,
            volume: 1.0,
        }
    }
}

impl FakeHandle {
    pub fn push_event(&mut self, event: MediaEvent) {
        self.pending.push_back(event);
    }

    pub fn last_call(&self) -> Option<&Call> {
        self.calls.last()
    }
}

impl PlaybackHandle for FakeHandle {
    fn load(&mut self, src: &Path) {
        self.source = Some(src.to_path_buf());
        self.calls.push(Call::Load(src.to_path_buf()));
    }

    fn has_source(&self) -> bool {
        self.source.is_some()
    }

    fn play(&mut self) {
        self.calls.push(Call::Play);
    }

    fn pause(&mut self) {
        self.calls.push(Call::Pause);
    }

    fn seek(&mut self, position: Duration) {
        self.calls.push(Call::Seek(position));
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        self.calls.push(Call::SetVolume(self.volume));
    }

    fn volume(&self) -> f32 {
        self.volume
    }

    fn poll_event(&mut self) -> Option<MediaEvent> {
        self.pending.pop_front()
    }
}
