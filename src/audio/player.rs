use std::path::Path;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::config::AudioSettings;

use super::thread::spawn_audio_thread;
use super::types::{AudioCmd, MediaEvent, PlaybackHandle, TaggedEvent};

/// `rodio`-backed playback handle. Transport commands go to a dedicated audio
/// thread; its events come back over a channel and are filtered by load
/// generation so a replaced source can never report into the new one.
pub struct AudioPlayer {
    tx: Sender<AudioCmd>,
    events: Receiver<TaggedEvent>,
    generation: u64,
    has_source: bool,
    volume: f32,
    join: Option<JoinHandle<()>>,
}

impl AudioPlayer {
    pub fn new(audio_settings: AudioSettings) -> Self {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let (event_tx, events) = mpsc::channel::<TaggedEvent>();
        let volume = audio_settings.initial_volume.clamp(0.0, 1.0);

        let join = spawn_audio_thread(rx, event_tx, audio_settings);

        Self {
            tx,
            events,
            generation: 0,
            has_source: false,
            volume,
            join: Some(join),
        }
    }

    /// A player wired to caller-owned channels, with no audio thread behind it.
    #[cfg(test)]
    pub(super) fn detached(tx: Sender<AudioCmd>, events: Receiver<TaggedEvent>) -> Self {
        Self {
            tx,
            events,
            generation: 0,
            has_source: false,
            volume: 1.0,
            join: None,
        }
    }

    fn send(&self, cmd: AudioCmd) {
        if self.tx.send(cmd).is_err() {
            log::warn!("audio thread is gone, dropping command");
        }
    }

    /// Stop playback and wait for the audio thread to exit.
    pub fn shutdown(&mut self) {
        if let Some(h) = self.join.take() {
            self.send(AudioCmd::Quit);
            let _ = h.join();
        }
    }
}

impl Drop for AudioPlayer {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl PlaybackHandle for AudioPlayer {
    fn load(&mut self, src: &Path) {
        self.generation += 1;
        self.has_source = true;
        self.send(AudioCmd::Load {
            generation: self.generation,
            path: src.to_path_buf(),
        });
    }

    fn has_source(&self) -> bool {
        self.has_source
    }

    fn play(&mut self) {
        self.send(AudioCmd::Play);
    }

    fn pause(&mut self) {
        self.send(AudioCmd::Pause);
    }

    fn seek(&mut self, position: Duration) {
        self.send(AudioCmd::Seek(position));
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        self.send(AudioCmd::SetVolume(self.volume));
    }

    fn volume(&self) -> f32 {
        self.volume
    }

    fn poll_event(&mut self) -> Option<MediaEvent> {
        while let Ok(tagged) = self.events.try_recv() {
            match tagged.event {
                // Volume belongs to the output, not to a source.
                MediaEvent::VolumeChanged { volume } => {
                    self.volume = volume;
                    return Some(tagged.event);
                }
                event if tagged.generation == self.generation => return Some(event),
                _ => continue,
            }
        }
        None
    }
}
