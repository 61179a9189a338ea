use std::path::PathBuf;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;

use rodio::{OutputStreamBuilder, Sink};

use crate::config::AudioSettings;

use super::prefetch::probe_duration;
use super::sink::create_sink_at;
use super::types::{AudioCmd, MediaEvent, TaggedEvent};

/// State of the one source the audio thread is playing.
struct Current {
    generation: u64,
    path: PathBuf,
    sink: Option<Sink>,
    /// Position the sink was created at; `Sink::get_pos` counts from there.
    offset: Duration,
    paused: bool,
    ended: bool,
}

impl Current {
    fn elapsed(&self) -> Duration {
        self.offset + self.sink.as_ref().map_or(Duration::ZERO, Sink::get_pos)
    }
}

pub(super) fn spawn_audio_thread(
    rx: Receiver<AudioCmd>,
    events: Sender<TaggedEvent>,
    audio_settings: AudioSettings,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut stream = match OutputStreamBuilder::open_default_stream() {
            Ok(s) => s,
            Err(e) => {
                log::error!("no audio output device, playback disabled: {e}");
                // Keep draining so the controller never blocks on a dead channel.
                while let Ok(cmd) = rx.recv() {
                    if matches!(cmd, AudioCmd::Quit) {
                        break;
                    }
                }
                return;
            }
        };
        // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
        // but noisy for a TUI app.
        stream.log_on_drop(false);

        let tick = Duration::from_millis(audio_settings.tick_ms.max(1));
        let mut volume = audio_settings.initial_volume.clamp(0.0, 1.0);
        let mut current: Option<Current> = None;

        let emit = |generation: u64, event: MediaEvent| {
            let _ = events.send(TaggedEvent { generation, event });
        };

        loop {
            match rx.recv_timeout(tick) {
                Ok(cmd) => match cmd {
                    AudioCmd::Load { generation, path } => {
                        if let Some(old) = current.take().and_then(|c| c.sink) {
                            old.stop();
                        }

                        let sink = match create_sink_at(&stream, &path, Duration::ZERO) {
                            Ok((sink, total)) => {
                                sink.set_volume(volume);
                                let duration = total.or_else(|| probe_duration(&path));
                                emit(generation, MediaEvent::MetadataLoaded { duration });
                                Some(sink)
                            }
                            Err(e) => {
                                log::warn!("could not open {}: {e}", path.display());
                                None
                            }
                        };

                        current = Some(Current {
                            generation,
                            path,
                            sink,
                            offset: Duration::ZERO,
                            paused: true,
                            ended: false,
                        });
                    }

                    AudioCmd::Play => {
                        if let Some(c) = current.as_mut() {
                            if let Some(s) = c.sink.as_ref() {
                                s.play();
                                c.paused = false;
                            }
                        }
                    }

                    AudioCmd::Pause => {
                        if let Some(c) = current.as_mut() {
                            if let Some(s) = c.sink.as_ref() {
                                s.pause();
                            }
                            c.paused = true;
                        }
                    }

                    AudioCmd::Seek(position) => {
                        let Some(c) = current.as_mut() else {
                            continue;
                        };
                        if c.sink.is_none() {
                            continue;
                        }

                        // Rebuild the sink and skip into the file. This also revives
                        // a source that already played to its end.
                        if let Some(old) = c.sink.take() {
                            old.stop();
                        }
                        match create_sink_at(&stream, &c.path, position) {
                            Ok((sink, _)) => {
                                sink.set_volume(volume);
                                if !c.paused {
                                    sink.play();
                                }
                                c.sink = Some(sink);
                                c.offset = position;
                                c.ended = false;
                                emit(c.generation, MediaEvent::TimeUpdate { elapsed: position });
                            }
                            Err(e) => log::warn!("seek failed for {}: {e}", c.path.display()),
                        }
                    }

                    AudioCmd::SetVolume(v) => {
                        volume = v.clamp(0.0, 1.0);
                        let generation = current.as_ref().map_or(0, |c| c.generation);
                        if let Some(s) = current.as_ref().and_then(|c| c.sink.as_ref()) {
                            s.set_volume(volume);
                        }
                        emit(generation, MediaEvent::VolumeChanged { volume });
                    }

                    AudioCmd::Quit => {
                        if let Some(s) = current.as_ref().and_then(|c| c.sink.as_ref()) {
                            s.stop();
                        }
                        break;
                    }
                },
                Err(RecvTimeoutError::Timeout) => {
                    // Periodic position report and end-of-track detection.
                    let Some(c) = current.as_mut() else {
                        continue;
                    };
                    let Some(s) = c.sink.as_ref() else {
                        continue;
                    };
                    if c.paused || c.ended {
                        continue;
                    }
                    if s.empty() {
                        c.ended = true;
                        c.paused = true;
                        emit(c.generation, MediaEvent::Ended);
                    } else {
                        emit(c.generation, MediaEvent::TimeUpdate { elapsed: c.elapsed() });
                    }
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    })
}
