//! Background duration probes for queue rows.
//!
//! One worker walks the rows in order and reports each probe as it finishes.
//! Results are keyed by row index, so a late probe only ever touches its own
//! row.

use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::thread;
use std::time::Duration;

use lofty::prelude::AudioFile;

use crate::catalog::Track;

use super::types::DurationProbe;

/// Read the duration from the file's properties without decoding audio.
pub fn probe_duration(path: &Path) -> Option<Duration> {
    match lofty::read_from_path(path) {
        Ok(tagged) => Some(tagged.properties().duration()),
        Err(e) => {
            log::debug!("no duration for {}: {e}", path.display());
            None
        }
    }
}

/// Probe every track on a single background worker. Failed probes send
/// nothing; the worker stops early once the receiver is gone.
pub fn spawn_duration_prefetch(tracks: &[Track], tx: Sender<DurationProbe>) {
    let paths: Vec<PathBuf> = tracks.iter().map(|t| t.src.clone()).collect();
    let spawned = thread::Builder::new()
        .name("duration-prefetch".into())
        .spawn(move || {
            for (index, path) in paths.iter().enumerate() {
                let Some(duration) = probe_duration(path) else {
                    continue;
                };
                if tx.send(DurationProbe { index, duration }).is_err() {
                    break;
                }
            }
        });
    if let Err(e) = spawned {
        log::warn!("duration prefetch unavailable: {e}");
    }
}
