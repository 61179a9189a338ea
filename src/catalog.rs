//! Track catalog: the fixed playlist the player works through.
//!
//! The playlist comes from one of three places: a JSON feed file, a scanned
//! music directory, or the built-in demo catalog.

mod feed;
mod model;
mod scan;

pub use feed::{load_feed, parse_feed};
pub use model::Track;
pub use scan::scan;

use std::path::PathBuf;

use crate::config::CatalogSettings;

/// The hard-coded demo catalog, relative to the working directory.
pub fn builtin() -> Vec<Track> {
    const DEMO: [(&str, &str, &str); 5] = [
        ("Midnight Drive", "Neon Avenue", "midnight-drive"),
        ("Paper Lanterns", "Mira Sol", "paper-lanterns"),
        ("Low Tide", "The Harbour Lights", "low-tide"),
        ("Glass Garden", "Mira Sol", "glass-garden"),
        ("Northbound", "Kestrel", "northbound"),
    ];

    DEMO.iter()
        .map(|(title, artist, slug)| Track {
            title: (*title).to_string(),
            artist: (*artist).to_string(),
            src: PathBuf::from(format!("music/{slug}.mp3")),
            cover: format!("images/covers/{slug}.jpg"),
            artist_img: format!(
                "images/artists/{}.jpg",
                artist.to_ascii_lowercase().replace(' ', "-")
            ),
        })
        .collect()
}

/// Resolve the playlist from settings. Never returns an empty list: a missing
/// or unreadable source falls back to [`builtin`].
pub fn load(settings: &CatalogSettings) -> Vec<Track> {
    let tracks = match settings.source.as_deref() {
        None => return builtin(),
        Some(dir) if dir.is_dir() => scan(dir, settings),
        Some(file) => match load_feed(file) {
            Ok(tracks) => tracks,
            Err(e) => {
                log::warn!("could not read track feed {}: {e}", file.display());
                Vec::new()
            }
        },
    };

    if tracks.is_empty() {
        log::warn!("catalog source produced no tracks, using the built-in catalog");
        return builtin();
    }
    log::info!("loaded {} tracks", tracks.len());
    tracks
}

#[cfg(test)]
mod tests;
