//! JSON track feed: `[{title, artist, cover, src, artistImg}, ...]`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::Result;

use super::model::Track;

#[derive(Debug, Deserialize)]
struct FeedEntry {
    #[serde(default)]
    title: String,
    #[serde(default)]
    artist: String,
    src: String,
    #[serde(default)]
    cover: String,
    #[serde(default, rename = "artistImg")]
    artist_img: String,
}

/// Read and parse a feed file. Relative `src` locators resolve against the
/// feed's own directory.
pub fn load_feed(path: &Path) -> Result<Vec<Track>> {
    let raw = fs::read_to_string(path)?;
    let base = path.parent().unwrap_or_else(|| Path::new("."));
    parse_feed(&raw, base)
}

pub fn parse_feed(raw: &str, base: &Path) -> Result<Vec<Track>> {
    let entries: Vec<FeedEntry> = serde_json::from_str(raw)?;
    Ok(entries
        .into_iter()
        .map(|e| {
            let src = resolve_src(&e.src, base);
            let title = if e.title.trim().is_empty() {
                src.file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("UNKNOWN")
                    .to_string()
            } else {
                e.title.trim().to_string()
            };
            Track {
                title,
                artist: e.artist.trim().to_string(),
                src,
                cover: e.cover,
                artist_img: e.artist_img,
            }
        })
        .collect())
}

fn resolve_src(src: &str, base: &Path) -> PathBuf {
    let p = Path::new(src);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base.join(p)
    }
}
