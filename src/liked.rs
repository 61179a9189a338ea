//! Liked songs, persisted as one JSON document in [`Storage`].
//!
//! The stored value is `{"version":1,"entries":[...]}`. A bare array of
//! entries (the older layout) is still read. Anything else decodes to an
//! empty list; a broken value never surfaces as an error.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Deserializer, Serialize};

use crate::catalog::Track;
use crate::error::Result;
use crate::player::format_time;
use crate::storage::Storage;

pub const LIKED_KEY: &str = "liked_songs";
const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikedEntry {
    #[serde(deserialize_with = "id_from_text_or_number")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub cover: String,
    #[serde(default)]
    pub duration: String,
}

impl LikedEntry {
    /// Build an entry for `track`. Without an explicit id the current time
    /// in milliseconds is used.
    pub fn for_track(track: &Track, duration: Option<Duration>, id: Option<String>) -> Self {
        Self {
            id: id.unwrap_or_else(timestamp_id),
            title: track.title.clone(),
            artist: track.artist.clone(),
            cover: track.cover.clone(),
            duration: duration.map(format_time).unwrap_or_default(),
        }
    }
}

fn timestamp_id() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
        .to_string()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(serde_json::Number),
}

fn id_from_text_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}

#[derive(Serialize, Deserialize)]
struct LikedDocument {
    version: u32,
    entries: Vec<LikedEntry>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredLiked {
    Versioned(LikedDocument),
    Legacy(Vec<LikedEntry>),
}

/// Decode a stored value, or `None` if it is not a liked-songs document.
pub fn decode(raw: &str) -> Option<Vec<LikedEntry>> {
    match serde_json::from_str::<StoredLiked>(raw).ok()? {
        StoredLiked::Versioned(doc) => {
            if doc.version != FORMAT_VERSION {
                log::warn!("liked songs stored with version {}, reading anyway", doc.version);
            }
            Some(doc.entries)
        }
        StoredLiked::Legacy(entries) => Some(entries),
    }
}

pub fn load<S: Storage + ?Sized>(storage: &S) -> Vec<LikedEntry> {
    let Some(raw) = storage.get_item(LIKED_KEY) else {
        return Vec::new();
    };
    decode(&raw).unwrap_or_else(|| {
        log::warn!("ignoring malformed {LIKED_KEY} value");
        Vec::new()
    })
}

pub fn save<S: Storage + ?Sized>(storage: &mut S, entries: &[LikedEntry]) -> Result<()> {
    let doc = LikedDocument {
        version: FORMAT_VERSION,
        entries: entries.to_vec(),
    };
    storage.set_item(LIKED_KEY, &serde_json::to_string(&doc)?)
}

pub fn contains(entries: &[LikedEntry], id: &str) -> bool {
    entries.iter().any(|e| e.id == id)
}

/// Append `entry` unless its id is already liked. Returns the stored list.
pub fn add<S: Storage + ?Sized>(storage: &mut S, entry: LikedEntry) -> Result<Vec<LikedEntry>> {
    let mut entries = load(storage);
    if !contains(&entries, &entry.id) {
        entries.push(entry);
        save(storage, &entries)?;
    }
    Ok(entries)
}

/// Drop every entry with `id`; the others keep their order.
pub fn remove<S: Storage + ?Sized>(storage: &mut S, id: &str) -> Result<Vec<LikedEntry>> {
    let mut entries = load(storage);
    let before = entries.len();
    entries.retain(|e| e.id != id);
    if entries.len() != before {
        save(storage, &entries)?;
    }
    Ok(entries)
}

/// Like or unlike `entry` by id. Returns whether it is liked afterwards.
pub fn toggle<S: Storage + ?Sized>(storage: &mut S, entry: LikedEntry) -> Result<bool> {
    if contains(&load(storage), &entry.id) {
        remove(storage, &entry.id)?;
        Ok(false)
    } else {
        add(storage, entry)?;
        Ok(true)
    }
}
