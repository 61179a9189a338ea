use std::path::PathBuf;

/// One playlist entry. Tracks are immutable once the catalog is loaded and
/// are identified by their position in the playlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub title: String,
    pub artist: String,
    /// Audio source locator handed to the playback handle.
    pub src: PathBuf,
    /// Cover image locator.
    pub cover: String,
    /// Artist image locator.
    pub artist_img: String,
}

impl Track {
    /// `Artist - Title`, or just the title when the artist is blank.
    pub fn display(&self) -> String {
        let artist = self.artist.trim();
        if artist.is_empty() {
            self.title.clone()
        } else {
            format!("{} - {}", artist, self.title)
        }
    }

    /// Stable id used when liking this track.
    pub fn like_id(&self) -> String {
        self.src.to_string_lossy().into_owned()
    }
}
