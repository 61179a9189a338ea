//! Search page: token filter over the live playlist, or over the fallback
//! feed when no player is available.

use std::path::Path;

use crate::catalog::{self, Track};
use crate::player::PlayerApi;

/// Trim, lowercase and collapse runs of whitespace to one space.
pub fn normalize(s: &str) -> String {
    s.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Indices of the tracks whose "title artist" text contains every token of
/// `query`. An empty query matches everything.
pub fn filter(tracks: &[Track], query: &str) -> Vec<usize> {
    let query = normalize(query);
    let tokens: Vec<&str> = query.split(' ').filter(|t| !t.is_empty()).collect();

    tracks
        .iter()
        .enumerate()
        .filter(|(_, t)| {
            let haystack = normalize(&format!("{} {}", t.title, t.artist));
            tokens.iter().all(|tok| haystack.contains(tok))
        })
        .map(|(i, _)| i)
        .collect()
}

/// Where search results come from.
#[derive(Debug, Clone)]
pub struct SearchSource {
    tracks: Vec<Track>,
    playable: bool,
}

impl SearchSource {
    /// Prefer the live playlist. Without one, read the fallback feed; its
    /// results are listed but cannot be played.
    pub fn resolve(api: Option<&dyn PlayerApi>, fallback_feed: Option<&Path>) -> Self {
        if let Some(api) = api {
            return Self {
                tracks: api.playlist().to_vec(),
                playable: true,
            };
        }

        let tracks = match fallback_feed {
            Some(path) => catalog::load_feed(path).unwrap_or_else(|e| {
                log::warn!("search fallback feed {} unavailable: {e}", path.display());
                Vec::new()
            }),
            None => Vec::new(),
        };
        Self {
            tracks,
            playable: false,
        }
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn is_playable(&self) -> bool {
        self.playable
    }
}

/// Query text, current matches and the highlighted result.
#[derive(Debug, Clone)]
pub struct SearchState {
    source: SearchSource,
    pub query: String,
    pub results: Vec<usize>,
    pub selected: usize,
}

impl SearchState {
    pub fn new(source: SearchSource) -> Self {
        let results = (0..source.tracks.len()).collect();
        Self {
            source,
            query: String::new(),
            results,
            selected: 0,
        }
    }

    pub fn source(&self) -> &SearchSource {
        &self.source
    }

    pub fn push_char(&mut self, c: char) {
        self.query.push(c);
        self.refresh();
    }

    pub fn pop_char(&mut self) {
        self.query.pop();
        self.refresh();
    }

    pub fn clear(&mut self) {
        self.query.clear();
        self.refresh();
    }

    pub fn select_next(&mut self) {
        if !self.results.is_empty() {
            self.selected = (self.selected + 1).min(self.results.len() - 1);
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Playlist index of the highlighted result, if it can be played.
    pub fn playable_selection(&self) -> Option<usize> {
        if !self.source.playable {
            return None;
        }
        self.results.get(self.selected).copied()
    }

    pub fn result_tracks(&self) -> impl Iterator<Item = (usize, &Track)> {
        self.results
            .iter()
            .filter_map(|&i| self.source.tracks.get(i).map(|t| (i, t)))
    }

    fn refresh(&mut self) {
        self.results = filter(&self.source.tracks, &self.query);
        self.selected = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn t(title: &str, artist: &str) -> Track {
        Track {
            title: title.into(),
            artist: artist.into(),
            src: format!("{title}.mp3").into(),
            cover: String::new(),
            artist_img: String::new(),
        }
    }

    struct Playlist(Vec<Track>);

    impl PlayerApi for Playlist {
        fn playlist(&self) -> &[Track] {
            &self.0
        }

        fn play_at(&mut self, _index: usize) {}

        fn current_index(&self) -> usize {
            0
        }
    }

    #[test]
    fn normalize_collapses_whitespace_and_case() {
        assert_eq!(normalize("  Paper   LANTERNS \t"), "paper lanterns");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn filter_requires_every_token() {
        let tracks = vec![
            t("Midnight Drive", "Neon Avenue"),
            t("Paper Lanterns", "Mira Sol"),
            t("Glass Garden", "Mira Sol"),
        ];
        assert_eq!(filter(&tracks, ""), vec![0, 1, 2]);
        assert_eq!(filter(&tracks, "mira"), vec![1, 2]);
        assert_eq!(filter(&tracks, "  SOL   glass "), vec![2]);
        assert_eq!(filter(&tracks, "drive sol"), Vec::<usize>::new());
    }

    #[test]
    fn live_playlist_results_are_playable() {
        let api = Playlist(vec![t("One", "A"), t("Two", "B")]);
        let mut state = SearchState::new(SearchSource::resolve(Some(&api as &dyn PlayerApi), None));
        assert!(state.source().is_playable());

        state.push_char('t');
        state.push_char('w');
        assert_eq!(state.results, vec![1]);
        assert_eq!(state.playable_selection(), Some(1));

        state.pop_char();
        state.pop_char();
        assert_eq!(state.results.len(), 2);
        state.select_next();
        state.select_next();
        assert_eq!(state.selected, 1);
    }

    #[test]
    fn fallback_feed_results_are_listed_but_not_playable() {
        let dir = tempdir().unwrap();
        let feed = dir.path().join("tracks.json");
        fs::write(&feed, r#"[{"title": "Northbound", "artist": "Kestrel", "src": "n.mp3"}]"#).unwrap();

        let state = SearchState::new(SearchSource::resolve(None, Some(feed.as_path())));
        assert!(!state.source().is_playable());
        assert_eq!(state.result_tracks().count(), 1);
        assert_eq!(state.playable_selection(), None);

        let missing = SearchSource::resolve(None, Some(dir.path().join("missing.json").as_path()));
        assert!(missing.tracks().is_empty());
    }
}
