use super::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

#[test]
fn display_joins_artist_and_title() {
    let t = Track {
        title: "Song".into(),
        artist: "  Artist ".into(),
        src: "a.mp3".into(),
        cover: String::new(),
        artist_img: String::new(),
    };
    assert_eq!(t.display(), "Artist - Song");

    let no_artist = Track {
        artist: " ".into(),
        ..t
    };
    assert_eq!(no_artist.display(), "Song");
}

#[test]
fn parse_feed_maps_fields_and_resolves_relative_sources() {
    let raw = r#"[
        {"title": "One", "artist": "A", "cover": "c1.jpg", "src": "audio/one.mp3", "artistImg": "a.jpg"},
        {"src": "/abs/two.ogg"}
    ]"#;

    let tracks = parse_feed(raw, Path::new("/feeds")).unwrap();
    assert_eq!(tracks.len(), 2);

    assert_eq!(tracks[0].title, "One");
    assert_eq!(tracks[0].artist, "A");
    assert_eq!(tracks[0].cover, "c1.jpg");
    assert_eq!(tracks[0].artist_img, "a.jpg");
    assert_eq!(tracks[0].src, Path::new("/feeds/audio/one.mp3"));

    // Missing title falls back to the file stem; missing artwork stays empty.
    assert_eq!(tracks[1].title, "two");
    assert_eq!(tracks[1].src, Path::new("/abs/two.ogg"));
    assert!(tracks[1].cover.is_empty());
}

#[test]
fn parse_feed_rejects_malformed_documents() {
    assert!(parse_feed("not json", Path::new(".")).is_err());
    assert!(parse_feed(r#"[{"title": "no src"}]"#, Path::new(".")).is_err());
}

#[test]
fn load_reads_feed_file() {
    let dir = tempdir().unwrap();
    let feed = dir.path().join("tracks.json");
    fs::write(&feed, r#"[{"title": "X", "artist": "Y", "src": "x.mp3"}]"#).unwrap();

    let settings = CatalogSettings {
        source: Some(feed),
        ..CatalogSettings::default()
    };
    let tracks = load(&settings);
    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].src, dir.path().join("x.mp3"));
}

#[test]
fn load_falls_back_to_builtin_when_source_is_unusable() {
    let dir = tempdir().unwrap();

    let missing = CatalogSettings {
        source: Some(dir.path().join("missing.json")),
        ..CatalogSettings::default()
    };
    assert_eq!(load(&missing), builtin());

    // An existing directory without audio files.
    let empty_dir = CatalogSettings {
        source: Some(dir.path().to_path_buf()),
        ..CatalogSettings::default()
    };
    assert_eq!(load(&empty_dir), builtin());

    assert_eq!(load(&CatalogSettings::default()), builtin());
}

#[test]
fn builtin_catalog_is_non_empty_with_artwork() {
    let tracks = builtin();
    assert!(!tracks.is_empty());
    assert!(tracks.iter().all(|t| !t.cover.is_empty() && !t.artist_img.is_empty()));
}
