use std::env;
use std::path::PathBuf;
use std::sync::mpsc;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::audio::{AudioPlayer, spawn_duration_prefetch};
use crate::auth::Location;
use crate::catalog;
use crate::config;
use crate::logging;
use crate::player::PlayerController;
use crate::storage::{FileStorage, MemoryStorage, Storage};

mod event_loop;
mod settings;
mod startup;

/// Entry point behind `main`: `allegro [--print-config] [LOCATION]`, where
/// `LOCATION` is an in-app path such as `/login?next=/liked`.
pub fn run() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let (settings, settings_warning) = settings::load_settings();

    if args.iter().any(|a| a == "--print-config") {
        print!("{}", settings.to_toml()?);
        return Ok(());
    }

    let data_dir = config::resolve_data_dir(&settings.storage).unwrap_or_else(|| PathBuf::from(".allegro"));
    let log_path = logging::init_or_warn(&settings.logging, &data_dir);
    if let Some(warning) = settings_warning {
        match &log_path {
            Some(_) => log::warn!("{warning}"),
            None => eprintln!("allegro: {warning}"),
        }
    }
    if let Some(path) = &log_path {
        log::info!("starting allegro, logging to {}", path.display());
    }

    let start = args
        .iter()
        .find(|a| !a.starts_with("--"))
        .map(|a| Location::parse(a))
        .unwrap_or_default();

    let storage: Box<dyn Storage> = match FileStorage::open(&data_dir) {
        Ok(s) => {
            log::debug!("persisting to {}", s.dir().display());
            Box::new(s)
        }
        Err(e) => {
            log::warn!("storage unavailable ({e}), nothing will be persisted");
            Box::new(MemoryStorage::new())
        }
    };

    let tracks = catalog::load(&settings.catalog);
    let (probe_tx, probe_rx) = mpsc::channel();
    spawn_duration_prefetch(&tracks, probe_tx);

    let audio_player = AudioPlayer::new(settings.audio.clone());
    let mut player = PlayerController::new(tracks, audio_player, settings.playback.history_limit);
    startup::apply_playback_defaults(&mut player, &settings);

    let mut app = App::new(
        player,
        storage,
        settings.auth.clone(),
        settings.catalog.fallback_feed.clone(),
        start,
    );

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(&mut terminal, &settings, &mut app, &probe_rx);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    log::info!("shutting down");
    run_result
}
