use std::sync::mpsc::Receiver;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::audio::{DurationProbe, PlaybackHandle};
use crate::auth::Route;
use crate::config;
use crate::ui;

/// Main terminal event loop: drains duration probes and media events, draws,
/// then handles at most one key. Returns `Ok(())` when the user quits.
pub fn run<H: PlaybackHandle>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App<H>,
    probes: &Receiver<DurationProbe>,
) -> anyhow::Result<()> {
    loop {
        while let Ok(probe) = probes.try_recv() {
            app.player.apply_prefetched_duration(probe);
        }
        app.player.pump_media_events();
        app.sync_track_changes();

        terminal.draw(|f| ui::draw(f, app, &settings.ui, &settings.controls))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, app) {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Dispatch one key press by page. Returns `true` when the app should quit.
fn handle_key_event<H: PlaybackHandle>(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App<H>,
) -> bool {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && key.code == KeyCode::Char('c') {
        return true;
    }
    app.status = None;

    match app.location.route {
        Route::Login | Route::Signup => {
            handle_form_key(key, app);
            false
        }
        Route::Search => {
            handle_search_key(key, app);
            false
        }
        Route::Liked => {
            if !handle_liked_key(key, app) {
                return handle_player_key(key, settings, app);
            }
            false
        }
        Route::Player => handle_player_key(key, settings, app),
    }
}

fn handle_form_key<H: PlaybackHandle>(key: KeyEvent, app: &mut App<H>) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => app.open(Route::Player),
        KeyCode::Char('s') if ctrl && app.location.route == Route::Login => app.switch_auth_page(),
        KeyCode::Char('l') if ctrl && app.location.route == Route::Signup => {
            app.switch_auth_page()
        }
        KeyCode::Enter => match app.location.route {
            Route::Login => app.submit_login(),
            _ => app.submit_signup(),
        },
        code => {
            let Some(form) = app.active_form() else {
                return;
            };
            match code {
                KeyCode::Tab | KeyCode::Down => form.focus_next(),
                KeyCode::BackTab | KeyCode::Up => form.focus_prev(),
                KeyCode::Backspace => form.pop_char(),
                KeyCode::Char(c) if !ctrl && !c.is_control() => form.push_char(c),
                _ => {}
            }
        }
    }
}

fn handle_search_key<H: PlaybackHandle>(key: KeyEvent, app: &mut App<H>) {
    match key.code {
        KeyCode::Esc => {
            app.search.clear();
            app.open(Route::Player);
        }
        KeyCode::Down => app.search.select_next(),
        KeyCode::Up => app.search.select_prev(),
        KeyCode::Enter => app.play_search_selected(),
        KeyCode::Backspace => app.search.pop_char(),
        KeyCode::Char(c) if !c.is_control() => app.search.push_char(c),
        _ => {}
    }
}

/// Liked-page keys. Returns `false` for keys the player should handle.
fn handle_liked_key<H: PlaybackHandle>(key: KeyEvent, app: &mut App<H>) -> bool {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.liked_select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.liked_select_prev(),
        KeyCode::Enter => app.play_liked_selected(),
        KeyCode::Char('d') | KeyCode::Delete => app.remove_liked_selected(),
        KeyCode::Esc => app.open(Route::Player),
        _ => return false,
    }
    true
}

fn handle_player_key<H: PlaybackHandle>(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App<H>,
) -> bool {
    let scrub = settings.controls.scrub_seconds.min(i64::MAX as u64) as i64;
    let step = settings.controls.volume_step;

    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('p') | KeyCode::Char(' ') => app.player.toggle_play(),
        KeyCode::Char('l') => app.player.next_track(false),
        KeyCode::Char('h') => app.player.prev_track(),
        KeyCode::Char('L') => app.player.scrub_by(scrub),
        KeyCode::Char('H') => app.player.scrub_by(-scrub),
        KeyCode::Home => app.player.seek_to_fraction(0.0),
        KeyCode::Char('s') => app.player.toggle_shuffle(),
        KeyCode::Char('r') => app.player.cycle_repeat(),
        KeyCode::Char('v') => app.player.toggle_queue(),
        KeyCode::Char('j') | KeyCode::Down => app.queue_select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.queue_select_prev(),
        KeyCode::Enter => app.play_queue_selected(),
        KeyCode::Char('+') | KeyCode::Char('=') => app.player.nudge_volume(step),
        KeyCode::Char('-') => app.player.nudge_volume(-step),
        KeyCode::Char('f') => app.toggle_like_current(),
        KeyCode::Char('[') => app.player.go_back(),
        KeyCode::Char(']') => app.player.go_forward(),
        KeyCode::Char('1') => app.open(Route::Player),
        KeyCode::Char('2') => app.open(Route::Liked),
        KeyCode::Char('3') => app.open(Route::Search),
        KeyCode::Char('i') => app.open_login(),
        KeyCode::Char('o') => app.sign_out(),
        _ => {}
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::fake::FakeHandle;
    use crate::auth::Location;
    use crate::catalog;
    use crate::player::PlayerController;
    use crate::storage::MemoryStorage;

    fn app() -> App<FakeHandle> {
        let mut player = PlayerController::new(catalog::builtin(), FakeHandle::default(), 10);
        player.start();
        App::new(
            player,
            Box::new(MemoryStorage::new()),
            config::AuthSettings::default(),
            None,
            Location::default(),
        )
    }

    fn press(app: &mut App<FakeHandle>, code: KeyCode) -> bool {
        handle_key_event(
            KeyEvent::new(code, KeyModifiers::NONE),
            &config::Settings::default(),
            app,
        )
    }

    #[test]
    fn player_keys_drive_the_controller() {
        let mut app = app();
        assert!(!press(&mut app, KeyCode::Char(' ')));
        assert!(app.player.state().is_playing);

        press(&mut app, KeyCode::Char('l'));
        assert_eq!(app.player.state().current_index, 1);

        press(&mut app, KeyCode::Char('v'));
        assert!(app.player.queue_open());
        press(&mut app, KeyCode::Char('['));
        assert!(!app.player.queue_open());

        press(&mut app, KeyCode::Char('-'));
        assert!(app.player.state().volume < 1.0);

        assert!(press(&mut app, KeyCode::Char('q')));
    }

    #[test]
    fn typing_on_the_login_page_fills_the_form() {
        let mut app = app();
        press(&mut app, KeyCode::Char('2'));
        assert_eq!(app.location.route, Route::Login);

        for c in "demo".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Tab);
        for c in "allegro123".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        // 'q' is text here, not quit
        assert!(!press(&mut app, KeyCode::Char('q')));
        press(&mut app, KeyCode::Backspace);

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.location.route, Route::Liked);
        assert!(app.signed_in());
    }

    #[test]
    fn search_page_filters_and_plays() {
        let mut app = app();
        press(&mut app, KeyCode::Char('3'));
        for c in "mira".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        assert_eq!(app.search.results.len(), 2);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.location.route, Route::Player);
        assert_eq!(
            app.player.current_track().map(|t| t.title.as_str()),
            Some("Glass Garden")
        );
    }
}
