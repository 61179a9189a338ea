//! UI rendering helpers for the terminal user interface.
//!
//! This module renders the current page of an [`App`] with `ratatui`. It only
//! reads state: the player view model, page state and settings.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};

use crate::app::App;
use crate::audio::PlaybackHandle;
use crate::auth::{AuthForm, Route};
use crate::config::{ControlsSettings, UiSettings};
use crate::player::{PlayIcon, PlayerView, VolumeIcon};

const LEFT_PAD: Padding = Padding {
    left: 1,
    right: 0,
    top: 0,
    bottom: 0,
};

/// Footer help for `route`, incorporating scrub seconds.
fn controls_text(route: Route, scrub_seconds: u64) -> String {
    let scrub = format!("[H/L] scrub -/+{scrub_seconds}s");
    let keys: Vec<&str> = match route {
        Route::Player => vec![
            "[space/p] play/pause",
            "[h/l] prev/next",
            scrub.as_str(),
            "[home] restart",
            "[s] shuffle",
            "[r] repeat",
            "[v] queue",
            "[j/k/enter] queue rows",
            "[+/-] volume",
            "[f] like",
            "[ [/] ] back/forward",
            "[1/2/3] player/liked/search",
            "[i/o] log in/out",
            "[q] quit",
        ],
        Route::Liked => vec![
            "[j/k] up/down",
            "[enter] play",
            "[d] remove",
            "[space/p] play/pause",
            "[h/l] prev/next",
            "[1/3] player/search",
            "[o] sign out",
            "[q] quit",
        ],
        Route::Search => vec!["type to filter", "[up/down] select", "[enter] play", "[esc] back"],
        Route::Login => vec!["[tab] next field", "[enter] log in", "[ctrl-s] sign up", "[esc] back"],
        Route::Signup => vec!["[tab] next field", "[enter] sign up", "[ctrl-l] log in", "[esc] back"],
    };
    keys.join(" | ")
}

fn play_glyph(icon: PlayIcon) -> &'static str {
    match icon {
        PlayIcon::Play => "▶",
        PlayIcon::Pause => "⏸",
    }
}

fn volume_label(icon: VolumeIcon) -> &'static str {
    match icon {
        VolumeIcon::Muted => "muted",
        VolumeIcon::Low => "low",
        VolumeIcon::High => "high",
    }
}

/// Window of a list of `total` rows that fits `height` and keeps `selected`
/// centered when possible. Returns `(start, end, selected_in_window)`.
fn visible_window(total: usize, height: usize, selected: usize) -> (usize, usize, usize) {
    let selected = selected.min(total.saturating_sub(1));
    if total <= height || height == 0 {
        return (0, total, selected);
    }
    let half = height / 2;
    let mut start = selected.saturating_sub(half);
    if start + height > total {
        start = total - height;
    }
    (start, start + height, selected - start)
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(5);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

fn render_list(frame: &mut Frame, area: Rect, title: &str, rows: Vec<String>, selected: usize) {
    let height = area.height.saturating_sub(2) as usize;
    let (start, end, pos) = visible_window(rows.len(), height, selected);
    let total = rows.len();

    let items: Vec<ListItem> = rows
        .into_iter()
        .skip(start)
        .take(end - start)
        .map(ListItem::new)
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if total > 0 {
        state.select(Some(pos));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

/// Render the entire UI into the provided `frame`.
pub fn draw<H: PlaybackHandle>(
    frame: &mut Frame,
    app: &App<H>,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(6),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(frame.area());

    let who = app
        .user
        .as_ref()
        .map(|u| format!("signed in as {}", u.label()))
        .unwrap_or_else(|| "not signed in".to_string());
    let header = Paragraph::new(format!("{} • {}", ui_settings.header_text, who))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" allegro: {} ", app.location.route.title()))
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    draw_now_playing(frame, chunks[1], app);

    match app.location.route {
        Route::Player => draw_player(frame, chunks[2], app, ui_settings),
        Route::Liked => draw_liked(frame, chunks[2], app),
        Route::Search => draw_search(frame, chunks[2], app),
        Route::Login | Route::Signup => draw_form(frame, chunks[2], app),
    }

    let mut footer_lines = vec![Line::from(controls_text(
        app.location.route,
        controls_settings.scrub_seconds,
    ))];
    if let Some(status) = &app.status {
        footer_lines.insert(0, Line::from(status.as_str().italic()));
    }
    let footer = Paragraph::new(footer_lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(LEFT_PAD),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[3]);
}

fn draw_now_playing<H: PlaybackHandle>(frame: &mut Frame, area: Rect, app: &App<H>) {
    let view: &PlayerView = app.player.view();
    let block = Block::bordered().padding(LEFT_PAD).title(" now playing ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Length(1)])
        .split(inner);

    let heart = if app.current_liked { "♥" } else { "♡" };
    let banner = Line::from(vec![
        Span::raw(format!("{} ", play_glyph(view.play_icon))),
        Span::raw(view.banner.as_str()).bold(),
        Span::raw(format!("  {heart}")),
    ]);
    frame.render_widget(Paragraph::new(banner), rows[0]);

    let gauge = Gauge::default()
        .ratio(view.progress.clamp(0.0, 1.0))
        .label(format!("{} / {}", view.elapsed_text, view.duration_text));
    frame.render_widget(gauge, rows[1]);

    let flags = format!(
        "Shuffle: {} • Repeat: {} • Volume: {:.0}% ({})",
        if view.shuffle_active { "ON" } else { "OFF" },
        view.repeat.as_str(),
        view.volume * 100.0,
        volume_label(view.volume_icon),
    );
    frame.render_widget(Paragraph::new(flags), rows[2]);
}

fn draw_player<H: PlaybackHandle>(frame: &mut Frame, area: Rect, app: &App<H>, ui: &UiSettings) {
    let view = app.player.view();

    let (info_area, queue_area) = if view.queue_open {
        let halves = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(area);
        (halves[0], Some(halves[1]))
    } else {
        (area, None)
    };

    let mut lines = vec![
        Line::from(view.title.as_str().bold()),
        Line::from(view.artist_bar.as_str()),
    ];
    if ui.show_artwork_locators {
        lines.push(Line::from(""));
        lines.push(Line::from(format!("Cover:  {}", view.cover)));
        lines.push(Line::from(format!("Artist: {}", view.artist_img)));
    }
    let info = Paragraph::new(lines)
        .block(Block::bordered().padding(LEFT_PAD).title(" track "))
        .wrap(Wrap { trim: true });
    frame.render_widget(info, info_area);

    if let Some(queue_area) = queue_area {
        let rows = view
            .rows
            .iter()
            .map(|r| {
                let marker = if r.current { "♪" } else { " " };
                let time = r.time_label.as_deref().unwrap_or("--:--");
                format!("{marker} {} - {}  [{time}]", r.artist, r.title)
            })
            .collect();
        render_list(frame, queue_area, " queue ", rows, app.queue_selected);
    }
}

fn draw_liked<H: PlaybackHandle>(frame: &mut Frame, area: Rect, app: &App<H>) {
    if app.liked.is_empty() {
        let empty = Paragraph::new("No liked songs yet. Press f on the player to like a track.")
            .block(Block::bordered().padding(LEFT_PAD).title(" liked songs "));
        frame.render_widget(empty, area);
        return;
    }
    let rows = app
        .liked
        .iter()
        .map(|e| {
            let duration = if e.duration.is_empty() { "--:--" } else { e.duration.as_str() };
            format!("{} - {}  [{duration}]", e.artist, e.title)
        })
        .collect();
    render_list(frame, area, " liked songs ", rows, app.liked_selected);
}

fn draw_search<H: PlaybackHandle>(frame: &mut Frame, area: Rect, app: &App<H>) {
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(area);

    let input = Paragraph::new(format!("{}▏", app.search.query))
        .block(Block::bordered().padding(LEFT_PAD).title(" search "));
    frame.render_widget(input, parts[0]);

    let source = if app.search.source().is_playable() {
        " results "
    } else {
        " results (feed, not playable) "
    };
    let rows = app
        .search
        .result_tracks()
        .map(|(_, t)| t.display())
        .collect();
    render_list(frame, parts[1], source, rows, app.search.selected);
}

fn draw_form<H: PlaybackHandle>(frame: &mut Frame, area: Rect, app: &App<H>) {
    let form: &dyn AuthForm = match app.location.route {
        Route::Signup => &app.signup,
        _ => &app.login,
    };
    let validation = form.validation();

    let mut lines: Vec<Line> = Vec::new();
    for &field in form.fields() {
        let raw = form.value(field);
        let shown = if field.is_secret() {
            "•".repeat(raw.chars().count())
        } else {
            raw.to_string()
        };
        let cursor = if form.focus() == field { "▏" } else { "" };
        let mut label = Span::raw(format!("{:<18}", field.label()));
        if validation.is_invalid(field) {
            label = label.red().bold();
        } else if form.focus() == field {
            label = label.bold();
        }
        lines.push(Line::from(vec![label, Span::raw(format!("{shown}{cursor}"))]));
    }
    if let Some(message) = &validation.message {
        lines.push(Line::from(""));
        lines.push(Line::from(message.as_str().red()));
    }

    let popup = centered_rect_sized(60, lines.len() as u16 + 4, area);
    frame.render_widget(Clear, popup);
    let title = format!(" {} ", app.location.route.title());
    let body = Paragraph::new(lines)
        .block(Block::bordered().padding(LEFT_PAD).title(title))
        .wrap(Wrap { trim: false });
    frame.render_widget(body, popup);
}
