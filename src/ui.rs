//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock};

use crate::app::{App, MessageLevel, NowPlaying, PlaybackState, PromptKind};
use crate::config::{PlayerSettings, UiSettings};
use crate::player::{format_hms, progress_ratio};

static LIBRARY_CONTROLS: LazyLock<BTreeMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut map = BTreeMap::new();
    map.insert("j/k", "up/down");
    map.insert("gg/G", "top/bottom");
    map.insert("enter", "play");
    map.insert("a", "add file");
    map.insert("A", "add folder");
    map.insert("r", "rename");
    map.insert("d", "delete");
    map.insert("/", "search");
    map.insert("esc", "clear / close player");
    map.insert("q", "quit");
    map
});

static PLAYER_CONTROLS: LazyLock<BTreeMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut map = BTreeMap::new();
    map.insert("p", "play");
    map.insert("space", "play/pause");
    map.insert("x", "close player");
    map
});

/// Render the controls help text, incorporating the seek step.
fn controls_text(app: &App, seek_ms: u64) -> String {
    if app.confirm_delete {
        return "[y] delete | [n/esc] keep".to_string();
    }
    if app.prompt.is_some() {
        return "[enter] confirm | [esc] cancel".to_string();
    }

    let library = ["j/k", "gg/G", "enter", "a", "A", "r", "d", "/", "esc", "q"];
    let mut parts: Vec<String> = library
        .iter()
        .filter_map(|k| LIBRARY_CONTROLS.get(*k).map(|v| format!("[{k}] {v}")))
        .collect();

    if app.player_open() {
        let player = ["p", "space", "H/L", "x"];
        parts.extend(player.iter().filter_map(|k| {
            if *k == "H/L" {
                Some(format!("[H/L] seek -/+{}s", seek_ms / 1000))
            } else {
                PLAYER_CONTROLS.get(*k).map(|v| format!("[{k}] {v}"))
            }
        }));
    }
    parts.join(" | ")
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(3);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

fn left_padded<'a>(title: impl Into<Line<'a>>) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .padding(Padding {
            left: 1,
            right: 0,
            top: 0,
            bottom: 0,
        })
}

fn status_line(app: &App) -> Line<'static> {
    if let Some(msg) = &app.message {
        let color = match msg.level {
            MessageLevel::Info => Color::Green,
            MessageLevel::Warning => Color::Yellow,
            MessageLevel::Error => Color::Red,
        };
        return Line::from(Span::styled(msg.text.clone(), Style::default().fg(color)));
    }

    let mut parts: Vec<String> = vec![format!("{} entries", app.catalog.len())];
    if !app.highlighted.is_empty() {
        parts.push(format!("{} highlighted", app.highlighted.len()));
    }
    if let Some(path) = &app.catalog_path {
        parts.push(format!("Catalog: {path}"));
    }
    if let Some(reason) = &app.playback_disabled {
        parts.push(format!("Playback unavailable: {reason}"));
    }
    Line::from(parts.join(" • "))
}

fn player_gauge<'a>(now: &'a NowPlaying, playback: PlaybackState) -> Gauge<'a> {
    let name = now
        .path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let state = match playback {
        PlaybackState::Playing => "Playing",
        PlaybackState::Paused => "Paused",
        PlaybackState::Stopped => "Stopped",
    };
    let label = format!(
        "{} / {}",
        format_hms(now.time_ms),
        now.length_ms.map(format_hms).unwrap_or_else(|| "--:--:--".to_string())
    );

    Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {state}: {name} ")),
        )
        .gauge_style(Style::default().fg(Color::Green).bg(Color::DarkGray))
        .ratio(progress_ratio(now.time_ms, now.length_ms))
        .label(label)
}

/// Render the entire UI into the provided `frame` using `app` state and settings.
pub fn draw(frame: &mut Frame, app: &App, ui_settings: &UiSettings, player: &PlayerSettings) {
    let mut constraints = vec![
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Min(1),
    ];
    if app.player_open() {
        constraints.push(Constraint::Length(3));
    }
    if app.prompt.is_some() {
        constraints.push(Constraint::Length(3));
    }
    constraints.push(Constraint::Length(4));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(frame.area());
    let mut next_chunk = 3;

    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .style(Style::default().add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, chunks[0]);

    let status = Paragraph::new(status_line(app))
        .block(left_padded(" status "))
        .wrap(Wrap { trim: true });
    frame.render_widget(status, chunks[1]);

    // Main list
    if app.catalog.is_empty() {
        let empty = Paragraph::new("No media files yet. Press [a] or [A] to add some.")
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title(" media (0) "));
        frame.render_widget(empty, chunks[2]);
    } else {
        let entries = app.entries();
        let now_path = app.now_playing.as_ref().map(|n| n.path.as_path());

        // Only build ListItems for the visible window, centered on the selection.
        let total = entries.len();
        let list_height = chunks[2].height.saturating_sub(2) as usize;
        let sel_pos = app.selected.min(total.saturating_sub(1));
        let (start, end, selected_pos_in_visible) = if total <= list_height || list_height == 0 {
            (0, total, sel_pos)
        } else {
            let half = list_height / 2;
            let mut start = sel_pos.saturating_sub(half);
            if start + list_height > total {
                start = total - list_height;
            }
            (start, start + list_height, sel_pos - start)
        };

        let visible_items: Vec<ListItem> = entries[start..end]
            .iter()
            .map(|entry| {
                let mut style = Style::default();
                if app.is_highlighted(&entry.path) {
                    style = style.fg(Color::Red).add_modifier(Modifier::BOLD);
                }
                let mut spans = vec![Span::styled(entry.display_name.clone(), style)];
                if now_path == Some(entry.path.as_path()) {
                    spans.push(Span::raw("  ▶"));
                }
                ListItem::new(Line::from(spans))
            })
            .collect();

        let title = format!(" media ({}) ", total);
        let list = List::new(visible_items)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = ListState::default();
        state.select(Some(selected_pos_in_visible));
        frame.render_stateful_widget(list, chunks[2], &mut state);
    }

    if let Some(now) = &app.now_playing {
        frame.render_widget(player_gauge(now, app.playback), chunks[next_chunk]);
        next_chunk += 1;
    }

    if let Some(prompt) = &app.prompt {
        let title = match prompt.kind {
            PromptKind::AddFile | PromptKind::AddFolder => format!(
                " {} ({}) ",
                prompt.kind.title(),
                app.catalog.allow_list().extensions().join(", ")
            ),
            _ => format!(" {} ", prompt.kind.title()),
        };
        let input = Paragraph::new(format!("{}█", prompt.buffer)).block(left_padded(title));
        frame.render_widget(input, chunks[next_chunk]);
        next_chunk += 1;
    }

    let footer = Paragraph::new(controls_text(app, player.seek_ms))
        .block(left_padded(" controls "))
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[next_chunk]);

    if app.confirm_delete {
        let name = app
            .selected_entry()
            .map(|e| e.display_name.as_str())
            .unwrap_or_default();
        let popup_area = centered_rect_sized(60, 5, chunks[2]);
        frame.render_widget(Clear, popup_area);
        let confirm = Paragraph::new(format!(
            "Are you sure you want to delete this media file?\n{name}"
        ))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Confirm Delete (y/n) "),
        )
        .wrap(Wrap { trim: true });
        frame.render_widget(confirm, popup_area);
    }
}
