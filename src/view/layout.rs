//! Layout rendering (song bar, playlist panel, status panel)

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, ListItem, Padding, Paragraph},
    Frame,
};

use crate::model::{ActiveSection, Playlist, UiState};
use super::theme::Palette;
use super::utils::{calculate_num_width, render_scrollable_list, truncate_string};

pub fn render_top_bar(frame: &mut Frame, area: Rect, ui_state: &UiState, volume: u8, palette: &Palette) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),     // Song input
            Constraint::Length(34), // Options
        ])
        .split(area);

    let focused = ui_state.active_section == ActiveSection::SongInput;
    let (song_text, song_style) = if ui_state.song_input.is_empty() {
        ("Type a song name or URL...".to_string(), Style::default().fg(palette.muted))
    } else if focused {
        (format!("{}▏", ui_state.song_input), Style::default().fg(palette.accent))
    } else {
        (ui_state.song_input.clone(), Style::default().fg(palette.text))
    };

    let song = Paragraph::new(song_text).style(song_style).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Song ")
            .padding(Padding::horizontal(1))
            .border_style(palette.border(focused)),
    );
    frame.render_widget(song, chunks[0]);

    let flag = |on: bool| if on { "On" } else { "Off" };
    let options = Paragraph::new(format!(
        "Vol {volume}% | Offline {} | Loop {}",
        flag(ui_state.offline),
        flag(ui_state.loop_enabled)
    ))
    .style(Style::default().fg(palette.title))
    .block(Block::default().borders(Borders::ALL).title(" Options "));
    frame.render_widget(options, chunks[1]);
}

pub fn render_playlist(frame: &mut Frame, area: Rect, ui_state: &UiState, playlist: &Playlist, palette: &Palette) {
    let focused = ui_state.active_section == ActiveSection::Playlist;
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Playlist ({}) ", playlist.len()))
        .padding(Padding::horizontal(1))
        .border_style(palette.border(focused));

    if playlist.is_empty() {
        let hint = Paragraph::new("Empty. Type a song and press Ctrl+A to queue it.")
            .style(Style::default().fg(palette.muted))
            .block(block);
        frame.render_widget(hint, area);
        return;
    }

    let num_width = calculate_num_width(playlist.len());
    let title_width = (area.width as usize).saturating_sub(num_width + 6);
    let items: Vec<ListItem> = playlist
        .iter()
        .enumerate()
        .map(|(i, reference)| {
            let style = if i == ui_state.playlist_selected {
                palette.selected(focused)
            } else {
                Style::default().fg(palette.text)
            };
            let text = format!(
                "{:>num_width$} {}",
                i + 1,
                truncate_string(reference.as_str(), title_width)
            );
            ListItem::new(text).style(style)
        })
        .collect();

    render_scrollable_list(frame, area, items, Some(ui_state.playlist_selected), block);
}

pub fn render_status(frame: &mut Frame, area: Rect, ui_state: &UiState, palette: &Palette) {
    let title = if ui_state.busy_workers > 0 {
        format!(" Status (working: {}) ", ui_state.busy_workers)
    } else {
        " Status ".to_string()
    };

    // Newest lines at the bottom, oldest scroll off the top
    let visible = area.height.saturating_sub(2) as usize;
    let skip = ui_state.status_lines.len().saturating_sub(visible);
    let last = ui_state.status_lines.len().saturating_sub(1);
    let lines: Vec<Line> = ui_state
        .status_lines
        .iter()
        .enumerate()
        .skip(skip)
        .map(|(i, line)| {
            let style = if i == last {
                Style::default().fg(palette.text).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(palette.muted)
            };
            Line::from(Span::styled(line.clone(), style))
        })
        .collect();

    let status = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .padding(Padding::horizontal(1))
            .border_style(palette.border(false)),
    );
    frame.render_widget(status, area);
}
