//! Overlay rendering (error notification, help popup)

use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::model::UiState;
use super::theme::Palette;
use super::utils::centered_rect;

pub fn render_error_notification(frame: &mut Frame, ui_state: &UiState, palette: &Palette) {
    let Some(ref error_msg) = ui_state.error_message else {
        return;
    };
    let area = frame.area();

    let popup_width = 52u16;
    let inner_width = popup_width.saturating_sub(4).max(1) as usize;

    // Calculate how many lines the error message will take when wrapped
    let error_line_count = error_msg.chars().count().div_ceil(inner_width).max(1) as u16;
    let popup_area = centered_rect(area, popup_width, 2 + error_line_count);

    // Clear the area behind the popup first
    frame.render_widget(Clear, popup_area);

    let error_widget = Paragraph::new(error_msg.to_string())
        .style(Style::default().fg(palette.error))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.error))
                .title(" Error (Esc to dismiss) ")
                .title_style(Style::default().fg(palette.error).add_modifier(Modifier::BOLD))
                .style(palette.base()),
        );

    frame.render_widget(error_widget, popup_area);
}

pub fn render_help_popup(frame: &mut Frame, palette: &Palette) {
    let area = frame.area();

    let keybindings = [
        ("", "── Song field ──"),
        ("Enter", "Play"),
        ("Esc", "Clear field"),
        ("↑ / ↓", "Volume up / down"),
        ("Tab", "Switch to playlist"),
        ("", ""),
        ("", "── Anywhere (Ctrl+key) ──"),
        ("Ctrl+P", "Pause / Resume"),
        ("Ctrl+S / Ctrl+N", "Stop / Next"),
        ("Ctrl+A / Ctrl+X", "Add to / Clear playlist"),
        ("Ctrl+L / Ctrl+O", "Toggle loop / offline"),
        ("Ctrl+T", "Change theme"),
        ("Ctrl+Q", "Quit"),
        ("", ""),
        ("", "── Playlist ──"),
        ("↑ / ↓", "Move selection"),
        ("Space", "Pause / Resume"),
        ("S / N", "Stop / Next"),
        ("A / C", "Add song field / Clear"),
        ("Delete / X", "Remove selected"),
        ("L / O", "Toggle loop / offline"),
        ("+ / -", "Volume up / down"),
        ("T", "Change theme"),
        ("G / Esc", "Focus song field"),
        ("H", "Toggle this help"),
        ("Q", "Quit"),
    ];

    let popup_area = centered_rect(area, 62, keybindings.len() as u16 + 2);

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let lines: Vec<Line> = keybindings
        .iter()
        .map(|(key, desc)| {
            if key.is_empty() {
                // Section header or empty line
                Line::from(Span::styled(
                    format!("{desc:^38}"),
                    Style::default().fg(palette.title).add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(vec![
                    Span::styled(
                        format!("{key:>18}"),
                        Style::default().fg(palette.accent).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw("  "),
                    Span::styled(desc.to_string(), Style::default().fg(palette.text)),
                ])
            }
        })
        .collect();

    let help_text = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.title))
                .title(" Help (H or Esc to close) ")
                .title_style(Style::default().fg(palette.title).add_modifier(Modifier::BOLD))
                .style(palette.base()),
        )
        .style(palette.base());

    frame.render_widget(help_text, popup_area);
}
