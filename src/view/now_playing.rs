//! Now-playing bar rendering

use ratatui::{
    layout::Rect,
    style::Style,
    text::Line,
    widgets::{Block, Borders, Gauge},
    Frame,
};

use crate::session::SessionSnapshot;
use super::theme::Palette;

pub fn render_now_playing(
    frame: &mut Frame,
    area: Rect,
    snapshot: &SessionSnapshot,
    volume: u8,
    palette: &Palette,
) {
    let status_text = now_playing_text(snapshot);

    let loop_text = match (snapshot.loop_enabled, snapshot.loop_count) {
        (false, 0) => "Loop: Off".to_string(),
        (false, n) => format!("Loop: Off ({n})"),
        (true, n) => format!("Loop: On ({n})"),
    };
    let controls_info = format!(" {loop_text} | Vol: {volume}% | H for help ");

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("{status_text} "))
                .title_bottom(Line::from(controls_info).right_aligned()),
        )
        .gauge_style(Style::default().fg(palette.accent))
        .ratio(f64::from(volume.min(100)) / 100.0)
        .label(format!("{volume}%"));

    frame.render_widget(gauge, area);
}

fn now_playing_text(snapshot: &SessionSnapshot) -> String {
    match (&snapshot.current, snapshot.playing, snapshot.paused) {
        (Some(reference), true, false) => format!(" ▶ {reference}"),
        (Some(reference), true, true) => format!(" ⏸  {reference}"),
        (Some(reference), false, _) => format!(" ■ {reference}"),
        (None, _, _) => " No track playing".to_string(),
    }
}
