//! Named color palettes

use ratatui::style::{Color, Modifier, Style};

/// Colors used by every panel for one theme
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    pub accent: Color,
    pub text: Color,
    pub muted: Color,
    pub background: Color,
    pub title: Color,
    pub error: Color,
}

impl Palette {
    /// Palette for a theme name; unknown names get Dark
    pub fn named(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "light" => Self {
                accent: Color::Blue,
                text: Color::Black,
                muted: Color::Gray,
                background: Color::White,
                title: Color::Magenta,
                error: Color::Red,
            },
            "ocean" => Self {
                accent: Color::Cyan,
                text: Color::Rgb(200, 230, 245),
                muted: Color::Rgb(70, 110, 140),
                background: Color::Rgb(8, 24, 40),
                title: Color::LightBlue,
                error: Color::LightRed,
            },
            "forest" => Self {
                accent: Color::LightGreen,
                text: Color::Rgb(220, 235, 210),
                muted: Color::Rgb(95, 120, 85),
                background: Color::Rgb(14, 28, 14),
                title: Color::Rgb(180, 210, 120),
                error: Color::LightRed,
            },
            "amber" => Self {
                accent: Color::Yellow,
                text: Color::Rgb(255, 205, 130),
                muted: Color::Rgb(140, 100, 40),
                background: Color::Rgb(28, 18, 0),
                title: Color::Rgb(255, 170, 0),
                error: Color::Red,
            },
            _ => Self::dark(),
        }
    }

    fn dark() -> Self {
        Self {
            accent: Color::Green,
            text: Color::White,
            muted: Color::DarkGray,
            background: Color::Reset,
            title: Color::Cyan,
            error: Color::Red,
        }
    }

    pub fn base(&self) -> Style {
        Style::default().fg(self.text).bg(self.background)
    }

    pub fn border(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.accent)
        } else {
            Style::default().fg(self.muted)
        }
    }

    pub fn selected(&self, focused: bool) -> Style {
        let style = Style::default().add_modifier(Modifier::BOLD);
        if focused {
            style.fg(self.accent)
        } else {
            style.fg(self.text)
        }
    }
}
