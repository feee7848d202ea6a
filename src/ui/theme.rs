use ratatui::style::{Color, Style};

/// Foreground/background pair applied to a whole line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LineColors {
    pub fg: Color,
    pub bg: Color,
}

impl LineColors {
    pub const fn new(fg: Color, bg: Color) -> Self {
        Self { fg, bg }
    }

    pub fn style(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Theme {
    /// Terminal default colors.
    pub plain: LineColors,
    /// Used for the plan name and the percentage line.
    pub highlight: LineColors,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            plain: LineColors::new(Color::Reset, Color::Reset),
            highlight: LineColors::new(Color::Black, Color::White),
        }
    }
}
