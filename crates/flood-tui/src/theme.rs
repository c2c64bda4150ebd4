use crossterm::style::Color;

/// Color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    /// Background color
    pub bg: Color,
    /// Default text color
    pub fg: Color,
    /// Title and banner color
    pub title: Color,
    /// Info panel text color
    pub info: Color,
    /// Key binding text color
    pub key: Color,
    /// Border and separator color
    pub border: Color,
    /// Selected menu row background
    pub selected_bg: Color,
    /// Error and loss color
    pub error: Color,
    /// Success and win color
    pub success: Color,
    /// Cell backgrounds indexed by color value; slot 0 is the pivot marker
    pub cells: [Color; 10],
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Dark theme (default)
    pub fn dark() -> Self {
        Self {
            bg: Color::Rgb { r: 20, g: 22, b: 30 },
            fg: Color::Rgb { r: 230, g: 230, b: 240 },
            title: Color::Rgb { r: 255, g: 210, b: 100 },
            info: Color::Rgb { r: 160, g: 165, b: 185 },
            key: Color::Rgb { r: 255, g: 210, b: 100 },
            border: Color::Rgb { r: 70, g: 75, b: 90 },
            selected_bg: Color::Rgb { r: 70, g: 90, b: 140 },
            error: Color::Rgb { r: 255, g: 90, b: 90 },
            success: Color::Rgb { r: 90, g: 255, b: 130 },
            cells: [
                Color::Rgb { r: 60, g: 60, b: 70 },
                Color::DarkRed,
                Color::DarkGreen,
                Color::DarkYellow,
                Color::DarkCyan,
                Color::DarkBlue,
                Color::DarkMagenta,
                Color::Rgb { r: 200, g: 120, b: 40 },
                Color::Rgb { r: 90, g: 160, b: 220 },
                Color::Rgb { r: 150, g: 90, b: 170 },
            ],
        }
    }

    /// Background for a cell value, with everything past the palette
    /// falling onto the last slot.
    pub fn cell(&self, value: flood_core::Color) -> Color {
        self.cells[usize::from(value).min(self.cells.len() - 1)]
    }
}
