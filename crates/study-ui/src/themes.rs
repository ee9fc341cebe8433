use ratatui::style::{Color, Modifier, Style};

/// Terminal background type detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackgroundType {
    Dark,
    Light,
    Unknown,
}

/// Detect terminal background type from the `COLORFGBG` environment variable.
///
/// The variable has the format `"foreground;background"`.  Background values
/// 0–6 are considered dark; 7–15 are considered light.  If the variable is
/// absent or unparseable, `BackgroundType::Dark` is returned.
pub fn detect_background() -> BackgroundType {
    if let Ok(val) = std::env::var("COLORFGBG") {
        if let Some(bg) = val.split(';').next_back() {
            if let Ok(bg_num) = bg.parse::<u8>() {
                return if bg_num <= 6 {
                    BackgroundType::Dark
                } else {
                    BackgroundType::Light
                };
            }
        }
    }
    BackgroundType::Dark
}

/// Styles for every part of the chart screens.
#[derive(Debug, Clone)]
pub struct Theme {
    // ── Header ───────────────────────────────────────────────────────────────
    pub header: Style,
    pub separator: Style,
    pub key_hint: Style,

    // ── Text ─────────────────────────────────────────────────────────────────
    pub text: Style,
    pub dim: Style,
    pub label: Style,
    pub value: Style,

    // ── Chart frame ──────────────────────────────────────────────────────────
    pub border: Style,
    pub axis: Style,
    /// Zero line of the change chart.
    pub zero_axis: Style,
    /// Reference-month marker and its annotation.
    pub marker: Style,

    // ── Change bars ──────────────────────────────────────────────────────────
    pub bar_fall: Style,
    pub bar_rise: Style,
    /// Bar of the target category, whichever its direction.
    pub bar_target: Style,

    // ── Legend ───────────────────────────────────────────────────────────────
    pub legend_hidden: Style,

    /// Line colours, indexed by series position (CPI first).
    pub series: Vec<Color>,
}

impl Theme {
    // ── Constructors ─────────────────────────────────────────────────────────

    /// Dark-background terminal theme (default).
    pub fn dark() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            separator: Style::default().fg(Color::DarkGray),
            key_hint: Style::default().fg(Color::Yellow),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            label: Style::default().fg(Color::Gray),
            value: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),

            border: Style::default().fg(Color::DarkGray),
            axis: Style::default().fg(Color::Gray),
            zero_axis: Style::default().fg(Color::White),
            marker: Style::default().fg(Color::Yellow),

            bar_fall: Style::default().fg(Color::Green),
            bar_rise: Style::default().fg(Color::Red),
            bar_target: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),

            legend_hidden: Style::default().fg(Color::DarkGray),

            series: vec![
                Color::Gray,
                Color::Cyan,
                Color::Magenta,
                Color::Green,
                Color::Yellow,
                Color::LightBlue,
                Color::LightRed,
                Color::LightGreen,
                Color::LightMagenta,
                Color::Blue,
            ],
        }
    }

    /// Light-background terminal theme.
    pub fn light() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            separator: Style::default().fg(Color::Gray),
            key_hint: Style::default().fg(Color::Magenta),

            text: Style::default().fg(Color::Black),
            dim: Style::default().fg(Color::Gray),
            label: Style::default().fg(Color::DarkGray),
            value: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),

            border: Style::default().fg(Color::Gray),
            axis: Style::default().fg(Color::DarkGray),
            zero_axis: Style::default().fg(Color::Black),
            marker: Style::default().fg(Color::Magenta),

            bar_fall: Style::default().fg(Color::Green),
            bar_rise: Style::default().fg(Color::Red),
            bar_target: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),

            legend_hidden: Style::default().fg(Color::Gray),

            series: vec![
                Color::DarkGray,
                Color::Blue,
                Color::Magenta,
                Color::Green,
                Color::Red,
                Color::Cyan,
                Color::Yellow,
                Color::LightBlue,
                Color::LightMagenta,
                Color::Black,
            ],
        }
    }

    /// Classic theme using only the basic 8-colour ANSI palette, no bold.
    pub fn classic() -> Self {
        Self {
            header: Style::default().fg(Color::Cyan),
            separator: Style::default().fg(Color::DarkGray),
            key_hint: Style::default().fg(Color::Yellow),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            label: Style::default().fg(Color::Gray),
            value: Style::default().fg(Color::White),

            border: Style::default().fg(Color::DarkGray),
            axis: Style::default().fg(Color::White),
            zero_axis: Style::default().fg(Color::White),
            marker: Style::default().fg(Color::Yellow),

            bar_fall: Style::default().fg(Color::Green),
            bar_rise: Style::default().fg(Color::Red),
            bar_target: Style::default().fg(Color::Cyan),

            legend_hidden: Style::default().fg(Color::DarkGray),

            series: vec![
                Color::White,
                Color::Cyan,
                Color::Magenta,
                Color::Green,
                Color::Yellow,
                Color::Blue,
                Color::Red,
            ],
        }
    }

    /// Choose a theme automatically based on the detected terminal background.
    pub fn auto_detect() -> Self {
        match detect_background() {
            BackgroundType::Light => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Construct a theme by name.  Falls back to `auto_detect` for unknown
    /// names.
    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            "dark" => Self::dark(),
            "classic" => Self::classic(),
            _ => Self::auto_detect(),
        }
    }

    // ── Style helpers ────────────────────────────────────────────────────────

    /// Colour of the series at `index`, cycling through the palette.
    pub fn series_color(&self, index: usize) -> Color {
        if self.series.is_empty() {
            return Color::Reset;
        }
        self.series[index % self.series.len()]
    }

    /// Bar style for a price change; the target is always highlighted.
    pub fn change_style(&self, change: f64, is_target: bool) -> Style {
        if is_target {
            self.bar_target
        } else if change < 0.0 {
            self.bar_fall
        } else {
            self.bar_rise
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
