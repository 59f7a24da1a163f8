use std::sync::OnceLock;

use ratatui::style::{Color, Modifier, Style};
use serde::Deserialize;

use crate::planner::{EventKind, GradeBand, Phase, Priority, SubjectColor};

static THEME: OnceLock<Theme> = OnceLock::new();

/// Install the theme built from the config file. Only the first call wins.
pub fn init(config: &ThemeConfig) {
    let _ = THEME.set(config.clone().into_theme());
}

/// Get the active theme, falling back to the default palette.
pub fn current() -> &'static Theme {
    THEME.get_or_init(Theme::default)
}

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub today: Style,
    pub selected: Style,
    pub header: Style,
    pub dim: Style,
    pub border: Style,
    pub status: Style,
    pub highlight: Style,
    pub accent: Color,
    pub focus: Color,
    pub rest: Color,
    pub error: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            today: Style::default().fg(Color::Black).bg(Color::Yellow),
            selected: Style::default().fg(Color::Black).bg(Color::Cyan),
            header: Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            dim: Style::default().fg(Color::DarkGray),
            border: Style::default().fg(Color::Gray),
            status: Style::default().fg(Color::White).bg(Color::DarkGray),
            highlight: Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD),
            accent: Color::Cyan,
            focus: Color::Blue,
            rest: Color::Green,
            error: Color::Red,
        }
    }
}

impl Theme {
    /// Get a built-in preset by name.
    pub fn preset(name: &str) -> Self {
        match name {
            "dracula" => Self::dracula(),
            "gruvbox" => Self::gruvbox(),
            "nord" => Self::nord(),
            _ => Self::default(),
        }
    }

    fn dracula() -> Self {
        let bg = Color::Rgb(68, 71, 90);
        let fg = Color::Rgb(248, 248, 242);
        Self {
            name: "dracula".to_string(),
            today: Style::default().fg(Color::Black).bg(Color::Rgb(189, 147, 249)),
            selected: Style::default().fg(Color::Black).bg(Color::Rgb(139, 233, 253)),
            header: Style::default().fg(fg).add_modifier(Modifier::BOLD),
            dim: Style::default().fg(Color::Rgb(98, 114, 164)),
            border: Style::default().fg(bg),
            status: Style::default().fg(fg).bg(bg),
            highlight: Style::default().bg(bg).add_modifier(Modifier::BOLD),
            accent: Color::Rgb(255, 121, 198),
            focus: Color::Rgb(189, 147, 249),
            rest: Color::Rgb(80, 250, 123),
            error: Color::Rgb(255, 85, 85),
        }
    }

    fn gruvbox() -> Self {
        let bg = Color::Rgb(80, 73, 69);
        let fg = Color::Rgb(235, 219, 178);
        Self {
            name: "gruvbox".to_string(),
            today: Style::default().fg(Color::Black).bg(Color::Rgb(250, 189, 47)),
            selected: Style::default().fg(Color::Black).bg(Color::Rgb(131, 165, 152)),
            header: Style::default().fg(fg).add_modifier(Modifier::BOLD),
            dim: Style::default().fg(Color::Rgb(146, 131, 116)),
            border: Style::default().fg(Color::Rgb(102, 92, 84)),
            status: Style::default().fg(fg).bg(bg),
            highlight: Style::default().bg(bg).add_modifier(Modifier::BOLD),
            accent: Color::Rgb(254, 128, 25),
            focus: Color::Rgb(131, 165, 152),
            rest: Color::Rgb(184, 187, 38),
            error: Color::Rgb(251, 73, 52),
        }
    }

    fn nord() -> Self {
        let bg = Color::Rgb(67, 76, 94);
        let fg = Color::Rgb(229, 233, 240);
        Self {
            name: "nord".to_string(),
            today: Style::default().fg(Color::Black).bg(Color::Rgb(235, 203, 139)),
            selected: Style::default().fg(Color::Black).bg(Color::Rgb(136, 192, 208)),
            header: Style::default().fg(fg).add_modifier(Modifier::BOLD),
            dim: Style::default().fg(Color::Rgb(76, 86, 106)),
            border: Style::default().fg(bg),
            status: Style::default().fg(fg).bg(bg),
            highlight: Style::default().bg(bg).add_modifier(Modifier::BOLD),
            accent: Color::Rgb(136, 192, 208),
            focus: Color::Rgb(129, 161, 193),
            rest: Color::Rgb(163, 190, 140),
            error: Color::Rgb(191, 97, 106),
        }
    }

    pub fn phase_color(&self, phase: Phase) -> Color {
        if phase.is_break() {
            self.rest
        } else {
            self.focus
        }
    }
}

pub fn subject_color(color: SubjectColor) -> Color {
    match color {
        SubjectColor::Blue => Color::Rgb(59, 130, 246),
        SubjectColor::Green => Color::Rgb(34, 197, 94),
        SubjectColor::Purple => Color::Rgb(168, 85, 247),
        SubjectColor::Red => Color::Rgb(239, 68, 68),
        SubjectColor::Yellow => Color::Rgb(234, 179, 8),
        SubjectColor::Indigo => Color::Rgb(99, 102, 241),
        SubjectColor::Pink => Color::Rgb(236, 72, 153),
        SubjectColor::Teal => Color::Rgb(20, 184, 166),
    }
}

pub fn band_color(band: GradeBand) -> Color {
    match band {
        GradeBand::Excellent => Color::Green,
        GradeBand::Good => Color::Blue,
        GradeBand::Average => Color::Yellow,
        GradeBand::NeedsImprovement => Color::Red,
    }
}

pub fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::High => Color::Red,
        Priority::Medium => Color::Yellow,
        Priority::Low => Color::Green,
    }
}

pub fn event_kind_color(kind: EventKind) -> Color {
    match kind {
        EventKind::Exam => Color::Red,
        EventKind::Assignment => Color::Blue,
        EventKind::Project => Color::Magenta,
        EventKind::Class => Color::Green,
        EventKind::Other => Color::Gray,
    }
}

// ── TOML config types ──

/// `[theme]` table of the config file.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ThemeConfig {
    pub preset: Option<String>,
    pub today_fg: Option<String>,
    pub today_bg: Option<String>,
    pub selected_fg: Option<String>,
    pub selected_bg: Option<String>,
    pub header_fg: Option<String>,
    pub dim_fg: Option<String>,
    pub border_fg: Option<String>,
    pub status_fg: Option<String>,
    pub status_bg: Option<String>,
    pub accent: Option<String>,
    pub focus: Option<String>,
    pub rest: Option<String>,
}

impl ThemeConfig {
    pub fn into_theme(self) -> Theme {
        let mut theme = self
            .preset
            .as_deref()
            .map(Theme::preset)
            .unwrap_or_default();

        let color = |value: &Option<String>| value.as_deref().and_then(parse_color);

        if let Some(c) = color(&self.today_fg) {
            theme.today = theme.today.fg(c);
        }
        if let Some(c) = color(&self.today_bg) {
            theme.today = theme.today.bg(c);
        }
        if let Some(c) = color(&self.selected_fg) {
            theme.selected = theme.selected.fg(c);
        }
        if let Some(c) = color(&self.selected_bg) {
            theme.selected = theme.selected.bg(c);
        }
        if let Some(c) = color(&self.header_fg) {
            theme.header = theme.header.fg(c);
        }
        if let Some(c) = color(&self.dim_fg) {
            theme.dim = theme.dim.fg(c);
        }
        if let Some(c) = color(&self.border_fg) {
            theme.border = theme.border.fg(c);
        }
        if let Some(c) = color(&self.status_fg) {
            theme.status = theme.status.fg(c);
        }
        if let Some(c) = color(&self.status_bg) {
            theme.status = theme.status.bg(c);
        }
        if let Some(c) = color(&self.accent) {
            theme.accent = c;
        }
        if let Some(c) = color(&self.focus) {
            theme.focus = c;
        }
        if let Some(c) = color(&self.rest) {
            theme.rest = c;
        }

        theme
    }
}

/// Parse a color string: hex "#rrggbb", or named colors.
fn parse_color(s: &str) -> Option<Color> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix('#') {
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        return Some(Color::Rgb(r, g, b));
    }
    match s.to_lowercase().as_str() {
        "black" => Some(Color::Black),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "blue" => Some(Color::Blue),
        "magenta" => Some(Color::Magenta),
        "cyan" => Some(Color::Cyan),
        "white" => Some(Color::White),
        "gray" | "grey" => Some(Color::Gray),
        "darkgray" | "darkgrey" => Some(Color::DarkGray),
        "lightred" => Some(Color::LightRed),
        "lightgreen" => Some(Color::LightGreen),
        "lightyellow" => Some(Color::LightYellow),
        "lightblue" => Some(Color::LightBlue),
        "lightmagenta" => Some(Color::LightMagenta),
        "lightcyan" => Some(Color::LightCyan),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_and_names() {
        assert_eq!(parse_color("#ff8000"), Some(Color::Rgb(255, 128, 0)));
        assert_eq!(parse_color(" DarkGrey "), Some(Color::DarkGray));
        assert_eq!(parse_color("#ff80"), None);
        assert_eq!(parse_color("chartreuse"), None);
    }

    #[test]
    fn overrides_apply_on_top_of_preset() {
        let config: ThemeConfig = toml::from_str(
            r##"
            preset = "nord"
            accent = "#010203"
            "##,
        )
        .unwrap();
        let theme = config.into_theme();
        assert_eq!(theme.name, "nord");
        assert_eq!(theme.accent, Color::Rgb(1, 2, 3));
        assert_eq!(theme.rest, Color::Rgb(163, 190, 140));
    }

    #[test]
    fn unknown_preset_falls_back_to_default() {
        assert_eq!(Theme::preset("solarized").name, "default");
    }
}
