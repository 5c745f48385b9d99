// src/tui/theme.rs - Color scheme and style definitions for the TUI.

use ratatui::style::{Color, Modifier, Style};

use crate::pages::result_view::TypeClass;

pub struct Theme;

impl Theme {
    // ── Palette ──────────────────────────────────────────────────
    pub const ACCENT: Color = Color::Rgb(100, 110, 240);
    pub const WHITE: Color = Color::Rgb(240, 240, 240);
    pub const BLUE: Color = Color::Rgb(70, 130, 220);
    pub const GREEN: Color = Color::Rgb(80, 200, 120);
    pub const RED: Color = Color::Rgb(230, 80, 80);
    pub const YELLOW: Color = Color::Rgb(230, 200, 60);
    pub const GRAY: Color = Color::Rgb(120, 120, 140);
    pub const DIM: Color = Color::Rgb(80, 80, 100);
    pub const CYAN: Color = Color::Rgb(80, 200, 220);

    // ── Semantic styles ──────────────────────────────────────────

    /// Active/selected tab header.
    pub fn tab_active() -> Style {
        Style::default()
            .fg(Theme::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    pub fn tab_inactive() -> Style {
        Style::default().fg(Theme::GRAY)
    }

    /// Title bar.
    pub fn header() -> Style {
        Style::default()
            .fg(Theme::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border() -> Style {
        Style::default().fg(Theme::DIM)
    }

    /// Border of the focused input or open dialog.
    pub fn border_focus() -> Style {
        Style::default().fg(Theme::ACCENT)
    }

    pub fn text() -> Style {
        Style::default().fg(Theme::WHITE)
    }

    pub fn text_dim() -> Style {
        Style::default().fg(Theme::GRAY)
    }

    pub fn success() -> Style {
        Style::default().fg(Theme::GREEN)
    }

    pub fn warning() -> Style {
        Style::default().fg(Theme::YELLOW)
    }

    pub fn error() -> Style {
        Style::default().fg(Theme::RED)
    }

    pub fn info() -> Style {
        Style::default().fg(Theme::BLUE)
    }

    pub fn highlight() -> Style {
        Style::default()
            .fg(Theme::CYAN)
            .add_modifier(Modifier::BOLD)
    }

    pub fn table_header() -> Style {
        Style::default()
            .fg(Theme::ACCENT)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    }

    pub fn table_selected() -> Style {
        Style::default()
            .bg(Color::Rgb(40, 40, 60))
            .fg(Theme::WHITE)
    }

    pub fn key_hint() -> Style {
        Style::default().fg(Theme::ACCENT)
    }

    pub fn key_desc() -> Style {
        Style::default().fg(Theme::GRAY)
    }

    /// Inferred-type tag: numeric columns blue, everything else yellow.
    pub fn type_tag(class: TypeClass) -> Style {
        match class {
            TypeClass::Numeric => Style::default().fg(Theme::BLUE),
            TypeClass::Categorical => Style::default().fg(Theme::YELLOW),
        }
    }

    /// Missing-value count, red and bold when nonzero.
    pub fn missing(emphasis: bool) -> Style {
        if emphasis {
            Style::default().fg(Theme::RED).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Theme::GRAY)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_tag_colors() {
        assert_eq!(Theme::type_tag(TypeClass::Numeric).fg, Some(Theme::BLUE));
        assert_eq!(Theme::type_tag(TypeClass::Categorical).fg, Some(Theme::YELLOW));
    }

    #[test]
    fn test_missing_emphasis() {
        let s = Theme::missing(true);
        assert_eq!(s.fg, Some(Theme::RED));
        assert!(s.add_modifier.contains(Modifier::BOLD));
        assert_eq!(Theme::missing(false).fg, Some(Theme::GRAY));
    }

    #[test]
    fn test_tab_active_is_accent_bold() {
        let s = Theme::tab_active();
        assert_eq!(s.fg, Some(Theme::ACCENT));
        assert!(s.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_table_header_style() {
        let s = Theme::table_header();
        assert_eq!(s.fg, Some(Theme::ACCENT));
        assert!(s.add_modifier.contains(Modifier::BOLD));
        assert!(s.add_modifier.contains(Modifier::UNDERLINED));
    }

    #[test]
    fn test_error_style() {
        assert_eq!(Theme::error().fg, Some(Theme::RED));
    }
}
