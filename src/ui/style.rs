//! Colors and modifiers.
//!
//! The preview uses semantic ANSI colors so it follows the terminal's own
//! palette. The editor takes its colors from the selected theme.

use ratatui::style::{Color, Modifier, Style};

use crate::render::{InlineStyle, LineKind};
use crate::theme::{Palette, Rgb};

pub const fn color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

/// Base style for a preview line.
pub fn style_for_line_kind(kind: LineKind) -> Style {
    match kind {
        LineKind::Heading(1) => Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        LineKind::Heading(2) => Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
        LineKind::Heading(3) => Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
        LineKind::Heading(4) => Style::default()
            .fg(Color::Blue)
            .add_modifier(Modifier::BOLD),
        LineKind::Heading(_) => Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::BOLD),
        LineKind::Code => Style::default().fg(Color::Indexed(245)),
        LineKind::Quote => Style::default()
            .fg(Color::Blue)
            .add_modifier(Modifier::ITALIC),
        LineKind::Rule => Style::default()
            .fg(Color::Indexed(240))
            .add_modifier(Modifier::DIM),
        LineKind::Image => Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::ITALIC),
        LineKind::ListItem | LineKind::Table | LineKind::Paragraph | LineKind::Blank => {
            Style::default()
        }
    }
}

/// Merge a span's inline style over its line style.
pub fn style_for_inline(base: Style, inline: InlineStyle) -> Style {
    let mut style = base;
    if inline.emphasis {
        style = style.add_modifier(Modifier::ITALIC);
    }
    if inline.strong {
        style = style.add_modifier(Modifier::BOLD);
    }
    if inline.strikethrough {
        style = style.add_modifier(Modifier::CROSSED_OUT);
    }
    if inline.link {
        style = style.fg(Color::LightBlue).add_modifier(Modifier::UNDERLINED);
    }
    if inline.code {
        style = style.fg(Color::LightRed).bg(Color::Indexed(236));
    }
    style
}

/// Editor colors: `(text, gutter, cursor)`.
pub fn editor_styles(palette: Option<Palette>) -> (Style, Style, Style) {
    palette.map_or_else(
        || {
            (
                Style::default(),
                Style::default().fg(Color::DarkGray),
                Style::default().bg(Color::White).fg(Color::Black),
            )
        },
        |p| {
            (
                Style::default().fg(color(p.foreground)).bg(color(p.background)),
                Style::default().fg(color(p.gutter)).bg(color(p.background)),
                Style::default().fg(color(p.background)).bg(color(p.cursor)),
            )
        },
    )
}

/// Border color for a pane, highlighted when focused.
pub fn border_style(focused: bool, palette: Option<Palette>) -> Style {
    match (focused, palette) {
        (false, _) => Style::default(),
        (true, Some(p)) => Style::default().fg(color(p.accent)),
        (true, None) => Style::default().fg(Color::Yellow),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headings_are_bold() {
        for level in 1..=6 {
            let style = style_for_line_kind(LineKind::Heading(level));
            assert!(style.add_modifier.contains(Modifier::BOLD));
        }
    }

    #[test]
    fn test_inline_styles_stack() {
        let inline = InlineStyle {
            strong: true,
            emphasis: true,
            strikethrough: true,
            ..InlineStyle::default()
        };
        let style = style_for_inline(Style::default(), inline);
        assert!(style.add_modifier.contains(Modifier::BOLD));
        assert!(style.add_modifier.contains(Modifier::ITALIC));
        assert!(style.add_modifier.contains(Modifier::CROSSED_OUT));
    }

    #[test]
    fn test_links_are_underlined() {
        let inline = InlineStyle {
            link: true,
            ..InlineStyle::default()
        };
        let style = style_for_inline(Style::default(), inline);
        assert!(style.add_modifier.contains(Modifier::UNDERLINED));
        assert_eq!(style.fg, Some(Color::LightBlue));
    }

    #[test]
    fn test_palette_colors_the_editor() {
        let (text, _, cursor) = editor_styles(Some(Palette::DARK));
        assert_eq!(text.bg, Some(color(Palette::DARK.background)));
        assert_eq!(cursor.bg, Some(color(Palette::DARK.cursor)));
        let (plain, _, _) = editor_styles(None);
        assert_eq!(plain.bg, None);
    }
}
