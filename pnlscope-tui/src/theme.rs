//! Color tokens and value-coloring helpers.
//!
//! Neon-on-charcoal palette: cyan accent for focus, green/pink for
//! gains/losses, orange for adjustments.

use ratatui::style::{Color, Modifier, Style};

use pnlscope_core::AnnotationKind;

pub const ACCENT: Color = Color::Rgb(0, 255, 255);
pub const POSITIVE: Color = Color::Rgb(0, 255, 128);
pub const NEGATIVE: Color = Color::Rgb(255, 20, 147);
pub const WARNING: Color = Color::Rgb(255, 140, 0);
pub const MUTED: Color = Color::Rgb(100, 149, 237);
pub const TEXT_SECONDARY: Color = Color::Rgb(170, 170, 170);

pub fn accent() -> Style {
    Style::default().fg(ACCENT)
}

pub fn accent_bold() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub fn positive() -> Style {
    Style::default().fg(POSITIVE)
}

pub fn negative() -> Style {
    Style::default().fg(NEGATIVE)
}

pub fn warning() -> Style {
    Style::default().fg(WARNING)
}

pub fn muted() -> Style {
    Style::default().fg(MUTED)
}

pub fn secondary() -> Style {
    Style::default().fg(TEXT_SECONDARY)
}

pub fn panel_border(active: bool) -> Style {
    if active {
        Style::default().fg(ACCENT)
    } else {
        Style::default().fg(MUTED)
    }
}

pub fn panel_title(active: bool) -> Style {
    if active {
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(TEXT_SECONDARY)
    }
}

/// Gains green, losses pink.
pub fn pnl_style(value: f64) -> Style {
    if value >= 0.0 {
        positive()
    } else {
        negative()
    }
}

/// Chart glyph style per annotation category.
pub fn marker_style(kind: AnnotationKind) -> Style {
    match kind {
        AnnotationKind::Adjustment => warning().add_modifier(Modifier::BOLD),
        AnnotationKind::SquareUp => negative().add_modifier(Modifier::BOLD),
        AnnotationKind::Selection => accent_bold(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pnl_coloring() {
        assert_eq!(pnl_style(100.0), positive());
        assert_eq!(pnl_style(0.0), positive());
        assert_eq!(pnl_style(-0.01), negative());
    }

    #[test]
    fn marker_styles_are_distinct() {
        let adj = marker_style(AnnotationKind::Adjustment);
        let squ = marker_style(AnnotationKind::SquareUp);
        let sel = marker_style(AnnotationKind::Selection);
        assert_ne!(adj.fg, squ.fg);
        assert_ne!(squ.fg, sel.fg);
        assert_ne!(adj.fg, sel.fg);
    }
}
