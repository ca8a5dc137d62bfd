//! Palette-to-style mapping for every live surface.
//!
//! [`Appearance`] is recomputed from scratch whenever the theme or the focus
//! changes, so applying the same theme twice yields an identical value.

use geeta_core::{Palette, Rgb, Theme};
use ratatui::style::{Color, Modifier, Style};

use crate::focus::{FocusController, PanelId};

/// Border and label color of unfocused panels.
pub const NEUTRAL: Color = Color::White;

pub fn color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelAppearance {
    pub label: String,
    pub border: Style,
    pub title: Style,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Appearance {
    pub theme: Theme,
    pub palette: Palette,
    panels: [PanelAppearance; 3],
    /// Screen background and default text.
    pub base: Style,
    pub status: Style,
    pub help_border: Style,
    pub help_text: Style,
    /// Selected row in any list.
    pub list_highlight: Style,
    pub overlay_border: Style,
    pub overlay_title: Style,
    pub overlay_item: Style,
    pub hint: Style,
}

impl Appearance {
    pub fn new(theme: Theme, focus: &FocusController) -> Self {
        let palette = theme.palette();
        let highlight = color(palette.highlight);

        let panels = PanelId::RING.map(|id| {
            if focus.is_focused(id) {
                PanelAppearance {
                    label: focus.label(id),
                    border: Style::default().fg(highlight),
                    title: Style::default().fg(highlight).add_modifier(Modifier::BOLD),
                }
            } else {
                PanelAppearance {
                    label: focus.label(id),
                    border: Style::default().fg(NEUTRAL),
                    title: Style::default().fg(NEUTRAL),
                }
            }
        });

        Self {
            theme,
            palette,
            panels,
            base: Style::default().fg(color(palette.fg)).bg(color(palette.bg)),
            status: Style::default()
                .fg(color(palette.fg))
                .bg(color(palette.status_bg))
                .add_modifier(Modifier::BOLD),
            help_border: Style::default().fg(highlight),
            help_text: Style::default().fg(color(palette.fg)),
            list_highlight: Style::default()
                .bg(highlight)
                .fg(color(palette.bg))
                .add_modifier(Modifier::BOLD),
            overlay_border: Style::default().fg(highlight),
            overlay_title: Style::default().fg(highlight).add_modifier(Modifier::BOLD),
            overlay_item: Style::default().fg(color(palette.fg)),
            hint: Style::default().fg(color(palette.verse)),
        }
    }

    pub fn panel(&self, id: PanelId) -> &PanelAppearance {
        let position = PanelId::RING.iter().position(|p| *p == id).unwrap_or(0);
        &self.panels[position]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn focused_panel_uses_highlight() {
        let focus = FocusController::new(PanelId::Verses);
        let look = Appearance::new(Theme::Nakula, &focus);
        let highlight = color(Theme::Nakula.palette().highlight);

        let verses = look.panel(PanelId::Verses);
        assert_eq!(verses.label, "[*] Verses");
        assert_eq!(verses.border.fg, Some(highlight));
        assert!(verses.title.add_modifier.contains(Modifier::BOLD));

        for id in [PanelId::Chapters, PanelId::Content] {
            let panel = look.panel(id);
            assert!(panel.label.starts_with("[ ]"));
            assert_eq!(panel.border.fg, Some(NEUTRAL));
            assert!(!panel.title.add_modifier.contains(Modifier::BOLD));
        }
    }

    #[test]
    fn captured_focus_leaves_every_panel_neutral() {
        let mut focus = FocusController::new(PanelId::Chapters);
        focus.capture();
        let look = Appearance::new(Theme::Bhima, &focus);
        for id in PanelId::RING {
            assert_eq!(look.panel(id).border.fg, Some(NEUTRAL));
        }
    }

    #[test]
    fn status_bar_follows_palette() {
        let focus = FocusController::new(PanelId::Chapters);
        let palette = Theme::Sahadeva.palette();
        let look = Appearance::new(Theme::Sahadeva, &focus);
        assert_eq!(look.status.fg, Some(color(palette.fg)));
        assert_eq!(look.status.bg, Some(color(palette.status_bg)));
        assert_eq!(look.help_border.fg, Some(color(palette.highlight)));
    }
}
