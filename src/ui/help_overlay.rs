//! Help overlay
//!
//! Centered keybinding reference, toggled with `?`. Any key closes it.

use ratatui::prelude::*;
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget};

use crate::themes::Theme;

const BINDINGS: &[(&str, &str)] = &[
    ("Tab / 1-6", "Switch view"),
    ("r", "Refresh current view"),
    ("a", "Toggle auto-trading"),
    ("j/k, ↑/↓", "Navigate lists and forms"),
    ("Enter", "Edit field / run action"),
    ("s", "Save (settings view) / cycle sort (overview)"),
    ("t", "Test active strategy"),
    ("Esc", "Cancel / back"),
    ("q", "Quit"),
];

/// Toggleable keybinding overlay.
pub struct HelpOverlay {
    pub visible: bool,
}

impl HelpOverlay {
    pub fn new() -> Self {
        Self { visible: false }
    }

    pub fn show(&mut self) {
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        if !self.visible {
            return;
        }

        let width = 48.min(area.width.saturating_sub(4));
        let height = (BINDINGS.len() as u16 + 4).min(area.height.saturating_sub(2));
        let x = area.x + (area.width.saturating_sub(width)) / 2;
        let y = area.y + (area.height.saturating_sub(height)) / 2;
        let overlay = Rect::new(x, y, width, height);

        Clear.render(overlay, buf);
        let block = Block::default()
            .title(" Keybindings ")
            .title_style(Style::default().fg(theme.accent).bold())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.border_focused))
            .style(Style::default().bg(theme.surface));
        let inner = block.inner(overlay);
        block.render(overlay, buf);

        let mut lines = Vec::with_capacity(BINDINGS.len() + 2);
        for (key, desc) in BINDINGS {
            lines.push(Line::from(vec![
                Span::styled(
                    format!(" {key:<12}"),
                    Style::default().fg(theme.accent),
                ),
                Span::styled(*desc, Style::default().fg(theme.text_secondary)),
            ]));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            " press any key to close",
            Style::default().fg(theme.text_muted),
        )));

        Paragraph::new(lines).render(inner, buf);
    }
}

impl Default for HelpOverlay {
    fn default() -> Self {
        Self::new()
    }
}
