//! Confirmation dialog
//!
//! Centered modal overlay used before dispatching consequential
//! commands (auto-trading toggle, large orders). Defaults to No.

use crossterm::event::KeyCode;
use ratatui::prelude::*;
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget, Wrap};

use crate::themes::Theme;

/// Result of handling a key in the dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogResult {
    /// Dialog still active, no decision yet.
    Pending,
    /// User confirmed the action.
    Confirmed,
    /// User cancelled the action.
    Cancelled,
}

/// A centered yes/no dialog with an optional detail block (used to
/// show order cost versus available balance before submitting).
pub struct ConfirmDialog {
    pub title: String,
    pub message: String,
    details: Vec<(String, String)>,
    yes_selected: bool,
}

impl ConfirmDialog {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            details: Vec::new(),
            yes_selected: false,
        }
    }

    /// Add a label/value detail line below the message.
    pub fn detail(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.push((label.into(), value.into()));
        self
    }

    /// Handle a key press, returning the dialog result.
    pub fn handle_key(&mut self, key: KeyCode) -> DialogResult {
        match key {
            KeyCode::Left | KeyCode::Right | KeyCode::Tab => {
                self.yes_selected = !self.yes_selected;
                DialogResult::Pending
            }
            KeyCode::Char('y') | KeyCode::Char('Y') => DialogResult::Confirmed,
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => DialogResult::Cancelled,
            KeyCode::Enter => {
                if self.yes_selected {
                    DialogResult::Confirmed
                } else {
                    DialogResult::Cancelled
                }
            }
            _ => DialogResult::Pending,
        }
    }

    /// Render the dialog as a centered overlay.
    pub fn render(&self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        let width = (area.width * 2 / 5).clamp(34.min(area.width), area.width);
        let height = (7 + self.details.len() as u16).min(area.height);
        let x = area.x + (area.width.saturating_sub(width)) / 2;
        let y = area.y + (area.height.saturating_sub(height)) / 2;
        let dialog_area = Rect::new(x, y, width, height);

        // Dim everything behind the dialog
        for dy in area.top()..area.bottom() {
            for dx in area.left()..area.right() {
                if let Some(cell) = buf.cell_mut((dx, dy)) {
                    if let Color::Rgb(r, g, b) = cell.fg {
                        cell.fg = Color::Rgb(r / 3, g / 3, b / 3);
                    }
                    if let Color::Rgb(r, g, b) = cell.bg {
                        cell.bg = Color::Rgb(r / 3, g / 3, b / 3);
                    }
                }
            }
        }

        Clear.render(dialog_area, buf);

        let block = Block::default()
            .title(format!(" {} ", self.title))
            .title_style(Style::default().fg(theme.warning).bold())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.warning))
            .style(Style::default().bg(theme.surface));
        let inner = block.inner(dialog_area);
        block.render(dialog_area, buf);

        if inner.height < 3 {
            return;
        }

        let mut lines = vec![Line::from(Span::styled(
            self.message.clone(),
            Style::default().fg(theme.text_primary),
        ))];
        if !self.details.is_empty() {
            lines.push(Line::from(""));
            for (label, value) in &self.details {
                lines.push(Line::from(vec![
                    Span::styled(format!("{label}: "), Style::default().fg(theme.text_muted)),
                    Span::styled(value.clone(), Style::default().fg(theme.text_secondary)),
                ]));
            }
        }
        let body_area = Rect::new(
            inner.x,
            inner.y,
            inner.width,
            inner.height.saturating_sub(2),
        );
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(body_area, buf);

        // Buttons on the last line
        let yes_style = if self.yes_selected {
            Style::default().fg(theme.background).bg(theme.warning).bold()
        } else {
            Style::default().fg(theme.text_muted)
        };
        let no_style = if self.yes_selected {
            Style::default().fg(theme.text_muted)
        } else {
            Style::default().fg(theme.background).bg(theme.accent).bold()
        };
        let buttons = Line::from(vec![
            Span::styled("  [ Yes ] ", yes_style),
            Span::raw("   "),
            Span::styled("  [ No ] ", no_style),
        ]);
        let btn_area = Rect::new(
            inner.x,
            inner.y + inner.height.saturating_sub(1),
            inner.width,
            1,
        );
        Paragraph::new(buttons)
            .alignment(Alignment::Center)
            .render(btn_area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_no_for_safety() {
        let mut dialog = ConfirmDialog::new("Confirm", "Proceed?");
        assert_eq!(dialog.handle_key(KeyCode::Enter), DialogResult::Cancelled);
    }

    #[test]
    fn tab_then_enter_confirms() {
        let mut dialog = ConfirmDialog::new("Confirm", "Proceed?");
        assert_eq!(dialog.handle_key(KeyCode::Tab), DialogResult::Pending);
        assert_eq!(dialog.handle_key(KeyCode::Enter), DialogResult::Confirmed);
    }

    #[test]
    fn shortcut_keys_decide_immediately() {
        let mut dialog = ConfirmDialog::new("Confirm", "Proceed?");
        assert_eq!(dialog.handle_key(KeyCode::Char('y')), DialogResult::Confirmed);
        assert_eq!(dialog.handle_key(KeyCode::Esc), DialogResult::Cancelled);
    }
}
