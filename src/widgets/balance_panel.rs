//! Balance panel - total / available / frozen amounts

use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::api::types::Balance;
use crate::format;
use crate::themes::Theme;

/// Renders the balance snapshot as labeled rows.
pub struct BalancePanel {
    balance: Balance,
}

impl BalancePanel {
    pub fn new() -> Self {
        Self {
            balance: Balance::default(),
        }
    }

    /// Replace the snapshot wholesale.
    pub fn update(&mut self, balance: Balance) {
        self.balance = balance;
    }

    pub fn balance(&self) -> &Balance {
        &self.balance
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(area);

        let entries = [
            ("Total      ", self.balance.total, theme.text_primary),
            ("Available  ", self.balance.available, theme.success),
            ("Frozen     ", self.balance.frozen, theme.text_secondary),
        ];
        for (i, (label, value, color)) in entries.iter().enumerate() {
            let line = Line::from(vec![
                Span::styled(*label, Style::default().fg(theme.text_muted)),
                Span::styled(
                    format::currency(*value),
                    Style::default().fg(*color).bold(),
                ),
            ]);
            frame.render_widget(Paragraph::new(line), rows[i]);
        }
    }
}

impl Default for BalancePanel {
    fn default() -> Self {
        Self::new()
    }
}
