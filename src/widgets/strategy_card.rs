//! Strategy card - active strategy with status badge and description

use ratatui::prelude::*;
use ratatui::widgets::{Paragraph, Wrap};

use crate::api::types::StrategyState;
use crate::format;
use crate::themes::Theme;

/// Renders the active strategy region.
pub struct StrategyCard {
    state: StrategyState,
    /// Badge follows the auto-trading engine, not just the strategy's
    /// own status string.
    engine_running: bool,
}

impl StrategyCard {
    pub fn new() -> Self {
        Self {
            state: StrategyState::default(),
            engine_running: false,
        }
    }

    /// Replace the snapshot wholesale.
    pub fn update(&mut self, state: StrategyState) {
        self.state = state;
    }

    pub fn set_engine_running(&mut self, running: bool) {
        self.engine_running = running;
    }

    pub fn state(&self) -> &StrategyState {
        &self.state
    }

    pub fn current_strategy(&self) -> &str {
        &self.state.current_strategy
    }

    /// Badge text and color for the current state.
    pub fn badge(&self, theme: &Theme) -> (&'static str, Color) {
        if self.engine_running {
            ("Active", theme.success)
        } else {
            ("Inactive", theme.warning)
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let (badge, badge_color) = self.badge(theme);

        let mut lines = vec![Line::from(vec![
            Span::styled(
                format::strategy_label(&self.state.current_strategy),
                Style::default().fg(theme.text_primary).bold(),
            ),
            Span::raw("  "),
            Span::styled(
                format!(" {badge} "),
                Style::default().fg(theme.background).bg(badge_color),
            ),
        ])];

        let description = self
            .state
            .current_description()
            .unwrap_or("No description available");
        lines.push(Line::from(Span::styled(
            description.to_string(),
            Style::default().fg(theme.text_muted),
        )));

        if !self.state.available_strategies.is_empty() {
            lines.push(Line::from(Span::styled(
                format!("{} strategies available", self.state.available_strategies.len()),
                Style::default().fg(theme.text_secondary),
            )));
        }

        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), area);
    }
}

impl Default for StrategyCard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn badge_follows_the_engine_state() {
        let theme = Theme::dark();
        let mut card = StrategyCard::new();
        assert_eq!(card.badge(&theme).0, "Inactive");

        card.set_engine_running(true);
        let (text, color) = card.badge(&theme);
        assert_eq!(text, "Active");
        assert_eq!(color, theme.success);
    }
}
