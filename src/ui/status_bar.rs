//! Status bar
//!
//! Single-row bar at the bottom of the screen: service connectivity,
//! auto-trading state, last pushed price, clock, and the help hint.

use chrono::Local;
use ratatui::prelude::*;
use ratatui::widgets::{Paragraph, Widget};

use crate::themes::Theme;

/// Bottom status bar.
pub struct StatusBar<'a> {
    theme: &'a Theme,
    connected: bool,
    auto_trading: bool,
    metrics: Vec<(String, String)>,
}

impl<'a> StatusBar<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self {
            theme,
            connected: false,
            auto_trading: false,
            metrics: Vec::new(),
        }
    }

    /// Push-channel connectivity.
    pub fn connected(mut self, connected: bool) -> Self {
        self.connected = connected;
        self
    }

    /// Auto-trading engine state.
    pub fn auto_trading(mut self, enabled: bool) -> Self {
        self.auto_trading = enabled;
        self
    }

    /// Add a label/value metric (e.g. last pushed price).
    pub fn metric(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.metrics.push((label.into(), value.into()));
        self
    }

    fn build_content(&self) -> Line<'a> {
        let sep = Span::styled(" │ ", Style::default().fg(self.theme.border));
        let mut spans = vec![Span::styled(
            "◆ TRADEPULSE",
            Style::default().fg(self.theme.accent).bold(),
        )];

        // Connectivity indicator
        spans.push(sep.clone());
        let label = if self.connected {
            "Connected"
        } else {
            "Disconnected"
        };
        spans.push(Span::styled(
            format!("{} {label}", self.theme.status_dot(self.connected)),
            Style::default().fg(self.theme.status_color(label)),
        ));

        // Auto-trading indicator
        spans.push(sep.clone());
        let color = if self.auto_trading {
            self.theme.success
        } else {
            self.theme.text_muted
        };
        spans.push(Span::styled(
            format!("{} Auto", self.theme.status_dot(self.auto_trading)),
            Style::default().fg(color),
        ));

        for (label, value) in &self.metrics {
            spans.push(sep.clone());
            spans.push(Span::styled(
                format!("{label}: "),
                Style::default().fg(self.theme.text_secondary),
            ));
            let value_color = if value.starts_with('+') {
                self.theme.success
            } else if value.starts_with('-') {
                self.theme.error
            } else {
                self.theme.text_primary
            };
            spans.push(Span::styled(
                value.clone(),
                Style::default().fg(value_color),
            ));
        }

        spans.push(sep.clone());
        spans.push(Span::styled(
            Local::now().format("%H:%M:%S").to_string(),
            Style::default().fg(self.theme.text_muted),
        ));

        spans.push(sep);
        spans.push(Span::styled(
            "[?] Help",
            Style::default().fg(self.theme.text_muted),
        ));

        Line::from(spans)
    }
}

impl<'a> Widget for StatusBar<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bg_style = Style::default().bg(self.theme.surface);
        for x in area.left()..area.right() {
            if let Some(cell) = buf.cell_mut((x, area.y)) {
                cell.set_style(bg_style);
            }
        }
        Paragraph::new(self.build_content()).render(area, buf);
    }
}
