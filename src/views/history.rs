//! History - immutable trade-history snapshot

use anyhow::Result;
use crossterm::event::KeyCode;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Paragraph};

use crate::api::types::HistoryEntry;
use crate::api::ApiError;
use crate::themes::Theme;
use crate::ui::panels::{Panel, PanelStyle};
use crate::widgets::history_table::HistoryTable;

pub struct HistoryView {
    theme: Theme,
    table: HistoryTable,
    stale: bool,
    loaded: bool,
}

impl HistoryView {
    pub fn new() -> Self {
        Self {
            theme: Theme::load(),
            table: HistoryTable::new(),
            stale: false,
            loaded: false,
        }
    }

    pub fn apply_history(&mut self, result: Result<Vec<HistoryEntry>, ApiError>) {
        match result {
            Ok(entries) => {
                self.table.update(entries);
                self.stale = false;
                self.loaded = true;
            }
            Err(e) => {
                tracing::warn!("history refresh failed: {e}");
                self.stale = true;
            }
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }
}

impl Default for HistoryView {
    fn default() -> Self {
        Self::new()
    }
}

impl super::ViewTrait for HistoryView {
    fn render(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let bg = Block::default().style(Style::default().bg(self.theme.background));
        frame.render_widget(bg, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(4), Constraint::Length(1)])
            .margin(1)
            .split(area);

        let style = if self.stale {
            PanelStyle::Error
        } else {
            PanelStyle::Default
        };
        let panel = Panel::new(&self.theme)
            .title(format!("Trade History ({})", self.table.len()))
            .style(style);
        let inner = panel.inner(chunks[0]);
        frame.render_widget(panel.block(), chunks[0]);
        self.table.render(inner, frame.buffer_mut(), &self.theme);

        let footer = Line::from(vec![
            Span::styled("[↑/↓]", Style::default().fg(self.theme.accent)),
            Span::styled(" Scroll  ", Style::default().fg(self.theme.text_secondary)),
            Span::styled("[r]", Style::default().fg(self.theme.accent)),
            Span::styled(" Refresh", Style::default().fg(self.theme.text_secondary)),
        ]);
        frame.render_widget(Paragraph::new(footer), chunks[1]);
        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode) -> Result<super::ViewAction> {
        use super::ViewAction;
        match key {
            KeyCode::Up | KeyCode::Char('k') => self.table.scroll_up(),
            KeyCode::Down | KeyCode::Char('j') => self.table.scroll_down(),
            _ => {}
        }
        Ok(ViewAction::Continue)
    }
}
