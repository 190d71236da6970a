//! Overview - the poll-refreshed main dashboard
//!
//! Balance, open positions, auto-trading state, active strategy, and a
//! live price sparkline fed by the push channel. Every region applies
//! its own fetch result independently: a failed refresh leaves that
//! region's prior snapshot on screen and marks its panel.

use anyhow::Result;
use crossterm::event::KeyCode;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Paragraph};

use crate::api::stream::PriceUpdate;
use crate::api::types::{AutoTradingStatus, Balance, Position, StrategyState};
use crate::api::ApiError;
use crate::format;
use crate::themes::Theme;
use crate::ui::panels::{Panel, PanelStyle};
use crate::widgets::balance_panel::BalancePanel;
use crate::widgets::chart::Sparkline;
use crate::widgets::position_table::PositionTable;
use crate::widgets::strategy_card::StrategyCard;

pub struct OverviewView {
    theme: Theme,
    balance: BalancePanel,
    positions: PositionTable,
    strategy: StrategyCard,
    auto_trading: AutoTradingStatus,
    ticker: Sparkline,
    ticker_symbol: String,
    last_update: std::time::Instant,
    // Per-region staleness after a failed refresh
    balance_stale: bool,
    positions_stale: bool,
    strategy_stale: bool,
}

impl OverviewView {
    pub fn new() -> Self {
        Self {
            theme: Theme::load(),
            balance: BalancePanel::new(),
            positions: PositionTable::new(),
            strategy: StrategyCard::new(),
            auto_trading: AutoTradingStatus::default(),
            ticker: Sparkline::new(240),
            ticker_symbol: String::new(),
            last_update: std::time::Instant::now(),
            balance_stale: false,
            positions_stale: false,
            strategy_stale: false,
        }
    }

    pub fn apply_balance(&mut self, result: Result<Balance, ApiError>) {
        match result {
            Ok(balance) => {
                self.balance.update(balance);
                self.balance_stale = false;
                self.last_update = std::time::Instant::now();
            }
            Err(e) => {
                tracing::warn!("balance refresh failed: {e}");
                self.balance_stale = true;
            }
        }
    }

    pub fn apply_positions(&mut self, result: Result<Vec<Position>, ApiError>) {
        match result {
            Ok(positions) => {
                self.positions.update(positions);
                self.positions_stale = false;
            }
            Err(e) => {
                tracing::warn!("positions refresh failed: {e}");
                self.positions_stale = true;
            }
        }
    }

    pub fn apply_auto_trading(&mut self, result: Result<AutoTradingStatus, ApiError>) {
        match result {
            Ok(status) => {
                self.strategy.set_engine_running(status.is_running);
                self.auto_trading = status;
            }
            Err(e) => tracing::warn!("auto-trading status refresh failed: {e}"),
        }
    }

    pub fn apply_strategy(&mut self, result: Result<StrategyState, ApiError>) {
        match result {
            Ok(state) => {
                self.strategy.update(state);
                self.strategy_stale = false;
            }
            Err(e) => {
                tracing::warn!("strategy refresh failed: {e}");
                self.strategy_stale = true;
            }
        }
    }

    /// Feed a pushed price into the live ticker.
    pub fn push_price(&mut self, update: &PriceUpdate) {
        if self.ticker_symbol != update.symbol {
            self.ticker_symbol = update.symbol.clone();
            self.ticker = Sparkline::new(240);
        }
        self.ticker.push(update.price);
    }

    pub fn auto_trading_running(&self) -> bool {
        self.auto_trading.is_running
    }

    pub fn available_balance(&self) -> f64 {
        self.balance.balance().available
    }

    pub fn current_strategy(&self) -> String {
        self.strategy.current_strategy().to_string()
    }

    fn region_style(stale: bool) -> PanelStyle {
        if stale {
            PanelStyle::Error
        } else {
            PanelStyle::Default
        }
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let spans = vec![
            Span::styled("[↑/↓]", Style::default().fg(self.theme.accent)),
            Span::styled(" Select  ", Style::default().fg(self.theme.text_secondary)),
            Span::styled("[s]", Style::default().fg(self.theme.accent)),
            Span::styled(
                format!(" Sort: {}  ", self.positions.sort_label()),
                Style::default().fg(self.theme.text_secondary),
            ),
            Span::styled("[a]", Style::default().fg(self.theme.accent)),
            Span::styled(" Auto-trading  ", Style::default().fg(self.theme.text_secondary)),
            Span::styled("[t]", Style::default().fg(self.theme.accent)),
            Span::styled(" Test strategy  ", Style::default().fg(self.theme.text_secondary)),
            Span::styled(
                format!("│ Updated {:.0}s ago", self.last_update.elapsed().as_secs_f64()),
                Style::default().fg(self.theme.text_muted),
            ),
        ];
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

impl Default for OverviewView {
    fn default() -> Self {
        Self::new()
    }
}

impl super::ViewTrait for OverviewView {
    fn render(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let bg = Block::default().style(Style::default().bg(self.theme.background));
        frame.render_widget(bg, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(7), // Balance + Strategy
                Constraint::Length(4), // Live ticker
                Constraint::Min(6),    // Positions
                Constraint::Length(1), // Footer
            ])
            .margin(1)
            .split(area);

        let top = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(chunks[0]);

        let balance_panel = Panel::new(&self.theme)
            .title("Balance")
            .style(Self::region_style(self.balance_stale));
        let inner = balance_panel.inner(top[0]);
        frame.render_widget(balance_panel.block(), top[0]);
        self.balance.render(frame, inner, &self.theme);

        let strategy_panel = Panel::new(&self.theme)
            .title("Active Strategy")
            .style(Self::region_style(self.strategy_stale));
        let inner = strategy_panel.inner(top[1]);
        frame.render_widget(strategy_panel.block(), top[1]);
        self.strategy.render(frame, inner, &self.theme);

        let ticker_title = if self.ticker_symbol.is_empty() {
            "Live".to_string()
        } else {
            match self.ticker.last() {
                Some(price) => format!("Live · {} {}", self.ticker_symbol, format::currency(price)),
                None => format!("Live · {}", self.ticker_symbol),
            }
        };
        let ticker_panel = Panel::new(&self.theme).title(ticker_title);
        let inner = ticker_panel.inner(chunks[1]);
        frame.render_widget(ticker_panel.block(), chunks[1]);
        if self.ticker.is_empty() {
            frame.render_widget(
                Paragraph::new("Waiting for price updates…")
                    .style(Style::default().fg(self.theme.text_muted)),
                inner,
            );
        } else {
            self.ticker.render(inner, frame.buffer_mut(), self.theme.accent);
        }

        let positions_panel = Panel::new(&self.theme)
            .title(format!("Positions ({})", self.positions.len()))
            .style(Self::region_style(self.positions_stale));
        let inner = positions_panel.inner(chunks[2]);
        frame.render_widget(positions_panel.block(), chunks[2]);
        self.positions.render(inner, frame.buffer_mut(), &self.theme);

        self.render_footer(frame, chunks[3]);
        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode) -> Result<super::ViewAction> {
        use super::ViewAction;
        match key {
            KeyCode::Up | KeyCode::Char('k') => self.positions.up(),
            KeyCode::Down | KeyCode::Char('j') => self.positions.down(),
            KeyCode::Char('s') => self.positions.cycle_sort(),
            _ => {}
        }
        Ok(ViewAction::Continue)
    }
}
