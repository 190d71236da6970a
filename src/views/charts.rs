//! Charts - price chart per symbol and timeframe
//!
//! Selection changes request a fresh series through the app; a failed
//! fetch falls back to a locally synthesized sample series so the
//! panel is never blank. Each completed load replaces the chart model
//! wholesale.

use anyhow::Result;
use chrono::{Duration as ChronoDuration, Local};
use crossterm::event::KeyCode;
use rand::Rng;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Paragraph};

use crate::api::types::ChartSeries;
use crate::api::ApiError;
use crate::themes::Theme;
use crate::ui::panels::Panel;
use crate::views::Command;
use crate::widgets::chart::PriceChart;

pub const SYMBOLS: [&str; 5] = ["BTCUSDT", "ETHUSDT", "DOTUSDT", "BNBUSDT", "SOLUSDT"];
pub const TIMEFRAMES: [&str; 4] = ["1M", "5M", "15M", "1H"];

const SAMPLE_POINTS: usize = 25;

pub struct ChartsView {
    theme: Theme,
    symbol_idx: usize,
    timeframe_idx: usize,
    chart: Option<PriceChart>,
    loading: bool,
}

impl ChartsView {
    pub fn new() -> Self {
        Self {
            theme: Theme::load(),
            symbol_idx: 0,
            timeframe_idx: 1, // 5M
            chart: None,
            loading: false,
        }
    }

    pub fn symbol(&self) -> &'static str {
        SYMBOLS[self.symbol_idx]
    }

    pub fn timeframe(&self) -> &'static str {
        TIMEFRAMES[self.timeframe_idx]
    }

    pub fn needs_load(&self) -> bool {
        self.chart.is_none() && !self.loading
    }

    pub fn set_loading(&mut self) {
        self.loading = true;
    }

    fn load_command(&self) -> Command {
        Command::LoadChart {
            symbol: self.symbol().to_string(),
            timeframe: self.timeframe().to_string(),
        }
    }

    /// Apply a completed load. Stale responses for a selection the user
    /// has already moved away from are dropped.
    pub fn apply_chart(
        &mut self,
        symbol: &str,
        timeframe: &str,
        result: Result<ChartSeries, ApiError>,
    ) {
        if symbol != self.symbol() || timeframe != self.timeframe() {
            return;
        }
        self.loading = false;
        self.chart = Some(match result {
            Ok(series) => PriceChart::new(symbol, series),
            Err(e) => {
                tracing::warn!("chart data fetch for {symbol} failed: {e}");
                PriceChart::sample(symbol, sample_series(timeframe), e.to_string())
            }
        });
    }

    pub fn chart(&self) -> Option<&PriceChart> {
        self.chart.as_ref()
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let spans = vec![
            Span::styled("[←/→]", Style::default().fg(self.theme.accent)),
            Span::styled(
                format!(" Symbol: {}  ", self.symbol()),
                Style::default().fg(self.theme.text_secondary),
            ),
            Span::styled("[f]", Style::default().fg(self.theme.accent)),
            Span::styled(
                format!(" Timeframe: {}  ", self.timeframe()),
                Style::default().fg(self.theme.text_secondary),
            ),
            Span::styled("[r]", Style::default().fg(self.theme.accent)),
            Span::styled(" Reload", Style::default().fg(self.theme.text_secondary)),
        ];
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

impl Default for ChartsView {
    fn default() -> Self {
        Self::new()
    }
}

impl super::ViewTrait for ChartsView {
    fn render(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let bg = Block::default().style(Style::default().bg(self.theme.background));
        frame.render_widget(bg, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(6), Constraint::Length(1)])
            .margin(1)
            .split(area);

        let title = match &self.chart {
            Some(chart) => chart.title(),
            None => format!("{} · {}", self.symbol(), self.timeframe()),
        };
        let panel = Panel::new(&self.theme).title(title).busy(self.loading);
        let inner = panel.inner(chunks[0]);
        frame.render_widget(panel.block(), chunks[0]);

        match &self.chart {
            Some(chart) => chart.render(inner, frame.buffer_mut(), &self.theme),
            None => {
                let msg = if self.loading {
                    format!("Loading price data for {} ({})…", self.symbol(), self.timeframe())
                } else {
                    "No chart loaded".to_string()
                };
                frame.render_widget(
                    Paragraph::new(msg).style(Style::default().fg(self.theme.text_muted)),
                    inner,
                );
            }
        }

        self.render_footer(frame, chunks[1]);
        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode) -> Result<super::ViewAction> {
        use super::ViewAction;
        match key {
            KeyCode::Left | KeyCode::Char('h') => {
                self.symbol_idx = (self.symbol_idx + SYMBOLS.len() - 1) % SYMBOLS.len();
                self.chart = None;
                Ok(ViewAction::Dispatch(self.load_command()))
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.symbol_idx = (self.symbol_idx + 1) % SYMBOLS.len();
                self.chart = None;
                Ok(ViewAction::Dispatch(self.load_command()))
            }
            KeyCode::Char('f') => {
                self.timeframe_idx = (self.timeframe_idx + 1) % TIMEFRAMES.len();
                self.chart = None;
                Ok(ViewAction::Dispatch(self.load_command()))
            }
            KeyCode::Enter => Ok(ViewAction::Dispatch(self.load_command())),
            _ => Ok(ViewAction::Continue),
        }
    }
}

/// Synthesize a placeholder series: a random walk around a base price,
/// one point per timeframe step, most recent point last.
pub fn sample_series(timeframe: &str) -> ChartSeries {
    let step_minutes: i64 = match timeframe {
        "1M" => 1,
        "15M" => 15,
        "1H" => 60,
        _ => 5,
    };

    let mut rng = rand::thread_rng();
    let mut series = ChartSeries {
        timeframe: timeframe.to_string(),
        ..Default::default()
    };

    let now = Local::now();
    let mut price = 50_000.0 + rng.gen_range(-500.0..500.0);
    for i in (0..SAMPLE_POINTS).rev() {
        let at = now - ChronoDuration::minutes(step_minutes * i as i64);
        series.labels.push(at.format("%H:%M").to_string());
        price += rng.gen_range(-250.0..250.0);
        series.prices.push(price);
    }
    series
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_series_is_fully_populated() {
        let series = sample_series("5M");
        assert_eq!(series.prices.len(), SAMPLE_POINTS);
        assert_eq!(series.labels.len(), SAMPLE_POINTS);
        assert!(!series.has_ohlc());
        assert_eq!(series.timeframe, "5M");
    }

    #[test]
    fn fetch_failure_renders_a_labeled_placeholder() {
        let mut view = ChartsView::new();
        view.set_loading();
        view.apply_chart(
            view.symbol(),
            view.timeframe(),
            Err(ApiError::Api("no data".to_string())),
        );
        let chart = view.chart().expect("placeholder chart");
        assert!(chart.is_sample());
        assert!(!chart.series.prices.is_empty());
        assert!(chart.title().contains("SAMPLE DATA"));
    }

    #[test]
    fn stale_responses_for_another_selection_are_dropped() {
        let mut view = ChartsView::new();
        view.set_loading();
        view.apply_chart("ETHUSDT", "1H", Ok(ChartSeries::default()));
        assert!(view.chart().is_none());
        assert!(view.loading);
    }
}
