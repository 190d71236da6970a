//! Analysis - technical indicator snapshot per symbol
//!
//! On-demand RSI/MACD/Bollinger readout with the same classification
//! rules the service's own signals use.

use anyhow::Result;
use crossterm::event::KeyCode;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Paragraph};

use crate::api::types::Analysis;
use crate::api::ApiError;
use crate::format;
use crate::themes::Theme;
use crate::ui::panels::Panel;
use crate::views::charts::SYMBOLS;
use crate::views::Command;

/// RSI classification thresholds.
const RSI_OVERBOUGHT: f64 = 70.0;
const RSI_OVERSOLD: f64 = 30.0;

/// Combined BUY/SELL/HOLD recommendation from RSI and MACD.
pub fn recommendation(rsi: f64, macd_line: f64, macd_signal: f64) -> &'static str {
    if rsi < RSI_OVERSOLD && macd_line > macd_signal {
        "BUY"
    } else if rsi > RSI_OVERBOUGHT && macd_line < macd_signal {
        "SELL"
    } else {
        "HOLD"
    }
}

fn rsi_status(rsi: f64) -> &'static str {
    if rsi > RSI_OVERBOUGHT {
        "Overbought"
    } else if rsi < RSI_OVERSOLD {
        "Oversold"
    } else {
        "Neutral"
    }
}

pub struct AnalysisView {
    theme: Theme,
    symbol_idx: usize,
    result: Option<Analysis>,
    loading: bool,
}

impl AnalysisView {
    pub fn new() -> Self {
        Self {
            theme: Theme::load(),
            symbol_idx: 0,
            result: None,
            loading: false,
        }
    }

    pub fn symbol(&self) -> &'static str {
        SYMBOLS[self.symbol_idx]
    }

    pub fn set_loading(&mut self) {
        self.loading = true;
    }

    /// Apply a completed run. Only one request is ever in flight, so
    /// the busy flag always clears; the payload is discarded when the
    /// user has already moved to another symbol.
    pub fn apply_analysis(&mut self, symbol: &str, result: Result<Analysis, ApiError>) {
        self.loading = false;
        if symbol != self.symbol() {
            return;
        }
        match result {
            Ok(analysis) => self.result = Some(analysis),
            Err(e) => tracing::warn!("analysis for {symbol} failed: {e}"),
        }
    }

    fn render_result(&self, frame: &mut Frame, area: Rect, analysis: &Analysis) {
        let theme = &self.theme;
        let rsi = analysis.rsi;
        let macd = &analysis.macd;
        let bands = &analysis.bollinger_bands;

        let rsi_color = match rsi_status(rsi) {
            "Overbought" => theme.error,
            "Oversold" => theme.success,
            _ => theme.warning,
        };
        let (macd_status, macd_color) = if macd.line > macd.signal {
            ("Bullish", theme.success)
        } else {
            ("Bearish", theme.error)
        };
        let action = recommendation(rsi, macd.line, macd.signal);
        let action_color = match action {
            "BUY" => theme.success,
            "SELL" => theme.error,
            _ => theme.warning,
        };

        let label = |text: &'static str| Span::styled(text, Style::default().fg(theme.text_muted));
        let lines = vec![
            Line::from(vec![
                label("Price      "),
                Span::styled(
                    format::currency(analysis.current_price),
                    Style::default().fg(theme.text_primary).bold(),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                label("RSI        "),
                Span::styled(format!("{rsi:.2}  "), Style::default().fg(theme.text_secondary)),
                Span::styled(rsi_status(rsi), Style::default().fg(rsi_color)),
            ]),
            Line::from(vec![
                label("MACD       "),
                Span::styled(
                    format!("{:.4} / {:.4}  ", macd.line, macd.signal),
                    Style::default().fg(theme.text_secondary),
                ),
                Span::styled(macd_status, Style::default().fg(macd_color)),
            ]),
            Line::from(vec![
                label("Bollinger  "),
                Span::styled(
                    format!(
                        "{} · {} · {}",
                        format::currency(bands.lower),
                        format::currency(bands.middle),
                        format::currency(bands.upper)
                    ),
                    Style::default().fg(theme.text_secondary),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                label("Signal     "),
                Span::styled(action, Style::default().fg(action_color).bold()),
            ]),
        ];
        frame.render_widget(Paragraph::new(lines), area);
    }
}

impl Default for AnalysisView {
    fn default() -> Self {
        Self::new()
    }
}

impl super::ViewTrait for AnalysisView {
    fn render(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let bg = Block::default().style(Style::default().bg(self.theme.background));
        frame.render_widget(bg, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(8), Constraint::Length(1)])
            .margin(1)
            .split(area);

        let panel = Panel::new(&self.theme)
            .title(format!("Analysis · {}", self.symbol()))
            .busy(self.loading);
        let inner = panel.inner(chunks[0]);
        frame.render_widget(panel.block(), chunks[0]);

        match &self.result {
            Some(analysis) => {
                let analysis = analysis.clone();
                self.render_result(frame, inner, &analysis);
            }
            None => {
                let msg = if self.loading {
                    format!("Running analysis for {}…", self.symbol())
                } else {
                    "Press Enter to run analysis".to_string()
                };
                frame.render_widget(
                    Paragraph::new(msg).style(Style::default().fg(self.theme.text_muted)),
                    inner,
                );
            }
        }

        let footer = Line::from(vec![
            Span::styled("[←/→]", Style::default().fg(self.theme.accent)),
            Span::styled(" Symbol  ", Style::default().fg(self.theme.text_secondary)),
            Span::styled("[Enter]", Style::default().fg(self.theme.accent)),
            Span::styled(" Run analysis", Style::default().fg(self.theme.text_secondary)),
        ]);
        frame.render_widget(Paragraph::new(footer), chunks[1]);
        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode) -> Result<super::ViewAction> {
        use super::ViewAction;
        match key {
            KeyCode::Left | KeyCode::Char('h') => {
                self.symbol_idx = (self.symbol_idx + SYMBOLS.len() - 1) % SYMBOLS.len();
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.symbol_idx = (self.symbol_idx + 1) % SYMBOLS.len();
            }
            KeyCode::Enter => {
                if !self.loading {
                    return Ok(ViewAction::Dispatch(Command::RunAnalysis(
                        self.symbol().to_string(),
                    )));
                }
            }
            _ => {}
        }
        Ok(ViewAction::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recommendation_matches_the_service_rules() {
        assert_eq!(recommendation(25.0, 1.0, 0.5), "BUY");
        assert_eq!(recommendation(75.0, -1.0, 0.5), "SELL");
        assert_eq!(recommendation(50.0, 1.0, 0.5), "HOLD");
        // Oversold alone is not enough
        assert_eq!(recommendation(25.0, -1.0, 0.5), "HOLD");
    }

    #[test]
    fn rsi_bands_classify_correctly() {
        assert_eq!(rsi_status(75.0), "Overbought");
        assert_eq!(rsi_status(20.0), "Oversold");
        assert_eq!(rsi_status(50.0), "Neutral");
    }

    #[test]
    fn results_for_another_symbol_are_dropped_but_reenable_the_view() {
        let mut view = AnalysisView::new();
        view.set_loading();
        view.apply_analysis("ETHUSDT", Ok(Analysis::default()));
        assert!(view.result.is_none());
        assert!(!view.loading);
    }
}
