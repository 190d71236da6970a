//! Trade - manual order ticket
//!
//! Form for one-off orders. Local validation (required fields, numeric
//! parsing) blocks bad requests before any network call; the remote
//! pre-flight validation and submission run as one dispatched command.
//! The submit row is disabled while a submission is in flight and is
//! always re-enabled when the outcome lands, success or failure.

use anyhow::Result;
use crossterm::event::KeyCode;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Paragraph};

use crate::api::types::{OrderKind, TradeRequest, TradeSide};
use crate::format;
use crate::themes::Theme;
use crate::ui::panels::Panel;
use crate::views::charts::SYMBOLS;
use crate::views::Command;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Symbol,
    Side,
    OrderType,
    Quantity,
    Price,
    Submit,
}

impl Field {
    fn label(self) -> &'static str {
        match self {
            Self::Symbol => "Symbol",
            Self::Side => "Side",
            Self::OrderType => "Order type",
            Self::Quantity => "Quantity",
            Self::Price => "Limit price",
            Self::Submit => "Submit order",
        }
    }
}

pub struct TradeView {
    theme: Theme,
    fields: Vec<Field>,
    selected: usize,
    symbol_idx: usize,
    side: TradeSide,
    order_type: OrderKind,
    quantity: String,
    price: String,
    submitting: bool,
    error: Option<String>,
    /// Latest available balance, for the ticket hint line.
    available: f64,
}

impl TradeView {
    pub fn new() -> Self {
        Self {
            theme: Theme::load(),
            fields: vec![
                Field::Symbol,
                Field::Side,
                Field::OrderType,
                Field::Quantity,
                Field::Price,
                Field::Submit,
            ],
            selected: 0,
            symbol_idx: 0,
            side: TradeSide::Buy,
            order_type: OrderKind::Market,
            quantity: String::new(),
            price: String::new(),
            submitting: false,
            error: None,
            available: 0.0,
        }
    }

    pub fn set_available_balance(&mut self, available: f64) {
        self.available = available;
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// True while the cursor sits on a free-input field; the app then
    /// routes digit keys here instead of treating them as view jumps.
    pub fn is_text_entry(&self) -> bool {
        matches!(self.fields[self.selected], Field::Quantity | Field::Price)
    }

    pub fn set_submitting(&mut self) {
        self.submitting = true;
    }

    /// Reconcile after the dispatched submission resolves. Success
    /// resets the ticket; failure keeps the user's values so the order
    /// can be corrected and re-sent.
    pub fn apply_outcome(&mut self, success: bool) {
        self.submitting = false;
        if success {
            self.quantity.clear();
            self.price.clear();
            self.error = None;
        }
    }

    fn symbol(&self) -> &'static str {
        SYMBOLS[self.symbol_idx]
    }

    /// Build the request from the form, or report the first local
    /// validation failure. Never touches the network.
    fn build_request(&self) -> std::result::Result<TradeRequest, String> {
        let quantity: f64 = match self.quantity.trim() {
            "" => return Err("Quantity is required".to_string()),
            raw => raw
                .parse()
                .map_err(|_| format!("Invalid quantity: {raw}"))?,
        };
        if quantity <= 0.0 {
            return Err("Quantity must be positive".to_string());
        }

        let price = match self.order_type {
            OrderKind::Limit => match self.price.trim() {
                "" => return Err("A price is required for limit orders".to_string()),
                raw => Some(
                    raw.parse::<f64>()
                        .map_err(|_| format!("Invalid price: {raw}"))?,
                ),
            },
            OrderKind::Market => None,
        };
        if let Some(p) = price {
            if p <= 0.0 {
                return Err("Price must be positive".to_string());
            }
        }

        Ok(TradeRequest {
            symbol: self.symbol().to_string(),
            side: self.side,
            quantity,
            order_type: self.order_type,
            price,
        })
    }

    fn cycle_value(&mut self, forward: bool) {
        match self.fields[self.selected] {
            Field::Symbol => {
                let n = SYMBOLS.len();
                self.symbol_idx = if forward {
                    (self.symbol_idx + 1) % n
                } else {
                    (self.symbol_idx + n - 1) % n
                };
            }
            Field::Side => {
                self.side = match self.side {
                    TradeSide::Buy => TradeSide::Sell,
                    TradeSide::Sell => TradeSide::Buy,
                };
            }
            Field::OrderType => {
                self.order_type = match self.order_type {
                    OrderKind::Market => OrderKind::Limit,
                    OrderKind::Limit => OrderKind::Market,
                };
            }
            _ => {}
        }
    }

    fn input_char(&mut self, c: char) {
        if !c.is_ascii_digit() && c != '.' {
            return;
        }
        match self.fields[self.selected] {
            Field::Quantity => self.quantity.push(c),
            Field::Price => self.price.push(c),
            _ => {}
        }
    }

    fn backspace(&mut self) {
        match self.fields[self.selected] {
            Field::Quantity => {
                self.quantity.pop();
            }
            Field::Price => {
                self.price.pop();
            }
            _ => {}
        }
    }

    /// Skip the price row while a market order is selected.
    fn field_enabled(&self, field: Field) -> bool {
        field != Field::Price || self.order_type == OrderKind::Limit
    }

    fn move_selection(&mut self, down: bool) {
        let n = self.fields.len();
        let mut idx = self.selected;
        loop {
            idx = if down { (idx + 1) % n } else { (idx + n - 1) % n };
            if self.field_enabled(self.fields[idx]) {
                break;
            }
        }
        self.selected = idx;
    }

    fn value_for(&self, field: Field) -> String {
        match field {
            Field::Symbol => self.symbol().to_string(),
            Field::Side => self.side.to_string(),
            Field::OrderType => self.order_type.to_string(),
            Field::Quantity => self.quantity.clone(),
            Field::Price => self.price.clone(),
            Field::Submit => {
                if self.submitting {
                    "Submitting…".to_string()
                } else {
                    format!("{} {}", self.side, self.symbol())
                }
            }
        }
    }
}

impl Default for TradeView {
    fn default() -> Self {
        Self::new()
    }
}

impl super::ViewTrait for TradeView {
    fn render(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let bg = Block::default().style(Style::default().bg(self.theme.background));
        frame.render_widget(bg, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(8), Constraint::Length(1)])
            .margin(1)
            .split(area);

        let panel = Panel::new(&self.theme)
            .title("Trade Ticket")
            .busy(self.submitting);
        let inner = panel.inner(chunks[0]);
        frame.render_widget(panel.block(), chunks[0]);

        let mut lines = Vec::new();
        for (i, field) in self.fields.iter().enumerate() {
            if !self.field_enabled(*field) {
                continue;
            }
            let is_selected = i == self.selected;
            let marker = if is_selected { "> " } else { "  " };
            let value = self.value_for(*field);

            let value_color = match field {
                Field::Side => {
                    if self.side == TradeSide::Buy {
                        self.theme.success
                    } else {
                        self.theme.error
                    }
                }
                Field::Submit => {
                    if self.submitting {
                        self.theme.text_muted
                    } else {
                        self.theme.accent
                    }
                }
                _ => self.theme.text_secondary,
            };

            lines.push(Line::from(vec![
                Span::styled(marker, Style::default().fg(self.theme.accent)),
                Span::styled(
                    format!("{:<14}", field.label()),
                    Style::default().fg(if is_selected {
                        self.theme.accent
                    } else {
                        self.theme.text_primary
                    }),
                ),
                Span::styled(value, Style::default().fg(value_color)),
            ]));
        }

        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("Available  ", Style::default().fg(self.theme.text_muted)),
            Span::styled(
                format::currency(self.available),
                Style::default().fg(self.theme.text_secondary),
            ),
        ]));

        if let Some(ref error) = self.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(self.theme.error),
            )));
        }

        frame.render_widget(Paragraph::new(lines), inner);

        let footer = Line::from(vec![
            Span::styled("[↑/↓]", Style::default().fg(self.theme.accent)),
            Span::styled(" Field  ", Style::default().fg(self.theme.text_secondary)),
            Span::styled("[←/→]", Style::default().fg(self.theme.accent)),
            Span::styled(" Change  ", Style::default().fg(self.theme.text_secondary)),
            Span::styled("[Enter]", Style::default().fg(self.theme.accent)),
            Span::styled(" Submit", Style::default().fg(self.theme.text_secondary)),
        ]);
        frame.render_widget(Paragraph::new(footer), chunks[1]);
        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode) -> Result<super::ViewAction> {
        use super::ViewAction;
        match key {
            KeyCode::Up => self.move_selection(false),
            KeyCode::Down => self.move_selection(true),
            KeyCode::Left => self.cycle_value(false),
            KeyCode::Right => self.cycle_value(true),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Char(c) => self.input_char(c),
            KeyCode::Enter => {
                if self.fields[self.selected] != Field::Submit {
                    self.move_selection(true);
                    return Ok(ViewAction::Continue);
                }
                if self.submitting {
                    // A submission is already in flight; ignore.
                    return Ok(ViewAction::Continue);
                }
                match self.build_request() {
                    Ok(request) => {
                        self.error = None;
                        return Ok(ViewAction::Dispatch(Command::SubmitTrade(request)));
                    }
                    Err(message) => {
                        self.error = Some(message);
                    }
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
    use crate::views::{ViewAction, ViewTrait};

    #[test]
    fn empty_quantity_is_rejected_before_any_request_is_built() {
        let view = TradeView::new();
        assert!(view.build_request().is_err());
    }

    #[test]
    fn limit_orders_require_a_price() {
        let mut view = TradeView::new();
        view.quantity = "0.5".to_string();
        view.order_type = OrderKind::Limit;
        assert!(view.build_request().is_err());

        view.price = "40000".to_string();
        let request = view.build_request().unwrap();
        assert_eq!(request.price, Some(40000.0));
    }

    #[test]
    fn market_orders_carry_no_price() {
        let mut view = TradeView::new();
        view.quantity = "0.5".to_string();
        let request = view.build_request().unwrap();
        assert_eq!(request.order_type, OrderKind::Market);
        assert!(request.price.is_none());
    }

    #[test]
    fn submit_key_surfaces_local_validation_instead_of_dispatching() {
        let mut view = TradeView::new();
        view.selected = view.fields.len() - 1; // Submit row
        let action = view.handle_key(KeyCode::Enter).unwrap();
        assert!(matches!(action, ViewAction::Continue));
        assert!(view.error.is_some());
    }

    #[test]
    fn resubmit_is_ignored_while_in_flight_and_reenabled_after() {
        let mut view = TradeView::new();
        view.quantity = "1.0".to_string();
        view.selected = view.fields.len() - 1;

        let action = view.handle_key(KeyCode::Enter).unwrap();
        assert!(matches!(action, ViewAction::Dispatch(_)));
        view.set_submitting();

        let action = view.handle_key(KeyCode::Enter).unwrap();
        assert!(matches!(action, ViewAction::Continue));

        // Failure outcome re-enables the ticket and keeps the values.
        view.apply_outcome(false);
        assert!(!view.is_submitting());
        assert_eq!(view.quantity, "1.0");

        // Success clears the ticket.
        view.set_submitting();
        view.apply_outcome(true);
        assert!(!view.is_submitting());
        assert!(view.quantity.is_empty());
    }
}
