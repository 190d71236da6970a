//! Wire types for the trading service API
//!
//! Every payload is a wholesale snapshot: the client replaces its copy
//! on each fetch and never merges. Numeric fields default to zero so a
//! sparse payload still renders instead of failing to decode.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Strategy assumed when the service reports none.
pub const DEFAULT_STRATEGY: &str = "ADVANCED_STRATEGY";

/// Account balance snapshot.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Balance {
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub available: f64,
    #[serde(default)]
    pub frozen: f64,
}

/// An open position as reported by the service.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub size: f64,
    #[serde(default)]
    pub entry_price: f64,
    #[serde(default)]
    pub mark_price: f64,
    #[serde(default)]
    pub unrealized_pnl: f64,
    /// Return on equity, percent.
    #[serde(default)]
    pub roe: f64,
}

/// Order side (buy/sell).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeSide {
    Buy,
    Sell,
}

impl std::fmt::Display for TradeSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
        }
    }
}

/// Order type for manual trades.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderKind {
    Market,
    Limit,
}

impl std::fmt::Display for OrderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Market => write!(f, "MARKET"),
            Self::Limit => write!(f, "LIMIT"),
        }
    }
}

/// One row of the trade-history snapshot.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct HistoryEntry {
    /// ISO timestamp or epoch string, rendered verbatim after trimming.
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub side: String,
    #[serde(default)]
    pub size: f64,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub fee: f64,
    #[serde(default)]
    pub pnl: f64,
}

/// Trading configuration, read and written wholesale.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TradeSettings {
    #[serde(default = "default_pair")]
    pub trading_pair: String,
    #[serde(default = "default_position_size")]
    pub position_size: f64,
    #[serde(default = "default_leverage")]
    pub leverage: u32,
    #[serde(default = "default_stop_loss")]
    pub stop_loss_percentage: f64,
    #[serde(default = "default_take_profit")]
    pub take_profit_percentage: f64,
    #[serde(default = "default_trailing_stop")]
    pub trailing_stop_percentage: f64,
    #[serde(default = "default_strategy")]
    pub default_strategy: String,
}

fn default_pair() -> String {
    "DOT_USDT".to_string()
}
fn default_position_size() -> f64 {
    0.5
}
fn default_leverage() -> u32 {
    10
}
fn default_stop_loss() -> f64 {
    1.5
}
fn default_take_profit() -> f64 {
    2.5
}
fn default_trailing_stop() -> f64 {
    1.0
}
fn default_strategy() -> String {
    DEFAULT_STRATEGY.to_string()
}

impl Default for TradeSettings {
    fn default() -> Self {
        Self {
            trading_pair: default_pair(),
            position_size: default_position_size(),
            leverage: default_leverage(),
            stop_loss_percentage: default_stop_loss(),
            take_profit_percentage: default_take_profit(),
            trailing_stop_percentage: default_trailing_stop(),
            default_strategy: default_strategy(),
        }
    }
}

/// Active-strategy state reported by the service.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StrategyState {
    #[serde(default = "default_strategy")]
    pub current_strategy: String,
    /// "active" when the engine is running the strategy.
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub available_strategies: Vec<String>,
    #[serde(default)]
    pub descriptions: HashMap<String, String>,
}

impl Default for StrategyState {
    fn default() -> Self {
        Self {
            current_strategy: default_strategy(),
            status: "inactive".to_string(),
            available_strategies: Vec::new(),
            descriptions: HashMap::new(),
        }
    }
}

impl StrategyState {
    pub fn is_active(&self) -> bool {
        self.status.eq_ignore_ascii_case("active")
    }

    /// Description of the current strategy, if the service supplied one.
    pub fn current_description(&self) -> Option<&str> {
        self.descriptions
            .get(&self.current_strategy)
            .map(String::as_str)
    }
}

/// Auto-trading engine status.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AutoTradingStatus {
    #[serde(default)]
    pub is_running: bool,
}

/// Manual trade request body.
#[derive(Debug, Clone, Serialize)]
pub struct TradeRequest {
    pub symbol: String,
    pub side: TradeSide,
    pub quantity: f64,
    pub order_type: OrderKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

/// Pre-flight validation result. This endpoint replies with the
/// validation object directly rather than the usual envelope.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TradeValidation {
    #[serde(default)]
    pub valid: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default)]
    pub estimated_cost: f64,
    #[serde(default)]
    pub available_balance: f64,
}

/// Result of a strategy dry-run.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StrategyTest {
    #[serde(default)]
    pub strategy: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub signal: serde_json::Value,
    #[serde(default)]
    pub market_data_points: u64,
    #[serde(default)]
    pub current_price: f64,
}

impl StrategyTest {
    /// Short human summary of the signal, for notifications.
    pub fn signal_summary(&self) -> String {
        self.signal
            .get("action")
            .and_then(|v| v.as_str())
            .unwrap_or("No signal")
            .to_string()
    }
}

/// MACD indicator values.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Macd {
    #[serde(default)]
    pub line: f64,
    #[serde(default)]
    pub signal: f64,
    #[serde(default)]
    pub histogram: f64,
}

/// Bollinger band values.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BollingerBands {
    #[serde(default)]
    pub upper: f64,
    #[serde(default)]
    pub middle: f64,
    #[serde(default)]
    pub lower: f64,
}

/// Technical indicator snapshot for one symbol.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Analysis {
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub current_price: f64,
    #[serde(default = "neutral_rsi")]
    pub rsi: f64,
    #[serde(default)]
    pub macd: Macd,
    #[serde(default)]
    pub bollinger_bands: BollingerBands,
}

fn neutral_rsi() -> f64 {
    50.0
}

/// Time series for the chart view.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChartSeries {
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub prices: Vec<f64>,
    #[serde(default)]
    pub open: Vec<f64>,
    #[serde(default)]
    pub high: Vec<f64>,
    #[serde(default)]
    pub low: Vec<f64>,
    #[serde(default)]
    pub volumes: Vec<f64>,
    #[serde(default)]
    pub timeframe: String,
}

impl ChartSeries {
    /// True when the payload carries a full candle set alongside the
    /// close prices, enabling the detailed render.
    pub fn has_ohlc(&self) -> bool {
        !self.prices.is_empty()
            && self.open.len() == self.prices.len()
            && self.high.len() == self.prices.len()
            && self.low.len() == self.prices.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balance_defaults_missing_fields_to_zero() {
        let b: Balance = serde_json::from_str("{}").unwrap();
        assert_eq!(b.total, 0.0);
        assert_eq!(b.available, 0.0);
        assert_eq!(b.frozen, 0.0);

        let b: Balance = serde_json::from_str(r#"{"total": 120.5}"#).unwrap();
        assert_eq!(b.total, 120.5);
        assert_eq!(b.available, 0.0);
    }

    #[test]
    fn position_decodes_camel_case_wire_fields() {
        let p: Position = serde_json::from_str(
            r#"{"symbol":"BTCUSDT","size":0.5,"entryPrice":40000.0,"markPrice":41000.0,"unrealizedPnl":500.0,"roe":2.5}"#,
        )
        .unwrap();
        assert_eq!(p.entry_price, 40000.0);
        assert_eq!(p.unrealized_pnl, 500.0);
    }

    #[test]
    fn strategy_state_defaults_to_named_constant() {
        let s: StrategyState = serde_json::from_str("{}").unwrap();
        assert_eq!(s.current_strategy, DEFAULT_STRATEGY);
        assert!(!s.is_active());

        let s: StrategyState =
            serde_json::from_str(r#"{"current_strategy":"DCA_STRATEGY","status":"active"}"#)
                .unwrap();
        assert!(s.is_active());
    }

    #[test]
    fn chart_series_ohlc_detection_requires_matching_lengths() {
        let full: ChartSeries = serde_json::from_str(
            r#"{"labels":["a","b"],"prices":[1.0,2.0],"open":[1.0,1.5],"high":[1.2,2.2],"low":[0.9,1.4]}"#,
        )
        .unwrap();
        assert!(full.has_ohlc());

        let partial: ChartSeries =
            serde_json::from_str(r#"{"labels":["a","b"],"prices":[1.0,2.0],"high":[1.2]}"#)
                .unwrap();
        assert!(!partial.has_ohlc());
    }

    #[test]
    fn trade_request_omits_price_for_market_orders() {
        let req = TradeRequest {
            symbol: "BTCUSDT".to_string(),
            side: TradeSide::Buy,
            quantity: 0.1,
            order_type: OrderKind::Market,
            price: None,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("price").is_none());
        assert_eq!(json["side"], "BUY");
        assert_eq!(json["order_type"], "MARKET");
    }
}
