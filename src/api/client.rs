//! HTTP client for the trading service
//!
//! Thin request/response wrapper around the service's JSON API. Every
//! endpoint replies with the `{success, data, error}` envelope except
//! `/api/trade/validate`, which returns the validation object itself.
//! No retries: a failed call surfaces once and the caller decides what
//! to refresh.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::types::{
    Analysis, AutoTradingStatus, Balance, ChartSeries, HistoryEntry, Position, StrategyState,
    StrategyTest, TradeRequest, TradeSettings, TradeValidation,
};

/// Errors from the API boundary.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure (network, timeout, bad status).
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service replied `success: false`.
    #[error("{0}")]
    Api(String),

    /// Pre-flight validation refused the order; nothing was submitted.
    #[error("{0}")]
    Rejected(String),
}

/// Standard response envelope.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    success: bool,
    data: Option<T>,
    error: Option<String>,
    message: Option<String>,
}

impl<T> Envelope<T> {
    fn into_data(self) -> Result<T, ApiError> {
        if self.success {
            self.data
                .ok_or_else(|| ApiError::Api("response carried no data".to_string()))
        } else {
            Err(ApiError::Api(
                self.error.unwrap_or_else(|| "unknown error".to_string()),
            ))
        }
    }

    /// For mutating endpoints that reply with a message instead of data.
    fn into_message(self) -> Result<String, ApiError> {
        if self.success {
            Ok(self.message.unwrap_or_else(|| "OK".to_string()))
        } else {
            Err(ApiError::Api(
                self.error.unwrap_or_else(|| "unknown error".to_string()),
            ))
        }
    }
}

impl TradeValidation {
    /// Gate an order submission on the validation outcome.
    pub fn gate(self) -> Result<TradeValidation, ApiError> {
        if self.valid {
            Ok(self)
        } else {
            Err(ApiError::Rejected(self.error.unwrap_or_else(|| {
                "trade validation failed".to_string()
            })))
        }
    }
}

/// Client for the trading service API.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .unwrap_or_default(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_data<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let envelope: Envelope<T> = self
            .http
            .get(self.url(path))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        envelope.into_data()
    }

    async fn post_data<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let envelope: Envelope<T> = self
            .http
            .post(self.url(path))
            .json(body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        envelope.into_data()
    }

    async fn post_message<B: Serialize>(&self, path: &str, body: &B) -> Result<String, ApiError> {
        let envelope: Envelope<serde_json::Value> = self
            .http
            .post(self.url(path))
            .json(body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        envelope.into_message()
    }

    pub async fn balance(&self) -> Result<Balance, ApiError> {
        self.get_data("/api/balance").await
    }

    pub async fn positions(&self) -> Result<Vec<Position>, ApiError> {
        self.get_data("/api/positions").await
    }

    pub async fn history(&self) -> Result<Vec<HistoryEntry>, ApiError> {
        self.get_data("/api/history").await
    }

    pub async fn settings(&self) -> Result<TradeSettings, ApiError> {
        self.get_data("/api/settings").await
    }

    pub async fn save_settings(&self, settings: &TradeSettings) -> Result<String, ApiError> {
        self.post_message("/api/settings", settings).await
    }

    pub async fn auto_trading_status(&self) -> Result<AutoTradingStatus, ApiError> {
        self.get_data("/api/auto-trading/status").await
    }

    pub async fn set_auto_trading(&self, enable: bool) -> Result<String, ApiError> {
        let path = if enable {
            "/api/auto-trading/enable"
        } else {
            "/api/auto-trading/disable"
        };
        self.post_message(path, &serde_json::json!({})).await
    }

    pub async fn strategy(&self) -> Result<StrategyState, ApiError> {
        self.get_data("/api/strategy").await
    }

    pub async fn update_strategy(&self, name: &str) -> Result<String, ApiError> {
        self.post_message("/api/strategy", &serde_json::json!({ "strategy": name }))
            .await
    }

    pub async fn test_strategy(&self, name: &str, symbol: &str) -> Result<StrategyTest, ApiError> {
        self.post_data(
            "/api/strategy/test",
            &serde_json::json!({ "strategy": name, "symbol": symbol }),
        )
        .await
    }

    /// Pre-flight check for an order. Replies with the validation
    /// object directly, not the envelope.
    pub async fn validate_trade(&self, req: &TradeRequest) -> Result<TradeValidation, ApiError> {
        let validation: TradeValidation = self
            .http
            .post(self.url("/api/trade/validate"))
            .json(req)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(validation)
    }

    /// Validate then submit an order. A refused validation aborts the
    /// submission entirely; the two calls are separate round-trips with
    /// no transactional guarantee between them.
    pub async fn submit_trade(&self, req: &TradeRequest) -> Result<TradeValidation, ApiError> {
        let validation = self.validate_trade(req).await?.gate()?;
        let _order: serde_json::Value = self.post_data("/api/trade", req).await?;
        Ok(validation)
    }

    pub async fn analysis(&self, symbol: &str) -> Result<Analysis, ApiError> {
        self.get_data(&format!("/api/analysis/{symbol}")).await
    }

    pub async fn chart_data(
        &self,
        symbol: &str,
        timeframe: &str,
    ) -> Result<ChartSeries, ApiError> {
        self.get_data(&format!("/api/chart-data/{symbol}?timeframe={timeframe}"))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_success_yields_data() {
        let env: Envelope<Balance> =
            serde_json::from_str(r#"{"success":true,"data":{"total":10.0}}"#).unwrap();
        let balance = env.into_data().unwrap();
        assert_eq!(balance.total, 10.0);
    }

    #[test]
    fn envelope_failure_carries_server_message() {
        let env: Envelope<Balance> =
            serde_json::from_str(r#"{"success":false,"error":"no funds"}"#).unwrap();
        match env.into_data() {
            Err(ApiError::Api(msg)) => assert_eq!(msg, "no funds"),
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn failed_validation_gates_out_the_submission() {
        let refused = TradeValidation {
            valid: false,
            error: Some("Insufficient USDT balance".to_string()),
            ..Default::default()
        };
        match refused.gate() {
            Err(ApiError::Rejected(msg)) => assert!(msg.contains("Insufficient")),
            other => panic!("expected Rejected, got {other:?}"),
        }

        let accepted = TradeValidation {
            valid: true,
            ..Default::default()
        };
        assert!(accepted.gate().is_ok());
    }
}
