//! Runtime configuration from environment variables
//!
//! All functions fall back to sensible defaults when env vars are not
//! set. A `.env` file in the working directory is honored (loaded in
//! main before any of these are read).

use std::time::Duration;

/// Base URL of the trading service API. Override with `TRADEPULSE_API_URL`.
pub fn api_url() -> String {
    std::env::var("TRADEPULSE_API_URL").unwrap_or_else(|_| "http://127.0.0.1:5000".to_string())
}

/// WebSocket push channel URL. Override with `TRADEPULSE_WS_URL`.
pub fn ws_url() -> String {
    std::env::var("TRADEPULSE_WS_URL").unwrap_or_else(|_| "ws://127.0.0.1:5000/ws".to_string())
}

/// Poll period for volatile state (balance, positions, auto-trading
/// status, active strategy). Override with `TRADEPULSE_POLL_SECS`.
pub fn poll_interval() -> Duration {
    let secs = std::env::var("TRADEPULSE_POLL_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .filter(|&s| s > 0)
        .unwrap_or(10);
    Duration::from_secs(secs)
}

/// Cadence for reconnect attempts while the push channel is down.
pub fn reconnect_interval() -> Duration {
    Duration::from_secs(5)
}

/// Accent color override as a hex string, e.g. `#f4b58a`.
/// Override with `TRADEPULSE_ACCENT`.
pub fn accent_override() -> Option<String> {
    std::env::var("TRADEPULSE_ACCENT").ok()
}
