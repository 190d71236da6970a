//! Boundary to the trading service: HTTP client, wire types, and the
//! WebSocket push channel.

pub mod client;
pub mod stream;
pub mod types;

pub use client::{ApiClient, ApiError};
