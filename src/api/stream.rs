//! WebSocket push channel to the trading service
//!
//! The service pushes live price updates over a persistent socket. The
//! reader runs as a spawned task and forwards events into an mpsc
//! channel that the app drains between frames; the channel closing
//! doubles as the disconnect signal.

use futures_util::StreamExt;
use serde::Deserialize;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, warn};

/// Event pushed by the service or synthesized by the reader task.
#[derive(Debug, Clone)]
pub enum PushEvent {
    Connected,
    Disconnected,
    Price(PriceUpdate),
}

/// Live ticker update.
#[derive(Debug, Clone, Deserialize)]
pub struct PriceUpdate {
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub price: f64,
}

#[derive(Debug, Deserialize)]
struct PushFrame {
    #[serde(default)]
    event: String,
    #[serde(default)]
    symbol: String,
    #[serde(default)]
    price: f64,
}

/// Open the push channel and spawn its reader task.
///
/// Returns immediately with the receiving end; `Connected` arrives as
/// the first event once the handshake completes, `Disconnected` as the
/// last before the channel closes. The caller owns reconnect cadence.
pub fn connect(url: &str) -> mpsc::Receiver<PushEvent> {
    let (tx, rx) = mpsc::channel(64);
    let url = url.to_string();

    tokio::spawn(async move {
        let (ws, _) = match connect_async(url.as_str()).await {
            Ok(conn) => conn,
            Err(e) => {
                debug!("push channel connect failed: {e}");
                let _ = tx.send(PushEvent::Disconnected).await;
                return;
            }
        };
        if tx.send(PushEvent::Connected).await.is_err() {
            return;
        }

        let (_, mut read) = ws.split();
        while let Some(frame) = read.next().await {
            match frame {
                Ok(Message::Text(text)) => {
                    if let Some(event) = parse_frame(&text) {
                        if tx.send(event).await.is_err() {
                            return;
                        }
                    }
                }
                Ok(Message::Close(_)) => break,
                Ok(_) => {}
                Err(e) => {
                    warn!("push channel read error: {e}");
                    break;
                }
            }
        }
        let _ = tx.send(PushEvent::Disconnected).await;
    });

    rx
}

/// Parse one text frame into an event. Unknown or malformed frames are
/// logged and skipped; the stream keeps running.
fn parse_frame(text: &str) -> Option<PushEvent> {
    let frame: PushFrame = match serde_json::from_str(text) {
        Ok(frame) => frame,
        Err(e) => {
            debug!("unparseable push frame: {e}");
            return None;
        }
    };
    match frame.event.as_str() {
        "price_update" => Some(PushEvent::Price(PriceUpdate {
            symbol: frame.symbol,
            price: frame.price,
        })),
        "connected" => None, // greeting frame, handshake already reported
        other => {
            debug!("ignoring push event {other:?}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_frame_parses_into_event() {
        let event = parse_frame(r#"{"event":"price_update","symbol":"BTCUSDT","price":42000.5}"#);
        match event {
            Some(PushEvent::Price(update)) => {
                assert_eq!(update.symbol, "BTCUSDT");
                assert_eq!(update.price, 42000.5);
            }
            other => panic!("expected price event, got {other:?}"),
        }
    }

    #[test]
    fn malformed_and_unknown_frames_are_skipped() {
        assert!(parse_frame("not json").is_none());
        assert!(parse_frame(r#"{"event":"heartbeat"}"#).is_none());
        assert!(parse_frame(r#"{"event":"connected"}"#).is_none());
    }
}
