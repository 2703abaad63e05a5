//! Transport relay toward the consumer.
//!
//! Frames are line-delimited: JSON objects (`{"type":"connected",...}`,
//! `{"content":...}`, `{"error":...}`) terminated by exactly one `[DONE]`
//! sentinel per session.

use serde_json::json;
use tokio::sync::mpsc;
use tracing::debug;

/// Terminal sentinel forwarded once per session.
pub const TERMINAL_SENTINEL: &str = "[DONE]";

/// Writer side of the consumer transport.
///
/// Disconnection is checked before every write, not only at loop entry:
/// forwarding happens inside asynchronous per-chunk processing and must
/// stop as soon as the receiver goes away.
#[derive(Debug)]
pub struct StreamRelay {
    tx: mpsc::Sender<String>,
    finished: bool,
    closed: bool,
}

impl StreamRelay {
    pub fn new(tx: mpsc::Sender<String>) -> Self {
        Self {
            tx,
            finished: false,
            closed: false,
        }
    }

    /// True once the caller has disconnected.
    pub fn is_closed(&self) -> bool {
        self.closed || self.tx.is_closed()
    }

    /// True once the terminal sentinel has been sent.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Announce the committed model.
    pub async fn connected(&mut self, model: &str) -> bool {
        self.send_line(json!({"type": "connected", "model": model}).to_string())
            .await
    }

    /// Forward one unit of generated text.
    pub async fn content(&mut self, text: &str) -> bool {
        self.send_line(json!({"content": text}).to_string()).await
    }

    /// Forward an in-band error.
    pub async fn error(&mut self, message: &str) -> bool {
        self.send_line(json!({"error": message}).to_string()).await
    }

    /// Forward the terminal sentinel. Duplicate calls are suppressed.
    pub async fn finish(&mut self) -> bool {
        if self.finished {
            return true;
        }
        self.finished = true;
        self.send_line(TERMINAL_SENTINEL.to_string()).await
    }

    async fn send_line(&mut self, line: String) -> bool {
        if self.is_closed() {
            return false;
        }
        match self.tx.send(line).await {
            Ok(()) => true,
            Err(_) => {
                debug!("consumer disconnected, closing relay");
                self.closed = true;
                false
            }
        }
    }
}
