//! Transport layer for socket communication

use parking_lot::Mutex;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc;

use crate::SdkError;

/// Outbound half of a socket (object-safe)
pub trait Transport: Send + Sync {
    /// Queue a text frame for sending
    fn send(&self, text: String) -> Result<(), SdkError>;
}

/// Receiver of inbound socket events.
///
/// Called on whichever task the transport delivers frames on.
pub trait InboundHandler: Send + Sync {
    /// Socket opened
    fn on_open(&self) {}

    /// Text frame received
    fn on_message(&self, text: &str);

    /// Socket closed or failed
    fn on_close(&self, reason: &str);
}

/// Mock transport for testing.
///
/// Records every outbound frame and, when built with
/// [`MockTransport::with_channel`], streams them to a test-side responder.
pub struct MockTransport {
    sent: Mutex<Vec<String>>,
    outbound: Option<mpsc::UnboundedSender<String>>,
    fail_sends: AtomicBool,
}

impl MockTransport {
    /// Create a recording-only mock transport
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            outbound: None,
            fail_sends: AtomicBool::new(false),
        }
    }

    /// Create a mock transport that also forwards frames to the returned receiver
    pub fn with_channel() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let transport = Self {
            outbound: Some(tx),
            ..Self::new()
        };
        (transport, rx)
    }

    /// Make every following send fail
    pub fn set_fail_sends(&self, fail: bool) {
        self.fail_sends.store(fail, Ordering::SeqCst);
    }

    /// Raw frames sent so far
    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().clone()
    }

    /// Frames sent so far, parsed as JSON
    pub fn sent_json(&self) -> Vec<Value> {
        self.sent
            .lock()
            .iter()
            .filter_map(|frame| serde_json::from_str(frame).ok())
            .collect()
    }

    /// Most recent frame, parsed as JSON
    pub fn last_sent(&self) -> Option<Value> {
        self.sent_json().pop()
    }

    /// Forget recorded frames
    pub fn clear(&self) {
        self.sent.lock().clear();
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for MockTransport {
    fn send(&self, text: String) -> Result<(), SdkError> {
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(SdkError::Transport("mock send failure".to_string()));
        }
        self.sent.lock().push(text.clone());
        if let Some(outbound) = &self.outbound {
            outbound.send(text).map_err(|_| SdkError::Disconnected)?;
        }
        Ok(())
    }
}

#[cfg(feature = "ws")]
pub use ws::{WsDriver, WsTransport};

#[cfg(feature = "ws")]
mod ws {
    use futures_util::{SinkExt, StreamExt};
    use std::sync::Arc;
    use tokio::net::TcpStream;
    use tokio::sync::mpsc;
    use tokio::task::JoinHandle;
    use tokio_tungstenite::tungstenite::Message;
    use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
    use tracing::{debug, info, warn};

    use super::{InboundHandler, Transport};
    use crate::SdkError;

    /// WebSocket transport; frames are queued to a [`WsDriver`] task
    pub struct WsTransport {
        outbound: mpsc::UnboundedSender<String>,
    }

    /// Socket pump that feeds an [`InboundHandler`]
    pub struct WsDriver {
        stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
        outbound_rx: mpsc::UnboundedReceiver<String>,
    }

    impl WsTransport {
        /// Open a socket to `url`
        pub async fn connect(url: &str) -> Result<(Self, WsDriver), SdkError> {
            let (stream, _) = connect_async(url)
                .await
                .map_err(|e| SdkError::Transport(e.to_string()))?;
            info!(url, "websocket connected");
            let (tx, rx) = mpsc::unbounded_channel();
            Ok((
                Self { outbound: tx },
                WsDriver {
                    stream,
                    outbound_rx: rx,
                },
            ))
        }
    }

    impl Transport for WsTransport {
        fn send(&self, text: String) -> Result<(), SdkError> {
            self.outbound.send(text).map_err(|_| SdkError::Disconnected)
        }
    }

    impl WsDriver {
        /// Run the socket on a tokio task until it closes
        pub fn spawn(self, handler: Arc<dyn InboundHandler>) -> JoinHandle<()> {
            tokio::spawn(self.run(handler))
        }

        async fn run(self, handler: Arc<dyn InboundHandler>) {
            let (mut sink, mut stream) = self.stream.split();
            let mut outbound_rx = self.outbound_rx;
            handler.on_open();

            let reason = loop {
                tokio::select! {
                    Some(text) = outbound_rx.recv() => {
                        if let Err(e) = sink.send(Message::text(text)).await {
                            break e.to_string();
                        }
                    }
                    frame = stream.next() => match frame {
                        Some(Ok(Message::Text(text))) => handler.on_message(text.as_str()),
                        Some(Ok(Message::Close(frame))) => {
                            break frame
                                .map(|f| f.reason.as_str().to_string())
                                .unwrap_or_else(|| "closed by peer".to_string());
                        }
                        Some(Ok(other)) => debug!(kind = ?other, "ignoring non-text frame"),
                        Some(Err(e)) => break e.to_string(),
                        None => break "stream ended".to_string(),
                    }
                }
            };

            warn!(%reason, "websocket closed");
            handler.on_close(&reason);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_records_frames() {
        let transport = MockTransport::new();
        transport.send(r#"{"id":1}"#.to_string()).unwrap();
        assert_eq!(transport.sent().len(), 1);
        assert_eq!(transport.last_sent().unwrap()["id"], 1);
        transport.clear();
        assert!(transport.sent().is_empty());
    }

    #[test]
    fn test_mock_failing_send() {
        let transport = MockTransport::new();
        transport.set_fail_sends(true);
        assert!(matches!(
            transport.send("x".to_string()),
            Err(SdkError::Transport(_))
        ));
        assert!(transport.sent().is_empty());
    }

    #[tokio::test]
    async fn test_mock_channel_forwards() {
        let (transport, mut rx) = MockTransport::with_channel();
        transport.send("frame".to_string()).unwrap();
        assert_eq!(rx.recv().await.unwrap(), "frame");
    }
}
