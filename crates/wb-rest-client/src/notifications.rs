// Copyright 2026 Workbench Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-project mutation notification channel.
//!
//! One channel per open project view. The server pushes every entry
//! mutation (including the viewer's own) over a WebSocket; the channel
//! parses frames into [`MutationEvent`]s and hands them to its single
//! consumer, the tree cache's converging apply function.
//!
//! There is no reconnect-with-replay: if the transport drops, the stream
//! ends and the cache may miss remote mutations until the next full
//! project fetch. Re-entering the view re-subscribes from scratch.

use futures::stream::Stream;
use futures::StreamExt;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, warn};
use url::Url;

use crate::error::{RestClientError, RestClientResult};
use wb_api_contract::MutationEvent;

/// Connection lifecycle of a notification channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Disconnected,
    Connecting,
    Live,
}

/// Ordered stream of mutation events for one project.
pub struct NotificationChannel {
    receiver: mpsc::Receiver<Result<MutationEvent, RestClientError>>,
    state: watch::Receiver<ChannelState>,
    reader: tokio::task::JoinHandle<()>,
}

impl NotificationChannel {
    /// Subscribe to a project's notification endpoint.
    ///
    /// Resolves once the transport is open (state `Live`); the returned
    /// value is both a `Stream` of events and a handle for teardown.
    pub async fn connect(url: Url) -> RestClientResult<Self> {
        let (state_tx, state_rx) = watch::channel(ChannelState::Connecting);

        let (ws, _) = match connect_async(url.as_str()).await {
            Ok(open) => open,
            Err(err) => {
                let _ = state_tx.send(ChannelState::Disconnected);
                return Err(err.into());
            }
        };
        let _ = state_tx.send(ChannelState::Live);
        debug!(%url, "notification channel live");

        let (tx, rx) = mpsc::channel(32);
        let reader = tokio::spawn(async move {
            // Moved in so the state flips to Disconnected exactly when
            // the reader stops, whatever the cause.
            let state_tx = state_tx;
            let mut ws = ws;

            while let Some(frame) = ws.next().await {
                match frame {
                    Ok(Message::Text(text)) => {
                        match serde_json::from_str::<MutationEvent>(&text) {
                            Ok(event) => {
                                if tx.send(Ok(event)).await.is_err() {
                                    break;
                                }
                            }
                            Err(err) => {
                                warn!(%err, "undecodable notification frame");
                                let _ = tx.send(Err(err.into())).await;
                                break;
                            }
                        }
                    }
                    Ok(Message::Close(_)) => break,
                    Ok(_) => {} // ping/pong/binary keepalive
                    Err(err) => {
                        let _ = tx.send(Err(err.into())).await;
                        break;
                    }
                }
            }
            let _ = state_tx.send(ChannelState::Disconnected);
        });

        Ok(Self { receiver: rx, state: state_rx, reader })
    }

    /// Current connection state.
    pub fn state(&self) -> ChannelState {
        *self.state.borrow()
    }

    /// Tear the channel down deterministically. Safe to call more than
    /// once; also performed on drop so leaving a project view can never
    /// leak an open transport.
    pub fn close(&mut self) {
        self.reader.abort();
        self.receiver.close();
    }
}

impl Drop for NotificationChannel {
    fn drop(&mut self) {
        self.reader.abort();
    }
}

impl Stream for NotificationChannel {
    type Item = Result<MutationEvent, RestClientError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notification_frame_parsing() {
        let frame = r#"{
            "event": "deleted",
            "path": "/old/"
        }"#;
        let event: MutationEvent = serde_json::from_str(frame).unwrap();
        assert_eq!(event, MutationEvent::Deleted { path: "/old/".to_string() });
    }

    #[tokio::test]
    async fn connect_failure_reports_network_problem() {
        // Nothing listens on this port; connect must fail cleanly
        // rather than leaving a half-open channel behind.
        let url = Url::parse("ws://127.0.0.1:9/projects/p1/notifications").unwrap();
        let result = NotificationChannel::connect(url).await;
        assert!(result.is_err());
    }
}
