// Copyright 2026 Workbench Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Duplex byte transport for interactive job sessions.
//!
//! The server pipes the job's terminal to a WebSocket: raw bytes in both
//! directions, no framing beyond what the session controller's viewport
//! scanner extracts downstream.

use async_trait::async_trait;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::debug;
use url::Url;

use crate::client::RestClient;
use crate::error::RestClientResult;
use wb_client_api::{ClientResult, SessionChannel, SessionConnector};

type Ws = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// An open duplex stream bound to one running job.
pub struct SessionTransport {
    sink: SplitSink<Ws, Message>,
    stream: SplitStream<Ws>,
}

impl SessionTransport {
    /// Open the transport for a job endpoint.
    pub async fn connect(url: Url) -> RestClientResult<Self> {
        let (ws, _) = connect_async(url.as_str()).await?;
        debug!(%url, "session transport open");
        let (sink, stream) = ws.split();
        Ok(Self { sink, stream })
    }

    /// Write one outbound chunk (terminal input) as a binary frame.
    pub async fn send_bytes(&mut self, bytes: &[u8]) -> RestClientResult<()> {
        self.sink.send(Message::Binary(bytes.to_vec())).await?;
        Ok(())
    }

    /// Next inbound chunk, or `None` once the remote side has closed.
    /// Text frames are passed through as their UTF-8 bytes.
    pub async fn recv_bytes(&mut self) -> Option<RestClientResult<Vec<u8>>> {
        while let Some(frame) = self.stream.next().await {
            match frame {
                Ok(Message::Binary(bytes)) => return Some(Ok(bytes)),
                Ok(Message::Text(text)) => return Some(Ok(text.into_bytes())),
                Ok(Message::Close(_)) => return None,
                Ok(_) => continue, // ping/pong keepalive
                Err(err) => return Some(Err(err.into())),
            }
        }
        None
    }

    /// Release the transport.
    pub async fn shutdown(&mut self) -> RestClientResult<()> {
        self.sink.close().await?;
        Ok(())
    }
}

#[async_trait]
impl SessionChannel for SessionTransport {
    async fn send(&mut self, bytes: &[u8]) -> ClientResult<()> {
        self.send_bytes(bytes).await.map_err(|e| e.into_api_error())
    }

    async fn recv(&mut self) -> Option<ClientResult<Vec<u8>>> {
        self.recv_bytes().await.map(|r| r.map_err(|e| e.into_api_error()))
    }

    async fn close(&mut self) -> ClientResult<()> {
        self.shutdown().await.map_err(|e| e.into_api_error())
    }
}

/// Opens one [`SessionTransport`] per run request.
#[derive(Debug, Clone)]
pub struct WsSessionConnector {
    client: RestClient,
}

impl WsSessionConnector {
    pub fn new(client: RestClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SessionConnector for WsSessionConnector {
    async fn connect(
        &self,
        project_id: &str,
        recipe_path: &str,
    ) -> ClientResult<Box<dyn SessionChannel>> {
        let url = self
            .client
            .job_url(project_id, recipe_path)
            .map_err(|e| e.into_api_error())?;
        let transport = SessionTransport::connect(url).await.map_err(|e| e.into_api_error())?;
        Ok(Box::new(transport))
    }
}
