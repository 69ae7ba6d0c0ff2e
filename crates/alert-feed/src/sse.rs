//! Server-Sent Events (SSE) feed of alert snapshots.

use std::pin::Pin;
use std::task::{Context, Poll};

use alert_core::{AlertFeed, FeedError, Snapshot, SnapshotStream};
use futures::stream::{self, Stream};
use reqwest_eventsource::{Event, EventSource, RequestBuilderExt};
use tracing::{debug, error, info, warn};

use crate::assembler::SnapshotAssembler;
use crate::config::{FeedConfig, ReconnectConfig};
use crate::error::SourceError;

/// An [`AlertFeed`] backed by a realtime-database SSE endpoint.
#[derive(Debug, Clone)]
pub struct SseAlertFeed {
    config: FeedConfig,
    http: reqwest::Client,
}

impl SseAlertFeed {
    /// Create a feed for the given configuration.
    pub fn new(config: FeedConfig) -> Result<Self, SourceError> {
        // SSE connections are long-lived and must not time out.
        let http = reqwest::Client::builder().build()?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    /// Open a new SSE connection.
    pub fn connect(&self) -> Result<SnapshotEventStream, SourceError> {
        info!("Creating SSE connection to {}", self.config.url);

        let mut event_source = self
            .http
            .get(&self.config.url)
            .eventsource()
            .map_err(|e| SourceError::Sse(e.to_string()))?;
        event_source.set_retry_policy(Box::new(self.config.reconnect.backoff()));

        Ok(SnapshotEventStream {
            event_source,
            assembler: SnapshotAssembler::new(),
            reconnect: self.config.reconnect.clone(),
            attempts: 0,
            closed: false,
        })
    }
}

impl AlertFeed for SseAlertFeed {
    fn subscribe(&self) -> SnapshotStream {
        match self.connect() {
            Ok(stream) => Box::pin(stream),
            Err(e) => {
                error!("Failed to open SSE connection: {}", e);
                Box::pin(stream::once(async move {
                    Err(FeedError::Transport(e.to_string()))
                }))
            }
        }
    }

    fn name(&self) -> &str {
        "sse"
    }
}

/// A stream of whole snapshots assembled from SSE events.
pub struct SnapshotEventStream {
    event_source: EventSource,
    assembler: SnapshotAssembler,
    reconnect: ReconnectConfig,
    attempts: u32,
    closed: bool,
}

impl SnapshotEventStream {
    /// Consecutive failed connection attempts since the last open.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    fn close(&mut self) {
        self.event_source.close();
        self.closed = true;
    }
}

impl Stream for SnapshotEventStream {
    type Item = Result<Snapshot, FeedError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if self.closed {
            return Poll::Ready(None);
        }

        loop {
            match Pin::new(&mut self.event_source).poll_next(cx) {
                Poll::Ready(Some(Ok(event))) => match event {
                    Event::Open => {
                        debug!("SSE connection opened");
                        self.attempts = 0;
                        continue;
                    }
                    Event::Message(msg) => {
                        match self.assembler.apply(&msg.event, &msg.data) {
                            Ok(Some(snapshot)) => {
                                debug!(alerts = snapshot.len(), "Snapshot assembled");
                                return Poll::Ready(Some(Ok(snapshot)));
                            }
                            Ok(None) => continue,
                            Err(e @ FeedError::Cancelled(_)) => {
                                error!("SSE subscription cancelled: {}", e);
                                self.close();
                                return Poll::Ready(Some(Err(e)));
                            }
                            Err(e) => {
                                warn!("Failed to apply SSE event {}: {}", msg.event, e);
                                debug!("Raw data: {}", msg.data);
                                return Poll::Ready(Some(Err(e)));
                            }
                        }
                    }
                },
                Poll::Ready(Some(Err(e))) => {
                    self.attempts += 1;
                    let attempts = self.attempts;
                    if self.reconnect.gives_up_after(attempts) {
                        error!("SSE error: {}, giving up after {} attempts", e, attempts);
                        self.close();
                        return Poll::Ready(Some(Err(FeedError::RetriesExhausted(attempts))));
                    }

                    warn!(
                        "SSE error: {}, reconnecting in about {:?} (attempt {})",
                        e,
                        self.reconnect.delay_after(attempts),
                        attempts
                    );
                    return Poll::Ready(Some(Err(FeedError::Transport(e.to_string()))));
                }
                Poll::Ready(None) => {
                    info!("SSE stream ended");
                    self.closed = true;
                    return Poll::Ready(None);
                }
                Poll::Pending => {
                    return Poll::Pending;
                }
            }
        }
    }
}
