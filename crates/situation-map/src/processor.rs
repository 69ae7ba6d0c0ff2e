//! Drives a feed through the pipeline and hands frames to a sink.

use std::io::Write;

use alert_core::{AlertFeed, RegionCatalog};
use futures::StreamExt;
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::error::SituationError;
use crate::frame::RenderFrame;
use crate::pipeline::SituationMap;

/// Consumer of render frames.
pub trait FrameSink: Send {
    fn emit(&mut self, frame: &RenderFrame) -> Result<(), SituationError>;
}

impl FrameSink for Vec<RenderFrame> {
    fn emit(&mut self, frame: &RenderFrame) -> Result<(), SituationError> {
        self.push(frame.clone());
        Ok(())
    }
}

impl FrameSink for mpsc::UnboundedSender<RenderFrame> {
    fn emit(&mut self, frame: &RenderFrame) -> Result<(), SituationError> {
        self.send(frame.clone())
            .map_err(|_| SituationError::SinkClosed)
    }
}

/// How [`JsonLinesSink`] encodes a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// The full [`RenderFrame`].
    #[default]
    Frame,
    /// A GeoJSON feature collection of the shapes.
    GeoJson,
}

/// Writes one JSON document per frame, newline-terminated.
#[derive(Debug)]
pub struct JsonLinesSink<W> {
    writer: W,
    format: OutputFormat,
}

impl<W: Write + Send> JsonLinesSink<W> {
    pub fn new(writer: W, format: OutputFormat) -> Self {
        Self { writer, format }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_line<T: Serialize>(&mut self, value: &T) -> Result<(), SituationError> {
        serde_json::to_writer(&mut self.writer, value)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

impl<W: Write + Send> FrameSink for JsonLinesSink<W> {
    fn emit(&mut self, frame: &RenderFrame) -> Result<(), SituationError> {
        match self.format {
            OutputFormat::Frame => self.write_line(frame),
            OutputFormat::GeoJson => self.write_line(&frame.to_feature_collection()),
        }
    }
}

/// Why a run finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The shutdown signal completed.
    Shutdown,
    /// The feed stream ended.
    StreamEnded,
}

/// Counters for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub stop: StopReason,
    /// Frames produced from snapshots.
    pub snapshots: usize,
    /// Frames re-emitted because highlights expired.
    pub refreshes: usize,
    pub feed_errors: usize,
}

/// Runs a [`SituationMap`] over an [`AlertFeed`].
pub struct SituationProcessor<F, C, S> {
    feed: F,
    map: SituationMap<C>,
    sink: S,
}

impl<F, C, S> SituationProcessor<F, C, S>
where
    F: AlertFeed,
    C: RegionCatalog,
    S: FrameSink,
{
    pub fn new(feed: F, map: SituationMap<C>, sink: S) -> Self {
        Self { feed, map, sink }
    }

    pub fn map(&self) -> &SituationMap<C> {
        &self.map
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Run until the feed ends.
    pub async fn run(&mut self) -> Result<RunSummary, SituationError> {
        self.run_with_shutdown(std::future::pending()).await
    }

    /// Run until the feed ends or the shutdown signal completes.
    ///
    /// Feed errors are logged and skipped. When highlights expire between
    /// snapshots, the last frame is re-emitted with updated styling. On
    /// return, pending highlight timers are cancelled.
    pub async fn run_with_shutdown<Sig>(
        &mut self,
        shutdown_signal: Sig,
    ) -> Result<RunSummary, SituationError>
    where
        Sig: std::future::Future<Output = ()> + Send,
    {
        info!("Starting situation processor with feed: {}", self.feed.name());

        let mut stream = self.feed.subscribe();
        let mut highlight_changes = self.map.highlights().subscribe();
        let mut last_frame: Option<RenderFrame> = None;
        let mut summary = RunSummary {
            stop: StopReason::StreamEnded,
            snapshots: 0,
            refreshes: 0,
            feed_errors: 0,
        };

        tokio::pin!(shutdown_signal);

        let result = loop {
            tokio::select! {
                biased;

                () = &mut shutdown_signal => {
                    info!("Shutdown signal received, stopping situation processor");
                    summary.stop = StopReason::Shutdown;
                    break Ok(());
                }

                item = stream.next() => {
                    match item {
                        Some(Ok(snapshot)) => {
                            let frame = self.map.apply(&snapshot);
                            // Changes made by this pass are already in the frame.
                            highlight_changes.borrow_and_update();
                            if let Err(e) = self.sink.emit(&frame) {
                                error!("Failed to emit frame: {}", e);
                                break Err(e);
                            }
                            summary.snapshots += 1;
                            last_frame = Some(frame);
                        }
                        Some(Err(e)) => {
                            warn!("Feed error: {}", e);
                            summary.feed_errors += 1;
                        }
                        None => {
                            warn!("Alert feed ended");
                            break Ok(());
                        }
                    }
                }

                Ok(()) = highlight_changes.changed() => {
                    highlight_changes.borrow_and_update();
                    if let Some(frame) = last_frame.as_ref() {
                        debug!("Highlights changed, refreshing frame");
                        let refreshed = self.map.refresh(frame);
                        if let Err(e) = self.sink.emit(&refreshed) {
                            error!("Failed to emit frame: {}", e);
                            break Err(e);
                        }
                        summary.refreshes += 1;
                        last_frame = Some(refreshed);
                    }
                }
            }
        };

        self.map.dispose();
        info!(
            snapshots = summary.snapshots,
            refreshes = summary.refreshes,
            feed_errors = summary.feed_errors,
            "Situation processor stopped"
        );
        result.map(|()| summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SituationConfig;
    use alert_core::{AlertEvent, AlertStatus, FeedError, InMemoryCatalog, LatLng, RegionPolygon};
    use alert_feed::ChannelFeed;
    use std::time::Duration;

    fn map() -> SituationMap<InMemoryCatalog> {
        let catalog = InMemoryCatalog::from_regions(vec![RegionPolygon::new(
            "X",
            vec![
                LatLng::new(32.0, 34.8),
                LatLng::new(32.0, 34.9),
                LatLng::new(32.1, 34.9),
            ],
        )]);
        SituationMap::new(catalog, &SituationConfig::default())
    }

    #[tokio::test]
    async fn test_run_until_feed_ends() {
        let (tx, feed) = ChannelFeed::new(8);
        tx.send(Ok(vec![AlertEvent::new("1", "X", AlertStatus::PreAlert, 1)]))
            .await
            .unwrap();
        tx.send(Err(FeedError::Transport("blip".into())))
            .await
            .unwrap();
        tx.send(Ok(vec![])).await.unwrap();
        drop(tx);

        let mut processor = SituationProcessor::new(feed, map(), Vec::new());
        let summary = processor.run().await.unwrap();

        assert_eq!(summary.stop, StopReason::StreamEnded);
        assert_eq!(summary.snapshots, 2);
        assert_eq!(summary.feed_errors, 1);

        let frames = processor.into_sink();
        assert_eq!(frames.len(), 2);
        assert!(frames[0].fit.is_some());
        assert!(frames[1].shapes.is_empty());
    }

    #[tokio::test]
    async fn test_shutdown_stops_and_cancels_timers() {
        let (tx, feed) = ChannelFeed::new(8);
        tx.send(Ok(vec![AlertEvent::new("1", "X", AlertStatus::Active, 1)]))
            .await
            .unwrap();

        let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
        let (frame_tx, mut frame_rx) = mpsc::unbounded_channel();
        let mut processor = SituationProcessor::new(feed, map(), frame_tx);

        let run = processor.run_with_shutdown(async {
            let _ = stop_rx.await;
        });
        let stopper = async {
            let frame = frame_rx.recv().await.unwrap();
            assert!(frame.shapes[0].is_new);
            stop_tx.send(()).unwrap();
        };

        let (summary, ()) = tokio::join!(run, stopper);
        let summary = summary.unwrap();
        assert_eq!(summary.stop, StopReason::Shutdown);
        assert_eq!(summary.snapshots, 1);
        assert!(processor.map().highlights().contains("1"));
        drop(tx);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expiry_refreshes_last_frame() {
        let (tx, feed) = ChannelFeed::new(8);
        tx.send(Ok(vec![AlertEvent::new("1", "X", AlertStatus::Active, 1)]))
            .await
            .unwrap();

        let mut processor = SituationProcessor::new(feed, map(), Vec::new());
        let summary = processor
            .run_with_shutdown(tokio::time::sleep(Duration::from_secs(10)))
            .await
            .unwrap();
        drop(tx);

        assert_eq!(summary.snapshots, 1);
        assert_eq!(summary.refreshes, 1);

        let frames = processor.into_sink();
        assert!(frames[0].shapes[0].is_new);
        assert!(!frames[1].shapes[0].is_new);
        assert!(frames[1].highlighted.is_empty());
    }

    #[test]
    fn test_json_lines_sink_formats() {
        let mut map = map();
        let frame = map.apply(&[AlertEvent::new("1", "X", AlertStatus::PreAlert, 1)]);

        let mut sink = JsonLinesSink::new(Vec::new(), OutputFormat::Frame);
        sink.emit(&frame).unwrap();
        sink.emit(&frame).unwrap();
        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(out.lines().count(), 2);
        let value: serde_json::Value = serde_json::from_str(out.lines().next().unwrap()).unwrap();
        assert_eq!(value["shapes"][0]["shape"]["status"], "pre_alert");

        let mut sink = JsonLinesSink::new(Vec::new(), OutputFormat::GeoJson);
        sink.emit(&frame).unwrap();
        let out = String::from_utf8(sink.into_inner()).unwrap();
        let value: serde_json::Value = serde_json::from_str(out.trim()).unwrap();
        assert_eq!(value["type"], "FeatureCollection");
        assert_eq!(value["features"][0]["properties"]["status"], "pre_alert");
    }
}
