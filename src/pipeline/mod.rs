// SPDX-License-Identifier: GPL-3.0-only

//! Capture pipeline coordination
//!
//! Wires the ticker, the frame buffer manager, a capture source, and the
//! background recognizer into a single coordinating event loop:
//!
//! ```text
//! ┌────────────┐ tick ┌──────────────────┐ buffer ┌────────────────┐
//! │  Ticker     │ ───▶ │ Coordinating     │ ─────▶ │ Capture source │
//! │  (thread)   │      │ event loop       │ ◀───── │                │
//! └────────────┘      │  - submit buffer │ frame  └────────────────┘
//!                     │  - recycle buffer│
//!                     │  - notify UI     │ frame  ┌────────────────┐
//!                     │                  │ ─────▶ │ Recognizer     │
//!                     └──────────────────┘ ◀───── │ worker (thread)│
//!                              text, spent buffer └────────────────┘
//! ```
//!
//! The coordinating context processes messages serially; the worker
//! processes jobs serially; the two only communicate by message passing.
//! Nothing here blocks: conversion and encoding happen exclusively on the
//! worker thread.

pub mod frame_buffer;
pub mod recognizer;
pub mod ticker;

pub use frame_buffer::FrameBufferManager;
pub use recognizer::{AsyncRecognizer, RecognitionSink, StubSink};
pub use ticker::CaptureTicker;

use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::{debug, info, warn};

use crate::backends::camera::{CaptureSource, FrameReceiver, FrameSender, RawFrame};
use crate::config::Config;
use crate::constants::SHUTDOWN_GRACE_MS;
use crate::errors::PipelineResult;

/// Messages processed serially on the coordinating context
#[derive(Debug)]
pub enum PipelineEvent {
    /// The capture ticker fired
    Tick,
    /// The background worker finished with a frame buffer
    BufferReleased(Vec<u8>),
    /// The recognition sink returned updated text
    TextUpdated(String),
}

/// UI collaborator; both callbacks run on the coordinating context only
pub trait PipelineObserver {
    /// A filled frame arrived from the capture source
    fn on_frame_ready(&mut self, _width: u32, _height: u32) {}

    /// The accumulated recognized text changed
    fn on_text_updated(&mut self, _text: &str) {}
}

/// The assembled capture pipeline
///
/// Owns the coordinating event loop state. Created idle; [`start`](Self::start)
/// opens the source and begins ticking, [`stop`](Self::stop) returns to idle.
/// Background work already enqueued when `stop` is called runs to completion.
pub struct CapturePipeline<S: CaptureSource, O: PipelineObserver> {
    source: S,
    observer: O,
    manager: FrameBufferManager,
    recognizer: AsyncRecognizer,
    ticker: CaptureTicker,
    events_rx: UnboundedReceiver<PipelineEvent>,
    frames_tx: FrameSender,
    frames_rx: FrameReceiver,
}

impl<S: CaptureSource, O: PipelineObserver> CapturePipeline<S, O> {
    /// Assemble a pipeline; nothing runs until [`start`](Self::start)
    pub fn new(source: S, config: &Config, sink: Box<dyn RecognitionSink>, observer: O) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (frames_tx, frames_rx) = mpsc::unbounded_channel();

        let tick_tx = events_tx.clone();
        let ticker = CaptureTicker::new(config.fps, move || {
            let _ = tick_tx.send(PipelineEvent::Tick);
        });
        let recognizer = AsyncRecognizer::new(sink, config.jpeg_quality, events_tx);

        Self {
            source,
            observer,
            manager: FrameBufferManager::new(),
            recognizer,
            ticker,
            events_rx,
            frames_tx,
            frames_rx,
        }
    }

    /// Open the source, begin a recognition session, and start ticking
    pub fn start(&mut self) -> PipelineResult<()> {
        info!("Starting capture pipeline");
        self.source.open(self.frames_tx.clone())?;
        self.recognizer.begin_session();
        self.ticker.start();
        Ok(())
    }

    /// Stop ticking and close the source
    ///
    /// Only prevents new frame requests; frames already with the worker run
    /// to completion.
    pub fn stop(&mut self) {
        info!("Stopping capture pipeline");
        self.ticker.stop();
        self.recognizer.end_session();
        self.source.close();
    }

    pub fn is_running(&self) -> bool {
        self.ticker.is_running()
    }

    /// Access the UI observer, e.g. to read accumulated state after a run
    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Process one coordinating-context message
    pub fn handle_event(&mut self, event: PipelineEvent) {
        match event {
            PipelineEvent::Tick => self.on_tick(),
            PipelineEvent::BufferReleased(buffer) => self.manager.put_back(buffer),
            PipelineEvent::TextUpdated(text) => self.observer.on_text_updated(&text),
        }
    }

    /// Process one filled frame from the capture source
    pub fn handle_frame(&mut self, frame: RawFrame) {
        self.observer.on_frame_ready(frame.width, frame.height);
        self.recognizer.send_frame(frame);
    }

    /// Drive the coordinating context for `duration`, then stop and drain
    /// work already in flight
    pub async fn run_for(&mut self, duration: Duration) {
        let deadline = tokio::time::Instant::now() + duration;
        loop {
            tokio::select! {
                _ = tokio::time::sleep_until(deadline) => break,
                Some(event) = self.events_rx.recv() => self.handle_event(event),
                Some(frame) = self.frames_rx.recv() => self.handle_frame(frame),
            }
        }
        self.stop();
        self.drain(Duration::from_millis(SHUTDOWN_GRACE_MS)).await;
    }

    /// Keep processing messages briefly so enqueued background work can
    /// deliver its results after a stop
    async fn drain(&mut self, grace: Duration) {
        let deadline = tokio::time::Instant::now() + grace;
        loop {
            tokio::select! {
                _ = tokio::time::sleep_until(deadline) => break,
                Some(event) = self.events_rx.recv() => self.handle_event(event),
                Some(frame) = self.frames_rx.recv() => self.handle_frame(frame),
            }
        }
    }

    fn on_tick(&mut self) {
        if !self.ticker.is_running() {
            // a tick queued before stop landed after it
            return;
        }
        if self.manager.is_in_flight() {
            // the single buffer is still with the source or the worker
            debug!("Tick skipped, frame buffer in flight");
            return;
        }

        let (width, height) = self.source.preview_size();
        let format = self.source.pixel_format();
        let buffer = self.manager.take(width, height, format);
        if let Err(e) = self.source.queue_buffer(buffer) {
            warn!(error = %e, "Failed to queue capture buffer");
            self.manager.reset();
        }
    }
}
