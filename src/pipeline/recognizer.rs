// SPDX-License-Identifier: GPL-3.0-only

//! Background recognition worker
//!
//! A dedicated worker thread consumes jobs in FIFO order: each frame is
//! converted to RGB, JPEG-encoded, and pushed to the recognition sink, and
//! the accumulated text plus the spent frame buffer are posted back to the
//! coordinating context. The converter and its cached resources live only
//! on this thread.
//!
//! Stopping the pipeline never cancels jobs already enqueued; they run to
//! completion before the worker exits.

use std::sync::mpsc;
use std::thread::{self, JoinHandle};

use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

use crate::backends::camera::RawFrame;
use crate::errors::PipelineResult;
use crate::media::jpeg_encoder::encode_rgb_jpeg;
use crate::media::nv21_converter::Nv21Converter;
use crate::pipeline::PipelineEvent;

/// Opaque recognition/network collaborator
///
/// Accepts encoded frames and accumulates recognized text. Runs entirely on
/// the worker thread. The transport behind it is out of scope here; see
/// [`StubSink`] for the placeholder used until a service exists.
pub trait RecognitionSink: Send {
    /// A recognition session began (capture started)
    fn begin_session(&mut self);

    /// The session ended (capture stopped)
    fn end_session(&mut self);

    /// One JPEG-encoded frame
    fn push_jpeg(&mut self, jpeg: &[u8]);

    /// Text accumulated so far. The frame just pushed has usually not been
    /// processed yet; the result reflects earlier frames.
    fn recognized_text(&mut self) -> String;
}

/// Placeholder sink prepending an incrementing counter per query
#[derive(Debug, Default)]
pub struct StubSink {
    text: String,
    counter: u64,
    frames: u64,
}

impl RecognitionSink for StubSink {
    fn begin_session(&mut self) {
        debug!("Recognition session started");
    }

    fn end_session(&mut self) {
        debug!(frames = self.frames, "Recognition session ended");
    }

    fn push_jpeg(&mut self, jpeg: &[u8]) {
        self.frames += 1;
        debug!(bytes = jpeg.len(), "Frame submitted to stub sink");
    }

    fn recognized_text(&mut self) -> String {
        self.text = format!("{}\n{}", self.counter, self.text);
        self.counter += 1;
        self.text.clone()
    }
}

enum Job {
    BeginSession,
    EndSession,
    Frame(RawFrame),
}

/// Handle to the background worker; jobs execute in enqueue order
pub struct AsyncRecognizer {
    jobs: Option<mpsc::Sender<Job>>,
    worker: Option<JoinHandle<()>>,
}

impl AsyncRecognizer {
    /// Spawn the worker thread
    ///
    /// `events` carries `TextUpdated` and `BufferReleased` messages back to
    /// the coordinating context.
    pub fn new(
        sink: Box<dyn RecognitionSink>,
        jpeg_quality: u8,
        events: UnboundedSender<PipelineEvent>,
    ) -> Self {
        let (jobs, job_rx) = mpsc::channel();
        let worker = thread::Builder::new()
            .name("recognizer-worker".into())
            .spawn(move || worker_loop(job_rx, sink, jpeg_quality, events));

        match worker {
            Ok(handle) => Self {
                jobs: Some(jobs),
                worker: Some(handle),
            },
            Err(e) => {
                warn!(error = %e, "Failed to spawn recognizer worker");
                Self {
                    jobs: None,
                    worker: None,
                }
            }
        }
    }

    pub fn begin_session(&self) {
        self.post(Job::BeginSession);
    }

    pub fn end_session(&self) {
        self.post(Job::EndSession);
    }

    /// Enqueue a frame for conversion, encoding, and submission
    pub fn send_frame(&self, frame: RawFrame) {
        self.post(Job::Frame(frame));
    }

    fn post(&self, job: Job) {
        if let Some(jobs) = &self.jobs {
            // only fails when the worker is gone; nothing to do then
            let _ = jobs.send(job);
        }
    }
}

impl Drop for AsyncRecognizer {
    fn drop(&mut self) {
        // hang up the queue, then let queued work finish
        self.jobs.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("Recognizer worker panicked");
            }
        }
    }
}

fn worker_loop(
    jobs: mpsc::Receiver<Job>,
    mut sink: Box<dyn RecognitionSink>,
    jpeg_quality: u8,
    events: UnboundedSender<PipelineEvent>,
) {
    debug!("Recognizer worker started");
    let mut converter = Nv21Converter::new();

    while let Ok(job) = jobs.recv() {
        match job {
            Job::BeginSession => sink.begin_session(),
            Job::EndSession => sink.end_session(),
            Job::Frame(frame) => {
                match process_frame(&mut converter, sink.as_mut(), &frame, jpeg_quality) {
                    Ok(text) => {
                        let _ = events.send(PipelineEvent::TextUpdated(text));
                    }
                    Err(e) => warn!(error = %e, "Dropping frame"),
                }
                // the spent buffer goes back to the frame buffer manager
                // whether or not processing succeeded
                let _ = events.send(PipelineEvent::BufferReleased(frame.into_data()));
            }
        }
    }
    debug!("Recognizer worker exiting");
}

fn process_frame(
    converter: &mut Nv21Converter,
    sink: &mut dyn RecognitionSink,
    frame: &RawFrame,
    jpeg_quality: u8,
) -> PipelineResult<String> {
    let rgb = converter.convert(frame)?;
    let jpeg = encode_rgb_jpeg(rgb, jpeg_quality)?;
    sink.push_jpeg(&jpeg);
    Ok(sink.recognized_text())
}
