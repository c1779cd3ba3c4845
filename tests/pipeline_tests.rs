// SPDX-License-Identifier: GPL-3.0-only

//! End-to-end pipeline tests over the synthetic capture source

use gesture_capture::pipeline::{CapturePipeline, PipelineObserver, StubSink};
use gesture_capture::{Config, PipelineError, SyntheticSource};
use std::time::Duration;

#[derive(Default)]
struct RecordingObserver {
    texts: Vec<String>,
    frames: u32,
}

impl PipelineObserver for RecordingObserver {
    fn on_frame_ready(&mut self, _width: u32, _height: u32) {
        self.frames += 1;
    }

    fn on_text_updated(&mut self, text: &str) {
        self.texts.push(text.to_string());
    }
}

fn test_config() -> Config {
    Config {
        fps: 20,
        jpeg_quality: 80,
        width: 160,
        height: 120,
    }
}

#[tokio::test]
async fn pipeline_accumulates_stub_text() {
    let config = test_config();
    let source = SyntheticSource::new(config.width, config.height);
    let mut pipeline = CapturePipeline::new(
        source,
        &config,
        Box::new(StubSink::default()),
        RecordingObserver::default(),
    );

    pipeline.start().expect("pipeline should start");
    pipeline.run_for(Duration::from_millis(600)).await;

    let observer = pipeline.observer();
    assert!(observer.frames >= 2, "expected several captured frames");
    assert!(!observer.texts.is_empty(), "expected recognized text updates");

    // the stub prepends a counter per frame, so text grows monotonically
    assert_eq!(observer.texts[0], "0\n");
    for pair in observer.texts.windows(2) {
        assert!(
            pair[1].len() > pair[0].len(),
            "accumulated text must keep growing"
        );
        assert!(
            pair[1].ends_with(pair[0].as_str()),
            "new text must extend the previous text"
        );
    }
}

#[tokio::test]
async fn pipeline_stops_after_run() {
    let config = test_config();
    let source = SyntheticSource::new(config.width, config.height);
    let mut pipeline = CapturePipeline::new(
        source,
        &config,
        Box::new(StubSink::default()),
        RecordingObserver::default(),
    );

    pipeline.start().expect("pipeline should start");
    assert!(pipeline.is_running());
    pipeline.run_for(Duration::from_millis(200)).await;
    assert!(!pipeline.is_running());
}

#[tokio::test]
async fn open_failure_is_terminal() {
    let config = test_config();
    // zero resolution cannot be opened
    let source = SyntheticSource::new(0, 0);
    let mut pipeline = CapturePipeline::new(
        source,
        &config,
        Box::new(StubSink::default()),
        RecordingObserver::default(),
    );

    match pipeline.start() {
        Err(PipelineError::Capture(_)) => {}
        other => panic!("expected a capture error, got {:?}", other.err()),
    }
    assert!(!pipeline.is_running());
}

#[tokio::test]
async fn each_frame_produces_at_most_one_text_update() {
    let config = test_config();
    let source = SyntheticSource::new(config.width, config.height);
    let mut pipeline = CapturePipeline::new(
        source,
        &config,
        Box::new(StubSink::default()),
        RecordingObserver::default(),
    );

    pipeline.start().expect("pipeline should start");
    pipeline.run_for(Duration::from_millis(400)).await;

    let observer = pipeline.observer();
    assert!(observer.texts.len() <= observer.frames as usize);
}
