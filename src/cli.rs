// SPDX-License-Identifier: GPL-3.0-only

//! CLI entry point for the demo pipeline

use gesture_capture::pipeline::{CapturePipeline, PipelineObserver, StubSink};
use gesture_capture::{Config, PipelineResult, SyntheticSource};
use std::time::Duration;
use tracing::{debug, info};

/// Prints recognized text to stdout as it arrives
#[derive(Default)]
struct ConsoleObserver {
    frames: u64,
}

impl PipelineObserver for ConsoleObserver {
    fn on_frame_ready(&mut self, width: u32, height: u32) {
        self.frames += 1;
        debug!(width, height, frame = self.frames, "Frame captured");
    }

    fn on_text_updated(&mut self, text: &str) {
        println!("--- recognized text ---");
        print!("{}", text);
    }
}

/// Run the capture pipeline against a synthetic camera for `duration`
pub async fn run(config: Config, duration: Duration) -> PipelineResult<()> {
    config.validate()?;
    info!(
        fps = config.fps,
        width = config.width,
        height = config.height,
        quality = config.jpeg_quality,
        "Starting demo pipeline"
    );

    let source = SyntheticSource::new(config.width, config.height);
    let mut pipeline = CapturePipeline::new(
        source,
        &config,
        Box::new(StubSink::default()),
        ConsoleObserver::default(),
    );

    pipeline.start()?;
    pipeline.run_for(duration).await;

    info!(
        frames = pipeline.observer().frames,
        "Demo pipeline finished"
    );
    Ok(())
}
