// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand};
use gesture_capture::Config;
use std::path::PathBuf;
use std::time::Duration;

mod cli;

#[derive(Parser)]
#[command(name = "gesture-capture")]
#[command(about = "Camera preview capture and recognition pipeline")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the capture pipeline against a synthetic camera
    Run {
        /// Capture rate in frames per second
        #[arg(long)]
        fps: Option<u32>,

        /// JPEG quality for recognizer uploads (1-100)
        #[arg(long)]
        quality: Option<u8>,

        /// Preview width in pixels
        #[arg(long)]
        width: Option<u32>,

        /// Preview height in pixels
        #[arg(long)]
        height: Option<u32>,

        /// How long to run, in seconds
        #[arg(short, long, default_value = "5")]
        duration: u64,

        /// Path to a JSON config file; CLI flags override its values
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=gesture_capture=debug, RUST_LOG=info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .init();

    let args = Cli::parse();

    match args.command {
        Commands::Run {
            fps,
            quality,
            width,
            height,
            duration,
            config,
        } => {
            let mut config = match config {
                Some(path) => Config::load(&path)?,
                None => Config::default(),
            };
            if let Some(fps) = fps {
                config.fps = fps;
            }
            if let Some(quality) = quality {
                config.jpeg_quality = quality;
            }
            if let Some(width) = width {
                config.width = width;
            }
            if let Some(height) = height {
                config.height = height;
            }

            cli::run(config, Duration::from_secs(duration)).await?;
        }
    }

    Ok(())
}
