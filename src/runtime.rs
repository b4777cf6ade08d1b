// Composition root: builds the motor controller and the HTTP surface, serves
// until interrupted, then returns the outputs to a safe state.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::config::{DEFAULT_FPS, DEFAULT_LISTEN};
use crate::motor::{L298nDriver, MotorController, MotorHardware, SimulatedDriver};
use crate::server::{AppState, CameraConfig, router};

/// Web-controlled skid-steer robot car runtime
#[derive(Debug, Parser)]
#[command(name = "picar-runtime")]
pub struct Cli {
    /// Address the HTTP surface listens on
    #[arg(long, default_value = DEFAULT_LISTEN)]
    pub listen: String,

    /// Use the simulated motor driver instead of the GPIO hardware
    #[arg(long)]
    pub sim: bool,

    /// Recorded MJPEG file to serve on /video_feed
    #[arg(long)]
    pub video: Option<PathBuf>,

    /// Frame rate of the replay camera
    #[arg(long, default_value_t = DEFAULT_FPS)]
    pub fps: u32,
}

pub async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let hw: Box<dyn MotorHardware> = if cli.sim {
        info!("Motor hardware disabled, using simulated driver");
        Box::new(SimulatedDriver::new())
    } else {
        info!("Opening L298N driver on GPIO");
        Box::new(L298nDriver::open()?)
    };

    let mut controller = MotorController::new(hw);
    controller.initialize()?;

    let camera = cli.video.map(|video| CameraConfig {
        video,
        fps: cli.fps,
    });
    if camera.is_none() {
        info!("No camera source configured; /video_feed will answer 503");
    }

    let state = Arc::new(AppState {
        controller: Mutex::new(controller),
        camera,
    });

    let listener = TcpListener::bind(&cli.listen).await?;
    info!("Listening on {}", cli.listen);

    axum::serve(listener, router(state.clone()))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Back to the safe state before the process exits
    let mut controller = state.controller.lock().await;
    if let Err(e) = controller.shutdown() {
        warn!("Failed to release motor outputs: {}", e);
    }
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown requested"),
        Err(e) => {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
