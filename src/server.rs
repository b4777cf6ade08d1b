// HTTP dispatch surface
//
// Exposes the directional trigger routes, the JSON state report, and the
// MJPEG stream endpoint. Handlers may run concurrently; every command goes
// through the one controller mutex, so duty-cycle and direction writes of
// different requests never interleave.

use std::convert::Infallible;
use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use axum::{Json, Router};
use axum::routing::get;
use bytes::Bytes;
use futures::stream;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::camera::replay::ReplayCamera;
use crate::camera::{FrameSource, mjpeg};
use crate::frontend::INDEX_HTML;
use crate::messages::{DriveCommand, StateReport};
use crate::motor::MotorController;

/// Replay source configuration for `/video_feed`. Each attached client gets
/// its own source, opened on demand.
#[derive(Debug, Clone)]
pub struct CameraConfig {
    pub video: PathBuf,
    pub fps: u32,
}

/// Shared server state: the single mutual-exclusion domain around the motor
/// controller, plus the camera configuration.
pub struct AppState {
    pub controller: Mutex<MotorController>,
    pub camera: Option<CameraConfig>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/state", get(state_report))
        .route("/video_feed", get(video_feed))
        .route("/{command}", get(drive))
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Parse the route segment as a drive command and apply it. Unmapped names
/// never reach the interpreter.
async fn drive(Path(command): Path<String>, State(state): State<Arc<AppState>>) -> Response {
    let cmd: DriveCommand = match command.parse() {
        Ok(cmd) => cmd,
        Err(e) => {
            warn!("Rejected request: {}", e);
            return (StatusCode::BAD_REQUEST, e.to_string()).into_response();
        }
    };

    let mut controller = state.controller.lock().await;
    match controller.apply(cmd) {
        // Fire-and-forget acknowledgement, no payload
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            error!("Hardware write failed for '{}': {}", cmd, e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

async fn state_report(State(state): State<Arc<AppState>>) -> Json<StateReport> {
    let controller = state.controller.lock().await;
    Json(StateReport::from(&controller.state()))
}

async fn video_feed(State(state): State<Arc<AppState>>) -> Response {
    let Some(camera) = state.camera.clone() else {
        return (StatusCode::SERVICE_UNAVAILABLE, "no camera source configured").into_response();
    };

    let source = match ReplayCamera::open(&camera.video, camera.fps) {
        Ok(source) => source,
        Err(e) => {
            error!("Failed to open camera source: {}", e);
            return (StatusCode::SERVICE_UNAVAILABLE, e.to_string()).into_response();
        }
    };

    info!("Client attached to video feed");
    mjpeg_response(source)
}

/// Build the never-ending multipart response. One frame is pulled per poll on
/// the blocking pool; the HTTP writer's progress paces the pulls, and nothing
/// signals back to the producer.
fn mjpeg_response<S: FrameSource + 'static>(source: S) -> Response {
    let stream = stream::unfold(Some(source), |slot| async move {
        let source = slot?;
        let (frame, source) = tokio::task::spawn_blocking(move || {
            let mut source = source;
            let frame = source.next_frame();
            (frame, source)
        })
        .await
        .ok()?;

        match frame {
            Ok(jpeg) => Some((
                Ok::<Bytes, Infallible>(mjpeg::encapsulate(&jpeg)),
                Some(source),
            )),
            Err(e) => {
                warn!("Frame source stopped: {}", e);
                None
            }
        }
    });

    (
        [(header::CONTENT_TYPE, mjpeg::MIME_TYPE)],
        Body::from_stream(stream),
    )
        .into_response()
}
