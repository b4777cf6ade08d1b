// Camera frame source and MJPEG delivery
//
// Frame capture and JPEG encoding live outside this runtime; this module
// defines the pull contract the streaming responder consumes, the multipart
// framing it emits, and a replay source that loops a recorded MJPEG file.

pub mod mjpeg;
pub mod replay;

use bytes::Bytes;

/// Error types for frame acquisition
#[derive(Debug, thiserror::Error)]
pub enum CameraError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("no JPEG frames found in {0}")]
    NoFrames(String),
}

pub type Result<T> = std::result::Result<T, CameraError>;

/// Pull-based producer of JPEG-encoded frames.
///
/// A source is lazy and logically infinite: it keeps yielding frames until
/// the consumer drops it, and cannot be restarted. Pacing belongs to the
/// consumer side of the contract; a source never pushes.
pub trait FrameSource: Send {
    fn next_frame(&mut self) -> Result<Bytes>;
}
