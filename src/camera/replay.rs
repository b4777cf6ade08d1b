// Replay camera: loops the frames of a recorded MJPEG file at a fixed rate.
// Stands in for the external capture pipeline during bench work and demos.

use std::path::Path;
use std::thread::sleep;
use std::time::{Duration, Instant};

use bytes::Bytes;
use tracing::info;

use super::mjpeg::split_frames;
use super::{CameraError, FrameSource, Result};

#[derive(Debug)]
pub struct ReplayCamera {
    frames: Vec<Bytes>,
    cursor: usize,
    interval: Duration,
    last_frame_at: Option<Instant>,
}

impl ReplayCamera {
    /// Load a recording and prepare to replay it at `fps` frames per second.
    pub fn open(path: &Path, fps: u32) -> Result<Self> {
        let data = std::fs::read(path)?;
        let frames = split_frames(&data);
        if frames.is_empty() {
            return Err(CameraError::NoFrames(path.display().to_string()));
        }
        info!("Loaded {} frames from {}", frames.len(), path.display());
        Ok(Self {
            frames,
            cursor: 0,
            interval: Duration::from_secs(1) / fps.max(1),
            last_frame_at: None,
        })
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }
}

impl FrameSource for ReplayCamera {
    fn next_frame(&mut self) -> Result<Bytes> {
        // Hold the replay to its frame rate; callers pull from the blocking
        // pool, so sleeping here is fine.
        if let Some(last) = self.last_frame_at {
            let since = last.elapsed();
            if since < self.interval {
                sleep(self.interval - since);
            }
        }
        self.last_frame_at = Some(Instant::now());

        let frame = self.frames[self.cursor].clone();
        self.cursor = (self.cursor + 1) % self.frames.len();
        Ok(frame)
    }
}
