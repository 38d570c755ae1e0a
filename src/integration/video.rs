//! Sequential frame source and sink contracts.

use std::collections::VecDeque;
use std::convert::Infallible;

use image::RgbImage;

/// Stream properties reported by a [`FrameSource`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VideoInfo {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    /// Advisory; the source may end earlier or later
    pub frame_count: u64,
}

/// Yields decoded frames in playback order.
pub trait FrameSource {
    type Error: std::error::Error + Send + Sync + 'static;

    fn info(&self) -> VideoInfo;

    /// Next frame, or `Ok(None)` once the stream is exhausted.
    fn next_frame(&mut self) -> Result<Option<RgbImage>, Self::Error>;
}

/// Accepts frames in playback order and encodes them.
pub trait FrameSink {
    type Error: std::error::Error + Send + Sync + 'static;

    fn write_frame(&mut self, frame: &RgbImage) -> Result<(), Self::Error>;

    /// Flush and close the output. Called once after the last frame.
    fn finish(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// In-memory source over pre-decoded frames.
#[derive(Debug, Clone)]
pub struct VecFrameSource {
    info: VideoInfo,
    frames: VecDeque<RgbImage>,
}

impl VecFrameSource {
    pub fn new(frames: Vec<RgbImage>, fps: f64) -> Self {
        let (width, height) = frames.first().map(|f| f.dimensions()).unwrap_or((0, 0));
        Self {
            info: VideoInfo {
                width,
                height,
                fps,
                frame_count: frames.len() as u64,
            },
            frames: frames.into(),
        }
    }

    /// `count` black frames of the given size.
    pub fn blank(width: u32, height: u32, fps: f64, count: usize) -> Self {
        Self::new(vec![RgbImage::new(width, height); count], fps)
    }
}

impl FrameSource for VecFrameSource {
    type Error = Infallible;

    fn info(&self) -> VideoInfo {
        self.info
    }

    fn next_frame(&mut self) -> Result<Option<RgbImage>, Self::Error> {
        Ok(self.frames.pop_front())
    }
}

/// Collects written frames in memory.
#[derive(Debug, Clone, Default)]
pub struct VecFrameSink {
    pub frames: Vec<RgbImage>,
    pub finished: bool,
}

impl FrameSink for VecFrameSink {
    type Error = Infallible;

    fn write_frame(&mut self, frame: &RgbImage) -> Result<(), Self::Error> {
        self.frames.push(frame.clone());
        Ok(())
    }

    fn finish(&mut self) -> Result<(), Self::Error> {
        self.finished = true;
        Ok(())
    }
}
