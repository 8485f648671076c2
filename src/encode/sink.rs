use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{StillclipError, StillclipResult};
use crate::foundation::time::Duration;
use crate::render::frame::FrameRGBA;

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Output frames-per-second.
    pub fps: Fps,
}

impl SinkConfig {
    /// Presentation time of frame `idx`.
    pub fn presentation_time(&self, idx: FrameIndex) -> StillclipResult<Duration> {
        self.fps.frames_to_duration(idx.0)
    }
}

/// Sink contract for consuming rendered frames in timeline order.
///
/// Ordering contract: `push_frame` is called in strictly increasing `FrameIndex` order.
pub trait FrameSink {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> StillclipResult<()>;
    /// Push one frame in strictly increasing timeline order.
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> StillclipResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> StillclipResult<()>;

    /// Push `count` copies of `frame` at consecutive indices starting at `first`.
    ///
    /// The default forwards to [`FrameSink::push_frame`] once per index.
    fn push_repeated(
        &mut self,
        first: FrameIndex,
        count: u64,
        frame: &FrameRGBA,
    ) -> StillclipResult<()> {
        for i in 0..count {
            self.push_frame(FrameIndex(repeat_index(first, i)?), frame)?;
        }
        Ok(())
    }
}

pub(crate) fn repeat_index(first: FrameIndex, offset: u64) -> StillclipResult<u64> {
    first
        .0
        .checked_add(offset)
        .ok_or_else(|| StillclipError::encode("frame index overflowed"))
}

/// Shared frame-order and frame-size checks.
pub(crate) fn check_frame(
    cfg: &SinkConfig,
    last: Option<FrameIndex>,
    idx: FrameIndex,
    frame: &FrameRGBA,
) -> StillclipResult<()> {
    if let Some(last) = last
        && idx.0 <= last.0
    {
        return Err(StillclipError::encode(format!(
            "out-of-order frame index {} (last was {})",
            idx.0, last.0
        )));
    }
    if frame.width != cfg.width || frame.height != cfg.height {
        return Err(StillclipError::encode(format!(
            "frame size mismatch: got {}x{}, expected {}x{}",
            frame.width, frame.height, cfg.width, cfg.height
        )));
    }
    if frame.data.len() != cfg.width as usize * cfg.height as usize * 4 {
        return Err(StillclipError::encode(
            "frame.data size mismatch with width*height*4",
        ));
    }
    Ok(())
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, FrameRGBA)>,
    finished: bool,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the sink configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Borrow the captured frames.
    pub fn frames(&self) -> &[(FrameIndex, FrameRGBA)] {
        &self.frames
    }

    /// `true` once `end` has been called.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> StillclipResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.finished = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> StillclipResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| StillclipError::encode("in-memory sink not started"))?;
        check_frame(cfg, self.frames.last().map(|(i, _)| *i), idx, frame)?;
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> StillclipResult<()> {
        self.finished = true;
        Ok(())
    }
}
