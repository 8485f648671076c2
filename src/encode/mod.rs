//! Encoding sinks and the still-clip encoder.
//!
//! Sinks consume rendered frames in timeline order. [`encode_still_clip`] drives any sink with
//! repeated copies of one still frame.

/// `ffmpeg`-based sink (silent MP4 output via system `ffmpeg`).
pub mod ffmpeg;
/// Generic frame sink trait and built-in sinks.
pub mod sink;

use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::StillclipResult;
use crate::foundation::time::Duration;
use crate::render::frame::FrameRGBA;

/// Encode `frame` as a clip lasting at least `duration`.
///
/// Pushes `ceil(duration * fps)` copies (at least one, so a zero duration still yields a valid
/// single-frame stream) and finishes the sink. Returns the number of frames written.
#[tracing::instrument(level = "debug", skip(sink, frame))]
pub fn encode_still_clip(
    sink: &mut dyn FrameSink,
    frame: &FrameRGBA,
    fps: Fps,
    duration: Duration,
) -> StillclipResult<u64> {
    let fps = fps.validate()?;
    let frames = fps.frames_covering(duration)?.max(1);

    sink.begin(SinkConfig {
        width: frame.width,
        height: frame.height,
        fps,
    })?;
    sink.push_repeated(FrameIndex(0), frames, frame)?;
    sink.end()?;

    tracing::debug!(frames, "still clip encoded");
    Ok(frames)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/still.rs"]
mod tests;
