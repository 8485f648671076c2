use crate::foundation::error::{StillclipError, StillclipResult};
use crate::foundation::math::div_ceil_u128;
use crate::foundation::time::Duration;

/// Absolute 0-based frame index in clip timeline space.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Frames-per-second represented as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32, // must be > 0
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> StillclipResult<Self> {
        if den == 0 {
            return Err(StillclipError::invalid_input("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(StillclipError::invalid_input("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Re-check an instance that may have come from deserialization.
    pub fn validate(self) -> StillclipResult<Self> {
        Self::new(self.num, self.den)
    }

    /// Exact duration of one frame.
    pub fn frame_duration(self) -> StillclipResult<Duration> {
        Duration::from_ticks(u64::from(self.den), u64::from(self.num))
    }

    /// Exact presentation time of frame `frames` (equivalently, the length of `frames` frames).
    pub fn frames_to_duration(self, frames: u64) -> StillclipResult<Duration> {
        let ticks = frames
            .checked_mul(u64::from(self.den))
            .ok_or_else(|| StillclipError::invalid_input("frame time overflowed"))?;
        Duration::from_ticks(ticks, u64::from(self.num))
    }

    /// Smallest frame count whose total length covers `d` (`ceil(d * fps)`).
    pub fn frames_covering(self, d: Duration) -> StillclipResult<u64> {
        if !d.is_valid() {
            return Err(StillclipError::invalid_input(
                "cannot count frames of an invalid duration",
            ));
        }
        if self.num == 0 || self.den == 0 {
            return Err(StillclipError::invalid_input("fps must be non-zero"));
        }
        let num = u128::from(d.value()) * u128::from(self.num);
        let den = u128::from(d.timescale()) * u128::from(self.den);
        u64::try_from(div_ceil_u128(num, den))
            .map_err(|_| StillclipError::invalid_input("frame count overflowed"))
    }
}

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Width/height ratio; zero for a degenerate canvas.
    pub fn aspect(self) -> f64 {
        if self.height == 0 {
            return 0.0;
        }
        f64::from(self.width) / f64::from(self.height)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
