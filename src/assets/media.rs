use std::path::Path;

use crate::foundation::error::{StillclipError, StillclipResult};
use crate::foundation::time::Duration;

/// Internal audio sample rate used across decode/loop/mux.
pub const MIX_SAMPLE_RATE: u32 = 48_000;

#[derive(Clone, Debug, PartialEq)]
/// Decoded interleaved floating-point PCM.
pub struct AudioPcm {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Channel count.
    pub channels: u16,
    /// Interleaved `f32` PCM samples.
    pub interleaved_f32: Vec<f32>,
}

impl AudioPcm {
    /// Number of sample frames (samples per channel).
    pub fn frames(&self) -> u64 {
        if self.channels == 0 {
            return 0;
        }
        (self.interleaved_f32.len() / usize::from(self.channels)) as u64
    }

    /// Exact decoded length, `frames / sample_rate` seconds.
    pub fn duration(&self) -> StillclipResult<Duration> {
        Duration::from_ticks(self.frames(), u64::from(self.sample_rate))
    }
}

#[cfg(feature = "media-ffmpeg")]
/// Decode audio from media source to stereo interleaved `f32` PCM.
pub fn decode_audio_f32_stereo(path: &Path, sample_rate: u32) -> StillclipResult<AudioPcm> {
    if !path.is_file() {
        return Err(StillclipError::export(format!(
            "audio source '{}' does not exist",
            path.display()
        )));
    }

    let out = std::process::Command::new("ffmpeg")
        .args(["-v", "error", "-i"])
        .arg(path)
        .args([
            "-vn",
            "-f",
            "f32le",
            "-acodec",
            "pcm_f32le",
            "-ac",
            "2",
            "-ar",
            &sample_rate.to_string(),
            "pipe:1",
        ])
        .output()
        .map_err(|e| StillclipError::export(format!("failed to run ffmpeg for audio decode: {e}")))?;

    if !out.status.success() {
        let msg = String::from_utf8_lossy(&out.stderr);
        return Err(StillclipError::export(format!(
            "ffmpeg audio decode failed for '{}': {}",
            path.display(),
            msg.trim()
        )));
    }

    if !out.stdout.len().is_multiple_of(4) {
        return Err(StillclipError::export(
            "decoded audio byte length is not aligned to f32 samples",
        ));
    }
    let mut pcm = Vec::<f32>::with_capacity(out.stdout.len() / 4);
    for chunk in out.stdout.chunks_exact(4) {
        pcm.push(f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]));
    }

    tracing::debug!(path = %path.display(), samples = pcm.len(), "decoded audio source");
    Ok(AudioPcm {
        sample_rate,
        channels: 2,
        interleaved_f32: pcm,
    })
}

#[cfg(not(feature = "media-ffmpeg"))]
/// Decode audio from media source to stereo interleaved `f32` PCM.
///
/// Returns an error when `media-ffmpeg` feature is disabled.
pub fn decode_audio_f32_stereo(_path: &Path, _sample_rate: u32) -> StillclipResult<AudioPcm> {
    Err(StillclipError::export(
        "audio sources require the 'media-ffmpeg' feature",
    ))
}
