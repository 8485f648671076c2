use crate::assets::media::AudioPcm;
use crate::compose::plan::CompositionPlan;
use crate::foundation::error::{StillclipError, StillclipResult};
use std::path::Path;

/// Materialize a loop plan as interleaved PCM at the source's rate and channel count.
///
/// Segment boundaries are rounded from cumulative destination times, so neighbouring segments
/// share a sample boundary and the output is exactly `target_length` samples long. Source frames
/// missing because of rounding are left silent.
pub fn render_plan_pcm(plan: &CompositionPlan, source: &AudioPcm) -> StillclipResult<AudioPcm> {
    if source.channels == 0 || source.sample_rate == 0 {
        return Err(StillclipError::export(
            "audio source must have non-zero channels and sample rate",
        ));
    }
    let rate = source.sample_rate;
    let channels = usize::from(source.channels);
    let total_frames = plan.target_length().to_samples(rate)? as usize;
    let mut out = vec![0.0f32; total_frames * channels];

    let src = source.interleaved_f32.as_slice();
    let src_frames = source.frames() as usize;

    for seg in plan.segments() {
        let dst_end = seg.destination_start.checked_add(seg.source_length)?;
        let dst0 = seg.destination_start.to_samples(rate)? as usize;
        let dst1 = (dst_end.to_samples(rate)? as usize).min(total_frames);
        let src0 = seg.source_offset.to_samples(rate)? as usize;
        if dst1 <= dst0 || src0 >= src_frames {
            continue;
        }

        let n = (dst1 - dst0).min(src_frames - src0);
        out[dst0 * channels..(dst0 + n) * channels]
            .copy_from_slice(&src[src0 * channels..(src0 + n) * channels]);
    }

    for s in &mut out {
        *s = s.clamp(-1.0, 1.0);
    }
    Ok(AudioPcm {
        sample_rate: rate,
        channels: source.channels,
        interleaved_f32: out,
    })
}

/// Write interleaved `f32` PCM samples to raw little-endian `.f32le` file.
pub fn write_pcm_to_f32le_file(samples_interleaved: &[f32], out_path: &Path) -> StillclipResult<()> {
    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            StillclipError::export(format!(
                "failed to create audio output directory '{}': {e}",
                parent.display()
            ))
        })?;
    }

    let mut bytes = Vec::<u8>::with_capacity(samples_interleaved.len() * 4);
    for &sample in samples_interleaved {
        bytes.extend_from_slice(&sample.to_le_bytes());
    }
    std::fs::write(out_path, bytes).map_err(|e| {
        StillclipError::export(format!(
            "failed to write looped audio file '{}': {e}",
            out_path.display()
        ))
    })
}

#[cfg(test)]
#[path = "../../tests/unit/audio/mix.rs"]
mod tests;
