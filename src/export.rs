//! Muxing a silent clip with plan-looped audio.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::assets::media::AudioPcm;
use crate::audio::mix::{render_plan_pcm, write_pcm_to_f32le_file};
use crate::compose::plan::CompositionPlan;
use crate::encode::ffmpeg::{ensure_parent_dir, is_ffmpeg_on_path};
use crate::foundation::error::{StillclipError, StillclipResult};

/// Inputs consumed by [`FfmpegExporter::export`].
#[derive(Clone, Debug)]
pub struct ExportSources {
    /// Silent video produced by the encoder.
    pub video_path: PathBuf,
    /// Decoded audio source the plan loops.
    pub audio: AudioPcm,
}

/// Options for [`FfmpegExporter`].
#[derive(Clone, Debug)]
pub struct ExportOpts {
    /// Output container path.
    pub out_path: PathBuf,
    /// Overwrite output file if it already exists.
    pub overwrite: bool,
}

impl ExportOpts {
    /// Export to `out_path`, overwriting.
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
        }
    }
}

/// Re-encodes a composed timeline (video + looped audio) through the system `ffmpeg`.
#[derive(Clone, Debug)]
pub struct FfmpegExporter {
    opts: ExportOpts,
}

impl FfmpegExporter {
    /// New exporter writing to `opts.out_path`.
    pub fn new(opts: ExportOpts) -> Self {
        Self { opts }
    }

    /// Materialize `plan` over `sources.audio` and mux it with `sources.video_path`.
    ///
    /// An empty plan exports the video unchanged (no audio stream). Returns the output path.
    #[tracing::instrument(level = "info", skip_all, fields(out = %self.opts.out_path.display()))]
    pub fn export(
        &self,
        plan: &CompositionPlan,
        sources: &ExportSources,
    ) -> StillclipResult<PathBuf> {
        let out_path = &self.opts.out_path;
        if !sources.video_path.is_file() {
            return Err(StillclipError::export(format!(
                "video source '{}' does not exist",
                sources.video_path.display()
            )));
        }
        if !self.opts.overwrite && out_path.exists() {
            return Err(StillclipError::export(format!(
                "output file '{}' already exists",
                out_path.display()
            )));
        }
        let audio_len = sources.audio.duration()?;
        if plan.source_length() > audio_len {
            return Err(StillclipError::export(format!(
                "plan loops a {} source but the decoded audio is only {}",
                plan.source_length(),
                audio_len
            )));
        }
        ensure_parent_dir(out_path, StillclipError::export)?;

        if plan.is_empty() {
            tracing::info!("empty audio plan, exporting video without audio");
            std::fs::copy(&sources.video_path, out_path).map_err(|e| {
                StillclipError::export(format!(
                    "failed to copy '{}' to '{}': {e}",
                    sources.video_path.display(),
                    out_path.display()
                ))
            })?;
            return Ok(out_path.clone());
        }

        let looped = render_plan_pcm(plan, &sources.audio)?;
        let pcm_path = TempFileGuard(Some(out_path.with_extension("loop.f32le")));
        let pcm_file = pcm_path.path()?;
        write_pcm_to_f32le_file(&looped.interleaved_f32, pcm_file)?;

        if !is_ffmpeg_on_path() {
            return Err(StillclipError::export(
                "ffmpeg is required for export, but was not found on PATH",
            ));
        }

        let mut cmd = Command::new("ffmpeg");
        cmd.arg(if self.opts.overwrite { "-y" } else { "-n" })
            .args(["-loglevel", "error", "-i"])
            .arg(&sources.video_path)
            .args([
                "-f",
                "f32le",
                "-ar",
                &looped.sample_rate.to_string(),
                "-ac",
                &looped.channels.to_string(),
                "-i",
            ])
            .arg(pcm_file)
            .args([
                "-map",
                "0:v:0",
                "-map",
                "1:a:0",
                "-c:v",
                "copy",
                "-c:a",
                "aac",
                "-shortest",
                "-movflags",
                "+faststart",
            ])
            .arg(out_path);

        let out = cmd
            .output()
            .map_err(|e| StillclipError::export(format!("failed to run ffmpeg for export: {e}")))?;
        if !out.status.success() {
            return Err(StillclipError::export(format!(
                "ffmpeg export exited with status {}: {}",
                out.status,
                String::from_utf8_lossy(&out.stderr).trim()
            )));
        }

        tracing::info!(segments = plan.len(), "export finished");
        Ok(out_path.clone())
    }
}

/// Removes the wrapped file when dropped.
pub(crate) struct TempFileGuard(pub(crate) Option<PathBuf>);

impl TempFileGuard {
    fn path(&self) -> StillclipResult<&Path> {
        self.0
            .as_deref()
            .ok_or_else(|| StillclipError::export("temporary file path is not set"))
    }
}

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if let Some(path) = self.0.take() {
            let _ = std::fs::remove_file(path);
        }
    }
}
