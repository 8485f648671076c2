//! Sequential still-image to clip pipeline.
//!
//! Stages run strictly one after another on the caller's thread: render, encode, decode audio,
//! plan, export, save, play. The first failing stage aborts the run and its error is returned
//! unchanged, so the caller decides whether to retry (e.g. after a permission error from the
//! library) or give up.

use std::path::{Path, PathBuf};

use crate::assets::media::{MIX_SAMPLE_RATE, decode_audio_f32_stereo};
use crate::compose::plan::{CompositionPlan, compute_audio_loop_plan};
use crate::encode::encode_still_clip;
use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
use crate::export::{ExportOpts, ExportSources, FfmpegExporter, TempFileGuard};
use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{StillclipError, StillclipResult};
use crate::foundation::time::Duration;
use crate::library::LibraryWriter;
use crate::playback::{CommandPresenter, Presenter};
use crate::render::still::{load_still, render_still};

/// Pipeline settings, loadable from JSON. Every field has a default.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Output frame size; both sides must be even.
    pub canvas: Canvas,
    /// Output frame rate.
    pub fps: Fps,
    /// Requested clip length.
    pub duration: Duration,
    /// Letterbox bar colour, straight RGBA8.
    pub background: [u8; 4],
    /// Directory the finished clip is saved into.
    pub library_dir: PathBuf,
    /// Directory for intermediate files.
    pub work_dir: PathBuf,
    /// File stem of the saved clip.
    pub output_name: String,
    /// External player used when playback is requested.
    pub player: CommandPresenter,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            canvas: Canvas {
                width: 640,
                height: 480,
            },
            fps: Fps { num: 30, den: 1 },
            duration: Duration::from_secs(5),
            background: [0, 0, 0, 255],
            library_dir: PathBuf::from("library"),
            work_dir: std::env::temp_dir().join("stillclip"),
            output_name: "clip".to_string(),
            player: CommandPresenter::default(),
        }
    }
}

impl PipelineConfig {
    /// Read and validate a JSON config file.
    pub fn from_path(path: &Path) -> StillclipResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            StillclipError::invalid_input(format!("failed to read config '{}': {e}", path.display()))
        })?;
        let cfg: Self = serde_json::from_str(&text).map_err(|e| {
            StillclipError::invalid_input(format!("failed to parse config '{}': {e}", path.display()))
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check invariants serde cannot express.
    pub fn validate(&self) -> StillclipResult<()> {
        self.fps.validate()?;
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(StillclipError::invalid_input("canvas width/height must be non-zero"));
        }
        if !self.canvas.width.is_multiple_of(2) || !self.canvas.height.is_multiple_of(2) {
            return Err(StillclipError::invalid_input("canvas width/height must be even"));
        }
        if !self.duration.is_valid() {
            return Err(StillclipError::invalid_input("duration must be set"));
        }
        if self.output_name.is_empty()
            || self.output_name.contains(['/', '\\'])
            || self.output_name == "."
            || self.output_name == ".."
        {
            return Err(StillclipError::invalid_input(format!(
                "output_name '{}' must be a plain file stem",
                self.output_name
            )));
        }
        Ok(())
    }
}

/// Source files for one run.
#[derive(Clone, Debug)]
pub struct PipelineRequest {
    /// Still image to animate.
    pub image: PathBuf,
    /// Audio clip to loop under it.
    pub audio: PathBuf,
}

/// Result of a successful run.
#[derive(Clone, Debug)]
pub struct PipelineOutput {
    /// Where the library stored the clip.
    pub saved_path: PathBuf,
    /// Video frames encoded.
    pub frames: u64,
    /// Exact length of the encoded clip.
    pub clip_length: Duration,
    /// Audio loop plan used by the export.
    pub plan: CompositionPlan,
}

/// Orchestrates the stages with explicitly passed library and presenter handles.
pub struct Pipeline<'a> {
    config: PipelineConfig,
    library: &'a dyn LibraryWriter,
    presenter: &'a dyn Presenter,
}

impl<'a> Pipeline<'a> {
    /// Validate `config` and bind the collaborators.
    pub fn new(
        config: PipelineConfig,
        library: &'a dyn LibraryWriter,
        presenter: &'a dyn Presenter,
    ) -> StillclipResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            library,
            presenter,
        })
    }

    /// Active configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run every stage in order. Intermediate files are removed when the run ends.
    #[tracing::instrument(level = "info", skip(self), fields(name = %self.config.output_name))]
    pub fn run(&self, req: &PipelineRequest) -> StillclipResult<PipelineOutput> {
        let cfg = &self.config;
        let silent_path = cfg.work_dir.join(format!("{}.silent.mp4", cfg.output_name));
        let export_path = cfg.work_dir.join(format!("{}.mp4", cfg.output_name));
        let _silent_guard = TempFileGuard(Some(silent_path.clone()));
        let _export_guard = TempFileGuard(Some(export_path.clone()));

        let frame = {
            let _span = tracing::info_span!("render").entered();
            let image = load_still(&req.image)?;
            render_still(&image, cfg.canvas, cfg.background)?
        };

        let frames = {
            let _span = tracing::info_span!("encode").entered();
            let mut sink = FfmpegSink::new(FfmpegSinkOpts {
                out_path: silent_path.clone(),
                overwrite: true,
                bg_rgba: cfg.background,
            });
            encode_still_clip(&mut sink, &frame, cfg.fps, cfg.duration)?
        };
        let clip_length = cfg.fps.frames_to_duration(frames)?;

        let audio = {
            let _span = tracing::info_span!("decode_audio").entered();
            decode_audio_f32_stereo(&req.audio, MIX_SAMPLE_RATE)?
        };
        let plan = compute_audio_loop_plan(audio.duration()?, clip_length)?;
        tracing::info!(
            frames,
            clip = %clip_length,
            audio = %plan.source_length(),
            segments = plan.len(),
            "audio loop planned"
        );

        let exported = FfmpegExporter::new(ExportOpts::new(export_path)).export(
            &plan,
            &ExportSources {
                video_path: silent_path,
                audio,
            },
        )?;

        let saved_path = {
            let _span = tracing::info_span!("save").entered();
            self.library.save(&exported)?
        };

        self.presenter.play(&saved_path);

        Ok(PipelineOutput {
            saved_path,
            frames,
            clip_length,
            plan,
        })
    }
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;
