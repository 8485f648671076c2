//! Stillclip turns a still photo into a short clip with a looped soundtrack.
//!
//! The core is [`compute_audio_loop_plan`], a pure planner that covers a target length exactly with
//! repeats of an audio source. Around it sit thin, sequential stages:
//!
//! - Render a letterboxed pixel buffer with [`render_still`]
//! - Encode it as a silent clip through a [`FrameSink`] ([`encode_still_clip`])
//! - Mux the plan-looped audio with [`FfmpegExporter`]
//! - Persist through a [`LibraryWriter`] and hand off to a [`Presenter`]
//!
//! [`Pipeline`] runs all of them in order.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Media decoding.
pub mod assets;
/// Plan-driven audio looping.
pub mod audio;
pub mod compose;
pub mod encode;
pub mod export;
pub mod library;
pub mod pipeline;
pub mod playback;
pub mod render;

pub use crate::foundation::core::{Canvas, Fps, FrameIndex};
pub use crate::foundation::error::{StillclipError, StillclipResult};
pub use crate::foundation::time::{Duration, TimeRange};

pub use crate::assets::media::{AudioPcm, MIX_SAMPLE_RATE, decode_audio_f32_stereo};
pub use crate::audio::mix::render_plan_pcm;
pub use crate::compose::plan::{CompositionPlan, PlanSegment, compute_audio_loop_plan};
pub use crate::compose::track::{Track, TrackSegment};
pub use crate::encode::encode_still_clip;
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, is_ffmpeg_on_path};
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::export::{ExportOpts, ExportSources, FfmpegExporter};
pub use crate::library::{DirectoryLibrary, LibraryWriter};
pub use crate::pipeline::{Pipeline, PipelineConfig, PipelineOutput, PipelineRequest};
pub use crate::playback::{CommandPresenter, NullPresenter, Presenter};
pub use crate::render::frame::FrameRGBA;
pub use crate::render::still::{Letterbox, letterbox_rect, load_still, render_still};
