use std::borrow::Cow;
use std::io::{Read, Write as _};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread::JoinHandle;

use crate::encode::sink::{FrameSink, SinkConfig, check_frame, repeat_index};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{StillclipError, StillclipResult};
use crate::foundation::math::mul_div255_u16;
use crate::render::frame::FrameRGBA;

/// Options for [`FfmpegSink`] MP4 output.
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    /// Output MP4 file path.
    pub out_path: PathBuf,
    /// Overwrite output file if it already exists.
    pub overwrite: bool,
    /// Colour translucent pixels are flattened onto (straight RGBA8; alpha is ignored).
    pub bg_rgba: [u8; 4],
}

impl FfmpegSinkOpts {
    /// Overwriting MP4 output to `out_path` over black.
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
            bg_rgba: [0, 0, 0, 255],
        }
    }
}

/// Silent H.264 MP4 sink backed by a system `ffmpeg` process reading raw RGBA on stdin.
///
/// A still clip is one image repeated, so [`FrameSink::push_repeated`] flattens the frame once
/// and writes the same bytes for every index.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,
    encoder: Option<EncoderProcess>,
    cfg: Option<SinkConfig>,
    last_idx: Option<FrameIndex>,
}

impl FfmpegSink {
    /// Sink writing to `opts.out_path`; nothing is spawned until `begin`.
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            encoder: None,
            cfg: None,
            last_idx: None,
        }
    }

    /// Path the finished container is written to.
    pub fn out_path(&self) -> &Path {
        &self.opts.out_path
    }

    fn started(&mut self) -> StillclipResult<(SinkConfig, &mut EncoderProcess)> {
        match (self.cfg, self.encoder.as_mut()) {
            (Some(cfg), Some(enc)) => Ok((cfg, enc)),
            _ => Err(StillclipError::encode("ffmpeg sink not started")),
        }
    }
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> StillclipResult<()> {
        cfg.fps.validate()?;
        if cfg.width == 0 || cfg.height == 0 {
            return Err(StillclipError::encode(
                "ffmpeg sink width/height must be non-zero",
            ));
        }
        if !cfg.width.is_multiple_of(2) || !cfg.height.is_multiple_of(2) {
            return Err(StillclipError::encode(format!(
                "yuv420p output needs even dimensions, got {}x{}",
                cfg.width, cfg.height
            )));
        }

        ensure_parent_dir(&self.opts.out_path, StillclipError::encode)?;
        if !self.opts.overwrite && self.opts.out_path.exists() {
            return Err(StillclipError::encode(format!(
                "output file '{}' already exists",
                self.opts.out_path.display()
            )));
        }
        if !is_ffmpeg_on_path() {
            return Err(StillclipError::encode("ffmpeg was not found on PATH"));
        }

        tracing::debug!(out = %self.opts.out_path.display(), "spawning ffmpeg video encoder");
        self.encoder = Some(EncoderProcess::spawn(encoder_command(&cfg, &self.opts))?);
        self.cfg = Some(cfg);
        self.last_idx = None;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> StillclipResult<()> {
        self.push_repeated(idx, 1, frame)
    }

    fn push_repeated(
        &mut self,
        first: FrameIndex,
        count: u64,
        frame: &FrameRGBA,
    ) -> StillclipResult<()> {
        if count == 0 {
            return Ok(());
        }
        let last = FrameIndex(repeat_index(first, count - 1)?);
        let prev = self.last_idx;
        let bg = self.opts.bg_rgba;
        let (cfg, enc) = self.started()?;
        check_frame(&cfg, prev, first, frame)?;

        let pixels = opaque_rgba8(frame, bg);
        for _ in 0..count {
            enc.write(&pixels)?;
        }
        self.last_idx = Some(last);
        Ok(())
    }

    fn end(&mut self) -> StillclipResult<()> {
        let enc = self
            .encoder
            .take()
            .ok_or_else(|| StillclipError::encode("ffmpeg sink not started"))?;
        self.cfg = None;
        enc.finish()
    }
}

/// `ffmpeg` invocation reading `cfg`-sized raw RGBA from stdin and writing silent H.264.
fn encoder_command(cfg: &SinkConfig, opts: &FfmpegSinkOpts) -> Command {
    let mut cmd = Command::new("ffmpeg");
    cmd.arg(if opts.overwrite { "-y" } else { "-n" });
    cmd.args(["-loglevel", "error", "-f", "rawvideo", "-pix_fmt", "rgba"]);
    cmd.arg("-s").arg(format!("{}x{}", cfg.width, cfg.height));
    // Input rate before `-i`; ffmpeg accepts the rational form.
    cmd.arg("-r").arg(format!("{}/{}", cfg.fps.num, cfg.fps.den));
    cmd.args(["-i", "pipe:0", "-an", "-c:v", "libx264", "-pix_fmt", "yuv420p"]);
    cmd.args(["-movflags", "+faststart"]);
    cmd.arg(&opts.out_path);
    cmd
}

/// Running encoder: frames go to stdin, stderr is drained on a side thread.
struct EncoderProcess {
    child: Child,
    stdin: ChildStdin,
    stderr: JoinHandle<std::io::Result<Vec<u8>>>,
}

impl EncoderProcess {
    fn spawn(mut cmd: Command) -> StillclipResult<Self> {
        let mut child = cmd
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| StillclipError::encode(format!("failed to spawn ffmpeg: {e}")))?;

        let (Some(stdin), Some(mut stderr)) = (child.stdin.take(), child.stderr.take()) else {
            let _ = child.kill();
            return Err(StillclipError::encode("ffmpeg stdio pipes were not opened"));
        };
        let stderr = std::thread::spawn(move || {
            let mut buf = Vec::new();
            stderr.read_to_end(&mut buf)?;
            Ok(buf)
        });
        Ok(Self {
            child,
            stdin,
            stderr,
        })
    }

    fn write(&mut self, bytes: &[u8]) -> StillclipResult<()> {
        self.stdin
            .write_all(bytes)
            .map_err(|e| StillclipError::encode(format!("failed to write frame to ffmpeg: {e}")))
    }

    fn finish(self) -> StillclipResult<()> {
        let Self {
            mut child,
            stdin,
            stderr,
        } = self;
        drop(stdin);

        let status = child
            .wait()
            .map_err(|e| StillclipError::encode(format!("failed to wait for ffmpeg: {e}")))?;
        let log = stderr
            .join()
            .map_err(|_| StillclipError::encode("ffmpeg stderr reader panicked"))?
            .map_err(|e| StillclipError::encode(format!("ffmpeg stderr read failed: {e}")))?;

        if !status.success() {
            return Err(StillclipError::encode(format!(
                "ffmpeg exited with {status}: {}",
                String::from_utf8_lossy(&log).trim()
            )));
        }
        Ok(())
    }
}

/// Opaque straight RGBA8 bytes for `frame`, flattening translucent premultiplied pixels over
/// `bg`. Borrows the frame when nothing needs to change.
fn opaque_rgba8(frame: &FrameRGBA, bg: [u8; 4]) -> Cow<'_, [u8]> {
    let opaque = frame.data.chunks_exact(4).all(|px| px[3] == 255);
    if !frame.premultiplied || opaque {
        return Cow::Borrowed(&frame.data);
    }

    let mut out = frame.data.clone();
    for px in out.chunks_exact_mut(4) {
        let inv = 255 - u16::from(px[3]);
        for (c, b) in px[..3].iter_mut().zip(bg) {
            *c = (u16::from(*c) + mul_div255_u16(u16::from(b), inv)).min(255) as u8;
        }
        px[3] = 255;
    }
    Cow::Owned(out)
}

/// Create the parent directory of `path`, reporting failure through `err` so callers keep
/// their stage's error kind.
pub(crate) fn ensure_parent_dir(
    path: &Path,
    err: impl FnOnce(String) -> StillclipError,
) -> StillclipResult<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent)
            .map_err(|e| {
                err(format!(
                    "failed to create output directory '{}': {e}",
                    parent.display()
                ))
            }),
        _ => Ok(()),
    }
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|s| s.success())
}
