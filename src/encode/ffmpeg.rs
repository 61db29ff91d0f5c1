use std::io::{Read as _, Write as _};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread::JoinHandle;

use anyhow::Context as _;

use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{KaleidoError, KaleidoResult};
use crate::render::backend::FrameRGBA;

/// Options for [`FfmpegSink`].
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    /// Output MP4 file path.
    pub out_path: PathBuf,
    /// Replace an existing file at `out_path`.
    pub overwrite: bool,
}

impl FfmpegSinkOpts {
    /// Write to `out_path`, replacing any existing file.
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
        }
    }
}

/// H.264 MP4 output through the system `ffmpeg`.
///
/// Frames must be premultiplied, as the compositor produces them already laid over the
/// configured background. RGB bytes are piped as `rgb0` and alpha is ignored, which is the frame
/// over black; an opaque background passes through unchanged.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,
    frame_bytes: usize,
    encoder: Option<Encoder>,
}

impl FfmpegSink {
    /// Create a sink; `ffmpeg` is spawned in [`FrameSink::begin`].
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            frame_bytes: 0,
            encoder: None,
        }
    }
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> KaleidoResult<()> {
        // yuv420p subsamples chroma by two in both directions.
        if !cfg.width.is_multiple_of(2) || !cfg.height.is_multiple_of(2) {
            return Err(KaleidoError::validation(format!(
                "mp4 output needs even dimensions, got {}x{}",
                cfg.width, cfg.height
            )));
        }
        ensure_parent_dir(&self.opts.out_path)?;

        self.encoder = Some(Encoder::spawn(&self.opts, cfg)?);
        self.frame_bytes = (cfg.width as usize) * (cfg.height as usize) * 4;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> KaleidoResult<()> {
        let encoder = self
            .encoder
            .as_mut()
            .ok_or_else(|| KaleidoError::encode("ffmpeg sink not started"))?;
        if !frame.premultiplied || frame.data.len() != self.frame_bytes {
            return Err(KaleidoError::validation(format!(
                "frame {} is not a premultiplied {}-byte frame",
                idx.0, self.frame_bytes
            )));
        }
        encoder.write(&frame.data)
    }

    fn end(&mut self) -> KaleidoResult<()> {
        let encoder = self
            .encoder
            .take()
            .ok_or_else(|| KaleidoError::encode("ffmpeg sink not started"))?;
        encoder.finish()?;
        tracing::info!(out = %self.opts.out_path.display(), "mp4 written");
        Ok(())
    }
}

// A running `ffmpeg` child. Dropping it without `finish` kills the process.
struct Encoder {
    child: Child,
    stdin: Option<ChildStdin>,
    stderr: Option<JoinHandle<std::io::Result<Vec<u8>>>>,
    reaped: bool,
}

impl Encoder {
    fn spawn(opts: &FfmpegSinkOpts, cfg: SinkConfig) -> KaleidoResult<Self> {
        let size = format!("{}x{}", cfg.width, cfg.height);
        let rate = format!("{}/{}", cfg.fps.num, cfg.fps.den);
        let mut child = Command::new("ffmpeg")
            .arg(if opts.overwrite { "-y" } else { "-n" })
            .args(["-loglevel", "error"])
            .args(["-f", "rawvideo", "-pix_fmt", "rgb0", "-s", &size, "-r", &rate])
            .args(["-i", "pipe:0", "-an"])
            .args(["-c:v", "libx264", "-pix_fmt", "yuv420p", "-movflags", "+faststart"])
            .arg(&opts.out_path)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                KaleidoError::encode(format!("spawn ffmpeg (is it on PATH?): {e}"))
            })?;

        let stdin = child.stdin.take();
        let stderr = child.stderr.take().map(|mut pipe| {
            std::thread::spawn(move || {
                let mut buf = Vec::new();
                pipe.read_to_end(&mut buf)?;
                Ok(buf)
            })
        });
        tracing::debug!(out = %opts.out_path.display(), %size, %rate, "ffmpeg started");

        Ok(Self {
            child,
            stdin,
            stderr,
            reaped: false,
        })
    }

    fn write(&mut self, bytes: &[u8]) -> KaleidoResult<()> {
        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| KaleidoError::encode("ffmpeg stdin is closed"))?;
        stdin
            .write_all(bytes)
            .map_err(|e| KaleidoError::encode(format!("write frame to ffmpeg: {e}")))
    }

    fn finish(mut self) -> KaleidoResult<()> {
        drop(self.stdin.take());
        let status = self
            .child
            .wait()
            .map_err(|e| KaleidoError::encode(format!("wait for ffmpeg: {e}")))?;
        self.reaped = true;

        let stderr = self
            .stderr
            .take()
            .and_then(|h| h.join().ok())
            .and_then(Result::ok)
            .unwrap_or_default();
        if !status.success() {
            return Err(KaleidoError::encode(format!(
                "ffmpeg exited with {status}: {}",
                String::from_utf8_lossy(&stderr).trim()
            )));
        }
        Ok(())
    }
}

impl Drop for Encoder {
    fn drop(&mut self) {
        if self.reaped {
            return;
        }
        drop(self.stdin.take());
        let _ = self.child.kill();
        let _ = self.child.wait();
        if let Some(h) = self.stderr.take() {
            let _ = h.join();
        }
        tracing::debug!("ffmpeg stopped before the last frame");
    }
}

/// Create the parent directory of `path` when it has one.
pub fn ensure_parent_dir(path: &Path) -> KaleidoResult<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Return `true` when `ffmpeg -version` runs successfully.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|s| s.success())
}
