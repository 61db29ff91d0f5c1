use std::path::Path;

use crate::assets::decode::SourceImage;
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{FrameIndex, FrameRange};
use crate::foundation::error::{KaleidoError, KaleidoResult};
use crate::render::backend::{Compositor, FrameRGBA};
use crate::render::cpu::{CpuCompositor, CpuCompositorOpts};
use crate::scene::config::KaleidoscopeConfig;
use crate::scene::kaleidoscope::Kaleidoscope;
use crate::session::ticker::FixedRateTicker;

/// Range render statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Total frames in the requested range.
    pub frames_total: u64,
    /// Frames composed and handed to the sink.
    pub frames_rendered: u64,
    /// Color ticks applied to the scene when the range finished, the set-up tick included.
    pub ticks_applied: u64,
}

/// Plays a kaleidoscope on an output timeline.
///
/// Frame `n` sits at `n / fps` seconds. Before a frame is composed, every color tick due at that
/// time is applied, so frames can be requested in any order.
pub struct RenderSession {
    config: KaleidoscopeConfig,
    scene: Kaleidoscope,
    ticker: FixedRateTicker,
    compositor: Box<dyn Compositor>,
}

impl RenderSession {
    /// Load the configured sources from `assets_root` and prepare a CPU-composited session.
    pub fn new(config: KaleidoscopeConfig, assets_root: &Path) -> KaleidoResult<Self> {
        config.validate()?;
        let scene = Kaleidoscope::load(&config, assets_root)?;
        Self::from_scene(config, scene)
    }

    /// Prepare a session from already decoded sources.
    pub fn from_sources(
        config: KaleidoscopeConfig,
        sources: Vec<SourceImage>,
    ) -> KaleidoResult<Self> {
        let scene = Kaleidoscope::set_up(&config, sources)?;
        Self::from_scene(config, scene)
    }

    fn from_scene(config: KaleidoscopeConfig, scene: Kaleidoscope) -> KaleidoResult<Self> {
        let ticker = FixedRateTicker::new(config.color_cycle.interval_secs)?;
        let compositor = CpuCompositor::new(
            CpuCompositorOpts::default().with_clear_rgba(Some(config.background)),
        );
        Ok(Self {
            config,
            scene,
            ticker,
            compositor: Box::new(compositor),
        })
    }

    /// Replace the compositor.
    pub fn with_compositor(mut self, compositor: Box<dyn Compositor>) -> Self {
        self.compositor = compositor;
        self
    }

    /// The scene in its current tick state.
    pub fn scene(&self) -> &Kaleidoscope {
        &self.scene
    }

    /// Configuration the session was built from.
    pub fn config(&self) -> &KaleidoscopeConfig {
        &self.config
    }

    /// Timeline position of `frame` in seconds.
    pub fn elapsed_secs(&self, frame: FrameIndex) -> f64 {
        self.config.fps.frames_to_secs(frame.0)
    }

    /// Apply the ticks due at `frame` and compose it.
    #[tracing::instrument(skip(self), fields(frame = frame.0))]
    pub fn render_frame(&mut self, frame: FrameIndex) -> KaleidoResult<FrameRGBA> {
        if frame.0 >= self.config.duration {
            return Err(KaleidoError::validation(
                "render_frame frame must be within the timeline duration",
            ));
        }
        let elapsed = self.elapsed_secs(frame);
        self.scene
            .advance_to_tick(self.ticker.ticks_due(elapsed))?;
        self.compositor.compose(&self.scene, elapsed)
    }

    /// Render a frame range and stream frames into a sink.
    ///
    /// The sink receives frames in strictly increasing frame index order.
    #[tracing::instrument(skip(self, sink), fields(start = range.start.0, end = range.end.0))]
    pub fn render_range(
        &mut self,
        range: FrameRange,
        sink: &mut dyn FrameSink,
    ) -> KaleidoResult<RenderStats> {
        if range.is_empty() {
            return Err(KaleidoError::validation(
                "render_range range must be non-empty",
            ));
        }
        if range.end.0 > self.config.duration {
            return Err(KaleidoError::validation(
                "render_range range must be within the timeline duration",
            ));
        }

        sink.begin(SinkConfig {
            width: self.config.canvas.width,
            height: self.config.canvas.height,
            fps: self.config.fps,
        })?;

        let mut stats = RenderStats {
            frames_total: range.len_frames(),
            ..RenderStats::default()
        };
        let streamed: KaleidoResult<()> = range.iter().try_for_each(|idx| {
            let frame = self.render_frame(idx)?;
            sink.push_frame(idx, &frame)?;
            stats.frames_rendered += 1;
            Ok(())
        });
        if let Err(e) = streamed {
            // Let the sink release its outputs; the frame error is the one reported.
            if let Err(end_err) = sink.end() {
                tracing::debug!(error = %end_err, "sink end after failed range");
            }
            return Err(e);
        }
        sink.end()?;

        stats.ticks_applied = self.scene.ticks_applied();
        tracing::info!(
            frames = stats.frames_rendered,
            ticks = stats.ticks_applied,
            "range rendered"
        );
        Ok(stats)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/render_session.rs"]
mod tests;
