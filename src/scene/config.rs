use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::animation::color_cycle::ColorCycleConfig;
use crate::animation::spin::SpinConfig;
use crate::assets::recolor::TintChannel;
use crate::foundation::core::{Canvas, Fps, FrameIndex, FrameRange};
use crate::foundation::error::{KaleidoError, KaleidoResult};

/// One source image and the channel its tint cycles.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceSpec {
    /// Image path relative to the configuration's directory.
    pub path: String,
    /// Channel driven by the color-cycle scalar.
    pub channel: TintChannel,
}

/// Fixed parts of every tint color.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TintConfig {
    /// Value of the two channels that do not cycle.
    pub base: f64,
    /// Tint alpha, applied as layer opacity.
    pub alpha: f64,
}

impl Default for TintConfig {
    fn default() -> Self {
        Self {
            base: 0.3,
            alpha: 0.8,
        }
    }
}

/// Everything needed to set up and play a kaleidoscope.
///
/// Every field has a default; an empty JSON object describes the stock 300x300, eight-wedge
/// animation over `000.png` and `019.png`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KaleidoscopeConfig {
    /// Viewport size.
    pub canvas: Canvas,
    /// Output frame rate.
    pub fps: Fps,
    /// Timeline length in frames.
    pub duration: u64,
    /// Number of wedges; must be even.
    pub fragment_count: usize,
    /// Distance between the viewport edge and the clip circle.
    pub clip_inset: f64,
    /// Straight-alpha RGBA8 drawn behind the composition.
    pub background: [u8; 4],
    /// Source images; each fragment gets one slot per source.
    pub sources: Vec<SourceSpec>,
    /// Tint color parameters.
    pub tint: TintConfig,
    /// Color-cycle oscillator and tick interval.
    pub color_cycle: ColorCycleConfig,
    /// Fragment spin.
    pub spin: SpinConfig,
}

impl Default for KaleidoscopeConfig {
    fn default() -> Self {
        Self {
            canvas: Canvas {
                width: 300,
                height: 300,
            },
            fps: Fps { num: 30, den: 1 },
            duration: 360,
            fragment_count: 8,
            clip_inset: 10.0,
            background: [0, 0, 0, 255],
            sources: vec![
                SourceSpec {
                    path: "000.png".to_owned(),
                    channel: TintChannel::Red,
                },
                SourceSpec {
                    path: "019.png".to_owned(),
                    channel: TintChannel::Green,
                },
            ],
            tint: TintConfig::default(),
            color_cycle: ColorCycleConfig::default(),
            spin: SpinConfig::default(),
        }
    }
}

impl KaleidoscopeConfig {
    /// Parse a configuration from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> KaleidoResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| KaleidoError::validation(format!("parse kaleidoscope config JSON: {e}")))
    }

    /// Parse a configuration from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> KaleidoResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            KaleidoError::validation(format!("open config JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check field ranges that the type system does not enforce.
    ///
    /// Geometry (fragment count parity, clip radius) is checked when the layout is computed.
    pub fn validate(&self) -> KaleidoResult<()> {
        Fps::new(self.fps.num, self.fps.den)?;
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(KaleidoError::validation("canvas width/height must be > 0"));
        }
        if self.duration == 0 {
            return Err(KaleidoError::validation("duration must be > 0 frames"));
        }
        if self.sources.is_empty() {
            return Err(KaleidoError::validation("at least one source image is required"));
        }
        for (name, v) in [("tint.base", self.tint.base), ("tint.alpha", self.tint.alpha)] {
            if !(v.is_finite() && (0.0..=1.0).contains(&v)) {
                return Err(KaleidoError::validation(format!("{name} must be in [0, 1]")));
            }
        }
        self.color_cycle.validate()?;
        self.spin.validate()?;
        Ok(())
    }

    /// The full timeline as a frame range.
    pub fn timeline(&self) -> FrameRange {
        FrameRange {
            start: FrameIndex(0),
            end: FrameIndex(self.duration),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/config.rs"]
mod tests;
