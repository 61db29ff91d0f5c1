//! Kaleidoscope is an animated kaleidoscope renderer.
//!
//! Two source images are tinted, tiled into an even number of wedge fragments arranged on a
//! circle, spun about their own centers and clipped to a circular mask. A fixed-rate color tick
//! cycles the tint. The public API is session-oriented:
//!
//! - Load and validate a [`KaleidoscopeConfig`]
//! - Create a [`RenderSession`]
//! - Render single frames or stream a range into a [`FrameSink`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Color cycle and spin.
pub mod animation;
/// Source image decoding and recoloring.
pub mod assets;
/// Encoding sinks.
pub mod encode;
/// Compositor contract and the CPU compositor.
pub mod render;
/// Scene graph, wedge layout and configuration.
pub mod scene;
/// Session-oriented rendering API.
pub mod session;

pub use crate::foundation::core::{
    Affine, Canvas, Fps, FrameIndex, FrameRange, Point, Rect, Rgba8Premul,
};
pub use crate::foundation::error::{KaleidoError, KaleidoResult};

pub use crate::assets::decode::SourceImage;
pub use crate::assets::recolor::{TintChannel, TintColor, TintedImage};
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
pub use crate::encode::png::PngSequenceSink;
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::render::backend::{Compositor, FrameRGBA};
pub use crate::render::cpu::{CpuCompositor, CpuCompositorOpts};
pub use crate::scene::config::KaleidoscopeConfig;
pub use crate::scene::kaleidoscope::Kaleidoscope;
pub use crate::scene::layout::{ClipCircle, WedgeLayout, WedgePlacement};
pub use crate::session::render_session::{RenderSession, RenderStats};
