//! Frame sinks.
//!
//! Sinks consume rendered frames in timeline order and are driven by
//! `RenderSession::render_range`.

/// `ffmpeg`-based MP4 output.
pub mod ffmpeg;
/// Numbered PNG files.
pub mod png;
/// Sink trait and the in-memory sink.
pub mod sink;
