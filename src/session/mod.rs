/// Frame-driven render session.
pub mod render_session;
/// Fixed-rate tick scheduling.
pub mod ticker;
