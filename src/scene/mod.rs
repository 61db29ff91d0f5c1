/// JSON configuration.
pub mod config;
/// Fragments and their image slots.
pub mod fragment;
/// The kaleidoscope scene graph and its color tick.
pub mod kaleidoscope;
/// Wedge placement geometry and the circular clip.
pub mod layout;
