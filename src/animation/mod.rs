/// Triangular color-cycle oscillator.
pub mod color_cycle;
/// Continuous fragment spin as a pure function of elapsed time.
pub mod spin;
