/// Source image loading and decoding.
pub mod decode;
/// Silhouette recoloring.
pub mod recolor;
