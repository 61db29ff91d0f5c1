//! Silhouette recoloring: fill a source image's alpha mask with a flat color.
//!
//! The tinted copy keeps the source alpha byte-for-byte and replaces RGB with the target color
//! (premultiplied by that alpha). The target color's own alpha is not baked into the pixels; it
//! is carried as [`TintedImage::opacity`] and applied by the compositor as a layer opacity, which
//! gives the same coverage as filling a translucent color through the mask.

use serde::{Deserialize, Serialize};

use crate::assets::decode::SourceImage;
use crate::foundation::error::{KaleidoError, KaleidoResult};
use crate::foundation::math::{mul_div255_u8, unit_to_u8};

/// Straight-alpha color with unit-interval channels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TintColor {
    /// Red in `[0, 1]`.
    pub r: f64,
    /// Green in `[0, 1]`.
    pub g: f64,
    /// Blue in `[0, 1]`.
    pub b: f64,
    /// Alpha in `[0, 1]`.
    pub a: f64,
}

impl TintColor {
    /// Construct from unit-interval channels.
    pub fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// A gray `base` color with `channel` replaced by `level`.
    pub fn cycled(channel: TintChannel, level: f64, base: f64, alpha: f64) -> Self {
        let mut c = Self::rgba(base, base, base, alpha);
        match channel {
            TintChannel::Red => c.r = level,
            TintChannel::Green => c.g = level,
            TintChannel::Blue => c.b = level,
        }
        c
    }
}

/// Color channel driven by the color-cycle scalar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TintChannel {
    /// Cycle the red channel.
    Red,
    /// Cycle the green channel.
    Green,
    /// Cycle the blue channel.
    Blue,
}

/// A recolored copy of a [`SourceImage`].
#[derive(Clone, Debug, PartialEq)]
pub struct TintedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Premultiplied RGBA8 with the source's alpha channel.
    pub rgba8_premul: Vec<u8>,
    /// Layer opacity taken from the tint color's alpha.
    pub opacity: f32,
}

/// Fill the alpha silhouette of `src` with `color`.
pub fn tint_silhouette(src: &SourceImage, color: TintColor) -> KaleidoResult<TintedImage> {
    let expected = (src.width as usize)
        .saturating_mul(src.height as usize)
        .saturating_mul(4);
    if src.rgba8_premul.len() != expected {
        return Err(KaleidoError::asset(
            "source image has no usable pixel data (buffer size mismatch)",
        ));
    }

    let r = u16::from(unit_to_u8(color.r));
    let g = u16::from(unit_to_u8(color.g));
    let b = u16::from(unit_to_u8(color.b));

    let mut out = vec![0u8; expected];
    for (d, s) in out.chunks_exact_mut(4).zip(src.rgba8_premul.chunks_exact(4)) {
        let a = u16::from(s[3]);
        d[0] = mul_div255_u8(r, a);
        d[1] = mul_div255_u8(g, a);
        d[2] = mul_div255_u8(b, a);
        d[3] = s[3];
    }

    Ok(TintedImage {
        width: src.width,
        height: src.height,
        rgba8_premul: out,
        opacity: color.a.clamp(0.0, 1.0) as f32,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/assets/recolor.rs"]
mod tests;
