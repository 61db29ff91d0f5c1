use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use crate::foundation::error::{KaleidoError, KaleidoResult};

/// A decoded source image in premultiplied RGBA8.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Tightly packed, row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl SourceImage {
    /// Wrap an already premultiplied RGBA8 buffer.
    ///
    /// Fails when the buffer length is not `width * height * 4`, or when either dimension is zero.
    pub fn from_premul_rgba8(width: u32, height: u32, rgba8_premul: Vec<u8>) -> KaleidoResult<Self> {
        if width == 0 || height == 0 {
            return Err(KaleidoError::asset("image dimensions must be non-zero"));
        }
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(4))
            .ok_or_else(|| KaleidoError::asset("image buffer size overflow"))?;
        if rgba8_premul.len() != expected {
            return Err(KaleidoError::asset(format!(
                "image buffer has {} bytes, expected {expected} for {width}x{height}",
                rgba8_premul.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
        })
    }

    /// Wrap a straight-alpha RGBA8 buffer, premultiplying it.
    pub fn from_straight_rgba8(width: u32, height: u32, mut rgba8: Vec<u8>) -> KaleidoResult<Self> {
        premultiply_rgba8_in_place(&mut rgba8);
        Self::from_premul_rgba8(width, height, rgba8)
    }
}

/// Decode any format supported by the `image` crate into a [`SourceImage`].
pub fn decode_image(bytes: &[u8]) -> KaleidoResult<SourceImage> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| KaleidoError::asset(format!("decode image from memory: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    SourceImage::from_straight_rgba8(width, height, rgba.into_raw())
}

/// Read and decode the image at `root/rel`.
///
/// `rel` must be a relative path without `..` components.
#[tracing::instrument(skip(root))]
pub fn load_image(root: &Path, rel: &str) -> KaleidoResult<SourceImage> {
    let norm = normalize_rel_path(rel)?;
    let path = root.join(Path::new(&norm));
    let bytes = std::fs::read(&path)
        .with_context(|| format!("failed to read image '{}'", path.display()))?;
    let img = decode_image(&bytes)?;
    tracing::debug!(
        path = %path.display(),
        width = img.width,
        height = img.height,
        "loaded source image"
    );
    Ok(img)
}

pub(crate) fn normalize_rel_path(source: &str) -> KaleidoResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(KaleidoError::validation("image paths must be relative"));
    }
    if s.is_empty() {
        return Err(KaleidoError::validation("image path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(KaleidoError::validation("image paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(KaleidoError::validation("image path must contain a file name"));
    }

    Ok(out.join("/"))
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
