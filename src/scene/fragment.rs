use std::sync::Arc;

use crate::assets::recolor::TintedImage;
use crate::foundation::core::Rect;
use crate::foundation::error::{KaleidoError, KaleidoResult};
use crate::scene::layout::WedgePlacement;

/// One wedge of the kaleidoscope: a placement and a fixed stack of image slots.
///
/// Slot `0` is drawn first (bottom of the stack).
#[derive(Clone, Debug)]
pub struct Fragment {
    placement: WedgePlacement,
    slots: Vec<Option<Arc<TintedImage>>>,
}

impl Fragment {
    /// Create a fragment with `slot_count` empty slots.
    pub fn new(placement: WedgePlacement, slot_count: usize) -> Self {
        Self {
            placement,
            slots: vec![None; slot_count],
        }
    }

    /// Where the fragment sits in the viewport.
    pub fn placement(&self) -> &WedgePlacement {
        &self.placement
    }

    /// Number of image slots; fixed at construction.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Images currently displayed, by slot.
    pub fn slots(&self) -> &[Option<Arc<TintedImage>>] {
        &self.slots
    }

    /// Replace every slot's image by position.
    ///
    /// `images` must contain exactly one image per slot; otherwise nothing changes.
    pub fn set_images(&mut self, images: &[Arc<TintedImage>]) -> KaleidoResult<()> {
        if images.len() != self.slots.len() {
            return Err(KaleidoError::validation(format!(
                "fragment {} has {} image slots, got {} images",
                self.placement.index,
                self.slots.len(),
                images.len()
            )));
        }
        for (slot, img) in self.slots.iter_mut().zip(images) {
            *slot = Some(Arc::clone(img));
        }
        Ok(())
    }

    /// Local bounds of the fragment (`[0, size]²`).
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.placement.size, self.placement.size)
    }
}

/// Largest rect with the image's aspect ratio that fits inside `bounds`, centered.
pub fn aspect_fit(image_width: u32, image_height: u32, bounds: Rect) -> Rect {
    if image_width == 0 || image_height == 0 {
        return Rect::from_center_size(bounds.center(), (0.0, 0.0));
    }
    let iw = f64::from(image_width);
    let ih = f64::from(image_height);
    let scale = (bounds.width() / iw).min(bounds.height() / ih);
    Rect::from_center_size(bounds.center(), (iw * scale, ih * scale))
}

#[cfg(test)]
#[path = "../../tests/unit/scene/fragment.rs"]
mod tests;
