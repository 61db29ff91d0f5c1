//! Wedge placement geometry.
//!
//! `count` square wedges of side `width / 2` are centered on a circle of radius `width / 4`
//! around the viewport center, starting half an angular unit past the positive x axis. Wedges
//! are rotated in pairs by quarter turns (`floor(i / 2) * 90°`). The composition is clipped to a
//! circle of radius `width / 2 - inset`.

use std::f64::consts::TAU;

use serde::Serialize;

use crate::foundation::core::{Affine, Canvas, Point, Rect};
use crate::foundation::error::{KaleidoError, KaleidoResult};

/// Placement of one wedge in viewport space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct WedgePlacement {
    /// Position in the wedge sequence.
    pub index: usize,
    /// Wedge center in viewport pixels.
    pub center: Point,
    /// Side length of the square wedge.
    pub size: f64,
    /// Angle of `center` around the viewport center, in radians.
    pub orbit_angle: f64,
    /// Static wedge rotation in degrees, in `[0, 360)`.
    pub rotation_degrees: u32,
}

impl WedgePlacement {
    /// Axis-aligned frame of the unrotated wedge.
    pub fn frame(&self) -> Rect {
        Rect::from_center_size(self.center, (self.size, self.size))
    }

    /// Static rotation in radians.
    pub fn rotation_radians(&self) -> f64 {
        f64::from(self.rotation_degrees).to_radians()
    }

    /// Map wedge-local coordinates (`[0, size]²`) to viewport space, with an extra `spin`
    /// rotation (radians) about the wedge center.
    pub fn transform(&self, spin: f64) -> Affine {
        let half = self.size / 2.0;
        Affine::translate(self.center.to_vec2())
            * Affine::rotate(self.rotation_radians() + spin)
            * Affine::translate((-half, -half))
    }
}

/// Circular clip mask.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ClipCircle {
    /// Circle center in viewport pixels.
    pub center: Point,
    /// Radius in pixels.
    pub radius: f64,
}

impl ClipCircle {
    /// Return `true` when `p` lies inside or on the circle.
    pub fn contains(&self, p: Point) -> bool {
        self.center.distance(p) <= self.radius
    }
}

/// Complete wedge arrangement for one viewport.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WedgeLayout {
    /// Radius of the circle wedge centers sit on.
    pub orbit_radius: f64,
    /// One placement per wedge, in index order.
    pub placements: Vec<WedgePlacement>,
    /// Circular clip applied to the whole composition.
    pub clip: ClipCircle,
}

/// Compute wedge placements for `canvas`.
///
/// `count` must be even and non-zero. Sizes derive from the canvas width; the center uses both
/// dimensions.
pub fn layout_wedges(canvas: Canvas, count: usize, clip_inset: f64) -> KaleidoResult<WedgeLayout> {
    if canvas.width == 0 || canvas.height == 0 {
        return Err(KaleidoError::validation("canvas width/height must be > 0"));
    }
    if count == 0 || !count.is_multiple_of(2) {
        return Err(KaleidoError::validation(format!(
            "fragment count must be even and non-zero, got {count}"
        )));
    }
    if !clip_inset.is_finite() {
        return Err(KaleidoError::validation("clip inset must be finite"));
    }

    let width = f64::from(canvas.width);
    let view_center = canvas.center();
    let size = width / 2.0;
    let half = size / 2.0;

    let clip = ClipCircle {
        center: view_center,
        radius: width / 2.0 - clip_inset,
    };
    if clip.radius <= 0.0 {
        return Err(KaleidoError::validation(format!(
            "clip radius must be > 0 (width {width}, inset {clip_inset})"
        )));
    }

    let unit = TAU / count as f64;
    let placements = (0..count)
        .map(|i| {
            let orbit_angle = unit * i as f64 + unit / 2.0;
            WedgePlacement {
                index: i,
                center: Point::new(
                    view_center.x + orbit_angle.cos() * half,
                    view_center.y + orbit_angle.sin() * half,
                ),
                size,
                orbit_angle,
                rotation_degrees: ((i / 2) * 90 % 360) as u32,
            }
        })
        .collect();

    Ok(WedgeLayout {
        orbit_radius: half,
        placements,
        clip,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/scene/layout.rs"]
mod tests;
