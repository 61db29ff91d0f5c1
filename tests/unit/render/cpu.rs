use super::*;
use crate::assets::decode::SourceImage;
use crate::foundation::core::{Canvas, Point};
use crate::scene::config::KaleidoscopeConfig;

fn opaque_white(w: u32, h: u32) -> SourceImage {
    SourceImage::from_straight_rgba8(w, h, [255u8, 255, 255, 255].repeat((w * h) as usize))
        .unwrap()
}

// Left half opaque, right half transparent, so rotation moves the silhouette.
fn half_opaque(w: u32, h: u32) -> SourceImage {
    let mut px = Vec::with_capacity((w * h * 4) as usize);
    for _ in 0..h {
        for x in 0..w {
            let a = if x < w / 2 { 255 } else { 0 };
            px.extend_from_slice(&[255, 255, 255, a]);
        }
    }
    SourceImage::from_straight_rgba8(w, h, px).unwrap()
}

fn config_64() -> KaleidoscopeConfig {
    KaleidoscopeConfig {
        canvas: Canvas {
            width: 64,
            height: 64,
        },
        ..Default::default()
    }
}

fn scene_64() -> Kaleidoscope {
    Kaleidoscope::set_up(&config_64(), vec![opaque_white(8, 8), opaque_white(8, 8)]).unwrap()
}

fn compositor() -> CpuCompositor {
    CpuCompositor::new(CpuCompositorOpts::default().with_clear_rgba(Some([10, 20, 30, 255])))
}

#[test]
fn frame_matches_canvas_and_is_premultiplied() {
    let scene = scene_64();
    let frame = compositor().compose(&scene, 0.0).unwrap();
    assert_eq!((frame.width, frame.height), (64, 64));
    assert_eq!(frame.data.len(), 64 * 64 * 4);
    assert!(frame.premultiplied);
}

#[test]
fn outside_clip_circle_is_background_only() {
    let scene = scene_64();
    let clip = scene.clip();
    let mut comp = compositor();
    for t in [0.0, 1.3, 7.0] {
        let frame = comp.compose(&scene, t).unwrap();
        for y in 0..64u32 {
            for x in 0..64u32 {
                let p = Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
                if clip.center.distance(p) > clip.radius + 1.5 {
                    assert_eq!(frame.pixel(x, y), Some([10, 20, 30, 255]), "({x},{y}) t={t}");
                }
            }
        }
    }
}

#[test]
fn wedge_centers_show_tinted_images() {
    let scene = scene_64();
    let frame = compositor().compose(&scene, 0.0).unwrap();
    for p in &scene.layout().placements {
        let px = frame
            .pixel(p.center.x as u32, p.center.y as u32)
            .unwrap();
        assert_ne!(px, [10, 20, 30, 255], "wedge {}", p.index);
        assert_eq!(px[3], 255);
        // Top slot at level 0 is (0.3, 0.0, 0.3) at 80% over the other tint: blue dominates green.
        assert!(px[2] > px[1], "wedge {}: {px:?}", p.index);
    }
}

#[test]
fn transparent_clear_leaves_outside_empty() {
    let scene = scene_64();
    let mut comp = CpuCompositor::new(CpuCompositorOpts::default());
    let frame = comp.compose(&scene, 0.0).unwrap();
    assert_eq!(frame.pixel(0, 0), Some([0, 0, 0, 0]));
    assert_eq!(frame.pixel(63, 63), Some([0, 0, 0, 0]));
}

#[test]
fn color_ticks_change_rendered_pixels() {
    let mut scene = scene_64();
    let mut comp = compositor();
    let before = comp.compose(&scene, 0.0).unwrap();
    scene.advance_to_tick(60).unwrap();
    let after = comp.compose(&scene, 0.0).unwrap();
    assert_ne!(before.data, after.data);
    assert_eq!(comp.paint_cache.len(), 2);
}

#[test]
fn spin_changes_rendered_pixels() {
    let scene =
        Kaleidoscope::set_up(&config_64(), vec![half_opaque(8, 8), half_opaque(8, 8)]).unwrap();
    let mut comp = compositor();
    let a = comp.compose(&scene, 0.0).unwrap();
    let b = comp.compose(&scene, 1.5).unwrap();
    assert_ne!(a.data, b.data);
    let c = comp.compose(&scene, 12.0).unwrap();
    assert_eq!(a.data, c.data);
}

#[test]
fn mask_apply_scales_by_mask_alpha() {
    let mut dst = vec![200u8, 100, 50, 255, 200, 100, 50, 255];
    let mask = vec![0u8, 0, 0, 255, 0, 0, 0, 0];
    mask_apply_alpha_in_place(&mut dst, &mask).unwrap();
    assert_eq!(dst, vec![200, 100, 50, 255, 0, 0, 0, 0]);
    assert!(mask_apply_alpha_in_place(&mut dst, &mask[..4]).is_err());
}

#[test]
fn premul_over_endpoints() {
    let mut dst = vec![10u8, 20, 30, 255];
    premul_over_in_place(&mut dst, &[0, 0, 0, 0]).unwrap();
    assert_eq!(dst, vec![10, 20, 30, 255]);
    premul_over_in_place(&mut dst, &[1, 2, 3, 255]).unwrap();
    assert_eq!(dst, vec![1, 2, 3, 255]);

    let mut empty = vec![0u8; 4];
    premul_over_in_place(&mut empty, &[50, 60, 70, 128]).unwrap();
    assert_eq!(empty, vec![50, 60, 70, 128]);
}
