use super::*;
use crate::foundation::core::{Canvas, Point};
use crate::scene::layout::layout_wedges;

fn placement() -> WedgePlacement {
    layout_wedges(
        Canvas {
            width: 300,
            height: 300,
        },
        8,
        10.0,
    )
    .unwrap()
    .placements[0]
}

fn tinted(w: u32, h: u32) -> Arc<TintedImage> {
    Arc::new(TintedImage {
        width: w,
        height: h,
        rgba8_premul: vec![0; (w * h * 4) as usize],
        opacity: 1.0,
    })
}

#[test]
fn new_fragment_has_fixed_empty_slots() {
    let f = Fragment::new(placement(), 2);
    assert_eq!(f.slot_count(), 2);
    assert!(f.slots().iter().all(Option::is_none));
    assert_eq!(f.bounds(), Rect::new(0.0, 0.0, 150.0, 150.0));
}

#[test]
fn set_images_assigns_by_position() {
    let mut f = Fragment::new(placement(), 2);
    let a = tinted(2, 2);
    let b = tinted(3, 1);
    f.set_images(&[a.clone(), b.clone()]).unwrap();

    assert!(Arc::ptr_eq(f.slots()[0].as_ref().unwrap(), &a));
    assert!(Arc::ptr_eq(f.slots()[1].as_ref().unwrap(), &b));
}

#[test]
fn set_images_with_wrong_count_leaves_slots_unchanged() {
    let mut f = Fragment::new(placement(), 2);
    let a = tinted(2, 2);
    f.set_images(&[a.clone(), a.clone()]).unwrap();

    assert!(f.set_images(&[tinted(1, 1)]).is_err());
    assert!(f.set_images(&[tinted(1, 1), tinted(1, 1), tinted(1, 1)]).is_err());
    assert_eq!(f.slot_count(), 2);
    assert!(Arc::ptr_eq(f.slots()[0].as_ref().unwrap(), &a));
}

#[test]
fn aspect_fit_letterboxes_wide_images() {
    let r = aspect_fit(200, 100, Rect::new(0.0, 0.0, 150.0, 150.0));
    assert_eq!(r, Rect::new(0.0, 37.5, 150.0, 112.5));
}

#[test]
fn aspect_fit_pillarboxes_tall_images() {
    let r = aspect_fit(50, 100, Rect::new(0.0, 0.0, 150.0, 150.0));
    assert_eq!(r, Rect::new(37.5, 0.0, 112.5, 150.0));
}

#[test]
fn aspect_fit_square_fills_and_stays_inside_bounds() {
    let bounds = Rect::new(0.0, 0.0, 150.0, 150.0);
    assert_eq!(aspect_fit(10, 10, bounds), bounds);
    for (w, h) in [(1u32, 7u32), (640, 480), (3, 2)] {
        let r = aspect_fit(w, h, bounds);
        assert!(r.x0 >= -1e-9 && r.y0 >= -1e-9);
        assert!(r.x1 <= 150.0 + 1e-9 && r.y1 <= 150.0 + 1e-9);
        assert!(r.center().distance(Point::new(75.0, 75.0)) < 1e-9);
    }
}
