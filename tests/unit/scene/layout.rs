use std::f64::consts::{FRAC_PI_4, FRAC_PI_8, TAU};

use super::*;

fn square(side: u32) -> Canvas {
    Canvas {
        width: side,
        height: side,
    }
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn observed_configuration_300_by_8() {
    let layout = layout_wedges(square(300), 8, 10.0).unwrap();
    assert_eq!(layout.orbit_radius, 75.0);
    assert_eq!(layout.placements.len(), 8);

    let first = layout.placements[0];
    assert!(close(first.orbit_angle, FRAC_PI_8));
    assert_eq!(first.size, 150.0);
    assert!(close(first.center.x, 150.0 + 75.0 * FRAC_PI_8.cos()));
    assert!(close(first.center.y, 150.0 + 75.0 * FRAC_PI_8.sin()));

    for pair in layout.placements.windows(2) {
        assert!(close(pair[1].orbit_angle - pair[0].orbit_angle, FRAC_PI_4));
    }

    assert_eq!(layout.clip.center, Point::new(150.0, 150.0));
    assert_eq!(layout.clip.radius, 140.0);
}

#[test]
fn centers_lie_on_quarter_side_circle_evenly_spaced() {
    for side in [64u32, 100, 300, 1024] {
        for n in [2usize, 4, 6, 8, 12, 16] {
            let layout = layout_wedges(square(side), n, 10.0).unwrap();
            let center = square(side).center();
            let r = f64::from(side) / 4.0;
            for p in &layout.placements {
                assert!(close(center.distance(p.center), r), "side {side} n {n}");
                let ang = (p.center.y - center.y).atan2(p.center.x - center.x);
                let expected = TAU / n as f64 * (p.index as f64 + 0.5);
                let diff = (ang - expected).rem_euclid(TAU);
                assert!(diff < 1e-9 || (TAU - diff) < 1e-9, "side {side} n {n}");
            }
        }
    }
}

#[test]
fn rotation_is_quarter_turns_in_pairs_mod_360() {
    let layout = layout_wedges(square(300), 12, 10.0).unwrap();
    let got: Vec<u32> = layout
        .placements
        .iter()
        .map(|p| p.rotation_degrees)
        .collect();
    assert_eq!(got, vec![0, 0, 90, 90, 180, 180, 270, 270, 0, 0, 90, 90]);
}

#[test]
fn frame_is_square_centered_on_wedge() {
    let layout = layout_wedges(square(300), 8, 10.0).unwrap();
    let p = layout.placements[3];
    let f = p.frame();
    assert!(close(f.width(), 150.0));
    assert!(close(f.height(), 150.0));
    assert!(close(f.center().x, p.center.x));
    assert!(close(f.center().y, p.center.y));
}

#[test]
fn transform_maps_local_center_to_wedge_center() {
    let layout = layout_wedges(square(300), 8, 10.0).unwrap();
    for p in &layout.placements {
        for spin in [0.0, 0.7, -2.1] {
            let c = p.transform(spin) * Point::new(75.0, 75.0);
            assert!(close(c.x, p.center.x));
            assert!(close(c.y, p.center.y));
        }
    }

    // Wedge 2 is rotated a quarter turn: local +x maps to viewport +y.
    let p = layout.placements[2];
    let a = p.transform(0.0) * Point::new(75.0, 75.0);
    let b = p.transform(0.0) * Point::new(85.0, 75.0);
    assert!(close(b.x - a.x, 0.0));
    assert!(close(b.y - a.y, 10.0));
}

#[test]
fn non_square_viewport_sizes_from_width_and_centers_on_both_axes() {
    let layout = layout_wedges(
        Canvas {
            width: 200,
            height: 400,
        },
        4,
        10.0,
    )
    .unwrap();
    assert_eq!(layout.clip.center, Point::new(100.0, 200.0));
    assert_eq!(layout.clip.radius, 90.0);
    assert_eq!(layout.placements[0].size, 100.0);
}

#[test]
fn invalid_inputs_are_rejected() {
    assert!(layout_wedges(square(300), 7, 10.0).is_err());
    assert!(layout_wedges(square(300), 0, 10.0).is_err());
    assert!(layout_wedges(square(0), 8, 10.0).is_err());
    assert!(layout_wedges(square(20), 8, 10.0).is_err());
    assert!(layout_wedges(square(300), 8, f64::NAN).is_err());
}

#[test]
fn clip_contains_points_by_distance() {
    let clip = layout_wedges(square(300), 8, 10.0).unwrap().clip;
    assert!(clip.contains(Point::new(150.0, 150.0)));
    assert!(clip.contains(Point::new(290.0, 150.0)));
    assert!(!clip.contains(Point::new(295.0, 150.0)));
    assert!(!clip.contains(Point::new(0.0, 0.0)));
}
