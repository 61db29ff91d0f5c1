use super::*;

#[test]
fn frame_range_rejects_inverted_bounds() {
    assert!(FrameRange::new(FrameIndex(5), FrameIndex(2)).is_err());
    let r = FrameRange::new(FrameIndex(2), FrameIndex(5)).unwrap();
    assert_eq!(r.len_frames(), 3);
    assert_eq!(
        r.iter().collect::<Vec<_>>(),
        vec![FrameIndex(2), FrameIndex(3), FrameIndex(4)]
    );
}

#[test]
fn fps_rejects_zero_parts() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
}

#[test]
fn fps_frame_time_conversions() {
    let fps = Fps::new(30, 1).unwrap();
    assert!((fps.frames_to_secs(15) - 0.5).abs() < 1e-12);

    let ntsc = Fps::new(30_000, 1001).unwrap();
    assert!((ntsc.frame_duration_secs() - 0.033_366_7).abs() < 1e-6);
}

#[test]
fn canvas_center_is_half_extent() {
    let c = Canvas {
        width: 300,
        height: 200,
    };
    assert_eq!(c.center(), Point::new(150.0, 100.0));
}

#[test]
fn premul_from_straight_scales_color_by_alpha() {
    let p = Rgba8Premul::from_straight_rgba(255, 128, 0, 128);
    assert_eq!(p.to_array(), [128, 64, 0, 128]);
    assert_eq!(Rgba8Premul::transparent().to_array(), [0, 0, 0, 0]);
}
