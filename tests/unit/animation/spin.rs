use std::f64::consts::{FRAC_PI_2, PI};

use super::*;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn quarter_period_is_quarter_turn_with_alternating_sign() {
    let cfg = SpinConfig::default();
    assert!(close(spin_angle(&cfg, 0, 3.0), FRAC_PI_2));
    assert!(close(spin_angle(&cfg, 1, 3.0), -FRAC_PI_2));
    assert!(close(spin_angle(&cfg, 6, 6.0), PI));
    assert!(close(spin_angle(&cfg, 7, 6.0), -PI));
}

#[test]
fn angle_is_periodic() {
    let cfg = SpinConfig::default();
    for i in 0..8 {
        for t in [0.5, 1.7, 4.25, 11.9] {
            assert!(close(spin_angle(&cfg, i, t), spin_angle(&cfg, i, t + 12.0)));
        }
    }
    assert!(close(spin_angle(&cfg, 0, 12.0), 0.0));
}

#[test]
fn zero_before_start_and_after_repeats_exhausted() {
    let cfg = SpinConfig {
        period_secs: 2.0,
        repeat_count: Some(3),
    };
    assert_eq!(spin_angle(&cfg, 0, -1.0), 0.0);
    assert_eq!(spin_angle(&cfg, 0, 0.0), 0.0);
    assert!(spin_angle(&cfg, 0, 5.5) > 0.0);
    assert_eq!(spin_angle(&cfg, 0, 6.0), 0.0);
    assert_eq!(spin_angle(&cfg, 1, 100.0), 0.0);

    let forever = SpinConfig {
        period_secs: 2.0,
        repeat_count: None,
    };
    assert!(close(spin_angle(&forever, 0, 1_000_000.5), PI / 2.0));
}

#[test]
fn validate_rejects_non_positive_period() {
    assert!(SpinConfig::default().validate().is_ok());
    assert!(
        SpinConfig {
            period_secs: 0.0,
            repeat_count: None
        }
        .validate()
        .is_err()
    );
}
