use super::*;

#[test]
fn empty_object_yields_stock_configuration() {
    let cfg = KaleidoscopeConfig::from_reader("{}".as_bytes()).unwrap();
    assert_eq!(cfg, KaleidoscopeConfig::default());
    assert_eq!(cfg.fragment_count, 8);
    assert_eq!(cfg.sources.len(), 2);
    assert_eq!(cfg.sources[0].channel, TintChannel::Red);
    assert_eq!(cfg.sources[1].channel, TintChannel::Green);
    assert_eq!(cfg.color_cycle.step, 0.01);
    assert_eq!(cfg.spin.period_secs, 12.0);
    cfg.validate().unwrap();
}

#[test]
fn partial_objects_merge_with_defaults() {
    let json = r#"{
        "canvas": { "width": 64, "height": 64 },
        "color_cycle": { "max": 0.5 },
        "sources": [ { "path": "a.png", "channel": "blue" } ]
    }"#;
    let cfg = KaleidoscopeConfig::from_reader(json.as_bytes()).unwrap();
    assert_eq!(cfg.canvas.width, 64);
    assert_eq!(cfg.color_cycle.max, 0.5);
    assert_eq!(cfg.color_cycle.step, 0.01);
    assert_eq!(cfg.sources[0].channel, TintChannel::Blue);
    cfg.validate().unwrap();
}

#[test]
fn unknown_fields_are_rejected() {
    let err = KaleidoscopeConfig::from_reader(r#"{ "fragments": 8 }"#.as_bytes()).unwrap_err();
    assert!(matches!(err, KaleidoError::Validation(_)));
}

#[test]
fn validate_rejects_out_of_range_fields() {
    let cases: Vec<KaleidoscopeConfig> = vec![
        KaleidoscopeConfig {
            fps: Fps { num: 30, den: 0 },
            ..Default::default()
        },
        KaleidoscopeConfig {
            duration: 0,
            ..Default::default()
        },
        KaleidoscopeConfig {
            sources: vec![],
            ..Default::default()
        },
        KaleidoscopeConfig {
            tint: TintConfig {
                base: 1.2,
                alpha: 0.8,
            },
            ..Default::default()
        },
        KaleidoscopeConfig {
            spin: SpinConfig {
                period_secs: -1.0,
                repeat_count: None,
            },
            ..Default::default()
        },
    ];
    for cfg in cases {
        assert!(cfg.validate().is_err(), "{cfg:?}");
    }
}

#[test]
fn round_trips_through_json() {
    let cfg = KaleidoscopeConfig::default();
    let s = serde_json::to_string(&cfg).unwrap();
    let back = KaleidoscopeConfig::from_reader(s.as_bytes()).unwrap();
    assert_eq!(back, cfg);
}

#[test]
fn timeline_spans_duration() {
    let cfg = KaleidoscopeConfig::default();
    assert_eq!(cfg.timeline().len_frames(), 360);
}
