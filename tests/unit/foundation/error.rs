use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        KaleidoError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(KaleidoError::asset("x").to_string().contains("asset error:"));
    assert!(
        KaleidoError::render("x")
            .to_string()
            .contains("render error:")
    );
    assert!(
        KaleidoError::encode("x")
            .to_string()
            .contains("encode error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = KaleidoError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
