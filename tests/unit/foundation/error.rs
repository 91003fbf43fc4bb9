use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        FxError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        FxError::failed("Blur1", "kernel too large")
            .to_string()
            .contains("render failed in 'Blur1': kernel too large")
    );
    assert_eq!(FxError::Cancelled.to_string(), "render cancelled");
}

#[test]
fn cancelled_is_distinct_from_failed() {
    assert!(FxError::Cancelled.is_cancelled());
    assert!(!FxError::failed("a", "b").is_cancelled());
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = FxError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
