use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        AutorigError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        AutorigError::degenerate("x")
            .to_string()
            .contains("degenerate input:")
    );
    assert!(
        AutorigError::unknown_layer_type("tail")
            .to_string()
            .contains("unknown layer type: tail")
    );
    assert!(
        AutorigError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn malformed_clip_names_the_clip() {
    let err = AutorigError::malformed_clip("blink", "last keyframe must be at time 1");
    let msg = err.to_string();
    assert!(msg.contains("'blink'"));
    assert!(msg.contains("time 1"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = AutorigError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn json_errors_become_serde() {
    let err: AutorigError = serde_json::from_str::<u32>("nope").unwrap_err().into();
    assert!(matches!(err, AutorigError::Serde(_)));
}
