use super::*;

fn two_key(name: &str) -> AnimationClip {
    AnimationClip::new(
        name,
        ["mouth"],
        500,
        vec![
            Keyframe::at(0.0).with(Channel::ScaleY, 1.0),
            Keyframe::at(1.0).with(Channel::ScaleY, 1.2),
        ],
    )
}

fn reason(err: AutorigError) -> String {
    match err {
        AutorigError::MalformedClip { reason, .. } => reason,
        other => panic!("expected MalformedClip, got {other:?}"),
    }
}

#[test]
fn well_formed_clip_validates() {
    two_key("ok").validate().unwrap();
}

#[test]
fn single_keyframe_is_rejected() {
    let mut c = two_key("one");
    c.keyframes.truncate(1);
    assert!(reason(c.validate().unwrap_err()).contains("two keyframes"));
}

#[test]
fn unsorted_or_unanchored_times_are_rejected() {
    let mut c = two_key("unsorted");
    c.keyframes.insert(1, Keyframe::at(0.8));
    c.keyframes.insert(2, Keyframe::at(0.3));
    assert!(reason(c.validate().unwrap_err()).contains("strictly increase"));

    let mut c = two_key("late_start");
    c.keyframes[0].time = 0.1;
    assert!(reason(c.validate().unwrap_err()).contains("expected 0"));

    let mut c = two_key("early_end");
    c.keyframes[1].time = 0.9;
    assert!(reason(c.validate().unwrap_err()).contains("expected 1"));

    let mut c = two_key("nan");
    c.keyframes[1].time = f64::NAN;
    assert!(c.validate().is_err());
}

#[test]
fn repeated_keyframe_time_is_rejected() {
    let mut c = two_key("step");
    c.keyframes.insert(1, Keyframe::at(0.5).with(Channel::ScaleY, 2.0));
    c.keyframes.insert(2, Keyframe::at(0.5).with(Channel::ScaleY, 3.0));
    let why = reason(c.validate().unwrap_err());
    assert!(why.contains("strictly increase"), "{why}");
    assert!(why.contains("keyframe 2"), "{why}");

    c.keyframes[2].time = 0.50001;
    c.validate().unwrap();
}

#[test]
fn zero_duration_and_non_finite_channels_are_rejected() {
    let mut c = two_key("zero");
    c.duration_ms = 0;
    assert!(c.validate().is_err());

    let mut c = two_key("inf");
    c.keyframes[0].opacity = Some(f64::INFINITY);
    assert!(reason(c.validate().unwrap_err()).contains("Opacity"));
}

#[test]
fn json_uses_camel_case_loop_and_rotate_alias() {
    let c: AnimationClip = serde_json::from_str(
        r#"{"name":"wave","targetTypes":["right_arm"],"durationMs":1000,"loop":true,
            "pivot":{"kind":"joint","name":"right_shoulder"},
            "keyframes":[{"time":0,"rotate":0},{"time":1,"rotateDeg":-45}]}"#,
    )
    .unwrap();
    assert!(c.looping);
    assert_eq!(c.keyframes[0].rotate_deg, Some(0.0));
    assert_eq!(c.keyframes[1].rotate_deg, Some(-45.0));
    assert_eq!(
        c.pivot,
        Pivot::Joint {
            name: "right_shoulder".to_string()
        }
    );

    let back = serde_json::to_value(&c).unwrap();
    assert_eq!(back["loop"], true);
    assert_eq!(back["keyframes"][1]["rotateDeg"], -45.0);
    assert!(back["keyframes"][0].get("scaleX").is_none());
}
