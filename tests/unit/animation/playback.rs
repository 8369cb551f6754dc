use super::*;
use crate::{animation::store::AnimationClipStore, rig::layer_type::LayerType};

fn clips() -> AnimationClipStore {
    AnimationClipStore::with_defaults().unwrap()
}

#[test]
fn idle_state_needs_no_redraw() {
    let mut st = AnimationState::idle();
    assert!(!st.needs_redraw());
    assert_eq!(st.advance(1000.0), PlaybackStatus::Idle);
    assert_eq!(st.elapsed_ms(1000.0), 0.0);
}

#[test]
fn non_looping_clip_deactivates_after_duration() {
    let store = clips();
    let mut st = AnimationState::idle();
    st.start(store.get("smile").unwrap(), 1000.0);
    assert!(st.needs_redraw());
    assert_eq!(
        st.advance(1250.0),
        PlaybackStatus::Playing { elapsed_ms: 250.0 }
    );
    assert_eq!(st.advance(1500.0), PlaybackStatus::Idle);
    assert!(!st.needs_redraw());
    assert!(st.active_clip().is_none());
}

#[test]
fn looping_clip_keeps_playing() {
    let store = clips();
    let mut st = AnimationState::idle();
    st.start(store.get("idle").unwrap(), 0.0);
    assert!(matches!(st.advance(60_000.0), PlaybackStatus::Playing { .. }));
    st.stop();
    assert_eq!(st.advance(60_001.0), PlaybackStatus::Idle);
}

#[test]
fn switching_clips_is_atomic() {
    let store = clips();
    let mut st = AnimationState::idle();
    st.start(store.get("smile").unwrap(), 0.0);
    st.advance(100.0);
    st.start(store.get("blink").unwrap(), 120.0);

    let active = st.active_clip().unwrap();
    assert_eq!(active.name(), "blink");
    let elapsed = st.elapsed_ms(170.0);
    assert_eq!(elapsed, 50.0);

    // The mouth is no longer driven by smile; the eyes follow blink alone.
    let mouth = AnimationEngine::transform_for(LayerType::Mouth, Some(active), elapsed);
    assert_eq!(mouth.transform, crate::animation::engine::Transform::IDENTITY);
    let eyes = AnimationEngine::transform_for(LayerType::Eyes, Some(active), elapsed);
    assert!((eyes.transform.scale_y - 0.55).abs() < 1e-12);
}
