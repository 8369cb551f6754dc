use crate::{
    animation::playback::{AnimationState, PlaybackStatus},
    foundation::error::{AutorigError, AutorigResult},
    render::{
        compositor::{Compositor, LayerVisibility},
        frame::FrameRGBA,
    },
};

/// Render one pass of `clip_name` at a fixed frame rate.
///
/// Ticks start at 0 ms and advance by `1000 / fps`. A non-looping clip stops on the first tick
/// at or past its duration, which is rendered at its final pose. A looping clip is rendered for
/// exactly one period.
pub fn render_clip_frames(
    compositor: &Compositor<'_>,
    clip_name: &str,
    fps: f64,
    visibility: &LayerVisibility,
) -> AutorigResult<Vec<FrameRGBA>> {
    if !fps.is_finite() || fps <= 0.0 {
        return Err(AutorigError::validation(format!(
            "fps must be positive, got {fps}"
        )));
    }
    let clip = compositor.model().clips().require(clip_name)?;
    let duration = f64::from(clip.clip.duration_ms);
    let looping = clip.clip.looping;
    let dt = 1000.0 / fps;

    let mut state = AnimationState::idle();
    state.start(clip, 0.0);

    let mut frames = Vec::new();
    for tick in 0u64.. {
        let now = tick as f64 * dt;
        if looping && now >= duration {
            break;
        }
        frames.push(compositor.render(&state, now, visibility)?);
        if state.advance(now) == PlaybackStatus::Idle {
            break;
        }
    }
    tracing::debug!(clip = clip_name, frames = frames.len(), "clip rendered");
    Ok(frames)
}

#[cfg(test)]
#[path = "../../tests/unit/render/sequence.rs"]
mod tests;
