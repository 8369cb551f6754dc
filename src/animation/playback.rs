use std::sync::Arc;

use crate::animation::{engine::AnimationEngine, store::ResolvedClip};

/// The clip currently playing and when it started.
#[derive(Clone, Debug, PartialEq)]
pub struct ActiveClip {
    /// Clip being played.
    pub clip: Arc<ResolvedClip>,
    /// Caller clock value at `start`.
    pub started_at_ms: f64,
}

/// Outcome of [`AnimationState::advance`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PlaybackStatus {
    /// Nothing is playing; a single static render is enough.
    Idle,
    /// A clip is active and the caller should keep ticking.
    Playing {
        /// Time since the clip started.
        elapsed_ms: f64,
    },
}

/// Idle/Playing state machine, owned by the caller's tick loop.
///
/// At most one clip is active. Starting a clip replaces the previous one outright, so the next
/// rendered tick never mixes two clips.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnimationState {
    active: Option<ActiveClip>,
}

impl AnimationState {
    /// State with nothing playing.
    pub fn idle() -> Self {
        Self::default()
    }

    /// Play `clip` from `now_ms`, replacing whatever was active.
    pub fn start(&mut self, clip: Arc<ResolvedClip>, now_ms: f64) {
        tracing::debug!(clip = clip.name(), now_ms, "clip started");
        self.active = Some(ActiveClip {
            clip,
            started_at_ms: now_ms,
        });
    }

    /// Drop the active clip.
    pub fn stop(&mut self) {
        self.active = None;
    }

    /// Active clip, if any.
    pub fn active(&self) -> Option<&ActiveClip> {
        self.active.as_ref()
    }

    /// Active clip definition, if any.
    pub fn active_clip(&self) -> Option<&ResolvedClip> {
        self.active.as_ref().map(|a| a.clip.as_ref())
    }

    /// Time into the active clip at `now_ms`; zero when idle.
    pub fn elapsed_ms(&self, now_ms: f64) -> f64 {
        self.active
            .as_ref()
            .map_or(0.0, |a| (now_ms - a.started_at_ms).max(0.0))
    }

    /// Move the state machine to `now_ms`, deactivating a non-looping clip that has run its
    /// full duration.
    pub fn advance(&mut self, now_ms: f64) -> PlaybackStatus {
        let Some(active) = &self.active else {
            return PlaybackStatus::Idle;
        };
        let elapsed_ms = self.elapsed_ms(now_ms);
        let (_, finished) = AnimationEngine::phase(&active.clip.clip, elapsed_ms);
        if finished {
            tracing::debug!(clip = active.clip.name(), "clip finished");
            self.active = None;
            return PlaybackStatus::Idle;
        }
        PlaybackStatus::Playing { elapsed_ms }
    }

    /// True only while a clip is active.
    pub fn needs_redraw(&self) -> bool {
        self.active.is_some()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/playback.rs"]
mod tests;
