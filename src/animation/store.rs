use std::{
    collections::{BTreeMap, BTreeSet},
    sync::Arc,
};

use crate::{
    animation::clip::{AnimationClip, Channel, Keyframe, Pivot},
    foundation::error::{AutorigError, AutorigResult},
    rig::layer_type::{AliasTable, LayerType},
};

/// A validated clip with its target names expanded through the alias table.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedClip {
    /// Clip definition as registered.
    pub clip: AnimationClip,
    /// Every layer type the clip moves.
    pub targets: BTreeSet<LayerType>,
}

impl ResolvedClip {
    /// Validate and expand one clip.
    pub fn resolve(clip: AnimationClip, aliases: &AliasTable) -> AutorigResult<Self> {
        clip.validate()?;
        let targets = aliases.expand_all(&clip.target_types)?;
        Ok(Self { clip, targets })
    }

    /// Clip name.
    pub fn name(&self) -> &str {
        &self.clip.name
    }

    /// Set-membership test against the precomputed expansion.
    pub fn targets(&self, layer_type: LayerType) -> bool {
        self.targets.contains(&layer_type)
    }
}

/// Registry of playable clips keyed by name.
///
/// Every clip is validated at construction; nothing malformed can be selected for playback.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnimationClipStore {
    clips: BTreeMap<String, Arc<ResolvedClip>>,
}

impl AnimationClipStore {
    /// Register `clips`, rejecting the whole set on the first invalid clip or unknown target.
    pub fn new(clips: impl IntoIterator<Item = AnimationClip>) -> AutorigResult<Self> {
        let aliases = AliasTable::new();
        let mut out = BTreeMap::new();
        for clip in clips {
            let resolved = ResolvedClip::resolve(clip, &aliases)?;
            if out.contains_key(resolved.name()) {
                return Err(AutorigError::malformed_clip(
                    resolved.name(),
                    "duplicate clip name",
                ));
            }
            out.insert(resolved.clip.name.clone(), Arc::new(resolved));
        }
        Ok(Self { clips: out })
    }

    /// Store holding [`default_clips`].
    pub fn with_defaults() -> AutorigResult<Self> {
        Self::new(default_clips())
    }

    /// Default clips with `overrides` added; an override replaces a default of the same name.
    pub fn with_overrides(overrides: impl IntoIterator<Item = AnimationClip>) -> AutorigResult<Self> {
        let mut by_name: BTreeMap<String, AnimationClip> = default_clips()
            .into_iter()
            .map(|c| (c.name.clone(), c))
            .collect();
        for clip in overrides {
            by_name.insert(clip.name.clone(), clip);
        }
        Self::new(by_name.into_values())
    }

    /// Clip by name.
    pub fn get(&self, name: &str) -> Option<Arc<ResolvedClip>> {
        self.clips.get(name).cloned()
    }

    /// Clip by name, or [`AutorigError::Validation`] naming the available clips.
    pub fn require(&self, name: &str) -> AutorigResult<Arc<ResolvedClip>> {
        self.get(name).ok_or_else(|| {
            AutorigError::validation(format!(
                "unknown clip '{name}', available: {}",
                self.names().collect::<Vec<_>>().join(", ")
            ))
        })
    }

    /// Registered clip names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.clips.keys().map(String::as_str)
    }

    /// Registered clips in name order.
    pub fn iter(&self) -> impl Iterator<Item = &AnimationClip> {
        self.clips.values().map(|r| &r.clip)
    }

    /// Number of clips.
    pub fn len(&self) -> usize {
        self.clips.len()
    }

    /// True when no clips are registered.
    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
}

fn keys(channel: Channel, points: &[(f64, f64)]) -> Vec<Keyframe> {
    points
        .iter()
        .map(|&(t, v)| Keyframe::at(t).with(channel, v))
        .collect()
}

/// Blink, smile, head turn, wave and idle.
pub fn default_clips() -> Vec<AnimationClip> {
    vec![
        AnimationClip::new(
            "blink",
            ["eyes"],
            200,
            keys(Channel::ScaleY, &[(0.0, 1.0), (0.5, 0.1), (1.0, 1.0)]),
        ),
        AnimationClip::new(
            "smile",
            ["mouth"],
            500,
            vec![
                Keyframe::at(0.0)
                    .with(Channel::ScaleY, 1.0)
                    .with(Channel::TranslateY, 0.0),
                Keyframe::at(0.5)
                    .with(Channel::ScaleY, 1.2)
                    .with(Channel::TranslateY, -2.0),
                Keyframe::at(1.0)
                    .with(Channel::ScaleY, 1.0)
                    .with(Channel::TranslateY, 0.0),
            ],
        ),
        AnimationClip::new(
            "head_turn",
            ["head", "face", "eyes", "nose", "mouth", "hair_front"],
            1200,
            keys(Channel::RotateDeg, &[(0.0, 0.0), (0.5, 10.0), (1.0, 0.0)]),
        ),
        AnimationClip::new(
            "wave",
            ["right_arm"],
            1000,
            keys(
                Channel::RotateDeg,
                &[(0.0, 0.0), (0.25, -45.0), (0.5, -30.0), (0.75, -45.0), (1.0, 0.0)],
            ),
        )
        .with_pivot(Pivot::Joint {
            name: "right_shoulder".to_string(),
        }),
        AnimationClip::new(
            "idle",
            ["body", "head"],
            2000,
            keys(Channel::TranslateY, &[(0.0, 0.0), (0.5, -3.0), (1.0, 0.0)]),
        )
        .looped(),
    ]
}

#[cfg(test)]
#[path = "../../tests/unit/animation/store.rs"]
mod tests;
