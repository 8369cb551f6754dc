use crate::{
    animation::{
        clip::{AnimationClip, Channel, Keyframe},
        store::ResolvedClip,
    },
    foundation::core::{Affine, Point, Vec2},
    foundation::math::lerp,
    rig::layer_type::LayerType,
};

/// Per-layer transform produced by keyframe interpolation.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transform {
    /// Horizontal scale factor.
    pub scale_x: f64,
    /// Vertical scale factor.
    pub scale_y: f64,
    /// Horizontal offset in pixels.
    pub translate_x: f64,
    /// Vertical offset in pixels.
    pub translate_y: f64,
    /// Rotation in degrees.
    pub rotate_deg: f64,
    /// Opacity multiplier.
    pub opacity: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    /// Scale 1, translate 0, rotate 0, opacity 1.
    pub const IDENTITY: Self = Self {
        scale_x: 1.0,
        scale_y: 1.0,
        translate_x: 0.0,
        translate_y: 0.0,
        rotate_deg: 0.0,
        opacity: 1.0,
    };

    /// Value of one channel.
    pub fn get(&self, channel: Channel) -> f64 {
        match channel {
            Channel::ScaleX => self.scale_x,
            Channel::ScaleY => self.scale_y,
            Channel::TranslateX => self.translate_x,
            Channel::TranslateY => self.translate_y,
            Channel::RotateDeg => self.rotate_deg,
            Channel::Opacity => self.opacity,
        }
    }

    fn set(&mut self, channel: Channel, v: f64) {
        match channel {
            Channel::ScaleX => self.scale_x = v,
            Channel::ScaleY => self.scale_y = v,
            Channel::TranslateX => self.translate_x = v,
            Channel::TranslateY => self.translate_y = v,
            Channel::RotateDeg => self.rotate_deg = v,
            Channel::Opacity => self.opacity = v,
        }
    }

    /// True when the geometric part is the identity (opacity is not considered).
    pub fn is_geometric_identity(&self) -> bool {
        self.scale_x == 1.0
            && self.scale_y == 1.0
            && self.translate_x == 0.0
            && self.translate_y == 0.0
            && self.rotate_deg == 0.0
    }

    /// Layer-to-canvas affine around `pivot`: rotate, then scale, then translate, all in the
    /// pivot's frame.
    pub fn to_affine(&self, pivot: Point) -> Affine {
        let p = pivot.to_vec2();
        Affine::translate(p)
            * Affine::rotate(self.rotate_deg.to_radians())
            * Affine::scale_non_uniform(self.scale_x, self.scale_y)
            * Affine::translate(Vec2::new(self.translate_x, self.translate_y))
            * Affine::translate(-p)
    }
}

/// Result of sampling a clip for one layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    /// Interpolated transform.
    pub transform: Transform,
    /// True once a non-looping clip has run its full duration.
    pub finished: bool,
}

/// Stateless keyframe evaluator.
#[derive(Clone, Copy, Debug, Default)]
pub struct AnimationEngine;

impl AnimationEngine {
    /// Normalized clip phase in `[0, 1]` and whether the clip has finished.
    ///
    /// Looping clips wrap and never finish. Negative elapsed time reads as zero.
    pub fn phase(clip: &AnimationClip, elapsed_ms: f64) -> (f64, bool) {
        let d = f64::from(clip.duration_ms.max(1));
        let e = if elapsed_ms.is_finite() {
            elapsed_ms.max(0.0)
        } else {
            0.0
        };
        if clip.looping {
            ((e % d) / d, false)
        } else if e < d {
            (e / d, false)
        } else {
            (1.0, true)
        }
    }

    /// Transform for `layer_type` at `elapsed_ms` into `clip`.
    ///
    /// Layers the clip does not target, or any layer when no clip is given, get the identity.
    pub fn transform_for(
        layer_type: LayerType,
        clip: Option<&ResolvedClip>,
        elapsed_ms: f64,
    ) -> Sample {
        let Some(clip) = clip else {
            return Sample {
                transform: Transform::IDENTITY,
                finished: false,
            };
        };
        let (phase, finished) = Self::phase(&clip.clip, elapsed_ms);
        let transform = if clip.targets(layer_type) {
            Self::sample_at(&clip.clip.keyframes, phase)
        } else {
            Transform::IDENTITY
        };
        Sample {
            transform,
            finished,
        }
    }

    /// Interpolate every channel of `keyframes` at `phase`.
    pub fn sample_at(keyframes: &[Keyframe], phase: f64) -> Transform {
        let mut out = Transform::IDENTITY;
        for c in Channel::ALL {
            if let Some(v) = sample_channel(keyframes, c, phase) {
                out.set(c, v);
            }
        }
        out
    }
}

/// `None` when no keyframe specifies the channel.
fn sample_channel(keys: &[Keyframe], channel: Channel, phase: f64) -> Option<f64> {
    let idx = keys.partition_point(|k| k.time <= phase);
    let a = idx.checked_sub(1).map(|i| &keys[i]);
    let b = keys.get(idx);

    match (
        a.and_then(|k| k.channel(channel).map(|v| (k.time, v))),
        b.and_then(|k| k.channel(channel).map(|v| (k.time, v))),
    ) {
        (Some((ta, va)), Some((tb, vb))) => {
            let denom = tb - ta;
            if denom <= 0.0 {
                Some(va)
            } else {
                Some(lerp(va, vb, (phase - ta) / denom))
            }
        }
        (Some((_, v)), None) | (None, Some((_, v))) => Some(v),
        (None, None) => {
            let before = keys[..idx.saturating_sub(1)]
                .iter()
                .rev()
                .find_map(|k| k.channel(channel));
            before.or_else(|| {
                keys.get(idx + 1..)
                    .unwrap_or_default()
                    .iter()
                    .find_map(|k| k.channel(channel))
            })
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/engine.rs"]
mod tests;
