use crate::foundation::error::{AutorigError, AutorigResult};

/// Animatable transform channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Horizontal scale factor.
    ScaleX,
    /// Vertical scale factor.
    ScaleY,
    /// Horizontal offset in pixels.
    TranslateX,
    /// Vertical offset in pixels.
    TranslateY,
    /// Rotation in degrees, clockwise in image space.
    RotateDeg,
    /// Opacity multiplier in `[0, 1]`.
    Opacity,
}

impl Channel {
    /// Every channel.
    pub const ALL: [Channel; 6] = [
        Self::ScaleX,
        Self::ScaleY,
        Self::TranslateX,
        Self::TranslateY,
        Self::RotateDeg,
        Self::Opacity,
    ];

    /// Value the channel takes when no keyframe specifies it.
    pub fn identity(self) -> f64 {
        match self {
            Self::ScaleX | Self::ScaleY | Self::Opacity => 1.0,
            Self::TranslateX | Self::TranslateY | Self::RotateDeg => 0.0,
        }
    }
}

/// Sparse transform sample at a normalized clip time.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Keyframe {
    /// Normalized time in `[0, 1]`.
    pub time: f64,
    /// Horizontal scale factor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_x: Option<f64>,
    /// Vertical scale factor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_y: Option<f64>,
    /// Horizontal offset in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translate_x: Option<f64>,
    /// Vertical offset in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translate_y: Option<f64>,
    /// Rotation in degrees.
    #[serde(default, alias = "rotate", skip_serializing_if = "Option::is_none")]
    pub rotate_deg: Option<f64>,
    /// Opacity multiplier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
}

impl Keyframe {
    /// Keyframe at `time` with every channel unspecified.
    pub fn at(time: f64) -> Self {
        Self {
            time,
            ..Self::default()
        }
    }

    /// Set one channel, builder style.
    pub fn with(mut self, channel: Channel, value: f64) -> Self {
        *self.slot(channel) = Some(value);
        self
    }

    /// Value of `channel` if this keyframe specifies it.
    pub fn channel(&self, channel: Channel) -> Option<f64> {
        match channel {
            Channel::ScaleX => self.scale_x,
            Channel::ScaleY => self.scale_y,
            Channel::TranslateX => self.translate_x,
            Channel::TranslateY => self.translate_y,
            Channel::RotateDeg => self.rotate_deg,
            Channel::Opacity => self.opacity,
        }
    }

    fn slot(&mut self, channel: Channel) -> &mut Option<f64> {
        match channel {
            Channel::ScaleX => &mut self.scale_x,
            Channel::ScaleY => &mut self.scale_y,
            Channel::TranslateX => &mut self.translate_x,
            Channel::TranslateY => &mut self.translate_y,
            Channel::RotateDeg => &mut self.rotate_deg,
            Channel::Opacity => &mut self.opacity,
        }
    }
}

/// Point a clip rotates and scales around.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Pivot {
    /// Canvas centre.
    #[default]
    Center,
    /// Fixed point in canvas pixels.
    Point {
        /// X in pixels.
        x: f64,
        /// Y in pixels.
        y: f64,
    },
    /// Named pose joint of the model; falls back to the canvas centre when absent.
    Joint {
        /// Joint name, e.g. `right_shoulder`.
        name: String,
    },
}

/// Named, time-bounded keyframe track applied to a set of layer types.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationClip {
    /// Unique clip name.
    pub name: String,
    /// Layer type names or alias group names.
    pub target_types: Vec<String>,
    /// Keyframes sorted by time, first at 0 and last at 1.
    pub keyframes: Vec<Keyframe>,
    /// Length of one pass in milliseconds.
    pub duration_ms: u32,
    /// Restart from the beginning instead of finishing.
    #[serde(rename = "loop", default)]
    pub looping: bool,
    /// Rotation/scale origin.
    #[serde(default)]
    pub pivot: Pivot,
}

impl AnimationClip {
    /// Non-looping clip with a centre pivot.
    pub fn new<S: Into<String>>(
        name: impl Into<String>,
        target_types: impl IntoIterator<Item = S>,
        duration_ms: u32,
        keyframes: Vec<Keyframe>,
    ) -> Self {
        Self {
            name: name.into(),
            target_types: target_types.into_iter().map(Into::into).collect(),
            keyframes,
            duration_ms,
            looping: false,
            pivot: Pivot::Center,
        }
    }

    /// Mark the clip as looping.
    pub fn looped(mut self) -> Self {
        self.looping = true;
        self
    }

    /// Set the pivot.
    pub fn with_pivot(mut self, pivot: Pivot) -> Self {
        self.pivot = pivot;
        self
    }

    /// Check the structural invariants playback relies on.
    pub fn validate(&self) -> AutorigResult<()> {
        let fail = |reason: String| Err(AutorigError::malformed_clip(&self.name, reason));

        if self.name.is_empty() {
            return fail("clip name is empty".to_string());
        }
        if self.duration_ms == 0 {
            return fail("durationMs must be positive".to_string());
        }
        if self.keyframes.len() < 2 {
            return fail(format!(
                "needs at least two keyframes, has {}",
                self.keyframes.len()
            ));
        }
        for (i, k) in self.keyframes.iter().enumerate() {
            if !k.time.is_finite() || !(0.0..=1.0).contains(&k.time) {
                return fail(format!("keyframe {i} time {} outside [0, 1]", k.time));
            }
            if let Some(c) = Channel::ALL
                .into_iter()
                .find(|&c| k.channel(c).is_some_and(|v| !v.is_finite()))
            {
                return fail(format!("keyframe {i} has a non-finite {c:?}"));
            }
        }
        if let Some(i) = self
            .keyframes
            .windows(2)
            .position(|w| w[1].time <= w[0].time)
        {
            return fail(format!(
                "keyframe times must strictly increase, keyframe {} is not after keyframe {i}",
                i + 1
            ));
        }
        let (first, last) = (&self.keyframes[0], &self.keyframes[self.keyframes.len() - 1]);
        if first.time != 0.0 {
            return fail(format!("first keyframe at {}, expected 0", first.time));
        }
        if last.time != 1.0 {
            return fail(format!("last keyframe at {}, expected 1", last.time));
        }
        if let Pivot::Point { x, y } = self.pivot
            && !(x.is_finite() && y.is_finite())
        {
            return fail("pivot point is not finite".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/clip.rs"]
mod tests;
