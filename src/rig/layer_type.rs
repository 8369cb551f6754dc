use std::collections::{BTreeMap, BTreeSet};

use crate::foundation::error::{AutorigError, AutorigResult};

/// Closed vocabulary of character parts a layer can represent.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum LayerType {
    /// Everything outside the character mask.
    Background,
    /// Lower two thirds of the figure.
    Body,
    /// Chest and belly between shoulders and hips.
    Torso,
    /// Head including hair silhouette.
    Head,
    /// Inner face.
    Face,
    /// Both eyes as one band.
    Eyes,
    /// The character's left eye (image right).
    LeftEye,
    /// The character's right eye (image left).
    RightEye,
    /// Oversized stylised eyes.
    AnimeEyes,
    /// Nose.
    Nose,
    /// Mouth.
    Mouth,
    /// Bangs and fringe drawn over the face.
    HairFront,
    /// Hair drawn behind the head.
    HairBack,
    /// Both arms as one band.
    Arms,
    /// The character's left arm (image right).
    LeftArm,
    /// The character's right arm (image left).
    RightArm,
    /// The character's left leg (image right).
    LeftLeg,
    /// The character's right leg (image left).
    RightLeg,
    /// Hats, bows, and other headwear.
    Accessories,
}

impl LayerType {
    /// Every layer type, in declaration order.
    pub const ALL: [LayerType; 19] = [
        Self::Background,
        Self::Body,
        Self::Torso,
        Self::Head,
        Self::Face,
        Self::Eyes,
        Self::LeftEye,
        Self::RightEye,
        Self::AnimeEyes,
        Self::Nose,
        Self::Mouth,
        Self::HairFront,
        Self::HairBack,
        Self::Arms,
        Self::LeftArm,
        Self::RightArm,
        Self::LeftLeg,
        Self::RightLeg,
        Self::Accessories,
    ];

    /// Layers produced when no detector summary narrows the set.
    pub const DEFAULT_SET: [LayerType; 11] = [
        Self::Background,
        Self::HairBack,
        Self::Body,
        Self::LeftArm,
        Self::RightArm,
        Self::Head,
        Self::Face,
        Self::Eyes,
        Self::Mouth,
        Self::HairFront,
        Self::Accessories,
    ];

    /// Canonical snake_case name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Background => "background",
            Self::Body => "body",
            Self::Torso => "torso",
            Self::Head => "head",
            Self::Face => "face",
            Self::Eyes => "eyes",
            Self::LeftEye => "left_eye",
            Self::RightEye => "right_eye",
            Self::AnimeEyes => "anime_eyes",
            Self::Nose => "nose",
            Self::Mouth => "mouth",
            Self::HairFront => "hair_front",
            Self::HairBack => "hair_back",
            Self::Arms => "arms",
            Self::LeftArm => "left_arm",
            Self::RightArm => "right_arm",
            Self::LeftLeg => "left_leg",
            Self::RightLeg => "right_leg",
            Self::Accessories => "accessories",
        }
    }

    /// Painter's order: lower values are drawn first.
    pub fn default_z_index(self) -> i32 {
        match self {
            Self::Background => 0,
            Self::HairBack => 1,
            Self::Body => 2,
            Self::Torso => 3,
            Self::LeftLeg | Self::RightLeg => 4,
            Self::Arms | Self::LeftArm | Self::RightArm => 5,
            Self::Head => 6,
            Self::Face => 7,
            Self::Eyes | Self::LeftEye | Self::RightEye => 8,
            Self::AnimeEyes => 9,
            Self::Nose => 10,
            Self::Mouth => 11,
            Self::HairFront => 12,
            Self::Accessories => 13,
        }
    }

    /// Stable layer id derived from the type.
    pub fn layer_id(self) -> String {
        format!("{}_layer", self.as_str())
    }
}

impl std::fmt::Display for LayerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LayerType {
    type Err = AutorigError;

    fn from_str(s: &str) -> AutorigResult<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| AutorigError::unknown_layer_type(s))
    }
}

/// Named sets of layer types a clip can target collectively.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AliasGroup {
    /// `eyes`, `left_eye`, `right_eye`, `anime_eyes`.
    Eyes,
    /// `arms`, `left_arm`, `right_arm`.
    Arms,
    /// `left_leg`, `right_leg`.
    Legs,
    /// `hair_front`, `hair_back`.
    Hair,
}

impl AliasGroup {
    /// Every alias group.
    pub const ALL: [AliasGroup; 4] = [Self::Eyes, Self::Arms, Self::Legs, Self::Hair];

    /// Group name as written in clip targets.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Eyes => "eyes",
            Self::Arms => "arms",
            Self::Legs => "legs",
            Self::Hair => "hair",
        }
    }

    /// Members of the group.
    pub fn members(self) -> &'static [LayerType] {
        match self {
            Self::Eyes => &[
                LayerType::Eyes,
                LayerType::LeftEye,
                LayerType::RightEye,
                LayerType::AnimeEyes,
            ],
            Self::Arms => &[LayerType::Arms, LayerType::LeftArm, LayerType::RightArm],
            Self::Legs => &[LayerType::LeftLeg, LayerType::RightLeg],
            Self::Hair => &[LayerType::HairFront, LayerType::HairBack],
        }
    }
}

/// Precomputed target-name expansion: every group name and every layer type name maps to the
/// set of layer types it selects.
///
/// Group names shadow the layer type of the same name, so `"eyes"` selects the whole group.
#[derive(Clone, Debug)]
pub struct AliasTable {
    expansions: BTreeMap<&'static str, BTreeSet<LayerType>>,
}

impl Default for AliasTable {
    fn default() -> Self {
        Self::new()
    }
}

impl AliasTable {
    /// Build the fixed table.
    pub fn new() -> Self {
        let mut expansions = BTreeMap::new();
        for t in LayerType::ALL {
            expansions.insert(t.as_str(), BTreeSet::from([t]));
        }
        for g in AliasGroup::ALL {
            expansions.insert(g.as_str(), g.members().iter().copied().collect());
        }
        Self { expansions }
    }

    /// Expand one target name.
    pub fn expand(&self, name: &str) -> AutorigResult<&BTreeSet<LayerType>> {
        self.expansions
            .get(name)
            .ok_or_else(|| AutorigError::unknown_layer_type(name))
    }

    /// Expand and union a list of target names.
    pub fn expand_all<S: AsRef<str>>(&self, names: &[S]) -> AutorigResult<BTreeSet<LayerType>> {
        let mut out = BTreeSet::new();
        for name in names {
            out.extend(self.expand(name.as_ref())?.iter().copied());
        }
        Ok(out)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/rig/layer_type.rs"]
mod tests;
