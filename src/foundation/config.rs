use std::path::Path;

use anyhow::Context as _;

use crate::{
    animation::clip::AnimationClip,
    foundation::error::AutorigResult,
    render::compositor::CompositorOpts,
    segment::{extract::ExtractOpts, mask::MaskOpts},
};

/// Aggregate configuration for a full extract-and-rig run.
///
/// Every section is optional in JSON; missing sections take their defaults.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AutorigConfig {
    /// Foreground/background separation.
    pub mask: MaskOpts,
    /// Layer extraction.
    pub extract: ExtractOpts,
    /// Frame compositing.
    pub render: CompositorOpts,
    /// Extra clips registered alongside the default set. A clip with a default clip's name
    /// replaces it.
    pub clips: Vec<AnimationClip>,
}

impl AutorigConfig {
    /// Parse a JSON config document.
    pub fn from_json_str(s: &str) -> AutorigResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Read and parse a JSON config file.
    pub fn load(path: &Path) -> AutorigResult<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&s)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/config.rs"]
mod tests;
