/// Convenience result type used across autorig.
pub type AutorigResult<T> = Result<T, AutorigError>;

/// Top-level error taxonomy used by extraction, rigging and playback APIs.
#[derive(thiserror::Error, Debug)]
pub enum AutorigError {
    /// Invalid sizes, dimensions, or otherwise inconsistent caller data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Input that carries no usable content (zero-area bounds, empty image, empty keypoints).
    ///
    /// Extraction isolates this per layer; it only escapes when a caller asks for it directly.
    #[error("degenerate input: {0}")]
    DegenerateInput(String),

    /// A clip rejected at registration time.
    #[error("malformed clip '{clip}': {reason}")]
    MalformedClip {
        /// Name of the offending clip.
        clip: String,
        /// What failed validation.
        reason: String,
    },

    /// A layer type or alias name that is not part of the vocabulary.
    #[error("unknown layer type: {0}")]
    UnknownLayerType(String),

    /// Errors when serializing or deserializing manifests and detector inputs.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AutorigError {
    /// Build an [`AutorigError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build an [`AutorigError::DegenerateInput`] value.
    pub fn degenerate(msg: impl Into<String>) -> Self {
        Self::DegenerateInput(msg.into())
    }

    /// Build an [`AutorigError::MalformedClip`] value.
    pub fn malformed_clip(clip: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedClip {
            clip: clip.into(),
            reason: reason.into(),
        }
    }

    /// Build an [`AutorigError::UnknownLayerType`] value.
    pub fn unknown_layer_type(name: impl Into<String>) -> Self {
        Self::UnknownLayerType(name.into())
    }

    /// Build an [`AutorigError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for AutorigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
