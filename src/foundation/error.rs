/// Convenience result type used across fxgraph.
pub type FxResult<T> = Result<T, FxError>;

/// Top-level error taxonomy used by the render core.
///
/// A cancelled render carries no diagnostic. A failure is always preceded by a message posted
/// on the effect that produced it.
#[derive(thiserror::Error, Debug)]
pub enum FxError {
    /// Invalid user-provided graph, parameter or configuration data.
    #[error("validation error: {0}")]
    Validation(String),

    /// An effect could not produce a valid result.
    #[error("render failed in '{effect}': {reason}")]
    Failed {
        /// Name of the effect that failed.
        effect: String,
        /// Human readable explanation.
        reason: String,
    },

    /// The abort flag was observed at a poll point.
    #[error("render cancelled")]
    Cancelled,

    /// Region algebra could not produce a region of definition.
    #[error("'{effect}' has no region of definition")]
    NoRegionOfDefinition {
        /// Name of the effect.
        effect: String,
    },

    /// A parameter edit was attempted on an immutable render clone.
    #[error("cannot set parameter '{param}' on a render clone of '{effect}'")]
    ReadOnlyClone {
        /// Name of the effect.
        effect: String,
        /// Parameter that was targeted.
        param: String,
    },

    /// Render arguments were queried from a thread that is not rendering the effect.
    #[error("no render in flight for '{effect}' on the calling thread")]
    NoActiveRender {
        /// Name of the effect.
        effect: String,
    },

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FxError {
    /// Build a [`FxError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`FxError::Failed`] value.
    pub fn failed(effect: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Failed {
            effect: effect.into(),
            reason: reason.into(),
        }
    }

    /// Return `true` for the cancellation outcome.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    pub(crate) fn poisoned(what: &str) -> Self {
        Self::Other(anyhow::anyhow!("{what} lock poisoned"))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
