//! Error types for plugin configuration and entity resolution.
//!
//! None of these are fatal to the host: a plugin that fails to resolve
//! reports the error once and degrades to a no-op.

use thiserror::Error;

/// Errors raised while loading configuration or resolving named entities.
#[derive(Debug, Error)]
pub enum HippoError {
    /// The model the plugin is attached to does not exist.
    #[error("model [{0}] not found")]
    ModelNotFound(String),

    /// A named link could not be found in the model.
    #[error("link with name [{link}] not found in model [{model}]")]
    LinkNotFound {
        /// Model that was searched.
        model: String,
        /// Requested link name.
        link: String,
    },

    /// A named joint could not be found in the model.
    #[error("joint with name [{joint}] not found in model [{model}]")]
    JointNotFound {
        /// Model that was searched.
        model: String,
        /// Requested joint name.
        joint: String,
    },

    /// The joint carries no parent link reference.
    #[error("joint [{0}] has no parent link")]
    ParentLinkMissing(String),

    /// A configuration value is out of its valid domain.
    #[error("invalid config value for {field}: {reason}")]
    InvalidConfig {
        /// Offending field.
        field: &'static str,
        /// Human readable reason.
        reason: String,
    },

    /// The configuration text could not be parsed.
    #[error("failed to parse config: {0}")]
    Config(#[from] serde_json::Error),
}

impl HippoError {
    pub fn link_not_found(model: impl Into<String>, link: impl Into<String>) -> Self {
        Self::LinkNotFound {
            model: model.into(),
            link: link.into(),
        }
    }

    pub fn joint_not_found(model: impl Into<String>, joint: impl Into<String>) -> Self {
        Self::JointNotFound {
            model: model.into(),
            joint: joint.into(),
        }
    }

    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, HippoError>;
