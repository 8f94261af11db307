//! Error types for descriptor parsing and context construction.

use std::fmt;

/// Which kind of descriptor was being parsed when an error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorKind {
    /// A channel descriptor (`site0/A,site1/A`).
    Channel,
    /// A site descriptor (`site0,site1`).
    Site,
}

impl fmt::Display for DescriptorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DescriptorKind::Channel => write!(f, "channel"),
            DescriptorKind::Site => write!(f, "site"),
        }
    }
}

/// Errors from parsing channel and site descriptors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DescriptorError {
    /// A token does not match the `site<N>/<pin>`, `<pin>` or `site<N>` grammar.
    #[error("malformed {kind} descriptor: token {position} '{token}' {reason}")]
    Malformed {
        /// Descriptor being parsed.
        kind: DescriptorKind,
        /// The offending token, trimmed.
        token: String,
        /// Zero-based index of the token within its descriptor.
        position: usize,
        /// What is wrong with the token.
        reason: String,
    },
}

impl DescriptorError {
    pub(crate) fn malformed(
        kind: DescriptorKind,
        token: &str,
        position: usize,
        reason: impl Into<String>,
    ) -> Self {
        DescriptorError::Malformed {
            kind,
            token: token.to_string(),
            position,
            reason: reason.into(),
        }
    }

    /// The offending token.
    pub fn token(&self) -> &str {
        match self {
            DescriptorError::Malformed { token, .. } => token,
        }
    }

    /// Zero-based position of the offending token.
    pub fn position(&self) -> usize {
        match self {
            DescriptorError::Malformed { position, .. } => *position,
        }
    }
}

/// Errors from building a [`PinSiteContext`](crate::context::PinSiteContext).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContextError {
    #[error("site {0} listed more than once")]
    DuplicateSite(u32),

    #[error("site {0} is out of range (maximum {max})", max = crate::site::MAX_SITE)]
    SiteOutOfRange(u32),

    #[error("pin '{0}' listed more than once")]
    DuplicatePin(String),

    #[error("pin name must not be empty")]
    EmptyPinName,

    #[error("invalid pin name '{0}': separators and surrounding whitespace are not allowed")]
    InvalidPinName(String),
}

/// Result type for descriptor operations.
pub type Result<T> = std::result::Result<T, DescriptorError>;
