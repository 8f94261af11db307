//! Error types for LUT construction and scatter/gather.

use pinlut_core::{DescriptorError, Site};

/// Errors from building or applying lookup tables.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LutError {
    /// A channel or site descriptor failed to parse.
    #[error(transparent)]
    Descriptor(#[from] DescriptorError),

    /// Supplied values do not have the shape the LUT expects.
    #[error("shape mismatch in {context}: expected {expected}, got {actual}")]
    ShapeMismatch {
        context: String,
        expected: usize,
        actual: usize,
    },

    /// A LUT location falls outside the destination or source bounds.
    #[error("location {location} out of range: {axis} index {index} >= {len}")]
    IndexOutOfRange {
        location: String,
        axis: &'static str,
        index: usize,
        len: usize,
    },

    /// Two partitions claim the same (site, pin) key under the strict policy.
    #[error("{key} is claimed by partition {first} and partition {second}")]
    AmbiguousMapping {
        key: String,
        first: usize,
        second: usize,
    },

    /// A site is missing from the caller's site list, or from every partition.
    #[error("{site} {}", unresolved_detail(.partition))]
    UnresolvedSite {
        site: Site,
        /// Partition that referenced the site; `None` when no partition claims it.
        partition: Option<usize>,
    },

    /// A (site, pin) is missing from the caller's lists, or from every partition.
    #[error("pin '{pin}' on {site} {}", unresolved_detail(.partition))]
    UnresolvedPin {
        pin: String,
        site: Site,
        partition: Option<usize>,
    },
}

fn unresolved_detail(partition: &Option<usize>) -> String {
    match partition {
        Some(p) => format!("in partition {p} is not in the caller's site/pin lists"),
        None => "is not claimed by any partition".to_string(),
    }
}

impl LutError {
    pub(crate) fn shape(context: impl Into<String>, expected: usize, actual: usize) -> Self {
        LutError::ShapeMismatch {
            context: context.into(),
            expected,
            actual,
        }
    }
}

/// Result type for LUT operations.
pub type Result<T> = std::result::Result<T, LutError>;
