//! Error types for union operations.

use thiserror::Error;

/// Reasons a pairwise union could not be resolved.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UnionError {
    /// An operand ring crosses or overlaps itself.
    #[error("operand ring is self-intersecting")]
    SelfIntersection,

    /// The boolean operation panicked.
    #[error("boolean operation panicked: {0}")]
    Panicked(String),

    /// The union of two non-empty operands came back empty.
    #[error("union produced an empty geometry")]
    Empty,

    /// The result holds NaN or infinite coordinates.
    #[error("union produced non-finite coordinates")]
    NonFinite,
}
