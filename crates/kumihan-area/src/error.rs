//! Area tree errors.

use thiserror::Error;

use crate::geometry::ReferenceRectangle;
use crate::tree::AreaId;

/// Misuse of the area tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AreaError {
    /// The id does not name an area of this tree.
    #[error("no area {0}")]
    UnknownArea(AreaId),

    /// A leaf was asked to take a child.
    #[error("area {0} cannot have children")]
    NotAContainer(AreaId),

    /// A line only takes inline areas.
    #[error("line {line} cannot contain {kind} area {child}")]
    NotInline {
        /// The line.
        line: AreaId,
        /// The rejected child.
        child: AreaId,
        /// Kind of the rejected child.
        kind: &'static str,
    },

    /// The insertion point is not a child of the parent.
    #[error("area {before} is not a child of {parent}")]
    NotAChild {
        /// The parent.
        parent: AreaId,
        /// The requested insertion point.
        before: AreaId,
    },

    /// The child is the parent or one of its ancestors.
    #[error("area {child} cannot be placed inside its own descendant {parent}")]
    Cycle {
        /// The parent.
        parent: AreaId,
        /// The rejected child.
        child: AreaId,
    },

    /// The rectangle cannot be resolved without a containing context.
    #[error("unsupported reference rectangle '{0}'")]
    UnsupportedRectangle(ReferenceRectangle),
}
