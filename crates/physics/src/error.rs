//! Errors raised by collision queries.

use thiserror::Error;

/// Errors that can occur while querying the collision world.
///
/// Both variants describe configuration bugs (a collider the caller should
/// never have handed to that query), not conditions a running game recovers
/// from.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PhysicsError {
    /// The shape cannot be used for the requested query.
    #[error("{operation} is not supported for {shape} colliders")]
    UnsupportedShape {
        /// Name of the collider shape.
        shape: &'static str,
        /// Query that was attempted.
        operation: &'static str,
    },

    /// The backend has no algorithm for this pair of shapes.
    #[error("collision backend cannot {operation} this shape pair")]
    UnsupportedPair {
        /// Query that was attempted.
        operation: &'static str,
    },
}

impl PhysicsError {
    pub(crate) fn unsupported_shape(shape: &'static str, operation: &'static str) -> Self {
        Self::UnsupportedShape { shape, operation }
    }
}
