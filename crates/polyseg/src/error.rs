//! Collection-specific error types.

use std::error::Error;
use std::fmt;

/// Errors that can occur during collection operations.
///
/// Insertion and traversal are infallible on the collection side; the only
/// runtime failure is the allocator refusing to grow a segment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PolyError {
    /// The backing storage of a segment could not grow to the requested size.
    CapacityExceeded {
        /// Concrete element type of the segment that failed to grow.
        type_name: &'static str,
        /// Number of additional elements requested.
        requested: usize,
    },
}

impl fmt::Display for PolyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityExceeded {
                type_name,
                requested,
            } => {
                write!(
                    f,
                    "segment capacity exceeded: could not reserve {requested} more `{type_name}` elements"
                )
            }
        }
    }
}

impl Error for PolyError {}
