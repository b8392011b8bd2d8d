// Domain errors - Planning failures raised before anything touches the disk

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised while planning a cut
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    /// Start and end coincide, the cut would be zero-length
    #[error("Empty range: start and end are both {at}s")]
    EmptyRange { at: Decimal },

    /// End lies before start
    #[error("Inverted range: start ({start}s) is after end ({end}s)")]
    InvertedRange { start: Decimal, end: Decimal },

    /// Range leaves the source media
    #[error("Range {start}s - {end}s lies outside the media (0s - {duration}s)")]
    OutOfBounds {
        start: Decimal,
        end: Decimal,
        duration: Decimal,
    },

    /// Merge requested without any part files
    #[error("No part files to merge")]
    NoParts,

    /// Keyframe timestamps are not strictly increasing and non-negative
    #[error("Invalid keyframe sequence: {0}")]
    InvalidKeyframes(String),
}
