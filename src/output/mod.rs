//! Output verification module

use serde::Serialize;

use crate::domain::model::Timestamp;

pub mod verifier;

pub use verifier::SegmentVerifier;

/// Result of comparing a produced segment against its requested range
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationResult {
    /// Requested duration (`end - start`)
    pub expected_duration: Timestamp,
    /// Duration probed from the written file
    pub actual_duration: Timestamp,
    /// Absolute difference between the two
    pub deviation: Timestamp,
    /// Deviation within tolerance
    pub success: bool,
}
