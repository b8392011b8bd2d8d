//! Output verification implementation

use std::path::Path;

use tracing::{info, warn};

use crate::domain::model::Timestamp;
use crate::error::CutterResult;
use crate::output::VerificationResult;
use crate::ports::ProbePort;
use crate::utils::time::format_seconds;

/// Checks the duration of produced segments
pub struct SegmentVerifier<'a> {
    probe: &'a dyn ProbePort,
    tolerance: Timestamp,
}

impl<'a> SegmentVerifier<'a> {
    /// Create a verifier accepting `tolerance` seconds of drift
    pub fn new(probe: &'a dyn ProbePort, tolerance: Timestamp) -> Self {
        Self { probe, tolerance }
    }

    /// Probe `output_path` and compare with `expected_duration`
    pub async fn verify(
        &self,
        output_path: &Path,
        expected_duration: Timestamp,
    ) -> CutterResult<VerificationResult> {
        let actual_duration = self.probe.probe_duration(output_path).await?;
        let result = compare_durations(expected_duration, actual_duration, self.tolerance);

        if result.success {
            info!(
                "Verified {}: {}s",
                output_path.display(),
                format_seconds(actual_duration)
            );
        } else {
            warn!(
                "Duration mismatch for {}: expected {}s, got {}s",
                output_path.display(),
                format_seconds(expected_duration),
                format_seconds(actual_duration)
            );
        }

        Ok(result)
    }
}

fn compare_durations(
    expected: Timestamp,
    actual: Timestamp,
    tolerance: Timestamp,
) -> VerificationResult {
    let deviation = (actual - expected).abs();
    VerificationResult {
        expected_duration: expected,
        actual_duration: actual,
        deviation,
        success: deviation <= tolerance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::KeyframeSet;
    use async_trait::async_trait;
    use rust_decimal_macros::dec;

    struct FixedDuration(Timestamp);

    #[async_trait]
    impl ProbePort for FixedDuration {
        async fn probe_duration(&self, _file_path: &Path) -> CutterResult<Timestamp> {
            Ok(self.0)
        }

        async fn probe_keyframes(&self, _file_path: &Path) -> CutterResult<KeyframeSet> {
            Ok(KeyframeSet::default())
        }
    }

    #[test]
    fn test_compare_durations() {
        let ok = compare_durations(dec!(4), dec!(4.033), dec!(0.1));
        assert!(ok.success);
        assert_eq!(ok.deviation, dec!(0.033));

        let off = compare_durations(dec!(4), dec!(3.5), dec!(0.1));
        assert!(!off.success);
        assert_eq!(off.deviation, dec!(0.5));
    }

    #[tokio::test]
    async fn test_verify_probes_output() {
        let probe = FixedDuration(dec!(2.002));
        let verifier = SegmentVerifier::new(&probe, dec!(0.1));
        let result = verifier
            .verify(Path::new("cuts/00 intro.mp4"), dec!(2))
            .await
            .unwrap();
        assert!(result.success);
        assert_eq!(result.actual_duration, dec!(2.002));
    }
}
