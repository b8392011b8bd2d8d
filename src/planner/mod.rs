//! Cut planning: splitting a request into stream-copy and re-encode pieces

pub mod strategy;

pub use strategy::CutPlanner;

use crate::domain::model::{MediaProfile, Timestamp};

/// Points where a stream copy may begin or end.
///
/// Every keyframe inside the media plus the absolute start and end of the
/// file. Copying from zero or up to the end never needs a preceding
/// reference frame.
#[derive(Debug, Clone, Copy)]
pub struct SplitPoints<'a> {
    profile: &'a MediaProfile,
}

impl<'a> SplitPoints<'a> {
    pub fn new(profile: &'a MediaProfile) -> Self {
        Self { profile }
    }

    /// Smallest split point at or after `at`, if any lies within the media
    pub fn first_at_or_after(&self, at: Timestamp) -> Option<Timestamp> {
        let duration = self.profile.duration;
        if at > duration {
            return None;
        }
        if at <= Timestamp::ZERO {
            return Some(Timestamp::ZERO);
        }

        let keyframe = self
            .profile
            .keyframes
            .first_at_or_after(at)
            .filter(|k| *k <= duration);
        Some(keyframe.unwrap_or(duration))
    }

    /// Largest split point at or before `at`, if any lies within the media
    pub fn last_at_or_before(&self, at: Timestamp) -> Option<Timestamp> {
        let duration = self.profile.duration;
        if at < Timestamp::ZERO {
            return None;
        }
        if at >= duration {
            return Some(duration);
        }

        let keyframe = self.profile.keyframes.last_at_or_before(at);
        Some(keyframe.unwrap_or(Timestamp::ZERO))
    }

    /// Whether a stream copy may begin or end exactly at `at`
    pub fn contains(&self, at: Timestamp) -> bool {
        at == Timestamp::ZERO
            || at == self.profile.duration
            || (at < self.profile.duration && self.profile.keyframes.contains(at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::KeyframeSet;
    use rust_decimal_macros::dec;

    fn profile(keyframes: &[Timestamp], duration: Timestamp) -> MediaProfile {
        MediaProfile::new(duration, KeyframeSet::new(keyframes.to_vec()).unwrap())
    }

    #[test]
    fn test_split_points_include_file_edges() {
        let profile = profile(&[dec!(0.5), dec!(3.0)], dec!(5.0));
        let points = SplitPoints::new(&profile);

        assert!(points.contains(dec!(0)));
        assert!(points.contains(dec!(0.5)));
        assert!(points.contains(dec!(5.0)));
        assert!(!points.contains(dec!(4.0)));

        assert_eq!(points.first_at_or_after(dec!(0)), Some(dec!(0)));
        assert_eq!(points.first_at_or_after(dec!(3.5)), Some(dec!(5.0)));
        assert_eq!(points.last_at_or_before(dec!(0.4)), Some(dec!(0)));
        assert_eq!(points.last_at_or_before(dec!(5.0)), Some(dec!(5.0)));
    }

    #[test]
    fn test_split_points_fall_back_to_file_edges() {
        let profile = profile(&[dec!(3.0)], dec!(5.0));
        let points = SplitPoints::new(&profile);

        assert_eq!(points.first_at_or_after(dec!(3.5)), Some(dec!(5.0)));
        assert_eq!(points.last_at_or_before(dec!(2.9)), Some(dec!(0)));
        assert_eq!(points.first_at_or_after(dec!(5.0)), Some(dec!(5.0)));
        assert_eq!(points.last_at_or_before(dec!(-0.1)), None);
    }

    #[test]
    fn test_split_points_ignore_keyframes_past_duration() {
        let profile = profile(&[dec!(0), dec!(2.0), dec!(7.0)], dec!(6.0));
        let points = SplitPoints::new(&profile);

        assert!(!points.contains(dec!(7.0)));
        assert_eq!(points.first_at_or_after(dec!(2.5)), Some(dec!(6.0)));
        assert_eq!(points.first_at_or_after(dec!(6.5)), None);
    }
}
