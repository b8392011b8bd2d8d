// Unit tests for domain models

use super::*;
use rust_decimal_macros::dec;

fn keyframes() -> KeyframeSet {
    KeyframeSet::new(vec![dec!(0), dec!(2.0), dec!(4.0), dec!(6.0)]).unwrap()
}

#[test]
fn test_keyframe_set_rejects_unordered() {
    let err = KeyframeSet::new(vec![dec!(0), dec!(4), dec!(2)]).unwrap_err();
    assert!(matches!(err, PlanError::InvalidKeyframes(_)));
}

#[test]
fn test_keyframe_set_rejects_duplicates() {
    // 2 and 2.000 are the same instant
    let err = KeyframeSet::new(vec![dec!(0), dec!(2), dec!(2.000)]).unwrap_err();
    assert!(matches!(err, PlanError::InvalidKeyframes(_)));
}

#[test]
fn test_keyframe_set_rejects_negative() {
    assert!(KeyframeSet::new(vec![dec!(-0.04), dec!(1)]).is_err());
}

#[test]
fn test_keyframe_set_from_unsorted() {
    let set = KeyframeSet::from_unsorted(vec![
        dec!(4.0),
        dec!(-0.021),
        dec!(0),
        dec!(2.0),
        dec!(4.000),
    ]);
    assert_eq!(set.as_slice(), &[dec!(0), dec!(2.0), dec!(4.0)]);
}

#[test]
fn test_keyframe_lookups() {
    let set = keyframes();

    assert_eq!(set.first_at_or_after(dec!(1.0)), Some(dec!(2.0)));
    assert_eq!(set.first_at_or_after(dec!(2.0)), Some(dec!(2.0)));
    assert_eq!(set.first_at_or_after(dec!(6.5)), None);

    assert_eq!(set.last_at_or_before(dec!(5.0)), Some(dec!(4.0)));
    assert_eq!(set.last_at_or_before(dec!(4.0)), Some(dec!(4.0)));
    assert_eq!(set.last_at_or_before(dec!(-1)), None);

    assert!(set.contains(dec!(2.000)));
    assert!(!set.contains(dec!(2.5)));
}

#[test]
fn test_cut_request_validation() {
    let duration = dec!(6.0);

    let request = CutRequest::new(dec!(1.0), dec!(5.0), duration).unwrap();
    assert_eq!(request.duration(), dec!(4.0));

    assert_eq!(
        CutRequest::new(dec!(3), dec!(3), duration),
        Err(PlanError::EmptyRange { at: dec!(3) })
    );
    assert!(matches!(
        CutRequest::new(dec!(4), dec!(3), duration),
        Err(PlanError::InvertedRange { .. })
    ));
    assert!(matches!(
        CutRequest::new(dec!(5), dec!(6.5), duration),
        Err(PlanError::OutOfBounds { .. })
    ));
    assert!(matches!(
        CutRequest::new(dec!(-1), dec!(2), duration),
        Err(PlanError::OutOfBounds { .. })
    ));
}

#[test]
fn test_cut_request_accepts_full_duration() {
    assert!(CutRequest::new(dec!(0), dec!(6.0), dec!(6.0)).is_ok());
}

#[test]
fn test_sub_range_display() {
    let range = SubRange::reencode(dec!(1.0), dec!(2.0));
    assert_eq!(range.to_string(), "[1.0, 2.0) reencode");
    assert_eq!(range.duration(), dec!(1.0));
}
