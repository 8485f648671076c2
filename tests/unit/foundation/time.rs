use super::*;
use std::collections::hash_map::DefaultHasher;

fn d(value: i64, timescale: u64) -> Duration {
    Duration::new(value, timescale).unwrap()
}

fn hash_of(v: Duration) -> u64 {
    let mut h = DefaultHasher::new();
    v.hash(&mut h);
    h.finish()
}

#[test]
fn negative_and_unscaled_durations_are_rejected() {
    assert!(matches!(
        Duration::new(-1, 600),
        Err(StillclipError::InvalidInput(_))
    ));
    assert!(matches!(
        Duration::new(10, 0),
        Err(StillclipError::InvalidInput(_))
    ));
}

#[test]
fn invalid_is_distinct_from_zero() {
    assert!(!Duration::INVALID.is_valid());
    assert!(!Duration::INVALID.is_zero());
    assert!(Duration::ZERO.is_zero());
    assert_ne!(Duration::INVALID, Duration::ZERO);
    assert!(Duration::INVALID < Duration::ZERO);
    assert!(Duration::INVALID.as_secs_f64().is_nan());
}

#[test]
fn equality_compares_represented_time() {
    assert_eq!(d(10, 1), d(20, 2));
    assert_eq!(d(1, 3), d(200, 600));
    assert_eq!(hash_of(d(10, 1)), hash_of(d(20, 2)));
    assert!(d(1, 3) < d(1, 2));
    assert!(d(3, 2) > Duration::from_secs(1));
}

#[test]
fn arithmetic_is_exact_across_timescales() {
    let third = d(1, 3);
    let sum = third.checked_add(third).unwrap().checked_add(third).unwrap();
    assert_eq!(sum, Duration::from_secs(1));
    assert_eq!(sum.value(), 1);
    assert_eq!(sum.timescale(), 1);

    let diff = Duration::from_secs(1).checked_sub(d(1, 4)).unwrap();
    assert_eq!(diff, d(3, 4));

    let mixed = d(1, 30).checked_add(d(1, 48_000)).unwrap();
    assert_eq!(mixed, d(1601, 48_000));
}

#[test]
fn subtraction_below_zero_fails() {
    let err = d(1, 2).checked_sub(Duration::from_secs(1)).unwrap_err();
    assert!(matches!(err, StillclipError::InvalidInput(_)));
}

#[test]
fn arithmetic_on_invalid_fails() {
    assert!(Duration::INVALID.checked_add(Duration::ZERO).is_err());
    assert!(Duration::ZERO.checked_sub(Duration::INVALID).is_err());
}

#[test]
fn min_keeps_the_smaller_side() {
    assert_eq!(d(10, 1).min(d(5, 1)), d(5, 1));
    assert_eq!(d(5, 1).min(d(10, 1)), d(5, 1));
}

#[test]
fn sample_conversion_rounds_to_nearest() {
    assert_eq!(Duration::from_secs(1).to_samples(48_000).unwrap(), 48_000);
    assert_eq!(d(1, 30).to_samples(48_000).unwrap(), 1600);
    assert_eq!(d(1001, 30_000).to_samples(48_000).unwrap(), 1602);
    assert_eq!(Duration::INVALID.to_samples(48_000).unwrap(), 0);
}

#[test]
fn sample_count_past_u64_is_an_error() {
    let huge = Duration::from_secs(u64::MAX);
    assert!(matches!(
        huge.to_samples(48_000),
        Err(StillclipError::InvalidInput(_))
    ));
}

#[test]
fn coprime_timescales_past_u32_add_exactly() {
    let sum = d(1, 65_539).checked_add(d(2, 65_537)).unwrap();
    assert_eq!(sum.timescale(), 65_539 * 65_537);
    assert_eq!(sum.value(), 65_537 + 2 * 65_539);

    let diff = d(2, 65_537).checked_sub(d(1, 65_539)).unwrap();
    assert_eq!(diff, d(2 * 65_539 - 65_537, 65_539 * 65_537));
}

#[test]
fn timescale_too_large_after_reduction_is_rejected() {
    let a = Duration::from_ticks(1, u64::MAX).unwrap();
    let b = Duration::from_ticks(1, u64::MAX - 1).unwrap();
    assert!(matches!(
        a.checked_add(b),
        Err(StillclipError::InvalidInput(_))
    ));
}

#[test]
fn parses_rational_and_decimal_forms() {
    assert_eq!("10".parse::<Duration>().unwrap(), Duration::from_secs(10));
    assert_eq!("2.5".parse::<Duration>().unwrap(), d(5, 2));
    assert_eq!("1001/30000".parse::<Duration>().unwrap(), d(1001, 30_000));
    assert_eq!(".25".parse::<Duration>().unwrap(), d(1, 4));
    assert!("-1".parse::<Duration>().is_err());
    assert!("-1/2".parse::<Duration>().is_err());
    assert!("abc".parse::<Duration>().is_err());
    assert!("".parse::<Duration>().is_err());
    assert!("1/0".parse::<Duration>().is_err());
}

#[test]
fn bare_dot_and_plus_sign_do_not_parse() {
    assert!(".".parse::<Duration>().is_err());
    assert!("+5".parse::<Duration>().is_err());
    assert!("+1/2".parse::<Duration>().is_err());
    assert!("1/+2".parse::<Duration>().is_err());
    assert_eq!("5.".parse::<Duration>().unwrap(), Duration::from_secs(5));
}

#[test]
fn display_shows_rational_or_invalid() {
    assert_eq!(d(5, 2).to_string(), "5/2");
    assert_eq!(Duration::INVALID.to_string(), "invalid");
}

#[test]
fn time_range_end_and_emptiness() {
    let r = TimeRange::new(Duration::from_secs(10), d(5, 1)).unwrap();
    assert_eq!(r.end().unwrap(), Duration::from_secs(15));
    assert!(!r.is_empty());
    assert!(TimeRange::new(Duration::ZERO, Duration::ZERO).unwrap().is_empty());
    assert!(TimeRange::new(Duration::INVALID, Duration::ZERO).is_err());
}
