use super::*;

fn secs(s: u64) -> Duration {
    Duration::from_secs(s)
}

fn lengths(plan: &CompositionPlan) -> Vec<Duration> {
    plan.segments().iter().map(|s| s.source_length).collect()
}

fn starts(plan: &CompositionPlan) -> Vec<Duration> {
    plan.segments().iter().map(|s| s.destination_start).collect()
}

#[test]
fn loops_and_truncates_the_last_repetition() {
    let plan = compute_audio_loop_plan(secs(10), secs(25)).unwrap();
    assert_eq!(lengths(&plan), vec![secs(10), secs(10), secs(5)]);
    assert_eq!(starts(&plan), vec![secs(0), secs(10), secs(20)]);
    assert!(plan.segments().iter().all(|s| s.source_offset.is_zero()));
    assert_eq!(plan.loop_count(), 2);
    assert!(plan.is_truncated());
}

#[test]
fn exact_fit_is_a_single_segment() {
    let plan = compute_audio_loop_plan(secs(10), secs(10)).unwrap();
    assert_eq!(lengths(&plan), vec![secs(10)]);
    assert_eq!(starts(&plan), vec![secs(0)]);
    assert!(!plan.is_truncated());
}

#[test]
fn shorter_target_truncates_the_only_segment() {
    let plan = compute_audio_loop_plan(secs(10), secs(4)).unwrap();
    assert_eq!(lengths(&plan), vec![secs(4)]);
    assert_eq!(plan.loop_count(), 0);
}

#[test]
fn zero_target_is_empty() {
    let plan = compute_audio_loop_plan(secs(10), Duration::ZERO).unwrap();
    assert!(plan.is_empty());
    assert_eq!(plan.len(), 0);
    assert_eq!(plan.total_length().unwrap(), Duration::ZERO);
}

#[test]
fn zero_or_unset_source_is_invalid_input() {
    let err = compute_audio_loop_plan(Duration::ZERO, secs(10)).unwrap_err();
    assert!(matches!(err, StillclipError::InvalidInput(_)));
    let err = compute_audio_loop_plan(Duration::INVALID, secs(10)).unwrap_err();
    assert!(matches!(err, StillclipError::InvalidInput(_)));
}

#[test]
fn unset_target_is_invalid_input() {
    let err = compute_audio_loop_plan(secs(10), Duration::INVALID).unwrap_err();
    assert!(matches!(err, StillclipError::InvalidInput(_)));
}

#[test]
fn mixed_timescales_cover_the_target_exactly() {
    let third = Duration::new(1, 3).unwrap();
    let plan = compute_audio_loop_plan(third, secs(1)).unwrap();
    assert_eq!(plan.len(), 3);
    assert_eq!(plan.total_length().unwrap(), secs(1));
    assert_eq!(plan.segments()[2].destination_start, Duration::new(2, 3).unwrap());
}

#[test]
fn coprime_timescales_above_u16_plan_exactly() {
    let a = Duration::new(1, 65_539).unwrap();
    let t = Duration::new(2, 65_537).unwrap();
    let plan = compute_audio_loop_plan(a, t).unwrap();

    // 2/65537 is just over 2/65539, so two full loops and a sliver.
    assert_eq!(plan.len(), 3);
    assert_eq!(plan.total_length().unwrap(), t);
    assert_eq!(plan.segments()[0].source_length, a);
    assert_eq!(plan.segments()[1].source_length, a);
    assert!(plan.segments()[2].source_length < a);
    assert!(plan.segments()[2].source_length.timescale() > u64::from(u32::MAX));
}

#[test]
fn covers_arbitrary_pairs_without_gaps_or_overshoot() {
    let sources = [
        Duration::new(1, 1).unwrap(),
        Duration::new(7, 3).unwrap(),
        Duration::new(48_000, 44_100).unwrap(),
        Duration::new(1001, 30_000).unwrap(),
    ];
    let targets = [
        Duration::ZERO,
        Duration::new(1, 30).unwrap(),
        Duration::from_millis(5_000),
        Duration::new(151, 30).unwrap(),
        Duration::from_secs(60),
    ];

    for &a in &sources {
        for &t in &targets {
            let plan = compute_audio_loop_plan(a, t).unwrap();
            assert_eq!(plan.total_length().unwrap(), t, "A={a} T={t}");

            let mut cursor = Duration::ZERO;
            let n = plan.len();
            for (i, seg) in plan.segments().iter().enumerate() {
                assert_eq!(seg.destination_start, cursor);
                assert!(seg.source_length <= a);
                assert!(!seg.source_length.is_zero());
                if i + 1 < n {
                    assert_eq!(seg.source_length, a);
                }
                cursor = cursor.checked_add(seg.source_length).unwrap();
            }
        }
    }
}

#[test]
fn identical_inputs_give_bit_identical_plans() {
    let a = Duration::new(7, 3).unwrap();
    let t = Duration::from_millis(12_345);
    let p1 = compute_audio_loop_plan(a, t).unwrap();
    let p2 = compute_audio_loop_plan(a, t).unwrap();

    let raw = |p: &CompositionPlan| -> Vec<(u64, u64, u64, u64, u64, u64)> {
        p.segments()
            .iter()
            .map(|s| {
                (
                    s.source_offset.value(),
                    s.source_offset.timescale(),
                    s.source_length.value(),
                    s.source_length.timescale(),
                    s.destination_start.value(),
                    s.destination_start.timescale(),
                )
            })
            .collect()
    };
    assert_eq!(raw(&p1), raw(&p2));
    assert_eq!(p1, p2);
}

#[test]
fn plan_serializes_to_json() {
    let plan = compute_audio_loop_plan(secs(2), secs(3)).unwrap();
    let v = serde_json::to_value(&plan).unwrap();
    assert_eq!(v["segments"].as_array().unwrap().len(), 2);
    assert_eq!(v["segments"][1]["destination_start"]["value"], 2);
}
