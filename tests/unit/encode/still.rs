use super::*;
use crate::encode::sink::InMemorySink;
use crate::foundation::error::StillclipError;

fn frame(width: u32, height: u32) -> FrameRGBA {
    FrameRGBA {
        width,
        height,
        data: vec![255; (width * height * 4) as usize],
        premultiplied: true,
    }
}

#[test]
fn pushes_enough_frames_to_cover_duration() {
    let mut sink = InMemorySink::new();
    let fps = Fps::new(30, 1).unwrap();
    let n = encode_still_clip(&mut sink, &frame(4, 2), fps, Duration::from_millis(2_500)).unwrap();
    assert_eq!(n, 75);
    assert_eq!(sink.frames().len(), 75);
    assert!(sink.is_finished());

    let cfg = sink.config().unwrap();
    assert_eq!((cfg.width, cfg.height), (4, 2));
    assert_eq!(
        cfg.presentation_time(FrameIndex(74)).unwrap(),
        Duration::new(74, 30).unwrap()
    );
    let idxs: Vec<u64> = sink.frames().iter().map(|(i, _)| i.0).collect();
    assert!(idxs.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn partial_frame_rounds_up() {
    let mut sink = InMemorySink::new();
    let fps = Fps::new(24, 1).unwrap();
    let n = encode_still_clip(&mut sink, &frame(2, 2), fps, Duration::new(1, 100).unwrap()).unwrap();
    assert_eq!(n, 1);
}

#[test]
fn zero_duration_still_writes_one_frame() {
    let mut sink = InMemorySink::new();
    let fps = Fps::new(30, 1).unwrap();
    let n = encode_still_clip(&mut sink, &frame(2, 2), fps, Duration::ZERO).unwrap();
    assert_eq!(n, 1);
}

#[test]
fn invalid_fps_is_rejected_before_begin() {
    let mut sink = InMemorySink::new();
    let err = encode_still_clip(
        &mut sink,
        &frame(2, 2),
        Fps { num: 0, den: 1 },
        Duration::from_secs(1),
    )
    .unwrap_err();
    assert!(matches!(err, StillclipError::InvalidInput(_)));
    assert!(sink.config().is_none());
}

#[test]
fn in_memory_sink_rejects_out_of_order_and_mismatched_frames() {
    let mut sink = InMemorySink::new();
    sink.begin(SinkConfig {
        width: 2,
        height: 2,
        fps: Fps::new(30, 1).unwrap(),
    })
    .unwrap();
    sink.push_frame(FrameIndex(3), &frame(2, 2)).unwrap();
    assert!(matches!(
        sink.push_frame(FrameIndex(3), &frame(2, 2)),
        Err(StillclipError::Encode(_))
    ));
    assert!(matches!(
        sink.push_frame(FrameIndex(4), &frame(4, 4)),
        Err(StillclipError::Encode(_))
    ));
}

#[test]
fn default_repeated_push_uses_consecutive_indices() {
    let mut sink = InMemorySink::new();
    sink.begin(SinkConfig {
        width: 2,
        height: 2,
        fps: Fps::new(30, 1).unwrap(),
    })
    .unwrap();
    sink.push_repeated(FrameIndex(5), 3, &frame(2, 2)).unwrap();
    let idxs: Vec<u64> = sink.frames().iter().map(|(i, _)| i.0).collect();
    assert_eq!(idxs, vec![5, 6, 7]);

    assert!(matches!(
        sink.push_repeated(FrameIndex(7), 2, &frame(2, 2)),
        Err(StillclipError::Encode(_))
    ));
    assert!(matches!(
        sink.push_repeated(FrameIndex(u64::MAX), 2, &frame(2, 2)),
        Err(StillclipError::Encode(_))
    ));
}
