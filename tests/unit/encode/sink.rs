use super::*;

fn cfg() -> SinkConfig {
    SinkConfig {
        width: 2,
        height: 1,
        fps: Fps::new(30, 1).unwrap(),
    }
}

fn frame(v: u8) -> FrameRGBA {
    FrameRGBA {
        width: 2,
        height: 1,
        data: vec![v; 8],
        premultiplied: true,
    }
}

#[test]
fn in_memory_sink_keeps_frames_in_order() {
    let mut s = InMemorySink::new();
    s.begin(cfg()).unwrap();
    s.push_frame(FrameIndex(0), &frame(1)).unwrap();
    s.push_frame(FrameIndex(3), &frame(2)).unwrap();
    s.end().unwrap();

    assert!(s.is_finished());
    assert_eq!(s.config(), Some(cfg()));
    let idx: Vec<u64> = s.frames().iter().map(|(i, _)| i.0).collect();
    assert_eq!(idx, vec![0, 3]);
    assert_eq!(s.frames()[1].1, frame(2));
}

#[test]
fn in_memory_sink_rejects_out_of_order_and_unstarted_pushes() {
    let mut s = InMemorySink::new();
    assert!(s.push_frame(FrameIndex(0), &frame(0)).is_err());
    s.begin(cfg()).unwrap();
    s.push_frame(FrameIndex(1), &frame(0)).unwrap();
    assert!(matches!(
        s.push_frame(FrameIndex(1), &frame(0)),
        Err(FxError::Encode(_))
    ));
}

#[test]
fn begin_resets_captured_frames() {
    let mut s = InMemorySink::new();
    s.begin(cfg()).unwrap();
    s.push_frame(FrameIndex(0), &frame(0)).unwrap();
    s.begin(cfg()).unwrap();
    assert!(s.frames().is_empty());
    assert!(!s.is_finished());
}
