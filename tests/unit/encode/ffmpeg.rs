use super::*;

fn cfg(width: u32, height: u32) -> SinkConfig {
    SinkConfig {
        width,
        height,
        fps: Fps { num: 30, den: 1 },
    }
}

#[test]
fn odd_or_empty_sizes_are_rejected_before_spawning() {
    let out = std::env::temp_dir().join("circuitwave_ffmpeg_reject.mp4");
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(&out));
    assert!(matches!(sink.begin(cfg(3, 2)), Err(FxError::Validation(_))));
    assert!(matches!(sink.begin(cfg(0, 2)), Err(FxError::Validation(_))));
    assert!(matches!(
        sink.begin(SinkConfig {
            fps: Fps { num: 0, den: 1 },
            ..cfg(2, 2)
        }),
        Err(FxError::Validation(_))
    ));
}

#[test]
fn pushing_before_begin_fails() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new("unused.mp4"));
    let frame = FrameRGBA {
        width: 2,
        height: 2,
        data: vec![0; 16],
        premultiplied: true,
    };
    assert!(sink.push_frame(FrameIndex(0), &frame).is_err());
    assert!(sink.end().is_err());
}

#[test]
fn refuses_to_overwrite_when_disabled() {
    let dir = std::env::temp_dir().join(format!("circuitwave_ffmpeg_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let out = dir.join("exists.mp4");
    std::fs::write(&out, b"x").unwrap();

    let mut opts = FfmpegSinkOpts::new(&out);
    opts.overwrite = false;
    let mut sink = FfmpegSink::new(opts);
    assert!(matches!(sink.begin(cfg(2, 2)), Err(FxError::Validation(_))));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn ensure_parent_dir_creates_missing_directories() {
    let root = std::env::temp_dir().join(format!("circuitwave_parent_{}", std::process::id()));
    let path = root.join("a").join("b").join("out.mp4");
    ensure_parent_dir(&path).unwrap();
    assert!(root.join("a").join("b").is_dir());
    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn encodes_a_short_clip_when_ffmpeg_is_available() {
    if !is_ffmpeg_on_path() {
        return;
    }
    let dir = std::env::temp_dir().join(format!("circuitwave_mp4_{}", std::process::id()));
    let out = dir.join("clip.mp4");
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(&out));
    sink.begin(cfg(16, 16)).unwrap();
    for i in 0..3u8 {
        let frame = FrameRGBA {
            width: 16,
            height: 16,
            data: [i * 40, 10, 10, 255].repeat(256),
            premultiplied: true,
        };
        sink.push_frame(FrameIndex(u64::from(i)), &frame).unwrap();
    }
    sink.end().unwrap();
    assert!(std::fs::metadata(&out).unwrap().len() > 0);
    let _ = std::fs::remove_dir_all(&dir);
}
