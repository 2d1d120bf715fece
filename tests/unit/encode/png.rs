use super::*;
use crate::foundation::core::Fps;

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "circuitwave_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

fn frame(px: [u8; 4]) -> FrameRGBA {
    FrameRGBA {
        width: 3,
        height: 2,
        data: px.repeat(6),
        premultiplied: true,
    }
}

#[test]
fn sequence_sink_writes_numbered_files() {
    let dir = temp_dir("png_seq");
    let mut sink = PngSequenceSink::new(&dir);
    sink.begin(SinkConfig {
        width: 3,
        height: 2,
        fps: Fps::new(30, 1).unwrap(),
    })
    .unwrap();
    sink.push_frame(FrameIndex(0), &frame([10, 20, 30, 255])).unwrap();
    sink.push_frame(FrameIndex(1), &frame([0, 0, 0, 0])).unwrap();
    sink.end().unwrap();

    assert_eq!(sink.written().len(), 2);
    assert!(dir.join("frame_00000.png").is_file());
    assert!(dir.join("frame_00001.png").is_file());

    let img = image::open(dir.join("frame_00000.png")).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (3, 2));
    assert_eq!(img.get_pixel(2, 1).0, [10, 20, 30, 255]);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn transparent_pixels_flatten_over_the_background() {
    let dir = temp_dir("png_bg");
    let path = dir.join("bg.png");
    write_png(&path, &frame([0, 0, 0, 0]), Rgb8::new(8, 12, 10)).unwrap();
    let img = image::open(&path).unwrap().to_rgba8();
    assert_eq!(img.get_pixel(0, 0).0, [8, 12, 10, 255]);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn mismatched_buffers_are_rejected() {
    let mut f = frame([1, 2, 3, 255]);
    f.data.pop();
    let path = temp_dir("png_bad").join("bad.png");
    assert!(matches!(
        write_png(&path, &f, Rgb8::new(0, 0, 0)),
        Err(FxError::Validation(_))
    ));
}

#[test]
fn pushing_before_begin_fails() {
    let mut sink = PngSequenceSink::new(temp_dir("png_unstarted"));
    assert!(sink.push_frame(FrameIndex(0), &frame([0; 4])).is_err());
    assert_eq!(PngSequenceSink::file_name(FrameIndex(42)), "frame_00042.png");
}
