//! Encoding sinks.
//!
//! Sinks consume rendered frames in timeline order and are used by `RenderSession::render_range`.

/// `ffmpeg`-based sink (MP4 output via system `ffmpeg`).
pub mod ffmpeg;
/// PNG sequence sink.
pub mod png;
/// Generic frame sink trait and the in-memory sink.
pub mod sink;

pub use ffmpeg::{FfmpegSink, FfmpegSinkOpts, ensure_parent_dir, is_ffmpeg_on_path};
pub use png::{PngSequenceSink, write_png};
pub use sink::{FrameSink, InMemorySink, SinkConfig};
