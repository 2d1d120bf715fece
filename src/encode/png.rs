use std::path::{Path, PathBuf};

use crate::encode::ffmpeg::ensure_parent_dir;
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{FrameIndex, Rgb8};
use crate::foundation::error::{FxError, FxResult};
use crate::render::FrameRGBA;
use crate::render::composite::flatten_over_opaque;

/// Write one frame as an opaque PNG, flattening alpha over `background`.
pub fn write_png(path: &Path, frame: &FrameRGBA, background: Rgb8) -> FxResult<()> {
    let expected = (frame.width as usize) * (frame.height as usize) * 4;
    if frame.data.len() != expected {
        return Err(FxError::validation(
            "frame.data size mismatch with width*height*4",
        ));
    }
    ensure_parent_dir(path)?;
    let opaque = if frame.premultiplied {
        flatten_over_opaque(&frame.data, [background.r, background.g, background.b])
    } else {
        frame.data.clone()
    };
    image::save_buffer_with_format(
        path,
        &opaque,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .map_err(|e| FxError::encode(format!("write png '{}': {e}", path.display())))
}

/// Sink writing `frame_00000.png`, `frame_00001.png`, ... into a directory.
#[derive(Clone, Debug)]
pub struct PngSequenceSink {
    dir: PathBuf,
    background: Rgb8,
    written: Vec<PathBuf>,
    started: bool,
}

impl PngSequenceSink {
    /// Create a sink writing into `dir` (created on `begin`).
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            background: Rgb8::new(0, 0, 0),
            written: Vec::new(),
            started: false,
        }
    }

    /// Flatten alpha over `background` instead of black.
    pub fn with_background(mut self, background: Rgb8) -> Self {
        self.background = background;
        self
    }

    /// File name used for frame `idx`.
    pub fn file_name(idx: FrameIndex) -> String {
        format!("frame_{:05}.png", idx.0)
    }

    /// Paths written so far, in order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl FrameSink for PngSequenceSink {
    fn begin(&mut self, _cfg: SinkConfig) -> FxResult<()> {
        use anyhow::Context as _;
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create output directory '{}'", self.dir.display()))?;
        self.written.clear();
        self.started = true;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> FxResult<()> {
        if !self.started {
            return Err(FxError::encode("png sink not started"));
        }
        let path = self.dir.join(Self::file_name(idx));
        write_png(&path, frame, self.background)?;
        self.written.push(path);
        Ok(())
    }

    fn end(&mut self) -> FxResult<()> {
        self.started = false;
        tracing::debug!(
            dir = %self.dir.display(),
            frames = self.written.len(),
            "png sequence written"
        );
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/png.rs"]
mod tests;
