//! CPU rasterization on top of `vello_cpu`.
//!
//! Engines draw into a [`Surface`] in CSS pixels; compositing and blurs operate on the
//! premultiplied RGBA8 buffer it owns.

pub(crate) mod blur;
/// Premultiplied RGBA8 compositing.
pub mod composite;
/// Drawing surfaces and the vector painter.
pub mod surface;

pub use surface::{ColorStop, Painter, Surface};

/// A rendered frame in RGBA8 format.
///
/// Frames are premultiplied alpha unless stated otherwise.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}
