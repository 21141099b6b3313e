pub(crate) mod compositor;
pub(crate) mod cpu;
pub(crate) mod text;

/// Rendered card pixels before encoding.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    /// Row-major RGBA8.
    pub data: Vec<u8>,
    pub premultiplied: bool,
}
