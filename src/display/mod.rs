//! Display sinks
//!
//! The engine hands its framebuffer to a [`Display`] once per frame. Panels
//! are fed over SPI in chunks of a few rows at a time (one DMA transfer each),
//! with pixels serialized in the bus byte order at send time.

mod capture;
mod png;

pub use capture::FrameCapture;
pub use png::{save_png, PngSnapshot};

use crate::rasterizer::{ByteOrder, Framebuffer};

/// Rows per transfer when streaming a frame to a panel
pub const DEFAULT_CHUNK_LINES: usize = 20;

/// Receives each finished frame
pub trait Display {
    /// Push the frame out. Errors drop this frame only; the engine does not retry.
    fn present(&mut self, fb: &Framebuffer) -> Result<(), DisplayError>;
}

#[derive(Debug)]
pub enum DisplayError {
    /// Framebuffer dimensions differ from what the sink was set up for
    SizeMismatch { expected: (usize, usize), actual: (usize, usize) },
    /// Bus or device failure
    Transport(String),
    Io(std::io::Error),
    Image(image::ImageError),
}

impl std::fmt::Display for DisplayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DisplayError::SizeMismatch { expected, actual } => write!(
                f,
                "frame is {}x{}, display expects {}x{}",
                actual.0, actual.1, expected.0, expected.1
            ),
            DisplayError::Transport(msg) => write!(f, "transport error: {}", msg),
            DisplayError::Io(e) => write!(f, "IO error: {}", e),
            DisplayError::Image(e) => write!(f, "image error: {}", e),
        }
    }
}

impl std::error::Error for DisplayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DisplayError::Io(e) => Some(e),
            DisplayError::Image(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for DisplayError {
    fn from(e: std::io::Error) -> Self {
        DisplayError::Io(e)
    }
}

impl From<image::ImageError> for DisplayError {
    fn from(e: image::ImageError) -> Self {
        DisplayError::Image(e)
    }
}

/// Stream `fb` as `lines`-row chunks through `send`.
///
/// Each chunk is serialized into `staging` (grown as needed, then reused) in
/// `order` before being passed on. Returns the number of chunks sent. The
/// first failing chunk aborts the frame.
pub fn stream_chunks<F>(
    fb: &Framebuffer,
    order: ByteOrder,
    lines: usize,
    staging: &mut Vec<u8>,
    mut send: F,
) -> Result<usize, DisplayError>
where
    F: FnMut(usize, &[u8]) -> Result<(), DisplayError>,
{
    let rows_per_chunk = lines.max(1);
    let chunk_pixels = rows_per_chunk * fb.width;
    staging.resize(chunk_pixels * 2, 0);

    let mut sent = 0;
    for (n, pixels) in fb.pixels().chunks(chunk_pixels).enumerate() {
        let bytes = &mut staging[..pixels.len() * 2];
        for (dst, px) in bytes.chunks_exact_mut(2).zip(pixels) {
            dst.copy_from_slice(&order.encode(*px));
        }
        send(n * rows_per_chunk, bytes)?;
        sent += 1;
    }
    Ok(sent)
}
