//! In-memory display
//!
//! Keeps the bus payload of the last presented frame. Used by tests and the
//! headless tooling, and a stand-in for the SPI panel on the host.

use super::{stream_chunks, Display, DisplayError, DEFAULT_CHUNK_LINES};
use crate::rasterizer::{ByteOrder, Framebuffer};

/// Captures each presented frame as serialized RGB565 bytes
#[derive(Debug)]
pub struct FrameCapture {
    width: usize,
    height: usize,
    pub order: ByteOrder,
    pub chunk_lines: usize,
    staging: Vec<u8>,
    last_frame: Vec<u8>,
    frames_presented: u64,
    chunks_sent: u64,
}

impl FrameCapture {
    pub fn new(width: usize, height: usize, order: ByteOrder) -> Self {
        Self {
            width,
            height,
            order,
            chunk_lines: DEFAULT_CHUNK_LINES,
            staging: Vec::new(),
            last_frame: Vec::with_capacity(width * height * 2),
            frames_presented: 0,
            chunks_sent: 0,
        }
    }

    /// Bus payload of the most recent frame (empty before the first present)
    pub fn last_frame(&self) -> &[u8] {
        &self.last_frame
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    /// Transfers issued across all frames
    pub fn chunks_sent(&self) -> u64 {
        self.chunks_sent
    }
}

impl Display for FrameCapture {
    fn present(&mut self, fb: &Framebuffer) -> Result<(), DisplayError> {
        if (fb.width, fb.height) != (self.width, self.height) {
            return Err(DisplayError::SizeMismatch {
                expected: (self.width, self.height),
                actual: (fb.width, fb.height),
            });
        }

        self.last_frame.clear();
        let last_frame = &mut self.last_frame;
        let chunks = stream_chunks(fb, self.order, self.chunk_lines, &mut self.staging, |_, bytes| {
            last_frame.extend_from_slice(bytes);
            Ok(())
        })?;

        self.chunks_sent += chunks as u64;
        self.frames_presented += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::{Color565, BUFFER_SIZE, HEIGHT, WIDTH};

    #[test]
    fn test_capture_full_panel() {
        let mut fb = Framebuffer::new(WIDTH, HEIGHT).unwrap();
        fb.clear(Color565::RED);
        let mut capture = FrameCapture::new(WIDTH, HEIGHT, ByteOrder::BigEndian);
        capture.present(&fb).unwrap();

        assert_eq!(BUFFER_SIZE, WIDTH * HEIGHT);
        assert_eq!(capture.last_frame().len(), BUFFER_SIZE * 2);
        assert_eq!(&capture.last_frame()[..2], &[0xF8, 0x00]);
        // 160 rows in 20-row transfers
        assert_eq!(capture.chunks_sent(), 8);
        assert_eq!(capture.frames_presented(), 1);
    }

    #[test]
    fn test_capture_rejects_wrong_size() {
        let fb = Framebuffer::new(8, 8).unwrap();
        let mut capture = FrameCapture::new(16, 8, ByteOrder::BigEndian);
        assert!(matches!(capture.present(&fb), Err(DisplayError::SizeMismatch { .. })));
        assert_eq!(capture.frames_presented(), 0);
    }
}
