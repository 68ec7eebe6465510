//! PNG export of presented frames

use std::path::{Path, PathBuf};

use super::{Display, DisplayError};
use crate::rasterizer::Framebuffer;

/// Write the framebuffer as an RGBA PNG
pub fn save_png(fb: &Framebuffer, path: &Path) -> Result<(), DisplayError> {
    let (width, height) = (fb.width as u32, fb.height as u32);
    let image = image::RgbaImage::from_raw(width, height, fb.to_rgba8()).ok_or_else(|| {
        DisplayError::Transport(format!("pixel data does not fill a {}x{} image", width, height))
    })?;
    image.save_with_format(path, image::ImageFormat::Png)?;
    Ok(())
}

/// Display that overwrites one PNG file with every presented frame
#[derive(Debug, Clone)]
pub struct PngSnapshot {
    path: PathBuf,
    frames_written: u64,
}

impl PngSnapshot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), frames_written: 0 }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }
}

impl Display for PngSnapshot {
    fn present(&mut self, fb: &Framebuffer) -> Result<(), DisplayError> {
        save_png(fb, &self.path)?;
        self.frames_written += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::Color565;

    #[test]
    fn test_png_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");

        let mut fb = Framebuffer::new(6, 4).unwrap();
        fb.draw_pixel(5, 3, Color565::WHITE);
        let mut snapshot = PngSnapshot::new(&path);
        snapshot.present(&fb).unwrap();
        assert_eq!(snapshot.frames_written(), 1);

        let decoded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (6, 4));
        assert_eq!(decoded.get_pixel(5, 3).0, [255, 255, 255, 255]);
        assert_eq!(decoded.get_pixel(0, 0).0, [0, 0, 0, 255]);
    }

    #[test]
    fn test_png_bad_path_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let fb = Framebuffer::new(2, 2).unwrap();
        let mut snapshot = PngSnapshot::new(dir.path().join("missing").join("frame.png"));
        assert!(snapshot.present(&fb).is_err());
    }
}
