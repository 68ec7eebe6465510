//! Framebuffer and 2D rasterization
//! Integer-only line and triangle drawing into an RGB565 buffer

use super::fixed::Fix16;
use super::types::{ByteOrder, Color565};

/// How far outside the buffer a line endpoint may sit before the line is
/// clipped geometrically instead of walked pixel by pixel
const LINE_GUARD: i64 = 1 << 14;

/// Error type for framebuffer allocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FramebufferError {
    /// Width or height is zero
    ZeroSize { width: usize, height: usize },
    /// The pixel store could not be reserved
    Allocation { pixels: usize },
}

impl std::fmt::Display for FramebufferError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FramebufferError::ZeroSize { width, height } => {
                write!(f, "framebuffer size {}x{} has no pixels", width, height)
            }
            FramebufferError::Allocation { pixels } => {
                write!(f, "failed to allocate framebuffer of {} pixels", pixels)
            }
        }
    }
}

impl std::error::Error for FramebufferError {}

/// Framebuffer for software rendering
///
/// Pixels are stored as logical RGB565 values; bus byte order is applied
/// only when the buffer is serialized for presentation.
pub struct Framebuffer {
    pixels: Vec<Color565>,
    pub width: usize,
    pub height: usize,
}

impl Framebuffer {
    /// Allocate a cleared (black) framebuffer
    pub fn new(width: usize, height: usize) -> Result<Self, FramebufferError> {
        if width == 0 || height == 0 {
            return Err(FramebufferError::ZeroSize { width, height });
        }
        let count = width
            .checked_mul(height)
            .ok_or(FramebufferError::Allocation { pixels: usize::MAX })?;

        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(count)
            .map_err(|_| FramebufferError::Allocation { pixels: count })?;
        pixels.resize(count, Color565::BLACK);

        Ok(Self { pixels, width, height })
    }

    pub fn pixels(&self) -> &[Color565] {
        &self.pixels
    }

    pub fn clear(&mut self, color: Color565) {
        self.pixels.fill(color);
    }

    #[inline]
    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Read a pixel; `None` outside the buffer
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<Color565> {
        if !self.in_bounds(x, y) {
            return None;
        }
        Some(self.pixels[y as usize * self.width + x as usize])
    }

    /// Write a pixel. Out-of-bounds coordinates are silently dropped.
    #[inline]
    pub fn draw_pixel(&mut self, x: i32, y: i32, color: Color565) {
        if self.in_bounds(x, y) {
            self.pixels[y as usize * self.width + x as usize] = color;
        }
    }

    /// Write a horizontal run [x0, x1] on row y, clipped to the buffer
    fn draw_span(&mut self, y: i64, x0: i64, x1: i64, color: Color565) {
        if y < 0 || y >= self.height as i64 {
            return;
        }
        let left = x0.max(0);
        let right = x1.min(self.width as i64 - 1);
        if left > right {
            return;
        }
        let row = y as usize * self.width;
        self.pixels[row + left as usize..=row + right as usize].fill(color);
    }

    /// Draw a line from (x0, y0) to (x1, y1) using Bresenham's algorithm.
    /// Both endpoints are included and the result is 8-connected.
    ///
    /// Endpoints further than `LINE_GUARD` pixels outside the buffer are
    /// first clipped to the guard box, so the walk stays bounded for any input.
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color565) {
        let p0 = (x0 as i64, y0 as i64);
        let p1 = (x1 as i64, y1 as i64);
        if self.in_guard(p0) && self.in_guard(p1) {
            self.bresenham(p0, p1, color);
        } else if let Some((a, b)) = self.clip_to_guard(p0, p1) {
            self.bresenham(a, b, color);
        }
    }

    fn in_guard(&self, (x, y): (i64, i64)) -> bool {
        x >= -LINE_GUARD
            && y >= -LINE_GUARD
            && x < self.width as i64 + LINE_GUARD
            && y < self.height as i64 + LINE_GUARD
    }

    /// Liang-Barsky clip of a segment to the guard box, endpoints rounded
    fn clip_to_guard(&self, p0: (i64, i64), p1: (i64, i64)) -> Option<((i64, i64), (i64, i64))> {
        let min = -LINE_GUARD as f64;
        let max_x = (self.width as i64 + LINE_GUARD - 1) as f64;
        let max_y = (self.height as i64 + LINE_GUARD - 1) as f64;
        let (x0, y0) = (p0.0 as f64, p0.1 as f64);
        let (dx, dy) = (p1.0 as f64 - x0, p1.1 as f64 - y0);

        let mut t0 = 0.0f64;
        let mut t1 = 1.0f64;
        for (p, q) in [(-dx, x0 - min), (dx, max_x - x0), (-dy, y0 - min), (dy, max_y - y0)] {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let t = q / p;
            if p < 0.0 {
                t0 = t0.max(t);
            } else {
                t1 = t1.min(t);
            }
            if t0 > t1 {
                return None;
            }
        }

        let at = |t: f64| ((x0 + t * dx).round() as i64, (y0 + t * dy).round() as i64);
        Some((at(t0), at(t1)))
    }

    /// Integer Bresenham walk; both endpoints must lie inside the guard box
    fn bresenham(&mut self, (x0, y0): (i64, i64), (x1, y1): (i64, i64), color: Color565) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let mut x = x0;
        let mut y = y0;

        loop {
            self.draw_pixel(x as i32, y as i32, color);

            if x == x1 && y == y1 {
                break;
            }

            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Outline of a w x h rectangle with its top-left corner at (x, y)
    pub fn draw_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color565) {
        if w <= 0 || h <= 0 {
            return;
        }
        let right = x.saturating_add(w - 1);
        let bottom = y.saturating_add(h - 1);
        self.draw_line(x, y, right, y, color);
        self.draw_line(x, bottom, right, bottom, color);
        self.draw_line(x, y, x, bottom, color);
        self.draw_line(right, y, right, bottom, color);
    }

    /// Filled w x h rectangle, clipped to the buffer
    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color565) {
        if w <= 0 || h <= 0 {
            return;
        }
        let (x, y) = (x as i64, y as i64);
        for row in y.max(0)..(y + h as i64).min(self.height as i64) {
            self.draw_span(row, x, x + w as i64 - 1, color);
        }
    }

    /// Scanline triangle fill.
    ///
    /// Vertices are sorted by y and the triangle is split at the middle
    /// vertex into an upper and lower segment. Rows in [y1, y3) are filled
    /// between the long edge and the active short edge. Zero height or
    /// colinear vertices draw nothing. Rows are clipped vertically before the
    /// loop and each span horizontally, so off-screen vertices are safe.
    /// Edge math runs in i64 (i128 for the area), so any i32 input is valid.
    pub fn fill_triangle(
        &mut self,
        x1: i32, y1: i32,
        x2: i32, y2: i32,
        x3: i32, y3: i32,
        color: Color565,
    ) {
        let mut v = [(x1 as i64, y1 as i64), (x2 as i64, y2 as i64), (x3 as i64, y3 as i64)];
        v.sort_by_key(|p| p.1);
        let [(x1, y1), (x2, y2), (x3, y3)] = v;

        let total_height = y3 - y1;
        if total_height == 0 {
            return;
        }

        // Signed area; zero means the three points are colinear
        let area = (x2 - x1) as i128 * (y3 - y1) as i128 - (x3 - x1) as i128 * (y2 - y1) as i128;
        if area == 0 {
            return;
        }

        let i_start = (-y1).max(0);
        let i_end = total_height.min(self.height as i64 - y1);

        for i in i_start..i_end {
            let second_half = i > y2 - y1 || y2 == y1;
            let segment_height = if second_half { y3 - y2 } else { y2 - y1 };
            if segment_height == 0 {
                continue;
            }
            let j = if second_half { i - (y2 - y1) } else { i };

            let mut a = x1 + lerp_step(x3 - x1, i, total_height);
            let mut b = if second_half {
                x2 + lerp_step(x3 - x2, j, segment_height)
            } else {
                x1 + lerp_step(x2 - x1, j, segment_height)
            };

            if a > b {
                std::mem::swap(&mut a, &mut b);
            }
            self.draw_span(y1 + i, a, b, color);
        }
    }

    /// Serialize pixels into `out` using the given bus byte order.
    /// `out` must hold at least `2 * width * height` bytes; extra bytes are untouched.
    pub fn write_bytes(&self, order: ByteOrder, out: &mut [u8]) -> usize {
        let mut written = 0;
        for (dst, px) in out.chunks_exact_mut(2).zip(&self.pixels) {
            dst.copy_from_slice(&order.encode(*px));
            written += 2;
        }
        written
    }

    /// Serialize to a fresh byte vector
    pub fn to_bytes(&self, order: ByteOrder) -> Vec<u8> {
        let mut out = vec![0u8; self.pixels.len() * 2];
        self.write_bytes(order, &mut out);
        out
    }

    /// Expand to RGBA8 for host-side viewers and image export
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixels.len() * 4);
        for px in &self.pixels {
            let [r, g, b] = px.to_rgb888();
            out.extend_from_slice(&[r, g, b, 255]);
        }
        out
    }
}

/// `delta * step / span`, rounded toward negative infinity
#[inline]
fn lerp_step(delta: i64, step: i64, span: i64) -> i64 {
    (delta as i128 * step as i128).div_euclid(span as i128) as i64
}

// =============================================================================
// Shading
// =============================================================================

/// Flat shade a base color from the camera-space face normal's z component.
///
/// Intensity is `|normal_z| + ambient`, clamped to 1.0, applied to each
/// channel at its own bit width.
pub fn apply_lighting(base: Color565, normal_z: Fix16, ambient: Fix16) -> Color565 {
    let intensity = (normal_z.abs() + ambient).min(Fix16::ONE);
    base.scaled(intensity)
}

#[cfg(test)]
mod tests {
    use super::*;

    const W: usize = 32;
    const H: usize = 24;

    fn fb() -> Framebuffer {
        Framebuffer::new(W, H).unwrap()
    }

    fn lit(fb: &Framebuffer) -> Vec<(i32, i32)> {
        let mut out = Vec::new();
        for y in 0..fb.height as i32 {
            for x in 0..fb.width as i32 {
                if fb.get_pixel(x, y) != Some(Color565::BLACK) {
                    out.push((x, y));
                }
            }
        }
        out
    }

    #[test]
    fn test_new_rejects_zero_size() {
        assert_eq!(
            Framebuffer::new(0, 10).err(),
            Some(FramebufferError::ZeroSize { width: 0, height: 10 })
        );
        assert!(Framebuffer::new(usize::MAX, 2).is_err());
    }

    #[test]
    fn test_draw_pixel_out_of_bounds_is_noop() {
        let mut fb = fb();
        fb.draw_pixel(-1, 0, Color565::WHITE);
        fb.draw_pixel(0, -1, Color565::WHITE);
        fb.draw_pixel(W as i32, 0, Color565::WHITE);
        fb.draw_pixel(0, H as i32, Color565::WHITE);
        fb.draw_pixel(i32::MIN, i32::MAX, Color565::WHITE);
        assert!(lit(&fb).is_empty());
        fb.draw_pixel(3, 4, Color565::RED);
        assert_eq!(fb.get_pixel(3, 4), Some(Color565::RED));
    }

    #[test]
    fn test_horizontal_line_touches_exact_pixels() {
        let mut fb = fb();
        fb.draw_line(0, 0, 4, 0, Color565::WHITE);
        assert_eq!(lit(&fb), vec![(0, 0), (1, 0), (2, 0), (3, 0), (4, 0)]);
    }

    #[test]
    fn test_steep_line_is_8_connected() {
        let mut fb = fb();
        fb.draw_line(0, 0, 3, 4, Color565::WHITE);
        let mut px = lit(&fb);
        assert!(px.contains(&(0, 0)) && px.contains(&(3, 4)));
        // One pixel per row for a y-major line, each step moves at most one column
        px.sort_by_key(|p| p.1);
        assert_eq!(px.len(), 5);
        for w in px.windows(2) {
            assert_eq!(w[1].1 - w[0].1, 1);
            assert!((w[1].0 - w[0].0).abs() <= 1);
        }
    }

    #[test]
    fn test_line_any_slope_has_no_gaps() {
        let ends = [(10, 10), (-5, 3), (31, 0), (20, 23), (0, 23), (15, -8)];
        for &(x1, y1) in &ends {
            let mut fb = Framebuffer::new(64, 64).unwrap();
            // Offset so the start point is always on screen
            fb.draw_line(16, 16, x1 + 16, y1 + 16, Color565::WHITE);
            let px = lit(&fb);
            let steps = (x1.abs().max(y1.abs()) + 1) as usize;
            assert_eq!(px.len(), steps);
            for &(x, y) in &px {
                let neighbours = px
                    .iter()
                    .filter(|&&(ox, oy)| (ox, oy) != (x, y) && (ox - x).abs() <= 1 && (oy - y).abs() <= 1)
                    .count();
                assert!(neighbours >= 1, "isolated pixel at ({}, {})", x, y);
            }
        }
    }

    #[test]
    fn test_line_reverse_direction_matches_endpoints() {
        let mut fb = fb();
        fb.draw_line(7, 9, 2, 1, Color565::WHITE);
        assert_eq!(fb.get_pixel(7, 9), Some(Color565::WHITE));
        assert_eq!(fb.get_pixel(2, 1), Some(Color565::WHITE));
    }

    #[test]
    fn test_fill_triangle_basic_coverage() {
        let mut fb = fb();
        fb.fill_triangle(2, 2, 12, 2, 2, 12, Color565::GREEN);
        let px = lit(&fb);
        assert!(!px.is_empty());
        // Rows [2, 12): last row excluded
        assert!(px.iter().all(|&(_, y)| (2..12).contains(&y)));
        assert!(px.contains(&(2, 2)) && px.contains(&(3, 3)));
        assert!(!px.contains(&(12, 11)));
    }

    #[test]
    fn test_fill_triangle_vertex_order_irrelevant() {
        let mut a = fb();
        let mut b = fb();
        a.fill_triangle(5, 1, 20, 10, 1, 18, Color565::WHITE);
        b.fill_triangle(1, 18, 5, 1, 20, 10, Color565::WHITE);
        assert_eq!(lit(&a), lit(&b));
    }

    #[test]
    fn test_fill_triangle_zero_height_is_noop() {
        let mut fb = fb();
        fb.fill_triangle(0, 5, 10, 5, 20, 5, Color565::WHITE);
        assert!(lit(&fb).is_empty());
    }

    #[test]
    fn test_fill_triangle_colinear_is_noop() {
        let mut fb = fb();
        fb.fill_triangle(0, 0, 4, 4, 8, 8, Color565::WHITE);
        fb.fill_triangle(3, 0, 3, 7, 3, 12, Color565::WHITE);
        assert!(lit(&fb).is_empty());
    }

    #[test]
    fn test_fill_triangle_clips_to_bounds() {
        let mut fb = fb();
        fb.fill_triangle(-40, -30, 70, 5, 10, 90, Color565::WHITE);
        let px = lit(&fb);
        assert!(!px.is_empty());
        assert!(px.iter().all(|&(x, y)| x >= 0 && y >= 0 && x < W as i32 && y < H as i32));
    }

    #[test]
    fn test_fill_triangle_fully_offscreen() {
        let mut fb = fb();
        fb.fill_triangle(-50, -50, -10, -40, -30, -5, Color565::WHITE);
        fb.fill_triangle(100, 100, 140, 120, 110, 160, Color565::WHITE);
        assert!(lit(&fb).is_empty());
    }

    #[test]
    fn test_fill_rect_and_draw_rect() {
        let mut fb = fb();
        fb.fill_rect(-2, -2, 4, 4, Color565::WHITE);
        assert_eq!(lit(&fb).len(), 4);
        fb.clear(Color565::BLACK);
        fb.draw_rect(1, 1, 3, 3, Color565::WHITE);
        assert_eq!(lit(&fb).len(), 8);
        assert_eq!(fb.get_pixel(2, 2), Some(Color565::BLACK));
    }

    #[test]
    fn test_fill_triangle_extreme_coordinates() {
        let mut fb = fb();
        // Colinear across the whole i32 range: nothing to draw, no overflow
        fb.fill_triangle(i32::MIN, i32::MIN, 5, 5, i32::MAX, i32::MAX, Color565::WHITE);
        assert!(lit(&fb).is_empty());

        // A huge triangle that contains the whole buffer fills every pixel
        fb.fill_triangle(i32::MIN, i32::MIN, i32::MAX, 0, i32::MIN, i32::MAX, Color565::WHITE);
        assert_eq!(lit(&fb).len(), W * H);
    }

    #[test]
    fn test_line_extreme_coordinates() {
        let mut fb = fb();
        fb.draw_line(i32::MIN, 0, i32::MAX, 0, Color565::WHITE);
        let row: Vec<_> = (0..W as i32).map(|x| (x, 0)).collect();
        assert_eq!(lit(&fb), row);

        fb.clear(Color565::BLACK);
        fb.draw_line(i32::MIN, i32::MIN, i32::MAX, i32::MAX, Color565::WHITE);
        let diagonal: Vec<_> = (0..H as i32).map(|i| (i, i)).collect();
        assert_eq!(lit(&fb), diagonal);

        // Entirely outside the guard box, and just outside the buffer
        fb.clear(Color565::BLACK);
        fb.draw_line(i32::MIN, i32::MIN, i32::MIN, i32::MAX, Color565::WHITE);
        fb.draw_line(i32::MIN, -5, i32::MAX, -5, Color565::WHITE);
        assert!(lit(&fb).is_empty());
    }

    #[test]
    fn test_rects_extreme_coordinates() {
        let mut fb = fb();
        fb.fill_rect(i32::MIN, i32::MIN, i32::MAX, i32::MAX, Color565::WHITE);
        assert!(lit(&fb).is_empty());
        fb.fill_rect(-10, -10, i32::MAX, i32::MAX, Color565::WHITE);
        assert_eq!(lit(&fb).len(), W * H);

        fb.clear(Color565::BLACK);
        fb.draw_rect(i32::MAX - 1, 0, i32::MAX, 5, Color565::WHITE);
        assert!(lit(&fb).is_empty());
        // Top row and left column; the far edges are off screen
        fb.draw_rect(0, 0, i32::MAX, i32::MAX, Color565::WHITE);
        assert_eq!(lit(&fb).len(), W + H - 1);
    }

    #[test]
    fn test_clear_and_serialize() {
        let mut fb = Framebuffer::new(2, 1).unwrap();
        fb.clear(Color565(0x1234));
        assert_eq!(fb.to_bytes(ByteOrder::BigEndian), vec![0x12, 0x34, 0x12, 0x34]);
        assert_eq!(fb.to_bytes(ByteOrder::LittleEndian), vec![0x34, 0x12, 0x34, 0x12]);
        assert_eq!(fb.to_rgba8().len(), 8);
    }

    #[test]
    fn test_apply_lighting() {
        // Face-on: full intensity
        assert_eq!(apply_lighting(Color565::WHITE, -Fix16::ONE, Fix16::QUARTER), Color565::WHITE);
        // Grazing: ambient only
        let dim = apply_lighting(Color565::WHITE, Fix16::ZERO, Fix16::QUARTER);
        assert_eq!((dim.r5(), dim.g6(), dim.b5()), (7, 15, 7));
        // Sign of the normal does not matter
        assert_eq!(
            apply_lighting(Color565::RED, Fix16::HALF, Fix16::QUARTER),
            apply_lighting(Color565::RED, -Fix16::HALF, Fix16::QUARTER)
        );
    }
}
