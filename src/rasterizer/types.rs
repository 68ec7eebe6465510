//! Core types for the rasterizer

use serde::{Deserialize, Serialize};
use super::fixed::Fix16;

// =============================================================================
// RGB565 Color Type
// =============================================================================

/// Packed 16-bit panel color
///
/// Format: `RRRRRGGG GGGBBBBB`
/// - Bits 15-11: Red (0-31)
/// - Bits 10-5: Green (0-63)
/// - Bits 4-0: Blue (0-31)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color565(pub u16);

impl Color565 {
    pub const BLACK: Color565 = Color565(0x0000);
    pub const BLUE: Color565 = Color565(0x001F);
    pub const RED: Color565 = Color565(0xF800);
    pub const GREEN: Color565 = Color565(0x07E0);
    pub const CYAN: Color565 = Color565(0x07FF);
    pub const MAGENTA: Color565 = Color565(0xF81F);
    pub const YELLOW: Color565 = Color565(0xFFE0);
    pub const WHITE: Color565 = Color565(0xFFFF);

    /// Pack raw channels (r: 0-31, g: 0-63, b: 0-31), clamping out-of-range values
    #[inline]
    pub fn from_channels(r: u8, g: u8, b: u8) -> Self {
        let r = (r.min(31) as u16) << 11;
        let g = (g.min(63) as u16) << 5;
        let b = b.min(31) as u16;
        Color565(r | g | b)
    }

    /// Quantize 8-bit RGB
    #[inline]
    pub fn from_rgb888(r: u8, g: u8, b: u8) -> Self {
        Self::from_channels(r >> 3, g >> 2, b >> 3)
    }

    #[inline]
    pub fn r5(self) -> u8 {
        ((self.0 >> 11) & 0x1F) as u8
    }

    #[inline]
    pub fn g6(self) -> u8 {
        ((self.0 >> 5) & 0x3F) as u8
    }

    #[inline]
    pub fn b5(self) -> u8 {
        (self.0 & 0x1F) as u8
    }

    /// Expand to 8-bit RGB (bit replication so full scale maps to 255)
    pub fn to_rgb888(self) -> [u8; 3] {
        let (r, g, b) = (self.r5(), self.g6(), self.b5());
        [(r << 3) | (r >> 2), (g << 2) | (g >> 4), (b << 3) | (b >> 2)]
    }

    /// Scale each channel by `intensity` (0.0 to 1.0 in 16.16), per channel width
    pub fn scaled(self, intensity: Fix16) -> Self {
        let i = intensity.clamp(Fix16::ZERO, Fix16::ONE).0;
        let r = (self.r5() as i32 * i) >> 16;
        let g = (self.g6() as i32 * i) >> 16;
        let b = (self.b5() as i32 * i) >> 16;
        Color565::from_channels(r as u8, g as u8, b as u8)
    }
}

/// Bus byte order of serialized pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ByteOrder {
    /// High byte first (what ST77xx panels expect over SPI)
    #[default]
    BigEndian,
    LittleEndian,
}

impl ByteOrder {
    #[inline]
    pub fn encode(self, color: Color565) -> [u8; 2] {
        match self {
            ByteOrder::BigEndian => color.0.to_be_bytes(),
            ByteOrder::LittleEndian => color.0.to_le_bytes(),
        }
    }
}

// =============================================================================
// Render Mode
// =============================================================================

/// What the pipeline draws for each entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RenderMode {
    /// Mesh edges only, in the wire color
    #[default]
    Wire,
    /// Backface-culled, flat-shaded triangles
    Solid,
    /// Solid triangles with edges overlaid in the overlay color
    Both,
}

impl RenderMode {
    pub const ALL: [RenderMode; 3] = [RenderMode::Wire, RenderMode::Solid, RenderMode::Both];

    /// Cycle Wire -> Solid -> Both -> Wire
    pub fn next(self) -> Self {
        match self {
            RenderMode::Wire => RenderMode::Solid,
            RenderMode::Solid => RenderMode::Both,
            RenderMode::Both => RenderMode::Wire,
        }
    }

    pub fn draws_faces(self) -> bool {
        matches!(self, RenderMode::Solid | RenderMode::Both)
    }

    pub fn draws_edges(self) -> bool {
        matches!(self, RenderMode::Wire | RenderMode::Both)
    }

    pub fn label(self) -> &'static str {
        match self {
            RenderMode::Wire => "wire",
            RenderMode::Solid => "solid",
            RenderMode::Both => "both",
        }
    }
}

impl std::str::FromStr for RenderMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RenderMode::ALL
            .into_iter()
            .find(|m| m.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown render mode '{}' (expected wire, solid or both)", s))
    }
}
