use crate::foundation::error::{FrameError, FrameResult};
use crate::foundation::math::mul_div255;

/// Position of a frame in its extracted sequence (the `NNN` in `NNN.png`).
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Straight-alpha RGBA8 frame, tightly packed, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterImage {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// `width * height * 4` bytes.
    pub data: Vec<u8>,
}

impl RasterImage {
    /// Wrap an existing RGBA8 buffer, checking its length against the dimensions.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> FrameResult<Self> {
        let expected = buffer_len(width, height, 4)?;
        if data.len() != expected {
            return Err(FrameError::geometry(format!(
                "rgba buffer has {} bytes, expected {expected} for {width}x{height}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// A frame where every pixel is `rgba`.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> FrameResult<Self> {
        let len = buffer_len(width, height, 4)?;
        let mut data = Vec::with_capacity(len);
        for _ in 0..len / 4 {
            data.extend_from_slice(&rgba);
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn from_rgba_image(img: image::RgbaImage) -> FrameResult<Self> {
        let (width, height) = img.dimensions();
        Self::new(width, height, img.into_raw())
    }

    pub fn into_rgba_image(self) -> FrameResult<image::RgbaImage> {
        let (w, h) = (self.width, self.height);
        image::RgbaImage::from_raw(w, h, self.data).ok_or_else(|| {
            FrameError::geometry(format!("rgba buffer does not fit {w}x{h} (bug)"))
        })
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        [
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ]
    }

    /// Replace the alpha channel entirely with `mask`.
    pub fn put_alpha(&mut self, mask: &AlphaMask) -> FrameResult<()> {
        mask.ensure_matches(self.width, self.height)?;
        for (px, &a) in self.data.chunks_exact_mut(4).zip(mask.data.iter()) {
            px[3] = a;
        }
        Ok(())
    }

    /// Copy of the alpha channel as a mask.
    pub fn alpha(&self) -> AlphaMask {
        AlphaMask {
            width: self.width,
            height: self.height,
            data: self.data.chunks_exact(4).map(|px| px[3]).collect(),
        }
    }
}

/// Single-channel 8-bit opacity contribution, 0 = transparent, 255 = opaque.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AlphaMask {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl AlphaMask {
    pub fn filled(width: u32, height: u32, value: u8) -> FrameResult<Self> {
        let len = buffer_len(width, height, 1)?;
        Ok(Self {
            width,
            height,
            data: vec![value; len],
        })
    }

    /// Mask that keeps every pixel.
    pub fn opaque(width: u32, height: u32) -> FrameResult<Self> {
        Self::filled(width, height, 255)
    }

    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> FrameResult<Self> {
        let expected = buffer_len(width, height, 1)?;
        if data.len() != expected {
            return Err(FrameError::geometry(format!(
                "mask buffer has {} bytes, expected {expected} for {width}x{height}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn get(&self, x: u32, y: u32) -> u8 {
        self.data[y as usize * self.width as usize + x as usize]
    }

    pub fn is_uniform(&self, value: u8) -> bool {
        self.data.iter().all(|&v| v == value)
    }

    pub fn ensure_matches(&self, width: u32, height: u32) -> FrameResult<()> {
        if self.width != width || self.height != height {
            return Err(FrameError::MaskDimensionMismatch {
                mask_w: self.width,
                mask_h: self.height,
                frame_w: width,
                frame_h: height,
            });
        }
        Ok(())
    }

    /// Pointwise product, each side read as a [0,1] factor.
    pub fn multiply_in_place(&mut self, other: &AlphaMask) -> FrameResult<()> {
        other.ensure_matches(self.width, self.height)?;
        for (d, &s) in self.data.iter_mut().zip(other.data.iter()) {
            *d = mul_div255(*d, s);
        }
        Ok(())
    }
}

/// Opaque RGB colour, serialized as `#RRGGBB`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const BLACK: Self = Self { r: 0, g: 0, b: 0 };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` (the leading `#` is optional).
    pub fn parse_hex(s: &str) -> FrameResult<Self> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(FrameError::validation(format!(
                "colour '{s}' must have the form #RRGGBB"
            )));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|e| FrameError::validation(format!("colour '{s}': {e}")))
        };
        Ok(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }

    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    pub fn with_alpha(self, a: u8) -> [u8; 4] {
        [self.r, self.g, self.b, a]
    }
}

impl TryFrom<String> for Rgb8 {
    type Error = FrameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse_hex(&value)
    }
}

impl From<Rgb8> for String {
    fn from(value: Rgb8) -> Self {
        value.to_hex()
    }
}

fn buffer_len(width: u32, height: u32, channels: usize) -> FrameResult<usize> {
    if width == 0 || height == 0 {
        return Err(FrameError::geometry(format!(
            "image dimensions must be > 0, got {width}x{height}"
        )));
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(channels))
        .ok_or_else(|| FrameError::geometry("image buffer size overflow"))
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
