use image::{Rgba, RgbaImage};
use rayon::prelude::*;

use crate::error::{EnhanceError, Result};

pub const CHANNELS: usize = 4;

/// Row-major RGBA8 pixel grid that every pipeline stage reads and writes.
///
/// The byte length is fixed at construction to `width * height * 4`; no
/// method can change it afterwards, so stages can index without bounds
/// bookkeeping of their own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterBuffer {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl RasterBuffer {
    /// Transparent black buffer.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        Self::filled(width, height, [0, 0, 0, 0])
    }

    pub fn filled(width: usize, height: usize, rgba: [u8; 4]) -> Result<Self> {
        let len = Self::byte_len(width, height)?;
        let pixels = rgba.iter().copied().cycle().take(len).collect();
        Ok(Self { width, height, pixels })
    }

    /// Wraps bytes produced by a sprite generator, failing fast when the
    /// length does not describe a `width x height` RGBA grid.
    pub fn from_raw(width: usize, height: usize, pixels: Vec<u8>) -> Result<Self> {
        let expected = Self::byte_len(width, height)?;
        if pixels.len() != expected {
            return Err(EnhanceError::DimensionMismatch {
                width,
                height,
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self { width, height, pixels })
    }

    /// `width * height * 4`, rejecting empty and overflowing sizes.
    fn byte_len(width: usize, height: usize) -> Result<usize> {
        if width == 0 || height == 0 {
            return Err(EnhanceError::EmptyBuffer { width, height });
        }
        width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(CHANNELS))
            .ok_or(EnhanceError::TooLarge { width, height })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn stride(&self) -> usize {
        self.width * CHANNELS
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.pixels
    }

    #[inline(always)]
    pub fn index(&self, x: usize, y: usize) -> usize {
        (y * self.width + x) * CHANNELS
    }

    #[inline(always)]
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        let i = self.index(x, y);
        [self.pixels[i], self.pixels[i + 1], self.pixels[i + 2], self.pixels[i + 3]]
    }

    #[inline(always)]
    pub fn set_pixel(&mut self, x: usize, y: usize, rgba: [u8; 4]) {
        let i = self.index(x, y);
        self.pixels[i..i + CHANNELS].copy_from_slice(&rgba);
    }

    /// Samples with edge clamping, so any signed coordinate is valid.
    #[inline(always)]
    pub fn clamped_pixel(&self, x: isize, y: isize) -> [u8; 4] {
        let x = x.clamp(0, self.width as isize - 1) as usize;
        let y = y.clamp(0, self.height as isize - 1) as usize;
        self.pixel(x, y)
    }

    /// Image centre and the centre-to-corner distance, the frame used by
    /// every radial falloff.
    pub fn radial_frame(&self) -> (f32, f32, f32) {
        let cx = self.width as f32 / 2.0;
        let cy = self.height as f32 / 2.0;
        (cx, cy, (cx * cx + cy * cy).sqrt())
    }

    /// Parallel iterator over `(y, row_bytes)`.
    pub fn par_rows_mut(&mut self) -> impl IndexedParallelIterator<Item = (usize, &mut [u8])> + '_ {
        let stride = self.stride();
        self.pixels.par_chunks_mut(stride).enumerate()
    }

    /// Runs `f(x, y, rgba)` on every pixel in place, rows in parallel.
    pub fn par_for_each_pixel<F>(&mut self, f: F)
    where
        F: Fn(usize, usize, &mut [u8]) + Sync + Send,
    {
        self.par_rows_mut().for_each(|(y, row)| {
            for (x, px) in row.chunks_exact_mut(CHANNELS).enumerate() {
                f(x, y, px);
            }
        });
    }

    /// Packs into `0RGB` words for a window framebuffer, compositing alpha
    /// over black.
    pub fn to_u32_buffer(&self) -> Vec<u32> {
        self.pixels
            .chunks_exact(CHANNELS)
            .map(|p| {
                let a = p[3] as u32;
                let r = p[0] as u32 * a / 255;
                let g = p[1] as u32 * a / 255;
                let b = p[2] as u32 * a / 255;
                (r << 16) | (g << 8) | b
            })
            .collect()
    }

    pub fn to_rgba_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width as u32, self.height as u32, |x, y| {
            Rgba(self.pixel(x as usize, y as usize))
        })
    }
}

impl TryFrom<RgbaImage> for RasterBuffer {
    type Error = EnhanceError;

    fn try_from(value: RgbaImage) -> Result<Self> {
        let width = value.width() as usize;
        let height = value.height() as usize;
        Self::from_raw(width, height, value.into_raw())
    }
}

/// Rec. 601 luma on a `0..=1` scale.
#[inline(always)]
pub fn luminance(px: &[u8]) -> f32 {
    (0.299 * px[0] as f32 + 0.587 * px[1] as f32 + 0.114 * px[2] as f32) / 255.0
}

/// Splits a `0xRRGGBB` colour into float channels.
#[inline(always)]
pub fn unpack_rgb(colour: u32) -> [f32; 3] {
    [
        ((colour >> 16) & 0xff) as f32,
        ((colour >> 8) & 0xff) as f32,
        (colour & 0xff) as f32,
    ]
}

/// Rounds to the nearest integer and clamps into a channel byte.
#[inline(always)]
pub fn to_channel(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_raw_rejects_wrong_length() {
        let err = RasterBuffer::from_raw(4, 4, vec![0; 63]).unwrap_err();
        match err {
            EnhanceError::DimensionMismatch { expected, actual, .. } => {
                assert_eq!(expected, 64);
                assert_eq!(actual, 63);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn overflowing_sizes_are_rejected() {
        assert!(matches!(
            RasterBuffer::from_raw(1usize << 62, 1, Vec::new()),
            Err(EnhanceError::TooLarge { height: 1, .. })
        ));
        assert!(matches!(
            RasterBuffer::filled(usize::MAX, 2, [0; 4]),
            Err(EnhanceError::TooLarge { width: usize::MAX, height: 2 })
        ));
    }

    #[test]
    fn zero_sized_buffers_are_rejected() {
        assert!(matches!(
            RasterBuffer::new(0, 3),
            Err(EnhanceError::EmptyBuffer { width: 0, height: 3 })
        ));
    }

    #[test]
    fn filled_sets_every_pixel() {
        let buffer = RasterBuffer::filled(3, 2, [1, 2, 3, 4]).unwrap();
        assert_eq!(buffer.pixels().len(), 24);
        for y in 0..2 {
            for x in 0..3 {
                assert_eq!(buffer.pixel(x, y), [1, 2, 3, 4]);
            }
        }
    }

    #[test]
    fn clamped_pixel_uses_nearest_edge() {
        let mut buffer = RasterBuffer::new(2, 2).unwrap();
        buffer.set_pixel(0, 0, [10, 0, 0, 255]);
        buffer.set_pixel(1, 1, [20, 0, 0, 255]);
        assert_eq!(buffer.clamped_pixel(-5, -5)[0], 10);
        assert_eq!(buffer.clamped_pixel(9, 9)[0], 20);
    }

    #[test]
    fn image_conversion_keeps_bytes() {
        let mut buffer = RasterBuffer::new(3, 2).unwrap();
        buffer.set_pixel(2, 1, [9, 8, 7, 6]);
        let image = buffer.to_rgba_image();
        assert_eq!(image.get_pixel(2, 1).0, [9, 8, 7, 6]);
        let back = RasterBuffer::try_from(image).unwrap();
        assert_eq!(back, buffer);
    }

    #[test]
    fn u32_packing_composites_alpha() {
        let buffer = RasterBuffer::filled(1, 1, [255, 128, 0, 255]).unwrap();
        assert_eq!(buffer.to_u32_buffer(), vec![0x00ff8000]);
        let clear = RasterBuffer::filled(1, 1, [255, 255, 255, 0]).unwrap();
        assert_eq!(clear.to_u32_buffer(), vec![0]);
    }

    #[test]
    fn unpack_rgb_splits_channels() {
        assert_eq!(unpack_rgb(0x8a2be2), [138.0, 43.0, 226.0]);
    }

    #[test]
    fn to_channel_rounds_and_clamps() {
        assert_eq!(to_channel(127.6), 128);
        assert_eq!(to_channel(-3.0), 0);
        assert_eq!(to_channel(300.0), 255);
    }
}
