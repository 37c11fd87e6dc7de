use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::buffer::{to_channel, RasterBuffer, CHANNELS};

/// Kernel filters take a strength, tone curves an adjustment factor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrengthParams {
    pub strength: f32,
}

impl Default for StrengthParams {
    fn default() -> Self {
        Self { strength: 0.5 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdjustmentParams {
    pub adjustment: f32,
}

impl Default for AdjustmentParams {
    /// Identity for every tone filter except vibrance, where 1.0 is a
    /// moderate push.
    fn default() -> Self {
        Self { adjustment: 1.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Filter {
    Sharpen(StrengthParams),
    Denoise(StrengthParams),
    Contrast(AdjustmentParams),
    Saturation(AdjustmentParams),
    Brightness(AdjustmentParams),
    Gamma(AdjustmentParams),
    Vibrance(AdjustmentParams),
}

impl Filter {
    pub fn name(&self) -> &'static str {
        match self {
            Filter::Sharpen(_) => "sharpen",
            Filter::Denoise(_) => "denoise",
            Filter::Contrast(_) => "contrast",
            Filter::Saturation(_) => "saturation",
            Filter::Brightness(_) => "brightness",
            Filter::Gamma(_) => "gamma",
            Filter::Vibrance(_) => "vibrance",
        }
    }

    pub fn apply(&self, buffer: &mut RasterBuffer) {
        match *self {
            Filter::Sharpen(p) => sharpen(buffer, p.strength),
            Filter::Denoise(p) => denoise(buffer, p.strength),
            Filter::Contrast(p) => contrast(buffer, p.adjustment),
            Filter::Saturation(p) => saturation(buffer, p.adjustment),
            Filter::Brightness(p) => brightness(buffer, p.adjustment),
            Filter::Gamma(p) => gamma(buffer, p.adjustment),
            Filter::Vibrance(p) => vibrance(buffer, p.adjustment),
        }
    }
}

pub struct PostProcessor<'a> {
    filters: &'a [Filter],
}

impl<'a> PostProcessor<'a> {
    pub fn new(filters: &'a [Filter]) -> Self {
        Self { filters }
    }

    pub fn process(&self, buffer: &mut RasterBuffer) {
        for filter in self.filters {
            let now = std::time::Instant::now();
            filter.apply(buffer);
            debug!(filter = filter.name(), elapsed_ns = now.elapsed().as_nanos() as u64, "post filter");
        }
    }
}

/// 3x3 cross kernel: centre `1 + 4s`, orthogonal neighbours `-s`.
/// Only interior pixels change; alpha passes through.
pub fn sharpen(buffer: &mut RasterBuffer, strength: f32) {
    let (width, height) = (buffer.width(), buffer.height());
    if width < 3 || height < 3 {
        return;
    }
    let source = buffer.pixels().to_vec();
    let stride = buffer.stride();
    let centre = 1.0 + 4.0 * strength;

    buffer.par_rows_mut().for_each(|(y, row)| {
        if y == 0 || y == height - 1 {
            return;
        }
        for x in 1..width - 1 {
            let index = y * stride + x * CHANNELS;
            for c in 0..3 {
                let i = index + c;
                let neighbours = source[i - CHANNELS] as f32
                    + source[i + CHANNELS] as f32
                    + source[i - stride] as f32
                    + source[i + stride] as f32;
                let value = source[i] as f32 * centre - neighbours * strength;
                row[x * CHANNELS + c] = to_channel(value);
            }
        }
    });
}

/// Blends each interior pixel toward its 3x3 mean by `strength`.
pub fn denoise(buffer: &mut RasterBuffer, strength: f32) {
    let (width, height) = (buffer.width(), buffer.height());
    if width < 3 || height < 3 {
        return;
    }
    let source = buffer.pixels().to_vec();
    let stride = buffer.stride();

    buffer.par_rows_mut().for_each(|(y, row)| {
        if y == 0 || y == height - 1 {
            return;
        }
        for x in 1..width - 1 {
            for c in 0..3 {
                let mut sum = 0.0;
                for sy in y - 1..=y + 1 {
                    for sx in x - 1..=x + 1 {
                        sum += source[sy * stride + sx * CHANNELS + c] as f32;
                    }
                }
                let original = source[y * stride + x * CHANNELS + c] as f32;
                let average = sum / 9.0;
                row[x * CHANNELS + c] = to_channel(original * (1.0 - strength) + average * strength);
            }
        }
    });
}

#[inline(always)]
pub(crate) fn contrast_value(value: f32, adjustment: f32) -> f32 {
    ((value / 255.0 - 0.5) * adjustment + 0.5) * 255.0
}

/// Interpolates each channel away from (or toward) the pixel's luma.
#[inline(always)]
pub(crate) fn saturate_rgb(rgb: [f32; 3], adjustment: f32) -> [f32; 3] {
    let luma = 0.299 * rgb[0] + 0.587 * rgb[1] + 0.114 * rgb[2];
    rgb.map(|v| luma + (v - luma) * adjustment)
}

pub fn contrast(buffer: &mut RasterBuffer, adjustment: f32) {
    buffer.par_for_each_pixel(|_, _, px| {
        for c in 0..3 {
            px[c] = to_channel(contrast_value(px[c] as f32, adjustment));
        }
    });
}

pub fn saturation(buffer: &mut RasterBuffer, adjustment: f32) {
    buffer.par_for_each_pixel(|_, _, px| {
        let rgb = saturate_rgb([px[0] as f32, px[1] as f32, px[2] as f32], adjustment);
        for c in 0..3 {
            px[c] = to_channel(rgb[c]);
        }
    });
}

pub fn brightness(buffer: &mut RasterBuffer, adjustment: f32) {
    buffer.par_for_each_pixel(|_, _, px| {
        for c in 0..3 {
            px[c] = to_channel(px[c] as f32 * adjustment);
        }
    });
}

pub fn gamma(buffer: &mut RasterBuffer, adjustment: f32) {
    if !(adjustment > 0.0) {
        debug!(adjustment, "skipping gamma with non-positive adjustment");
        return;
    }
    let exponent = 1.0 / adjustment;
    buffer.par_for_each_pixel(|_, _, px| {
        for c in 0..3 {
            px[c] = to_channel((px[c] as f32 / 255.0).powf(exponent) * 255.0);
        }
    });
}

/// Pulls the weaker channels toward the strongest one, scaled by how far
/// the strongest sits above the mean.
pub fn vibrance(buffer: &mut RasterBuffer, adjustment: f32) {
    buffer.par_for_each_pixel(|_, _, px| {
        let (r, g, b) = (px[0] as f32, px[1] as f32, px[2] as f32);
        let max = r.max(g).max(b);
        let avg = (r + g + b) / 3.0;
        let amount = ((max - avg).abs() * 2.0 / 255.0) * adjustment;
        for c in 0..3 {
            let v = px[c] as f32;
            if v != max {
                px[c] = to_channel(v + (max - v) * amount);
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: usize, height: usize) -> RasterBuffer {
        let mut buffer = RasterBuffer::new(width, height).unwrap();
        for y in 0..height {
            for x in 0..width {
                let v = ((x * 37 + y * 91) % 256) as u8;
                buffer.set_pixel(x, y, [v, v.wrapping_mul(3), 255 - v, 200]);
            }
        }
        buffer
    }

    #[test]
    fn identity_adjustments_leave_buffer_untouched() {
        let original = gradient(16, 16);
        for filter in [
            Filter::Gamma(AdjustmentParams { adjustment: 1.0 }),
            Filter::Contrast(AdjustmentParams { adjustment: 1.0 }),
            Filter::Brightness(AdjustmentParams { adjustment: 1.0 }),
            Filter::Saturation(AdjustmentParams { adjustment: 1.0 }),
        ] {
            let mut buffer = original.clone();
            filter.apply(&mut buffer);
            assert_eq!(buffer, original, "{} should be an identity at 1.0", filter.name());
        }
    }

    #[test]
    fn brightness_clamps_black_and_white() {
        let mut buffer = RasterBuffer::filled(2, 2, [0, 200, 255, 255]).unwrap();
        brightness(&mut buffer, 2.0);
        assert_eq!(buffer.pixel(1, 1), [0, 255, 255, 255]);
    }

    #[test]
    fn sharpen_skips_border_and_alpha() {
        let mut buffer = RasterBuffer::filled(5, 5, [100, 100, 100, 77]).unwrap();
        buffer.set_pixel(2, 2, [200, 200, 200, 77]);
        sharpen(&mut buffer, 1.0);
        // centre: 200 * 5 - 4 * 100 = 600 -> 255
        assert_eq!(buffer.pixel(2, 2), [255, 255, 255, 77]);
        // neighbour: 100 * 5 - (200 + 300) = 0
        assert_eq!(buffer.pixel(2, 1), [0, 0, 0, 77]);
        assert_eq!(buffer.pixel(0, 0), [100, 100, 100, 77]);
    }

    #[test]
    fn sharpen_is_a_no_op_on_flat_fields() {
        let mut buffer = RasterBuffer::filled(8, 8, [128, 128, 128, 255]).unwrap();
        let before = buffer.clone();
        sharpen(&mut buffer, 0.3);
        assert_eq!(buffer, before);
    }

    #[test]
    fn denoise_full_strength_takes_the_mean() {
        let mut buffer = RasterBuffer::filled(3, 3, [0, 0, 0, 255]).unwrap();
        buffer.set_pixel(1, 1, [90, 90, 90, 255]);
        denoise(&mut buffer, 1.0);
        assert_eq!(buffer.pixel(1, 1), [10, 10, 10, 255]);
        assert_eq!(buffer.pixel(0, 1), [0, 0, 0, 255]);
    }

    #[test]
    fn gamma_brightens_midtones() {
        let mut buffer = RasterBuffer::filled(1, 1, [64, 128, 255, 255]).unwrap();
        gamma(&mut buffer, 2.2);
        let px = buffer.pixel(0, 0);
        assert!(px[0] > 64 && px[1] > 128);
        assert_eq!(px[2], 255);
    }

    #[test]
    fn gamma_ignores_non_positive_adjustment() {
        let mut buffer = gradient(4, 4);
        let before = buffer.clone();
        gamma(&mut buffer, 0.0);
        gamma(&mut buffer, -1.0);
        assert_eq!(buffer, before);
    }

    #[test]
    fn saturation_zero_is_greyscale() {
        let mut buffer = RasterBuffer::filled(1, 1, [200, 50, 10, 255]).unwrap();
        saturation(&mut buffer, 0.0);
        let px = buffer.pixel(0, 0);
        assert_eq!(px[0], px[1]);
        assert_eq!(px[1], px[2]);
    }

    #[test]
    fn vibrance_moves_weak_channels_toward_max() {
        let mut buffer = RasterBuffer::filled(1, 1, [200, 100, 50, 255]).unwrap();
        vibrance(&mut buffer, 1.0);
        let px = buffer.pixel(0, 0);
        assert_eq!(px[0], 200);
        assert!(px[1] > 100 && px[1] <= 200);
        assert!(px[2] > 50 && px[2] <= 200);
    }

    #[test]
    fn post_processor_runs_filters_in_order() {
        let filters = [
            Filter::Brightness(AdjustmentParams { adjustment: 2.0 }),
            Filter::Brightness(AdjustmentParams { adjustment: 0.5 }),
        ];
        let mut buffer = RasterBuffer::filled(2, 2, [200, 10, 0, 255]).unwrap();
        PostProcessor::new(&filters).process(&mut buffer);
        // 200 * 2 clamps to 255 before halving
        assert_eq!(buffer.pixel(0, 0), [128, 10, 0, 255]);
    }
}
