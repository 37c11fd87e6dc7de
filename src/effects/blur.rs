use rayon::prelude::*;

use crate::blur::neighbourhood_mean;
use crate::buffer::{RasterBuffer, CHANNELS};

use super::{DepthOfFieldParams, MotionBlurParams};

/// Blurs rows in proportion to their distance from the focal row.
pub fn depth_of_field(buffer: &mut RasterBuffer, params: &DepthOfFieldParams) {
    let source = buffer.clone();
    let focal_row = source.height() as f32 * params.focal_distance;

    buffer.par_rows_mut().for_each(|(y, row)| {
        let distance = (y as f32 - focal_row).abs();
        let blur = params.blur_strength.min(distance * params.aperture);
        if !(blur > 0.0) {
            return;
        }
        let radius = blur.floor() as usize;
        for (x, px) in row.chunks_exact_mut(CHANNELS).enumerate() {
            px.copy_from_slice(&neighbourhood_mean(&source, x, y, radius));
        }
    });
}

/// Averages five taps stepped along `direction * strength`.
pub fn motion_blur(buffer: &mut RasterBuffer, params: &MotionBlurParams) {
    const TAPS: usize = 5;
    let source = buffer.clone();
    let step = params.direction.map(|d| d * params.strength);

    buffer.par_rows_mut().for_each(|(y, row)| {
        for (x, px) in row.chunks_exact_mut(CHANNELS).enumerate() {
            let mut sum = [0u32; 4];
            for i in 0..TAPS {
                let sx = (x as f32 + i as f32 * step[0]).round() as isize;
                let sy = (y as f32 + i as f32 * step[1]).round() as isize;
                let sample = source.clamped_pixel(sx, sy);
                for c in 0..CHANNELS {
                    sum[c] += sample[c] as u32;
                }
            }
            for c in 0..CHANNELS {
                px[c] = ((sum[c] + TAPS as u32 / 2) / TAPS as u32) as u8;
            }
        }
    });
}
