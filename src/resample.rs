use rayon::prelude::*;

use crate::buffer::{to_channel, RasterBuffer, CHANNELS};
use crate::error::Result;
use crate::post_processor::sharpen;

/// Strength of the sharpen pass that follows every upscale.
pub const RESAMPLE_SHARPEN: f32 = 0.3;

/// Keys' cubic convolution kernel with `a = -0.5`.
#[inline(always)]
pub fn cubic_weight(t: f64) -> f64 {
    let t = t.abs();
    if t <= 1.0 {
        1.5 * t * t * t - 2.5 * t * t + 1.0
    } else if t < 2.0 {
        -0.5 * t * t * t + 2.5 * t * t - 4.0 * t + 2.0
    } else {
        0.0
    }
}

/// The 4x4 weight grid for a fractional source offset, indexed `[row][col]`
/// over the neighbourhood `yi-1..=yi+2` by `xi-1..=xi+2`.
pub fn bicubic_weights(xf: f64, yf: f64) -> [[f64; 4]; 4] {
    let wx: [f64; 4] = std::array::from_fn(|j| cubic_weight(j as f64 - 1.0 - xf));
    let wy: [f64; 4] = std::array::from_fn(|i| cubic_weight(i as f64 - 1.0 - yf));
    std::array::from_fn(|i| std::array::from_fn(|j| wx[j] * wy[i]))
}

/// Bicubic upscale to `target_width x target_height`, sampling the source at
/// `(x / scale, y / scale)` with edge clamping, then a light sharpen.
///
/// A `scale` of 1 or less returns the buffer untouched.
pub fn resample(
    buffer: RasterBuffer,
    target_width: usize,
    target_height: usize,
    scale: f64,
) -> Result<RasterBuffer> {
    if !(scale > 1.0) {
        return Ok(buffer);
    }

    let mut output = RasterBuffer::new(target_width, target_height)?;
    let source = &buffer;

    output.par_rows_mut().for_each(|(y, row)| {
        let sy = y as f64 / scale;
        let yi = sy.floor();
        let yf = sy - yi;
        let yi = yi as isize;

        for x in 0..target_width {
            let sx = x as f64 / scale;
            let xi = sx.floor();
            let xf = sx - xi;
            let xi = xi as isize;

            let weights = bicubic_weights(xf, yf);
            let mut acc = [0.0f64; 4];
            for (i, weight_row) in weights.iter().enumerate() {
                for (j, weight) in weight_row.iter().enumerate() {
                    let px = source.clamped_pixel(xi - 1 + j as isize, yi - 1 + i as isize);
                    for c in 0..CHANNELS {
                        acc[c] += px[c] as f64 * weight;
                    }
                }
            }

            for c in 0..CHANNELS {
                row[x * CHANNELS + c] = to_channel(acc[c] as f32);
            }
        }
    });

    sharpen(&mut output, RESAMPLE_SHARPEN);
    Ok(output)
}
