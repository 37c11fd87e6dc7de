use rayon::prelude::*;

use crate::blur::box_blur;
use crate::buffer::{luminance, to_channel, RasterBuffer, CHANNELS};

use super::BloomParams;

/// Extracts pixels brighter than the threshold, box-blurs them and adds the
/// glow back onto the image.
pub fn bloom(buffer: &mut RasterBuffer, params: &BloomParams) {
    let threshold = params.threshold;
    if !(threshold < 1.0) {
        return;
    }
    let intensity = params.intensity;

    let mut glow = buffer.clone();
    glow.par_for_each_pixel(|_, _, px| {
        let luma = luminance(px);
        if luma > threshold {
            let weight = (luma - threshold) / (1.0 - threshold) * intensity;
            for c in 0..3 {
                px[c] = to_channel(px[c] as f32 * weight);
            }
        } else {
            px[..3].fill(0);
        }
    });
    box_blur(&mut glow, params.radius);

    let glow = glow.into_raw();
    buffer.par_rows_mut().for_each(|(y, row)| {
        let offset = y * row.len();
        for (x, px) in row.chunks_exact_mut(CHANNELS).enumerate() {
            let i = offset + x * CHANNELS;
            for c in 0..3 {
                px[c] = to_channel(px[c] as f32 + glow[i + c] as f32);
            }
        }
    });
}
