use rayon::prelude::*;

use crate::buffer::{to_channel, RasterBuffer, CHANNELS};

use super::{ChromaticAberrationParams, VignetteParams};

/// Splits red and blue apart along `direction`, more strongly toward the
/// edges. Green and alpha stay where they are.
pub fn chromatic_aberration(buffer: &mut RasterBuffer, params: &ChromaticAberrationParams) {
    let source = buffer.clone();
    let (cx, cy, max_dist) = source.radial_frame();
    let [dx, dy] = params.direction;

    buffer.par_rows_mut().for_each(|(y, row)| {
        for (x, px) in row.chunks_exact_mut(CHANNELS).enumerate() {
            let (fx, fy) = (x as f32, y as f32);
            let dist = ((fx - cx).powi(2) + (fy - cy).powi(2)).sqrt();
            let aberration = dist / max_dist * params.strength;
            let (ox, oy) = (dx * aberration * 5.0, dy * aberration * 5.0);

            let red = source.clamped_pixel((fx + ox).round() as isize, (fy + oy).round() as isize);
            let blue = source.clamped_pixel((fx - ox).round() as isize, (fy - oy).round() as isize);
            px[0] = red[0];
            px[2] = blue[2];
        }
    });
}

/// Attenuation at normalised distance `ratio` from the centre.
pub fn vignette_factor(ratio: f32, radius: f32, intensity: f32) -> f32 {
    if ratio <= 0.0 {
        return 1.0;
    }
    (1.0 - ratio.powf(radius) * intensity).max(0.3)
}

pub fn vignette(buffer: &mut RasterBuffer, params: &VignetteParams) {
    let (cx, cy, max_dist) = buffer.radial_frame();
    buffer.par_for_each_pixel(|x, y, px| {
        let dist = ((x as f32 - cx).powi(2) + (y as f32 - cy).powi(2)).sqrt();
        let factor = vignette_factor(dist / max_dist, params.radius, params.intensity);
        for c in 0..3 {
            px[c] = to_channel(px[c] as f32 * factor);
        }
    });
}
