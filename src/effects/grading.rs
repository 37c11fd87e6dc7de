use rand::Rng;

use crate::buffer::{to_channel, RasterBuffer};
use crate::post_processor::{contrast_value, saturate_rgb};

use super::{ColorGradingParams, FilmGrainParams};

/// Random luminance grain, modulated by a sinusoidal size pattern.
/// Draws one sample per pixel in row-major order.
pub fn film_grain<R: Rng>(buffer: &mut RasterBuffer, params: &FilmGrainParams, rng: &mut R) {
    let (width, height) = (buffer.width(), buffer.height());
    for y in 0..height {
        for x in 0..width {
            let grain = (rng.random::<f32>() - 0.5) * 2.0 * params.intensity;
            let size_mod = (x as f32 * 0.1).sin() * (y as f32 * 0.1).cos() * params.size;
            let delta = grain * (1.0 + size_mod) * 50.0;

            let i = buffer.index(x, y);
            let px = &mut buffer.pixels_mut()[i..i + 3];
            for v in px.iter_mut() {
                *v = to_channel(*v as f32 + delta);
            }
        }
    }
}

/// Contrast, then saturation, then brightness, then temperature, clamping
/// after each step.
pub fn color_grading(buffer: &mut RasterBuffer, params: &ColorGradingParams) {
    let params = *params;
    buffer.par_for_each_pixel(|_, _, px| {
        let clamp = |v: f32| v.clamp(0.0, 255.0);
        let rgb = [px[0] as f32, px[1] as f32, px[2] as f32];
        let rgb = rgb.map(|v| clamp(contrast_value(v, params.contrast)));
        let rgb = saturate_rgb(rgb, params.saturation).map(clamp);
        let mut rgb = rgb.map(|v| clamp(v * params.brightness));
        if params.temperature != 0.0 {
            rgb[0] = clamp(rgb[0] * (1.0 + params.temperature * 0.1));
            rgb[2] = clamp(rgb[2] * (1.0 - params.temperature * 0.1));
        }
        for c in 0..3 {
            px[c] = to_channel(rgb[c]);
        }
    });
}
