use nalgebra::Vector3;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::buffer::{luminance, RasterBuffer, CHANNELS};

pub mod presets;

pub use presets::{preset, preset_names, Light, LightRole};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmbientOcclusion {
    pub intensity: f32,
}

impl Default for AmbientOcclusion {
    fn default() -> Self {
        Self { intensity: 0.5 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Shadows {
    pub intensity: f32,
    pub direction: [f32; 3],
}

impl Default for Shadows {
    fn default() -> Self {
        Self {
            intensity: 0.3,
            direction: [0.5, -0.5, 0.7],
        }
    }
}

/// Applies every light of `preset_name` in table order, each multiplying the
/// output of the previous one, then the optional occlusion and shadow passes.
/// Returns `false` for an unknown preset, leaving the buffer as it was.
pub fn apply_lighting(
    buffer: &mut RasterBuffer,
    preset_name: &str,
    ambient_occlusion: Option<&AmbientOcclusion>,
    shadows: Option<&Shadows>,
) -> bool {
    let Some(lights) = preset(preset_name) else {
        debug!(preset = preset_name, "unknown lighting preset, skipping");
        return false;
    };

    for light in lights {
        scale_rgb(buffer, light.factor());
    }

    if let Some(ao) = ambient_occlusion {
        apply_ambient_occlusion(buffer, ao.intensity);
    }

    if let Some(shadows) = shadows {
        apply_shadows(buffer, shadows);
    }
    true
}

fn scale_rgb(buffer: &mut RasterBuffer, factor: f32) {
    buffer.par_for_each_pixel(|_, _, px| {
        for c in 0..3 {
            // Truncates, unlike `to_channel`: each light keeps the floor of
            // the scaled value.
            px[c] = (px[c] as f32 * factor).clamp(0.0, 255.0) as u8;
        }
    });
}

/// Darkens interior pixels whose luma differs from their 8-neighbourhood.
pub fn apply_ambient_occlusion(buffer: &mut RasterBuffer, intensity: f32) {
    let (width, height) = (buffer.width(), buffer.height());
    if width < 3 || height < 3 {
        return;
    }
    let source = buffer.pixels().to_vec();
    let stride = buffer.stride();
    let luma_at = |x: usize, y: usize| {
        let i = y * stride + x * CHANNELS;
        luminance(&source[i..i + 3])
    };

    buffer.par_rows_mut().for_each(|(y, row)| {
        if y == 0 || y == height - 1 {
            return;
        }
        for x in 1..width - 1 {
            let mut total = 0.0;
            for sy in y - 1..=y + 1 {
                for sx in x - 1..=x + 1 {
                    if sx != x || sy != y {
                        total += luma_at(sx, sy);
                    }
                }
            }
            let occlusion = (luma_at(x, y) - total / 8.0) * intensity;
            let factor = (1.0 - occlusion.abs()).max(0.3);
            for c in 0..3 {
                let i = x * CHANNELS + c;
                row[i] = (row[i] as f32 * factor).floor() as u8;
            }
        }
    });
}

/// One global darkening factor from the shadow direction's facing term.
pub fn shadow_factor(shadows: &Shadows) -> f32 {
    let normal = Vector3::new(0.0f32, 0.0, 1.0);
    let direction = Vector3::from(shadows.direction);
    (normal.dot(&direction) * shadows.intensity + 0.5).max(0.2)
}

pub fn apply_shadows(buffer: &mut RasterBuffer, shadows: &Shadows) {
    scale_rgb(buffer, shadow_factor(shadows));
}
