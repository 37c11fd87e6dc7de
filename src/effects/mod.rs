use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::buffer::RasterBuffer;

mod bloom;
mod blur;
mod grading;
mod lens;

pub use bloom::bloom;
pub use blur::{depth_of_field, motion_blur};
pub use grading::{color_grading, film_grain};
pub use lens::{chromatic_aberration, vignette, vignette_factor};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BloomParams {
    pub intensity: f32,
    pub radius: f32,
    pub threshold: f32,
}

impl Default for BloomParams {
    fn default() -> Self {
        Self {
            intensity: 0.5,
            radius: 2.0,
            threshold: 0.8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DepthOfFieldParams {
    /// Focal row as a fraction of the image height.
    pub focal_distance: f32,
    pub aperture: f32,
    pub blur_strength: f32,
}

impl Default for DepthOfFieldParams {
    fn default() -> Self {
        Self {
            focal_distance: 0.5,
            aperture: 0.1,
            blur_strength: 3.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MotionBlurParams {
    pub strength: f32,
    pub direction: [f32; 2],
}

impl Default for MotionBlurParams {
    fn default() -> Self {
        Self {
            strength: 1.0,
            direction: [1.0, 0.0],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChromaticAberrationParams {
    pub strength: f32,
    pub direction: [f32; 2],
}

impl Default for ChromaticAberrationParams {
    fn default() -> Self {
        Self {
            strength: 0.5,
            direction: [1.0, 0.0],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VignetteParams {
    pub intensity: f32,
    /// Falloff exponent on the normalised distance from centre.
    pub radius: f32,
}

impl Default for VignetteParams {
    fn default() -> Self {
        Self {
            intensity: 0.5,
            radius: 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilmGrainParams {
    pub intensity: f32,
    pub size: f32,
}

impl Default for FilmGrainParams {
    fn default() -> Self {
        Self {
            intensity: 0.1,
            size: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ColorGradingParams {
    pub contrast: f32,
    pub saturation: f32,
    pub brightness: f32,
    /// White-balance shift, 0 neutral, positive warmer.
    pub temperature: f32,
}

impl Default for ColorGradingParams {
    fn default() -> Self {
        Self {
            contrast: 1.0,
            saturation: 1.0,
            brightness: 1.0,
            temperature: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect {
    Bloom(BloomParams),
    DepthOfField(DepthOfFieldParams),
    MotionBlur(MotionBlurParams),
    ChromaticAberration(ChromaticAberrationParams),
    Vignette(VignetteParams),
    FilmGrain(FilmGrainParams),
    ColorGrading(ColorGradingParams),
}

impl Effect {
    pub fn name(&self) -> &'static str {
        match self {
            Effect::Bloom(_) => "bloom",
            Effect::DepthOfField(_) => "depthOfField",
            Effect::MotionBlur(_) => "motionBlur",
            Effect::ChromaticAberration(_) => "chromaticAberration",
            Effect::Vignette(_) => "vignette",
            Effect::FilmGrain(_) => "filmGrain",
            Effect::ColorGrading(_) => "colorGrading",
        }
    }

    pub fn apply<R: Rng>(&self, buffer: &mut RasterBuffer, rng: &mut R) {
        match self {
            Effect::Bloom(p) => bloom(buffer, p),
            Effect::DepthOfField(p) => depth_of_field(buffer, p),
            Effect::MotionBlur(p) => motion_blur(buffer, p),
            Effect::ChromaticAberration(p) => chromatic_aberration(buffer, p),
            Effect::Vignette(p) => vignette(buffer, p),
            Effect::FilmGrain(p) => film_grain(buffer, p, rng),
            Effect::ColorGrading(p) => color_grading(buffer, p),
        }
    }
}

/// Runs effects in the order given.
pub fn apply_effects<R: Rng>(buffer: &mut RasterBuffer, effects: &[Effect], rng: &mut R) {
    for effect in effects {
        let now = std::time::Instant::now();
        effect.apply(buffer, rng);
        debug!(effect = effect.name(), elapsed_ns = now.elapsed().as_nanos() as u64, "effect");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn effects_keep_channels_and_dimensions() {
        let mut buffer = RasterBuffer::new(24, 16).unwrap();
        for y in 0..16 {
            for x in 0..24 {
                buffer.set_pixel(x, y, [(x * 10) as u8, (y * 15) as u8, 200, 255]);
            }
        }
        let effects = [
            Effect::Bloom(BloomParams::default()),
            Effect::DepthOfField(DepthOfFieldParams::default()),
            Effect::MotionBlur(MotionBlurParams::default()),
            Effect::ChromaticAberration(ChromaticAberrationParams::default()),
            Effect::Vignette(VignetteParams::default()),
            Effect::FilmGrain(FilmGrainParams::default()),
            Effect::ColorGrading(ColorGradingParams::default()),
        ];
        let mut rng = StdRng::seed_from_u64(11);
        apply_effects(&mut buffer, &effects, &mut rng);
        assert_eq!((buffer.width(), buffer.height()), (24, 16));
        assert_eq!(buffer.pixels().len(), 24 * 16 * 4);
    }

    #[test]
    fn effect_order_matters() {
        let source = RasterBuffer::filled(8, 8, [200, 200, 200, 255]).unwrap();
        let brighten = Effect::ColorGrading(ColorGradingParams {
            brightness: 2.0,
            ..Default::default()
        });
        let darken = Effect::ColorGrading(ColorGradingParams {
            brightness: 0.5,
            ..Default::default()
        });
        let mut rng = StdRng::seed_from_u64(0);

        let mut a = source.clone();
        apply_effects(&mut a, &[brighten, darken], &mut rng);
        let mut b = source.clone();
        apply_effects(&mut b, &[darken, brighten], &mut rng);
        assert_eq!(a.pixel(0, 0)[0], 128);
        assert_eq!(b.pixel(0, 0)[0], 200);
    }
}
