use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::buffer::RasterBuffer;
use crate::config::EnhancementConfig;
use crate::effects::apply_effects;
use crate::error::Result;
use crate::lighting::apply_lighting;
use crate::material::apply_material;
use crate::post_processor::PostProcessor;
use crate::resample::resample;

fn timed<T>(stage: &'static str, f: impl FnOnce() -> T) -> T {
    let now = Instant::now();
    let out = f();
    debug!(stage, elapsed_ns = now.elapsed().as_nanos() as u64, "stage done");
    out
}

/// Runs Resample, Material, Lighting, Effects and Post-Filter in that order,
/// skipping every stage whose config section is absent.
pub struct Enhancer {
    config: EnhancementConfig,
    seed: Option<u64>,
}

impl Enhancer {
    pub fn new(config: EnhancementConfig) -> Self {
        Self { config, seed: None }
    }

    /// Same as [`Enhancer::new`], but the stochastic passes draw from a
    /// generator seeded with `seed`, so output is reproducible.
    pub fn with_seed(config: EnhancementConfig, seed: u64) -> Self {
        Self {
            config,
            seed: Some(seed),
        }
    }

    pub fn config(&self) -> &EnhancementConfig {
        &self.config
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn enhance(&self, buffer: RasterBuffer) -> Result<RasterBuffer> {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        self.enhance_with_rng(buffer, &mut rng)
    }

    pub fn enhance_with_rng<R: Rng>(&self, buffer: RasterBuffer, rng: &mut R) -> Result<RasterBuffer> {
        let now = Instant::now();
        let config = &self.config;
        let mut buffer = buffer;

        if let Some(resolution) = config.resolution {
            let (width, height, scale) = resolution.target();
            buffer = timed("resample", || resample(buffer, width, height, scale))?;
        }

        if let Some(material) = &config.material {
            timed("material", || apply_material(&mut buffer, &material.category, &material.kind, &mut *rng));
        }

        if let Some(lighting) = &config.lighting {
            timed("lighting", || {
                apply_lighting(
                    &mut buffer,
                    &lighting.preset,
                    lighting.ambient_occlusion.as_ref(),
                    lighting.shadows.as_ref(),
                )
            });
        }

        if let Some(effects) = &config.effects {
            timed("effects", || apply_effects(&mut buffer, effects.as_slice(), &mut *rng));
        }

        if let Some(filters) = &config.post_processing {
            timed("post processing", || PostProcessor::new(filters.as_slice()).process(&mut buffer));
        }

        debug!(
            width = buffer.width(),
            height = buffer.height(),
            elapsed_ns = now.elapsed().as_nanos() as u64,
            "enhanced"
        );
        Ok(buffer)
    }

    /// Enhances every buffer independently on the rayon pool. Results keep
    /// input order. With a seed, image `i` is seeded with `seed + i`.
    pub fn enhance_batch(&self, buffers: Vec<RasterBuffer>) -> Vec<Result<RasterBuffer>> {
        let now = Instant::now();
        let count = buffers.len();

        let results: Vec<_> = buffers
            .into_par_iter()
            .enumerate()
            .map(|(i, buffer)| match self.seed {
                Some(seed) => {
                    let mut rng = StdRng::seed_from_u64(seed.wrapping_add(i as u64));
                    self.enhance_with_rng(buffer, &mut rng)
                }
                None => self.enhance(buffer),
            })
            .collect();

        let failed = results.iter().filter(|r| r.is_err()).count();
        info!(count, failed, elapsed_ms = now.elapsed().as_millis() as u64, "batch enhanced");
        results
    }
}

/// One-shot convenience over [`Enhancer::enhance`].
pub fn enhance(buffer: RasterBuffer, config: &EnhancementConfig) -> Result<RasterBuffer> {
    Enhancer::new(config.clone()).enhance(buffer)
}
