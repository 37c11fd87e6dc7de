use nalgebra::Vector3;
use rand::Rng;
use tracing::debug;

use crate::buffer::{luminance, to_channel, unpack_rgb, RasterBuffer};
use crate::noise::noise;

pub mod database;

pub use database::{lookup, MaterialCategory, MaterialProperties};

const WOOD_RATIOS: [f32; 3] = [1.0, 0.8, 0.6];
const STONE_RATIOS: [f32; 3] = [1.0, 0.9, 0.8];
const FABRIC_RATIOS: [f32; 3] = [1.0, 0.8, 0.6];

const VEIN_COLOUR: [u8; 3] = [200, 200, 200];
const PARTICLE_COLOUR: u32 = 0xffffb4;
const AURA_COLOUR: u32 = 0x8a2be2;
const ENERGY_COLOUR: u32 = 0x00ffff;

/// Shades the buffer as `category/type`. Returns `false` when the pair is
/// not in the material database, in which case nothing is touched.
pub fn apply_material<R: Rng>(
    buffer: &mut RasterBuffer,
    category: &str,
    material_type: &str,
    rng: &mut R,
) -> bool {
    let Some((category, props)) = lookup(category, material_type) else {
        debug!(category, material_type, "unknown material, skipping");
        return false;
    };

    match category {
        MaterialCategory::Metal => shade_metal(buffer, props),
        MaterialCategory::Wood => shade_wood(buffer, props),
        MaterialCategory::Stone => shade_stone(buffer, props, rng),
        MaterialCategory::Fabric => shade_fabric(buffer, props),
        MaterialCategory::Magical => shade_magical(buffer, props, rng),
    }
    true
}

#[inline(always)]
fn add_rgb(px: &mut [u8], amount: [f32; 3]) {
    for c in 0..3 {
        px[c] = to_channel(px[c] as f32 + amount[c]);
    }
}

#[inline(always)]
fn add_scaled(px: &mut [u8], amount: f32, ratios: [f32; 3]) {
    add_rgb(px, ratios.map(|r| amount * r));
}

pub fn shade_metal(buffer: &mut RasterBuffer, props: &MaterialProperties) {
    let shininess = props.shininess;
    let reflectivity = props.reflectivity;
    buffer.par_for_each_pixel(|_, _, px| {
        let reflection = luminance(px).powf(shininess) * reflectivity;
        add_rgb(px, [reflection * 50.0; 3]);
    });

    let (width, height) = (buffer.width() as f32, buffer.height() as f32);
    let light = Vector3::new(-1.0f32, -1.0, 1.0).normalize();
    let view = Vector3::new(0.0f32, 0.0, 1.0);
    let half = (light + view).normalize();
    let exponent = shininess * 100.0;

    buffer.par_for_each_pixel(|x, y, px| {
        let nx = x as f32 / width * 2.0 - 1.0;
        let ny = y as f32 / height * 2.0 - 1.0;
        let normal = Vector3::new(nx, ny, 1.0).normalize();
        let specular = normal.dot(&half).max(0.0).powf(exponent);
        if specular > 0.5 {
            add_rgb(px, [specular * 100.0; 3]);
        }
    });
}

pub fn shade_wood(buffer: &mut RasterBuffer, props: &MaterialProperties) {
    let intensity = props.grain_intensity.unwrap_or(0.0);
    buffer.par_for_each_pixel(|x, y, px| {
        let (fx, fy) = (x as f32, y as f32);
        let grain = noise(fx * 0.1, fy * 0.1) * intensity;
        add_scaled(px, grain * 30.0, WOOD_RATIOS);

        // darker grain lines every third row
        if y % 3 == 0 && noise(fx * 0.01, fy * 0.1) > 0.7 {
            for c in 0..3 {
                px[c] = to_channel(px[c] as f32 * 0.8);
            }
        }
    });
}

pub fn shade_stone<R: Rng>(buffer: &mut RasterBuffer, props: &MaterialProperties, rng: &mut R) {
    buffer.par_for_each_pixel(|x, y, px| {
        let (fx, fy) = (x as f32, y as f32);
        let variation = (noise(fx * 0.05, fy * 0.05) * 0.3 + noise(fx * 0.2, fy * 0.2) * 0.2) * 40.0;
        add_scaled(px, variation, STONE_RATIOS);
    });

    if let Some(intensity) = props.vein_intensity {
        buffer.par_for_each_pixel(|x, y, px| {
            let pattern = (x as f32 * 0.05).sin() * (y as f32 * 0.03).cos();
            if (pattern * intensity).abs() > 0.3 {
                px[..3].copy_from_slice(&VEIN_COLOUR);
            }
        });
    } else if let Some(intensity) = props.speckle_intensity {
        let (width, height) = (buffer.width(), buffer.height());
        let count = ((width * height) as f32 * intensity * 0.1) as usize;
        for _ in 0..count {
            let x = rng.random_range(0..width);
            let y = rng.random_range(0..height);
            let v = if rng.random::<bool>() { 255 } else { 0 };
            let mut px = buffer.pixel(x, y);
            px[..3].fill(v);
            buffer.set_pixel(x, y, px);
        }
    }
}

pub fn shade_fabric(buffer: &mut RasterBuffer, props: &MaterialProperties) {
    let weave_intensity = props.weave_intensity.unwrap_or(0.0);
    let sheen_intensity = props.sheen_intensity;
    buffer.par_for_each_pixel(|x, y, px| {
        let (fx, fy) = (x as f32, y as f32);
        let weave = ((fx * 0.3).sin() * (fy * 0.3).cos() + (fy * 0.3).sin() * (fx * 0.3).cos())
            * 0.5
            * weave_intensity;
        add_scaled(px, weave * 20.0, FABRIC_RATIOS);

        if let Some(intensity) = sheen_intensity {
            let sheen = (fx * 0.1 + fy * 0.1).sin() * intensity;
            if sheen > 0.2 {
                add_rgb(px, [sheen * 60.0; 3]);
            }
        }
    });
}

/// Glow, particles, aura and energy field, each enabled by its own
/// intensity in the material record.
pub fn shade_magical<R: Rng>(buffer: &mut RasterBuffer, props: &MaterialProperties, rng: &mut R) {
    let (cx, cy, max_dist) = buffer.radial_frame();
    let radial = move |x: usize, y: usize| {
        let (dx, dy) = (x as f32 - cx, y as f32 - cy);
        1.0 - (dx * dx + dy * dy).sqrt() / max_dist
    };

    if let Some(intensity) = props.glow_intensity {
        let base = unpack_rgb(props.base_color);
        buffer.par_for_each_pixel(|x, y, px| {
            let glow = radial(x, y) * intensity;
            add_rgb(px, base.map(|c| c * glow * 0.5));
        });
    }

    if let Some(density) = props.particle_density {
        let (width, height) = (buffer.width(), buffer.height());
        let count = ((width * height) as f32 * density * 0.01) as usize;
        let [r, g, b] = unpack_rgb(PARTICLE_COLOUR).map(|c| c as u8);
        for _ in 0..count {
            let x = rng.random_range(0..width);
            let y = rng.random_range(0..height);
            buffer.set_pixel(x, y, [r, g, b, 255]);
        }
    }

    if let Some(intensity) = props.aura_intensity {
        let colour = unpack_rgb(AURA_COLOUR);
        buffer.par_for_each_pixel(|x, y, px| {
            let falloff = radial(x, y);
            let aura = falloff * falloff * intensity;
            add_rgb(px, colour.map(|c| c * aura * 0.3));
        });
    }

    if let Some(intensity) = props.energy_intensity {
        let colour = unpack_rgb(ENERGY_COLOUR);
        buffer.par_for_each_pixel(|x, y, px| {
            let energy = (x as f32 * 0.1).sin() * (y as f32 * 0.1).cos() * intensity;
            if energy.abs() > 0.3 {
                add_rgb(px, colour.map(|c| c * energy.abs() * 0.4));
            }
        });
    }
}
