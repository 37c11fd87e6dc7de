use pixel_enhance::resample::bicubic_weights;
use pixel_enhance::{enhance, EnhancementConfig, Enhancer, RasterBuffer, Resolution};

fn checker(width: usize, height: usize) -> RasterBuffer {
    let mut buffer = RasterBuffer::new(width, height).unwrap();
    for y in 0..height {
        for x in 0..width {
            let v = if (x / 2 + y / 2) % 2 == 0 { 230 } else { 25 };
            buffer.set_pixel(x, y, [v, 255 - v, (x * 16 % 256) as u8, 255]);
        }
    }
    buffer
}

#[test]
fn black_stays_black_under_brightness() {
    let config = EnhancementConfig::from_json(r#"{ "postProcessing": { "brightness": { "adjustment": 2 } } }"#).unwrap();
    let input = RasterBuffer::filled(4, 4, [0, 0, 0, 255]).unwrap();
    let out = enhance(input.clone(), &config).unwrap();
    assert_eq!(out, input);
}

#[test]
fn medium_resolution_keeps_a_uniform_field() {
    let config = EnhancementConfig::from_json(r#"{ "resolution": "medium" }"#).unwrap();
    let input = RasterBuffer::filled(32, 32, [128, 128, 128, 255]).unwrap();
    let out = enhance(input, &config).unwrap();
    assert_eq!((out.width(), out.height()), (64, 64));
    assert!(out.pixels().chunks_exact(4).all(|px| px == [128, 128, 128, 255]));
}

#[test]
fn every_resolution_hits_its_target_size() {
    for resolution in Resolution::ALL {
        let config = EnhancementConfig::new().with_resolution(resolution);
        let out = enhance(checker(32, 32), &config).unwrap();
        let (width, height, _) = resolution.target();
        assert_eq!((out.width(), out.height()), (width, height), "{resolution}");
        assert_eq!(out.pixels().len(), width * height * 4);
    }
}

#[test]
fn bicubic_weights_sum_to_one() {
    for i in 0..20 {
        for j in 0..20 {
            let (xf, yf) = (i as f64 / 20.0, j as f64 / 20.0);
            let sum: f64 = bicubic_weights(xf, yf).iter().flatten().sum();
            assert!((sum - 1.0).abs() < 1e-6, "({xf}, {yf}) sums to {sum}");
        }
    }
}

#[test]
fn absurd_blur_radii_are_accepted() {
    let json = r#"{
        "effects": {
            "bloom": { "radius": 1e30, "threshold": 0.1 },
            "depthOfField": { "aperture": 1e30, "blurStrength": 1e30 }
        }
    }"#;
    let config = EnhancementConfig::from_json(json).unwrap();
    let out = enhance(checker(24, 16), &config).unwrap();
    assert_eq!((out.width(), out.height()), (24, 16));
}

#[test]
fn unknown_material_type_is_a_no_op() {
    let config = EnhancementConfig::from_json(r#"{ "material": { "category": "wood", "type": "balsa" } }"#).unwrap();
    let input = checker(16, 16);
    let out = Enhancer::with_seed(config, 3).enhance(input.clone()).unwrap();
    assert_eq!(out, input);
}

#[test]
fn full_config_runs_end_to_end() {
    let json = r#"{
        "resolution": "medium",
        "material": { "category": "magical", "type": "arcane" },
        "lighting": { "preset": "mystical", "ambientOcclusion": { "intensity": 0.4 }, "shadows": true },
        "effects": {
            "bloom": { "intensity": 0.6, "radius": 2, "threshold": 0.7 },
            "depthOfField": {},
            "motionBlur": { "strength": 0.5, "direction": [0.0, 1.0] },
            "chromaticAberration": { "strength": 0.3 },
            "vignette": { "intensity": 0.4 },
            "filmGrain": { "intensity": 0.05 },
            "colorGrading": { "contrast": 1.1, "saturation": 1.2, "temperature": 0.5 }
        },
        "postProcessing": {
            "sharpen": 0.3,
            "denoise": { "strength": 0.2 },
            "contrast": 1.05,
            "saturation": 1.1,
            "gamma": 0.9,
            "vibrance": 1.2
        }
    }"#;
    let config = EnhancementConfig::from_json(json).unwrap();
    let enhancer = Enhancer::with_seed(config, 2024);

    let a = enhancer.enhance(checker(32, 32)).unwrap();
    let b = enhancer.enhance(checker(32, 32)).unwrap();
    assert_eq!((a.width(), a.height()), (64, 64));
    assert_eq!(a.pixels().len(), 64 * 64 * 4);
    assert_eq!(a, b);
}

#[test]
fn batch_keeps_order_and_reports_each_image() {
    let config = EnhancementConfig::from_json(r#"{ "resolution": "high" }"#).unwrap();
    let inputs = vec![checker(32, 32), checker(16, 8), RasterBuffer::filled(32, 32, [9, 9, 9, 255]).unwrap()];
    let results = Enhancer::new(config).enhance_batch(inputs);
    assert_eq!(results.len(), 3);
    for result in &results {
        let out = result.as_ref().unwrap();
        assert_eq!((out.width(), out.height()), (128, 128));
    }
    let last = results[2].as_ref().unwrap();
    assert!(last.pixels().chunks_exact(4).all(|px| px == [9, 9, 9, 255]));
}

#[test]
fn image_round_trip_preserves_pixels() {
    let buffer = checker(6, 5);
    let image = buffer.to_rgba_image();
    assert_eq!(image.dimensions(), (6, 5));
    assert_eq!(RasterBuffer::try_from(image).unwrap(), buffer);
}
