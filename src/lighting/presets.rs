use nalgebra::Vector3;

/// How a light's directional term is weighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightRole {
    Ambient,
    Directional,
    Key,
    Main,
    Mystical,
    Fill,
    Shadow,
    Rim,
    Accent,
    Ethereal,
    Dim,
    Silhouette,
}

impl LightRole {
    /// Multiplier applied on top of the directional factor.
    pub fn weight(&self) -> f32 {
        match self {
            LightRole::Ambient => 1.0,
            LightRole::Directional | LightRole::Key | LightRole::Main | LightRole::Mystical => 1.0,
            LightRole::Fill
            | LightRole::Shadow
            | LightRole::Rim
            | LightRole::Accent
            | LightRole::Ethereal => 0.5,
            LightRole::Dim | LightRole::Silhouette => 0.3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub role: LightRole,
    pub intensity: f32,
    pub color: u32,
    pub direction: Option<[f32; 3]>,
}

impl Light {
    const fn new(role: LightRole, intensity: f32, color: u32, direction: Option<[f32; 3]>) -> Self {
        Self { role, intensity, color, direction }
    }

    /// Per-light RGB multiplier for a flat, camera-facing surface.
    pub fn factor(&self) -> f32 {
        if self.role == LightRole::Ambient {
            return self.intensity;
        }
        let normal = Vector3::new(0.0f32, 0.0, 1.0);
        let direction = self.direction.map(Vector3::from).unwrap_or(normal);
        let lit = (normal.dot(&direction) * self.intensity + 0.3).max(0.2);
        lit * self.role.weight()
    }
}

use LightRole::*;

static STUDIO: &[Light] = &[
    Light::new(Key, 1.0, 0xffffff, Some([0.5, -0.5, 0.7])),
    Light::new(Fill, 0.6, 0xf0f0ff, Some([-0.5, -0.3, 0.8])),
    Light::new(Rim, 0.4, 0xffffff, Some([0.0, 0.5, 0.9])),
];

static DRAMATIC: &[Light] = &[
    Light::new(Key, 1.4, 0xfff0d0, Some([0.8, -0.4, 0.45])),
    Light::new(Shadow, 0.4, 0x202040, Some([-0.7, 0.3, 0.6])),
];

static OUTDOOR: &[Light] = &[
    Light::new(Directional, 1.1, 0xfffbe8, Some([0.3, -0.8, 0.5])),
    Light::new(Ambient, 0.95, 0xb0d0ff, None),
    Light::new(Fill, 0.5, 0xffffff, Some([-0.3, 0.2, 0.9])),
];

static DUNGEON: &[Light] = &[
    Light::new(Ambient, 0.7, 0x403830, None),
    Light::new(Dim, 0.8, 0xff9a40, Some([0.2, -0.2, 0.95])),
    Light::new(Accent, 0.5, 0xff6020, Some([-0.6, 0.1, 0.8])),
];

static MYSTICAL: &[Light] = &[
    Light::new(Mystical, 1.0, 0xb080ff, Some([0.0, -0.3, 0.95])),
    Light::new(Ethereal, 0.7, 0x80ffff, Some([0.4, 0.4, 0.8])),
    Light::new(Ambient, 0.9, 0x6040a0, None),
];

static SUNSET: &[Light] = &[
    Light::new(Main, 1.2, 0xff9050, Some([0.9, -0.1, 0.4])),
    Light::new(Fill, 0.4, 0x8060c0, Some([-0.5, -0.2, 0.8])),
];

static MOONLIGHT: &[Light] = &[
    Light::new(Main, 0.7, 0xc0d0ff, Some([-0.3, -0.6, 0.7])),
    Light::new(Ambient, 0.8, 0x203050, None),
];

static NOIR: &[Light] = &[
    Light::new(Key, 1.5, 0xffffff, Some([0.9, -0.2, 0.35])),
    Light::new(Silhouette, 0.9, 0x000000, Some([0.0, 0.0, -1.0])),
];

static PRESETS: &[(&str, &[Light])] = &[
    ("studio", STUDIO),
    ("dramatic", DRAMATIC),
    ("outdoor", OUTDOOR),
    ("dungeon", DUNGEON),
    ("mystical", MYSTICAL),
    ("sunset", SUNSET),
    ("moonlight", MOONLIGHT),
    ("noir", NOIR),
];

pub fn preset(name: &str) -> Option<&'static [Light]> {
    PRESETS.iter().find(|(n, _)| *n == name).map(|(_, lights)| *lights)
}

pub fn preset_names() -> impl Iterator<Item = &'static str> {
    PRESETS.iter().map(|(name, _)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_preset_has_two_or_three_lights() {
        for name in preset_names() {
            let lights = preset(name).unwrap();
            assert!((2..=3).contains(&lights.len()), "{name} has {} lights", lights.len());
        }
        assert!(preset("disco").is_none());
    }

    #[test]
    fn ambient_factor_is_its_intensity() {
        let light = Light::new(Ambient, 0.7, 0, Some([0.0, 0.0, 1.0]));
        assert_eq!(light.factor(), 0.7);
    }

    #[test]
    fn directional_factor_uses_z_and_floor() {
        let key = Light::new(Key, 1.0, 0, Some([0.5, -0.5, 0.7]));
        assert!((key.factor() - 1.0).abs() < 1e-6);

        let away = Light::new(Main, 1.0, 0, Some([0.0, 0.0, -1.0]));
        assert!((away.factor() - 0.2).abs() < 1e-6);
    }

    #[test]
    fn secondary_and_tertiary_roles_are_scaled() {
        let fill = Light::new(Fill, 1.0, 0, Some([0.0, 0.0, 1.0]));
        assert!((fill.factor() - 0.65).abs() < 1e-6);

        let dim = Light::new(Dim, 1.0, 0, Some([0.0, 0.0, 1.0]));
        assert!((dim.factor() - 0.39).abs() < 1e-6);
    }
}
