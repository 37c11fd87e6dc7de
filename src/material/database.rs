use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialCategory {
    Metal,
    Wood,
    Stone,
    Fabric,
    Magical,
}

impl MaterialCategory {
    pub const ALL: [MaterialCategory; 5] = [
        MaterialCategory::Metal,
        MaterialCategory::Wood,
        MaterialCategory::Stone,
        MaterialCategory::Fabric,
        MaterialCategory::Magical,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            MaterialCategory::Metal => "metal",
            MaterialCategory::Wood => "wood",
            MaterialCategory::Stone => "stone",
            MaterialCategory::Fabric => "fabric",
            MaterialCategory::Magical => "magical",
        }
    }

    fn table(&self) -> &'static [(&'static str, MaterialProperties)] {
        match self {
            MaterialCategory::Metal => METALS,
            MaterialCategory::Wood => WOODS,
            MaterialCategory::Stone => STONES,
            MaterialCategory::Fabric => FABRICS,
            MaterialCategory::Magical => MAGICAL,
        }
    }

    pub fn types(&self) -> impl Iterator<Item = &'static str> {
        self.table().iter().map(|(name, _)| *name)
    }
}

impl FromStr for MaterialCategory {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|c| c.name() == s).ok_or(())
    }
}

impl fmt::Display for MaterialCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Surface description used by the material shaders. The optional
/// intensities switch category-specific texture passes on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialProperties {
    pub base_color: u32,
    pub shininess: f32,
    pub reflectivity: f32,
    pub roughness: f32,
    pub grain_intensity: Option<f32>,
    pub vein_intensity: Option<f32>,
    pub speckle_intensity: Option<f32>,
    pub weave_intensity: Option<f32>,
    pub sheen_intensity: Option<f32>,
    pub glow_intensity: Option<f32>,
    pub particle_density: Option<f32>,
    pub aura_intensity: Option<f32>,
    pub energy_intensity: Option<f32>,
}

impl MaterialProperties {
    const fn base(base_color: u32, shininess: f32, reflectivity: f32, roughness: f32) -> Self {
        Self {
            base_color,
            shininess,
            reflectivity,
            roughness,
            grain_intensity: None,
            vein_intensity: None,
            speckle_intensity: None,
            weave_intensity: None,
            sheen_intensity: None,
            glow_intensity: None,
            particle_density: None,
            aura_intensity: None,
            energy_intensity: None,
        }
    }

    const fn grain(mut self, v: f32) -> Self {
        self.grain_intensity = Some(v);
        self
    }

    const fn vein(mut self, v: f32) -> Self {
        self.vein_intensity = Some(v);
        self
    }

    const fn speckle(mut self, v: f32) -> Self {
        self.speckle_intensity = Some(v);
        self
    }

    const fn weave(mut self, v: f32) -> Self {
        self.weave_intensity = Some(v);
        self
    }

    const fn sheen(mut self, v: f32) -> Self {
        self.sheen_intensity = Some(v);
        self
    }

    const fn glow(mut self, v: f32) -> Self {
        self.glow_intensity = Some(v);
        self
    }

    const fn particles(mut self, v: f32) -> Self {
        self.particle_density = Some(v);
        self
    }

    const fn aura(mut self, v: f32) -> Self {
        self.aura_intensity = Some(v);
        self
    }

    const fn energy(mut self, v: f32) -> Self {
        self.energy_intensity = Some(v);
        self
    }
}

type P = MaterialProperties;

static METALS: &[(&str, MaterialProperties)] = &[
    ("iron", P::base(0x8a8a8a, 0.6, 0.4, 0.5)),
    ("steel", P::base(0xb4b9c0, 0.8, 0.6, 0.3)),
    ("bronze", P::base(0xcd7f32, 0.7, 0.5, 0.4)),
    ("copper", P::base(0xb87333, 0.7, 0.55, 0.35)),
    ("silver", P::base(0xc0c0c0, 0.9, 0.8, 0.15)),
    ("gold", P::base(0xffd700, 0.9, 0.85, 0.1)),
    ("mithril", P::base(0xdfe8f0, 0.95, 0.9, 0.05)),
];

static WOODS: &[(&str, MaterialProperties)] = &[
    ("oak", P::base(0x8b5a2b, 0.2, 0.1, 0.7).grain(0.8)),
    ("pine", P::base(0xc19a6b, 0.15, 0.08, 0.75).grain(0.6)),
    ("maple", P::base(0xd2a86e, 0.25, 0.12, 0.6).grain(0.5)),
    ("walnut", P::base(0x5c4033, 0.3, 0.15, 0.6).grain(0.9)),
    ("ebony", P::base(0x2b1d14, 0.4, 0.2, 0.5).grain(0.4)),
];

static STONES: &[(&str, MaterialProperties)] = &[
    ("granite", P::base(0x7d7d7d, 0.1, 0.05, 0.9).speckle(0.3)),
    ("marble", P::base(0xe8e4dc, 0.5, 0.3, 0.3).vein(0.7)),
    ("cobblestone", P::base(0x6e6a63, 0.05, 0.02, 0.95).speckle(0.2)),
    ("obsidian", P::base(0x1c1a24, 0.8, 0.6, 0.2).vein(0.4)),
    ("sandstone", P::base(0xc2b280, 0.05, 0.03, 0.95)),
];

static FABRICS: &[(&str, MaterialProperties)] = &[
    ("cotton", P::base(0xf5f5dc, 0.05, 0.02, 0.9).weave(0.5)),
    ("wool", P::base(0xd8cfc0, 0.02, 0.01, 0.95).weave(0.8)),
    ("linen", P::base(0xfaf0e6, 0.05, 0.03, 0.85).weave(0.6)),
    ("silk", P::base(0xf0e0f0, 0.6, 0.3, 0.2).weave(0.2).sheen(0.8)),
    ("velvet", P::base(0x800020, 0.3, 0.1, 0.6).weave(0.3).sheen(0.5)),
    ("leather", P::base(0x8b4513, 0.3, 0.15, 0.6).weave(0.1)),
];

static MAGICAL: &[(&str, MaterialProperties)] = &[
    ("arcane", P::base(0x9b59b6, 0.7, 0.5, 0.3).glow(0.8).particles(0.5)),
    ("holy", P::base(0xfff5b0, 0.8, 0.6, 0.2).glow(1.0).aura(0.6)),
    ("shadow", P::base(0x2c1e3f, 0.4, 0.2, 0.5).aura(0.8).energy(0.5)),
    ("fire", P::base(0xff4500, 0.6, 0.4, 0.4).glow(0.9).particles(0.8).energy(0.6)),
    ("frost", P::base(0xa5f2f3, 0.8, 0.7, 0.2).glow(0.5).aura(0.4)),
    ("nature", P::base(0x3cb371, 0.3, 0.2, 0.6).particles(0.3).energy(0.4)),
    ("void", P::base(0x0b0014, 0.9, 0.1, 0.1).aura(1.0).energy(0.8).particles(0.2)),
];

/// Resolves `category/type` against the static tables.
pub fn lookup(category: &str, name: &str) -> Option<(MaterialCategory, &'static MaterialProperties)> {
    let category = category.parse::<MaterialCategory>().ok()?;
    category
        .table()
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, props)| (category, props))
}
