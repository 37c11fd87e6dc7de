use std::fmt;
use std::str::FromStr;

use serde::de::{IgnoredAny, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

use crate::effects::{
    BloomParams, ChromaticAberrationParams, ColorGradingParams, DepthOfFieldParams, Effect,
    FilmGrainParams, MotionBlurParams, VignetteParams,
};
use crate::error::Result;
use crate::lighting::{AmbientOcclusion, Shadows};
use crate::post_processor::{AdjustmentParams, Filter, StrengthParams};

/// Upscale tiers. Each maps to a fixed target size and scale factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resolution {
    Low,
    Medium,
    High,
    Ultra,
    Extreme,
}

impl Resolution {
    pub const ALL: [Resolution; 5] = [
        Resolution::Low,
        Resolution::Medium,
        Resolution::High,
        Resolution::Ultra,
        Resolution::Extreme,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Resolution::Low => "low",
            Resolution::Medium => "medium",
            Resolution::High => "high",
            Resolution::Ultra => "ultra",
            Resolution::Extreme => "extreme",
        }
    }

    /// `(target_width, target_height, scale)`
    pub fn target(&self) -> (usize, usize, f64) {
        match self {
            Resolution::Low => (32, 32, 1.0),
            Resolution::Medium => (64, 64, 2.0),
            Resolution::High => (128, 128, 4.0),
            Resolution::Ultra => (256, 256, 8.0),
            Resolution::Extreme => (512, 512, 16.0),
        }
    }
}

impl FromStr for Resolution {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|r| r.name() == s).ok_or(())
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Resolution {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Unknown tier names deserialise to `None` instead of failing.
fn lenient_resolution<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<Resolution>, D::Error> {
    let name = Option::<String>::deserialize(deserializer)?;
    Ok(name.and_then(|name| {
        let parsed = name.parse().ok();
        if parsed.is_none() {
            debug!(resolution = %name, "unknown resolution, skipping");
        }
        parsed
    }))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialConfig {
    pub category: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LightingConfig {
    pub preset: String,
    #[serde(default, deserialize_with = "toggle", skip_serializing_if = "Option::is_none")]
    pub ambient_occlusion: Option<AmbientOcclusion>,
    #[serde(default, deserialize_with = "toggle", skip_serializing_if = "Option::is_none")]
    pub shadows: Option<Shadows>,
}

/// A section given either as a flag (`true` for defaults) or as parameters.
#[derive(Deserialize)]
#[serde(untagged)]
enum Toggle<T> {
    Flag(bool),
    Params(T),
}

impl<T: Default> Toggle<T> {
    fn into_params(self) -> Option<T> {
        match self {
            Toggle::Flag(true) => Some(T::default()),
            Toggle::Flag(false) => None,
            Toggle::Params(params) => Some(params),
        }
    }
}

fn toggle<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<Toggle<T>>::deserialize(deserializer)?.and_then(Toggle::into_params))
}

/// Filter parameters may also be a bare number.
#[derive(Deserialize)]
#[serde(untagged)]
enum FilterValue<T> {
    Flag(bool),
    Scalar(f32),
    Params(T),
}

impl<T: Default + From<f32>> FilterValue<T> {
    fn into_params(self) -> Option<T> {
        match self {
            FilterValue::Flag(true) => Some(T::default()),
            FilterValue::Flag(false) => None,
            FilterValue::Scalar(v) => Some(T::from(v)),
            FilterValue::Params(params) => Some(params),
        }
    }
}

impl From<f32> for StrengthParams {
    fn from(strength: f32) -> Self {
        Self { strength }
    }
}

impl From<f32> for AdjustmentParams {
    fn from(adjustment: f32) -> Self {
        Self { adjustment }
    }
}

/// Effects in document order. Unknown names are skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EffectChain(pub Vec<Effect>);

impl EffectChain {
    pub fn as_slice(&self) -> &[Effect] {
        &self.0
    }
}

impl From<Vec<Effect>> for EffectChain {
    fn from(effects: Vec<Effect>) -> Self {
        Self(effects)
    }
}

impl Serialize for EffectChain {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for effect in &self.0 {
            match effect {
                Effect::Bloom(p) => map.serialize_entry(effect.name(), p)?,
                Effect::DepthOfField(p) => map.serialize_entry(effect.name(), p)?,
                Effect::MotionBlur(p) => map.serialize_entry(effect.name(), p)?,
                Effect::ChromaticAberration(p) => map.serialize_entry(effect.name(), p)?,
                Effect::Vignette(p) => map.serialize_entry(effect.name(), p)?,
                Effect::FilmGrain(p) => map.serialize_entry(effect.name(), p)?,
                Effect::ColorGrading(p) => map.serialize_entry(effect.name(), p)?,
            }
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for EffectChain {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct ChainVisitor;

        impl<'de> Visitor<'de> for ChainVisitor {
            type Value = EffectChain;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of effect names to parameters")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<EffectChain, A::Error> {
                let mut effects = Vec::new();
                while let Some(name) = map.next_key::<String>()? {
                    let effect = match name.as_str() {
                        "bloom" => map.next_value::<Toggle<BloomParams>>()?.into_params().map(Effect::Bloom),
                        "depthOfField" => map
                            .next_value::<Toggle<DepthOfFieldParams>>()?
                            .into_params()
                            .map(Effect::DepthOfField),
                        "motionBlur" => map
                            .next_value::<Toggle<MotionBlurParams>>()?
                            .into_params()
                            .map(Effect::MotionBlur),
                        "chromaticAberration" => map
                            .next_value::<Toggle<ChromaticAberrationParams>>()?
                            .into_params()
                            .map(Effect::ChromaticAberration),
                        "vignette" => map.next_value::<Toggle<VignetteParams>>()?.into_params().map(Effect::Vignette),
                        "filmGrain" => map
                            .next_value::<Toggle<FilmGrainParams>>()?
                            .into_params()
                            .map(Effect::FilmGrain),
                        "colorGrading" => map
                            .next_value::<Toggle<ColorGradingParams>>()?
                            .into_params()
                            .map(Effect::ColorGrading),
                        _ => {
                            debug!(effect = %name, "unknown effect, skipping");
                            map.next_value::<IgnoredAny>()?;
                            None
                        }
                    };
                    effects.extend(effect);
                }
                Ok(EffectChain(effects))
            }
        }

        deserializer.deserialize_map(ChainVisitor)
    }
}

/// Post filters in document order. Unknown names are skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterChain(pub Vec<Filter>);

impl FilterChain {
    pub fn as_slice(&self) -> &[Filter] {
        &self.0
    }
}

impl From<Vec<Filter>> for FilterChain {
    fn from(filters: Vec<Filter>) -> Self {
        Self(filters)
    }
}

impl Serialize for FilterChain {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for filter in &self.0 {
            match filter {
                Filter::Sharpen(p) | Filter::Denoise(p) => map.serialize_entry(filter.name(), p)?,
                Filter::Contrast(p)
                | Filter::Saturation(p)
                | Filter::Brightness(p)
                | Filter::Gamma(p)
                | Filter::Vibrance(p) => map.serialize_entry(filter.name(), p)?,
            }
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FilterChain {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct ChainVisitor;

        impl<'de> Visitor<'de> for ChainVisitor {
            type Value = FilterChain;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of filter names to parameters")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<FilterChain, A::Error> {
                let mut filters = Vec::new();
                while let Some(name) = map.next_key::<String>()? {
                    let strength = |v: FilterValue<StrengthParams>| v.into_params();
                    let adjustment = |v: FilterValue<AdjustmentParams>| v.into_params();
                    let filter = match name.as_str() {
                        "sharpen" => strength(map.next_value()?).map(Filter::Sharpen),
                        "denoise" => strength(map.next_value()?).map(Filter::Denoise),
                        "contrast" => adjustment(map.next_value()?).map(Filter::Contrast),
                        "saturation" => adjustment(map.next_value()?).map(Filter::Saturation),
                        "brightness" => adjustment(map.next_value()?).map(Filter::Brightness),
                        "gamma" => adjustment(map.next_value()?).map(Filter::Gamma),
                        "vibrance" => adjustment(map.next_value()?).map(Filter::Vibrance),
                        _ => {
                            debug!(filter = %name, "unknown post filter, skipping");
                            map.next_value::<IgnoredAny>()?;
                            None
                        }
                    };
                    filters.extend(filter);
                }
                Ok(FilterChain(filters))
            }
        }

        deserializer.deserialize_map(ChainVisitor)
    }
}

/// Per-image enhancement request. Every section is optional; a missing
/// section skips its stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancementConfig {
    #[serde(default, deserialize_with = "lenient_resolution", skip_serializing_if = "Option::is_none")]
    pub resolution: Option<Resolution>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<MaterialConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lighting: Option<LightingConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effects: Option<EffectChain>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_processing: Option<FilterChain>,
}

impl EnhancementConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses the JSON the asset generators emit. Effect and filter order
    /// follows the document.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = Some(resolution);
        self
    }

    pub fn with_material(mut self, category: impl Into<String>, kind: impl Into<String>) -> Self {
        self.material = Some(MaterialConfig {
            category: category.into(),
            kind: kind.into(),
        });
        self
    }

    pub fn with_lighting(mut self, lighting: LightingConfig) -> Self {
        self.lighting = Some(lighting);
        self
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.get_or_insert_with(EffectChain::default).0.push(effect);
        self
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.post_processing.get_or_insert_with(FilterChain::default).0.push(filter);
        self
    }
}

impl LightingConfig {
    pub fn preset(name: impl Into<String>) -> Self {
        Self {
            preset: name.into(),
            ambient_occlusion: None,
            shadows: None,
        }
    }
}
