pub mod blur;
pub mod buffer;
pub mod config;
pub mod effects;
pub mod error;
pub mod lighting;
pub mod material;
pub mod noise;
pub mod pipeline;
pub mod post_processor;
pub mod resample;

pub use buffer::RasterBuffer;
pub use config::{EffectChain, EnhancementConfig, FilterChain, LightingConfig, MaterialConfig, Resolution};
pub use effects::Effect;
pub use error::{EnhanceError, Result};
pub use pipeline::{enhance, Enhancer};
pub use post_processor::Filter;
