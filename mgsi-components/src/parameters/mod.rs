//! Component parameters
//!
//! This module contains parameter structures for all components.
//! Each parameter struct provides defaults for an Earth-like planet and
//! supports partial deserialisation through `#[serde(default)]`.

mod background;
mod layer;
mod partition;
mod thermal;

pub use background::BackgroundParameters;
pub use layer::LayerParameters;
pub use partition::{ArrheniusFit, PartitionParameters};
pub use thermal::ThermalParameters;

use serde::{Deserialize, Serialize};

/// Everything the reaction-layer engine is configured with
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReactionParameters {
    pub layer: LayerParameters,
    pub partition: PartitionParameters,
    pub background: BackgroundParameters,
}
