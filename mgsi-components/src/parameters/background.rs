//! Background Mantle Parameters
//!
//! Composition of the large-scale mantle the reaction layer relaxes toward.

use mgsi_core::timeseries::FloatValue;
use serde::{Deserialize, Serialize};

/// Background mantle composition
///
/// The background is a ferropericlase + bridgmanite (silicate perovskite)
/// assemblage with a small free SiO2 component.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundParameters {
    /// Mg/(Mg+Fe) of ferropericlase
    /// default: 0.8
    pub mg_num_fp: FloatValue,

    /// Mg/(Mg+Fe) of silicate perovskite
    /// default: 0.93
    pub mg_num_pv: FloatValue,

    /// Mole fraction of ferropericlase (MgO + FeO)
    /// default: 0.311
    pub x_mgfeo: FloatValue,

    /// Mole fraction of free SiO2
    /// default: 0.015
    pub x_sio2: FloatValue,

    /// Weight of the initial Mg/(Mg+Fe) in the running background estimate
    /// used by the diagnostic erosion path; the current layer value gets
    /// `1 - background_weight`.
    /// default: 0.5
    pub background_weight: FloatValue,
}

impl Default for BackgroundParameters {
    fn default() -> Self {
        Self {
            mg_num_fp: 0.8,
            mg_num_pv: 0.93,
            x_mgfeo: 0.311,
            x_sio2: 0.015,
            background_weight: 0.5,
        }
    }
}

impl BackgroundParameters {
    /// Mole fraction of silicate perovskite (MgSiO3 + FeSiO3)
    pub fn x_pv(&self) -> FloatValue {
        1.0 - self.x_mgfeo - self.x_sio2
    }

    /// Bulk Mg/(Mg+Fe) of the ferropericlase + perovskite assemblage
    ///
    /// $$ f = \frac{X_{fp} Mg\#_{fp} + X_{pv} Mg\#_{pv}}{X_{fp} + X_{pv}} $$
    pub fn fraction_mgfe(&self) -> FloatValue {
        let x_pv = self.x_pv();
        (self.x_mgfeo * self.mg_num_fp + x_pv * self.mg_num_pv) / (self.x_mgfeo + x_pv)
    }
}
