//! Reaction Layer Parameters
//!
//! Geometry and overturn behaviour of the thin reactive layer sitting on top
//! of the core.

use crate::constants::{CMB_PRESSURE, EARTH_CORE_RADIUS};
use mgsi_core::timeseries::{myr_to_seconds, FloatValue, Time};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Parameters of the reaction layer
///
/// The layer is a spherical shell of thickness $h$ on top of a core of
/// radius $r_c$:
///
/// $$ V_{layer} = \frac{4}{3}\pi\left((r_c + h)^3 - r_c^3\right) $$
///
/// The layer volume is derived on demand from the thickness and core radius,
/// so it can never disagree with them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerParameters {
    /// Thickness of the reaction layer
    /// unit: m
    /// default: 100.0
    pub layer_thickness: FloatValue,

    /// Density of the reaction layer
    /// unit: kg / m^3
    /// default: 5500.0
    pub layer_density: FloatValue,

    /// Overturn timescale over which the layer is mixed back into the mantle
    /// unit: s
    /// default: 800 Myr
    pub overturn_time: Time,

    /// Nonlinearity exponent of the erosion term (1 gives linear relaxation)
    /// unit: dimensionless
    /// default: 1.0
    pub overturn_exponent: FloatValue,

    /// Radius of the core
    /// unit: m
    /// default: 3480e3
    pub core_radius: FloatValue,

    /// Pressure argument handed to the partition coefficient fits
    /// unit: see [`CMB_PRESSURE`]
    /// default: 139e6
    pub cmb_pressure: FloatValue,

    /// Temperature dependence of the MgSiO3 equilibrium, dlnK/dT
    /// No experimental constraint exists, so this is normally zero.
    /// unit: 1 / K
    /// default: 0.0
    pub dlnk_dt_mgsio3: FloatValue,

    /// Temperature dependence of the FeSiO3 equilibrium, dlnK/dT
    /// unit: 1 / K
    /// default: 0.0
    pub dlnk_dt_fesio3: FloatValue,
}

impl Default for LayerParameters {
    fn default() -> Self {
        Self {
            layer_thickness: 100.0,
            layer_density: 5500.0,
            overturn_time: myr_to_seconds(800.0),
            overturn_exponent: 1.0,
            core_radius: EARTH_CORE_RADIUS,
            cmb_pressure: CMB_PRESSURE,
            dlnk_dt_mgsio3: 0.0,
            dlnk_dt_fesio3: 0.0,
        }
    }
}

impl LayerParameters {
    pub fn set_layer_thickness(&mut self, thickness: FloatValue) {
        self.layer_thickness = thickness;
    }

    pub fn set_overturn_time(&mut self, overturn_time: Time) {
        self.overturn_time = overturn_time;
    }

    /// unit: m^3
    pub fn core_volume(&self) -> FloatValue {
        4.0 / 3.0 * PI * self.core_radius.powi(3)
    }

    /// unit: m^3
    pub fn layer_volume(&self) -> FloatValue {
        4.0 / 3.0 * PI * (self.core_radius + self.layer_thickness).powi(3) - self.core_volume()
    }

    /// unit: kg
    pub fn layer_mass(&self) -> FloatValue {
        self.layer_density * self.layer_volume()
    }
}
