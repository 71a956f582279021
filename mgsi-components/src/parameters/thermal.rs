//! Thermal Evolution Parameters
//!
//! Parameters for the core/mantle energy balance that supplies the CMB
//! cooling rate to the reaction-layer engine.

use crate::constants::EARTH_CORE_RADIUS;
use mgsi_core::timeseries::{myr_to_seconds, FloatValue, Time};
use serde::{Deserialize, Serialize};

/// Parameters of the core and mantle thermal evolution
///
/// Heat flows follow boundary-layer scaling relative to a reference state:
///
/// $$ Q = Q_{ref} \left(\frac{\Delta T}{\Delta T_{ref}}\right)^{4/3}
///        \exp\left(\frac{E_a}{3R}\left(\frac{1}{T_{ref}} - \frac{1}{T}\right)\right) $$
///
/// The inner core grows where the core adiabat drops below the melting curve.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThermalParameters {
    /// Radius of the core
    /// unit: m
    /// default: 3480e3
    pub core_radius: FloatValue,

    /// Mass of the core
    /// unit: kg
    /// default: 1.94e24
    pub core_mass: FloatValue,

    /// Specific heat of the core
    /// unit: J / (kg K)
    /// default: 840.0
    pub core_specific_heat: FloatValue,

    /// Mass of the mantle
    /// unit: kg
    /// default: 4.06e24
    pub mantle_mass: FloatValue,

    /// Specific heat of the mantle
    /// unit: J / (kg K)
    /// default: 1265.0
    pub mantle_specific_heat: FloatValue,

    /// Surface temperature
    /// unit: K
    /// default: 300.0
    pub surface_temperature: FloatValue,

    /// Surface heat flow at the reference mantle temperature
    /// unit: W
    /// default: 38e12
    pub surface_heat_flow_ref: FloatValue,

    /// Reference mantle potential temperature
    /// unit: K
    /// default: 1630.0
    pub mantle_temperature_ref: FloatValue,

    /// CMB heat flow at the reference CMB temperature contrast
    /// unit: W
    /// default: 10e12
    pub cmb_heat_flow_ref: FloatValue,

    /// Reference temperature contrast across the CMB boundary layer
    /// unit: K
    /// default: 1500.0
    pub cmb_delta_t_ref: FloatValue,

    /// Ratio of the lowermost mantle temperature to the potential temperature
    /// unit: dimensionless
    /// default: 1.3
    pub lower_mantle_factor: FloatValue,

    /// Activation energy of mantle viscosity
    /// unit: J / mol
    /// default: 3e5
    pub activation_energy: FloatValue,

    /// Present-day mantle radiogenic heat production
    /// unit: W
    /// default: 13e12
    pub mantle_heat_production: FloatValue,

    /// Present-day core radiogenic heat production
    /// unit: W
    /// default: 0.0
    pub core_heat_production: FloatValue,

    /// Length scale of the core adiabat, $T \propto \exp(-r^2/D^2)$
    /// unit: m
    /// default: 6000e3
    pub adiabat_length_scale: FloatValue,

    /// Melting temperature of iron at the centre of the core
    /// unit: K
    /// default: 5873.0
    pub melting_temperature_center: FloatValue,

    /// Grüneisen parameter of the core
    /// unit: dimensionless
    /// default: 1.5
    pub gruneisen: FloatValue,

    /// Latent heat of inner core crystallisation
    /// unit: J / kg
    /// default: 750e3
    pub latent_heat: FloatValue,

    /// Density of the inner core
    /// unit: kg / m^3
    /// default: 12900.0
    pub inner_core_density: FloatValue,

    /// Present age of the planet
    /// unit: s
    /// default: 4568 Myr
    pub age: Time,
}

impl Default for ThermalParameters {
    fn default() -> Self {
        Self {
            core_radius: EARTH_CORE_RADIUS,
            core_mass: 1.94e24,
            core_specific_heat: 840.0,
            mantle_mass: 4.06e24,
            mantle_specific_heat: 1265.0,
            surface_temperature: 300.0,
            surface_heat_flow_ref: 38e12,
            mantle_temperature_ref: 1630.0,
            cmb_heat_flow_ref: 10e12,
            cmb_delta_t_ref: 1500.0,
            lower_mantle_factor: 1.3,
            activation_energy: 3e5,
            mantle_heat_production: 13e12,
            core_heat_production: 0.0,
            adiabat_length_scale: 6000e3,
            melting_temperature_center: 5873.0,
            gruneisen: 1.5,
            latent_heat: 750e3,
            inner_core_density: 12900.0,
            age: myr_to_seconds(4568.0),
        }
    }
}

impl ThermalParameters {
    /// Exponent contrast between the melting curve and the adiabat
    ///
    /// $$ \beta = 1 - \frac{2}{3\gamma} $$
    pub fn melting_adiabat_contrast(&self) -> FloatValue {
        1.0 - 2.0 / (3.0 * self.gruneisen)
    }
}
