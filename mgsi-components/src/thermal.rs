//! Core and mantle thermal evolution
//!
//! A parameterised energy balance supplies the CMB cooling rate the
//! reaction-layer engine is driven by.
//!
//! # Mantle
//!
//! $$ M_m c_m \frac{dT_m}{dt} = H_m(t) + Q_{cmb} - Q_s $$
//!
//! # Core
//!
//! $$ \left(M_c c_c + L \frac{dM_{ic}}{dT_{cmb}}\right) \frac{dT_{cmb}}{dt}
//!    = H_c(t) - Q_{cmb} $$
//!
//! Heat flows use boundary-layer scaling with an Arrhenius viscosity factor
//! relative to a reference state. The surface boundary layer sees the
//! potential temperature $T_m$, the CMB boundary layer the lowermost mantle
//! temperature $f T_m$.
//!
//! # Inner core
//!
//! The core adiabat $T_a(r) = T_0 \exp(-r^2/D^2)$ meets the melting curve
//! $T_{melt}(r) = T_{melt,0}\exp(-2(1 - 1/(3\gamma)) r^2/D^2)$ at
//!
//! $$ r_i^2 = \frac{D^2}{\beta}\left(\ln\frac{T_{melt,0}}{T_{cmb}}
//!    - \frac{r_c^2}{D^2}\right), \quad \beta = 1 - \frac{2}{3\gamma} $$
//!
//! clamped to $[0, r_c]$.

use crate::constants::GAS_CONSTANT;
use crate::parameters::ThermalParameters;
use crate::radiogenic::{heat_production_core, heat_production_mantle};
use mgsi_core::timeseries::{FloatValue, Time};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Exponent of the boundary-layer heat-flow scaling
const HEAT_FLOW_EXPONENT: FloatValue = 4.0 / 3.0;

/// Thermal state derivatives and diagnostics at one instant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThermalRates {
    /// unit: K / s
    pub dtcmb_dt: FloatValue,
    /// unit: K / s
    pub dtmantle_dt: FloatValue,
    /// unit: W
    pub q_cmb: FloatValue,
    /// unit: W
    pub q_surface: FloatValue,
    /// Mantle plus core radiogenic heating
    /// unit: W
    pub radiogenic: FloatValue,
    /// unit: m
    pub inner_core_radius: FloatValue,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThermalEvolution {
    parameters: ThermalParameters,
}

impl ThermalEvolution {
    pub fn from_parameters(parameters: ThermalParameters) -> Self {
        Self { parameters }
    }

    pub fn parameters(&self) -> &ThermalParameters {
        &self.parameters
    }

    fn viscosity_factor(&self, temperature: FloatValue, temperature_ref: FloatValue) -> FloatValue {
        let scale = self.parameters.activation_energy / (3.0 * GAS_CONSTANT);
        (scale * (1.0 / temperature_ref - 1.0 / temperature)).exp()
    }

    /// unit: W
    pub fn surface_heat_flow(&self, t_mantle: FloatValue) -> FloatValue {
        let p = &self.parameters;
        let contrast = (t_mantle - p.surface_temperature)
            / (p.mantle_temperature_ref - p.surface_temperature);
        p.surface_heat_flow_ref
            * contrast.max(0.0).powf(HEAT_FLOW_EXPONENT)
            * self.viscosity_factor(t_mantle, p.mantle_temperature_ref)
    }

    /// unit: K
    pub fn lower_mantle_temperature(&self, t_mantle: FloatValue) -> FloatValue {
        self.parameters.lower_mantle_factor * t_mantle
    }

    /// Heat flow out of the core, negative if the mantle is hotter
    ///
    /// unit: W
    pub fn cmb_heat_flow(&self, t_cmb: FloatValue, t_mantle: FloatValue) -> FloatValue {
        let p = &self.parameters;
        let t_lm = self.lower_mantle_temperature(t_mantle);
        let delta_t = t_cmb - t_lm;

        delta_t.signum()
            * p.cmb_heat_flow_ref
            * (delta_t.abs() / p.cmb_delta_t_ref).powf(HEAT_FLOW_EXPONENT)
            * self.viscosity_factor(t_lm, p.lower_mantle_factor * p.mantle_temperature_ref)
    }

    /// unit: m
    pub fn inner_core_radius(&self, t_cmb: FloatValue) -> FloatValue {
        let p = &self.parameters;
        let d2 = p.adiabat_length_scale.powi(2);
        let r2 = d2 * ((p.melting_temperature_center / t_cmb).ln() - p.core_radius.powi(2) / d2)
            / p.melting_adiabat_contrast();

        r2.clamp(0.0, p.core_radius.powi(2)).sqrt()
    }

    /// Heat released per kelvin of CMB cooling, including latent heat of
    /// inner core growth
    ///
    /// unit: J / K
    pub fn effective_core_heat_capacity(&self, t_cmb: FloatValue) -> FloatValue {
        let p = &self.parameters;
        let sensible = p.core_mass * p.core_specific_heat;
        let r_i = self.inner_core_radius(t_cmb);
        if r_i <= 0.0 || r_i >= p.core_radius {
            return sensible;
        }

        // dM_ic/dT_cmb from differentiating r_i^2 above
        let dm_ic_dt = p.inner_core_density * 4.0 * PI * r_i * p.adiabat_length_scale.powi(2)
            / (2.0 * p.melting_adiabat_contrast() * t_cmb);
        sensible + p.latent_heat * dm_ic_dt
    }

    /// Temperature derivatives at time `t` (s since formation)
    pub fn rates(&self, t: Time, t_cmb: FloatValue, t_mantle: FloatValue) -> ThermalRates {
        let p = &self.parameters;
        let h_mantle = heat_production_mantle(p.mantle_heat_production, t, p.age);
        let h_core = heat_production_core(p.core_heat_production, t, p.age);

        let q_cmb = self.cmb_heat_flow(t_cmb, t_mantle);
        let q_surface = self.surface_heat_flow(t_mantle);

        ThermalRates {
            dtcmb_dt: (h_core - q_cmb) / self.effective_core_heat_capacity(t_cmb),
            dtmantle_dt: (h_mantle + q_cmb - q_surface) / (p.mantle_mass * p.mantle_specific_heat),
            q_cmb,
            q_surface,
            radiogenic: h_mantle + h_core,
            inner_core_radius: self.inner_core_radius(t_cmb),
        }
    }
}

impl Default for ThermalEvolution {
    fn default() -> Self {
        Self::from_parameters(ThermalParameters::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use is_close::is_close;

    #[test]
    fn test_reference_heat_flows() {
        let thermal = ThermalEvolution::default();
        let p = thermal.parameters().clone();

        assert!(is_close!(
            thermal.surface_heat_flow(p.mantle_temperature_ref),
            p.surface_heat_flow_ref
        ));

        let t_cmb = p.lower_mantle_factor * p.mantle_temperature_ref + p.cmb_delta_t_ref;
        assert_relative_eq!(
            thermal.cmb_heat_flow(t_cmb, p.mantle_temperature_ref),
            p.cmb_heat_flow_ref,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_cmb_heat_flow_reverses() {
        let thermal = ThermalEvolution::default();
        assert!(thermal.cmb_heat_flow(2000.0, 2000.0) < 0.0);
        let t_lm = thermal.lower_mantle_temperature(2000.0);
        assert_eq!(thermal.cmb_heat_flow(t_lm, 2000.0), 0.0);
        assert!(thermal.cmb_heat_flow(5000.0, 2000.0) > 0.0);
    }

    #[test]
    fn test_inner_core_radius() {
        let thermal = ThermalEvolution::default();
        let p = thermal.parameters();

        assert_eq!(thermal.inner_core_radius(5700.0), 0.0);

        let r_i = thermal.inner_core_radius(4000.0);
        assert!(r_i > 0.0 && r_i < p.core_radius);

        // The adiabat and melting curve agree at r_i
        let d2 = p.adiabat_length_scale.powi(2);
        let t_centre = 4000.0 * (p.core_radius.powi(2) / d2).exp();
        let adiabat = t_centre * (-r_i.powi(2) / d2).exp();
        let melting = p.melting_temperature_center
            * (-2.0 * (1.0 - 1.0 / (3.0 * p.gruneisen)) * r_i.powi(2) / d2).exp();
        assert_relative_eq!(adiabat, melting, max_relative = 1e-10);

        // Fully frozen
        assert_eq!(thermal.inner_core_radius(100.0), p.core_radius);
    }

    #[test]
    fn test_latent_heat_slows_cooling() {
        let thermal = ThermalEvolution::default();
        let p = thermal.parameters();
        let sensible = p.core_mass * p.core_specific_heat;

        assert_eq!(thermal.effective_core_heat_capacity(5700.0), sensible);
        assert!(thermal.effective_core_heat_capacity(4000.0) > sensible);
    }

    #[test]
    fn test_early_earth_cools() {
        let thermal = ThermalEvolution::default();
        let rates = thermal.rates(0.0, 5700.0, 2000.0);

        assert!(rates.dtcmb_dt < 0.0);
        assert!(rates.dtmantle_dt < 0.0);
        assert!(rates.q_cmb > 0.0);
        assert!(rates.q_surface > rates.q_cmb);
        assert!(rates.radiogenic > thermal.parameters().mantle_heat_production);
        assert_eq!(rates.inner_core_radius, 0.0);
    }
}
