//! Metal/silicate partition coefficients
//!
//! Three empirical fits give the dissociation constants of MgO, FeO and SiO2
//! between the core and the reaction layer, each paired with its temperature
//! derivative. MgO and FeO have analytic derivatives. SiO2 carries
//! composition-dependent activity corrections so its derivative is taken by a
//! centred difference.
//!
//! Pressures are passed in the same unit as
//! [`CMB_PRESSURE`](crate::constants::CMB_PRESSURE) and divided by `1e6`
//! before entering the P/T terms of the fits.

use crate::constants::INTERACTION_REFERENCE_TEMPERATURE;
use crate::parameters::PartitionParameters;
use mgsi_core::timeseries::FloatValue;
use serde::{Deserialize, Serialize};

/// Conversion applied to input pressures before they enter the fits
const PRESSURE_TO_GPA: FloatValue = 1.0e6;

/// A partition coefficient and its temperature derivative
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PartitionCoefficient {
    pub value: FloatValue,
    /// unit: 1 / K
    pub dvalue_dt: FloatValue,
}

impl PartitionCoefficient {
    /// Logarithmic derivative d(ln K)/dT
    pub fn dln_dt(&self) -> FloatValue {
        self.dvalue_dt / self.value
    }
}

/// Partition coefficient calculator
///
/// $$ K_{MgO} = \frac{X_{Mg} X_O}{X_{MgO}}, \quad
///    K_{FeO} = \frac{X_{Fe} X_O}{X_{FeO}}, \quad
///    K_{SiO_2} = \frac{X_{Si} X_O^2}{X_{SiO_2}} $$
///
/// Core quantities are mole fractions of the metal, layer quantities mole
/// fractions of the silicate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Partitioning {
    parameters: PartitionParameters,
}

impl Partitioning {
    pub fn from_parameters(parameters: PartitionParameters) -> Self {
        Self { parameters }
    }

    pub fn parameters(&self) -> &PartitionParameters {
        &self.parameters
    }

    pub fn kd_mgo(&self, temperature: FloatValue, pressure: FloatValue) -> PartitionCoefficient {
        let p = pressure / PRESSURE_TO_GPA;
        PartitionCoefficient {
            value: self.parameters.mgo.value(temperature, p),
            dvalue_dt: self.parameters.mgo.derivative(temperature, p),
        }
    }

    pub fn kd_feo(&self, temperature: FloatValue, pressure: FloatValue) -> PartitionCoefficient {
        let p = pressure / PRESSURE_TO_GPA;
        PartitionCoefficient {
            value: self.parameters.feo.value(temperature, p),
            dvalue_dt: self.parameters.feo.derivative(temperature, p),
        }
    }

    /// SiO2 dissociation at the given core Si and O mole fractions
    pub fn kd_sio2(
        &self,
        x_si: FloatValue,
        x_o: FloatValue,
        temperature: FloatValue,
        pressure: FloatValue,
    ) -> PartitionCoefficient {
        let p = pressure / PRESSURE_TO_GPA;
        let dt = self.parameters.sio2_delta_t;

        let upper = self.sio2_value(x_si, x_o, temperature + dt, p);
        let lower = self.sio2_value(x_si, x_o, temperature - dt, p);

        PartitionCoefficient {
            value: self.sio2_value(x_si, x_o, temperature, p),
            dvalue_dt: (upper - lower) / (2.0 * dt),
        }
    }

    /// Activity coefficients of Si and O in liquid iron
    ///
    /// $$ \ln \gamma_i = \frac{1873}{T} \sum_j \epsilon_{ij} X_j $$
    pub fn activity_coefficients(
        &self,
        x_si: FloatValue,
        x_o: FloatValue,
        temperature: FloatValue,
    ) -> (FloatValue, FloatValue) {
        let scale = INTERACTION_REFERENCE_TEMPERATURE / temperature;
        let p = &self.parameters;

        let ln_gamma_si = scale * (p.epsilon_si_si * x_si + p.epsilon_si_o * x_o);
        let ln_gamma_o = scale * (p.epsilon_o_o * x_o + p.epsilon_o_si * x_si);
        (ln_gamma_si.exp(), ln_gamma_o.exp())
    }

    fn sio2_value(
        &self,
        x_si: FloatValue,
        x_o: FloatValue,
        temperature: FloatValue,
        p_gpa: FloatValue,
    ) -> FloatValue {
        let k_si = self.parameters.si_exchange.value(temperature, p_gpa);
        let k_o = self.parameters.o_exchange.value(temperature, p_gpa);
        let (gamma_si, gamma_o) = self.activity_coefficients(x_si, x_o, temperature);

        k_si * k_o.powi(2) / (gamma_si * gamma_o.powi(2))
    }
}

impl Default for Partitioning {
    fn default() -> Self {
        Self::from_parameters(PartitionParameters::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::CMB_PRESSURE;
    use approx::assert_relative_eq;

    fn centred_difference<F: Fn(FloatValue) -> FloatValue>(
        f: F,
        t: FloatValue,
        h: FloatValue,
    ) -> FloatValue {
        (f(t + h) - f(t - h)) / (2.0 * h)
    }

    #[test]
    fn test_mgo_derivative_matches_finite_difference() {
        let kd = Partitioning::default();
        for t in (3000..=7000).step_by(250) {
            let t = t as FloatValue;
            let analytic = kd.kd_mgo(t, CMB_PRESSURE).dvalue_dt;
            let numeric = centred_difference(|t| kd.kd_mgo(t, CMB_PRESSURE).value, t, 1e-2);
            assert_relative_eq!(analytic, numeric, max_relative = 1e-6);
        }
    }

    #[test]
    fn test_feo_derivative_matches_finite_difference() {
        let kd = Partitioning::default();
        for t in (3000..=7000).step_by(250) {
            let t = t as FloatValue;
            let analytic = kd.kd_feo(t, CMB_PRESSURE).dvalue_dt;
            let numeric = centred_difference(|t| kd.kd_feo(t, CMB_PRESSURE).value, t, 1e-2);
            assert_relative_eq!(analytic, numeric, max_relative = 1e-6);
        }
    }

    #[test]
    fn test_mgo_exsolves_on_cooling() {
        // MgO dissociation is endothermic so K drops as the core cools
        let kd = Partitioning::default();
        let hot = kd.kd_mgo(6000.0, CMB_PRESSURE);
        let cold = kd.kd_mgo(4000.0, CMB_PRESSURE);
        assert!(cold.value < hot.value);
        assert!(hot.dvalue_dt > 0.0);
        assert!(hot.dln_dt() > 0.0);
    }

    #[test]
    fn test_pressure_is_scaled() {
        let kd = Partitioning::default();
        let t = 5000.0;
        let expected = 10.0_f64.powf(0.3009 - 36.8037 * 139.0 / t);
        assert_relative_eq!(kd.kd_feo(t, 139e6).value, expected, max_relative = 1e-12);
    }

    #[test]
    fn test_sio2_derivative_close_to_fine_difference() {
        let kd = Partitioning::default();
        let (x_si, x_o) = (0.12, 0.08);
        for t in [4000.0, 5000.0, 5700.0, 6500.0] {
            let coarse = kd.kd_sio2(x_si, x_o, t, CMB_PRESSURE).dvalue_dt;
            let fine =
                centred_difference(|t| kd.kd_sio2(x_si, x_o, t, CMB_PRESSURE).value, t, 1e-3);
            assert_relative_eq!(coarse, fine, max_relative = 1e-4);
        }
    }

    #[test]
    fn test_sio2_activity_corrections() {
        let kd = Partitioning::default();
        let (gamma_si, gamma_o) = kd.activity_coefficients(0.0, 0.0, 5000.0);
        assert_eq!(gamma_si, 1.0);
        assert_eq!(gamma_o, 1.0);

        let t = 5700.0;
        let p = kd.parameters();
        let ideal = p.si_exchange.value(t, 139.0) * p.o_exchange.value(t, 139.0).powi(2);
        assert_relative_eq!(
            kd.kd_sio2(0.0, 0.0, t, CMB_PRESSURE).value,
            ideal,
            max_relative = 1e-12
        );

        let (gamma_si, gamma_o) = kd.activity_coefficients(0.12, 0.08, t);
        let corrected = kd.kd_sio2(0.12, 0.08, t, CMB_PRESSURE).value;
        assert_relative_eq!(corrected * gamma_si * gamma_o.powi(2), ideal, max_relative = 1e-12);
    }
}
