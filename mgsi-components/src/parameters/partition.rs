//! Partition Coefficient Parameters
//!
//! Empirical fits for the metal/silicate exchange of Mg, Fe, Si and O.
//!
//! # Reference
//!
//! The MgO fit follows Badro et al. (2016), the O and Si exchange fits follow
//! the metal-silicate partitioning compilations of Fischer et al. (2015) and
//! Hirose et al. (2017). Interaction parameters are the 1873 K steelmaking
//! values.

use mgsi_core::timeseries::FloatValue;
use serde::{Deserialize, Serialize};

/// An Arrhenius-style fit of a partition coefficient
///
/// $$ \log_{10} K = a + \frac{b}{T} + c\frac{P}{T} $$
///
/// with $T$ in K and $P$ in GPa.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArrheniusFit {
    pub a: FloatValue,
    /// unit: K
    pub b: FloatValue,
    /// unit: K / GPa
    pub c: FloatValue,
}

impl ArrheniusFit {
    pub fn log10_value(&self, temperature: FloatValue, pressure_gpa: FloatValue) -> FloatValue {
        self.a + self.b / temperature + self.c * pressure_gpa / temperature
    }

    pub fn value(&self, temperature: FloatValue, pressure_gpa: FloatValue) -> FloatValue {
        10.0_f64.powf(self.log10_value(temperature, pressure_gpa))
    }

    /// Analytic temperature derivative
    ///
    /// $$ \frac{dK}{dT} = -K \ln 10 \frac{b + c P}{T^2} $$
    pub fn derivative(&self, temperature: FloatValue, pressure_gpa: FloatValue) -> FloatValue {
        -self.value(temperature, pressure_gpa)
            * std::f64::consts::LN_10
            * (self.b + self.c * pressure_gpa)
            / temperature.powi(2)
    }
}

/// Parameters of the three partition coefficient fits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PartitionParameters {
    /// Self interaction of Si in liquid iron at 1873 K
    /// default: 12.41
    pub epsilon_si_si: FloatValue,

    /// Interaction of O on Si in liquid iron at 1873 K
    /// default: -6.65
    pub epsilon_si_o: FloatValue,

    /// Self interaction of O in liquid iron at 1873 K
    /// default: -1.0
    pub epsilon_o_o: FloatValue,

    /// Interaction of Si on O in liquid iron at 1873 K
    /// default: -6.65
    pub epsilon_o_si: FloatValue,

    /// Half width of the centred difference used for dK_SiO2/dT
    /// unit: K
    /// default: 1.0
    pub sio2_delta_t: FloatValue,

    /// MgO dissociation, $K = X_{Mg} X_O / X_{MgO}$
    /// default: a = 1.23, b = -18816, c = 0
    pub mgo: ArrheniusFit,

    /// FeO dissociation, $K = X_{Fe} X_O / X_{FeO}$
    /// default: a = 0.3009, b = 0, c = -36.8037
    pub feo: ArrheniusFit,

    /// Si exchange term of the SiO2 dissociation
    /// default: a = 1.3, b = -13500, c = 0
    pub si_exchange: ArrheniusFit,

    /// O exchange term of the SiO2 dissociation
    /// default: a = 0.6, b = -3800, c = 22
    pub o_exchange: ArrheniusFit,
}

impl Default for PartitionParameters {
    fn default() -> Self {
        Self {
            mgo: ArrheniusFit {
                a: 1.23,
                b: -18816.0,
                c: 0.0,
            },
            feo: ArrheniusFit {
                a: 0.3009,
                b: 0.0,
                c: -36.8037,
            },
            si_exchange: ArrheniusFit {
                a: 1.3,
                b: -13500.0,
                c: 0.0,
            },
            o_exchange: ArrheniusFit {
                a: 0.6,
                b: -3800.0,
                c: 22.0,
            },
            epsilon_si_si: 12.41,
            epsilon_si_o: -6.65,
            epsilon_o_o: -1.0,
            epsilon_o_si: -6.65,
            sio2_delta_t: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_parameters() {
        let params = PartitionParameters::default();
        assert!((params.mgo.b + 18816.0).abs() < 1e-10);
        assert_eq!(params.feo.b, 0.0);
        assert!((params.sio2_delta_t - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_exsolution_on_cooling() {
        // All three dissociation constants fall as the core cools
        let params = PartitionParameters::default();
        for fit in [params.mgo, params.feo, params.si_exchange] {
            assert!(fit.value(4000.0, 139.0) < fit.value(6000.0, 139.0));
        }
    }

    #[test]
    fn test_partial_deserialization() {
        let json = r#"{"mgo": {"a": 1.0, "b": -15000.0, "c": 0.0}}"#;
        let params: PartitionParameters =
            serde_json::from_str(json).expect("Partial deserialization failed");

        assert!((params.mgo.b + 15000.0).abs() < 1e-10);
        assert!((params.feo.a - 0.3009).abs() < 1e-10);
    }
}
