//! Equilibrium initial composition
//!
//! The run starts from a core of known light-element content in equilibrium
//! with the reaction layer at the initial CMB temperature. The layer's MgO,
//! FeO and SiO2 follow from the three partition coefficients and the
//! remaining silicate is split between MgSiO3 and FeSiO3 in the MgO:FeO
//! ratio.

use crate::constants::G_PER_KG;
use crate::moles::{MolesVector, N_CORE, N_MANTLE};
use crate::parameters::ReactionParameters;
use crate::partition::Partitioning;
use crate::reservoir::{CoreReservoir, MantleReservoir};
use log::debug;
use mgsi_core::errors::{ExsolutionError, ExsolutionResult};
use mgsi_core::molar::Total;
use mgsi_core::timeseries::FloatValue;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Initial thermal state and core composition
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InitialComposition {
    /// CMB temperature at the start of the run
    /// unit: K
    /// default: 5700.0
    pub t_cmb: FloatValue,

    /// Mantle potential temperature at the start of the run
    /// unit: K
    /// default: 2000.0
    pub t_mantle: FloatValue,

    /// Core mole fraction of Mg
    /// default: 0.01
    pub x_mg: FloatValue,

    /// Core mole fraction of Si
    /// default: 0.12
    pub x_si: FloatValue,

    /// Core mole fraction of O
    /// default: 0.08
    pub x_o: FloatValue,
}

impl Default for InitialComposition {
    fn default() -> Self {
        Self {
            t_cmb: 5700.0,
            t_mantle: 2000.0,
            x_mg: 0.01,
            x_si: 0.12,
            x_o: 0.08,
        }
    }
}

impl InitialComposition {
    /// Core mole fractions `[Mg, Si, Fe, O]`, Fe making up the balance
    pub fn core_fractions(&self) -> [FloatValue; N_CORE] {
        [self.x_mg, self.x_si, 1.0 - self.x_mg - self.x_si - self.x_o, self.x_o]
    }

    /// Layer mole fractions `[MgO, SiO2, FeO, MgSiO3, FeSiO3]` in equilibrium
    /// with the core at `t_cmb`
    pub fn layer_fractions(
        &self,
        parameters: &ReactionParameters,
    ) -> ExsolutionResult<[FloatValue; N_MANTLE]> {
        let [x_mg, x_si, x_fe, x_o] = self.core_fractions();
        if [x_mg, x_si, x_fe, x_o].iter().any(|x| *x <= 0.0) {
            return Err(ExsolutionError::NoEquilibrium(format!(
                "core mole fractions must be positive, got Mg {} Si {} Fe {} O {}",
                x_mg, x_si, x_fe, x_o
            )));
        }

        let partitioning = Partitioning::from_parameters(parameters.partition.clone());
        let pressure = parameters.layer.cmb_pressure;

        let x_mgo = x_mg * x_o / partitioning.kd_mgo(self.t_cmb, pressure).value;
        let x_feo = x_fe * x_o / partitioning.kd_feo(self.t_cmb, pressure).value;
        let x_sio2 =
            x_si * x_o.powi(2) / partitioning.kd_sio2(x_si, x_o, self.t_cmb, pressure).value;

        let silicate = 1.0 - x_mgo - x_feo - x_sio2;
        if silicate <= 0.0 {
            return Err(ExsolutionError::NoEquilibrium(format!(
                "oxides exceed the layer at T_cmb = {} K (MgO {}, FeO {}, SiO2 {})",
                self.t_cmb, x_mgo, x_feo, x_sio2
            )));
        }
        let mg_share = x_mgo / (x_mgo + x_feo);

        Ok([
            x_mgo,
            x_sio2,
            x_feo,
            silicate * mg_share,
            silicate * (1.0 - mg_share),
        ])
    }

    /// Initial moles of a core of mass `core_mass` (kg) and the layer
    /// described by `parameters`
    pub fn solve(
        &self,
        parameters: &ReactionParameters,
        core_mass: FloatValue,
    ) -> ExsolutionResult<MolesVector> {
        let layer = self.layer_fractions(parameters)?;

        let core_moles = CoreReservoir::new().molar().x2m(
            &Array1::from(self.core_fractions().to_vec()),
            Total::Mass(core_mass * G_PER_KG),
        )?;
        let mantle = MantleReservoir::new(parameters.layer.layer_mass());
        let mantle_moles = mantle.molar().x2m(
            &Array1::from(layer.to_vec()),
            Total::Mass(mantle.layer_mass() * G_PER_KG),
        )?;

        debug!(
            "Initial layer at {} K: MgO {:.4} SiO2 {:.4} FeO {:.4} MgSiO3 {:.4} FeSiO3 {:.4}",
            self.t_cmb, layer[0], layer[1], layer[2], layer[3], layer[4]
        );

        let mut values = [0.0; N_CORE + N_MANTLE];
        values[..N_CORE].iter_mut().zip(core_moles.iter()).for_each(|(v, m)| *v = *m);
        values[N_CORE..].iter_mut().zip(mantle_moles.iter()).for_each(|(v, m)| *v = *m);
        Ok(MolesVector::new(values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moles::{FE, FEO, MG, MGO, MGSIO3, FESIO3, O, SI, SIO2};
    use approx::assert_relative_eq;

    #[test]
    fn test_fractions_sum_to_one() {
        let initial = InitialComposition::default();
        let core: FloatValue = initial.core_fractions().iter().sum();
        assert_relative_eq!(core, 1.0, epsilon = 1e-12);

        let layer = initial.layer_fractions(&ReactionParameters::default()).unwrap();
        let total: FloatValue = layer.iter().sum();
        assert_relative_eq!(total, 1.0, epsilon = 1e-12);
        assert!(layer.iter().all(|x| *x > 0.0));
    }

    #[test]
    fn test_solution_is_in_equilibrium() {
        let parameters = ReactionParameters::default();
        let initial = InitialComposition::default();
        let moles = initial.solve(&parameters, 1.94e24).unwrap();
        let x = |k| moles.reservoir_fraction(k);

        let kd = Partitioning::default();
        let p = parameters.layer.cmb_pressure;
        let t = initial.t_cmb;
        assert_relative_eq!(x(MG) * x(O) / x(MGO), kd.kd_mgo(t, p).value, max_relative = 1e-10);
        assert_relative_eq!(x(FE) * x(O) / x(FEO), kd.kd_feo(t, p).value, max_relative = 1e-10);
        assert_relative_eq!(
            x(SI) * x(O).powi(2) / x(SIO2),
            kd.kd_sio2(x(SI), x(O), t, p).value,
            max_relative = 1e-9
        );

        // Silicates share the oxide Mg:Fe ratio
        assert_relative_eq!(x(MGSIO3) / x(FESIO3), x(MGO) / x(FEO), max_relative = 1e-10);
    }

    #[test]
    fn test_masses_match_reservoirs() {
        let parameters = ReactionParameters::default();
        let core_mass = 1.94e24;
        let moles = InitialComposition::default().solve(&parameters, core_mass).unwrap();

        let core_molar = CoreReservoir::new();
        let mass: FloatValue = moles
            .core()
            .iter()
            .zip(core_molar.molar().molar_mass().iter())
            .map(|(m, mm)| m * mm)
            .sum();
        assert_relative_eq!(mass, core_mass * G_PER_KG, max_relative = 1e-12);
    }

    #[test]
    fn test_rejects_overfull_core() {
        let initial = InitialComposition {
            x_si: 0.6,
            x_o: 0.5,
            ..Default::default()
        };
        let result = initial.solve(&ReactionParameters::default(), 1.94e24);
        assert!(matches!(result, Err(ExsolutionError::NoEquilibrium(_))));
    }

    #[test]
    fn test_rejects_oxide_saturated_layer() {
        // Very oxygen-rich cold core
        let initial = InitialComposition {
            t_cmb: 3000.0,
            x_o: 0.3,
            ..Default::default()
        };
        let result = initial.layer_fractions(&ReactionParameters::default());
        assert!(matches!(result, Err(ExsolutionError::NoEquilibrium(_))));
    }
}
