//! Conversions between mole fraction, mole count, mass fraction and mass.
//!
//! A [`MolarCalculations`] instance is bound to an ordered species list; every
//! array passed in or returned follows that order. Four representations are
//! supported:
//!
//! - `x`: mole fraction (sums to 1)
//! - `m`: mole count (mol)
//! - `wtp`: mass fraction (sums to 1)
//! - `wt`: absolute mass (g, because molar masses are in g/mol)
//!
//! Entry points that take a fraction check that it sums to 1 within
//! [`COMPOSITION_SUM_TOLERANCE`] and fail with
//! [`ExsolutionError::CompositionNotNormalised`] otherwise.

use crate::errors::{ExsolutionError, ExsolutionResult};
use crate::species::ChemicalSpecies;
use crate::timeseries::FloatValue;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Allowed deviation of a fraction vector's sum from 1
pub const COMPOSITION_SUM_TOLERANCE: FloatValue = 1e-6;

/// Total amount of material a fraction vector is scaled to
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Total {
    /// Total mole count
    /// unit: mol
    Moles(FloatValue),
    /// Total mass
    /// unit: g
    Mass(FloatValue),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MolarCalculations {
    species: Vec<ChemicalSpecies>,
    molar_mass: Array1<FloatValue>,
}

impl MolarCalculations {
    pub fn new(species: &[ChemicalSpecies]) -> Self {
        let molar_mass = species.iter().map(|s| s.molar_mass()).collect();
        Self {
            species: species.to_vec(),
            molar_mass,
        }
    }

    pub fn species(&self) -> &[ChemicalSpecies] {
        &self.species
    }

    /// Molar masses in species order
    /// unit: g / mol
    pub fn molar_mass(&self) -> &Array1<FloatValue> {
        &self.molar_mass
    }

    pub fn len(&self) -> usize {
        self.species.len()
    }

    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }

    fn check_len(&self, values: &Array1<FloatValue>) -> ExsolutionResult<()> {
        if values.len() != self.len() {
            return Err(ExsolutionError::SpeciesCountMismatch {
                expected: self.len(),
                got: values.len(),
            });
        }
        Ok(())
    }

    /// Check that a fraction vector has the right length and sums to 1
    pub fn check_fraction(&self, fraction: &Array1<FloatValue>) -> ExsolutionResult<()> {
        self.check_len(fraction)?;
        let sum = fraction.sum();
        if (sum - 1.0).abs() > COMPOSITION_SUM_TOLERANCE {
            return Err(ExsolutionError::CompositionNotNormalised {
                sum,
                tolerance: COMPOSITION_SUM_TOLERANCE,
            });
        }
        Ok(())
    }

    /// Mean molar mass of a composition, Σ(x·molmass)
    fn mean_molar_mass(&self, x: &Array1<FloatValue>) -> FloatValue {
        (x * &self.molar_mass).sum()
    }

    pub fn x2m(
        &self,
        x: &Array1<FloatValue>,
        total: Total,
    ) -> ExsolutionResult<Array1<FloatValue>> {
        self.check_fraction(x)?;
        let m_tot = match total {
            Total::Moles(m_tot) => m_tot,
            Total::Mass(wt_tot) => wt_tot / self.mean_molar_mass(x),
        };
        Ok(x * m_tot)
    }

    pub fn x2wtp(&self, x: &Array1<FloatValue>) -> ExsolutionResult<Array1<FloatValue>> {
        self.check_fraction(x)?;
        Ok(x * &self.molar_mass / self.mean_molar_mass(x))
    }

    pub fn x2wt(
        &self,
        x: &Array1<FloatValue>,
        total: Total,
    ) -> ExsolutionResult<Array1<FloatValue>> {
        Ok(self.x2m(x, total)? * &self.molar_mass)
    }

    pub fn x_mtot2wtot(
        &self,
        x: &Array1<FloatValue>,
        m_tot: FloatValue,
    ) -> ExsolutionResult<FloatValue> {
        self.check_fraction(x)?;
        Ok(m_tot * self.mean_molar_mass(x))
    }

    pub fn x_wtot2mtot(
        &self,
        x: &Array1<FloatValue>,
        wt_tot: FloatValue,
    ) -> ExsolutionResult<FloatValue> {
        self.check_fraction(x)?;
        Ok(wt_tot / self.mean_molar_mass(x))
    }

    pub fn m2x(&self, m: &Array1<FloatValue>) -> Array1<FloatValue> {
        m / m.sum()
    }

    /// # Panics
    /// Panics if `m` does not have one entry per species.
    pub fn m2wtp(&self, m: &Array1<FloatValue>) -> Array1<FloatValue> {
        let wt = self.m2wt(m);
        let wt_tot = wt.sum();
        wt / wt_tot
    }

    /// Change in mass fraction caused by a change in moles `dm` at composition `m`
    ///
    /// $$ d\,wtp_i = \frac{\mu_i dm_i}{W} - \frac{\mu_i m_i}{W^2} \sum_j \mu_j dm_j $$
    ///
    /// where $\mu$ is the molar mass and $W = \sum_j \mu_j m_j$.
    ///
    /// # Panics
    /// Panics if `dm` or `m` does not have one entry per species.
    pub fn dm2dwtp(&self, dm: &Array1<FloatValue>, m: &Array1<FloatValue>) -> Array1<FloatValue> {
        let wt = self.m2wt(m);
        let dwt = self.m2wt(dm);
        let wt_tot = wt.sum();
        let dwt_tot = dwt.sum();
        dwt / wt_tot - wt * dwt_tot / (wt_tot * wt_tot)
    }

    /// Mass of each species
    ///
    /// # Panics
    /// Panics if `m` does not have one entry per species.
    pub fn m2wt(&self, m: &Array1<FloatValue>) -> Array1<FloatValue> {
        m * &self.molar_mass
    }

    /// # Panics
    /// Panics if `wt` does not have one entry per species.
    pub fn wt2m(&self, wt: &Array1<FloatValue>) -> Array1<FloatValue> {
        wt / &self.molar_mass
    }

    /// # Panics
    /// Panics if `wt` does not have one entry per species.
    pub fn wt2x(&self, wt: &Array1<FloatValue>) -> Array1<FloatValue> {
        self.m2x(&self.wt2m(wt))
    }

    pub fn wt2wtp(&self, wt: &Array1<FloatValue>) -> Array1<FloatValue> {
        wt / wt.sum()
    }

    pub fn wtp2m(
        &self,
        wtp: &Array1<FloatValue>,
        total: Total,
    ) -> ExsolutionResult<Array1<FloatValue>> {
        Ok(self.wt2m(&self.wtp2wt(wtp, total)?))
    }

    pub fn wtp2wt(
        &self,
        wtp: &Array1<FloatValue>,
        total: Total,
    ) -> ExsolutionResult<Array1<FloatValue>> {
        let wt_tot = match total {
            Total::Mass(wt_tot) => {
                self.check_fraction(wtp)?;
                wt_tot
            }
            Total::Moles(m_tot) => self.wtp_mtot2wtot(wtp, m_tot)?,
        };
        Ok(wtp * wt_tot)
    }

    pub fn wtp2x(&self, wtp: &Array1<FloatValue>) -> ExsolutionResult<Array1<FloatValue>> {
        self.check_fraction(wtp)?;
        Ok(self.m2x(&self.wt2m(wtp)))
    }

    pub fn wtp_wtot2mtot(
        &self,
        wtp: &Array1<FloatValue>,
        wt_tot: FloatValue,
    ) -> ExsolutionResult<FloatValue> {
        self.check_fraction(wtp)?;
        Ok(wt_tot * (wtp / &self.molar_mass).sum())
    }

    pub fn wtp_mtot2wtot(
        &self,
        wtp: &Array1<FloatValue>,
        m_tot: FloatValue,
    ) -> ExsolutionResult<FloatValue> {
        self.check_fraction(wtp)?;
        Ok(m_tot / (wtp / &self.molar_mass).sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    fn calculator() -> MolarCalculations {
        MolarCalculations::new(&[
            ChemicalSpecies::Mg,
            ChemicalSpecies::Si,
            ChemicalSpecies::Fe,
            ChemicalSpecies::O,
        ])
    }

    #[test]
    fn test_x2m_with_total_moles() {
        let calc = calculator();
        let x = array![0.01, 0.12, 0.79, 0.08];
        let m = calc.x2m(&x, Total::Moles(200.0)).unwrap();
        assert_relative_eq!(m[2], 158.0, epsilon = 1e-12);
        assert_relative_eq!(m.sum(), 200.0, epsilon = 1e-12);
    }

    #[test]
    fn test_x2m_with_total_mass() {
        let calc = calculator();
        let x = array![0.25, 0.25, 0.25, 0.25];
        let wt_tot = 1000.0;
        let m = calc.x2m(&x, Total::Mass(wt_tot)).unwrap();
        // Mass of the returned moles is the requested total
        assert_relative_eq!(calc.m2wt(&m).sum(), wt_tot, epsilon = 1e-9);
        assert_relative_eq!(
            calc.x_wtot2mtot(&x, wt_tot).unwrap(),
            m.sum(),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_unnormalised_fraction_is_rejected() {
        let calc = calculator();
        let x = array![0.1, 0.1, 0.1, 0.1];
        let result = calc.x2m(&x, Total::Moles(1.0));
        assert!(matches!(
            result,
            Err(ExsolutionError::CompositionNotNormalised { .. })
        ));
        assert!(calc.wtp2x(&x).is_err());
        assert!(calc.x2wtp(&x).is_err());
    }

    #[test]
    fn test_wrong_length_is_rejected() {
        let calc = calculator();
        let result = calc.x2wtp(&array![0.5, 0.5]);
        assert!(matches!(
            result,
            Err(ExsolutionError::SpeciesCountMismatch {
                expected: 4,
                got: 2
            })
        ));
    }

    #[test]
    fn test_x_m_round_trip() {
        let calc = calculator();
        let x = array![0.02, 0.1, 0.8, 0.08];
        for m_tot in [1.0, 3.7e3, 2.9e25] {
            let back = calc.m2x(&calc.x2m(&x, Total::Moles(m_tot)).unwrap());
            for (a, b) in back.iter().zip(x.iter()) {
                assert_relative_eq!(*a, *b, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_wtp_x_round_trip() {
        let calc = calculator();
        let wtp = array![0.005, 0.06, 0.9, 0.035];
        let back = calc.x2wtp(&calc.wtp2x(&wtp).unwrap()).unwrap();
        for (a, b) in back.iter().zip(wtp.iter()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_mass_and_mole_totals_agree() {
        let calc = calculator();
        let wtp = array![0.005, 0.06, 0.9, 0.035];
        let wt_tot = 5.0e6;
        let m_tot = calc.wtp_wtot2mtot(&wtp, wt_tot).unwrap();
        assert_relative_eq!(
            calc.wtp_mtot2wtot(&wtp, m_tot).unwrap(),
            wt_tot,
            epsilon = 1e-6
        );

        let from_mass = calc.wtp2m(&wtp, Total::Mass(wt_tot)).unwrap();
        let from_moles = calc.wtp2m(&wtp, Total::Moles(m_tot)).unwrap();
        for (a, b) in from_mass.iter().zip(from_moles.iter()) {
            assert_relative_eq!(*a, *b, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_dm2dwtp_matches_finite_difference() {
        let calc = calculator();
        let m = array![1.0, 5.0, 40.0, 6.0];
        let dm = array![0.3, -0.1, 0.0, 0.2];
        let h = 1e-6;

        let analytic = calc.dm2dwtp(&dm, &m);
        let forward = calc.m2wtp(&(&m + &(&dm * h)));
        let backward = calc.m2wtp(&(&m - &(&dm * h)));
        let numeric = (forward - backward) / (2.0 * h);

        for (a, n) in analytic.iter().zip(numeric.iter()) {
            assert_relative_eq!(*a, *n, epsilon = 1e-8);
        }
        // Mass fractions still sum to one
        assert_relative_eq!(analytic.sum(), 0.0, epsilon = 1e-14);
    }

    #[test]
    fn test_wt_conversions() {
        let calc = calculator();
        let m = array![1.0, 1.0, 1.0, 1.0];
        let wt = calc.m2wt(&m);
        assert_relative_eq!(wt[0], ChemicalSpecies::Mg.molar_mass());

        let x = calc.wt2x(&wt);
        assert_relative_eq!(x[3], 0.25, epsilon = 1e-12);

        let wtp = calc.wt2wtp(&wt);
        assert_relative_eq!(wtp.sum(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(calc.wt2m(&wt)[1], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_mole_and_mass_totals_of_a_composition() {
        let calc = calculator();
        let x = array![0.01, 0.12, 0.79, 0.08];

        let wt_tot = 7.3e5;
        let m_tot = calc.x_wtot2mtot(&x, wt_tot).unwrap();
        assert_relative_eq!(
            calc.x_mtot2wtot(&x, m_tot).unwrap(),
            wt_tot,
            max_relative = 1e-12
        );

        let wt = calc.x2wt(&x, Total::Moles(250.0)).unwrap();
        assert_relative_eq!(
            wt.sum(),
            calc.x_mtot2wtot(&x, 250.0).unwrap(),
            max_relative = 1e-12
        );
        // Each species carries its own molar mass
        assert_relative_eq!(
            wt[2],
            0.79 * 250.0 * ChemicalSpecies::Fe.molar_mass(),
            max_relative = 1e-12
        );

        // Scaling by mass gives back the requested mass
        let wt = calc.x2wt(&x, Total::Mass(wt_tot)).unwrap();
        assert_relative_eq!(wt.sum(), wt_tot, max_relative = 1e-12);
    }

    #[test]
    fn test_unnormalised_totals_are_rejected() {
        let calc = calculator();
        let x = array![0.5, 0.2, 0.2, 0.2];
        assert!(matches!(
            calc.x2wt(&x, Total::Moles(1.0)),
            Err(ExsolutionError::CompositionNotNormalised { .. })
        ));
        assert!(matches!(
            calc.x_mtot2wtot(&x, 1.0),
            Err(ExsolutionError::CompositionNotNormalised { .. })
        ));
    }

    #[test]
    #[should_panic]
    fn test_m2wt_wrong_length_panics() {
        calculator().m2wt(&array![1.0, 2.0]);
    }
}
