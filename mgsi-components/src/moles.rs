//! Molar abundance vector of the core and the reaction layer.
//!
//! The layout is fixed: the four core species followed by the five mantle
//! species,
//!
//! `[Mg, Si, Fe, O, MgO, SiO2, FeO, MgSiO3, FeSiO3]`
//!
//! Reservoir totals are always derived from the entries, never stored.

use mgsi_core::timeseries::FloatValue;
use serde::{Deserialize, Serialize};
use std::ops::Index;

pub const N_CORE: usize = 4;
pub const N_MANTLE: usize = 5;
pub const N_SPECIES: usize = N_CORE + N_MANTLE;

/// Length of a species vector extended with the two reservoir totals
pub const N_WITH_SUMS: usize = N_SPECIES + 2;

pub const MG: usize = 0;
pub const SI: usize = 1;
pub const FE: usize = 2;
pub const O: usize = 3;
pub const MGO: usize = 4;
pub const SIO2: usize = 5;
pub const FEO: usize = 6;
pub const MGSIO3: usize = 7;
pub const FESIO3: usize = 8;

/// Position of the core total in a vector with sums
pub const CORE_TOTAL: usize = 4;
/// Position of the mantle total in a vector with sums
pub const MANTLE_TOTAL: usize = 10;

/// Species entries followed by reservoir totals:
/// `[Mg, Si, Fe, O, core, MgO, SiO2, FeO, MgSiO3, FeSiO3, mantle]`
pub type WithSums = [FloatValue; N_WITH_SUMS];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MolesVector([FloatValue; N_SPECIES]);

/// Result of [`MolesVector::unwrap`], one variant per flag combination
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UnwrappedMoles {
    /// `return_sum = false, split_coremantle = false`
    Species([FloatValue; N_SPECIES]),
    /// `return_sum = true, split_coremantle = false`
    SpeciesWithSums(WithSums),
    /// `return_sum = false, split_coremantle = true`
    Split {
        core: [FloatValue; N_CORE],
        mantle: [FloatValue; N_MANTLE],
    },
    /// `return_sum = true, split_coremantle = true`
    SplitWithSums {
        core: [FloatValue; N_CORE],
        core_total: FloatValue,
        mantle: [FloatValue; N_MANTLE],
        mantle_total: FloatValue,
    },
}

impl MolesVector {
    pub fn new(values: [FloatValue; N_SPECIES]) -> Self {
        Self(values)
    }

    pub fn from_parts(core: [FloatValue; N_CORE], mantle: [FloatValue; N_MANTLE]) -> Self {
        let mut values = [0.0; N_SPECIES];
        values[..N_CORE].copy_from_slice(&core);
        values[N_CORE..].copy_from_slice(&mantle);
        Self(values)
    }

    /// Build from the first `N_SPECIES` entries of a slice
    ///
    /// # Panics
    /// Panics if the slice is shorter than `N_SPECIES`.
    pub fn from_slice(values: &[FloatValue]) -> Self {
        let mut out = [0.0; N_SPECIES];
        out.copy_from_slice(&values[..N_SPECIES]);
        Self(out)
    }

    pub fn as_array(&self) -> &[FloatValue; N_SPECIES] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &FloatValue> {
        self.0.iter()
    }

    pub fn core(&self) -> [FloatValue; N_CORE] {
        let mut core = [0.0; N_CORE];
        core.copy_from_slice(&self.0[..N_CORE]);
        core
    }

    pub fn mantle(&self) -> [FloatValue; N_MANTLE] {
        let mut mantle = [0.0; N_MANTLE];
        mantle.copy_from_slice(&self.0[N_CORE..]);
        mantle
    }

    pub fn core_total(&self) -> FloatValue {
        self.0[MG] + self.0[SI] + self.0[FE] + self.0[O]
    }

    pub fn mantle_total(&self) -> FloatValue {
        self.0[MGO] + self.0[SIO2] + self.0[FEO] + self.0[MGSIO3] + self.0[FESIO3]
    }

    /// Mole fraction of a species within its own reservoir
    pub fn reservoir_fraction(&self, index: usize) -> FloatValue {
        if index < N_CORE {
            self.0[index] / self.core_total()
        } else {
            self.0[index] / self.mantle_total()
        }
    }

    /// Mg/(Mg+Fe) of the layer's ferropericlase + silicate
    pub fn mantle_fraction_mgfe(&self) -> FloatValue {
        let mg = self.0[MGO] + self.0[MGSIO3];
        let fe = self.0[FEO] + self.0[FESIO3];
        mg / (mg + fe)
    }

    pub fn is_non_negative(&self) -> bool {
        self.0.iter().all(|m| *m >= 0.0)
    }

    pub fn scaled(&self, factor: FloatValue) -> Self {
        Self(self.0.map(|m| m * factor))
    }

    /// Reshape into one of four layouts
    ///
    /// Callers destructure the result positionally, so the orderings are
    /// part of the contract.
    pub fn unwrap(&self, return_sum: bool, split_coremantle: bool) -> UnwrappedMoles {
        match (return_sum, split_coremantle) {
            (false, false) => UnwrappedMoles::Species(self.0),
            (true, false) => UnwrappedMoles::SpeciesWithSums(self.with_sums()),
            (false, true) => UnwrappedMoles::Split {
                core: self.core(),
                mantle: self.mantle(),
            },
            (true, true) => UnwrappedMoles::SplitWithSums {
                core: self.core(),
                core_total: self.core_total(),
                mantle: self.mantle(),
                mantle_total: self.mantle_total(),
            },
        }
    }

    pub fn with_sums(&self) -> WithSums {
        insert_sums(&self.0)
    }
}

impl Index<usize> for MolesVector {
    type Output = FloatValue;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

/// Extend a species vector with its reservoir totals
pub fn insert_sums(species: &[FloatValue; N_SPECIES]) -> WithSums {
    let mut out = [0.0; N_WITH_SUMS];
    out[..N_CORE].copy_from_slice(&species[..N_CORE]);
    out[CORE_TOTAL] = species[MG] + species[SI] + species[FE] + species[O];
    out[CORE_TOTAL + 1..MANTLE_TOTAL].copy_from_slice(&species[N_CORE..]);
    out[MANTLE_TOTAL] =
        species[MGO] + species[SIO2] + species[FEO] + species[MGSIO3] + species[FESIO3];
    out
}

/// Drop the reservoir totals from a vector with sums
pub fn remove_sums(with_sums: &WithSums) -> [FloatValue; N_SPECIES] {
    let mut out = [0.0; N_SPECIES];
    out[..N_CORE].copy_from_slice(&with_sums[..N_CORE]);
    out[N_CORE..].copy_from_slice(&with_sums[CORE_TOTAL + 1..MANTLE_TOTAL]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MolesVector {
        MolesVector::new([1.0, 2.0, 3.0, 4.0, 10.0, 20.0, 30.0, 40.0, 50.0])
    }

    #[test]
    fn test_totals() {
        let moles = sample();
        assert_eq!(moles.core_total(), 10.0);
        assert_eq!(moles.mantle_total(), 150.0);
        assert!((moles.reservoir_fraction(FE) - 0.3).abs() < 1e-12);
        assert!((moles.reservoir_fraction(FESIO3) - 50.0 / 150.0).abs() < 1e-12);
    }

    #[test]
    fn test_unwrap_species() {
        let moles = sample();
        match moles.unwrap(false, false) {
            UnwrappedMoles::Species(values) => assert_eq!(&values, moles.as_array()),
            other => panic!("Unexpected layout {:?}", other),
        }
    }

    #[test]
    fn test_unwrap_with_sums_ordering() {
        let moles = sample();
        match moles.unwrap(true, false) {
            UnwrappedMoles::SpeciesWithSums(values) => {
                assert_eq!(
                    values,
                    [1.0, 2.0, 3.0, 4.0, 10.0, 10.0, 20.0, 30.0, 40.0, 50.0, 150.0]
                );
            }
            other => panic!("Unexpected layout {:?}", other),
        }
    }

    #[test]
    fn test_unwrap_split() {
        let moles = sample();
        match moles.unwrap(false, true) {
            UnwrappedMoles::Split { core, mantle } => {
                assert_eq!(core, [1.0, 2.0, 3.0, 4.0]);
                assert_eq!(mantle, [10.0, 20.0, 30.0, 40.0, 50.0]);
            }
            other => panic!("Unexpected layout {:?}", other),
        }
    }

    #[test]
    fn test_unwrap_split_with_sums() {
        let moles = sample();
        match moles.unwrap(true, true) {
            UnwrappedMoles::SplitWithSums {
                core,
                core_total,
                mantle,
                mantle_total,
            } => {
                assert_eq!(core_total, core.iter().sum::<f64>());
                assert_eq!(mantle_total, mantle.iter().sum::<f64>());
            }
            other => panic!("Unexpected layout {:?}", other),
        }
    }

    #[test]
    fn test_sums_round_trip() {
        let moles = sample();
        assert_eq!(&remove_sums(&moles.with_sums()), moles.as_array());
    }

    #[test]
    fn test_mantle_fraction_mgfe() {
        let moles = MolesVector::from_parts([1.0; 4], [3.0, 0.0, 1.0, 3.0, 1.0]);
        assert!((moles.mantle_fraction_mgfe() - 0.75).abs() < 1e-12);
        assert!(moles.is_non_negative());
        assert!(!moles.scaled(-1.0).is_non_negative());
    }
}
