//! Chemical species and their molar masses.

use crate::errors::{ExsolutionError, ExsolutionResult};
use crate::timeseries::FloatValue;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// Standard atomic weights
// unit: g / mol
const MG: FloatValue = 24.305;
const SI: FloatValue = 28.0855;
const FE: FloatValue = 55.845;
const O: FloatValue = 15.999;
const S: FloatValue = 32.065;
const NI: FloatValue = 58.6934;
const H: FloatValue = 1.008;
const C: FloatValue = 12.011;

/// A chemical species tracked by the model
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChemicalSpecies {
    Mg,
    Si,
    Fe,
    O,
    S,
    Ni,
    H,
    C,
    MgO,
    FeO,
    SiO2,
    MgSiO3,
    FeSiO3,
}

impl ChemicalSpecies {
    pub const ALL: [ChemicalSpecies; 13] = [
        Self::Mg,
        Self::Si,
        Self::Fe,
        Self::O,
        Self::S,
        Self::Ni,
        Self::H,
        Self::C,
        Self::MgO,
        Self::FeO,
        Self::SiO2,
        Self::MgSiO3,
        Self::FeSiO3,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Mg => "Mg",
            Self::Si => "Si",
            Self::Fe => "Fe",
            Self::O => "O",
            Self::S => "S",
            Self::Ni => "Ni",
            Self::H => "H",
            Self::C => "C",
            Self::MgO => "MgO",
            Self::FeO => "FeO",
            Self::SiO2 => "SiO2",
            Self::MgSiO3 => "MgSiO3",
            Self::FeSiO3 => "FeSiO3",
        }
    }

    /// Molar mass
    /// unit: g / mol
    pub fn molar_mass(&self) -> FloatValue {
        match self {
            Self::Mg => MG,
            Self::Si => SI,
            Self::Fe => FE,
            Self::O => O,
            Self::S => S,
            Self::Ni => NI,
            Self::H => H,
            Self::C => C,
            Self::MgO => MG + O,
            Self::FeO => FE + O,
            Self::SiO2 => SI + 2.0 * O,
            Self::MgSiO3 => MG + SI + 3.0 * O,
            Self::FeSiO3 => FE + SI + 3.0 * O,
        }
    }

    pub fn from_name(name: &str) -> ExsolutionResult<Self> {
        Self::ALL
            .iter()
            .find(|s| s.name() == name)
            .copied()
            .ok_or_else(|| ExsolutionError::UnknownSpecies(name.to_string()))
    }
}

impl fmt::Display for ChemicalSpecies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ChemicalSpecies {
    type Err = ExsolutionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}
