//! Core and mantle reaction-layer reservoirs.
//!
//! Each reservoir fixes the species list of a [`MolarCalculations`] so that
//! conversions line up with the layout of [`MolesVector`](crate::moles::MolesVector).

use crate::constants::G_PER_KG;
use crate::moles::{N_CORE, N_MANTLE};
use mgsi_core::errors::ExsolutionResult;
use mgsi_core::molar::{MolarCalculations, Total};
use mgsi_core::species::ChemicalSpecies;
use mgsi_core::timeseries::FloatValue;
use ndarray::{arr1, Array1};
use serde::{Deserialize, Serialize};

pub const CORE_SPECIES: [ChemicalSpecies; N_CORE] = [
    ChemicalSpecies::Mg,
    ChemicalSpecies::Si,
    ChemicalSpecies::Fe,
    ChemicalSpecies::O,
];

pub const MANTLE_SPECIES: [ChemicalSpecies; N_MANTLE] = [
    ChemicalSpecies::MgO,
    ChemicalSpecies::SiO2,
    ChemicalSpecies::FeO,
    ChemicalSpecies::MgSiO3,
    ChemicalSpecies::FeSiO3,
];

/// The metallic core: Mg, Si, Fe, O
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreReservoir {
    molar: MolarCalculations,
}

impl CoreReservoir {
    pub fn new() -> Self {
        Self {
            molar: MolarCalculations::new(&CORE_SPECIES),
        }
    }

    pub fn molar(&self) -> &MolarCalculations {
        &self.molar
    }
}

impl Default for CoreReservoir {
    fn default() -> Self {
        Self::new()
    }
}

/// The silicate reaction layer: MgO, SiO2, FeO, MgSiO3, FeSiO3
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MantleReservoir {
    molar: MolarCalculations,
    /// unit: kg
    layer_mass: FloatValue,
}

impl MantleReservoir {
    /// Create a mantle reservoir for a layer of the given mass (kg)
    pub fn new(layer_mass: FloatValue) -> Self {
        Self {
            molar: MolarCalculations::new(&MANTLE_SPECIES),
            layer_mass,
        }
    }

    pub fn molar(&self) -> &MolarCalculations {
        &self.molar
    }

    /// unit: kg
    pub fn layer_mass(&self) -> FloatValue {
        self.layer_mass
    }

    /// Mole fractions of a ferropericlase + perovskite + SiO2 assemblage
    ///
    /// Both ferropericlase and perovskite are split between their Mg and Fe
    /// end members by `fraction_mgfe`.
    pub fn background_fractions(
        fraction_mgfe: FloatValue,
        x_mgfeo: FloatValue,
        x_sio2: FloatValue,
    ) -> Array1<FloatValue> {
        let x_pv = 1.0 - x_mgfeo - x_sio2;
        arr1(&[
            x_mgfeo * fraction_mgfe,
            x_sio2,
            x_mgfeo * (1.0 - fraction_mgfe),
            x_pv * fraction_mgfe,
            x_pv * (1.0 - fraction_mgfe),
        ])
    }

    /// Moles of each mantle species for a background assemblage
    ///
    /// Without `m_tot` the moles fill the whole layer mass.
    pub fn compute_mm_b(
        &self,
        fraction_mgfe: FloatValue,
        x_mgfeo: FloatValue,
        x_sio2: FloatValue,
        m_tot: Option<FloatValue>,
    ) -> ExsolutionResult<[FloatValue; N_MANTLE]> {
        let x = Self::background_fractions(fraction_mgfe, x_mgfeo, x_sio2);
        let total = match m_tot {
            Some(m_tot) => Total::Moles(m_tot),
            None => Total::Mass(self.layer_mass * G_PER_KG),
        };
        let moles = self.molar.x2m(&x, total)?;

        let mut out = [0.0; N_MANTLE];
        out.iter_mut().zip(moles.iter()).for_each(|(o, m)| *o = *m);
        Ok(out)
    }
}
