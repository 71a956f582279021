//! Reaction-layer derivative engine
//!
//! Given the molar abundances of the core and reaction-layer species and the
//! CMB temperature, the engine returns how every abundance changes per kelvin
//! of CMB cooling while keeping the system on its equilibrium manifold.
//!
//! # Equations
//!
//! Five equilibria relate reservoir-relative mole fractions:
//!
//! $$ K_{MgO} = \frac{X_{Mg} X_O}{X_{MgO}}, \quad
//!    K_{SiO_2} = \frac{X_{Si} X_O^2}{X_{SiO_2}}, \quad
//!    K_{FeO} = \frac{X_{Fe} X_O}{X_{FeO}} $$
//!
//! $$ K_{MgSiO_3} = \frac{X_{MgO} X_{SiO_2}}{X_{MgSiO_3}}, \quad
//!    K_{FeSiO_3} = \frac{X_{FeO} X_{SiO_2}}{X_{FeSiO_3}} $$
//!
//! and four atom balances (Mg, Si, Fe, O) couple the core to the layer. The
//! only atoms entering or leaving the pair are those exchanged with the
//! background mantle by erosion ([`BackgroundErosion::dmi_b`]).
//!
//! Writing $u_k = d\ln M_k/dT$ and differentiating both sets of equations
//! gives nine equations that are linear in $u$:
//!
//! $$ \sum_k \left(e_{rk} - X_k \sum_{j \in R(k)} e_{rj}\right) u_k
//!    = \frac{d\ln K_r}{dT} $$
//!
//! $$ \sum_k \frac{n_{Ek} M_k}{N_E} u_k
//!    = -\frac{1}{N_E}\sum_{k \in mantle} n_{Ek}\, \dot M^{b}_k $$
//!
//! where $e_{rk}$ is the exponent of species $k$ in reaction $r$, $R(k)$ the
//! reservoir of $k$, $n_{Ek}$ the number of atoms of element $E$ in $k$ and
//! $N_E = \sum_k n_{Ek} M_k$. The system is solved exactly with an LU
//! decomposition and $dM_k/dT = u_k M_k$.

use crate::erosion::BackgroundErosion;
use crate::moles::{
    insert_sums, remove_sums, MolesVector, UnwrappedMoles, WithSums, FE, FEO, MGO, N_CORE,
    N_MANTLE, N_SPECIES, O, SI, SIO2,
};
use crate::parameters::ReactionParameters;
use crate::partition::{PartitionCoefficient, Partitioning};
use crate::reservoir::{CoreReservoir, MantleReservoir};
use log::debug;
use mgsi_core::errors::{ExsolutionError, ExsolutionResult};
use mgsi_core::timeseries::FloatValue;
use nalgebra::{SMatrix, SVector};
use serde::{Deserialize, Serialize};

/// Number of equilibrium reactions
pub const N_REACTIONS: usize = 5;

/// Number of conserved elements
pub const N_ELEMENTS: usize = 4;

/// Exponents of each species in the equilibrium constants, one row per
/// reaction in the order MgO, SiO2, FeO, MgSiO3, FeSiO3
const REACTION_EXPONENTS: [[FloatValue; N_SPECIES]; N_REACTIONS] = [
    // Mg   Si   Fe   O    MgO  SiO2  FeO  MgSiO3 FeSiO3
    [1.0, 0.0, 0.0, 1.0, -1.0, 0.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 2.0, 0.0, -1.0, 0.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 1.0, 0.0, 0.0, -1.0, 0.0, 0.0],
    [0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 0.0, -1.0, 0.0],
    [0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 0.0, -1.0],
];

/// Atoms of Mg, Si, Fe and O in each species
const ELEMENT_STOICHIOMETRY: [[FloatValue; N_SPECIES]; N_ELEMENTS] = [
    // Mg   Si   Fe   O    MgO  SiO2  FeO  MgSiO3 FeSiO3
    [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0],
    [0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 1.0, 1.0],
    [0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 1.0],
    [0.0, 0.0, 0.0, 1.0, 1.0, 2.0, 1.0, 3.0, 3.0],
];

type LinearSystem = (
    SMatrix<FloatValue, N_SPECIES, N_SPECIES>,
    SVector<FloatValue, N_SPECIES>,
);

/// The Mg/Si/O reaction layer at the core-mantle boundary
///
/// Holds the layer configuration, the initial moles and the erosion
/// background. Nothing changes after construction, so every evaluation is a
/// pure function of its arguments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReactionLayer {
    parameters: ReactionParameters,
    partitioning: Partitioning,
    core: CoreReservoir,
    erosion: BackgroundErosion,
    moles_0: MolesVector,
}

impl ReactionLayer {
    /// Build the engine for a layer starting from `moles_0`
    ///
    /// The erosion background fills the layer with the background assemblage
    /// described by `parameters.background`.
    pub fn new(parameters: ReactionParameters, moles_0: MolesVector) -> ExsolutionResult<Self> {
        if !moles_0.is_non_negative() {
            return Err(ExsolutionError::Error(format!(
                "initial moles must be non-negative, got {:?}",
                moles_0.as_array()
            )));
        }

        let partitioning = Partitioning::from_parameters(parameters.partition.clone());
        let erosion =
            BackgroundErosion::new(&parameters.layer, parameters.background.clone(), &moles_0)?;

        Ok(Self {
            parameters,
            partitioning,
            core: CoreReservoir::new(),
            erosion,
            moles_0,
        })
    }

    /// Use the mantle part of `moles_b` as the erosion background
    pub fn with_background(self, moles_b: &MolesVector) -> Self {
        Self {
            erosion: self.erosion.with_background(moles_b.mantle()),
            ..self
        }
    }

    pub fn parameters(&self) -> &ReactionParameters {
        &self.parameters
    }

    pub fn moles_0(&self) -> &MolesVector {
        &self.moles_0
    }

    /// Background moles: the initial core and the background layer
    pub fn moles_b(&self) -> MolesVector {
        MolesVector::from_parts(self.moles_0.core(), *self.erosion.background())
    }

    pub fn core(&self) -> &CoreReservoir {
        &self.core
    }

    pub fn mantle(&self) -> &MantleReservoir {
        self.erosion.mantle()
    }

    pub fn erosion(&self) -> &BackgroundErosion {
        &self.erosion
    }

    /// K_D of MgO, SiO2 and FeO at the current core composition
    pub fn partition_coefficients(
        &self,
        moles: &MolesVector,
        t_cmb: FloatValue,
    ) -> [PartitionCoefficient; 3] {
        let pressure = self.parameters.layer.cmb_pressure;
        let x_si = moles.reservoir_fraction(SI);
        let x_o = moles.reservoir_fraction(O);

        [
            self.partitioning.kd_mgo(t_cmb, pressure),
            self.partitioning.kd_sio2(x_si, x_o, t_cmb, pressure),
            self.partitioning.kd_feo(t_cmb, pressure),
        ]
    }

    /// d(ln K)/dT for MgO, SiO2, FeO, MgSiO3 and FeSiO3
    pub fn dlnk_dt(&self, moles: &MolesVector, t_cmb: FloatValue) -> [FloatValue; N_REACTIONS] {
        let [mgo, sio2, feo] = self.partition_coefficients(moles, t_cmb);
        [
            mgo.dln_dt(),
            sio2.dln_dt(),
            feo.dln_dt(),
            self.parameters.layer.dlnk_dt_mgsio3,
            self.parameters.layer.dlnk_dt_fesio3,
        ]
    }

    /// See [`BackgroundErosion::dmi_b`]
    pub fn dmi_b(
        &self,
        moles: &MolesVector,
        dtdt: FloatValue,
    ) -> ExsolutionResult<[FloatValue; N_MANTLE]> {
        self.erosion.dmi_b(moles, dtdt)
    }

    /// See [`BackgroundErosion::dmi_dt_erode`]
    pub fn dmi_dt_erode(&self, moles: &MolesVector) -> ExsolutionResult<[FloatValue; N_MANTLE]> {
        self.erosion.dmi_dt_erode(moles)
    }

    /// Change of every species per kelvin of CMB temperature
    ///
    /// Returns `[Mg, Si, Fe, O, core, MgO, SiO2, FeO, MgSiO3, FeSiO3, mantle]`
    /// where `core` and `mantle` are the sums of their species. `dtdt` is the
    /// current CMB cooling rate (K/s) and only enters through erosion.
    ///
    /// A degenerate composition (an empty reservoir, for example) gives a
    /// singular system and NaN entries.
    pub fn dmoles_d_tcmb(
        &self,
        moles: &MolesVector,
        t_cmb: FloatValue,
        dtdt: FloatValue,
    ) -> ExsolutionResult<WithSums> {
        let dlnk_dt = self.dlnk_dt(moles, t_cmb);
        let dmi_b = self.dmi_b(moles, dtdt)?;
        let (matrix, rhs) = assemble(moles, &dlnk_dt, &dmi_b);

        let species = match matrix.lu().solve(&rhs) {
            Some(dln_moles) => std::array::from_fn(|k| dln_moles[k] * moles[k]),
            None => {
                debug!("Singular reaction system at T_cmb = {} K", t_cmb);
                [FloatValue::NAN; N_SPECIES]
            }
        };
        Ok(insert_sums(&species))
    }

    /// Time derivative of the moles vector, dM/dT * dT/dt
    pub fn dmoles_dt(
        &self,
        moles: &MolesVector,
        t_cmb: FloatValue,
        dtc_dt: FloatValue,
    ) -> ExsolutionResult<MolesVector> {
        let dmoles_dt = self.dmoles_d_tcmb(moles, t_cmb, dtc_dt)?;
        let mut species = remove_sums(&dmoles_dt);
        species.iter_mut().for_each(|v| *v *= dtc_dt);
        Ok(MolesVector::new(species))
    }

    /// Core Mg, Si and O moles that would be in equilibrium with the current
    /// layer at `t_cmb`
    ///
    /// Diagnostic only. Returns `(M_Mg_eq, M_Si_eq, M_O_eq)`.
    pub fn compute_moles_eq(
        &self,
        moles: &MolesVector,
        t_cmb: FloatValue,
    ) -> (FloatValue, FloatValue, FloatValue) {
        let [k_mgo, k_sio2, k_feo] = self.partition_coefficients(moles, t_cmb);
        let x = |k: usize| moles.reservoir_fraction(k);
        let m_c = moles.core_total();

        let x_mg = k_mgo.value * x(MGO) / x(O);
        let x_si = k_sio2.value * x(SIO2) / x(O).powi(2);
        let x_o = k_feo.value * x(FEO) / x(FE);

        (x_mg * m_c, x_si * m_c, x_o * m_c)
    }

    /// See [`MolesVector::unwrap`]
    pub fn unwrap_moles(
        &self,
        moles: &MolesVector,
        return_sum: bool,
        split_coremantle: bool,
    ) -> UnwrappedMoles {
        moles.unwrap(return_sum, split_coremantle)
    }
}

/// Build the differentiated equilibrium + conservation system in log-moles
fn assemble(
    moles: &MolesVector,
    dlnk_dt: &[FloatValue; N_REACTIONS],
    dmi_b: &[FloatValue; N_MANTLE],
) -> LinearSystem {
    let mut matrix = SMatrix::<FloatValue, N_SPECIES, N_SPECIES>::zeros();
    let mut rhs = SVector::<FloatValue, N_SPECIES>::zeros();
    let fractions: [FloatValue; N_SPECIES] = std::array::from_fn(|k| moles.reservoir_fraction(k));

    for (r, exponents) in REACTION_EXPONENTS.iter().enumerate() {
        let core_order: FloatValue = exponents[..N_CORE].iter().sum();
        let mantle_order: FloatValue = exponents[N_CORE..].iter().sum();

        for k in 0..N_SPECIES {
            let order = if k < N_CORE { core_order } else { mantle_order };
            matrix[(r, k)] = exponents[k] - fractions[k] * order;
        }
        rhs[r] = dlnk_dt[r];
    }

    for (e, atoms_per_species) in ELEMENT_STOICHIOMETRY.iter().enumerate() {
        let row = N_REACTIONS + e;
        let atoms: FloatValue = atoms_per_species
            .iter()
            .zip(moles.iter())
            .map(|(n, m)| n * m)
            .sum();

        for k in 0..N_SPECIES {
            matrix[(row, k)] = atoms_per_species[k] * moles[k] / atoms;
        }

        let eroded: FloatValue = atoms_per_species[N_CORE..]
            .iter()
            .zip(dmi_b.iter())
            .map(|(n, d)| n * d)
            .sum();
        rhs[row] = -eroded / atoms;
    }

    (matrix, rhs)
}

/// Atoms of Mg, Si, Fe and O in a species (or species-derivative) vector
pub fn element_totals(values: &[FloatValue; N_SPECIES]) -> [FloatValue; N_ELEMENTS] {
    std::array::from_fn(|e| {
        ELEMENT_STOICHIOMETRY[e]
            .iter()
            .zip(values.iter())
            .map(|(n, v)| n * v)
            .sum()
    })
}

/// Natural log of each reaction quotient, in the order of [`ReactionLayer::dlnk_dt`]
pub fn ln_reaction_quotients(moles: &MolesVector) -> [FloatValue; N_REACTIONS] {
    let ln_x: [FloatValue; N_SPECIES] = std::array::from_fn(|k| moles.reservoir_fraction(k).ln());
    std::array::from_fn(|r| {
        REACTION_EXPONENTS[r]
            .iter()
            .zip(ln_x.iter())
            .map(|(e, l)| e * l)
            .sum()
    })
}
