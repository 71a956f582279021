//! Coupled thermal and chemical evolution of a planet
//!
//! The state vector is
//!
//! `[T_cmb, T_mantle, M_Mg, M_Si, M_Fe, M_O, M_MgO, M_SiO2, M_FeO, M_MgSiO3, M_FeSiO3]`
//!
//! The thermal collaborator supplies the two temperature derivatives and the
//! reaction layer converts the CMB cooling rate into the moles derivatives.

use crate::parameters::{PlanetParameters, SolverOptions};
use log::{info, warn};
use mgsi_components::initial::InitialComposition;
use mgsi_components::moles::{MolesVector, N_SPECIES};
use mgsi_components::reactions::ReactionLayer;
use mgsi_components::thermal::ThermalEvolution;
use mgsi_core::errors::{ExsolutionError, ExsolutionResult};
use mgsi_core::ivp::{IVPBuilder, IVP};
use mgsi_core::timeseries::{seconds_to_gyr, FloatValue, Time, Timeseries};
use nalgebra::SVector;
use ndarray::Array1;
use std::sync::Arc;

pub const T_CMB: usize = 0;
pub const T_MANTLE: usize = 1;
/// Index of the first species in the state vector
pub const MOLES_OFFSET: usize = 2;
pub const N_STATE: usize = MOLES_OFFSET + N_SPECIES;

pub type PlanetState = SVector<FloatValue, N_STATE>;

/// Output of [`Planet::integrate`] on a regular time grid
#[derive(Debug, Clone)]
pub struct PlanetHistory {
    pub t_cmb: Timeseries,
    pub t_mantle: Timeseries,
    pub inner_core_radius: Timeseries,
    pub q_cmb: Timeseries,
    pub moles: Vec<MolesVector>,
}

impl PlanetHistory {
    pub fn len(&self) -> usize {
        self.moles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moles.is_empty()
    }

    pub fn time(&self) -> &Array1<Time> {
        self.t_cmb.time()
    }

    pub fn final_moles(&self) -> Option<&MolesVector> {
        self.moles.last()
    }
}

#[derive(Debug, Clone)]
pub struct Planet {
    thermal: ThermalEvolution,
    reactions: Option<ReactionLayer>,
    initial: InitialComposition,
    moles_0: MolesVector,
    solver: SolverOptions,
}

impl Planet {
    /// Build a planet, solving the initial layer composition if the reaction
    /// layer is enabled
    pub fn from_parameters(parameters: PlanetParameters) -> ExsolutionResult<Self> {
        let thermal = ThermalEvolution::from_parameters(parameters.thermal);
        let initial = parameters.initial;

        let (reactions, moles_0) = if parameters.reaction_layer {
            let core_mass = thermal.parameters().core_mass;
            let moles_0 = initial.solve(&parameters.reactions, core_mass)?;
            (Some(ReactionLayer::new(parameters.reactions, moles_0)?), moles_0)
        } else {
            (None, MolesVector::new([0.0; N_SPECIES]))
        };

        Ok(Self {
            thermal,
            reactions,
            initial,
            moles_0,
            solver: parameters.solver,
        })
    }

    pub fn thermal(&self) -> &ThermalEvolution {
        &self.thermal
    }

    pub fn reactions(&self) -> Option<&ReactionLayer> {
        self.reactions.as_ref()
    }

    pub fn moles_0(&self) -> &MolesVector {
        &self.moles_0
    }

    pub fn initial_state(&self) -> PlanetState {
        let mut y0 = PlanetState::zeros();
        y0[T_CMB] = self.initial.t_cmb;
        y0[T_MANTLE] = self.initial.t_mantle;
        for (k, m) in self.moles_0.iter().enumerate() {
            y0[MOLES_OFFSET + k] = *m;
        }
        y0
    }

    /// Integrate from formation to `t_end` (s), reporting `n_output` evenly
    /// spaced steps
    pub fn integrate(&self, t_end: Time, n_output: usize) -> ExsolutionResult<PlanetHistory> {
        let dx = t_end / n_output.max(1) as FloatValue;
        info!(
            "Integrating planet to {:.3} Gyr (T_cmb0 = {} K, reaction layer: {})",
            seconds_to_gyr(t_end),
            self.initial.t_cmb,
            self.reactions.is_some()
        );

        let builder = IVPBuilder::new(Arc::new(self.clone()), self.initial_state());
        let mut solver = builder.to_dopri5(0.0, t_end, dx, self.solver.rtol, self.solver.atol);

        if let Err(e) = solver.integrate() {
            let (t, _) = solver.results().get();
            return Err(ExsolutionError::IntegrationFailed {
                time: t.last().copied().unwrap_or(0.0),
                reason: e.to_string(),
            });
        }

        let (times, states) = solver.results().get();
        let history = self.history(times, states)?;

        info!(
            "Finished at {:.3} Gyr: T_cmb = {:?} K, r_i = {:?} m",
            seconds_to_gyr(times.last().copied().unwrap_or(0.0)),
            history.t_cmb.latest_value(),
            history.inner_core_radius.latest_value()
        );
        Ok(history)
    }

    fn history(&self, times: &[Time], states: &[PlanetState]) -> ExsolutionResult<PlanetHistory> {
        for (t, y) in times.iter().zip(states.iter()) {
            if let Some(index) = y.iter().position(|v| !v.is_finite()) {
                return Err(ExsolutionError::NonFiniteState { index, time: *t });
            }
        }

        let time = Array1::from(times.to_vec());
        let column = |f: &dyn Fn(&PlanetState) -> FloatValue| {
            Timeseries::from_values(states.iter().map(f).collect(), time.clone())
        };

        Ok(PlanetHistory {
            t_cmb: column(&|y: &PlanetState| y[T_CMB]),
            t_mantle: column(&|y: &PlanetState| y[T_MANTLE]),
            inner_core_radius: column(&|y: &PlanetState| self.thermal.inner_core_radius(y[T_CMB])),
            q_cmb: column(&|y: &PlanetState| self.thermal.cmb_heat_flow(y[T_CMB], y[T_MANTLE])),
            moles: states
                .iter()
                .map(|y| MolesVector::from_slice(&y.as_slice()[MOLES_OFFSET..]))
                .collect(),
        })
    }
}

impl IVP<Time, PlanetState> for Planet {
    fn calculate_dy_dt(&self, t: Time, y: &PlanetState, dy_dt: &mut PlanetState) {
        let rates = self.thermal.rates(t, y[T_CMB], y[T_MANTLE]);
        dy_dt[T_CMB] = rates.dtcmb_dt;
        dy_dt[T_MANTLE] = rates.dtmantle_dt;

        let dmoles_dt = match &self.reactions {
            Some(reactions) => {
                let moles = MolesVector::from_slice(&y.as_slice()[MOLES_OFFSET..]);
                match reactions.dmoles_dt(&moles, y[T_CMB], rates.dtcmb_dt) {
                    Ok(dmoles_dt) => dmoles_dt,
                    Err(e) => {
                        // NaN makes the stepper reject the step
                        warn!("Reaction layer failed at t = {} s: {}", t, e);
                        MolesVector::new([FloatValue::NAN; N_SPECIES])
                    }
                }
            }
            None => MolesVector::new([0.0; N_SPECIES]),
        };

        for (k, v) in dmoles_dt.iter().enumerate() {
            dy_dt[MOLES_OFFSET + k] = *v;
        }
    }
}
