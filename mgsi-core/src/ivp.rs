//! Adapters between model components and the `ode_solvers` integrators.
//!
//! Components describe their right-hand side through [`IVP`]; [`IVPBuilder`]
//! wraps a component into an `ode_solvers` system and hands back a configured
//! stepper.

use crate::errors::{ExsolutionError, ExsolutionResult};
use crate::timeseries::{FloatValue, Time};
use is_close::is_close;
use nalgebra::SVector;
use ode_solvers::dop_shared::{SolverResult, System};
use ode_solvers::dopri5::Dopri5;
use ode_solvers::rk4::Rk4;
use std::sync::Arc;

/// An initial value problem `dy/dt = f(t, y)`
pub trait IVP<T, S> {
    fn calculate_dy_dt(&self, t: T, y: &S, dy_dt: &mut S);
}

/// `ode_solvers` system backed by an [`IVP`] component
pub struct IVPSolver<C> {
    component: Arc<C>,
}

impl<C, const D: usize> System<Time, SVector<FloatValue, D>> for IVPSolver<C>
where
    C: IVP<Time, SVector<FloatValue, D>>,
{
    fn system(&self, t: Time, y: &SVector<FloatValue, D>, dy: &mut SVector<FloatValue, D>) {
        self.component.calculate_dy_dt(t, y, dy)
    }
}

pub struct IVPBuilder<C, S> {
    component: Arc<C>,
    pub y0: S,
}

impl<C, const D: usize> IVPBuilder<C, SVector<FloatValue, D>>
where
    C: IVP<Time, SVector<FloatValue, D>>,
{
    pub fn new(component: Arc<C>, y0: SVector<FloatValue, D>) -> Self {
        Self { component, y0 }
    }

    /// Fixed-step fourth order Runge-Kutta
    pub fn to_rk4(
        self,
        t0: Time,
        t1: Time,
        step: Time,
    ) -> Rk4<Time, SVector<FloatValue, D>, IVPSolver<C>> {
        let solver = IVPSolver {
            component: self.component,
        };
        Rk4::new(solver, t0, self.y0, t1, step)
    }

    /// Adaptive Dormand-Prince 5(4) with dense output every `dx`
    pub fn to_dopri5(
        self,
        t0: Time,
        t1: Time,
        dx: Time,
        rtol: FloatValue,
        atol: FloatValue,
    ) -> Dopri5<Time, SVector<FloatValue, D>, IVPSolver<C>> {
        let solver = IVPSolver {
            component: self.component,
        };
        Dopri5::new(solver, t0, t1, dx, self.y0, rtol, atol)
    }
}

/// Final state of an integration, checking that the solver reached `t_expected`
pub fn get_last_step<V>(results: &SolverResult<Time, V>, t_expected: Time) -> ExsolutionResult<&V> {
    let (t, y) = results.get();
    match (t.last(), y.last()) {
        (Some(t_last), Some(y_last)) if is_close!(*t_last, t_expected) => Ok(y_last),
        (Some(t_last), _) => Err(ExsolutionError::IntegrationFailed {
            time: *t_last,
            reason: format!("solver stopped before reaching t={}", t_expected),
        }),
        _ => Err(ExsolutionError::IntegrationFailed {
            time: t_expected,
            reason: "solver produced no output".to_string(),
        }),
    }
}
