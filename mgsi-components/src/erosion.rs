//! Erosion of the reaction layer toward the background mantle
//!
//! Overturn of the lowermost mantle continually replaces reaction-layer
//! material with background mantle. The exchange is modelled as a nonlinear
//! relaxation of each species toward its background abundance with timescale
//! $\tau$, plus a much faster relaxation of the total layer moles.
//!
//! Two background estimates exist side by side:
//!
//! - [`BackgroundErosion::dmi_b`] uses the background moles fixed when the
//!   erosion model is built and works per kelvin of CMB cooling.
//! - [`BackgroundErosion::dmi_dt_erode`] recomputes the background on every
//!   call from a running average of the initial and current Mg/(Mg+Fe) of the
//!   layer and works per second.
//!
//! They give different answers and are kept as distinct operations.

use crate::moles::{MolesVector, N_MANTLE};
use crate::parameters::{BackgroundParameters, LayerParameters};
use crate::reservoir::MantleReservoir;
use mgsi_core::errors::{ExsolutionError, ExsolutionResult};
use mgsi_core::timeseries::{FloatValue, Time};
use serde::{Deserialize, Serialize};

/// Speed-up of the total-moles relaxation relative to the per-species one
const TOTAL_RELAXATION_SPEEDUP: FloatValue = 100.0;

/// Signed nonlinear relaxation rate of `m_i` toward `m_i_0`
///
/// $$ \mathrm{sign}(M_0 - M)\frac{M_0}{\tau}
///    \left(\left(\frac{|M - M_0|}{M_0} + 1\right)^d - 1\right) $$
///
/// Zero when the two agree and otherwise of the same sign as `m_i_0 - m_i`.
pub fn erode_term(
    m_i: FloatValue,
    m_i_0: FloatValue,
    exponent: FloatValue,
    tau: Time,
) -> FloatValue {
    let deviation = (m_i - m_i_0).abs() / m_i_0;
    let magnitude = m_i_0 / tau * ((deviation + 1.0).powf(exponent) - 1.0);

    if m_i_0 > m_i {
        magnitude
    } else if m_i_0 < m_i {
        -magnitude
    } else {
        0.0
    }
}

/// Relaxation of the layer's mantle species toward a background composition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackgroundErosion {
    mantle: MantleReservoir,
    background: BackgroundParameters,
    overturn_time: Time,
    overturn_exponent: FloatValue,
    /// Background moles of the mantle species used by `dmi_b`
    moles_b: [FloatValue; N_MANTLE],
    /// Mg/(Mg+Fe) of the layer at the start of the run
    fraction_mgfe_0: FloatValue,
}

impl BackgroundErosion {
    /// Build the erosion model for a layer starting from `moles_0`
    ///
    /// The fixed background fills the whole layer mass with the background
    /// assemblage.
    pub fn new(
        layer: &LayerParameters,
        background: BackgroundParameters,
        moles_0: &MolesVector,
    ) -> ExsolutionResult<Self> {
        let mantle = MantleReservoir::new(layer.layer_mass());
        let moles_b = mantle.compute_mm_b(
            background.fraction_mgfe(),
            background.x_mgfeo,
            background.x_sio2,
            None,
        )?;

        Ok(Self {
            mantle,
            background,
            overturn_time: layer.overturn_time,
            overturn_exponent: layer.overturn_exponent,
            moles_b,
            fraction_mgfe_0: moles_0.mantle_fraction_mgfe(),
        })
    }

    /// Replace the fixed background moles
    pub fn with_background(self, moles_b: [FloatValue; N_MANTLE]) -> Self {
        Self { moles_b, ..self }
    }

    pub fn background(&self) -> &[FloatValue; N_MANTLE] {
        &self.moles_b
    }

    pub fn mantle(&self) -> &MantleReservoir {
        &self.mantle
    }

    /// Moles carried out of the layer per kelvin of CMB temperature change
    ///
    /// For each mantle species
    ///
    /// $$ -\frac{E(M_i, M_{b,i}, \tau)}{dT/dt}
    ///    - \frac{M_i}{M_m}\frac{E(M_m, M_{m,b}, \tau/100)}{dT/dt} $$
    ///
    /// where $E$ is [`erode_term`] and $M_m$ the total layer moles. The second
    /// term pulls the layer total toward the background total.
    ///
    /// A zero cooling rate has no per-kelvin meaning and is rejected with
    /// [`ExsolutionError::ZeroCoolingRate`].
    pub fn dmi_b(
        &self,
        moles: &MolesVector,
        dtdt: FloatValue,
    ) -> ExsolutionResult<[FloatValue; N_MANTLE]> {
        if dtdt == 0.0 {
            return Err(ExsolutionError::ZeroCoolingRate);
        }

        let mantle = moles.mantle();
        let m_m = moles.mantle_total();
        let m_m_b: FloatValue = self.moles_b.iter().sum();
        let total_term = erode_term(
            m_m,
            m_m_b,
            self.overturn_exponent,
            self.overturn_time / TOTAL_RELAXATION_SPEEDUP,
        );

        let mut out = [0.0; N_MANTLE];
        for (i, o) in out.iter_mut().enumerate() {
            let species_term = erode_term(
                mantle[i],
                self.moles_b[i],
                self.overturn_exponent,
                self.overturn_time,
            );
            *o = -species_term / dtdt - mantle[i] / m_m * total_term / dtdt;
        }
        Ok(out)
    }

    /// Background moles with a running-average Mg/(Mg+Fe)
    ///
    /// $$ f = w f_0 + (1 - w) f_{now} $$
    pub fn running_background(
        &self,
        moles: &MolesVector,
    ) -> ExsolutionResult<[FloatValue; N_MANTLE]> {
        let weight = self.background.background_weight;
        let fraction =
            weight * self.fraction_mgfe_0 + (1.0 - weight) * moles.mantle_fraction_mgfe();
        self.mantle
            .compute_mm_b(fraction, self.background.x_mgfeo, self.background.x_sio2, None)
    }

    /// Rate of change of each mantle species due to erosion, per second
    pub fn dmi_dt_erode(&self, moles: &MolesVector) -> ExsolutionResult<[FloatValue; N_MANTLE]> {
        let moles_b = self.running_background(moles)?;
        let mantle = moles.mantle();

        let mut out = [0.0; N_MANTLE];
        for (i, o) in out.iter_mut().enumerate() {
            *o = erode_term(mantle[i], moles_b[i], self.overturn_exponent, self.overturn_time);
        }
        Ok(out)
    }
}
