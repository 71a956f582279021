//! Planet configuration
//!
//! Everything a run needs is declared up front. The reaction layer is on
//! unless `reaction_layer = false` is set, in which case only the thermal
//! state evolves.
//!
//! ```toml
//! reaction_layer = true
//!
//! [initial]
//! t_cmb = 5700.0
//!
//! [reactions.layer]
//! layer_thickness = 100.0
//!
//! [solver]
//! rtol = 1e-6
//! ```

use mgsi_components::initial::InitialComposition;
use mgsi_components::parameters::{ReactionParameters, ThermalParameters};
use mgsi_core::errors::{ExsolutionError, ExsolutionResult};
use mgsi_core::timeseries::FloatValue;
use serde::{Deserialize, Serialize};

/// Tolerances of the adaptive integrator
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverOptions {
    /// Relative tolerance
    /// default: 1e-6
    pub rtol: FloatValue,

    /// Absolute tolerance, shared by temperatures (K) and moles
    /// default: 1e-3
    pub atol: FloatValue,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            rtol: 1e-6,
            atol: 1e-3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanetParameters {
    /// Evolve the reaction layer at the CMB
    ///
    /// When off the moles are held fixed and `reactions` is ignored.
    /// default: true
    pub reaction_layer: bool,
    pub thermal: ThermalParameters,
    pub initial: InitialComposition,
    pub reactions: ReactionParameters,
    pub solver: SolverOptions,
}

impl Default for PlanetParameters {
    fn default() -> Self {
        Self {
            reaction_layer: true,
            thermal: ThermalParameters::default(),
            initial: InitialComposition::default(),
            reactions: ReactionParameters::default(),
            solver: SolverOptions::default(),
        }
    }
}

impl PlanetParameters {
    pub fn from_toml_str(config: &str) -> ExsolutionResult<Self> {
        Ok(toml::from_str(config)?)
    }

    pub fn to_toml_string(&self) -> ExsolutionResult<String> {
        toml::to_string(self).map_err(|e| ExsolutionError::Error(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mgsi_core::timeseries::myr_to_seconds;

    #[test]
    fn test_default_has_reaction_layer() {
        let params = PlanetParameters::default();
        assert!(params.reaction_layer);
        assert_eq!(params.initial.t_cmb, 5700.0);
    }

    #[test]
    fn test_partial_toml() {
        let config = r#"
[initial]
x_o = 0.1

[reactions.layer]
layer_thickness = 250.0

[reactions.background]
mg_num_fp = 0.85
"#;
        let params = PlanetParameters::from_toml_str(config).unwrap();
        assert_eq!(params.initial.x_o, 0.1);
        assert_eq!(params.initial.x_si, 0.12);

        let reactions = params.reactions;
        assert_eq!(reactions.layer.layer_thickness, 250.0);
        assert_eq!(reactions.layer.layer_density, 5500.0);
        assert_eq!(reactions.background.mg_num_fp, 0.85);
        assert_eq!(reactions.background.mg_num_pv, 0.93);
        assert_eq!(reactions.partition.epsilon_si_si, 12.41);
    }

    #[test]
    fn test_empty_config_keeps_reaction_layer() {
        let params = PlanetParameters::from_toml_str("").unwrap();
        assert!(params.reaction_layer);
        assert_eq!(params.reactions.layer.layer_thickness, 100.0);

        let config = "[thermal]\ncore_heat_production = 1e12\n";
        let params = PlanetParameters::from_toml_str(config).unwrap();
        assert!(params.reaction_layer);
        assert_eq!(params.thermal.core_heat_production, 1e12);
    }

    #[test]
    fn test_reaction_layer_opt_out() {
        let params = PlanetParameters::from_toml_str("reaction_layer = false\n").unwrap();
        assert!(!params.reaction_layer);
    }

    #[test]
    fn test_toml_roundtrip() {
        let mut params = PlanetParameters::default();
        params.reactions.layer.set_overturn_time(myr_to_seconds(1e10));
        params.reaction_layer = false;

        let serialised = params.to_toml_string().unwrap();
        let deserialised = PlanetParameters::from_toml_str(&serialised).unwrap();

        let expected = params.reactions.layer.overturn_time;
        let actual = deserialised.reactions.layer.overturn_time;
        assert!((actual - expected).abs() <= 1e-12 * expected);
        assert!(!deserialised.reaction_layer);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let result = PlanetParameters::from_toml_str("[initial]\nt_cmb = \"hot\"\n");
        assert!(matches!(result, Err(ExsolutionError::Config(_))));
    }
}
