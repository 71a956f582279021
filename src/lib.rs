//! Thermochemical evolution of a core-mantle reaction layer
//!
//! A cooling iron core exsolves Mg, Si and O into a thin reactive layer at the
//! core-mantle boundary. This crate couples the reaction-layer chemistry of
//! [`mgsi_components::reactions`] to a parameterised thermal evolution and
//! integrates both over the age of the planet.
//!
//! ```no_run
//! use mgsi::{Planet, PlanetParameters};
//! use mgsi_core::timeseries::myr_to_seconds;
//!
//! let planet = Planet::from_parameters(PlanetParameters::default()).unwrap();
//! let history = planet.integrate(myr_to_seconds(4568.0), 500).unwrap();
//! println!("{:?}", history.inner_core_radius.latest_value());
//! ```

pub mod parameters;
pub mod planet;

pub use mgsi_components as components;
pub use mgsi_core::errors::{ExsolutionError, ExsolutionResult};
pub use parameters::{PlanetParameters, SolverOptions};
pub use planet::{Planet, PlanetHistory};
