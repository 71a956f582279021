//! Physics components for the Mg/Si/O exsolution model
//!
//! This crate provides the pieces that together describe a thin reactive
//! layer at the core-mantle boundary (CMB) exchanging Mg, Si and O with a
//! cooling iron core.
//!
//! # Module Organisation
//!
//! - `moles`: layout of the molar abundance vector
//! - `reservoir`: species lists of the core and of the mantle reaction layer
//! - `partition`: temperature-dependent equilibrium partition coefficients
//! - `erosion`: relaxation of the layer toward the background mantle
//! - `reactions`: the reaction-layer derivative engine
//! - `initial`: equilibrium initial composition of the layer
//! - `thermal`: parameterised core/mantle thermal evolution
//! - `radiogenic`: radiogenic heat production
//!
//! # Parameters
//!
//! Each component has an associated parameters struct in the `parameters`
//! module with defaults for an Earth-like planet.

pub mod constants;
pub mod erosion;
pub mod initial;
pub mod moles;
pub mod parameters;
pub mod partition;
pub mod radiogenic;
pub mod reactions;
pub mod reservoir;
pub mod thermal;
