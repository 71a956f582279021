pub mod errors;
pub mod ivp;
pub mod molar;
pub mod species;
pub mod timeseries;
