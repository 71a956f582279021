use mgsi_core::timeseries::FloatValue;

/// Universal gas constant
/// unit: J / (mol K)
pub const GAS_CONSTANT: FloatValue = 8.314_462_618;

/// Reference temperature of the metal interaction parameters
/// unit: K
pub const INTERACTION_REFERENCE_TEMPERATURE: FloatValue = 1873.0;

/// Earth's core radius
/// unit: m
pub const EARTH_CORE_RADIUS: FloatValue = 3480e3;

/// Default pressure argument of the partition coefficient fits.
///
/// The fits divide the pressure by 1e6 before forming P/T, so this value
/// enters the fits as 139 (the CMB pressure in GPa).
pub const CMB_PRESSURE: FloatValue = 139e6;

/// Grams per kilogram
pub const G_PER_KG: FloatValue = 1e3;
