//! Radiogenic heat production
//!
//! Heat production decays from its present-day value `hp` (at `tp`, the age
//! of the planet) as a sum of exponentials over the contributing isotopes:
//!
//! $$ H(t) = H_p \sum_i f_i \exp\left(\lambda_i (t_p - t)\right) $$
//!
//! with $f_i$ the present-day share of isotope $i$.

use mgsi_core::timeseries::{FloatValue, Time, SECONDS_PER_YEAR};

/// A heat-producing isotope
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Isotope {
    /// Share of the present-day heat production
    pub fraction: FloatValue,
    /// unit: 1 / yr
    pub decay_constant: FloatValue,
}

impl Isotope {
    /// unit: 1 / s
    pub fn decay_constant_per_second(&self) -> FloatValue {
        self.decay_constant / SECONDS_PER_YEAR
    }
}

/// U238, U235, Th232 and K40 in a chondritic mantle
pub const MANTLE_ISOTOPES: [Isotope; 4] = [
    Isotope {
        fraction: 0.372,
        decay_constant: 1.55e-10,
    },
    Isotope {
        fraction: 0.0164,
        decay_constant: 9.85e-10,
    },
    Isotope {
        fraction: 0.430,
        decay_constant: 4.95e-11,
    },
    Isotope {
        fraction: 0.181,
        decay_constant: 5.54e-10,
    },
];

/// K40 only
pub const CORE_ISOTOPES: [Isotope; 1] = [Isotope {
    fraction: 1.0,
    decay_constant: 5.54e-10,
}];

fn heat_production(isotopes: &[Isotope], hp: FloatValue, t: Time, tp: Time) -> FloatValue {
    hp * isotopes
        .iter()
        .map(|i| i.fraction * (i.decay_constant_per_second() * (tp - t)).exp())
        .sum::<FloatValue>()
}

/// Mantle heat production at time `t` (s) given `hp` at `tp` (s)
pub fn heat_production_mantle(hp: FloatValue, t: Time, tp: Time) -> FloatValue {
    heat_production(&MANTLE_ISOTOPES, hp, t, tp)
}

/// Core heat production at time `t` (s) given `hp` at `tp` (s)
pub fn heat_production_core(hp: FloatValue, t: Time, tp: Time) -> FloatValue {
    heat_production(&CORE_ISOTOPES, hp, t, tp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use is_close::is_close;
    use mgsi_core::timeseries::myr_to_seconds;

    #[test]
    fn test_present_day_value() {
        let tp = myr_to_seconds(4568.0);
        let fractions: FloatValue = MANTLE_ISOTOPES.iter().map(|i| i.fraction).sum();
        assert!(is_close!(heat_production_mantle(13e12, tp, tp), 13e12 * fractions));
        assert!(is_close!(heat_production_core(1e12, tp, tp), 1e12));
    }

    #[test]
    fn test_decays_over_time() {
        let tp = myr_to_seconds(4568.0);
        let early = heat_production_mantle(13e12, 0.0, tp);
        let late = heat_production_mantle(13e12, myr_to_seconds(3000.0), tp);
        assert!(early > late);
        assert!(late > 13e12 * 0.99);
    }

    #[test]
    fn test_k40_half_life() {
        let half_life = (2.0_f64).ln() / CORE_ISOTOPES[0].decay_constant; // yr
        let tp = myr_to_seconds(4568.0);
        let t = tp - half_life * SECONDS_PER_YEAR;
        assert_relative_eq!(heat_production_core(1.0, t, tp), 2.0, max_relative = 1e-10);
    }

    #[test]
    fn test_zero_present_day_production() {
        assert_eq!(heat_production_core(0.0, 0.0, myr_to_seconds(4568.0)), 0.0);
    }
}
