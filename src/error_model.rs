//! error_model.rs — systematic and arbitrary measurement error generators
//!
//! spec.md §4.4. Re-architected, per spec.md §9's "Error-model
//! polymorphism" note, as a tagged variant with a single evaluation
//! contract (`eval(t, rng) -> f64`) instead of the original's closures
//! returning values of varying shape. Callers never branch on kind.

use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::Deserialize;

/// Already-validated, correctly-dimensioned error model. Never deserialized
/// directly — `ErrorModelWire::resolve` is the only constructor outside of
/// tests, since a bare `f64` field can't carry the unit check the wire
/// format needs (see `ErrorModelWire` below).
#[derive(Debug, Clone)]
pub enum ErrorModel {
    Constant { value: f64 },
    Linear { base: f64, rate: f64 },
    Sinusoidal {
        amplitude: f64,
        frequency_hz: f64,
        phase_rad: f64,
    },
    Gaussian { sigma: f64 },
}

impl ErrorModel {
    /// Evaluate the error at time `t`. Deterministic variants are pure
    /// functions of time; Gaussian draws one sample per call from `rng`.
    pub fn eval(&self, t: f64, rng: &mut impl Rng) -> f64 {
        match self {
            ErrorModel::Constant { value } => *value,
            ErrorModel::Linear { base, rate } => base + rate * t,
            ErrorModel::Sinusoidal {
                amplitude,
                frequency_hz,
                phase_rad,
            } => amplitude * (std::f64::consts::TAU * frequency_hz * t + phase_rad).sin(),
            ErrorModel::Gaussian { sigma } => {
                if *sigma <= 0.0 {
                    0.0
                } else {
                    Normal::new(0.0, *sigma).expect("sigma > 0 checked above").sample(rng)
                }
            }
        }
    }
}

/// A (systematic, arbitrary) pair for one measurand, spec.md §3 `Sensor`.
/// Evaluated and summed as `eval_combined` — "Systematic and arbitrary
/// errors are added, with the same dimension as the measurand" (§4.4).
#[derive(Debug, Clone)]
pub struct ErrorPair {
    pub systematic: ErrorModel,
    pub arbitrary: ErrorModel,
}

impl ErrorPair {
    pub fn eval_combined(&self, t: f64, rng: &mut impl Rng) -> f64 {
        self.systematic.eval(t, rng) + self.arbitrary.eval(t, rng)
    }
}

/// Which measurand an `ErrorPair` perturbs — determines the unit a
/// value-and-unit wire field must carry, spec.md §6.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measurand {
    Amplitude,
    Toa,
    Frequency,
    PulseWidth,
    Aoa,
}

impl Measurand {
    fn expected_unit(self) -> &'static str {
        match self {
            Measurand::Amplitude => "db",
            Measurand::Toa => "s",
            Measurand::Frequency => "hz",
            Measurand::PulseWidth => "s",
            Measurand::Aoa => "deg",
        }
    }
}

/// Wire-format error model: spec.md §6's `"<value> <unit>"` string fields
/// (`error`, `rate`, `amplitude`) plus plain-numeric `frequency`/`phase`
/// for the sinusoidal family, matching the original's
/// `create_error_model`/`parse_value_and_unit` split (spec.md §9, Units).
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum ErrorModelWire {
    #[serde(rename = "constant")]
    Constant { error: String },
    #[serde(rename = "linear")]
    Linear { error: String, rate: String },
    #[serde(rename = "sinus")]
    Sinusoidal { amplitude: String, frequency: f64, phase: f64 },
    #[serde(rename = "gaussian")]
    Gaussian { error: String },
}

impl ErrorModelWire {
    /// Parse each value-and-unit string and check it against the unit
    /// expected for `measurand`; a mismatch is a `SimError::Unit`.
    pub fn resolve(&self, measurand: Measurand) -> crate::error::SimResult<ErrorModel> {
        let expected = measurand.expected_unit();
        Ok(match self {
            ErrorModelWire::Constant { error } => {
                let (value, unit) = check_unit(error, expected)?;
                ErrorModel::Constant { value }
            }
            ErrorModelWire::Linear { error, rate } => {
                let (base, _) = check_unit(error, expected)?;
                let (rate_value, _) = check_unit(rate, expected)?;
                ErrorModel::Linear { base, rate: rate_value }
            }
            ErrorModelWire::Sinusoidal {
                amplitude,
                frequency,
                phase,
            } => {
                let (amp, _) = check_unit(amplitude, expected)?;
                ErrorModel::Sinusoidal {
                    amplitude: amp,
                    frequency_hz: *frequency,
                    phase_rad: *phase,
                }
            }
            ErrorModelWire::Gaussian { error } => {
                let (sigma, _) = check_unit(error, expected)?;
                ErrorModel::Gaussian { sigma }
            }
        })
    }
}

fn check_unit(s: &str, expected: &str) -> crate::error::SimResult<(f64, String)> {
    let (value, unit) = crate::units::parse_value_and_unit(s)?;
    if !unit.is_empty() && unit.to_lowercase() != expected {
        return Err(crate::error::SimError::Unit {
            message: format!("expected unit '{expected}' for this measurand, got '{unit}' in '{s}'"),
        });
    }
    Ok((value, unit))
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorPairWire {
    pub systematic: ErrorModelWire,
    pub arbitrary: ErrorModelWire,
}

impl ErrorPairWire {
    pub fn resolve(&self, measurand: Measurand) -> crate::error::SimResult<ErrorPair> {
        Ok(ErrorPair {
            systematic: self.systematic.resolve(measurand)?,
            arbitrary: self.arbitrary.resolve(measurand)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn constant_is_time_invariant() {
        let m = ErrorModel::Constant { value: 2.5 };
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(m.eval(0.0, &mut rng), 2.5);
        assert_eq!(m.eval(100.0, &mut rng), 2.5);
    }

    #[test]
    fn linear_grows_with_rate() {
        let m = ErrorModel::Linear { base: 1.0, rate: 2.0 };
        let mut rng = StdRng::seed_from_u64(0);
        assert!((m.eval(3.0, &mut rng) - 7.0).abs() < 1e-12);
    }

    #[test]
    fn sinusoidal_is_periodic() {
        let m = ErrorModel::Sinusoidal {
            amplitude: 1.0,
            frequency_hz: 1.0,
            phase_rad: 0.0,
        };
        let mut rng = StdRng::seed_from_u64(0);
        let a = m.eval(0.25, &mut rng);
        let b = m.eval(1.25, &mut rng);
        assert!((a - b).abs() < 1e-9);
    }

    #[test]
    fn gaussian_empirical_std_matches_sigma() {
        let m = ErrorModel::Gaussian { sigma: 1e-9 };
        let mut rng = StdRng::seed_from_u64(123);
        let n = 10_000;
        let samples: Vec<f64> = (0..n).map(|_| m.eval(0.0, &mut rng)).collect();
        let mean: f64 = samples.iter().sum::<f64>() / n as f64;
        let var: f64 = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n as f64;
        let std = var.sqrt();
        assert!((std - 1e-9).abs() / 1e-9 < 0.05);
    }

    #[test]
    fn systematic_and_arbitrary_are_summed() {
        let pair = ErrorPair {
            systematic: ErrorModel::Constant { value: 1.0 },
            arbitrary: ErrorModel::Constant { value: 2.0 },
        };
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(pair.eval_combined(0.0, &mut rng), 3.0);
    }

    #[test]
    fn wire_constant_parses_matching_unit() {
        let wire = ErrorModelWire::Constant { error: "0.1 dB".into() };
        let resolved = wire.resolve(Measurand::Amplitude).unwrap();
        match resolved {
            ErrorModel::Constant { value } => assert_eq!(value, 0.1),
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn wire_rejects_mismatched_unit() {
        let wire = ErrorModelWire::Constant { error: "0.1 Hz".into() };
        assert!(wire.resolve(Measurand::Amplitude).is_err());
    }

    #[test]
    fn wire_accepts_unitless_value() {
        let wire = ErrorModelWire::Constant { error: "0.1".into() };
        assert!(wire.resolve(Measurand::Amplitude).is_ok());
    }
}
