//! modulation.rs — pulse-train modulation families
//!
//! spec.md §4.2. Four families (fixed / stagger / switched / jitter),
//! applied independently to PRI, frequency, and pulse width. Each produces
//! a finite, time-indexed sequence; for PRI the sequence is the emission
//! *times* (strictly increasing), for frequency/pulse-width it is one value
//! per pulse index.

use crate::error::{SimError, SimResult};
use rand::Rng;
use rand_distr::{Distribution, Uniform};
use serde::Deserialize;

/// Modulation parameters for the PRI (timing) axis, spec.md §4.2 table.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PriSpec {
    Fixed {
        value: f64,
    },
    Stagger {
        pattern: Vec<f64>,
    },
    Switched {
        pattern: Vec<f64>,
        repetitions: Vec<u32>,
    },
    Jitter {
        mean: f64,
        pct: f64,
    },
}

/// Modulation parameters for a per-pulse value axis (frequency or pulse
/// width): same four families, but sequencing *values* rather than
/// intervals between emission times.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ValueSpec {
    Fixed {
        value: f64,
    },
    Stagger {
        pattern: Vec<f64>,
    },
    Switched {
        pattern: Vec<f64>,
        repetitions: Vec<u32>,
    },
    Jitter {
        mean: f64,
        pct: f64,
    },
}

impl PriSpec {
    fn validate(&self) -> SimResult<()> {
        match self {
            PriSpec::Fixed { value } if *value <= 0.0 => Err(SimError::invariant(format!(
                "fixed PRI value must be positive, got {value}"
            ))),
            PriSpec::Stagger { pattern } if pattern.is_empty() => {
                Err(SimError::invariant("stagger PRI pattern must be non-empty"))
            }
            PriSpec::Switched { pattern, repetitions } if pattern.is_empty() || pattern.len() != repetitions.len() => {
                Err(SimError::invariant(
                    "switched PRI pattern and repetitions must be non-empty and have equal length",
                ))
            }
            PriSpec::Jitter { mean, .. } if *mean <= 0.0 => {
                Err(SimError::invariant(format!("jitter PRI mean must be positive, got {mean}")))
            }
            _ => Ok(()),
        }
    }

    /// Generate a strictly increasing sequence of emission times, the first
    /// one interval after `start_time`, stopping at the first emission
    /// strictly greater than `end_time` (spec.md §4.2, "Generation
    /// stops..."; spec.md §8 property 2's S1 scenario implies the radar's
    /// own `start_time` is not itself a pulse).
    ///
    /// For `Stagger`/`Switched` the pattern cycle is primed one position
    /// back (ending at the last pattern slot) before the loop starts, so the
    /// interval consumed for the `start_time -> pulse_times[0]` gap sits
    /// *before* the cycle rather than at its head. That makes the returned
    /// `pulse_times[i+1] - pulse_times[i]` sequence equal `pattern[i %
    /// pattern.len()]` directly (spec.md §8 property 3), instead of shifted
    /// by one relative to it.
    pub fn generate_pulse_times(&self, start_time: f64, end_time: f64, rng: &mut impl Rng) -> SimResult<Vec<f64>> {
        self.validate()?;
        let mut times = Vec::new();
        let mut t = start_time;
        let mut cycle_index: usize = match self {
            PriSpec::Stagger { pattern } => pattern.len() - 1,
            PriSpec::Switched { pattern, .. } => pattern.len() - 1,
            _ => 0,
        };
        let mut switched_remaining = match self {
            PriSpec::Switched { repetitions, .. } => repetitions[repetitions.len() - 1],
            _ => 0,
        };

        loop {
            let interval = match self {
                PriSpec::Fixed { value } => *value,
                PriSpec::Stagger { pattern } => {
                    let v = pattern[cycle_index % pattern.len()];
                    cycle_index += 1;
                    v
                }
                PriSpec::Switched { pattern, repetitions } => {
                    if switched_remaining == 0 {
                        cycle_index = (cycle_index + 1) % pattern.len();
                        switched_remaining = repetitions[cycle_index];
                    }
                    switched_remaining = switched_remaining.saturating_sub(1);
                    pattern[cycle_index]
                }
                PriSpec::Jitter { mean, pct } => {
                    let lo = mean * (1.0 - pct / 100.0);
                    let hi = mean * (1.0 + pct / 100.0);
                    Uniform::new_inclusive(lo, hi).sample(rng)
                }
            };
            let next = t + interval;
            if next > end_time {
                break;
            }
            times.push(next);
            t = next;
        }
        Ok(times)
    }
}

impl ValueSpec {
    fn validate(&self) -> SimResult<()> {
        match self {
            ValueSpec::Stagger { pattern } if pattern.is_empty() => {
                Err(SimError::invariant("stagger value pattern must be non-empty"))
            }
            ValueSpec::Switched { pattern, repetitions } if pattern.len() != repetitions.len() => Err(
                SimError::invariant("switched value pattern and repetitions must have equal length"),
            ),
            _ => Ok(()),
        }
    }

    /// Generate `count` per-pulse values (same family rule as PRI, but
    /// values instead of intervals — spec.md §4.2).
    pub fn generate_values(&self, count: usize, rng: &mut impl Rng) -> SimResult<Vec<f64>> {
        self.validate()?;
        let mut out = Vec::with_capacity(count);
        let mut cycle_index: usize = 0;
        let mut switched_remaining = match self {
            ValueSpec::Switched { repetitions, .. } => repetitions.first().copied().unwrap_or(1),
            _ => 0,
        };
        for _ in 0..count {
            let value = match self {
                ValueSpec::Fixed { value } => *value,
                ValueSpec::Stagger { pattern } => {
                    let v = pattern[cycle_index % pattern.len()];
                    cycle_index += 1;
                    v
                }
                ValueSpec::Switched { pattern, repetitions } => {
                    if switched_remaining == 0 {
                        cycle_index = (cycle_index + 1) % pattern.len();
                        switched_remaining = repetitions[cycle_index];
                    }
                    switched_remaining = switched_remaining.saturating_sub(1);
                    pattern[cycle_index]
                }
                ValueSpec::Jitter { mean, pct } => {
                    let lo = mean * (1.0 - pct / 100.0);
                    let hi = mean * (1.0 + pct / 100.0);
                    Uniform::new_inclusive(lo, hi).sample(rng)
                }
            };
            out.push(value);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn fixed_pri_has_exact_intervals() {
        let spec = PriSpec::Fixed { value: 1e-3 };
        let mut rng = StdRng::seed_from_u64(1);
        let times = spec.generate_pulse_times(0.0, 0.01, &mut rng).unwrap();
        for w in times.windows(2) {
            assert!((w[1] - w[0] - 1e-3).abs() < 1e-12);
        }
    }

    #[test]
    fn stagger_pri_cycles_pattern() {
        let pattern = vec![1e-3, 1.2e-3, 1.1e-3];
        let spec = PriSpec::Stagger { pattern: pattern.clone() };
        let mut rng = StdRng::seed_from_u64(1);
        let times = spec.generate_pulse_times(0.0, 0.02, &mut rng).unwrap();
        let diffs: Vec<f64> = times.windows(2).map(|w| w[1] - w[0]).collect();
        for (i, d) in diffs.iter().enumerate() {
            assert!((d - pattern[i % pattern.len()]).abs() < 1e-12);
        }
    }

    #[test]
    fn jitter_pri_stays_within_bounds() {
        let spec = PriSpec::Jitter { mean: 1e-3, pct: 10.0 };
        let mut rng = StdRng::seed_from_u64(42);
        let times = spec.generate_pulse_times(0.0, 1.0, &mut rng).unwrap();
        for w in times.windows(2) {
            let d = w[1] - w[0];
            assert!(d >= 0.9e-3 - 1e-12 && d <= 1.1e-3 + 1e-12);
        }
    }

    #[test]
    fn jitter_seed_is_deterministic() {
        let spec = PriSpec::Jitter { mean: 1e-3, pct: 10.0 };
        let mut rng1 = StdRng::seed_from_u64(7);
        let mut rng2 = StdRng::seed_from_u64(7);
        let t1 = spec.generate_pulse_times(0.0, 0.05, &mut rng1).unwrap();
        let t2 = spec.generate_pulse_times(0.0, 0.05, &mut rng2).unwrap();
        assert_eq!(t1, t2);
    }

    #[test]
    fn switched_pri_repeats_blocks() {
        let spec = PriSpec::Switched {
            pattern: vec![1e-3, 2e-3],
            repetitions: vec![2, 1],
        };
        let mut rng = StdRng::seed_from_u64(1);
        let times = spec.generate_pulse_times(0.0, 0.01, &mut rng).unwrap();
        let diffs: Vec<f64> = times.windows(2).map(|w| w[1] - w[0]).collect();
        // block: 1e-3, 1e-3, 2e-3, 1e-3, 1e-3, 2e-3, ...
        assert!((diffs[0] - 1e-3).abs() < 1e-12);
        assert!((diffs[1] - 1e-3).abs() < 1e-12);
        assert!((diffs[2] - 2e-3).abs() < 1e-12);
    }

    #[test]
    fn fixed_value_spec_repeats_constant() {
        let spec = ValueSpec::Fixed { value: 10e9 };
        let mut rng = StdRng::seed_from_u64(1);
        let values = spec.generate_values(5, &mut rng).unwrap();
        assert!(values.iter().all(|v| (*v - 10e9).abs() < 1e-6));
    }
}
