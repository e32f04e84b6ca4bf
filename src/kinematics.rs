//! kinematics.rs — trajectory and rotation-angle tabulation
//!
//! spec.md §4.1. Both tabulations are built once at scenario-construction
//! time (spec.md §3, "all Radar/Sensor precomputed tables are built once")
//! and looked up later via "largest tabulated t <= query" (spec.md §9,
//! Table lookups) — never interpolated.

use crate::units::{Radians, Seconds};
use serde::Deserialize;

/// One sample of a 2-D trajectory: (t, x, y) in seconds/meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectorySample {
    pub t: f64,
    pub x: f64,
    pub y: f64,
}

/// A time-indexed trajectory table, queried with "largest t <= query"
/// semantics (spec.md §9). Out-of-range queries hold the last value
/// (spec.md §4.7, Failure semantics).
#[derive(Debug, Clone)]
pub struct Trajectory {
    samples: Vec<TrajectorySample>,
}

impl Trajectory {
    /// `tabulate_trajectory` — spec.md §4.1.
    ///
    /// Produces samples at `t = start_time, start_time + time_step, ...`
    /// while `t <= end_time`. If velocity is zero the table still spans the
    /// interval with constant position.
    pub fn tabulate(
        start_pos: (f64, f64),
        end_time: f64,
        time_step: f64,
        velocity: (f64, f64),
        start_time: f64,
    ) -> Self {
        let mut samples = Vec::new();
        for s in seconds_range(Seconds::new(start_time), Seconds::new(end_time), Seconds::new(time_step)) {
            let t = s.get();
            let dt = t - start_time;
            samples.push(TrajectorySample {
                t,
                x: start_pos.0 + velocity.0 * dt,
                y: start_pos.1 + velocity.1 * dt,
            });
        }
        if samples.is_empty() {
            samples.push(TrajectorySample {
                t: start_time,
                x: start_pos.0,
                y: start_pos.1,
            });
        }
        Trajectory { samples }
    }

    /// Position at an arbitrary query time: "largest tabulated t <= query",
    /// holding the last value past the end of the table.
    pub fn position_at(&self, query_t: f64) -> (f64, f64) {
        let idx = self.index_at(query_t);
        let s = &self.samples[idx];
        (s.x, s.y)
    }

    fn index_at(&self, query_t: f64) -> usize {
        // partition_point finds the first index where `t > query_t`; the
        // sample we want is the one just before it.
        let split = self.samples.partition_point(|s| s.t <= query_t);
        split.saturating_sub(1).min(self.samples.len() - 1)
    }

    pub fn samples(&self) -> &[TrajectorySample] {
        &self.samples
    }
}

/// Rotation-type configuration for a radar, spec.md §3/§4.1.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RotationSpec {
    Constant {
        t0: f64,
        alpha0: f64,
        #[serde(rename = "T_rot")]
        t_rot: f64,
    },
    Variable {
        t0: f64,
        alpha0: f64,
        /// Piecewise-linear period schedule: (t_i, T_i) pairs.
        schedule: Vec<(f64, f64)>,
    },
}

/// One sample of the rotation-angle table: (t, angle_rad, period_s).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationSample {
    pub t: f64,
    pub angle_rad: f64,
    pub period_s: f64,
}

#[derive(Debug, Clone)]
pub struct RotationTable {
    samples: Vec<RotationSample>,
}

impl RotationTable {
    /// `tabulate_rotation` — spec.md §4.1.
    pub fn tabulate(start_time: f64, end_time: f64, time_step: f64, spec: &RotationSpec) -> Self {
        let tau = std::f64::consts::TAU;
        let mut samples = Vec::new();

        match spec {
            RotationSpec::Constant { t0, alpha0, t_rot } => {
                for s in seconds_range(Seconds::new(start_time), Seconds::new(end_time), Seconds::new(time_step)) {
                    let t = s.get();
                    let angle = (alpha0 + tau * (t - t0) / t_rot).rem_euclid(tau);
                    samples.push(RotationSample {
                        t,
                        angle_rad: angle,
                        period_s: *t_rot,
                    });
                }
            }
            RotationSpec::Variable { t0, alpha0, schedule } => {
                // Integrate d(angle)/dt = 2*pi / period(t) at time_step
                // granularity using the trapezoidal rule, per spec.md §4.1.
                let period_at = |t: f64| -> f64 { piecewise_linear(schedule, t) };
                let mut angle = alpha0.rem_euclid(tau);
                let mut prev_rate = tau / period_at(*t0);
                let mut prev_t = *t0;
                for s in seconds_range(Seconds::new(start_time), Seconds::new(end_time), Seconds::new(time_step)) {
                    let t = s.get();
                    if t > prev_t {
                        let rate = tau / period_at(t);
                        angle += 0.5 * (prev_rate + rate) * (t - prev_t);
                        angle = angle.rem_euclid(tau);
                        prev_rate = rate;
                        prev_t = t;
                    }
                    samples.push(RotationSample {
                        t,
                        angle_rad: angle,
                        period_s: period_at(t),
                    });
                }
            }
        }

        if samples.is_empty() {
            let (angle, period) = match spec {
                RotationSpec::Constant { alpha0, t_rot, .. } => (alpha0.rem_euclid(tau), *t_rot),
                RotationSpec::Variable { alpha0, schedule, .. } => {
                    (alpha0.rem_euclid(tau), piecewise_linear(schedule, start_time))
                }
            };
            samples.push(RotationSample {
                t: start_time,
                angle_rad: angle,
                period_s: period,
            });
        }

        RotationTable { samples }
    }

    /// Boresight angle at an arbitrary query time, "largest t <= query".
    pub fn angle_at(&self, query_t: f64) -> Radians {
        Radians::new(self.samples[self.index_at(query_t)].angle_rad)
    }

    fn index_at(&self, query_t: f64) -> usize {
        let split = self.samples.partition_point(|s| s.t <= query_t);
        split.saturating_sub(1).min(self.samples.len() - 1)
    }

    pub fn samples(&self) -> &[RotationSample] {
        &self.samples
    }
}

/// Evaluate a piecewise-linear schedule of (t_i, value_i) pairs at `t`,
/// holding the first/last value outside the schedule's range.
fn piecewise_linear(schedule: &[(f64, f64)], t: f64) -> f64 {
    if schedule.is_empty() {
        return 1.0;
    }
    if t <= schedule[0].0 {
        return schedule[0].1;
    }
    if t >= schedule[schedule.len() - 1].0 {
        return schedule[schedule.len() - 1].1;
    }
    for w in schedule.windows(2) {
        let (t0, v0) = w[0];
        let (t1, v1) = w[1];
        if t >= t0 && t <= t1 {
            if (t1 - t0).abs() < 1e-12 {
                return v0;
            }
            let frac = (t - t0) / (t1 - t0);
            return v0 + frac * (v1 - v0);
        }
    }
    schedule[schedule.len() - 1].1
}

/// Tick sequence `start, start+step, ...` while `t <= end`, counting steps
/// rather than repeatedly adding `step` to avoid float drift. Shared by
/// `Trajectory::tabulate` and `RotationTable::tabulate`.
pub fn seconds_range(start: Seconds, end: Seconds, step: Seconds) -> Vec<Seconds> {
    let mut out = Vec::new();
    let n = ((end.get() - start.get()) / step.get()).floor() as i64;
    for i in 0..=n.max(0) {
        let t = start.get() + i as f64 * step.get();
        if t > end.get() + 1e-9 {
            break;
        }
        out.push(Seconds::new(t));
    }
    out
}
