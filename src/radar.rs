//! radar.rs — the Radar data model and its precomputed tables
//!
//! spec.md §3 `Radar`. All tables (trajectory, rotation, pulse_times,
//! frequencies, pulse_widths) are built once at scenario-construction time
//! and are thereafter read-only.

use crate::error::{SimError, SimResult};
use crate::kinematics::{RotationSpec, RotationTable, Trajectory};
use crate::lobe::LobePattern;
use crate::modulation::{PriSpec, ValueSpec};
use rand::Rng;

/// Fully resolved radar configuration (after config.rs has merged each
/// `*_type`/`*_params` wire pair into its tagged-enum counterpart).
#[derive(Debug, Clone)]
pub struct RawRadarConfig {
    pub name: String,
    pub start_position: [f64; 2],
    pub velocity: [f64; 2],
    pub start_time: f64,
    pub power: f64,
    pub rotation: RotationSpec,
    pub pri: PriSpec,
    pub frequency: ValueSpec,
    pub pulse_width: ValueSpec,
    pub lobe_pattern: LobePattern,
}

pub struct Radar {
    pub name: String,
    pub trajectory: Trajectory,
    pub rotation: RotationTable,
    pub pulse_times: Vec<f64>,
    pub frequencies: Vec<f64>,
    pub pulse_widths: Vec<f64>,
    pub lobe_pattern: LobePattern,
    pub power_watts: f64,
}

impl Radar {
    /// Build a `Radar` and all its precomputed tables, validating the
    /// invariants from spec.md §3: pulse_times strictly increasing, all
    /// three per-pulse arrays equal length, theta_ml > 0, P_bl <= P_ml.
    pub fn build(cfg: &RawRadarConfig, start_time: f64, end_time: f64, time_step: f64, rng: &mut impl Rng) -> SimResult<Self> {
        cfg.lobe_pattern.validate()?;

        let trajectory = Trajectory::tabulate(
            (cfg.start_position[0], cfg.start_position[1]),
            end_time,
            time_step,
            (cfg.velocity[0], cfg.velocity[1]),
            cfg.start_time,
        );
        let rotation = RotationTable::tabulate(start_time, end_time, time_step, &cfg.rotation);

        let pulse_times = cfg
            .pri
            .generate_pulse_times(start_time, end_time, rng)
            .map_err(|e| retag(&cfg.name, "pri", e))?;

        if pulse_times.windows(2).any(|w| w[1] <= w[0]) {
            return Err(SimError::config(
                &cfg.name,
                "pri",
                "generated pulse_times is not strictly increasing",
            ));
        }

        let n = pulse_times.len();
        let frequencies = cfg
            .frequency
            .generate_values(n, rng)
            .map_err(|e| retag(&cfg.name, "frequency", e))?;
        let pulse_widths = cfg
            .pulse_width
            .generate_values(n, rng)
            .map_err(|e| retag(&cfg.name, "pulse_width", e))?;

        if frequencies.len() != n || pulse_widths.len() != n {
            return Err(SimError::invariant(format!(
                "radar '{}': pulse_times/frequencies/pulse_widths length mismatch",
                cfg.name
            )));
        }

        Ok(Radar {
            name: cfg.name.clone(),
            trajectory,
            rotation,
            pulse_times,
            frequencies,
            pulse_widths,
            lobe_pattern: cfg.lobe_pattern.clone(),
            power_watts: cfg.power,
        })
    }

    pub fn position_at(&self, t: f64) -> (f64, f64) {
        self.trajectory.position_at(t)
    }

    pub fn boresight_at(&self, t: f64) -> crate::units::Radians {
        self.rotation.angle_at(t)
    }

    /// Reference power level for amplitude measurement, `10*log10(power_watts)`
    /// dBW — the `P0` spec.md §4.5 measures range/lobe loss relative to.
    pub fn p0_db(&self) -> f64 {
        10.0 * self.power_watts.max(1e-30).log10()
    }

    /// Index range of every pulse in the half-open tick window
    /// `[t, t+window)`, in emission order (spec.md §4.7 step 2, and the
    /// tie-break rule in §5: one PDW per pulse when several share a tick).
    pub fn pulses_in_window(&self, t: f64, window: f64) -> std::ops::Range<usize> {
        let lo = self.pulse_times.partition_point(|&pt| pt < t);
        let hi = self.pulse_times.partition_point(|&pt| pt < t + window);
        lo..hi
    }
}

fn retag(name: &str, field: &str, e: SimError) -> SimError {
    match e {
        SimError::InvariantViolation { message } => SimError::config(name, field, message),
        other => other,
    }
}
