//! sensor.rs — sensor front-end: detection decision and measurement
//!
//! spec.md §4.5 and the `Sensor` data model in spec.md §3. Detection is
//! probabilistic and amplitude-binned with saturation; measurement is one
//! function per measurand, each adding systematic + arbitrary error on top
//! of the true value (plus, for amplitude/TOA, the geometry-dependent
//! terms spec.md §4.5 specifies).

use crate::error::{SimError, SimResult};
use crate::error_model::ErrorPair;
use crate::kinematics::Trajectory;
use crate::units::SPEED_OF_LIGHT;
use rand::Rng;

/// Detection bins: `level` in dB, `probability` already normalized to
/// [0,1] (config.rs converts the wire-format percentages).
#[derive(Debug, Clone)]
pub struct DetectionLevels {
    pub level: Vec<f64>,
    pub probability: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct SensorErrors {
    pub amplitude_error: ErrorPair,
    pub toa_error: ErrorPair,
    pub frequency_error: ErrorPair,
    pub pulse_width_error: ErrorPair,
    pub aoa_error: ErrorPair,
}

/// Fully resolved sensor configuration (after config.rs has parsed every
/// value-and-unit string and validated its dimension).
#[derive(Debug, Clone)]
pub struct RawSensorConfig {
    pub name: String,
    pub start_position: [f64; 2],
    pub velocity: [f64; 2],
    pub start_time: f64,
    pub saturation_level: f64,
    pub detection_probability: DetectionLevels,
    pub errors: SensorErrors,
}

pub struct Sensor {
    pub name: String,
    pub trajectory: Trajectory,
    pub saturation_level_db: f64,
    pub detection_levels: Vec<f64>,
    pub detection_probabilities: Vec<f64>,
    pub errors: SensorErrors,
}

impl Sensor {
    pub fn build(cfg: &RawSensorConfig, end_time: f64, time_step: f64) -> SimResult<Self> {
        if cfg.detection_probability.level.len() != cfg.detection_probability.probability.len() {
            return Err(SimError::config(
                &cfg.name,
                "detection_probability",
                "level and probability arrays must have equal length",
            ));
        }
        for p in &cfg.detection_probability.probability {
            if !(0.0..=1.0).contains(p) {
                return Err(SimError::config(
                    &cfg.name,
                    "detection_probability.probability",
                    format!("probability {p} out of [0,1]"),
                ));
            }
        }
        let trajectory = Trajectory::tabulate(
            (cfg.start_position[0], cfg.start_position[1]),
            end_time,
            time_step,
            (cfg.velocity[0], cfg.velocity[1]),
            cfg.start_time,
        );
        Ok(Sensor {
            name: cfg.name.clone(),
            trajectory,
            saturation_level_db: cfg.saturation_level,
            detection_levels: cfg.detection_probability.level.clone(),
            detection_probabilities: cfg.detection_probability.probability.clone(),
            errors: cfg.errors.clone(),
        })
    }

    pub fn position_at(&self, t: f64) -> (f64, f64) {
        self.trajectory.position_at(t)
    }

    /// `detect(amplitude)` — spec.md §4.5. Amplitude above saturation
    /// always detects; otherwise walk bins in declared order, first match
    /// wins.
    pub fn detect(&self, amplitude_db: f64, rng: &mut impl Rng) -> bool {
        if amplitude_db > self.saturation_level_db {
            return true;
        }
        for (level, prob) in self.detection_levels.iter().zip(self.detection_probabilities.iter()) {
            if amplitude_db > *level {
                return rng.gen::<f64>() < *prob;
            }
        }
        false
    }

    /// `measured = P0_dB - 20*log10(r/meter) + P_theta + syst(t) + arb` —
    /// spec.md §4.5. `p0_db` is the radar's reference power (absorbed from
    /// `power: watts` by the caller, see radar.rs).
    pub fn measure_amplitude(&self, p0_db: f64, range_m: f64, p_theta_db: f64, t: f64, rng: &mut impl Rng) -> f64 {
        let path_loss_db = 20.0 * range_m.max(1e-9).log10();
        let err = self.errors.amplitude_error.eval_combined(t, rng);
        p0_db - path_loss_db + p_theta_db + err
    }

    /// `measured = true_toa + r/c + syst(t) + arb` — spec.md §4.5.
    pub fn measure_toa(&self, true_toa: f64, range_m: f64, t: f64, rng: &mut impl Rng) -> f64 {
        let prop_delay = range_m / SPEED_OF_LIGHT.get();
        let err = self.errors.toa_error.eval_combined(t, rng);
        true_toa + prop_delay + err
    }

    pub fn measure_frequency(&self, true_frequency_hz: f64, t: f64, rng: &mut impl Rng) -> f64 {
        true_frequency_hz + self.errors.frequency_error.eval_combined(t, rng)
    }

    pub fn measure_pulse_width(&self, true_pw_s: f64, t: f64, rng: &mut impl Rng) -> f64 {
        true_pw_s + self.errors.pulse_width_error.eval_combined(t, rng)
    }

    /// AOA measured in degrees, per spec.md §4.5 ("AOA returned in degrees").
    pub fn measure_aoa(&self, true_aoa_deg: f64, t: f64, rng: &mut impl Rng) -> f64 {
        true_aoa_deg + self.errors.aoa_error.eval_combined(t, rng)
    }
}
