//! pdw.rs — the PDW generator
//!
//! spec.md §4.7. Per (sensor, radar, tick) computes geometry, finds every
//! pulse falling in the current tick window, and turns each one that the
//! sensor detects into a `PDW` record.

use crate::radar::Radar;
use crate::sensor::Sensor;
use rand::Rng;

/// One emitted-and-detected pulse, spec.md §3.
#[derive(Debug, Clone, PartialEq)]
pub struct Pdw {
    pub time_emitted: f64,
    pub sensor_id: String,
    pub radar_id: String,
    pub toa: f64,
    pub amplitude: f64,
    pub frequency: f64,
    pub pulse_width: f64,
    pub aoa: f64,
}

/// Evaluate radar `r` against sensor `s` at tick `t`, appending one `Pdw`
/// per detected pulse found in `[t, t+tick_window)` to `out`, in emission
/// order (spec.md §4.7, §5 tie-break rule).
pub fn generate_pdws(sensor: &Sensor, radar: &Radar, t: f64, tick_window: f64, rng: &mut impl Rng, out: &mut Vec<Pdw>) {
    let (rx, ry) = radar.position_at(t);
    let (sx, sy) = sensor.position_at(t);
    let dx = sx - rx;
    let dy = sy - ry;
    let range_m = (dx * dx + dy * dy).sqrt();
    let aoa_rad = dy.atan2(dx);

    for idx in radar.pulses_in_window(t, tick_window) {
        let pulse_time = radar.pulse_times[idx];

        let boresight = radar.boresight_at(pulse_time);
        let bearing = crate::units::Radians::new(aoa_rad - boresight.get()).wrap();
        let p_theta_db = radar.lobe_pattern.gain(bearing, crate::units::Radians::new(0.0)).get();

        let true_amplitude_db = p_theta_db;
        let true_toa = pulse_time + range_m / crate::units::SPEED_OF_LIGHT.get();
        let true_frequency_hz = radar.frequencies[idx];
        let true_pulse_width_s = radar.pulse_widths[idx];
        let true_aoa_deg = aoa_rad.to_degrees();

        if !sensor.detect(true_amplitude_db, rng) {
            continue;
        }

        let amplitude = sensor.measure_amplitude(radar.p0_db(), range_m, p_theta_db, t, rng);
        let toa = sensor.measure_toa(true_toa, range_m, t, rng);
        let frequency = sensor.measure_frequency(true_frequency_hz, t, rng);
        let pulse_width = sensor.measure_pulse_width(true_pulse_width_s, t, rng);
        let aoa = sensor.measure_aoa(true_aoa_deg, t, rng);

        out.push(Pdw {
            time_emitted: pulse_time,
            sensor_id: sensor.name.clone(),
            radar_id: radar.name.clone(),
            toa,
            amplitude,
            frequency,
            pulse_width,
            aoa,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_model::ErrorModel;
    use crate::error_model::ErrorPair;
    use crate::kinematics::RotationSpec;
    use crate::lobe::LobePattern;
    use crate::modulation::{PriSpec, ValueSpec};
    use crate::radar::RawRadarConfig;
    use crate::sensor::{DetectionLevels, RawSensorConfig, SensorErrors};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn zero_pair() -> ErrorPair {
        ErrorPair {
            systematic: ErrorModel::Constant { value: 0.0 },
            arbitrary: ErrorModel::Constant { value: 0.0 },
        }
    }

    fn s1_radar() -> Radar {
        let cfg = RawRadarConfig {
            name: "R1".into(),
            start_position: [0.0, 0.0],
            velocity: [0.0, 0.0],
            start_time: 0.0,
            power: 1000.0,
            rotation: RotationSpec::Constant {
                t0: 0.0,
                alpha0: 0.0,
                t_rot: 2.5,
            },
            pri: PriSpec::Fixed { value: 1e-3 },
            frequency: ValueSpec::Fixed { value: 10e9 },
            pulse_width: ValueSpec::Fixed { value: 1e-6 },
            lobe_pattern: LobePattern::Sinc {
                theta_ml_deg: 10.0,
                p_ml_db: 0.0,
                p_bl_db: -20.0,
            },
        };
        let mut rng = StdRng::seed_from_u64(0);
        Radar::build(&cfg, 0.0, 0.01, 1e-3, &mut rng).unwrap()
    }

    fn s1_sensor() -> Sensor {
        let cfg = RawSensorConfig {
            name: "S1".into(),
            start_position: [1000.0, 0.0],
            velocity: [0.0, 0.0],
            start_time: 0.0,
            saturation_level: f64::INFINITY,
            detection_probability: DetectionLevels {
                level: vec![f64::NEG_INFINITY],
                probability: vec![1.0],
            },
            errors: SensorErrors {
                amplitude_error: zero_pair(),
                toa_error: zero_pair(),
                frequency_error: zero_pair(),
                pulse_width_error: zero_pair(),
                aoa_error: zero_pair(),
            },
        };
        Sensor::build(&cfg, 0.01, 1e-3).unwrap()
    }

    #[test]
    fn stationary_scenario_yields_ten_pdws_with_expected_toa() {
        let radar = s1_radar();
        let sensor = s1_sensor();
        let mut rng = StdRng::seed_from_u64(0);
        let mut pdws = Vec::new();
        for i in 0..=10 {
            let t = i as f64 * 1e-3;
            generate_pdws(&sensor, &radar, t, 1e-3, &mut rng, &mut pdws);
        }
        assert_eq!(pdws.len(), 10);
        for pdw in &pdws {
            let expected_delay = 1000.0 / crate::units::SPEED_OF_LIGHT.get();
            assert!((pdw.toa - pdw.time_emitted - expected_delay).abs() < 1e-9);
        }
    }

    #[test]
    fn no_pulse_in_window_yields_nothing() {
        let radar = s1_radar();
        let sensor = s1_sensor();
        let mut rng = StdRng::seed_from_u64(0);
        let mut pdws = Vec::new();
        generate_pdws(&sensor, &radar, 0.5e-3, 0.2e-3, &mut rng, &mut pdws);
        assert!(pdws.is_empty());
    }
}
