//! scenario.rs — the scenario driver
//!
//! spec.md §4.6 and the `Scenario` data model in spec.md §3. Holds the
//! radar/sensor population and the single mutable `current_time` field,
//! and steps time forward, invoking the PDW generator for every
//! (sensor, radar) pair at each tick and forwarding the results to a sink.

use crate::error::{SimError, SimResult};
use crate::pdw::{Pdw, generate_pdws};
use crate::radar::Radar;
use crate::sensor::Sensor;
use rand::rngs::StdRng;

pub struct Scenario {
    pub start_time: f64,
    pub end_time: f64,
    pub time_step: f64,
    pub current_time: f64,
    pub tick_window: f64,
    pub radars: Vec<Radar>,
    pub sensors: Vec<Sensor>,
    rng: StdRng,
}

impl Scenario {
    /// Construct a scenario from already-built radars/sensors, checking the
    /// invariants of spec.md §3 (`end_time >= start_time`, `time_step > 0`).
    pub fn new(
        start_time: f64,
        end_time: f64,
        time_step: f64,
        tick_window: f64,
        radars: Vec<Radar>,
        sensors: Vec<Sensor>,
        rng: StdRng,
    ) -> SimResult<Self> {
        if end_time < start_time {
            return Err(SimError::config_global("end_time", "must be >= start_time"));
        }
        if time_step <= 0.0 {
            return Err(SimError::config_global("time_step", "must be > 0"));
        }
        Ok(Scenario {
            start_time,
            end_time,
            time_step,
            current_time: start_time,
            tick_window,
            radars,
            sensors,
            rng,
        })
    }

    pub fn radar_by_name(&self, name: &str) -> Option<&Radar> {
        self.radars.iter().find(|r| r.name == name)
    }

    pub fn sensor_by_name(&self, name: &str) -> Option<&Sensor> {
        self.sensors.iter().find(|s| s.name == name)
    }

    /// Advance one tick, appending every PDW generated at `current_time` to
    /// `out`, in the ordering guaranteed by spec.md §5: sensor iteration
    /// order, then radar iteration order, then pulse_time ascending.
    pub fn step(&mut self, out: &mut Vec<Pdw>) {
        let t = self.current_time;
        for sensor in &self.sensors {
            for radar in &self.radars {
                generate_pdws(sensor, radar, t, self.tick_window, &mut self.rng, out);
            }
        }
        self.current_time += self.time_step;
    }

    /// Same as `step`, but evaluates (sensor, radar) pairs in parallel and
    /// re-sorts the result by `(time_emitted, sensor_id, radar_id)` before
    /// returning — spec.md §5 permits this as long as the canonical order
    /// is restored once the pairs are merged. Not the default driver; only
    /// worth reaching for when the (sensor, radar) population is large,
    /// since each pair needs its own RNG substream seeded off the scenario
    /// root seed to stay reproducible.
    pub fn step_parallel(&mut self, seed_offset: &mut u64, out: &mut Vec<Pdw>) {
        use rand::SeedableRng;
        let t = self.current_time;
        let mut collected: Vec<Pdw> = self
            .sensors
            .iter()
            .enumerate()
            .flat_map(|(si, sensor)| {
                self.radars.iter().enumerate().map(move |(ri, radar)| (si, ri, sensor, radar))
            })
            .map(|(si, ri, sensor, radar)| {
                *seed_offset += 1;
                let mut substream = StdRng::seed_from_u64(seed_offset.wrapping_add((si as u64) << 32).wrapping_add(ri as u64));
                let mut local = Vec::new();
                generate_pdws(sensor, radar, t, self.tick_window, &mut substream, &mut local);
                local
            })
            .flatten()
            .collect();
        collected.sort_by(|a, b| {
            a.time_emitted
                .partial_cmp(&b.time_emitted)
                .unwrap()
                .then_with(|| a.sensor_id.cmp(&b.sensor_id))
                .then_with(|| a.radar_id.cmp(&b.radar_id))
        });
        out.extend(collected);
        self.current_time += self.time_step;
    }

    /// Drive the scenario to completion, appending every PDW to `out`.
    pub fn run(&mut self, out: &mut Vec<Pdw>) {
        while self.current_time <= self.end_time + 1e-9 {
            self.step(out);
        }
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

    fn zero_pair() -> ErrorPair {
        ErrorPair {
            systematic: ErrorModel::Constant { value: 0.0 },
            arbitrary: ErrorModel::Constant { value: 0.0 },
        }
    }

    fn build_s1() -> Scenario {
        let radar_cfg = RawRadarConfig {
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
        let sensor_cfg = RawSensorConfig {
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
        let mut rng = StdRng::seed_from_u64(0);
        let radar = Radar::build(&radar_cfg, 0.0, 0.01, 1e-3, &mut rng).unwrap();
        let sensor = Sensor::build(&sensor_cfg, 0.01, 1e-3).unwrap();
        Scenario::new(0.0, 0.01, 1e-3, 1e-3, vec![radar], vec![sensor], rng).unwrap()
    }

    #[test]
    fn s1_end_to_end_yields_ten_pdws() {
        let mut scenario = build_s1();
        let mut pdws = Vec::new();
        scenario.run(&mut pdws);
        assert_eq!(pdws.len(), 10);
        let c = 299_792_458.0_f64;
        for pdw in &pdws {
            assert!((pdw.toa - pdw.time_emitted - 1000.0 / c).abs() < 1e-9);
        }
    }

    #[test]
    fn rejects_end_time_before_start_time() {
        let rng = StdRng::seed_from_u64(0);
        let result = Scenario::new(1.0, 0.0, 1e-3, 1e-3, vec![], vec![], rng);
        assert!(result.is_err());
    }

    #[test]
    fn rejects_nonpositive_time_step() {
        let rng = StdRng::seed_from_u64(0);
        let result = Scenario::new(0.0, 1.0, 0.0, 1e-3, vec![], vec![], rng);
        assert!(result.is_err());
    }
}
