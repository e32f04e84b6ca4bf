//! config.rs — configuration document loading
//!
//! Implements the two-phase "parse, then validate-and-convert" split called
//! for by spec.md §9 (Units) and SPEC_FULL.md §3: a `RawDocument` mirrors
//! spec.md §6's YAML shape field-for-field (including the `*_type` /
//! `*_params` split and `"<value> <unit>"` strings), then `build_scenario`
//! merges and validates it into the strongly-typed `Scenario`.
//!
//! This mirrors the original `load_config` (`original_source/main.py`) but
//! as an explicit, fallible conversion rather than dynamic attribute access.

use crate::error::{SimError, SimResult};
use crate::error_model::{ErrorPairWire, Measurand};
use crate::kinematics::RotationSpec;
use crate::lobe::LobePattern;
use crate::modulation::{PriSpec, ValueSpec};
use crate::radar::{RawRadarConfig, Radar};
use crate::scenario::Scenario;
use crate::sensor::{DetectionLevels, RawSensorConfig, Sensor, SensorErrors};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use serde_yaml::Value as YamlValue;
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScenarioWire {
    pub start_time: f64,
    pub end_time: f64,
    pub time_step: f64,
    /// Root RNG seed for jitter/Gaussian draws (SPEC_FULL.md §3,
    /// "Determinism / seeding"). Defaults to 0 for reproducible runs when
    /// omitted.
    #[serde(default)]
    pub seed: u64,
    /// Overrides the default "all pulses in [t, t+time_step)" tick window
    /// (spec.md §9, Open Questions).
    #[serde(default)]
    pub pdw_tick_window: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RadarWire {
    pub name: String,
    pub start_position: [f64; 2],
    #[serde(default)]
    pub velocity: [f64; 2],
    #[serde(default)]
    pub start_time: f64,
    pub power: f64,
    pub rotation_type: String,
    pub rotation_params: YamlValue,
    pub pri_type: String,
    pub pri_params: YamlValue,
    pub frequency_type: String,
    pub frequency_params: YamlValue,
    pub pulse_width_type: String,
    pub pulse_width_params: YamlValue,
    pub lobe_pattern: LobePatternWire,
}

/// `lobe_pattern` is a single inline object (not a `type`/`params` split)
/// per spec.md §6 — only its internal `type` tag varies.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LobePatternWire(pub YamlValue);

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DetectionProbabilityWire {
    pub level: Vec<f64>,
    /// Percent, per spec.md §6 (`probability:[%,…]`).
    pub probability: Vec<f64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SensorWire {
    pub name: String,
    pub start_position: [f64; 2],
    #[serde(default)]
    pub velocity: [f64; 2],
    #[serde(default)]
    pub start_time: f64,
    pub saturation_level: f64,
    pub detection_probability: DetectionProbabilityWire,
    pub amplitude_error: ErrorPairWire,
    pub toa_error: ErrorPairWire,
    pub frequency_error: ErrorPairWire,
    pub pulse_width_error: ErrorPairWire,
    pub aoa_error: ErrorPairWire,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawDocument {
    pub scenario: ScenarioWire,
    #[serde(default)]
    pub radars: Vec<RadarWire>,
    #[serde(default)]
    pub sensors: Vec<SensorWire>,
}

/// Merge a `{type, params...}` wire pair into a serde-tagged enum `T` by
/// injecting the `type` discriminant into the params mapping, then
/// deserializing normally.
fn build_tagged<T: for<'de> Deserialize<'de>>(context: &str, field: &str, type_name: &str, params: &YamlValue) -> SimResult<T> {
    let mut mapping = match params {
        YamlValue::Mapping(m) => m.clone(),
        YamlValue::Null => serde_yaml::Mapping::new(),
        other => {
            return Err(SimError::config(
                context,
                field,
                format!("expected a mapping of parameters, got {other:?}"),
            ));
        }
    };
    mapping.insert(YamlValue::String("type".to_string()), YamlValue::String(type_name.to_string()));
    serde_yaml::from_value(YamlValue::Mapping(mapping))
        .map_err(|e| SimError::config(context, field, format!("unknown or malformed '{type_name}': {e}")))
}

pub fn load_document(path: &Path) -> SimResult<RawDocument> {
    let text = std::fs::read_to_string(path)?;
    let doc: RawDocument = serde_yaml::from_str(&text)?;
    Ok(doc)
}

pub fn save_document(doc: &RawDocument, path: &Path) -> SimResult<()> {
    let text = serde_yaml::to_string(doc)?;
    std::fs::write(path, text)?;
    Ok(())
}

fn resolve_radar(wire: &RadarWire) -> SimResult<RawRadarConfig> {
    let rotation: RotationSpec = build_tagged(&wire.name, "rotation_type", &wire.rotation_type, &wire.rotation_params)?;
    let pri: PriSpec = build_tagged(&wire.name, "pri_type", &wire.pri_type, &wire.pri_params)?;
    let frequency: ValueSpec = build_tagged(&wire.name, "frequency_type", &wire.frequency_type, &wire.frequency_params)?;
    let pulse_width: ValueSpec = build_tagged(&wire.name, "pulse_width_type", &wire.pulse_width_type, &wire.pulse_width_params)?;
    let lobe_pattern: LobePattern = serde_yaml::from_value(wire.lobe_pattern.0.clone())
        .map_err(|e| SimError::config(&wire.name, "lobe_pattern", format!("{e}")))?;

    Ok(RawRadarConfig {
        name: wire.name.clone(),
        start_position: wire.start_position,
        velocity: wire.velocity,
        start_time: wire.start_time,
        power: wire.power,
        rotation,
        pri,
        frequency,
        pulse_width,
        lobe_pattern,
    })
}

fn resolve_sensor(wire: &SensorWire) -> SimResult<RawSensorConfig> {
    if wire.detection_probability.level.len() != wire.detection_probability.probability.len() {
        return Err(SimError::config(
            &wire.name,
            "detection_probability",
            "level and probability arrays must have equal length",
        ));
    }
    let probability: Vec<f64> = wire.detection_probability.probability.iter().map(|p| p / 100.0).collect();

    let errors = SensorErrors {
        amplitude_error: wire.amplitude_error.resolve(Measurand::Amplitude)?,
        toa_error: wire.toa_error.resolve(Measurand::Toa)?,
        frequency_error: wire.frequency_error.resolve(Measurand::Frequency)?,
        pulse_width_error: wire.pulse_width_error.resolve(Measurand::PulseWidth)?,
        aoa_error: wire.aoa_error.resolve(Measurand::Aoa)?,
    };

    Ok(RawSensorConfig {
        name: wire.name.clone(),
        start_position: wire.start_position,
        velocity: wire.velocity,
        start_time: wire.start_time,
        saturation_level: wire.saturation_level,
        detection_probability: DetectionLevels {
            level: wire.detection_probability.level.clone(),
            probability,
        },
        errors,
    })
}

/// Build a fully validated `Scenario` from a `RawDocument` — the only
/// fallible phase; everything downstream (`Scenario::step`) is infallible
/// per spec.md §7.
pub fn build_scenario(doc: &RawDocument) -> SimResult<Scenario> {
    let sc = &doc.scenario;
    if sc.end_time < sc.start_time {
        return Err(SimError::config_global("scenario.end_time", "end_time must be >= start_time"));
    }
    if sc.time_step <= 0.0 {
        return Err(SimError::config_global("scenario.time_step", "time_step must be > 0"));
    }

    let mut rng = StdRng::seed_from_u64(sc.seed);

    let mut radars = Vec::with_capacity(doc.radars.len());
    for wire in &doc.radars {
        let raw = resolve_radar(wire)?;
        let radar = Radar::build(&raw, sc.start_time, sc.end_time, sc.time_step, &mut rng)?;
        tracing::info!(radar = %radar.name, "added radar to scenario");
        radars.push(radar);
    }

    let mut sensors = Vec::with_capacity(doc.sensors.len());
    for wire in &doc.sensors {
        let raw = resolve_sensor(wire)?;
        let sensor = Sensor::build(&raw, sc.end_time, sc.time_step)?;
        tracing::info!(sensor = %sensor.name, "added sensor to scenario");
        sensors.push(sensor);
    }

    Scenario::new(
        sc.start_time,
        sc.end_time,
        sc.time_step,
        sc.pdw_tick_window.unwrap_or(sc.time_step),
        radars,
        sensors,
        rng,
    )
}

pub fn load(path: &Path) -> SimResult<Scenario> {
    let doc = load_document(path)?;
    build_scenario(&doc)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_YAML: &str = r#"
scenario:
  start_time: 0.0
  end_time: 0.01
  time_step: 0.001
  seed: 1
radars:
  - name: R1
    start_position: [0, 0]
    velocity: [0, 0]
    start_time: 0.0
    power: 1000.0
    rotation_type: constant
    rotation_params: { t0: 0.0, alpha0: 0.0, T_rot: 2.5 }
    pri_type: fixed
    pri_params: { value: 0.001 }
    frequency_type: fixed
    frequency_params: { value: 10000000000.0 }
    pulse_width_type: fixed
    pulse_width_params: { value: 0.000001 }
    lobe_pattern:
      type: Sinc
      main_lobe_opening_angle: 10.0
      radar_power_at_main_lobe: 0.0
      radar_power_at_back_lobe: -20.0
sensors:
  - name: S1
    start_position: [1000, 0]
    velocity: [0, 0]
    start_time: 0.0
    saturation_level: 1000.0
    detection_probability:
      level: []
      probability: []
    amplitude_error:
      systematic: { type: constant, error: "0 dB" }
      arbitrary: { type: constant, error: "0 dB" }
    toa_error:
      systematic: { type: constant, error: "0 s" }
      arbitrary: { type: constant, error: "0 s" }
    frequency_error:
      systematic: { type: constant, error: "0 Hz" }
      arbitrary: { type: constant, error: "0 Hz" }
    pulse_width_error:
      systematic: { type: constant, error: "0 s" }
      arbitrary: { type: constant, error: "0 s" }
    aoa_error:
      systematic: { type: constant, error: "0 deg" }
      arbitrary: { type: constant, error: "0 deg" }
"#;

    #[test]
    fn parses_and_builds_scenario() {
        let doc: RawDocument = serde_yaml::from_str(SAMPLE_YAML).unwrap();
        let scenario = build_scenario(&doc).unwrap();
        assert_eq!(scenario.radars.len(), 1);
        assert_eq!(scenario.sensors.len(), 1);
        assert_eq!(scenario.radars[0].pulse_times.len(), 10);
    }

    #[test]
    fn unknown_pri_type_is_rejected() {
        let mut doc: RawDocument = serde_yaml::from_str(SAMPLE_YAML).unwrap();
        doc.radars[0].pri_type = "bogus".to_string();
        assert!(build_scenario(&doc).is_err());
    }

    #[test]
    fn percentage_detection_probability_is_normalized() {
        let mut doc: RawDocument = serde_yaml::from_str(SAMPLE_YAML).unwrap();
        doc.sensors[0].detection_probability = DetectionProbabilityWire {
            level: vec![-10.0],
            probability: vec![50.0],
        };
        let scenario = build_scenario(&doc).unwrap();
        assert_eq!(scenario.sensors[0].detection_probabilities[0], 0.5);
    }
}
