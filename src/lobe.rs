//! lobe.rs — antenna lobe (directional gain) model
//!
//! spec.md §4.3. Only the `Sinc` pattern is specified; gain is expressed as
//! attenuation in dB as a function of bearing relative to boresight.

use crate::units::{Decibels, Radians};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum LobePattern {
    Sinc {
        #[serde(rename = "main_lobe_opening_angle")]
        theta_ml_deg: f64,
        #[serde(rename = "radar_power_at_main_lobe")]
        p_ml_db: f64,
        #[serde(rename = "radar_power_at_back_lobe")]
        p_bl_db: f64,
    },
}

impl LobePattern {
    pub fn validate(&self) -> crate::error::SimResult<()> {
        match self {
            LobePattern::Sinc {
                theta_ml_deg,
                p_ml_db,
                p_bl_db,
            } => {
                if *theta_ml_deg <= 0.0 {
                    return Err(crate::error::SimError::invariant(format!(
                        "main_lobe_opening_angle must be > 0, got {theta_ml_deg}"
                    )));
                }
                if *p_bl_db > *p_ml_db {
                    return Err(crate::error::SimError::invariant(format!(
                        "radar_power_at_back_lobe ({p_bl_db}) must be <= radar_power_at_main_lobe ({p_ml_db})"
                    )));
                }
                Ok(())
            }
        }
    }

    /// Directional gain at bearing `theta` relative to world frame, given
    /// the current `boresight` angle, both in radians. spec.md §4.3.
    pub fn gain(&self, theta: Radians, boresight: Radians) -> Decibels {
        match self {
            LobePattern::Sinc {
                theta_ml_deg,
                p_ml_db,
                p_bl_db,
            } => {
                let delta = Radians::new(theta.get() - boresight.get()).wrap();
                let theta_ml_rad = theta_ml_deg.to_radians();
                if delta.get().abs() < 1e-12 {
                    return Decibels::new(*p_ml_db);
                }
                let x = std::f64::consts::PI * delta.get() / theta_ml_rad;
                let sinc = x.sin() / x;
                let sinc_sq = sinc * sinc;
                let p_ml_lin = Decibels::new(*p_ml_db).to_linear();
                let p_bl_lin = Decibels::new(*p_bl_db).to_linear();
                let combined = sinc_sq * p_ml_lin + (1.0 - sinc_sq) * p_bl_lin;
                Decibels::from_linear(combined)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sinc(theta_ml: f64, p_ml: f64, p_bl: f64) -> LobePattern {
        LobePattern::Sinc {
            theta_ml_deg: theta_ml,
            p_ml_db: p_ml,
            p_bl_db: p_bl,
        }
    }

    #[test]
    fn zero_offset_equals_main_lobe_power() {
        let lobe = sinc(10.0, 0.0, -20.0);
        let g = lobe.gain(Radians::new(0.0), Radians::new(0.0));
        assert!((g.get() - 0.0).abs() < 1e-9);
    }

    #[test]
    fn max_offset_equals_back_lobe_power() {
        let lobe = sinc(10.0, 0.0, -20.0);
        let g = lobe.gain(Radians::new(std::f64::consts::PI), Radians::new(0.0));
        assert!((g.get() - (-20.0)).abs() < 1e-6);
    }

    #[test]
    fn symmetric_in_delta() {
        let lobe = sinc(15.0, 3.0, -18.0);
        let g_pos = lobe.gain(Radians::new(0.3), Radians::new(0.0));
        let g_neg = lobe.gain(Radians::new(-0.3), Radians::new(0.0));
        assert!((g_pos.get() - g_neg.get()).abs() < 1e-9);
    }

    #[test]
    fn continuous_near_zero() {
        let lobe = sinc(10.0, 0.0, -20.0);
        let g_at_eps = lobe.gain(Radians::new(1e-6), Radians::new(0.0));
        assert!((g_at_eps.get() - 0.0).abs() < 1e-3);
    }
}
