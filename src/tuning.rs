//! Data-driven collision policy constants
//!
//! Defaults reproduce the classic feel; a JSON file can override any subset.

use serde::{Deserialize, Serialize};

/// Constants used by the ball collision policy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyTuning {
    /// Speed multiplier applied on every real bounce
    pub speed_ramp: f32,
    /// Ball speed ceiling (units per tick)
    pub cap_speed: f32,
    /// Minimum upward speed after a paddle bounce (units per tick)
    pub min_up_speed: f32,
    /// Radians of deflection per unit of offset from the paddle centre
    pub angle_control: f32,
}

impl Default for PolicyTuning {
    fn default() -> Self {
        Self {
            speed_ramp: 1.01,
            cap_speed: 0.3,
            min_up_speed: 0.2,
            angle_control: 0.3,
        }
    }
}

impl PolicyTuning {
    /// Parse tuning from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let tuning: Self = serde_json::from_str(json)?;
        Ok(tuning.sanitized())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Clamp values into ranges the policy relies on
    ///
    /// The ramp never slows the ball and both speeds stay positive.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !(self.speed_ramp.is_finite() && self.speed_ramp >= 1.0) {
            log::warn!("speed_ramp {} out of range, using {}", self.speed_ramp, defaults.speed_ramp);
            self.speed_ramp = defaults.speed_ramp;
        }
        if !(self.cap_speed.is_finite() && self.cap_speed > 0.0) {
            log::warn!("cap_speed {} out of range, using {}", self.cap_speed, defaults.cap_speed);
            self.cap_speed = defaults.cap_speed;
        }
        if !(self.min_up_speed.is_finite() && self.min_up_speed > 0.0) {
            log::warn!(
                "min_up_speed {} out of range, using {}",
                self.min_up_speed,
                defaults.min_up_speed
            );
            self.min_up_speed = defaults.min_up_speed;
        }
        if !self.angle_control.is_finite() {
            self.angle_control = defaults.angle_control;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = PolicyTuning::from_json(r#"{ "cap_speed": 0.5 }"#).unwrap();
        assert_eq!(tuning.cap_speed, 0.5);
        assert_eq!(tuning.speed_ramp, 1.01);
        assert_eq!(tuning.min_up_speed, 0.2);
    }

    #[test]
    fn test_invalid_values_are_replaced() {
        let tuning = PolicyTuning::from_json(r#"{ "speed_ramp": 0.5, "min_up_speed": -1 }"#)
            .unwrap();
        assert_eq!(tuning.speed_ramp, 1.01);
        assert_eq!(tuning.min_up_speed, 0.2);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(PolicyTuning::from_json("not json").is_err());
    }

    #[test]
    fn test_json_roundtrip() {
        let tuning = PolicyTuning::default();
        let json = tuning.to_json().unwrap();
        assert_eq!(PolicyTuning::from_json(&json).unwrap(), tuning);
    }
}
