use navlink_payload::Vec3;
use serde::{Deserialize, Serialize};

/// GPS fix as last reported by the receiver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GpsFix {
    pub valid: bool,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
}

/// Latest sensor and navigation state the telemetry builders read from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavSnapshot {
    pub accels: Vec3,
    pub rates: Vec3,
    pub mags: Vec3,
    pub euler: Vec3,
    pub temperature: f32,
    pub velocity_ned: Vec3,
    pub gps: GpsFix,
    pub odo_valid: bool,
    pub pps_detected: bool,
    pub op_mode: u8,
    pub lin_accel_switch: bool,
    pub turn_switch: bool,
}

impl NavSnapshot {
    /// A level, stationary unit reading one g on the down axis.
    pub fn at_rest() -> Self {
        Self {
            accels: [0.0, 0.0, 9.80665],
            temperature: 25.0,
            ..Self::default()
        }
    }
}
