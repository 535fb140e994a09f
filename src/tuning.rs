//! Data-driven physics and timing knobs
//!
//! Defaults reproduce the shipped feel. A JSON document can override any
//! subset of fields; missing fields keep their defaults.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::device::DeviceClass;

/// Physics and pipe-travel tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Movement ===
    /// Added to vertical velocity every tick
    pub gravity: f32,
    /// Horizontal speed while walking
    pub walk_speed: f32,
    /// Jump impulse on desktop (negative = upward)
    pub jump_impulse_desktop: f32,
    /// Jump impulse on mobile portrait
    pub jump_impulse_mobile: f32,

    // === Pipe collision ===
    pub pipe_lock_band: f32,
    pub pipe_stand_band: f32,
    pub pipe_approach_band: f32,
    pub pipe_side_clearance: f32,
    pub pipe_side_max_push: f32,

    // === Bricks ===
    /// Broad-phase radius in brick sizes (0 disables the pre-filter)
    pub broad_phase_factor: f32,

    // === Timing ===
    pub target_fps: f64,
    pub pipe_squat_ms: f64,
    pub pipe_enter_ms: f64,
    pub pipe_transition_ms: f64,
    pub pipe_exit_ms: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            walk_speed: WALK_SPEED,
            jump_impulse_desktop: JUMP_IMPULSE_DESKTOP,
            jump_impulse_mobile: JUMP_IMPULSE_MOBILE,

            pipe_lock_band: PIPE_LOCK_BAND,
            pipe_stand_band: PIPE_STAND_BAND,
            pipe_approach_band: PIPE_APPROACH_BAND,
            pipe_side_clearance: PIPE_SIDE_CLEARANCE,
            pipe_side_max_push: PIPE_SIDE_MAX_PUSH,

            broad_phase_factor: BROAD_PHASE_FACTOR,

            target_fps: TARGET_FPS,
            pipe_squat_ms: PIPE_SQUAT_MS,
            pipe_enter_ms: PIPE_ENTER_MS,
            pipe_transition_ms: PIPE_TRANSITION_MS,
            pipe_exit_ms: PIPE_EXIT_MS,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON override document
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Parse overrides, falling back to defaults on malformed input
    pub fn load_or_default(json: Option<&str>) -> Self {
        match json.map(Self::from_json) {
            Some(Ok(tuning)) => {
                log::info!("Loaded tuning overrides");
                tuning
            }
            Some(Err(e)) => {
                log::warn!("Ignoring malformed tuning ({}), using defaults", e);
                Self::default()
            }
            None => Self::default(),
        }
    }

    /// Jump impulse for the given device class
    pub fn jump_impulse(&self, device: DeviceClass) -> f32 {
        match device {
            DeviceClass::Desktop => self.jump_impulse_desktop,
            DeviceClass::MobilePortrait => self.jump_impulse_mobile,
        }
    }

    /// Wall-clock time between ticks
    pub fn frame_interval_ms(&self) -> f64 {
        1000.0 / self.target_fps
    }

    /// Total time a full pipe trip takes
    pub fn pipe_trip_ms(&self) -> f64 {
        self.pipe_squat_ms + self.pipe_enter_ms + self.pipe_transition_ms + self.pipe_exit_ms
    }
}
