//! Brickfolio - a résumé you play as a side-scrolling platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (player physics, collisions, pipe travel)
//! - `input`: Level-triggered key snapshots fed to the simulation
//! - `device`: Desktop vs mobile-portrait detection
//! - `timing`: Fixed-timestep frame gate
//! - `runner`: Display-frame loop that survives a failed frame
//! - `tuning`: Data-driven physics and timing knobs

pub mod device;
pub mod input;
pub mod runner;
pub mod sim;
pub mod timing;
pub mod tuning;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use device::DeviceClass;
pub use input::{Key, KeySet, KeyTracker};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Target simulation rate (ticks per second)
    pub const TARGET_FPS: f64 = 60.0;

    /// Reference scene size (desktop)
    pub const GAME_WIDTH: f32 = 1400.0;
    pub const GAME_HEIGHT: f32 = 600.0;

    /// Added to vertical velocity every tick, no terminal velocity
    pub const GRAVITY: f32 = 0.8;
    /// Horizontal speed while walking (units/tick)
    pub const WALK_SPEED: f32 = 5.0;
    /// Jump impulses per device class (negative = upward)
    pub const JUMP_IMPULSE_DESKTOP: f32 = -18.0;
    pub const JUMP_IMPULSE_MOBILE: f32 = -17.0;

    /// Vertical distance from the pipe-top line that locks the player onto the pipe
    pub const PIPE_LOCK_BAND: f32 = 8.0;
    /// Vertical distance from the pipe-top line that counts as standing on it
    pub const PIPE_STAND_BAND: f32 = 10.0;
    /// Vertical distance from the pipe-top line where a falling player gets caught
    pub const PIPE_APPROACH_BAND: f32 = 20.0;
    /// Feet must be this far below the pipe top before side pushes apply
    pub const PIPE_SIDE_CLEARANCE: f32 = 15.0;
    /// Side overlaps deeper than this are not pushed out
    pub const PIPE_SIDE_MAX_PUSH: f32 = 15.0;

    /// Bricks farther than this many brick sizes from the player are skipped
    pub const BROAD_PHASE_FACTOR: f32 = 2.0;

    /// Pipe travel phase durations (milliseconds)
    pub const PIPE_SQUAT_MS: f64 = 220.0;
    pub const PIPE_ENTER_MS: f64 = 1000.0;
    pub const PIPE_TRANSITION_MS: f64 = 160.0;
    pub const PIPE_EXIT_MS: f64 = 1000.0;
}
