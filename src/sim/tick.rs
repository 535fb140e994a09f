//! Fixed timestep simulation tick
//!
//! Advances the player by one step: input, gravity, Euler integration, then
//! collision against the scene bounds, the ground, the pipe and the active
//! bricks. Runs to completion every call; nothing here waits or schedules.
//!
//! While a pipe phase owns the player the tick does nothing at all. The pipe
//! state machine moves the player during those phases.

use super::collision::{Aabb, Penetration, Side};
use super::geometry::SceneGeometry;
use super::state::{Brick, BrickId, Direction, PipeAnimation, Player, Realm};
use crate::input::KeySet;
use crate::tuning::Tuning;

/// A falling player is caught by the pipe from up to this far above its top line
const PIPE_CATCH_ABOVE: f32 = 5.0;

/// Input for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Keys held at the start of the tick
    pub keys: KeySet,
    /// A brick's content is on screen; walking and jumping are blocked
    pub modal_open: bool,
}

/// Accepts or refuses a pipe-travel request
///
/// Implemented by the pipe state machine; only one trip may be in flight.
pub trait TravelGate {
    /// Returns true if a trip away from `from` has started
    fn request_travel(&mut self, from: Realm) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickStatus {
    /// A pipe phase owns the player; nothing moved
    Suspended,
    /// Normal physics step
    Stepped,
    /// Pipe travel started this tick; the player is parked on the pipe
    Ceded,
}

/// A brick struck from below
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrickHit {
    pub id: BrickId,
    /// The brick was not hit before this tick
    pub first_hit: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub status: TickStatus,
    pub hits: Vec<BrickHit>,
}

impl TickReport {
    fn with_status(status: TickStatus) -> Self {
        Self {
            status,
            hits: Vec::new(),
        }
    }
}

/// Advance the player by one fixed timestep
pub fn tick(
    player: &mut Player,
    input: &TickInput,
    bricks: &[Brick],
    geometry: &SceneGeometry,
    tuning: &Tuning,
    gate: &mut dyn TravelGate,
) -> TickReport {
    if player.pipe_animation.is_active() {
        return TickReport::with_status(TickStatus::Suspended);
    }

    let was_airborne = player.is_jumping;
    let mut vel = player.vel;
    let mut is_jumping = player.is_jumping;
    let mut is_squatting = false;
    let mut direction = player.direction;

    // --- INPUT ---
    if input.modal_open {
        vel.x = 0.0;
    } else {
        let keys = input.keys;
        // Squat beats walking, and only works on the ground
        if keys.squat() && !was_airborne {
            is_squatting = true;
            vel.x = 0.0;
        } else if keys.left() {
            vel.x = -tuning.walk_speed;
            direction = Direction::Left;
        } else if keys.right() {
            vel.x = tuning.walk_speed;
            direction = Direction::Right;
        } else {
            vel.x = 0.0;
        }

        if keys.jump() && !was_airborne {
            vel.y = tuning.jump_impulse(geometry.device);
            is_jumping = true;
            is_squatting = false;
        }
    }

    // --- GRAVITY + INTEGRATION ---
    vel.y += tuning.gravity;
    let mut pos = player.pos + vel;

    // --- SCENE BOUNDS ---
    pos.x = pos.x.max(0.0).min(geometry.max_player_x());

    let pipe = geometry.pipe_box;
    let pipe_top_y = geometry.pipe_top_y;
    let over_pipe = geometry.player_box(pos.x, pos.y).overlaps_x(&pipe);

    // --- GROUND ---
    let standing_on_pipe = over_pipe && (pos.y - pipe_top_y).abs() < tuning.pipe_stand_band;
    if pos.y >= geometry.player_ground_y && !standing_on_pipe {
        pos.y = geometry.player_ground_y;
        vel.y = 0.0;
        is_jumping = false;
    }

    // --- PIPE TOP ---
    let above_top = pos.y - pipe_top_y;
    if over_pipe && above_top.abs() < tuning.pipe_lock_band {
        pos.y = pipe_top_y;
        vel.y = 0.0;
        is_jumping = false;
    } else if over_pipe
        && vel.y > 0.0
        && above_top >= -PIPE_CATCH_ABOVE
        && above_top < tuning.pipe_approach_band
    {
        // Falling onto the rim: catch before the feet sink into the pipe
        pos.y = pipe_top_y;
        vel.y = 0.0;
        is_jumping = false;
    }
    let locked_on_pipe = over_pipe && (pos.y - pipe_top_y).abs() < tuning.pipe_lock_band;

    // --- PIPE ENTRY ---
    let on_pipe_top = over_pipe && (pos.y - pipe_top_y).abs() < tuning.pipe_stand_band;
    if is_squatting && on_pipe_top && gate.request_travel(player.realm) {
        log::debug!("Pipe travel accepted from {:?}", player.realm);
        player.direction = direction;
        player.pin_to_pipe(geometry);
        player.is_squatting = true;
        player.pipe_animation = PipeAnimation::Priming;
        return TickReport::with_status(TickStatus::Ceded);
    }

    // --- PIPE SIDES ---
    let body = geometry.player_box(pos.x, pos.y);
    if !locked_on_pipe && body.bottom > pipe.top + tuning.pipe_side_clearance {
        if let Some(pen) = Penetration::between(&body, &pipe) {
            match pen.least_horizontal() {
                (Side::Left, depth) if depth < tuning.pipe_side_max_push => {
                    vel.x = 0.0;
                    pos.x = pipe.left - geometry.player_width;
                }
                (Side::Right, depth) if depth < tuning.pipe_side_max_push => {
                    vel.x = 0.0;
                    pos.x = pipe.right;
                }
                _ => {}
            }
        }
    }

    // --- BRICKS ---
    let mut hits = Vec::new();
    let reach = geometry.brick_size * tuning.broad_phase_factor;

    for brick in bricks {
        // Rebuilt per brick: each one sees the position earlier bricks already corrected
        let body = geometry.player_box(pos.x, pos.y);
        let block = Aabb {
            left: brick.pos.x,
            right: brick.pos.x + geometry.brick_size,
            top: brick.pos.y,
            bottom: brick.pos.y + geometry.brick_size,
        };

        // Broad phase
        if reach > 0.0
            && ((body.center_x() - block.center_x()).abs() > reach
                || (body.center_y() - block.center_y()).abs() > reach)
        {
            continue;
        }

        let Some(pen) = Penetration::between(&body, &block) else {
            continue;
        };

        let center_x = body.center_x();
        for side in pen.shallowest_sides() {
            match side {
                Side::Bottom if vel.y < 0.0 && center_x > block.left && center_x < block.right => {
                    hits.push(BrickHit {
                        id: brick.id.clone(),
                        first_hit: !brick.hit,
                    });
                    vel.y = 0.0;
                    pos.y = block.bottom;
                }
                Side::Top if vel.y > 0.0 => {
                    vel.y = 0.0;
                    pos.y = block.top - geometry.player_height;
                    is_jumping = false;
                }
                Side::Left => {
                    vel.x = 0.0;
                    pos.x = block.left - geometry.player_width;
                }
                Side::Right => {
                    vel.x = 0.0;
                    pos.x = block.right;
                }
                _ => continue,
            }
            break;
        }
    }

    player.pos = pos;
    player.vel = vel;
    player.is_jumping = is_jumping;
    player.is_squatting = is_squatting;
    player.direction = direction;

    TickReport {
        status: TickStatus::Stepped,
        hits,
    }
}
