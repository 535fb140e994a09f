//! Pipe travel state machine
//!
//! idle -> priming -> entering -> transitioning -> exiting -> idle
//!
//! Phases advance on wall-clock timers, not on ticks. At most one timer is in
//! flight; it is dropped before another is armed. A single dispatcher reacts to
//! each phase entry exactly once and applies that phase's side effects to the
//! player. The realm flips on entering `transitioning`.

use serde::{Deserialize, Serialize};

use super::geometry::SceneGeometry;
use super::state::{PipeAnimation, Player, Realm};
use super::tick::TravelGate;
use crate::tuning::Tuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipePhase {
    #[default]
    Idle,
    Priming,
    Entering,
    Transitioning,
    Exiting,
}

impl PipePhase {
    /// What the player sprite shows during this phase
    pub fn animation(self) -> PipeAnimation {
        match self {
            PipePhase::Idle => PipeAnimation::None,
            PipePhase::Priming => PipeAnimation::Priming,
            PipePhase::Entering => PipeAnimation::Entering,
            PipePhase::Transitioning => PipeAnimation::Transitioning,
            PipePhase::Exiting => PipeAnimation::Exiting,
        }
    }
}

/// Something the dispatcher did this poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipeEvent {
    PhaseEntered(PipePhase),
    /// The player now lives in this realm; the active bricks must be rebuilt
    RealmSwapped(Realm),
    /// `transitioning` was reached without a destination
    Aborted,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PhaseTimer {
    fires_at_ms: f64,
    next: PipePhase,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PhaseDurations {
    priming: f64,
    entering: f64,
    transitioning: f64,
    exiting: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipeTravel {
    phase: PipePhase,
    /// Destination realm for the trip in flight
    target: Option<Realm>,
    /// Last phase the dispatcher reacted to; `None` forces a re-dispatch
    handled: Option<PipePhase>,
    timer: Option<PhaseTimer>,
    durations: PhaseDurations,
}

impl PipeTravel {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            phase: PipePhase::Idle,
            target: None,
            handled: Some(PipePhase::Idle),
            timer: None,
            durations: PhaseDurations {
                priming: tuning.pipe_squat_ms,
                entering: tuning.pipe_enter_ms,
                transitioning: tuning.pipe_transition_ms,
                exiting: tuning.pipe_exit_ms,
            },
        }
    }

    pub fn phase(&self) -> PipePhase {
        self.phase
    }

    pub fn target(&self) -> Option<Realm> {
        self.target
    }

    pub fn is_idle(&self) -> bool {
        self.phase == PipePhase::Idle
    }

    /// When the pending timer fires, if one is armed
    pub fn next_due_ms(&self) -> Option<f64> {
        self.timer.map(|t| t.fires_at_ms)
    }

    /// Start a trip away from `from`. Refused while a trip is in flight.
    pub fn request(&mut self, from: Realm) -> bool {
        if !self.is_idle() {
            log::debug!("Pipe travel refused: already {:?}", self.phase);
            return false;
        }
        self.target = Some(from.opposite());
        self.phase = PipePhase::Priming;
        true
    }

    /// Fire the pending timer if it is due, then react to any new phase
    pub fn poll(&mut self, now_ms: f64, player: &mut Player, geometry: &SceneGeometry) -> Vec<PipeEvent> {
        if let Some(timer) = self.timer {
            if now_ms >= timer.fires_at_ms {
                self.timer = None;
                self.phase = timer.next;
            }
        }

        let mut events = Vec::new();
        self.dispatch(now_ms, player, geometry, &mut events);
        events
    }

    /// Drop the pending timer. The phase stays where it is.
    pub fn cancel(&mut self) {
        self.timer = None;
    }

    /// Back to idle, no trip, no timer. Player state is left alone.
    pub fn reset(&mut self) {
        self.phase = PipePhase::Idle;
        self.target = None;
        self.handled = Some(PipePhase::Idle);
        self.timer = None;
    }

    /// Re-enter the current phase after a `cancel`, re-arming its timer on the next poll
    pub fn resume(&mut self) {
        if !self.is_idle() && self.timer.is_none() {
            self.handled = None;
        }
    }

    fn arm(&mut self, now_ms: f64, duration_ms: f64, next: PipePhase) {
        self.timer = Some(PhaseTimer {
            fires_at_ms: now_ms + duration_ms,
            next,
        });
    }

    fn dispatch(&mut self, now_ms: f64, player: &mut Player, geometry: &SceneGeometry, events: &mut Vec<PipeEvent>) {
        while self.handled != Some(self.phase) {
            let phase = self.phase;
            self.handled = Some(phase);
            self.timer = None;
            log::debug!("Pipe phase -> {:?}", phase);

            match phase {
                PipePhase::Idle => {
                    self.target = None;
                    player.vel = glam::Vec2::ZERO;
                    player.is_jumping = false;
                    player.is_squatting = false;
                }
                PipePhase::Priming => {
                    player.pin_to_pipe(geometry);
                    player.is_squatting = true;
                    self.arm(now_ms, self.durations.priming, PipePhase::Entering);
                }
                PipePhase::Entering => {
                    player.pin_to_pipe(geometry);
                    player.is_squatting = false;
                    self.arm(now_ms, self.durations.entering, PipePhase::Transitioning);
                }
                PipePhase::Transitioning => {
                    let Some(target) = self.target else {
                        log::warn!("Pipe travel reached transitioning with no destination");
                        events.push(PipeEvent::Aborted);
                        self.phase = PipePhase::Idle;
                        continue;
                    };
                    player.realm = target;
                    player.pin_to_pipe(geometry);
                    player.is_squatting = false;
                    log::info!("Realm swapped to {:?}", target);
                    events.push(PipeEvent::RealmSwapped(target));
                    self.arm(now_ms, self.durations.transitioning, PipePhase::Exiting);
                }
                PipePhase::Exiting => {
                    player.pin_to_pipe(geometry);
                    player.is_squatting = false;
                    self.arm(now_ms, self.durations.exiting, PipePhase::Idle);
                }
            }

            player.pipe_animation = phase.animation();
            events.push(PipeEvent::PhaseEntered(phase));
        }
    }
}

impl TravelGate for PipeTravel {
    fn request_travel(&mut self, from: Realm) -> bool {
        self.request(from)
    }
}
