//! World orchestration
//!
//! Owns everything the simulation needs and is the single writer of it. Each
//! display frame the host calls [`World::frame`]; the pipe timer is polled
//! first, then at most one physics tick runs if the frame gate opens.

use serde::Serialize;

use super::catalog::{BrickCatalog, HitRegistry};
use super::geometry::{Rect, SceneGeometry};
use super::pipe::{PipeEvent, PipePhase, PipeTravel};
use super::state::{Brick, BrickContent, BrickId, Player, Realm};
use super::tick::{TickInput, TickStatus, tick};
use crate::device::DeviceClass;
use crate::input::KeySet;
use crate::timing::FrameGate;
use crate::tuning::Tuning;

/// Events emitted during a frame, in the order they happened.
/// The presentation layer consumes these for animation and the content modal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SimEvent {
    BrickHit { id: BrickId, first_hit: bool },
    PipePhase { phase: PipePhase },
    RealmSwapped { realm: Realm },
    TravelAborted,
}

/// Everything the presentation layer draws for one frame
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot<'a> {
    pub device: DeviceClass,
    pub realm: Realm,
    pub player: &'a Player,
    pub bricks: &'a [Brick],
    pub pipe: Rect,
    pub pipe_phase: PipePhase,
    /// Brick whose content is on screen
    pub selected: Option<&'a BrickId>,
    pub content: Option<&'a BrickContent>,
}

#[derive(Debug, Clone)]
pub struct World {
    tuning: Tuning,
    geometry: SceneGeometry,
    catalog: BrickCatalog,
    hits: HitRegistry,
    /// Active realm's bricks, rebuilt from catalog + hits + geometry
    bricks: Vec<Brick>,
    player: Player,
    pipe: PipeTravel,
    modal: Option<BrickId>,
    gate: FrameGate,
    running: bool,
    ticks: u64,
}

impl World {
    pub fn new(tuning: Tuning, catalog: BrickCatalog, width: f32, height: f32, device: DeviceClass) -> Self {
        let geometry = SceneGeometry::new(width, height, device);
        let player = Player::spawn(&geometry);
        let hits = HitRegistry::new();
        let bricks = catalog.project(player.realm, &geometry, &hits);
        let pipe = PipeTravel::new(&tuning);
        let gate = FrameGate::new(tuning.frame_interval_ms());

        Self {
            tuning,
            geometry,
            catalog,
            hits,
            bricks,
            player,
            pipe,
            modal: None,
            gate,
            running: false,
            ticks: 0,
        }
    }

    /// Begin (or resume) ticking; frame timing is measured from `now_ms`
    pub fn start(&mut self, now_ms: f64) {
        if self.running {
            return;
        }
        self.running = true;
        self.gate.start(now_ms);
        self.pipe.resume();
        log::info!("World started ({})", self.geometry.device.as_str());
    }

    /// Stop ticking and drop any pending pipe timer
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.pipe.cancel();
        log::info!("World stopped after {} ticks", self.ticks);
    }

    /// Called once per display frame
    pub fn frame(&mut self, now_ms: f64, keys: KeySet) -> Vec<SimEvent> {
        let mut events = Vec::new();
        if !self.running {
            return events;
        }

        self.poll_pipe(now_ms, &mut events);
        if self.gate.ready(now_ms) {
            events.extend(self.step(now_ms, keys));
        }
        events
    }

    /// One physics tick, ignoring the frame gate
    pub fn step(&mut self, now_ms: f64, keys: KeySet) -> Vec<SimEvent> {
        let mut events = Vec::new();
        let input = TickInput {
            keys,
            modal_open: self.modal.is_some(),
        };

        let report = tick(
            &mut self.player,
            &input,
            &self.bricks,
            &self.geometry,
            &self.tuning,
            &mut self.pipe,
        );

        match report.status {
            TickStatus::Suspended => return events,
            TickStatus::Stepped => {}
            // Priming takes over before anything else runs
            TickStatus::Ceded => self.poll_pipe(now_ms, &mut events),
        }
        self.ticks += 1;

        if !report.hits.is_empty() {
            for hit in report.hits {
                // Repeat hits still bump, but only a newly revealed brick opens its card
                if self.hits.mark(&hit.id) {
                    log::debug!("Brick revealed: {}", hit.id);
                    self.modal = Some(hit.id.clone());
                }
                events.push(SimEvent::BrickHit {
                    id: hit.id,
                    first_hit: hit.first_hit,
                });
            }
            self.reproject();
        }
        events
    }

    fn poll_pipe(&mut self, now_ms: f64, events: &mut Vec<SimEvent>) {
        for event in self.pipe.poll(now_ms, &mut self.player, &self.geometry) {
            match event {
                PipeEvent::PhaseEntered(phase) => events.push(SimEvent::PipePhase { phase }),
                PipeEvent::RealmSwapped(realm) => {
                    self.reproject();
                    events.push(SimEvent::RealmSwapped { realm });
                }
                PipeEvent::Aborted => events.push(SimEvent::TravelAborted),
            }
        }
    }

    fn reproject(&mut self) {
        self.bricks = self.catalog.project(self.player.realm, &self.geometry, &self.hits);
    }

    /// Swap the layout for a new device class, keeping the player where it is
    pub fn set_device(&mut self, device: DeviceClass) {
        if device == self.geometry.device {
            return;
        }
        log::info!("Device class changed to {}", device.as_str());

        self.geometry = SceneGeometry::new(self.geometry.game_width, self.geometry.game_height, device);
        self.player.pos.x = self.player.pos.x.max(0.0).min(self.geometry.max_player_x());
        if !self.pipe.is_idle() {
            self.player.pin_to_pipe(&self.geometry);
        }
        self.reproject();
    }

    pub fn close_modal(&mut self) {
        self.modal = None;
    }

    /// Brick whose content is currently shown
    pub fn selected_brick(&self) -> Option<&Brick> {
        let id = self.modal.as_ref()?;
        self.bricks.iter().find(|b| &b.id == id)
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        let selected = self.selected_brick();
        Snapshot {
            device: self.geometry.device,
            realm: self.player.realm,
            player: &self.player,
            bricks: &self.bricks,
            pipe: self.geometry.pipe_sprite,
            pipe_phase: self.pipe.phase(),
            selected: selected.map(|b| &b.id),
            content: selected.map(|b| &b.content),
        }
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn bricks(&self) -> &[Brick] {
        &self.bricks
    }

    pub fn geometry(&self) -> &SceneGeometry {
        &self.geometry
    }

    pub fn hits(&self) -> &HitRegistry {
        &self.hits
    }

    pub fn pipe_phase(&self) -> PipePhase {
        self.pipe.phase()
    }

    /// When the pending pipe timer fires
    pub fn next_pipe_deadline(&self) -> Option<f64> {
        self.pipe.next_due_ms()
    }

    pub fn realm(&self) -> Realm {
        self.player.realm
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Physics ticks run so far (suspended ticks excluded)
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Key;
    use glam::Vec2;

    fn desktop_world() -> World {
        let mut world = World::new(
            Tuning::default(),
            BrickCatalog::builtin(),
            1400.0,
            600.0,
            DeviceClass::Desktop,
        );
        world.start(0.0);
        world
    }

    /// Put the player just under a brick, moving up
    fn under_brick(world: &mut World, id: &str) {
        let brick = world.bricks.iter().find(|b| b.id == id).unwrap().clone();
        let g = &world.geometry;
        world.player.pos = Vec2::new(
            brick.pos.x + g.brick_size / 2.0 - g.player_width / 2.0,
            brick.pos.y + g.brick_size + 2.0,
        );
        world.player.vel = Vec2::new(0.0, -10.0);
        world.player.is_jumping = true;
    }

    fn onto_pipe(world: &mut World) {
        world.player.pos = Vec2::new(1200.0, world.geometry.pipe_top_y);
        world.player.vel = Vec2::ZERO;
        world.player.is_jumping = false;
    }

    /// Squat on the pipe and ride it to the other realm; returns the finish time
    fn ride_pipe(world: &mut World, start_ms: f64) -> f64 {
        onto_pipe(world);
        let events = world.step(start_ms, KeySet::from_keys(&[Key::Down]));
        assert_eq!(
            events,
            vec![SimEvent::PipePhase {
                phase: PipePhase::Priming
            }]
        );

        let mut now = start_ms;
        while let Some(due) = world.next_pipe_deadline() {
            now = due;
            world.frame(now, KeySet::EMPTY);
        }
        assert_eq!(world.pipe_phase(), PipePhase::Idle);
        now
    }

    #[test]
    fn test_brick_hit_opens_modal_and_marks_registry() {
        let mut world = desktop_world();
        assert!(world.hits().is_empty());
        under_brick(&mut world, "projects");

        let events = world.step(0.0, KeySet::EMPTY);
        assert_eq!(
            events,
            vec![SimEvent::BrickHit {
                id: "projects".into(),
                first_hit: true
            }]
        );
        assert!(world.hits().contains("projects"));
        assert_eq!(world.selected_brick().map(|b| b.id.as_str()), Some("projects"));
        assert!(world.bricks().iter().find(|b| b.id == "projects").unwrap().hit);

        // Modal blocks walking
        let x = world.player().pos.x;
        world.step(16.0, KeySet::from_keys(&[Key::Right]));
        assert_eq!(world.player().pos.x, x);

        world.close_modal();
        assert!(world.selected_brick().is_none());
        world.step(32.0, KeySet::from_keys(&[Key::Right]));
        assert_eq!(world.player().pos.x, x + 5.0);
    }

    #[test]
    fn test_second_hit_is_not_first() {
        let mut world = desktop_world();
        under_brick(&mut world, "skills");
        world.step(0.0, KeySet::EMPTY);
        world.close_modal();

        under_brick(&mut world, "skills");
        let events = world.step(16.0, KeySet::EMPTY);
        assert_eq!(
            events,
            vec![SimEvent::BrickHit {
                id: "skills".into(),
                first_hit: false
            }]
        );
        assert_eq!(world.hits().len(), 1);
        assert!(world.selected_brick().is_none());

        // Walking is not blocked by a card that never opened
        let x = world.player().pos.x;
        world.step(32.0, KeySet::from_keys(&[Key::Left]));
        assert_eq!(world.player().pos.x, x - 5.0);
    }

    #[test]
    fn test_hits_survive_realm_round_trips() {
        let mut world = desktop_world();
        under_brick(&mut world, "projects");
        world.step(0.0, KeySet::EMPTY);
        world.close_modal();

        let now = ride_pipe(&mut world, 100.0);
        assert_eq!(world.realm(), Realm::Underground);
        let ids: Vec<_> = world.bricks().iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["keyboard", "music", "cooking"]);
        assert!(world.bricks().iter().all(|b| !b.hit));

        under_brick(&mut world, "music");
        world.step(now, KeySet::EMPTY);
        world.close_modal();

        let now = ride_pipe(&mut world, now + 100.0);
        assert_eq!(world.realm(), Realm::Surface);
        let hit: Vec<_> = world.bricks().iter().filter(|b| b.hit).map(|b| b.id.as_str()).collect();
        assert_eq!(hit, vec!["projects"]);

        ride_pipe(&mut world, now + 100.0);
        let hit: Vec<_> = world.bricks().iter().filter(|b| b.hit).map(|b| b.id.as_str()).collect();
        assert_eq!(hit, vec!["music"]);
    }

    #[test]
    fn test_realm_swap_event_and_timing() {
        let mut world = desktop_world();
        onto_pipe(&mut world);
        world.step(0.0, KeySet::from_keys(&[Key::Down]));

        assert!(world.frame(219.0, KeySet::EMPTY).iter().all(|e| !matches!(e, SimEvent::PipePhase { .. })));
        let events = world.frame(220.0, KeySet::EMPTY);
        assert!(events.contains(&SimEvent::PipePhase {
            phase: PipePhase::Entering
        }));

        let events = world.frame(1220.0, KeySet::EMPTY);
        assert!(events.contains(&SimEvent::RealmSwapped {
            realm: Realm::Underground
        }));
        assert_eq!(world.bricks().len(), 3);
    }

    #[test]
    fn test_no_physics_during_pipe_phases() {
        let mut world = desktop_world();
        onto_pipe(&mut world);
        world.step(0.0, KeySet::from_keys(&[Key::Down]));
        let parked = world.player().pos;
        let ticks = world.ticks();

        for i in 1..20 {
            world.step(i as f64, KeySet::from_keys(&[Key::Left, Key::Up]));
        }
        assert_eq!(world.player().pos, parked);
        assert_eq!(world.ticks(), ticks);
        assert_eq!(world.pipe_phase(), PipePhase::Priming);
    }

    #[test]
    fn test_stop_cancels_pipe_timer() {
        let mut world = desktop_world();
        onto_pipe(&mut world);
        world.step(0.0, KeySet::from_keys(&[Key::Down]));
        world.stop();

        assert!(!world.is_running());
        assert_eq!(world.next_pipe_deadline(), None);
        assert!(world.frame(5000.0, KeySet::EMPTY).is_empty());
        assert_eq!(world.pipe_phase(), PipePhase::Priming);

        world.start(6000.0);
        let events = world.frame(6000.0, KeySet::EMPTY);
        assert_eq!(
            events,
            vec![SimEvent::PipePhase {
                phase: PipePhase::Priming
            }]
        );
        assert_eq!(world.next_pipe_deadline(), Some(6220.0));
    }

    #[test]
    fn test_frame_gate_limits_ticks() {
        let mut world = desktop_world();
        world.frame(5.0, KeySet::EMPTY);
        assert_eq!(world.ticks(), 0);
        world.frame(17.0, KeySet::EMPTY);
        assert_eq!(world.ticks(), 1);
        // A long stall still runs a single tick
        world.frame(500.0, KeySet::EMPTY);
        assert_eq!(world.ticks(), 2);
    }

    #[test]
    fn test_device_change_reclamps() {
        let mut world = World::new(
            Tuning::default(),
            BrickCatalog::builtin(),
            600.0,
            900.0,
            DeviceClass::MobilePortrait,
        );
        world.player.pos.x = 500.0;
        world.player.vel.x = 5.0;

        world.set_device(DeviceClass::Desktop);
        assert_eq!(world.geometry().device, DeviceClass::Desktop);
        assert_eq!(world.player().pos.x, 600.0 - 125.0);
        // Other in-flight state is kept
        assert_eq!(world.player().vel.x, 5.0);
        assert_eq!(world.bricks()[0].pos.x, world.geometry().brick_x(0));
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut world = desktop_world();
        under_brick(&mut world, "contact");
        world.step(0.0, KeySet::EMPTY);

        let json = serde_json::to_value(world.snapshot()).unwrap();
        assert_eq!(json["realm"], "surface");
        assert_eq!(json["selected"], "contact");
        assert_eq!(json["bricks"].as_array().unwrap().len(), 5);
        assert_eq!(json["pipe_phase"], "idle");
        assert_eq!(json["device"], "desktop");
    }
}
