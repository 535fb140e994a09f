//! Brickfolio entry point
//!
//! On the web the page drives everything through `brickfolio::web`. Natively
//! there is no window; instead a scripted walkthrough plays the scene headless
//! and logs what happens.

#[cfg(target_arch = "wasm32")]
fn main() {
    if let Err(e) = brickfolio::web::game_start(None, None) {
        web_sys::console::error_1(&e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Brickfolio (native) starting...");

    let tuning = match std::env::args().nth(1) {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(json) => brickfolio::Tuning::load_or_default(Some(&json)),
            Err(e) => {
                log::warn!("Could not read tuning file {}: {}", path, e);
                brickfolio::Tuning::default()
            }
        },
        None => brickfolio::Tuning::default(),
    };

    demo::run(tuning);
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use brickfolio::consts::{GAME_HEIGHT, GAME_WIDTH};
    use brickfolio::sim::{BrickCatalog, PipePhase, SimEvent, World};
    use brickfolio::{DeviceClass, Key, KeySet, Tuning};

    /// Wall-clock step per simulated display frame
    const FRAME_MS: f64 = 17.0;
    /// Give up on a stage after this many frames
    const STAGE_LIMIT: u32 = 1200;
    /// Frames spent "reading" a brick card before closing it
    const READ_FRAMES: u32 = 30;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Stage {
        WalkToBrick,
        Bump,
        Read,
        WalkToPipe,
        Climb,
        Squat,
        Ride,
    }

    impl Stage {
        fn keys(self) -> KeySet {
            match self {
                Stage::WalkToBrick | Stage::WalkToPipe => KeySet::from_keys(&[Key::Right]),
                Stage::Bump => KeySet::from_keys(&[Key::Up]),
                Stage::Climb => KeySet::from_keys(&[Key::Up, Key::Right]),
                Stage::Squat => KeySet::from_keys(&[Key::Down]),
                Stage::Read | Stage::Ride => KeySet::EMPTY,
            }
        }

        fn next(self) -> Option<Stage> {
            match self {
                Stage::WalkToBrick => Some(Stage::Bump),
                Stage::Bump => Some(Stage::Read),
                Stage::Read => Some(Stage::WalkToPipe),
                Stage::WalkToPipe => Some(Stage::Climb),
                Stage::Climb => Some(Stage::Squat),
                Stage::Squat => Some(Stage::Ride),
                Stage::Ride => None,
            }
        }
    }

    fn stage_limit(stage: Stage, ride_limit: u32) -> u32 {
        match stage {
            Stage::Ride => ride_limit,
            _ => STAGE_LIMIT,
        }
    }

    pub fn run(tuning: Tuning) {
        // A trip is timer driven; allow one extra second of frames on top of it
        let ride_limit = ((tuning.pipe_trip_ms() + 1000.0) / FRAME_MS).ceil() as u32;
        let mut world = World::new(
            tuning,
            BrickCatalog::builtin(),
            GAME_WIDTH,
            GAME_HEIGHT,
            DeviceClass::Desktop,
        );
        let target = world
            .bricks()
            .iter()
            .find(|b| b.id == "projects")
            .map(|b| b.pos.x + world.geometry().brick_size / 2.0)
            .unwrap_or(GAME_WIDTH / 2.0);

        let mut now = 0.0;
        world.start(now);

        let mut stage = Stage::WalkToBrick;
        let mut frames = 0;
        loop {
            now += FRAME_MS;
            frames += 1;
            let events = world.frame(now, stage.keys());
            for event in &events {
                log::info!("{:?}", event);
            }

            let player = world.player();
            let geometry = world.geometry();
            let done = match stage {
                Stage::WalkToBrick => player.pos.x + geometry.player_width / 2.0 >= target,
                Stage::Bump => events.iter().any(|e| matches!(e, SimEvent::BrickHit { .. })),
                Stage::Read => {
                    if frames >= READ_FRAMES {
                        if let Some(brick) = world.selected_brick() {
                            log::info!("Card: {}: {}", brick.content.title, brick.content.description);
                        }
                        world.close_modal();
                    }
                    world.selected_brick().is_none() && !world.player().is_jumping
                }
                Stage::WalkToPipe => player.pos.x + geometry.player_width >= geometry.pipe_box.left,
                Stage::Climb => player.pos.y == geometry.pipe_top_y && !player.is_jumping,
                Stage::Squat => world.pipe_phase() != PipePhase::Idle,
                Stage::Ride => {
                    world.pipe_phase() == PipePhase::Idle
                        && events.iter().any(|e| matches!(e, SimEvent::PipePhase { phase: PipePhase::Idle }))
                }
            };

            if done {
                log::info!("{:?} done after {} frames", stage, frames);
                frames = 0;
                match stage.next() {
                    Some(next) => stage = next,
                    None => break,
                }
            } else if frames >= stage_limit(stage, ride_limit) {
                log::warn!("{:?} did not finish within {} frames", stage, frames);
                break;
            }
        }

        world.stop();
        if world.hits().is_empty() {
            log::warn!("No brick was revealed");
        }
        log::info!(
            "Finished in the {:?} realm with {} brick(s) hit after {} ticks",
            world.realm(),
            world.hits().len(),
            world.ticks()
        );
        match serde_json::to_string_pretty(&world.snapshot()) {
            Ok(json) => println!("{}", json),
            Err(e) => log::error!("Snapshot failed: {}", e),
        }
    }
}
