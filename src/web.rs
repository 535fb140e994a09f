//! Browser bridge
//!
//! Owns the one `World`, the DOM key listeners and the animation-frame loop.
//! The page supplies a render callback that receives each frame's snapshot and
//! events as JSON; everything it draws comes from there.
//!
//! wasm-bindgen cannot export a struct with closures inside, so the game lives
//! in a `thread_local!` and the exports are free functions.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use serde::Serialize;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Event, KeyboardEvent, Window};

use crate::consts::{GAME_HEIGHT, GAME_WIDTH};
use crate::device::DeviceClass;
use crate::input::KeyTracker;
use crate::runner::{FrameHost, drive_frame};
use crate::sim::{BrickCatalog, SimEvent, Snapshot, World};
use crate::tuning::Tuning;

type Listener = Closure<dyn FnMut(Event)>;

struct Game {
    world: World,
    keys: KeyTracker,
    /// Pending `requestAnimationFrame` id
    frame_handle: Option<i32>,
    on_frame: Option<Closure<dyn FnMut(f64)>>,
    listeners: Vec<(&'static str, Listener)>,
    attached: bool,
    on_render: Option<js_sys::Function>,
}

/// Per-frame payload handed to the page
#[derive(Serialize)]
struct FrameOut<'a> {
    snapshot: Snapshot<'a>,
    events: &'a [SimEvent],
}

thread_local! {
    static GAME: RefCell<Option<Rc<RefCell<Game>>>> = const { RefCell::new(None) };
}

fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no window"))
}

fn now_ms(window: &Window) -> f64 {
    window.performance().map(|p| p.now()).unwrap_or_else(js_sys::Date::now)
}

fn detect_device(window: &Window) -> DeviceClass {
    let navigator = window.navigator();
    let agent = navigator.user_agent().unwrap_or_default();
    let width = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(GAME_WIDTH as f64);
    let height = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(GAME_HEIGHT as f64);
    DeviceClass::detect(&agent, width, height, navigator.max_touch_points() > 0)
}

fn with_game<R>(f: impl FnOnce(&mut Game) -> R) -> Option<R> {
    let game = GAME.with(|cell| cell.borrow().clone())?;
    let mut g = game.borrow_mut();
    Some(f(&mut g))
}

/// Create the game on first call; restart it after `game_stop`.
///
/// `tuning_json` overrides physics knobs; `on_render(json)` is called once per
/// display frame.
#[wasm_bindgen]
pub fn game_start(tuning_json: Option<String>, on_render: Option<js_sys::Function>) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let window = window()?;
    let existing = GAME.with(|cell| cell.borrow().clone());
    let game = match existing {
        Some(game) => {
            if on_render.is_some() {
                game.borrow_mut().on_render = on_render;
            }
            game
        }
        None => {
            let tuning = Tuning::load_or_default(tuning_json.as_deref());
            let device = detect_device(&window);
            let world = World::new(tuning, BrickCatalog::builtin(), GAME_WIDTH, GAME_HEIGHT, device);
            let game = Rc::new(RefCell::new(Game {
                world,
                keys: KeyTracker::new(),
                frame_handle: None,
                on_frame: None,
                listeners: Vec::new(),
                attached: false,
                on_render,
            }));
            install(&game);
            GAME.with(|cell| *cell.borrow_mut() = Some(game.clone()));
            game
        }
    };

    {
        let mut g = game.borrow_mut();
        if g.world.is_running() {
            return Ok(());
        }
        attach_listeners(&window, &mut g)?;
        g.keys.clear();
        g.world.start(now_ms(&window));
    }
    schedule(&window, &game)?;
    log::info!("Brickfolio running");
    Ok(())
}

/// Stop ticking: cancel the pending frame, drop listeners and the pipe timer
#[wasm_bindgen]
pub fn game_stop() -> Result<(), JsValue> {
    let window = window()?;
    with_game(|g| -> Result<(), JsValue> {
        if let Some(handle) = g.frame_handle.take() {
            window.cancel_animation_frame(handle)?;
        }
        detach_listeners(&window, g)?;
        g.keys.clear();
        g.world.stop();
        Ok(())
    })
    .unwrap_or(Ok(()))
}

/// For on-screen buttons; same names as `KeyboardEvent.key`
#[wasm_bindgen]
pub fn game_key_down(key: &str) {
    with_game(|g| g.keys.press(key));
}

#[wasm_bindgen]
pub fn game_key_up(key: &str) {
    with_game(|g| g.keys.release(key));
}

#[wasm_bindgen]
pub fn game_close_modal() {
    with_game(|g| g.world.close_modal());
}

/// Re-detect the device class (resize, orientation change)
#[wasm_bindgen]
pub fn game_refresh_device() -> Result<(), JsValue> {
    let window = window()?;
    let device = detect_device(&window);
    with_game(|g| g.world.set_device(device));
    Ok(())
}

/// Current snapshot as JSON, for pages that poll instead of using `on_render`
#[wasm_bindgen]
pub fn game_snapshot() -> Result<String, JsValue> {
    with_game(|g| serde_json::to_string(&g.world.snapshot()))
        .ok_or_else(|| JsValue::from_str("game not started"))?
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Build the frame callback and the DOM listeners. They hold weak
/// references; the game owns them.
fn install(game: &Rc<RefCell<Game>>) {
    let weak = Rc::downgrade(game);
    let on_frame = Closure::<dyn FnMut(f64)>::new(move |time: f64| {
        if let Some(game) = weak.upgrade() {
            if let Err(e) = run_frame(&game, time) {
                log::error!("Frame failed: {:?}", e);
            }
        }
    });

    let listeners: Vec<(&'static str, Listener)> = vec![
        ("keydown", key_listener(Rc::downgrade(game), true)),
        ("keyup", key_listener(Rc::downgrade(game), false)),
        ("blur", {
            let weak = Rc::downgrade(game);
            Closure::new(move |_event: Event| {
                if let Some(game) = weak.upgrade() {
                    game.borrow_mut().keys.clear();
                }
            })
        }),
        ("resize", {
            let weak = Rc::downgrade(game);
            Closure::new(move |_event: Event| {
                let (Some(game), Some(window)) = (weak.upgrade(), web_sys::window()) else {
                    return;
                };
                let device = detect_device(&window);
                game.borrow_mut().world.set_device(device);
            })
        }),
    ];

    let mut g = game.borrow_mut();
    g.on_frame = Some(on_frame);
    g.listeners = listeners;
}

fn key_listener(weak: Weak<RefCell<Game>>, down: bool) -> Listener {
    Closure::new(move |event: Event| {
        let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
            return;
        };
        let Some(game) = weak.upgrade() else {
            return;
        };
        let key = event.key();
        if KeyTracker::is_game_key(&key) {
            event.prevent_default();
        }
        let mut g = game.borrow_mut();
        if down {
            g.keys.press(&key);
        } else {
            g.keys.release(&key);
        }
    })
}

fn attach_listeners(window: &Window, g: &mut Game) -> Result<(), JsValue> {
    if g.attached {
        return Ok(());
    }
    for (name, listener) in &g.listeners {
        window.add_event_listener_with_callback(name, listener.as_ref().unchecked_ref())?;
    }
    g.attached = true;
    Ok(())
}

fn detach_listeners(window: &Window, g: &mut Game) -> Result<(), JsValue> {
    if !g.attached {
        return Ok(());
    }
    for (name, listener) in &g.listeners {
        window.remove_event_listener_with_callback(name, listener.as_ref().unchecked_ref())?;
    }
    g.attached = false;
    Ok(())
}

fn schedule(window: &Window, game: &Rc<RefCell<Game>>) -> Result<(), JsValue> {
    let mut g = game.borrow_mut();
    if g.frame_handle.is_some() {
        return Ok(());
    }
    let handle = match g.on_frame.as_ref() {
        Some(on_frame) => window.request_animation_frame(on_frame.as_ref().unchecked_ref())?,
        None => return Ok(()),
    };
    g.frame_handle = Some(handle);
    Ok(())
}

/// The game as the frame driver sees it for one animation frame
struct WebHost<'a> {
    game: &'a Rc<RefCell<Game>>,
    window: Window,
}

impl FrameHost for WebHost<'_> {
    type Error = JsValue;

    fn is_running(&self) -> bool {
        self.game.borrow().world.is_running()
    }

    fn request_frame(&mut self) -> Result<(), JsValue> {
        schedule(&self.window, self.game)
    }

    fn produce(&mut self, now_ms: f64) -> Result<String, JsValue> {
        let mut g = self.game.borrow_mut();
        let keys = g.keys.snapshot();
        let events = g.world.frame(now_ms, keys);
        let out = FrameOut {
            snapshot: g.world.snapshot(),
            events: &events,
        };
        serde_json::to_string(&out).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    fn present(&mut self, frame: &str) -> Result<(), JsValue> {
        let on_render = self.game.borrow().on_render.clone();
        // No borrow is held here; the page may call back into the game
        match on_render {
            Some(on_render) => on_render.call1(&JsValue::NULL, &JsValue::from_str(frame)).map(|_| ()),
            None => Ok(()),
        }
    }
}

fn run_frame(game: &Rc<RefCell<Game>>, time: f64) -> Result<(), JsValue> {
    game.borrow_mut().frame_handle = None;
    let mut host = WebHost { game, window: window()? };
    drive_frame(&mut host, time)
}
