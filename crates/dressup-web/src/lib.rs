pub mod dom;
pub mod listeners;
pub mod runner;

pub use dom::DomScene;
pub use listeners::ListenerSet;
pub use runner::WebRunner;

use std::cell::RefCell;

use dressup_engine::SurfaceConfig;
use wasm_bindgen::prelude::*;

thread_local! {
    static RUNNER: RefCell<Option<WebRunner>> = RefCell::new(None);
}

/// Run `f` against the mounted surface.
///
/// Returns `None` when nothing is mounted, or when the runner is already
/// borrowed (a DOM callback fired synchronously from inside a frame); the
/// event is dropped in that case rather than panicking.
pub(crate) fn with_runner<R>(f: impl FnOnce(&mut WebRunner) -> R) -> Option<R> {
    RUNNER.with(|cell| {
        let mut borrow = cell.try_borrow_mut().ok()?;
        borrow.as_mut().map(f)
    })
}

/// Mount the surface on the current page. `config_json` may be `"{}"`.
/// Calling it again tears the previous mount down first.
#[wasm_bindgen]
pub fn surface_init(config_json: &str) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let config = SurfaceConfig::from_json(config_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;

    surface_destroy();
    let runner = WebRunner::mount(window, config)?;
    RUNNER.with(|cell| {
        *cell.borrow_mut() = Some(runner);
    });
    with_runner(|r| r.install_listeners());
    log::info!("dressup: initialized");
    Ok(())
}

/// Remove every listener and stop the conveyors.
#[wasm_bindgen]
pub fn surface_destroy() {
    let previous = RUNNER.with(|cell| cell.borrow_mut().take());
    if let Some(mut runner) = previous {
        runner.teardown();
        log::info!("dressup: destroyed");
    }
}

/// Advance one animation frame. `now_ms` is the `requestAnimationFrame` timestamp.
#[wasm_bindgen]
pub fn surface_frame(now_ms: f64) {
    with_runner(|r| r.tick(now_ms));
}

// ---- Data accessors ----

#[wasm_bindgen]
pub fn get_cues_ptr() -> *const u8 {
    with_runner(|r| r.runner().cues_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_cues_len() -> u32 {
    with_runner(|r| r.runner().cues_len()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_placements_ptr() -> *const f32 {
    with_runner(|r| r.runner().placements_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_placements_len() -> u32 {
    with_runner(|r| r.runner().placements_len()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_stage_scale() -> f64 {
    with_runner(|r| r.runner().surface().stage().scale()).unwrap_or(1.0)
}
