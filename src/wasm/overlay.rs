//! Active overlay instance, the rAF render loop, the page-facing API, and
//! the auto-start supervisor.
//!
//! At most one overlay is mounted per page; `start` fully stops and detaches
//! any prior instance before mounting a new one. Everything runs on the
//! page's event loop; the only deferred work outside the render loop is the
//! real-time burst restoration timer.

use std::cell::RefCell;
use std::rc::Rc;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{console, window, DocumentReadyState};

use crate::config::{ColorOverrides, ConfigOverrides, OverlayConfig, RandomRange, RangeOverrides};
use crate::engine::OverlayEngine;
use crate::error::InitOutcome;

use super::render::Surface;

struct OverlayInstance {
    engine: OverlayEngine,
    surface: Surface,
    rng: SmallRng,
    raf_id: Option<i32>,
}

type Handle = Rc<RefCell<OverlayInstance>>;

thread_local! {
    /// The page's single active overlay, if any.
    static ACTIVE: RefCell<Option<Handle>> = const { RefCell::new(None) };
}

fn active() -> Option<Handle> {
    ACTIVE.with(|a| a.borrow().clone())
}

/// Stop and detach the active overlay, if any. Safe when nothing is mounted.
fn stop_active() {
    let previous = ACTIVE.with(|a| a.borrow_mut().take());
    if let Some(handle) = previous {
        let mut instance = handle.borrow_mut();
        instance.engine.disable();
        if let Some(id) = instance.raf_id.take() {
            if let Some(win) = window() {
                let _ = win.cancel_animation_frame(id);
            }
        }
        instance.surface.detach();
    }
}

/// One mount attempt. A missing `document.body` is not an error, merely too
/// early; everything else failing is reported for the supervisor to log.
fn try_mount(config: OverlayConfig) -> InitOutcome<Handle> {
    use crate::error::MountError;

    let Some(win) = window() else {
        return InitOutcome::Failed(MountError::NoWindow);
    };
    let Some(document) = win.document() else {
        return InitOutcome::Failed(MountError::NoDocument);
    };
    let Some(body) = document.body() else {
        return InitOutcome::RetryLater;
    };

    let surface = match Surface::mount(&document, &body) {
        Ok(surface) => surface,
        Err(err) => return InitOutcome::Failed(err),
    };

    let mut rng = SmallRng::seed_from_u64(js_sys::Date::now() as u64);
    let engine = OverlayEngine::new(config, &mut rng);
    let handle = Rc::new(RefCell::new(OverlayInstance {
        engine,
        surface,
        rng,
        raf_id: None,
    }));

    let resize = {
        let handle = handle.clone();
        Closure::wrap(Box::new(move || {
            handle.borrow_mut().surface.fit();
        }) as Box<dyn FnMut()>)
    };
    let _ = win.add_event_listener_with_callback("resize", resize.as_ref().unchecked_ref());
    resize.forget();

    start_animation(&handle);
    InitOutcome::Mounted(handle)
}

/// Kick off the self-rescheduling animation-frame loop. The closure holds
/// itself alive through the `Rc<RefCell<Option<Closure>>>` cycle and stops
/// rescheduling as soon as the engine reports disabled.
fn start_animation(handle: &Handle) {
    let f: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let g = f.clone();
    let instance = handle.clone();

    *g.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        let instance_ref = &mut *instance.borrow_mut();
        let viewport = instance_ref.surface.viewport();
        let Some(plan) = instance_ref.engine.tick(viewport, &mut instance_ref.rng) else {
            // disabled mid-loop: draw nothing, schedule nothing further
            instance_ref.raf_id = None;
            return;
        };
        if let Err(err) = instance_ref.surface.draw(&plan, instance_ref.engine.config()) {
            console::warn_1(&err);
        }
        instance_ref.raf_id = f
            .borrow()
            .as_ref()
            .and_then(|cb| request_frame(cb).ok());
    }) as Box<dyn FnMut()>));

    let first = g
        .borrow()
        .as_ref()
        .and_then(|cb| request_frame(cb).ok());
    handle.borrow_mut().raf_id = first;
}

fn request_frame(cb: &Closure<dyn FnMut()>) -> Result<i32, JsValue> {
    window()
        .ok_or_else(|| JsValue::from_str("no window"))?
        .request_animation_frame(cb.as_ref().unchecked_ref())
}

fn schedule_timeout(ms: i32, f: impl FnOnce() + 'static) {
    let Some(win) = window() else { return };
    let cb = Closure::once_into_js(f);
    let _ = win.set_timeout_with_callback_and_timeout_and_arguments_0(cb.unchecked_ref(), ms);
}

/// Consume [`try_mount`] outcomes: activate on success, re-attempt shortly
/// when the body is not there yet, and log construction failures (with one
/// delayed retry on the auto-start path). Never throws into the page.
///
/// Any previously active overlay is fully stopped and detached before the
/// new surface mounts, so two surfaces are never mounted at once.
fn mount_supervised(config: OverlayConfig, retry_failed_once: bool) {
    stop_active();
    match try_mount(config.clone()) {
        InitOutcome::Mounted(handle) => {
            ACTIVE.with(|a| *a.borrow_mut() = Some(handle));
        }
        InitOutcome::RetryLater => {
            schedule_timeout(100, move || mount_supervised(config, retry_failed_once));
        }
        InitOutcome::Failed(err) => {
            console::error_1(&JsValue::from_str(&format!(
                "glitch overlay: mount failed: {err}"
            )));
            if retry_failed_once {
                schedule_timeout(1000, move || mount_supervised(config, false));
            }
        }
    }
}

fn parse_json<T: Default + serde::de::DeserializeOwned>(json: Option<&str>, what: &str) -> T {
    let Some(json) = json else {
        return T::default();
    };
    match serde_json::from_str(json) {
        Ok(value) => value,
        Err(err) => {
            console::warn_1(&JsValue::from_str(&format!(
                "glitch overlay: ignoring malformed {what}: {err}"
            )));
            T::default()
        }
    }
}

/// Start a new overlay, stopping any active one first. `config_json` is a
/// JSON object with any subset of the recognized options.
#[wasm_bindgen(js_name = start)]
pub fn start(config_json: Option<String>) {
    let overrides: ConfigOverrides = parse_json(config_json.as_deref(), "config");
    mount_supervised(OverlayConfig::resolve(overrides), false);
}

/// Tear down the active overlay, if any. Idempotent.
#[wasm_bindgen(js_name = stop)]
pub fn stop() {
    stop_active();
}

/// Force intensity to 1 for `duration_ms` real milliseconds, then restore
/// the pre-burst value. No-op without an active overlay.
#[wasm_bindgen(js_name = burst)]
pub fn burst(duration_ms: Option<f64>) {
    let duration = duration_ms.unwrap_or(1000.0);
    let Some(handle) = active() else { return };
    let generation = handle.borrow_mut().engine.begin_burst();
    schedule_timeout(duration as i32, move || {
        handle.borrow_mut().engine.end_burst(generation);
    });
}

/// Merge a partial color set into the active overlay, effective next tick.
#[wasm_bindgen(js_name = setColors)]
pub fn set_colors(colors_json: &str) {
    let overrides: ColorOverrides = parse_json(Some(colors_json), "colors");
    if let Some(handle) = active() {
        handle.borrow_mut().engine.set_colors(&overrides);
    }
}

/// Merge partial random-timing bounds into the active overlay.
#[wasm_bindgen(js_name = setRandomRange)]
pub fn set_random_range(range_json: &str) {
    let overrides: RangeOverrides = parse_json(Some(range_json), "random range");
    if let Some(handle) = active() {
        handle.borrow_mut().engine.set_random_range(&overrides);
    }
}

/// Set the overlay intensity, clamped to [0, 1].
#[wasm_bindgen(js_name = setIntensity)]
pub fn set_intensity(intensity: f64) {
    if let Some(handle) = active() {
        handle.borrow_mut().engine.set_intensity(intensity);
    }
}

fn primary_preset() -> OverlayConfig {
    OverlayConfig {
        intensity: 0.5,
        random_range: RandomRange {
            frequency_min: 500.0,
            frequency_max: 2000.0,
            duration_min: 200.0,
            duration_max: 800.0,
        },
        ..OverlayConfig::default()
    }
}

fn secondary_preset() -> OverlayConfig {
    OverlayConfig {
        intensity: 0.4,
        random_range: RandomRange {
            frequency_min: 800.0,
            frequency_max: 2500.0,
            duration_min: 200.0,
            duration_max: 700.0,
        },
        ..OverlayConfig::default()
    }
}

fn auto_start() {
    mount_supervised(primary_preset(), false);
    schedule_timeout(3000, || burst(Some(1000.0)));
}

/// Hook the document/window so a default overlay appears without the page
/// calling anything: on DOMContentLoaded (or a short fallback delay when the
/// document is already interactive), again on `load` if nothing is active,
/// and via an independent zero-delay timer that retries once on failure.
pub fn install_auto_start() -> Result<(), JsValue> {
    let win = window().ok_or("no window")?;
    let document = win.document().ok_or("no document")?;

    if document.ready_state() == DocumentReadyState::Loading {
        let on_ready = Closure::wrap(Box::new(auto_start) as Box<dyn FnMut()>);
        document
            .add_event_listener_with_callback("DOMContentLoaded", on_ready.as_ref().unchecked_ref())?;
        on_ready.forget();
    } else {
        schedule_timeout(100, auto_start);
    }

    let on_load = Closure::wrap(Box::new(|| {
        if active().is_none() {
            auto_start();
        }
    }) as Box<dyn FnMut()>);
    win.add_event_listener_with_callback("load", on_load.as_ref().unchecked_ref())?;
    on_load.forget();

    schedule_timeout(0, || mount_supervised(secondary_preset(), true));
    Ok(())
}
