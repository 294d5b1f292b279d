// The #[wasm_bindgen(start)] call is needed but Clippy doesn't see that.
#![allow(clippy::unused_unit)]

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Mutex;

use wasm_bindgen::prelude::*;

use crate::bridge::{expose_closure, flog, log, now, request_animation_frame, url_params, Context};
use crate::lessons::{self, Lesson};
use crate::options::Config;

/// Longest step passed to a lesson. Keeps animations from jumping after
/// the tab has been in the background.
const MAX_FRAME_SECONDS: f32 = 0.1;

/// Seconds between animation frame timestamps, given in milliseconds.
pub fn elapsed_seconds(last: Option<f64>, now: f64) -> f32 {
    match last {
        Some(last) => (((now - last) / 1000.0) as f32).clamp(0.0, MAX_FRAME_SECONDS),
        None => 0.0,
    }
}

/// Owns the context and the running lesson, and drives them each frame.
pub struct Runner {
    ctx: Context,
    lesson: Box<dyn Lesson>,
    lesson_name: String,
    clear: [f32; 4],
    paused: bool,
    last_frame: Option<f64>,

    // Set when the lesson fails to draw, so the error is logged once.
    halted: bool,
}

impl Runner {
    fn new(config: &Config) -> Result<Runner, String> {
        let ctx = Context::new(&config.canvas)?;
        let lesson = lessons::create(&config.lesson, &ctx)
            .map_err(|e| format!("Failed to create lesson {}: {e}", config.lesson))?;

        Ok(Runner {
            ctx,
            lesson,
            lesson_name: config.lesson.clone(),
            clear: config.clear,
            paused: config.paused,
            last_frame: None,
            halted: false,
        })
    }

    /// Replace the running lesson. On failure the current one keeps running.
    fn set_lesson(&mut self, name: &str) -> anyhow::Result<()> {
        if !lessons::is_known(name) {
            return Err(anyhow::anyhow!("Unknown lesson: {name}."));
        }

        let lesson = lessons::create(name, &self.ctx)?;
        let mut old = std::mem::replace(&mut self.lesson, lesson);
        old.delete();

        flog!("Switched from {} to {name}.", self.lesson_name);
        self.lesson_name = name.to_string();
        self.last_frame = None;
        self.halted = false;
        Ok(())
    }

    fn set_options(&mut self, json: &str) -> anyhow::Result<()> {
        self.lesson.set_options(json)?;
        self.halted = false;
        Ok(())
    }

    fn animation_frame(&mut self, now: f64) {
        let dt = if self.paused {
            0.0
        } else {
            elapsed_seconds(self.last_frame, now)
        };
        self.last_frame = Some(now);

        if let Err(e) = self.ctx.fit_to_display() {
            log(&e);
        }

        for event in self.ctx.events() {
            self.lesson.input(&event);
        }

        if self.halted {
            return;
        }

        let solid = lessons::is_3d(&self.lesson_name);
        self.ctx.enable_depth(solid);
        self.ctx.enable_culling(solid);
        self.ctx.clear_screen(self.clear);

        if let Err(e) = self.lesson.frame(&self.ctx, dt) {
            flog!("Lesson {} failed to draw: {e}", self.lesson_name);
            self.halted = true;
        }
    }
}

type RunnerRef = Rc<Mutex<Runner>>;

fn lock_and<T, F: FnOnce(&mut Runner) -> T>(runner: &RunnerRef, action: F) -> Option<T> {
    if let Ok(mut lock) = runner.try_lock() {
        Some(action(&mut lock))
    } else {
        log("Failed to lock for handler.");
        None
    }
}

fn logged_error<T>(error_message: &str) -> Result<T, JsValue> {
    log(error_message);
    Err(wasm_bindgen::JsValue::from_str(error_message))
}

fn report(result: anyhow::Result<()>) -> bool {
    match result {
        Ok(()) => true,
        Err(e) => {
            flog!("{e}");
            false
        }
    }
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let params = match url_params() {
        Ok(p) => p,
        Err(e) => {
            flog!("Using default config: {e}");
            Vec::new()
        }
    };
    let (config, warnings) = Config::from_params(params);
    for warning in warnings {
        log(&warning);
    }

    let runner = match Runner::new(&config) {
        Ok(r) => Rc::new(Mutex::new(r)),
        Err(e) => return logged_error(&e),
    };

    // set_options(json) merges the given keys into the lesson's options
    // and returns whether they were accepted.
    let runner_ref = runner.clone();
    let set_options_closure = Closure::wrap(Box::new(move |json: String| {
        lock_and(&runner_ref, |r| report(r.set_options(&json))).unwrap_or(false)
    }) as Box<dyn FnMut(String) -> bool>);
    expose_closure("set_options", &set_options_closure).or_else(|e| logged_error(&e))?;
    set_options_closure.forget();

    let runner_ref = runner.clone();
    let get_options_closure = Closure::wrap(Box::new(move || {
        lock_and(&runner_ref, |r| r.lesson.options()).unwrap_or_default()
    }) as Box<dyn FnMut() -> String>);
    expose_closure("get_options", &get_options_closure).or_else(|e| logged_error(&e))?;
    get_options_closure.forget();

    let runner_ref = runner.clone();
    let set_lesson_closure = Closure::wrap(Box::new(move |name: String| {
        lock_and(&runner_ref, |r| report(r.set_lesson(&name))).unwrap_or(false)
    }) as Box<dyn FnMut(String) -> bool>);
    expose_closure("set_lesson", &set_lesson_closure).or_else(|e| logged_error(&e))?;
    set_lesson_closure.forget();

    let runner_ref = runner.clone();
    let set_paused_closure = Closure::wrap(Box::new(move |paused: bool| {
        lock_and(&runner_ref, |r| r.paused = paused);
    }) as Box<dyn FnMut(bool)>);
    expose_closure("set_paused", &set_paused_closure).or_else(|e| logged_error(&e))?;
    set_paused_closure.forget();

    let lesson_names_closure = Closure::wrap(Box::new(|| {
        lessons::NAMES
            .iter()
            .map(|&name| JsValue::from_str(name))
            .collect::<js_sys::Array>()
    }) as Box<dyn FnMut() -> js_sys::Array>);
    expose_closure("lesson_names", &lesson_names_closure).or_else(|e| logged_error(&e))?;
    lesson_names_closure.forget();

    let f: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    let g = f.clone();

    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |timestamp: f64| {
        if let Ok(mut lock) = runner.lock() {
            lock.animation_frame(timestamp);
        } else {
            log("Failed to lock runner for animation frame.");
        }

        if let Some(callback) = f.borrow().as_ref() {
            if let Err(e) = request_animation_frame(callback) {
                log(&e);
            }
        }
    }) as Box<dyn FnMut(f64)>));

    match g.borrow().as_ref() {
        Some(callback) => request_animation_frame(callback).or_else(|e| logged_error(&e))?,
        None => return logged_error("Animation frame callback missing."),
    }

    flog!("Started at {:.0}ms.", now().unwrap_or_default());
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_first_frame_is_still() {
        assert_eq!(elapsed_seconds(None, 1234.0), 0.0);
    }

    #[test]
    fn test_elapsed_seconds() {
        let dt = elapsed_seconds(Some(1000.0), 1016.0);
        assert!((dt - 0.016).abs() < 1e-6);
    }

    #[test]
    fn test_elapsed_seconds_clamped() {
        assert_eq!(elapsed_seconds(Some(0.0), 60_000.0), MAX_FRAME_SECONDS);
        assert_eq!(elapsed_seconds(Some(1000.0), 900.0), 0.0);
    }
}
