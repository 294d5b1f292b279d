use std::rc::Rc;

use js_sys::{Array, Float32Array};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, HtmlCanvasElement, UiEvent, UrlSearchParams, WebGl2RenderingContext, WebGlBuffer,
    Window,
};

use crate::err;
use crate::render::{self, Gl};
use crate::Res;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console, js_name = log)]
    pub fn log(s: &str);
}

pub mod event;

macro_rules! flog {
    ($($tts:tt)*) => {
        crate::bridge::log(&format!($($tts)*))
    }
}

pub(crate) use flog;

struct Canvas {
    element: Rc<HtmlCanvasElement>,

    // Array where input events are stored to be handled by the frame loop.
    events: Rc<Array>,
}

impl Canvas {
    /// Find the canvas with this id, or create one filling the window.
    fn by_id(id: &str) -> Res<Canvas> {
        let document = get_document()?;
        let existing = document.get_element_by_id(id);
        let created = existing.is_none();
        let element = match existing {
            Some(e) => e,
            None => {
                let e = document
                    .create_element("canvas")
                    .map_err(|e| format!("Failed to create canvas: {e:?}."))?;
                e.set_id(id);
                match document.body() {
                    Some(body) => body
                        .append_child(&e)
                        .map_err(|e| format!("Failed to add canvas to page: {e:?}."))?,
                    None => return err("No document body."),
                };
                e
            }
        };

        let element = match element.dyn_into::<HtmlCanvasElement>() {
            Ok(c) => c,
            Err(_) => return err("Couldn't cast Element to HtmlCanvas."),
        };

        let canvas = Canvas {
            element: Rc::new(element),
            events: Rc::new(Array::new()),
        };
        canvas.init(created)?;

        Ok(canvas)
    }

    /// Set up event handling. A canvas created here is also styled to fill
    /// the window. One from the page keeps the page's layout.
    fn init(&self, fill_window: bool) -> Res<()> {
        if fill_window {
            self.set_css("width", "100vw")?;
            self.set_css("height", "100vh")?;
            self.set_css("display", "block")?;
        }

        // Needed for the canvas to receive keyboard events.
        self.element
            .set_attribute("tabindex", "0")
            .map_err(|e| format!("Failed to set canvas tabindex: {e:?}."))?;

        self.configure_events()
    }

    fn set_css(&self, property: &str, value: &str) -> Res<()> {
        self.element
            .style()
            .set_property(property, value)
            .map_err(|e| format!("Failed to set canvas CSS: {e:?}."))
    }

    fn configure_events(&self) -> Res<()> {
        // Grab focus on mouse entry so key presses reach the canvas.
        let element = self.element.clone();
        let listener = Closure::wrap(Box::new(move |_event: web_sys::MouseEvent| {
            element.focus().ok();
        }) as Box<dyn FnMut(web_sys::MouseEvent)>);
        if self
            .element
            .add_event_listener_with_callback("mouseenter", listener.as_ref().unchecked_ref())
            .is_err()
        {
            return err("Failed to add mouse event listener to canvas.");
        }
        listener.forget();

        for event_name in [
            "mousedown",
            "mouseup",
            "mouseleave",
            "mousemove",
            "wheel",
            "keydown",
            "keyup",
        ] {
            let events = self.events.clone();
            let listener = Closure::wrap(Box::new(move |event: UiEvent| {
                events.push(&event);

                if event_name == "wheel" {
                    event.prevent_default();
                }
            }) as Box<dyn FnMut(UiEvent)>);

            if self
                .element
                .add_event_listener_with_callback(event_name, listener.as_ref().unchecked_ref())
                .is_err()
            {
                return err("Failed to add event listener to canvas.");
            }

            listener.forget();
        }

        Ok(())
    }

    /// Size in device pixels the canvas is displayed at.
    fn display_size(&self) -> Res<(u32, u32)> {
        let ratio = window()?.device_pixel_ratio();
        Ok((
            display_pixels(self.element.client_width(), ratio),
            display_pixels(self.element.client_height(), ratio),
        ))
    }
}

pub fn display_pixels(css_pixels: i32, device_pixel_ratio: f64) -> u32 {
    (css_pixels.max(0) as f64 * device_pixel_ratio).round() as u32
}

/// The GL instance: the WebGL context of a canvas plus the conveniences
/// every lesson needs.
pub struct Context {
    // Wrapped in Rc because lessons keep their own handle to it.
    gl: Rc<Gl>,
    canvas: Canvas,
}

impl Context {
    pub fn new(canvas_id: &str) -> Res<Context> {
        let canvas = Canvas::by_id(canvas_id)?;
        let gl = Rc::new(create_context(&canvas.element)?);
        let ctx = Context { gl, canvas };
        let (width, height) = ctx.canvas.display_size()?;
        ctx.set_size(width, height);
        Ok(ctx)
    }

    pub fn gl(&self) -> &Rc<Gl> {
        &self.gl
    }

    pub fn size(&self) -> (u32, u32) {
        (self.canvas.element.width(), self.canvas.element.height())
    }

    pub fn aspect(&self) -> f32 {
        let (w, h) = self.size();
        if h == 0 {
            1.0
        } else {
            w as f32 / h as f32
        }
    }

    pub fn set_size(&self, width: u32, height: u32) {
        self.canvas.element.set_width(width);
        self.canvas.element.set_height(height);
        self.gl.viewport(0, 0, width as i32, height as i32);
    }

    /// Resize the drawing buffer to match the size the canvas is displayed
    /// at. Returns true if the size changed.
    pub fn fit_to_display(&self) -> Res<bool> {
        let (width, height) = self.canvas.display_size()?;
        if (width, height) == self.size() {
            return Ok(false);
        }

        self.set_size(width, height);
        Ok(true)
    }

    pub fn clear_screen(&self, colour: [f32; 4]) {
        let [r, g, b, a] = colour;
        self.gl.clear_color(r, g, b, a);
        self.gl
            .clear(Gl::COLOR_BUFFER_BIT | Gl::DEPTH_BUFFER_BIT);
    }

    pub fn enable_depth(&self, enabled: bool) {
        self.toggle(Gl::DEPTH_TEST, enabled);
    }

    pub fn enable_culling(&self, enabled: bool) {
        self.toggle(Gl::CULL_FACE, enabled);
    }

    fn toggle(&self, capability: u32, enabled: bool) {
        if enabled {
            self.gl.enable(capability);
        } else {
            self.gl.disable(capability);
        }
    }

    pub fn create_array_buffer(&self, data: &[f32]) -> anyhow::Result<WebGlBuffer> {
        render::create_buffer(&self.gl, Some(&Float32Array::from(data)))
    }

    pub fn events(&self) -> Vec<event::InputEvent> {
        let mut events = Vec::new();
        // Events are pushed on the end, so take them from the front.
        while self.canvas.events.length() > 0 {
            let event = self.canvas.events.shift();
            let event = event.unchecked_ref::<UiEvent>();
            if let Some(e) = event::InputEvent::from_web_sys(event) {
                events.push(e);
            }
        }
        events
    }
}

fn create_context(element: &HtmlCanvasElement) -> Res<Gl> {
    let context = match element.get_context("webgl2") {
        Ok(Some(c)) => c,
        _ => return err("WebGL2 is not supported by this browser."),
    };

    match context.dyn_into::<WebGl2RenderingContext>() {
        Ok(gl) => Ok(gl),
        Err(_) => err("Couldn't cast context to WebGl2RenderingContext."),
    }
}

fn window() -> Res<Window> {
    match web_sys::window() {
        Some(w) => Ok(w),
        None => err("No Window."),
    }
}

fn get_document() -> Res<Document> {
    match window()?.document() {
        Some(d) => Ok(d),
        None => err("No Document."),
    }
}

pub fn request_animation_frame(f: &Closure<dyn FnMut(f64)>) -> Res<()> {
    match window()?.request_animation_frame(f.as_ref().unchecked_ref()) {
        Ok(_) => Ok(()),
        Err(_) => err("Failed to get animation frame."),
    }
}

/// Milliseconds on the page's performance clock.
pub fn now() -> Res<f64> {
    match window()?.performance() {
        Some(p) => Ok(p.now()),
        None => err("No Performance."),
    }
}

/// Query string parameters of the page URL as (key, value) pairs.
pub fn url_params() -> Res<Vec<(String, String)>> {
    let search = window()?
        .location()
        .search()
        .map_err(|e| format!("Failed to read URL: {e:?}."))?;
    let params = UrlSearchParams::new_with_str(&search)
        .map_err(|e| format!("Failed to parse URL parameters: {e:?}."))?;

    let mut pairs = Vec::new();
    for entry in js_sys::try_iter(&params)
        .map_err(|e| format!("Failed to iterate URL parameters: {e:?}."))?
        .into_iter()
        .flatten()
        .flatten()
    {
        let entry: Array = entry.unchecked_into();
        if let (Some(k), Some(v)) = (entry.get(0).as_string(), entry.get(1).as_string()) {
            pairs.push((k, v));
        }
    }
    Ok(pairs)
}

/// Make a closure callable from the page as `window.<name>`.
pub fn expose_closure<T: ?Sized>(name: &str, closure: &Closure<T>) -> Res<()> {
    let window = window()?;
    match js_sys::Reflect::set(&window, &JsValue::from_str(name), closure.as_ref()) {
        Ok(_) => Ok(()),
        Err(e) => err(format!("Failed to expose {name}: {e:?}.")),
    }
}

#[cfg(test)]
mod test {
    use super::display_pixels;

    #[test]
    fn test_display_pixels() {
        assert_eq!(display_pixels(300, 1.0), 300);
        assert_eq!(display_pixels(300, 2.0), 600);
        assert_eq!(display_pixels(101, 1.5), 152);
        assert_eq!(display_pixels(-5, 2.0), 0);
    }
}
