//! Wireframe backdrops in the browser. Each canvas gets its own task that
//! owns the renderer and reacts to commands: animation frames, visibility
//! changes, resizes and disposal.

use std::cell::RefCell;
use std::collections::HashMap;

use gloo::events::EventListener;
use gloo::render::{request_animation_frame, AnimationFrame};
use gloo::timers::callback::Timeout;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use crate::error::UiError;
use crate::renderer::Renderer;
use crate::scene::{drawing_buffer_size, GeometryKind, Lifecycle, Transition, WireframeScene};

/// Share of the canvas that must be on screen for it to count as visible.
const VISIBILITY_THRESHOLD: f64 = 0.1;
const SAMPLE_COUNT: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireframeCommand {
    Frame,
    Visibility(bool),
    Resize,
    ResizeSettled,
    Dispose,
}

#[derive(Debug, Clone, Copy)]
pub struct WireframeSettings {
    /// sRGB accent; linearised when the surface encodes sRGB itself.
    pub color: [f32; 3],
    pub opacity: f32,
    pub spin: (f32, f32),
    /// `false` renders a still frame on start and after resizes only.
    pub animate: bool,
    pub max_pixel_ratio: f64,
    pub resize_debounce_ms: u32,
}

thread_local! {
    static REGISTRY: RefCell<HashMap<String, flume::Sender<WireframeCommand>>> = RefCell::new(HashMap::new());
}

/// Stops the backdrop on `canvas_id` and frees its GPU resources. Returns
/// `false` when there is nothing (left) to dispose.
#[wasm_bindgen(js_name = disposeWireframe)]
pub fn dispose_wireframe(canvas_id: &str) -> bool {
    REGISTRY
        .with(|registry| registry.borrow_mut().remove(canvas_id))
        .map(|tx| tx.send(WireframeCommand::Dispose).is_ok())
        .unwrap_or(false)
}

/// Starts a backdrop on the canvas with id `canvas_id`.
pub fn spawn(canvas_id: &str, geometry: &str, settings: WireframeSettings) -> Result<(), UiError> {
    let canvas = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(canvas_id))
        .ok_or_else(|| UiError::missing(canvas_id))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| UiError::Dom(format!("`{}` is not a canvas", canvas_id)))?;
    let kind = GeometryKind::from_name(geometry);

    let (tx, rx) = flume::unbounded();
    REGISTRY.with(|registry| registry.borrow_mut().insert(canvas_id.to_string(), tx.clone()));

    let id = canvas_id.to_string();
    wasm_bindgen_futures::spawn_local(async move {
        if let Err(e) = run(canvas, kind, settings, tx.clone(), rx).await {
            log::error!("wireframe `{}`: {}", id, e);
        }
        REGISTRY.with(|registry| {
            let mut registry = registry.borrow_mut();
            if registry.get(&id).is_some_and(|current| current.same_channel(&tx)) {
                registry.remove(&id);
            }
        });
        log::debug!("wireframe `{}`: stopped", id);
    });
    Ok(())
}

fn buffer_size(canvas: &HtmlCanvasElement, max_pixel_ratio: f64) -> (u32, u32) {
    let ratio = web_sys::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0);
    drawing_buffer_size(
        f64::from(canvas.client_width()),
        f64::from(canvas.client_height()),
        ratio,
        max_pixel_ratio,
    )
}

fn next_frame(tx: &flume::Sender<WireframeCommand>) -> AnimationFrame {
    let tx = tx.clone();
    request_animation_frame(move |_| {
        let _ = tx.send(WireframeCommand::Frame);
    })
}

/// Observer plus the callback it holds, disconnected on drop.
struct VisibilityWatch {
    observer: IntersectionObserver,
    _callback: Closure<dyn FnMut(js_sys::Array)>,
}

impl VisibilityWatch {
    fn new(canvas: &HtmlCanvasElement, tx: flume::Sender<WireframeCommand>) -> Result<Self, UiError> {
        let callback = Closure::<dyn FnMut(js_sys::Array)>::new(move |entries: js_sys::Array| {
            for entry in entries.iter() {
                if let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() {
                    let _ = tx.send(WireframeCommand::Visibility(entry.is_intersecting()));
                }
            }
        });
        let options = IntersectionObserverInit::new();
        options.set_threshold(&JsValue::from_f64(VISIBILITY_THRESHOLD));
        let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)
            .map_err(|e| UiError::Dom(format!("{:?}", e)))?;
        observer.observe(canvas);
        Ok(Self {
            observer,
            _callback: callback,
        })
    }
}

impl Drop for VisibilityWatch {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

async fn run(
    canvas: HtmlCanvasElement,
    kind: GeometryKind,
    settings: WireframeSettings,
    tx: flume::Sender<WireframeCommand>,
    rx: flume::Receiver<WireframeCommand>,
) -> Result<(), UiError> {
    let (width, height) = buffer_size(&canvas, settings.max_pixel_ratio);
    canvas.set_width(width);
    canvas.set_height(height);

    let mut renderer = Renderer::new(canvas.clone(), &kind.mesh(), SAMPLE_COUNT)
        .await
        .map_err(|e| UiError::Dom(e.to_string()))?;
    let mut scene = WireframeScene::new(kind, width, height, settings.spin);
    let color = if renderer.is_srgb() {
        settings.color.map(crate::scene::srgb_to_linear)
    } else {
        settings.color
    };

    let _visibility = VisibilityWatch::new(&canvas, tx.clone())?;
    let _resize = web_sys::window().map(|window| {
        let tx = tx.clone();
        EventListener::new(&window, "resize", move |_| {
            let _ = tx.send(WireframeCommand::Resize);
        })
    });

    log::info!("wireframe `{}`: {:?} running", canvas.id(), kind);
    let mut lifecycle = Lifecycle::Running;
    let mut frame = Some(next_frame(&tx));
    let mut settle: Option<Timeout> = None;

    while let Ok(command) = rx.recv_async().await {
        match command {
            WireframeCommand::Frame => {
                frame = None;
                if lifecycle.is_running() {
                    if settings.animate {
                        scene.step();
                    }
                    renderer.render(&scene.uniform(color, settings.opacity));
                    if settings.animate {
                        frame = Some(next_frame(&tx));
                    }
                }
            }
            WireframeCommand::Visibility(visible) => {
                let (next, transition) = lifecycle.on_visibility(visible);
                lifecycle = next;
                match transition {
                    Transition::StartLoop => frame = Some(next_frame(&tx)),
                    // Dropping the handle cancels the pending callback.
                    Transition::StopLoop => frame = None,
                    Transition::Release | Transition::Stay => {}
                }
            }
            WireframeCommand::Resize => {
                let tx = tx.clone();
                // Replacing the timeout cancels the previous one.
                settle = Some(Timeout::new(settings.resize_debounce_ms, move || {
                    let _ = tx.send(WireframeCommand::ResizeSettled);
                }));
            }
            WireframeCommand::ResizeSettled => {
                settle = None;
                let (width, height) = buffer_size(&canvas, settings.max_pixel_ratio);
                canvas.set_width(width);
                canvas.set_height(height);
                renderer.resize(width, height);
                scene.set_viewport(width, height);
                if lifecycle.is_running() && frame.is_none() {
                    frame = Some(next_frame(&tx));
                }
            }
            WireframeCommand::Dispose => {
                let (next, transition) = lifecycle.dispose();
                lifecycle = next;
                if transition == Transition::Release {
                    break;
                }
            }
        }
    }

    drop(frame);
    drop(settle);
    renderer.dispose();
    Ok(())
}
