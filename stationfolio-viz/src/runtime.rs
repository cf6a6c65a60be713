//! Browser runtime: mounting a scene on a canvas
//!
//! Wires a [`Scene`] to the DOM: measures the container, tracks the pointer,
//! and drives the scene from a `requestAnimationFrame` chain. Everything the
//! mount registers is owned by a [`SceneHandle`] and released when the handle
//! is destroyed.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Event, EventTarget, HtmlCanvasElement, MouseEvent, Window};

use crate::canvas2d::{Canvas2DSurface, SurfaceError};
use crate::clock::SceneClock;
use crate::scene::Scene;
use crate::viewport::{PointerTracker, ViewportManager};

/// Which box a scene sizes itself to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    /// The canvas's parent element
    Parent,
    /// The browser window's inner size
    Window,
}

/// Mount options
#[derive(Debug, Clone, Copy)]
pub struct MountOptions {
    pub container: Container,
    /// Listen for pointer moves and forward them to the scene
    pub track_pointer: bool,
}

struct SceneState<S> {
    scene: S,
    surface: Canvas2DSurface,
    viewports: ViewportManager,
    pointer: PointerTracker,
    clock: SceneClock,
}

/// A DOM event listener removed when dropped
struct EventListener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl EventListener {
    fn new(
        target: &EventTarget,
        event: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<Self, SurfaceError> {
        let callback = Closure::<dyn FnMut(Event)>::new(handler);
        target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            event,
            callback,
        })
    }
}

impl Drop for EventListener {
    fn drop(&mut self) {
        self.target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref())
            .ok();
    }
}

/// Cancellation state of an animation frame chain
#[derive(Debug, Default)]
struct FrameChain {
    cancelled: Cell<bool>,
    pending: Cell<Option<i32>>,
}

impl FrameChain {
    fn should_continue(&self) -> bool {
        !self.cancelled.get()
    }

    /// Record the id of the next requested frame. Returns false once
    /// cancelled, in which case the caller must cancel `id` itself.
    fn scheduled(&self, id: i32) -> bool {
        if self.cancelled.get() {
            return false;
        }
        self.pending.set(Some(id));
        true
    }

    /// Stop the chain. Returns the pending frame id on the first call only.
    fn cancel(&self) -> Option<i32> {
        if self.cancelled.replace(true) {
            return None;
        }
        self.pending.take()
    }
}

/// A self-rescheduling animation frame callback that can be stopped
struct AnimationLoop {
    window: Window,
    chain: Rc<FrameChain>,
    callback: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>,
}

impl AnimationLoop {
    fn start(window: &Window, mut on_frame: impl FnMut(f64) + 'static) -> Result<Self, SurfaceError> {
        let chain = Rc::new(FrameChain::default());
        let callback: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));

        let next = {
            let chain = chain.clone();
            let callback = callback.clone();
            let window = window.clone();
            move |timestamp: f64| {
                if !chain.should_continue() {
                    return;
                }
                on_frame(timestamp);

                if let Some(closure) = callback.borrow().as_ref() {
                    match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
                        Ok(id) if !chain.scheduled(id) => {
                            window.cancel_animation_frame(id).ok();
                        }
                        Ok(_) => {}
                        Err(err) => tracing::warn!(?err, "failed to schedule next frame"),
                    }
                }
            }
        };
        *callback.borrow_mut() = Some(Closure::new(next));

        if let Some(closure) = callback.borrow().as_ref() {
            let id = window.request_animation_frame(closure.as_ref().unchecked_ref())?;
            chain.scheduled(id);
        }

        Ok(Self {
            window: window.clone(),
            chain,
            callback,
        })
    }

    /// Stop the chain. Drops the callback, which also breaks its self-reference.
    fn cancel(&self) {
        if let Some(id) = self.chain.cancel() {
            self.window.cancel_animation_frame(id).ok();
        }
        self.callback.borrow_mut().take();
    }
}

struct Mounted {
    animation: AnimationLoop,
    _listeners: Vec<EventListener>,
}

/// Handle to a running scene. Call `destroy()` when the canvas is torn down.
#[wasm_bindgen]
pub struct SceneHandle {
    mounted: Option<Mounted>,
}

#[wasm_bindgen]
impl SceneHandle {
    /// Stop the animation loop and remove all event listeners. Idempotent.
    pub fn destroy(&mut self) {
        if let Some(mounted) = self.mounted.take() {
            mounted.animation.cancel();
            tracing::debug!("scene destroyed");
        }
    }

    /// Whether the scene is still animating
    #[wasm_bindgen(getter)]
    pub fn running(&self) -> bool {
        self.mounted.is_some()
    }
}

impl Drop for SceneHandle {
    fn drop(&mut self) {
        self.destroy();
    }
}

fn measure(container: Container, window: &Window, canvas: &HtmlCanvasElement) -> (f64, f64) {
    match container {
        Container::Parent => canvas
            .parent_element()
            .map(|parent| {
                let rect = parent.get_bounding_client_rect();
                (rect.width(), rect.height())
            })
            .unwrap_or((0.0, 0.0)),
        Container::Window => {
            let width = window.inner_width().ok().and_then(|v| v.as_f64());
            let height = window.inner_height().ok().and_then(|v| v.as_f64());
            (width.unwrap_or(0.0), height.unwrap_or(0.0))
        }
    }
}

fn apply_resize<S: Scene>(state: &mut SceneState<S>, container: Container, window: &Window) {
    let (width, height) = measure(container, window, state.surface.canvas());
    let Some(viewport) = state
        .viewports
        .resize(width, height, window.device_pixel_ratio())
    else {
        return;
    };

    if let Err(err) = state.surface.configure(&viewport) {
        tracing::warn!(%err, "failed to configure canvas");
    }
    state.scene.resize(&viewport);
}

/// Mount a scene on a canvas.
///
/// Returns `Ok(None)` if the canvas has no usable 2D context; the scene is
/// then simply not shown.
pub fn mount<S: Scene + 'static>(
    canvas: HtmlCanvasElement,
    scene: S,
    options: MountOptions,
) -> Result<Option<SceneHandle>, SurfaceError> {
    let window = web_sys::window().ok_or(SurfaceError::NoWindow)?;

    let surface = match Canvas2DSurface::new(canvas) {
        Ok(surface) => surface,
        Err(err) => {
            tracing::warn!(%err, "canvas unavailable, scene disabled");
            return Ok(None);
        }
    };

    let state = Rc::new(RefCell::new(SceneState {
        scene,
        surface,
        viewports: ViewportManager::new(),
        pointer: PointerTracker::new(),
        clock: SceneClock::new(),
    }));

    apply_resize(&mut state.borrow_mut(), options.container, &window);

    let mut listeners = Vec::new();
    {
        let state = state.clone();
        let win = window.clone();
        listeners.push(EventListener::new(&window, "resize", move |_| {
            apply_resize(&mut state.borrow_mut(), options.container, &win);
        })?);
    }

    if options.track_pointer {
        let state = state.clone();
        listeners.push(EventListener::new(&window, "mousemove", move |event| {
            let Some(event) = event.dyn_ref::<MouseEvent>() else {
                return;
            };
            let mut state = state.borrow_mut();
            let Some(viewport) = state.viewports.current().copied() else {
                return;
            };
            let rect = state.surface.canvas().get_bounding_client_rect();
            let pointer = state.pointer.update(
                event.client_x() as f64,
                event.client_y() as f64,
                rect.left(),
                rect.top(),
                &viewport,
            );
            state.scene.pointer_moved(pointer);
        })?);
    }

    let animation = {
        let state = state.clone();
        AnimationLoop::start(&window, move |timestamp| {
            let mut state = state.borrow_mut();
            let seconds = state.clock.tick(timestamp);
            let SceneState { scene, surface, .. } = &mut *state;
            scene.render_frame(surface, seconds);
        })?
    };

    tracing::info!(container = ?options.container, "scene mounted");

    Ok(Some(SceneHandle {
        mounted: Some(Mounted {
            animation,
            _listeners: listeners,
        }),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_chain_keeps_running() {
        let chain = FrameChain::default();
        assert!(chain.should_continue());
        assert!(chain.scheduled(1));
        assert!(chain.scheduled(2));
        assert!(chain.should_continue());
    }

    #[test]
    fn cancel_returns_pending_frame_once() {
        let chain = FrameChain::default();
        chain.scheduled(7);

        assert_eq!(chain.cancel(), Some(7));
        assert_eq!(chain.cancel(), None);
        assert!(!chain.should_continue());
    }

    #[test]
    fn cancel_without_pending_frame() {
        let chain = FrameChain::default();
        assert_eq!(chain.cancel(), None);
        assert!(!chain.should_continue());
    }

    #[test]
    fn frame_after_cancel_is_not_rescheduled() {
        let chain = FrameChain::default();
        chain.scheduled(3);
        chain.cancel();

        assert!(!chain.should_continue());
        assert!(!chain.scheduled(4));
        assert_eq!(chain.cancel(), None);
    }

    #[test]
    fn destroying_an_unmounted_handle_is_a_no_op() {
        let mut handle = SceneHandle { mounted: None };
        assert!(!handle.running());
        handle.destroy();
        handle.destroy();
        assert!(!handle.running());
    }
}
