use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use js_sys::{Date, Function};
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Event, HtmlElement, HtmlImageElement, PointerEvent, Window};

use threesixty_core::{
    FrameSource, FrameState, FrameSurface, ProgressObserver, Scheduler, TimerHandle, Viewer,
    ViewerConfig, ViewerError, ViewerEvent,
};

mod console;

const CURRENT_CLASS: &str = "current-image";
const PREVIOUS_CLASS: &str = "previous-image";

type Shared = Rc<RefCell<Viewer<DomHost>>>;
type WeakShared = Weak<RefCell<Viewer<DomHost>>>;

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

/// Run `f` against the viewer behind `weak`, then forward the events it
/// produced to the JS listener once the borrow is released.
fn with_viewer(weak: &WeakShared, f: impl FnOnce(&mut Viewer<DomHost>)) {
    let Some(cell) = weak.upgrade() else {
        return;
    };
    let (events, listener) = {
        let Ok(mut viewer) = cell.try_borrow_mut() else {
            log::warn!("viewer busy, dropping re-entrant callback");
            return;
        };
        f(&mut viewer);
        let listener = viewer.host().hooks.listener.borrow().clone();
        (viewer.drain_events(), listener)
    };
    dispatch(listener.as_ref(), events);
}

fn dispatch(listener: Option<&Function>, events: Vec<ViewerEvent>) {
    let Some(listener) = listener else {
        return;
    };
    for event in events {
        match swb::to_value(&event) {
            Ok(value) => {
                if let Err(err) = listener.call1(&JsValue::NULL, &value) {
                    log::warn!("event listener threw {:?}", err);
                }
            }
            Err(err) => log::warn!("could not serialize {:?}: {err}", event),
        }
    }
}

/// Everything the DOM holds that points back into the viewer. Lives outside
/// the viewer's `RefCell` so teardown and listener registration never depend
/// on winning a borrow.
struct Hooks {
    window: Window,
    interval: Cell<Option<i32>>,
    images: RefCell<Vec<HtmlImageElement>>,
    fade: RefCell<Option<(HtmlElement, Function)>>,
    listener: RefCell<Option<Function>>,
}

impl Hooks {
    fn new(window: Window) -> Self {
        Self {
            window,
            interval: Cell::new(None),
            images: RefCell::new(Vec::new()),
            fade: RefCell::new(None),
            listener: RefCell::new(None),
        }
    }

    /// Detach every DOM callback that calls into the viewer: the running
    /// interval, image load handlers and the progress fade listener.
    fn release(&self) {
        if let Some(id) = self.interval.take() {
            self.window.clear_interval_with_handle(id);
        }
        for img in self.images.borrow().iter() {
            img.set_onload(None);
            img.set_onerror(None);
        }
        if let Some((progress, hide)) = self.fade.borrow_mut().take() {
            let _ = progress.remove_event_listener_with_callback("transitionend", &hide);
        }
    }
}

/// DOM-backed host: one `<img>` per frame inside the image list, a
/// `setInterval` timer and an optional progress element.
struct DomHost {
    document: Document,
    root: HtmlElement,
    list: HtmlElement,
    progress: Option<HtmlElement>,
    images: Vec<Option<HtmlImageElement>>,
    viewer: WeakShared,
    tick: Option<Closure<dyn FnMut()>>,
    callbacks: Vec<Closure<dyn FnMut(Event)>>,
    hooks: Rc<Hooks>,
}

impl DomHost {
    fn attach(
        hooks: Rc<Hooks>,
        document: Document,
        root: HtmlElement,
        cfg: &ViewerConfig,
    ) -> Result<Self, JsValue> {
        let style = root.style();
        if cfg.responsive {
            style.set_property("width", "100%")?;
        } else {
            style.set_property("width", &format!("{}px", cfg.width))?;
        }
        style.set_property("height", &format!("{}px", cfg.height))?;

        let list = match root.query_selector(&cfg.img_list)? {
            Some(el) => el.dyn_into::<HtmlElement>()?,
            None => {
                let ul = document.create_element("ul")?.dyn_into::<HtmlElement>()?;
                ul.set_class_name(cfg.img_list.trim_start_matches('.'));
                root.append_child(&ul)?;
                ul
            }
        };
        list.style().set_property("display", "none")?;

        let progress = match &cfg.progress {
            Some(sel) => document
                .query_selector(sel)?
                .and_then(|el| el.dyn_into::<HtmlElement>().ok()),
            None => None,
        };

        Ok(Self {
            document,
            root,
            list,
            progress,
            images: vec![None; cfg.total_frames],
            viewer: Weak::new(),
            tick: None,
            callbacks: Vec::new(),
            hooks,
        })
    }

    fn create_image(&mut self, index: usize) -> Result<HtmlImageElement, JsValue> {
        let li = self.document.create_element("li")?;
        let img = HtmlImageElement::new()?;

        let weak = self.viewer.clone();
        let onload = Closure::<dyn FnMut(Event)>::new(move |_e: Event| {
            with_viewer(&weak, |v| {
                if let Err(err) = v.frame_loaded(index) {
                    log::error!("{err}");
                }
            });
        });
        let weak = self.viewer.clone();
        let onerror = Closure::<dyn FnMut(Event)>::new(move |_e: Event| {
            with_viewer(&weak, |v| {
                if let Err(err) = v.frame_failed(index) {
                    log::error!("{err}");
                }
            });
        });
        img.set_onload(Some(onload.as_ref().unchecked_ref()));
        img.set_onerror(Some(onerror.as_ref().unchecked_ref()));
        self.callbacks.push(onload);
        self.callbacks.push(onerror);
        self.hooks.images.borrow_mut().push(img.clone());

        li.append_child(&img)?;
        self.list.append_child(&li)?;
        Ok(img)
    }
}

impl FrameSource for DomHost {
    fn request_frame(&mut self, index: usize, address: &str) -> threesixty_core::Result<()> {
        let existing = self.images.get(index).cloned().flatten();
        let img = match existing {
            Some(img) => {
                // retry: clear src so the same address is fetched again
                let _ = img.remove_attribute("src");
                img
            }
            None => {
                let img = self
                    .create_image(index)
                    .map_err(|err| ViewerError::FrameRequest {
                        index,
                        reason: format!("{:?}", err),
                    })?;
                if let Some(slot) = self.images.get_mut(index) {
                    *slot = Some(img.clone());
                }
                img
            }
        };
        img.set_src(address);
        Ok(())
    }
}

impl FrameSurface for DomHost {
    fn set_frame_state(&mut self, index: usize, state: FrameState) {
        let Some(Some(img)) = self.images.get(index) else {
            return;
        };
        let classes = img.class_list();
        let _ = classes.remove_2(CURRENT_CLASS, PREVIOUS_CLASS);
        let _ = match state {
            FrameState::Current => classes.add_1(CURRENT_CLASS),
            FrameState::Previous => classes.add_1(PREVIOUS_CLASS),
            FrameState::Neither => Ok(()),
        };
    }

    fn viewport_width(&self) -> f64 {
        self.root.get_bounding_client_rect().width()
    }
}

impl Scheduler for DomHost {
    fn start(&mut self, period_ms: u32) -> Option<TimerHandle> {
        let tick = self.tick.as_ref()?;
        match self
            .hooks
            .window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                tick.as_ref().unchecked_ref(),
                period_ms as i32,
            ) {
            Ok(id) => {
                self.hooks.interval.set(Some(id));
                Some(TimerHandle(id as u32))
            }
            Err(err) => {
                log::error!("setInterval failed: {:?}", err);
                None
            }
        }
    }

    fn cancel(&mut self, handle: TimerHandle) {
        let id = handle.0 as i32;
        self.hooks.window.clear_interval_with_handle(id);
        if self.hooks.interval.get() == Some(id) {
            self.hooks.interval.set(None);
        }
    }
}

impl ProgressObserver for DomHost {
    fn report_progress(&mut self, percent: u32) {
        let Some(progress) = &self.progress else {
            return;
        };
        if let Ok(Some(span)) = progress.query_selector("span") {
            span.set_text_content(Some(&format!("{percent}%")));
        }
    }

    fn loading_finished(&mut self) {
        if let Some(progress) = self.progress.clone() {
            let _ = progress.class_list().add_1("fadingOut");
            let target = progress.clone();
            let hide = Closure::<dyn FnMut(Event)>::new(move |_e: Event| {
                let _ = target.style().set_property("display", "none");
            });
            let hide_fn: Function = hide.as_ref().unchecked_ref::<Function>().clone();
            let _ = progress.add_event_listener_with_callback("transitionend", &hide_fn);
            self.hooks.fade.replace(Some((progress, hide_fn)));
            self.callbacks.push(hide);
        }
        let _ = self.list.style().set_property("display", "block");
        let _ = self.list.class_list().add_1("fadingIn");
    }
}

type PointerListener = (&'static str, Closure<dyn FnMut(PointerEvent)>);

fn bind_pointer_events(root: &HtmlElement, weak: &WeakShared) -> Result<Vec<PointerListener>, JsValue> {
    let mut out: Vec<PointerListener> = Vec::new();

    let w = weak.clone();
    out.push((
        "pointerdown",
        Closure::new(move |e: PointerEvent| {
            e.prevent_default();
            let x = f64::from(e.page_x());
            with_viewer(&w, |v| v.pointer_down(x));
        }),
    ));
    let w = weak.clone();
    out.push((
        "pointerup",
        Closure::new(move |e: PointerEvent| {
            e.prevent_default();
            with_viewer(&w, |v| v.pointer_up());
        }),
    ));
    let w = weak.clone();
    out.push((
        "pointercancel",
        Closure::new(move |e: PointerEvent| {
            e.prevent_default();
            with_viewer(&w, |v| v.pointer_cancel());
        }),
    ));
    let w = weak.clone();
    out.push((
        "pointermove",
        Closure::new(move |e: PointerEvent| {
            let x = f64::from(e.page_x());
            with_viewer(&w, |v| v.pointer_move(x, Date::now()));
        }),
    ));

    for (name, cb) in &out {
        root.add_event_listener_with_callback(name, cb.as_ref().unchecked_ref())?;
    }
    Ok(out)
}

fn resolve_root(document: &Document, target: &JsValue) -> Option<HtmlElement> {
    if let Some(selector) = target.as_string() {
        return document
            .query_selector(&selector)
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<HtmlElement>().ok());
    }
    target.clone().dyn_into::<HtmlElement>().ok()
}

#[wasm_bindgen]
pub struct Threesixty {
    inner: Option<Shared>,
    hooks: Option<Rc<Hooks>>,
    root: Option<HtmlElement>,
    listeners: Vec<PointerListener>,
}

#[wasm_bindgen]
impl Threesixty {
    /// Attach a viewer to `target` (an element or a selector) and start loading.
    /// `options` is an object of camelCase options or undefined/null for defaults.
    /// Example:
    ///   new Threesixty("#shoe", { totalFrames: 36, imagePath: "/img/shoe/" })
    ///
    /// A target that does not resolve yields an inert viewer.
    #[wasm_bindgen(constructor)]
    pub fn new(target: JsValue, options: JsValue) -> Result<Threesixty, JsError> {
        console_error_panic_hook::set_once();
        console::init(if cfg!(debug_assertions) {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        });

        let cfg: ViewerConfig = if jsvalue_is_undefined_or_null(&options) {
            ViewerConfig::default()
        } else {
            swb::from_value(options).map_err(|e| JsError::new(&format!("options error: {e}")))?
        };
        cfg.validate()
            .map_err(|e| JsError::new(&format!("options error: {e}")))?;

        let window = web_sys::window().ok_or_else(|| JsError::new("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsError::new("no document"))?;

        let Some(root) = resolve_root(&document, &target) else {
            log::warn!("host element not found, viewer is inert");
            return Ok(Threesixty {
                inner: None,
                hooks: None,
                root: None,
                listeners: Vec::new(),
            });
        };

        let hooks = Rc::new(Hooks::new(window));
        let host = DomHost::attach(hooks.clone(), document, root.clone(), &cfg)
            .map_err(|e| JsError::new(&format!("attach error: {:?}", e)))?;
        let viewer = Viewer::new(cfg, host).map_err(|e| JsError::new(&e.to_string()))?;
        let shared: Shared = Rc::new(RefCell::new(viewer));
        let weak = Rc::downgrade(&shared);

        {
            let mut viewer = shared.borrow_mut();
            let host = viewer.host_mut();
            host.viewer = weak.clone();
            let tick_weak = weak.clone();
            host.tick = Some(Closure::<dyn FnMut()>::new(move || {
                with_viewer(&tick_weak, |v| {
                    v.tick();
                });
            }));
        }

        let listeners = bind_pointer_events(&root, &weak)
            .map_err(|e| JsError::new(&format!("listener error: {:?}", e)))?;
        with_viewer(&weak, |v| {
            if let Err(err) = v.load() {
                log::error!("{err}");
            }
        });

        Ok(Threesixty {
            inner: Some(shared),
            hooks: Some(hooks),
            root: Some(root),
            listeners,
        })
    }

    /// Whether a host element was found.
    #[wasm_bindgen(getter)]
    pub fn attached(&self) -> bool {
        self.inner.is_some()
    }

    #[wasm_bindgen(getter)]
    pub fn ready(&self) -> bool {
        self.inner
            .as_ref()
            .map(|v| v.borrow().state().is_ready())
            .unwrap_or(false)
    }

    #[wasm_bindgen(getter, js_name = loadedCount)]
    pub fn loaded_count(&self) -> u32 {
        self.inner
            .as_ref()
            .map(|v| v.borrow().state().loaded_count() as u32)
            .unwrap_or(0)
    }

    /// Slot index of the frame on screen, if any.
    #[wasm_bindgen(getter, js_name = currentIndex)]
    pub fn current_index(&self) -> Option<u32> {
        self.inner
            .as_ref()
            .and_then(|v| v.borrow().current_index())
            .map(|i| i as u32)
    }

    /// Register `listener(event)` for viewer events (progress, ready, load failures).
    #[wasm_bindgen(js_name = onEvent)]
    pub fn on_event(&mut self, listener: Function) {
        match &self.hooks {
            Some(hooks) => {
                hooks.listener.replace(Some(listener));
            }
            None => log::warn!("viewer is inert, event listener ignored"),
        }
    }

    /// Restart the animation loop if it is idle.
    pub fn refresh(&self) {
        if let Some(shared) = &self.inner {
            with_viewer(&Rc::downgrade(shared), |v| v.refresh());
        }
    }
}

impl Drop for Threesixty {
    fn drop(&mut self) {
        if let Some(hooks) = &self.hooks {
            hooks.release();
        }
        if let Some(root) = &self.root {
            for (name, cb) in &self.listeners {
                let _ = root.remove_event_listener_with_callback(name, cb.as_ref().unchecked_ref());
            }
        }
        if let Some(shared) = &self.inner {
            if let Ok(mut v) = shared.try_borrow_mut() {
                v.stop();
            }
        }
    }
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}
