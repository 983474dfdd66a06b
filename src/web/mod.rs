//! Browser entry point.
//!
//! Binds the backdrop and every page behaviour to the live page when the
//! module loads. Each feature installs independently; a missing element
//! just leaves that feature out.

mod canvas;
mod dom;
mod host;

pub use canvas::CanvasSurface;
pub use dom::WebDocument;
pub use host::{HostEvent, WebHost};

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Element, Event, EventTarget, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit,
};

use crate::animator::Animator;
use crate::config::FieldConfig;
use crate::page::reveal::{REVEAL_ROOT_MARGIN, REVEAL_THRESHOLD};
use crate::page::{
    anchor_links, current_year, on_anchor_click, stamp_year, AnchorClick, CategoryTabs, NavToggle,
    ScrollReveal, BACKDROP_CANVAS_ID,
};

/// The running backdrop and the host that schedules it.
struct Backdrop {
    host: WebHost,
    animator: Animator<CanvasSurface>,
}

impl Backdrop {
    fn handle(&mut self, event: HostEvent) {
        self.host.fired(event);
        match event {
            HostEvent::Frame(handle) => self.animator.frame(&mut self.host, handle),
            HostEvent::Timer(handle) => {
                self.animator.timer_fired(&mut self.host, handle);
            }
        }
    }
}

type SharedBackdrop = Rc<RefCell<Option<Backdrop>>>;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let doc = WebDocument::new(document);

    install_backdrop(&window, &doc);
    install_nav(&doc);
    install_anchors(&doc);
    install_reveal(&doc);
    install_tabs(&window, &doc);
    stamp_year(&doc, current_year());

    log::info!("page effects ready");
    Ok(())
}

fn install_backdrop(window: &web_sys::Window, doc: &WebDocument) {
    let shared: SharedBackdrop = Rc::new(RefCell::new(None));
    let weak = Rc::downgrade(&shared);
    let dispatch: Rc<dyn Fn(HostEvent)> = Rc::new(move |event: HostEvent| {
        let Some(shared) = weak.upgrade() else {
            return;
        };
        let Ok(mut slot) = shared.try_borrow_mut() else {
            log::warn!("backdrop busy, dropping {:?}", event);
            return;
        };
        if let Some(backdrop) = slot.as_mut() {
            backdrop.handle(event);
        }
    });

    let mut host = WebHost::new(window.clone(), dispatch);
    let element = doc.inner().get_element_by_id(BACKDROP_CANVAS_ID);
    let mut animator = match Animator::create(
        &host,
        element,
        CanvasSurface::from_element,
        FieldConfig::default(),
    ) {
        Ok(animator) => animator,
        Err(skip) => {
            log::debug!("backdrop skipped: {}", skip);
            return;
        }
    };
    animator.start(&mut host);
    *shared.borrow_mut() = Some(Backdrop { host, animator });

    let on_resize = shared.clone();
    listen(window, "resize", move |_| {
        if let Some(b) = on_resize.borrow_mut().as_mut() {
            b.animator.resized(&mut b.host);
        }
    });

    let on_visibility = shared;
    let visibility_doc = doc.clone();
    listen(doc.inner(), "visibilitychange", move |_| {
        let hidden = visibility_doc.is_hidden();
        if let Some(b) = on_visibility.borrow_mut().as_mut() {
            b.animator.visibility_changed(&mut b.host, hidden);
        }
    });
}

fn install_nav(doc: &WebDocument) {
    let Some(nav) = NavToggle::install(doc) else {
        return;
    };
    let nav = Rc::new(nav);

    let (toggle_nav, toggle_doc) = (nav.clone(), doc.clone());
    listen(nav.toggle(), "click", move |_| {
        toggle_nav.on_toggle_click(&toggle_doc);
    });

    let (panel_nav, panel_doc) = (nav.clone(), doc.clone());
    listen(nav.panel(), "click", move |event| {
        if let Some(target) = event_element(&event) {
            panel_nav.on_panel_click(&panel_doc, &target);
        }
    });
}

fn install_anchors(doc: &WebDocument) {
    for anchor in anchor_links(doc) {
        let (link, link_doc) = (anchor.clone(), doc.clone());
        listen(&anchor, "click", move |event| {
            if on_anchor_click(&link_doc, &link) == AnchorClick::Handled {
                event.prevent_default();
            }
        });
    }
}

fn install_reveal(doc: &WebDocument) {
    let reveal = Rc::new(RefCell::new(ScrollReveal::install(doc)));
    if reveal.borrow().is_complete() {
        return;
    }

    let (observed, observed_doc) = (reveal.clone(), doc.clone());
    let callback = Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
        move |entries: js_sys::Array, observer: IntersectionObserver| {
            let mut reveal = observed.borrow_mut();
            for entry in entries.iter() {
                let entry: IntersectionObserverEntry = entry.unchecked_into();
                let target = entry.target();
                if reveal.on_intersection(&observed_doc, &target, entry.is_intersecting()) {
                    observer.unobserve(&target);
                }
            }
        },
    );

    let options = IntersectionObserverInit::new();
    options.set_threshold(&JsValue::from_f64(REVEAL_THRESHOLD));
    options.set_root_margin(REVEAL_ROOT_MARGIN);

    match IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options) {
        Ok(observer) => {
            for target in reveal.borrow().targets() {
                observer.observe(target);
            }
            callback.forget();
        }
        Err(e) => {
            log::warn!("IntersectionObserver unavailable, revealing all: {:?}", e);
            reveal.borrow_mut().reveal_all(doc);
        }
    }
}

fn install_tabs(window: &web_sys::Window, doc: &WebDocument) {
    let tabs = Rc::new(RefCell::new(CategoryTabs::install(doc)));
    let Some(performance) = window.performance() else {
        log::warn!("no performance clock, category tabs disabled");
        return;
    };
    let clock = Rc::new(move || Duration::from_secs_f64(performance.now().max(0.0) / 1000.0));

    let initial_tabs = tabs.clone();
    let initial_doc = doc.clone();
    let show_initial = move || initial_tabs.borrow().show_initial(&initial_doc);
    if doc.inner().ready_state() == "loading" {
        let mut show_initial = Some(show_initial);
        listen(doc.inner(), "DOMContentLoaded", move |_| {
            if let Some(show) = show_initial.take() {
                show();
            }
        });
    } else {
        show_initial();
    }

    let buttons = tabs.borrow().tabs().to_vec();
    for tab in buttons {
        let (switcher, tab_doc, tab_clock, tab_window) =
            (tabs.clone(), doc.clone(), clock.clone(), window.clone());
        let clicked = tab.clone();
        listen(&tab, "click", move |_| {
            let now = tab_clock();
            let wakes = switcher.borrow_mut().select(&tab_doc, &clicked, now);
            for delay in wakes {
                let (woken, woken_doc, woken_clock) =
                    (switcher.clone(), tab_doc.clone(), tab_clock.clone());
                let due = now + delay;
                let wake = Closure::once_into_js(move || {
                    // Timers may fire a hair before the clock reaches `due`.
                    let at = woken_clock().max(due);
                    woken.borrow_mut().advance(&woken_doc, at);
                });
                let millis = delay.as_millis().min(i32::MAX as u128) as i32;
                if let Err(e) = tab_window
                    .set_timeout_with_callback_and_timeout_and_arguments_0(wake.unchecked_ref(), millis)
                {
                    log::warn!("setTimeout failed: {:?}", e);
                }
            }
        });
    }
}

/// Attach a listener for the lifetime of the page.
fn listen<T, F>(target: &T, event: &str, handler: F)
where
    T: AsRef<EventTarget>,
    F: FnMut(Event) + 'static,
{
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    if let Err(e) = target
        .as_ref()
        .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
    {
        log::warn!("failed to listen for {}: {:?}", event, e);
    }
    closure.forget();
}

fn event_element(event: &Event) -> Option<Element> {
    event.target()?.dyn_into::<Element>().ok()
}
