use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use gloo::events::{EventListener, EventListenerOptions, EventListenerPhase};
use gloo::render::{request_animation_frame, AnimationFrame};
use gloo::timers::callback::Timeout;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Element, Event, EventTarget, HtmlElement, IntersectionObserver,
    IntersectionObserverEntry, IntersectionObserverInit, KeyboardEvent, MouseEvent, NodeList,
    ScrollBehavior, ScrollToOptions, Window,
};

use vitrine_core::page::{FrameCallback, TimeoutCallback, VisibilityCallback};
use vitrine_core::{
    EventKind, Handler, ListenerId, Modifiers, ObserverId, Page, Reaction, Rect, Target, UiEvent,
    VisibilityEntry, VisibilityOptions,
};

type ObserverClosure = Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>;

struct ObserverSlot {
    observer: IntersectionObserver,
    _callback: ObserverClosure,
}

pub(crate) struct DomPage {
    window: Window,
    document: Document,
    root: Element,
    listeners: RefCell<HashMap<u64, EventListener>>,
    observers: RefCell<HashMap<u64, ObserverSlot>>,
    frames: Rc<RefCell<HashMap<u64, AnimationFrame>>>,
    next_id: Cell<u64>,
}

impl DomPage {
    pub(crate) fn new() -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        let root = document.document_element()?;
        Some(Self {
            window,
            document,
            root,
            listeners: RefCell::new(HashMap::new()),
            observers: RefCell::new(HashMap::new()),
            frames: Rc::new(RefCell::new(HashMap::new())),
            next_id: Cell::new(1),
        })
    }

    pub(crate) fn document(&self) -> &Document {
        &self.document
    }

    pub(crate) fn window(&self) -> &Window {
        &self.window
    }

    fn next_id(&self) -> u64 {
        let id = self.next_id.get();
        self.next_id.set(id.saturating_add(1));
        id
    }

    fn event_target(&self, target: Target<'_, Element>) -> EventTarget {
        match target {
            Target::Node(element) => element.clone().into(),
            Target::Document => self.document.clone().into(),
            Target::Window => self.window.clone().into(),
        }
    }
}

fn collect_elements(list: Result<NodeList, JsValue>) -> Vec<Element> {
    let Ok(list) = list else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|index| list.get(index))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

fn ui_event(event: &Event) -> UiEvent {
    if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
        return UiEvent {
            client_x: f64::from(mouse.client_x()),
            client_y: f64::from(mouse.client_y()),
            button: mouse.button(),
            key: None,
            modifiers: Modifiers {
                shift: mouse.shift_key(),
                ctrl: mouse.ctrl_key(),
                alt: mouse.alt_key(),
                meta: mouse.meta_key(),
            },
        };
    }
    if let Some(keyboard) = event.dyn_ref::<KeyboardEvent>() {
        return UiEvent {
            key: Some(keyboard.key()),
            modifiers: Modifiers {
                shift: keyboard.shift_key(),
                ctrl: keyboard.ctrl_key(),
                alt: keyboard.alt_key(),
                meta: keyboard.meta_key(),
            },
            ..UiEvent::default()
        };
    }
    UiEvent::default()
}

impl Page for DomPage {
    type Node = Element;

    fn query_all(&self, selector: &str) -> Vec<Element> {
        collect_elements(self.document.query_selector_all(selector))
    }

    fn query_all_within(&self, scope: &Element, selector: &str) -> Vec<Element> {
        collect_elements(scope.query_selector_all(selector))
    }

    fn closest(&self, node: &Element, selector: &str) -> Option<Element> {
        node.closest(selector).ok().flatten()
    }

    fn by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn root(&self) -> Element {
        self.root.clone()
    }

    fn body(&self) -> Option<Element> {
        self.document.body().map(Element::from)
    }

    fn has_class(&self, node: &Element, class: &str) -> bool {
        node.class_list().contains(class)
    }

    fn add_class(&self, node: &Element, class: &str) {
        let _ = node.class_list().add_1(class);
    }

    fn remove_class(&self, node: &Element, class: &str) {
        let _ = node.class_list().remove_1(class);
    }

    fn attr(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn set_attr(&self, node: &Element, name: &str, value: &str) {
        let _ = node.set_attribute(name, value);
    }

    fn has_attr(&self, node: &Element, name: &str) -> bool {
        node.has_attribute(name)
    }

    fn text(&self, node: &Element) -> String {
        node.text_content().unwrap_or_default()
    }

    fn set_text(&self, node: &Element, text: &str) {
        node.set_text_content(Some(text));
    }

    fn set_style(&self, node: &Element, property: &str, value: &str) {
        let Some(element) = node.dyn_ref::<HtmlElement>() else {
            return;
        };
        let style = element.style();
        if value.is_empty() {
            let _ = style.remove_property(property);
        } else {
            let _ = style.set_property(property, value);
        }
    }

    fn rect(&self, node: &Element) -> Rect {
        let rect = node.get_bounding_client_rect();
        Rect {
            left: rect.left(),
            top: rect.top(),
            width: rect.width(),
            height: rect.height(),
        }
    }

    fn append_element(&self, parent: &Element, tag: &str) -> Option<Element> {
        let element = self.document.create_element(tag).ok()?;
        parent.append_child(&element).ok()?;
        Some(element)
    }

    fn remove(&self, node: &Element) {
        node.remove();
    }

    fn focus(&self, node: &Element) {
        if let Some(element) = node.dyn_ref::<HtmlElement>() {
            let _ = element.focus();
        }
    }

    fn listen(&self, target: Target<'_, Element>, kind: EventKind, handler: Handler) -> ListenerId {
        let id = self.next_id();
        let target = self.event_target(target);
        let listener = EventListener::new_with_options(
            &target,
            kind.dom_name(),
            EventListenerOptions {
                phase: EventListenerPhase::Bubble,
                passive: kind.is_passive(),
            },
            move |event: &Event| match handler(&ui_event(event)) {
                Reaction::Proceed => {}
                Reaction::PreventDefault => event.prevent_default(),
                Reaction::Intercept => {
                    event.prevent_default();
                    event.stop_propagation();
                }
            },
        );
        self.listeners.borrow_mut().insert(id, listener);
        ListenerId(id)
    }

    fn unlisten(&self, id: ListenerId) {
        let Some(listener) = self.listeners.borrow_mut().remove(&id.0) else {
            return;
        };
        // The listener may be the one currently running; release it on the next task.
        Timeout::new(0, move || drop(listener)).forget();
    }

    fn observe_visibility(
        &self,
        targets: &[Element],
        options: &VisibilityOptions,
        callback: VisibilityCallback<Element>,
    ) -> Option<ObserverId> {
        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(options.threshold));
        init.set_root_margin(&options.root_margin);
        let closure: ObserverClosure = Closure::new(
            move |entries: js_sys::Array, _observer: IntersectionObserver| {
                for value in entries.iter() {
                    let Ok(entry) = value.dyn_into::<IntersectionObserverEntry>() else {
                        continue;
                    };
                    callback(&VisibilityEntry {
                        target: entry.target(),
                        is_intersecting: entry.is_intersecting(),
                    });
                }
            },
        );
        let observer =
            IntersectionObserver::new_with_options(closure.as_ref().unchecked_ref(), &init).ok()?;
        for target in targets {
            observer.observe(target);
        }
        let id = self.next_id();
        self.observers.borrow_mut().insert(
            id,
            ObserverSlot {
                observer,
                _callback: closure,
            },
        );
        Some(ObserverId(id))
    }

    fn unobserve(&self, observer: ObserverId, node: &Element) {
        if let Some(slot) = self.observers.borrow().get(&observer.0) {
            slot.observer.unobserve(node);
        }
    }

    fn schedule_frame(&self, callback: FrameCallback) {
        let id = self.next_id();
        let frames = Rc::clone(&self.frames);
        let handle = request_animation_frame(move |timestamp| {
            frames.borrow_mut().remove(&id);
            callback(timestamp);
        });
        self.frames.borrow_mut().insert(id, handle);
    }

    fn schedule_timeout(&self, delay_ms: u32, callback: TimeoutCallback) {
        Timeout::new(delay_ms, callback).forget();
    }

    fn now(&self) -> f64 {
        self.window
            .performance()
            .map(|performance| performance.now())
            .unwrap_or_else(js_sys::Date::now)
    }

    fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn scroll_to_top(&self) {
        let options = ScrollToOptions::new();
        options.set_top(0.0);
        options.set_behavior(ScrollBehavior::Smooth);
        self.window.scroll_to_with_scroll_to_options(&options);
    }

    fn location(&self) -> String {
        self.window.location().href().unwrap_or_default()
    }

    fn replace_location(&self, url: &str) {
        if let Ok(history) = self.window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(url));
        }
    }

    fn navigate(&self, url: &str) {
        let _ = self.window.location().set_href(url);
    }

    fn is_loaded(&self) -> bool {
        self.document.ready_state() == "complete"
    }
}
