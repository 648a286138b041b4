use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    PointerDown,
    MouseMove,
    MouseLeave,
    KeyDown,
    Scroll,
    AnimationEnd,
    Load,
    PageShow,
}

impl EventKind {
    pub fn dom_name(self) -> &'static str {
        match self {
            EventKind::Click => "click",
            EventKind::PointerDown => "pointerdown",
            EventKind::MouseMove => "mousemove",
            EventKind::MouseLeave => "mouseleave",
            EventKind::KeyDown => "keydown",
            EventKind::Scroll => "scroll",
            EventKind::AnimationEnd => "animationend",
            EventKind::Load => "load",
            EventKind::PageShow => "pageshow",
        }
    }

    pub fn is_passive(self) -> bool {
        matches!(self, EventKind::Scroll)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub fn any(self) -> bool {
        self.shift || self.ctrl || self.alt || self.meta
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct UiEvent {
    pub client_x: f64,
    pub client_y: f64,
    pub button: i16,
    pub key: Option<String>,
    pub modifiers: Modifiers,
}

impl UiEvent {
    pub fn pointer(client_x: f64, client_y: f64) -> Self {
        Self {
            client_x,
            client_y,
            ..Self::default()
        }
    }

    pub fn key(key: &str) -> Self {
        Self {
            key: Some(key.to_string()),
            ..Self::default()
        }
    }

    pub fn is_plain_primary_click(&self) -> bool {
        self.button == 0 && !self.modifiers.any()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reaction {
    Proceed,
    PreventDefault,
    Intercept,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

pub enum Target<'a, N> {
    Node(&'a N),
    Document,
    Window,
}

#[derive(Clone, Debug, PartialEq)]
pub struct VisibilityOptions {
    pub threshold: f64,
    pub root_margin: String,
}

impl VisibilityOptions {
    pub fn new(threshold: f64, root_margin: &str) -> Self {
        Self {
            threshold,
            root_margin: root_margin.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct VisibilityEntry<N> {
    pub target: N,
    pub is_intersecting: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObserverId(pub u64);

pub type Handler = Rc<dyn Fn(&UiEvent) -> Reaction>;
pub type VisibilityCallback<N> = Rc<dyn Fn(&VisibilityEntry<N>)>;
pub type FrameCallback = Box<dyn FnOnce(f64)>;
pub type TimeoutCallback = Box<dyn FnOnce()>;

pub trait Page {
    type Node: Clone + PartialEq + 'static;

    fn query_all(&self, selector: &str) -> Vec<Self::Node>;
    fn query_all_within(&self, scope: &Self::Node, selector: &str) -> Vec<Self::Node>;
    fn closest(&self, node: &Self::Node, selector: &str) -> Option<Self::Node>;
    fn by_id(&self, id: &str) -> Option<Self::Node>;
    fn root(&self) -> Self::Node;
    fn body(&self) -> Option<Self::Node>;

    fn query(&self, selector: &str) -> Option<Self::Node> {
        self.query_all(selector).into_iter().next()
    }

    fn query_within(&self, scope: &Self::Node, selector: &str) -> Option<Self::Node> {
        self.query_all_within(scope, selector).into_iter().next()
    }

    fn has_class(&self, node: &Self::Node, class: &str) -> bool;
    fn add_class(&self, node: &Self::Node, class: &str);
    fn remove_class(&self, node: &Self::Node, class: &str);

    fn toggle_class(&self, node: &Self::Node, class: &str, on: bool) {
        if on {
            self.add_class(node, class);
        } else {
            self.remove_class(node, class);
        }
    }

    fn attr(&self, node: &Self::Node, name: &str) -> Option<String>;
    fn set_attr(&self, node: &Self::Node, name: &str, value: &str);

    fn has_attr(&self, node: &Self::Node, name: &str) -> bool {
        self.attr(node, name).is_some()
    }

    fn text(&self, node: &Self::Node) -> String;
    fn set_text(&self, node: &Self::Node, text: &str);

    // An empty value clears the property.
    fn set_style(&self, node: &Self::Node, property: &str, value: &str);
    fn rect(&self, node: &Self::Node) -> Rect;
    fn append_element(&self, parent: &Self::Node, tag: &str) -> Option<Self::Node>;
    fn remove(&self, node: &Self::Node);
    fn focus(&self, node: &Self::Node);

    fn listen(&self, target: Target<'_, Self::Node>, kind: EventKind, handler: Handler)
        -> ListenerId;
    fn unlisten(&self, id: ListenerId);

    fn observe_visibility(
        &self,
        targets: &[Self::Node],
        options: &VisibilityOptions,
        callback: VisibilityCallback<Self::Node>,
    ) -> Option<ObserverId>;
    // Unobserving a node that is not observed is a no-op.
    fn unobserve(&self, observer: ObserverId, node: &Self::Node);

    fn schedule_frame(&self, callback: FrameCallback);
    fn schedule_timeout(&self, delay_ms: u32, callback: TimeoutCallback);
    fn now(&self) -> f64;

    fn scroll_y(&self) -> f64;
    fn scroll_to_top(&self);
    fn location(&self) -> String;
    fn replace_location(&self, url: &str);
    fn navigate(&self, url: &str);
    fn is_loaded(&self) -> bool;
}
