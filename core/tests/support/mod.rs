#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use vitrine_core::page::{
    EventKind, FrameCallback, Handler, ListenerId, ObserverId, Page, Reaction, Rect, Target,
    TimeoutCallback, UiEvent, VisibilityCallback, VisibilityEntry, VisibilityOptions,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

pub const ROOT: NodeId = NodeId(0);
pub const BODY: NodeId = NodeId(1);

struct NodeData {
    tag: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    classes: Vec<String>,
    attrs: BTreeMap<String, String>,
    text: String,
    style: BTreeMap<String, String>,
    rect: Rect,
    attached: bool,
}

impl NodeData {
    fn new(tag: &str, parent: Option<NodeId>) -> Self {
        Self {
            tag: tag.to_string(),
            parent,
            children: Vec::new(),
            classes: Vec::new(),
            attrs: BTreeMap::new(),
            text: String::new(),
            style: BTreeMap::new(),
            rect: Rect::default(),
            attached: true,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum ListenTarget {
    Node(NodeId),
    Document,
    Window,
}

struct ListenerRecord {
    id: ListenerId,
    target: ListenTarget,
    kind: EventKind,
    handler: Handler,
}

struct ObserverRecord {
    id: ObserverId,
    options: VisibilityOptions,
    callback: VisibilityCallback<NodeId>,
    observed: Vec<NodeId>,
}

struct PendingTimeout {
    due: f64,
    seq: u64,
    callback: TimeoutCallback,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Dispatch {
    pub handled: usize,
    pub prevented: bool,
    pub stopped: bool,
}

/// In-memory document with deterministic frames, timers and visibility.
pub struct FakePage {
    nodes: RefCell<Vec<NodeData>>,
    listeners: RefCell<Vec<ListenerRecord>>,
    observers: RefCell<Vec<ObserverRecord>>,
    frames: RefCell<Vec<FrameCallback>>,
    timeouts: RefCell<Vec<PendingTimeout>>,
    clock: Cell<f64>,
    next_id: Cell<u64>,
    scroll_y: Cell<f64>,
    location: RefCell<String>,
    replaced: RefCell<Vec<String>>,
    navigations: RefCell<Vec<String>>,
    loaded: Cell<bool>,
    focused: Cell<Option<NodeId>>,
    mutations: Cell<usize>,
    class_log: RefCell<Vec<(NodeId, String)>>,
    scrolls_to_top: Cell<usize>,
    refuse_observers: Cell<bool>,
}

impl FakePage {
    pub fn new(location: &str) -> Rc<Self> {
        let nodes = vec![NodeData::new("html", None), NodeData::new("body", Some(ROOT))];
        let page = Self {
            nodes: RefCell::new(nodes),
            listeners: RefCell::new(Vec::new()),
            observers: RefCell::new(Vec::new()),
            frames: RefCell::new(Vec::new()),
            timeouts: RefCell::new(Vec::new()),
            clock: Cell::new(0.0),
            next_id: Cell::new(1),
            scroll_y: Cell::new(0.0),
            location: RefCell::new(location.to_string()),
            replaced: RefCell::new(Vec::new()),
            navigations: RefCell::new(Vec::new()),
            loaded: Cell::new(false),
            focused: Cell::new(None),
            mutations: Cell::new(0),
            class_log: RefCell::new(Vec::new()),
            scrolls_to_top: Cell::new(0),
            refuse_observers: Cell::new(false),
        };
        page.nodes.borrow_mut()[0].children.push(BODY);
        Rc::new(page)
    }

    // Fixture building. These do not count as mutations.

    pub fn add(&self, parent: NodeId, tag: &str, classes: &str, attrs: &[(&str, &str)]) -> NodeId {
        let mut nodes = self.nodes.borrow_mut();
        let id = NodeId(nodes.len());
        let mut data = NodeData::new(tag, Some(parent));
        data.classes = classes.split_whitespace().map(str::to_string).collect();
        for (name, value) in attrs {
            data.attrs.insert((*name).to_string(), (*value).to_string());
        }
        nodes.push(data);
        nodes[parent.0].children.push(id);
        id
    }

    pub fn add_text(
        &self,
        parent: NodeId,
        tag: &str,
        classes: &str,
        attrs: &[(&str, &str)],
        text: &str,
    ) -> NodeId {
        let id = self.add(parent, tag, classes, attrs);
        self.nodes.borrow_mut()[id.0].text = text.to_string();
        id
    }

    pub fn set_rect(&self, node: NodeId, rect: Rect) {
        self.nodes.borrow_mut()[node.0].rect = rect;
    }

    pub fn set_scroll(&self, y: f64) {
        self.scroll_y.set(y);
    }

    pub fn set_loaded(&self, loaded: bool) {
        self.loaded.set(loaded);
    }

    // Behaves like a browser whose IntersectionObserver constructor throws.
    pub fn refuse_observers(&self) {
        self.refuse_observers.set(true);
    }

    // Inspection.

    pub fn mutations(&self) -> usize {
        self.mutations.get()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn listener_count_for(&self, node: NodeId) -> usize {
        self.listeners
            .borrow()
            .iter()
            .filter(|record| record.target == ListenTarget::Node(node))
            .count()
    }

    pub fn observer_count(&self) -> usize {
        self.observers.borrow().len()
    }

    pub fn observer_options(&self, index: usize) -> Option<VisibilityOptions> {
        self.observers
            .borrow()
            .get(index)
            .map(|record| record.options.clone())
    }

    pub fn is_observed(&self, node: NodeId) -> bool {
        self.observers
            .borrow()
            .iter()
            .any(|record| record.observed.contains(&node))
    }

    pub fn class_additions(&self, node: NodeId, class: &str) -> usize {
        self.class_log
            .borrow()
            .iter()
            .filter(|(id, name)| *id == node && name == class)
            .count()
    }

    pub fn style(&self, node: NodeId, property: &str) -> Option<String> {
        self.nodes.borrow()[node.0].style.get(property).cloned()
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes.borrow()[node.0].children.clone()
    }

    pub fn is_attached(&self, node: NodeId) -> bool {
        self.nodes.borrow()[node.0].attached
    }

    pub fn focused(&self) -> Option<NodeId> {
        self.focused.get()
    }

    pub fn current_location(&self) -> String {
        self.location.borrow().clone()
    }

    pub fn replaced(&self) -> Vec<String> {
        self.replaced.borrow().clone()
    }

    pub fn navigations(&self) -> Vec<String> {
        self.navigations.borrow().clone()
    }

    pub fn scrolls_to_top(&self) -> usize {
        self.scrolls_to_top.get()
    }

    pub fn pending_frames(&self) -> usize {
        self.frames.borrow().len()
    }

    pub fn pending_timeouts(&self) -> usize {
        self.timeouts.borrow().len()
    }

    // Driving.

    pub fn dispatch(&self, node: NodeId, kind: EventKind, event: &UiEvent) -> Dispatch {
        let mut path = vec![ListenTarget::Node(node)];
        let mut cursor = self.nodes.borrow()[node.0].parent;
        while let Some(parent) = cursor {
            path.push(ListenTarget::Node(parent));
            cursor = self.nodes.borrow()[parent.0].parent;
        }
        path.push(ListenTarget::Document);
        path.push(ListenTarget::Window);
        self.run_path(&path, kind, event)
    }

    pub fn dispatch_document(&self, kind: EventKind, event: &UiEvent) -> Dispatch {
        self.run_path(&[ListenTarget::Document, ListenTarget::Window], kind, event)
    }

    pub fn dispatch_window(&self, kind: EventKind, event: &UiEvent) -> Dispatch {
        self.run_path(&[ListenTarget::Window], kind, event)
    }

    pub fn click(&self, node: NodeId) -> Dispatch {
        self.dispatch(node, EventKind::Click, &UiEvent::default())
    }

    fn run_path(&self, path: &[ListenTarget], kind: EventKind, event: &UiEvent) -> Dispatch {
        let mut outcome = Dispatch::default();
        for target in path {
            let handlers: Vec<Handler> = self
                .listeners
                .borrow()
                .iter()
                .filter(|record| record.target == *target && record.kind == kind)
                .map(|record| Rc::clone(&record.handler))
                .collect();
            for handler in handlers {
                outcome.handled += 1;
                match handler(event) {
                    Reaction::Proceed => {}
                    Reaction::PreventDefault => outcome.prevented = true,
                    Reaction::Intercept => {
                        outcome.prevented = true;
                        outcome.stopped = true;
                    }
                }
            }
            if outcome.stopped {
                break;
            }
        }
        outcome
    }

    pub fn set_visible(&self, node: NodeId, visible: bool) {
        let callbacks: Vec<VisibilityCallback<NodeId>> = self
            .observers
            .borrow()
            .iter()
            .filter(|record| record.observed.contains(&node))
            .map(|record| Rc::clone(&record.callback))
            .collect();
        let entry = VisibilityEntry {
            target: node,
            is_intersecting: visible,
        };
        for callback in callbacks {
            callback(&entry);
        }
    }

    pub fn run_frame(&self, timestamp: f64) {
        self.clock.set(timestamp);
        let frames = std::mem::take(&mut *self.frames.borrow_mut());
        for frame in frames {
            frame(timestamp);
        }
    }

    pub fn run_frames_until_idle(&self, start: f64, step: f64, limit: usize) -> usize {
        let mut ran = 0;
        let mut timestamp = start;
        while self.pending_frames() > 0 && ran < limit {
            self.run_frame(timestamp);
            timestamp += step;
            ran += 1;
        }
        ran
    }

    pub fn advance(&self, ms: f64) {
        let target = self.clock.get() + ms;
        loop {
            let next = {
                let mut timeouts = self.timeouts.borrow_mut();
                let index = timeouts
                    .iter()
                    .enumerate()
                    .filter(|(_, pending)| pending.due <= target)
                    .min_by(|(_, a), (_, b)| {
                        a.due.total_cmp(&b.due).then(a.seq.cmp(&b.seq))
                    })
                    .map(|(index, _)| index);
                index.map(|index| timeouts.remove(index))
            };
            let Some(pending) = next else {
                break;
            };
            self.clock.set(pending.due);
            (pending.callback)();
        }
        self.clock.set(target);
    }

    fn next_id(&self) -> u64 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }

    fn mutate(&self) {
        self.mutations.set(self.mutations.get() + 1);
    }

    fn descendants(&self, scope: NodeId, out: &mut Vec<NodeId>) {
        let children = self.nodes.borrow()[scope.0].children.clone();
        for child in children {
            out.push(child);
            self.descendants(child, out);
        }
    }

    fn matches(&self, node: NodeId, selector: &str) -> bool {
        let nodes = self.nodes.borrow();
        let data = &nodes[node.0];
        selector
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .any(|part| Compound::parse(part).matches(data))
    }
}

enum AttrTest {
    Present(String),
    Equals(String, String),
    Contains(String, String),
}

struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrTest>,
}

impl Compound {
    fn parse(raw: &str) -> Self {
        let mut compound = Compound {
            tag: None,
            id: None,
            classes: Vec::new(),
            attrs: Vec::new(),
        };
        let chars: Vec<char> = raw.chars().collect();
        let mut index = 0;
        let ident = |index: &mut usize| {
            let start = *index;
            while *index < chars.len()
                && (chars[*index].is_alphanumeric() || chars[*index] == '-' || chars[*index] == '_')
            {
                *index += 1;
            }
            chars[start..*index].iter().collect::<String>()
        };
        while index < chars.len() {
            match chars[index] {
                '.' => {
                    index += 1;
                    compound.classes.push(ident(&mut index));
                }
                '#' => {
                    index += 1;
                    compound.id = Some(ident(&mut index));
                }
                '[' => {
                    let close = chars[index..]
                        .iter()
                        .position(|ch| *ch == ']')
                        .map(|offset| index + offset)
                        .unwrap_or(chars.len());
                    let body: String = chars[index + 1..close].iter().collect();
                    compound.attrs.push(AttrTest::parse(&body));
                    index = close + 1;
                }
                _ => {
                    let tag = ident(&mut index);
                    if tag.is_empty() {
                        index += 1;
                    } else {
                        compound.tag = Some(tag);
                    }
                }
            }
        }
        compound
    }

    fn matches(&self, data: &NodeData) -> bool {
        if !data.attached {
            return false;
        }
        if let Some(tag) = &self.tag {
            if !data.tag.eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if data.attrs.get("id") != Some(id) {
                return false;
            }
        }
        if !self.classes.iter().all(|class| data.classes.contains(class)) {
            return false;
        }
        self.attrs.iter().all(|test| match test {
            AttrTest::Present(name) => data.attrs.contains_key(name),
            AttrTest::Equals(name, value) => data.attrs.get(name) == Some(value),
            AttrTest::Contains(name, value) => data
                .attrs
                .get(name)
                .is_some_and(|actual| actual.contains(value.as_str())),
        })
    }
}

impl AttrTest {
    fn parse(body: &str) -> Self {
        let unquote = |value: &str| value.trim().trim_matches('"').trim_matches('\'').to_string();
        if let Some((name, value)) = body.split_once("*=") {
            AttrTest::Contains(name.trim().to_string(), unquote(value))
        } else if let Some((name, value)) = body.split_once('=') {
            AttrTest::Equals(name.trim().to_string(), unquote(value))
        } else {
            AttrTest::Present(body.trim().to_string())
        }
    }
}

impl Page for FakePage {
    type Node = NodeId;

    fn query_all(&self, selector: &str) -> Vec<NodeId> {
        let mut all = vec![ROOT];
        self.descendants(ROOT, &mut all);
        all.into_iter().filter(|node| self.matches(*node, selector)).collect()
    }

    fn query_all_within(&self, scope: &NodeId, selector: &str) -> Vec<NodeId> {
        let mut all = Vec::new();
        self.descendants(*scope, &mut all);
        all.into_iter().filter(|node| self.matches(*node, selector)).collect()
    }

    fn closest(&self, node: &NodeId, selector: &str) -> Option<NodeId> {
        let mut cursor = Some(*node);
        while let Some(current) = cursor {
            if self.matches(current, selector) {
                return Some(current);
            }
            cursor = self.nodes.borrow()[current.0].parent;
        }
        None
    }

    fn by_id(&self, id: &str) -> Option<NodeId> {
        self.query(&format!("#{id}"))
    }

    fn root(&self) -> NodeId {
        ROOT
    }

    fn body(&self) -> Option<NodeId> {
        Some(BODY)
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        self.nodes.borrow()[node.0].classes.iter().any(|name| name == class)
    }

    fn add_class(&self, node: &NodeId, class: &str) {
        self.mutate();
        self.class_log.borrow_mut().push((*node, class.to_string()));
        let mut nodes = self.nodes.borrow_mut();
        let classes = &mut nodes[node.0].classes;
        if !classes.iter().any(|name| name == class) {
            classes.push(class.to_string());
        }
    }

    fn remove_class(&self, node: &NodeId, class: &str) {
        self.mutate();
        self.nodes.borrow_mut()[node.0].classes.retain(|name| name != class);
    }

    fn attr(&self, node: &NodeId, name: &str) -> Option<String> {
        self.nodes.borrow()[node.0].attrs.get(name).cloned()
    }

    fn set_attr(&self, node: &NodeId, name: &str, value: &str) {
        self.mutate();
        self.nodes.borrow_mut()[node.0]
            .attrs
            .insert(name.to_string(), value.to_string());
    }

    fn text(&self, node: &NodeId) -> String {
        self.nodes.borrow()[node.0].text.clone()
    }

    fn set_text(&self, node: &NodeId, text: &str) {
        self.mutate();
        self.nodes.borrow_mut()[node.0].text = text.to_string();
    }

    fn set_style(&self, node: &NodeId, property: &str, value: &str) {
        self.mutate();
        let mut nodes = self.nodes.borrow_mut();
        let style = &mut nodes[node.0].style;
        if value.is_empty() {
            style.remove(property);
        } else {
            style.insert(property.to_string(), value.to_string());
        }
    }

    fn rect(&self, node: &NodeId) -> Rect {
        self.nodes.borrow()[node.0].rect
    }

    fn append_element(&self, parent: &NodeId, tag: &str) -> Option<NodeId> {
        self.mutate();
        Some(self.add(*parent, tag, "", &[]))
    }

    fn remove(&self, node: &NodeId) {
        self.mutate();
        let mut subtree = vec![*node];
        self.descendants(*node, &mut subtree);
        let mut nodes = self.nodes.borrow_mut();
        if let Some(parent) = nodes[node.0].parent {
            nodes[parent.0].children.retain(|child| child != node);
        }
        for id in subtree {
            nodes[id.0].attached = false;
        }
    }

    fn focus(&self, node: &NodeId) {
        self.focused.set(Some(*node));
    }

    fn listen(&self, target: Target<'_, NodeId>, kind: EventKind, handler: Handler) -> ListenerId {
        let id = ListenerId(self.next_id());
        let target = match target {
            Target::Node(node) => ListenTarget::Node(*node),
            Target::Document => ListenTarget::Document,
            Target::Window => ListenTarget::Window,
        };
        self.listeners.borrow_mut().push(ListenerRecord {
            id,
            target,
            kind,
            handler,
        });
        id
    }

    fn unlisten(&self, id: ListenerId) {
        self.listeners.borrow_mut().retain(|record| record.id != id);
    }

    fn observe_visibility(
        &self,
        targets: &[NodeId],
        options: &VisibilityOptions,
        callback: VisibilityCallback<NodeId>,
    ) -> Option<ObserverId> {
        if self.refuse_observers.get() {
            return None;
        }
        let id = ObserverId(self.next_id());
        self.observers.borrow_mut().push(ObserverRecord {
            id,
            options: options.clone(),
            callback,
            observed: targets.to_vec(),
        });
        Some(id)
    }

    fn unobserve(&self, observer: ObserverId, node: &NodeId) {
        let mut observers = self.observers.borrow_mut();
        if let Some(record) = observers.iter_mut().find(|record| record.id == observer) {
            record.observed.retain(|observed| observed != node);
        }
    }

    fn schedule_frame(&self, callback: FrameCallback) {
        self.frames.borrow_mut().push(callback);
    }

    fn schedule_timeout(&self, delay_ms: u32, callback: TimeoutCallback) {
        let seq = self.next_id();
        self.timeouts.borrow_mut().push(PendingTimeout {
            due: self.clock.get() + f64::from(delay_ms),
            seq,
            callback,
        });
    }

    fn now(&self) -> f64 {
        self.clock.get()
    }

    fn scroll_y(&self) -> f64 {
        self.scroll_y.get()
    }

    fn scroll_to_top(&self) {
        self.scrolls_to_top.set(self.scrolls_to_top.get() + 1);
        self.scroll_y.set(0.0);
    }

    fn location(&self) -> String {
        self.location.borrow().clone()
    }

    fn replace_location(&self, url: &str) {
        *self.location.borrow_mut() = url.to_string();
        self.replaced.borrow_mut().push(url.to_string());
    }

    fn navigate(&self, url: &str) {
        self.navigations.borrow_mut().push(url.to_string());
    }

    fn is_loaded(&self) -> bool {
        self.loaded.get()
    }
}
