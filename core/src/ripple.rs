use std::cell::Cell;
use std::rc::Rc;

use crate::config::MotionConfig;
use crate::page::{EventKind, ListenerId, Page, Reaction, Rect, Target, UiEvent};
use crate::units::Install;

pub const BUTTON_SELECTOR: &str = ".btn";
pub const RIPPLE_CLASS: &str = "ripple";

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RippleGeometry {
    pub size: f64,
    pub left: f64,
    pub top: f64,
}

pub fn ripple_geometry(rect: Rect, client_x: f64, client_y: f64, scale: f64) -> RippleGeometry {
    let size = rect.width.max(rect.height) * scale;
    RippleGeometry {
        size,
        left: client_x - rect.left - size / 2.0,
        top: client_y - rect.top - size / 2.0,
    }
}

fn spawn<P: Page + 'static>(page: &Rc<P>, button: &P::Node, event: &UiEvent, scale: f64, opacity: f64) {
    let geometry = ripple_geometry(page.rect(button), event.client_x, event.client_y, scale);
    let Some(ripple) = page.append_element(button, "span") else {
        return;
    };
    page.add_class(&ripple, RIPPLE_CLASS);
    page.set_style(&ripple, "width", &px(geometry.size));
    page.set_style(&ripple, "height", &px(geometry.size));
    page.set_style(&ripple, "left", &px(geometry.left));
    page.set_style(&ripple, "top", &px(geometry.top));
    page.set_style(&ripple, "background", "currentColor");
    page.set_style(&ripple, "opacity", &opacity.to_string());

    let slot: Rc<Cell<Option<ListenerId>>> = Rc::new(Cell::new(None));
    let handler = {
        let page = Rc::clone(page);
        let ripple = ripple.clone();
        let slot = Rc::clone(&slot);
        Rc::new(move |_event: &UiEvent| {
            page.remove(&ripple);
            if let Some(id) = slot.take() {
                page.unlisten(id);
            }
            Reaction::Proceed
        })
    };
    let id = page.listen(Target::Node(&ripple), EventKind::AnimationEnd, handler);
    slot.set(Some(id));
}

fn px(value: f64) -> String {
    format!("{value}px")
}

pub fn install<P: Page + 'static>(page: &Rc<P>, config: &MotionConfig) -> Install {
    let buttons = page.query_all(BUTTON_SELECTOR);
    if buttons.is_empty() {
        return Install::Skipped("no .btn");
    }
    let scale = config.ripple.scale;
    let opacity = config.ripple.opacity;
    for button in buttons {
        let page_for_button = Rc::clone(page);
        let target = button.clone();
        page.listen(
            Target::Node(&button),
            EventKind::PointerDown,
            Rc::new(move |event: &UiEvent| {
                spawn(&page_for_button, &target, event, scale, opacity);
                Reaction::Proceed
            }),
        );
    }
    Install::Active
}
