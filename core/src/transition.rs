use std::rc::Rc;

use crate::config::{MotionConfig, TransitionConfig};
use crate::page::{EventKind, Page, Reaction, Target, UiEvent};
use crate::tag_filter::{GRID_SELECTOR, TAG_LINK_CLASS};
use crate::units::Install;
use url::{ParseError, Url};

pub const LINK_SELECTOR: &str = "a[href]";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkKind {
    InPage,
    External,
    Scheme,
    Targeted,
    Internal,
}

pub fn classify_link(href: &str, has_target: bool, location: &str) -> LinkKind {
    let href = href.trim();
    if has_target {
        return LinkKind::Targeted;
    }
    if href.starts_with('#') || is_same_document_fragment(href, location) {
        return LinkKind::InPage;
    }
    if href.starts_with("//") {
        return LinkKind::External;
    }
    match Url::parse(href) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => LinkKind::External,
        Ok(_) => LinkKind::Scheme,
        Err(ParseError::RelativeUrlWithoutBase) => LinkKind::Internal,
        // Absolute but unparseable: let the browser deal with it.
        Err(_) => LinkKind::External,
    }
}

// `index.html#work` while on `index.html` only scrolls; the page never unloads.
fn is_same_document_fragment(href: &str, location: &str) -> bool {
    let Ok(base) = Url::parse(location) else {
        return false;
    };
    let Ok(mut target) = base.join(href) else {
        return false;
    };
    if target.fragment().is_none() {
        return false;
    }
    target.set_fragment(None);
    let mut current = base;
    current.set_fragment(None);
    target == current
}

fn fade_in<P: Page + 'static>(page: &Rc<P>) {
    let painter = Rc::clone(page);
    page.schedule_frame(Box::new(move |_timestamp: f64| {
        let root = painter.root();
        painter.set_style(&root, "opacity", "1");
    }));
}

fn opacity_transition(ms: u32) -> String {
    format!("opacity {}s ease", f64::from(ms) / 1000.0)
}

fn install_fade_in<P: Page + 'static>(page: &Rc<P>, config: &TransitionConfig) {
    let root = page.root();
    page.set_style(&root, "opacity", "0");
    page.set_style(&root, "transition", &opacity_transition(config.fade_in_ms));

    if page.is_loaded() {
        fade_in(page);
    } else {
        let loader = Rc::clone(page);
        page.listen(
            Target::Window,
            EventKind::Load,
            Rc::new(move |_event: &UiEvent| {
                fade_in(&loader);
                Reaction::Proceed
            }),
        );
    }

    // Back/forward cache restores the page in its faded-out state.
    let restorer = Rc::clone(page);
    page.listen(
        Target::Window,
        EventKind::PageShow,
        Rc::new(move |_event: &UiEvent| {
            let root = restorer.root();
            restorer.set_style(&root, "opacity", "1");
            Reaction::Proceed
        }),
    );
}

fn is_filter_tag<P: Page>(page: &P, link: &P::Node) -> bool {
    page.has_class(link, TAG_LINK_CLASS) && page.closest(link, GRID_SELECTOR).is_some()
}

pub fn install<P: Page + 'static>(page: &Rc<P>, config: &MotionConfig) -> Install {
    let transition = config.transition.clone();
    install_fade_in(page, &transition);
    let location = page.location();

    for link in page.query_all(LINK_SELECTOR) {
        let href = page.attr(&link, "href").unwrap_or_default();
        if classify_link(&href, page.has_attr(&link, "target"), &location) != LinkKind::Internal {
            continue;
        }
        if is_filter_tag(page.as_ref(), &link) {
            continue;
        }
        let leaver = Rc::clone(page);
        let fade_out_ms = transition.fade_out_ms;
        let exit_delay_ms = transition.exit_delay_ms;
        page.listen(
            Target::Node(&link),
            EventKind::Click,
            Rc::new(move |event: &UiEvent| {
                if !event.is_plain_primary_click() {
                    return Reaction::Proceed;
                }
                let root = leaver.root();
                leaver.set_style(&root, "transition", &opacity_transition(fade_out_ms));
                leaver.set_style(&root, "opacity", "0");
                let navigator = Rc::clone(&leaver);
                let href = href.clone();
                leaver.schedule_timeout(
                    exit_delay_ms,
                    Box::new(move || navigator.navigate(&href)),
                );
                Reaction::PreventDefault
            }),
        );
    }
    Install::Active
}
