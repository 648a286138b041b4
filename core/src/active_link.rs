use std::rc::Rc;

use crate::config::MotionConfig;
use crate::page::{Page, VisibilityEntry, VisibilityOptions};
use crate::units::Install;

pub const NAV_LINK_SELECTOR: &str = ".nav__link[href*=\"#\"]";
pub const ACTIVE_CLASS: &str = "active";

pub fn fragment_of(href: &str) -> Option<&str> {
    let fragment = href.split('#').nth(1)?;
    if fragment.is_empty() {
        None
    } else {
        Some(fragment)
    }
}

pub fn links_to(href: &str, id: &str) -> bool {
    !id.is_empty() && href.strip_suffix(id).is_some_and(|rest| rest.ends_with('#'))
}

pub fn install<P: Page + 'static>(page: &Rc<P>, config: &MotionConfig) -> Install {
    let links = page.query_all(NAV_LINK_SELECTOR);
    if links.is_empty() {
        return Install::Skipped("no in-page nav links");
    }

    let mut sections: Vec<P::Node> = Vec::new();
    for link in &links {
        let Some(href) = page.attr(link, "href") else {
            continue;
        };
        let Some(section) = fragment_of(&href).and_then(|id| page.by_id(id)) else {
            continue;
        };
        if !sections.contains(&section) {
            sections.push(section);
        }
    }
    if sections.is_empty() {
        return Install::Skipped("nav links point at no sections");
    }

    let options = VisibilityOptions::new(0.0, &config.active_link.root_margin);
    let callback = {
        let page = Rc::clone(page);
        Rc::new(move |entry: &VisibilityEntry<P::Node>| {
            if !entry.is_intersecting {
                return;
            }
            let id = page.attr(&entry.target, "id").unwrap_or_default();
            for link in &links {
                let href = page.attr(link, "href").unwrap_or_default();
                page.toggle_class(link, ACTIVE_CLASS, links_to(&href, &id));
            }
        })
    };
    match page.observe_visibility(&sections, &options, callback) {
        Some(_) => Install::Active,
        None => Install::Skipped("visibility observation unavailable"),
    }
}
