use std::cell::Cell;
use std::rc::Rc;

use crate::config::MotionConfig;
use crate::oneshot::OneShot;
use crate::page::{ObserverId, Page, VisibilityEntry, VisibilityOptions};
use crate::units::Install;

pub const REVEAL_SELECTOR: &str = ".reveal-up, .reveal-fade";
pub const IN_VIEW_CLASS: &str = "in-view";

pub fn install<P: Page + 'static>(page: &Rc<P>, config: &MotionConfig) -> Install {
    let elements = page.query_all(REVEAL_SELECTOR);
    if elements.is_empty() {
        return Install::Skipped("no reveal targets");
    }

    let shots = Rc::new(OneShot::new(&elements));
    let observer: Rc<Cell<Option<ObserverId>>> = Rc::new(Cell::new(None));
    let options = VisibilityOptions::new(config.reveal.threshold, &config.reveal.root_margin);

    let callback = {
        let page = Rc::clone(page);
        let observer = Rc::clone(&observer);
        Rc::new(move |entry: &VisibilityEntry<P::Node>| {
            if !entry.is_intersecting || !shots.fire(&entry.target) {
                return;
            }
            page.add_class(&entry.target, IN_VIEW_CLASS);
            if let Some(id) = observer.get() {
                page.unobserve(id, &entry.target);
            }
        })
    };
    let Some(id) = page.observe_visibility(&elements, &options, callback) else {
        for element in &elements {
            page.add_class(element, IN_VIEW_CLASS);
        }
        return Install::Skipped("visibility observation unavailable");
    };
    observer.set(Some(id));
    Install::Active
}
