use std::rc::Rc;

use crate::config::MotionConfig;
use crate::page::Page;
use crate::reveal::IN_VIEW_CLASS;
use crate::units::Install;

pub const HERO_SELECTOR: &str =
    ".hero__title-line, .hero__badge, .hero__sub, .hero__actions, .hero__scroll";

pub fn install<P: Page + 'static>(page: &Rc<P>, _config: &MotionConfig) -> Install {
    let lines = page.query_all(HERO_SELECTOR);
    if lines.is_empty() {
        return Install::Skipped("no hero elements");
    }
    // Two frames: the first lets the initial hidden state paint.
    let outer = Rc::clone(page);
    page.schedule_frame(Box::new(move |_timestamp: f64| {
        let inner = Rc::clone(&outer);
        outer.schedule_frame(Box::new(move |_timestamp: f64| {
            for line in &lines {
                inner.add_class(line, IN_VIEW_CLASS);
            }
        }));
    }));
    Install::Active
}
