use std::rc::Rc;

use crate::config::MotionConfig;
use crate::page::{EventKind, Page, Reaction, Target, UiEvent};
use crate::units::Install;

pub const BACK_TO_TOP_ID: &str = "backToTop";

pub fn install<P: Page + 'static>(page: &Rc<P>, _config: &MotionConfig) -> Install {
    let Some(button) = page.by_id(BACK_TO_TOP_ID) else {
        return Install::Skipped("no #backToTop");
    };
    let scroller = Rc::clone(page);
    page.listen(
        Target::Node(&button),
        EventKind::Click,
        Rc::new(move |_event: &UiEvent| {
            scroller.scroll_to_top();
            Reaction::Proceed
        }),
    );
    Install::Active
}
