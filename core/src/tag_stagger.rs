use std::cell::Cell;
use std::rc::Rc;

use crate::config::{MotionConfig, TagStaggerConfig};
use crate::oneshot::OneShot;
use crate::page::{ObserverId, Page, VisibilityEntry, VisibilityOptions};
use crate::units::Install;

pub const TAG_SELECTOR: &str = ".skill-tag, .tag";
pub const GROUP_SELECTOR: &str = ".about-preview__skills, .project-card__tags";

pub fn stagger_delay(index: usize, step_ms: u32) -> u32 {
    u32::try_from(index)
        .unwrap_or(u32::MAX)
        .saturating_mul(step_ms)
}

fn prime<P: Page>(page: &P, tag: &P::Node, config: &TagStaggerConfig) {
    page.set_style(tag, "opacity", "0");
    page.set_style(tag, "transform", &format!("translateY({}px)", config.offset_px));
    page.set_style(
        tag,
        "transition",
        &format!(
            "opacity {s}s ease, transform {s}s ease",
            s = config.transition_s
        ),
    );
}

fn reveal_group<P: Page + 'static>(page: &Rc<P>, group: &P::Node, step_ms: u32) {
    for (index, tag) in page.query_all_within(group, TAG_SELECTOR).into_iter().enumerate() {
        let revealer = Rc::clone(page);
        page.schedule_timeout(
            stagger_delay(index, step_ms),
            Box::new(move || {
                revealer.set_style(&tag, "opacity", "1");
                revealer.set_style(&tag, "transform", "translateY(0)");
            }),
        );
    }
}

pub fn install<P: Page + 'static>(page: &Rc<P>, config: &MotionConfig) -> Install {
    let groups = page.query_all(GROUP_SELECTOR);
    let leaders: Vec<P::Node> = groups
        .iter()
        .filter_map(|group| page.query_within(group, TAG_SELECTOR))
        .collect();
    if leaders.is_empty() {
        return Install::Skipped("no tag groups");
    }

    // Only the first tag of a group is observed; its intersection reveals
    // every sibling in the group.
    let shots = Rc::new(OneShot::new(&leaders));
    let observer: Rc<Cell<Option<ObserverId>>> = Rc::new(Cell::new(None));
    let step_ms = config.tag_stagger.step_ms;
    let options = VisibilityOptions::new(config.tag_stagger.threshold, "0px");

    let callback = {
        let page = Rc::clone(page);
        let observer = Rc::clone(&observer);
        Rc::new(move |entry: &VisibilityEntry<P::Node>| {
            if !entry.is_intersecting || !shots.fire(&entry.target) {
                return;
            }
            if let Some(group) = page.closest(&entry.target, GROUP_SELECTOR) {
                reveal_group(&page, &group, step_ms);
            }
            if let Some(id) = observer.get() {
                page.unobserve(id, &entry.target);
            }
        })
    };
    let Some(id) = page.observe_visibility(&leaders, &options, callback) else {
        return Install::Skipped("visibility observation unavailable");
    };
    observer.set(Some(id));

    // Tags are hidden only once something is watching to bring them back.
    for group in &groups {
        for tag in page.query_all_within(group, TAG_SELECTOR) {
            prime(page.as_ref(), &tag, &config.tag_stagger);
        }
    }
    Install::Active
}
