use std::rc::Rc;

use crate::config::{MotionConfig, TiltConfig};
use crate::page::{EventKind, Page, Reaction, Rect, Target, UiEvent};
use crate::units::Install;

pub const CARD_SELECTOR: &str = ".project-card";

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tilt {
    pub rotate_x: f64,
    pub rotate_y: f64,
}

pub fn tilt_for(rect: Rect, client_x: f64, client_y: f64, max_deg: f64) -> Option<Tilt> {
    if rect.width <= 0.0 || rect.height <= 0.0 {
        return None;
    }
    let x = (client_x - rect.left) / rect.width - 0.5;
    let y = (client_y - rect.top) / rect.height - 0.5;
    Some(Tilt {
        rotate_x: y * -max_deg,
        rotate_y: x * max_deg,
    })
}

pub fn tilt_transform(tilt: Tilt, config: &TiltConfig) -> String {
    format!(
        "translateY(-{}px) perspective({}px) rotateX({}deg) rotateY({}deg)",
        config.lift_px, config.perspective_px, tilt.rotate_x, tilt.rotate_y
    )
}

pub fn install<P: Page + 'static>(page: &Rc<P>, config: &MotionConfig) -> Install {
    let cards = page.query_all(CARD_SELECTOR);
    if cards.is_empty() {
        return Install::Skipped("no .project-card");
    }
    for card in cards {
        let tilt_config = config.tilt.clone();
        let mover = Rc::clone(page);
        let moved = card.clone();
        page.listen(
            Target::Node(&card),
            EventKind::MouseMove,
            Rc::new(move |event: &UiEvent| {
                let rect = mover.rect(&moved);
                if let Some(tilt) =
                    tilt_for(rect, event.client_x, event.client_y, tilt_config.max_deg)
                {
                    mover.set_style(&moved, "transform", &tilt_transform(tilt, &tilt_config));
                }
                Reaction::Proceed
            }),
        );

        let leaver = Rc::clone(page);
        let left = card.clone();
        page.listen(
            Target::Node(&card),
            EventKind::MouseLeave,
            Rc::new(move |_event: &UiEvent| {
                leaver.set_style(&left, "transform", "");
                Reaction::Proceed
            }),
        );
    }
    Install::Active
}
