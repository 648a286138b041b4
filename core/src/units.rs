use std::rc::Rc;

use crate::config::{MotionConfig, UnitKind};
use crate::page::Page;
use crate::{
    active_link, back_to_top, counter, hero, nav, reveal, ripple, tag_filter, tag_stagger, tilt,
    transition,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Install {
    Active,
    Skipped(&'static str),
}

impl Install {
    pub fn is_active(self) -> bool {
        matches!(self, Install::Active)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnitStatus {
    Installed(Install),
    Disabled,
}

pub fn install_unit<P: Page + 'static>(
    unit: UnitKind,
    page: &Rc<P>,
    config: &MotionConfig,
) -> Install {
    match unit {
        UnitKind::Nav => nav::install(page, config),
        UnitKind::Reveal => reveal::install(page, config),
        UnitKind::Ripple => ripple::install(page, config),
        UnitKind::BackToTop => back_to_top::install(page, config),
        UnitKind::Hero => hero::install(page, config),
        UnitKind::ActiveLink => active_link::install(page, config),
        UnitKind::Tilt => tilt::install(page, config),
        UnitKind::Counter => counter::install(page, config),
        UnitKind::TagStagger => tag_stagger::install(page, config),
        UnitKind::Transition => transition::install(page, config),
        UnitKind::TagFilter => tag_filter::install(page, config),
    }
}

pub fn install_all<P: Page + 'static>(
    page: &Rc<P>,
    config: &MotionConfig,
) -> Vec<(UnitKind, UnitStatus)> {
    UnitKind::ALL
        .iter()
        .map(|unit| {
            let status = if config.is_enabled(*unit) {
                UnitStatus::Installed(install_unit(*unit, page, config))
            } else {
                UnitStatus::Disabled
            };
            (*unit, status)
        })
        .collect()
}
