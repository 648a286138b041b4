use std::rc::Rc;

use vitrine_core::{install_all, Install, Page, UnitKind, UnitStatus};

use crate::app_config;
use crate::dom_page::DomPage;
use crate::page_runtime;

pub(crate) const READY_ATTR: &str = "data-vitrine";
pub(crate) const READY_VALUE: &str = "ready";

pub(crate) fn start() {
    console_error_panic_hook::set_once();
    if page_runtime::is_installed() {
        return;
    }
    let Some(page) = DomPage::new() else {
        gloo::console::warn!("vitrine: no document, nothing installed");
        return;
    };
    let page = Rc::new(page);
    let config = app_config::load_config(page.window(), page.document());
    let report = install_all(&page, &config);
    if config.debug {
        log_report(&report);
    }
    ready(&page);
    page_runtime::set_page(page);
}

fn ready(page: &DomPage) {
    let root = page.root();
    page.set_attr(&root, READY_ATTR, READY_VALUE);
}

fn log_report(report: &[(UnitKind, UnitStatus)]) {
    let mut active = 0usize;
    for (unit, status) in report {
        match status {
            UnitStatus::Installed(Install::Active) => {
                active += 1;
                gloo::console::debug!("vitrine:", unit.label(), "active");
            }
            UnitStatus::Installed(Install::Skipped(reason)) => {
                gloo::console::debug!("vitrine:", unit.label(), "skipped", *reason);
            }
            UnitStatus::Disabled => {
                gloo::console::debug!("vitrine:", unit.label(), "disabled");
            }
        }
    }
    gloo::console::log!("vitrine: boot complete", active as u32, "units active");
}
