use std::cell::RefCell;
use std::rc::Rc;

use crate::dom_page::DomPage;

thread_local! {
    static PAGE: RefCell<Option<Rc<DomPage>>> = RefCell::new(None);
}

pub(crate) fn is_installed() -> bool {
    PAGE.with(|slot| slot.borrow().is_some())
}

pub(crate) fn set_page(page: Rc<DomPage>) {
    PAGE.with(|slot| {
        *slot.borrow_mut() = Some(page);
    });
}
