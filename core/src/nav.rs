use std::cell::Cell;
use std::rc::Rc;

use crate::config::MotionConfig;
use crate::page::{EventKind, Page, Reaction, Target, UiEvent};
use crate::units::Install;

pub const NAV_ID: &str = "nav";
pub const HAMBURGER_SELECTOR: &str = ".nav__hamburger";
pub const MOBILE_MENU_ID: &str = "mobileMenu";
pub const MOBILE_LINK_SELECTOR: &str = ".mobile-menu__link";
pub const SCROLLED_CLASS: &str = "scrolled";
pub const OPEN_CLASS: &str = "open";
pub const ESCAPE_KEY: &str = "Escape";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MenuState {
    #[default]
    Closed,
    Open,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuEvent {
    Toggle,
    LinkChosen,
    Escape,
}

impl MenuState {
    pub fn is_open(self) -> bool {
        self == MenuState::Open
    }

    pub fn next(self, event: MenuEvent) -> Option<MenuState> {
        match (self, event) {
            (MenuState::Closed, MenuEvent::Toggle) => Some(MenuState::Open),
            (MenuState::Open, MenuEvent::Toggle) => Some(MenuState::Closed),
            (_, MenuEvent::LinkChosen) => Some(MenuState::Closed),
            (MenuState::Open, MenuEvent::Escape) => Some(MenuState::Closed),
            (MenuState::Closed, MenuEvent::Escape) => None,
        }
    }
}

struct MobileMenu<P: Page> {
    page: Rc<P>,
    hamburger: P::Node,
    menu: P::Node,
    state: Cell<MenuState>,
}

impl<P: Page> MobileMenu<P> {
    fn dispatch(&self, event: MenuEvent) -> bool {
        let Some(next) = self.state.get().next(event) else {
            return false;
        };
        self.state.set(next);
        self.apply(next);
        true
    }

    fn apply(&self, state: MenuState) {
        let open = state.is_open();
        self.page.toggle_class(&self.hamburger, OPEN_CLASS, open);
        self.page
            .set_attr(&self.hamburger, "aria-expanded", bool_attr(open));
        self.page.toggle_class(&self.menu, OPEN_CLASS, open);
        self.page.set_attr(&self.menu, "aria-hidden", bool_attr(!open));
        if let Some(body) = self.page.body() {
            self.page
                .set_style(&body, "overflow", if open { "hidden" } else { "" });
        }
    }
}

fn bool_attr(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

pub fn install<P: Page + 'static>(page: &Rc<P>, config: &MotionConfig) -> Install {
    let Some(nav) = page.by_id(NAV_ID) else {
        return Install::Skipped("no #nav");
    };

    let offset = config.nav.scrolled_offset;
    let update_scrolled = {
        let page = Rc::clone(page);
        let nav = nav.clone();
        move || {
            let scrolled = page.scroll_y() > offset;
            page.toggle_class(&nav, SCROLLED_CLASS, scrolled);
        }
    };
    update_scrolled();
    page.listen(
        Target::Window,
        EventKind::Scroll,
        Rc::new(move |_event: &UiEvent| {
            update_scrolled();
            Reaction::Proceed
        }),
    );

    let (Some(hamburger), Some(menu)) = (page.query(HAMBURGER_SELECTOR), page.by_id(MOBILE_MENU_ID))
    else {
        return Install::Active;
    };

    let controller = Rc::new(MobileMenu {
        page: Rc::clone(page),
        hamburger: hamburger.clone(),
        menu,
        state: Cell::new(MenuState::Closed),
    });

    let toggle = Rc::clone(&controller);
    page.listen(
        Target::Node(&hamburger),
        EventKind::Click,
        Rc::new(move |_event: &UiEvent| {
            toggle.dispatch(MenuEvent::Toggle);
            Reaction::Proceed
        }),
    );

    for link in page.query_all(MOBILE_LINK_SELECTOR) {
        let close = Rc::clone(&controller);
        page.listen(
            Target::Node(&link),
            EventKind::Click,
            Rc::new(move |_event: &UiEvent| {
                close.dispatch(MenuEvent::LinkChosen);
                Reaction::Proceed
            }),
        );
    }

    let escape = Rc::clone(&controller);
    page.listen(
        Target::Document,
        EventKind::KeyDown,
        Rc::new(move |event: &UiEvent| {
            if event.key.as_deref() != Some(ESCAPE_KEY) {
                return Reaction::Proceed;
            }
            if escape.dispatch(MenuEvent::Escape) {
                escape.page.focus(&escape.hamburger);
            }
            Reaction::Proceed
        }),
    );

    Install::Active
}
