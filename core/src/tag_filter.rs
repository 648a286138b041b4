use std::rc::Rc;

use url::Url;

use crate::config::MotionConfig;
use crate::page::{EventKind, Page, Reaction, Target, UiEvent};
use crate::units::Install;

pub const FILTER_BUTTON_SELECTOR: &str = ".filter-btn";
pub const GRID_SELECTOR: &str = ".projects-grid";
pub const CARD_SELECTOR: &str = ".project-card[data-tags]";
pub const TAG_LINK_SELECTOR: &str = "a.tag";
pub const TAG_LINK_CLASS: &str = "tag";
pub const HIDDEN_CLASS: &str = "card-hidden";
pub const ACTIVE_CLASS: &str = "active";
pub const TAG_PARAM: &str = "tag";
pub const ALL_TAGS: &str = "all";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ActiveTag {
    #[default]
    All,
    Named(String),
}

impl ActiveTag {
    pub fn from_param(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") | Some(ALL_TAGS) => ActiveTag::All,
            Some(tag) => ActiveTag::Named(tag.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ActiveTag::All => ALL_TAGS,
            ActiveTag::Named(tag) => tag,
        }
    }

    pub fn matches(&self, tags: &str) -> bool {
        match self {
            ActiveTag::All => true,
            ActiveTag::Named(tag) => tags.split_whitespace().any(|candidate| candidate == tag),
        }
    }
}

fn tag_param(url: &Url) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == TAG_PARAM)
        .map(|(_, value)| value.into_owned())
}

pub fn tag_from_url(location: &str) -> ActiveTag {
    let Ok(url) = Url::parse(location) else {
        return ActiveTag::All;
    };
    ActiveTag::from_param(tag_param(&url).as_deref())
}

pub fn tag_from_link(href: &str, location: &str) -> ActiveTag {
    let Some(url) = Url::parse(location).ok().and_then(|base| base.join(href).ok()) else {
        return ActiveTag::All;
    };
    ActiveTag::from_param(tag_param(&url).as_deref())
}

pub fn with_tag(location: &str, tag: &ActiveTag) -> Option<String> {
    let mut url = Url::parse(location).ok()?;
    let mut pairs: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != TAG_PARAM)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();
    if let ActiveTag::Named(name) = tag {
        pairs.push((TAG_PARAM.to_string(), name.clone()));
    }
    if pairs.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(pairs);
    }
    Some(url.to_string())
}

struct TagFilter<P: Page> {
    page: Rc<P>,
    buttons: Vec<P::Node>,
    cards: Vec<P::Node>,
}

impl<P: Page> TagFilter<P> {
    fn set(&self, tag: &ActiveTag) {
        for button in &self.buttons {
            let active = self.page.attr(button, "data-filter").as_deref() == Some(tag.as_str());
            self.page.toggle_class(button, ACTIVE_CLASS, active);
            self.page
                .set_attr(button, "aria-pressed", if active { "true" } else { "false" });
        }
        for card in &self.cards {
            let tags = self.page.attr(card, "data-tags").unwrap_or_default();
            self.page.toggle_class(card, HIDDEN_CLASS, !tag.matches(&tags));
        }
        if let Some(url) = with_tag(&self.page.location(), tag) {
            self.page.replace_location(&url);
        }
    }
}

pub fn install<P: Page + 'static>(page: &Rc<P>, _config: &MotionConfig) -> Install {
    let buttons = page.query_all(FILTER_BUTTON_SELECTOR);
    if buttons.is_empty() {
        return Install::Skipped("no .filter-btn");
    }
    let Some(grid) = page.query(GRID_SELECTOR) else {
        return Install::Skipped("no .projects-grid");
    };

    let filter = Rc::new(TagFilter {
        page: Rc::clone(page),
        buttons: buttons.clone(),
        cards: page.query_all_within(&grid, CARD_SELECTOR),
    });

    for button in &buttons {
        let filter = Rc::clone(&filter);
        let button_node = button.clone();
        page.listen(
            Target::Node(button),
            EventKind::Click,
            Rc::new(move |_event: &UiEvent| {
                let Some(value) = filter.page.attr(&button_node, "data-filter") else {
                    return Reaction::Proceed;
                };
                filter.set(&ActiveTag::from_param(Some(&value)));
                Reaction::Proceed
            }),
        );
    }

    for link in page.query_all_within(&grid, TAG_LINK_SELECTOR) {
        let filter = Rc::clone(&filter);
        let link_node = link.clone();
        page.listen(
            Target::Node(&link),
            EventKind::Click,
            Rc::new(move |_event: &UiEvent| {
                let href = filter.page.attr(&link_node, "href").unwrap_or_default();
                let tag = tag_from_link(&href, &filter.page.location());
                filter.set(&tag);
                Reaction::Intercept
            }),
        );
    }

    filter.set(&tag_from_url(&page.location()));
    Install::Active
}
