pub mod active_link;
pub mod back_to_top;
pub mod config;
pub mod counter;
pub mod easing;
pub mod hero;
pub mod nav;
pub mod oneshot;
pub mod page;
pub mod reveal;
pub mod ripple;
pub mod tag_filter;
pub mod tag_stagger;
pub mod tilt;
pub mod transition;
pub mod units;

pub use config::{ConfigError, MotionConfig, UnitKind};
pub use page::{
    EventKind, Handler, ListenerId, Modifiers, ObserverId, Page, Reaction, Rect, Target, UiEvent,
    VisibilityEntry, VisibilityOptions,
};
pub use units::{install_all, install_unit, Install, UnitStatus};
