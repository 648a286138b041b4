use std::cell::Cell;
use std::rc::Rc;

use crate::config::MotionConfig;
use crate::easing::{ease_out_cubic, progress};
use crate::oneshot::OneShot;
use crate::page::{ObserverId, Page, VisibilityEntry, VisibilityOptions};
use crate::units::Install;

pub const COUNTER_SELECTOR: &str = ".stat-card__num";

#[derive(Clone, Debug, PartialEq)]
pub struct CounterText {
    pub prefix: String,
    pub target: f64,
    pub integer: bool,
    pub suffix: String,
}

impl CounterText {
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let start = raw.find(|ch: char| ch.is_ascii_digit() || ch == '.')?;
        let run_len = raw[start..]
            .find(|ch: char| !(ch.is_ascii_digit() || ch == '.'))
            .unwrap_or(raw.len() - start);
        let run = &raw[start..start + run_len];
        let target = leading_decimal(run)?;
        Some(Self {
            prefix: raw[..start].to_string(),
            target,
            integer: target.fract() == 0.0,
            suffix: raw[start + run_len..].to_string(),
        })
    }

    pub fn format(&self, value: f64) -> String {
        let number = if self.integer {
            format!("{}", value.round() as i64)
        } else {
            format!("{value:.1}")
        };
        format!("{}{}{}", self.prefix, number, self.suffix)
    }
}

// Longest prefix of a `[0-9.]` run that reads as a decimal: "1.2.3" -> 1.2.
fn leading_decimal(run: &str) -> Option<f64> {
    let mut end = 0;
    let mut seen_dot = false;
    let mut seen_digit = false;
    for (idx, ch) in run.char_indices() {
        if ch == '.' {
            if seen_dot {
                break;
            }
            seen_dot = true;
        } else {
            seen_digit = true;
        }
        end = idx + ch.len_utf8();
    }
    if !seen_digit {
        return None;
    }
    run[..end].trim_end_matches('.').parse::<f64>().ok()
}

#[derive(Clone, Debug)]
pub struct CounterAnimation {
    pub text: CounterText,
    pub started_at: f64,
    pub duration_ms: f64,
}

impl CounterAnimation {
    pub fn new(text: CounterText, started_at: f64, duration_ms: f64) -> Self {
        Self {
            text,
            started_at,
            duration_ms,
        }
    }

    pub fn sample(&self, now: f64) -> (String, bool) {
        let t = progress(now, self.started_at, self.duration_ms);
        if t >= 1.0 {
            return (self.text.format(self.text.target), true);
        }
        let value = self.text.target * ease_out_cubic(t);
        (self.text.format(value), false)
    }
}

fn run_frame<P: Page + 'static>(page: Rc<P>, node: P::Node, animation: Rc<CounterAnimation>, now: f64) {
    let (text, done) = animation.sample(now);
    page.set_text(&node, &text);
    if done {
        return;
    }
    let next = Rc::clone(&page);
    page.schedule_frame(Box::new(move |timestamp: f64| {
        run_frame(next, node, animation, timestamp);
    }));
}

pub fn animate<P: Page + 'static>(page: &Rc<P>, node: &P::Node, duration_ms: f64) -> bool {
    let Some(text) = CounterText::parse(&page.text(node)) else {
        return false;
    };
    let animation = Rc::new(CounterAnimation::new(text, page.now(), duration_ms));
    let runner = Rc::clone(page);
    let node = node.clone();
    page.schedule_frame(Box::new(move |timestamp: f64| {
        run_frame(runner, node, animation, timestamp);
    }));
    true
}

pub fn install<P: Page + 'static>(page: &Rc<P>, config: &MotionConfig) -> Install {
    let counters = page.query_all(COUNTER_SELECTOR);
    if counters.is_empty() {
        return Install::Skipped("no .stat-card__num");
    }

    let shots = Rc::new(OneShot::new(&counters));
    let observer: Rc<Cell<Option<ObserverId>>> = Rc::new(Cell::new(None));
    let duration_ms = config.counter.duration_ms;
    let options = VisibilityOptions::new(config.counter.threshold, "0px");

    let callback = {
        let page = Rc::clone(page);
        let observer = Rc::clone(&observer);
        Rc::new(move |entry: &VisibilityEntry<P::Node>| {
            if !entry.is_intersecting || !shots.fire(&entry.target) {
                return;
            }
            animate(&page, &entry.target, duration_ms);
            if let Some(id) = observer.get() {
                page.unobserve(id, &entry.target);
            }
        })
    };
    let Some(id) = page.observe_visibility(&counters, &options, callback) else {
        return Install::Skipped("visibility observation unavailable");
    };
    observer.set(Some(id));
    Install::Active
}
