use serde::Deserialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    Nav,
    Reveal,
    Ripple,
    BackToTop,
    Hero,
    ActiveLink,
    Tilt,
    Counter,
    TagStagger,
    Transition,
    TagFilter,
}

impl UnitKind {
    pub const ALL: [UnitKind; 11] = [
        UnitKind::Nav,
        UnitKind::Reveal,
        UnitKind::Ripple,
        UnitKind::BackToTop,
        UnitKind::Hero,
        UnitKind::ActiveLink,
        UnitKind::Tilt,
        UnitKind::Counter,
        UnitKind::TagStagger,
        UnitKind::Transition,
        UnitKind::TagFilter,
    ];

    pub fn label(self) -> &'static str {
        match self {
            UnitKind::Nav => "nav",
            UnitKind::Reveal => "reveal",
            UnitKind::Ripple => "ripple",
            UnitKind::BackToTop => "back_to_top",
            UnitKind::Hero => "hero",
            UnitKind::ActiveLink => "active_link",
            UnitKind::Tilt => "tilt",
            UnitKind::Counter => "counter",
            UnitKind::TagStagger => "tag_stagger",
            UnitKind::Transition => "transition",
            UnitKind::TagFilter => "tag_filter",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config decode failed: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("{field} must be within [0, 1], got {value}")]
    Threshold { field: &'static str, value: f64 },
    #[error("{field} must be one to four px or % lengths, got {value:?}")]
    RootMargin { field: &'static str, value: String },
    #[error("counter duration must be positive")]
    CounterDuration,
    #[error("exit delay {delay_ms}ms is shorter than the {fade_ms}ms fade-out")]
    ExitDelay { delay_ms: u32, fade_ms: u32 },
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    pub scrolled_offset: f64,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            scrolled_offset: 24.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    pub threshold: f64,
    pub root_margin: String,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            threshold: 0.12,
            root_margin: "0px 0px -40px 0px".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct RippleConfig {
    pub scale: f64,
    pub opacity: f64,
}

impl Default for RippleConfig {
    fn default() -> Self {
        Self {
            scale: 1.6,
            opacity: 0.12,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ActiveLinkConfig {
    pub root_margin: String,
}

impl Default for ActiveLinkConfig {
    fn default() -> Self {
        Self {
            root_margin: "-30% 0px -60% 0px".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct TiltConfig {
    pub max_deg: f64,
    pub lift_px: f64,
    pub perspective_px: f64,
}

impl Default for TiltConfig {
    fn default() -> Self {
        Self {
            max_deg: 4.0,
            lift_px: 6.0,
            perspective_px: 800.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct CounterConfig {
    pub threshold: f64,
    pub duration_ms: f64,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            threshold: 0.6,
            duration_ms: 1200.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct TagStaggerConfig {
    pub threshold: f64,
    pub step_ms: u32,
    pub offset_px: f64,
    pub transition_s: f64,
}

impl Default for TagStaggerConfig {
    fn default() -> Self {
        Self {
            threshold: 0.5,
            step_ms: 60,
            offset_px: 8.0,
            transition_s: 0.35,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct TransitionConfig {
    pub fade_in_ms: u32,
    pub fade_out_ms: u32,
    pub exit_delay_ms: u32,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            fade_in_ms: 400,
            fade_out_ms: 250,
            exit_delay_ms: 300,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    pub debug: bool,
    pub units: Vec<UnitKind>,
    pub nav: NavConfig,
    pub reveal: RevealConfig,
    pub ripple: RippleConfig,
    pub active_link: ActiveLinkConfig,
    pub tilt: TiltConfig,
    pub counter: CounterConfig,
    pub tag_stagger: TagStaggerConfig,
    pub transition: TransitionConfig,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            debug: false,
            units: UnitKind::ALL.to_vec(),
            nav: NavConfig::default(),
            reveal: RevealConfig::default(),
            ripple: RippleConfig::default(),
            active_link: ActiveLinkConfig::default(),
            tilt: TiltConfig::default(),
            counter: CounterConfig::default(),
            tag_stagger: TagStaggerConfig::default(),
            transition: TransitionConfig::default(),
        }
    }
}

impl MotionConfig {
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: MotionConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_threshold("reveal.threshold", self.reveal.threshold)?;
        check_threshold("counter.threshold", self.counter.threshold)?;
        check_threshold("tag_stagger.threshold", self.tag_stagger.threshold)?;
        check_root_margin("reveal.root_margin", &self.reveal.root_margin)?;
        check_root_margin("active_link.root_margin", &self.active_link.root_margin)?;
        if !(self.counter.duration_ms.is_finite() && self.counter.duration_ms > 0.0) {
            return Err(ConfigError::CounterDuration);
        }
        if self.transition.exit_delay_ms < self.transition.fade_out_ms {
            return Err(ConfigError::ExitDelay {
                delay_ms: self.transition.exit_delay_ms,
                fade_ms: self.transition.fade_out_ms,
            });
        }
        Ok(())
    }

    pub fn is_enabled(&self, unit: UnitKind) -> bool {
        self.units.contains(&unit)
    }
}

fn check_threshold(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Threshold { field, value })
    }
}

// IntersectionObserver rejects anything but one to four px/% lengths.
fn check_root_margin(field: &'static str, value: &str) -> Result<(), ConfigError> {
    let lengths: Vec<&str> = value.split_whitespace().collect();
    let valid = (1..=4).contains(&lengths.len())
        && lengths.iter().all(|length| is_margin_length(length));
    if valid {
        Ok(())
    } else {
        Err(ConfigError::RootMargin {
            field,
            value: value.to_string(),
        })
    }
}

fn is_margin_length(length: &str) -> bool {
    let number = length
        .strip_suffix("px")
        .or_else(|| length.strip_suffix('%'));
    match number {
        Some(number) => number.parse::<f64>().map_or(false, f64::is_finite),
        None => false,
    }
}
