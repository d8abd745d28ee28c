//! Animation and transition descriptors.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::ValueParseError;
use crate::value::tagged::Value;

// ---------------------------------------------------------------------------
// Timing functions
// ---------------------------------------------------------------------------

named_enum! {
    /// Where the jumps of a step function happen.
    pub enum StepJump {
        JumpEnd = "jump-end",
        JumpStart = "jump-start",
        JumpNone = "jump-none",
        JumpBoth = "jump-both",
    }
}

impl StepJump {
    /// Like [`from_name`](Self::from_name) but also accepts `start` / `end`.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "start" => Some(StepJump::JumpStart),
            "end" => Some(StepJump::JumpEnd),
            other => StepJump::from_name(other),
        }
    }
}

/// Easing curve of an animation or transition.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum TimingFunction {
    #[default]
    Ease,
    EaseIn,
    EaseOut,
    EaseInOut,
    Linear,
    Steps {
        count: u32,
        jump: StepJump,
    },
    CubicBezier {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    },
}

impl TimingFunction {
    /// Names of the keyword curves.
    pub const NAMES: [&'static str; 5] = ["ease", "ease-in", "ease-out", "ease-in-out", "linear"];

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "ease" => Some(TimingFunction::Ease),
            "ease-in" => Some(TimingFunction::EaseIn),
            "ease-out" => Some(TimingFunction::EaseOut),
            "ease-in-out" => Some(TimingFunction::EaseInOut),
            "linear" => Some(TimingFunction::Linear),
            _ => None,
        }
    }

    /// A step function; `count` must be positive.
    pub fn steps(count: u32, jump: StepJump) -> Option<Self> {
        (count > 0).then_some(TimingFunction::Steps { count, jump })
    }

    /// A cubic Bézier; `x1` and `x2` must lie in `[0, 1]`.
    pub fn cubic_bezier(x1: f64, y1: f64, x2: f64, y2: f64) -> Option<Self> {
        let in_unit = |x: f64| (0.0..=1.0).contains(&x);
        (in_unit(x1) && in_unit(x2) && y1.is_finite() && y2.is_finite())
            .then_some(TimingFunction::CubicBezier { x1, y1, x2, y2 })
    }

    /// Keyword name for the named curves.
    pub fn keyword(&self) -> Option<&'static str> {
        match self {
            TimingFunction::Ease => Some("ease"),
            TimingFunction::EaseIn => Some("ease-in"),
            TimingFunction::EaseOut => Some("ease-out"),
            TimingFunction::EaseInOut => Some("ease-in-out"),
            TimingFunction::Linear => Some("linear"),
            _ => None,
        }
    }
}

impl fmt::Display for TimingFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimingFunction::Steps { count, jump } => write!(f, "steps({count}, {})", jump.name()),
            TimingFunction::CubicBezier { x1, y1, x2, y2 } => {
                write!(f, "cubic-bezier({x1}, {y1}, {x2}, {y2})")
            }
            named => f.write_str(named.keyword().unwrap_or("ease")),
        }
    }
}

impl FromStr for TimingFunction {
    type Err = ValueParseError;

    /// Accepts the keyword curves, `steps(n[, jump])` and
    /// `cubic-bezier(x1, y1, x2, y2)`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ValueParseError::new("timing function", s);
        let text = s.trim().to_ascii_lowercase();
        if let Some(named) = TimingFunction::from_name(&text) {
            return Ok(named);
        }
        let (head, args) = text.split_once('(').ok_or_else(err)?;
        let args = args.strip_suffix(')').ok_or_else(err)?;
        let args: Vec<&str> = args.split(',').map(str::trim).collect();
        match (head.trim(), args.as_slice()) {
            ("steps", [count]) => {
                let count = count.parse().map_err(|_| err())?;
                TimingFunction::steps(count, StepJump::JumpEnd).ok_or_else(err)
            }
            ("steps", [count, jump]) => {
                let count = count.parse().map_err(|_| err())?;
                let jump = StepJump::parse(jump).ok_or_else(err)?;
                TimingFunction::steps(count, jump).ok_or_else(err)
            }
            ("cubic-bezier", [x1, y1, x2, y2]) => {
                let n = |t: &str| t.parse::<f64>().map_err(|_| err());
                TimingFunction::cubic_bezier(n(x1)?, n(y1)?, n(x2)?, n(y2)?).ok_or_else(err)
            }
            _ => Err(err()),
        }
    }
}

named_enum! {
    /// Playback direction of an animation.
    pub enum AnimationDirection {
        Normal = "normal",
        Reverse = "reverse",
        Alternate = "alternate",
        AlternateReverse = "alternate-reverse",
    }
}

// ---------------------------------------------------------------------------
// Animated property
// ---------------------------------------------------------------------------

/// One property driven by an animation. All values share the kind declared
/// for `tag`; keyframe keys are percentages strictly between 0 and 100.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AnimatedProperty {
    pub tag: String,
    pub from: Option<Value>,
    pub to: Option<Value>,
    pub key_frames: BTreeMap<u8, Value>,
}

impl AnimatedProperty {
    pub fn new(tag: impl Into<String>, from: impl Into<Value>, to: impl Into<Value>) -> Self {
        Self {
            tag: tag.into(),
            from: Some(from.into()),
            to: Some(to.into()),
            key_frames: BTreeMap::new(),
        }
    }

    /// Add a keyframe (builder). Keys outside `1..=99` are ignored.
    pub fn with_key_frame(mut self, percent: u8, value: impl Into<Value>) -> Self {
        if (1..100).contains(&percent) {
            self.key_frames.insert(percent, value.into());
        }
        self
    }
}

// ---------------------------------------------------------------------------
// Animation
// ---------------------------------------------------------------------------

/// Iteration count meaning "repeat forever".
pub const INFINITE: i64 = -1;

/// A keyframe animation bound to one or more properties.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Animation {
    /// Name used to correlate renderer events with this animation.
    pub id: String,
    /// Seconds.
    pub duration: f64,
    /// Seconds.
    pub delay: f64,
    pub timing_function: TimingFunction,
    /// Positive, or [`INFINITE`].
    pub iteration_count: i64,
    pub direction: AnimationDirection,
    pub properties: Vec<AnimatedProperty>,
}

impl Default for Animation {
    fn default() -> Self {
        Self {
            id: String::new(),
            duration: 1.0,
            delay: 0.0,
            timing_function: TimingFunction::Ease,
            iteration_count: 1,
            direction: AnimationDirection::Normal,
            properties: Vec::new(),
        }
    }
}

impl Animation {
    /// Unnamed animation over `properties`. The session gives it a unique
    /// id when it is assigned to a view.
    pub fn new(properties: Vec<AnimatedProperty>) -> Self {
        Self {
            properties,
            ..Self::default()
        }
    }

    pub fn is_named(&self) -> bool {
        !self.id.is_empty()
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_duration(mut self, seconds: f64) -> Self {
        self.duration = seconds;
        self
    }

    pub fn with_delay(mut self, seconds: f64) -> Self {
        self.delay = seconds;
        self
    }

    pub fn with_iterations(mut self, count: i64) -> Self {
        self.iteration_count = count;
        self
    }

    pub fn with_direction(mut self, direction: AnimationDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_timing(mut self, timing: TimingFunction) -> Self {
        self.timing_function = timing;
        self
    }

    pub fn is_infinite(&self) -> bool {
        self.iteration_count == INFINITE
    }
}

// ---------------------------------------------------------------------------
// Transition
// ---------------------------------------------------------------------------

/// Implicit animation of one property's changes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transition {
    pub property: String,
    /// Seconds.
    pub duration: f64,
    /// Seconds.
    pub delay: f64,
    pub timing_function: TimingFunction,
}

impl Transition {
    pub fn new(property: impl Into<String>, duration: f64) -> Self {
        Self {
            property: property.into(),
            duration,
            delay: 0.0,
            timing_function: TimingFunction::Ease,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::size::Size;

    // ── Timing functions ─────────────────────────────────────────────

    #[test]
    fn timing_keywords() {
        assert_eq!("ease-in-out".parse::<TimingFunction>().unwrap(), TimingFunction::EaseInOut);
        assert_eq!("LINEAR".parse::<TimingFunction>().unwrap(), TimingFunction::Linear);
    }

    #[test]
    fn timing_steps() {
        assert_eq!(
            "steps(40)".parse::<TimingFunction>().unwrap(),
            TimingFunction::Steps { count: 40, jump: StepJump::JumpEnd }
        );
        assert_eq!(
            "steps(4, start)".parse::<TimingFunction>().unwrap(),
            TimingFunction::Steps { count: 4, jump: StepJump::JumpStart }
        );
        assert!("steps(0)".parse::<TimingFunction>().is_err());
        assert!("steps(2, sideways)".parse::<TimingFunction>().is_err());
    }

    #[test]
    fn timing_cubic_bezier() {
        assert_eq!(
            "cubic-bezier(0.1, 0.7, 1, 0.1)".parse::<TimingFunction>().unwrap(),
            TimingFunction::CubicBezier { x1: 0.1, y1: 0.7, x2: 1.0, y2: 0.1 }
        );
        assert!("cubic-bezier(1.5, 0, 0, 0)".parse::<TimingFunction>().is_err());
        assert!("cubic-bezier(0, 0, 0)".parse::<TimingFunction>().is_err());
    }

    #[test]
    fn timing_display_reparses() {
        for t in [
            TimingFunction::Ease,
            TimingFunction::Steps { count: 3, jump: StepJump::JumpBoth },
            TimingFunction::CubicBezier { x1: 0.25, y1: -0.5, x2: 0.75, y2: 1.5 },
        ] {
            assert_eq!(t.to_string().parse::<TimingFunction>().unwrap(), t);
        }
    }

    // ── Animations ───────────────────────────────────────────────────

    #[test]
    fn key_frames_outside_range_are_ignored() {
        let p = AnimatedProperty::new("left", Size::px(16.0), Size::px(16.0))
            .with_key_frame(0, Size::px(1.0))
            .with_key_frame(25, Size::px(200.0))
            .with_key_frame(100, Size::px(1.0));
        assert_eq!(p.key_frames.len(), 1);
        assert!(p.key_frames.contains_key(&25));
    }

    #[test]
    fn new_animation_is_unnamed() {
        let a = Animation::new(vec![
            AnimatedProperty::new("left", Size::px(0.0), Size::px(1.0)),
            AnimatedProperty::new("top", Size::px(0.0), Size::px(1.0)),
        ]);
        assert!(!a.is_named());
        assert!(a.clone().with_id("slide").is_named());
        assert_eq!(a.iteration_count, 1);
        assert!(a.with_iterations(INFINITE).is_infinite());
    }

    #[test]
    fn direction_names() {
        assert_eq!(AnimationDirection::from_name("alternate"), Some(AnimationDirection::Alternate));
        assert_eq!(AnimationDirection::AlternateReverse.name(), "alternate-reverse");
    }
}
