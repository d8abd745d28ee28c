//! The closed set of event tags, their categories and payload shapes.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ---------------------------------------------------------------------------
// Category / PayloadShape
// ---------------------------------------------------------------------------

/// Grouping of event tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Pointer,
    Mouse,
    Touch,
    Keyboard,
    Focus,
    Layout,
    Animation,
    Transition,
    Media,
    ValueChange,
}

/// The payload record an event tag carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PayloadShape {
    None,
    Key,
    Mouse,
    Pointer,
    Touch,
    Frame,
    /// A property tag (transition events).
    Property,
    /// An animation id.
    Animation,
    /// Media position or duration in seconds.
    Seconds,
    Number,
    Bool,
    Color,
    Date,
    Time,
    Text,
    Index,
    Files,
    PlayerError,
}

// ---------------------------------------------------------------------------
// EventTag
// ---------------------------------------------------------------------------

macro_rules! event_tags {
    ( $( $(#[$meta:meta])* $variant:ident = $name:literal, $category:ident, $shape:ident; )+ ) => {
        /// Every event a view can receive.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum EventTag {
            $( $(#[$meta])* $variant ),+
        }

        impl EventTag {
            /// All tags, in declaration order.
            pub const ALL: &'static [EventTag] = &[$(EventTag::$variant),+];

            /// Wire name (`"pointer-down"`, `"key-down-event"`, ...).
            pub fn name(self) -> &'static str {
                match self {
                    $( EventTag::$variant => $name ),+
                }
            }

            pub fn category(self) -> Category {
                match self {
                    $( EventTag::$variant => Category::$category ),+
                }
            }

            /// Shape of the payload delivered with this tag.
            pub fn payload_shape(self) -> PayloadShape {
                match self {
                    $( EventTag::$variant => PayloadShape::$shape ),+
                }
            }
        }
    };
}

event_tags! {
    PointerDown = "pointer-down", Pointer, Pointer;
    PointerUp = "pointer-up", Pointer, Pointer;
    PointerMove = "pointer-move", Pointer, Pointer;
    PointerOver = "pointer-over", Pointer, Pointer;
    PointerOut = "pointer-out", Pointer, Pointer;
    PointerCancel = "pointer-cancel", Pointer, Pointer;

    MouseDown = "mouse-down", Mouse, Mouse;
    MouseUp = "mouse-up", Mouse, Mouse;
    MouseMove = "mouse-move", Mouse, Mouse;
    MouseOver = "mouse-over", Mouse, Mouse;
    MouseOut = "mouse-out", Mouse, Mouse;
    Click = "click-event", Mouse, Mouse;
    DoubleClick = "double-click-event", Mouse, Mouse;
    ContextMenu = "context-menu-event", Mouse, Mouse;

    TouchStart = "touch-start", Touch, Touch;
    TouchEnd = "touch-end", Touch, Touch;
    TouchMove = "touch-move", Touch, Touch;
    TouchCancel = "touch-cancel", Touch, Touch;

    KeyDown = "key-down-event", Keyboard, Key;
    KeyUp = "key-up-event", Keyboard, Key;

    Focus = "focus-event", Focus, None;
    LostFocus = "lost-focus-event", Focus, None;
    Select = "select-event", Focus, None;

    Resize = "resize-event", Layout, Frame;
    Scroll = "scroll-event", Layout, Frame;
    /// Canvas redraw request.
    Draw = "draw-event", Layout, None;
    TabClose = "tab-close-event", Layout, Index;

    AnimationStart = "animation-start-event", Animation, Animation;
    AnimationIteration = "animation-iteration-event", Animation, Animation;
    AnimationEnd = "animation-end-event", Animation, Animation;
    AnimationCancel = "animation-cancel-event", Animation, Animation;

    TransitionRun = "transition-run-event", Transition, Property;
    TransitionStart = "transition-start-event", Transition, Property;
    TransitionEnd = "transition-end-event", Transition, Property;
    TransitionCancel = "transition-cancel-event", Transition, Property;

    Abort = "abort-event", Media, None;
    CanPlay = "can-play-event", Media, None;
    CanPlayThrough = "can-play-through-event", Media, None;
    Complete = "complete-event", Media, None;
    Emptied = "emptied-event", Media, None;
    Ended = "ended-event", Media, None;
    LoadStart = "load-start-event", Media, None;
    LoadedData = "loaded-data-event", Media, None;
    LoadedMetadata = "loaded-metadata-event", Media, None;
    Pause = "pause-event", Media, None;
    Play = "play-event", Media, None;
    Playing = "playing-event", Media, None;
    Progress = "progress-event", Media, None;
    Seeked = "seeked-event", Media, None;
    Seeking = "seeking-event", Media, None;
    Stalled = "stalled-event", Media, None;
    Suspend = "suspend-event", Media, None;
    Waiting = "waiting-event", Media, None;
    TimeUpdate = "time-update-event", Media, Seconds;
    DurationChanged = "duration-changed-event", Media, Seconds;
    RateChanged = "rate-changed-event", Media, Number;
    VolumeChanged = "volume-changed-event", Media, Number;
    PlayerError = "player-error-event", Media, PlayerError;

    CheckboxChanged = "checkbox-event", ValueChange, Bool;
    NumberChanged = "number-changed", ValueChange, Number;
    ColorChanged = "color-changed", ValueChange, Color;
    DateChanged = "date-changed", ValueChange, Date;
    TimeChanged = "time-changed", ValueChange, Time;
    EditTextChanged = "edit-text-changed", ValueChange, Text;
    DropDownChanged = "drop-down-event", ValueChange, Index;
    ListItemSelected = "list-item-selected", ValueChange, Index;
    ListItemClicked = "list-item-clicked", ValueChange, Index;
    FileSelected = "file-selected-event", ValueChange, Files;
}

impl EventTag {
    /// Case-insensitive lookup by wire name.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|tag| tag.name().eq_ignore_ascii_case(name))
    }

    /// The property a client-side value change writes back to, if any.
    pub fn model_property(self) -> Option<&'static str> {
        match self {
            EventTag::CheckboxChanged => Some("checked"),
            EventTag::NumberChanged => Some("number-picker-value"),
            EventTag::ColorChanged => Some("color-picker-value"),
            EventTag::DateChanged => Some("date-picker-value"),
            EventTag::TimeChanged => Some("time-picker-value"),
            EventTag::EditTextChanged => Some("text"),
            EventTag::DropDownChanged | EventTag::ListItemSelected => Some("current"),
            _ => None,
        }
    }
}

impl fmt::Display for EventTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for EventTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for EventTag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        EventTag::from_name(&name)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown event tag \"{name}\"")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // ── Names ────────────────────────────────────────────────────────

    #[test]
    fn names_are_unique() {
        let mut names: Vec<_> = EventTag::ALL.iter().map(|t| t.name()).collect();
        names.sort_unstable();
        let before = names.len();
        names.dedup();
        assert_eq!(before, names.len());
    }

    #[test]
    fn from_name_is_case_insensitive() {
        assert_eq!(EventTag::from_name("Pointer-Down"), Some(EventTag::PointerDown));
        assert_eq!(EventTag::from_name(" drop-down-event "), Some(EventTag::DropDownChanged));
        assert_eq!(EventTag::from_name("nope"), None);
    }

    #[test]
    fn every_tag_round_trips_through_its_name() {
        for &tag in EventTag::ALL {
            assert_eq!(EventTag::from_name(tag.name()), Some(tag));
        }
    }

    // ── Shapes and categories ────────────────────────────────────────

    #[test]
    fn payload_shapes() {
        assert_eq!(EventTag::KeyDown.payload_shape(), PayloadShape::Key);
        assert_eq!(EventTag::TouchMove.payload_shape(), PayloadShape::Touch);
        assert_eq!(EventTag::Resize.payload_shape(), PayloadShape::Frame);
        assert_eq!(EventTag::TimeUpdate.payload_shape(), PayloadShape::Seconds);
        assert_eq!(EventTag::PlayerError.payload_shape(), PayloadShape::PlayerError);
        assert_eq!(EventTag::FileSelected.payload_shape(), PayloadShape::Files);
        assert_eq!(EventTag::Play.payload_shape(), PayloadShape::None);
    }

    #[test]
    fn categories() {
        assert_eq!(EventTag::Click.category(), Category::Mouse);
        assert_eq!(EventTag::AnimationEnd.category(), Category::Animation);
        assert_eq!(EventTag::Seeked.category(), Category::Media);
        assert_eq!(EventTag::ColorChanged.category(), Category::ValueChange);
    }

    #[test]
    fn model_properties_only_for_value_changes() {
        for &tag in EventTag::ALL {
            if tag.model_property().is_some() {
                assert_eq!(tag.category(), Category::ValueChange, "{tag}");
            }
        }
        assert_eq!(EventTag::DropDownChanged.model_property(), Some("current"));
        assert_eq!(EventTag::FileSelected.model_property(), None);
    }

    // ── Serde ────────────────────────────────────────────────────────

    #[test]
    fn serde_uses_wire_name() {
        let json = serde_json::to_string(&EventTag::MouseDown).unwrap();
        assert_eq!(json, "\"mouse-down\"");
        let back: EventTag = serde_json::from_str("\"CHECKBOX-EVENT\"").unwrap();
        assert_eq!(back, EventTag::CheckboxChanged);
        assert!(serde_json::from_str::<EventTag>("\"bogus\"").is_err());
    }
}
