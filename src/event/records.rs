//! Event records delivered with inbound events.
//!
//! Records are what the renderer reports; field names follow the JSON the
//! client sends. Every field has a default so a renderer may omit what it
//! does not track.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::tags::{EventTag, PayloadShape};
use crate::geometry::{Frame, Point};
use crate::value::{Color, Date, TimeOfDay, Value};

// ---------------------------------------------------------------------------
// Modifiers
// ---------------------------------------------------------------------------

/// Modifier keys held during an input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub alt: bool,
    pub ctrl: bool,
    pub shift: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        alt: false,
        ctrl: false,
        shift: false,
        meta: false,
    };

    /// Check whether no modifier is held.
    pub fn is_empty(self) -> bool {
        self == Self::NONE
    }
}

// ---------------------------------------------------------------------------
// Keyboard
// ---------------------------------------------------------------------------

/// A key press or release.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyEvent {
    /// Milliseconds since the client's time origin.
    pub timestamp: u64,
    /// Logical key name (`"a"`, `"Enter"`).
    pub key: String,
    /// Physical key code (`"KeyA"`).
    pub code: String,
    pub repeat: bool,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            code: code.into(),
            ..Self::default()
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

// ---------------------------------------------------------------------------
// Mouse / Pointer
// ---------------------------------------------------------------------------

/// A mouse event in local, client and screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MouseEvent {
    pub timestamp: u64,
    /// Button that changed state (0 primary, 1 auxiliary, 2 secondary).
    pub button: i32,
    /// Bit mask of held buttons.
    pub buttons: u32,
    pub local: Point,
    pub client: Point,
    pub screen: Point,
    pub modifiers: Modifiers,
}

impl MouseEvent {
    /// A primary-button event at `local`, with client and screen set to the
    /// same point.
    pub fn at(local: Point) -> Self {
        Self {
            local,
            client: local,
            screen: local,
            buttons: 1,
            ..Self::default()
        }
    }
}

/// A pointer event: the mouse fields plus contact geometry.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PointerEvent {
    #[serde(flatten)]
    pub mouse: MouseEvent,
    pub pointer_id: i64,
    pub width: f64,
    pub height: f64,
    pub pressure: f64,
    pub tangential_pressure: f64,
    pub tilt_x: f64,
    pub tilt_y: f64,
    pub twist: f64,
    /// `"mouse"`, `"pen"` or `"touch"`.
    pub pointer_type: String,
    pub is_primary: bool,
}

// ---------------------------------------------------------------------------
// Touch
// ---------------------------------------------------------------------------

/// One contact point of a touch event.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Touch {
    pub identifier: i64,
    pub local: Point,
    pub client: Point,
    pub screen: Point,
    /// Radii of the contact ellipse.
    pub radius: Point,
    pub rotation_angle: f64,
    pub force: f64,
}

/// A touch event with every active contact.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TouchEvent {
    pub timestamp: u64,
    pub touches: Vec<Touch>,
    pub modifiers: Modifiers,
}

// ---------------------------------------------------------------------------
// Files / player errors
// ---------------------------------------------------------------------------

/// A file chosen in a file picker.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileInfo {
    pub name: String,
    /// Milliseconds since the Unix epoch.
    pub last_modified: u64,
    pub size: u64,
    pub mime_type: String,
}

/// A media player failure.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerError {
    pub code: i32,
    pub message: String,
}

// ---------------------------------------------------------------------------
// EventPayload
// ---------------------------------------------------------------------------

/// The payload of an inbound event.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "kebab-case")]
pub enum EventPayload {
    #[default]
    None,
    Key(KeyEvent),
    Mouse(MouseEvent),
    Pointer(PointerEvent),
    Touch(TouchEvent),
    Frame(Frame),
    /// Property tag of a transition.
    Property(String),
    /// Animation id.
    Animation(String),
    Seconds(f64),
    Number(f64),
    Bool(bool),
    Color(Color),
    Date(Date),
    Time(TimeOfDay),
    Text(String),
    Index(i64),
    Files(Vec<FileInfo>),
    PlayerError(PlayerError),
}

impl EventPayload {
    pub fn shape(&self) -> PayloadShape {
        match self {
            EventPayload::None => PayloadShape::None,
            EventPayload::Key(_) => PayloadShape::Key,
            EventPayload::Mouse(_) => PayloadShape::Mouse,
            EventPayload::Pointer(_) => PayloadShape::Pointer,
            EventPayload::Touch(_) => PayloadShape::Touch,
            EventPayload::Frame(_) => PayloadShape::Frame,
            EventPayload::Property(_) => PayloadShape::Property,
            EventPayload::Animation(_) => PayloadShape::Animation,
            EventPayload::Seconds(_) => PayloadShape::Seconds,
            EventPayload::Number(_) => PayloadShape::Number,
            EventPayload::Bool(_) => PayloadShape::Bool,
            EventPayload::Color(_) => PayloadShape::Color,
            EventPayload::Date(_) => PayloadShape::Date,
            EventPayload::Time(_) => PayloadShape::Time,
            EventPayload::Text(_) => PayloadShape::Text,
            EventPayload::Index(_) => PayloadShape::Index,
            EventPayload::Files(_) => PayloadShape::Files,
            EventPayload::PlayerError(_) => PayloadShape::PlayerError,
        }
    }

    /// Whether this payload is what `tag` carries.
    pub fn fits(&self, tag: EventTag) -> bool {
        self.shape() == tag.payload_shape()
    }

    /// The scalar carried by a value-change payload, as a property value.
    pub fn to_value(&self) -> Option<Value> {
        match self {
            EventPayload::Bool(b) => Some(Value::Bool(*b)),
            EventPayload::Number(n) | EventPayload::Seconds(n) => Some(Value::Float(*n)),
            EventPayload::Color(c) => Some(Value::Color(*c)),
            EventPayload::Date(d) => Some(Value::Date(*d)),
            EventPayload::Time(t) => Some(Value::Time(*t)),
            EventPayload::Text(s) | EventPayload::Property(s) | EventPayload::Animation(s) => {
                Some(Value::Str(s.clone()))
            }
            EventPayload::Index(i) => Some(Value::Int(*i)),
            _ => None,
        }
    }

    /// Animation id of an animation event.
    pub fn animation_id(&self) -> Option<&str> {
        match self {
            EventPayload::Animation(id) => Some(id),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// InboundEvent
// ---------------------------------------------------------------------------

/// How an inbound event names its view.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventTarget {
    /// Renderer handle from a `create-view` record.
    Handle(u64),
    /// User identifier or `a/b` path, resolved from the session root.
    Id(String),
}

impl fmt::Display for EventTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventTarget::Handle(h) => write!(f, "#{h}"),
            EventTarget::Id(id) => f.write_str(id),
        }
    }
}

impl From<u64> for EventTarget {
    fn from(handle: u64) -> Self {
        EventTarget::Handle(handle)
    }
}

impl From<&str> for EventTarget {
    fn from(id: &str) -> Self {
        EventTarget::Id(id.to_owned())
    }
}

impl From<String> for EventTarget {
    fn from(id: String) -> Self {
        EventTarget::Id(id)
    }
}

/// An event reported by the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InboundEvent {
    pub event: EventTag,
    pub target: EventTarget,
    #[serde(default)]
    pub payload: EventPayload,
}

impl InboundEvent {
    pub fn new(event: EventTag, target: impl Into<EventTarget>, payload: EventPayload) -> Self {
        Self {
            event,
            target: target.into(),
            payload,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // ── Payload shapes ───────────────────────────────────────────────

    #[test]
    fn payload_fits_its_tag() {
        assert!(EventPayload::Bool(true).fits(EventTag::CheckboxChanged));
        assert!(EventPayload::None.fits(EventTag::Play));
        assert!(!EventPayload::Text("x".into()).fits(EventTag::CheckboxChanged));
        assert!(EventPayload::Key(KeyEvent::new("a", "KeyA")).fits(EventTag::KeyUp));
    }

    #[test]
    fn to_value_for_value_changes() {
        assert_eq!(EventPayload::Index(2).to_value(), Some(Value::Int(2)));
        assert_eq!(EventPayload::Number(0.5).to_value(), Some(Value::Float(0.5)));
        assert_eq!(EventPayload::None.to_value(), None);
    }

    #[test]
    fn modifiers_default_empty() {
        assert!(Modifiers::default().is_empty());
        let m = Modifiers {
            ctrl: true,
            ..Modifiers::NONE
        };
        assert!(!m.is_empty());
    }

    // ── Wire form ────────────────────────────────────────────────────

    #[test]
    fn inbound_event_from_json() {
        let json = r#"{
            "event": "key-down-event",
            "target": "field",
            "payload": {"type": "key", "data": {"key": "a", "code": "KeyA", "modifiers": {"shift": true}}}
        }"#;
        let event: InboundEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.event, EventTag::KeyDown);
        assert_eq!(event.target, EventTarget::Id("field".into()));
        let EventPayload::Key(key) = &event.payload else {
            panic!("expected key payload, got {:?}", event.payload);
        };
        assert_eq!(key.key, "a");
        assert!(key.modifiers.shift);
        assert!(!key.repeat);
    }

    #[test]
    fn inbound_event_numeric_target_and_missing_payload() {
        let event: InboundEvent =
            serde_json::from_str(r#"{"event": "focus-event", "target": 12}"#).unwrap();
        assert_eq!(event.target, EventTarget::Handle(12));
        assert_eq!(event.payload, EventPayload::None);
    }

    #[test]
    fn pointer_event_flattens_mouse_fields() {
        let json = r#"{"type": "pointer", "data": {"buttons": 1, "local": {"x": 3, "y": 4}, "pointer_type": "pen"}}"#;
        let payload: EventPayload = serde_json::from_str(json).unwrap();
        let EventPayload::Pointer(p) = payload else {
            panic!("expected pointer payload");
        };
        assert_eq!(p.mouse.local, Point::new(3.0, 4.0));
        assert_eq!(p.mouse.buttons, 1);
        assert_eq!(p.pointer_type, "pen");
    }

    #[test]
    fn touch_payload_serializes() {
        let payload = EventPayload::Touch(TouchEvent {
            timestamp: 5,
            touches: vec![Touch {
                identifier: 1,
                force: 0.5,
                ..Touch::default()
            }],
            modifiers: Modifiers::NONE,
        });
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["type"], "touch");
        assert_eq!(json["data"]["touches"][0]["identifier"], 1);
    }

    #[test]
    fn target_display() {
        assert_eq!(EventTarget::Handle(3).to_string(), "#3");
        assert_eq!(EventTarget::from("a/b").to_string(), "a/b");
    }
}
