//! Integration tests for rui-core.
//!
//! These tests exercise the public API from outside the crate: parsing,
//! realization, the property engine, events and animations working
//! together through a headless session.

use std::sync::{Arc, Mutex};

use pretty_assertions::assert_eq;
use rui_core::dsl;
use rui_core::event::{EventPayload, EventTag, Handler, InboundEvent};
use rui_core::property::{coerce, registry, Ctx, PropertyKind};
use rui_core::session::Mutation;
use rui_core::testing::Pilot;
use rui_core::value::{AnimationDirection, BorderStyle, Color, Range, Size, Value};
use rui_core::view::{query, view_by_id, BUILTIN_KINDS};
use rui_core::{Error, PropertyError, Session};

fn realize(source: &str) -> (Session, rui_core::ViewId) {
    let mut session = Session::new(1);
    let realized = session.realize_source(source).unwrap();
    assert!(realized.diagnostics.is_empty(), "{:?}", realized.diagnostics);
    (session, realized.root)
}

// ---------------------------------------------------------------------------
// End-to-end scenarios
// ---------------------------------------------------------------------------

#[test]
fn test_parse_simple_absolute_layout() {
    let (s, root) = realize(
        "AbsoluteLayout { width = 100%, height = 100%, content = [
            View { id = v1, width = 32px, height = 32px, left = 100px, top = 200px,
                   background-color = #FF0000FF }
        ] }",
    );
    assert_eq!(s.view(root).unwrap().kind, "AbsoluteLayout");
    assert_eq!(s.get(root, "width").unwrap(), Value::Size(Size::percent(100.0)));

    let children = s.tree().children(root);
    assert_eq!(children.len(), 1);
    let v1 = children[0];
    assert_eq!(view_by_id(&s, root, "v1"), Some(v1));
    assert_eq!(s.view(v1).unwrap().kind, "View");
    assert_eq!(s.get(v1, "width").unwrap(), Value::Size(Size::px(32.0)));
    assert_eq!(s.get(v1, "left").unwrap(), Value::Size(Size::px(100.0)));
    assert_eq!(s.get(v1, "top").unwrap(), Value::Size(Size::px(200.0)));
    assert_eq!(s.get(v1, "background-color").unwrap(), Value::Color(Color(0xFF00_00FF)));
}

#[test]
fn test_range_expansion() {
    let (s, v) = realize("TextView { row = 0, column = 0:1 }");
    assert_eq!(s.get(v, "row").unwrap(), Value::Range(Range::new(0, 0)));
    assert_eq!(s.get(v, "column").unwrap(), Value::Range(Range::new(0, 1)));
}

#[test]
fn test_anonymous_border_record() {
    let (s, v) = realize("View { border = _{ style = solid, width = 1px, color = gray } }");
    let border = s.get(v, "border").unwrap();
    let border = border.as_border().unwrap();
    assert!(border.is_uniform());
    assert_eq!(border.left.style, BorderStyle::Solid);
    assert_eq!(border.left.width, Size::px(1.0));
    assert_eq!(Some(border.left.color), Color::named("gray"));
}

#[test]
fn test_property_change_event() {
    let mut pilot = Pilot::from_source("ListLayout { content = DropDownList { id = dd, items = [a, b, c] } }").unwrap();
    let dd = pilot.view("dd").unwrap();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = seen.clone();
    pilot
        .session_mut()
        .subscribe(dd, "current", move |_, change| {
            log.lock().unwrap().push((change.tag.clone(), change.new.clone()));
        })
        .unwrap();

    pilot.set("dd", "current", 2).unwrap();
    assert_eq!(query::get_drop_down_current(pilot.session(), dd, ""), Some(2));
    assert_eq!(*seen.lock().unwrap(), vec![("current".to_string(), Value::Int(2))]);
}

#[test]
fn test_animation_keyframes() {
    let mut pilot = Pilot::from_source(
        "AbsoluteLayout { content = View { id = box, animation = _{
            id = pulse, duration = 4s, direction = alternate, iteration-count = 3,
            property = _{ tag = width, from = 16px, to = 16px,
                          key-frames = _{ 25 = 200px, 50 = 200px, 75 = 16px } }
        } } }",
    )
    .unwrap();
    let box_view = pilot.view("box").unwrap();

    let runs = pilot.session().animation_runs(box_view);
    assert_eq!(runs.len(), 1);
    let animation = &runs[0].animation;
    assert_eq!(animation.duration, 4.0);
    assert_eq!(animation.direction, AnimationDirection::Alternate);
    assert_eq!(animation.properties[0].key_frames.len(), 3);
    assert_eq!(animation.properties[0].key_frames[&25], Value::Size(Size::px(200.0)));

    let begins: Vec<_> = pilot
        .drain()
        .into_iter()
        .filter(|m| matches!(m, Mutation::BeginAnimation { .. }))
        .collect();
    assert_eq!(begins.len(), 1);

    let events = Arc::new(Mutex::new(Vec::new()));
    for tag in [EventTag::AnimationIteration, EventTag::AnimationEnd] {
        let log = events.clone();
        pilot
            .session_mut()
            .on(box_view, tag, Handler::bare(move |_| log.lock().unwrap().push(tag)));
    }
    pilot.finish_animation("box", "pulse").unwrap();
    assert_eq!(
        *events.lock().unwrap(),
        vec![
            EventTag::AnimationIteration,
            EventTag::AnimationIteration,
            EventTag::AnimationIteration,
            EventTag::AnimationEnd,
        ]
    );
    // A fourth iteration would be stale.
    assert_eq!(
        pilot
            .emit("box", EventTag::AnimationIteration, EventPayload::Animation("pulse".into()))
            .unwrap(),
        0
    );
}

#[test]
fn test_realization_error_recovery() {
    let node = dsl::parse("View { width = notAColor }").unwrap();
    let mut s = Session::new(1);
    let realized = s.realize(&node).unwrap();
    assert_eq!(realized.diagnostics.len(), 1);
    assert!(matches!(
        &realized.diagnostics[0],
        PropertyError::TypeMismatch { tag, .. } if tag == "width"
    ));
    assert!(s.get(realized.root, "width").unwrap().as_size().unwrap().is_auto());
}

// ---------------------------------------------------------------------------
// Laws
// ---------------------------------------------------------------------------

#[test]
fn test_parse_round_trip() {
    let source = "GridLayout { id = grid, padding = 4px, content = [
        TextView { text = \"line\\none\", row = 0, column = 0:1, text-color = #FF336699 },
        View { border = _{ style = dashed, width = 2px, color = red }, radius = 8px },
        Checkbox { checked = true, transform = _{ rotate = 45deg, scale-x = 2 } },
    ] }";
    let (mut s, root) = realize(source);
    let written = dsl::write_node(&s.describe(root).unwrap());
    let reparsed = dsl::parse(&written).unwrap();
    let again = s.realize(&reparsed).unwrap();
    assert!(again.is_clean(), "{:?}", again.diagnostics);
    assert_eq!(s.snapshot(again.root).unwrap(), s.snapshot(root).unwrap());
}

/// Source text of a representative value for every declared kind.
fn sample_source(kind: PropertyKind) -> String {
    let text = match kind {
        PropertyKind::Bool => "true",
        PropertyKind::Int => "7",
        PropertyKind::Float => "0.25",
        PropertyKind::Str => "\"hello\"",
        PropertyKind::Size => "2em",
        PropertyKind::Angle => "45deg",
        PropertyKind::Duration => "1500ms",
        PropertyKind::Color => "#FF123456",
        PropertyKind::Range => "1:3",
        PropertyKind::Enum(names) => return format!("\"{}\"", names[names.len() - 1]),
        PropertyKind::Bounds => "_{ top = 1px, right = 2px, bottom = 3px, left = 4px }",
        PropertyKind::Border => "_{ style = dashed, width = 2px, color = red }",
        PropertyKind::Radius => "_{ x = 4px, y = 8px }",
        PropertyKind::Shadows => "_{ x-offset = 1px, y-offset = 2px, blur = 3px, color = gray, inset = true }",
        PropertyKind::TextShadows => "_{ x-offset = 1px, blur = 2px, color = blue }",
        PropertyKind::Backgrounds => {
            "[ image { src = \"tile.png\" }, linear-gradient { direction = 45deg, repeating = true } ]"
        }
        PropertyKind::Clip => "inset { top = 1px, left = 10% }",
        PropertyKind::Filter => "_{ blur = 2px, grayscale = 50, hue-rotate = 90deg }",
        PropertyKind::Transform => "_{ rotate = 45deg, scale-x = 2, translate-x = 10px }",
        PropertyKind::Animations => "_{ id = spin, duration = 2s, tag = opacity, from = 0, to = 1 }",
        PropertyKind::Transitions => "_{ property = opacity, duration = 1s }",
        PropertyKind::Date => "\"2024-03-05\"",
        PropertyKind::Time => "\"12:30:15\"",
        PropertyKind::StrList => "[small, large]",
        PropertyKind::SizeList => "[1px, 2fr, 50%]",
    };
    text.to_owned()
}

#[test]
fn test_type_soundness() {
    let mut s = Session::new(1);
    for kind in BUILTIN_KINDS.iter().map(|k| k.name) {
        let v = s.create_view(kind).unwrap();
        for def in registry::tags(kind) {
            let source = dsl::parse_value(&sample_source(def.kind)).unwrap();
            let value = coerce(def.kind, &source, Ctx::new(def.tag, kind))
                .unwrap_or_else(|err| panic!("{kind}.{}: {err}", def.tag));
            s.set(v, def.tag, value.clone()).unwrap();
            assert_eq!(s.get(v, def.tag).unwrap(), value, "{kind}.{}", def.tag);
            // The source form lands on the same canonical value.
            s.remove_property(v, def.tag).unwrap();
            s.set(v, def.tag, source).unwrap();
            assert_eq!(s.get(v, def.tag).unwrap(), value, "{kind}.{} from source", def.tag);
        }
    }
}

#[test]
fn test_range_tags_expand_integers() {
    let (mut s, v) = realize("TextView { }");
    s.set(v, "row", 4).unwrap();
    assert_eq!(s.get(v, "row").unwrap(), Value::Range(Range::new(4, 4)));
}

#[test]
fn test_default_restoration() {
    let mut s = Session::new(1);
    for kind in BUILTIN_KINDS.iter().map(|k| k.name) {
        let v = s.create_view(kind).unwrap();
        for def in registry::tags(kind) {
            s.remove_property(v, def.tag).unwrap();
            assert_eq!(s.get(v, def.tag).unwrap(), def.default_value(), "{kind}.{}", def.tag);
        }
    }
}

#[test]
fn test_change_idempotence() {
    let (mut s, v) = realize("NumberPicker { }");
    let count = Arc::new(Mutex::new(0));
    let c = count.clone();
    s.subscribe(v, "number-picker-value", move |_, _| *c.lock().unwrap() += 1)
        .unwrap();
    s.set(v, "number-picker-value", 3.5).unwrap();
    s.set(v, "number-picker-value", 3.5).unwrap();
    assert_eq!(*count.lock().unwrap(), 1);
}

#[test]
fn test_identifier_lookup_is_pre_order() {
    let (s, root) = realize(
        "ListLayout { content = [
            ListLayout { content = TextView { id = dup, text = deep } },
            TextView { id = dup, text = shallow },
        ] }",
    );
    let found = view_by_id(&s, root, "dup").unwrap();
    assert_eq!(query::get_text(&s, found, ""), Some("deep".into()));
}

#[test]
fn test_animation_cancellation_precedes_start() {
    let mut pilot = Pilot::from_source("AbsoluteLayout { content = View { id = v } }").unwrap();
    let v = pilot.view("v").unwrap();
    let log = Arc::new(Mutex::new(Vec::new()));
    for tag in [EventTag::AnimationCancel, EventTag::AnimationStart] {
        let log = log.clone();
        pilot.session_mut().on(
            v,
            tag,
            Handler::payload(move |_, payload| {
                let id = payload.animation_id().unwrap_or_default().to_owned();
                log.lock().unwrap().push(format!("{tag}:{id}"));
            }),
        );
    }

    let animation = |id: &str| {
        dsl::parse_value(&format!("_{{ id = {id}, duration = 1s, tag = opacity, from = 0, to = 1 }}")).unwrap()
    };
    pilot.set("v", "animation", animation("a")).unwrap();
    pilot.start_animation("v", "a").unwrap();
    pilot.set("v", "animation", animation("b")).unwrap();
    pilot.start_animation("v", "b").unwrap();

    assert_eq!(
        *log.lock().unwrap(),
        vec![
            "animation-start-event:a",
            "animation-cancel-event:a",
            "animation-start-event:b",
        ]
    );
    let ops = pilot.drain_ops();
    assert_eq!(ops.iter().filter(|op| **op == "cancel-animation").count(), 1);
}

#[test]
fn test_removing_animation_cancels_without_end() {
    let mut pilot = Pilot::from_source(
        "AbsoluteLayout { content = View { id = v, animation = _{ id = a, tag = opacity, from = 0, to = 1 } } }",
    )
    .unwrap();
    let v = pilot.view("v").unwrap();
    let ended = Arc::new(Mutex::new(0));
    let e = ended.clone();
    pilot
        .session_mut()
        .on(v, EventTag::AnimationEnd, Handler::bare(move |_| *e.lock().unwrap() += 1));
    pilot.drain();

    assert!(pilot.session_mut().remove_property(v, "animation").unwrap());
    assert!(pilot.drain_ops().contains(&"cancel-animation"));
    assert!(pilot.session().animation_runs(v).is_empty());
    assert_eq!(*ended.lock().unwrap(), 0);
}

#[test]
fn test_event_ordering() {
    let mut pilot = Pilot::from_source("ListLayout { content = Button { id = ok } }").unwrap();
    let ok = pilot.view("ok").unwrap();
    let log = Arc::new(Mutex::new(Vec::new()));
    for n in 0..3 {
        let log = log.clone();
        pilot
            .session_mut()
            .on(ok, EventTag::Click, Handler::bare(move |_| log.lock().unwrap().push(n)));
    }
    pilot.click("ok").unwrap();
    assert_eq!(*log.lock().unwrap(), vec![0, 1, 2]);
}

// ---------------------------------------------------------------------------
// Wire boundary
// ---------------------------------------------------------------------------

#[test]
fn test_json_event_round_trip_through_session() {
    let mut pilot = Pilot::from_source("ListLayout { content = Checkbox { id = agree } }").unwrap();
    pilot.drain();
    let event: InboundEvent = serde_json::from_str(
        r#"{"event": "checkbox-event", "target": "agree", "payload": {"type": "bool", "data": true}}"#,
    )
    .unwrap();
    pilot.session_mut().handle_event(event).unwrap();
    assert_eq!(pilot.get("agree", "checked").unwrap(), Value::Bool(true));

    pilot.set("agree", "disabled", true).unwrap();
    let json: Vec<String> = pilot.drain().iter().map(|m| m.to_json().unwrap()).collect();
    assert_eq!(json.len(), 1);
    assert!(json[0].contains(r#""op":"set-property""#));
    assert!(json[0].contains(r#""tag":"disabled""#));
}

#[test]
fn test_unknown_kind_is_fatal() {
    let mut s = Session::new(1);
    let err = s.realize_source("ListLayout { content = Gizmo { } }").unwrap_err();
    assert!(matches!(err, Error::UnknownKind(ref kind) if kind == "Gizmo"));
}
