//! Canonical writer: turns nodes and typed values back into
//! view-description text the parser accepts.
//!
//! Composite values are written as records (`_{ ... }`) or tagged nodes
//! (`linear-gradient { ... }`, `circle { ... }`) whose fields coerce back to
//! the same value.

use std::fmt::Write as _;

use crate::dsl::model::Node;
use crate::value::{
    AnimatedProperty, Animation, BackgroundElement, Border, BorderEdge, Bounds, ClipShape,
    GradientStop, LinearDirection, RadialExtent, Radius, Shadow, TextShadow, TimingFunction,
    Transform, TransformField, Transition, Value, ViewFilter,
};

const INDENT: &str = "    ";

/// Write a node. View nodes (capitalized kinds) are laid out one attribute
/// per line; records stay inline.
pub fn write_node(node: &Node) -> String {
    let mut out = String::new();
    write_node_into(&mut out, node, 0);
    out
}

/// Write a single value.
pub fn write_value(value: &Value) -> String {
    let mut out = String::new();
    write_value_into(&mut out, value, 0);
    out
}

fn is_view_kind(kind: &str) -> bool {
    kind.starts_with(|c: char| c.is_ascii_uppercase())
}

fn write_node_into(out: &mut String, node: &Node, depth: usize) {
    out.push_str(&node.kind);
    if node.attrs.is_empty() {
        out.push_str(" {}");
        return;
    }
    if is_view_kind(&node.kind) {
        out.push_str(" {\n");
        for attr in &node.attrs {
            push_indent(out, depth + 1);
            let _ = write!(out, "{} = ", attr.name);
            write_value_into(out, &attr.value, depth + 1);
            out.push_str(",\n");
        }
        push_indent(out, depth);
        out.push('}');
    } else {
        out.push_str(if node.is_anonymous() { "{ " } else { " { " });
        for (i, attr) in node.attrs.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            let _ = write!(out, "{} = ", attr.name);
            write_value_into(out, &attr.value, depth);
        }
        out.push_str(" }");
    }
}

fn write_value_into(out: &mut String, value: &Value, depth: usize) {
    match value {
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Int(n) => {
            let _ = write!(out, "{n}");
        }
        Value::Float(f) => out.push_str(&number(*f)),
        Value::Str(s) => quote_into(out, s),
        Value::Ident(s) => out.push_str(s),
        Value::Size(s) => {
            let _ = write!(out, "{s}");
        }
        Value::Angle(a) => {
            let _ = write!(out, "{a}");
        }
        Value::Duration(secs) => {
            let _ = write!(out, "{secs}s");
        }
        Value::Color(c) => {
            let _ = write!(out, "{c}");
        }
        Value::Range(r) => {
            let _ = write!(out, "{}:{}", r.first, r.last);
        }
        Value::Enum(e) => out.push_str(e.name),
        Value::Date(d) => quote_into(out, &d.to_string()),
        Value::Time(t) => quote_into(out, &t.to_string()),
        Value::List(items) => write_list(out, items, depth),
        Value::Node(node) => write_node_into(out, node, depth),
        composite => write_value_into(out, &source_form(composite), depth),
    }
}

fn write_list(out: &mut String, items: &[Value], depth: usize) {
    let multiline = items
        .iter()
        .any(|v| matches!(v, Value::Node(n) if is_view_kind(&n.kind)));
    if !multiline {
        out.push('[');
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            write_value_into(out, item, depth);
        }
        out.push(']');
        return;
    }
    out.push_str("[\n");
    for item in items {
        push_indent(out, depth + 1);
        write_value_into(out, item, depth + 1);
        out.push_str(",\n");
    }
    push_indent(out, depth);
    out.push(']');
}

fn push_indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

/// Decimal text that re-lexes as a number; integral floats keep a `.0`.
fn number(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{f:.1}")
    } else if f.is_finite() {
        format!("{f}")
    } else {
        "0.0".to_string()
    }
}

fn quote_into(out: &mut String, text: &str) {
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

// ---------------------------------------------------------------------------
// Composite values → source form
// ---------------------------------------------------------------------------

/// Rewrite a typed composite as the record or tagged node it is read from.
/// Scalars and source-form values come back unchanged.
pub fn source_form(value: &Value) -> Value {
    match value {
        Value::Bounds(b) => Value::Node(bounds_record(b)),
        Value::Border(b) => border_source(b),
        Value::Radius(r) => radius_source(r),
        Value::Shadow(s) => Value::Node(shadow_record(s)),
        Value::TextShadow(s) => Value::Node(text_shadow_record(s)),
        Value::Background(b) => Value::Node(background_node(b)),
        Value::Clip(c) => clip_source(c),
        Value::Filter(f) => Value::Node(filter_record(f)),
        Value::Transform(t) => Value::Node(transform_record(t)),
        Value::AnimatedProperty(p) => Value::Node(animated_property_record(p)),
        Value::Animation(a) => Value::Node(animation_record(a)),
        Value::Transition(t) => Value::Node(transition_record(t)),
        other => other.clone(),
    }
}

fn bounds_record(b: &Bounds) -> Node {
    Node::record()
        .with("top", b.top)
        .with("right", b.right)
        .with("bottom", b.bottom)
        .with("left", b.left)
}

fn edge_record(edge: &BorderEdge) -> Node {
    Node::record()
        .with("style", Value::Ident(edge.style.name().to_string()))
        .with("width", edge.width)
        .with("color", edge.color)
}

fn border_source(border: &Border) -> Value {
    if border.is_uniform() {
        return Value::Node(edge_record(&border.left));
    }
    let mut record = Node::record();
    for name in Border::EDGES {
        if let Some(edge) = border.edge(name) {
            record.set(name, edge_record(edge));
        }
    }
    Value::Node(record)
}

fn radius_source(radius: &Radius) -> Value {
    if radius.is_uniform() && radius.top_left.x == radius.top_left.y {
        return Value::Size(radius.top_left.x);
    }
    let mut record = Node::record();
    for name in Radius::CORNERS {
        if let Some(corner) = radius.corner(name) {
            record.set(format!("{name}-x"), corner.x);
            record.set(format!("{name}-y"), corner.y);
        }
    }
    Value::Node(record)
}

fn shadow_record(s: &Shadow) -> Node {
    Node::record()
        .with("x-offset", s.x_offset)
        .with("y-offset", s.y_offset)
        .with("blur", s.blur)
        .with("spread-radius", s.spread_radius)
        .with("color", s.color)
        .with("inset", s.inset)
}

fn text_shadow_record(s: &TextShadow) -> Node {
    Node::record()
        .with("x-offset", s.x_offset)
        .with("y-offset", s.y_offset)
        .with("blur", s.blur)
        .with("color", s.color)
}

fn stops_list(stops: &[GradientStop]) -> Value {
    Value::List(
        stops
            .iter()
            .map(|s| {
                Value::Node(
                    Node::record()
                        .with("offset", Value::Float(s.offset))
                        .with("color", s.color),
                )
            })
            .collect(),
    )
}

fn background_node(element: &BackgroundElement) -> Node {
    let node = Node::new(element.tag());
    match element {
        BackgroundElement::Image(img) => node
            .with("src", img.src.as_str())
            .with("width", img.width)
            .with("height", img.height)
            .with("repeat", Value::Ident(img.repeat.name().to_string())),
        BackgroundElement::LinearGradient(g) => {
            let direction = match g.direction {
                LinearDirection::Side(side) => Value::Ident(side.name().to_string()),
                LinearDirection::Angle(angle) => Value::Angle(angle),
            };
            node.with("direction", direction)
                .with("gradient", stops_list(&g.stops))
                .with("repeating", g.repeating)
        }
        BackgroundElement::RadialGradient(g) => {
            let radius = match g.radius {
                RadialExtent::Keyword(k) => Value::Ident(k.name().to_string()),
                RadialExtent::Sizes { x, y } => Value::List(vec![Value::Size(x), Value::Size(y)]),
            };
            node.with("shape", Value::Ident(g.shape.name().to_string()))
                .with("radius", radius)
                .with("center-x", g.center_x)
                .with("center-y", g.center_y)
                .with("gradient", stops_list(&g.stops))
                .with("repeating", g.repeating)
        }
    }
}

fn clip_source(clip: &ClipShape) -> Value {
    let node = Node::new(clip.tag());
    match clip {
        ClipShape::None => Value::Ident("none".to_string()),
        ClipShape::Inset {
            top,
            right,
            bottom,
            left,
            radius,
        } => Value::Node(
            node.with("top", *top)
                .with("right", *right)
                .with("bottom", *bottom)
                .with("left", *left)
                .with("radius", radius_source(radius)),
        ),
        ClipShape::Circle { x, y, radius } => {
            Value::Node(node.with("x", *x).with("y", *y).with("radius", *radius))
        }
        ClipShape::Ellipse {
            x,
            y,
            radius_x,
            radius_y,
        } => Value::Node(
            node.with("x", *x)
                .with("y", *y)
                .with("radius-x", *radius_x)
                .with("radius-y", *radius_y),
        ),
        ClipShape::Polygon { points } => Value::Node(node.with(
            "points",
            Value::List(points.iter().map(|p| Value::Size(*p)).collect()),
        )),
    }
}

fn filter_record(f: &ViewFilter) -> Node {
    let mut record = Node::record();
    if let Some(blur) = f.blur {
        record.set("blur", blur);
    }
    for name in ViewFilter::PERCENT_FIELDS {
        if let Some(v) = f.percent(name) {
            record.set(name, Value::Float(v));
        }
    }
    if let Some(angle) = f.hue_rotate {
        record.set("hue-rotate", angle);
    }
    if let Some(shadow) = &f.drop_shadow {
        record.set("drop-shadow", text_shadow_record(shadow));
    }
    record
}

fn transform_record(t: &Transform) -> Node {
    let mut copy = *t;
    let mut record = Node::record();
    for (name, field) in Transform::FIELDS {
        let value = match field {
            TransformField::Size => copy.size_field_mut(name).and_then(|v| *v).map(Value::Size),
            TransformField::Scale | TransformField::Axis => {
                copy.number_field_mut(name).and_then(|v| *v).map(Value::Float)
            }
            TransformField::Angle => copy.angle_field_mut(name).and_then(|v| *v).map(Value::Angle),
            TransformField::Flag => t.backface_visible.map(Value::Bool),
        };
        if let Some(value) = value {
            record.set(name, value);
        }
    }
    record
}

fn timing_source(timing: &TimingFunction) -> Value {
    match timing.keyword() {
        Some(name) => Value::Ident(name.to_string()),
        None => Value::Str(timing.to_string()),
    }
}

fn animated_property_record(p: &AnimatedProperty) -> Node {
    let mut record = Node::record().with("tag", Value::Ident(p.tag.clone()));
    if let Some(from) = &p.from {
        record.set("from", from.clone());
    }
    if let Some(to) = &p.to {
        record.set("to", to.clone());
    }
    if !p.key_frames.is_empty() {
        let mut frames = Node::record();
        for (percent, value) in &p.key_frames {
            frames.set(percent.to_string(), value.clone());
        }
        record.set("key-frames", frames);
    }
    record
}

fn animation_record(a: &Animation) -> Node {
    let mut record = Node::record();
    if a.is_named() {
        record.set("id", a.id.as_str());
    }
    record
        .with("duration", Value::Duration(a.duration))
        .with("delay", Value::Duration(a.delay))
        .with("timing-function", timing_source(&a.timing_function))
        .with("iteration-count", a.iteration_count)
        .with("direction", Value::Ident(a.direction.name().to_string()))
        .with(
            "property",
            Value::List(
                a.properties
                    .iter()
                    .map(|p| Value::Node(animated_property_record(p)))
                    .collect(),
            ),
        )
}

fn transition_record(t: &Transition) -> Node {
    Node::record()
        .with("property", Value::Ident(t.property.clone()))
        .with("duration", Value::Duration(t.duration))
        .with("delay", Value::Duration(t.delay))
        .with("timing-function", timing_source(&t.timing_function))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl::parser::{parse, parse_value};
    use crate::value::{BorderStyle, Color, Range, Size};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_scalars() {
        assert_eq!(write_value(&Value::Size(Size::px(32.0))), "32px");
        assert_eq!(write_value(&Value::Size(Size::auto())), "auto");
        assert_eq!(write_value(&Value::Color(Color(0xFF0000FF))), "#FF0000FF");
        assert_eq!(write_value(&Value::Range(Range::new(0, 1))), "0:1");
        assert_eq!(write_value(&Value::Float(2.0)), "2.0");
        assert_eq!(write_value(&Value::Duration(0.5)), "0.5s");
        assert_eq!(write_value(&Value::Str("a \"b\"\n".into())), r#""a \"b\"\n""#);
    }

    #[test]
    fn test_scalars_reparse() {
        for value in [
            Value::Size(Size::percent(12.5)),
            Value::Color(Color(0x80FFFFFF)),
            Value::Range(Range::new(-2, 3)),
            Value::Float(-0.75),
            Value::Int(-4),
            Value::Str("tab\there".into()),
        ] {
            assert_eq!(parse_value(&write_value(&value)).unwrap(), value);
        }
    }

    #[test]
    fn test_uniform_border_record() {
        let border = Border::uniform(BorderEdge::new(BorderStyle::Solid, Size::px(1.0), Color(0xFF808080)));
        insta::assert_snapshot!(
            write_value(&Value::Border(border)),
            @"_{ style = solid, width = 1px, color = #FF808080 }"
        );
    }

    #[test]
    fn test_view_layout() {
        let node = parse(
            "AbsoluteLayout { width = 100%, content = [ View { id = v1, width = 32px } ] }",
        )
        .unwrap();
        insta::assert_snapshot!(write_node(&node), @r"
        AbsoluteLayout {
            width = 100%,
            content = [
                View {
                    id = v1,
                    width = 32px,
                },
            ],
        }
        ");
        assert_eq!(parse(&write_node(&node)).unwrap(), node);
    }

    #[test]
    fn test_gradient_node() {
        let value = Value::Background(BackgroundElement::LinearGradient(crate::value::LinearGradient {
            stops: GradientStop::evenly_spaced(&[Color::BLACK, Color::WHITE]),
            ..Default::default()
        }));
        insta::assert_snapshot!(
            write_value(&value),
            @"linear-gradient { direction = to-bottom, gradient = [_{ offset = 0.0, color = #FF000000 }, _{ offset = 1.0, color = #FFFFFFFF }], repeating = false }"
        );
    }
}
