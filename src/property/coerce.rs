//! Coercion of source-form values into the canonical variant of a tag's
//! declared kind.
//!
//! Every reader accepts the typed variant itself (so reassigning a value read
//! back from a view is a no-op), the textual form as a quoted string, and
//! whatever literal or record form the view-description language produces for
//! that kind.

use crate::dsl::model::Node;
use crate::error::{PropertyError, ValueParseError};
use crate::property::registry::{self, Axis, PropertyKind, Route};
use crate::value::size::split_number;
use crate::value::{
    AnimatedProperty, Animation, AnimationDirection, Angle, BackgroundElement, BackgroundImage,
    Border, BorderEdge, BorderStyle, Bounds, ClipShape, Color, Corner, Date, EnumValue,
    GradientStop, ImageRepeat, LinearDirection, LinearGradient, LinearSide, RadialExtent,
    RadialGradient, RadialKeyword, RadialShape, Radius, Range, Shadow, Size, SizeUnit, StepJump,
    TextShadow, TimeOfDay, TimingFunction, Transform, TransformField, Transition, Value,
    ViewFilter, INFINITE,
};

type Coerced<T> = Result<T, PropertyError>;

/// What is being coerced: the tag (for diagnostics) and the kind of the
/// view it is assigned on (for animated-property keyframes).
#[derive(Debug, Clone, Copy)]
pub struct Ctx<'a> {
    pub tag: &'a str,
    pub view_kind: &'a str,
}

impl<'a> Ctx<'a> {
    pub fn new(tag: &'a str, view_kind: &'a str) -> Self {
        Self { tag, view_kind }
    }

    fn fail(&self, expected: &str, found: &Value) -> PropertyError {
        PropertyError::mismatch(self.tag, format!("expected {expected}, found {}", describe(found)))
    }

    fn invalid(&self, message: impl Into<String>) -> PropertyError {
        PropertyError::mismatch(self.tag, message)
    }

    fn unknown_field(&self, what: &str, name: &str) -> PropertyError {
        self.invalid(format!("unknown {what} field `{name}`"))
    }

    fn parse_error(&self, err: ValueParseError) -> PropertyError {
        self.invalid(err.to_string())
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Ident(s) => format!("identifier `{s}`"),
        Value::Str(s) => format!("string \"{s}\""),
        Value::Node(node) if !node.is_anonymous() => format!("`{}` record", node.kind),
        other => other.kind_name().to_string(),
    }
}

fn is_none(value: &Value) -> bool {
    matches!(value, Value::Ident(s) | Value::Str(s) if s.trim().eq_ignore_ascii_case("none"))
}

/// Coerce `value` to `kind`.
pub fn coerce(kind: PropertyKind, value: &Value, ctx: Ctx<'_>) -> Coerced<Value> {
    match kind {
        PropertyKind::Bool => to_bool(value, ctx).map(Value::Bool),
        PropertyKind::Int => to_int(value, ctx).map(Value::Int),
        PropertyKind::Float => to_float(value, ctx).map(Value::Float),
        PropertyKind::Str => to_text(value, ctx).map(Value::Str),
        PropertyKind::Size => to_size(value, ctx).map(Value::Size),
        PropertyKind::Angle => to_angle(value, ctx).map(Value::Angle),
        PropertyKind::Duration => to_duration(value, ctx).map(Value::Duration),
        PropertyKind::Color => to_color(value, ctx).map(Value::Color),
        PropertyKind::Range => to_range(value, ctx).map(Value::Range),
        PropertyKind::Enum(names) => to_enum(names, value, ctx).map(Value::Enum),
        PropertyKind::Bounds => to_bounds(value, ctx).map(Value::Bounds),
        PropertyKind::Border => to_border(value, ctx).map(Value::Border),
        PropertyKind::Radius => to_radius(value, ctx).map(Value::Radius),
        PropertyKind::Clip => to_clip(value, ctx).map(Value::Clip),
        PropertyKind::Filter => to_filter(value, ctx).map(Value::Filter),
        PropertyKind::Transform => to_transform(value, ctx).map(Value::Transform),
        PropertyKind::Date => to_date(value, ctx).map(Value::Date),
        PropertyKind::Time => to_time(value, ctx).map(Value::Time),
        PropertyKind::Shadows => list_of(value, true, |v| to_shadow(v, ctx).map(Value::Shadow)),
        PropertyKind::TextShadows => {
            list_of(value, true, |v| to_text_shadow(v, ctx).map(Value::TextShadow))
        }
        PropertyKind::Backgrounds => {
            list_of(value, true, |v| to_background(v, ctx).map(Value::Background))
        }
        PropertyKind::Animations => list_of(value, true, |v| to_animation(v, ctx).map(Value::from)),
        PropertyKind::Transitions => {
            list_of(value, true, |v| to_transition(v, ctx).map(Value::Transition))
        }
        PropertyKind::StrList => list_of(value, false, |v| to_text(v, ctx).map(Value::Str)),
        PropertyKind::SizeList => list_of(value, false, |v| to_size(v, ctx).map(Value::Size)),
    }
}

/// A bracketed list element-wise, or a single element wrapped. With
/// `none_is_empty` the identifier `none` clears the list.
fn list_of(
    value: &Value,
    none_is_empty: bool,
    mut element: impl FnMut(&Value) -> Coerced<Value>,
) -> Coerced<Value> {
    match value {
        Value::List(items) => items.iter().map(element).collect::<Coerced<Vec<_>>>().map(Value::List),
        v if none_is_empty && is_none(v) => Ok(Value::List(Vec::new())),
        single => Ok(Value::List(vec![element(single)?])),
    }
}

// ---------------------------------------------------------------------------
// Scalars
// ---------------------------------------------------------------------------

pub(crate) fn to_bool(value: &Value, ctx: Ctx<'_>) -> Coerced<bool> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::Int(0) => Ok(false),
        Value::Int(1) => Ok(true),
        Value::Ident(s) | Value::Str(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Ok(true),
            "false" | "no" | "off" | "0" => Ok(false),
            _ => Err(ctx.fail("a boolean", value)),
        },
        _ => Err(ctx.fail("a boolean", value)),
    }
}

pub(crate) fn to_int(value: &Value, ctx: Ctx<'_>) -> Coerced<i64> {
    match value {
        Value::Int(n) => Ok(*n),
        Value::Float(f) if f.fract() == 0.0 && f.abs() < 9.0e15 => Ok(*f as i64),
        Value::Str(s) => s.trim().parse().map_err(|_| ctx.fail("an integer", value)),
        _ => Err(ctx.fail("an integer", value)),
    }
}

pub(crate) fn to_float(value: &Value, ctx: Ctx<'_>) -> Coerced<f64> {
    match value {
        Value::Int(n) => Ok(*n as f64),
        Value::Float(f) => Ok(*f),
        Value::Str(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .ok_or_else(|| ctx.fail("a number", value)),
        _ => Err(ctx.fail("a number", value)),
    }
}

fn to_text(value: &Value, ctx: Ctx<'_>) -> Coerced<String> {
    match value {
        Value::Str(s) | Value::Ident(s) => Ok(s.clone()),
        Value::Int(n) => Ok(n.to_string()),
        Value::Float(f) => Ok(f.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        _ => Err(ctx.fail("a string", value)),
    }
}

pub(crate) fn to_size(value: &Value, ctx: Ctx<'_>) -> Coerced<Size> {
    match value {
        Value::Size(s) => Ok(*s),
        Value::Int(n) => Ok(Size::px(*n as f64)),
        Value::Float(f) => Ok(Size::px(*f)),
        Value::Ident(s) | Value::Str(s) => s.parse().map_err(|_| ctx.fail("a size", value)),
        _ => Err(ctx.fail("a size", value)),
    }
}

pub(crate) fn to_angle(value: &Value, ctx: Ctx<'_>) -> Coerced<Angle> {
    match value {
        Value::Angle(a) => Ok(*a),
        Value::Int(n) => Ok(Angle::deg(*n as f64)),
        Value::Float(f) => Ok(Angle::deg(*f)),
        Value::Ident(s) | Value::Str(s) => s.parse().map_err(|_| ctx.fail("an angle", value)),
        _ => Err(ctx.fail("an angle", value)),
    }
}

/// Seconds. Bare numbers are seconds; strings may carry `s` or `ms`.
pub(crate) fn to_duration(value: &Value, ctx: Ctx<'_>) -> Coerced<f64> {
    let seconds = match value {
        Value::Duration(s) | Value::Float(s) => *s,
        Value::Int(n) => *n as f64,
        Value::Str(text) => match split_number(text.trim()) {
            Some((n, "")) | Some((n, "s")) => n,
            Some((n, "ms")) => n / 1000.0,
            _ => return Err(ctx.fail("a duration", value)),
        },
        _ => return Err(ctx.fail("a duration", value)),
    };
    if seconds < 0.0 || !seconds.is_finite() {
        return Err(ctx.invalid(format!("duration {seconds}s is negative")));
    }
    Ok(seconds)
}

pub(crate) fn to_color(value: &Value, ctx: Ctx<'_>) -> Coerced<Color> {
    match value {
        Value::Color(c) => Ok(*c),
        Value::Int(n) => u32::try_from(*n)
            .map(Color)
            .map_err(|_| ctx.fail("a color", value)),
        Value::Ident(s) | Value::Str(s) => s.parse().map_err(|_| ctx.fail("a color", value)),
        _ => Err(ctx.fail("a color", value)),
    }
}

pub(crate) fn to_range(value: &Value, ctx: Ctx<'_>) -> Coerced<Range> {
    match value {
        Value::Range(r) => Ok(*r),
        Value::Int(n) => Ok(Range::single(*n)),
        Value::Str(s) => s.parse().map_err(|_| ctx.fail("an integer or range", value)),
        _ => Err(ctx.fail("an integer or range", value)),
    }
}

/// A member of `names`, by ordinal or case-insensitive name.
pub(crate) fn to_enum(
    names: &'static [&'static str],
    value: &Value,
    ctx: Ctx<'_>,
) -> Coerced<EnumValue> {
    let by_name = |name: &str| names.iter().position(|n| n.eq_ignore_ascii_case(name.trim()));
    let in_range = |i: usize| i < names.len();
    let ordinal = match value {
        Value::Enum(e) => by_name(e.name),
        Value::Int(n) => usize::try_from(*n).ok().filter(|&i| in_range(i)),
        Value::Ident(s) | Value::Str(s) => {
            by_name(s).or_else(|| s.trim().parse::<usize>().ok().filter(|&i| in_range(i)))
        }
        _ => None,
    };
    ordinal.and_then(|i| EnumValue::of(names, i)).ok_or_else(|| {
        ctx.invalid(format!(
            "expected one of {}, found {}",
            names.join(" | "),
            describe(value)
        ))
    })
}

/// A `named_enum!` type by ordinal or name.
fn named<T>(
    names: &'static [&'static str],
    from_ordinal: fn(usize) -> Option<T>,
    value: &Value,
    ctx: Ctx<'_>,
) -> Coerced<T> {
    let e = to_enum(names, value, ctx)?;
    from_ordinal(e.ordinal).ok_or_else(|| ctx.fail(names.join(" | ").as_str(), value))
}

fn to_date(value: &Value, ctx: Ctx<'_>) -> Coerced<Date> {
    match value {
        Value::Date(d) => Ok(*d),
        Value::Str(s) | Value::Ident(s) => s.parse().map_err(|_| ctx.fail("a date", value)),
        _ => Err(ctx.fail("a date", value)),
    }
}

fn to_time(value: &Value, ctx: Ctx<'_>) -> Coerced<TimeOfDay> {
    match value {
        Value::Time(t) => Ok(*t),
        Value::Str(s) | Value::Ident(s) => s.parse().map_err(|_| ctx.fail("a time", value)),
        _ => Err(ctx.fail("a time", value)),
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

fn check_fields(node: &Node, allowed: &[&str], what: &str, ctx: Ctx<'_>) -> Coerced<()> {
    match node
        .attrs
        .iter()
        .find(|a| !allowed.iter().any(|f| f.eq_ignore_ascii_case(&a.name)))
    {
        Some(attr) => Err(ctx.unknown_field(what, &attr.name)),
        None => Ok(()),
    }
}

fn field_or<T>(
    node: &Node,
    name: &str,
    default: T,
    read: impl FnOnce(&Value) -> Coerced<T>,
) -> Coerced<T> {
    node.get(name).map_or(Ok(default), read)
}

fn sizes(text: &str, ctx: Ctx<'_>) -> Coerced<Vec<Size>> {
    text.split_whitespace()
        .map(|t| t.parse::<Size>().map_err(|e| ctx.parse_error(e)))
        .collect()
}

pub(crate) fn to_bounds(value: &Value, ctx: Ctx<'_>) -> Coerced<Bounds> {
    let shorthand = |sizes: Vec<Size>| {
        Bounds::from_shorthand(&sizes).ok_or_else(|| ctx.invalid("bounds take one to four sizes"))
    };
    match value {
        Value::Bounds(b) => Ok(*b),
        Value::Node(node) => {
            let mut bounds = Bounds::default();
            for attr in &node.attrs {
                let name = attr.name.to_ascii_lowercase();
                let size = to_size(&attr.value, ctx)?;
                let side = bounds
                    .side_mut(&name)
                    .ok_or_else(|| ctx.unknown_field("bounds", &attr.name))?;
                *side = size;
            }
            Ok(bounds)
        }
        Value::List(items) => {
            shorthand(items.iter().map(|v| to_size(v, ctx)).collect::<Coerced<_>>()?)
        }
        Value::Str(s) if s.split_whitespace().count() > 1 => shorthand(sizes(s, ctx)?),
        scalar => to_size(scalar, ctx).map(Bounds::all),
    }
}

// ── Border ───────────────────────────────────────────────────────────

fn apply_edge_field(edge: &mut BorderEdge, field: &str, value: &Value, ctx: Ctx<'_>) -> Coerced<()> {
    match field {
        "style" => edge.style = named(BorderStyle::NAMES, BorderStyle::from_ordinal, value, ctx)?,
        "width" => edge.width = to_size(value, ctx)?,
        "color" => edge.color = to_color(value, ctx)?,
        _ => return Err(ctx.unknown_field("border", field)),
    }
    Ok(())
}

fn reset_edge_field(edge: &mut BorderEdge, field: &str) {
    let default = BorderEdge::default();
    match field {
        "style" => edge.style = default.style,
        "width" => edge.width = default.width,
        _ => edge.color = default.color,
    }
}

fn to_edge(value: &Value, ctx: Ctx<'_>) -> Coerced<BorderEdge> {
    match value {
        Value::Node(node) => {
            let mut edge = BorderEdge::default();
            for attr in &node.attrs {
                apply_edge_field(&mut edge, &attr.name.to_ascii_lowercase(), &attr.value, ctx)?;
            }
            Ok(edge)
        }
        Value::Border(b) if b.is_uniform() => Ok(b.left),
        v if is_none(v) => Ok(BorderEdge::default()),
        _ => Err(ctx.fail("a border edge record", value)),
    }
}

fn edge_value(edge: &BorderEdge) -> Value {
    Value::Node(
        Node::record()
            .with("style", style_value(edge.style))
            .with("width", edge.width)
            .with("color", edge.color),
    )
}

fn style_value(style: BorderStyle) -> Value {
    Value::Enum(EnumValue {
        ordinal: style.ordinal(),
        name: style.name(),
    })
}

/// Uniform edge fields apply to every edge; `left = _{...}` and
/// `left-width = ...` address one edge. Later fields override earlier ones.
pub(crate) fn to_border(value: &Value, ctx: Ctx<'_>) -> Coerced<Border> {
    let node = match value {
        Value::Border(b) => return Ok(*b),
        v if is_none(v) => return Ok(Border::default()),
        Value::Node(node) => node,
        _ => return Err(ctx.fail("a border record", value)),
    };
    let mut border = Border::default();
    for attr in &node.attrs {
        let name = attr.name.to_ascii_lowercase();
        if BorderEdge::FIELDS.contains(&name.as_str()) {
            for edge in border.edges_mut() {
                apply_edge_field(edge, &name, &attr.value, ctx)?;
            }
        } else if let Some(edge) = border.edge_mut(&name) {
            *edge = to_edge(&attr.value, ctx)?;
        } else {
            let (edge_name, field) = name
                .split_once('-')
                .ok_or_else(|| ctx.unknown_field("border", &attr.name))?;
            let edge = border
                .edge_mut(edge_name)
                .ok_or_else(|| ctx.unknown_field("border", &attr.name))?;
            apply_edge_field(edge, field, &attr.value, ctx)?;
        }
    }
    Ok(border)
}

// ── Radius ───────────────────────────────────────────────────────────

fn axis_of(name: &str) -> Option<Axis> {
    match name {
        "x" => Some(Axis::X),
        "y" => Some(Axis::Y),
        _ => None,
    }
}

fn set_axis(corner: &mut Corner, axis: Axis, size: Size) {
    match axis {
        Axis::X => corner.x = size,
        Axis::Y => corner.y = size,
    }
}

fn to_corner(value: &Value, ctx: Ctx<'_>) -> Coerced<Corner> {
    match value {
        Value::Node(node) => {
            check_fields(node, &["x", "y"], "corner", ctx)?;
            let x = field_or(node, "x", Size::auto(), |v| to_size(v, ctx))?;
            let y = field_or(node, "y", x, |v| to_size(v, ctx))?;
            Ok(Corner::elliptic(x, y))
        }
        Value::List(items) if items.len() == 2 => {
            Ok(Corner::elliptic(to_size(&items[0], ctx)?, to_size(&items[1], ctx)?))
        }
        scalar => to_size(scalar, ctx).map(Corner::circular),
    }
}

fn corner_value(corner: &Corner) -> Value {
    if corner.x == corner.y {
        Value::Size(corner.x)
    } else {
        Value::List(vec![Value::Size(corner.x), Value::Size(corner.y)])
    }
}

pub(crate) fn to_radius(value: &Value, ctx: Ctx<'_>) -> Coerced<Radius> {
    let node = match value {
        Value::Radius(r) => return Ok(*r),
        Value::List(items) if items.len() == 2 => {
            return Ok(Radius::elliptic(to_size(&items[0], ctx)?, to_size(&items[1], ctx)?))
        }
        Value::Node(node) => node,
        scalar => return to_size(scalar, ctx).map(Radius::uniform),
    };
    let mut radius = Radius::default();
    for attr in &node.attrs {
        let name = attr.name.to_ascii_lowercase();
        if let Some(axis) = axis_of(&name) {
            let size = to_size(&attr.value, ctx)?;
            for corner in radius.corners_mut() {
                set_axis(corner, axis, size);
            }
        } else if let Some(corner) = radius.corner_mut(&name) {
            *corner = to_corner(&attr.value, ctx)?;
        } else {
            let (corner_name, axis) = name
                .rsplit_once('-')
                .and_then(|(c, a)| Some((c, axis_of(a)?)))
                .ok_or_else(|| ctx.unknown_field("radius", &attr.name))?;
            let size = to_size(&attr.value, ctx)?;
            let corner = radius
                .corner_mut(corner_name)
                .ok_or_else(|| ctx.unknown_field("radius", &attr.name))?;
            set_axis(corner, axis, size);
        }
    }
    Ok(radius)
}

// ── Shadows ──────────────────────────────────────────────────────────

fn to_shadow(value: &Value, ctx: Ctx<'_>) -> Coerced<Shadow> {
    let node = match value {
        Value::Shadow(s) => return Ok(*s),
        Value::Node(node) => node,
        _ => return Err(ctx.fail("a shadow record", value)),
    };
    check_fields(node, &Shadow::FIELDS, "shadow", ctx)?;
    let zero = Size::px(0.0);
    let size = |name: &str| field_or(node, name, zero, |v| to_size(v, ctx));
    Ok(Shadow {
        x_offset: size("x-offset")?,
        y_offset: size("y-offset")?,
        blur: size("blur")?,
        spread_radius: size("spread-radius")?,
        color: field_or(node, "color", Color::BLACK, |v| to_color(v, ctx))?,
        inset: field_or(node, "inset", false, |v| to_bool(v, ctx))?,
    })
}

fn to_text_shadow(value: &Value, ctx: Ctx<'_>) -> Coerced<TextShadow> {
    let node = match value {
        Value::TextShadow(s) => return Ok(*s),
        Value::Node(node) => node,
        _ => return Err(ctx.fail("a text shadow record", value)),
    };
    check_fields(node, &TextShadow::FIELDS, "text shadow", ctx)?;
    let zero = Size::px(0.0);
    let size = |name: &str| field_or(node, name, zero, |v| to_size(v, ctx));
    Ok(TextShadow {
        x_offset: size("x-offset")?,
        y_offset: size("y-offset")?,
        blur: size("blur")?,
        color: field_or(node, "color", Color::BLACK, |v| to_color(v, ctx))?,
    })
}

// ── Backgrounds ──────────────────────────────────────────────────────

fn to_background(value: &Value, ctx: Ctx<'_>) -> Coerced<BackgroundElement> {
    match value {
        Value::Background(b) => Ok(b.clone()),
        Value::Str(src) => Ok(BackgroundElement::Image(BackgroundImage {
            src: src.clone(),
            ..BackgroundImage::default()
        })),
        Value::Node(node) if node.is("image") => to_image(node, ctx).map(BackgroundElement::Image),
        Value::Node(node) if node.is("linear-gradient") => {
            to_linear(node, ctx).map(BackgroundElement::LinearGradient)
        }
        Value::Node(node) if node.is("radial-gradient") => {
            to_radial(node, ctx).map(BackgroundElement::RadialGradient)
        }
        _ => Err(ctx.fail("an image or gradient", value)),
    }
}

fn to_image(node: &Node, ctx: Ctx<'_>) -> Coerced<BackgroundImage> {
    check_fields(node, &["src", "width", "height", "repeat"], "image", ctx)?;
    let src = node
        .get("src")
        .ok_or_else(|| ctx.invalid("image needs a `src`"))
        .and_then(|v| to_text(v, ctx))?;
    Ok(BackgroundImage {
        src,
        width: field_or(node, "width", Size::auto(), |v| to_size(v, ctx))?,
        height: field_or(node, "height", Size::auto(), |v| to_size(v, ctx))?,
        repeat: field_or(node, "repeat", ImageRepeat::default(), |v| {
            named(ImageRepeat::NAMES, ImageRepeat::from_ordinal, v, ctx)
        })?,
    })
}

fn to_linear(node: &Node, ctx: Ctx<'_>) -> Coerced<LinearGradient> {
    check_fields(node, &["direction", "gradient", "repeating"], "linear gradient", ctx)?;
    let direction = field_or(node, "direction", LinearDirection::default(), |v| {
        if let Value::Ident(s) | Value::Str(s) = v {
            if let Some(side) = LinearSide::from_name(s.trim()) {
                return Ok(LinearDirection::Side(side));
            }
        }
        to_angle(v, ctx).map(LinearDirection::Angle)
    })?;
    Ok(LinearGradient {
        direction,
        stops: field_or(node, "gradient", Vec::new(), |v| to_stops(v, ctx))?,
        repeating: field_or(node, "repeating", false, |v| to_bool(v, ctx))?,
    })
}

fn to_radial(node: &Node, ctx: Ctx<'_>) -> Coerced<RadialGradient> {
    check_fields(
        node,
        &["shape", "radius", "center-x", "center-y", "gradient", "repeating"],
        "radial gradient",
        ctx,
    )?;
    let defaults = RadialGradient::default();
    let radius = field_or(node, "radius", defaults.radius, |v| match v {
        Value::List(items) if items.len() == 2 => Ok(RadialExtent::Sizes {
            x: to_size(&items[0], ctx)?,
            y: to_size(&items[1], ctx)?,
        }),
        Value::Ident(s) | Value::Str(s) if RadialKeyword::from_name(s.trim()).is_some() => {
            named(RadialKeyword::NAMES, RadialKeyword::from_ordinal, v, ctx).map(RadialExtent::Keyword)
        }
        scalar => to_size(scalar, ctx).map(|s| RadialExtent::Sizes { x: s, y: s }),
    })?;
    Ok(RadialGradient {
        shape: field_or(node, "shape", defaults.shape, |v| {
            named(RadialShape::NAMES, RadialShape::from_ordinal, v, ctx)
        })?,
        radius,
        center_x: field_or(node, "center-x", defaults.center_x, |v| to_size(v, ctx))?,
        center_y: field_or(node, "center-y", defaults.center_y, |v| to_size(v, ctx))?,
        stops: field_or(node, "gradient", Vec::new(), |v| to_stops(v, ctx))?,
        repeating: field_or(node, "repeating", false, |v| to_bool(v, ctx))?,
    })
}

/// Stops are colors (spread evenly) or `_{ offset, color }` records whose
/// offset is a fraction in `[0, 1]` or a percentage. Offsets must not decrease.
fn to_stops(value: &Value, ctx: Ctx<'_>) -> Coerced<Vec<GradientStop>> {
    let items: Vec<&Value> = match value {
        Value::List(items) => items.iter().collect(),
        single => vec![single],
    };
    let count = items.len();
    let mut stops = Vec::with_capacity(count);
    for (i, item) in items.into_iter().enumerate() {
        let even = if count > 1 {
            i as f64 / (count - 1) as f64
        } else {
            0.0
        };
        let stop = match item {
            Value::Node(node) => {
                check_fields(node, &["offset", "color"], "gradient stop", ctx)?;
                let color = node
                    .get("color")
                    .ok_or_else(|| ctx.invalid("gradient stop needs a `color`"))
                    .and_then(|v| to_color(v, ctx))?;
                GradientStop::new(field_or(node, "offset", even, |v| to_offset(v, ctx))?, color)
            }
            color => GradientStop::new(even, to_color(color, ctx)?),
        };
        stops.push(stop);
    }
    if stops.windows(2).any(|w| w[1].offset < w[0].offset) {
        return Err(ctx.invalid("gradient stop offsets must not decrease"));
    }
    Ok(stops)
}

fn to_offset(value: &Value, ctx: Ctx<'_>) -> Coerced<f64> {
    let percent = |s: Size| (s.unit == SizeUnit::Percent).then_some(s.value / 100.0);
    let offset = match value {
        Value::Size(s) => percent(*s).ok_or_else(|| ctx.fail("a fraction or percentage", value))?,
        Value::Str(text) => match text.parse::<Size>().ok().and_then(percent) {
            Some(offset) => offset,
            None => to_float(value, ctx)?,
        },
        other => to_float(other, ctx)?,
    };
    if (0.0..=1.0).contains(&offset) {
        Ok(offset)
    } else {
        Err(ctx.invalid(format!("gradient offset {offset} is outside [0, 1]")))
    }
}

// ── Clip ─────────────────────────────────────────────────────────────

fn to_clip(value: &Value, ctx: Ctx<'_>) -> Coerced<ClipShape> {
    let node = match value {
        Value::Clip(c) => return Ok(c.clone()),
        v if is_none(v) => return Ok(ClipShape::None),
        Value::Node(node) => node,
        _ => return Err(ctx.fail("a clip shape", value)),
    };
    let zero = Size::px(0.0);
    let half = Size::percent(50.0);
    let size = |name: &str, default: Size| field_or(node, name, default, |v| to_size(v, ctx));
    let shape = node.kind.to_ascii_lowercase();
    match shape.as_str() {
        "inset" => {
            check_fields(node, &["top", "right", "bottom", "left", "radius"], "inset", ctx)?;
            Ok(ClipShape::Inset {
                top: size("top", zero)?,
                right: size("right", zero)?,
                bottom: size("bottom", zero)?,
                left: size("left", zero)?,
                radius: field_or(node, "radius", Radius::uniform(zero), |v| to_radius(v, ctx))?,
            })
        }
        "circle" => {
            check_fields(node, &["x", "y", "radius"], "circle", ctx)?;
            Ok(ClipShape::Circle {
                x: size("x", half)?,
                y: size("y", half)?,
                radius: size("radius", half)?,
            })
        }
        "ellipse" => {
            check_fields(node, &["x", "y", "radius-x", "radius-y"], "ellipse", ctx)?;
            Ok(ClipShape::Ellipse {
                x: size("x", half)?,
                y: size("y", half)?,
                radius_x: size("radius-x", half)?,
                radius_y: size("radius-y", half)?,
            })
        }
        "polygon" => {
            check_fields(node, &["points"], "polygon", ctx)?;
            let points = match node.get("points") {
                Some(Value::List(items)) => {
                    items.iter().map(|v| to_size(v, ctx)).collect::<Coerced<Vec<_>>>()?
                }
                Some(Value::Str(text)) => sizes(&text.replace(',', " "), ctx)?,
                _ => return Err(ctx.invalid("polygon needs a `points` list")),
            };
            if points.len() % 2 != 0 || points.len() < 6 {
                return Err(ctx.invalid("polygon needs at least three x, y pairs"));
            }
            Ok(ClipShape::Polygon { points })
        }
        _ => Err(ctx.fail(&format!("one of {}", ClipShape::SHAPES.join(" | ")), value)),
    }
}

// ── Filter ───────────────────────────────────────────────────────────

fn to_filter(value: &Value, ctx: Ctx<'_>) -> Coerced<ViewFilter> {
    let node = match value {
        Value::Filter(f) => return Ok(*f),
        v if is_none(v) => return Ok(ViewFilter::default()),
        Value::Node(node) => node,
        _ => return Err(ctx.fail("a filter record", value)),
    };
    let mut filter = ViewFilter::default();
    for attr in &node.attrs {
        let name = attr.name.to_ascii_lowercase();
        match name.as_str() {
            "blur" => filter.blur = Some(to_size(&attr.value, ctx)?),
            "hue-rotate" => filter.hue_rotate = Some(to_angle(&attr.value, ctx)?),
            "drop-shadow" => filter.drop_shadow = Some(to_text_shadow(&attr.value, ctx)?),
            _ => {
                let amount = to_float(&attr.value, ctx)?;
                let slot = filter
                    .percent_mut(&name)
                    .ok_or_else(|| ctx.unknown_field("filter", &attr.name))?;
                *slot = Some(amount);
            }
        }
    }
    Ok(filter)
}

// ── Transform ────────────────────────────────────────────────────────

/// Set (`Some`) or clear (`None`) one transform field.
fn set_transform_field(
    transform: &mut Transform,
    field: &str,
    value: Option<&Value>,
    ctx: Ctx<'_>,
) -> Coerced<()> {
    match Transform::field_type(field) {
        Some(TransformField::Size) => {
            let size = value.map(|v| to_size(v, ctx)).transpose()?;
            if let Some(slot) = transform.size_field_mut(field) {
                *slot = size;
            }
        }
        Some(kind @ (TransformField::Scale | TransformField::Axis)) => {
            let number = value.map(|v| to_float(v, ctx)).transpose()?;
            if let (TransformField::Axis, Some(n)) = (kind, number) {
                if !(0.0..=1.0).contains(&n) {
                    return Err(ctx.invalid(format!("{field} must lie in [0, 1], found {n}")));
                }
            }
            if let Some(slot) = transform.number_field_mut(field) {
                *slot = number;
            }
        }
        Some(TransformField::Angle) => {
            let angle = value.map(|v| to_angle(v, ctx)).transpose()?;
            if let Some(slot) = transform.angle_field_mut(field) {
                *slot = angle;
            }
        }
        Some(TransformField::Flag) => {
            transform.backface_visible = value.map(|v| to_bool(v, ctx)).transpose()?;
        }
        None => return Err(ctx.unknown_field("transform", field)),
    }
    Ok(())
}

/// Effective value of a transform field; unset fields read as identity.
fn transform_field_value(transform: &Transform, field: &str) -> Value {
    let mut copy = *transform;
    match Transform::field_type(field).unwrap_or(TransformField::Size) {
        TransformField::Size => Value::Size(
            copy.size_field_mut(field)
                .and_then(|v| *v)
                .unwrap_or(Size::px(0.0)),
        ),
        TransformField::Scale => {
            Value::Float(copy.number_field_mut(field).and_then(|v| *v).unwrap_or(1.0))
        }
        TransformField::Axis => {
            Value::Float(copy.number_field_mut(field).and_then(|v| *v).unwrap_or(0.0))
        }
        TransformField::Angle => Value::Angle(
            copy.angle_field_mut(field)
                .and_then(|v| *v)
                .unwrap_or(Angle::deg(0.0)),
        ),
        TransformField::Flag => Value::Bool(transform.backface_visible.unwrap_or(true)),
    }
}

fn to_transform(value: &Value, ctx: Ctx<'_>) -> Coerced<Transform> {
    match value {
        Value::Transform(t) => Ok(*t),
        v if is_none(v) => Ok(Transform::default()),
        Value::Node(node) => {
            let mut transform = Transform::default();
            for attr in &node.attrs {
                let name = attr.name.to_ascii_lowercase();
                set_transform_field(&mut transform, &name, Some(&attr.value), ctx)?;
            }
            Ok(transform)
        }
        _ => Err(ctx.fail("a transform record", value)),
    }
}

// ---------------------------------------------------------------------------
// Motion
// ---------------------------------------------------------------------------

fn to_timing(value: &Value, ctx: Ctx<'_>) -> Coerced<TimingFunction> {
    match value {
        Value::Ident(s) | Value::Str(s) => s.parse().map_err(|e| ctx.parse_error(e)),
        Value::Node(node) if node.contains("steps") => {
            check_fields(node, &["steps", "jump"], "steps", ctx)?;
            let count = node
                .get("steps")
                .map_or(Ok(0), |v| to_int(v, ctx))
                .map(|n| u32::try_from(n).unwrap_or(0))?;
            let jump = field_or(node, "jump", StepJump::JumpEnd, |v| match v {
                Value::Ident(s) | Value::Str(s) => {
                    StepJump::parse(s).ok_or_else(|| ctx.fail("a step jump", v))
                }
                other => Err(ctx.fail("a step jump", other)),
            })?;
            TimingFunction::steps(count, jump)
                .ok_or_else(|| ctx.invalid("step count must be positive"))
        }
        Value::Node(node) => {
            check_fields(node, &["x1", "y1", "x2", "y2"], "cubic-bezier", ctx)?;
            let coord = |name: &str| {
                node.get(name)
                    .ok_or_else(|| ctx.invalid(format!("cubic-bezier needs `{name}`")))
                    .and_then(|v| to_float(v, ctx))
            };
            TimingFunction::cubic_bezier(coord("x1")?, coord("y1")?, coord("x2")?, coord("y2")?)
                .ok_or_else(|| ctx.invalid("cubic-bezier x1 and x2 must lie in [0, 1]"))
        }
        _ => Err(ctx.fail("a timing function", value)),
    }
}

fn to_iterations(value: &Value, ctx: Ctx<'_>) -> Coerced<i64> {
    if let Value::Ident(s) | Value::Str(s) = value {
        if s.trim().eq_ignore_ascii_case("infinite") {
            return Ok(INFINITE);
        }
    }
    match to_int(value, ctx)? {
        n if n > 0 || n == INFINITE => Ok(n),
        n => Err(ctx.invalid(format!("iteration count must be positive or infinite, found {n}"))),
    }
}

/// Coerce the from/to/keyframe values of `property` by the declared kind of
/// its tag on the current view kind.
fn coerce_animated(property: &AnimatedProperty, ctx: Ctx<'_>) -> Coerced<AnimatedProperty> {
    let tag = property.tag.trim().to_ascii_lowercase();
    let kind = registry::value_kind(ctx.view_kind, &tag)
        .ok_or_else(|| ctx.invalid(format!("`{tag}` cannot be animated on {}", ctx.view_kind)))?;
    let frame = |v: &Value| coerce(kind, v, ctx);
    if property.from.is_none() && property.to.is_none() && property.key_frames.is_empty() {
        return Err(ctx.invalid(format!("animated `{tag}` needs from, to or key-frames")));
    }
    let mut out = AnimatedProperty {
        from: property.from.as_ref().map(|v| frame(v)).transpose()?,
        to: property.to.as_ref().map(|v| frame(v)).transpose()?,
        ..AnimatedProperty::default()
    };
    for (&percent, value) in &property.key_frames {
        if !(1..100).contains(&percent) {
            return Err(ctx.invalid(format!("keyframe {percent} is outside 1..=99")));
        }
        out.key_frames.insert(percent, frame(value)?);
    }
    out.tag = tag;
    Ok(out)
}

fn to_animated_property(value: &Value, ctx: Ctx<'_>) -> Coerced<AnimatedProperty> {
    let node = match value {
        Value::AnimatedProperty(p) => return coerce_animated(p, ctx),
        Value::Node(node) => node,
        _ => return Err(ctx.fail("an animated property record", value)),
    };
    check_fields(node, &["tag", "from", "to", "key-frames"], "animated property", ctx)?;
    let mut property = AnimatedProperty {
        tag: node
            .get("tag")
            .ok_or_else(|| ctx.invalid("animated property needs a `tag`"))
            .and_then(|v| to_text(v, ctx))?,
        from: node.get("from").cloned(),
        to: node.get("to").cloned(),
        ..AnimatedProperty::default()
    };
    match node.get("key-frames") {
        Some(Value::Node(frames)) => {
            for attr in &frames.attrs {
                let percent = attr
                    .name
                    .trim_end_matches('%')
                    .parse::<u8>()
                    .map_err(|_| ctx.invalid(format!("keyframe `{}` is not a percentage", attr.name)))?;
                property.key_frames.insert(percent, attr.value.clone());
            }
        }
        Some(other) => return Err(ctx.fail("a keyframe record", other)),
        None => {}
    }
    coerce_animated(&property, ctx)
}

/// A full animation record, or the single-target shorthand where
/// `tag`/`from`/`to`/`key-frames` sit directly on the animation.
fn to_animation(value: &Value, ctx: Ctx<'_>) -> Coerced<Animation> {
    let node = match value {
        Value::Animation(a) => {
            let mut animation = a.as_ref().clone();
            animation.properties = a
                .properties
                .iter()
                .map(|p| coerce_animated(p, ctx))
                .collect::<Coerced<_>>()?;
            return finish_animation(animation, ctx);
        }
        Value::Node(node) => node,
        _ => return Err(ctx.fail("an animation record", value)),
    };
    let mut animation = Animation::default();
    let mut single = Node::record();
    for attr in &node.attrs {
        let name = attr.name.to_ascii_lowercase();
        match name.as_str() {
            "id" => animation.id = to_text(&attr.value, ctx)?,
            "duration" => animation.duration = to_duration(&attr.value, ctx)?,
            "delay" => animation.delay = to_duration(&attr.value, ctx)?,
            "timing-function" => animation.timing_function = to_timing(&attr.value, ctx)?,
            "iteration-count" => animation.iteration_count = to_iterations(&attr.value, ctx)?,
            "direction" => {
                animation.direction = named(
                    AnimationDirection::NAMES,
                    AnimationDirection::from_ordinal,
                    &attr.value,
                    ctx,
                )?
            }
            "property" => match &attr.value {
                Value::List(items) => {
                    for item in items {
                        animation.properties.push(to_animated_property(item, ctx)?);
                    }
                }
                single => animation.properties.push(to_animated_property(single, ctx)?),
            },
            "tag" | "from" | "to" | "key-frames" => single.set(name, attr.value.clone()),
            _ => return Err(ctx.unknown_field("animation", &attr.name)),
        }
    }
    if !single.attrs.is_empty() {
        animation
            .properties
            .push(to_animated_property(&Value::Node(single), ctx)?);
    }
    finish_animation(animation, ctx)
}

fn finish_animation(animation: Animation, ctx: Ctx<'_>) -> Coerced<Animation> {
    if animation.properties.is_empty() {
        return Err(ctx.invalid("an animation needs at least one animated property"));
    }
    if animation.iteration_count <= 0 && animation.iteration_count != INFINITE {
        return Err(ctx.invalid("iteration count must be positive or infinite"));
    }
    Ok(animation)
}

fn to_transition(value: &Value, ctx: Ctx<'_>) -> Coerced<Transition> {
    let node = match value {
        Value::Transition(t) => return Ok(t.clone()),
        Value::Node(node) => node,
        _ => return Err(ctx.fail("a transition record", value)),
    };
    check_fields(node, &["property", "duration", "delay", "timing-function"], "transition", ctx)?;
    let property = node
        .get("property")
        .ok_or_else(|| ctx.invalid("transition needs a `property`"))
        .and_then(|v| to_text(v, ctx))?
        .to_ascii_lowercase();
    Ok(Transition {
        property,
        duration: field_or(node, "duration", 0.0, |v| to_duration(v, ctx))?,
        delay: field_or(node, "delay", 0.0, |v| to_duration(v, ctx))?,
        timing_function: field_or(node, "timing-function", TimingFunction::Ease, |v| {
            to_timing(v, ctx)
        })?,
    })
}

// ---------------------------------------------------------------------------
// Sub-tag routes
// ---------------------------------------------------------------------------

/// Write `value` into the field `route` addresses inside `owner` (the
/// effective value of the owning composite), or reset that field to its
/// default when `value` is `None`. Returns the updated owner.
pub fn apply_route(route: Route, owner: &Value, value: Option<&Value>, ctx: Ctx<'_>) -> Coerced<Value> {
    match route {
        Route::Side { side, .. } => {
            let mut bounds = match owner {
                Value::Bounds(b) => *b,
                _ => Bounds::default(),
            };
            let size = value.map(|v| to_size(v, ctx)).transpose()?;
            if let Some(slot) = bounds.side_mut(side) {
                *slot = size.unwrap_or_default();
            }
            Ok(Value::Bounds(bounds))
        }
        Route::Edge { edge } => {
            let mut border = owner_border(owner);
            let new_edge = value.map(|v| to_edge(v, ctx)).transpose()?;
            if let Some(slot) = border.edge_mut(edge) {
                *slot = new_edge.unwrap_or_default();
            }
            Ok(Value::Border(border))
        }
        Route::EdgeField { edge, field } => {
            let mut border = owner_border(owner);
            let apply = |e: &mut BorderEdge| match value {
                Some(v) => apply_edge_field(e, field, v, ctx),
                None => {
                    reset_edge_field(e, field);
                    Ok(())
                }
            };
            match edge.and_then(|name| border.edge_mut(name)) {
                Some(e) => apply(e)?,
                None => {
                    for e in border.edges_mut() {
                        apply(e)?;
                    }
                }
            }
            Ok(Value::Border(border))
        }
        Route::Corner { corner } => {
            let mut radius = owner_radius(owner);
            let new_corner = value.map(|v| to_corner(v, ctx)).transpose()?;
            if let Some(slot) = radius.corner_mut(corner) {
                *slot = new_corner.unwrap_or_default();
            }
            Ok(Value::Radius(radius))
        }
        Route::CornerAxis { corner, axis } => {
            let mut radius = owner_radius(owner);
            let size = value.map(|v| to_size(v, ctx)).transpose()?.unwrap_or_default();
            match corner.and_then(|name| radius.corner_mut(name)) {
                Some(c) => set_axis(c, axis, size),
                None => {
                    for c in radius.corners_mut() {
                        set_axis(c, axis, size);
                    }
                }
            }
            Ok(Value::Radius(radius))
        }
        Route::Transform { field } => {
            let mut transform = match owner {
                Value::Transform(t) => *t,
                _ => Transform::default(),
            };
            set_transform_field(&mut transform, field, value, ctx)?;
            Ok(Value::Transform(transform))
        }
    }
}

/// Read the field `route` addresses inside `owner`. Whole-composite routes
/// without an edge or corner read the left edge / top-left corner.
pub fn read_route(route: Route, owner: &Value) -> Value {
    match route {
        Route::Side { side, .. } => {
            let bounds = match owner {
                Value::Bounds(b) => *b,
                _ => Bounds::default(),
            };
            Value::Size(bounds.side(side).unwrap_or_default())
        }
        Route::Edge { edge } => {
            let border = owner_border(owner);
            edge_value(border.edge(edge).unwrap_or(&border.left))
        }
        Route::EdgeField { edge, field } => {
            let border = owner_border(owner);
            let e = edge.and_then(|name| border.edge(name)).unwrap_or(&border.left);
            match field {
                "style" => style_value(e.style),
                "width" => Value::Size(e.width),
                _ => Value::Color(e.color),
            }
        }
        Route::Corner { corner } => {
            let radius = owner_radius(owner);
            corner_value(radius.corner(corner).unwrap_or(&radius.top_left))
        }
        Route::CornerAxis { corner, axis } => {
            let radius = owner_radius(owner);
            let c = corner.and_then(|name| radius.corner(name)).unwrap_or(&radius.top_left);
            Value::Size(match axis {
                Axis::X => c.x,
                Axis::Y => c.y,
            })
        }
        Route::Transform { field } => match owner {
            Value::Transform(t) => transform_field_value(t, field),
            _ => transform_field_value(&Transform::default(), field),
        },
    }
}

fn owner_border(owner: &Value) -> Border {
    match owner {
        Value::Border(b) => *b,
        _ => Border::default(),
    }
}

fn owner_radius(owner: &Value) -> Radius {
    match owner {
        Value::Radius(r) => *r,
        _ => Radius::default(),
    }
}
