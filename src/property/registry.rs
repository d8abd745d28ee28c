//! Property tag registry: the declared value kind and default of every tag,
//! per view kind, plus the routing of composite sub-tags (`margin-left`,
//! `border-top-color`, `translate-x`, ...) to their owning composite.

use crate::value::{
    Angle, Border, BorderEdge, BorderStyle, Bounds, ClipShape, Color, Date, EnumValue, Radius,
    Range, Size, TimeOfDay, Transform, TransformField, Value, ViewFilter,
};

// ---------------------------------------------------------------------------
// Kinds and defaults
// ---------------------------------------------------------------------------

/// Declared value kind of a property tag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PropertyKind {
    Bool,
    Int,
    Float,
    Str,
    Size,
    Angle,
    /// Seconds.
    Duration,
    Color,
    Range,
    /// Closed set of names, addressed by ordinal or name.
    Enum(&'static [&'static str]),
    Bounds,
    Border,
    Radius,
    Shadows,
    TextShadows,
    Backgrounds,
    Clip,
    Filter,
    Transform,
    Animations,
    Transitions,
    Date,
    Time,
    StrList,
    SizeList,
}

impl PropertyKind {
    /// Name used in type-mismatch messages.
    pub fn describe(self) -> &'static str {
        match self {
            PropertyKind::Bool => "a boolean",
            PropertyKind::Int => "an integer",
            PropertyKind::Float => "a number",
            PropertyKind::Str => "a string",
            PropertyKind::Size => "a size",
            PropertyKind::Angle => "an angle",
            PropertyKind::Duration => "a duration",
            PropertyKind::Color => "a color",
            PropertyKind::Range => "an integer or range",
            PropertyKind::Enum(_) => "one of the enumerated names",
            PropertyKind::Bounds => "bounds",
            PropertyKind::Border => "a border",
            PropertyKind::Radius => "a radius",
            PropertyKind::Shadows => "shadows",
            PropertyKind::TextShadows => "text shadows",
            PropertyKind::Backgrounds => "background layers",
            PropertyKind::Clip => "a clip shape",
            PropertyKind::Filter => "a filter",
            PropertyKind::Transform => "a transform",
            PropertyKind::Animations => "animations",
            PropertyKind::Transitions => "transitions",
            PropertyKind::Date => "a date",
            PropertyKind::Time => "a time",
            PropertyKind::StrList => "a list of strings",
            PropertyKind::SizeList => "a list of sizes",
        }
    }

    /// The default a tag of this kind has unless its definition overrides it.
    pub fn default_value(self) -> Value {
        match self {
            PropertyKind::Bool => Value::Bool(false),
            PropertyKind::Int => Value::Int(0),
            PropertyKind::Float => Value::Float(0.0),
            PropertyKind::Str => Value::Str(String::new()),
            PropertyKind::Size => Value::Size(Size::auto()),
            PropertyKind::Angle => Value::Angle(Angle::default()),
            PropertyKind::Duration => Value::Duration(0.0),
            PropertyKind::Color => Value::Color(Color::TRANSPARENT),
            PropertyKind::Range => Value::Range(Range::default()),
            PropertyKind::Enum(names) => EnumValue::of(names, 0).map_or(Value::Int(0), Value::Enum),
            PropertyKind::Bounds => Value::Bounds(Bounds::default()),
            PropertyKind::Border => Value::Border(Border::default()),
            PropertyKind::Radius => Value::Radius(Radius::default()),
            PropertyKind::Clip => Value::Clip(ClipShape::None),
            PropertyKind::Filter => Value::Filter(ViewFilter::default()),
            PropertyKind::Transform => Value::Transform(Transform::default()),
            PropertyKind::Date => Value::Date(Date::default()),
            PropertyKind::Time => Value::Time(TimeOfDay::default()),
            PropertyKind::Shadows
            | PropertyKind::TextShadows
            | PropertyKind::Backgrounds
            | PropertyKind::Animations
            | PropertyKind::Transitions
            | PropertyKind::StrList
            | PropertyKind::SizeList => Value::List(Vec::new()),
        }
    }
}

/// Default override for a single tag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Initial {
    /// The kind's default.
    Kind,
    Bool(bool),
    Int(i64),
    Float(f64),
    Enum(usize),
    Color(u32),
}

/// One property tag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropertyDef {
    pub tag: &'static str,
    pub kind: PropertyKind,
    pub initial: Initial,
}

impl PropertyDef {
    const fn new(tag: &'static str, kind: PropertyKind) -> Self {
        Self {
            tag,
            kind,
            initial: Initial::Kind,
        }
    }

    const fn with(tag: &'static str, kind: PropertyKind, initial: Initial) -> Self {
        Self { tag, kind, initial }
    }

    /// The documented default of this tag.
    pub fn default_value(&self) -> Value {
        match (self.initial, self.kind) {
            (Initial::Kind, kind) => kind.default_value(),
            (Initial::Bool(b), _) => Value::Bool(b),
            (Initial::Int(n), _) => Value::Int(n),
            (Initial::Float(f), _) => Value::Float(f),
            (Initial::Enum(i), PropertyKind::Enum(names)) => {
                EnumValue::of(names, i).map_or(Value::Int(i as i64), Value::Enum)
            }
            (Initial::Enum(i), _) => Value::Int(i as i64),
            (Initial::Color(argb), _) => Value::Color(Color(argb)),
        }
    }
}

// ---------------------------------------------------------------------------
// Enumerations
// ---------------------------------------------------------------------------

pub const VISIBILITY: &[&str] = &["visible", "invisible", "gone"];
pub const OVERFLOW: &[&str] = &["hidden", "visible", "scroll", "auto"];
pub const TEXT_ALIGN: &[&str] = &["left", "right", "center", "justify"];
pub const TEXT_TRANSFORM: &[&str] = &["none", "capitalize", "lowercase", "uppercase"];
pub const TEXT_WEIGHT: &[&str] = &[
    "inherit",
    "thin",
    "extra-light",
    "light",
    "normal",
    "medium",
    "semi-bold",
    "bold",
    "extra-bold",
    "black",
];
pub const WHITE_SPACE: &[&str] = &["normal", "nowrap", "pre", "pre-wrap", "pre-line", "break-spaces"];
pub const WORD_BREAK: &[&str] = &["normal", "break-all", "keep-all", "break-word"];
pub const TEXT_OVERFLOW: &[&str] = &["clip", "ellipsis"];
pub const WRITING_MODE: &[&str] = &[
    "horizontal-top-to-bottom",
    "horizontal-bottom-to-top",
    "vertical-right-to-left",
    "vertical-left-to-right",
];
pub const TEXT_DIRECTION: &[&str] = &["system", "left-to-right", "right-to-left"];
pub const TEXT_LINE_STYLE: &[&str] = &["inherit", "solid", "dashed", "dotted", "double", "wavy"];
pub const SEMANTICS: &[&str] = &[
    "default",
    "article",
    "section",
    "aside",
    "header",
    "main",
    "footer",
    "navigation",
    "figure",
    "figure-caption",
    "button",
    "p",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "blockquote",
    "code",
];
pub const ORIENTATION: &[&str] = &["up-down", "start-to-end", "bottom-up", "end-to-start"];
pub const LIST_WRAP: &[&str] = &["off", "on", "reverse"];
pub const VERTICAL_ALIGN: &[&str] = &["top", "bottom", "center", "stretch"];
pub const HORIZONTAL_ALIGN: &[&str] = &["left", "right", "center", "stretch"];
pub const IMAGE_VERTICAL_ALIGN: &[&str] = &["top", "bottom", "center"];
pub const IMAGE_HORIZONTAL_ALIGN: &[&str] = &["left", "right", "center"];
pub const GRID_AUTO_FLOW: &[&str] = &["row", "column", "row-dense", "column-dense"];
pub const TABS: &[&str] = &["top", "bottom", "left", "right", "left-list", "right-list", "hidden"];
pub const NUMBER_PICKER_TYPE: &[&str] = &["editor", "slider"];
pub const EDIT_VIEW_TYPE: &[&str] = &["text", "password", "email", "emails", "url", "phone", "multiline"];
pub const FIT: &[&str] = &["none", "contain", "cover", "fill", "scale-down"];
pub const PRELOAD: &[&str] = &["none", "metadata", "auto"];
pub const ITEM_CHECKBOX: &[&str] = &["none", "single", "multiple"];
pub const RESIZE_SIDE: &[&str] = &["all", "top", "right", "bottom", "left"];
pub const COLUMN_FILL: &[&str] = &["balance", "auto"];
pub const CURSOR: &[&str] = &[
    "auto",
    "default",
    "none",
    "context-menu",
    "help",
    "pointer",
    "progress",
    "wait",
    "cell",
    "crosshair",
    "text",
    "vertical-text",
    "alias",
    "copy",
    "move",
    "no-drop",
    "not-allowed",
    "grab",
    "grabbing",
];

// ---------------------------------------------------------------------------
// Tag tables
// ---------------------------------------------------------------------------

use self::Initial as I;
use self::PropertyKind as K;

/// Tags every view accepts. `id`, `style` and container `content` are
/// handled by the engine directly and have no entry here.
pub const COMMON: &[PropertyDef] = &[
    // geometry
    PropertyDef::new("width", K::Size),
    PropertyDef::new("height", K::Size),
    PropertyDef::new("min-width", K::Size),
    PropertyDef::new("min-height", K::Size),
    PropertyDef::new("max-width", K::Size),
    PropertyDef::new("max-height", K::Size),
    PropertyDef::new("left", K::Size),
    PropertyDef::new("right", K::Size),
    PropertyDef::new("top", K::Size),
    PropertyDef::new("bottom", K::Size),
    PropertyDef::new("margin", K::Bounds),
    PropertyDef::new("padding", K::Bounds),
    PropertyDef::new("row", K::Range),
    PropertyDef::new("column", K::Range),
    PropertyDef::with("z-index", K::Int, I::Int(0)),
    // decoration
    PropertyDef::new("border", K::Border),
    PropertyDef::new("radius", K::Radius),
    PropertyDef::new("shadow", K::Shadows),
    PropertyDef::new("background-color", K::Color),
    PropertyDef::new("background", K::Backgrounds),
    PropertyDef::with("opacity", K::Float, I::Float(1.0)),
    PropertyDef::new("clip", K::Clip),
    PropertyDef::new("filter", K::Filter),
    PropertyDef::new("backdrop-filter", K::Filter),
    PropertyDef::new("transform", K::Transform),
    PropertyDef::new("visibility", K::Enum(VISIBILITY)),
    PropertyDef::new("overflow", K::Enum(OVERFLOW)),
    PropertyDef::new("semantics", K::Enum(SEMANTICS)),
    PropertyDef::new("cursor", K::Enum(CURSOR)),
    // text
    PropertyDef::new("font-name", K::Str),
    PropertyDef::new("text-size", K::Size),
    PropertyDef::with("text-color", K::Color, I::Color(0xFF00_0000)),
    PropertyDef::new("text-weight", K::Enum(TEXT_WEIGHT)),
    PropertyDef::new("text-align", K::Enum(TEXT_ALIGN)),
    PropertyDef::new("text-indent", K::Size),
    PropertyDef::new("text-transform", K::Enum(TEXT_TRANSFORM)),
    PropertyDef::new("text-direction", K::Enum(TEXT_DIRECTION)),
    PropertyDef::new("writing-mode", K::Enum(WRITING_MODE)),
    PropertyDef::new("text-line-style", K::Enum(TEXT_LINE_STYLE)),
    PropertyDef::new("text-line-thickness", K::Size),
    PropertyDef::new("text-line-color", K::Color),
    PropertyDef::new("text-shadow", K::TextShadows),
    PropertyDef::new("letter-spacing", K::Size),
    PropertyDef::new("word-spacing", K::Size),
    PropertyDef::new("line-height", K::Size),
    PropertyDef::new("white-space", K::Enum(WHITE_SPACE)),
    PropertyDef::new("word-break", K::Enum(WORD_BREAK)),
    PropertyDef::new("text-overflow", K::Enum(TEXT_OVERFLOW)),
    PropertyDef::with("tab-size", K::Int, I::Int(8)),
    PropertyDef::new("italic", K::Bool),
    PropertyDef::new("small-caps", K::Bool),
    PropertyDef::new("strikethrough", K::Bool),
    PropertyDef::new("overline", K::Bool),
    PropertyDef::new("underline", K::Bool),
    // interaction
    PropertyDef::new("disabled", K::Bool),
    PropertyDef::with("focusable", K::Bool, I::Bool(false)),
    PropertyDef::with("user-select", K::Bool, I::Bool(true)),
    PropertyDef::new("tooltip", K::Str),
    // motion
    PropertyDef::new("animation", K::Animations),
    PropertyDef::new("animation-paused", K::Bool),
    PropertyDef::new("transition", K::Transitions),
];

const LIST_LAYOUT: &[PropertyDef] = &[
    PropertyDef::new("orientation", K::Enum(ORIENTATION)),
    PropertyDef::new("list-wrap", K::Enum(LIST_WRAP)),
    PropertyDef::new("vertical-align", K::Enum(VERTICAL_ALIGN)),
    PropertyDef::new("horizontal-align", K::Enum(HORIZONTAL_ALIGN)),
    PropertyDef::new("list-row-gap", K::Size),
    PropertyDef::new("list-column-gap", K::Size),
];

const GRID_LAYOUT: &[PropertyDef] = &[
    PropertyDef::new("cell-width", K::SizeList),
    PropertyDef::new("cell-height", K::SizeList),
    PropertyDef::new("grid-row-gap", K::Size),
    PropertyDef::new("grid-column-gap", K::Size),
    PropertyDef::with("cell-vertical-align", K::Enum(VERTICAL_ALIGN), I::Enum(3)),
    PropertyDef::with("cell-horizontal-align", K::Enum(HORIZONTAL_ALIGN), I::Enum(3)),
    PropertyDef::new("grid-auto-flow", K::Enum(GRID_AUTO_FLOW)),
];

const STACK_LAYOUT: &[PropertyDef] = &[PropertyDef::new("current", K::Int)];

const COLUMN_LAYOUT: &[PropertyDef] = &[
    PropertyDef::new("column-count", K::Int),
    PropertyDef::new("column-width", K::Size),
    PropertyDef::new("column-gap", K::Size),
    PropertyDef::new("column-separator", K::Border),
    PropertyDef::new("column-fill", K::Enum(COLUMN_FILL)),
];

const TABS_LAYOUT: &[PropertyDef] = &[
    PropertyDef::new("current", K::Int),
    PropertyDef::new("tabs", K::Enum(TABS)),
    PropertyDef::new("tab-close-button", K::Bool),
];

const DETAILS_VIEW: &[PropertyDef] = &[
    PropertyDef::new("summary", K::Str),
    PropertyDef::new("expanded", K::Bool),
    PropertyDef::new("hide-summary-marker", K::Bool),
];

const RESIZABLE: &[PropertyDef] = &[
    PropertyDef::new("side", K::Enum(RESIZE_SIDE)),
    PropertyDef::new("resize-border-width", K::Size),
];

const TEXT_VIEW: &[PropertyDef] = &[PropertyDef::new("text", K::Str)];

const EDIT_VIEW: &[PropertyDef] = &[
    PropertyDef::new("text", K::Str),
    PropertyDef::new("hint", K::Str),
    PropertyDef::new("max-length", K::Int),
    PropertyDef::new("read-only", K::Bool),
    PropertyDef::new("edit-view-type", K::Enum(EDIT_VIEW_TYPE)),
    PropertyDef::new("edit-view-pattern", K::Str),
    PropertyDef::new("spellcheck", K::Bool),
    PropertyDef::new("edit-wrap", K::Bool),
    PropertyDef::new("caret-color", K::Color),
];

const CHECKBOX: &[PropertyDef] = &[
    PropertyDef::new("checked", K::Bool),
    PropertyDef::new("checkbox-vertical-align", K::Enum(IMAGE_VERTICAL_ALIGN)),
    PropertyDef::new("checkbox-horizontal-align", K::Enum(IMAGE_HORIZONTAL_ALIGN)),
];

const DROP_DOWN_LIST: &[PropertyDef] = &[
    PropertyDef::new("items", K::StrList),
    PropertyDef::new("current", K::Int),
];

const LIST_VIEW: &[PropertyDef] = &[
    PropertyDef::new("items", K::StrList),
    PropertyDef::with("current", K::Int, I::Int(-1)),
    PropertyDef::new("orientation", K::Enum(ORIENTATION)),
    PropertyDef::new("list-wrap", K::Enum(LIST_WRAP)),
    PropertyDef::new("item-width", K::Size),
    PropertyDef::new("item-height", K::Size),
    PropertyDef::new("item-checkbox", K::Enum(ITEM_CHECKBOX)),
];

const PROGRESS_BAR: &[PropertyDef] = &[
    PropertyDef::with("progress-max", K::Float, I::Float(1.0)),
    PropertyDef::new("progress-value", K::Float),
];

const NUMBER_PICKER: &[PropertyDef] = &[
    PropertyDef::new("number-picker-type", K::Enum(NUMBER_PICKER_TYPE)),
    PropertyDef::new("number-picker-min", K::Float),
    PropertyDef::with("number-picker-max", K::Float, I::Float(1.0)),
    PropertyDef::new("number-picker-step", K::Float),
    PropertyDef::new("number-picker-value", K::Float),
    PropertyDef::new("number-picker-precision", K::Int),
];

const COLOR_PICKER: &[PropertyDef] = &[PropertyDef::with(
    "color-picker-value",
    K::Color,
    I::Color(0xFF00_0000),
)];

const DATE_PICKER: &[PropertyDef] = &[
    PropertyDef::new("date-picker-value", K::Date),
    PropertyDef::new("date-picker-min", K::Date),
    PropertyDef::new("date-picker-max", K::Date),
    PropertyDef::with("date-picker-step", K::Int, I::Int(1)),
];

const TIME_PICKER: &[PropertyDef] = &[
    PropertyDef::new("time-picker-value", K::Time),
    PropertyDef::new("time-picker-min", K::Time),
    PropertyDef::new("time-picker-max", K::Time),
    PropertyDef::with("time-picker-step", K::Int, I::Int(60)),
];

const FILE_PICKER: &[PropertyDef] = &[
    PropertyDef::new("multiple", K::Bool),
    PropertyDef::new("accept", K::StrList),
];

const IMAGE_VIEW: &[PropertyDef] = &[
    PropertyDef::new("src", K::Str),
    PropertyDef::new("alt-text", K::Str),
    PropertyDef::new("fit", K::Enum(FIT)),
    PropertyDef::with("image-vertical-align", K::Enum(IMAGE_VERTICAL_ALIGN), I::Enum(2)),
    PropertyDef::with("image-horizontal-align", K::Enum(IMAGE_HORIZONTAL_ALIGN), I::Enum(2)),
];

const MEDIA_PLAYER: &[PropertyDef] = &[
    PropertyDef::new("src", K::StrList),
    PropertyDef::new("controls", K::Bool),
    PropertyDef::new("loop", K::Bool),
    PropertyDef::new("muted", K::Bool),
    PropertyDef::new("preload", K::Enum(PRELOAD)),
];

const VIDEO_PLAYER: &[PropertyDef] = &[
    PropertyDef::new("video-width", K::Float),
    PropertyDef::new("video-height", K::Float),
    PropertyDef::new("poster", K::Str),
];

const SVG_IMAGE_VIEW: &[PropertyDef] = &[PropertyDef::new("content", K::Str)];

/// Kind-specific tag tables of a built-in kind, most specific first.
pub fn kind_tables(kind: &str) -> &'static [&'static [PropertyDef]] {
    match kind {
        "ListLayout" | "Button" => &[LIST_LAYOUT],
        "GridLayout" => &[GRID_LAYOUT],
        "StackLayout" => &[STACK_LAYOUT],
        "ColumnLayout" => &[COLUMN_LAYOUT],
        "TabsLayout" => &[TABS_LAYOUT],
        "DetailsView" => &[DETAILS_VIEW],
        "Resizable" => &[RESIZABLE],
        "TextView" => &[TEXT_VIEW],
        "EditView" => &[EDIT_VIEW],
        "Checkbox" => &[CHECKBOX],
        "DropDownList" => &[DROP_DOWN_LIST],
        "ListView" => &[LIST_VIEW],
        "ProgressBar" => &[PROGRESS_BAR],
        "NumberPicker" => &[NUMBER_PICKER],
        "ColorPicker" => &[COLOR_PICKER],
        "DatePicker" => &[DATE_PICKER],
        "TimePicker" => &[TIME_PICKER],
        "FilePicker" => &[FILE_PICKER],
        "ImageView" => &[IMAGE_VIEW],
        "AudioPlayer" => &[MEDIA_PLAYER],
        "VideoPlayer" => &[VIDEO_PLAYER, MEDIA_PLAYER],
        "SvgImageView" => &[SVG_IMAGE_VIEW],
        _ => &[],
    }
}

/// Look up a tag for a built-in kind. Kind-specific definitions shadow the
/// common ones.
pub fn lookup(kind: &str, tag: &str) -> Option<&'static PropertyDef> {
    kind_tables(kind)
        .iter()
        .flat_map(|table| table.iter())
        .chain(COMMON.iter())
        .find(|def| def.tag == tag)
}

/// Every tag `kind` accepts directly (no routed sub-tags).
pub fn tags(kind: &str) -> impl Iterator<Item = &'static PropertyDef> {
    let tables = kind_tables(kind);
    let specific = tables.iter().flat_map(|table| table.iter());
    let common = COMMON
        .iter()
        .filter(move |def| !tables.iter().any(|t| t.iter().any(|d| d.tag == def.tag)));
    specific.chain(common)
}

// ---------------------------------------------------------------------------
// Sub-tag routing
// ---------------------------------------------------------------------------

/// Corner axis of a radius sub-tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Where a sub-tag reads and writes inside its owning composite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// `margin-left`, `padding-top`.
    Side {
        owner: &'static str,
        side: &'static str,
    },
    /// `border-left`: a whole edge.
    Edge { edge: &'static str },
    /// `border-style` (all edges) or `border-left-color` (one edge).
    EdgeField {
        edge: Option<&'static str>,
        field: &'static str,
    },
    /// `radius-top-left`: a whole corner.
    Corner { corner: &'static str },
    /// `radius-x` (all corners) or `radius-top-left-y` (one corner).
    CornerAxis {
        corner: Option<&'static str>,
        axis: Axis,
    },
    /// `translate-x`, `rotate`, `perspective`, ...
    Transform { field: &'static str },
}

impl Route {
    /// The composite tag this sub-tag belongs to.
    pub fn owner(&self) -> &'static str {
        match self {
            Route::Side { owner, .. } => owner,
            Route::Edge { .. } | Route::EdgeField { .. } => "border",
            Route::Corner { .. } | Route::CornerAxis { .. } => "radius",
            Route::Transform { .. } => "transform",
        }
    }

    /// Declared kind of the sub-value, for animation keyframes.
    pub fn value_kind(&self) -> Option<PropertyKind> {
        match self {
            Route::Side { .. } | Route::Corner { .. } | Route::CornerAxis { .. } => {
                Some(PropertyKind::Size)
            }
            Route::Edge { .. } => None,
            Route::EdgeField { field, .. } => match *field {
                "style" => Some(PropertyKind::Enum(BorderStyle::NAMES)),
                "width" => Some(PropertyKind::Size),
                _ => Some(PropertyKind::Color),
            },
            Route::Transform { field } => match Transform::field_type(field)? {
                TransformField::Size => Some(PropertyKind::Size),
                TransformField::Scale | TransformField::Axis => Some(PropertyKind::Float),
                TransformField::Angle => Some(PropertyKind::Angle),
                TransformField::Flag => Some(PropertyKind::Bool),
            },
        }
    }
}

fn find(names: &[&'static str], name: &str) -> Option<&'static str> {
    names.iter().copied().find(|n| *n == name)
}

fn axis(name: &str) -> Option<Axis> {
    match name {
        "x" => Some(Axis::X),
        "y" => Some(Axis::Y),
        _ => None,
    }
}

/// Resolve a composite sub-tag.
pub fn route(tag: &str) -> Option<Route> {
    for owner in ["margin", "padding"] {
        if let Some(side) = tag.strip_prefix(owner).and_then(|r| r.strip_prefix('-')) {
            return find(&Bounds::FIELDS, side).map(|side| Route::Side { owner, side });
        }
    }
    if let Some(rest) = tag.strip_prefix("border-") {
        if let Some(field) = find(&BorderEdge::FIELDS, rest) {
            return Some(Route::EdgeField { edge: None, field });
        }
        if let Some(edge) = find(&Border::EDGES, rest) {
            return Some(Route::Edge { edge });
        }
        return Border::EDGES.iter().find_map(|&edge| {
            let field = rest.strip_prefix(edge)?.strip_prefix('-')?;
            find(&BorderEdge::FIELDS, field).map(|field| Route::EdgeField {
                edge: Some(edge),
                field,
            })
        });
    }
    if let Some(rest) = tag.strip_prefix("radius-") {
        if let Some(axis) = axis(rest) {
            return Some(Route::CornerAxis { corner: None, axis });
        }
        if let Some(corner) = find(&Radius::CORNERS, rest) {
            return Some(Route::Corner { corner });
        }
        return Radius::CORNERS.iter().find_map(|&corner| {
            let axis = axis(rest.strip_prefix(corner)?.strip_prefix('-')?)?;
            Some(Route::CornerAxis {
                corner: Some(corner),
                axis,
            })
        });
    }
    Transform::FIELDS
        .iter()
        .find(|(name, _)| *name == tag)
        .map(|&(field, _)| Route::Transform { field })
}

/// Declared kind of `tag` on `kind`, following sub-tag routes.
pub fn value_kind(kind: &str, tag: &str) -> Option<PropertyKind> {
    match lookup(kind, tag) {
        Some(def) => Some(def.kind),
        None => route(tag)?.value_kind(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_specific_shadows_common() {
        assert_eq!(lookup("ListView", "current").unwrap().default_value(), Value::Int(-1));
        assert_eq!(lookup("DropDownList", "current").unwrap().default_value(), Value::Int(0));
        assert!(lookup("View", "current").is_none());
        assert_eq!(lookup("View", "width").unwrap().kind, PropertyKind::Size);
    }

    #[test]
    fn documented_defaults() {
        assert_eq!(lookup("View", "opacity").unwrap().default_value(), Value::Float(1.0));
        assert_eq!(lookup("ProgressBar", "progress-max").unwrap().default_value(), Value::Float(1.0));
        assert_eq!(lookup("View", "width").unwrap().default_value(), Value::Size(Size::auto()));
        assert_eq!(
            lookup("ListLayout", "orientation").unwrap().default_value(),
            Value::Enum(EnumValue { ordinal: 0, name: "up-down" })
        );
        assert_eq!(
            lookup("GridLayout", "cell-vertical-align").unwrap().default_value(),
            Value::Enum(EnumValue { ordinal: 3, name: "stretch" })
        );
    }

    #[test]
    fn tags_lists_each_tag_once() {
        let list: Vec<&str> = tags("ListView").map(|d| d.tag).collect();
        assert_eq!(list.iter().filter(|t| **t == "orientation").count(), 1);
        assert!(list.contains(&"width"));
        assert!(list.contains(&"items"));
    }

    #[test]
    fn tags_outlive_the_kind_name() {
        let defs = {
            let kind = String::from("ListView");
            tags(&kind)
        };
        assert!(defs.map(|d| d.tag).any(|tag| tag == "items"));
    }

    #[test]
    fn routes() {
        assert_eq!(route("margin-left"), Some(Route::Side { owner: "margin", side: "left" }));
        assert_eq!(route("padding-top").map(|r| r.owner()), Some("padding"));
        assert_eq!(route("margin-middle"), None);
        assert_eq!(route("border-style"), Some(Route::EdgeField { edge: None, field: "style" }));
        assert_eq!(route("border-top"), Some(Route::Edge { edge: "top" }));
        assert_eq!(
            route("border-left-color"),
            Some(Route::EdgeField { edge: Some("left"), field: "color" })
        );
        assert_eq!(route("radius-x"), Some(Route::CornerAxis { corner: None, axis: Axis::X }));
        assert_eq!(route("radius-top-left"), Some(Route::Corner { corner: "top-left" }));
        assert_eq!(
            route("radius-bottom-right-y"),
            Some(Route::CornerAxis { corner: Some("bottom-right"), axis: Axis::Y })
        );
        assert_eq!(route("translate-x"), Some(Route::Transform { field: "translate-x" }));
        assert_eq!(route("rotate").map(|r| r.owner()), Some("transform"));
        assert_eq!(route("colour"), None);
    }

    #[test]
    fn routed_value_kinds() {
        assert_eq!(value_kind("View", "margin-left"), Some(PropertyKind::Size));
        assert_eq!(value_kind("View", "scale-x"), Some(PropertyKind::Float));
        assert_eq!(value_kind("View", "rotate"), Some(PropertyKind::Angle));
        assert_eq!(value_kind("View", "border-top"), None);
        assert_eq!(value_kind("View", "nonsense"), None);
    }
}
