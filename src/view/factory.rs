//! View factory: maps kind names to view constructors.
//!
//! Built-in kinds are fixed. Custom kinds are registered on top of a
//! built-in base kind together with default attributes; their views accept
//! the base kind's tags. Kind lookup is case-insensitive.

use std::collections::HashMap;

use crate::dsl::model::Node;
use crate::error::{Error, Result};

/// A built-in kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindInfo {
    pub name: &'static str,
    pub container: bool,
}

const fn leaf(name: &'static str) -> KindInfo {
    KindInfo {
        name,
        container: false,
    }
}

const fn container(name: &'static str) -> KindInfo {
    KindInfo {
        name,
        container: true,
    }
}

/// Every built-in kind.
pub const BUILTIN_KINDS: &[KindInfo] = &[
    container("AbsoluteLayout"),
    container("ListLayout"),
    container("GridLayout"),
    container("StackLayout"),
    container("ColumnLayout"),
    container("TabsLayout"),
    container("DetailsView"),
    container("Resizable"),
    container("Button"),
    leaf("View"),
    leaf("TextView"),
    leaf("EditView"),
    leaf("Checkbox"),
    leaf("DropDownList"),
    leaf("ListView"),
    leaf("ProgressBar"),
    leaf("NumberPicker"),
    leaf("ColorPicker"),
    leaf("DatePicker"),
    leaf("TimePicker"),
    leaf("FilePicker"),
    leaf("ImageView"),
    leaf("AudioPlayer"),
    leaf("VideoPlayer"),
    leaf("SvgImageView"),
    leaf("CanvasView"),
    leaf("TableView"),
];

/// Built-in kind by name, case-insensitively.
pub fn builtin(name: &str) -> Option<&'static KindInfo> {
    BUILTIN_KINDS
        .iter()
        .find(|info| info.name.eq_ignore_ascii_case(name))
}

/// A kind registered by the application.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomKind {
    pub name: String,
    pub base: &'static KindInfo,
    /// Attributes applied to every new view before its own.
    pub defaults: Node,
}

/// A resolved kind: what a new view is built from.
#[derive(Debug, Clone, Copy)]
pub struct Resolved<'a> {
    /// Canonical kind name.
    pub kind: &'a str,
    pub base: &'static KindInfo,
    pub defaults: Option<&'a Node>,
}

/// Kind registry of an application.
#[derive(Debug, Clone, Default)]
pub struct ViewFactory {
    custom: HashMap<String, CustomKind>,
}

impl ViewFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `name` as a custom kind. `definition.kind` names the base
    /// kind and its attributes become the defaults, e.g.
    /// `Card = ListLayout { padding = 8px, orientation = start-to-end }`.
    pub fn register(&mut self, name: impl Into<String>, definition: Node) -> Result<()> {
        let name = name.into();
        if builtin(&name).is_some() {
            return Err(Error::Config(format!("\"{name}\" is a built-in view kind")));
        }
        let base = match builtin(&definition.kind) {
            Some(info) => info,
            None => {
                let parent = self
                    .custom
                    .get(&definition.kind.to_ascii_lowercase())
                    .ok_or_else(|| Error::UnknownKind(definition.kind.clone()))?;
                // Custom-on-custom: inherit the parent's defaults first.
                let mut defaults = parent.defaults.clone();
                defaults.attrs.extend(definition.attrs);
                let kind = CustomKind {
                    name: name.clone(),
                    base: parent.base,
                    defaults,
                };
                self.custom.insert(name.to_ascii_lowercase(), kind);
                return Ok(());
            }
        };
        let kind = CustomKind {
            name: name.clone(),
            base,
            defaults: definition,
        };
        self.custom.insert(name.to_ascii_lowercase(), kind);
        Ok(())
    }

    /// Register a custom kind from `Name = Base { ... }` style source:
    /// the text is parsed as the base node.
    pub fn register_source(&mut self, name: impl Into<String>, source: &str) -> Result<()> {
        let definition = crate::dsl::parse(source)?;
        self.register(name, definition)
    }

    pub fn resolve(&self, name: &str) -> Result<Resolved<'_>> {
        if let Some(info) = builtin(name) {
            return Ok(Resolved {
                kind: info.name,
                base: info,
                defaults: None,
            });
        }
        self.custom
            .get(&name.to_ascii_lowercase())
            .map(|custom| Resolved {
                kind: &custom.name,
                base: custom.base,
                defaults: Some(&custom.defaults),
            })
            .ok_or_else(|| Error::UnknownKind(name.to_owned()))
    }

    pub fn is_known(&self, name: &str) -> bool {
        self.resolve(name).is_ok()
    }

    pub fn custom_kinds(&self) -> impl Iterator<Item = &CustomKind> {
        self.custom.values()
    }
}
