//! Canonical field descriptors.

use std::fmt;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::options::PresentationHints;

/// Canonical primitive kind of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FieldKind {
    /// Text.
    String,
    /// Numeric value.
    Number,
    /// Date/time value.
    Date,
    /// True/false.
    Boolean,
    /// Reference to another entity by name.
    Relation,
}

impl FieldKind {
    /// Check if this kind references another entity.
    pub fn is_relation(&self) -> bool {
        matches!(self, FieldKind::Relation)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldKind::String => "String",
            FieldKind::Number => "Number",
            FieldKind::Date => "Date",
            FieldKind::Boolean => "Boolean",
            FieldKind::Relation => "Relation",
        };
        f.write_str(name)
    }
}

/// A fully resolved field of an entity.
///
/// `relation_target` is present exactly when `kind` is [`FieldKind::Relation`].
///
/// Serializes as one flat object: the canonical keys first, then the opaque
/// extras. An extra whose name collides with an emitted canonical key is
/// left out of the serialized form.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    key: String,
    kind: FieldKind,
    relation_target: Option<String>,
    hints: PresentationHints,
    extra: Map<String, Value>,
}

impl FieldDescriptor {
    /// Create a non-relation field.
    ///
    /// Passing [`FieldKind::Relation`] here yields a `String` field; relations
    /// need a target and are built with [`FieldDescriptor::relation`].
    pub(crate) fn primitive(key: impl Into<String>, kind: FieldKind) -> Self {
        let kind = if kind.is_relation() {
            FieldKind::String
        } else {
            kind
        };
        Self {
            key: key.into(),
            kind,
            relation_target: None,
            hints: PresentationHints::default(),
            extra: Map::new(),
        }
    }

    /// Create a relation field pointing at `target`.
    pub(crate) fn relation(key: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            kind: FieldKind::Relation,
            relation_target: Some(target.into()),
            hints: PresentationHints::default(),
            extra: Map::new(),
        }
    }

    pub(crate) fn with_hints(mut self, hints: PresentationHints) -> Self {
        self.hints = hints;
        self
    }

    pub(crate) fn with_extra(mut self, extra: Map<String, Value>) -> Self {
        self.extra = extra;
        self
    }

    /// Field key, unique within the owning entity.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Resolved kind.
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Target entity name for relation fields.
    pub fn relation_target(&self) -> Option<&str> {
        self.relation_target.as_deref()
    }

    /// All presentation hints.
    pub fn hints(&self) -> &PresentationHints {
        &self.hints
    }

    /// Label hint.
    pub fn label(&self) -> Option<&str> {
        self.hints.label.as_deref()
    }

    /// Visible-in-listing hint.
    pub fn visible(&self) -> Option<bool> {
        self.hints.visible
    }

    /// Indexed hint.
    pub fn indexed(&self) -> Option<bool> {
        self.hints.indexed
    }

    /// Display order hint.
    pub fn order(&self) -> Option<i64> {
        self.hints.order
    }

    /// Option keys passed through without interpretation.
    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }
}

impl Serialize for FieldDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        let mut emitted = vec!["key", "kind"];
        map.serialize_entry("key", &self.key)?;
        map.serialize_entry("kind", &self.kind)?;

        if let Some(target) = &self.relation_target {
            map.serialize_entry("relationTarget", target)?;
            emitted.push("relationTarget");
        }
        if let Some(label) = &self.hints.label {
            map.serialize_entry("label", label)?;
            emitted.push("label");
        }
        if let Some(visible) = self.hints.visible {
            map.serialize_entry("visible", &visible)?;
            emitted.push("visible");
        }
        if let Some(indexed) = self.hints.indexed {
            map.serialize_entry("indexed", &indexed)?;
            emitted.push("indexed");
        }
        if let Some(order) = self.hints.order {
            map.serialize_entry("order", &order)?;
            emitted.push("order");
        }

        for (name, value) in &self.extra {
            if !emitted.contains(&name.as_str()) {
                map.serialize_entry(name, value)?;
            }
        }
        map.end()
    }
}
