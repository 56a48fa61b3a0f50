//! Raw field options as produced by the annotation mechanism.
//!
//! Decoding is total: anything that cannot be interpreted is either ignored
//! (non-object options and schemas) or carried through opaquely in
//! [`RawFieldOption::extra`].

use serde_json::{Map, Value};

use crate::marker::TypeMarker;

/// Default key of the nested block the annotation mechanism stores
/// presentation hints under.
pub const HINT_NAMESPACE: &str = "cms";

/// Presentation hints carried through unchanged onto the field descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresentationHints {
    /// Human-readable label.
    pub label: Option<String>,
    /// Whether the field is shown in listings.
    pub visible: Option<bool>,
    /// Whether the field is indexed.
    pub indexed: Option<bool>,
    /// Display order; missing is treated as 0 when sorting.
    pub order: Option<i64>,
}

impl PresentationHints {
    /// Sort key used for field ordering.
    pub fn sort_order(&self) -> i64 {
        self.order.unwrap_or(0)
    }

    /// Apply a single hint by its wire name.
    ///
    /// Returns `false` when the key is not a hint or the value has the wrong
    /// JSON type, so the caller can pass it through instead. Slots that are
    /// already filled are left alone unless `overwrite` is set.
    fn apply(&mut self, key: &str, value: &Value, overwrite: bool) -> bool {
        match key {
            "label" => match value.as_str() {
                Some(label) => fill(&mut self.label, label.to_string(), overwrite),
                None => false,
            },
            "visible" | "tableShow" => match value.as_bool() {
                Some(visible) => fill(&mut self.visible, visible, overwrite),
                None => false,
            },
            "indexed" | "index" => match value.as_bool() {
                Some(indexed) => fill(&mut self.indexed, indexed, overwrite),
                None => false,
            },
            "order" | "columnPosition" => match integral(value) {
                Some(order) => fill(&mut self.order, order, overwrite),
                None => false,
            },
            _ => false,
        }
    }
}

/// Integer value of a JSON number, accepting floats with no fractional part.
fn integral(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
            .map(|f| f as i64)
    })
}

fn fill<T>(slot: &mut Option<T>, value: T, overwrite: bool) -> bool {
    if overwrite || slot.is_none() {
        *slot = Some(value);
    }
    true
}

/// Options attached to one field of a model definition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawFieldOption {
    /// Type marker, if one was given.
    pub marker: Option<TypeMarker>,
    /// Name of the referenced entity, if this field is a reference.
    pub relation_target: Option<String>,
    /// Presentation hints.
    pub hints: PresentationHints,
    /// Keys this crate does not interpret.
    pub extra: Map<String, Value>,
}

impl RawFieldOption {
    /// Create an empty option record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the type marker.
    pub fn with_marker(mut self, marker: TypeMarker) -> Self {
        self.marker = Some(marker);
        self
    }

    /// Set the relation target.
    pub fn with_ref(mut self, target: impl Into<String>) -> Self {
        self.relation_target = Some(target.into());
        self
    }

    /// Set the label hint.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.hints.label = Some(label.into());
        self
    }

    /// Set the visible-in-listing hint.
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.hints.visible = Some(visible);
        self
    }

    /// Set the indexed hint.
    pub fn with_indexed(mut self, indexed: bool) -> Self {
        self.hints.indexed = Some(indexed);
        self
    }

    /// Set the display order hint.
    pub fn with_order(mut self, order: i64) -> Self {
        self.hints.order = Some(order);
        self
    }

    /// Attach an opaque key.
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// The relation target, if present and non-empty.
    pub fn relation_target(&self) -> Option<&str> {
        self.relation_target.as_deref().filter(|t| !t.is_empty())
    }

    /// Decode an option record from its JSON form, reading nested hints from
    /// the default [`HINT_NAMESPACE`] block.
    pub fn from_value(value: &Value) -> Self {
        Self::from_value_in(value, HINT_NAMESPACE)
    }

    /// Decode an option record, reading nested hints from the `namespace` block.
    ///
    /// Top-level hints take precedence over the namespaced ones. A non-object
    /// value decodes to an empty record.
    pub fn from_value_in(value: &Value, namespace: &str) -> Self {
        let mut option = Self::default();
        let Some(obj) = value.as_object() else {
            return option;
        };

        let mut namespaced = None;
        for (key, value) in obj {
            match key.as_str() {
                "type" => {
                    if !value.is_null() {
                        option.marker = Some(TypeMarker::from_value(value));
                    }
                }
                "ref" if value.is_string() => {
                    option.relation_target = value.as_str().map(str::to_string);
                }
                name if name == namespace && value.is_object() => {
                    namespaced = value.as_object();
                }
                _ => {
                    if !option.hints.apply(key, value, true) {
                        option.extra.insert(key.clone(), value.clone());
                    }
                }
            }
        }

        if let Some(block) = namespaced {
            let mut rest = Map::new();
            for (key, value) in block {
                if !option.hints.apply(key, value, false) {
                    rest.insert(key.clone(), value.clone());
                }
            }
            if !rest.is_empty() {
                option.extra.insert(namespace.to_string(), Value::Object(rest));
            }
        }

        option
    }
}

/// The ordered field map of a model definition.
///
/// Inserting a key that already exists replaces its option in place, so
/// declaration order is the order of first appearance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSchema {
    fields: Vec<(String, RawFieldOption)>,
}

impl RawSchema {
    /// Create an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field.
    pub fn with_field(mut self, key: impl Into<String>, option: RawFieldOption) -> Self {
        self.insert(key, option);
        self
    }

    /// Insert a field, replacing the option of an existing key in place.
    pub fn insert(&mut self, key: impl Into<String>, option: RawFieldOption) {
        let key = key.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = option,
            None => self.fields.push((key, option)),
        }
    }

    /// Get a field option by key.
    pub fn get(&self, key: &str) -> Option<&RawFieldOption> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, o)| o)
    }

    /// Iterate fields in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawFieldOption)> {
        self.fields.iter().map(|(k, o)| (k.as_str(), o))
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the schema has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Decode a field map from its JSON form.
    ///
    /// Anything other than an object yields an empty schema.
    pub fn from_value(value: &Value) -> Self {
        Self::from_value_in(value, HINT_NAMESPACE)
    }

    /// Decode a field map, reading nested hints from the `namespace` block.
    pub fn from_value_in(value: &Value, namespace: &str) -> Self {
        let mut schema = Self::new();
        if let Some(obj) = value.as_object() {
            for (key, option) in obj {
                schema.insert(key.clone(), RawFieldOption::from_value_in(option, namespace));
            }
        }
        schema
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_full_option() {
        let option = RawFieldOption::from_value(&json!({
            "type": "Number",
            "label": "Age",
            "visible": true,
            "indexed": false,
            "order": 3,
            "required": true
        }));

        assert_eq!(option.marker, Some(TypeMarker::Number));
        assert_eq!(option.hints.label.as_deref(), Some("Age"));
        assert_eq!(option.hints.visible, Some(true));
        assert_eq!(option.hints.indexed, Some(false));
        assert_eq!(option.hints.order, Some(3));
        assert_eq!(option.extra.get("required"), Some(&json!(true)));
    }

    #[test]
    fn test_decode_namespaced_hints() {
        let option = RawFieldOption::from_value(&json!({
            "ref": "User",
            "autoPopulateExclude": true,
            "cms": {
                "label": "Manager",
                "tableShow": false,
                "index": true,
                "columnPosition": 2,
                "width": 120
            }
        }));

        assert_eq!(option.relation_target(), Some("User"));
        assert_eq!(option.hints.label.as_deref(), Some("Manager"));
        assert_eq!(option.hints.visible, Some(false));
        assert_eq!(option.hints.indexed, Some(true));
        assert_eq!(option.hints.order, Some(2));
        assert_eq!(option.extra.get("autoPopulateExclude"), Some(&json!(true)));
        assert_eq!(option.extra.get("cms"), Some(&json!({ "width": 120 })));
    }

    #[test]
    fn test_top_level_hints_win() {
        let option = RawFieldOption::from_value(&json!({
            "cms": { "label": "Nested", "columnPosition": 9 },
            "label": "Top"
        }));

        assert_eq!(option.hints.label.as_deref(), Some("Top"));
        assert_eq!(option.hints.order, Some(9));
        assert!(option.extra.is_empty());
    }

    #[test]
    fn test_mistyped_hints_pass_through() {
        let option = RawFieldOption::from_value(&json!({
            "label": 42,
            "order": "first",
            "ref": { "$fn": "User" }
        }));

        assert_eq!(option.hints, PresentationHints::default());
        assert!(option.relation_target.is_none());
        assert_eq!(option.extra.len(), 3);
    }

    #[test]
    fn test_custom_namespace() {
        let option = RawFieldOption::from_value_in(
            &json!({
                "admin": { "label": "Price", "columnPosition": 3 },
                "cms": { "label": "Ignored" }
            }),
            "admin",
        );

        assert_eq!(option.hints.label.as_deref(), Some("Price"));
        assert_eq!(option.hints.order, Some(3));
        assert_eq!(option.extra.get("cms"), Some(&json!({ "label": "Ignored" })));
    }

    #[test]
    fn test_integral_float_order() {
        let option = RawFieldOption::from_value(&json!({ "cms": { "columnPosition": 2.0 } }));
        assert_eq!(option.hints.order, Some(2));

        let option = RawFieldOption::from_value(&json!({ "order": -1.0 }));
        assert_eq!(option.hints.order, Some(-1));

        let option = RawFieldOption::from_value(&json!({ "order": 1.5 }));
        assert_eq!(option.hints.order, None);
        assert_eq!(option.extra.get("order"), Some(&json!(1.5)));
    }

    #[test]
    fn test_mistyped_top_level_hint_with_namespaced_value() {
        let option = RawFieldOption::from_value(&json!({
            "visible": "yes",
            "cms": { "tableShow": true }
        }));

        assert_eq!(option.hints.visible, Some(true));
        assert_eq!(option.extra.get("visible"), Some(&json!("yes")));

        let field = crate::resolve::normalize_field("f", &option);
        let value = serde_json::to_value(&field).unwrap();
        assert_eq!(value["visible"], json!(true));
        assert_eq!(
            serde_json::to_string(&field).unwrap(),
            r#"{"key":"f","kind":"String","visible":true}"#
        );
    }

    #[test]
    fn test_non_object_option_is_empty() {
        assert_eq!(RawFieldOption::from_value(&json!("Number")), RawFieldOption::new());
        assert_eq!(RawFieldOption::from_value(&Value::Null), RawFieldOption::new());
    }

    #[test]
    fn test_empty_ref_is_not_a_target() {
        let option = RawFieldOption::new().with_ref("");
        assert!(option.relation_target().is_none());
    }

    #[test]
    fn test_schema_preserves_declaration_order() {
        let schema = RawSchema::from_value(&json!({
            "zeta": { "type": "String" },
            "alpha": { "type": "Number" },
            "mid": {}
        }));

        let keys: Vec<_> = schema.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_schema_insert_replaces_in_place() {
        let schema = RawSchema::new()
            .with_field("a", RawFieldOption::new().with_marker(TypeMarker::String))
            .with_field("b", RawFieldOption::new())
            .with_field("a", RawFieldOption::new().with_marker(TypeMarker::Date));

        assert_eq!(schema.len(), 2);
        assert_eq!(schema.iter().next().map(|(k, _)| k), Some("a"));
        assert_eq!(schema.get("a").and_then(|o| o.marker.clone()), Some(TypeMarker::Date));
    }

    #[test]
    fn test_malformed_schema_is_empty() {
        assert!(RawSchema::from_value(&json!([1, 2, 3])).is_empty());
        assert!(RawSchema::from_value(&json!("schema")).is_empty());
    }
}
