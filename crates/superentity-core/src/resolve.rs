//! Field normalization: kind resolution and ordering.

use tracing::debug;

use crate::field::{FieldDescriptor, FieldKind};
use crate::marker::TypeMarker;
use crate::options::{RawFieldOption, RawSchema};

/// A kind-resolution rule: when the predicate holds, the field gets the kind.
pub type KindRule = (fn(&RawFieldOption) -> bool, FieldKind);

/// Kind-resolution rules in precedence order. The first match wins; a field
/// no rule matches is a [`FieldKind::String`].
pub const KIND_RULES: &[KindRule] = &[
    (has_string_marker, FieldKind::String),
    (has_number_marker, FieldKind::Number),
    (has_date_marker, FieldKind::Date),
    (has_boolean_literal, FieldKind::Boolean),
    (has_relation_target, FieldKind::Relation),
];

fn has_string_marker(option: &RawFieldOption) -> bool {
    matches!(option.marker, Some(TypeMarker::String))
}

fn has_number_marker(option: &RawFieldOption) -> bool {
    matches!(option.marker, Some(TypeMarker::Number))
}

fn has_date_marker(option: &RawFieldOption) -> bool {
    matches!(option.marker, Some(TypeMarker::Date))
}

fn has_boolean_literal(option: &RawFieldOption) -> bool {
    option
        .marker
        .as_ref()
        .is_some_and(TypeMarker::is_boolean_literal)
}

fn has_relation_target(option: &RawFieldOption) -> bool {
    option.relation_target().is_some()
}

/// Resolve the canonical kind of a field. Never fails.
pub fn resolve_kind(option: &RawFieldOption) -> FieldKind {
    let rule = KIND_RULES.iter().find(|(applies, _)| applies(option));
    match (rule, &option.marker) {
        (Some((_, kind)), _) => *kind,
        (None, Some(marker)) => {
            debug!(marker = %marker, "unrecognized type marker, defaulting to String");
            FieldKind::String
        }
        (None, None) => FieldKind::String,
    }
}

/// Build the descriptor for one raw field.
pub fn normalize_field(key: &str, option: &RawFieldOption) -> FieldDescriptor {
    let kind = resolve_kind(option);

    let descriptor = match (kind, option.relation_target()) {
        (FieldKind::Relation, Some(target)) => FieldDescriptor::relation(key, target),
        _ => FieldDescriptor::primitive(key, kind),
    };

    descriptor
        .with_hints(option.hints.clone())
        .with_extra(option.extra.clone())
}

/// Normalize every field of a schema and order them by display order.
///
/// The sort is stable: fields with equal (or missing, treated as 0) order
/// keep their declaration order.
pub fn normalize_schema(schema: &RawSchema) -> Vec<FieldDescriptor> {
    let mut fields: Vec<FieldDescriptor> = schema
        .iter()
        .map(|(key, option)| normalize_field(key, option))
        .collect();
    fields.sort_by_key(|f| f.hints().sort_order());
    fields
}
