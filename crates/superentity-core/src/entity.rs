//! Registry-resident entities.

use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};

use crate::field::FieldDescriptor;
use crate::inventory::ModelDescriptor;
use crate::resolve::normalize_schema;

/// The normalized form of one model definition.
///
/// Fields iterate in ascending display order, ties in declaration order.
/// Entities are immutable once built.
///
/// Serializes as `{ "name", "fields" }` where `fields` is an object keyed by
/// field key, in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    name: String,
    fields: Vec<FieldDescriptor>,
}

impl Entity {
    pub(crate) fn new(name: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    /// Normalize a model descriptor into an entity.
    pub fn from_descriptor(descriptor: &ModelDescriptor) -> Self {
        Self::new(descriptor.name.clone(), normalize_schema(&descriptor.schema))
    }

    /// Entity name (the registry key).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in display order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Get a field by key.
    pub fn get_field(&self, key: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.key() == key)
    }

    /// Field keys in display order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.key())
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the entity has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields that reference another entity.
    pub fn relation_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| f.kind().is_relation())
    }

    /// Fields flagged visible in listings.
    pub fn visible_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| f.visible() == Some(true))
    }

    /// Fields flagged as indexed.
    pub fn indexed_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| f.indexed() == Some(true))
    }
}

impl Serialize for Entity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Entity", 2)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("fields", &FieldMap(&self.fields))?;
        state.end()
    }
}

struct FieldMap<'a>(&'a [FieldDescriptor]);

impl Serialize for FieldMap<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for field in self.0 {
            map.serialize_entry(field.key(), field)?;
        }
        map.end()
    }
}
