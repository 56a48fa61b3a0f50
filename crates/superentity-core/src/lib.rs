//! Superentity Core - entity metadata registry.
//!
//! Scans a host inventory for data-model definitions, normalizes each
//! field's options into a canonical descriptor (resolved kind, relation
//! target, presentation hints) and serves the result as a read-only,
//! name-indexed registry.

pub mod config;
pub mod entity;
pub mod error;
pub mod field;
pub mod inventory;
pub mod marker;
pub mod options;
pub mod registry;
pub mod resolve;

pub use config::RegistryConfig;
pub use entity::Entity;
pub use error::{Error, Result};
pub use field::{FieldDescriptor, FieldKind};
pub use inventory::{
    list_model_descriptors, list_model_descriptors_with, Inventory, InventoryModule,
    ModelDescriptor, ModelSource, ProviderInstance,
};
pub use marker::TypeMarker;
pub use options::{PresentationHints, RawFieldOption, RawSchema, HINT_NAMESPACE};
pub use registry::{EntityRegistry, RegistryState};
pub use resolve::{normalize_field, normalize_schema, resolve_kind, KIND_RULES};
