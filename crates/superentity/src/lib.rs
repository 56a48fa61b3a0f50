//! Superentity - host integration for the entity metadata registry.
//!
//! Wraps [`superentity_core::EntityRegistry`] in a module with an explicit
//! initialization hook and hands out shared, read-only handles.
//!
//! ```
//! use serde_json::json;
//! use superentity::{ProviderInstance, RegistryConfig, SuperEntityModule};
//!
//! let module = SuperEntityModule::for_root(RegistryConfig::default());
//! let inventory = vec![ProviderInstance::new(json!({
//!     "modelName": "User",
//!     "schema": { "obj": { "age": { "type": "Number" } } }
//! }))];
//!
//! let registry = module.on_module_init(&inventory).unwrap();
//! assert!(registry.find_by_name("User").is_some());
//! ```

pub mod error;
pub mod logging;
pub mod module;

pub use error::ModuleError;
pub use logging::{init_tracing, DEFAULT_LOG_FILTER};
pub use module::SuperEntityModule;

pub use superentity_core::{
    Entity, EntityRegistry, FieldDescriptor, FieldKind, Inventory, InventoryModule,
    ModelDescriptor, ModelSource, ProviderInstance, RegistryConfig, RegistryState,
};
