//! Model inventory reader.
//!
//! The host hands over its live collection of registered instances (one or
//! more per module). Most of them are not models; [`ModelSource::as_model`]
//! is the explicit check that decides which ones are, and
//! [`list_model_descriptors`] keeps those in discovery order.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use tracing::trace;

use crate::config::RegistryConfig;
use crate::error::Result;
use crate::options::{RawSchema, HINT_NAMESPACE};

/// A data-model definition found in the inventory.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelDescriptor {
    /// Declared model name.
    pub name: String,
    /// Raw field options in declaration order.
    pub schema: RawSchema,
}

impl ModelDescriptor {
    /// Create a model descriptor.
    pub fn new(name: impl Into<String>, schema: RawSchema) -> Self {
        Self {
            name: name.into(),
            schema,
        }
    }
}

/// Capability check for inventory items.
pub trait ModelSource {
    /// Return the model descriptor if this item is a data-model definition.
    fn as_model(&self) -> Option<ModelDescriptor>;

    /// Like [`ModelSource::as_model`], reading presentation hints from the
    /// `hint_namespace` block. Sources that carry already-decoded options
    /// ignore the namespace.
    fn as_model_with(&self, _hint_namespace: &str) -> Option<ModelDescriptor> {
        self.as_model()
    }
}

impl ModelSource for ModelDescriptor {
    fn as_model(&self) -> Option<ModelDescriptor> {
        (!self.name.is_empty()).then(|| self.clone())
    }
}

impl<T: ModelSource + ?Sized> ModelSource for Box<T> {
    fn as_model(&self) -> Option<ModelDescriptor> {
        (**self).as_model()
    }

    fn as_model_with(&self, hint_namespace: &str) -> Option<ModelDescriptor> {
        (**self).as_model_with(hint_namespace)
    }
}

/// An opaque instance registered by the host.
///
/// It qualifies as a model when it has a non-empty string `modelName` and a
/// `schema` object. Fields are read from `schema.obj` when that key exists,
/// otherwise from `schema` itself.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct ProviderInstance(Value);

impl ProviderInstance {
    /// Wrap a host instance.
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// The wrapped value.
    pub fn value(&self) -> &Value {
        &self.0
    }
}

impl ModelSource for ProviderInstance {
    fn as_model(&self) -> Option<ModelDescriptor> {
        self.as_model_with(HINT_NAMESPACE)
    }

    fn as_model_with(&self, hint_namespace: &str) -> Option<ModelDescriptor> {
        let obj = self.0.as_object()?;
        let name = obj
            .get("modelName")
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())?;
        let schema = obj.get("schema").filter(|s| s.is_object())?;
        let fields = schema.get("obj").unwrap_or(schema);

        Some(ModelDescriptor::new(
            name,
            RawSchema::from_value_in(fields, hint_namespace),
        ))
    }
}

impl From<Value> for ProviderInstance {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}

/// One host module and the instances it provides.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct InventoryModule {
    /// Module name, informational only.
    #[serde(default)]
    pub name: Option<String>,
    /// Registered instances in discovery order.
    #[serde(default)]
    pub providers: Vec<ProviderInstance>,
}

impl InventoryModule {
    /// Create an empty module.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            providers: Vec::new(),
        }
    }

    /// Add a provider instance.
    pub fn with_provider(mut self, provider: impl Into<ProviderInstance>) -> Self {
        self.providers.push(provider.into());
        self
    }
}

/// A snapshot of the host's module/provider inventory.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Inventory {
    modules: Vec<InventoryModule>,
}

impl Inventory {
    /// Create an empty inventory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a module.
    pub fn with_module(mut self, module: InventoryModule) -> Self {
        self.modules.push(module);
        self
    }

    /// Modules in discovery order.
    pub fn modules(&self) -> &[InventoryModule] {
        &self.modules
    }

    /// All provider instances, module by module.
    pub fn instances(&self) -> impl Iterator<Item = &ProviderInstance> {
        self.modules.iter().flat_map(|m| m.providers.iter())
    }

    /// Model descriptors found in this inventory.
    pub fn model_descriptors(&self) -> Vec<ModelDescriptor> {
        list_model_descriptors(self.instances())
    }

    /// Parse a snapshot: a JSON array of `{ "name"?, "providers": [...] }`.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a snapshot from a reader.
    pub fn from_reader(reader: impl Read) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Load a snapshot from a file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }
}

/// Filter inventory items down to model descriptors.
///
/// Preserves discovery order and does not deduplicate. Items that are not
/// models are skipped silently.
pub fn list_model_descriptors<'a, S, I>(items: I) -> Vec<ModelDescriptor>
where
    S: ModelSource + ?Sized + 'a,
    I: IntoIterator<Item = &'a S>,
{
    collect_models(items, HINT_NAMESPACE)
}

/// [`list_model_descriptors`] using the hint namespace from `config`.
pub fn list_model_descriptors_with<'a, S, I>(items: I, config: &RegistryConfig) -> Vec<ModelDescriptor>
where
    S: ModelSource + ?Sized + 'a,
    I: IntoIterator<Item = &'a S>,
{
    collect_models(items, &config.hint_namespace)
}

fn collect_models<'a, S, I>(items: I, hint_namespace: &str) -> Vec<ModelDescriptor>
where
    S: ModelSource + ?Sized + 'a,
    I: IntoIterator<Item = &'a S>,
{
    let mut descriptors = Vec::new();
    for (position, item) in items.into_iter().enumerate() {
        match item.as_model_with(hint_namespace) {
            Some(descriptor) => descriptors.push(descriptor),
            None => trace!(position, "skipping inventory item without a model schema"),
        }
    }
    descriptors
}
