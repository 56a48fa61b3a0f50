//! Entity registry: one-time build and read-only lookup.

use std::collections::HashMap;
use std::fmt;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::config::RegistryConfig;
use crate::entity::Entity;
use crate::error::{Error, Result};
use crate::inventory::{list_model_descriptors_with, ModelDescriptor, ModelSource};

/// Lifecycle of a registry instance.
///
/// `Uninitialized -> Building -> Ready`; `Ready` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryState {
    /// Created, not yet built. Lookups find nothing.
    Uninitialized,
    /// A build pass is running.
    Building,
    /// Built and frozen.
    Ready,
}

impl fmt::Display for RegistryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RegistryState::Uninitialized => "uninitialized",
            RegistryState::Building => "building",
            RegistryState::Ready => "ready",
        };
        f.write_str(name)
    }
}

/// Name-indexed registry of normalized entities.
///
/// Built once from model descriptors, then only read. Share it across
/// threads behind an `Arc`; reads take no locks.
#[derive(Debug)]
pub struct EntityRegistry {
    config: RegistryConfig,
    state: RegistryState,
    /// Entities in first-registration order.
    entities: Vec<Entity>,
    /// Entity name to position in `entities`.
    index: HashMap<String, usize>,
}

impl EntityRegistry {
    /// Create an empty, uninitialized registry.
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            config,
            state: RegistryState::Uninitialized,
            entities: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Create a ready registry from model descriptors.
    pub fn from_descriptors(
        config: RegistryConfig,
        descriptors: impl IntoIterator<Item = ModelDescriptor>,
    ) -> Self {
        let mut registry = Self::new(config);
        registry.run_build(descriptors);
        registry
    }

    /// Create a ready registry by scanning inventory items.
    pub fn from_inventory<'a, S, I>(config: RegistryConfig, items: I) -> Self
    where
        S: ModelSource + ?Sized + 'a,
        I: IntoIterator<Item = &'a S>,
    {
        let descriptors = list_model_descriptors_with(items, &config);
        Self::from_descriptors(config, descriptors)
    }

    /// Populate the registry from model descriptors.
    ///
    /// Runs once per registry. Defects in individual descriptors never fail
    /// the build; calling this on a registry that is not `Uninitialized`
    /// returns [`Error::AlreadyBuilt`] and leaves it untouched.
    pub fn build(&mut self, descriptors: impl IntoIterator<Item = ModelDescriptor>) -> Result<()> {
        if self.state != RegistryState::Uninitialized {
            return Err(Error::AlreadyBuilt(self.state));
        }
        self.run_build(descriptors);
        Ok(())
    }

    fn run_build(&mut self, descriptors: impl IntoIterator<Item = ModelDescriptor>) {
        let started = Instant::now();
        self.state = RegistryState::Building;

        for descriptor in descriptors {
            let entity = Entity::from_descriptor(&descriptor);
            debug!(entity = entity.name(), fields = entity.len(), "registered entity");
            self.register(entity);
        }

        self.state = RegistryState::Ready;
        info!(
            entities = self.entities.len(),
            fields = self.entities.iter().map(Entity::len).sum::<usize>(),
            duration_us = started.elapsed().as_micros() as u64,
            "entity registry ready"
        );
    }

    /// Insert an entity; a later entity with the same name replaces the
    /// earlier one in its original position.
    fn register(&mut self, entity: Entity) {
        match self.index.get(entity.name()) {
            Some(&position) => {
                if self.config.warn_on_duplicates {
                    warn!(entity = entity.name(), "duplicate entity name, later definition wins");
                }
                self.entities[position] = entity;
            }
            None => {
                self.index.insert(entity.name().to_string(), self.entities.len());
                self.entities.push(entity);
            }
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> RegistryState {
        self.state
    }

    /// Check if the registry has been built.
    pub fn is_ready(&self) -> bool {
        self.state == RegistryState::Ready
    }

    /// Configuration this registry was created with.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Get an entity by name.
    pub fn find_by_name(&self, name: &str) -> Option<&Entity> {
        self.index.get(name).map(|&position| &self.entities[position])
    }

    /// All entities, in order of first registration.
    pub fn list_all(&self) -> &[Entity] {
        &self.entities
    }

    /// Check if an entity is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Entity names, in order of first registration.
    pub fn entity_names(&self) -> impl Iterator<Item = &str> {
        self.entities.iter().map(Entity::name)
    }

    /// Number of registered entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether no entities are registered.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}
