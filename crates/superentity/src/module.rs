//! Module lifecycle wrapper around the entity registry.
//!
//! The host creates the module once with [`SuperEntityModule::for_root`],
//! calls [`SuperEntityModule::on_module_init`] when its inventory is fully
//! populated, and hands [`SuperEntityModule::registry`] handles to consumers.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{info, warn};

use superentity_core::{Entity, EntityRegistry, ModelSource, RegistryConfig, RegistryState};

use crate::error::ModuleError;

enum Slot {
    Uninitialized,
    Building,
    Ready(Arc<EntityRegistry>),
}

/// Owns the registry for one host process.
pub struct SuperEntityModule {
    config: RegistryConfig,
    slot: RwLock<Slot>,
}

impl SuperEntityModule {
    /// Create the module with the given registry configuration.
    pub fn for_root(config: RegistryConfig) -> Self {
        Self {
            config,
            slot: RwLock::new(Slot::Uninitialized),
        }
    }

    /// Initialization hook: scan the inventory and build the registry.
    ///
    /// The build runs without holding the slot lock, so concurrent lookups
    /// see "not found" until it completes. Calling this again after the
    /// build returns the existing registry. If the build panics the module
    /// goes back to uninitialized.
    pub fn on_module_init<'a, S, I>(&self, items: I) -> Result<Arc<EntityRegistry>, ModuleError>
    where
        S: ModelSource + ?Sized + 'a,
        I: IntoIterator<Item = &'a S>,
    {
        {
            let mut slot = self.slot.write();
            if let Slot::Ready(registry) = &*slot {
                warn!("module already initialized, keeping existing registry");
                return Ok(Arc::clone(registry));
            }
            if matches!(*slot, Slot::Building) {
                return Err(ModuleError::InitInProgress);
            }
            *slot = Slot::Building;
        }

        let mut guard = BuildGuard {
            slot: &self.slot,
            armed: true,
        };

        info!("initializing entity registry");
        let registry = Arc::new(EntityRegistry::from_inventory(self.config.clone(), items));
        *self.slot.write() = Slot::Ready(Arc::clone(&registry));
        guard.armed = false;
        Ok(registry)
    }

    /// Lifecycle state of the owned registry.
    pub fn state(&self) -> RegistryState {
        match &*self.slot.read() {
            Slot::Uninitialized => RegistryState::Uninitialized,
            Slot::Building => RegistryState::Building,
            Slot::Ready(_) => RegistryState::Ready,
        }
    }

    /// Shared handle to the registry, once built.
    pub fn registry(&self) -> Option<Arc<EntityRegistry>> {
        match &*self.slot.read() {
            Slot::Ready(registry) => Some(Arc::clone(registry)),
            _ => None,
        }
    }

    /// Look up an entity; `None` before initialization.
    pub fn find_by_name(&self, name: &str) -> Option<Entity> {
        self.registry()
            .and_then(|registry| registry.find_by_name(name).cloned())
    }

    /// All entities; empty before initialization.
    pub fn list_all(&self) -> Vec<Entity> {
        self.registry()
            .map(|registry| registry.list_all().to_vec())
            .unwrap_or_default()
    }
}

/// Resets a `Building` slot when the build does not finish.
struct BuildGuard<'a> {
    slot: &'a RwLock<Slot>,
    armed: bool,
}

impl Drop for BuildGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            warn!("entity registry build aborted, module left uninitialized");
            *self.slot.write() = Slot::Uninitialized;
        }
    }
}

impl Default for SuperEntityModule {
    fn default() -> Self {
        Self::for_root(RegistryConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::panic::{self, AssertUnwindSafe};
    use std::sync::Barrier;
    use std::thread;
    use superentity_core::{ModelDescriptor, ProviderInstance, RawSchema};

    /// A model source that blocks inside the build until released.
    struct Gated {
        entered: Arc<Barrier>,
        release: Arc<Barrier>,
    }

    impl ModelSource for Gated {
        fn as_model(&self) -> Option<ModelDescriptor> {
            self.entered.wait();
            self.release.wait();
            Some(ModelDescriptor::new("Gated", RawSchema::new()))
        }
    }

    struct Failing;

    impl ModelSource for Failing {
        fn as_model(&self) -> Option<ModelDescriptor> {
            panic!("inventory item could not be read");
        }
    }

    fn items() -> Vec<ProviderInstance> {
        vec![
            ProviderInstance::new(json!({ "router": {} })),
            ProviderInstance::new(json!({
                "modelName": "User",
                "schema": { "obj": { "name": { "type": "String" } } }
            })),
        ]
    }

    #[test]
    fn test_lookups_before_init() {
        let module = SuperEntityModule::default();

        assert_eq!(module.state(), RegistryState::Uninitialized);
        assert!(module.registry().is_none());
        assert!(module.find_by_name("User").is_none());
        assert!(module.list_all().is_empty());
    }

    #[test]
    fn test_init() {
        let module = SuperEntityModule::default();
        let registry = module.on_module_init(&items()).unwrap();

        assert_eq!(module.state(), RegistryState::Ready);
        assert_eq!(registry.len(), 1);
        assert_eq!(module.find_by_name("User").map(|e| e.len()), Some(1));
        assert_eq!(module.list_all().len(), 1);
    }

    #[test]
    fn test_second_init_keeps_registry() {
        let module = SuperEntityModule::default();
        let first = module.on_module_init(&items()).unwrap();

        let more = vec![ProviderInstance::new(json!({ "modelName": "Post", "schema": {} }))];
        let second = module.on_module_init(&more).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert!(module.find_by_name("Post").is_none());
    }

    #[test]
    fn test_init_while_building() {
        let module = Arc::new(SuperEntityModule::default());
        let entered = Arc::new(Barrier::new(2));
        let release = Arc::new(Barrier::new(2));

        let builder = {
            let module = Arc::clone(&module);
            let gated = Gated {
                entered: Arc::clone(&entered),
                release: Arc::clone(&release),
            };
            thread::spawn(move || module.on_module_init([&gated]).map(|r| r.len()))
        };

        entered.wait();
        assert_eq!(module.state(), RegistryState::Building);
        assert!(module.registry().is_none());
        assert!(module.find_by_name("Gated").is_none());
        assert!(module.list_all().is_empty());
        assert!(matches!(
            module.on_module_init(&items()),
            Err(ModuleError::InitInProgress)
        ));
        release.wait();

        assert_eq!(builder.join().unwrap().unwrap(), 1);
        assert_eq!(module.state(), RegistryState::Ready);
        assert!(module.find_by_name("Gated").is_some());
        assert!(module.find_by_name("User").is_none());
    }

    #[test]
    fn test_panicking_build_can_be_retried() {
        let module = SuperEntityModule::default();

        let result = panic::catch_unwind(AssertUnwindSafe(|| module.on_module_init([&Failing])));
        assert!(result.is_err());
        assert_eq!(module.state(), RegistryState::Uninitialized);
        assert!(module.registry().is_none());

        let registry = module.on_module_init(&items()).unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(module.state(), RegistryState::Ready);
    }
}
