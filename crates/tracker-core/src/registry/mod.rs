//! Resource registry
//!
//! The registry maps resource kind names (e.g. `pivotaltracker_project`) to
//! their [`Resource`] implementations, so the orchestrator can dispatch a
//! lifecycle call without a hardcoded if-else chain.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tracker_core::ResourceRegistry;
//!
//! let registry: ResourceRegistry<dyn ClientCaller> = ResourceRegistry::new();
//! registry.register_resource("pivotaltracker_project", Box::new(ProjectResource));
//!
//! let resource = registry.resource("pivotaltracker_project")?;
//! resource.create(&mut data, client.as_ref())?;
//! ```

use crate::error::{Error, Result};
use crate::traits::Resource;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Registry of resource kinds talking to a client of type `C`
///
/// ## Thread Safety
///
/// The registry uses interior mutability with RwLock, allowing concurrent
/// reads and exclusive writes.
pub struct ResourceRegistry<C: ?Sized> {
    resources: RwLock<HashMap<String, Arc<dyn Resource<C>>>>,
}

impl<C: ?Sized> Default for ResourceRegistry<C> {
    fn default() -> Self {
        Self {
            resources: RwLock::new(HashMap::new()),
        }
    }
}

impl<C: ?Sized> std::fmt::Debug for ResourceRegistry<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceRegistry")
            .field("resources", &self.list_resources())
            .finish()
    }
}

impl<C: ?Sized> ResourceRegistry<C> {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resource kind, replacing any previous one with that name
    pub fn register_resource(&self, name: impl Into<String>, resource: Box<dyn Resource<C>>) {
        let name = name.into();
        tracing::debug!("Registering resource kind: {}", name);
        let mut resources = self.resources.write().unwrap_or_else(PoisonError::into_inner);
        resources.insert(name, Arc::from(resource));
    }

    /// Look up a resource kind
    ///
    /// # Returns
    ///
    /// - `Ok(Arc<dyn Resource<C>>)`: The registered resource
    /// - `Err(Error::UnknownResource)`: Nothing registered under `name`
    pub fn resource(&self, name: &str) -> Result<Arc<dyn Resource<C>>> {
        let resources = self.resources.read().unwrap_or_else(PoisonError::into_inner);
        resources
            .get(name)
            .cloned()
            .ok_or_else(|| Error::UnknownResource(name.to_string()))
    }

    /// List all registered resource kinds, sorted by name
    pub fn list_resources(&self) -> Vec<String> {
        let resources = self.resources.read().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = resources.keys().cloned().collect();
        names.sort();
        names
    }

    /// Check if a resource kind is registered
    pub fn has_resource(&self, name: &str) -> bool {
        let resources = self.resources.read().unwrap_or_else(PoisonError::into_inner);
        resources.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        let resources = self.resources.read().unwrap_or_else(PoisonError::into_inner);
        resources.is_empty()
    }
}
