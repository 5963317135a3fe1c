// # Resource Trait
//
// Defines the lifecycle interface of one resource kind.
//
// ## Lifecycle
//
// The orchestrator drives each remote entity through
// absent -> existing -> (updated)* -> deleted by calling the five
// methods below. The identifier recorded in the `ResourceData` is the
// only link between the configuration map and the remote entity.
//
// ## Usage
//
// ```rust,ignore
// use tracker_core::{Resource, ResourceData};
//
// let mut data = ResourceData::new();
// data.set("name", "my project");
//
// resource.create(&mut data, client)?;   // records the identifier
// resource.read(&mut data, client)?;     // full overwrite from the service
// if !resource.exists(&data, client)? {
//     // drop from state
// }
// resource.delete(&data, client)?;
// ```

use crate::data::ResourceData;
use crate::error::Result;
use crate::schema::Schema;

/// Lifecycle callbacks for one resource kind
///
/// `C` is the API client capability the resource talks to. Resources hold
/// no state of their own; every call is independent and issues exactly one
/// API call.
///
/// # Failure
///
/// A failing API call leaves `data` untouched. Errors are propagated
/// without retry.
pub trait Resource<C: ?Sized>: Send + Sync {
    /// Declared configuration fields
    fn schema(&self) -> Schema;

    /// Create the remote entity from the configuration and record its
    /// identifier and returned fields
    fn create(&self, data: &mut ResourceData, client: &C) -> Result<()>;

    /// Overwrite every mapped field from the remote entity
    fn read(&self, data: &mut ResourceData, client: &C) -> Result<()>;

    /// Push the configuration to the remote entity and overwrite the
    /// mapped fields from the response
    fn update(&self, data: &mut ResourceData, client: &C) -> Result<()>;

    /// Delete the remote entity
    ///
    /// Clearing the identifier is left to the caller's bookkeeping.
    fn delete(&self, data: &ResourceData, client: &C) -> Result<()>;

    /// Whether the remote entity can currently be fetched
    fn exists(&self, data: &ResourceData, client: &C) -> Result<bool>;

    /// Adopt an existing remote entity by identifier
    ///
    /// The identifier is recorded as-is and a read fills in the rest.
    fn import(&self, id: &str, data: &mut ResourceData, client: &C) -> Result<()> {
        let mut imported = ResourceData::new();
        imported.set_id(id);
        self.read(&mut imported, client)?;
        *data = imported;
        Ok(())
    }
}
