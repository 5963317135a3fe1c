// # trackerprovider
//
// Pivotal Tracker entities exposed as declarative resources.
//
// ## Resource kinds
//
// - `pivotaltracker_project`: identifier = project id
// - `pivotaltracker_account_member`: identifier = person id, scoped by the
//   required `account_id` field
//
// Each resource kind maps its configuration map onto the typed client
// payloads with one table of field mappings, and issues exactly one API
// call per lifecycle operation.

pub mod provider;
pub mod resources;

pub use provider::{Provider, ProviderClient, create, pt_client};
pub use resources::{AccountMemberResource, ProjectResource};

/// Resource kind of projects
pub const PROJECT: &str = resources::project::KIND;

/// Resource kind of account memberships
pub const ACCOUNT_MEMBER: &str = resources::account_member::KIND;

/// The provider talking to the real Tracker API
pub fn default_provider() -> Provider {
    create(pt_client)
}
