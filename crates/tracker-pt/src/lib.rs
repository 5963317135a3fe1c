// # tracker-pt
//
// Typed client for the Pivotal Tracker REST API v5.
//
// ## Structure
//
// - **RequestDoer**: transport seam (build a request, execute it)
// - **HttpRequestDoer**: blocking reqwest implementation, authenticated
//   with the `X-TrackerToken` header
// - **ProjectCaller / AccountMemberCaller**: typed operations per resource
//   family, combined as **ClientCaller**
// - **Client**: the operations implemented over any `RequestDoer`
//
// ## Constraints
//
// - One HTTP round trip per operation
// - Errors are returned unchanged, nothing is retried
// - 404 on delete is an error like any other
//
// ## Example
//
// ```rust,no_run
// use tracker_pt::{Client, ProjectCaller};
//
// let client = Client::new("my-token")?;
// for project in client.list_projects()? {
//     println!("{} {}", project.id, project.name);
// }
// # Ok::<(), tracker_pt::Error>(())
// ```

pub mod client;
pub mod doer;
pub mod error;
pub mod types;

pub use client::{AccountMemberCaller, Client, ClientCaller, ProjectCaller};
pub use doer::{ApiRequest, DEFAULT_BASE_URL, DEFAULT_TIMEOUT, HttpRequestDoer, RequestDoer};
pub use error::{Error, Result};
pub use reqwest::Method;
pub use types::{
    AccountMember, AccountMemberRequest, Day, PROJECT_MEMBER, PROJECT_OWNER,
    PROJECT_VIEWER, Person, Project, ProjectRequest, ProjectsRequest, TimeZone,
};
