//! Typed operations of the tracker API
//!
//! Each operation builds exactly one request through the [`RequestDoer`],
//! executes it, and decodes the body. A construction failure is returned
//! before any I/O; an execution failure is returned unchanged.

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

use crate::doer::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT, HttpRequestDoer, RequestDoer};
use crate::error::{Error, Result};
use crate::types::{AccountMember, AccountMemberRequest, Project, ProjectRequest, ProjectsRequest};

/// Project operations
pub trait ProjectCaller: Send + Sync {
    /// All active projects of the current user
    fn list_projects(&self) -> Result<Vec<Project>>;
    fn get_project(&self, project_id: u64) -> Result<Project>;
    fn new_project(&self, project: &ProjectsRequest) -> Result<Project>;
    fn update_project(&self, project_id: u64, project: &ProjectRequest) -> Result<Project>;
    fn delete_project(&self, project_id: u64) -> Result<()>;
}

/// Account membership operations
pub trait AccountMemberCaller: Send + Sync {
    fn list_account_members(&self, account_id: u64) -> Result<Vec<AccountMember>>;
    fn get_account_member(&self, account_id: u64, member_id: u64) -> Result<AccountMember>;
    fn new_account_member(
        &self,
        account_id: u64,
        member: &AccountMemberRequest,
    ) -> Result<AccountMember>;
    fn update_account_member(
        &self,
        account_id: u64,
        member_id: u64,
        member: &AccountMemberRequest,
    ) -> Result<AccountMember>;
    fn delete_account_member(&self, account_id: u64, member_id: u64) -> Result<()>;
}

/// Every capability the resources depend on
pub trait ClientCaller: ProjectCaller + AccountMemberCaller {}

impl<T: ProjectCaller + AccountMemberCaller + ?Sized> ClientCaller for T {}

/// API client over a [`RequestDoer`]
#[derive(Clone)]
pub struct Client {
    doer: Arc<dyn RequestDoer>,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client").finish_non_exhaustive()
    }
}

impl Client {
    /// Client for the public API endpoint
    pub fn new(token: impl Into<String>) -> Result<Self> {
        Self::with_settings(token, DEFAULT_BASE_URL, DEFAULT_TIMEOUT)
    }

    /// Client for an explicit endpoint and timeout
    pub fn with_settings(
        token: impl Into<String>,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self> {
        Ok(Self::with_doer(HttpRequestDoer::new(token, base_url, timeout)?))
    }

    /// Client over a custom transport (test doubles, proxies)
    pub fn with_doer(doer: impl RequestDoer + 'static) -> Self {
        Self {
            doer: Arc::new(doer),
        }
    }

    fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&dyn erased::Body>,
    ) -> Result<T> {
        let body = body.map(|b| b.to_json()).transpose()?;
        let request = self.doer.new_request(method, path, body)?;
        let value = self.doer.do_request(request)?;
        serde_json::from_value(value).map_err(|e| Error::decode(e.to_string()))
    }

    fn call_empty(&self, method: Method, path: &str) -> Result<()> {
        let request = self.doer.new_request(method, path, None)?;
        self.doer.do_request(request)?;
        Ok(())
    }
}

mod erased {
    use super::{Error, Result, Serialize};

    /// Object-safe view of a request body
    pub(super) trait Body {
        fn to_json(&self) -> Result<serde_json::Value>;
    }

    impl<T: Serialize> Body for T {
        fn to_json(&self) -> Result<serde_json::Value> {
            serde_json::to_value(self)
                .map_err(|e| Error::request(format!("failed to serialize body: {e}")))
        }
    }
}

impl ProjectCaller for Client {
    fn list_projects(&self) -> Result<Vec<Project>> {
        self.call(Method::GET, "projects", None)
    }

    fn get_project(&self, project_id: u64) -> Result<Project> {
        self.call(Method::GET, &format!("projects/{project_id}"), None)
    }

    fn new_project(&self, project: &ProjectsRequest) -> Result<Project> {
        self.call(Method::POST, "projects", Some(project))
    }

    fn update_project(&self, project_id: u64, project: &ProjectRequest) -> Result<Project> {
        self.call(Method::PUT, &format!("projects/{project_id}"), Some(project))
    }

    fn delete_project(&self, project_id: u64) -> Result<()> {
        self.call_empty(Method::DELETE, &format!("projects/{project_id}"))
    }
}

impl AccountMemberCaller for Client {
    fn list_account_members(&self, account_id: u64) -> Result<Vec<AccountMember>> {
        self.call(Method::GET, &format!("accounts/{account_id}/memberships"), None)
    }

    fn get_account_member(&self, account_id: u64, member_id: u64) -> Result<AccountMember> {
        self.call(
            Method::GET,
            &format!("accounts/{account_id}/memberships/{member_id}"),
            None,
        )
    }

    fn new_account_member(
        &self,
        account_id: u64,
        member: &AccountMemberRequest,
    ) -> Result<AccountMember> {
        self.call(
            Method::POST,
            &format!("accounts/{account_id}/memberships"),
            Some(member),
        )
    }

    fn update_account_member(
        &self,
        account_id: u64,
        member_id: u64,
        member: &AccountMemberRequest,
    ) -> Result<AccountMember> {
        self.call(
            Method::PUT,
            &format!("accounts/{account_id}/memberships/{member_id}"),
            Some(member),
        )
    }

    fn delete_account_member(&self, account_id: u64, member_id: u64) -> Result<()> {
        self.call_empty(
            Method::DELETE,
            &format!("accounts/{account_id}/memberships/{member_id}"),
        )
    }
}
