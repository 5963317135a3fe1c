// # Provider
//
// Wires the provider settings schema, the resource registry and the client
// factory together.
//
// ## Flow
//
// 1. The orchestrator hands over provider settings as a `ResourceData`
// 2. `configure` fills env defaults, validates, builds a `ProviderConfig`
// 3. The injected `ProviderClient` factory turns it into a `ClientCaller`
// 4. Lifecycle calls are dispatched by resource kind through the registry
//
// The factory is injectable so tests can hand in an in-memory client.

use std::sync::Arc;
use std::time::Duration;

use tracker_core::config::{BASE_URL_ENV_VAR, TIMEOUT_ENV_VAR, TOKEN_ENV_VAR};
use tracker_core::{
    Error, FieldSchema, FieldType, ProviderConfig, Resource, ResourceData, ResourceRegistry,
    Result, Schema,
};
use tracker_pt::{Client, ClientCaller, DEFAULT_BASE_URL};

use crate::resources::{AccountMemberResource, ProjectResource, account_member, project};

const ACCESS_TOKEN: &str = "access_token";
const BASE_URL: &str = "base_url";
const TIMEOUT_SECS: &str = "timeout_secs";

/// Builds the API client once the provider is configured
pub type ProviderClient =
    Box<dyn Fn(&ProviderConfig) -> Result<Arc<dyn ClientCaller>> + Send + Sync>;

/// The tracker provider
pub struct Provider {
    schema: Schema,
    resources: ResourceRegistry<dyn ClientCaller>,
    client_factory: ProviderClient,
}

impl std::fmt::Debug for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Provider")
            .field("schema", &self.schema)
            .field("resources", &self.resources)
            .finish_non_exhaustive()
    }
}

/// Create the provider with the given client factory
///
/// # Example
///
/// ```rust,no_run
/// use trackerprovider::{create, pt_client};
/// use tracker_core::ResourceData;
///
/// let provider = create(pt_client);
///
/// let mut settings = ResourceData::new();
/// settings.set("access_token", "my-token");
/// let client = provider.configure(&settings)?;
/// # Ok::<(), tracker_core::Error>(())
/// ```
pub fn create<F>(client_factory: F) -> Provider
where
    F: Fn(&ProviderConfig) -> Result<Arc<dyn ClientCaller>> + Send + Sync + 'static,
{
    let resources = ResourceRegistry::new();
    resources.register_resource(project::KIND, Box::new(ProjectResource));
    resources.register_resource(account_member::KIND, Box::new(AccountMemberResource));

    Provider {
        schema: provider_schema(),
        resources,
        client_factory: Box::new(client_factory),
    }
}

/// Default client factory: the HTTP client for the configured endpoint
pub fn pt_client(config: &ProviderConfig) -> Result<Arc<dyn ClientCaller>> {
    let client = Client::with_settings(
        config.access_token.clone(),
        config.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL),
        Duration::from_secs(config.timeout_secs),
    )
    .map_err(Error::client)?;
    Ok(Arc::new(client))
}

fn provider_schema() -> Schema {
    Schema::new(
        1,
        vec![
            FieldSchema::required(ACCESS_TOKEN, FieldType::String, "Pivotal Tracker API access token")
                .sensitive()
                .env_default(TOKEN_ENV_VAR),
            FieldSchema::optional(
                BASE_URL,
                FieldType::String,
                "Base URL of the Tracker REST API, ending with '/'",
            )
            .env_default(BASE_URL_ENV_VAR),
            FieldSchema::optional(
                TIMEOUT_SECS,
                FieldType::Int,
                "HTTP timeout per API call, in seconds",
            )
            .env_default(TIMEOUT_ENV_VAR),
        ],
    )
}

impl Provider {
    /// Declared provider settings
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn resources(&self) -> &ResourceRegistry<dyn ClientCaller> {
        &self.resources
    }

    /// Look up a resource kind
    pub fn resource(&self, kind: &str) -> Result<Arc<dyn Resource<dyn ClientCaller>>> {
        self.resources.resource(kind)
    }

    /// Supported resource kinds, sorted
    pub fn resource_kinds(&self) -> Vec<String> {
        self.resources.list_resources()
    }

    /// Resolve provider settings into a validated client configuration
    pub fn config(&self, settings: &ResourceData) -> Result<ProviderConfig> {
        let mut settings = settings.clone();
        self.schema.apply_env_defaults(&mut settings);
        self.schema.validate(&settings)?;

        let mut config = ProviderConfig::new(settings.string(ACCESS_TOKEN).unwrap_or_default());

        if let Some(base_url) = settings.string(BASE_URL)
            && !base_url.is_empty()
        {
            config = config.with_base_url(base_url);
        }

        if let Some(timeout) = settings.get(TIMEOUT_SECS)
            && !timeout.is_zero()
        {
            let secs = timeout
                .expect_int::<u64>()
                .map_err(|message| Error::invalid_field(TIMEOUT_SECS, message))?;
            config = config.with_timeout_secs(secs);
        }

        config.validate()?;
        Ok(config)
    }

    /// Build the API client the resources talk to
    pub fn configure(&self, settings: &ResourceData) -> Result<Arc<dyn ClientCaller>> {
        let config = self.config(settings)?;
        tracing::debug!("Configuring tracker client: {:?}", config);
        (self.client_factory)(&config)
    }
}
