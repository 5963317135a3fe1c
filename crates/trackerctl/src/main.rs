// # trackerctl - Tracker resource lifecycle driver
//
// This is a THIN integration layer ONLY:
// - DO NOT add field mapping or API logic here
// - All resource logic lives in trackerprovider and tracker-core
//
// trackerctl is responsible for:
// 1. Reading configuration from environment variables and flags
// 2. Configuring the provider and its API client
// 3. Keeping each resource's configuration map in a state file
// 4. Dispatching one lifecycle operation per invocation
//
// ## Configuration
//
// - `PVTL_TRACKER_TOKEN`: API access token (required for API commands)
// - `TRACKER_BASE_URL`: API base URL (optional)
// - `TRACKER_TIMEOUT_SECS`: HTTP timeout in seconds (optional)
// - `TRACKER_LOG_LEVEL`: trace, debug, info, warn or error (default info)
//
// ## Example
//
// ```bash
// export PVTL_TRACKER_TOKEN=your_token
//
// trackerctl create pivotaltracker_project main --set name=tracker --set iteration_length=2
// trackerctl update pivotaltracker_project main --set public=true
// trackerctl read pivotaltracker_project main
// trackerctl delete pivotaltracker_project main
// ```

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

use tracker_core::{FileStateStore, Resource, ResourceData, StateStore};
use tracker_pt::ClientCaller;
use trackerprovider::Provider;

/// Exit codes for different termination scenarios
///
/// - 0: Success
/// - 1: Configuration or usage error
/// - 2: Runtime error (API or state store failure)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CtlExitCode {
    Success = 0,
    ConfigError = 1,
    RuntimeError = 2,
}

impl From<CtlExitCode> for ExitCode {
    fn from(code: CtlExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

#[derive(Parser)]
#[command(name = "trackerctl")]
#[command(about = "Manage Pivotal Tracker projects and account members as resources")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// State file holding the configuration map of every managed resource
    #[arg(long, global = true, default_value = "trackerctl-state.json")]
    state: PathBuf,
}

#[derive(Subcommand)]
enum Command {
    /// Create a remote entity and start managing it
    Create {
        kind: String,
        name: String,
        /// Field assignment, `key=value` (repeatable)
        #[arg(long = "set", value_name = "KEY=VALUE")]
        set: Vec<String>,
    },
    /// Refresh a managed resource; drops it from state if it is gone
    Read { kind: String, name: String },
    /// Change fields of a managed resource
    Update {
        kind: String,
        name: String,
        /// Field assignment, `key=value` (repeatable)
        #[arg(long = "set", value_name = "KEY=VALUE")]
        set: Vec<String>,
    },
    /// Delete the remote entity and stop managing it
    Delete { kind: String, name: String },
    /// Check whether the remote entity can be fetched
    Exists { kind: String, name: String },
    /// Start managing an existing remote entity
    Import {
        kind: String,
        name: String,
        /// Identifier of the remote entity
        id: String,
    },
    /// List managed resources
    List,
    /// List supported resource kinds and their fields
    Kinds,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = match parse_log_level(
        &env::var("TRACKER_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
    ) {
        Ok(level) => level,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return CtlExitCode::ConfigError.into();
        }
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return CtlExitCode::ConfigError.into();
    }

    match run(cli) {
        Ok(()) => CtlExitCode::Success.into(),
        Err(e) => {
            let code = classify(&e);
            error!("{:#}", e);
            code.into()
        }
    }
}

fn parse_log_level(raw: &str) -> Result<Level> {
    match raw.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => Err(anyhow!(
            "TRACKER_LOG_LEVEL '{}' is not valid. Valid levels: trace, debug, info, warn, error",
            raw
        )),
    }
}

/// Map a failure to its exit code
fn classify(err: &anyhow::Error) -> CtlExitCode {
    match err.downcast_ref::<tracker_core::Error>() {
        Some(
            tracker_core::Error::Config(_)
            | tracker_core::Error::InvalidField { .. }
            | tracker_core::Error::MissingId
            | tracker_core::Error::InvalidId(_)
            | tracker_core::Error::UnknownResource(_),
        ) => CtlExitCode::ConfigError,
        _ => CtlExitCode::RuntimeError,
    }
}

fn run(cli: Cli) -> Result<()> {
    let provider = trackerprovider::default_provider();

    match cli.command {
        Command::Kinds => {
            print_kinds(&provider)?;
            return Ok(());
        }
        Command::List => {
            let store = FileStateStore::new(&cli.state)?;
            for address in store.list_records()? {
                println!("{}", address);
            }
            return Ok(());
        }
        _ => {}
    }

    let store = FileStateStore::new(&cli.state)?;
    let client = provider.configure(&ResourceData::new())?;
    let ctl = Ctl {
        provider: &provider,
        store: &store,
        client,
    };

    match cli.command {
        Command::Create { kind, name, set } => ctl.create(&kind, &name, &set),
        Command::Read { kind, name } => ctl.read(&kind, &name),
        Command::Update { kind, name, set } => ctl.update(&kind, &name, &set),
        Command::Delete { kind, name } => ctl.delete(&kind, &name),
        Command::Exists { kind, name } => ctl.exists(&kind, &name),
        Command::Import { kind, name, id } => ctl.import(&kind, &name, &id),
        Command::List | Command::Kinds => Ok(()),
    }?;

    store.flush()?;
    Ok(())
}

fn print_kinds(provider: &Provider) -> Result<()> {
    for kind in provider.resource_kinds() {
        let schema = provider.resource(&kind)?.schema();
        println!("{} (schema version {})", kind, schema.version());
        for field in schema.fields() {
            println!(
                "  {:<36} {:<6} {:<8} {}",
                field.name,
                field.field_type.to_string(),
                if field.required { "required" } else { "optional" },
                field.description
            );
        }
    }
    Ok(())
}

/// Split a `key=value` assignment
fn parse_assignment(raw: &str) -> Result<(&str, &str)> {
    raw.split_once('=')
        .map(|(key, value)| (key.trim(), value))
        .filter(|(key, _)| !key.is_empty())
        .ok_or_else(|| {
            tracker_core::Error::config(format!("expected KEY=VALUE, got `{}`", raw)).into()
        })
}

/// Apply `key=value` assignments, typed by the resource schema
fn apply_assignments(
    resource: &dyn Resource<dyn ClientCaller>,
    data: &mut ResourceData,
    assignments: &[String],
) -> Result<()> {
    let schema = resource.schema();
    for raw in assignments {
        let (key, value) = parse_assignment(raw)?;
        data.set(key, schema.parse_value(key, value)?);
    }
    schema.validate(data)?;
    Ok(())
}

fn address(kind: &str, name: &str) -> String {
    format!("{}.{}", kind, name)
}

fn print_data(data: &ResourceData) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(data)?);
    Ok(())
}

/// One invocation's wiring
struct Ctl<'a> {
    provider: &'a Provider,
    store: &'a FileStateStore,
    client: Arc<dyn ClientCaller>,
}

impl Ctl<'_> {
    fn resource(&self, kind: &str) -> Result<Arc<dyn Resource<dyn ClientCaller>>> {
        Ok(self.provider.resource(kind)?)
    }

    /// Stored configuration map of a managed resource
    fn managed(&self, address: &str) -> Result<ResourceData> {
        self.store
            .get_data(address)?
            .ok_or_else(|| anyhow!("{} is not managed (see `trackerctl list`)", address))
    }

    fn create(&self, kind: &str, name: &str, assignments: &[String]) -> Result<()> {
        let resource = self.resource(kind)?;
        let address = address(kind, name);
        if self.store.get_data(&address)?.is_some() {
            return Err(tracker_core::Error::config(format!("{} is already managed", address)).into());
        }

        let mut data = ResourceData::new();
        apply_assignments(resource.as_ref(), &mut data, assignments)?;

        resource
            .create(&mut data, self.client.as_ref())
            .with_context(|| format!("create {}", address))?;

        self.store.set_data(&address, &data)?;
        info!("{} created with id {}", address, data.id().unwrap_or_default());
        print_data(&data)
    }

    fn read(&self, kind: &str, name: &str) -> Result<()> {
        let resource = self.resource(kind)?;
        let address = address(kind, name);
        let mut data = self.managed(&address)?;

        if !resource.exists(&data, self.client.as_ref())? {
            warn!("{} no longer exists, dropping it from state", address);
            self.store.delete_record(&address)?;
            return Ok(());
        }

        resource
            .read(&mut data, self.client.as_ref())
            .with_context(|| format!("read {}", address))?;

        self.store.set_data(&address, &data)?;
        print_data(&data)
    }

    fn update(&self, kind: &str, name: &str, assignments: &[String]) -> Result<()> {
        let resource = self.resource(kind)?;
        let address = address(kind, name);
        let mut data = self.managed(&address)?;

        apply_assignments(resource.as_ref(), &mut data, assignments)?;

        resource
            .update(&mut data, self.client.as_ref())
            .with_context(|| format!("update {}", address))?;

        self.store.set_data(&address, &data)?;
        print_data(&data)
    }

    fn delete(&self, kind: &str, name: &str) -> Result<()> {
        let resource = self.resource(kind)?;
        let address = address(kind, name);
        let data = self.managed(&address)?;

        resource
            .delete(&data, self.client.as_ref())
            .with_context(|| format!("delete {}", address))?;

        self.store.delete_record(&address)?;
        info!("{} deleted", address);
        Ok(())
    }

    fn exists(&self, kind: &str, name: &str) -> Result<()> {
        let resource = self.resource(kind)?;
        let data = self.managed(&address(kind, name))?;

        println!("{}", resource.exists(&data, self.client.as_ref())?);
        Ok(())
    }

    fn import(&self, kind: &str, name: &str, id: &str) -> Result<()> {
        let resource = self.resource(kind)?;
        let address = address(kind, name);

        let mut data = ResourceData::new();
        resource
            .import(id, &mut data, self.client.as_ref())
            .with_context(|| format!("import {} as {}", id, address))?;

        self.store.set_data(&address, &data)?;
        info!("{} imported", address);
        print_data(&data)
    }
}
