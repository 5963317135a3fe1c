// # tracker-core
//
// Core library for managing Pivotal Tracker entities as declarative
// resources.
//
// ## Architecture Overview
//
// This library provides the provider-agnostic building blocks:
// - **ResourceData**: The configuration map of one managed entity
// - **Schema**: Declared fields of a resource kind, with validation
// - **FieldMapping**: Table-driven conversion between configuration maps
//   and typed API payloads
// - **Resource**: Trait for the lifecycle callbacks of one resource kind
// - **ResourceRegistry**: Registry of resource kinds, no hard-coded if-else
// - **StateStore**: Trait for persisting configuration maps between runs
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Core logic is separate from the API client
// 2. **Table-Driven**: Every field conversion is declared once per resource
// 3. **Plugin-Based**: Resource kinds are registered dynamically
// 4. **Library-First**: All core functionality can be used as a library

pub mod config;
pub mod data;
pub mod error;
pub mod mapping;
pub mod registry;
pub mod schema;
pub mod state;
pub mod traits;

// Re-export core types for convenience
pub use config::ProviderConfig;
pub use data::{ResourceData, Value};
pub use error::{Error, Result};
pub use mapping::FieldMapping;
pub use registry::ResourceRegistry;
pub use schema::{FieldSchema, FieldType, Schema};
pub use state::{FileStateStore, MemoryStateStore};
pub use traits::{Resource, StateRecord, StateStore};
