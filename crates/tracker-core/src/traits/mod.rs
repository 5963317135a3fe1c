//! Core traits for the tracker provider
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`Resource`]: Lifecycle callbacks of one resource kind
//! - [`StateStore`]: Persistence of configuration maps between runs

pub mod resource;
pub mod state_store;

pub use resource::Resource;
pub use state_store::{StateRecord, StateStore};
