//! Resource kinds exposed by the provider

pub mod account_member;
pub mod project;

pub use account_member::AccountMemberResource;
pub use project::ProjectResource;
