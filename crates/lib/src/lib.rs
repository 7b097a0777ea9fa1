//! Skills Bank client library — credential and parameter schema, typed actions,
//! the HTTP client, and per-item dispatch used by the CLI.

pub mod action;
pub mod client;
pub mod config;
pub mod credentials;
pub mod dispatch;
pub mod group;
pub mod init;
pub mod schema;

pub use action::{Action, Options};
pub use client::{SkillsApi, SkillsBankClient, SkillsBankError};
pub use credentials::Credentials;
pub use dispatch::{run_items, ItemError};
pub use schema::{Operation, Resource, Selection};
