//! core
//!
//! Core domain types and the command registry.
//!
//! # Modules
//!
//! - [`types`] - Strong types: CommandName, OptionName, ids
//! - [`option`] - Option descriptors and value types
//! - [`value`] - Parsed option values
//! - [`command`] - Command drafts, descriptors, specs, execute contract
//! - [`class`] - Command classes
//! - [`graph`] - Dependency graph
//! - [`registry`] - The command registry (`Shell`)
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid names at construction time
//! - Schemas are data: every command can be described and exported as a spec
//! - Registration errors are programmer errors and fail fast

pub mod class;
pub mod command;
pub mod config;
pub mod graph;
pub mod option;
pub mod registry;
pub mod types;
pub mod value;
