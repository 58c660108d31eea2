//! Stageshell - a staged command shell with dependency-gated dispatch
//!
//! Stageshell hosts a registry of named commands for a multi-stage tool
//! flow. Each command declares its options, belongs to a class, and names
//! the commands that must succeed before it may run. A session dispatches
//! command lines against the registry and refuses any command whose
//! prerequisites have not succeeded yet.
//!
//! # Architecture
//!
//! The codebase follows a strict layered architecture:
//!
//! - [`cli`] - Command-line interface layer (parses args, drives sessions)
//! - [`engine`] - Resolve → Gate → Parse → Execute → Record dispatch lifecycle
//! - [`core`] - Registry, option schema, dependency graph and config
//! - [`fabric`] - Sample payload: OpenFPGA setup and Verilog writer commands
//! - [`ui`] - User interaction utilities
//!
//! # Correctness Invariants
//!
//! Stageshell maintains the following invariants:
//!
//! 1. A command runs only after all of its prerequisites succeeded in the
//!    same session
//! 2. Options are validated against the schema before a command runs
//! 3. Every execution attempt is recorded, and only by the dispatcher
//! 4. The dependency graph is acyclic

pub mod cli;
pub mod core;
pub mod engine;
pub mod fabric;
pub mod ui;
