//! ui
//!
//! User interaction utilities.
//!
//! # Modules
//!
//! - [`output`] - Output formatting and display
//! - [`help`] - Command listings and per-command help from the schema
//!
//! # Design
//!
//! All session output goes through this module so that quiet/debug modes
//! are honored uniformly and sessions can be driven against buffers.

pub mod help;
pub mod output;
