//! fabric
//!
//! Sample payload: an OpenFPGA-style command catalog.
//!
//! # Overview
//!
//! This module registers a realistic set of commands on a
//! [`Shell<FabricContext>`] to exercise the registry and dispatcher:
//!
//! - [`setup`] - class `OpenFPGA`: architecture loading and fabric build
//! - [`verilog`] - class `FPGA-Verilog`: netlist and testbench writers
//!
//! The generation algorithms themselves are out of scope. Execute functions
//! validate the context they depend on and record an [`Artifact`]
//! describing what would be written.
//!
//! # Context freshness
//!
//! The dispatcher only checks that prerequisites succeeded at some point
//! in the session. Re-reading the architecture clears the fabric in the
//! context, so writers check the context themselves and fail if the fabric
//! is gone.

pub mod setup;
pub mod verilog;

use std::path::PathBuf;

use serde::Serialize;

use crate::core::registry::{RegistryError, Shell};
use crate::core::value::ParsedOptions;

/// Settings captured by `build_fabric`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FabricModel {
    pub compress_routing: bool,
    pub duplicate_grid_pin: bool,
    pub frame_view: bool,
}

/// Kind of output a writer command produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    FabricNetlist,
    VerilogTestbench,
    FullTestbench,
    PreconfiguredFabricWrapper,
    PreconfiguredTestbench,
    SimulationTaskInfo,
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ArtifactKind::FabricNetlist => "fabric netlists",
            ArtifactKind::VerilogTestbench => "Verilog testbenches",
            ArtifactKind::FullTestbench => "full testbench",
            ArtifactKind::PreconfiguredFabricWrapper => "preconfigured fabric wrapper",
            ArtifactKind::PreconfiguredTestbench => "preconfigured testbench",
            ArtifactKind::SimulationTaskInfo => "simulation task info",
        };
        write!(f, "{}", s)
    }
}

/// An output planned by a writer command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Artifact {
    pub kind: ArtifactKind,
    pub path: PathBuf,
    pub options: ParsedOptions,
}

/// Shared state of a fabric session.
#[derive(Debug, Clone, Default)]
pub struct FabricContext {
    /// Architecture file loaded by `read_openfpga_arch`
    pub arch_file: Option<PathBuf>,
    /// Set by `link_openfpga_arch`
    pub linked: bool,
    /// Built by `build_fabric`
    pub fabric: Option<FabricModel>,
    /// Outputs recorded by writer commands, in order
    pub artifacts: Vec<Artifact>,
}

impl FabricContext {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Register every fabric command class and command.
pub fn register_commands(shell: &mut Shell<FabricContext>) -> Result<(), RegistryError> {
    setup::add_setup_commands(shell)?;
    verilog::add_verilog_commands(shell)?;
    Ok(())
}

/// Build a registry holding the full fabric catalog.
pub fn shell() -> Result<Shell<FabricContext>, RegistryError> {
    let mut shell = Shell::new();
    register_commands(&mut shell)?;
    shell.validate()?;
    Ok(shell)
}
