//! fabric::verilog
//!
//! The `FPGA-Verilog` command class.
//!
//! # Commands
//!
//! | Command | Writes |
//! |---------|--------|
//! | `write_fabric_verilog` | netlists modeling the full fabric |
//! | `write_verilog_testbench` | testbenches for the full fabric |
//! | `write_full_testbench` | a full testbench with a bitstream loaded |
//! | `write_preconfigured_fabric_wrapper` | a wrapper for a pre-configured fabric |
//! | `write_preconfigured_testbench` | testbenches for a pre-configured fabric |
//! | `write_simulation_task_info` | a simulation task configuration file |
//!
//! Every command depends on `build_fabric`, which must already be
//! registered. Commands are described declaratively with [`CommandSpec`]
//! and registered in table order.

use std::path::PathBuf;

use anyhow::Context as _;

use super::{Artifact, ArtifactKind, FabricContext};
use crate::core::command::{CommandSpec, ExecutionResult};
use crate::core::option::{OptionSpec, OptionValueType};
use crate::core::registry::{RegistryError, Shell};
use crate::core::value::ParsedOptions;

/// Name of the class holding the writer commands.
pub const CLASS_NAME: &str = "FPGA-Verilog";

/// Command every writer depends on.
pub const FABRIC_COMMAND: &str = "build_fabric";

fn string_option(name: &str, help: &str) -> OptionSpec {
    OptionSpec::value(name, OptionValueType::String).help(help)
}

fn flag(name: &str, help: &str) -> OptionSpec {
    OptionSpec::flag(name).help(help)
}

fn pin_constraints(help: &str) -> OptionSpec {
    string_option("pin_constraints_file", help).short("pcf")
}

fn write_fabric_verilog() -> CommandSpec {
    CommandSpec::new(
        "write_fabric_verilog",
        "generate Verilog netlists modeling full FPGA fabric",
    )
    .option(
        string_option("file", "Specify the output directory for Verilog netlists")
            .short("f")
            .required(),
    )
    .option(flag(
        "explicit_port_mapping",
        "Use explicit port mapping in Verilog netlists",
    ))
    .option(flag(
        "include_timing",
        "Enable timing annotation in Verilog netlists",
    ))
    .option(flag(
        "print_user_defined_template",
        "Generate a template Verilog files for user-defined circuit models",
    ))
    .option(string_option(
        "default_net_type",
        "Set the default net type for Verilog netlists. Default value is 'none'",
    ))
    .option(flag("verbose", "Enable verbose output"))
}

fn write_verilog_testbench() -> CommandSpec {
    CommandSpec::new(
        "write_verilog_testbench",
        "generate Verilog testbenches for full FPGA fabric",
    )
    .option(
        string_option("file", "Specify the output directory for Verilog netlists")
            .short("f")
            .required(),
    )
    .option(string_option(
        "fabric_netlist_file_path",
        "Specify the file path to the fabric Verilog netlist",
    ))
    .option(pin_constraints("Specify the file path to the pin constraints"))
    .option(
        string_option(
            "reference_benchmark_file_path",
            "Specify the file path to the reference Verilog netlist",
        )
        .required(),
    )
    .option(flag(
        "print_top_testbench",
        "Generate a full testbench for top-level fabric module with autocheck capability",
    ))
    .option(flag(
        "fast_configuration",
        "Reduce the period of configuration by skip zero data points",
    ))
    .option(flag(
        "print_formal_verification_top_netlist",
        "Generate a top-level module which can be used in formal verification",
    ))
    .option(flag(
        "print_preconfig_top_testbench",
        "Generate a pre-configured testbench for top-level fabric module with autocheck capability",
    ))
    .option(string_option(
        "print_simulation_ini",
        "Generate a .ini file as an exchangeable file to enable HDL simulations",
    ))
    .option(flag(
        "explicit_port_mapping",
        "Use explicit port mapping in Verilog netlists",
    ))
    .option(flag(
        "include_signal_init",
        "Initialize all the signals in Verilog testbenches",
    ))
    .option(flag(
        "support_icarus_simulator",
        "Fine-tune Verilog testbenches to support icarus simulator",
    ))
    .option(flag("verbose", "Enable verbose output"))
}

fn write_full_testbench() -> CommandSpec {
    CommandSpec::new(
        "write_full_testbench",
        "generate full testbenches for an fpga fabric",
    )
    .option(
        string_option("file", "specify the output directory for hdl netlists")
            .short("f")
            .required(),
    )
    .option(
        string_option(
            "bitstream",
            "specify the bitstream to be loaded in the testbench",
        )
        .required(),
    )
    .option(string_option(
        "fabric_netlist_file_path",
        "specify the file path to the fabric hdl netlist",
    ))
    .option(pin_constraints("specify the file path to the pin constraints"))
    .option(
        string_option(
            "reference_benchmark_file_path",
            "specify the file path to the reference verilog netlist",
        )
        .required(),
    )
    .option(flag(
        "fast_configuration",
        "reduce the period of configuration by skip certain data points",
    ))
    .option(flag(
        "explicit_port_mapping",
        "use explicit port mapping in verilog netlists",
    ))
    .option(flag(
        "include_signal_init",
        "initialize all the signals in verilog testbenches",
    ))
    .option(flag("verbose", "enable verbose output"))
}

fn write_preconfigured_fabric_wrapper() -> CommandSpec {
    CommandSpec::new(
        "write_preconfigured_fabric_wrapper",
        "generate a wrapper for a pre-configured fpga fabric",
    )
    .option(
        string_option("file", "specify the output directory for hdl netlists")
            .short("f")
            .required(),
    )
    .option(string_option(
        "fabric_netlist_file_path",
        "specify the file path to the fabric hdl netlist",
    ))
    .option(pin_constraints("specify the file path to the pin constraints"))
    .option(flag(
        "explicit_port_mapping",
        "use explicit port mapping in verilog netlists",
    ))
    .option(flag(
        "support_icarus_simulator",
        "Fine-tune Verilog testbenches to support icarus simulator",
    ))
    .option(flag("verbose", "enable verbose output"))
}

fn write_preconfigured_testbench() -> CommandSpec {
    CommandSpec::new(
        "write_preconfigured_testbench",
        "generate testbenches for a preconfigured FPGA fabric",
    )
    .option(
        string_option("file", "Specify the output directory for HDL netlists")
            .short("f")
            .required(),
    )
    .option(pin_constraints("Specify the file path to the pin constraints"))
    .option(
        string_option(
            "reference_benchmark_file_path",
            "Specify the file path to the reference Verilog netlist",
        )
        .required(),
    )
    .option(flag(
        "explicit_port_mapping",
        "Use explicit port mapping in Verilog netlists",
    ))
    .option(flag("verbose", "Enable verbose output"))
}

fn write_simulation_task_info() -> CommandSpec {
    CommandSpec::new(
        "write_simulation_task_info",
        "generate an interchangable simulation task configuration file",
    )
    .option(
        string_option(
            "file",
            "Specify the file path to output simulation-related information",
        )
        .short("f")
        .required(),
    )
    .option(
        string_option(
            "reference_benchmark_file_path",
            "Specify the file path to the reference Verilog netlist",
        )
        .required(),
    )
    .option(flag("verbose", "Enable verbose output"))
}

/// Execute function shared by every writer: check the fabric is present
/// and record what would be written.
fn writer(
    kind: ArtifactKind,
) -> impl Fn(&mut FabricContext, &ParsedOptions) -> anyhow::Result<ExecutionResult> {
    move |ctx, opts| {
        if ctx.fabric.is_none() {
            return Ok(ExecutionResult::failed(
                "fabric has not been built for the current architecture",
            ));
        }
        let path = PathBuf::from(opts.get_str("file").context("missing --file")?);
        let detail = format!("planned {} in '{}'", kind, path.display());

        ctx.artifacts.push(Artifact {
            kind,
            path,
            options: opts.clone(),
        });
        Ok(ExecutionResult::success_with(detail))
    }
}

/// Register the `FPGA-Verilog` class and its commands.
///
/// The prerequisite, the class name and every command name are checked
/// before anything is added, so a conflict with an earlier registration
/// leaves the shell untouched. The specs themselves are fixed and valid.
///
/// # Errors
///
/// - `RegistryError::NotFound` if `build_fabric` is not registered yet
/// - `RegistryError::DuplicateClass` if `FPGA-Verilog` already exists
/// - `RegistryError::DuplicateCommand` if any writer name is taken
pub fn add_verilog_commands(shell: &mut Shell<FabricContext>) -> Result<(), RegistryError> {
    shell.command_from_name(FABRIC_COMMAND)?;
    if shell.command_class(CLASS_NAME).is_ok() {
        return Err(RegistryError::DuplicateClass(CLASS_NAME.to_string()));
    }

    let commands = [
        (write_fabric_verilog(), ArtifactKind::FabricNetlist),
        (write_verilog_testbench(), ArtifactKind::VerilogTestbench),
        (write_full_testbench(), ArtifactKind::FullTestbench),
        (
            write_preconfigured_fabric_wrapper(),
            ArtifactKind::PreconfiguredFabricWrapper,
        ),
        (
            write_preconfigured_testbench(),
            ArtifactKind::PreconfiguredTestbench,
        ),
        (write_simulation_task_info(), ArtifactKind::SimulationTaskInfo),
    ];
    if let Some((spec, _)) = commands
        .iter()
        .find(|(spec, _)| shell.command_by_name(&spec.name).is_some())
    {
        return Err(RegistryError::DuplicateCommand(spec.name.clone()));
    }

    shell.add_command_class(CLASS_NAME, "Verilog netlist and testbench writers")?;
    for (spec, kind) in commands {
        let spec = spec.class(CLASS_NAME).depends_on(FABRIC_COMMAND);
        shell.register(spec, writer(kind))?;
    }
    Ok(())
}
