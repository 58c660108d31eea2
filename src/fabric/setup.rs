//! fabric::setup
//!
//! Commands that prepare the fabric: `read_openfpga_arch`,
//! `link_openfpga_arch` and `build_fabric`.
//!
//! Registered through the procedural draft API.

use std::path::PathBuf;

use anyhow::{ensure, Context as _};

use super::{FabricContext, FabricModel};
use crate::core::command::ExecutionResult;
use crate::core::option::OptionValueType;
use crate::core::registry::{RegistryError, Shell};
use crate::core::types::{ClassId, CommandId};
use crate::core::value::ParsedOptions;

/// Name of the class holding the setup commands.
pub const CLASS_NAME: &str = "OpenFPGA";

fn read_openfpga_arch(ctx: &mut FabricContext, opts: &ParsedOptions) -> anyhow::Result<ExecutionResult> {
    let path = PathBuf::from(opts.get_str("file").context("missing --file")?);
    if !path.is_file() {
        return Ok(ExecutionResult::failed(format!(
            "architecture file '{}' not found",
            path.display()
        )));
    }

    // A new architecture invalidates anything derived from the old one.
    ctx.linked = false;
    ctx.fabric = None;
    let detail = format!("read architecture '{}'", path.display());
    ctx.arch_file = Some(path);
    Ok(ExecutionResult::success_with(detail))
}

fn link_openfpga_arch(ctx: &mut FabricContext, _opts: &ParsedOptions) -> anyhow::Result<ExecutionResult> {
    let arch = ctx
        .arch_file
        .as_ref()
        .context("no architecture has been read")?;
    let detail = format!("linked architecture '{}'", arch.display());
    ctx.linked = true;
    Ok(ExecutionResult::success_with(detail))
}

fn build_fabric(ctx: &mut FabricContext, opts: &ParsedOptions) -> anyhow::Result<ExecutionResult> {
    ensure!(ctx.linked, "architecture is not linked");

    let model = FabricModel {
        compress_routing: opts.flag("compress_routing"),
        duplicate_grid_pin: opts.flag("duplicate_grid_pin"),
        frame_view: opts.flag("frame_view"),
    };
    let detail = if opts.flag("verbose") {
        format!("built fabric {:?}", model)
    } else {
        "built fabric".to_string()
    };
    ctx.fabric = Some(model);
    Ok(ExecutionResult::success_with(detail))
}

fn add_read_arch_command(shell: &mut Shell<FabricContext>, class: ClassId) -> Result<CommandId, RegistryError> {
    let mut cmd = shell.add_command("read_openfpga_arch")?;

    // '--file' in short '-f'
    let file = cmd.add_option("file", true, "Specify the OpenFPGA architecture file")?;
    cmd.set_option_short_name(file, "f")?;
    cmd.set_option_require_value(file, OptionValueType::String)?;

    cmd.add_option("verbose", false, "Enable verbose output")?;

    let id = shell.finalize_command(cmd, "read OpenFPGA architecture file")?;
    shell.set_command_class(id, class)?;
    shell.set_command_execute_function(id, read_openfpga_arch)?;
    Ok(id)
}

fn add_link_arch_command(
    shell: &mut Shell<FabricContext>,
    class: ClassId,
    dependencies: &[CommandId],
) -> Result<CommandId, RegistryError> {
    let mut cmd = shell.add_command("link_openfpga_arch")?;
    cmd.add_option("verbose", false, "Enable verbose output")?;

    let id = shell.finalize_command(cmd, "bind OpenFPGA architecture to the device")?;
    shell.set_command_class(id, class)?;
    shell.set_command_execute_function(id, link_openfpga_arch)?;
    shell.set_command_dependency(id, dependencies)?;
    Ok(id)
}

fn add_build_fabric_command(
    shell: &mut Shell<FabricContext>,
    class: ClassId,
    dependencies: &[CommandId],
) -> Result<CommandId, RegistryError> {
    let mut cmd = shell.add_command("build_fabric")?;
    cmd.add_option("compress_routing", false, "Compress the number of unique routing modules")?;
    cmd.add_option("duplicate_grid_pin", false, "Duplicate the pins on the same side of a grid")?;
    cmd.add_option("frame_view", false, "Build only frame view of the fabric")?;
    cmd.add_option("verbose", false, "Enable verbose output")?;

    let id = shell.finalize_command(cmd, "build the module graph for the FPGA fabric")?;
    shell.set_command_class(id, class)?;
    shell.set_command_execute_function(id, build_fabric)?;
    shell.set_command_dependency(id, dependencies)?;
    Ok(id)
}

/// Register the `OpenFPGA` class and its commands.
pub fn add_setup_commands(shell: &mut Shell<FabricContext>) -> Result<(), RegistryError> {
    let class = shell.add_command_class(CLASS_NAME, "Architecture loading and fabric construction")?;

    let read = add_read_arch_command(shell, class)?;
    // 'link_openfpga_arch' must not run before 'read_openfpga_arch'
    let link = add_link_arch_command(shell, class, &[read])?;
    // 'build_fabric' must not run before 'link_openfpga_arch'
    add_build_fabric_command(shell, class, &[link])?;
    Ok(())
}
