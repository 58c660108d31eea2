//! Integration tests for the command registry.
//!
//! These tests exercise the public registration protocol end to end:
//! classes, drafts, options, execute functions and dependencies.

use stageshell::core::command::{CommandSpec, ExecutionResult};
use stageshell::core::option::OptionValueType;
use stageshell::core::registry::{RegistryError, Shell};
use stageshell::fabric::{self, FabricContext};

fn noop(_: &mut (), _: &stageshell::core::value::ParsedOptions) -> anyhow::Result<ExecutionResult> {
    Ok(ExecutionResult::success())
}

// =============================================================================
// Procedural registration
// =============================================================================

#[test]
fn procedural_registration_round_trip() {
    let mut shell: Shell<()> = Shell::new();
    let class = shell.add_command_class("FPGA-Verilog", "").unwrap();

    let draft = shell.add_command("build_fabric").unwrap();
    let build = shell.finalize_command(draft, "build the fabric").unwrap();
    shell.set_command_execute_function(build, noop).unwrap();

    let mut draft = shell.add_command("write_fabric_verilog").unwrap();
    let file = draft
        .add_option("file", true, "Specify the output directory for Verilog netlists")
        .unwrap();
    draft.set_option_short_name(file, "f").unwrap();
    draft
        .set_option_require_value(file, OptionValueType::String)
        .unwrap();
    let net = draft.add_option("default_net_type", false, "").unwrap();
    draft
        .set_option_require_value(net, OptionValueType::String)
        .unwrap();
    draft.add_option("verbose", false, "Enable verbose output").unwrap();

    let write = shell
        .finalize_command(draft, "generate Verilog netlists modeling full FPGA fabric")
        .unwrap();
    shell.set_command_class(write, class).unwrap();
    shell.set_command_execute_function(write, noop).unwrap();
    let build_id = shell.command_from_name("build_fabric").unwrap();
    shell.set_command_dependency(write, &[build_id]).unwrap();

    assert!(shell.validate().is_ok());

    let cmd = shell.command(write).unwrap();
    assert_eq!(cmd.class(), Some(class));
    assert_eq!(cmd.dependencies(), &[build]);
    let names: Vec<_> = cmd.options().iter().map(|o| o.name().to_string()).collect();
    assert_eq!(names, ["file", "default_net_type", "verbose"]);
    assert_eq!(cmd.option_by_short("f").unwrap().id(), file);
    assert!(cmd.option("default_net_type").unwrap().requires_value());
    assert!(!cmd.option("verbose").unwrap().requires_value());
}

#[test]
fn registration_errors_leave_registry_unchanged() {
    let mut shell: Shell<()> = Shell::new();
    let draft = shell.add_command("build_fabric").unwrap();
    shell.finalize_command(draft, "").unwrap();

    assert_eq!(
        shell.add_command("build_fabric").unwrap_err(),
        RegistryError::DuplicateCommand("build_fabric".to_string())
    );
    assert!(matches!(
        shell.add_command("--bad"),
        Err(RegistryError::InvalidName(_))
    ));

    let spec = CommandSpec::new("write_fabric_verilog", "").depends_on("link_openfpga_arch");
    assert!(matches!(
        shell.register(spec, noop),
        Err(RegistryError::NotFound { kind: "command", .. })
    ));

    let spec = CommandSpec::new("write_fabric_verilog", "").class("FPGA-Verilog");
    assert!(matches!(
        shell.register(spec, noop),
        Err(RegistryError::NotFound { kind: "command class", .. })
    ));

    assert_eq!(shell.len(), 1);
}

#[test]
fn duplicate_short_name_within_a_command() {
    let shell: Shell<()> = Shell::new();
    let mut draft = shell.add_command("write_full_testbench").unwrap();
    let file = draft.add_option("file", true, "").unwrap();
    let fabric = draft.add_option("fabric_netlist_file_path", false, "").unwrap();
    draft.set_option_short_name(file, "f").unwrap();

    assert_eq!(
        draft.set_option_short_name(fabric, "f").unwrap_err(),
        RegistryError::DuplicateShortName {
            command: "write_full_testbench".to_string(),
            short: "f".to_string(),
        }
    );
    // Re-applying an option's own alias is fine.
    assert!(draft.set_option_short_name(file, "f").is_ok());
}

#[test]
fn validate_reports_unbound_command() {
    let mut shell: Shell<()> = Shell::new();
    let draft = shell.add_command("build_fabric").unwrap();
    shell.finalize_command(draft, "").unwrap();

    assert_eq!(
        shell.validate().unwrap_err(),
        RegistryError::MissingExecuteFunction("build_fabric".to_string())
    );
}

// =============================================================================
// Schema
// =============================================================================

#[test]
fn fabric_schema_rebuilds_identically() {
    let original = fabric::shell().unwrap();
    let json = serde_json::to_string(&original.schema()).unwrap();

    let specs: Vec<CommandSpec> = serde_json::from_str(&json).unwrap();
    let mut rebuilt: Shell<FabricContext> = Shell::new();
    for class in original.classes() {
        rebuilt
            .add_command_class(class.name(), class.description())
            .unwrap();
    }
    for spec in specs {
        rebuilt
            .register(spec, |_, _| Ok(ExecutionResult::success()))
            .unwrap();
    }

    assert_eq!(rebuilt.schema(), original.schema());
    assert!(rebuilt.validate().is_ok());
}

#[test]
fn schema_json_shape() {
    let shell = fabric::shell().unwrap();
    let id = shell.command_from_name("write_simulation_task_info").unwrap();
    let value = serde_json::to_value(shell.command_spec(id).unwrap()).unwrap();

    assert_eq!(value["name"], "write_simulation_task_info");
    assert_eq!(value["class"], "FPGA-Verilog");
    assert_eq!(value["depends_on"], serde_json::json!(["build_fabric"]));
    assert_eq!(value["options"][0]["name"], "file");
    assert_eq!(value["options"][0]["short"], "f");
    assert_eq!(value["options"][0]["type"], "string");
    assert_eq!(value["options"][0]["required"], true);
}
