//! Property-based tests for the registry and option parser.
//!
//! These tests use proptest to verify invariants hold across
//! randomly generated inputs.

use proptest::prelude::*;

use stageshell::core::command::ExecutionResult;
use stageshell::core::registry::{RegistryError, Shell};
use stageshell::core::types::CommandId;
use stageshell::engine::parse_args;
use stageshell::fabric;

/// Strategy for generating valid command names.
fn valid_command_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,15}"
}

/// Strategy for option values that never look like option tokens.
fn option_value() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_./]{1,12}"
}

/// Register `names` as a chain: each command depends on the one before it.
fn chain(names: &[String]) -> (Shell<()>, Vec<CommandId>) {
    let mut shell: Shell<()> = Shell::new();
    let mut ids: Vec<CommandId> = Vec::new();
    for name in names {
        let draft = shell.add_command(name).unwrap();
        let id = shell.finalize_command(draft, "").unwrap();
        shell
            .set_command_execute_function(id, |_, _| Ok(ExecutionResult::success()))
            .unwrap();
        if let Some(&prev) = ids.last() {
            shell.set_command_dependency(id, &[prev]).unwrap();
        }
        ids.push(id);
    }
    (shell, ids)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Ids follow registration order and resolve back to their names.
    #[test]
    fn ids_are_stable(names in prop::collection::btree_set(valid_command_name(), 1..20)) {
        let names: Vec<String> = names.into_iter().collect();
        let (shell, ids) = chain(&names);

        for (index, (name, id)) in names.iter().zip(&ids).enumerate() {
            prop_assert_eq!(shell.command_from_name(name).unwrap(), *id);
            prop_assert_eq!(shell.command(*id).unwrap().name().as_str(), name.as_str());
            if index > 0 {
                prop_assert!(ids[index - 1] < *id);
            }
        }
    }

    /// Closing a cycle anywhere in a chain is rejected and changes nothing.
    #[test]
    fn cycle_rejection_leaves_graph_unchanged(
        names in prop::collection::btree_set(valid_command_name(), 2..12),
        picks in (any::<prop::sample::Index>(), any::<prop::sample::Index>()),
    ) {
        let names: Vec<String> = names.into_iter().collect();
        let (mut shell, ids) = chain(&names);

        // `late` transitively depends on `early`; making `early` depend on
        // `late` closes a cycle (a self-dependency when they coincide).
        let a = picks.0.index(ids.len());
        let b = picks.1.index(ids.len());
        let (early, late) = (ids[a.min(b)], ids[a.max(b)]);

        let before_prereqs = shell.command(early).unwrap().dependencies().to_vec();
        let before_order = shell.graph().topological_order();

        let result = shell.set_command_dependency(early, &[late]);
        let is_cycle = matches!(result, Err(RegistryError::Cycle { .. }));
        prop_assert!(is_cycle, "expected a cycle error, got {:?}", result);

        prop_assert_eq!(shell.command(early).unwrap().dependencies(), before_prereqs.as_slice());
        prop_assert_eq!(shell.graph().topological_order(), before_order);
        prop_assert!(shell.validate().is_ok());
    }

    /// `-f` and `--file`, `-pcf` and `--pin_constraints_file` parse the same.
    #[test]
    fn short_and_long_forms_are_equivalent(
        file in option_value(),
        pcf in prop::option::of(option_value()),
        reference in option_value(),
        verbose in any::<bool>(),
    ) {
        let shell = fabric::shell().unwrap();
        let cmd = shell.command_by_name("write_verilog_testbench").unwrap();

        let build = |short: bool| {
            let mut args = vec![
                if short { "-f" } else { "--file" }.to_string(),
                file.clone(),
                "--reference_benchmark_file_path".to_string(),
                reference.clone(),
            ];
            if let Some(pcf) = &pcf {
                args.push(if short { "-pcf" } else { "--pin_constraints_file" }.to_string());
                args.push(pcf.clone());
            }
            if verbose {
                args.push("--verbose".to_string());
            }
            args
        };

        let long = parse_args("write_verilog_testbench", cmd.options(), &build(false)).unwrap();
        let short = parse_args("write_verilog_testbench", cmd.options(), &build(true)).unwrap();
        prop_assert_eq!(&long, &short);
        prop_assert_eq!(long.get_str("file"), Some(file.as_str()));
        prop_assert_eq!(long.get_str("pin_constraints_file"), pcf.as_deref());
        prop_assert_eq!(long.flag("verbose"), verbose);
    }

    /// Option order on the line does not matter.
    #[test]
    fn option_order_is_irrelevant(file in option_value(), net_type in option_value()) {
        let shell = fabric::shell().unwrap();
        let cmd = shell.command_by_name("write_fabric_verilog").unwrap();

        let forward: Vec<String> = ["--file", file.as_str(), "--default_net_type", net_type.as_str(), "--include_timing"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let backward: Vec<String> = ["--include_timing", "--default_net_type", net_type.as_str(), "-f", file.as_str()]
            .iter()
            .map(|s| s.to_string())
            .collect();

        prop_assert_eq!(
            parse_args("write_fabric_verilog", cmd.options(), &forward).unwrap(),
            parse_args("write_fabric_verilog", cmd.options(), &backward).unwrap()
        );
    }
}
