//! core::registry
//!
//! The command registry ("the shell").
//!
//! # Architecture
//!
//! [`Shell`] exclusively owns every [`CommandDescriptor`] and
//! [`CommandClass`]. Callers hold ids or names, never descriptors. The
//! registry is built once at startup and is read-only during dispatch;
//! per-session execution state lives in
//! [`Session`](crate::engine::session::Session), not here.
//!
//! # Registration protocol
//!
//! Prerequisites are registered before their dependents. A dependent
//! resolves its prerequisites with [`Shell::command_from_name`] (or by name
//! through [`CommandSpec::depends_on`]) and binds them with
//! [`Shell::set_command_dependency`], which rejects cycles.
//!
//! # Invariants
//!
//! - Command names are unique across the registry
//! - Ids are assigned in registration order and never reused
//! - A failed registration call leaves the registry unchanged
//! - The dependency graph is acyclic
//!
//! # Example
//!
//! ```
//! use stageshell::core::option::OptionValueType;
//! use stageshell::core::registry::Shell;
//! use stageshell::core::command::ExecutionResult;
//!
//! let mut shell: Shell<Vec<String>> = Shell::new();
//! let class = shell.add_command_class("FPGA-Verilog", "Verilog writers").unwrap();
//!
//! let draft = shell.add_command("build_fabric").unwrap();
//! let build = shell.finalize_command(draft, "build the fabric").unwrap();
//! shell.set_command_execute_function(build, |log: &mut Vec<String>, _| {
//!     log.push("built".into());
//!     Ok(ExecutionResult::success())
//! }).unwrap();
//!
//! let mut draft = shell.add_command("write_fabric_verilog").unwrap();
//! let file = draft.add_option("file", true, "output directory").unwrap();
//! draft.set_option_short_name(file, "f").unwrap();
//! draft.set_option_require_value(file, OptionValueType::String).unwrap();
//! let write = shell.finalize_command(draft, "write netlists").unwrap();
//! shell.set_command_class(write, class).unwrap();
//! shell.set_command_dependency(write, &[shell.command_from_name("build_fabric").unwrap()]).unwrap();
//!
//! assert_eq!(shell.command_from_name("write_fabric_verilog").unwrap(), write);
//! assert_eq!(shell.command(write).unwrap().dependencies(), &[build]);
//! ```

use thiserror::Error;

use super::class::{ClassRegistry, CommandClass};
use super::command::{CommandDescriptor, CommandDraft, CommandSpec, ExecuteFn, ExecutionResult};
use super::graph::DependencyGraph;
use super::types::{ClassId, CommandId, CommandName, TypeError};
use super::value::ParsedOptions;

/// Registration-time errors.
///
/// These indicate static wiring bugs and are fatal at startup.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("command class '{0}' is already registered")]
    DuplicateClass(String),

    #[error("command '{0}' is already registered")]
    DuplicateCommand(String),

    #[error("command '{command}' already has an option named '{option}'")]
    DuplicateOption { command: String, option: String },

    #[error("command '{command}' already has an option with short name '-{short}'")]
    DuplicateShortName { command: String, short: String },

    #[error("making '{command}' depend on '{via}' would create a dependency cycle")]
    Cycle { command: String, via: String },

    #[error("{kind} '{name}' not found")]
    NotFound { kind: &'static str, name: String },

    #[error("command '{0}' has no execute function")]
    MissingExecuteFunction(String),

    #[error("invalid class name '{0}'")]
    InvalidClassName(String),

    #[error(transparent)]
    InvalidName(#[from] TypeError),
}

/// Registry of commands and command classes for a context type `C`.
///
/// `C` is the opaque context shared by every execute function of a session.
pub struct Shell<C> {
    commands: Vec<CommandDescriptor<C>>,
    classes: ClassRegistry,
    graph: DependencyGraph,
}

impl<C> Default for Shell<C> {
    fn default() -> Self {
        Self {
            commands: Vec::new(),
            classes: ClassRegistry::new(),
            graph: DependencyGraph::new(),
        }
    }
}

impl<C> std::fmt::Debug for Shell<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shell")
            .field("commands", &self.commands)
            .field("classes", &self.classes)
            .finish()
    }
}

impl<C> Shell<C> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Classes
    // =========================================================================

    /// Create a command class.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DuplicateClass` if `name` is taken.
    pub fn add_command_class(&mut self, name: &str, description: &str) -> Result<ClassId, RegistryError> {
        let id = self.classes.add(name, description)?;
        tracing::debug!(class = name, %id, "registered command class");
        Ok(id)
    }

    /// Find a command class by name.
    pub fn command_class(&self, name: &str) -> Result<ClassId, RegistryError> {
        self.classes.find(name)
    }

    pub fn class(&self, id: ClassId) -> Option<&CommandClass> {
        self.classes.get(id)
    }

    /// Classes in creation order.
    pub fn classes(&self) -> impl Iterator<Item = &CommandClass> {
        self.classes.iter()
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Begin a new command.
    ///
    /// # Errors
    ///
    /// - `RegistryError::InvalidName` if `name` is not a valid command name
    /// - `RegistryError::DuplicateCommand` if `name` is already registered
    pub fn add_command(&self, name: &str) -> Result<CommandDraft, RegistryError> {
        let name = CommandName::new(name)?;
        self.ensure_unique(&name)?;
        Ok(CommandDraft::new(name))
    }

    /// Commit a draft and assign its id.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DuplicateCommand` if a command with the same
    /// name was finalized after the draft was created.
    pub fn finalize_command(
        &mut self,
        draft: CommandDraft,
        help: impl Into<String>,
    ) -> Result<CommandId, RegistryError> {
        self.ensure_unique(draft.name())?;

        let (name, options) = draft.into_parts();
        let id = CommandId::from_index(self.commands.len());
        tracing::debug!(command = %name, %id, options = options.len(), "registered command");

        self.commands.push(CommandDescriptor {
            id,
            name,
            help: help.into(),
            class: None,
            options,
            execute: None,
            dependencies: Vec::new(),
        });
        self.graph.add_node(id);
        Ok(id)
    }

    /// Resolve a command name to its id.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::NotFound` if no such command is registered.
    pub fn command_from_name(&self, name: &str) -> Result<CommandId, RegistryError> {
        self.commands
            .iter()
            .find(|c| c.name.as_str() == name)
            .map(|c| c.id)
            .ok_or_else(|| RegistryError::NotFound {
                kind: "command",
                name: name.to_string(),
            })
    }

    /// Associate a command with a class.
    pub fn set_command_class(&mut self, command: CommandId, class: ClassId) -> Result<(), RegistryError> {
        if !self.classes.contains(class) {
            return Err(RegistryError::NotFound {
                kind: "command class",
                name: class.to_string(),
            });
        }
        self.command_mut(command)?.class = Some(class);
        Ok(())
    }

    /// Bind the function invoked when the command is dispatched.
    ///
    /// Replaces any previously bound function.
    pub fn set_command_execute_function<F>(&mut self, command: CommandId, f: F) -> Result<(), RegistryError>
    where
        F: Fn(&mut C, &ParsedOptions) -> anyhow::Result<ExecutionResult> + 'static,
    {
        let execute: ExecuteFn<C> = Box::new(f);
        self.command_mut(command)?.execute = Some(execute);
        Ok(())
    }

    /// Record the prerequisite set of a command, replacing any earlier set.
    ///
    /// # Errors
    ///
    /// - `RegistryError::NotFound` if any id is unknown
    /// - `RegistryError::Cycle` if a listed command (transitively) depends
    ///   on `command`; the graph is left as it was
    pub fn set_command_dependency(
        &mut self,
        command: CommandId,
        dependencies: &[CommandId],
    ) -> Result<(), RegistryError> {
        self.command_mut(command)?;
        for &dep in dependencies {
            self.command_ref(dep)?;
        }

        self.graph
            .set_prerequisites(command, dependencies)
            .map_err(|cycle| RegistryError::Cycle {
                command: self.name_of(cycle.command),
                via: self.name_of(cycle.via),
            })?;

        let resolved = self.graph.prerequisites(command).to_vec();
        tracing::debug!(
            command = %self.name_of(command),
            dependencies = ?resolved.iter().map(|d| self.name_of(*d)).collect::<Vec<_>>(),
            "set command dependencies"
        );
        self.command_mut(command)?.dependencies = resolved;
        Ok(())
    }

    /// Register a command from its declarative description.
    ///
    /// All lookups (class, dependencies) are resolved before the command is
    /// committed, so on error nothing is registered.
    ///
    /// # Example
    ///
    /// ```
    /// use stageshell::core::command::{CommandSpec, ExecutionResult};
    /// use stageshell::core::option::OptionSpec;
    /// use stageshell::core::registry::Shell;
    ///
    /// let mut shell: Shell<()> = Shell::new();
    /// let spec = CommandSpec::new("build_fabric", "build the fabric")
    ///     .option(OptionSpec::flag("verbose"))
    ///     .depends_on("link_openfpga_arch");
    ///
    /// // The prerequisite does not exist yet.
    /// assert!(shell.register(spec, |_, _| Ok(ExecutionResult::success())).is_err());
    /// assert!(shell.command_from_name("build_fabric").is_err());
    /// ```
    pub fn register<F>(&mut self, spec: CommandSpec, f: F) -> Result<CommandId, RegistryError>
    where
        F: Fn(&mut C, &ParsedOptions) -> anyhow::Result<ExecutionResult> + 'static,
    {
        let mut draft = self.add_command(&spec.name)?;
        for option in &spec.options {
            draft.apply_option(option)?;
        }

        let class = spec
            .class
            .as_deref()
            .map(|name| self.command_class(name))
            .transpose()?;
        let dependencies = spec
            .depends_on
            .iter()
            .map(|name| self.command_from_name(name))
            .collect::<Result<Vec<_>, _>>()?;

        let id = self.finalize_command(draft, spec.help)?;
        if let Some(class) = class {
            self.set_command_class(id, class)?;
        }
        self.set_command_execute_function(id, f)?;
        self.set_command_dependency(id, &dependencies)?;
        Ok(id)
    }

    /// Final wiring check, run once all commands are registered.
    ///
    /// # Errors
    ///
    /// - `RegistryError::MissingExecuteFunction` for the first command
    ///   without a bound function
    /// - `RegistryError::Cycle` if the dependency graph is cyclic
    pub fn validate(&self) -> Result<(), RegistryError> {
        if let Some(cmd) = self.commands.iter().find(|c| c.execute.is_none()) {
            return Err(RegistryError::MissingExecuteFunction(cmd.name.to_string()));
        }
        if let Some(id) = self.graph.find_cycle() {
            let name = self.name_of(id);
            return Err(RegistryError::Cycle {
                command: name.clone(),
                via: name,
            });
        }
        Ok(())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn command(&self, id: CommandId) -> Option<&CommandDescriptor<C>> {
        self.commands.get(id.index())
    }

    /// Look up a command descriptor by name.
    pub fn command_by_name(&self, name: &str) -> Option<&CommandDescriptor<C>> {
        self.commands.iter().find(|c| c.name.as_str() == name)
    }

    /// Commands in registration order.
    pub fn commands(&self) -> impl Iterator<Item = &CommandDescriptor<C>> {
        self.commands.iter()
    }

    /// Commands belonging to a class, in registration order.
    pub fn commands_in_class(&self, class: ClassId) -> impl Iterator<Item = &CommandDescriptor<C>> {
        self.commands.iter().filter(move |c| c.class == Some(class))
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    /// Transitive prerequisites of a command in runnable order.
    pub fn prerequisite_order(&self, command: CommandId) -> Vec<CommandId> {
        self.graph.prerequisite_order(command)
    }

    /// Export one command as a declarative spec.
    pub fn command_spec(&self, id: CommandId) -> Option<CommandSpec> {
        let cmd = self.command(id)?;
        Some(CommandSpec {
            name: cmd.name.to_string(),
            help: cmd.help.clone(),
            class: cmd
                .class
                .and_then(|c| self.classes.get(c))
                .map(|c| c.name.clone()),
            options: cmd.options.iter().map(|o| o.to_spec()).collect(),
            depends_on: cmd.dependencies.iter().map(|d| self.name_of(*d)).collect(),
        })
    }

    /// Export the whole registry, in registration order.
    ///
    /// Feeding the result back through [`Shell::register`] in order
    /// reproduces the same schema.
    pub fn schema(&self) -> Vec<CommandSpec> {
        self.commands
            .iter()
            .filter_map(|c| self.command_spec(c.id))
            .collect()
    }

    /// Display name of a command id.
    pub fn name_of(&self, id: CommandId) -> String {
        self.command(id)
            .map(|c| c.name.to_string())
            .unwrap_or_else(|| id.to_string())
    }

    fn ensure_unique(&self, name: &CommandName) -> Result<(), RegistryError> {
        if self.commands.iter().any(|c| &c.name == name) {
            return Err(RegistryError::DuplicateCommand(name.to_string()));
        }
        Ok(())
    }

    fn command_ref(&self, id: CommandId) -> Result<&CommandDescriptor<C>, RegistryError> {
        self.commands
            .get(id.index())
            .ok_or_else(|| RegistryError::NotFound {
                kind: "command",
                name: id.to_string(),
            })
    }

    fn command_mut(&mut self, id: CommandId) -> Result<&mut CommandDescriptor<C>, RegistryError> {
        self.commands
            .get_mut(id.index())
            .ok_or_else(|| RegistryError::NotFound {
                kind: "command",
                name: id.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::option::{OptionSpec, OptionValueType};

    fn noop(_: &mut (), _: &ParsedOptions) -> anyhow::Result<ExecutionResult> {
        Ok(ExecutionResult::success())
    }

    fn add(shell: &mut Shell<()>, name: &str) -> CommandId {
        let draft = shell.add_command(name).unwrap();
        let id = shell.finalize_command(draft, "").unwrap();
        shell.set_command_execute_function(id, noop).unwrap();
        id
    }

    mod commands {
        use super::*;

        #[test]
        fn ids_are_stable_and_sequential() {
            let mut shell = Shell::new();
            let a = add(&mut shell, "a");
            let b = add(&mut shell, "b");

            assert_ne!(a, b);
            assert_eq!(shell.command_from_name("a").unwrap(), a);
            assert_eq!(shell.command_from_name("a").unwrap(), a);
            assert_eq!(shell.command_from_name("b").unwrap(), b);
            assert_eq!(shell.len(), 2);
        }

        #[test]
        fn duplicate_name_rejected_at_add() {
            let mut shell = Shell::new();
            add(&mut shell, "build_fabric");
            assert_eq!(
                shell.add_command("build_fabric").unwrap_err(),
                RegistryError::DuplicateCommand("build_fabric".into())
            );
            assert_eq!(shell.len(), 1);
        }

        #[test]
        fn duplicate_name_rejected_at_finalize() {
            let mut shell: Shell<()> = Shell::new();
            let first = shell.add_command("x").unwrap();
            let second = shell.add_command("x").unwrap();
            shell.finalize_command(first, "").unwrap();

            assert!(matches!(
                shell.finalize_command(second, ""),
                Err(RegistryError::DuplicateCommand(_))
            ));
            assert_eq!(shell.len(), 1);
        }

        #[test]
        fn draft_is_invisible_until_finalized() {
            let shell: Shell<()> = Shell::new();
            let _draft = shell.add_command("pending").unwrap();
            assert!(matches!(
                shell.command_from_name("pending"),
                Err(RegistryError::NotFound { kind: "command", .. })
            ));
        }

        #[test]
        fn invalid_command_name() {
            let shell: Shell<()> = Shell::new();
            assert!(matches!(
                shell.add_command("bad name"),
                Err(RegistryError::InvalidName(_))
            ));
        }
    }

    mod classes {
        use super::*;

        #[test]
        fn set_class_requires_known_ids() {
            let mut shell = Shell::new();
            let cmd = add(&mut shell, "a");
            let class = shell.add_command_class("OpenFPGA", "").unwrap();

            shell.set_command_class(cmd, class).unwrap();
            assert_eq!(shell.command(cmd).unwrap().class(), Some(class));

            let bogus_class = ClassId::from_index(9);
            assert!(shell.set_command_class(cmd, bogus_class).is_err());
            let bogus_cmd = CommandId::from_index(9);
            assert!(shell.set_command_class(bogus_cmd, class).is_err());
        }

        #[test]
        fn commands_in_class() {
            let mut shell = Shell::new();
            let class = shell.add_command_class("FPGA-Verilog", "").unwrap();
            let a = add(&mut shell, "a");
            add(&mut shell, "b");
            let c = add(&mut shell, "c");
            shell.set_command_class(a, class).unwrap();
            shell.set_command_class(c, class).unwrap();

            let ids: Vec<_> = shell.commands_in_class(class).map(|c| c.id()).collect();
            assert_eq!(ids, vec![a, c]);
        }
    }

    mod dependencies {
        use super::*;

        #[test]
        fn cycle_rejected_and_graph_unchanged() {
            let mut shell = Shell::new();
            let a = add(&mut shell, "a");
            let b = add(&mut shell, "b");
            shell.set_command_dependency(a, &[b]).unwrap();

            let err = shell.set_command_dependency(b, &[a]).unwrap_err();
            assert_eq!(
                err,
                RegistryError::Cycle {
                    command: "b".into(),
                    via: "a".into()
                }
            );
            assert!(shell.command(b).unwrap().dependencies().is_empty());
            assert_eq!(shell.command(a).unwrap().dependencies(), &[b]);
            assert!(shell.validate().is_ok());
        }

        #[test]
        fn unknown_dependency_rejected() {
            let mut shell = Shell::new();
            let a = add(&mut shell, "a");
            let err = shell
                .set_command_dependency(a, &[CommandId::from_index(42)])
                .unwrap_err();
            assert!(matches!(err, RegistryError::NotFound { kind: "command", .. }));
            assert!(shell.command(a).unwrap().dependencies().is_empty());
        }

        #[test]
        fn prerequisite_order_follows_chain() {
            let mut shell = Shell::new();
            let read = add(&mut shell, "read_openfpga_arch");
            let link = add(&mut shell, "link_openfpga_arch");
            let build = add(&mut shell, "build_fabric");
            shell.set_command_dependency(link, &[read]).unwrap();
            shell.set_command_dependency(build, &[link]).unwrap();

            assert_eq!(shell.prerequisite_order(build), vec![read, link]);
        }
    }

    mod declarative {
        use super::*;

        fn write_spec() -> CommandSpec {
            CommandSpec::new("write_fabric_verilog", "write netlists")
                .class("FPGA-Verilog")
                .option(
                    OptionSpec::value("file", OptionValueType::String)
                        .short("f")
                        .required()
                        .help("output"),
                )
                .option(OptionSpec::flag("verbose"))
                .depends_on("build_fabric")
        }

        #[test]
        fn register_resolves_class_and_dependencies() {
            let mut shell = Shell::new();
            shell.add_command_class("FPGA-Verilog", "").unwrap();
            let build = add(&mut shell, "build_fabric");

            let id = shell.register(write_spec(), noop).unwrap();
            let cmd = shell.command(id).unwrap();
            assert_eq!(cmd.dependencies(), &[build]);
            assert!(cmd.is_executable());
            assert_eq!(cmd.option_by_short("f").unwrap().name().as_str(), "file");
            assert_eq!(shell.command_spec(id).unwrap(), write_spec());
        }

        #[test]
        fn register_missing_class_leaves_registry_unchanged() {
            let mut shell = Shell::new();
            add(&mut shell, "build_fabric");

            let err = shell.register(write_spec(), noop).unwrap_err();
            assert!(matches!(
                err,
                RegistryError::NotFound { kind: "command class", .. }
            ));
            assert_eq!(shell.len(), 1);
            assert!(shell.command_from_name("write_fabric_verilog").is_err());
        }

        #[test]
        fn register_bad_option_leaves_registry_unchanged() {
            let mut shell: Shell<()> = Shell::new();
            let spec = CommandSpec::new("x", "")
                .option(OptionSpec::flag("a").short("s"))
                .option(OptionSpec::flag("b").short("s"));

            assert!(matches!(
                shell.register(spec, noop),
                Err(RegistryError::DuplicateShortName { .. })
            ));
            assert!(shell.is_empty());
        }

        #[test]
        fn schema_round_trip() {
            let mut shell = Shell::new();
            shell.add_command_class("FPGA-Verilog", "").unwrap();
            add(&mut shell, "build_fabric");
            shell.register(write_spec(), noop).unwrap();

            let mut rebuilt: Shell<()> = Shell::new();
            rebuilt.add_command_class("FPGA-Verilog", "").unwrap();
            for spec in shell.schema() {
                rebuilt.register(spec, noop).unwrap();
            }
            assert_eq!(rebuilt.schema(), shell.schema());
        }
    }

    #[test]
    fn validate_reports_unbound_command() {
        let mut shell: Shell<()> = Shell::new();
        let draft = shell.add_command("unbound").unwrap();
        shell.finalize_command(draft, "").unwrap();
        assert_eq!(
            shell.validate(),
            Err(RegistryError::MissingExecuteFunction("unbound".into()))
        );
    }
}
