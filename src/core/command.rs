//! core::command
//!
//! Command descriptors and the execute-function contract.
//!
//! # Lifecycle
//!
//! A command starts as a [`CommandDraft`] obtained from
//! [`Shell::add_command`](crate::core::registry::Shell::add_command). The
//! draft is an owned value: options are appended to it without touching the
//! registry. [`Shell::finalize_command`](crate::core::registry::Shell::finalize_command)
//! commits the draft as a [`CommandDescriptor`] and assigns its id.
//!
//! [`CommandSpec`] is the declarative, serializable form of the same schema,
//! used for table-driven registration and for exporting help/documentation.
//!
//! # Execute functions
//!
//! An execute function receives the shared session context and the parsed
//! options. It reports its own outcome through [`ExecutionResult`]; an
//! `Err` or a panic is converted to a failed result by the dispatcher.

use serde::{Deserialize, Serialize};

use super::option::{OptionDescriptor, OptionSpec, OptionValueType};
use super::registry::RegistryError;
use super::types::{ClassId, CommandId, CommandName, OptionId, OptionName, ShortName};
use super::value::ParsedOptions;

/// Outcome status of one execution attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    Succeeded,
    Failed,
}

/// Result reported by an execute function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub status: ExecutionStatus,
    /// Human-readable detail, surfaced verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ExecutionResult {
    pub fn success() -> Self {
        Self {
            status: ExecutionStatus::Succeeded,
            detail: None,
        }
    }

    pub fn success_with(detail: impl Into<String>) -> Self {
        Self {
            status: ExecutionStatus::Succeeded,
            detail: Some(detail.into()),
        }
    }

    pub fn failed(detail: impl Into<String>) -> Self {
        Self {
            status: ExecutionStatus::Failed,
            detail: Some(detail.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ExecutionStatus::Succeeded
    }

    /// Process exit code for this outcome: 0 on success, 1 on failure.
    pub fn exit_code(&self) -> i32 {
        match self.status {
            ExecutionStatus::Succeeded => 0,
            ExecutionStatus::Failed => 1,
        }
    }
}

/// Function bound to a command and invoked on dispatch.
pub type ExecuteFn<C> = Box<dyn Fn(&mut C, &ParsedOptions) -> anyhow::Result<ExecutionResult>>;

/// A command under construction.
///
/// Nothing in the draft is visible through the registry until it is
/// finalized.
#[derive(Debug, Clone)]
pub struct CommandDraft {
    name: CommandName,
    options: Vec<OptionDescriptor>,
}

impl CommandDraft {
    pub(crate) fn new(name: CommandName) -> Self {
        Self {
            name,
            options: Vec::new(),
        }
    }

    pub fn name(&self) -> &CommandName {
        &self.name
    }

    pub fn options(&self) -> &[OptionDescriptor] {
        &self.options
    }

    /// Append an option.
    ///
    /// The option starts out as a boolean flag; call
    /// [`set_option_require_value`](Self::set_option_require_value) to make
    /// it value-taking. `required` is enforced at dispatch time.
    ///
    /// # Errors
    ///
    /// - `RegistryError::InvalidName` if `name` is not a valid option name
    /// - `RegistryError::DuplicateOption` if the command already has an
    ///   option called `name`
    pub fn add_option(
        &mut self,
        name: &str,
        required: bool,
        help: impl Into<String>,
    ) -> Result<OptionId, RegistryError> {
        let name = OptionName::new(name)?;
        if self.options.iter().any(|o| o.name == name) {
            return Err(RegistryError::DuplicateOption {
                command: self.name.to_string(),
                option: name.to_string(),
            });
        }

        let id = OptionId::from_index(self.options.len());
        self.options
            .push(OptionDescriptor::new(id, name, required, help.into()));
        Ok(id)
    }

    /// Give an option a short alias.
    ///
    /// # Errors
    ///
    /// - `RegistryError::NotFound` if `id` was not issued by this draft
    /// - `RegistryError::DuplicateShortName` if another option of the
    ///   command already uses the alias
    pub fn set_option_short_name(&mut self, id: OptionId, short: &str) -> Result<(), RegistryError> {
        let short = ShortName::new(short)?;
        self.option_mut(id)?;

        let collides = self
            .options
            .iter()
            .any(|o| o.id != id && o.short_name.as_ref() == Some(&short));
        if collides {
            return Err(RegistryError::DuplicateShortName {
                command: self.name.to_string(),
                short: short.to_string(),
            });
        }

        self.option_mut(id)?.short_name = Some(short);
        Ok(())
    }

    /// Mark an option as value-taking with the given type.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::NotFound` if `id` was not issued by this draft.
    pub fn set_option_require_value(
        &mut self,
        id: OptionId,
        value_type: OptionValueType,
    ) -> Result<(), RegistryError> {
        self.option_mut(id)?.value_type = Some(value_type);
        Ok(())
    }

    /// Append an option described declaratively.
    pub fn apply_option(&mut self, spec: &OptionSpec) -> Result<OptionId, RegistryError> {
        let id = self.add_option(&spec.name, spec.required, spec.help.clone())?;
        if let Some(short) = &spec.short {
            self.set_option_short_name(id, short)?;
        }
        if let Some(value_type) = spec.value_type {
            self.set_option_require_value(id, value_type)?;
        }
        Ok(id)
    }

    fn option_mut(&mut self, id: OptionId) -> Result<&mut OptionDescriptor, RegistryError> {
        let command = &self.name;
        self.options
            .get_mut(id.index())
            .ok_or_else(|| RegistryError::NotFound {
                kind: "option",
                name: format!("#{} of command '{}'", id.index(), command),
            })
    }

    pub(crate) fn into_parts(self) -> (CommandName, Vec<OptionDescriptor>) {
        (self.name, self.options)
    }
}

/// A committed command, owned by the registry.
pub struct CommandDescriptor<C> {
    pub(crate) id: CommandId,
    pub(crate) name: CommandName,
    pub(crate) help: String,
    pub(crate) class: Option<ClassId>,
    pub(crate) options: Vec<OptionDescriptor>,
    pub(crate) execute: Option<ExecuteFn<C>>,
    pub(crate) dependencies: Vec<CommandId>,
}

impl<C> CommandDescriptor<C> {
    pub fn id(&self) -> CommandId {
        self.id
    }

    pub fn name(&self) -> &CommandName {
        &self.name
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    pub fn class(&self) -> Option<ClassId> {
        self.class
    }

    /// Options in insertion order.
    pub fn options(&self) -> &[OptionDescriptor] {
        &self.options
    }

    /// Look up an option by long name.
    pub fn option(&self, name: &str) -> Option<&OptionDescriptor> {
        self.options.iter().find(|o| o.name.as_str() == name)
    }

    /// Look up an option by short alias.
    pub fn option_by_short(&self, short: &str) -> Option<&OptionDescriptor> {
        self.options
            .iter()
            .find(|o| o.short_name.as_ref().is_some_and(|s| s.as_str() == short))
    }

    /// Prerequisite commands, in declaration order.
    pub fn dependencies(&self) -> &[CommandId] {
        &self.dependencies
    }

    pub fn is_executable(&self) -> bool {
        self.execute.is_some()
    }
}

impl<C> std::fmt::Debug for CommandDescriptor<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandDescriptor")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("class", &self.class)
            .field("options", &self.options)
            .field("executable", &self.execute.is_some())
            .field("dependencies", &self.dependencies)
            .finish()
    }
}

/// Declarative description of a command.
///
/// # Example
///
/// ```
/// use stageshell::core::command::CommandSpec;
/// use stageshell::core::option::{OptionSpec, OptionValueType};
///
/// let spec = CommandSpec::new(
///     "write_fabric_verilog",
///     "generate Verilog netlists modeling full FPGA fabric",
/// )
/// .class("FPGA-Verilog")
/// .option(
///     OptionSpec::value("file", OptionValueType::String)
///         .short("f")
///         .required(),
/// )
/// .option(OptionSpec::flag("verbose"))
/// .depends_on("build_fabric");
///
/// assert_eq!(spec.options.len(), 2);
/// assert_eq!(spec.depends_on, vec!["build_fabric".to_string()]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSpec {
    pub name: String,
    #[serde(default)]
    pub help: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(default)]
    pub options: Vec<OptionSpec>,
    #[serde(default)]
    pub depends_on: Vec<String>,
}

impl CommandSpec {
    pub fn new(name: impl Into<String>, help: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            help: help.into(),
            class: None,
            options: Vec::new(),
            depends_on: Vec::new(),
        }
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn option(mut self, option: OptionSpec) -> Self {
        self.options.push(option);
        self
    }

    pub fn depends_on(mut self, command: impl Into<String>) -> Self {
        self.depends_on.push(command.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str) -> CommandDraft {
        CommandDraft::new(CommandName::new(name).unwrap())
    }

    mod draft_options {
        use super::*;

        #[test]
        fn options_keep_insertion_order() {
            let mut d = draft("write_fabric_verilog");
            d.add_option("file", true, "out").unwrap();
            d.add_option("explicit_port_mapping", false, "").unwrap();
            d.add_option("verbose", false, "").unwrap();

            let names: Vec<_> = d.options().iter().map(|o| o.name().as_str()).collect();
            assert_eq!(names, vec!["file", "explicit_port_mapping", "verbose"]);
        }

        #[test]
        fn duplicate_option_rejected() {
            let mut d = draft("cmd");
            d.add_option("file", true, "").unwrap();
            let err = d.add_option("file", false, "").unwrap_err();
            assert!(matches!(
                err,
                RegistryError::DuplicateOption { ref option, .. } if option == "file"
            ));
            assert_eq!(d.options().len(), 1);
        }

        #[test]
        fn invalid_option_name_rejected() {
            let mut d = draft("cmd");
            assert!(matches!(
                d.add_option("--file", false, ""),
                Err(RegistryError::InvalidName(_))
            ));
        }

        #[test]
        fn new_option_is_a_flag() {
            let mut d = draft("cmd");
            let id = d.add_option("verbose", false, "").unwrap();
            assert!(!d.options()[id.index()].requires_value());
        }

        #[test]
        fn require_value_sets_type() {
            let mut d = draft("cmd");
            let id = d.add_option("file", true, "").unwrap();
            d.set_option_require_value(id, OptionValueType::String)
                .unwrap();
            assert_eq!(
                d.options()[0].value_type(),
                Some(OptionValueType::String)
            );
        }
    }

    mod short_names {
        use super::*;

        #[test]
        fn duplicate_short_name_rejected() {
            let mut d = draft("cmd");
            let a = d.add_option("file", true, "").unwrap();
            let b = d.add_option("format", false, "").unwrap();
            d.set_option_short_name(a, "f").unwrap();

            let err = d.set_option_short_name(b, "f").unwrap_err();
            assert!(matches!(
                err,
                RegistryError::DuplicateShortName { ref short, .. } if short == "f"
            ));
            assert!(d.options()[1].short_name().is_none());
        }

        #[test]
        fn reassigning_own_short_name_is_allowed() {
            let mut d = draft("cmd");
            let a = d.add_option("file", true, "").unwrap();
            d.set_option_short_name(a, "f").unwrap();
            d.set_option_short_name(a, "f").unwrap();
            assert_eq!(d.options()[0].short_name().unwrap().as_str(), "f");
        }

        #[test]
        fn unknown_option_id() {
            let mut d = draft("cmd");
            let mut other = draft("other");
            other.add_option("a", false, "").unwrap();
            let foreign = other.add_option("b", false, "").unwrap();

            assert!(matches!(
                d.set_option_short_name(foreign, "b"),
                Err(RegistryError::NotFound { kind: "option", .. })
            ));
        }
    }

    #[test]
    fn apply_option_from_spec() {
        let mut d = draft("cmd");
        let spec = OptionSpec::value("pin_constraints_file", OptionValueType::String)
            .short("pcf")
            .help("pins");
        let id = d.apply_option(&spec).unwrap();
        assert_eq!(d.options()[id.index()].to_spec(), spec);
    }

    #[test]
    fn execution_result_codes() {
        assert_eq!(ExecutionResult::success().exit_code(), 0);
        assert_eq!(ExecutionResult::failed("boom").exit_code(), 1);
        assert!(ExecutionResult::success_with("ok").is_success());
        assert_eq!(
            ExecutionResult::failed("boom").detail.as_deref(),
            Some("boom")
        );
    }

    #[test]
    fn command_spec_parses_from_toml() {
        let spec: CommandSpec = toml::from_str(
            r#"
            name = "write_simulation_task_info"
            help = "generate an interchangable simulation task configuration file"
            class = "FPGA-Verilog"
            depends_on = ["build_fabric"]

            [[options]]
            name = "file"
            short = "f"
            type = "string"
            required = true

            [[options]]
            name = "verbose"
            "#,
        )
        .unwrap();

        assert_eq!(spec.class.as_deref(), Some("FPGA-Verilog"));
        assert_eq!(spec.options.len(), 2);
        assert!(spec.options[0].required);
        assert!(spec.options[1].value_type.is_none());
    }
}
