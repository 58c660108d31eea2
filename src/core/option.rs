//! core::option
//!
//! Option descriptors: the typed schema of one command parameter.
//!
//! An option is either a boolean flag (present or absent) or takes a value
//! of an [`OptionValueType`]. Options are identified by a long name
//! (`--file`) and may carry a short alias (`-f`).
//!
//! [`OptionSpec`] is the declarative form used by
//! [`crate::core::command::CommandSpec`]; [`OptionDescriptor`] is the
//! committed form owned by the registry.

use serde::{Deserialize, Serialize};

use super::types::{OptionId, OptionName, ShortName};

/// Type of the value carried by a value-taking option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionValueType {
    String,
    Int,
    Float,
    Bool,
}

impl OptionValueType {
    /// Placeholder shown in usage lines.
    pub fn placeholder(&self) -> &'static str {
        match self {
            OptionValueType::String => "<string>",
            OptionValueType::Int => "<int>",
            OptionValueType::Float => "<float>",
            OptionValueType::Bool => "<bool>",
        }
    }
}

impl std::fmt::Display for OptionValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OptionValueType::String => "string",
            OptionValueType::Int => "int",
            OptionValueType::Float => "float",
            OptionValueType::Bool => "bool",
        };
        write!(f, "{}", s)
    }
}

/// A committed option of a command.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionDescriptor {
    pub(crate) id: OptionId,
    pub(crate) name: OptionName,
    pub(crate) short_name: Option<ShortName>,
    pub(crate) value_type: Option<OptionValueType>,
    pub(crate) required: bool,
    pub(crate) help: String,
}

impl OptionDescriptor {
    pub(crate) fn new(id: OptionId, name: OptionName, required: bool, help: String) -> Self {
        Self {
            id,
            name,
            short_name: None,
            value_type: None,
            required,
            help,
        }
    }

    pub fn id(&self) -> OptionId {
        self.id
    }

    pub fn name(&self) -> &OptionName {
        &self.name
    }

    pub fn short_name(&self) -> Option<&ShortName> {
        self.short_name.as_ref()
    }

    /// Value type, or `None` for a boolean flag.
    pub fn value_type(&self) -> Option<OptionValueType> {
        self.value_type
    }

    /// Whether the option must be followed by a value token.
    pub fn requires_value(&self) -> bool {
        self.value_type.is_some()
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    /// Convert back into declarative form.
    pub fn to_spec(&self) -> OptionSpec {
        OptionSpec {
            name: self.name.as_str().to_string(),
            short: self.short_name.as_ref().map(|s| s.as_str().to_string()),
            value_type: self.value_type,
            required: self.required,
            help: self.help.clone(),
        }
    }
}

/// Declarative description of an option.
///
/// # Example
///
/// ```
/// use stageshell::core::option::{OptionSpec, OptionValueType};
///
/// let file = OptionSpec::value("file", OptionValueType::String)
///     .short("f")
///     .required()
///     .help("Specify the output directory for Verilog netlists");
/// assert!(file.required);
/// assert_eq!(file.short.as_deref(), Some("f"));
///
/// let verbose = OptionSpec::flag("verbose").help("Enable verbose output");
/// assert!(verbose.value_type.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short: Option<String>,
    /// `None` declares a boolean flag.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub value_type: Option<OptionValueType>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub help: String,
}

impl OptionSpec {
    /// A boolean flag.
    pub fn flag(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            short: None,
            value_type: None,
            required: false,
            help: String::new(),
        }
    }

    /// A value-taking option.
    pub fn value(name: impl Into<String>, value_type: OptionValueType) -> Self {
        Self {
            value_type: Some(value_type),
            ..Self::flag(name)
        }
    }

    pub fn short(mut self, short: impl Into<String>) -> Self {
        self.short = Some(short.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = help.into();
        self
    }
}
