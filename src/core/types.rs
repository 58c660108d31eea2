//! core::types
//!
//! Strong types for registry concepts.
//!
//! # Types
//!
//! - [`CommandName`] - Validated command name
//! - [`OptionName`] - Validated long option name
//! - [`ShortName`] - Validated short option alias
//! - [`CommandId`], [`ClassId`], [`OptionId`] - Opaque registry identifiers
//!
//! # Validation
//!
//! Names are validated at construction time. A name that could be confused
//! with an option token (leading `-`) or that would not survive shell
//! tokenization (whitespace, quotes) cannot be represented.
//!
//! # Examples
//!
//! ```
//! use stageshell::core::types::{CommandName, OptionName, ShortName};
//!
//! let cmd = CommandName::new("write_fabric_verilog").unwrap();
//! let opt = OptionName::new("file").unwrap();
//! let short = ShortName::new("f").unwrap();
//! assert_eq!(cmd.as_str(), "write_fabric_verilog");
//! assert_eq!(opt.as_str(), "file");
//! assert_eq!(short.as_str(), "f");
//!
//! assert!(CommandName::new("--file").is_err());
//! assert!(OptionName::new("has space").is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from name validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid command name: {0}")]
    InvalidCommandName(String),

    #[error("invalid option name: {0}")]
    InvalidOptionName(String),

    #[error("invalid short name: {0}")]
    InvalidShortName(String),
}

/// Check the shared identifier rules.
///
/// Returns a description of the first violated rule.
fn check_identifier(name: &str, what: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err(format!("{} cannot be empty", what));
    }
    if name.starts_with('-') {
        return Err(format!("{} '{}' cannot start with '-'", what, name));
    }
    if let Some(c) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-'))
    {
        return Err(format!(
            "{} '{}' contains invalid character '{}'",
            what,
            name,
            c.escape_default()
        ));
    }
    Ok(())
}

/// A validated command name.
///
/// Command names may contain ASCII letters, digits, `_` and `-`, and
/// cannot start with `-`.
///
/// # Example
///
/// ```
/// use stageshell::core::types::CommandName;
///
/// assert!(CommandName::new("build_fabric").is_ok());
/// assert!(CommandName::new("").is_err());
/// assert!(CommandName::new("-x").is_err());
/// assert!(CommandName::new("write;rm").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CommandName(String);

impl CommandName {
    /// Create a new validated command name.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidCommandName` if the name is empty, starts
    /// with `-`, or contains characters outside `[A-Za-z0-9_-]`.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        check_identifier(&name, "command name").map_err(TypeError::InvalidCommandName)?;
        Ok(Self(name))
    }

    /// Get the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CommandName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for CommandName {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CommandName> for String {
    fn from(name: CommandName) -> Self {
        name.0
    }
}

impl AsRef<str> for CommandName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A validated long option name (used as `--name`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OptionName(String);

impl OptionName {
    /// Create a new validated option name.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidOptionName` under the same rules as
    /// [`CommandName::new`].
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        check_identifier(&name, "option name").map_err(TypeError::InvalidOptionName)?;
        Ok(Self(name))
    }

    /// Get the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OptionName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for OptionName {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<OptionName> for String {
    fn from(name: OptionName) -> Self {
        name.0
    }
}

/// A validated short option alias (used as `-name`).
///
/// Short names are not restricted to one character; the original shell
/// uses multi-letter aliases such as `-pcf`.
///
/// # Example
///
/// ```
/// use stageshell::core::types::ShortName;
///
/// assert!(ShortName::new("f").is_ok());
/// assert!(ShortName::new("pcf").is_ok());
/// assert!(ShortName::new("").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ShortName(String);

impl ShortName {
    /// Create a new validated short name.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidShortName` under the same rules as
    /// [`CommandName::new`].
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        check_identifier(&name, "short name").map_err(TypeError::InvalidShortName)?;
        Ok(Self(name))
    }

    /// Get the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ShortName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for ShortName {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ShortName> for String {
    fn from(name: ShortName) -> Self {
        name.0
    }
}

/// Identifier of a finalized command.
///
/// Assigned by [`crate::core::registry::Shell::finalize_command`] in
/// registration order. Commands are never removed, so an id is never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CommandId(usize);

impl CommandId {
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index)
    }

    pub(crate) fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for CommandId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "cmd#{}", self.0)
    }
}

/// Identifier of a command class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClassId(usize);

impl ClassId {
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index)
    }

    pub(crate) fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for ClassId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "class#{}", self.0)
    }
}

/// Identifier of an option within its owning command.
///
/// Only meaningful together with the draft or command that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OptionId(usize);

impl OptionId {
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index)
    }

    pub(crate) fn index(self) -> usize {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod command_name {
        use super::*;

        #[test]
        fn valid_names() {
            assert!(CommandName::new("build_fabric").is_ok());
            assert!(CommandName::new("write-fabric").is_ok());
            assert!(CommandName::new("x1").is_ok());
        }

        #[test]
        fn empty_rejected() {
            assert_eq!(
                CommandName::new(""),
                Err(TypeError::InvalidCommandName(
                    "command name cannot be empty".into()
                ))
            );
        }

        #[test]
        fn leading_dash_rejected() {
            assert!(CommandName::new("-f").is_err());
            assert!(CommandName::new("--file").is_err());
        }

        #[test]
        fn whitespace_and_punctuation_rejected() {
            assert!(CommandName::new("has space").is_err());
            assert!(CommandName::new("tab\there").is_err());
            assert!(CommandName::new("quote'd").is_err());
            assert!(CommandName::new("semi;colon").is_err());
        }

        #[test]
        fn serde_roundtrip() {
            let name = CommandName::new("build_fabric").unwrap();
            let json = serde_json::to_string(&name).unwrap();
            assert_eq!(json, "\"build_fabric\"");
            let parsed: CommandName = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, name);
        }

        #[test]
        fn serde_rejects_invalid() {
            let result: Result<CommandName, _> = serde_json::from_str("\"-bad\"");
            assert!(result.is_err());
        }
    }

    mod option_names {
        use super::*;

        #[test]
        fn option_name_rules() {
            assert!(OptionName::new("reference_benchmark_file_path").is_ok());
            assert!(OptionName::new("").is_err());
            assert!(OptionName::new("--file").is_err());
        }

        #[test]
        fn short_name_rules() {
            assert!(ShortName::new("f").is_ok());
            assert!(ShortName::new("pcf").is_ok());
            assert!(ShortName::new("-f").is_err());
            assert!(matches!(
                ShortName::new(""),
                Err(TypeError::InvalidShortName(_))
            ));
        }
    }

    #[test]
    fn ids_display() {
        assert_eq!(CommandId::from_index(3).to_string(), "cmd#3");
        assert_eq!(ClassId::from_index(0).to_string(), "class#0");
        assert_eq!(OptionId::from_index(2).index(), 2);
    }
}
