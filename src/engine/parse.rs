//! engine::parse
//!
//! Raw argument tokens to [`ParsedOptions`].
//!
//! # Grammar
//!
//! ```text
//! args   := ( --<name> [value] | -<short> [value] )*
//! ```
//!
//! - `--name` is looked up among long names only, `-short` among short
//!   names only
//! - A value-taking option consumes the next token verbatim, even if it
//!   starts with `-`
//! - A flag's presence means `true`
//! - A repeated option overwrites the earlier value
//! - Any other token is an unknown option
//!
//! After all tokens are consumed, every required option must be present.

use thiserror::Error;

use crate::core::option::{OptionDescriptor, OptionValueType};
use crate::core::value::{OptionValue, ParsedOptions};

/// Argument validation errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown option '{token}' for command '{command}'")]
    UnknownOption { command: String, token: String },

    #[error("invalid value '{value}' for option '--{option}' of command '{command}': expected {expected}")]
    InvalidValue {
        command: String,
        option: String,
        value: String,
        expected: OptionValueType,
    },

    #[error("option '--{option}' of command '{command}' expects a {expected} value")]
    MissingValue {
        command: String,
        option: String,
        expected: OptionValueType,
    },

    #[error("command '{command}' requires option '--{option}'")]
    MissingRequired { command: String, option: String },
}

/// Parse raw tokens against a command's options.
///
/// # Example
///
/// ```
/// # use stageshell::core::registry::Shell;
/// # use stageshell::core::option::OptionValueType;
/// use stageshell::engine::parse::parse_args;
///
/// # let mut shell: Shell<()> = Shell::new();
/// # let mut draft = shell.add_command("write_fabric_verilog").unwrap();
/// # let file = draft.add_option("file", true, "").unwrap();
/// # draft.set_option_short_name(file, "f").unwrap();
/// # draft.set_option_require_value(file, OptionValueType::String).unwrap();
/// # draft.add_option("verbose", false, "").unwrap();
/// # let id = shell.finalize_command(draft, "").unwrap();
/// # let cmd = shell.command(id).unwrap();
/// let args = vec!["-f".to_string(), "out/".to_string(), "--verbose".to_string()];
/// let parsed = parse_args("write_fabric_verilog", cmd.options(), &args).unwrap();
/// assert_eq!(parsed.get_str("file"), Some("out/"));
/// assert!(parsed.flag("verbose"));
/// ```
pub fn parse_args(
    command: &str,
    options: &[OptionDescriptor],
    args: &[String],
) -> Result<ParsedOptions, ParseError> {
    let mut parsed = ParsedOptions::new();
    let mut tokens = args.iter();

    while let Some(token) = tokens.next() {
        let option = lookup(options, token).ok_or_else(|| ParseError::UnknownOption {
            command: command.to_string(),
            token: token.clone(),
        })?;

        let value = match option.value_type() {
            None => OptionValue::Bool(true),
            Some(expected) => {
                let raw = tokens.next().ok_or_else(|| ParseError::MissingValue {
                    command: command.to_string(),
                    option: option.name().to_string(),
                    expected,
                })?;
                coerce(raw, expected).ok_or_else(|| ParseError::InvalidValue {
                    command: command.to_string(),
                    option: option.name().to_string(),
                    value: raw.clone(),
                    expected,
                })?
            }
        };
        parsed.insert(option.name().as_str(), value);
    }

    if let Some(missing) = options
        .iter()
        .find(|o| o.is_required() && !parsed.contains(o.name().as_str()))
    {
        return Err(ParseError::MissingRequired {
            command: command.to_string(),
            option: missing.name().to_string(),
        });
    }

    Ok(parsed)
}

fn lookup<'a>(options: &'a [OptionDescriptor], token: &str) -> Option<&'a OptionDescriptor> {
    if let Some(long) = token.strip_prefix("--") {
        options.iter().find(|o| o.name().as_str() == long)
    } else if let Some(short) = token.strip_prefix('-') {
        options
            .iter()
            .find(|o| o.short_name().is_some_and(|s| s.as_str() == short))
    } else {
        None
    }
}

/// Coerce a raw token to the expected type.
pub fn coerce(raw: &str, expected: OptionValueType) -> Option<OptionValue> {
    match expected {
        OptionValueType::String => Some(OptionValue::String(raw.to_string())),
        OptionValueType::Int => raw.parse::<i64>().ok().map(OptionValue::Int),
        OptionValueType::Float => raw
            .parse::<f64>()
            .ok()
            .filter(|x| x.is_finite())
            .map(OptionValue::Float),
        OptionValueType::Bool => match raw.to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Some(OptionValue::Bool(true)),
            "false" | "no" | "off" | "0" => Some(OptionValue::Bool(false)),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::command::{CommandDraft, ExecutionResult};
    use crate::core::option::OptionSpec;
    use crate::core::registry::Shell;

    fn args(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|s| s.to_string()).collect()
    }

    /// Options of a command shaped like `write_verilog_testbench`.
    fn testbench_options() -> Vec<OptionDescriptor> {
        let mut shell: Shell<()> = Shell::new();
        let mut draft: CommandDraft = shell.add_command("write_verilog_testbench").unwrap();
        for spec in [
            OptionSpec::value("file", OptionValueType::String)
                .short("f")
                .required(),
            OptionSpec::value("pin_constraints_file", OptionValueType::String).short("pcf"),
            OptionSpec::value("reference_benchmark_file_path", OptionValueType::String).required(),
            OptionSpec::value("seed", OptionValueType::Int),
            OptionSpec::value("period", OptionValueType::Float),
            OptionSpec::value("autocheck", OptionValueType::Bool),
            OptionSpec::flag("verbose"),
        ] {
            draft.apply_option(&spec).unwrap();
        }
        let id = shell.finalize_command(draft, "").unwrap();
        shell
            .set_command_execute_function(id, |_, _| Ok(ExecutionResult::success()))
            .unwrap();
        shell.command(id).unwrap().options().to_vec()
    }

    fn parse(tokens: &[&str]) -> Result<ParsedOptions, ParseError> {
        parse_args("write_verilog_testbench", &testbench_options(), &args(tokens))
    }

    mod accepted {
        use super::*;

        #[test]
        fn long_and_short_forms() {
            let parsed = parse(&[
                "--file",
                "out/",
                "-pcf",
                "pins.pcf",
                "--reference_benchmark_file_path",
                "ref.v",
                "--verbose",
            ])
            .unwrap();

            assert_eq!(parsed.get_str("file"), Some("out/"));
            assert_eq!(parsed.get_str("pin_constraints_file"), Some("pins.pcf"));
            assert_eq!(parsed.get_str("reference_benchmark_file_path"), Some("ref.v"));
            assert!(parsed.flag("verbose"));
            assert_eq!(parsed.len(), 4);
        }

        #[test]
        fn short_and_long_yield_identical_options() {
            let long = parse(&["--file", "out/", "--reference_benchmark_file_path", "r.v"]).unwrap();
            let short = parse(&["-f", "out/", "--reference_benchmark_file_path", "r.v"]).unwrap();
            assert_eq!(long, short);
        }

        #[test]
        fn typed_values() {
            let parsed = parse(&[
                "-f",
                "o",
                "--reference_benchmark_file_path",
                "r",
                "--seed",
                "-7",
                "--period",
                "2.5",
                "--autocheck",
                "No",
            ])
            .unwrap();

            assert_eq!(parsed.get_int("seed"), Some(-7));
            assert_eq!(parsed.get_float("period"), Some(2.5));
            assert_eq!(parsed.get_bool("autocheck"), Some(false));
        }

        #[test]
        fn value_may_start_with_dash() {
            let parsed = parse(&["-f", "--verbose", "--reference_benchmark_file_path", "r"]).unwrap();
            assert_eq!(parsed.get_str("file"), Some("--verbose"));
            assert!(!parsed.flag("verbose"));
        }

        #[test]
        fn repeated_option_last_wins() {
            let parsed = parse(&[
                "-f",
                "a",
                "--file",
                "b",
                "--reference_benchmark_file_path",
                "r",
            ])
            .unwrap();
            assert_eq!(parsed.get_str("file"), Some("b"));
        }
    }

    mod rejected {
        use super::*;

        #[test]
        fn unknown_long_option() {
            let err = parse(&["--not_a_real_option"]).unwrap_err();
            assert_eq!(
                err,
                ParseError::UnknownOption {
                    command: "write_verilog_testbench".into(),
                    token: "--not_a_real_option".into(),
                }
            );
        }

        #[test]
        fn short_name_is_not_a_long_name() {
            assert!(matches!(
                parse(&["--f", "out/"]),
                Err(ParseError::UnknownOption { .. })
            ));
            assert!(matches!(
                parse(&["-file", "out/"]),
                Err(ParseError::UnknownOption { .. })
            ));
        }

        #[test]
        fn positional_token() {
            assert!(matches!(
                parse(&["out/"]),
                Err(ParseError::UnknownOption { ref token, .. }) if token == "out/"
            ));
        }

        #[test]
        fn missing_required_names_option() {
            let err = parse(&["-f", "out/"]).unwrap_err();
            assert_eq!(
                err,
                ParseError::MissingRequired {
                    command: "write_verilog_testbench".into(),
                    option: "reference_benchmark_file_path".into(),
                }
            );
        }

        #[test]
        fn missing_value_at_end() {
            let err = parse(&["--reference_benchmark_file_path", "r", "-f"]).unwrap_err();
            assert!(matches!(
                err,
                ParseError::MissingValue { ref option, .. } if option == "file"
            ));
        }

        #[test]
        fn type_mismatch() {
            let err = parse(&[
                "-f",
                "o",
                "--reference_benchmark_file_path",
                "r",
                "--seed",
                "many",
            ])
            .unwrap_err();
            assert_eq!(
                err,
                ParseError::InvalidValue {
                    command: "write_verilog_testbench".into(),
                    option: "seed".into(),
                    value: "many".into(),
                    expected: OptionValueType::Int,
                }
            );
        }
    }

    #[test]
    fn coerce_rules() {
        assert_eq!(
            coerce("42", OptionValueType::Int),
            Some(OptionValue::Int(42))
        );
        assert_eq!(coerce("4.2", OptionValueType::Int), None);
        assert_eq!(coerce("inf", OptionValueType::Float), None);
        assert_eq!(
            coerce("ON", OptionValueType::Bool),
            Some(OptionValue::Bool(true))
        );
        assert_eq!(coerce("maybe", OptionValueType::Bool), None);
        assert_eq!(
            coerce("", OptionValueType::String),
            Some(OptionValue::String(String::new()))
        );
    }
}
