use super::Extension;
use crate::error::{ExtensionError, Result};
use crate::shell;
use clap::{Arg, ArgAction, ArgMatches, Command};
use regex::Regex;
use std::sync::LazyLock;

static VARIABLE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("name pattern is valid"));

/// Injects `NAME[=VALUE]` environment variables into the container
#[derive(Debug, Default)]
pub struct Environment;

impl Environment {
    pub const NAME: &'static str = "env";
    pub const FLAG: &'static str = "env";

    pub fn new() -> Self {
        Self
    }
}

/// Check a `NAME[=VALUE]` token; the value part may contain anything
pub fn validate_assignment(token: &str) -> Result<String> {
    let name = token.split_once('=').map_or(token, |(name, _)| name);
    if name.is_empty() {
        return Err(ExtensionError::MalformedEnvToken {
            token: token.to_string(),
            reason: "variable name is empty".to_string(),
        });
    }
    if !VARIABLE_NAME.is_match(name) {
        return Err(ExtensionError::MalformedEnvToken {
            token: token.to_string(),
            reason: format!("'{}' is not a valid variable name", name),
        });
    }
    Ok(token.to_string())
}

impl Extension for Environment {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn register_arguments(&self, cmd: Command) -> Command {
        cmd.arg(
            Arg::new(Self::NAME)
                .long(Self::FLAG)
                .value_name("NAME[=VALUE]")
                .num_args(1..)
                .action(ArgAction::Append)
                .value_parser(validate_assignment)
                .help("set environment variables"),
        )
    }

    fn is_enabled(&self, args: &ArgMatches) -> bool {
        matches!(args.try_get_many::<String>(Self::NAME), Ok(Some(_)))
    }

    fn docker_args(&self, args: &ArgMatches) -> Result<String> {
        let tokens = match args.try_get_many::<String>(Self::NAME) {
            Ok(Some(values)) => values,
            _ => return Ok(String::new()),
        };

        let mut parts = Vec::new();
        for token in tokens {
            validate_assignment(token)?;
            parts.push(format!("-e {}", shell::quote(token)));
        }
        Ok(parts.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_name_and_assignment() {
        assert!(validate_assignment("FOO").is_ok());
        assert!(validate_assignment("FOO=bar").is_ok());
        assert!(validate_assignment("_X1=").is_ok());
        assert!(validate_assignment("PATH=/a:/b=c").is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_names() {
        for token in ["=bar", "", "1FOO=x", "FOO BAR=x", "A-B"] {
            let err = validate_assignment(token).unwrap_err();
            assert!(
                matches!(err, ExtensionError::MalformedEnvToken { token: ref t, .. } if t == token),
                "{token:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_no_tokens_yields_empty_args() {
        let ext = Environment::new();
        let cmd = ext.register_arguments(Command::new("test"));
        let matches = cmd.try_get_matches_from(["test"]).unwrap();
        assert!(!ext.is_enabled(&matches));
        assert_eq!(ext.docker_args(&matches).unwrap(), "");
    }

    #[test]
    fn test_parse_time_rejection() {
        let ext = Environment::new();
        let cmd = ext.register_arguments(Command::new("test"));
        let result = cmd.try_get_matches_from(["test", "--env", "not valid=1"]);
        assert!(result.is_err());
    }
}
