use crate::error::Result;
use clap::{ArgMatches, Command};
use once_cell::sync::OnceCell;

pub mod dev_helpers;
pub mod env;
pub mod home;
pub mod pulse;
pub mod registry;
pub mod user;

pub use crate::template::{SubstitutionValue, Substitutions};
pub use dev_helpers::DevHelpers;
pub use env::Environment;
pub use home::HomeDir;
pub use pulse::PulseAudio;
pub use registry::{BuildPlan, ExtensionRegistry};
pub use user::User;

static NO_SUBSTITUTIONS: Substitutions = Substitutions::new();

/// A pluggable unit contributing a CLI flag, Dockerfile text and `docker run` arguments.
///
/// Only `name` and `register_arguments` are required; the rest default to producing nothing.
pub trait Extension: Send + Sync {
    /// Stable identifier; also the clap argument id and the source of the flag name
    fn name(&self) -> &'static str;

    /// Add this extension's flag(s) to the shared command
    fn register_arguments(&self, cmd: Command) -> Command;

    /// Whether the user asked for this extension on the command line
    fn is_enabled(&self, args: &ArgMatches) -> bool {
        matches!(args.try_get_one::<bool>(self.name()), Ok(Some(&true)))
    }

    /// Values fed into this extension's snippet template, computed once per instance
    fn environment_subs(&self) -> Result<&Substitutions> {
        Ok(&NO_SUBSTITUTIONS)
    }

    /// Text placed ahead of the `FROM` line
    fn preamble(&self, _args: &ArgMatches) -> Result<String> {
        Ok(String::new())
    }

    /// Dockerfile fragment placed after the `FROM` line
    fn snippet(&self, _args: &ArgMatches) -> Result<String> {
        Ok(String::new())
    }

    /// Flags appended to the `docker run` invocation
    fn docker_args(&self, _args: &ArgMatches) -> Result<String> {
        Ok(String::new())
    }
}

/// `dev_helpers` -> `--dev-helpers`
pub fn name_to_argument(name: &str) -> String {
    format!("--{}", name.replace('_', "-"))
}

/// One-shot cache for an extension's substitution map.
///
/// The lookup runs at most once on success, even when several threads ask at the same
/// time: concurrent callers block until the first initialiser finishes. A failed lookup
/// is not cached, so the same error resurfaces on the next call.
#[derive(Debug, Default)]
pub struct SubstitutionCache {
    cell: OnceCell<Substitutions>,
}

impl SubstitutionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_try_init<F>(&self, compute: F) -> Result<&Substitutions>
    where
        F: FnOnce() -> Result<Substitutions>,
    {
        self.cell.get_or_try_init(compute)
    }

    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }
}
