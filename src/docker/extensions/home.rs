use super::Extension;
use crate::error::Result;
use crate::identity::IdentityProvider;
use crate::shell;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::sync::Arc;

/// Mounts the invoking user's home directory at the same path in the container
pub struct HomeDir {
    identity: Arc<dyn IdentityProvider>,
}

impl HomeDir {
    pub const NAME: &'static str = "home";
    pub const FLAG: &'static str = "home";

    pub fn new(identity: Arc<dyn IdentityProvider>) -> Self {
        Self { identity }
    }
}

impl Extension for HomeDir {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn register_arguments(&self, cmd: Command) -> Command {
        cmd.arg(
            Arg::new(Self::NAME)
                .long(Self::FLAG)
                .action(ArgAction::SetTrue)
                .help("mount the users home directory"),
        )
    }

    fn docker_args(&self, _args: &ArgMatches) -> Result<String> {
        let home = self.identity.home_dir()?;
        let home = home.to_string_lossy();
        let mount = format!("{}:{}", home, home);
        Ok(format!("-v {}", shell::quote(&mount)))
    }
}
