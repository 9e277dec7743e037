use super::{Extension, SubstitutionCache, Substitutions};
use crate::error::Result;
use crate::identity::IdentityProvider;
use crate::template;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::sync::Arc;

/// Recreates the host user (name, ids, gecos, home, shell) inside the image
pub struct User {
    identity: Arc<dyn IdentityProvider>,
    subs: SubstitutionCache,
}

impl User {
    pub const NAME: &'static str = "user";
    pub const FLAG: &'static str = "user";

    pub fn new(identity: Arc<dyn IdentityProvider>) -> Self {
        Self {
            identity,
            subs: SubstitutionCache::new(),
        }
    }
}

impl Extension for User {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn register_arguments(&self, cmd: Command) -> Command {
        cmd.arg(
            Arg::new(Self::NAME)
                .long(Self::FLAG)
                .action(ArgAction::SetTrue)
                .help("mimic the current host user inside the container"),
        )
    }

    fn environment_subs(&self) -> Result<&Substitutions> {
        self.subs.get_or_try_init(|| {
            let entry = self.identity.current_user()?;
            let mut subs = Substitutions::new();
            subs.insert("name".to_string(), entry.name.into());
            subs.insert("uid".to_string(), entry.uid.into());
            subs.insert("gid".to_string(), entry.gid.into());
            subs.insert("gecos".to_string(), entry.gecos.into());
            subs.insert("dir".to_string(), entry.dir.into());
            subs.insert("shell".to_string(), entry.shell.into());
            crate::log_substitutions_computed!(Self::NAME, subs.len());
            Ok(subs)
        })
    }

    fn snippet(&self, _args: &ArgMatches) -> Result<String> {
        template::render_snippet(Self::NAME, self.environment_subs()?)
    }
}
