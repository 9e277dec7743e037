use super::{Extension, SubstitutionCache, Substitutions};
use crate::error::Result;
use crate::identity::IdentityProvider;
use crate::template;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::sync::Arc;

/// Installs emacs and byobu into the image
pub struct DevHelpers {
    identity: Arc<dyn IdentityProvider>,
    subs: SubstitutionCache,
}

impl DevHelpers {
    pub const NAME: &'static str = "dev_helpers";
    pub const FLAG: &'static str = "dev-helpers";

    pub fn new(identity: Arc<dyn IdentityProvider>) -> Self {
        Self {
            identity,
            subs: SubstitutionCache::new(),
        }
    }
}

impl Extension for DevHelpers {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn register_arguments(&self, cmd: Command) -> Command {
        cmd.arg(
            Arg::new(Self::NAME)
                .long(Self::FLAG)
                .action(ArgAction::SetTrue)
                .help("add development tools emacs and byobu to your environment"),
        )
    }

    fn environment_subs(&self) -> Result<&Substitutions> {
        self.subs.get_or_try_init(|| {
            let mut subs = Substitutions::new();
            subs.insert("user_id".to_string(), self.identity.uid().into());
            subs.insert("username".to_string(), self.identity.username()?.into());
            crate::log_substitutions_computed!(Self::NAME, subs.len());
            Ok(subs)
        })
    }

    fn snippet(&self, _args: &ArgMatches) -> Result<String> {
        template::render_snippet(Self::NAME, self.environment_subs()?)
    }
}
