use super::{Extension, SubstitutionCache, SubstitutionValue, Substitutions};
use crate::constants::{AUDIO_GROUP, XDG_RUNTIME_DIR};
use crate::error::{ExtensionError, Result};
use crate::identity::IdentityProvider;
use crate::shell;
use crate::template;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::sync::Arc;

/// Shares the host PulseAudio server and sound devices with the container
pub struct PulseAudio {
    identity: Arc<dyn IdentityProvider>,
    subs: SubstitutionCache,
}

impl PulseAudio {
    pub const NAME: &'static str = "pulse";
    pub const FLAG: &'static str = "pulse";

    pub fn new(identity: Arc<dyn IdentityProvider>) -> Self {
        Self {
            identity,
            subs: SubstitutionCache::new(),
        }
    }

    fn lookup(&self, subs: &Substitutions, key: &str) -> Result<String> {
        subs.get(key)
            .map(SubstitutionValue::to_string)
            .ok_or_else(|| ExtensionError::UnresolvedSubstitution {
                key: key.to_string(),
                template: format!("{} docker arguments", Self::NAME),
            })
    }
}

impl Extension for PulseAudio {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn register_arguments(&self, cmd: Command) -> Command {
        cmd.arg(
            Arg::new(Self::NAME)
                .long(Self::FLAG)
                .action(ArgAction::SetTrue)
                .help("mount pulse audio devices"),
        )
    }

    fn environment_subs(&self) -> Result<&Substitutions> {
        self.subs.get_or_try_init(|| {
            let runtime_dir = self.identity.env_var(XDG_RUNTIME_DIR).ok_or_else(|| {
                ExtensionError::MissingEnvironment {
                    var: XDG_RUNTIME_DIR.to_string(),
                }
            })?;
            let audio_gid = self.identity.group_id(AUDIO_GROUP)?;

            let mut subs = Substitutions::new();
            subs.insert("user_id".to_string(), self.identity.uid().into());
            subs.insert(XDG_RUNTIME_DIR.to_string(), runtime_dir.into());
            subs.insert("audio_group_id".to_string(), audio_gid.into());
            crate::log_substitutions_computed!(Self::NAME, subs.len());
            Ok(subs)
        })
    }

    fn snippet(&self, _args: &ArgMatches) -> Result<String> {
        template::render_snippet(Self::NAME, self.environment_subs()?)
    }

    fn docker_args(&self, _args: &ArgMatches) -> Result<String> {
        let subs = self.environment_subs()?;
        let uid = self.lookup(subs, "user_id")?;
        let runtime_dir = self.lookup(subs, XDG_RUNTIME_DIR)?;
        let audio_gid = self.lookup(subs, "audio_group_id")?;

        let user_socket_dir = format!("/run/user/{uid}/pulse");
        let native_socket = format!("{runtime_dir}/pulse/native");

        let args = [
            format!(
                "-v {}",
                shell::quote(&format!("{user_socket_dir}:{user_socket_dir}"))
            ),
            "--device /dev/snd".to_string(),
            format!(
                "-e {}",
                shell::quote(&format!("PULSE_SERVER=unix:{native_socket}"))
            ),
            format!(
                "-v {}",
                shell::quote(&format!("{native_socket}:{native_socket}"))
            ),
            format!("--group-add {}", shell::quote(&audio_gid)),
        ];
        Ok(args.join(" "))
    }
}
