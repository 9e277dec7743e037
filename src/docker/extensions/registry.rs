use super::{DevHelpers, Environment, Extension, HomeDir, PulseAudio, User};
use crate::docker::dockerfile;
use crate::error::{ExtensionError, Result};
use crate::identity::IdentityProvider;
use clap::{ArgMatches, Command};
use serde::Serialize;
use std::sync::Arc;

/// Everything the driver needs to build and start the extended image
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildPlan {
    pub base_image: String,
    pub extensions: Vec<String>,
    pub dockerfile: String,
    pub docker_args: String,
}

/// Ordered set of extensions; registration order drives flag order and output order
#[derive(Default)]
pub struct ExtensionRegistry {
    extensions: Vec<Box<dyn Extension>>,
}

impl ExtensionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The extensions shipped with dockext, in their canonical order
    pub fn builtin(identity: Arc<dyn IdentityProvider>) -> Self {
        let extensions: Vec<Box<dyn Extension>> = vec![
            Box::new(DevHelpers::new(identity.clone())),
            Box::new(PulseAudio::new(identity.clone())),
            Box::new(HomeDir::new(identity.clone())),
            Box::new(User::new(identity)),
            Box::new(Environment::new()),
        ];
        Self { extensions }
    }

    pub fn register(&mut self, ext: Box<dyn Extension>) -> Result<()> {
        if self.get(ext.name()).is_some() {
            return Err(ExtensionError::DuplicateExtension {
                name: ext.name().to_string(),
            });
        }
        tracing::trace!(extension = ext.name(), "Registered extension");
        self.extensions.push(ext);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&dyn Extension> {
        self.extensions
            .iter()
            .find(|e| e.name() == name)
            .map(|e| e.as_ref())
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.extensions.iter().map(|e| e.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    /// Add every extension's flags to `cmd`, in registration order
    pub fn register_arguments(&self, cmd: Command) -> Command {
        self.extensions
            .iter()
            .fold(cmd, |cmd, ext| ext.register_arguments(cmd))
    }

    /// Extensions whose flag was supplied, in registration order
    pub fn active(&self, args: &ArgMatches) -> Vec<&dyn Extension> {
        self.extensions
            .iter()
            .filter(|e| e.is_enabled(args))
            .map(|e| e.as_ref())
            .collect()
    }

    /// Render the Dockerfile and `docker run` arguments for the enabled extensions
    pub fn plan(&self, args: &ArgMatches, base_image: &str) -> Result<BuildPlan> {
        let active = self.active(args);

        let mut preambles = Vec::new();
        let mut snippets = Vec::new();
        let mut docker_args = Vec::new();

        for ext in &active {
            crate::log_extension_enabled!(ext.name());
            match render_one(*ext, args) {
                Ok((preamble, snippet, run_args)) => {
                    preambles.push(preamble);
                    snippets.push(snippet);
                    docker_args.push(run_args);
                }
                Err(err) => {
                    tracing::error!(
                        extension = ext.name(),
                        subject = %err.subject(),
                        error = %err,
                        "Extension failed to activate"
                    );
                    return Err(err);
                }
            }
        }

        let dockerfile = dockerfile::assemble(base_image, &preambles, &snippets);
        let docker_args = join_args(&docker_args);

        Ok(BuildPlan {
            base_image: base_image.to_string(),
            extensions: active.iter().map(|e| e.name().to_string()).collect(),
            dockerfile,
            docker_args,
        })
    }
}

fn render_one(ext: &dyn Extension, args: &ArgMatches) -> Result<(String, String, String)> {
    Ok((ext.preamble(args)?, ext.snippet(args)?, ext.docker_args(args)?))
}

/// Join argument fragments with single spaces, skipping empty ones
pub fn join_args<S: AsRef<str>>(fragments: &[S]) -> String {
    fragments
        .iter()
        .map(|f| f.as_ref().trim())
        .filter(|f| !f.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
