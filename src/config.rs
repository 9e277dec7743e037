//! Driver configuration resolved from command-line flags and `DOCKEXT_*` variables.

use crate::constants::{
    DEFAULT_BUILD_DIR, DEFAULT_DOCKER_BIN, ENV_BUILD_DIR, ENV_DOCKER_BIN, ENV_LOG_JSON,
};
use crate::docker::extensions::ExtensionRegistry;
use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;

/// How the plan is reported when not executing it
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverConfig {
    pub image: String,
    pub command: Vec<String>,
    pub build_dir: PathBuf,
    pub docker: String,
    pub execute: bool,
    pub output: OutputFormat,
    pub json_logs: bool,
}

/// The top-level command with driver flags and every registered extension's flags
pub fn command(registry: &ExtensionRegistry) -> Command {
    let base = Command::new("dockext")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Extend a container image with pluggable Dockerfile snippets and run arguments")
        .arg(
            Arg::new("image")
                .required(true)
                .value_name("IMAGE")
                .help("base image to extend"),
        )
        .arg(
            Arg::new("command")
                .value_name("COMMAND")
                .num_args(1..)
                .last(true)
                .help("command to run inside the container (after --)"),
        )
        .arg(
            Arg::new("execute")
                .long("execute")
                .action(ArgAction::SetTrue)
                .help("build the image and start the container instead of printing the plan"),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .value_parser(clap::value_parser!(OutputFormat))
                .default_value("text")
                .help("format used to print the plan"),
        )
        .arg(
            Arg::new("build_dir")
                .long("build-dir")
                .env(ENV_BUILD_DIR)
                .value_parser(clap::value_parser!(PathBuf))
                .default_value(DEFAULT_BUILD_DIR)
                .help("directory the generated Dockerfile is written to"),
        )
        .arg(
            Arg::new("docker")
                .long("docker")
                .env(ENV_DOCKER_BIN)
                .default_value(DEFAULT_DOCKER_BIN)
                .help("container CLI binary"),
        )
        .arg(
            Arg::new("json_logs")
                .long("json-logs")
                .env(ENV_LOG_JSON)
                .action(ArgAction::SetTrue)
                .help("emit logs as JSON"),
        );

    registry.register_arguments(base)
}

impl DriverConfig {
    pub fn from_matches(matches: &ArgMatches) -> Result<Self> {
        let image = matches
            .get_one::<String>("image")
            .cloned()
            .context("missing base image")?;
        let command = matches
            .get_many::<String>("command")
            .map(|values| values.cloned().collect())
            .unwrap_or_default();
        let build_dir = matches
            .get_one::<PathBuf>("build_dir")
            .cloned()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_BUILD_DIR));
        let docker = matches
            .get_one::<String>("docker")
            .cloned()
            .unwrap_or_else(|| DEFAULT_DOCKER_BIN.to_string());
        let output = matches
            .get_one::<OutputFormat>("output")
            .copied()
            .unwrap_or(OutputFormat::Text);

        Ok(Self {
            image,
            command,
            build_dir,
            docker,
            execute: matches.get_flag("execute"),
            output,
            json_logs: matches.get_flag("json_logs"),
        })
    }
}
