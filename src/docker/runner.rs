use crate::constants::{IMAGE_TAG_HASH_LEN, IMAGE_TAG_PREFIX};
use crate::docker::extensions::BuildPlan;
use anyhow::{bail, Context, Result};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Content-addressed tag for the image built from `dockerfile`
pub fn image_tag(dockerfile: &str) -> String {
    let digest = hex::encode(Sha256::digest(dockerfile.as_bytes()));
    format!("{}{}", IMAGE_TAG_PREFIX, &digest[..IMAGE_TAG_HASH_LEN])
}

/// Write the generated Dockerfile into `build_dir`, creating it if needed
pub fn write_build_context(build_dir: &Path, dockerfile: &str) -> Result<PathBuf> {
    fs::create_dir_all(build_dir)
        .with_context(|| format!("Failed to create build directory {}", build_dir.display()))?;
    let path = build_dir.join("Dockerfile");
    fs::write(&path, dockerfile)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::debug!(path = %path.display(), bytes = dockerfile.len(), "Wrote Dockerfile");
    Ok(path)
}

/// The `docker build` and `docker run` commands for one plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DockerInvocation {
    pub docker: String,
    pub tag: String,
    pub build: Vec<String>,
    pub run: Vec<String>,
}

impl DockerInvocation {
    pub fn new(
        docker: &str,
        build_dir: &Path,
        plan: &BuildPlan,
        command: &[String],
    ) -> Result<Self> {
        let tag = image_tag(&plan.dockerfile);

        let build = vec![
            "build".to_string(),
            "-t".to_string(),
            tag.clone(),
            build_dir.to_string_lossy().into_owned(),
        ];

        let extension_args = shell_words::split(&plan.docker_args)
            .with_context(|| format!("Unparseable docker arguments: {}", plan.docker_args))?;

        let mut run = vec!["run".to_string(), "--rm".to_string(), "-it".to_string()];
        run.extend(extension_args);
        run.push(tag.clone());
        run.extend(command.iter().cloned());

        Ok(Self {
            docker: docker.to_string(),
            tag,
            build,
            run,
        })
    }

    pub fn build_command_line(&self) -> String {
        self.command_line(&self.build)
    }

    pub fn run_command_line(&self) -> String {
        self.command_line(&self.run)
    }

    fn command_line(&self, args: &[String]) -> String {
        shell_words::join(std::iter::once(&self.docker).chain(args))
    }

    /// Build the image, then start the container with inherited stdio
    pub fn execute(&self) -> Result<()> {
        self.step("build", &self.build)?;
        self.step("run", &self.run)
    }

    fn step(&self, name: &str, args: &[String]) -> Result<()> {
        crate::log_docker_invocation!(name, self.docker, args.len());
        let status = Command::new(&self.docker)
            .args(args)
            .status()
            .with_context(|| format!("Failed to spawn {} for docker {}", self.docker, name))?;

        if !status.success() {
            bail!(
                "docker {} exited with status {}",
                name,
                status.code().map_or_else(|| "signal".to_string(), |c| c.to_string())
            );
        }
        Ok(())
    }
}
