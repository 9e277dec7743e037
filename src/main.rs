use anyhow::{Context, Result};
use dockext::config::{self, DriverConfig, OutputFormat};
use dockext::docker::runner::{self, DockerInvocation};
use dockext::{logging, ExtensionRegistry, SystemIdentity};
use serde_json::json;
use std::sync::Arc;

fn main() -> Result<()> {
    let registry = ExtensionRegistry::builtin(Arc::new(SystemIdentity::new()));
    let matches = config::command(&registry).get_matches();
    let config = DriverConfig::from_matches(&matches)?;

    logging::init_logging(config.json_logs)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    tracing::info!(image = %config.image, "Planning extended image");
    let plan = registry
        .plan(&matches, &config.image)
        .context("Failed to activate extensions")?;

    runner::write_build_context(&config.build_dir, &plan.dockerfile)?;
    let invocation = DockerInvocation::new(&config.docker, &config.build_dir, &plan, &config.command)?;

    if config.execute {
        invocation.execute()?;
        return Ok(());
    }

    match config.output {
        OutputFormat::Json => {
            let report = json!({
                "plan": plan,
                "build_dir": config.build_dir,
                "invocation": invocation,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            if plan.extensions.is_empty() {
                println!("# extensions: (none)");
            } else {
                println!("# extensions: {}", plan.extensions.join(", "));
            }
            println!("# {}", config.build_dir.join("Dockerfile").display());
            print!("{}", plan.dockerfile);
            println!();
            println!("{}", invocation.build_command_line());
            println!("{}", invocation.run_command_line());
        }
    }

    Ok(())
}
