//! Command handlers
//!
//! Thin glue between the clap surface and the library: resolve configuration,
//! run the operation, print the result, map the outcome to an exit code. The
//! detect handler follows the buildpack lifecycle's contract: exit 0 on pass,
//! 100 on a normal non-pass, 1 on error.

use crate::cli::commands::{DetectArgs, LinkArgs};
use crate::config::DetectConfig;
use crate::detect;
use crate::linker::{FileLinker, LinkerConfig};
use crate::plan::DetectResult;
use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::error;

/// Exit code the lifecycle interprets as "detection did not pass".
const EXIT_DETECT_FAIL: i32 = 100;

pub fn handle_detect(args: &DetectArgs, quiet: bool) -> i32 {
    match run_detect(args, quiet) {
        Ok(result) if result.pass => 0,
        Ok(_) => EXIT_DETECT_FAIL,
        Err(err) => {
            error!("{err:#}");
            1
        }
    }
}

fn run_detect(args: &DetectArgs, quiet: bool) -> Result<DetectResult> {
    let app_root = args
        .application_path
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));

    let config = match &args.server_name {
        Some(name) => DetectConfig::with_server_name(name),
        None => DetectConfig::from_env().context("could not resolve configuration")?,
    };

    let result = detect::detect(&app_root, &config)
        .with_context(|| format!("detection failed for {}", app_root.display()))?;

    if !quiet {
        let json = serde_json::to_string_pretty(&result)
            .context("could not serialize build plan")?;
        println!("{json}");
    }

    Ok(result)
}

pub fn handle_link(args: &LinkArgs, quiet: bool) -> i32 {
    match run_link(args) {
        Ok(path) => {
            if !quiet {
                println!("{}", path.display());
            }
            0
        }
        Err(err) => {
            error!("{err:#}");
            1
        }
    }
}

fn run_link(args: &LinkArgs) -> Result<PathBuf> {
    let config = LinkerConfig::from_env().context("could not resolve configuration")?;
    let config = LinkerConfig {
        source_dir: args.source.clone().unwrap_or(config.source_dir),
        runtime_root: args.runtime_root.clone().unwrap_or(config.runtime_root),
        server_name: config.server_name,
    };

    FileLinker::new(config).link().context("linking failed")
}
