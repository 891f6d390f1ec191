/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! # CLI Commands Module
//!
//! ```rust,ignore
//! pub async fn migrate(cli: Cli) -> Result<MigrationReport, Box<dyn std::error::Error>>
//! ```
//!
//! The entry point of the binary, which:
//! 1. Loads settings
//! 2. Initializes logging
//! 3. Resolves the kubeconfig path
//! 4. Runs the migration, writing the report to stdout
//!
//! Any error returned here is fatal; the binary prints it and exits non-zero.

use super::Cli;
use crate::error::MigrationError;
use crate::k8s::api::KubeconfigConnector;
use crate::migration::{self, MigrationPlan, MigrationReport};
use kubeshift_utils::config::Settings;
use kubeshift_utils::logging::prelude::*;
use std::path::PathBuf;

pub async fn migrate(cli: Cli) -> Result<MigrationReport, Box<dyn std::error::Error>> {
    let config = Settings::new(None)?;
    kubeshift_utils::logging::init_with_format(&config.log.level, &config.log.format)?;
    info!("Starting kubeshift");

    let plan = plan_from_cli(cli, default_kubeconfig_path())?;
    debug!("Migration plan: {:?}", plan);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let report = migration::run_migration(&plan, &KubeconfigConnector, &mut out).await?;
    Ok(report)
}

/// Exit status of a finished run: 0 when the migration completed (partial
/// copies included), 2 when it stopped on a fatal error. Usage errors exit
/// with 1 from `parse_cli` before a run starts.
pub fn exit_status<T, E>(outcome: &Result<T, E>) -> u8 {
    match outcome {
        Ok(_) => 0,
        Err(_) => 2,
    }
}

/// Builds the migration plan, falling back to `default_kubeconfig` when no
/// `--kubeconfig` was given.
pub fn plan_from_cli(
    cli: Cli,
    default_kubeconfig: Option<PathBuf>,
) -> Result<MigrationPlan, MigrationError> {
    let kubeconfig = cli
        .kubeconfig
        .or(default_kubeconfig)
        .ok_or(MigrationError::MissingKubeconfig)?;

    Ok(MigrationPlan {
        kubeconfig,
        source_context: cli.cluster_a_context,
        target_context: cli.cluster_b_context,
        namespace: cli.namespace,
    })
}

/// `$HOME/.kube/config`, if the home directory is known.
pub fn default_kubeconfig_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".kube").join("config"))
}
