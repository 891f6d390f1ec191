/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! # Migration Driver
//!
//! Copies the Deployments of one namespace from the source cluster to the
//! target cluster in two fixed passes over a shared kubeconfig.
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Driver
//!     participant Kubeconfig
//!     participant ClusterA
//!     participant ClusterB
//!
//!     Driver->>Kubeconfig: switch to source context (if given)
//!     Driver->>ClusterA: list deployments
//!     ClusterA-->>Driver: snapshot
//!     Driver->>Kubeconfig: switch to target context
//!     Driver->>ClusterB: create namespace
//!     Driver->>ClusterB: list deployments
//!     loop For each deployment in snapshot
//!         Driver->>ClusterB: create stripped deployment
//!     end
//!     Driver->>ClusterB: list deployments
//! ```
//!
//! Listing failures and client construction failures abort the run. Namespace
//! and per-Deployment create failures are reported and the run continues, so
//! a partial copy is a valid outcome.
//!
//! A run keeps no state outside of its own call; the snapshot of the source
//! cluster is a local value handed from the listing step to the copy step.

use crate::error::MigrationError;
use crate::k8s::api::{self, ClusterConnector};
use crate::k8s::objects::{cluster_label, strip_for_recreate};
use crate::kubeconfig;
use k8s_openapi::api::apps::v1::Deployment;
use kube::Client as K8sClient;
use kube::ResourceExt;
use kubeshift_utils::logging::prelude::*;
use std::io::Write;
use std::path::PathBuf;

/// What to migrate and between which contexts.
#[derive(Debug, Clone)]
pub struct MigrationPlan {
    /// Kubeconfig shared by both clusters; rewritten in place.
    pub kubeconfig: PathBuf,
    /// Context of the source cluster. When absent the current context is used.
    pub source_context: Option<String>,
    /// Context of the target cluster.
    pub target_context: String,
    /// Namespace copied from the source and created in the target.
    pub namespace: String,
}

/// Outcome of a completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    pub source_count: usize,
    pub target_count_before: usize,
    pub target_count_after: usize,
    pub namespace_created: bool,
    /// Names created in the target cluster, in snapshot order.
    pub copied: Vec<String>,
    /// Names that could not be created, with the error text.
    pub failed: Vec<(String, String)>,
}

/// Runs one migration.
///
/// Progress lines are written to `out`; diagnostics go to the logger.
///
/// # Arguments
/// * `plan` - Kubeconfig, contexts and namespace
/// * `connector` - Builds a client from the kubeconfig after each switch
/// * `out` - Destination of the human-readable report
///
/// # Returns
/// * `Result<MigrationReport, MigrationError>` - Counts and per-item outcome, or
///   the fatal error that ended the run
pub async fn run_migration<C, W>(
    plan: &MigrationPlan,
    connector: &C,
    out: &mut W,
) -> Result<MigrationReport, MigrationError>
where
    C: ClusterConnector,
    W: Write,
{
    writeln!(
        out,
        "\nCluster A: {}",
        plan.source_context.as_deref().unwrap_or_default()
    )?;
    writeln!(out, "Cluster B: {}", plan.target_context)?;
    writeln!(out, "Namespace: {}\n", plan.namespace)?;

    let source_context = match &plan.source_context {
        Some(context) => {
            kubeconfig::switch_context(&plan.kubeconfig, context)?;
            context.clone()
        }
        None => kubeconfig::current_context(&plan.kubeconfig)?.unwrap_or_default(),
    };
    let source_label = cluster_label(&source_context);
    let target_label = cluster_label(&plan.target_context);

    let mut report = MigrationReport::default();

    info!("Reading deployments from context '{}'", source_context);
    let source = connector.connect(&plan.kubeconfig).await?;
    let snapshot = list(&source, &plan.namespace).await?;
    report.source_count = snapshot.len();
    writeln!(
        out,
        "Currently there are {} deployments in the cluster {} in namespace {}\n",
        report.source_count, source_label, plan.namespace
    )?;

    kubeconfig::switch_context(&plan.kubeconfig, &plan.target_context)?;
    info!("Writing deployments to context '{}'", plan.target_context);
    let target = connector.connect(&plan.kubeconfig).await?;

    match api::create_namespace(&target, &plan.namespace).await {
        Ok(namespace) => {
            report.namespace_created = true;
            writeln!(
                out,
                "Created namespace \"{}\" in the cluster {}.",
                namespace.name_any(),
                target_label
            )?;
        }
        Err(e) => {
            if e.is_already_exists() {
                warn!("Namespace {} already present: {}", plan.namespace, e);
            } else {
                error!("Failed to create namespace {}: {}", plan.namespace, e);
            }
            writeln!(out, "{}", e)?;
        }
    }

    report.target_count_before = list(&target, &plan.namespace).await?.len();
    writeln!(
        out,
        "Currently there are {} deployments in the cluster {} in namespace {}",
        report.target_count_before, target_label, plan.namespace
    )?;

    copy_deployments(&target, &plan.namespace, snapshot, &mut report, out).await?;

    report.target_count_after = list(&target, &plan.namespace).await?.len();
    writeln!(
        out,
        "Now there are {} deployments in the cluster {} in namespace {}\n",
        report.target_count_after, target_label, plan.namespace
    )?;

    info!(
        "Migration finished: {} copied, {} failed",
        report.copied.len(),
        report.failed.len()
    );
    Ok(report)
}

async fn list(client: &K8sClient, namespace: &str) -> Result<Vec<Deployment>, MigrationError> {
    api::list_deployments(client, namespace)
        .await
        .map_err(|source| MigrationError::List {
            namespace: namespace.to_string(),
            source,
        })
}

async fn copy_deployments<W: Write>(
    client: &K8sClient,
    namespace: &str,
    snapshot: Vec<Deployment>,
    report: &mut MigrationReport,
    out: &mut W,
) -> Result<(), MigrationError> {
    for deployment in snapshot {
        let deployment = strip_for_recreate(deployment);
        let name = deployment.name_any();

        match api::create_deployment(client, namespace, &deployment).await {
            Ok(created) => {
                debug!("Created deployment {}/{}", namespace, created.name_any());
                writeln!(out, "Created deployment \"{}\".", created.name_any())?;
                report.copied.push(created.name_any());
            }
            Err(e) => {
                if e.is_already_exists() {
                    warn!("Skipping deployment {}/{}: {}", namespace, name, e);
                } else {
                    error!("Failed to create deployment {}/{}: {}", namespace, name, e);
                }
                writeln!(out, "{}", e)?;
                report.failed.push((name, e.to_string()));
            }
        }
    }
    Ok(())
}
