/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! # Kubernetes API Module
//!
//! Client construction and the three resource calls a migration needs.
//!
//! ## Client Creation
//!
//! ```rust,ignore
//! pub trait ClusterConnector {
//!     async fn connect(&self, kubeconfig_path: &Path) -> Result<Client, MigrationError>;
//! }
//! ```
//! [`KubeconfigConnector`] builds a client from whatever context is current in
//! the kubeconfig file. A client is bound to that context when it is built, so
//! it has to be rebuilt after every context switch.
//!
//! ## Resource Calls
//!
//! Each call is one request: no pagination beyond a single unbounded list, no
//! retries, default client timeouts. Create calls are not idempotent; a second
//! create of the same name yields [`ResourceError::AlreadyExists`].

use crate::error::{MigrationError, ResourceError};
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::Namespace;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::api::{ListParams, PostParams};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Api, Client as K8sClient, Config};
use kubeshift_utils::logging::prelude::*;
use std::path::Path;

/// Builds API clients for the cluster a kubeconfig currently points at.
#[allow(async_fn_in_trait)]
pub trait ClusterConnector {
    /// Creates a client for the current context of the kubeconfig at `kubeconfig_path`.
    async fn connect(&self, kubeconfig_path: &Path) -> Result<K8sClient, MigrationError>;
}

/// Connector that resolves credentials from the kubeconfig file on disk.
#[derive(Debug, Default, Clone, Copy)]
pub struct KubeconfigConnector;

impl ClusterConnector for KubeconfigConnector {
    async fn connect(&self, kubeconfig_path: &Path) -> Result<K8sClient, MigrationError> {
        create_k8s_client(kubeconfig_path).await
    }
}

/// Creates a Kubernetes client from the current context of a kubeconfig file.
///
/// # Arguments
/// * `kubeconfig_path` - Path to the kubeconfig file
///
/// # Returns
/// * `Result<K8sClient, MigrationError>` - Kubernetes client, or `ClientConfig`
///   if the file is missing, malformed or its credentials cannot be resolved
pub async fn create_k8s_client(kubeconfig_path: &Path) -> Result<K8sClient, MigrationError> {
    let config_error = |source: kube::config::KubeconfigError| MigrationError::ClientConfig {
        path: kubeconfig_path.to_path_buf(),
        source,
    };

    let kubeconfig = Kubeconfig::read_from(kubeconfig_path).map_err(config_error)?;
    let context = kubeconfig.current_context.clone().unwrap_or_default();
    let config = Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
        .await
        .map_err(config_error)?;

    let client = K8sClient::try_from(config).map_err(MigrationError::Client)?;
    info!(
        "Created Kubernetes client for context '{}' from {}",
        context,
        kubeconfig_path.display()
    );
    Ok(client)
}

/// Lists every Deployment in `namespace`.
///
/// # Returns
/// * `Result<Vec<Deployment>, kube::Error>` - All Deployments (empty if none);
///   transport and authorization errors are returned unchanged
pub async fn list_deployments(
    client: &K8sClient,
    namespace: &str,
) -> Result<Vec<Deployment>, kube::Error> {
    let api: Api<Deployment> = Api::namespaced(client.clone(), namespace);
    let list = api.list(&ListParams::default()).await?;
    debug!(
        "Listed {} deployments in namespace {}",
        list.items.len(),
        namespace
    );
    Ok(list.items)
}

/// Creates a Namespace called `name`.
pub async fn create_namespace(client: &K8sClient, name: &str) -> Result<Namespace, ResourceError> {
    let api: Api<Namespace> = Api::all(client.clone());
    let namespace = Namespace {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            ..ObjectMeta::default()
        },
        ..Namespace::default()
    };

    api.create(&PostParams::default(), &namespace)
        .await
        .map_err(|e| ResourceError::from_create("namespaces", name, e))
}

/// Creates `deployment` in `namespace`.
///
/// The descriptor is sent as given; callers copying from another cluster
/// strip it with [`crate::k8s::objects::strip_for_recreate`] first.
pub async fn create_deployment(
    client: &K8sClient,
    namespace: &str,
    deployment: &Deployment,
) -> Result<Deployment, ResourceError> {
    let api: Api<Deployment> = Api::namespaced(client.clone(), namespace);
    let name = deployment.metadata.name.clone().unwrap_or_default();

    api.create(&PostParams::default(), deployment)
        .await
        .map_err(|e| ResourceError::from_create("deployments.apps", &name, e))
}
