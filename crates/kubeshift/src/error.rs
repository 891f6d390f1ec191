/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Error types for kubeshift.
//!
//! Everything in [`MigrationError`] is fatal and ends the run. [`ResourceError`]
//! is what a single create call returns; the migration driver reports it and
//! moves on.

use std::path::PathBuf;
use thiserror::Error;

/// Failures of the kubeconfig context switcher.
#[derive(Debug, Error)]
pub enum KubeconfigError {
    #[error("failed to access kubeconfig {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse kubeconfig {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("kubeconfig {path} is not a mapping document")]
    NotAMapping { path: PathBuf },
}

/// Failure of a single create request.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// The API server already holds an object with this name in scope.
    #[error("{resource} \"{name}\" already exists")]
    AlreadyExists {
        resource: &'static str,
        name: String,
    },
    #[error(transparent)]
    Api(kube::Error),
}

impl ResourceError {
    /// Classifies a kube error returned by a create call.
    pub fn from_create(resource: &'static str, name: &str, error: kube::Error) -> Self {
        match &error {
            kube::Error::Api(response)
                if response.code == 409 || response.reason == "AlreadyExists" =>
            {
                ResourceError::AlreadyExists {
                    resource,
                    name: name.to_string(),
                }
            }
            _ => ResourceError::Api(error),
        }
    }

    pub fn is_already_exists(&self) -> bool {
        matches!(self, ResourceError::AlreadyExists { .. })
    }
}

/// Fatal errors of a migration run.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error(transparent)]
    Kubeconfig(#[from] KubeconfigError),
    #[error("no kubeconfig path given and the home directory could not be determined")]
    MissingKubeconfig,
    #[error("failed to load client configuration from {path}: {source}")]
    ClientConfig {
        path: PathBuf,
        #[source]
        source: kube::config::KubeconfigError,
    },
    #[error("failed to create Kubernetes client: {0}")]
    Client(#[source] kube::Error),
    #[error("failed to list deployments in namespace {namespace}: {source}")]
    List {
        namespace: String,
        #[source]
        source: kube::Error,
    },
    #[error("failed to write migration report: {0}")]
    Output(#[from] std::io::Error),
}
