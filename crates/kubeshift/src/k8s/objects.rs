/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

/// Prepares a Deployment read from one cluster for creation in another.
///
/// Only name, namespace and labels survive from the metadata. Resource
/// version, UID, timestamps, owner references, annotations and managed fields
/// are assigned by the source cluster and would be rejected or conflict on
/// create. Status is dropped for the same reason. The spec is kept verbatim.
pub fn strip_for_recreate(deployment: Deployment) -> Deployment {
    let Deployment { metadata, spec, .. } = deployment;
    Deployment {
        metadata: ObjectMeta {
            name: metadata.name,
            namespace: metadata.namespace,
            labels: metadata.labels,
            ..ObjectMeta::default()
        },
        spec,
        status: None,
    }
}

/// Short cluster name for report lines: the first `/`-separated segment of a
/// context name (`cluster-a/admin` -> `cluster-a`).
pub fn cluster_label(context: &str) -> &str {
    context.split('/').next().unwrap_or(context)
}
