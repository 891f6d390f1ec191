//! # kubeshift
//!
//! Copies every Deployment of a namespace from one Kubernetes cluster to
//! another. Both clusters are reached through a single kubeconfig file whose
//! `current-context` is rewritten before each pass.
//!
//! ## Architecture
//!
//! ### Kubeconfig Module
//! ```rust,ignore
//! pub mod kubeconfig;
//! ```
//! Rewrites `current-context` in place, keeping every other key and its order.
//!
//! ### Kubernetes Module
//! ```rust,ignore
//! pub mod k8s;
//! ```
//! Client construction from the current context, plus list/create calls for
//! Namespaces and Deployments and the metadata stripping applied before a
//! Deployment is recreated.
//!
//! ### Migration Module
//! ```rust,ignore
//! pub mod migration;
//! ```
//! The two-pass driver: snapshot the source namespace, switch, ensure the
//! namespace, recreate each Deployment, report counts.
//!
//! ### CLI Module
//! ```rust,ignore
//! pub mod cli;
//! ```
//! Flag parsing and the command that wires settings, logging and the driver.
//!
//! ## Configuration
//!
//! Logging is configured through `kubeshift_utils::Settings`, e.g.
//! `KUBESHIFT__LOG__LEVEL=debug` or `KUBESHIFT__LOG__FORMAT=json`. What to
//! migrate is given only on the command line:
//!
//! ```text
//! kubeshift --kubeconfig ~/.kube/config \
//!     --cluster_a_context cluster-a/admin \
//!     --cluster_b_context cluster-b/admin \
//!     --namespace test
//! ```

pub mod cli;
pub mod error;
pub mod k8s;
pub mod kubeconfig;
pub mod migration;
