//! In-process stand-in for a Kubernetes API server.
//!
//! Each [`FakeCluster`] keeps namespaces and Deployments in memory and answers
//! the handful of requests kubeshift makes. Clients are real `kube::Client`s
//! wired to a `tower-test` mock service, so request building and response
//! parsing go through the same code paths as against a live cluster.

use http::{Request, Response};
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::Namespace;
use kube::client::Body;
use kube::Client;
use kubeshift::error::MigrationError;
use kubeshift::k8s::api::ClusterConnector;
use kubeshift::kubeconfig;
use serde_json::json;
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

pub const CONTEXT_A: &str = "cluster-a/admin";
pub const CONTEXT_B: &str = "cluster-b/admin";

#[derive(Default)]
struct ClusterState {
    namespaces: BTreeSet<String>,
    deployments: BTreeMap<(String, String), Deployment>,
    next_version: u64,
    forbid_list: bool,
}

#[derive(Clone, Default)]
pub struct FakeCluster {
    state: Arc<Mutex<ClusterState>>,
}

impl FakeCluster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_namespace(self, namespace: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .namespaces
            .insert(namespace.to_string());
        self
    }

    /// Adds a Deployment as a live cluster would hold it, with UID and
    /// resource version already assigned.
    pub fn with_deployment(self, namespace: &str, name: &str) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state.namespaces.insert(namespace.to_string());
            let mut deployment = deployment(namespace, name);
            state.assign_cluster_fields(&mut deployment);
            state
                .deployments
                .insert((namespace.to_string(), name.to_string()), deployment);
        }
        self
    }

    /// Makes every Deployment list request fail with 403.
    pub fn forbid_list(self) -> Self {
        self.state.lock().unwrap().forbid_list = true;
        self
    }

    pub fn has_namespace(&self, namespace: &str) -> bool {
        self.state.lock().unwrap().namespaces.contains(namespace)
    }

    pub fn deployment_names(&self, namespace: &str) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .deployments
            .keys()
            .filter(|(ns, _)| ns == namespace)
            .map(|(_, name)| name.clone())
            .collect()
    }

    pub fn get_deployment(&self, namespace: &str, name: &str) -> Option<Deployment> {
        self.state
            .lock()
            .unwrap()
            .deployments
            .get(&(namespace.to_string(), name.to_string()))
            .cloned()
    }

    /// Returns a client whose requests are served by this cluster.
    pub fn client(&self) -> Client {
        let (service, mut handle) = tower_test::mock::pair::<Request<Body>, Response<Body>>();
        let state = self.state.clone();
        tokio::spawn(async move {
            while let Some((request, send)) = handle.next_request().await {
                let response = serve(&state, request).await;
                send.send_response(response);
            }
        });
        Client::new(service, "default")
    }
}

/// A minimal busybox Deployment as a user would submit it.
pub fn deployment(namespace: &str, name: &str) -> Deployment {
    let labels = BTreeMap::from([("app".to_string(), name.to_string())]);
    serde_json::from_value(json!({
        "apiVersion": "apps/v1",
        "kind": "Deployment",
        "metadata": {
            "name": name,
            "namespace": namespace,
            "labels": labels
        },
        "spec": {
            "replicas": 1,
            "selector": {
                "matchLabels": labels
            },
            "template": {
                "metadata": {
                    "labels": labels
                },
                "spec": {
                    "containers": [
                        {
                            "name": "busybox",
                            "image": "busybox:latest",
                            "command": ["sleep", "infinity"]
                        }
                    ]
                }
            }
        }
    }))
    .expect("busybox deployment should deserialize")
}

impl ClusterState {
    fn assign_cluster_fields(&mut self, deployment: &mut Deployment) {
        self.next_version += 1;
        deployment.metadata.uid = Some(format!("uid-{}", self.next_version));
        deployment.metadata.resource_version = Some(self.next_version.to_string());
        deployment.metadata.generation = Some(1);
    }

    fn list_deployments(&self, namespace: &str) -> Response<Body> {
        if self.forbid_list {
            return status(
                403,
                "Forbidden",
                &format!(
                    "deployments.apps is forbidden: cannot list resource \"deployments\" in namespace \"{}\"",
                    namespace
                ),
            );
        }
        let items: Vec<&Deployment> = self
            .deployments
            .iter()
            .filter(|((ns, _), _)| ns == namespace)
            .map(|(_, deployment)| deployment)
            .collect();
        respond(
            200,
            json!({
                "apiVersion": "apps/v1",
                "kind": "DeploymentList",
                "metadata": { "resourceVersion": self.next_version.to_string() },
                "items": items
            }),
        )
    }

    fn create_namespace(&mut self, body: &[u8]) -> Response<Body> {
        let mut namespace: Namespace = match serde_json::from_slice(body) {
            Ok(namespace) => namespace,
            Err(e) => return status(400, "BadRequest", &e.to_string()),
        };
        let name = namespace.metadata.name.clone().unwrap_or_default();
        if self.namespaces.contains(&name) {
            return status(
                409,
                "AlreadyExists",
                &format!("namespaces \"{}\" already exists", name),
            );
        }
        self.next_version += 1;
        namespace.metadata.uid = Some(format!("uid-{}", self.next_version));
        namespace.metadata.resource_version = Some(self.next_version.to_string());
        self.namespaces.insert(name);
        respond(201, json!(namespace))
    }

    fn create_deployment(&mut self, namespace: &str, body: &[u8]) -> Response<Body> {
        let mut deployment: Deployment = match serde_json::from_slice(body) {
            Ok(deployment) => deployment,
            Err(e) => return status(400, "BadRequest", &e.to_string()),
        };
        if !self.namespaces.contains(namespace) {
            return status(
                404,
                "NotFound",
                &format!("namespaces \"{}\" not found", namespace),
            );
        }
        if deployment.metadata.resource_version.is_some() {
            return status(
                400,
                "BadRequest",
                "resourceVersion should not be set on objects to be created",
            );
        }
        let name = deployment.metadata.name.clone().unwrap_or_default();
        let key = (namespace.to_string(), name.clone());
        if self.deployments.contains_key(&key) {
            return status(
                409,
                "AlreadyExists",
                &format!("deployments.apps \"{}\" already exists", name),
            );
        }
        deployment.metadata.namespace = Some(namespace.to_string());
        self.assign_cluster_fields(&mut deployment);
        self.deployments.insert(key, deployment.clone());
        respond(201, json!(deployment))
    }
}

async fn serve(state: &Mutex<ClusterState>, request: Request<Body>) -> Response<Body> {
    let method = request.method().as_str().to_string();
    let path = request.uri().path().to_string();
    let body = request
        .into_body()
        .collect_bytes()
        .await
        .expect("request body should be readable");

    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
    let mut state = state.lock().unwrap();
    match (method.as_str(), segments.as_slice()) {
        ("POST", ["api", "v1", "namespaces"]) => state.create_namespace(&body),
        ("GET", ["apis", "apps", "v1", "namespaces", namespace, "deployments"]) => {
            state.list_deployments(namespace)
        }
        ("POST", ["apis", "apps", "v1", "namespaces", namespace, "deployments"]) => {
            state.create_deployment(namespace, &body)
        }
        _ => status(
            404,
            "NotFound",
            &format!("the server could not find the requested resource ({} {})", method, path),
        ),
    }
}

fn respond(code: u16, value: serde_json::Value) -> Response<Body> {
    Response::builder()
        .status(code)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&value).unwrap()))
        .unwrap()
}

fn status(code: u16, reason: &str, message: &str) -> Response<Body> {
    respond(
        code,
        json!({
            "kind": "Status",
            "apiVersion": "v1",
            "metadata": {},
            "status": "Failure",
            "message": message,
            "reason": reason,
            "code": code
        }),
    )
}

/// Connector that hands out clients of fake clusters, chosen by the
/// kubeconfig's current context at connect time.
pub struct FakeConnector {
    clusters: HashMap<String, FakeCluster>,
    connections: RefCell<Vec<String>>,
}

impl FakeConnector {
    pub fn new(source: &FakeCluster, target: &FakeCluster) -> Self {
        Self {
            clusters: HashMap::from([
                (CONTEXT_A.to_string(), source.clone()),
                (CONTEXT_B.to_string(), target.clone()),
            ]),
            connections: RefCell::new(Vec::new()),
        }
    }

    /// Contexts a client was built for, in order.
    pub fn connections(&self) -> Vec<String> {
        self.connections.borrow().clone()
    }
}

impl ClusterConnector for FakeConnector {
    async fn connect(&self, kubeconfig_path: &Path) -> Result<Client, MigrationError> {
        let context = kubeconfig::current_context(kubeconfig_path)?.unwrap_or_default();
        let cluster = self
            .clusters
            .get(&context)
            .unwrap_or_else(|| panic!("no fake cluster for context {:?}", context));
        self.connections.borrow_mut().push(context);
        Ok(cluster.client())
    }
}

/// Writes a kubeconfig naming both fake clusters, pointing at `current`.
pub fn write_kubeconfig(dir: &TempDir, current: &str) -> PathBuf {
    let path = dir.path().join("config");
    let content = format!(
        r#"apiVersion: v1
kind: Config
clusters:
- name: cluster-a
  cluster:
    server: https://127.0.0.1:6443
- name: cluster-b
  cluster:
    server: https://127.0.0.1:7443
contexts:
- name: {a}
  context:
    cluster: cluster-a
    user: admin
- name: {b}
  context:
    cluster: cluster-b
    user: admin
current-context: {current}
users:
- name: admin
  user:
    token: test-token
"#,
        a = CONTEXT_A,
        b = CONTEXT_B,
        current = current
    );
    std::fs::write(&path, content).expect("Failed to write kubeconfig");
    path
}
