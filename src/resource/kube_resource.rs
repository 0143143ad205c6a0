use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Meta;
use crate::config::ListConfig;

/// A raw Kubernetes object managed through the API (pods, services, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KubeResource {
    #[serde(flatten)]
    pub meta: Meta,
    pub kube_name: String,
    /// Kubernetes kind, e.g. `Pod` or `Service`.
    pub kind: String,
    #[serde(default)]
    pub namespace: String,
    pub name: String,
    /// The Kubernetes definition itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<Value>,
    #[serde(default)]
    pub started: bool,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub extra_data: Map<String, Value>,
}

model_resource!(KubeResource, "Kube Resource", "/api/v0/kube_resources", name);

pub const START: &str = "start";
pub const STOP: &str = "stop";

/// List settings for kube resources of one Kubernetes kind.
pub fn of_kind(kind: &str) -> ListConfig<KubeResource> {
    ListConfig::default().filter("kind", kind)
}

pub fn pods() -> ListConfig<KubeResource> {
    of_kind("Pod")
}

pub fn services() -> ListConfig<KubeResource> {
    of_kind("Service")
}
