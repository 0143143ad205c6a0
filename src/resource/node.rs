use serde::{Deserialize, Serialize};

use super::Meta;

/// A machine belonging to a kube.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(flatten)]
    pub meta: Meta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kube_name: Option<String>,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub provider_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub external_ip: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_creation_timestamp: Option<String>,
    #[serde(default)]
    pub out_of_disk: bool,
    #[serde(default)]
    pub ready: bool,
    #[serde(flatten)]
    pub metrics: ResourceMetrics,
}

/// Usage figures reported by the cluster's metrics pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceMetrics {
    #[serde(default)]
    pub cpu_usage: i64,
    #[serde(default)]
    pub cpu_limit: i64,
    #[serde(default)]
    pub ram_usage: i64,
    #[serde(default)]
    pub ram_limit: i64,
}

model_resource!(Node, "Node", "/api/v0/nodes", name);
