use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Meta;

/// A provisioned Kubernetes cluster.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Kube {
    #[serde(flatten)]
    pub meta: Meta,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_account_name: Option<String>,
    #[serde(default)]
    pub master_node_size: String,
    #[serde(default)]
    pub node_sizes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub master_public_ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kubernetes_version: Option<String>,
    #[serde(default)]
    pub ready: bool,
    /// Provider specific settings, e.g. `aws_config` or `digitalocean_config`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws_config: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digitalocean_config: Option<Value>,
}

model_resource!(Kube, "Kube", "/api/v0/kubes", name);

/// Sub-resource action that (re)runs provisioning of a kube.
pub const PROVISION: &str = "provision";
