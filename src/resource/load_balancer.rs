use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Meta;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadBalancer {
    #[serde(flatten)]
    pub meta: Meta,
    pub kube_name: String,
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub selector: BTreeMap<String, String>,
    /// External port to internal port.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub ports: BTreeMap<String, u16>,
    #[serde(default)]
    pub address: String,
}

model_resource!(LoadBalancer, "Load Balancer", "/api/v0/load_balancers", name);
