use serde::{Deserialize, Serialize};

use super::Meta;

/// A persistent disk attached to a kube.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Volume {
    #[serde(flatten)]
    pub meta: Meta,
    pub kube_name: String,
    pub name: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    /// Size in GB.
    #[serde(default)]
    pub size: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kube_resource_id: Option<i64>,
    #[serde(default)]
    pub provider_id: String,
}

model_resource!(Volume, "Volume", "/api/v0/volumes", name);
