use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Meta;

/// A chart repository known to the platform.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HelmRepo {
    #[serde(flatten)]
    pub meta: Meta,
    pub name: String,
    #[serde(default)]
    pub url: String,
}

model_resource!(HelmRepo, "Helm Repo", "/api/v0/helm_repos", name);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HelmChart {
    #[serde(flatten)]
    pub meta: Meta,
    pub repo_name: String,
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub default_config: Map<String, Value>,
}

model_resource!(HelmChart, "Helm Chart", "/api/v0/helm_charts", name);

/// An installed chart ("app") on a kube.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HelmRelease {
    #[serde(flatten)]
    pub meta: Meta,
    pub kube_name: String,
    pub repo_name: String,
    pub chart_name: String,
    #[serde(default)]
    pub chart_version: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub revision: String,
    #[serde(default)]
    pub status_value: String,
    #[serde(default)]
    pub updated_value: String,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub config: Map<String, Value>,
}

model_resource!(HelmRelease, "App", "/api/v0/helm_releases", name);
