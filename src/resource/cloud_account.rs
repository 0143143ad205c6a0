use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Meta;

/// Credentials for one cloud provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CloudAccount {
    #[serde(flatten)]
    pub meta: Meta,
    pub name: String,
    /// `aws`, `digitalocean`, `gce`, `openstack` or `packet`.
    #[serde(default)]
    pub provider: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub credentials: BTreeMap<String, String>,
}

model_resource!(CloudAccount, "Cloud Account", "/api/v0/cloud_accounts", name);
