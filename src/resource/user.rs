use serde::{Deserialize, Serialize};

use super::Meta;
use crate::config::ListConfig;

/// Built-in account the console never lists.
pub const SUPPORT_USERNAME: &str = "support";

/// Sub-resource action issuing a fresh API token.
pub const REGENERATE_API_TOKEN: &str = "regenerate_api_token";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(flatten)]
    pub meta: Meta,
    pub username: String,
    /// Only sent on create or update; never returned by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// `admin` or `user`.
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(default)]
    pub api_token: String,
}

fn default_role() -> String {
    "user".to_owned()
}

model_resource!(User, "User", "/api/v0/users", username);

/// List settings for the user table: everyone except the support account.
pub fn visible() -> ListConfig<User> {
    ListConfig::default().exclude(|user: &User| user.username == SUPPORT_USERNAME)
}
