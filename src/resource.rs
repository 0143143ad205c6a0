//! Server-managed entities and the trait the list machinery is generic over.

use std::{fmt::Debug, fmt::Display, hash::Hash};

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

/// A record exposed through a REST collection.
pub trait Resource: Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Stable identity key, used to track selection across refreshes.
    type Id: Clone + Eq + Hash + Debug + Display + Send + Sync + 'static;

    /// Human readable kind, used in notification titles ("User: alice").
    const KIND: &'static str;

    /// Collection path, e.g. `/api/v0/kubes`.
    const PATH: &'static str;

    fn id(&self) -> &Self::Id;

    fn label(&self) -> &str;

    /// The string form of every top-level field, for client-side search.
    ///
    /// Null fields and nested objects yield nothing; arrays are joined with
    /// commas.
    fn search_fields(&self) -> Vec<String> {
        match serde_json::to_value(self) {
            Ok(Value::Object(fields)) => fields.into_iter().filter_map(|(_, v)| field_text(v)).collect(),
            Ok(other) => field_text(other).into_iter().collect(),
            Err(err) => {
                log::warn!("cannot serialize {} {} for search: {err}", Self::KIND, self.id());
                Vec::new()
            }
        }
    }
}

fn field_text(value: Value) -> Option<String> {
    match value {
        Value::Null | Value::Object(_) => None,
        Value::String(s) => Some(s),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(values) => Some(
            values
                .into_iter()
                .map(|v| field_text(v).unwrap_or_default())
                .collect::<Vec<_>>()
                .join(","),
        ),
    }
}

/// Fields shared by every database-backed model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default)]
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    /// Progress of a running or failed asynchronous action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ActionStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passive_status: Option<String>,
    #[serde(default)]
    pub passive_status_okay: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionStatus {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub max_retries: u32,
    #[serde(default)]
    pub retries: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub cancelled: bool,
    #[serde(default)]
    pub steps_completed: u32,
}

/// Implements [`Resource`] for a model that flattens [`Meta`] and has a
/// string label field.
macro_rules! model_resource {
    ($ty:ty, $kind:literal, $path:literal, $label:ident) => {
        impl $crate::resource::Resource for $ty {
            type Id = i64;

            const KIND: &'static str = $kind;
            const PATH: &'static str = $path;

            fn id(&self) -> &i64 {
                &self.meta.id
            }

            fn label(&self) -> &str {
                &self.$label
            }
        }
    };
}

pub mod cloud_account;
pub mod helm;
pub mod kube;
pub mod kube_resource;
pub mod load_balancer;
pub mod node;
pub mod session;
pub mod user;
pub mod volume;

pub use cloud_account::CloudAccount;
pub use helm::{HelmChart, HelmRelease, HelmRepo};
pub use kube::Kube;
pub use kube_resource::KubeResource;
pub use load_balancer::LoadBalancer;
pub use node::Node;
pub use session::UserSession;
pub use user::User;
pub use volume::Volume;
