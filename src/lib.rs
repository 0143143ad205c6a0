//! sg-console keeps tables of Supergiant API resources up to date:
//! clusters ("kubes"), nodes, pods, services, load balancers, users,
//! sessions, cloud accounts and helm repos, charts and releases.
//!
//! A [`ListController`] polls one REST collection on a fixed interval and
//! holds a [`ListState`]: the last snapshot, the subset matching the current
//! search text, and a selection that survives refreshes by re-resolving
//! each selected id against every new snapshot.
//! Batch actions such as [`ListController::delete_selected`] run per item
//! and report each outcome through a [`Notifier`].
//!
//! The HTTP side is a thin [`Client`] carrying an explicit [`Session`],
//! plus one typed [`Api`] per resource collection.

pub mod api;
pub use api::{Api, Collection, ListPage, ListParams};
pub mod client;
pub use client::Client;
pub mod config;
pub use config::ListConfig;
pub mod controller;
pub use controller::{BatchReport, ListController, Phase};
pub mod error;
pub use error::{Error, Result, SelectionError};
pub mod list;
pub use list::{ListState, Selection};
pub mod notify;
pub use notify::{Kind, Notifier};
pub mod resource;
pub use resource::Resource;
pub mod session;
pub use session::{Credential, Session};

#[cfg(test)]
mod test_server;
