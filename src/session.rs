//! Where requests go and how they authenticate.

use std::fmt;

use reqwest::header::HeaderValue;
use reqwest::Url;

use crate::error::{Error, Result};

/// Port the API server listens on when the console is served from `localhost`.
pub const LOCAL_API_PORT: u16 = 8080;

/// The credential carried in the `Authorization` header.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    /// A login session id, as issued by `POST /api/v0/sessions`.
    Session(String),
    /// A long-lived user API token.
    Token(String),
}

impl Credential {
    /// Renders the `SGAPI <kind>="<value>"` header the API server expects.
    pub fn header_value(&self) -> Result<HeaderValue> {
        let (kind, value) = match self {
            Self::Session(id) => ("session", id),
            Self::Token(token) => ("token", token),
        };
        let mut header = HeaderValue::from_str(&format!(r#"SGAPI {kind}="{value}""#))?;
        header.set_sensitive(true);
        Ok(header)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Session(_) => f.write_str("Session(..)"),
            Self::Token(_) => f.write_str("Token(..)"),
        }
    }
}

/// Request-scoped context: the API endpoint plus the credential, if logged in.
///
/// Every request issued through [`Client`](crate::Client) reads the
/// credential from here; nothing is kept in process-wide state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    endpoint: Url,
    credential: Option<Credential>,
}

impl Session {
    /// An anonymous session against `endpoint`.
    pub fn new(endpoint: Url) -> Self {
        Self {
            endpoint,
            credential: None,
        }
    }

    /// Parses `endpoint` and builds an anonymous session.
    pub fn parse(endpoint: &str) -> Result<Self> {
        Url::parse(endpoint)
            .map(Self::new)
            .map_err(|err| Error::InvalidUrl(format!("{endpoint}: {err}")))
    }

    /// Derives the API endpoint from the address the console is served at.
    ///
    /// `/<prefix>/ui/...` maps to `/<prefix>/server` on the same origin,
    /// `localhost` maps to port 8080, and anything else maps to the bare origin.
    pub fn endpoint_for_location(location: &Url) -> Result<Url> {
        let mut endpoint = location.clone();
        endpoint.set_query(None);
        endpoint.set_fragment(None);

        let segments: Vec<&str> = location
            .path_segments()
            .map(Iterator::collect)
            .unwrap_or_default();
        if segments.get(1) == Some(&"ui") {
            endpoint.set_path(&format!("/{}/server", segments[0]));
            return Ok(endpoint);
        }

        endpoint.set_path("/");
        if location.host_str() == Some("localhost") {
            endpoint
                .set_port(Some(LOCAL_API_PORT))
                .map_err(|()| Error::InvalidUrl(location.to_string()))?;
        } else {
            endpoint
                .set_port(None)
                .map_err(|()| Error::InvalidUrl(location.to_string()))?;
        }
        Ok(endpoint)
    }

    /// Attaches a credential.
    pub fn with_credential(mut self, credential: Credential) -> Self {
        self.credential = Some(credential);
        self
    }

    /// Drops the credential, e.g. after logging out.
    pub fn anonymous(mut self) -> Self {
        self.credential = None;
        self
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    /// Joins an absolute API path (`/api/v0/...`) onto the endpoint,
    /// keeping any path prefix the endpoint already has.
    pub fn url(&self, path: &str) -> Result<Url> {
        let joined = format!(
            "{}/{}",
            self.endpoint.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&joined).map_err(|err| Error::InvalidUrl(format!("{joined}: {err}")))
    }
}
