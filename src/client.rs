//! Authenticated JSON-over-HTTP transport.

use std::{fmt, sync::Arc};

use reqwest::header::{HeaderMap, AUTHORIZATION};
use reqwest::{Method, StatusCode};
use serde::{de::DeserializeOwned, Serialize};

use crate::error::{Error, Result};
use crate::resource::session::{LoginRequest, UserSession};
use crate::session::{Credential, Session};

/// Path of the sessions collection, used for login and logout.
const SESSIONS_PATH: &str = "/api/v0/sessions";

type ExpiredHook = dyn Fn(StatusCode) + Send + Sync;

/// HTTP client bound to one [`Session`].
///
/// Cloning is cheap; clones share the connection pool and the expiry hook.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    session: Session,
    on_expired: Option<Arc<ExpiredHook>>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("session", &self.session)
            .field("on_expired", &self.on_expired.is_some())
            .finish_non_exhaustive()
    }
}

impl Client {
    pub fn new(session: Session) -> Result<Self> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            session,
            on_expired: None,
        })
    }

    /// Registers a callback run whenever the server rejects the credential
    /// (HTTP 401 or 403). The console used this to bounce to its login view.
    pub fn on_session_expired(mut self, f: impl Fn(StatusCode) + Send + Sync + 'static) -> Self {
        self.on_expired = Some(Arc::new(f));
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// A client sharing this one's pool and hook but using another session.
    pub fn with_session(&self, session: Session) -> Self {
        Self {
            http: self.http.clone(),
            session,
            on_expired: self.on_expired.clone(),
        }
    }

    /// Opens a login session and returns a client that uses it.
    pub async fn login(&self, username: &str, password: &str) -> Result<Self> {
        let created: UserSession = self
            .post(SESSIONS_PATH, &LoginRequest::new(username, password))
            .await?;
        log::debug!("logged in as {username}");
        let session = self
            .session
            .clone()
            .with_credential(Credential::Session(created.id));
        Ok(self.with_session(session))
    }

    /// Deletes the current login session, if there is one, and returns an
    /// anonymous client.
    pub async fn logout(&self) -> Result<Self> {
        if let Some(Credential::Session(id)) = self.session.credential() {
            self.delete(&format!("{SESSIONS_PATH}/{id}")).await?;
        }
        Ok(self.with_session(self.session.clone().anonymous()))
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<T> {
        let response = self.execute(Method::GET, path, query, None::<&()>).await?;
        decode(response).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized + Sync,
    {
        let response = self.execute(Method::POST, path, &[], Some(body)).await?;
        decode(response).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized + Sync,
    {
        let response = self.execute(Method::PUT, path, &[], Some(body)).await?;
        decode(response).await
    }

    /// Issues a `DELETE`; the response body is ignored beyond its status.
    pub async fn delete(&self, path: &str) -> Result<()> {
        self.execute(Method::DELETE, path, &[], None::<&()>)
            .await
            .map(drop)
    }

    async fn execute<B>(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<&B>,
    ) -> Result<reqwest::Response>
    where
        B: Serialize + ?Sized + Sync,
    {
        let mut url = self.session.url(path)?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }

        let mut headers = HeaderMap::new();
        if let Some(credential) = self.session.credential() {
            headers.insert(AUTHORIZATION, credential.header_value()?);
        }

        let request = self.http.request(method.clone(), url).headers(headers);
        let request = match body {
            Some(body) => request.json(body),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            log::warn!("{method} {path}: session rejected with {status}");
            if let Some(hook) = &self.on_expired {
                hook(status);
            }
            return Err(Error::SessionExpired { status });
        }

        let body = response.text().await.unwrap_or_default();
        Err(Error::Status { status, body })
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[cfg(test)]
impl Client {
    /// A client that ignores proxy settings from the environment.
    pub(crate) fn direct(session: Session) -> Self {
        Self {
            http: reqwest::Client::builder().no_proxy().build().unwrap(),
            session,
            on_expired: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;
    use serde_json::json;

    use super::*;
    use crate::api::ListParams;
    use crate::test_server::{Reply, TestServer};

    fn empty_page() -> Reply {
        Reply::json(200, json!({ "items": [], "total": 0, "limit": 1000, "offset": 0 }))
    }

    #[tokio::test]
    async fn session_id_goes_in_authorization_header() {
        let server = TestServer::start(vec![empty_page()]).await;
        let client = server.client(Some(Credential::Session("abc".into())));

        let _: serde_json::Value = client
            .get("/api/v0/kubes", &ListParams::default().query())
            .await
            .unwrap();

        let requests = server.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "GET");
        assert_eq!(requests[0].target, "/api/v0/kubes?limit=1000");
        assert_eq!(
            requests[0].header("Authorization"),
            Some(r#"SGAPI session="abc""#)
        );
    }

    #[tokio::test]
    async fn api_token_goes_in_authorization_header() {
        let server = TestServer::start(vec![empty_page()]).await;
        let client = server.client(Some(Credential::Token("t0k3n".into())));

        let _: serde_json::Value = client.get("/api/v0/users", &[]).await.unwrap();

        assert_eq!(
            server.requests()[0].header("authorization"),
            Some(r#"SGAPI token="t0k3n""#)
        );
    }

    #[tokio::test]
    async fn anonymous_requests_carry_no_authorization() {
        let server = TestServer::start(vec![empty_page()]).await;
        let client = server.client(None);

        let _: serde_json::Value = client.get("/api/v0/kubes", &[]).await.unwrap();

        assert_eq!(server.requests()[0].header("authorization"), None);
    }

    #[tokio::test]
    async fn endpoint_prefix_is_kept() {
        let server = TestServer::start(vec![empty_page()]).await;
        let session = Session::parse(&format!("{}/sg/server/", server.address())).unwrap();
        let client = Client::direct(session);

        let _: serde_json::Value = client.get("/api/v0/kubes", &[]).await.unwrap();

        assert_eq!(server.requests()[0].target, "/sg/server/api/v0/kubes");
    }

    #[tokio::test]
    async fn rejected_credential_runs_expiry_hook() {
        let server = TestServer::start(vec![
            Reply::text(401, "no session"),
            Reply::text(403, "forbidden"),
        ])
        .await;
        let seen = Arc::new(Mutex::new(Vec::new()));
        let client = server
            .client(Some(Credential::Session("stale".into())))
            .on_session_expired({
                let seen = Arc::clone(&seen);
                move |status| seen.lock().push(status)
            });

        let err = client
            .get::<serde_json::Value>("/api/v0/kubes", &[])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::SessionExpired {
                status: StatusCode::UNAUTHORIZED
            }
        ));

        let err = client.delete("/api/v0/kubes/1").await.unwrap_err();
        assert!(matches!(
            err,
            Error::SessionExpired {
                status: StatusCode::FORBIDDEN
            }
        ));

        assert_eq!(
            *seen.lock(),
            vec![StatusCode::UNAUTHORIZED, StatusCode::FORBIDDEN]
        );
    }

    #[tokio::test]
    async fn failure_status_keeps_body() {
        let server = TestServer::start(vec![Reply::text(500, "boom")]).await;
        let seen = Arc::new(Mutex::new(Vec::new()));
        let client = server
            .client(Some(Credential::Session("abc".into())))
            .on_session_expired({
                let seen = Arc::clone(&seen);
                move |status| seen.lock().push(status)
            });

        let err = client
            .get::<serde_json::Value>("/api/v0/kubes", &[])
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
        match err {
            Error::Status { status, body } => {
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(body, "boom");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(seen.lock().is_empty());
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() {
        let server = TestServer::start(vec![Reply::text(200, "not json")]).await;
        let client = server.client(None);

        let err = client
            .get::<serde_json::Value>("/api/v0/kubes", &[])
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Decode(_)));
    }

    #[tokio::test]
    async fn login_then_logout() {
        let server = TestServer::start(vec![
            Reply::json(201, json!({ "id": "sess1", "user_id": 1 })),
            Reply::text(200, ""),
        ])
        .await;
        let anonymous = server.client(None);

        let logged_in = anonymous.login("admin", "hunter22").await.unwrap();
        assert_eq!(
            logged_in.session().credential(),
            Some(&Credential::Session("sess1".into()))
        );

        let logged_out = logged_in.logout().await.unwrap();
        assert_eq!(logged_out.session().credential(), None);
        assert_eq!(logged_out.session().endpoint(), anonymous.session().endpoint());

        let requests = server.requests();
        assert_eq!(requests.len(), 2);

        assert_eq!(requests[0].method, "POST");
        assert_eq!(requests[0].target, "/api/v0/sessions");
        assert_eq!(requests[0].header("authorization"), None);
        assert_eq!(
            requests[0].json(),
            json!({ "user": { "username": "admin", "password": "hunter22" } })
        );

        assert_eq!(requests[1].method, "DELETE");
        assert_eq!(requests[1].target, "/api/v0/sessions/sess1");
        assert_eq!(
            requests[1].header("authorization"),
            Some(r#"SGAPI session="sess1""#)
        );
    }

    #[tokio::test]
    async fn logout_without_session_sends_nothing() {
        let server = TestServer::start(Vec::new()).await;
        let client = server.client(Some(Credential::Token("t0k3n".into())));

        let logged_out = client.logout().await.unwrap();

        assert_eq!(logged_out.session().credential(), None);
        assert!(server.requests().is_empty());
    }
}
