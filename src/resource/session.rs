use serde::{Deserialize, Serialize};

use super::{Resource, User};

/// A login session as listed under `/api/v0/sessions`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserSession {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

impl Resource for UserSession {
    type Id = String;

    const KIND: &'static str = "Session";
    const PATH: &'static str = "/api/v0/sessions";

    fn id(&self) -> &String {
        &self.id
    }

    fn label(&self) -> &str {
        self.user.as_ref().map_or(&self.id, |user| &user.username)
    }
}

/// Body of `POST /api/v0/sessions`.
#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    user: Credentials<'a>,
}

#[derive(Debug, Serialize)]
struct Credentials<'a> {
    username: &'a str,
    password: &'a str,
}

impl<'a> LoginRequest<'a> {
    pub(crate) fn new(username: &'a str, password: &'a str) -> Self {
        Self {
            user: Credentials { username, password },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_body_shape() {
        let body = serde_json::to_value(LoginRequest::new("admin", "hunter22")).unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "user": { "username": "admin", "password": "hunter22" } })
        );
    }

    #[test]
    fn label_prefers_username() {
        let mut session = UserSession {
            id: "abc".into(),
            ..Default::default()
        };
        assert_eq!(session.label(), "abc");
        session.user = Some(User {
            username: "admin".into(),
            ..Default::default()
        });
        assert_eq!(session.label(), "admin");
    }
}
