//! Trello REST backend.
//!
//! This module provides the [`TrelloBackend`] implementation of
//! [`BoardApi`] on top of a blocking `ureq` agent.
//!
//! Credentials and arguments travel as query parameters with an empty body.
//! Query values go through the agent's query builder, which percent-encodes
//! them; identifiers placed in the path are encoded here.

use crate::backend::BoardApi;
use crate::error::{Error, Result, from_ureq};
use crate::types::{Credentials, DEFAULT_API_BASE};
use serde::Deserialize;

const USER_AGENT: &str = concat!("trellis/", env!("CARGO_PKG_VERSION"));

/// Trello REST backend.
///
/// # Example
///
/// ```no_run
/// use boardapi::backend::BoardApi;
/// use boardapi::backend::trello::TrelloBackend;
/// use boardapi::Credentials;
///
/// let backend = TrelloBackend::new(Credentials::new("key", "token"));
/// let workspace_id = backend.create_workspace("Acme").unwrap();
/// println!("Created workspace {}", workspace_id);
/// ```
pub struct TrelloBackend {
    /// HTTP agent for requests.
    agent: ureq::Agent,
    /// API base URL, without trailing slash.
    api_base: String,
    /// Key and token appended to every request.
    credentials: Credentials,
}

impl TrelloBackend {
    /// Create a backend against the public Trello API.
    #[must_use]
    pub fn new(credentials: Credentials) -> Self {
        Self::with_api_base(credentials, DEFAULT_API_BASE)
    }

    /// Create a backend with a custom API base (for testing).
    #[must_use]
    pub fn with_api_base(credentials: Credentials, api_base: impl Into<String>) -> Self {
        let api_base = api_base.into().trim_end_matches('/').to_string();
        Self {
            agent: ureq::Agent::new_with_defaults(),
            api_base,
            credentials,
        }
    }

    /// Get the current API base URL.
    #[must_use]
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    /// `POST` and decode the `id` of the created object.
    fn post_for_id(&self, path: &str, params: &[(&str, &str)]) -> Result<String> {
        log::debug!("POST {path}");
        let request = self
            .agent
            .post(&self.url(path))
            .header("Accept", "application/json")
            .header("User-Agent", USER_AGENT)
            .query("key", &self.credentials.key)
            .query("token", &self.credentials.token);
        let request = params
            .iter()
            .fold(request, |request, (name, value)| request.query(*name, *value));

        let mut response = request.send_empty().map_err(|e| from_ureq(e, path))?;
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| Error::decode(path, e.to_string()))?;

        decode_id(path, &body)
    }

    /// `POST` ignoring the response body.
    fn post(&self, path: &str, params: &[(&str, &str)]) -> Result<()> {
        log::debug!("POST {path}");
        let request = self
            .agent
            .post(&self.url(path))
            .header("User-Agent", USER_AGENT)
            .query("key", &self.credentials.key)
            .query("token", &self.credentials.token);
        let request = params
            .iter()
            .fold(request, |request, (name, value)| request.query(*name, *value));

        request.send_empty().map_err(|e| from_ureq(e, path))?;
        Ok(())
    }

    fn put(&self, path: &str, params: &[(&str, &str)]) -> Result<()> {
        log::debug!("PUT {path}");
        let request = self
            .agent
            .put(&self.url(path))
            .header("User-Agent", USER_AGENT)
            .query("key", &self.credentials.key)
            .query("token", &self.credentials.token);
        let request = params
            .iter()
            .fold(request, |request, (name, value)| request.query(*name, *value));

        request.send_empty().map_err(|e| from_ureq(e, path))?;
        Ok(())
    }

    fn delete(&self, path: &str) -> Result<()> {
        log::debug!("DELETE {path}");
        self.agent
            .delete(&self.url(path))
            .header("User-Agent", USER_AGENT)
            .query("key", &self.credentials.key)
            .query("token", &self.credentials.token)
            .call()
            .map_err(|e| from_ureq(e, path))?;
        Ok(())
    }
}

impl BoardApi for TrelloBackend {
    fn create_workspace(&self, name: &str) -> Result<String> {
        self.post_for_id("/organizations", &[("displayName", name)])
    }

    fn create_board(&self, workspace_id: &str, name: &str) -> Result<String> {
        self.post_for_id(
            "/boards",
            &[
                ("idOrganization", workspace_id),
                ("name", name),
                ("defaultLists", "false"),
            ],
        )
    }

    fn create_list(&self, board_id: &str, name: &str) -> Result<()> {
        self.post("/lists", &[("name", name), ("idBoard", board_id)])
    }

    fn invite_board_member(&self, board_id: &str, email: &str) -> Result<()> {
        let path = format!("{}/members", board_path(board_id));
        self.put(&path, &[("email", email)])
    }

    fn invite_workspace_member(
        &self,
        workspace_id: &str,
        email: &str,
        full_name: &str,
        role: &str,
    ) -> Result<()> {
        let path = format!("{}/members", organization_path(workspace_id));
        self.put(
            &path,
            &[("email", email), ("fullName", full_name), ("type", role)],
        )
    }

    fn update_board_name(&self, board_id: &str, name: &str) -> Result<()> {
        self.put(&board_path(board_id), &[("name", name)])
    }

    fn delete_workspace(&self, workspace_id: &str) -> Result<()> {
        self.delete(&organization_path(workspace_id))
    }

    fn delete_board(&self, board_id: &str) -> Result<()> {
        self.delete(&board_path(board_id))
    }
}

fn board_path(board_id: &str) -> String {
    format!("/boards/{}", urlencoding::encode(board_id))
}

fn organization_path(workspace_id: &str) -> String {
    format!("/organizations/{}", urlencoding::encode(workspace_id))
}

// =============================================================================
// Trello API response types
// =============================================================================

#[derive(Debug, Deserialize)]
struct CreatedObject {
    id: String,
}

fn decode_id(endpoint: &str, body: &str) -> Result<String> {
    let created: CreatedObject =
        serde_json::from_str(body).map_err(|e| Error::decode(endpoint, e.to_string()))?;
    Ok(created.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn credentials() -> Credentials {
        Credentials::new("test-key", "test-token")
    }

    fn auth() -> Vec<Matcher> {
        vec![
            Matcher::UrlEncoded("key".into(), "test-key".into()),
            Matcher::UrlEncoded("token".into(), "test-token".into()),
        ]
    }

    fn with_auth(mut extra: Vec<Matcher>) -> Matcher {
        let mut all = auth();
        all.append(&mut extra);
        Matcher::AllOf(all)
    }

    #[test]
    fn test_default_api_base() {
        let backend = TrelloBackend::new(credentials());
        assert_eq!(backend.api_base(), "https://api.trello.com/1");
    }

    #[test]
    fn test_custom_api_base_trims_slash() {
        let backend = TrelloBackend::with_api_base(credentials(), "http://localhost:9000/1/");
        assert_eq!(backend.api_base(), "http://localhost:9000/1");
        assert_eq!(backend.url("/boards"), "http://localhost:9000/1/boards");
    }

    #[test]
    fn test_paths_encode_identifiers() {
        assert_eq!(board_path("5f2b"), "/boards/5f2b");
        assert_eq!(board_path("a/b c"), "/boards/a%2Fb%20c");
        assert_eq!(organization_path("x&y"), "/organizations/x%26y");
    }

    #[test]
    fn test_decode_id() {
        assert_eq!(
            decode_id("/boards", r#"{"id":"b42","name":"Eng"}"#).unwrap(),
            "b42"
        );
        assert!(matches!(
            decode_id("/boards", r#"{"name":"Eng"}"#),
            Err(Error::Decode { .. })
        ));
        assert!(matches!(
            decode_id("/boards", "<html>"),
            Err(Error::Decode { .. })
        ));
    }

    #[test]
    fn test_create_workspace_encodes_display_name() {
        let mut server = Server::new();
        let mock = server
            .mock("POST", "/organizations")
            .match_query(with_auth(vec![Matcher::UrlEncoded(
                "displayName".into(),
                "R&D Team".into(),
            )]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":"org123","displayName":"R&D Team"}"#)
            .create();

        let backend = TrelloBackend::with_api_base(credentials(), server.url());
        let id = backend.create_workspace("R&D Team").unwrap();

        assert_eq!(id, "org123");
        mock.assert();
    }

    #[test]
    fn test_create_board_without_default_lists() {
        let mut server = Server::new();
        let mock = server
            .mock("POST", "/boards")
            .match_query(with_auth(vec![
                Matcher::UrlEncoded("idOrganization".into(), "org123".into()),
                Matcher::UrlEncoded("name".into(), "Eng + Ops".into()),
                Matcher::UrlEncoded("defaultLists".into(), "false".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"id":"board9"}"#)
            .create();

        let backend = TrelloBackend::with_api_base(credentials(), server.url());
        assert_eq!(backend.create_board("org123", "Eng + Ops").unwrap(), "board9");
        mock.assert();
    }

    #[test]
    fn test_create_list_ignores_body() {
        let mut server = Server::new();
        let mock = server
            .mock("POST", "/lists")
            .match_query(with_auth(vec![
                Matcher::UrlEncoded("name".into(), "To Do".into()),
                Matcher::UrlEncoded("idBoard".into(), "board9".into()),
            ]))
            .with_status(200)
            .with_body("not json at all")
            .create();

        let backend = TrelloBackend::with_api_base(credentials(), server.url());
        backend.create_list("board9", "To Do").unwrap();
        mock.assert();
    }

    #[test]
    fn test_invite_workspace_member_encodes_email() {
        let mut server = Server::new();
        let mock = server
            .mock("PUT", "/organizations/org123/members")
            .match_query(with_auth(vec![
                Matcher::UrlEncoded("email".into(), "ada+boards@example.com".into()),
                Matcher::UrlEncoded("fullName".into(), "Ada Lovelace".into()),
                Matcher::UrlEncoded("type".into(), "admin".into()),
            ]))
            .with_status(200)
            .with_body("{}")
            .create();

        let backend = TrelloBackend::with_api_base(credentials(), server.url());
        backend
            .invite_workspace_member("org123", "ada+boards@example.com", "Ada Lovelace", "admin")
            .unwrap();
        mock.assert();
    }

    #[test]
    fn test_invite_board_member() {
        let mut server = Server::new();
        let mock = server
            .mock("PUT", "/boards/board9/members")
            .match_query(with_auth(vec![Matcher::UrlEncoded(
                "email".into(),
                "grace@example.com".into(),
            )]))
            .with_status(200)
            .create();

        let backend = TrelloBackend::with_api_base(credentials(), server.url());
        backend
            .invite_board_member("board9", "grace@example.com")
            .unwrap();
        mock.assert();
    }

    #[test]
    fn test_update_board_name() {
        let mut server = Server::new();
        let mock = server
            .mock("PUT", "/boards/board9")
            .match_query(with_auth(vec![Matcher::UrlEncoded(
                "name".into(),
                "Platform & Infra".into(),
            )]))
            .with_status(200)
            .create();

        let backend = TrelloBackend::with_api_base(credentials(), server.url());
        backend.update_board_name("board9", "Platform & Infra").unwrap();
        mock.assert();
    }

    #[test]
    fn test_delete_calls() {
        let mut server = Server::new();
        let org = server
            .mock("DELETE", "/organizations/org123")
            .match_query(with_auth(vec![]))
            .with_status(200)
            .create();
        let board = server
            .mock("DELETE", "/boards/board9")
            .match_query(with_auth(vec![]))
            .with_status(200)
            .create();

        let backend = TrelloBackend::with_api_base(credentials(), server.url());
        backend.delete_workspace("org123").unwrap();
        backend.delete_board("board9").unwrap();
        org.assert();
        board.assert();
    }

    #[test]
    fn test_status_error_has_endpoint_without_credentials() {
        let mut server = Server::new();
        server
            .mock("DELETE", "/boards/gone")
            .match_query(Matcher::Any)
            .with_status(404)
            .create();

        let backend = TrelloBackend::with_api_base(credentials(), server.url());
        let err = backend.delete_board("gone").unwrap_err();

        assert_eq!(
            err,
            Error::Status {
                status: 404,
                endpoint: "/boards/gone".to_string()
            }
        );
        assert!(!err.to_string().contains("test-token"));
    }

    #[test]
    fn test_create_workspace_decode_error() {
        let mut server = Server::new();
        server
            .mock("POST", "/organizations")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"message":"ok"}"#)
            .create();

        let backend = TrelloBackend::with_api_base(credentials(), server.url());
        let err = backend.create_workspace("Acme").unwrap_err();
        assert!(matches!(err, Error::Decode { .. }));
    }

    #[test]
    fn test_connection_refused_is_transport_error() {
        let backend = TrelloBackend::with_api_base(credentials(), "http://127.0.0.1:1");
        let err = backend.create_workspace("Acme").unwrap_err();
        assert!(matches!(err, Error::Transport { .. }));
    }
}
