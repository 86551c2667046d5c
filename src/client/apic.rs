//! APIC-style REST implementation of [`ManagementClient`].
//!
//! Sessions are token-based: `aaaLogin` returns a token that is replayed as
//! the `APIC-cookie` on every subsequent request. Lab controllers routinely
//! run self-signed certificates, so TLS verification is a setting, not a
//! given.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info};

use super::{ClientError, ManagementClient};
use crate::config::DeploySettings;

pub struct ApicClient {
    base_url: String,
    username: String,
    password: String,
    client: reqwest::Client,
    token: Option<String>,
}

impl ApicClient {
    pub fn new(settings: &DeploySettings) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .danger_accept_invalid_certs(!settings.verify_tls)
            .build()
            .map_err(|e| ClientError::Config(e.to_string()))?;

        Ok(Self {
            base_url: settings.endpoint.trim_end_matches('/').to_string(),
            username: settings.username.clone(),
            password: settings.password.clone(),
            client,
            token: None,
        })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    fn cookie(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("APIC-cookie={t}"))
    }
}

#[async_trait]
impl ManagementClient for ApicClient {
    async fn login(&mut self) -> Result<(), ClientError> {
        let body = json!({
            "aaaUser": {
                "attributes": {
                    "name": self.username,
                    "pwd": self.password,
                }
            }
        });
        let response = self
            .client
            .post(self.api_url("/aaaLogin.json"))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let payload: Value = response.json().await.unwrap_or(Value::Null);
        if !status.is_success() {
            return Err(ClientError::Login(fault_text(&payload, status.as_u16())));
        }

        let token = payload["imdata"][0]["aaaLogin"]["attributes"]["token"]
            .as_str()
            .ok_or_else(|| ClientError::Login("no token in login response".to_string()))?
            .to_string();
        debug!(endpoint = %self.base_url, "session established");
        self.token = Some(token);
        Ok(())
    }

    async fn commit(&self, payload: &Value) -> Result<(), ClientError> {
        let cookie = self
            .cookie()
            .ok_or_else(|| ClientError::Commit("no active session".to_string()))?;
        let response = self
            .client
            .post(self.api_url("/mo/uni.json"))
            .header(reqwest::header::COOKIE, cookie)
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body: Value = response.json().await.unwrap_or(Value::Null);
            return Err(ClientError::Commit(fault_text(&body, status.as_u16())));
        }
        info!(endpoint = %self.base_url, "configuration committed");
        Ok(())
    }

    async fn logout(&mut self) -> Result<(), ClientError> {
        // Logout without a session is a no-op, mirroring the controller.
        let Some(cookie) = self.cookie() else {
            return Ok(());
        };
        let body = json!({
            "aaaUser": {
                "attributes": {"name": self.username}
            }
        });
        let response = self
            .client
            .post(self.api_url("/aaaLogout.json"))
            .header(reqwest::header::COOKIE, cookie)
            .json(&body)
            .send()
            .await?;
        self.token = None;
        if !response.status().is_success() {
            return Err(ClientError::Logout(format!(
                "HTTP {}",
                response.status().as_u16()
            )));
        }
        debug!(endpoint = %self.base_url, "session closed");
        Ok(())
    }
}

/// Extract the controller's fault message from an `imdata` error envelope,
/// falling back to the HTTP status.
fn fault_text(payload: &Value, status: u16) -> String {
    payload["imdata"][0]["error"]["attributes"]["text"]
        .as_str()
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {status}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn settings(endpoint: &str) -> DeploySettings {
        DeploySettings {
            endpoint: endpoint.to_string(),
            username: "admin".to_string(),
            password: "secret".to_string(),
            ..DeploySettings::default()
        }
    }

    fn login_ok() -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({
            "imdata": [{"aaaLogin": {"attributes": {"token": "tok-123"}}}]
        }))
    }

    #[tokio::test]
    async fn test_login_stores_token_and_commit_replays_cookie() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/aaaLogin.json"))
            .and(body_partial_json(json!({
                "aaaUser": {"attributes": {"name": "admin"}}
            })))
            .respond_with(login_ok())
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/mo/uni.json"))
            .and(header("cookie", "APIC-cookie=tok-123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"imdata": []})))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/aaaLogout.json"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let mut client = ApicClient::new(&settings(&server.uri())).unwrap();
        client.login().await.unwrap();
        client
            .commit(&json!({"polUni": {"attributes": {"dn": "uni"}}}))
            .await
            .unwrap();
        client.logout().await.unwrap();
    }

    #[tokio::test]
    async fn test_login_failure_surfaces_fault_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/aaaLogin.json"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "imdata": [{"error": {"attributes": {"text": "bad credentials"}}}]
            })))
            .mount(&server)
            .await;

        let mut client = ApicClient::new(&settings(&server.uri())).unwrap();
        let err = client.login().await.unwrap_err();
        match err {
            ClientError::Login(message) => assert_eq!(message, "bad credentials"),
            other => panic!("expected login error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_commit_rejection_surfaces_fault_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/aaaLogin.json"))
            .respond_with(login_ok())
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/mo/uni.json"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "imdata": [{"error": {"attributes": {
                    "code": "801",
                    "text": "property vlan of uni/tn-X is out of range"
                }}}]
            })))
            .mount(&server)
            .await;

        let mut client = ApicClient::new(&settings(&server.uri())).unwrap();
        client.login().await.unwrap();
        let err = client.commit(&json!({})).await.unwrap_err();
        match err {
            ClientError::Commit(message) => assert!(message.contains("out of range")),
            other => panic!("expected commit error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_commit_without_session_is_an_error() {
        let client = ApicClient::new(&settings("https://203.0.113.1")).unwrap();
        let err = client.commit(&json!({})).await.unwrap_err();
        assert!(matches!(err, ClientError::Commit(_)));
    }

    #[tokio::test]
    async fn test_logout_without_session_is_noop() {
        let mut client = ApicClient::new(&settings("https://203.0.113.1")).unwrap();
        client.logout().await.unwrap();
    }
}
