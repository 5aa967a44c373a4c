//! Hosted account/session provider client.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use uuid::Uuid;
use vocab_core::{CoreError, Session, SessionProvider};

#[derive(Debug, Deserialize)]
struct AuthUser {
    id: Uuid,
    email: Option<String>,
}

pub struct AuthClient {
    client: Client,
    base_url: String,
    anon_key: String,
}

impl AuthClient {
    pub fn new(client: Client, base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            anon_key: anon_key.into(),
        }
    }
}

#[async_trait]
impl SessionProvider for AuthClient {
    async fn current_session(&self, access_token: &str) -> vocab_core::Result<Option<Session>> {
        let url = format!("{}/auth/v1/user", self.base_url);

        let resp = self
            .client
            .get(&url)
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| CoreError::RemoteFailure(e.to_string()))?;

        match resp.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => return Ok(None),
            status if !status.is_success() => {
                let message = resp.text().await.unwrap_or_default();
                return Err(CoreError::RemoteFailure(format!(
                    "auth provider returned {}: {message}",
                    status.as_u16()
                )));
            }
            _ => {}
        }

        let user: AuthUser = resp
            .json()
            .await
            .map_err(|e| CoreError::RemoteFailure(e.to_string()))?;

        Ok(Some(Session {
            user_id: user.id,
            access_token: access_token.to_string(),
            email: user.email,
        }))
    }

    async fn sign_out(&self, access_token: &str) -> vocab_core::Result<()> {
        let url = format!("{}/auth/v1/logout", self.base_url);

        let resp = self
            .client
            .post(&url)
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| CoreError::RemoteFailure(e.to_string()))?;

        // An expired token is already signed out.
        let status = resp.status();
        if status.is_success() || status == StatusCode::UNAUTHORIZED || status == StatusCode::NOT_FOUND {
            return Ok(());
        }

        Err(CoreError::RemoteFailure(format!(
            "sign-out failed with status {}",
            status.as_u16()
        )))
    }
}
