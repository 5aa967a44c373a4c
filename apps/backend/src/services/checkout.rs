//! Hosted checkout function client.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use vocab_core::{CheckoutGateway, CheckoutRequest, CheckoutSession, CoreError};

const FALLBACK_MESSAGE: &str = "Failed to create checkout session";

#[derive(Debug, Deserialize)]
struct GatewayError {
    error: Option<String>,
}

pub struct CheckoutClient {
    client: Client,
    url: String,
}

impl CheckoutClient {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

/// Pull the gateway's `error` field out of a failed response body.
fn gateway_message(body: &str) -> String {
    serde_json::from_str::<GatewayError>(body)
        .ok()
        .and_then(|e| e.error)
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| FALLBACK_MESSAGE.to_string())
}

#[async_trait]
impl CheckoutGateway for CheckoutClient {
    async fn create_checkout_session(
        &self,
        request: &CheckoutRequest,
        bearer_token: &str,
    ) -> vocab_core::Result<CheckoutSession> {
        if bearer_token.is_empty() {
            return Err(CoreError::AuthRequired);
        }

        let resp = self
            .client
            .post(&self.url)
            .bearer_auth(bearer_token)
            .json(request)
            .send()
            .await
            .map_err(|e| CoreError::RemoteFailure(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(status, "checkout gateway rejected request");
            return Err(CoreError::RemoteFailure(gateway_message(&body)));
        }

        resp.json::<CheckoutSession>()
            .await
            .map_err(|e| CoreError::RemoteFailure(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gateway_error_field_is_surfaced() {
        assert_eq!(gateway_message(r#"{"error":"No such price"}"#), "No such price");
    }

    #[test]
    fn unreadable_body_falls_back() {
        assert_eq!(gateway_message("<html>"), FALLBACK_MESSAGE);
        assert_eq!(gateway_message(r#"{"error":""}"#), FALLBACK_MESSAGE);
    }
}
