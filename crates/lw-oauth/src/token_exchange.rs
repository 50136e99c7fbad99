//! Token exchange against LinkedIn's access-token endpoint

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tracing::debug;
use urlencoding::encode;

use lw_types::{AppError, AppResult};

use crate::types::TokenResult;

/// LinkedIn's OAuth 2.0 access-token endpoint.
pub const ACCESS_TOKEN_ENDPOINT: &str = "https://www.linkedin.com/oauth/v2/accessToken";

/// Parameters for one code-for-token exchange, built once the authorization
/// code is known.
#[derive(Debug, Clone)]
pub struct TokenExchangeRequest {
    pub client_id: String,
    pub client_secret: String,
    pub code: String,
    pub redirect_uri: String,
}

impl TokenExchangeRequest {
    /// Build the form-encoded request body.
    ///
    /// Field order is part of the wire contract and must not change.
    pub fn payload(&self) -> String {
        format!(
            "client_id={}&client_secret={}&code={}&grant_type=authorization_code&redirect_uri={}",
            encode(&self.client_id),
            encode(&self.client_secret),
            encode(&self.code),
            encode(&self.redirect_uri),
        )
    }
}

/// Transport seam for the token exchange.
///
/// Injected into the redirect interceptor so flows stay testable without a
/// network and hosts can bring their own HTTP stack.
#[async_trait]
pub trait TokenFetcher: Send + Sync {
    async fn fetch_token(&self, payload: &str) -> AppResult<TokenResult>;
}

/// Token exchanger backed by a reqwest client.
pub struct TokenExchanger {
    client: Client,
}

impl TokenExchanger {
    /// Create a new token exchanger
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

impl Default for TokenExchanger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenFetcher for TokenExchanger {
    /// POST the payload to the access-token endpoint and decode the body.
    ///
    /// The HTTP status is not inspected: the provider reports failures in
    /// the response body, and a body that does not decode as a token
    /// surfaces as a `Serialization` error to the caller.
    async fn fetch_token(&self, payload: &str) -> AppResult<TokenResult> {
        debug!("Requesting access token");

        let response = self
            .client
            .post(ACCESS_TOKEN_ENDPOINT)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(payload.to_string())
            .send()
            .await
            .map_err(|e| AppError::TokenExchange(format!("Failed to send token request: {}", e)))?;

        let body = response
            .text()
            .await
            .map_err(|e| AppError::TokenExchange(format!("Failed to read token response: {}", e)))?;

        let token: TokenResult = serde_json::from_str(&body)?;
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_exchanger_creation() {
        let _exchanger = TokenExchanger::new();
        let _default = TokenExchanger::default();
    }

    #[test]
    fn test_payload() {
        let request = TokenExchangeRequest {
            client_id: "clientID".to_string(),
            client_secret: "clientSecret".to_string(),
            code: "code".to_string(),
            redirect_uri: "https://xaviercarpentier.com".to_string(),
        };

        assert_eq!(
            request.payload(),
            "client_id=clientID&client_secret=clientSecret&\
             code=code&grant_type=authorization_code&\
             redirect_uri=https%3A%2F%2Fxaviercarpentier.com"
        );
    }

    #[test]
    fn test_payload_encodes_values() {
        let request = TokenExchangeRequest {
            client_id: "client id".to_string(),
            client_secret: "s&cret".to_string(),
            code: "a/b".to_string(),
            redirect_uri: "https://example.com/cb?x=1".to_string(),
        };

        let payload = request.payload();
        assert!(payload.starts_with("client_id=client%20id&client_secret=s%26cret&code=a%2Fb"));
        assert!(payload.ends_with("redirect_uri=https%3A%2F%2Fexample.com%2Fcb%3Fx%3D1"));
    }
}
