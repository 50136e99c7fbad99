//! Shared types for the sign-in flow

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use lw_types::{AppError, AppResult};

use crate::error::OAuthError;

/// Scopes requested when the host does not override permissions.
pub const DEFAULT_PERMISSIONS: &[&str] = &["r_liteprofile", "r_emailaddress"];

/// Host-supplied configuration for one sign-in flow.
#[derive(Debug, Clone)]
pub struct SignInConfig {
    pub client_id: String,
    pub client_secret: String,
    /// Registered redirect URI the provider sends the user back to.
    pub redirect_uri: String,
    /// CSRF state. Generated per flow when `None`; an explicitly empty
    /// value disables state validation.
    pub auth_state: Option<String>,
    pub permissions: Vec<String>,
    /// Clients configured so the provider returns the token straight on the
    /// redirect instead of an authorization code.
    pub accept_token_from_redirect: bool,
}

impl SignInConfig {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: redirect_uri.into(),
            auth_state: None,
            permissions: DEFAULT_PERMISSIONS.iter().map(|s| s.to_string()).collect(),
            accept_token_from_redirect: false,
        }
    }

    pub fn with_permissions(mut self, permissions: Vec<String>) -> Self {
        self.permissions = permissions;
        self
    }

    pub fn with_auth_state(mut self, auth_state: impl Into<String>) -> Self {
        self.auth_state = Some(auth_state.into());
        self
    }

    pub fn with_token_from_redirect(mut self) -> Self {
        self.accept_token_from_redirect = true;
        self
    }

    /// Reject configurations that cannot complete a flow.
    pub fn validate(&self) -> AppResult<()> {
        if self.client_id.is_empty() {
            return Err(AppError::Config("client_id must not be empty".to_string()));
        }
        if self.redirect_uri.is_empty() {
            return Err(AppError::Config(
                "redirect_uri must not be empty".to_string(),
            ));
        }
        if self.client_secret.is_empty() && !self.accept_token_from_redirect {
            return Err(AppError::Config(
                "client_secret is required for the authorization-code flow".to_string(),
            ));
        }
        Ok(())
    }
}

/// Token delivered to the host success callback, provider fields passed
/// through verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResult {
    pub access_token: String,
    /// LinkedIn reports this as a JSON number; some gateways as a string.
    #[serde(default, deserialize_with = "number_or_string")]
    pub expires_in: String,
}

fn number_or_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(i64),
        String(String),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Number(n) => n.to_string(),
        Raw::String(s) => s,
    })
}

/// `code`/`state` pair extracted from a redirect URL.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CodeAndState {
    pub code: Option<String>,
    pub state: Option<String>,
}

/// Raw `error`/`error_description` pair extracted from a redirect URL.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RawRedirectError {
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// Classification of one navigation URL. Derived purely from the URL
/// string; no side effects attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectOutcome {
    /// Still on the provider's own pages, redirect not reached.
    Pending,
    /// Redirect reached with an authorization code or a direct token.
    Success {
        code: Option<String>,
        state: Option<String>,
    },
    /// Provider redirected back with an error.
    ProviderError {
        error: String,
        description: Option<String>,
    },
    /// Navigation with no query component at all.
    Other,
}

/// Unique flow identifier, used for log correlation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FlowId(Uuid);

impl FlowId {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for FlowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Flow state visible to hosts that poll besides (or instead of) using the
/// callbacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowStatus {
    /// Watching navigation events for the redirect.
    AwaitingRedirect,
    /// Redirect consumed, code-for-token exchange in flight.
    ExchangingToken,
    Success,
    Error(OAuthError),
    Cancelled,
}

impl FlowStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::AwaitingRedirect | Self::ExchangingToken)
    }

    pub fn is_complete(&self) -> bool {
        !self.is_pending()
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

/// Everything the host needs to present the flow it just started.
#[derive(Debug, Clone)]
pub struct FlowStart {
    pub flow_id: FlowId,
    pub auth_url: String,
    /// The CSRF state the provider is expected to echo back.
    pub state: String,
    pub redirect_uri: String,
}

/// Commands the flow issues to the embedded browser surface.
///
/// Implemented by the presentation shell; the flow never renders anything
/// itself.
pub trait BrowserSurface: Send + Sync {
    /// Point the surface at the authorization URL.
    fn open(&self, url: &str);
    /// Stop whatever navigation is in progress.
    fn stop_loading(&self);
    /// Close the modal hosting the surface.
    fn dismiss(&self);
}

/// Host callbacks. Each fires at most once per flow, and exactly one of
/// them fires per completed flow.
pub struct SignInCallbacks {
    pub on_success: Box<dyn Fn(TokenResult) + Send + Sync>,
    pub on_error: Box<dyn Fn(OAuthError) + Send + Sync>,
    pub on_cancel: Option<Box<dyn Fn() + Send + Sync>>,
}

impl SignInCallbacks {
    pub fn new(
        on_success: impl Fn(TokenResult) + Send + Sync + 'static,
        on_error: impl Fn(OAuthError) + Send + Sync + 'static,
    ) -> Self {
        Self {
            on_success: Box::new(on_success),
            on_error: Box::new(on_error),
            on_cancel: None,
        }
    }

    pub fn with_cancel(mut self, on_cancel: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_cancel = Some(Box::new(on_cancel));
        self
    }
}
