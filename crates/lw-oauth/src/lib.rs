//! Embedded-webview OAuth 2.0 sign-in flow for LinkedIn
//!
//! Implements the client side of the authorization-code flow without any
//! redirect-server infrastructure: the host application presents the
//! authorization page in an embedded browser surface, forwards every
//! navigation-start event to the flow, and the flow detects the provider's
//! redirect back to the registered URI, validates CSRF state, exchanges the
//! authorization code for an access token and reports the outcome through
//! host callbacks exactly once.
//!
//! # Features
//! - OAuth 2.0 Authorization Code flow scoped to an embedded web-view
//! - Direct-token redirects for clients configured without a code step
//! - CSRF protection with state parameter
//! - Settle-once guard against spurious navigation events
//! - Injectable transport for tests and custom HTTP stacks
//!
//! # Usage Example
//! ```ignore
//! use lw_oauth::{SignInCallbacks, SignInConfig, SignInFlow};
//!
//! let config = SignInConfig::new("client-id", "client-secret", "https://example.com/auth");
//! let callbacks = SignInCallbacks::new(
//!     |token| println!("signed in: {}", token.access_token),
//!     |err| eprintln!("sign-in failed: {}", err.message),
//! );
//! let flow = SignInFlow::new(config, callbacks, surface)?;
//! let start = flow.start();
//! // The shell shows the modal pointed at start.auth_url and forwards
//! // every navigation-start event: flow.on_load_start(url).await
//! ```

pub mod authorization;
pub mod error;
pub mod interceptor;
pub mod state;
pub mod token_exchange;
pub mod types;
pub mod url_utils;

// Re-export the public API
pub use authorization::{AuthorizationRequest, AUTHORIZATION_ENDPOINT};
pub use error::{log_error, transform_error, OAuthError};
pub use interceptor::{classify_navigation, SignInFlow};
pub use state::generate_state;
pub use token_exchange::{
    TokenExchangeRequest, TokenExchanger, TokenFetcher, ACCESS_TOKEN_ENDPOINT,
};
pub use types::{
    BrowserSurface, CodeAndState, FlowId, FlowStart, FlowStatus, RawRedirectError,
    RedirectOutcome, SignInCallbacks, SignInConfig, TokenResult,
};

// Re-export errors from lw-types so transport implementors need only this crate
pub use lw_types::{AppError, AppResult};
