//! Redirect interception state machine
//!
//! A [`SignInFlow`] owns one embedded-webview sign-in from start to finish.
//! The presentation shell forwards every navigation-start event to
//! [`SignInFlow::on_load_start`]; the flow classifies the URL, validates
//! CSRF state, runs the code-for-token exchange through the injected
//! transport and reports the outcome through the host callbacks exactly
//! once. Spurious navigation events after a terminal state, including ones
//! racing an in-flight exchange, are no-ops.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info, warn};

use lw_types::AppResult;

use crate::authorization::AuthorizationRequest;
use crate::error::{log_error, transform_error, OAuthError};
use crate::state::generate_state;
use crate::token_exchange::{TokenExchangeRequest, TokenExchanger, TokenFetcher};
use crate::types::{
    BrowserSurface, FlowId, FlowStart, FlowStatus, RawRedirectError, RedirectOutcome,
    SignInCallbacks, SignInConfig, TokenResult,
};
use crate::url_utils::{
    clean_url_string, code_and_state_from_url, error_from_url, is_error_url, parse_query_params,
};

/// Classify one navigation URL.
///
/// Pure: no side effects, callers decide what the outcome means for the
/// flow they run.
pub fn classify_navigation(url: &str) -> RedirectOutcome {
    let url = clean_url_string(url);

    if !url.contains('?') {
        return RedirectOutcome::Other;
    }

    if is_error_url(url) {
        let raw = error_from_url(url);
        return RedirectOutcome::ProviderError {
            error: raw.error.unwrap_or_default(),
            description: raw.error_description,
        };
    }

    let pair = code_and_state_from_url(url);
    let has_token = parse_query_params(url).contains_key("access_token");
    if pair.code.is_none() && !has_token {
        return RedirectOutcome::Pending;
    }

    RedirectOutcome::Success {
        code: pair.code,
        state: pair.state,
    }
}

/// Pull a directly-returned token out of the redirect's query parameters.
fn token_from_url(url: &str) -> Option<TokenResult> {
    let mut params = parse_query_params(url);
    let access_token = params.remove("access_token")?;
    Some(TokenResult {
        access_token,
        expires_in: params.remove("expires_in").unwrap_or_default(),
    })
}

/// One embedded-webview sign-in flow.
pub struct SignInFlow {
    flow_id: FlowId,
    config: SignInConfig,
    /// CSRF state pinned for this flow; empty disables validation.
    auth_state: String,
    callbacks: SignInCallbacks,
    surface: Arc<dyn BrowserSurface>,
    fetcher: Arc<dyn TokenFetcher>,
    /// Claimed by the first terminal transition; later navigations no-op.
    settled: AtomicBool,
    /// Set by host dismissal; a late exchange result is discarded.
    cancelled: AtomicBool,
    status: RwLock<FlowStatus>,
}

impl SignInFlow {
    /// Create a flow using the default reqwest-backed token exchanger.
    pub fn new(
        config: SignInConfig,
        callbacks: SignInCallbacks,
        surface: Arc<dyn BrowserSurface>,
    ) -> AppResult<Self> {
        Self::with_fetcher(config, callbacks, surface, Arc::new(TokenExchanger::new()))
    }

    /// Create a flow with an injected transport.
    pub fn with_fetcher(
        config: SignInConfig,
        callbacks: SignInCallbacks,
        surface: Arc<dyn BrowserSurface>,
        fetcher: Arc<dyn TokenFetcher>,
    ) -> AppResult<Self> {
        config.validate()?;

        let auth_state = match &config.auth_state {
            Some(state) => state.clone(),
            None => generate_state(),
        };

        Ok(Self {
            flow_id: FlowId::new(),
            config,
            auth_state,
            callbacks,
            surface,
            fetcher,
            settled: AtomicBool::new(false),
            cancelled: AtomicBool::new(false),
            status: RwLock::new(FlowStatus::AwaitingRedirect),
        })
    }

    /// Build the authorization URL and point the surface at it.
    pub fn start(&self) -> FlowStart {
        let request = AuthorizationRequest {
            client_id: self.config.client_id.clone(),
            redirect_uri: self.config.redirect_uri.clone(),
            permissions: self.config.permissions.clone(),
            auth_state: self.auth_state.clone(),
        };
        let auth_url = request.authorization_url();

        info!("Starting sign-in flow {}", self.flow_id);
        self.surface.open(&auth_url);

        FlowStart {
            flow_id: self.flow_id,
            auth_url,
            state: self.auth_state.clone(),
            redirect_uri: self.config.redirect_uri.clone(),
        }
    }

    /// Current flow status.
    pub fn poll_status(&self) -> FlowStatus {
        self.status.read().clone()
    }

    /// Handle one navigation-start event from the browser surface.
    pub async fn on_load_start(&self, url: &str) {
        if self.settled.load(Ordering::SeqCst) {
            return;
        }

        let url = clean_url_string(url);
        match classify_navigation(url) {
            RedirectOutcome::Pending | RedirectOutcome::Other => {}
            RedirectOutcome::ProviderError { error, description } => {
                let err = transform_error(RawRedirectError {
                    error: Some(error),
                    error_description: description,
                });
                self.settle_error(err);
            }
            RedirectOutcome::Success { code, state } => {
                self.handle_redirect(url, code, state).await;
            }
        }
    }

    /// Host-triggered dismissal of the presentation shell.
    ///
    /// No-op once a terminal callback has fired. An exchange still in
    /// flight keeps running, but its result is discarded.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        if self
            .settled
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            // Flow was still awaiting the redirect.
            *self.status.write() = FlowStatus::Cancelled;
        } else {
            // The guard is already held: by a delivered terminal result, or
            // by an exchange in flight whose result is now discarded.
            let mut status = self.status.write();
            match *status {
                FlowStatus::ExchangingToken => *status = FlowStatus::Cancelled,
                _ => return,
            }
        }

        info!("Flow {} cancelled", self.flow_id);
        if let Some(on_cancel) = &self.callbacks.on_cancel {
            on_cancel();
        }
    }

    async fn handle_redirect(&self, url: &str, code: Option<String>, state: Option<String>) {
        // CSRF check. Skipped when the host runs stateless or the redirect
        // carries no state at all.
        if let Some(url_state) = state {
            if !self.auth_state.is_empty() && url_state != self.auth_state {
                warn!("Flow {}: state mismatch on redirect", self.flow_id);
                self.settle_error(OAuthError::state_not_match(&url_state));
                return;
            }
        }

        if self.config.accept_token_from_redirect {
            let Some(token) = token_from_url(url) else {
                debug!(
                    "Flow {}: redirect without access_token, still waiting",
                    self.flow_id
                );
                return;
            };
            self.settle_success(token);
            return;
        }

        let Some(code) = code else {
            debug!("Flow {}: redirect without code, still waiting", self.flow_id);
            return;
        };

        // Claim the flow before the await so navigations racing the
        // in-flight exchange cannot double-fire.
        if !self.try_settle(FlowStatus::ExchangingToken) {
            return;
        }
        self.surface.stop_loading();
        self.surface.dismiss();

        let payload = TokenExchangeRequest {
            client_id: self.config.client_id.clone(),
            client_secret: self.config.client_secret.clone(),
            code,
            redirect_uri: self.config.redirect_uri.clone(),
        }
        .payload();

        match self.fetcher.fetch_token(&payload).await {
            Ok(token) => {
                if self.cancelled.load(Ordering::SeqCst) {
                    debug!(
                        "Flow {}: token arrived after dismissal, discarding",
                        self.flow_id
                    );
                    return;
                }
                info!("Flow {}: token exchange successful", self.flow_id);
                *self.status.write() = FlowStatus::Success;
                (self.callbacks.on_success)(token);
            }
            Err(e) => {
                if self.cancelled.load(Ordering::SeqCst) {
                    debug!(
                        "Flow {}: exchange failed after dismissal, discarding",
                        self.flow_id
                    );
                    return;
                }
                let err = OAuthError::exchange_failed(&e);
                log_error(&err);
                *self.status.write() = FlowStatus::Error(err.clone());
                (self.callbacks.on_error)(err);
            }
        }
    }

    /// Claim the settle-once guard. Returns false when another path already
    /// settled or cancelled the flow.
    fn try_settle(&self, status: FlowStatus) -> bool {
        if self
            .settled
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return false;
        }
        *self.status.write() = status;
        true
    }

    fn settle_success(&self, token: TokenResult) {
        if !self.try_settle(FlowStatus::Success) {
            return;
        }
        info!("Flow {}: sign-in successful", self.flow_id);
        self.surface.stop_loading();
        self.surface.dismiss();
        (self.callbacks.on_success)(token);
    }

    fn settle_error(&self, err: OAuthError) {
        if !self.try_settle(FlowStatus::Error(err.clone())) {
            return;
        }
        log_error(&err);
        self.surface.stop_loading();
        self.surface.dismiss();
        (self.callbacks.on_error)(err);
    }
}
