//! Cached flight credential and its lifecycle.
//!
//! # States
//! - Empty: no credential held
//! - Valid: token present, now < expiry - margin
//! - Stale: token present, now >= expiry - margin
//!
//! # State Transitions
//! ```text
//! Empty → Valid: login succeeds
//! Empty → Empty: login fails (error surfaced)
//! Stale → Valid: refresh succeeds
//! Stale → Empty → Valid|Empty: refresh fails, fallback login
//! ```
//!
//! # Design Decisions
//! - Reads take a shared lock and never touch the network
//! - Transitions are serialized by a separate mutex (single-flight)
//! - A waiter that sees the generation advance reuses the outcome of the
//!   transition it waited on instead of starting another one

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;

use crate::auth::endpoint::{AuthError, TokenEndpoint, TokenGrant};
use crate::observability::metrics;

/// Default seconds subtracted from a token's reported expiry.
pub const DEFAULT_MARGIN: Duration = Duration::from_secs(300);

/// The bearer token currently held for the flight partner.
#[derive(Debug, Clone)]
pub struct CachedCredential {
    pub token: String,
    pub refresh_token: Option<String>,
    pub expires_at: Instant,
}

impl CachedCredential {
    /// True while `now` is before the expiry minus `margin`.
    pub fn is_valid_at(&self, now: Instant, margin: Duration) -> bool {
        match self.expires_at.checked_sub(margin) {
            Some(deadline) => now < deadline,
            None => false,
        }
    }
}

/// Observable credential state, without the token itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CredentialSnapshot {
    pub cached: bool,
    pub valid: bool,
    pub expires_in_secs: u64,
}

#[derive(Debug, Default)]
struct CacheState {
    credential: Option<CachedCredential>,
    /// Advanced by every completed transition and by invalidation.
    generation: u64,
    /// Failure of the most recent transition, shared with its waiters.
    last_error: Option<AuthError>,
}

impl CacheState {
    fn valid_token(&self, margin: Duration) -> Option<&str> {
        self.credential
            .as_ref()
            .filter(|c| c.is_valid_at(Instant::now(), margin))
            .map(|c| c.token.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Refresh when a refresh token is held, otherwise log in.
    Renew,
    /// Always perform a full login.
    Login,
}

/// Owns the flight bearer token and renews it on demand.
pub struct CredentialManager {
    endpoint: Arc<dyn TokenEndpoint>,
    margin: Duration,
    state: RwLock<CacheState>,
    transition: Mutex<()>,
}

impl CredentialManager {
    pub fn new(endpoint: Arc<dyn TokenEndpoint>, margin: Duration) -> Self {
        Self {
            endpoint,
            margin,
            state: RwLock::new(CacheState::default()),
            transition: Mutex::new(()),
        }
    }

    /// Return a currently valid bearer token, logging in or refreshing if needed.
    pub async fn get_token(&self) -> Result<String, AuthError> {
        let observed = {
            let state = self.state.read().await;
            if let Some(token) = state.valid_token(self.margin) {
                return Ok(token.to_string());
            }
            state.generation
        };

        let _guard = self.transition.lock().await;

        {
            let state = self.state.read().await;
            if state.generation != observed {
                match (&state.credential, &state.last_error) {
                    (Some(credential), _) => return Ok(credential.token.clone()),
                    (None, Some(error)) => return Err(error.clone()),
                    (None, None) => {}
                }
            } else if let Some(token) = state.valid_token(self.margin) {
                return Ok(token.to_string());
            }
        }

        self.run_transition(Mode::Renew).await
    }

    /// Discard any cached credential and log in again.
    pub async fn force_login(&self) -> Result<CredentialSnapshot, AuthError> {
        let _guard = self.transition.lock().await;
        self.run_transition(Mode::Login).await?;
        Ok(self.snapshot().await)
    }

    /// Renew the credential now, via refresh when possible.
    pub async fn force_refresh(&self) -> Result<CredentialSnapshot, AuthError> {
        let _guard = self.transition.lock().await;
        self.run_transition(Mode::Renew).await?;
        Ok(self.snapshot().await)
    }

    /// Drop the cached credential if it still holds `token`.
    ///
    /// Used when the partner rejects a token it issued; a credential renewed
    /// in the meantime is kept.
    pub async fn invalidate(&self, token: &str) {
        let mut state = self.state.write().await;
        let matches = state
            .credential
            .as_ref()
            .is_some_and(|c| c.token == token);
        if matches {
            tracing::info!("Flight token rejected by partner, dropping cached credential");
            state.credential = None;
            state.last_error = None;
            state.generation += 1;
            metrics::record_token_event("invalidate");
        }
    }

    pub async fn snapshot(&self) -> CredentialSnapshot {
        let state = self.state.read().await;
        match &state.credential {
            Some(credential) => {
                let now = Instant::now();
                CredentialSnapshot {
                    cached: true,
                    valid: credential.is_valid_at(now, self.margin),
                    expires_in_secs: credential.expires_at.saturating_duration_since(now).as_secs(),
                }
            }
            None => CredentialSnapshot {
                cached: false,
                valid: false,
                expires_in_secs: 0,
            },
        }
    }

    /// Caller must hold `self.transition`.
    async fn run_transition(&self, mode: Mode) -> Result<String, AuthError> {
        let refresh_token = match mode {
            Mode::Renew => self
                .state
                .read()
                .await
                .credential
                .as_ref()
                .and_then(|c| c.refresh_token.clone()),
            Mode::Login => None,
        };

        if let Some(refresh_token) = refresh_token {
            match self.endpoint.refresh(&refresh_token).await {
                Ok(grant) => {
                    metrics::record_token_event("refresh");
                    tracing::debug!(expires_in_secs = grant.expires_in.as_secs(), "Flight token refreshed");
                    return Ok(self.store(grant, Some(refresh_token)).await);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Flight token refresh failed, falling back to login");
                    metrics::record_token_event("refresh_failed");
                    self.state.write().await.credential = None;
                }
            }
        }

        match self.endpoint.login().await {
            Ok(grant) => {
                metrics::record_token_event("login");
                tracing::info!(expires_in_secs = grant.expires_in.as_secs(), "Flight login succeeded");
                Ok(self.store(grant, None).await)
            }
            Err(e) => {
                tracing::error!(error = %e, "Flight login failed");
                metrics::record_token_event("login_failed");
                let mut state = self.state.write().await;
                state.credential = None;
                state.last_error = Some(e.clone());
                state.generation += 1;
                Err(e)
            }
        }
    }

    /// Cache `grant`, keeping `previous_refresh` when the partner did not rotate it.
    async fn store(&self, grant: TokenGrant, previous_refresh: Option<String>) -> String {
        let token = grant.access_token;
        let mut state = self.state.write().await;
        state.credential = Some(CachedCredential {
            token: token.clone(),
            refresh_token: grant.refresh_token.or(previous_refresh),
            expires_at: Instant::now() + grant.expires_in,
        });
        state.last_error = None;
        state.generation += 1;
        token
    }
}

impl std::fmt::Debug for CredentialManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialManager")
            .field("margin_secs", &self.margin.as_secs())
            .finish()
    }
}
