//! Credentials and access-token lifecycle.
//!
//! A [`Credential`] is exchanged at its `auth_url` for a short-lived bearer
//! [`Token`]. [`TokenManager`] (async) and [`BlockingTokenManager`] cache that
//! token and renew it lazily: every `get_token()` call checks the remaining
//! lifetime and refreshes first when it has dropped below the safety margin.
//! There is no background renewal task.

mod blocking;
mod credential;
mod manager;
mod token;

pub use blocking::BlockingTokenManager;
pub use credential::Credential;
pub use manager::TokenManager;
pub use token::{Token, TokenResponse};

use crate::error::AuthError;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tracing::{debug, warn};

/// Callback invoked with the new token after each successful renewal.
pub type RenewalHook = Arc<dyn Fn(&Token) + Send + Sync>;

#[derive(Default)]
pub(crate) struct RenewalHooks {
    hooks: RwLock<Vec<RenewalHook>>,
}

impl RenewalHooks {
    pub(crate) fn add(&self, hook: RenewalHook) {
        let mut hooks = self.hooks.write().unwrap_or_else(PoisonError::into_inner);
        hooks.push(hook);
        debug!(hooks = hooks.len(), "registered renewal hook");
    }

    pub(crate) fn notify(&self, token: &Token) {
        // Snapshot so a hook may register further hooks without deadlocking.
        let hooks = self
            .hooks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if hooks.is_empty() {
            return;
        }
        debug!(hooks = hooks.len(), "calling renewal hooks");
        for hook in hooks.iter() {
            hook(token);
        }
    }
}

/// Turn the auth server's reply into a [`Token`].
///
/// Shared by the async and blocking managers so both classify failures the
/// same way.
pub(crate) fn token_from_reply(
    status: u16,
    body: &str,
    safety_margin: Duration,
) -> Result<Token, AuthError> {
    if (500..600).contains(&status) {
        warn!(status, "auth server unavailable");
        return Err(AuthError::Transport(format!("HTTP {status}: {body}")));
    }
    if !(200..300).contains(&status) {
        warn!(status, "token request rejected");
        return Err(AuthError::Rejected {
            status,
            body: body.to_string(),
        });
    }

    let reply: TokenResponse = serde_json::from_str(body)
        .map_err(|e| AuthError::MalformedResponse(e.to_string()))?;
    if reply.access_token.is_empty() {
        return Err(AuthError::MalformedResponse("empty access_token".into()));
    }

    let expires_in = reply.expires_in;
    let token = Token::from_response(reply, chrono::Utc::now());
    if !token.is_fresh(safety_margin) {
        return Err(AuthError::MalformedResponse(format!(
            "token lifetime {}s does not exceed safety margin {}s",
            expires_in,
            safety_margin.as_secs()
        )));
    }

    debug!(expires_in, "access token retrieved");
    Ok(token)
}
