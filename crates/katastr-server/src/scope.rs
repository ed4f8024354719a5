//! Per-request cancellation.

use std::convert::Infallible;
use std::time::Duration;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tokio_util::sync::{CancellationToken, DropGuard};

use crate::state::AppState;

/// Cancellation token scoped to one inbound request.
///
/// The token fires when the request deadline passes or when the scope is
/// dropped, which happens when the handler returns or its future is dropped
/// after the client disconnects.
#[derive(Debug)]
pub struct RequestScope {
    token: CancellationToken,
    _guard: DropGuard,
}

impl RequestScope {
    pub fn new(deadline: Duration) -> Self {
        let token = CancellationToken::new();
        let timer = token.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = timer.cancelled() => {}
                _ = tokio::time::sleep(deadline) => {
                    tracing::debug!("Request deadline of {:?} passed, cancelling", deadline);
                    timer.cancel();
                }
            }
        });

        Self {
            _guard: token.clone().drop_guard(),
            token,
        }
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}

impl FromRequestParts<AppState> for RequestScope {
    type Rejection = Infallible;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(RequestScope::new(state.request_timeout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_drop_cancels_token() {
        let scope = RequestScope::new(Duration::from_secs(60));
        let token = scope.token().clone();
        assert!(!token.is_cancelled());

        drop(scope);
        assert!(token.is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_cancels_token() {
        let scope = RequestScope::new(Duration::from_secs(30));

        tokio::time::sleep(Duration::from_secs(29)).await;
        assert!(!scope.token().is_cancelled());

        tokio::time::timeout(Duration::from_secs(2), scope.token().cancelled())
            .await
            .unwrap();
    }
}
