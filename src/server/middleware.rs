//! Access gate middleware
//!
//! Runs before every gated route. The bearer token is resolved to a live
//! session (unknown or malformed tokens count as no session), the gate
//! decides, and the request is either passed on with the [`Session`] in its
//! extensions or answered with a redirect.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use url::form_urlencoded;

use super::handlers::{AppState, bearer_token};
use crate::core::auth::Session;
use crate::core::gate::{AccessDecision, authorize};

/// `{login}?callbackUrl=<encoded path and query>`
pub fn login_redirect_target(login: &str, original: &str) -> String {
    let encoded: String = form_urlencoded::byte_serialize(original.as_bytes()).collect();
    format!("{}?callbackUrl={}", login, encoded)
}

pub async fn access_gate(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let session: Option<Session> =
        bearer_token(req.headers()).and_then(|token| state.authenticator.sessions().get(&token));

    let path = req.uri().path().to_string();
    let decision = authorize(
        session.as_ref(),
        &path,
        &state.config.routes.protected_prefix,
    );

    match decision {
        AccessDecision::Allow => {
            if let Some(session) = session {
                req.extensions_mut().insert(session);
            }
            next.run(req).await
        }
        AccessDecision::DenyToLogin => {
            let original = req
                .uri()
                .path_and_query()
                .map_or(path.as_str(), |pq| pq.as_str());
            tracing::debug!(%path, "no session, redirecting to login");
            Redirect::to(&login_redirect_target(&state.config.routes.login, original))
                .into_response()
        }
        AccessDecision::RedirectToDashboard => {
            tracing::debug!(%path, "already signed in, redirecting to dashboard");
            Redirect::to(&state.config.routes.dashboard).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_redirect_target_encodes_path() {
        assert_eq!(
            login_redirect_target("/login", "/dashboard/invoices?query=lee&page=2"),
            "/login?callbackUrl=%2Fdashboard%2Finvoices%3Fquery%3Dlee%26page%3D2"
        );
        assert_eq!(
            login_redirect_target("/login", "/dashboard"),
            "/login?callbackUrl=%2Fdashboard"
        );
    }
}
