//! Session/identity gate.
//!
//! Authentication is owned by an external member-identity service; this
//! module only models the capability the pages consume. `AppState` carries
//! an `Arc<dyn IdentityProvider>` — never a hidden global — and handlers
//! consume it through two extractors: `Session` (always succeeds, may be
//! anonymous) and `Authenticated` (rejects anonymous visitors).

use async_trait::async_trait;
use axum::extract::{FromRequestParts, State};
use axum::http::{header::AUTHORIZATION, request::Parts, StatusCode};
use axum::Json;
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use crate::errors::AppError;
use crate::models::Member;
use crate::state::AppState;

const REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("identity service returned {status}: {message}")]
    Api { status: u16, message: String },
}

/// Capability exposed by the external identity integration.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolves a bearer token to a member profile.
    /// `None` means the token is invalid or expired.
    async fn resolve(&self, token: &str) -> Result<Option<Member>, IdentityError>;

    /// Where unauthenticated visitors are sent to sign in.
    fn login_url(&self) -> String;

    /// Ends the session held by `token` at the provider.
    async fn logout(&self, token: &str) -> Result<(), IdentityError>;
}

/// HTTP implementation calling the hosted member-identity service.
pub struct HttpIdentityProvider {
    client: Client,
    base_url: String,
}

impl HttpIdentityProvider {
    pub fn new(base_url: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn resolve(&self, token: &str) -> Result<Option<Member>, IdentityError> {
        let response = self
            .client
            .get(format!("{}/v1/members/me", self.base_url))
            .bearer_auth(token)
            .send()
            .await?;

        // reqwest's StatusCode, not axum's: the two crates pin different
        // `http` major versions.
        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Ok(None);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(IdentityError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(Some(response.json().await?))
    }

    fn login_url(&self) -> String {
        format!("{}/v1/auth/login", self.base_url)
    }

    async fn logout(&self, token: &str) -> Result<(), IdentityError> {
        let response = self
            .client
            .post(format!("{}/v1/auth/logout", self.base_url))
            .bearer_auth(token)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(IdentityError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(())
    }
}

/// The gate is polymorphic over exactly two states.
pub enum Session {
    Authenticated { member: Member, token: String },
    Anonymous,
}

impl Session {
    pub fn member(&self) -> Option<&Member> {
        match self {
            Session::Authenticated { member, .. } => Some(member),
            Session::Anonymous => None,
        }
    }
}

fn bearer_token(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string)
}

#[async_trait]
impl FromRequestParts<AppState> for Session {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(parts) else {
            return Ok(Session::Anonymous);
        };
        match state.identity.resolve(&token).await {
            Ok(Some(member)) => Ok(Session::Authenticated { member, token }),
            Ok(None) => Ok(Session::Anonymous),
            // Provider outages degrade to anonymous rather than failing the page.
            Err(e) => {
                warn!("Identity provider unavailable: {e}");
                Ok(Session::Anonymous)
            }
        }
    }
}

/// Extractor guarding protected pages: anonymous visitors are turned away
/// with 401 before the handler body runs.
pub struct Authenticated(pub Member);

#[async_trait]
impl FromRequestParts<AppState> for Authenticated {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        match Session::from_request_parts(parts, state).await {
            Ok(Session::Authenticated { member, .. }) => Ok(Authenticated(member)),
            _ => Err(AppError::Unauthorized),
        }
    }
}

#[derive(Serialize)]
pub struct SessionView {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member: Option<Member>,
    pub login_url: String,
}

/// GET /api/v1/session
pub async fn handle_get_session(
    State(state): State<AppState>,
    session: Session,
) -> Json<SessionView> {
    let member = session.member().cloned();
    Json(SessionView {
        authenticated: member.is_some(),
        member,
        login_url: state.identity.login_url(),
    })
}

/// POST /api/v1/session/logout
/// Idempotent: an anonymous caller gets the same 204 as a signed-out one.
pub async fn handle_logout(
    State(state): State<AppState>,
    session: Session,
) -> Result<StatusCode, AppError> {
    if let Session::Authenticated { token, .. } = session {
        if let Err(e) = state.identity.logout(&token).await {
            warn!("Logout failed at identity provider: {e}");
        }
    }
    Ok(StatusCode::NO_CONTENT)
}


#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_resolve_returns_member_profile() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/members/me"))
            .and(header("Authorization", "Bearer tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "_id": "m1",
                "nickname": "ada",
                "loginEmail": "ada@example.com",
                "loginEmailVerified": true
            })))
            .mount(&server)
            .await;

        let provider = HttpIdentityProvider::new(server.uri());
        let member = provider.resolve("tok").await.unwrap().unwrap();
        assert_eq!(member.id, "m1");
        assert_eq!(member.display_name(), "ada");
    }

    #[tokio::test]
    async fn test_resolve_maps_401_to_anonymous() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/members/me"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let provider = HttpIdentityProvider::new(server.uri());
        assert!(provider.resolve("bad").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_resolve_maps_403_to_anonymous() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/members/me"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let provider = HttpIdentityProvider::new(server.uri());
        assert!(provider.resolve("revoked").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_resolve_surfaces_provider_outage() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let provider = HttpIdentityProvider::new(server.uri());
        assert!(matches!(
            provider.resolve("tok").await,
            Err(IdentityError::Api { status: 503, .. })
        ));
    }
}
