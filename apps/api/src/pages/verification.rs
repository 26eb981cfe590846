//! Public verification surface: `GET /verify?id=<certificate-id>`.
//!
//! The only unauthenticated, shareable page. An unknown or missing
//! identifier renders the dedicated not-found view; it is not treated as a
//! logged error.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::{Certificate, Confidence};
use crate::state::AppState;
use crate::store::{StoreError, CERTIFICATES};

#[derive(Deserialize)]
pub struct VerifyQuery {
    pub id: Option<String>,
}

/// Read-only public summary; the original document URL is not exposed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuing_body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_image: Option<String>,
    pub verification_score: f64,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum VerificationView {
    Found {
        certificate: CertificateSummary,
        verified: bool,
        confidence: Confidence,
    },
    NotFound,
}

pub fn verification_view(certificate: &Certificate) -> VerificationView {
    VerificationView::Found {
        certificate: CertificateSummary {
            recipient_name: certificate.recipient_name.clone(),
            issuing_body: certificate.issuing_body.clone(),
            issue_date: certificate.issue_date,
            preview_image: certificate.certificate_preview_image.clone(),
            verification_score: certificate.score(),
        },
        verified: certificate.is_verified(),
        confidence: certificate.confidence(),
    }
}

/// GET /verify?id=...
pub async fn handle_verify(
    State(state): State<AppState>,
    Query(query): Query<VerifyQuery>,
) -> Result<(StatusCode, Json<VerificationView>), AppError> {
    let Some(id) = query.id.as_deref().map(str::trim).filter(|id| !id.is_empty()) else {
        return Ok((StatusCode::NOT_FOUND, Json(VerificationView::NotFound)));
    };

    match state.store.get_by_id::<Certificate>(CERTIFICATES, id).await {
        Ok(certificate) => Ok((StatusCode::OK, Json(verification_view(&certificate)))),
        Err(StoreError::NotFound { .. }) => {
            Ok((StatusCode::NOT_FOUND, Json(VerificationView::NotFound)))
        }
        // Remote outages are real failures, distinct from "no such record".
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::testing::test_state;
    use crate::store::testing::MemoryStore;
    use serde_json::json;
    use std::sync::Arc;

    fn state_with_certificate() -> AppState {
        let store = Arc::new(MemoryStore::new());
        store.seed(
            CERTIFICATES,
            vec![json!({
                "_id": "cert-1",
                "recipientName": "Ada Lovelace",
                "issuingBody": "Analytical Society",
                "verificationScore": 90.0,
                "fraudDetected": false,
                "certificateFileUrl": "https://media.test/cert.pdf"
            })],
        );
        test_state(store)
    }

    #[tokio::test]
    async fn test_known_id_renders_summary_with_confidence() {
        let state = state_with_certificate();
        let (status, Json(view)) = handle_verify(
            State(state),
            Query(VerifyQuery {
                id: Some("cert-1".to_string()),
            }),
        )
        .await
        .unwrap();

        assert_eq!(status, StatusCode::OK);
        match view {
            VerificationView::Found {
                certificate,
                verified,
                confidence,
            } => {
                assert_eq!(certificate.recipient_name.as_deref(), Some("Ada Lovelace"));
                assert!(verified);
                assert_eq!(confidence, Confidence::High);
            }
            VerificationView::NotFound => panic!("expected a found view"),
        }
    }

    #[tokio::test]
    async fn test_unknown_id_renders_not_found_view() {
        let state = state_with_certificate();
        let (status, Json(view)) = handle_verify(
            State(state),
            Query(VerifyQuery {
                id: Some("nope".to_string()),
            }),
        )
        .await
        .unwrap();

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(matches!(view, VerificationView::NotFound));
    }

    #[tokio::test]
    async fn test_missing_id_renders_not_found_view() {
        let state = state_with_certificate();
        let (status, Json(view)) = handle_verify(State(state), Query(VerifyQuery { id: None }))
            .await
            .unwrap();

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(matches!(view, VerificationView::NotFound));
    }

    #[tokio::test]
    async fn test_public_summary_omits_the_document_url() {
        let state = state_with_certificate();
        let (_, Json(view)) = handle_verify(
            State(state),
            Query(VerifyQuery {
                id: Some("cert-1".to_string()),
            }),
        )
        .await
        .unwrap();

        let json = serde_json::to_value(&view).unwrap();
        assert!(json.get("certificate").is_some());
        assert!(json["certificate"].get("certificateFileUrl").is_none());
    }
}
