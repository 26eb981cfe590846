//! Certificate vault — list, search, upload and delete certificates.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::error;

use super::PageStatus;
use crate::errors::AppError;
use crate::models::{Certificate, CertificateDraft};
use crate::session::Authenticated;
use crate::state::AppState;
use crate::store::{RecordStore, CERTIFICATES};

/// Derived vault statistics. Pure function of the certificate list:
/// `verified + fraud == total` holds for any input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CertificateStats {
    pub total: usize,
    pub verified: usize,
    pub fraud: usize,
    /// Rounded mean verification score; absent scores count as 0.
    pub average_score: u32,
}

pub fn certificate_stats(certificates: &[Certificate]) -> CertificateStats {
    let total = certificates.len();
    let verified = certificates.iter().filter(|c| c.is_verified()).count();
    let average_score = if total > 0 {
        let sum: f64 = certificates.iter().map(Certificate::score).sum();
        (sum / total as f64).round() as u32
    } else {
        0
    };
    CertificateStats {
        total,
        verified,
        fraud: total - verified,
        average_score,
    }
}

/// View state and mutation protocol for the vault page.
pub struct VaultPage {
    store: Arc<dyn RecordStore>,
    public_base_url: String,
    certificates: Vec<Certificate>,
    loaded: bool,
}

impl VaultPage {
    pub fn new(store: Arc<dyn RecordStore>, public_base_url: String) -> Self {
        Self {
            store,
            public_base_url,
            certificates: Vec::new(),
            loaded: false,
        }
    }

    pub async fn ensure_loaded(&mut self) {
        if !self.loaded {
            self.reload().await;
        }
    }

    /// Full re-fetch from the record store. Doubles as the rollback action
    /// for failed mutations; a failed fetch degrades to the empty state.
    pub async fn reload(&mut self) {
        match self.store.get_all::<Certificate>(CERTIFICATES).await {
            Ok(items) => self.certificates = items,
            Err(e) => {
                error!("Error loading certificates: {e}");
                self.certificates = Vec::new();
            }
        }
        self.loaded = true;
    }

    pub fn certificates(&self) -> &[Certificate] {
        &self.certificates
    }

    /// Substring search over recipient and issuer; no query returns all.
    pub fn search(&self, query: Option<&str>) -> Vec<Certificate> {
        match query.map(str::trim).filter(|q| !q.is_empty()) {
            Some(q) => self
                .certificates
                .iter()
                .filter(|c| c.matches_query(q))
                .cloned()
                .collect(),
            None => self.certificates.clone(),
        }
    }

    pub fn stats(&self) -> CertificateStats {
        certificate_stats(&self.certificates)
    }

    /// Two-phase commit: validate at the boundary, apply optimistically,
    /// then create remotely. A failed create rolls the view back to the
    /// remote state.
    pub async fn add_certificate(
        &mut self,
        draft: CertificateDraft,
    ) -> Result<Certificate, AppError> {
        let record = draft.into_record(&self.public_base_url)?;
        self.certificates.push(record.clone());
        match self.store.create(CERTIFICATES, &record).await {
            Ok(created) => {
                // Keep the remote's acknowledged copy (it carries timestamps).
                if let Some(slot) = self.certificates.iter_mut().find(|c| c.id == created.id) {
                    *slot = created.clone();
                }
                Ok(created)
            }
            Err(e) => {
                self.reload().await;
                Err(e.into())
            }
        }
    }

    /// Optimistic delete with the same rollback. Rapid duplicate deletes
    /// both reach the remote; its idempotency governs the outcome.
    pub async fn delete_certificate(&mut self, id: &str) -> Result<(), AppError> {
        self.certificates.retain(|c| c.id != id);
        match self.store.delete(CERTIFICATES, id).await {
            Ok(()) => Ok(()),
            Err(e) => {
                self.reload().await;
                Err(e.into())
            }
        }
    }
}

#[derive(Deserialize)]
pub struct VaultQuery {
    pub q: Option<String>,
}

#[derive(Serialize)]
pub struct VaultView {
    pub status: PageStatus,
    pub stats: CertificateStats,
    pub certificates: Vec<Certificate>,
}

/// GET /api/v1/vault
pub async fn handle_get_vault(
    State(state): State<AppState>,
    _session: Authenticated,
    Query(query): Query<VaultQuery>,
) -> Json<VaultView> {
    let mut page = state.vault.write().await;
    page.ensure_loaded().await;
    Json(VaultView {
        status: PageStatus::of(page.certificates()),
        stats: page.stats(),
        certificates: page.search(query.q.as_deref()),
    })
}

/// POST /api/v1/vault/certificates
pub async fn handle_add_certificate(
    State(state): State<AppState>,
    _session: Authenticated,
    Json(draft): Json<CertificateDraft>,
) -> Result<(StatusCode, Json<Certificate>), AppError> {
    let mut page = state.vault.write().await;
    page.ensure_loaded().await;
    let created = page.add_certificate(draft).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// DELETE /api/v1/vault/certificates/:id
pub async fn handle_delete_certificate(
    State(state): State<AppState>,
    _session: Authenticated,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let mut page = state.vault.write().await;
    page.ensure_loaded().await;
    page.delete_certificate(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
