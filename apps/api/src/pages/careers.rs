//! Career recommendations — read-only listing of AI-generated career paths.

use std::collections::BTreeSet;
use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use tracing::error;

use super::PageStatus;
use crate::models::CareerRecommendation;
use crate::session::Authenticated;
use crate::state::AppState;
use crate::store::{RecordStore, CAREER_RECOMMENDATIONS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CareerStats {
    pub paths: usize,
    /// Distinct skills named across all recommendations (case-insensitive).
    pub required_skills: usize,
}

pub fn career_stats(careers: &[CareerRecommendation]) -> CareerStats {
    let skills: BTreeSet<String> = careers
        .iter()
        .flat_map(|c| c.required_skills_list())
        .map(|s| s.to_lowercase())
        .collect();
    CareerStats {
        paths: careers.len(),
        required_skills: skills.len(),
    }
}

/// View state for the careers page. No create, update or delete path
/// exists for this collection.
pub struct CareersPage {
    store: Arc<dyn RecordStore>,
    careers: Vec<CareerRecommendation>,
    loaded: bool,
}

impl CareersPage {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            careers: Vec::new(),
            loaded: false,
        }
    }

    pub async fn ensure_loaded(&mut self) {
        if !self.loaded {
            self.reload().await;
        }
    }

    pub async fn reload(&mut self) {
        match self
            .store
            .get_all::<CareerRecommendation>(CAREER_RECOMMENDATIONS)
            .await
        {
            Ok(items) => self.careers = items,
            Err(e) => {
                error!("Error loading careers: {e}");
                self.careers = Vec::new();
            }
        }
        self.loaded = true;
    }

    pub fn careers(&self) -> &[CareerRecommendation] {
        &self.careers
    }

    pub fn stats(&self) -> CareerStats {
        career_stats(&self.careers)
    }
}

#[derive(Serialize)]
pub struct CareersView {
    pub status: PageStatus,
    pub stats: CareerStats,
    pub careers: Vec<CareerRecommendation>,
}

/// GET /api/v1/careers
pub async fn handle_get_careers(
    State(state): State<AppState>,
    _session: Authenticated,
) -> Json<CareersView> {
    let mut page = state.careers.write().await;
    page.ensure_loaded().await;
    Json(CareersView {
        status: PageStatus::of(page.careers()),
        stats: page.stats(),
        careers: page.careers().to_vec(),
    })
}
