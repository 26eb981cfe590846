//! Skills inventory — list, filter, add and delete skills.

use std::collections::BTreeSet;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::error;

use super::PageStatus;
use crate::errors::AppError;
use crate::models::{Skill, SkillDraft};
use crate::session::Authenticated;
use crate::state::AppState;
use crate::store::{RecordStore, SKILLS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SkillStats {
    pub total: usize,
    pub core: usize,
    /// Number of distinct categories in use.
    pub categories: usize,
}

pub fn skill_stats(skills: &[Skill]) -> SkillStats {
    let categories: BTreeSet<&str> = skills.iter().map(Skill::category_bucket).collect();
    SkillStats {
        total: skills.len(),
        core: skills.iter().filter(|s| s.is_core()).count(),
        categories: categories.len(),
    }
}

/// Filter parameters from the skills page controls. Absent fields match
/// everything, mirroring the page's "all" selections.
#[derive(Debug, Default, Deserialize)]
pub struct SkillFilter {
    pub q: Option<String>,
    pub category: Option<String>,
    pub proficiency: Option<String>,
}

pub fn filter_skills<'a>(skills: &'a [Skill], filter: &SkillFilter) -> Vec<&'a Skill> {
    skills
        .iter()
        .filter(|skill| {
            let matches_search = match filter.q.as_deref().map(str::trim) {
                Some(q) if !q.is_empty() => skill.matches_query(q),
                _ => true,
            };
            let matches_category = filter
                .category
                .as_deref()
                .map(|c| skill.category.as_deref() == Some(c))
                .unwrap_or(true);
            let matches_proficiency = filter
                .proficiency
                .as_deref()
                .map(|p| skill.proficiency_level.as_deref() == Some(p))
                .unwrap_or(true);
            matches_search && matches_category && matches_proficiency
        })
        .collect()
}

/// View state and mutation protocol for the skills page.
pub struct SkillsPage {
    store: Arc<dyn RecordStore>,
    skills: Vec<Skill>,
    loaded: bool,
}

impl SkillsPage {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            skills: Vec::new(),
            loaded: false,
        }
    }

    pub async fn ensure_loaded(&mut self) {
        if !self.loaded {
            self.reload().await;
        }
    }

    pub async fn reload(&mut self) {
        match self.store.get_all::<Skill>(SKILLS).await {
            Ok(items) => self.skills = items,
            Err(e) => {
                error!("Error loading skills: {e}");
                self.skills = Vec::new();
            }
        }
        self.loaded = true;
    }

    pub fn skills(&self) -> &[Skill] {
        &self.skills
    }

    pub fn stats(&self) -> SkillStats {
        skill_stats(&self.skills)
    }

    /// Same two-phase commit as the vault: optimistic apply, remote create,
    /// rollback by re-fetch on failure.
    pub async fn add_skill(&mut self, draft: SkillDraft) -> Result<Skill, AppError> {
        let record = draft.into_record()?;
        self.skills.push(record.clone());
        match self.store.create(SKILLS, &record).await {
            Ok(created) => {
                if let Some(slot) = self.skills.iter_mut().find(|s| s.id == created.id) {
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

    pub async fn delete_skill(&mut self, id: &str) -> Result<(), AppError> {
        self.skills.retain(|s| s.id != id);
        match self.store.delete(SKILLS, id).await {
            Ok(()) => Ok(()),
            Err(e) => {
                self.reload().await;
                Err(e.into())
            }
        }
    }
}

#[derive(Serialize)]
pub struct SkillsView {
    pub status: PageStatus,
    pub stats: SkillStats,
    pub skills: Vec<Skill>,
}

/// GET /api/v1/skills
pub async fn handle_get_skills(
    State(state): State<AppState>,
    _session: Authenticated,
    Query(filter): Query<SkillFilter>,
) -> Json<SkillsView> {
    let mut page = state.skills.write().await;
    page.ensure_loaded().await;
    let skills = filter_skills(page.skills(), &filter)
        .into_iter()
        .cloned()
        .collect();
    Json(SkillsView {
        status: PageStatus::of(page.skills()),
        stats: page.stats(),
        skills,
    })
}

/// POST /api/v1/skills
pub async fn handle_add_skill(
    State(state): State<AppState>,
    _session: Authenticated,
    Json(draft): Json<SkillDraft>,
) -> Result<(StatusCode, Json<Skill>), AppError> {
    let mut page = state.skills.write().await;
    page.ensure_loaded().await;
    let created = page.add_skill(draft).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// DELETE /api/v1/skills/:id
pub async fn handle_delete_skill(
    State(state): State<AppState>,
    _session: Authenticated,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let mut page = state.skills.write().await;
    page.ensure_loaded().await;
    page.delete_skill(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
