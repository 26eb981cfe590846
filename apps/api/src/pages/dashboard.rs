//! Dashboard — cross-collection overview with derived charts.
//!
//! Stateless: the three collections are re-fetched concurrently on every
//! request, and every figure is a pure function of the fetched lists.

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::error;

use super::vault::{certificate_stats, CertificateStats};
use crate::models::{CareerRecommendation, Certificate, Member, Skill};
use crate::session::Authenticated;
use crate::state::AppState;
use crate::store::{CAREER_RECOMMENDATIONS, CERTIFICATES, SKILLS};

const RECENT_CERTIFICATES: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistogramSlice {
    pub name: String,
    pub count: usize,
}

fn histogram<'a>(buckets: impl Iterator<Item = &'a str>) -> Vec<HistogramSlice> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for bucket in buckets {
        *counts.entry(bucket).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(name, count)| HistogramSlice {
            name: name.to_string(),
            count,
        })
        .collect()
}

/// Skill counts per category; absent categories fall into "Other".
pub fn category_histogram(skills: &[Skill]) -> Vec<HistogramSlice> {
    histogram(skills.iter().map(Skill::category_bucket))
}

/// Skill counts per proficiency level; absent levels fall into "Unknown".
pub fn proficiency_histogram(skills: &[Skill]) -> Vec<HistogramSlice> {
    histogram(skills.iter().map(Skill::proficiency_bucket))
}

/// Most recently created certificates, newest first.
pub fn recent_certificates(certificates: &[Certificate]) -> Vec<Certificate> {
    let mut sorted: Vec<Certificate> = certificates.to_vec();
    sorted.sort_by(|a, b| b.created_date.cmp(&a.created_date));
    sorted.truncate(RECENT_CERTIFICATES);
    sorted
}

#[derive(Serialize)]
pub struct DashboardView {
    pub welcome_name: String,
    pub certificates: CertificateStats,
    pub total_skills: usize,
    pub career_paths: usize,
    pub skills_by_category: Vec<HistogramSlice>,
    pub skills_by_proficiency: Vec<HistogramSlice>,
    pub recent_certificates: Vec<Certificate>,
}

/// GET /api/v1/dashboard
pub async fn handle_get_dashboard(
    State(state): State<AppState>,
    Authenticated(member): Authenticated,
) -> Json<DashboardView> {
    let store = &*state.store;
    let (certificates, skills, careers) = tokio::join!(
        store.get_all::<Certificate>(CERTIFICATES),
        store.get_all::<Skill>(SKILLS),
        store.get_all::<CareerRecommendation>(CAREER_RECOMMENDATIONS),
    );

    // Fetch failures degrade to empty sections rather than an error page.
    let certificates = certificates.unwrap_or_else(|e| {
        error!("Error loading dashboard certificates: {e}");
        Vec::new()
    });
    let skills = skills.unwrap_or_else(|e| {
        error!("Error loading dashboard skills: {e}");
        Vec::new()
    });
    let careers = careers.unwrap_or_else(|e| {
        error!("Error loading dashboard careers: {e}");
        Vec::new()
    });

    Json(dashboard_view(&member, &certificates, &skills, &careers))
}

pub fn dashboard_view(
    member: &Member,
    certificates: &[Certificate],
    skills: &[Skill],
    careers: &[CareerRecommendation],
) -> DashboardView {
    DashboardView {
        welcome_name: member.display_name(),
        certificates: certificate_stats(certificates),
        total_skills: skills.len(),
        career_paths: careers.len(),
        skills_by_category: category_histogram(skills),
        skills_by_proficiency: proficiency_histogram(skills),
        recent_certificates: recent_certificates(certificates),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::testing::test_member;
    use serde_json::json;

    fn certificate(id: &str, score: f64, fraud: bool) -> Certificate {
        serde_json::from_value(json!({
            "_id": id,
            "fraudDetected": fraud,
            "verificationScore": score,
        }))
        .unwrap()
    }

    fn skill(category: Option<&str>, proficiency: Option<&str>) -> Skill {
        let mut value = json!({"_id": "s"});
        if let Some(c) = category {
            value["category"] = json!(c);
        }
        if let Some(p) = proficiency {
            value["proficiencyLevel"] = json!(p);
        }
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_dashboard_scenario_two_certificates() {
        // [{_id:"a", fraudDetected:false, verificationScore:90},
        //  {_id:"b", fraudDetected:true, verificationScore:40}]
        let certificates = vec![
            certificate("a", 90.0, false),
            certificate("b", 40.0, true),
        ];
        let view = dashboard_view(&test_member(), &certificates, &[], &[]);
        assert_eq!(view.certificates.total, 2);
        assert_eq!(view.certificates.verified, 1);
        assert_eq!(view.certificates.fraud, 1);
        assert_eq!(view.certificates.average_score, 65);
        assert_eq!(view.welcome_name, "ada");
    }

    #[test]
    fn test_histograms_bucket_absent_fields() {
        let skills = vec![
            skill(Some("Programming"), Some("Advanced")),
            skill(Some("Programming"), None),
            skill(None, Some("Advanced")),
        ];
        let by_category = category_histogram(&skills);
        assert!(by_category.contains(&HistogramSlice {
            name: "Other".to_string(),
            count: 1
        }));
        assert!(by_category.contains(&HistogramSlice {
            name: "Programming".to_string(),
            count: 2
        }));

        let by_proficiency = proficiency_histogram(&skills);
        assert!(by_proficiency.contains(&HistogramSlice {
            name: "Advanced".to_string(),
            count: 2
        }));
        assert!(by_proficiency.contains(&HistogramSlice {
            name: "Unknown".to_string(),
            count: 1
        }));
    }

    #[test]
    fn test_recent_certificates_are_newest_first_and_capped() {
        let mut certificates: Vec<Certificate> = (0..7)
            .map(|i| {
                serde_json::from_value(json!({
                    "_id": format!("c{i}"),
                    "_createdDate": format!("2026-01-0{}T00:00:00Z", i + 1),
                }))
                .unwrap()
            })
            .collect();
        certificates.reverse(); // arbitrary input order

        let recent = recent_certificates(&certificates);
        assert_eq!(recent.len(), 5);
        assert_eq!(recent[0].id, "c6");
        assert_eq!(recent[4].id, "c2");
    }

    #[test]
    fn test_empty_collections_render_empty_dashboard() {
        let view = dashboard_view(&test_member(), &[], &[], &[]);
        assert_eq!(view.certificates.total, 0);
        assert_eq!(view.total_skills, 0);
        assert_eq!(view.career_paths, 0);
        assert!(view.skills_by_category.is_empty());
        assert!(view.recent_certificates.is_empty());
    }
}
