use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A record in the `careerrecommendations` collection.
/// Read-only from this application's perspective: no create, update or
/// delete path exists for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerRecommendation {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_createdDate", skip_serializing_if = "Option::is_none")]
    pub created_date: Option<DateTime<Utc>>,
    #[serde(rename = "_updatedDate", skip_serializing_if = "Option::is_none")]
    pub updated_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Comma-delimited free text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_skills: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_salary_range: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_market_outlook: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub career_image: Option<String>,
}

impl CareerRecommendation {
    /// Splits the comma-delimited required-skills text into trimmed,
    /// non-empty entries.
    pub fn required_skills_list(&self) -> Vec<&str> {
        self.required_skills
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }
}
