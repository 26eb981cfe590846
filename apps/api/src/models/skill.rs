use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{require, MissingField};

/// A record in the `skills` collection.
///
/// Proficiency levels are an open-ended set of strings; the common values
/// are Beginner, Intermediate, Advanced and Expert.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_createdDate", skip_serializing_if = "Option::is_none")]
    pub created_date: Option<DateTime<Utc>>,
    #[serde(rename = "_updatedDate", skip_serializing_if = "Option::is_none")]
    pub updated_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skill_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proficiency_level: Option<String>,
    /// Comma-delimited free text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_tools: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_core_skill: Option<bool>,
}

impl Skill {
    pub fn is_core(&self) -> bool {
        self.is_core_skill.unwrap_or(false)
    }

    /// Histogram bucket for the category chart; absent categories group
    /// under "Other".
    pub fn category_bucket(&self) -> &str {
        self.category.as_deref().filter(|c| !c.is_empty()).unwrap_or("Other")
    }

    /// Histogram bucket for the proficiency chart; absent levels group
    /// under "Unknown".
    pub fn proficiency_bucket(&self) -> &str {
        self.proficiency_level
            .as_deref()
            .filter(|p| !p.is_empty())
            .unwrap_or("Unknown")
    }

    /// Case-insensitive substring match over name and description.
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        let contains = |field: &Option<String>| {
            field
                .as_deref()
                .map(|v| v.to_lowercase().contains(&query))
                .unwrap_or(false)
        };
        contains(&self.skill_name) || contains(&self.description)
    }
}

/// Form payload for creating a skill.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillDraft {
    pub skill_name: String,
    pub category: String,
    pub proficiency_level: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub related_tools: Option<String>,
    #[serde(default)]
    pub is_core_skill: Option<bool>,
}

impl SkillDraft {
    /// Boundary validation: name, category and proficiency must be
    /// non-empty. Assigns a client-generated identifier.
    pub fn into_record(self) -> Result<Skill, MissingField> {
        let skill_name = require(&self.skill_name, "skillName")?.to_string();
        let category = require(&self.category, "category")?.to_string();
        let proficiency = require(&self.proficiency_level, "proficiencyLevel")?.to_string();

        Ok(Skill {
            id: Uuid::new_v4().to_string(),
            created_date: None,
            updated_date: None,
            skill_name: Some(skill_name),
            description: self.description,
            category: Some(category),
            proficiency_level: Some(proficiency),
            related_tools: self.related_tools,
            is_core_skill: Some(self.is_core_skill.unwrap_or(false)),
        })
    }
}
