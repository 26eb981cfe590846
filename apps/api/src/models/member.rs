use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Read-only member profile supplied by the external identity service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login_email_verified: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(rename = "_createdDate", skip_serializing_if = "Option::is_none")]
    pub created_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login_date: Option<DateTime<Utc>>,
}

impl Member {
    /// Display-name fallback chain: nickname, then "first last", then "User".
    pub fn display_name(&self) -> String {
        if let Some(nickname) = self.nickname.as_deref().filter(|n| !n.trim().is_empty()) {
            return nickname.to_string();
        }
        let full = format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or(""),
            self.last_name.as_deref().unwrap_or("")
        );
        let full = full.trim();
        if full.is_empty() {
            "User".to_string()
        } else {
            full.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member() -> Member {
        Member {
            id: "m1".to_string(),
            nickname: None,
            first_name: None,
            last_name: None,
            title: None,
            photo_url: None,
            login_email: Some("ada@example.com".to_string()),
            login_email_verified: Some(true),
            status: Some("APPROVED".to_string()),
            created_date: None,
            last_login_date: None,
        }
    }

    #[test]
    fn test_display_name_prefers_nickname() {
        let mut m = member();
        m.nickname = Some("ada".to_string());
        m.first_name = Some("Ada".to_string());
        assert_eq!(m.display_name(), "ada");
    }

    #[test]
    fn test_display_name_falls_back_to_full_name() {
        let mut m = member();
        m.first_name = Some("Ada".to_string());
        m.last_name = Some("Lovelace".to_string());
        assert_eq!(m.display_name(), "Ada Lovelace");
    }

    #[test]
    fn test_display_name_defaults_to_user() {
        assert_eq!(member().display_name(), "User");
    }
}
