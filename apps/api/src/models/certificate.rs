use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{require, MissingField};

/// A record in the `certificates` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_createdDate", skip_serializing_if = "Option::is_none")]
    pub created_date: Option<DateTime<Utc>>,
    #[serde(rename = "_updatedDate", skip_serializing_if = "Option::is_none")]
    pub updated_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuing_body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate_file_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate_preview_image: Option<String>,
    /// 0–100. The range is not enforced by the remote store.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fraud_detected: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_verification_link: Option<String>,
}

/// Confidence band shown on the public verification page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Certificate {
    /// Verification score with the absent case rendered as 0, matching how
    /// the vault and dashboard display it.
    pub fn score(&self) -> f64 {
        self.verification_score.unwrap_or(0.0)
    }

    /// A certificate counts as verified unless fraud was flagged.
    pub fn is_verified(&self) -> bool {
        !self.fraud_detected.unwrap_or(false)
    }

    pub fn confidence(&self) -> Confidence {
        let score = self.score();
        if score >= 80.0 {
            Confidence::High
        } else if score >= 60.0 {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }

    /// Case-insensitive substring match over recipient and issuer.
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        let contains = |field: &Option<String>| {
            field
                .as_deref()
                .map(|v| v.to_lowercase().contains(&query))
                .unwrap_or(false)
        };
        contains(&self.recipient_name) || contains(&self.issuing_body)
    }
}

/// Form payload for creating a certificate.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateDraft {
    pub recipient_name: String,
    pub issuing_body: String,
    /// URL returned by the media upload for the original document.
    pub certificate_file_url: String,
    #[serde(default)]
    pub issue_date: Option<NaiveDate>,
    #[serde(default)]
    pub certificate_preview_image: Option<String>,
    #[serde(default)]
    pub verification_score: Option<f64>,
}

impl CertificateDraft {
    /// Boundary validation: required fields must be non-empty. Assigns a
    /// client-generated identifier and derives the public verification link
    /// from it.
    pub fn into_record(self, public_base_url: &str) -> Result<Certificate, MissingField> {
        let recipient_name = require(&self.recipient_name, "recipientName")?.to_string();
        let issuing_body = require(&self.issuing_body, "issuingBody")?.to_string();
        let file_url = require(&self.certificate_file_url, "certificateFileUrl")?.to_string();

        let id = Uuid::new_v4().to_string();
        let link = format!("{}/verify?id={id}", public_base_url.trim_end_matches('/'));

        Ok(Certificate {
            id,
            created_date: None,
            updated_date: None,
            recipient_name: Some(recipient_name),
            issuing_body: Some(issuing_body),
            issue_date: self.issue_date,
            certificate_file_url: Some(file_url),
            certificate_preview_image: self.certificate_preview_image,
            verification_score: self.verification_score,
            fraud_detected: Some(false),
            public_verification_link: Some(link),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> CertificateDraft {
        CertificateDraft {
            recipient_name: "Ada Lovelace".to_string(),
            issuing_body: "Analytical Society".to_string(),
            certificate_file_url: "https://media.example/cert.pdf".to_string(),
            issue_date: None,
            certificate_preview_image: None,
            verification_score: Some(92.0),
        }
    }

    #[test]
    fn test_draft_builds_record_with_verification_link() {
        let cert = draft().into_record("https://vault.example/").unwrap();
        let link = cert.public_verification_link.unwrap();
        assert_eq!(link, format!("https://vault.example/verify?id={}", cert.id));
        assert_eq!(cert.fraud_detected, Some(false));
    }

    #[test]
    fn test_draft_ids_are_distinct() {
        let a = draft().into_record("https://vault.example").unwrap();
        let b = draft().into_record("https://vault.example").unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_empty_required_field_is_rejected() {
        let mut d = draft();
        d.recipient_name = "   ".to_string();
        let err = d.into_record("https://vault.example").unwrap_err();
        assert_eq!(err.to_string(), "recipientName is required");
    }

    #[test]
    fn test_confidence_bands() {
        let mut cert = draft().into_record("https://vault.example").unwrap();
        cert.verification_score = Some(90.0);
        assert_eq!(cert.confidence(), Confidence::High);
        cert.verification_score = Some(65.0);
        assert_eq!(cert.confidence(), Confidence::Medium);
        cert.verification_score = None;
        assert_eq!(cert.confidence(), Confidence::Low);
    }

    #[test]
    fn test_wire_field_names_match_the_collection() {
        let cert = draft().into_record("https://vault.example").unwrap();
        let json = serde_json::to_value(&cert).unwrap();
        assert!(json.get("_id").is_some());
        assert!(json.get("recipientName").is_some());
        assert!(json.get("publicVerificationLink").is_some());
        // Absent optionals are omitted, not serialized as null.
        assert!(json.get("_createdDate").is_none());
    }

    #[test]
    fn test_search_matches_recipient_or_issuer() {
        let cert = draft().into_record("https://vault.example").unwrap();
        assert!(cert.matches_query("ada"));
        assert!(cert.matches_query("SOCIETY"));
        assert!(!cert.matches_query("turing"));
    }
}
