//! Entity schemas for the hosted collections.
//!
//! Every collection field is optional on the wire, so record structs model
//! them as explicit `Option`s and push required-field checks into one
//! boundary function per creatable entity (`*Draft::into_record`).

pub mod career;
pub mod certificate;
pub mod member;
pub mod skill;

pub use career::CareerRecommendation;
pub use certificate::{Certificate, CertificateDraft, Confidence};
pub use member::Member;
pub use skill::{Skill, SkillDraft};

use thiserror::Error;

/// A required form field was empty or missing at the entity boundary.
#[derive(Debug, Error)]
#[error("{0} is required")]
pub struct MissingField(pub &'static str);

/// Returns the trimmed value, or `MissingField` if nothing remains.
pub fn require<'a>(value: &'a str, field: &'static str) -> Result<&'a str, MissingField> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(MissingField(field))
    } else {
        Ok(trimmed)
    }
}
