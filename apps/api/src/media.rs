//! Media upload client for the hosted media manager.
//!
//! Files are validated (MIME allow-list, size ceiling) before any network
//! call, then shipped in a single POST as a JSON body with base64 content.
//! No retry, no resumability, no progress reporting.

use async_trait::async_trait;
use axum::extract::{Multipart, Query, State};
use axum::Json;
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::info;

use crate::errors::AppError;
use crate::session::Authenticated;
use crate::state::AppState;

const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Upload preconditions, chosen by the caller per file kind.
#[derive(Debug, Clone, Copy)]
pub struct UploadLimits {
    pub max_bytes: usize,
    pub allowed_types: &'static [&'static str],
}

/// Certificate documents: PDF only, 10 MB ceiling.
pub const CERTIFICATE_FILE_LIMITS: UploadLimits = UploadLimits {
    max_bytes: 10 * 1024 * 1024,
    allowed_types: &["application/pdf"],
};

/// Preview images: any image type, 5 MB ceiling.
pub const PREVIEW_IMAGE_LIMITS: UploadLimits = UploadLimits {
    max_bytes: 5 * 1024 * 1024,
    allowed_types: &["image/*"],
};

/// Request body ceiling for the upload route: the largest allowed file plus
/// multipart framing overhead. Axum's 2 MB default would turn away valid
/// certificate PDFs before `validate_file` could rule on them.
pub const UPLOAD_BODY_LIMIT: usize = 12 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum MediaError {
    /// Client-side precondition failure. Raised before any network call.
    #[error("{0}")]
    Rejected(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("media manager returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("media manager response did not contain a file URL")]
    MissingUrl,
}

/// Descriptor returned by the media manager, used thereafter as the stored
/// file reference.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResult {
    pub url: String,
    pub file_name: String,
    pub file_size: usize,
    pub mime_type: String,
}

/// Validates a file against the caller-chosen limits.
/// Allow-list entries may use a `type/*` wildcard (e.g. `image/*`).
pub fn validate_file(mime_type: &str, size: usize, limits: &UploadLimits) -> Result<(), MediaError> {
    if size > limits.max_bytes {
        return Err(MediaError::Rejected(format!(
            "File size must be less than {}MB",
            limits.max_bytes / (1024 * 1024)
        )));
    }

    if !limits.allowed_types.iter().any(|t| mime_matches(mime_type, t)) {
        return Err(MediaError::Rejected(format!(
            "File type not allowed. Allowed types: {}",
            limits.allowed_types.join(", ")
        )));
    }

    Ok(())
}

fn mime_matches(mime_type: &str, allowed: &str) -> bool {
    match allowed.strip_suffix("/*") {
        Some(prefix) => mime_type
            .split('/')
            .next()
            .is_some_and(|p| p == prefix),
        None => mime_type == allowed,
    }
}

/// Object-safe upload surface, carried in `AppState` as `Arc<dyn MediaStore>`.
#[async_trait]
pub trait MediaStore: Send + Sync {
    async fn upload(
        &self,
        file_name: &str,
        mime_type: &str,
        content: &[u8],
    ) -> Result<UploadResult, MediaError>;
}

/// HTTP implementation posting `{ file: { content, name }, mimeType }` to the
/// media manager's upload endpoint.
pub struct HttpMediaStore {
    client: Client,
    upload_url: String,
    token: String,
}

impl HttpMediaStore {
    pub fn new(upload_url: String, token: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            upload_url,
            token,
        }
    }
}

#[async_trait]
impl MediaStore for HttpMediaStore {
    async fn upload(
        &self,
        file_name: &str,
        mime_type: &str,
        content: &[u8],
    ) -> Result<UploadResult, MediaError> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(content);
        let body = json!({
            "file": {
                "content": encoded,
                "name": file_name,
            },
            "mimeType": mime_type,
        });

        let response = self
            .client
            .post(&self.upload_url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(MediaError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let data: Value = response.json().await?;
        // Deployed media managers differ on where the URL lives.
        let url = data
            .pointer("/file/url")
            .or_else(|| data.get("url"))
            .or_else(|| data.get("fileUrl"))
            .and_then(Value::as_str)
            .ok_or(MediaError::MissingUrl)?
            .to_string();

        Ok(UploadResult {
            url,
            file_name: file_name.to_string(),
            file_size: content.len(),
            mime_type: mime_type.to_string(),
        })
    }
}

/// Which allow-list and ceiling apply to an upload.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Certificate,
    Preview,
}

impl MediaKind {
    pub fn limits(self) -> UploadLimits {
        match self {
            MediaKind::Certificate => CERTIFICATE_FILE_LIMITS,
            MediaKind::Preview => PREVIEW_IMAGE_LIMITS,
        }
    }
}

#[derive(Deserialize)]
pub struct UploadQuery {
    pub kind: MediaKind,
}

/// Validates then uploads. The precondition check runs before the store is
/// touched, so a rejected file never produces a network call.
pub async fn process_upload(
    media: &dyn MediaStore,
    kind: MediaKind,
    file_name: &str,
    mime_type: &str,
    content: &[u8],
) -> Result<UploadResult, MediaError> {
    validate_file(mime_type, content.len(), &kind.limits())?;
    let result = media.upload(file_name, mime_type, content).await?;
    info!(
        "uploaded {} ({} bytes) as {}",
        result.file_name, result.file_size, result.url
    );
    Ok(result)
}

/// POST /api/v1/media?kind=certificate|preview
/// Accepts one multipart file field and returns the stored file descriptor.
pub async fn handle_upload(
    State(state): State<AppState>,
    _session: Authenticated,
    Query(query): Query<UploadQuery>,
    mut multipart: Multipart,
) -> Result<Json<UploadResult>, AppError> {
    let field = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
        .ok_or_else(|| AppError::Validation("No file provided".to_string()))?;

    let file_name = field.file_name().unwrap_or("upload").to_string();
    let mime_type = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();
    let content = field
        .bytes()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read file: {e}")))?;

    let result =
        process_upload(&*state.media, query.kind, &file_name, &mime_type, &content).await?;
    Ok(Json(result))
}
