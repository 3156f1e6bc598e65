use async_trait::async_trait;
use chrono::Utc;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha1::Sha1;
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::data::media_store::{MediaError, MediaStore, StoredMedia};
use crate::domain::media::MediaUpload;
use crate::infrastructure::settings::{MediaSettings, SignatureAlgorithm};

/// Media store backed by the Cloudinary upload API.
///
/// Requests are signed over the sorted parameters followed by the API secret,
/// using the digest configured in `MediaSettings::signature_algorithm` (SHA-1
/// unless the product environment was switched to SHA-256).
pub(crate) struct CloudinaryMediaStore {
    http: reqwest::Client,
    settings: MediaSettings,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    public_id: String,
    secure_url: String,
    resource_type: String,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

impl CloudinaryMediaStore {
    pub(crate) fn new(settings: MediaSettings) -> Self {
        Self {
            http: reqwest::Client::new(),
            settings,
        }
    }

    fn endpoint(&self, resource_type: &str, action: &str) -> String {
        format!(
            "{}/{}/{}/{}",
            self.settings.api_base_url, self.settings.cloud_name, resource_type, action
        )
    }

    async fn send(&self, url: String, form: Form) -> Result<reqwest::Response, MediaError> {
        let response = self
            .http
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|err| MediaError::Transport(err.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = match response.json::<ErrorResponse>().await {
            Ok(body) => body.error.message,
            Err(_) => status.canonical_reason().unwrap_or("unknown error").to_string(),
        };
        Err(MediaError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl MediaStore for CloudinaryMediaStore {
    async fn upload(&self, upload: MediaUpload) -> Result<StoredMedia, MediaError> {
        let timestamp = Utc::now().timestamp().to_string();
        let signature = sign_params(
            &[
                ("folder", self.settings.folder.as_str()),
                ("timestamp", timestamp.as_str()),
            ],
            &self.settings.api_secret,
            self.settings.signature_algorithm,
        );

        let mut file = Part::bytes(upload.bytes).file_name(upload.filename.clone());
        if let Some(content_type) = upload.content_type.as_deref() {
            file = file
                .mime_str(content_type)
                .map_err(|err| MediaError::Transport(err.to_string()))?;
        }

        let form = Form::new()
            .part("file", file)
            .text("api_key", self.settings.api_key.clone())
            .text("timestamp", timestamp)
            .text("folder", self.settings.folder.clone())
            .text("signature", signature);

        let response = self.send(self.endpoint("auto", "upload"), form).await?;
        let body: UploadResponse = response
            .json()
            .await
            .map_err(|err| MediaError::InvalidResponse(err.to_string()))?;

        info!(
            storage_id = %body.public_id,
            resource_type = %body.resource_type,
            filename = %upload.filename,
            "media uploaded"
        );
        Ok(StoredMedia {
            storage_id: body.public_id,
            url: body.secure_url,
            resource_type: body.resource_type,
        })
    }

    async fn destroy(&self, storage_id: &str, resource_type: &str) -> Result<(), MediaError> {
        let timestamp = Utc::now().timestamp().to_string();
        let signature = sign_params(
            &[("public_id", storage_id), ("timestamp", timestamp.as_str())],
            &self.settings.api_secret,
            self.settings.signature_algorithm,
        );

        let form = Form::new()
            .text("public_id", storage_id.to_string())
            .text("api_key", self.settings.api_key.clone())
            .text("timestamp", timestamp)
            .text("signature", signature);

        let response = self.send(self.endpoint(resource_type, "destroy"), form).await?;
        let body: DestroyResponse = response
            .json()
            .await
            .map_err(|err| MediaError::InvalidResponse(err.to_string()))?;

        match body.result.as_str() {
            "ok" => {
                info!(%storage_id, %resource_type, "media destroyed");
                Ok(())
            }
            "not found" => {
                debug!(%storage_id, %resource_type, "media already gone");
                Ok(())
            }
            other => Err(MediaError::InvalidResponse(format!(
                "unexpected destroy result: {other}"
            ))),
        }
    }
}

/// Cloudinary request signature: `k1=v1&k2=v2` sorted by key, secret appended,
/// digested, lowercase hex.
fn sign_params(
    params: &[(&str, &str)],
    api_secret: &str,
    algorithm: SignatureAlgorithm,
) -> String {
    let mut sorted = params.to_vec();
    sorted.sort_by(|a, b| a.0.cmp(b.0));
    let payload = sorted
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&");

    match algorithm {
        SignatureAlgorithm::Sha1 => hex_digest::<Sha1>(&payload, api_secret),
        SignatureAlgorithm::Sha256 => hex_digest::<Sha256>(&payload, api_secret),
    }
}

fn hex_digest<D: Digest>(payload: &str, api_secret: &str) -> String {
    let mut hasher = D::new();
    hasher.update(payload.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}
