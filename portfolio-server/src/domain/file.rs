use chrono::{DateTime, Utc};

use super::error::{DomainError, FieldViolation, Violations};
use super::id::RecordId;
use super::media::{FILE_EXTENSIONS, MediaUpload};

pub(crate) const FILE_TITLE_MAX_LEN: usize = 200;
pub(crate) const FILE_DESCRIPTION_MAX_LEN: usize = 2000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StoredFile {
    pub(crate) id: RecordId,
    pub(crate) filename: String,
    pub(crate) url: String,
    pub(crate) external_storage_id: String,
    pub(crate) resource_type: String,
    pub(crate) title: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct UploadFileRequest {
    pub(crate) upload: Option<MediaUpload>,
    pub(crate) title: Option<String>,
    pub(crate) description: Option<String>,
}

#[derive(Debug, Clone)]
pub(crate) struct FileDraft {
    pub(crate) upload: MediaUpload,
    pub(crate) title: Option<String>,
    pub(crate) description: Option<String>,
}

impl UploadFileRequest {
    pub(crate) fn validate(self, max_bytes: usize) -> Result<FileDraft, DomainError> {
        let mut violations = Violations::new();

        let upload = match self.upload {
            Some(upload) => violations.check(upload.validate("file", FILE_EXTENSIONS, max_bytes)),
            None => {
                violations.push("file", "no file uploaded");
                None
            }
        };
        let title = violations
            .check(optional_text("title", self.title, FILE_TITLE_MAX_LEN))
            .flatten();
        let description = violations
            .check(optional_text(
                "description",
                self.description,
                FILE_DESCRIPTION_MAX_LEN,
            ))
            .flatten();
        violations.into_result()?;

        match upload {
            Some(upload) => Ok(FileDraft {
                upload,
                title,
                description,
            }),
            None => Err(DomainError::validation("file", "no file uploaded")),
        }
    }
}

fn optional_text(
    field: &'static str,
    value: Option<String>,
    max_len: usize,
) -> Result<Option<String>, FieldViolation> {
    let Some(value) = value else {
        return Ok(None);
    };
    let value = value.trim();
    if value.chars().count() > max_len {
        return Err(FieldViolation::new(
            field,
            format!("cannot exceed {max_len} characters"),
        ));
    }
    Ok((!value.is_empty()).then(|| value.to_string()))
}
