use std::path::Path;

use super::error::FieldViolation;

/// Extensions accepted by the generic file upload endpoint.
pub(crate) const FILE_EXTENSIONS: &[&str] =
    &["jpg", "jpeg", "png", "gif", "webp", "svg", "pdf", "mp4"];

/// Extensions accepted as a blog cover image.
pub(crate) const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "svg"];

pub(crate) const FILENAME_MAX_LEN: usize = 255;

/// Raw bytes received from a client, not yet sent to the media store.
#[derive(Clone, PartialEq, Eq)]
pub(crate) struct MediaUpload {
    pub(crate) filename: String,
    pub(crate) content_type: Option<String>,
    pub(crate) bytes: Vec<u8>,
}

impl std::fmt::Debug for MediaUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaUpload")
            .field("filename", &self.filename)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl MediaUpload {
    pub(crate) fn validate(
        self,
        field: &'static str,
        allowed_extensions: &[&str],
        max_bytes: usize,
    ) -> Result<Self, FieldViolation> {
        let filename = self.filename.trim();
        if filename.is_empty() || filename.chars().count() > FILENAME_MAX_LEN {
            return Err(FieldViolation::new(
                field,
                format!("filename must be 1..{FILENAME_MAX_LEN} chars"),
            ));
        }

        let extension = extension_of(filename).unwrap_or_default();
        if !allowed_extensions.contains(&extension.as_str()) {
            return Err(FieldViolation::new(
                field,
                format!("file type must be one of: {}", allowed_extensions.join(", ")),
            ));
        }

        if self.bytes.is_empty() {
            return Err(FieldViolation::new(field, "file must not be empty"));
        }
        if self.bytes.len() > max_bytes {
            return Err(FieldViolation::new(
                field,
                format!("file exceeds the {max_bytes} byte limit"),
            ));
        }

        Ok(Self {
            filename: filename.to_string(),
            content_type: self.content_type,
            bytes: self.bytes,
        })
    }
}

fn extension_of(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
}
