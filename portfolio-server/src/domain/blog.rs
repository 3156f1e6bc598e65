use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::{DomainError, FieldViolation, Violations};
use super::id::RecordId;

pub(crate) const TITLE_MIN_LEN: usize = 5;
pub(crate) const TITLE_MAX_LEN: usize = 200;
pub(crate) const SHORT_DESCRIPTION_MAX_LEN: usize = 150;
pub(crate) const IMG_MAX_LEN: usize = 2048;
pub(crate) const MAX_VIEWS: i32 = 1_000_000;
pub(crate) const DEFAULT_IMG: &str = "default-image.jpg";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Blog {
    pub(crate) id: RecordId,
    pub(crate) title: String,
    pub(crate) img: String,
    /// Media store id of an uploaded image; `None` for external URLs.
    pub(crate) img_storage_id: Option<String>,
    pub(crate) category: Option<String>,
    pub(crate) description: String,
    pub(crate) short_description: Option<String>,
    pub(crate) views: i32,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

/// Everything about a blog that a mutation writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BlogContent {
    pub(crate) title: String,
    pub(crate) img: String,
    pub(crate) img_storage_id: Option<String>,
    pub(crate) category: Option<String>,
    pub(crate) description: String,
    pub(crate) short_description: Option<String>,
}

/// An image that already lives in the media store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct UploadedImage {
    pub(crate) url: String,
    pub(crate) storage_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct CreateBlogRequest {
    pub(crate) title: Option<String>,
    pub(crate) img: Option<String>,
    pub(crate) category: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) short_description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BlogDraft {
    pub(crate) title: String,
    pub(crate) img: Option<String>,
    pub(crate) category: Option<String>,
    pub(crate) description: String,
    pub(crate) short_description: Option<String>,
}

impl CreateBlogRequest {
    pub(crate) fn validate(self) -> Result<BlogDraft, DomainError> {
        let mut violations = Violations::new();

        let title = match self.title.as_deref() {
            Some(raw) => violations.check(normalize_title(raw)),
            None => {
                violations.push("title", "is required");
                None
            }
        };
        let description = match self.description.as_deref() {
            Some(raw) => violations.check(normalize_description(raw)),
            None => {
                violations.push("description", "is required");
                None
            }
        };
        let img = match self.img.as_deref() {
            Some(raw) => violations.check(normalize_img(raw)).flatten(),
            None => None,
        };
        let short_description = match self.short_description.as_deref() {
            Some(raw) => violations.check(normalize_short_description(raw)).flatten(),
            None => None,
        };
        let category = self.category.as_deref().and_then(normalize_category);
        violations.into_result()?;

        Ok(BlogDraft {
            title: title.unwrap_or_default(),
            img,
            category,
            description: description.unwrap_or_default(),
            short_description,
        })
    }
}

impl BlogDraft {
    pub(crate) fn into_content(self, uploaded: Option<UploadedImage>) -> BlogContent {
        let (img, img_storage_id) = match uploaded {
            Some(image) => (image.url, Some(image.storage_id)),
            None => (self.img.unwrap_or_else(|| DEFAULT_IMG.to_string()), None),
        };

        BlogContent {
            title: self.title,
            img,
            img_storage_id,
            category: self.category,
            description: self.description,
            short_description: self.short_description,
        }
    }
}

/// Partial update; omitted fields keep their stored values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct UpdateBlogRequest {
    pub(crate) title: Option<String>,
    pub(crate) img: Option<String>,
    pub(crate) category: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) short_description: Option<String>,
}

/// Validated update. Inner `None` on an optional field clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct BlogPatch {
    pub(crate) title: Option<String>,
    pub(crate) img: Option<String>,
    pub(crate) category: Option<Option<String>>,
    pub(crate) description: Option<String>,
    pub(crate) short_description: Option<Option<String>>,
}

impl UpdateBlogRequest {
    pub(crate) fn validate(self) -> Result<BlogPatch, DomainError> {
        let mut violations = Violations::new();

        let title = match self.title.as_deref() {
            Some(raw) => violations.check(normalize_title(raw)),
            None => None,
        };
        let description = match self.description.as_deref() {
            Some(raw) => violations.check(normalize_description(raw)),
            None => None,
        };
        let img = match self.img.as_deref() {
            Some(raw) => violations.check(normalize_img(raw)).flatten(),
            None => None,
        };
        let short_description = match self.short_description.as_deref() {
            Some(raw) => violations.check(normalize_short_description(raw)),
            None => None,
        };
        let category = self.category.as_deref().map(normalize_category);
        violations.into_result()?;

        Ok(BlogPatch {
            title,
            img,
            category,
            description,
            short_description,
        })
    }
}

impl BlogPatch {
    pub(crate) fn apply_to(self, blog: &Blog, uploaded: Option<UploadedImage>) -> BlogContent {
        let (img, img_storage_id) = match (uploaded, self.img) {
            (Some(image), _) => (image.url, Some(image.storage_id)),
            (None, Some(url)) => (url, None),
            (None, None) => (blog.img.clone(), blog.img_storage_id.clone()),
        };

        BlogContent {
            title: self.title.unwrap_or_else(|| blog.title.clone()),
            img,
            img_storage_id,
            category: self.category.unwrap_or_else(|| blog.category.clone()),
            description: self.description.unwrap_or_else(|| blog.description.clone()),
            short_description: self
                .short_description
                .unwrap_or_else(|| blog.short_description.clone()),
        }
    }
}

impl Blog {
    pub(crate) fn new(
        id: RecordId,
        content: BlogContent,
        views: i32,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let mut violations = Violations::new();
        violations.check(normalize_title(&content.title));
        violations.check(normalize_description(&content.description));
        if !(0..=MAX_VIEWS).contains(&views) {
            violations.push("views", format!("must be 0..={MAX_VIEWS}"));
        }
        if updated_at < created_at {
            violations.push("updated_at", "must be >= created_at");
        }
        violations.into_result()?;

        Ok(Self {
            id,
            title: content.title,
            img: content.img,
            img_storage_id: content.img_storage_id,
            category: content.category,
            description: content.description,
            short_description: content.short_description,
            views,
            created_at,
            updated_at,
        })
    }

    /// The media object that stops being referenced once `next` is written.
    pub(crate) fn orphaned_image(&self, next: &BlogContent) -> Option<String> {
        match &self.img_storage_id {
            Some(current) if next.img_storage_id.as_ref() != Some(current) => {
                Some(current.clone())
            }
            _ => None,
        }
    }
}

pub(crate) fn normalize_category(category: &str) -> Option<String> {
    let category = category.trim().to_lowercase();
    if category.is_empty() {
        None
    } else {
        Some(category)
    }
}

fn normalize_title(title: &str) -> Result<String, FieldViolation> {
    let title = title.trim();
    let len = title.chars().count();
    if !(TITLE_MIN_LEN..=TITLE_MAX_LEN).contains(&len) {
        return Err(FieldViolation::new(
            "title",
            format!("must be {TITLE_MIN_LEN}..{TITLE_MAX_LEN} chars"),
        ));
    }
    Ok(title.to_string())
}

fn normalize_description(description: &str) -> Result<String, FieldViolation> {
    let description = description.trim();
    if description.is_empty() {
        return Err(FieldViolation::new("description", "is required"));
    }
    Ok(description.to_string())
}

fn normalize_short_description(raw: &str) -> Result<Option<String>, FieldViolation> {
    let value = raw.trim();
    if value.chars().count() > SHORT_DESCRIPTION_MAX_LEN {
        return Err(FieldViolation::new(
            "short_description",
            format!("cannot exceed {SHORT_DESCRIPTION_MAX_LEN} characters"),
        ));
    }
    Ok((!value.is_empty()).then(|| value.to_string()))
}

fn normalize_img(raw: &str) -> Result<Option<String>, FieldViolation> {
    let value = raw.trim();
    if value.len() > IMG_MAX_LEN {
        return Err(FieldViolation::new(
            "img",
            format!("cannot exceed {IMG_MAX_LEN} characters"),
        ));
    }
    Ok((!value.is_empty()).then(|| value.to_string()))
}
