use std::sync::Arc;

use tracing::{info, instrument};

use crate::application::media::{discard_best_effort, upload_failed};
use crate::data::blog_repository::{BlogPageQuery, BlogRepository, NewBlog};
use crate::data::media_store::{IMAGE_RESOURCE_TYPE, MediaStore};
use crate::domain::blog::{
    Blog, CreateBlogRequest, UpdateBlogRequest, UploadedImage, normalize_category,
};
use crate::domain::error::DomainError;
use crate::domain::id::RecordId;
use crate::domain::media::{IMAGE_EXTENSIONS, MediaUpload};

pub(crate) const DEFAULT_PAGE: u32 = 1;
pub(crate) const DEFAULT_LIMIT: u32 = 10;
pub(crate) const MAX_LIMIT: u32 = 100;

#[derive(Debug, Clone)]
pub(crate) struct ListBlogsResult {
    pub(crate) blogs: Vec<Blog>,
    pub(crate) total: i64,
    pub(crate) page: u32,
    pub(crate) limit: u32,
    pub(crate) total_pages: i64,
}

pub(crate) struct BlogService {
    repo: Arc<dyn BlogRepository>,
    media: Arc<dyn MediaStore>,
    max_upload_bytes: usize,
}

impl BlogService {
    pub(crate) fn new(
        repo: Arc<dyn BlogRepository>,
        media: Arc<dyn MediaStore>,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            repo,
            media,
            max_upload_bytes,
        }
    }

    #[instrument(skip_all)]
    pub(crate) async fn create_blog(
        &self,
        req: CreateBlogRequest,
        image: Option<MediaUpload>,
    ) -> Result<Blog, DomainError> {
        let image = self.validate_image(image)?;
        let draft = req.validate()?;

        if self.repo.find_by_title(&draft.title, None).await?.is_some() {
            return Err(DomainError::Conflict(
                "blog with this title already exists".to_string(),
            ));
        }

        let uploaded = self.upload_image(image).await?;
        let content = draft.into_content(uploaded.clone());
        let created = self
            .repo
            .create_blog(NewBlog {
                id: RecordId::generate(),
                content,
            })
            .await;

        match created {
            Ok(blog) => {
                info!(blog_id = %blog.id, "blog created");
                Ok(blog)
            }
            Err(err) => {
                self.discard_upload(uploaded).await;
                Err(err)
            }
        }
    }

    /// Reads a blog and counts the read.
    pub(crate) async fn get_blog(&self, id: &RecordId) -> Result<Blog, DomainError> {
        self.repo
            .record_view(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("blog id: {id}")))
    }

    #[instrument(skip_all, fields(blog_id = %id))]
    pub(crate) async fn update_blog(
        &self,
        id: &RecordId,
        req: UpdateBlogRequest,
        image: Option<MediaUpload>,
    ) -> Result<Blog, DomainError> {
        let image = self.validate_image(image)?;
        let patch = req.validate()?;

        let current = self
            .repo
            .get_blog(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("blog id: {id}")))?;

        if let Some(title) = patch.title.as_deref()
            && title != current.title
            && self.repo.find_by_title(title, Some(id)).await?.is_some()
        {
            return Err(DomainError::Conflict(
                "blog with this title already exists".to_string(),
            ));
        }

        let uploaded = self.upload_image(image).await?;
        let content = patch.apply_to(&current, uploaded.clone());
        let orphaned = current.orphaned_image(&content);

        let updated = match self.repo.update_blog(id, content).await {
            Ok(Some(blog)) => blog,
            Ok(None) => {
                self.discard_upload(uploaded).await;
                return Err(DomainError::NotFound(format!("blog id: {id}")));
            }
            Err(err) => {
                self.discard_upload(uploaded).await;
                return Err(err);
            }
        };

        if let Some(storage_id) = orphaned {
            discard_best_effort(self.media.as_ref(), &storage_id, IMAGE_RESOURCE_TYPE).await;
        }

        info!("blog updated");
        Ok(updated)
    }

    #[instrument(skip_all, fields(blog_id = %id))]
    pub(crate) async fn delete_blog(&self, id: &RecordId) -> Result<Blog, DomainError> {
        let current = self
            .repo
            .get_blog(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("blog id: {id}")))?;

        if let Some(storage_id) = current.img_storage_id.as_deref() {
            discard_best_effort(self.media.as_ref(), storage_id, IMAGE_RESOURCE_TYPE).await;
        }

        if !self.repo.delete_blog(id).await? {
            return Err(DomainError::NotFound(format!("blog id: {id}")));
        }

        info!("blog deleted");
        Ok(current)
    }

    /// `page` and `limit` are taken as already parsed; zero falls back to the
    /// defaults and `limit` is capped at [`MAX_LIMIT`].
    pub(crate) async fn list_blogs(
        &self,
        page: u32,
        limit: u32,
        category: Option<&str>,
    ) -> Result<ListBlogsResult, DomainError> {
        let page = if page == 0 { DEFAULT_PAGE } else { page };
        let limit = match limit {
            0 => DEFAULT_LIMIT,
            limit => limit.min(MAX_LIMIT),
        };
        let query = BlogPageQuery {
            page,
            limit,
            category: category.and_then(normalize_category),
        };

        let result = self.repo.page_blogs(&query).await?;
        let limit_i64 = i64::from(limit);
        let total_pages = (result.total + limit_i64 - 1) / limit_i64;

        Ok(ListBlogsResult {
            blogs: result.blogs,
            total: result.total,
            page,
            limit,
            total_pages,
        })
    }

    fn validate_image(&self, image: Option<MediaUpload>) -> Result<Option<MediaUpload>, DomainError> {
        image
            .map(|upload| upload.validate("image", IMAGE_EXTENSIONS, self.max_upload_bytes))
            .transpose()
            .map_err(|violation| DomainError::Validation(vec![violation]))
    }

    async fn upload_image(
        &self,
        image: Option<MediaUpload>,
    ) -> Result<Option<UploadedImage>, DomainError> {
        let Some(image) = image else {
            return Ok(None);
        };
        let stored = self.media.upload(image).await.map_err(upload_failed)?;
        Ok(Some(UploadedImage {
            url: stored.url,
            storage_id: stored.storage_id,
        }))
    }

    async fn discard_upload(&self, uploaded: Option<UploadedImage>) {
        if let Some(image) = uploaded {
            discard_best_effort(self.media.as_ref(), &image.storage_id, IMAGE_RESOURCE_TYPE).await;
        }
    }
}
