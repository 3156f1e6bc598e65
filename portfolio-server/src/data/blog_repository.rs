use async_trait::async_trait;

use crate::domain::blog::{Blog, BlogContent};
use crate::domain::error::DomainError;
use crate::domain::id::RecordId;

#[derive(Debug, Clone)]
pub(crate) struct NewBlog {
    pub(crate) id: RecordId,
    pub(crate) content: BlogContent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BlogPageQuery {
    pub(crate) page: u32,
    pub(crate) limit: u32,
    pub(crate) category: Option<String>,
}

impl BlogPageQuery {
    pub(crate) fn offset(&self) -> i64 {
        i64::from(self.page.saturating_sub(1)) * i64::from(self.limit)
    }
}

/// One page of blogs plus the number of blogs matching the filter, read from
/// the same snapshot.
#[derive(Debug, Clone)]
pub(crate) struct BlogPage {
    pub(crate) total: i64,
    pub(crate) blogs: Vec<Blog>,
}

#[async_trait]
pub(crate) trait BlogRepository: Send + Sync {
    async fn create_blog(&self, input: NewBlog) -> Result<Blog, DomainError>;
    async fn get_blog(&self, id: &RecordId) -> Result<Option<Blog>, DomainError>;
    /// Increments `views` (saturating) and returns the updated blog.
    async fn record_view(&self, id: &RecordId) -> Result<Option<Blog>, DomainError>;
    async fn find_by_title(
        &self,
        title: &str,
        exclude: Option<&RecordId>,
    ) -> Result<Option<Blog>, DomainError>;
    async fn update_blog(
        &self,
        id: &RecordId,
        content: BlogContent,
    ) -> Result<Option<Blog>, DomainError>;
    async fn delete_blog(&self, id: &RecordId) -> Result<bool, DomainError>;
    async fn page_blogs(&self, query: &BlogPageQuery) -> Result<BlogPage, DomainError>;
}
