//! In-memory repositories and media store used by service and router tests.
//! They enforce the same unique constraints as the Postgres schema.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use crate::data::blog_repository::{BlogPage, BlogPageQuery, BlogRepository, NewBlog};
use crate::data::file_repository::{FileRepository, NewFile};
use crate::data::media_store::{MediaError, MediaStore, StoredMedia};
use crate::data::user_repository::{NewUser, UserChanges, UserCredentials, UserRepository};
use crate::domain::blog::{Blog, BlogContent, MAX_VIEWS};
use crate::domain::error::DomainError;
use crate::domain::file::StoredFile;
use crate::domain::id::RecordId;
use crate::domain::media::MediaUpload;
use crate::domain::user::User;

/// Strictly increasing timestamps so ordering by creation time is deterministic.
#[derive(Debug, Default)]
struct TestClock {
    ticks: i64,
}

impl TestClock {
    fn now(&mut self) -> DateTime<Utc> {
        self.ticks += 1;
        DateTime::<Utc>::UNIX_EPOCH + Duration::days(20_000) + Duration::seconds(self.ticks)
    }
}

#[derive(Clone, Default)]
pub(crate) struct InMemoryUserRepository {
    state: Arc<Mutex<(TestClock, Vec<UserCredentials>)>>,
}

impl InMemoryUserRepository {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn stored(&self) -> Vec<UserCredentials> {
        self.state.lock().expect("user state mutex poisoned").1.clone()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create_user(&self, input: NewUser) -> Result<User, DomainError> {
        let mut state = self.state.lock().expect("user state mutex poisoned");
        let (clock, users) = &mut *state;
        if users.iter().any(|c| c.user.username == input.username) {
            return Err(DomainError::Conflict(
                "user with this username already exists".to_string(),
            ));
        }
        if users.iter().any(|c| c.user.email == input.email) {
            return Err(DomainError::Conflict(
                "user with this email already exists".to_string(),
            ));
        }

        let now = clock.now();
        let user = User::new(input.id, input.username, input.email, now, now)?;
        users.push(UserCredentials {
            user: user.clone(),
            password_hash: input.password_hash,
        });
        Ok(user)
    }

    async fn find_by_id(&self, id: &RecordId) -> Result<Option<UserCredentials>, DomainError> {
        let state = self.state.lock().expect("user state mutex poisoned");
        Ok(state.1.iter().find(|c| &c.user.id == id).cloned())
    }

    async fn find_by_email(
        &self,
        email: &str,
        exclude: Option<&RecordId>,
    ) -> Result<Option<UserCredentials>, DomainError> {
        let state = self.state.lock().expect("user state mutex poisoned");
        Ok(state
            .1
            .iter()
            .find(|c| c.user.email == email && Some(&c.user.id) != exclude)
            .cloned())
    }

    async fn find_by_username(
        &self,
        username: &str,
        exclude: Option<&RecordId>,
    ) -> Result<Option<UserCredentials>, DomainError> {
        let state = self.state.lock().expect("user state mutex poisoned");
        Ok(state
            .1
            .iter()
            .find(|c| c.user.username == username && Some(&c.user.id) != exclude)
            .cloned())
    }

    async fn update_user(
        &self,
        id: &RecordId,
        changes: UserChanges,
    ) -> Result<Option<User>, DomainError> {
        let mut state = self.state.lock().expect("user state mutex poisoned");
        let (clock, users) = &mut *state;
        if users
            .iter()
            .any(|c| &c.user.id != id && c.user.email == changes.email)
        {
            return Err(DomainError::Conflict(
                "user with this email already exists".to_string(),
            ));
        }
        if users
            .iter()
            .any(|c| &c.user.id != id && c.user.username == changes.username)
        {
            return Err(DomainError::Conflict(
                "user with this username already exists".to_string(),
            ));
        }

        let now = clock.now();
        let Some(creds) = users.iter_mut().find(|c| &c.user.id == id) else {
            return Ok(None);
        };
        creds.user.username = changes.username;
        creds.user.email = changes.email;
        creds.user.updated_at = now;
        creds.password_hash = changes.password_hash;
        Ok(Some(creds.user.clone()))
    }

    async fn list_users(&self) -> Result<Vec<User>, DomainError> {
        let state = self.state.lock().expect("user state mutex poisoned");
        let mut users: Vec<User> = state.1.iter().map(|c| c.user.clone()).collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(users)
    }
}

#[derive(Clone, Default)]
pub(crate) struct InMemoryBlogRepository {
    state: Arc<Mutex<(TestClock, Vec<Blog>)>>,
}

impl InMemoryBlogRepository {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn set_views(&self, id: &RecordId, views: i32) {
        let mut state = self.state.lock().expect("blog state mutex poisoned");
        if let Some(blog) = state.1.iter_mut().find(|b| &b.id == id) {
            blog.views = views;
        }
    }
}

#[async_trait]
impl BlogRepository for InMemoryBlogRepository {
    async fn create_blog(&self, input: NewBlog) -> Result<Blog, DomainError> {
        let mut state = self.state.lock().expect("blog state mutex poisoned");
        let (clock, blogs) = &mut *state;
        if blogs.iter().any(|b| b.title == input.content.title) {
            return Err(DomainError::Conflict(
                "blog with this title already exists".to_string(),
            ));
        }
        let now = clock.now();
        let blog = Blog::new(input.id, input.content, 0, now, now)?;
        blogs.push(blog.clone());
        Ok(blog)
    }

    async fn get_blog(&self, id: &RecordId) -> Result<Option<Blog>, DomainError> {
        let state = self.state.lock().expect("blog state mutex poisoned");
        Ok(state.1.iter().find(|b| &b.id == id).cloned())
    }

    async fn record_view(&self, id: &RecordId) -> Result<Option<Blog>, DomainError> {
        let mut state = self.state.lock().expect("blog state mutex poisoned");
        Ok(state.1.iter_mut().find(|b| &b.id == id).map(|blog| {
            blog.views = (blog.views + 1).min(MAX_VIEWS);
            blog.clone()
        }))
    }

    async fn find_by_title(
        &self,
        title: &str,
        exclude: Option<&RecordId>,
    ) -> Result<Option<Blog>, DomainError> {
        let state = self.state.lock().expect("blog state mutex poisoned");
        Ok(state
            .1
            .iter()
            .find(|b| b.title == title && Some(&b.id) != exclude)
            .cloned())
    }

    async fn update_blog(
        &self,
        id: &RecordId,
        content: BlogContent,
    ) -> Result<Option<Blog>, DomainError> {
        let mut state = self.state.lock().expect("blog state mutex poisoned");
        let (clock, blogs) = &mut *state;
        if blogs.iter().any(|b| &b.id != id && b.title == content.title) {
            return Err(DomainError::Conflict(
                "blog with this title already exists".to_string(),
            ));
        }
        let now = clock.now();
        let Some(blog) = blogs.iter_mut().find(|b| &b.id == id) else {
            return Ok(None);
        };
        *blog = Blog::new(blog.id.clone(), content, blog.views, blog.created_at, now)?;
        Ok(Some(blog.clone()))
    }

    async fn delete_blog(&self, id: &RecordId) -> Result<bool, DomainError> {
        let mut state = self.state.lock().expect("blog state mutex poisoned");
        let before = state.1.len();
        state.1.retain(|b| &b.id != id);
        Ok(state.1.len() < before)
    }

    async fn page_blogs(&self, query: &BlogPageQuery) -> Result<BlogPage, DomainError> {
        let state = self.state.lock().expect("blog state mutex poisoned");
        let mut matching: Vec<Blog> = state
            .1
            .iter()
            .filter(|b| query.category.is_none() || b.category == query.category)
            .cloned()
            .collect();
        matching.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.as_str().cmp(a.id.as_str()))
        });

        let total = matching.len() as i64;
        let blogs = matching
            .into_iter()
            .skip(query.offset() as usize)
            .take(query.limit as usize)
            .collect();
        Ok(BlogPage { total, blogs })
    }
}

#[derive(Clone, Default)]
pub(crate) struct InMemoryFileRepository {
    state: Arc<Mutex<(TestClock, Vec<StoredFile>)>>,
}

impl InMemoryFileRepository {
    pub(crate) fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FileRepository for InMemoryFileRepository {
    async fn create_file(&self, input: NewFile) -> Result<StoredFile, DomainError> {
        let mut state = self.state.lock().expect("file state mutex poisoned");
        let (clock, files) = &mut *state;
        let now = clock.now();
        let file = StoredFile {
            id: input.id,
            filename: input.filename,
            url: input.url,
            external_storage_id: input.external_storage_id,
            resource_type: input.resource_type,
            title: input.title,
            description: input.description,
            created_at: now,
            updated_at: now,
        };
        files.push(file.clone());
        Ok(file)
    }

    async fn get_file(&self, id: &RecordId) -> Result<Option<StoredFile>, DomainError> {
        let state = self.state.lock().expect("file state mutex poisoned");
        Ok(state.1.iter().find(|f| &f.id == id).cloned())
    }

    async fn list_files(&self) -> Result<Vec<StoredFile>, DomainError> {
        let state = self.state.lock().expect("file state mutex poisoned");
        let mut files = state.1.clone();
        files.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(files)
    }

    async fn delete_file(&self, id: &RecordId) -> Result<bool, DomainError> {
        let mut state = self.state.lock().expect("file state mutex poisoned");
        let before = state.1.len();
        state.1.retain(|f| &f.id != id);
        Ok(state.1.len() < before)
    }
}

/// Media store fake that records every call and can be told to fail.
#[derive(Clone, Default)]
pub(crate) struct RecordingMediaStore {
    uploads: Arc<Mutex<Vec<MediaUpload>>>,
    destroyed: Arc<Mutex<Vec<(String, String)>>>,
    fail_uploads: Arc<Mutex<bool>>,
    fail_destroys: Arc<Mutex<bool>>,
}

impl RecordingMediaStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn fail_uploads(&self) {
        *self.fail_uploads.lock().expect("fail_uploads mutex poisoned") = true;
    }

    pub(crate) fn fail_destroys(&self) {
        *self.fail_destroys.lock().expect("fail_destroys mutex poisoned") = true;
    }

    pub(crate) fn uploads(&self) -> Vec<MediaUpload> {
        self.uploads.lock().expect("uploads mutex poisoned").clone()
    }

    pub(crate) fn destroyed(&self) -> Vec<(String, String)> {
        self.destroyed.lock().expect("destroyed mutex poisoned").clone()
    }
}

#[async_trait]
impl MediaStore for RecordingMediaStore {
    async fn upload(&self, upload: MediaUpload) -> Result<StoredMedia, MediaError> {
        if *self.fail_uploads.lock().expect("fail_uploads mutex poisoned") {
            return Err(MediaError::Transport("connection refused".to_string()));
        }
        let mut uploads = self.uploads.lock().expect("uploads mutex poisoned");
        let storage_id = format!("portfolio-uploads/{}-{}", uploads.len(), upload.filename);
        let resource_type = if upload.filename.ends_with(".pdf") {
            "raw"
        } else {
            "image"
        };
        let stored = StoredMedia {
            url: format!("https://media.example.com/{storage_id}"),
            storage_id,
            resource_type: resource_type.to_string(),
        };
        uploads.push(upload);
        Ok(stored)
    }

    async fn destroy(&self, storage_id: &str, resource_type: &str) -> Result<(), MediaError> {
        self.destroyed
            .lock()
            .expect("destroyed mutex poisoned")
            .push((storage_id.to_string(), resource_type.to_string()));
        if *self.fail_destroys.lock().expect("fail_destroys mutex poisoned") {
            return Err(MediaError::Rejected {
                status: 500,
                message: "storage unavailable".to_string(),
            });
        }
        Ok(())
    }
}
