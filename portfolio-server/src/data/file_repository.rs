use async_trait::async_trait;

use crate::domain::error::DomainError;
use crate::domain::file::StoredFile;
use crate::domain::id::RecordId;

#[derive(Debug, Clone)]
pub(crate) struct NewFile {
    pub(crate) id: RecordId,
    pub(crate) filename: String,
    pub(crate) url: String,
    pub(crate) external_storage_id: String,
    pub(crate) resource_type: String,
    pub(crate) title: Option<String>,
    pub(crate) description: Option<String>,
}

#[async_trait]
pub(crate) trait FileRepository: Send + Sync {
    async fn create_file(&self, input: NewFile) -> Result<StoredFile, DomainError>;
    async fn get_file(&self, id: &RecordId) -> Result<Option<StoredFile>, DomainError>;
    async fn list_files(&self) -> Result<Vec<StoredFile>, DomainError>;
    async fn delete_file(&self, id: &RecordId) -> Result<bool, DomainError>;
}
