use std::sync::Arc;

use tracing::{info, instrument};

use crate::application::media::{discard_best_effort, upload_failed};
use crate::data::file_repository::{FileRepository, NewFile};
use crate::data::media_store::MediaStore;
use crate::domain::error::DomainError;
use crate::domain::file::{StoredFile, UploadFileRequest};
use crate::domain::id::RecordId;

pub(crate) struct FileService {
    repo: Arc<dyn FileRepository>,
    media: Arc<dyn MediaStore>,
    max_upload_bytes: usize,
}

impl FileService {
    pub(crate) fn new(
        repo: Arc<dyn FileRepository>,
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
    pub(crate) async fn upload_file(&self, req: UploadFileRequest) -> Result<StoredFile, DomainError> {
        let draft = req.validate(self.max_upload_bytes)?;
        let filename = draft.upload.filename.clone();

        let stored = self
            .media
            .upload(draft.upload)
            .await
            .map_err(upload_failed)?;

        let created = self
            .repo
            .create_file(NewFile {
                id: RecordId::generate(),
                filename,
                url: stored.url,
                external_storage_id: stored.storage_id.clone(),
                resource_type: stored.resource_type.clone(),
                title: draft.title,
                description: draft.description,
            })
            .await;

        match created {
            Ok(file) => {
                info!(file_id = %file.id, storage_id = %file.external_storage_id, "file uploaded");
                Ok(file)
            }
            Err(err) => {
                discard_best_effort(
                    self.media.as_ref(),
                    &stored.storage_id,
                    &stored.resource_type,
                )
                .await;
                Err(err)
            }
        }
    }

    pub(crate) async fn list_files(&self) -> Result<Vec<StoredFile>, DomainError> {
        self.repo.list_files().await
    }

    #[instrument(skip_all, fields(file_id = %id))]
    pub(crate) async fn delete_file(&self, id: &RecordId) -> Result<StoredFile, DomainError> {
        let file = self
            .repo
            .get_file(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("file id: {id}")))?;

        discard_best_effort(
            self.media.as_ref(),
            &file.external_storage_id,
            &file.resource_type,
        )
        .await;

        if !self.repo.delete_file(id).await? {
            return Err(DomainError::NotFound(format!("file id: {id}")));
        }

        info!("file deleted");
        Ok(file)
    }
}
