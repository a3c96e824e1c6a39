use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

use crate::store::files::{FileError, FileStore};
use crate::store::properties::{NewProperty, Property, PropertyPatch, PropertyStore, StoreError};

/// Errors surfaced by listing orchestration.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("invalid upload: {0}")]
    InvalidUpload(#[source] FileError),

    #[error("property {0} not found")]
    NotFound(Uuid),

    #[error("storage failure")]
    StorageFailure(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => Self::NotFound(id),
            other => Self::StorageFailure(Box::new(other)),
        }
    }
}

impl ServiceError {
    /// Classify a file-store failure during upload: client mistakes are
    /// InvalidUpload, everything else is a storage problem.
    fn from_upload(err: FileError) -> Self {
        match err {
            FileError::TooLarge { .. } | FileError::WrongType => Self::InvalidUpload(err),
            other => Self::StorageFailure(Box::new(other)),
        }
    }
}

/// Orchestrates property records together with their image files, keeping the
/// invariant that a record's image reference points at a stored file.
#[derive(Debug, Clone)]
pub struct ListingService {
    properties: PropertyStore,
    files: FileStore,
}

impl ListingService {
    pub fn new(properties: PropertyStore, files: FileStore) -> Self {
        Self { properties, files }
    }

    pub fn files(&self) -> &FileStore {
        &self.files
    }

    pub async fn list_properties(&self) -> Result<Vec<Property>, ServiceError> {
        Ok(self.properties.list().await?)
    }

    /// Persist the uploaded image, then the record referencing it. If the
    /// record cannot be saved, the just-written file is removed again so no
    /// orphan is left behind.
    pub async fn create_listing(
        &self,
        image: &[u8],
        original_name: &str,
        mut fields: NewProperty,
    ) -> Result<Property, ServiceError> {
        let key = self
            .files
            .save(image, original_name)
            .await
            .map_err(ServiceError::from_upload)?;

        fields.image_path = Some(key.clone());

        match self.properties.create(fields).await {
            Ok(property) => Ok(property),
            Err(err) => {
                if let Err(cleanup) = self.files.delete(&key).await {
                    warn!(key = %key, error = %cleanup, "Could not remove image after aborted create");
                }
                Err(ServiceError::StorageFailure(Box::new(err)))
            }
        }
    }

    pub async fn update_listing(
        &self,
        id: Uuid,
        patch: PropertyPatch,
    ) -> Result<Property, ServiceError> {
        Ok(self.properties.update(id, patch).await?)
    }

    /// Remove a record and its image file. A file that is already gone is
    /// tolerated; any other file-store failure aborts before the record is
    /// touched, so the record and its (presumably still present) file stay
    /// consistent.
    pub async fn delete_listing(&self, id: Uuid) -> Result<(), ServiceError> {
        let Some(property) = self.properties.get(id).await? else {
            return Err(ServiceError::NotFound(id));
        };

        if let Some(key) = property.image_path.as_deref() {
            match self.files.delete(key).await {
                Ok(()) => {}
                Err(FileError::NotFound(_)) => {
                    warn!(%id, key, "Image file already absent during delete");
                }
                Err(err) => return Err(ServiceError::StorageFailure(Box::new(err))),
            }
        }

        match self.properties.delete(id).await {
            Ok(()) => Ok(()),
            // Lost a race with another delete; the cleanup goal is met either way
            Err(StoreError::NotFound(_)) => Ok(()),
            Err(err) => Err(ServiceError::StorageFailure(Box::new(err))),
        }
    }

    pub async fn health(&self) -> Result<(), ServiceError> {
        Ok(self.properties.health().await?)
    }
}
