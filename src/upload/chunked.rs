//! Layer upload: availability check, initiate, parts, complete

use super::progress::ProgressTracker;
use crate::digest::DigestUtils;
use crate::error::{
    BatchCheckLayerAvailabilityError, CompleteLayerUploadError, InitiateLayerUploadError,
    RegistryError, UploadLayerPartError,
};
use crate::model::{
    BatchCheckLayerAvailabilityRequest, CompleteLayerUploadRequest, InitiateLayerUploadRequest,
    UploadLayerPartRequest,
};
use crate::registry::ContainerRegistry;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Part size used when the service does not send one
pub const DEFAULT_PART_SIZE: usize = 10 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Layer is empty")]
    EmptyLayer,

    #[error("Checking layer availability failed: {0}")]
    Check(#[source] RegistryError<BatchCheckLayerAvailabilityError>),

    #[error("Initiating layer upload failed: {0}")]
    Initiate(#[source] RegistryError<InitiateLayerUploadError>),

    #[error("InitiateLayerUpload returned no upload id")]
    MissingUploadId,

    #[error("Uploading part at byte {first_byte} failed: {source}")]
    Part {
        first_byte: i64,
        #[source]
        source: RegistryError<UploadLayerPartError>,
    },

    #[error("Completing layer upload failed: {0}")]
    Complete(#[source] RegistryError<CompleteLayerUploadError>),

    #[error("Registry stored digest {actual}, expected {expected}")]
    DigestMismatch { expected: String, actual: String },
}

/// What an upload did
#[derive(Debug, Clone, PartialEq)]
pub struct UploadOutcome {
    pub digest: String,
    pub size: u64,
    /// Parts sent; zero when the layer already existed
    pub parts: usize,
    pub skipped: bool,
    pub elapsed: Duration,
}

/// Pushes a layer blob with the multi-call upload protocol.
///
/// Parts are sent one after another, each covering the inclusive byte range
/// `[first, last]` of the blob.
pub struct LayerUploader<R> {
    registry: R,
    registry_id: Option<String>,
    part_size: Option<usize>,
    skip_existing: bool,
}

impl<R: ContainerRegistry> LayerUploader<R> {
    pub fn new(registry: R) -> Self {
        Self {
            registry,
            registry_id: None,
            part_size: None,
            skip_existing: true,
        }
    }

    pub fn with_registry_id(mut self, registry_id: impl Into<String>) -> Self {
        self.registry_id = Some(registry_id.into());
        self
    }

    /// Overrides the part size the service suggests
    pub fn with_part_size(mut self, part_size: usize) -> Self {
        self.part_size = Some(part_size.max(1));
        self
    }

    pub fn with_skip_existing(mut self, skip_existing: bool) -> Self {
        self.skip_existing = skip_existing;
        self
    }

    pub async fn upload(&self, repository: &str, data: &[u8]) -> Result<UploadOutcome, UploadError> {
        if data.is_empty() {
            return Err(UploadError::EmptyLayer);
        }

        let digest = DigestUtils::compute(data);
        let mut progress = ProgressTracker::new(data.len() as u64);

        if self.skip_existing && self.is_available(repository, &digest).await? {
            info!(%digest, repository, "Layer already exists, skipping upload");
            return Ok(UploadOutcome {
                digest,
                size: data.len() as u64,
                parts: 0,
                skipped: true,
                elapsed: progress.elapsed(),
            });
        }

        let mut initiate = InitiateLayerUploadRequest::new(repository);
        initiate.registry_id = self.registry_id.clone();
        let initiated = self
            .registry
            .initiate_layer_upload(initiate)
            .await
            .map_err(UploadError::Initiate)?;

        let upload_id = initiated
            .upload_id
            .filter(|id| !id.is_empty())
            .ok_or(UploadError::MissingUploadId)?;
        let part_size = self
            .part_size
            .or_else(|| initiated.part_size.filter(|s| *s > 0).map(|s| s as usize))
            .unwrap_or(DEFAULT_PART_SIZE);

        debug!(%upload_id, part_size, size = data.len(), "Initiated layer upload");

        let mut parts = 0;
        for (index, chunk) in data.chunks(part_size).enumerate() {
            let first_byte = (index * part_size) as i64;
            let mut part = UploadLayerPartRequest::new(repository, &upload_id, first_byte, chunk.to_vec());
            part.registry_id = self.registry_id.clone();

            self.registry
                .upload_layer_part(part)
                .await
                .map_err(|source| UploadError::Part { first_byte, source })?;

            parts += 1;
            progress.update(chunk.len() as u64);
            debug!(
                part = parts,
                uploaded = progress.uploaded(),
                percent = progress.percentage(),
                "Uploaded layer part"
            );
        }

        let mut complete = CompleteLayerUploadRequest::new(repository, &upload_id, &digest);
        complete.registry_id = self.registry_id.clone();
        let completed = self
            .registry
            .complete_layer_upload(complete)
            .await
            .map_err(UploadError::Complete)?;

        if let Some(actual) = completed.layer_digest {
            if actual != digest {
                return Err(UploadError::DigestMismatch {
                    expected: digest,
                    actual,
                });
            }
        }

        info!(
            %digest,
            repository,
            parts,
            bytes_per_second = progress.bytes_per_second() as u64,
            "Layer upload complete"
        );

        Ok(UploadOutcome {
            digest,
            size: data.len() as u64,
            parts,
            skipped: false,
            elapsed: progress.elapsed(),
        })
    }

    async fn is_available(&self, repository: &str, digest: &str) -> Result<bool, UploadError> {
        let mut request = BatchCheckLayerAvailabilityRequest::new(repository, vec![digest.to_string()]);
        request.registry_id = self.registry_id.clone();

        let response = self
            .registry
            .batch_check_layer_availability(request)
            .await
            .map_err(UploadError::Check)?;

        Ok(response
            .layers
            .unwrap_or_default()
            .iter()
            .any(|layer| layer.layer_digest.as_deref() == Some(digest) && layer.is_available()))
    }
}
