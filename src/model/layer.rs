//! Layer operations: availability checks, downloads, and the upload protocol

use super::serde_ext::base64_blob;
use super::types::{Layer, LayerFailure};
use super::validation::{self, Validate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchCheckLayerAvailabilityRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry_id: Option<String>,
    pub repository_name: String,
    pub layer_digests: Vec<String>,
}

impl BatchCheckLayerAvailabilityRequest {
    pub fn new(repository_name: impl Into<String>, layer_digests: Vec<String>) -> Self {
        Self {
            registry_id: None,
            repository_name: repository_name.into(),
            layer_digests,
        }
    }
}

impl Validate for BatchCheckLayerAvailabilityRequest {
    fn validate(&self) -> Result<(), String> {
        validation::registry_id(self.registry_id.as_deref())?;
        validation::repository_name(&self.repository_name)?;
        validation::batch_size("layerDigests", &self.layer_digests, validation::MAX_BATCH_SIZE)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BatchCheckLayerAvailabilityResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layers: Option<Vec<Layer>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failures: Option<Vec<LayerFailure>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetDownloadUrlForLayerRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry_id: Option<String>,
    pub repository_name: String,
    pub layer_digest: String,
}

impl GetDownloadUrlForLayerRequest {
    pub fn new(repository_name: impl Into<String>, layer_digest: impl Into<String>) -> Self {
        Self {
            registry_id: None,
            repository_name: repository_name.into(),
            layer_digest: layer_digest.into(),
        }
    }
}

impl Validate for GetDownloadUrlForLayerRequest {
    fn validate(&self) -> Result<(), String> {
        validation::registry_id(self.registry_id.as_deref())?;
        validation::repository_name(&self.repository_name)?;
        validation::required("layerDigest", &self.layer_digest)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GetDownloadUrlForLayerResponse {
    /// Pre-signed URL the layer can be fetched from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layer_digest: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitiateLayerUploadRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry_id: Option<String>,
    pub repository_name: String,
}

impl InitiateLayerUploadRequest {
    pub fn new(repository_name: impl Into<String>) -> Self {
        Self {
            registry_id: None,
            repository_name: repository_name.into(),
        }
    }
}

impl Validate for InitiateLayerUploadRequest {
    fn validate(&self) -> Result<(), String> {
        validation::registry_id(self.registry_id.as_deref())?;
        validation::repository_name(&self.repository_name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InitiateLayerUploadResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upload_id: Option<String>,
    /// Size in bytes each uploaded part should have
    #[serde(skip_serializing_if = "Option::is_none")]
    pub part_size: Option<i64>,
}

#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadLayerPartRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry_id: Option<String>,
    pub repository_name: String,
    pub upload_id: String,
    /// Inclusive byte range of this part within the layer
    pub part_first_byte: i64,
    pub part_last_byte: i64,
    #[serde(with = "base64_blob")]
    pub layer_part_blob: Vec<u8>,
}

impl UploadLayerPartRequest {
    /// Part starting at `first_byte`; the last byte is derived from the blob length
    pub fn new(
        repository_name: impl Into<String>,
        upload_id: impl Into<String>,
        first_byte: i64,
        blob: Vec<u8>,
    ) -> Self {
        let last_byte = first_byte + blob.len() as i64 - 1;
        Self {
            registry_id: None,
            repository_name: repository_name.into(),
            upload_id: upload_id.into(),
            part_first_byte: first_byte,
            part_last_byte: last_byte,
            layer_part_blob: blob,
        }
    }
}

// Blob bytes are left out of debug output
impl std::fmt::Debug for UploadLayerPartRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadLayerPartRequest")
            .field("registry_id", &self.registry_id)
            .field("repository_name", &self.repository_name)
            .field("upload_id", &self.upload_id)
            .field("part_first_byte", &self.part_first_byte)
            .field("part_last_byte", &self.part_last_byte)
            .field("layer_part_blob", &format_args!("<{} bytes>", self.layer_part_blob.len()))
            .finish()
    }
}

impl Validate for UploadLayerPartRequest {
    fn validate(&self) -> Result<(), String> {
        validation::registry_id(self.registry_id.as_deref())?;
        validation::repository_name(&self.repository_name)?;
        validation::required("uploadId", &self.upload_id)?;
        if self.part_first_byte < 0 || self.part_last_byte < self.part_first_byte {
            return Err(format!(
                "invalid part range {}..={}",
                self.part_first_byte, self.part_last_byte
            ));
        }
        let expected = self
            .part_last_byte
            .checked_sub(self.part_first_byte)
            .and_then(|span| span.checked_add(1))
            .and_then(|len| usize::try_from(len).ok())
            .ok_or_else(|| {
                format!(
                    "part range {}..={} is too large",
                    self.part_first_byte, self.part_last_byte
                )
            })?;
        if self.layer_part_blob.len() != expected {
            return Err(format!(
                "layerPartBlob is {} bytes but the part range covers {}",
                self.layer_part_blob.len(),
                expected
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UploadLayerPartResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upload_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_byte_received: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteLayerUploadRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry_id: Option<String>,
    pub repository_name: String,
    pub upload_id: String,
    pub layer_digests: Vec<String>,
}

impl CompleteLayerUploadRequest {
    pub fn new(
        repository_name: impl Into<String>,
        upload_id: impl Into<String>,
        layer_digest: impl Into<String>,
    ) -> Self {
        Self {
            registry_id: None,
            repository_name: repository_name.into(),
            upload_id: upload_id.into(),
            layer_digests: vec![layer_digest.into()],
        }
    }
}

impl Validate for CompleteLayerUploadRequest {
    fn validate(&self) -> Result<(), String> {
        validation::registry_id(self.registry_id.as_deref())?;
        validation::repository_name(&self.repository_name)?;
        validation::required("uploadId", &self.upload_id)?;
        validation::batch_size("layerDigests", &self.layer_digests, validation::MAX_BATCH_SIZE)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompleteLayerUploadResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upload_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layer_digest: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_upload_layer_part_shape() {
        let req = UploadLayerPartRequest::new("app", "upload-1", 0, b"abc".to_vec());
        assert_eq!(req.part_last_byte, 2);
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({
                "repositoryName": "app",
                "uploadId": "upload-1",
                "partFirstByte": 0,
                "partLastByte": 2,
                "layerPartBlob": "YWJj"
            })
        );
    }

    #[test]
    fn test_upload_layer_part_range_validation() {
        let mut req = UploadLayerPartRequest::new("app", "upload-1", 10, b"abcd".to_vec());
        assert!(req.validate().is_ok());

        req.part_last_byte = 20;
        assert!(req.validate().is_err());

        req.part_last_byte = 5;
        assert!(req.validate().is_err());

        req.part_first_byte = 0;
        req.part_last_byte = i64::MAX;
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_debug_hides_blob() {
        let req = UploadLayerPartRequest::new("app", "u", 0, vec![7u8; 4096]);
        let debug = format!("{:?}", req);
        assert!(debug.contains("<4096 bytes>"));
    }

    #[test]
    fn test_initiate_response() {
        let resp: InitiateLayerUploadResponse =
            serde_json::from_value(json!({"uploadId": "abc-123", "partSize": 10485760})).unwrap();
        assert_eq!(resp.upload_id.as_deref(), Some("abc-123"));
        assert_eq!(resp.part_size, Some(10_485_760));
    }

    #[test]
    fn test_batch_check_response() {
        let resp: BatchCheckLayerAvailabilityResponse = serde_json::from_value(json!({
            "layers": [{
                "layerDigest": "sha256:aaa",
                "layerAvailability": "AVAILABLE",
                "layerSize": 2048,
                "mediaType": "application/vnd.docker.image.rootfs.diff.tar.gzip"
            }],
            "failures": [{
                "layerDigest": "bogus",
                "failureCode": "InvalidLayerDigest",
                "failureReason": "Invalid layer digest"
            }]
        }))
        .unwrap();

        assert!(resp.layers.unwrap()[0].is_available());
        assert_eq!(resp.failures.unwrap()[0].layer_digest.as_deref(), Some("bogus"));
    }
}
