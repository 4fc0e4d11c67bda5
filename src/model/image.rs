//! Image operations

use super::types::{DescribeImagesFilter, Image, ImageDetail, ImageFailure, ImageIdentifier, ListImagesFilter};
use super::validation::{self, Validate};
use serde::{Deserialize, Serialize};

/// Media types accepted by `BatchGetImage` when none are given
pub const DEFAULT_ACCEPTED_MEDIA_TYPES: &[&str] = &[
    "application/vnd.docker.distribution.manifest.v1+json",
    "application/vnd.docker.distribution.manifest.v2+json",
    "application/vnd.oci.image.manifest.v1+json",
];

fn validate_image_ids(ids: &[ImageIdentifier]) -> Result<(), String> {
    validation::batch_size("imageIds", ids, validation::MAX_BATCH_SIZE)?;
    if ids.iter().any(|id| id.image_digest.is_none() && id.image_tag.is_none()) {
        return Err("each imageId needs an imageDigest or an imageTag".to_string());
    }
    Ok(())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchDeleteImageRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry_id: Option<String>,
    pub repository_name: String,
    pub image_ids: Vec<ImageIdentifier>,
}

impl BatchDeleteImageRequest {
    pub fn new(repository_name: impl Into<String>, image_ids: Vec<ImageIdentifier>) -> Self {
        Self {
            registry_id: None,
            repository_name: repository_name.into(),
            image_ids,
        }
    }
}

impl Validate for BatchDeleteImageRequest {
    fn validate(&self) -> Result<(), String> {
        validation::registry_id(self.registry_id.as_deref())?;
        validation::repository_name(&self.repository_name)?;
        validate_image_ids(&self.image_ids)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BatchDeleteImageResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_ids: Option<Vec<ImageIdentifier>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failures: Option<Vec<ImageFailure>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchGetImageRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry_id: Option<String>,
    pub repository_name: String,
    pub image_ids: Vec<ImageIdentifier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accepted_media_types: Option<Vec<String>>,
}

impl BatchGetImageRequest {
    pub fn new(repository_name: impl Into<String>, image_ids: Vec<ImageIdentifier>) -> Self {
        Self {
            repository_name: repository_name.into(),
            image_ids,
            ..Default::default()
        }
    }

    /// Accept every manifest format this client knows about
    pub fn with_default_media_types(mut self) -> Self {
        self.accepted_media_types = Some(
            DEFAULT_ACCEPTED_MEDIA_TYPES
                .iter()
                .map(|media_type| media_type.to_string())
                .collect(),
        );
        self
    }
}

impl Validate for BatchGetImageRequest {
    fn validate(&self) -> Result<(), String> {
        validation::registry_id(self.registry_id.as_deref())?;
        validation::repository_name(&self.repository_name)?;
        validate_image_ids(&self.image_ids)?;
        if let Some(types) = &self.accepted_media_types {
            validation::batch_size("acceptedMediaTypes", types, validation::MAX_BATCH_SIZE)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BatchGetImageResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<Image>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failures: Option<Vec<ImageFailure>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescribeImagesRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry_id: Option<String>,
    pub repository_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_ids: Option<Vec<ImageIdentifier>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_results: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<DescribeImagesFilter>,
}

impl DescribeImagesRequest {
    pub fn new(repository_name: impl Into<String>) -> Self {
        Self {
            repository_name: repository_name.into(),
            ..Default::default()
        }
    }
}

impl Validate for DescribeImagesRequest {
    fn validate(&self) -> Result<(), String> {
        validation::registry_id(self.registry_id.as_deref())?;
        validation::repository_name(&self.repository_name)?;
        validation::max_results(self.max_results)?;
        if let Some(ids) = &self.image_ids {
            validate_image_ids(ids)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DescribeImagesResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_details: Option<Vec<ImageDetail>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListImagesRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry_id: Option<String>,
    pub repository_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_results: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<ListImagesFilter>,
}

impl ListImagesRequest {
    pub fn new(repository_name: impl Into<String>) -> Self {
        Self {
            repository_name: repository_name.into(),
            ..Default::default()
        }
    }
}

impl Validate for ListImagesRequest {
    fn validate(&self) -> Result<(), String> {
        validation::registry_id(self.registry_id.as_deref())?;
        validation::repository_name(&self.repository_name)?;
        validation::max_results(self.max_results)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListImagesResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_ids: Option<Vec<ImageIdentifier>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PutImageRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry_id: Option<String>,
    pub repository_name: String,
    /// Manifest document, as a string
    pub image_manifest: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_tag: Option<String>,
}

impl PutImageRequest {
    pub fn new(repository_name: impl Into<String>, image_manifest: impl Into<String>) -> Self {
        Self {
            registry_id: None,
            repository_name: repository_name.into(),
            image_manifest: image_manifest.into(),
            image_tag: None,
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.image_tag = Some(tag.into());
        self
    }
}

impl Validate for PutImageRequest {
    fn validate(&self) -> Result<(), String> {
        validation::registry_id(self.registry_id.as_deref())?;
        validation::repository_name(&self.repository_name)?;
        validation::required("imageManifest", &self.image_manifest)?;
        if let Some(tag) = &self.image_tag {
            validation::required("imageTag", tag)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PutImageResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<Image>,
}
