//! Value types shared by several operations

use super::serde_ext::{epoch_seconds_opt, string_enum};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

string_enum! {
    /// Whether a layer is present in the repository
    LayerAvailability {
        Available => "AVAILABLE",
        Unavailable => "UNAVAILABLE",
    }
}

string_enum! {
    ImageFailureCode {
        InvalidImageDigest => "InvalidImageDigest",
        InvalidImageTag => "InvalidImageTag",
        ImageTagDoesNotMatchDigest => "ImageTagDoesNotMatchDigest",
        ImageNotFound => "ImageNotFound",
        MissingDigestAndTag => "MissingDigestAndTag",
    }
}

string_enum! {
    LayerFailureCode {
        InvalidLayerDigest => "InvalidLayerDigest",
        MissingLayerDigest => "MissingLayerDigest",
    }
}

string_enum! {
    /// Filter images by whether they carry tags
    TagStatus {
        Tagged => "TAGGED",
        Untagged => "UNTAGGED",
        Any => "ANY",
    }
}

/// A repository in a registry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Repository {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository_arn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository_name: Option<String>,
    /// `<registry>.dkr.ecr.<region>.amazonaws.com/<name>`, usable with docker
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository_uri: Option<String>,
    #[serde(with = "epoch_seconds_opt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// An image reference by digest, tag, or both
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageIdentifier {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_digest: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_tag: Option<String>,
}

impl ImageIdentifier {
    pub fn tag(tag: impl Into<String>) -> Self {
        Self {
            image_digest: None,
            image_tag: Some(tag.into()),
        }
    }

    pub fn digest(digest: impl Into<String>) -> Self {
        Self {
            image_digest: Some(digest.into()),
            image_tag: None,
        }
    }

    /// Parse `tag`, `sha256:<hex>`, or `tag@sha256:<hex>`
    pub fn parse(reference: &str) -> Self {
        if let Some((tag, digest)) = reference.split_once('@') {
            return Self {
                image_digest: Some(digest.to_string()),
                image_tag: (!tag.is_empty()).then(|| tag.to_string()),
            };
        }
        if reference.starts_with("sha256:") {
            Self::digest(reference)
        } else {
            Self::tag(reference)
        }
    }
}

/// An image manifest and its identity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Image {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_id: Option<ImageIdentifier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_manifest: Option<String>,
}

/// Metadata about an image
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageDetail {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_digest: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_size_in_bytes: Option<i64>,
    #[serde(with = "epoch_seconds_opt", skip_serializing_if = "Option::is_none")]
    pub image_pushed_at: Option<DateTime<Utc>>,
}

/// Per-image failure inside a batch operation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageFailure {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_id: Option<ImageIdentifier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_code: Option<ImageFailureCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
}

/// A layer's availability and size
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Layer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layer_digest: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layer_availability: Option<LayerAvailability>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layer_size: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
}

impl Layer {
    pub fn is_available(&self) -> bool {
        self.layer_availability == Some(LayerAvailability::Available)
    }
}

/// Per-layer failure inside a batch operation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayerFailure {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layer_digest: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_code: Option<LayerFailureCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListImagesFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_status: Option<TagStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DescribeImagesFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_status: Option<TagStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_repository_from_service_json() {
        let repo: Repository = serde_json::from_value(json!({
            "repositoryArn": "arn:aws:ecr:us-east-1:123456789012:repository/app",
            "registryId": "123456789012",
            "repositoryName": "app",
            "repositoryUri": "123456789012.dkr.ecr.us-east-1.amazonaws.com/app",
            "createdAt": 1.479920486E9
        }))
        .unwrap();

        assert_eq!(repo.repository_name.as_deref(), Some("app"));
        assert_eq!(repo.created_at.unwrap().timestamp(), 1_479_920_486);
    }

    #[test]
    fn test_unknown_enum_value_is_preserved() {
        let layer: Layer = serde_json::from_value(json!({
            "layerDigest": "sha256:abc",
            "layerAvailability": "ARCHIVED"
        }))
        .unwrap();
        assert_eq!(
            layer.layer_availability,
            Some(LayerAvailability::Unknown("ARCHIVED".to_string()))
        );
        assert!(!layer.is_available());
        assert_eq!(serde_json::to_value(&layer).unwrap()["layerAvailability"], "ARCHIVED");
    }

    #[test]
    fn test_image_identifier_shape() {
        let id = ImageIdentifier::tag("latest");
        assert_eq!(serde_json::to_value(&id).unwrap(), json!({"imageTag": "latest"}));
    }

    #[test]
    fn test_image_identifier_parse() {
        assert_eq!(ImageIdentifier::parse("v1"), ImageIdentifier::tag("v1"));
        assert_eq!(
            ImageIdentifier::parse("sha256:abcd"),
            ImageIdentifier::digest("sha256:abcd")
        );
        assert_eq!(
            ImageIdentifier::parse("v1@sha256:abcd"),
            ImageIdentifier {
                image_digest: Some("sha256:abcd".to_string()),
                image_tag: Some("v1".to_string()),
            }
        );
    }
}
