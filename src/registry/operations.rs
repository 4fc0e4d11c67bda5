//! One method per remote operation

use super::client::RegistryClient;
use crate::error::*;
use crate::model::*;
use async_trait::async_trait;

/// The container registry API.
///
/// [`RegistryClient`] is the networked implementation; the trait exists so
/// callers such as [`crate::upload::LayerUploader`] can be driven by test
/// doubles.
#[async_trait]
pub trait ContainerRegistry: Send + Sync {
    /// Check the availability of one or more layers in a repository
    async fn batch_check_layer_availability(
        &self,
        request: BatchCheckLayerAvailabilityRequest,
    ) -> OperationResult<BatchCheckLayerAvailabilityResponse, BatchCheckLayerAvailabilityError>;

    /// Delete a list of images, by tag or digest
    async fn batch_delete_image(
        &self,
        request: BatchDeleteImageRequest,
    ) -> OperationResult<BatchDeleteImageResponse, BatchDeleteImageError>;

    /// Get detailed information, including the manifest, for a list of images
    async fn batch_get_image(
        &self,
        request: BatchGetImageRequest,
    ) -> OperationResult<BatchGetImageResponse, BatchGetImageError>;

    /// Finish a layer upload started with `InitiateLayerUpload`
    async fn complete_layer_upload(
        &self,
        request: CompleteLayerUploadRequest,
    ) -> OperationResult<CompleteLayerUploadResponse, CompleteLayerUploadError>;

    async fn create_repository(
        &self,
        request: CreateRepositoryRequest,
    ) -> OperationResult<CreateRepositoryResponse, CreateRepositoryError>;

    async fn delete_lifecycle_policy(
        &self,
        request: DeleteLifecyclePolicyRequest,
    ) -> OperationResult<DeleteLifecyclePolicyResponse, DeleteLifecyclePolicyError>;

    /// Delete a repository; `force` also deletes the images it contains
    async fn delete_repository(
        &self,
        request: DeleteRepositoryRequest,
    ) -> OperationResult<DeleteRepositoryResponse, DeleteRepositoryError>;

    async fn delete_repository_policy(
        &self,
        request: DeleteRepositoryPolicyRequest,
    ) -> OperationResult<DeleteRepositoryPolicyResponse, DeleteRepositoryPolicyError>;

    /// Describe images, one page at a time
    async fn describe_images(
        &self,
        request: DescribeImagesRequest,
    ) -> OperationResult<DescribeImagesResponse, DescribeImagesError>;

    /// Describe repositories, one page at a time
    async fn describe_repositories(
        &self,
        request: DescribeRepositoriesRequest,
    ) -> OperationResult<DescribeRepositoriesResponse, DescribeRepositoriesError>;

    /// Get a token for `docker login`, valid for twelve hours
    async fn get_authorization_token(
        &self,
        request: GetAuthorizationTokenRequest,
    ) -> OperationResult<GetAuthorizationTokenResponse, GetAuthorizationTokenError>;

    /// Get a pre-signed download URL for a layer
    async fn get_download_url_for_layer(
        &self,
        request: GetDownloadUrlForLayerRequest,
    ) -> OperationResult<GetDownloadUrlForLayerResponse, GetDownloadUrlForLayerError>;

    async fn get_lifecycle_policy(
        &self,
        request: GetLifecyclePolicyRequest,
    ) -> OperationResult<GetLifecyclePolicyResponse, GetLifecyclePolicyError>;

    async fn get_repository_policy(
        &self,
        request: GetRepositoryPolicyRequest,
    ) -> OperationResult<GetRepositoryPolicyResponse, GetRepositoryPolicyError>;

    /// Start a layer upload and get an upload id and part size
    async fn initiate_layer_upload(
        &self,
        request: InitiateLayerUploadRequest,
    ) -> OperationResult<InitiateLayerUploadResponse, InitiateLayerUploadError>;

    /// List image ids, one page at a time
    async fn list_images(
        &self,
        request: ListImagesRequest,
    ) -> OperationResult<ListImagesResponse, ListImagesError>;

    /// Create or update the image manifest and tag of an image
    async fn put_image(
        &self,
        request: PutImageRequest,
    ) -> OperationResult<PutImageResponse, PutImageError>;

    async fn put_lifecycle_policy(
        &self,
        request: PutLifecyclePolicyRequest,
    ) -> OperationResult<PutLifecyclePolicyResponse, PutLifecyclePolicyError>;

    async fn set_repository_policy(
        &self,
        request: SetRepositoryPolicyRequest,
    ) -> OperationResult<SetRepositoryPolicyResponse, SetRepositoryPolicyError>;

    /// Upload one chunk of a layer
    async fn upload_layer_part(
        &self,
        request: UploadLayerPartRequest,
    ) -> OperationResult<UploadLayerPartResponse, UploadLayerPartError>;
}

#[async_trait]
impl ContainerRegistry for RegistryClient {
    async fn batch_check_layer_availability(
        &self,
        request: BatchCheckLayerAvailabilityRequest,
    ) -> OperationResult<BatchCheckLayerAvailabilityResponse, BatchCheckLayerAvailabilityError>
    {
        self.rpc().call("BatchCheckLayerAvailability", &request).await
    }

    async fn batch_delete_image(
        &self,
        request: BatchDeleteImageRequest,
    ) -> OperationResult<BatchDeleteImageResponse, BatchDeleteImageError> {
        self.rpc().call("BatchDeleteImage", &request).await
    }

    async fn batch_get_image(
        &self,
        request: BatchGetImageRequest,
    ) -> OperationResult<BatchGetImageResponse, BatchGetImageError> {
        self.rpc().call("BatchGetImage", &request).await
    }

    async fn complete_layer_upload(
        &self,
        request: CompleteLayerUploadRequest,
    ) -> OperationResult<CompleteLayerUploadResponse, CompleteLayerUploadError> {
        self.rpc().call("CompleteLayerUpload", &request).await
    }

    async fn create_repository(
        &self,
        request: CreateRepositoryRequest,
    ) -> OperationResult<CreateRepositoryResponse, CreateRepositoryError> {
        self.rpc().call("CreateRepository", &request).await
    }

    async fn delete_lifecycle_policy(
        &self,
        request: DeleteLifecyclePolicyRequest,
    ) -> OperationResult<DeleteLifecyclePolicyResponse, DeleteLifecyclePolicyError> {
        self.rpc().call("DeleteLifecyclePolicy", &request).await
    }

    async fn delete_repository(
        &self,
        request: DeleteRepositoryRequest,
    ) -> OperationResult<DeleteRepositoryResponse, DeleteRepositoryError> {
        self.rpc().call("DeleteRepository", &request).await
    }

    async fn delete_repository_policy(
        &self,
        request: DeleteRepositoryPolicyRequest,
    ) -> OperationResult<DeleteRepositoryPolicyResponse, DeleteRepositoryPolicyError> {
        self.rpc().call("DeleteRepositoryPolicy", &request).await
    }

    async fn describe_images(
        &self,
        request: DescribeImagesRequest,
    ) -> OperationResult<DescribeImagesResponse, DescribeImagesError> {
        self.rpc().call("DescribeImages", &request).await
    }

    async fn describe_repositories(
        &self,
        request: DescribeRepositoriesRequest,
    ) -> OperationResult<DescribeRepositoriesResponse, DescribeRepositoriesError> {
        self.rpc().call("DescribeRepositories", &request).await
    }

    async fn get_authorization_token(
        &self,
        request: GetAuthorizationTokenRequest,
    ) -> OperationResult<GetAuthorizationTokenResponse, GetAuthorizationTokenError> {
        self.rpc().call("GetAuthorizationToken", &request).await
    }

    async fn get_download_url_for_layer(
        &self,
        request: GetDownloadUrlForLayerRequest,
    ) -> OperationResult<GetDownloadUrlForLayerResponse, GetDownloadUrlForLayerError> {
        self.rpc().call("GetDownloadUrlForLayer", &request).await
    }

    async fn get_lifecycle_policy(
        &self,
        request: GetLifecyclePolicyRequest,
    ) -> OperationResult<GetLifecyclePolicyResponse, GetLifecyclePolicyError> {
        self.rpc().call("GetLifecyclePolicy", &request).await
    }

    async fn get_repository_policy(
        &self,
        request: GetRepositoryPolicyRequest,
    ) -> OperationResult<GetRepositoryPolicyResponse, GetRepositoryPolicyError> {
        self.rpc().call("GetRepositoryPolicy", &request).await
    }

    async fn initiate_layer_upload(
        &self,
        request: InitiateLayerUploadRequest,
    ) -> OperationResult<InitiateLayerUploadResponse, InitiateLayerUploadError> {
        self.rpc().call("InitiateLayerUpload", &request).await
    }

    async fn list_images(
        &self,
        request: ListImagesRequest,
    ) -> OperationResult<ListImagesResponse, ListImagesError> {
        self.rpc().call("ListImages", &request).await
    }

    async fn put_image(
        &self,
        request: PutImageRequest,
    ) -> OperationResult<PutImageResponse, PutImageError> {
        self.rpc().call("PutImage", &request).await
    }

    async fn put_lifecycle_policy(
        &self,
        request: PutLifecyclePolicyRequest,
    ) -> OperationResult<PutLifecyclePolicyResponse, PutLifecyclePolicyError> {
        self.rpc().call("PutLifecyclePolicy", &request).await
    }

    async fn set_repository_policy(
        &self,
        request: SetRepositoryPolicyRequest,
    ) -> OperationResult<SetRepositoryPolicyResponse, SetRepositoryPolicyError> {
        self.rpc().call("SetRepositoryPolicy", &request).await
    }

    async fn upload_layer_part(
        &self,
        request: UploadLayerPartRequest,
    ) -> OperationResult<UploadLayerPartResponse, UploadLayerPartError> {
        self.rpc().call("UploadLayerPart", &request).await
    }
}
