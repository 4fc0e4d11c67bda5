use ecr_client::error::*;
use ecr_client::model::*;
use async_trait::async_trait;
use ecr_client::registry::credentials::{
    Credentials, CredentialsError, ProvideCredentials, StaticProvider,
};
use ecr_client::{ClientConfig, ContainerRegistry, LayerUploader, RegistryClient};
use httpmock::prelude::*;
use serde_json::json;

const TARGET_PREFIX: &str = "AmazonEC2ContainerRegistry_V20150921";
const CONTENT_TYPE: &str = "application/x-amz-json-1.1";

fn client_for(server: &MockServer) -> RegistryClient {
    RegistryClient::builder()
        .with_config(ClientConfig::new("us-east-1").with_endpoint(server.base_url()))
        .with_static_credentials("AKIDEXAMPLE", "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY")
        .build()
        .unwrap()
}

fn target(operation: &str) -> String {
    format!("{}.{}", TARGET_PREFIX, operation)
}

#[tokio::test]
async fn test_create_repository_success() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/")
                .header("content-type", CONTENT_TYPE)
                .header("x-amz-target", target("CreateRepository"))
                .header_exists("authorization")
                .header_exists("x-amz-date")
                .json_body(json!({"repositoryName": "team/app"}));
            then.status(200)
                .header("content-type", CONTENT_TYPE)
                .json_body(json!({
                    "repository": {
                        "registryId": "123456789012",
                        "repositoryName": "team/app",
                        "repositoryArn": "arn:aws:ecr:us-east-1:123456789012:repository/team/app",
                        "repositoryUri": "123456789012.dkr.ecr.us-east-1.amazonaws.com/team/app",
                        "createdAt": 1.5E9
                    }
                }));
        })
        .await;

    let client = client_for(&server);
    let response = client
        .create_repository(CreateRepositoryRequest::new("team/app"))
        .await
        .unwrap();

    mock.assert_async().await;
    let repository = response.repository.unwrap();
    assert_eq!(repository.repository_name.as_deref(), Some("team/app"));
    assert_eq!(repository.registry_id.as_deref(), Some("123456789012"));
    assert_eq!(repository.created_at.unwrap().timestamp(), 1_500_000_000);
}

#[tokio::test]
async fn test_signed_headers_without_session_token() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/")
                .header_exists("authorization")
                .header_exists("x-amz-date")
                .header_exists("user-agent");
            then.status(200).json_body(json!({"authorizationData": []}));
        })
        .await;

    let client = client_for(&server);
    client
        .get_authorization_token(GetAuthorizationTokenRequest::default())
        .await
        .unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_session_token_is_sent() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .header("x-amz-security-token", "session-token")
                .header_exists("authorization");
            then.status(200).json_body(json!({}));
        })
        .await;

    let client = RegistryClient::builder()
        .with_config(ClientConfig::new("us-east-1").with_endpoint(server.base_url()))
        .with_credentials(StaticProvider::from_credentials(Credentials::new(
            "AKIDEXAMPLE",
            "secret",
            Some("session-token".to_string()),
            None,
        )))
        .build()
        .unwrap();

    client
        .get_authorization_token(GetAuthorizationTokenRequest::default())
        .await
        .unwrap();
    mock.assert_async().await;
}

/// Hands out credentials that stopped being valid an hour ago
struct StaleProvider;

#[async_trait]
impl ProvideCredentials for StaleProvider {
    async fn credentials(&self) -> std::result::Result<Credentials, CredentialsError> {
        let expired = chrono::Utc::now() - chrono::Duration::hours(1);
        Ok(Credentials::new("AKIDSTALE", "secret", None, Some(expired)))
    }
}

#[tokio::test]
async fn test_expired_credentials_are_not_sent() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST);
            then.status(200).json_body(json!({}));
        })
        .await;

    let client = RegistryClient::builder()
        .with_config(ClientConfig::new("us-east-1").with_endpoint(server.base_url()))
        .with_credentials(StaleProvider)
        .build()
        .unwrap();

    let err = client
        .get_authorization_token(GetAuthorizationTokenRequest::default())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        RegistryError::Credentials(CredentialsError::Expired(_))
    ));
    assert_eq!(mock.hits_async().await, 0);
}

#[tokio::test]
async fn test_typed_service_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).header("x-amz-target", target("CreateRepository"));
            then.status(400).header("content-type", CONTENT_TYPE).json_body(json!({
                "__type": "RepositoryAlreadyExistsException",
                "message": "The repository with name 'app' already exists in the registry with id '123456789012'"
            }));
        })
        .await;

    let client = client_for(&server);
    let err = client
        .create_repository(CreateRepositoryRequest::new("app"))
        .await
        .unwrap_err();

    assert_eq!(err.code(), Some("RepositoryAlreadyExistsException"));
    match err {
        RegistryError::Service(CreateRepositoryError::RepositoryAlreadyExists(message)) => {
            assert!(message.contains("already exists"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_error_outside_operation_set_is_unknown() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).header("x-amz-target", target("ListImages"));
            then.status(400).json_body(json!({
                "__type": "com.amazon.coral.availability#ThrottlingException",
                "message": "Rate exceeded"
            }));
        })
        .await;

    let client = client_for(&server);
    let err = client
        .list_images(ListImagesRequest::new("app"))
        .await
        .unwrap_err();

    match err {
        RegistryError::Unknown(unknown) => {
            assert_eq!(unknown.status, 400);
            assert_eq!(unknown.code.as_deref(), Some("ThrottlingException"));
            assert_eq!(unknown.message.as_deref(), Some("Rate exceeded"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_server_error_from_header() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST);
            then.status(500)
                .header("x-amzn-errortype", "ServerException:http://internal.amazon.com/");
        })
        .await;

    let client = client_for(&server);
    let err = client
        .delete_repository(DeleteRepositoryRequest::new("app"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RegistryError::Service(DeleteRepositoryError::Server(_))
    ));
}

#[tokio::test]
async fn test_invalid_request_is_not_sent() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST);
            then.status(200).json_body(json!({}));
        })
        .await;

    let client = client_for(&server);
    let err = client
        .create_repository(CreateRepositoryRequest::new("Not A Valid Name"))
        .await
        .unwrap_err();

    assert!(matches!(err, RegistryError::Validation(_)));
    assert_eq!(mock.hits_async().await, 0);
}

#[tokio::test]
async fn test_empty_success_body() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).header("x-amz-target", target("DeleteLifecyclePolicy"));
            then.status(200);
        })
        .await;

    let client = client_for(&server);
    let response = client
        .delete_lifecycle_policy(LifecyclePolicyRequest::new("app"))
        .await
        .unwrap();
    assert_eq!(response, LifecyclePolicyResponse::default());
}

#[tokio::test]
async fn test_malformed_success_body() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST);
            then.status(200).body("not json");
        })
        .await;

    let client = client_for(&server);
    let err = client
        .get_repository_policy(RepositoryPolicyRequest::new("app"))
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::Parse(_)));
}

#[tokio::test]
async fn test_describe_all_repositories_follows_next_token() {
    let server = MockServer::start_async().await;
    let first = server
        .mock_async(|when, then| {
            when.method(POST)
                .header("x-amz-target", target("DescribeRepositories"))
                .json_body(json!({"maxResults": 1}));
            then.status(200).json_body(json!({
                "repositories": [{"repositoryName": "app"}],
                "nextToken": "page-2"
            }));
        })
        .await;
    let second = server
        .mock_async(|when, then| {
            when.method(POST)
                .header("x-amz-target", target("DescribeRepositories"))
                .json_body(json!({"maxResults": 1, "nextToken": "page-2"}));
            then.status(200).json_body(json!({
                "repositories": [{"repositoryName": "web"}]
            }));
        })
        .await;

    let client = client_for(&server);
    let request = DescribeRepositoriesRequest {
        max_results: Some(1),
        ..Default::default()
    };
    let repositories = client.describe_all_repositories(request).await.unwrap();

    first.assert_async().await;
    second.assert_async().await;
    let names: Vec<_> = repositories
        .iter()
        .filter_map(|r| r.repository_name.as_deref())
        .collect();
    assert_eq!(names, vec!["app", "web"]);
}

#[tokio::test]
async fn test_upload_layer_part_sends_base64_blob() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .header("x-amz-target", target("UploadLayerPart"))
                .json_body(json!({
                    "repositoryName": "app",
                    "uploadId": "upload-1",
                    "partFirstByte": 0,
                    "partLastByte": 4,
                    "layerPartBlob": "aGVsbG8="
                }));
            then.status(200).json_body(json!({
                "repositoryName": "app",
                "uploadId": "upload-1",
                "lastByteReceived": 4
            }));
        })
        .await;

    let client = client_for(&server);
    let response = client
        .upload_layer_part(UploadLayerPartRequest::new("app", "upload-1", 0, b"hello".to_vec()))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(response.last_byte_received, Some(4));
}

#[tokio::test]
async fn test_submit_delivers_result_to_callback() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).header("x-amz-target", target("GetRepositoryPolicy"));
            then.status(200).json_body(json!({
                "repositoryName": "app",
                "policyText": "{\"Version\":\"2008-10-17\"}"
            }));
        })
        .await;

    let client = client_for(&server);
    let (tx, rx) = tokio::sync::oneshot::channel();
    let handle = client
        .submit(
            |c| async move { c.get_repository_policy(RepositoryPolicyRequest::new("app")).await },
            move |result| {
                let _ = tx.send(result);
            },
        )
        .unwrap();

    handle.await.unwrap();
    let response = rx.await.unwrap().unwrap();
    assert_eq!(response.repository_name.as_deref(), Some("app"));
    assert!(response.policy_text.unwrap().contains("2008-10-17"));
}

#[tokio::test]
async fn test_layer_upload_over_http() {
    const DIGEST: &str = "sha256:b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9";

    let server = MockServer::start_async().await;
    let check = server
        .mock_async(|when, then| {
            when.method(POST)
                .header("x-amz-target", target("BatchCheckLayerAvailability"))
                .json_body(json!({"repositoryName": "app", "layerDigests": [DIGEST]}));
            then.status(200).json_body(json!({
                "layers": [],
                "failures": [{"layerDigest": DIGEST, "failureCode": "MissingLayerDigest"}]
            }));
        })
        .await;
    let initiate = server
        .mock_async(|when, then| {
            when.method(POST).header("x-amz-target", target("InitiateLayerUpload"));
            then.status(200).json_body(json!({"uploadId": "upload-1", "partSize": 5}));
        })
        .await;
    let parts = server
        .mock_async(|when, then| {
            when.method(POST).header("x-amz-target", target("UploadLayerPart"));
            then.status(200).json_body(json!({"uploadId": "upload-1"}));
        })
        .await;
    let complete = server
        .mock_async(|when, then| {
            when.method(POST)
                .header("x-amz-target", target("CompleteLayerUpload"))
                .json_body(json!({
                    "repositoryName": "app",
                    "uploadId": "upload-1",
                    "layerDigests": [DIGEST]
                }));
            then.status(200).json_body(json!({"uploadId": "upload-1", "layerDigest": DIGEST}));
        })
        .await;

    let uploader = LayerUploader::new(client_for(&server));
    let outcome = uploader.upload("app", b"hello world").await.unwrap();

    check.assert_async().await;
    initiate.assert_async().await;
    complete.assert_async().await;
    assert_eq!(parts.hits_async().await, 3);
    assert_eq!(outcome.digest, DIGEST);
    assert_eq!(outcome.size, 11);
    assert_eq!(outcome.parts, 3);
    assert!(!outcome.skipped);
}
