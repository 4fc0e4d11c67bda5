//! Runs one parsed command against the registry

use crate::cli::args::{Args, Command, PageArgs, RepositoryArgs};
use crate::config::{ClientConfig, ConfigOverlay};
use crate::error::{ClientError, OperationResult, Result};
use crate::model::*;
use crate::output::OutputManager;
use crate::registry::{ContainerRegistry, RegistryClient};
use crate::upload::{LayerUploader, UploadOutcome};
use futures::stream::{self, StreamExt};
use serde_json::json;
use std::fmt::Display;
use std::path::PathBuf;
use std::time::Instant;

pub struct Runner {
    args: Args,
    output: OutputManager,
}

/// Turn an operation failure into a CLI error named after the operation
fn op<T, E: Display>(operation: &str, result: OperationResult<T, E>) -> Result<T> {
    result.map_err(|err| ClientError::operation(operation, err))
}

impl Runner {
    pub fn new(args: Args) -> Result<Self> {
        let output = if args.quiet {
            OutputManager::new_quiet(args.output)
        } else {
            OutputManager::new(args.output, args.verbose)
        };

        Ok(Self { args, output })
    }

    pub fn output(&self) -> &OutputManager {
        &self.output
    }

    /// Defaults, then the config file, then the environment, then flags
    pub fn client_config(&self) -> Result<ClientConfig> {
        let mut config = ClientConfig::default();
        if let Some(path) = &self.args.config {
            config = config.apply(&ConfigOverlay::from_file(path)?);
        }
        config = config.apply(&ConfigOverlay::from_env());
        let config = self.args.client_config(config);
        config.validate()?;
        Ok(config)
    }

    pub async fn run(&self) -> Result<()> {
        self.args.validate().map_err(ClientError::Validation)?;

        let config = self.client_config()?;
        self.output.detail(&format!(
            "Region: {}{}",
            config.region,
            config
                .endpoint
                .as_deref()
                .map(|e| format!(" (endpoint {})", e))
                .unwrap_or_default()
        ));

        let client = RegistryClient::from_config(config)?;
        self.execute(&client).await
    }

    /// Run the command with an already configured client
    pub async fn execute(&self, client: &RegistryClient) -> Result<()> {
        match &self.args.command {
            Command::BatchCheckLayerAvailability { repo, layer_digests } => {
                let mut request = BatchCheckLayerAvailabilityRequest::new(&repo.repository_name, layer_digests.clone());
                request.registry_id = repo.registry_id.clone();
                let response = op(
                    "BatchCheckLayerAvailability",
                    client.batch_check_layer_availability(request).await,
                )?;
                self.output.render(&response)
            }

            Command::BatchDeleteImage { repo, image_ids } => {
                let mut request = BatchDeleteImageRequest::new(&repo.repository_name, image_ids.clone());
                request.registry_id = repo.registry_id.clone();
                let response = op("BatchDeleteImage", client.batch_delete_image(request).await)?;
                self.report_failures(response.failures.as_deref().unwrap_or_default());
                self.output.render(&response)
            }

            Command::BatchGetImage {
                repo,
                image_ids,
                accepted_media_types,
            } => {
                let mut request = BatchGetImageRequest::new(&repo.repository_name, image_ids.clone());
                request.registry_id = repo.registry_id.clone();
                request = if accepted_media_types.is_empty() {
                    request.with_default_media_types()
                } else {
                    BatchGetImageRequest {
                        accepted_media_types: Some(accepted_media_types.clone()),
                        ..request
                    }
                };
                let response = op("BatchGetImage", client.batch_get_image(request).await)?;
                self.report_failures(response.failures.as_deref().unwrap_or_default());
                self.output.render(&response)
            }

            Command::CompleteLayerUpload {
                repo,
                upload_id,
                layer_digests,
            } => {
                let request = CompleteLayerUploadRequest {
                    registry_id: repo.registry_id.clone(),
                    repository_name: repo.repository_name.clone(),
                    upload_id: upload_id.clone(),
                    layer_digests: layer_digests.clone(),
                };
                let response = op("CompleteLayerUpload", client.complete_layer_upload(request).await)?;
                self.output.render(&response)
            }

            Command::CreateRepository { repository_name } => {
                let request = CreateRepositoryRequest::new(repository_name);
                let response = op("CreateRepository", client.create_repository(request).await)?;
                self.output.success(&format!("Created repository {}", repository_name));
                self.output.render(&response)
            }

            Command::DeleteLifecyclePolicy { repo } => {
                let response = op(
                    "DeleteLifecyclePolicy",
                    client.delete_lifecycle_policy(Self::lifecycle_request(repo)).await,
                )?;
                self.output.render(&response)
            }

            Command::DeleteRepository { repo, force } => {
                let mut request = DeleteRepositoryRequest::new(&repo.repository_name).with_force(*force);
                request.registry_id = repo.registry_id.clone();
                let response = op("DeleteRepository", client.delete_repository(request).await)?;
                self.output.success(&format!("Deleted repository {}", repo.repository_name));
                self.output.render(&response)
            }

            Command::DeleteRepositoryPolicy { repo } => {
                let response = op(
                    "DeleteRepositoryPolicy",
                    client.delete_repository_policy(Self::policy_request(repo)).await,
                )?;
                self.output.render(&response)
            }

            Command::DescribeImages {
                repo,
                image_ids,
                tag_status,
                page,
            } => {
                let request = DescribeImagesRequest {
                    registry_id: repo.registry_id.clone(),
                    repository_name: repo.repository_name.clone(),
                    image_ids: (!image_ids.is_empty()).then(|| image_ids.clone()),
                    next_token: page.next_token.clone(),
                    max_results: page.max_results,
                    filter: tag_status.clone().map(|tag_status| DescribeImagesFilter {
                        tag_status: Some(tag_status),
                    }),
                };
                if page.all {
                    let details = op("DescribeImages", client.describe_all_images(request).await)?;
                    self.output.render(&json!({ "imageDetails": details }))
                } else {
                    let response = op("DescribeImages", client.describe_images(request).await)?;
                    self.output.render(&response)
                }
            }

            Command::DescribeRepositories {
                registry_id,
                repository_names,
                page,
            } => {
                let request = DescribeRepositoriesRequest {
                    registry_id: registry_id.clone(),
                    repository_names: (!repository_names.is_empty()).then(|| repository_names.clone()),
                    next_token: page.next_token.clone(),
                    max_results: page.max_results,
                };
                if page.all {
                    let repositories = op(
                        "DescribeRepositories",
                        client.describe_all_repositories(request).await,
                    )?;
                    self.output.render(&json!({ "repositories": repositories }))
                } else {
                    let response = op("DescribeRepositories", client.describe_repositories(request).await)?;
                    self.output.render(&response)
                }
            }

            Command::GetAuthorizationToken { registry_ids } => {
                let response = op(
                    "GetAuthorizationToken",
                    client
                        .get_authorization_token(Self::token_request(registry_ids))
                        .await,
                )?;
                self.output.render(&response)
            }

            Command::GetDownloadUrlForLayer { repo, layer_digest } => {
                let mut request = GetDownloadUrlForLayerRequest::new(&repo.repository_name, layer_digest);
                request.registry_id = repo.registry_id.clone();
                let response = op("GetDownloadUrlForLayer", client.get_download_url_for_layer(request).await)?;
                self.output.render(&response)
            }

            Command::GetLifecyclePolicy { repo } => {
                let response = op(
                    "GetLifecyclePolicy",
                    client.get_lifecycle_policy(Self::lifecycle_request(repo)).await,
                )?;
                self.output.render(&response)
            }

            Command::GetRepositoryPolicy { repo } => {
                let response = op(
                    "GetRepositoryPolicy",
                    client.get_repository_policy(Self::policy_request(repo)).await,
                )?;
                self.output.render(&response)
            }

            Command::InitiateLayerUpload { repo } => {
                let mut request = InitiateLayerUploadRequest::new(&repo.repository_name);
                request.registry_id = repo.registry_id.clone();
                let response = op("InitiateLayerUpload", client.initiate_layer_upload(request).await)?;
                self.output.render(&response)
            }

            Command::ListImages {
                repo,
                tag_status,
                page,
            } => self.list_images(client, repo, tag_status.clone(), page).await,

            Command::PutImage {
                repo,
                manifest,
                image_tag,
            } => {
                let mut request = PutImageRequest::new(&repo.repository_name, manifest.read()?);
                request.registry_id = repo.registry_id.clone();
                if let Some(tag) = image_tag {
                    request = request.with_tag(tag);
                }
                let response = op("PutImage", client.put_image(request).await)?;
                self.output.render(&response)
            }

            Command::PutLifecyclePolicy { repo, policy } => {
                let mut request = PutLifecyclePolicyRequest::new(&repo.repository_name, policy.read()?);
                request.registry_id = repo.registry_id.clone();
                let response = op("PutLifecyclePolicy", client.put_lifecycle_policy(request).await)?;
                self.output.render(&response)
            }

            Command::SetRepositoryPolicy { repo, policy, force } => {
                let mut request = SetRepositoryPolicyRequest::new(&repo.repository_name, policy.read()?);
                request.registry_id = repo.registry_id.clone();
                request.force = force.then_some(true);
                let response = op("SetRepositoryPolicy", client.set_repository_policy(request).await)?;
                self.output.render(&response)
            }

            Command::UploadLayerPart {
                repo,
                upload_id,
                part_first_byte,
                blob_file,
            } => {
                let blob = tokio::fs::read(blob_file).await?;
                self.output.detail(&format!(
                    "Uploading {} from byte {}",
                    self.output.format_size(blob.len() as u64),
                    part_first_byte
                ));
                let mut request = UploadLayerPartRequest::new(&repo.repository_name, upload_id, *part_first_byte, blob);
                request.registry_id = repo.registry_id.clone();
                let response = op("UploadLayerPart", client.upload_layer_part(request).await)?;
                self.output.render(&response)
            }

            Command::UploadLayer {
                repo,
                blob_files,
                part_size,
                concurrency,
                force,
            } => {
                self.upload_layers(client, repo, blob_files, *part_size, *concurrency, *force)
                    .await
            }

            Command::GetLogin { registry_ids } => self.get_login(client, registry_ids).await,
        }
    }

    fn policy_request(repo: &RepositoryArgs) -> RepositoryPolicyRequest {
        RepositoryPolicyRequest {
            registry_id: repo.registry_id.clone(),
            repository_name: repo.repository_name.clone(),
        }
    }

    fn lifecycle_request(repo: &RepositoryArgs) -> LifecyclePolicyRequest {
        LifecyclePolicyRequest {
            registry_id: repo.registry_id.clone(),
            repository_name: repo.repository_name.clone(),
        }
    }

    fn token_request(registry_ids: &[String]) -> GetAuthorizationTokenRequest {
        GetAuthorizationTokenRequest {
            registry_ids: (!registry_ids.is_empty()).then(|| registry_ids.to_vec()),
        }
    }

    async fn list_images(
        &self,
        client: &RegistryClient,
        repo: &RepositoryArgs,
        tag_status: Option<TagStatus>,
        page: &PageArgs,
    ) -> Result<()> {
        let request = ListImagesRequest {
            registry_id: repo.registry_id.clone(),
            repository_name: repo.repository_name.clone(),
            next_token: page.next_token.clone(),
            max_results: page.max_results,
            filter: tag_status.map(|tag_status| ListImagesFilter {
                tag_status: Some(tag_status),
            }),
        };

        if page.all {
            let image_ids = op("ListImages", client.list_all_images(request).await)?;
            self.output.render(&json!({ "imageIds": image_ids }))
        } else {
            let response = op("ListImages", client.list_images(request).await)?;
            self.output.render(&response)
        }
    }

    fn report_failures(&self, failures: &[ImageFailure]) {
        for failure in failures {
            let id = failure
                .image_id
                .as_ref()
                .and_then(|id| id.image_tag.clone().or_else(|| id.image_digest.clone()))
                .unwrap_or_else(|| "<unknown>".to_string());
            self.output.warning(&format!(
                "{}: {}",
                id,
                failure.failure_reason.as_deref().unwrap_or("failed")
            ));
        }
    }

    async fn upload_layers(
        &self,
        client: &RegistryClient,
        repo: &RepositoryArgs,
        blob_files: &[PathBuf],
        part_size: Option<usize>,
        concurrency: usize,
        force: bool,
    ) -> Result<()> {
        let start = Instant::now();
        let mut uploader = LayerUploader::new(client.clone()).with_skip_existing(!force);
        if let Some(registry_id) = &repo.registry_id {
            uploader = uploader.with_registry_id(registry_id);
        }
        if let Some(part_size) = part_size {
            uploader = uploader.with_part_size(part_size);
        }
        let uploader = &uploader;

        let results: Vec<Result<(PathBuf, UploadOutcome)>> = stream::iter(blob_files.iter().cloned())
            .map(|path| async move {
                let data = tokio::fs::read(&path).await?;
                let outcome = uploader
                    .upload(&repo.repository_name, &data)
                    .await
                    .map_err(|e| ClientError::Operation {
                        operation: format!("Upload of {}", path.display()),
                        message: e.to_string(),
                    })?;
                Ok::<_, ClientError>((path, outcome))
            })
            .buffer_unordered(concurrency.max(1))
            .collect()
            .await;

        let mut outcomes = Vec::with_capacity(results.len());
        for result in results {
            let (path, outcome) = result?;
            if outcome.skipped {
                self.output.info(&format!("{} already exists ({})", outcome.digest, path.display()));
            } else {
                self.output.success(&format!(
                    "Uploaded {} as {} in {} part(s), {}",
                    path.display(),
                    outcome.digest,
                    outcome.parts,
                    self.output.format_duration(outcome.elapsed)
                ));
            }
            outcomes.push(json!({
                "file": path.display().to_string(),
                "layerDigest": outcome.digest,
                "size": outcome.size,
                "parts": outcome.parts,
                "skipped": outcome.skipped,
            }));
        }

        let uploaded = outcomes.iter().filter(|o| o["skipped"] == false).count();
        self.output.summary(
            "Upload summary",
            &[
                ("Repository", repo.repository_name.clone()),
                ("Layers uploaded", uploaded.to_string()),
                ("Layers skipped", (outcomes.len() - uploaded).to_string()),
                ("Total time", self.output.format_duration(start.elapsed())),
            ],
        );
        self.output.render(&json!({ "layers": outcomes }))
    }

    async fn get_login(&self, client: &RegistryClient, registry_ids: &[String]) -> Result<()> {
        let response = op(
            "GetAuthorizationToken",
            client
                .get_authorization_token(Self::token_request(registry_ids))
                .await,
        )?;

        for data in response.authorization_data.unwrap_or_default() {
            let credentials = data.decode_credentials().map_err(ClientError::Validation)?;
            let endpoint = credentials.endpoint.unwrap_or_default();
            if let Some(expires_at) = data.expires_at {
                self.output.detail(&format!("Token for {} expires at {}", endpoint, expires_at));
            }
            println!(
                "docker login -u {} -p {} {}",
                credentials.username, credentials.password, endpoint
            );
        }
        Ok(())
    }
}
