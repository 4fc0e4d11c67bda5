//! Registry client and its builder

use super::credentials::{ChainProvider, ProvideCredentials, StaticProvider};
use super::executor::AsyncExecutor;
use super::json_rpc::JsonRpc;
use super::operations::ContainerRegistry;
use super::region::Region;
use super::transport::{HttpDispatch, ReqwestDispatcher};
use crate::config::ClientConfig;
use crate::error::{
    ClientError, DescribeImagesError, DescribeRepositoriesError, ListImagesError,
    OperationResult, Result,
};
use crate::model::{
    DescribeImagesRequest, DescribeRepositoriesRequest, ImageDetail, ImageIdentifier,
    ListImagesRequest, Repository,
};
use std::future::Future;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::debug;
use url::Url;

pub struct RegistryClientBuilder {
    config: ClientConfig,
    region: Option<Region>,
    credentials: Option<Arc<dyn ProvideCredentials>>,
    dispatcher: Option<Arc<dyn HttpDispatch>>,
    runtime: Option<Handle>,
}

impl RegistryClientBuilder {
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
            region: None,
            credentials: None,
            dispatcher: None,
            runtime: None,
        }
    }

    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Takes precedence over the region and endpoint in the config
    pub fn with_region(mut self, region: Region) -> Self {
        self.region = Some(region);
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_credentials<P>(mut self, provider: P) -> Self
    where
        P: ProvideCredentials + 'static,
    {
        self.credentials = Some(Arc::new(provider));
        self
    }

    pub fn with_static_credentials(
        self,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
    ) -> Self {
        self.with_credentials(StaticProvider::new(access_key_id, secret_access_key))
    }

    pub fn with_timeout(mut self, timeout: u64) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn with_skip_tls(mut self, skip_tls: bool) -> Self {
        self.config.skip_tls = skip_tls;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Replace the `reqwest` transport, e.g. with a test double
    pub fn with_dispatcher<D>(mut self, dispatcher: D) -> Self
    where
        D: HttpDispatch + 'static,
    {
        self.dispatcher = Some(Arc::new(dispatcher));
        self
    }

    /// Runtime that `spawn` and `submit` put calls on
    pub fn with_runtime(mut self, handle: Handle) -> Self {
        self.runtime = Some(handle);
        self
    }

    pub fn build(self) -> Result<RegistryClient> {
        self.config.validate()?;

        let region = match (self.region, &self.config.endpoint) {
            (Some(region), Some(endpoint)) => Region::Custom {
                name: region.name().to_string(),
                endpoint: Some(endpoint.clone()),
            },
            (Some(region), None) => region,
            (None, _) => self.config.resolve_region()?,
        };
        let endpoint = region.endpoint()?;

        let credentials: Arc<dyn ProvideCredentials> = match self.credentials {
            Some(credentials) => credentials,
            None => match &self.config.profile {
                Some(profile) => Arc::new(ChainProvider::with_profile(profile)),
                None => Arc::new(ChainProvider::new()),
            },
        };

        let dispatcher: Arc<dyn HttpDispatch> = match self.dispatcher {
            Some(dispatcher) => dispatcher,
            None => Arc::new(
                ReqwestDispatcher::new(
                    self.config.timeout_duration(),
                    self.config.connect_timeout_duration(),
                    self.config.skip_tls,
                    &self.config.user_agent,
                )
                .map_err(|e| ClientError::Config(e.to_string()))?,
            ),
        };

        let executor = self.runtime.map(AsyncExecutor::new);

        debug!(region = region.name(), endpoint = %endpoint, "Built registry client");

        Ok(RegistryClient {
            rpc: Arc::new(JsonRpc::new(
                region,
                endpoint,
                self.config.user_agent,
                credentials,
                dispatcher,
            )),
            executor,
        })
    }
}

impl Default for RegistryClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Client for the container registry API.
///
/// Cheap to clone; clones share the transport and credentials provider.
/// See [`ContainerRegistry`] for the operations.
#[derive(Clone)]
pub struct RegistryClient {
    rpc: Arc<JsonRpc>,
    executor: Option<AsyncExecutor>,
}

impl RegistryClient {
    /// Client for `region` with credentials from the default chain
    pub fn new(region: Region) -> Result<Self> {
        Self::builder().with_region(region).build()
    }

    pub fn from_config(config: ClientConfig) -> Result<Self> {
        Self::builder().with_config(config).build()
    }

    pub fn builder() -> RegistryClientBuilder {
        RegistryClientBuilder::new()
    }

    pub fn region(&self) -> &Region {
        self.rpc.region()
    }

    pub fn endpoint(&self) -> &Url {
        self.rpc.endpoint()
    }

    pub(crate) fn rpc(&self) -> &JsonRpc {
        &self.rpc
    }

    fn executor(&self) -> Result<AsyncExecutor> {
        match &self.executor {
            Some(executor) => Ok(executor.clone()),
            None => AsyncExecutor::current(),
        }
    }

    /// Run a call on the worker pool and return its handle.
    ///
    /// ```no_run
    /// # use ecr_client::{ContainerRegistry, RegistryClient, Region};
    /// # use ecr_client::model::CreateRepositoryRequest;
    /// # async fn demo(client: RegistryClient) -> ecr_client::error::Result<()> {
    /// let handle = client.spawn(|c| async move {
    ///     c.create_repository(CreateRepositoryRequest::new("app")).await
    /// })?;
    /// let created = handle.await;
    /// # Ok(())
    /// # }
    /// ```
    pub fn spawn<F, Fut>(&self, call: F) -> Result<JoinHandle<Fut::Output>>
    where
        F: FnOnce(RegistryClient) -> Fut,
        Fut: Future + Send + 'static,
        Fut::Output: Send + 'static,
    {
        let executor = self.executor()?;
        Ok(executor.spawn(call(self.clone())))
    }

    /// Run a call on the worker pool and pass its result to `on_complete`
    pub fn submit<F, Fut, C>(&self, call: F, on_complete: C) -> Result<JoinHandle<()>>
    where
        F: FnOnce(RegistryClient) -> Fut,
        Fut: Future + Send + 'static,
        Fut::Output: Send + 'static,
        C: FnOnce(Fut::Output) + Send + 'static,
    {
        let executor = self.executor()?;
        Ok(executor.submit(call(self.clone()), on_complete))
    }

    /// All repositories matching `request`, following `nextToken`
    pub async fn describe_all_repositories(
        &self,
        mut request: DescribeRepositoriesRequest,
    ) -> OperationResult<Vec<Repository>, DescribeRepositoriesError> {
        let mut repositories = Vec::new();
        loop {
            let page = self.describe_repositories(request.clone()).await?;
            repositories.extend(page.repositories.unwrap_or_default());
            match page.next_token {
                Some(token) if !token.is_empty() => request.next_token = Some(token),
                _ => return Ok(repositories),
            }
        }
    }

    /// All image ids matching `request`, following `nextToken`
    pub async fn list_all_images(
        &self,
        mut request: ListImagesRequest,
    ) -> OperationResult<Vec<ImageIdentifier>, ListImagesError> {
        let mut image_ids = Vec::new();
        loop {
            let page = self.list_images(request.clone()).await?;
            image_ids.extend(page.image_ids.unwrap_or_default());
            match page.next_token {
                Some(token) if !token.is_empty() => request.next_token = Some(token),
                _ => return Ok(image_ids),
            }
        }
    }

    /// All image details matching `request`, following `nextToken`
    pub async fn describe_all_images(
        &self,
        mut request: DescribeImagesRequest,
    ) -> OperationResult<Vec<ImageDetail>, DescribeImagesError> {
        let mut details = Vec::new();
        loop {
            let page = self.describe_images(request.clone()).await?;
            details.extend(page.image_details.unwrap_or_default());
            match page.next_token {
                Some(token) if !token.is_empty() => request.next_token = Some(token),
                _ => return Ok(details),
            }
        }
    }
}

impl std::fmt::Debug for RegistryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryClient")
            .field("region", self.region())
            .field("endpoint", &self.endpoint().as_str())
            .finish()
    }
}
