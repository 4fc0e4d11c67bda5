//! Typed async client for the Amazon ECR JSON API
//!
//! Each remote operation has a request struct, a response struct and a fixed
//! set of typed errors. [`RegistryClient`] signs requests with Signature V4,
//! posts them to the regional endpoint and parses the reply. The operations
//! live on the [`ContainerRegistry`] trait.
//!
//! ```no_run
//! use ecr_client::{ContainerRegistry, Region, RegistryClient};
//! use ecr_client::model::DescribeRepositoriesRequest;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let client = RegistryClient::new(Region::EuWest1)?;
//! let page = client
//!     .describe_repositories(DescribeRepositoriesRequest::default())
//!     .await?;
//! for repo in page.repositories.unwrap_or_default() {
//!     println!("{:?}", repo.repository_uri);
//! }
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod digest;
pub mod error;
pub mod logging;
pub mod model;
pub mod output;
pub mod registry;
pub mod upload;

pub use config::{ClientConfig, ConfigOverlay};
pub use error::{ClientError, OperationResult, RegistryError, Result, ServiceError};
pub use output::{OutputFormat, OutputManager};
pub use registry::{
    AsyncExecutor, ContainerRegistry, Credentials, ProvideCredentials, Region, RegistryClient,
    RegistryClientBuilder,
};
pub use upload::LayerUploader;
