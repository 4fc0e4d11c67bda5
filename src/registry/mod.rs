//! Registry module for the container registry API
//!
//! This module provides the client and everything under it: credential
//! providers, Signature V4 signing, region endpoints, the HTTP transport and
//! the JSON 1.1 call glue.

pub mod client;
pub mod credentials;
pub mod executor;
pub mod json_rpc;
pub mod operations;
pub mod region;
pub mod signing;
pub mod transport;

pub use client::{RegistryClient, RegistryClientBuilder};
pub use credentials::{
    ChainProvider, Credentials, CredentialsError, EnvironmentProvider, ProfileProvider,
    ProvideCredentials, StaticProvider,
};
pub use executor::AsyncExecutor;
pub use operations::ContainerRegistry;
pub use region::Region;
pub use transport::{HttpDispatch, HttpDispatchError, HttpResponse, ReqwestDispatcher, SignedRequest};
