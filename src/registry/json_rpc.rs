//! JSON 1.1 request/response glue shared by every operation

use super::credentials::{CredentialsError, ProvideCredentials};
use super::region::{Region, SERVICE_NAME};
use super::signing;
use super::transport::{HttpDispatch, SignedRequest};
use crate::error::handlers::HttpErrorHandler;
use crate::error::{OperationResult, RegistryError, ServiceError};
use crate::model::Validate;
use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{Instrument, debug, debug_span, warn};
use url::Url;

pub const TARGET_PREFIX: &str = "AmazonEC2ContainerRegistry_V20150921";
pub const CONTENT_TYPE: &str = "application/x-amz-json-1.1";

/// Signs and dispatches JSON 1.1 calls against one endpoint
pub struct JsonRpc {
    region: Region,
    endpoint: Url,
    user_agent: String,
    credentials: Arc<dyn ProvideCredentials>,
    dispatcher: Arc<dyn HttpDispatch>,
}

impl JsonRpc {
    pub fn new(
        region: Region,
        endpoint: Url,
        user_agent: impl Into<String>,
        credentials: Arc<dyn ProvideCredentials>,
        dispatcher: Arc<dyn HttpDispatch>,
    ) -> Self {
        Self {
            region,
            endpoint,
            user_agent: user_agent.into(),
            credentials,
            dispatcher,
        }
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Validate, sign and send `request` as `operation`, then parse the
    /// response body or the operation's typed error.
    pub async fn call<Req, Resp, E>(&self, operation: &str, request: &Req) -> OperationResult<Resp, E>
    where
        Req: Serialize + Validate + ?Sized,
        Resp: DeserializeOwned,
        E: ServiceError,
    {
        let span = debug_span!("ecr_call", operation, region = self.region.name());
        self.call_inner(operation, request).instrument(span).await
    }

    async fn call_inner<Req, Resp, E>(&self, operation: &str, request: &Req) -> OperationResult<Resp, E>
    where
        Req: Serialize + Validate + ?Sized,
        Resp: DeserializeOwned,
        E: ServiceError,
    {
        request.validate().map_err(RegistryError::Validation)?;

        let payload = serde_json::to_vec(request)?;
        let mut signed = SignedRequest::new("POST", self.endpoint.clone(), "/");
        signed.set_header("content-type", CONTENT_TYPE);
        signed.set_header("x-amz-target", format!("{}.{}", TARGET_PREFIX, operation));
        signed.set_header("user-agent", self.user_agent.as_str());
        signed.set_payload(payload);

        let credentials = self.credentials.credentials().await?;
        if let Some(at) = credentials.expires_at().filter(|_| credentials.is_expired()) {
            return Err(CredentialsError::Expired(at).into());
        }
        signing::sign_request(
            &mut signed,
            &credentials,
            self.region.name(),
            SERVICE_NAME,
            Utc::now(),
        );

        debug!(endpoint = %self.endpoint, "Dispatching request");
        let response = self.dispatcher.dispatch(signed).await?;
        debug!(status = response.status, bytes = response.body.len(), "Received response");

        if !response.is_success() {
            let err = HttpErrorHandler::parse_error::<E>(&response);
            warn!(status = response.status, error = %err, "{} failed", operation);
            return Err(err);
        }

        let body: &[u8] = if response.body.iter().all(u8::is_ascii_whitespace) {
            b"{}"
        } else {
            &response.body
        };
        serde_json::from_slice(body)
            .map_err(|e| RegistryError::Parse(format!("{} response: {}", operation, e)))
    }
}
