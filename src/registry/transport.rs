//! HTTP transport for registry API calls
//!
//! Requests are built as [`SignedRequest`] values, signed by
//! [`crate::registry::signing`], then handed to an [`HttpDispatch`] implementation. The
//! default dispatcher uses `reqwest`; tests plug in their own.

use async_trait::async_trait;
use reqwest::Client;
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Transport-level failure: connection, TLS, timeout, body read
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct HttpDispatchError {
    message: String,
}

impl HttpDispatchError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for HttpDispatchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            HttpDispatchError::new(format!("Request timed out: {}", err))
        } else if err.is_connect() {
            HttpDispatchError::new(format!("Connection failed: {}", err))
        } else {
            HttpDispatchError::new(err.to_string())
        }
    }
}

/// An HTTP request ready to be signed and sent
#[derive(Debug, Clone)]
pub struct SignedRequest {
    pub method: String,
    pub endpoint: Url,
    pub path: String,
    pub query: BTreeMap<String, String>,
    /// Lower-cased header names
    pub headers: BTreeMap<String, String>,
    pub payload: Vec<u8>,
}

impl SignedRequest {
    pub fn new(method: &str, endpoint: Url, path: &str) -> Self {
        Self {
            method: method.to_string(),
            endpoint,
            path: path.to_string(),
            query: BTreeMap::new(),
            headers: BTreeMap::new(),
            payload: Vec::new(),
        }
    }

    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn set_payload(&mut self, payload: Vec<u8>) {
        self.payload = payload;
    }

    /// Value of the `host` header as the HTTP client will send it
    pub fn host(&self) -> String {
        let host = self.endpoint.host_str().unwrap_or_default();
        match self.endpoint.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        }
    }

    /// Full request URL
    pub fn url(&self) -> Url {
        let mut url = self.endpoint.clone();
        url.set_path(&self.path);
        if self.query.is_empty() {
            url.set_query(None);
        } else {
            let mut pairs = url.query_pairs_mut();
            pairs.clear();
            for (key, value) in &self.query {
                pairs.append_pair(key, value);
            }
        }
        url
    }
}

/// A buffered HTTP response
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    /// Lower-cased header names
    pub headers: BTreeMap<String, String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

/// Sends a signed request and buffers the response
#[async_trait]
pub trait HttpDispatch: Send + Sync {
    async fn dispatch(&self, request: SignedRequest) -> Result<HttpResponse, HttpDispatchError>;
}

/// Default dispatcher backed by `reqwest`
#[derive(Debug, Clone)]
pub struct ReqwestDispatcher {
    client: Client,
}

impl ReqwestDispatcher {
    pub fn new(
        timeout: Duration,
        connect_timeout: Duration,
        skip_tls: bool,
        user_agent: &str,
    ) -> Result<Self, HttpDispatchError> {
        let mut builder = Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .user_agent(user_agent);

        if skip_tls {
            builder = builder
                .danger_accept_invalid_certs(true)
                .danger_accept_invalid_hostnames(true);
        }

        let client = builder
            .build()
            .map_err(|e| HttpDispatchError::new(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpDispatch for ReqwestDispatcher {
    async fn dispatch(&self, request: SignedRequest) -> Result<HttpResponse, HttpDispatchError> {
        let method = reqwest::Method::from_bytes(request.method.as_bytes())
            .map_err(|e| HttpDispatchError::new(format!("Invalid HTTP method: {}", e)))?;

        let mut builder = self.client.request(method, request.url());
        for (name, value) in &request.headers {
            // reqwest derives the host header from the URL
            if name == "host" {
                continue;
            }
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.body(request.payload).send().await?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_ascii_lowercase(), v.to_string()))
            })
            .collect();
        let body = response.bytes().await?.to_vec();

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
