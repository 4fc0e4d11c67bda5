//! Credentials used to sign registry requests

use async_trait::async_trait;
use aws_config::environment::credentials::EnvironmentVariableCredentialsProvider;
use aws_config::profile::ProfileFileCredentialsProvider;
use aws_config::profile::profile_file::{ProfileFileKind, ProfileFiles};
use aws_credential_types::Credentials as SdkCredentials;
use aws_credential_types::provider::ProvideCredentials as _;
use aws_credential_types::provider::error::CredentialsError as SdkCredentialsError;
use chrono::{DateTime, Utc};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CredentialsError {
    #[error("Missing credentials: {0}")]
    Missing(String),

    #[error("Credentials expired at {0}")]
    Expired(DateTime<Utc>),

    #[error("Credentials provider failed: {0}")]
    Provider(String),
}

/// Access key pair with an optional session token
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    access_key_id: String,
    secret_access_key: String,
    session_token: Option<String>,
    expires_at: Option<DateTime<Utc>>,
}

impl Credentials {
    pub fn new(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        session_token: Option<String>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token,
            expires_at,
        }
    }

    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    pub fn secret_access_key(&self) -> &str {
        &self.secret_access_key
    }

    pub fn session_token(&self) -> Option<&str> {
        self.session_token.as_deref()
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| at <= Utc::now())
    }
}

// Keep the secret out of logs
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"** redacted **")
            .field("session_token", &self.session_token.as_ref().map(|_| "** redacted **"))
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Source of signing credentials
#[async_trait]
pub trait ProvideCredentials: Send + Sync {
    async fn credentials(&self) -> Result<Credentials, CredentialsError>;
}

#[async_trait]
impl<P: ProvideCredentials + ?Sized> ProvideCredentials for Arc<P> {
    async fn credentials(&self) -> Result<Credentials, CredentialsError> {
        (**self).credentials().await
    }
}

/// Fixed credentials
#[derive(Debug, Clone)]
pub struct StaticProvider {
    credentials: Credentials,
}

impl StaticProvider {
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            credentials: Credentials::new(access_key_id, secret_access_key, None, None),
        }
    }

    pub fn from_credentials(credentials: Credentials) -> Self {
        Self { credentials }
    }
}

#[async_trait]
impl ProvideCredentials for StaticProvider {
    async fn credentials(&self) -> Result<Credentials, CredentialsError> {
        if self.credentials.is_expired() {
            if let Some(at) = self.credentials.expires_at() {
                return Err(CredentialsError::Expired(at));
            }
        }
        Ok(self.credentials.clone())
    }
}

/// Credentials from `AWS_ACCESS_KEY_ID` / `AWS_SECRET_ACCESS_KEY` / `AWS_SESSION_TOKEN`
#[derive(Debug)]
pub struct EnvironmentProvider {
    inner: EnvironmentVariableCredentialsProvider,
}

impl EnvironmentProvider {
    pub fn new() -> Self {
        Self {
            inner: EnvironmentVariableCredentialsProvider::new(),
        }
    }
}

impl Default for EnvironmentProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProvideCredentials for EnvironmentProvider {
    async fn credentials(&self) -> Result<Credentials, CredentialsError> {
        let credentials = self.inner.provide_credentials().await?;
        Ok(credentials.into())
    }
}

/// Credentials from a profile in the shared credentials file
#[derive(Debug)]
pub struct ProfileProvider {
    inner: ProfileFileCredentialsProvider,
    profile: Option<String>,
}

impl ProfileProvider {
    /// `AWS_SHARED_CREDENTIALS_FILE` (or `~/.aws/credentials`) and
    /// `AWS_PROFILE` (or `default`)
    pub fn new() -> Self {
        Self {
            inner: ProfileFileCredentialsProvider::builder().build(),
            profile: None,
        }
    }

    /// Named profile from the default files
    pub fn with_profile(profile: impl Into<String>) -> Self {
        let profile = profile.into();
        Self {
            inner: ProfileFileCredentialsProvider::builder()
                .profile_name(profile.clone())
                .build(),
            profile: Some(profile),
        }
    }

    /// Named profile from a specific credentials file only
    pub fn with_path_and_profile(path: impl Into<PathBuf>, profile: impl Into<String>) -> Self {
        let profile = profile.into();
        let files = ProfileFiles::builder()
            .with_file(ProfileFileKind::Credentials, path.into())
            .build();
        Self {
            inner: ProfileFileCredentialsProvider::builder()
                .profile_files(files)
                .profile_name(profile.clone())
                .build(),
            profile: Some(profile),
        }
    }

    /// Profile name, when one was set explicitly
    pub fn profile(&self) -> Option<&str> {
        self.profile.as_deref()
    }
}

impl Default for ProfileProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProvideCredentials for ProfileProvider {
    async fn credentials(&self) -> Result<Credentials, CredentialsError> {
        let credentials = self.inner.provide_credentials().await?;
        Ok(credentials.into())
    }
}

impl From<SdkCredentials> for Credentials {
    fn from(credentials: SdkCredentials) -> Self {
        Credentials::new(
            credentials.access_key_id(),
            credentials.secret_access_key(),
            credentials.session_token().map(str::to_string),
            credentials.expiry().map(DateTime::<Utc>::from),
        )
    }
}

impl From<SdkCredentialsError> for CredentialsError {
    fn from(err: SdkCredentialsError) -> Self {
        let mut message = err.to_string();
        if let Some(source) = std::error::Error::source(&err) {
            message = format!("{}: {}", message, source);
        }
        match err {
            SdkCredentialsError::CredentialsNotLoaded(_) => CredentialsError::Missing(message),
            _ => CredentialsError::Provider(message),
        }
    }
}

/// Environment first, then the shared credentials file
pub struct ChainProvider {
    providers: Vec<Box<dyn ProvideCredentials>>,
}

impl ChainProvider {
    pub fn new() -> Self {
        Self {
            providers: vec![Box::new(EnvironmentProvider::new()), Box::new(ProfileProvider::new())],
        }
    }

    /// Chain using a named profile for the file lookup
    pub fn with_profile(profile: &str) -> Self {
        Self {
            providers: vec![
                Box::new(EnvironmentProvider::new()),
                Box::new(ProfileProvider::with_profile(profile)),
            ],
        }
    }

    pub fn from_providers(providers: Vec<Box<dyn ProvideCredentials>>) -> Self {
        Self { providers }
    }
}

impl Default for ChainProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProvideCredentials for ChainProvider {
    async fn credentials(&self) -> Result<Credentials, CredentialsError> {
        let mut failures = Vec::new();
        for provider in &self.providers {
            match provider.credentials().await {
                Ok(credentials) => return Ok(credentials),
                Err(err) => {
                    tracing::debug!(error = %err, "credentials provider skipped");
                    failures.push(err.to_string());
                }
            }
        }
        Err(CredentialsError::Missing(format!(
            "no provider in chain returned credentials ({})",
            failures.join("; ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::io::Write;

    const SAMPLE: &str = "\
# comment
[default]
aws_access_key_id = AKIDDEFAULT
aws_secret_access_key = secretdefault

[ci]
aws_access_key_id=AKIDCI
aws_secret_access_key=secretci
aws_session_token=tokenci
";

    fn sample_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_profile_provider_reads_named_profile() {
        let file = sample_file();
        let provider = ProfileProvider::with_path_and_profile(file.path(), "ci");
        assert_eq!(provider.profile(), Some("ci"));

        let creds = provider.credentials().await.unwrap();
        assert_eq!(creds.access_key_id(), "AKIDCI");
        assert_eq!(creds.secret_access_key(), "secretci");
        assert_eq!(creds.session_token(), Some("tokenci"));
    }

    #[tokio::test]
    async fn test_profile_provider_default_profile() {
        let file = sample_file();
        let provider = ProfileProvider::with_path_and_profile(file.path(), "default");
        let creds = provider.credentials().await.unwrap();
        assert_eq!(creds.access_key_id(), "AKIDDEFAULT");
        assert_eq!(creds.session_token(), None);
    }

    #[tokio::test]
    async fn test_profile_provider_missing_profile() {
        let file = sample_file();
        let provider = ProfileProvider::with_path_and_profile(file.path(), "prod");
        assert!(provider.credentials().await.is_err());
    }

    #[test]
    fn test_sdk_credentials_conversion_keeps_expiry() {
        let expiry = std::time::UNIX_EPOCH + std::time::Duration::from_secs(1_700_000_000);
        let sdk = SdkCredentials::new("AKID", "secret", Some("token".to_string()), Some(expiry), "test");
        let creds = Credentials::from(sdk);
        assert_eq!(creds.access_key_id(), "AKID");
        assert_eq!(creds.session_token(), Some("token"));
        assert_eq!(creds.expires_at().unwrap().timestamp(), 1_700_000_000);
        assert!(creds.is_expired());
    }

    #[tokio::test]
    async fn test_static_provider_rejects_expired() {
        let expired = Utc::now() - Duration::minutes(5);
        let provider = StaticProvider::from_credentials(Credentials::new(
            "AKID",
            "secret",
            None,
            Some(expired),
        ));
        assert_eq!(provider.credentials().await, Err(CredentialsError::Expired(expired)));
    }

    #[tokio::test]
    async fn test_chain_falls_through_to_next_provider() {
        let missing = ProfileProvider::with_path_and_profile("/nonexistent/credentials", "default");
        let chain = ChainProvider::from_providers(vec![
            Box::new(missing),
            Box::new(StaticProvider::new("AKIDSTATIC", "secret")),
        ]);
        assert_eq!(chain.credentials().await.unwrap().access_key_id(), "AKIDSTATIC");
    }

    #[test]
    fn test_debug_redacts_secret() {
        let creds = Credentials::new("AKID", "supersecret", Some("token".to_string()), None);
        let debug = format!("{:?}", creds);
        assert!(debug.contains("AKID"));
        assert!(!debug.contains("supersecret"));
        assert!(!debug.contains("token\""));
    }
}
