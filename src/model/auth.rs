//! `GetAuthorizationToken` and docker login credentials

use super::serde_ext::epoch_seconds_opt;
use super::validation::{self, Validate};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GetAuthorizationTokenRequest {
    /// Token for the caller's default registry when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry_ids: Option<Vec<String>>,
}

impl Validate for GetAuthorizationTokenRequest {
    fn validate(&self) -> Result<(), String> {
        if let Some(ids) = &self.registry_ids {
            validation::batch_size("registryIds", ids, validation::MAX_REGISTRY_IDS)?;
            for id in ids {
                validation::registry_id(Some(id))?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GetAuthorizationTokenResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorization_data: Option<Vec<AuthorizationData>>,
}

/// A registry login token
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuthorizationData {
    /// base64 of `user:password`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorization_token: Option<String>,
    #[serde(with = "epoch_seconds_opt", skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    /// `https://<registry>.dkr.ecr.<region>.amazonaws.com`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy_endpoint: Option<String>,
}

/// Decoded docker login credentials
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DockerCredentials {
    pub username: String,
    pub password: String,
    pub endpoint: Option<String>,
}

impl AuthorizationData {
    /// Decode the token into a username/password pair for `docker login`
    pub fn decode_credentials(&self) -> Result<DockerCredentials, String> {
        let token = self
            .authorization_token
            .as_deref()
            .ok_or_else(|| "authorization data has no token".to_string())?;
        let decoded = STANDARD
            .decode(token.as_bytes())
            .map_err(|e| format!("authorization token is not valid base64: {}", e))?;
        let decoded = String::from_utf8(decoded)
            .map_err(|e| format!("authorization token is not valid UTF-8: {}", e))?;
        let (username, password) = decoded
            .split_once(':')
            .ok_or_else(|| "authorization token is not in user:password form".to_string())?;

        Ok(DockerCredentials {
            username: username.to_string(),
            password: password.to_string(),
            endpoint: self.proxy_endpoint.clone(),
        })
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| at <= Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_credentials() {
        let resp: GetAuthorizationTokenResponse = serde_json::from_value(json!({
            "authorizationData": [{
                "authorizationToken": STANDARD.encode("AWS:s3cr3t:with:colons"),
                "expiresAt": 4.1E9,
                "proxyEndpoint": "https://123456789012.dkr.ecr.us-east-1.amazonaws.com"
            }]
        }))
        .unwrap();

        let data = &resp.authorization_data.unwrap()[0];
        assert!(!data.is_expired());
        let creds = data.decode_credentials().unwrap();
        assert_eq!(creds.username, "AWS");
        assert_eq!(creds.password, "s3cr3t:with:colons");
        assert_eq!(
            creds.endpoint.as_deref(),
            Some("https://123456789012.dkr.ecr.us-east-1.amazonaws.com")
        );
    }

    #[test]
    fn test_decode_rejects_malformed_token() {
        let data = AuthorizationData {
            authorization_token: Some(STANDARD.encode("no-separator")),
            ..Default::default()
        };
        assert!(data.decode_credentials().is_err());
        assert!(AuthorizationData::default().decode_credentials().is_err());
    }

    #[test]
    fn test_registry_ids_validation() {
        let req = GetAuthorizationTokenRequest {
            registry_ids: Some(vec!["123456789012".to_string()]),
        };
        assert!(req.validate().is_ok());
        assert_eq!(serde_json::to_value(&req).unwrap(), json!({"registryIds": ["123456789012"]}));

        let too_many = GetAuthorizationTokenRequest {
            registry_ids: Some(vec!["123456789012".to_string(); 11]),
        };
        assert!(too_many.validate().is_err());
        assert_eq!(serde_json::to_value(GetAuthorizationTokenRequest::default()).unwrap(), json!({}));
    }
}
