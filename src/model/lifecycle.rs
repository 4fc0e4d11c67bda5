//! Lifecycle policy operations

use super::serde_ext::epoch_seconds_opt;
use super::validation::{self, Validate};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Shared request shape of `GetLifecyclePolicy` and `DeleteLifecyclePolicy`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifecyclePolicyRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry_id: Option<String>,
    pub repository_name: String,
}

impl LifecyclePolicyRequest {
    pub fn new(repository_name: impl Into<String>) -> Self {
        Self {
            registry_id: None,
            repository_name: repository_name.into(),
        }
    }
}

impl Validate for LifecyclePolicyRequest {
    fn validate(&self) -> Result<(), String> {
        validation::registry_id(self.registry_id.as_deref())?;
        validation::repository_name(&self.repository_name)
    }
}

pub type GetLifecyclePolicyRequest = LifecyclePolicyRequest;
pub type DeleteLifecyclePolicyRequest = LifecyclePolicyRequest;

/// Shared response shape of `GetLifecyclePolicy` and `DeleteLifecyclePolicy`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LifecyclePolicyResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lifecycle_policy_text: Option<String>,
    #[serde(with = "epoch_seconds_opt", skip_serializing_if = "Option::is_none")]
    pub last_evaluated_at: Option<DateTime<Utc>>,
}

pub type GetLifecyclePolicyResponse = LifecyclePolicyResponse;
pub type DeleteLifecyclePolicyResponse = LifecyclePolicyResponse;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PutLifecyclePolicyRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry_id: Option<String>,
    pub repository_name: String,
    pub lifecycle_policy_text: String,
}

impl PutLifecyclePolicyRequest {
    pub fn new(repository_name: impl Into<String>, lifecycle_policy_text: impl Into<String>) -> Self {
        Self {
            registry_id: None,
            repository_name: repository_name.into(),
            lifecycle_policy_text: lifecycle_policy_text.into(),
        }
    }
}

impl Validate for PutLifecyclePolicyRequest {
    fn validate(&self) -> Result<(), String> {
        validation::registry_id(self.registry_id.as_deref())?;
        validation::repository_name(&self.repository_name)?;
        validation::required("lifecyclePolicyText", &self.lifecycle_policy_text)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PutLifecyclePolicyResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lifecycle_policy_text: Option<String>,
}
