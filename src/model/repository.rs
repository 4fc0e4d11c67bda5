//! Repository and repository-policy operations

use super::types::Repository;
use super::validation::{self, Validate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRepositoryRequest {
    pub repository_name: String,
}

impl CreateRepositoryRequest {
    pub fn new(repository_name: impl Into<String>) -> Self {
        Self {
            repository_name: repository_name.into(),
        }
    }
}

impl Validate for CreateRepositoryRequest {
    fn validate(&self) -> Result<(), String> {
        validation::repository_name(&self.repository_name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateRepositoryResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository: Option<Repository>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteRepositoryRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry_id: Option<String>,
    pub repository_name: String,
    /// Delete even if the repository still contains images
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force: Option<bool>,
}

impl DeleteRepositoryRequest {
    pub fn new(repository_name: impl Into<String>) -> Self {
        Self {
            repository_name: repository_name.into(),
            ..Default::default()
        }
    }

    pub fn with_force(mut self, force: bool) -> Self {
        self.force = Some(force);
        self
    }
}

impl Validate for DeleteRepositoryRequest {
    fn validate(&self) -> Result<(), String> {
        validation::registry_id(self.registry_id.as_deref())?;
        validation::repository_name(&self.repository_name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeleteRepositoryResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository: Option<Repository>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DescribeRepositoriesRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry_id: Option<String>,
    /// All repositories in the registry when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository_names: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<i32>,
}

impl Validate for DescribeRepositoriesRequest {
    fn validate(&self) -> Result<(), String> {
        validation::registry_id(self.registry_id.as_deref())?;
        validation::max_results(self.max_results)?;
        if let Some(names) = &self.repository_names {
            validation::batch_size("repositoryNames", names, validation::MAX_BATCH_SIZE)?;
            for name in names {
                validation::repository_name(name)?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DescribeRepositoriesResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repositories: Option<Vec<Repository>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

/// Shared request shape of `GetRepositoryPolicy` and `DeleteRepositoryPolicy`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryPolicyRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry_id: Option<String>,
    pub repository_name: String,
}

impl RepositoryPolicyRequest {
    pub fn new(repository_name: impl Into<String>) -> Self {
        Self {
            registry_id: None,
            repository_name: repository_name.into(),
        }
    }
}

impl Validate for RepositoryPolicyRequest {
    fn validate(&self) -> Result<(), String> {
        validation::registry_id(self.registry_id.as_deref())?;
        validation::repository_name(&self.repository_name)
    }
}

pub type GetRepositoryPolicyRequest = RepositoryPolicyRequest;
pub type DeleteRepositoryPolicyRequest = RepositoryPolicyRequest;

/// Shared response shape of the repository-policy operations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RepositoryPolicyResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository_name: Option<String>,
    /// JSON policy document
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy_text: Option<String>,
}

pub type GetRepositoryPolicyResponse = RepositoryPolicyResponse;
pub type DeleteRepositoryPolicyResponse = RepositoryPolicyResponse;
pub type SetRepositoryPolicyResponse = RepositoryPolicyResponse;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetRepositoryPolicyRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry_id: Option<String>,
    pub repository_name: String,
    pub policy_text: String,
    /// Skip the lockout check that prevents removing the caller's own access
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force: Option<bool>,
}

impl SetRepositoryPolicyRequest {
    pub fn new(repository_name: impl Into<String>, policy_text: impl Into<String>) -> Self {
        Self {
            repository_name: repository_name.into(),
            policy_text: policy_text.into(),
            ..Default::default()
        }
    }
}

impl Validate for SetRepositoryPolicyRequest {
    fn validate(&self) -> Result<(), String> {
        validation::registry_id(self.registry_id.as_deref())?;
        validation::repository_name(&self.repository_name)?;
        validation::required("policyText", &self.policy_text)
    }
}
