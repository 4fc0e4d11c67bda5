//! Client-side checks of the constraints the service documents for its inputs

use regex::Regex;
use std::sync::LazyLock;

static REPOSITORY_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[a-z0-9]+(?:[._-][a-z0-9]+)*/)*[a-z0-9]+(?:[._-][a-z0-9]+)*$")
        .expect("repository name pattern is valid")
});

static REGISTRY_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{12}$").expect("registry id pattern is valid"));

pub const MIN_REPOSITORY_NAME_LEN: usize = 2;
pub const MAX_REPOSITORY_NAME_LEN: usize = 256;
pub const MAX_RESULTS_LIMIT: i32 = 1000;
pub const MAX_BATCH_SIZE: usize = 100;
pub const MAX_REGISTRY_IDS: usize = 10;

/// Request-level validation run before anything is sent
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

pub fn repository_name(name: &str) -> Result<(), String> {
    let len = name.chars().count();
    if !(MIN_REPOSITORY_NAME_LEN..=MAX_REPOSITORY_NAME_LEN).contains(&len) {
        return Err(format!(
            "repositoryName must be between {} and {} characters, got {}",
            MIN_REPOSITORY_NAME_LEN, MAX_REPOSITORY_NAME_LEN, len
        ));
    }
    if !REPOSITORY_NAME.is_match(name) {
        return Err(format!("repositoryName '{}' has an invalid format", name));
    }
    Ok(())
}

pub fn registry_id(id: Option<&str>) -> Result<(), String> {
    match id {
        Some(id) if !REGISTRY_ID.is_match(id) => {
            Err(format!("registryId '{}' must be a 12-digit account ID", id))
        }
        _ => Ok(()),
    }
}

pub fn max_results(value: Option<i32>) -> Result<(), String> {
    match value {
        Some(n) if !(1..=MAX_RESULTS_LIMIT).contains(&n) => Err(format!(
            "maxResults must be between 1 and {}, got {}",
            MAX_RESULTS_LIMIT, n
        )),
        _ => Ok(()),
    }
}

pub fn batch_size<T>(field: &str, items: &[T], max: usize) -> Result<(), String> {
    if items.is_empty() || items.len() > max {
        return Err(format!(
            "{} must contain between 1 and {} entries, got {}",
            field,
            max,
            items.len()
        ));
    }
    Ok(())
}

pub fn required(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{} is required", field));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_names() {
        assert!(repository_name("app").is_ok());
        assert!(repository_name("team/service-a").is_ok());
        assert!(repository_name("a.b_c-d/e").is_ok());

        assert!(repository_name("a").is_err());
        assert!(repository_name("App").is_err());
        assert!(repository_name("team//svc").is_err());
        assert!(repository_name("svc-").is_err());
        assert!(repository_name(&"a".repeat(257)).is_err());
    }

    #[test]
    fn test_registry_id() {
        assert!(registry_id(None).is_ok());
        assert!(registry_id(Some("123456789012")).is_ok());
        assert!(registry_id(Some("12345")).is_err());
        assert!(registry_id(Some("12345678901a")).is_err());
    }

    #[test]
    fn test_max_results_bounds() {
        assert!(max_results(None).is_ok());
        assert!(max_results(Some(1)).is_ok());
        assert!(max_results(Some(1000)).is_ok());
        assert!(max_results(Some(0)).is_err());
        assert!(max_results(Some(1001)).is_err());
    }

    #[test]
    fn test_batch_size() {
        assert!(batch_size::<u8>("imageIds", &[], MAX_BATCH_SIZE).is_err());
        assert!(batch_size("imageIds", &[0u8; 100], MAX_BATCH_SIZE).is_ok());
        assert!(batch_size("imageIds", &[0u8; 101], MAX_BATCH_SIZE).is_err());
    }
}
