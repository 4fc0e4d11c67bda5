//! Regions and endpoint construction

use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use url::Url;

/// Service name used in the signing scope and endpoint host
pub const SERVICE_NAME: &str = "ecr";

/// A region hosting the registry API
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Region {
    #[default]
    UsEast1,
    UsEast2,
    UsWest1,
    UsWest2,
    CaCentral1,
    EuWest1,
    EuWest2,
    EuWest3,
    EuCentral1,
    EuNorth1,
    ApNortheast1,
    ApNortheast2,
    ApSoutheast1,
    ApSoutheast2,
    ApSouth1,
    SaEast1,
    CnNorth1,
    CnNorthwest1,
    UsGovWest1,
    /// Any other region name, optionally served from a fixed endpoint
    Custom { name: String, endpoint: Option<String> },
}

impl Region {
    pub fn name(&self) -> &str {
        match self {
            Region::UsEast1 => "us-east-1",
            Region::UsEast2 => "us-east-2",
            Region::UsWest1 => "us-west-1",
            Region::UsWest2 => "us-west-2",
            Region::CaCentral1 => "ca-central-1",
            Region::EuWest1 => "eu-west-1",
            Region::EuWest2 => "eu-west-2",
            Region::EuWest3 => "eu-west-3",
            Region::EuCentral1 => "eu-central-1",
            Region::EuNorth1 => "eu-north-1",
            Region::ApNortheast1 => "ap-northeast-1",
            Region::ApNortheast2 => "ap-northeast-2",
            Region::ApSoutheast1 => "ap-southeast-1",
            Region::ApSoutheast2 => "ap-southeast-2",
            Region::ApSouth1 => "ap-south-1",
            Region::SaEast1 => "sa-east-1",
            Region::CnNorth1 => "cn-north-1",
            Region::CnNorthwest1 => "cn-northwest-1",
            Region::UsGovWest1 => "us-gov-west-1",
            Region::Custom { name, .. } => name,
        }
    }

    /// Regional API endpoint, e.g. `https://api.ecr.us-east-1.amazonaws.com`
    pub fn endpoint(&self) -> Result<Url, url::ParseError> {
        if let Region::Custom {
            endpoint: Some(endpoint),
            ..
        } = self
        {
            return Url::parse(endpoint);
        }

        let name = self.name();
        let suffix = if name.starts_with("cn-") {
            "amazonaws.com.cn"
        } else {
            "amazonaws.com"
        };
        Url::parse(&format!("https://api.{}.{}.{}", SERVICE_NAME, name, suffix))
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Region name is empty or malformed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid region name: '{0}'")]
pub struct ParseRegionError(String);

impl FromStr for Region {
    type Err = ParseRegionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        let region = match name.as_str() {
            "us-east-1" => Region::UsEast1,
            "us-east-2" => Region::UsEast2,
            "us-west-1" => Region::UsWest1,
            "us-west-2" => Region::UsWest2,
            "ca-central-1" => Region::CaCentral1,
            "eu-west-1" => Region::EuWest1,
            "eu-west-2" => Region::EuWest2,
            "eu-west-3" => Region::EuWest3,
            "eu-central-1" => Region::EuCentral1,
            "eu-north-1" => Region::EuNorth1,
            "ap-northeast-1" => Region::ApNortheast1,
            "ap-northeast-2" => Region::ApNortheast2,
            "ap-southeast-1" => Region::ApSoutheast1,
            "ap-southeast-2" => Region::ApSoutheast2,
            "ap-south-1" => Region::ApSouth1,
            "sa-east-1" => Region::SaEast1,
            "cn-north-1" => Region::CnNorth1,
            "cn-northwest-1" => Region::CnNorthwest1,
            "us-gov-west-1" => Region::UsGovWest1,
            other => {
                let valid = !other.is_empty()
                    && other
                        .chars()
                        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
                if !valid {
                    return Err(ParseRegionError(s.to_string()));
                }
                Region::Custom {
                    name: other.to_string(),
                    endpoint: None,
                }
            }
        };
        Ok(region)
    }
}
