//! Serde adapters for the JSON protocol's non-native encodings

/// Timestamps travel as epoch seconds, possibly fractional
pub mod epoch_seconds_opt {
    use chrono::{DateTime, TimeZone, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(time) => {
                let seconds = time.timestamp() as f64
                    + f64::from(time.timestamp_subsec_millis()) / 1000.0;
                serializer.serialize_f64(seconds)
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let seconds = Option::<f64>::deserialize(deserializer)?;
        match seconds {
            Some(seconds) => {
                let millis = (seconds * 1000.0).round() as i64;
                Utc.timestamp_millis_opt(millis)
                    .single()
                    .map(Some)
                    .ok_or_else(|| serde::de::Error::custom(format!("timestamp out of range: {}", seconds)))
            }
            None => Ok(None),
        }
    }
}

/// Binary payloads travel as base64 strings
pub mod base64_blob {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&STANDARD.encode(value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded.as_bytes()).map_err(serde::de::Error::custom)
    }
}

/// String-valued enum that keeps values it does not know about
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $value:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
            /// A value added to the service after this client was written
            Unknown(String),
        }

        impl $name {
            pub fn as_str(&self) -> &str {
                match self {
                    $( $name::$variant => $value, )+
                    $name::Unknown(value) => value.as_str(),
                }
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                match value {
                    $( $value => $name::$variant, )+
                    other => $name::Unknown(other.to_string()),
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = std::convert::Infallible;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok($name::from(s))
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let value = String::deserialize(deserializer)?;
                Ok($name::from(value.as_str()))
            }
        }
    };
}

pub(crate) use string_enum;

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Stamped {
        #[serde(default, with = "super::epoch_seconds_opt", skip_serializing_if = "Option::is_none")]
        at: Option<DateTime<Utc>>,
    }

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Blob {
        #[serde(with = "super::base64_blob")]
        data: Vec<u8>,
    }

    #[test]
    fn test_fractional_epoch_seconds() {
        let parsed: Stamped = serde_json::from_str(r#"{"at":1.479920486E9}"#).unwrap();
        assert_eq!(parsed.at, Some(Utc.timestamp_opt(1_479_920_486, 0).unwrap()));

        let parsed: Stamped = serde_json::from_str(r#"{"at":1700000000.25}"#).unwrap();
        assert_eq!(parsed.at.unwrap().timestamp_subsec_millis(), 250);
    }

    #[test]
    fn test_missing_timestamp_is_omitted() {
        let parsed: Stamped = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed.at, None);
        assert_eq!(serde_json::to_string(&parsed).unwrap(), "{}");
    }

    #[test]
    fn test_blob_is_base64() {
        let blob = Blob {
            data: b"layer bytes".to_vec(),
        };
        assert_eq!(
            serde_json::to_string(&blob).unwrap(),
            r#"{"data":"bGF5ZXIgYnl0ZXM="}"#
        );
        assert!(serde_json::from_str::<Blob>(r#"{"data":"not base64!"}"#).is_err());
    }
}
