//! Per-operation service error sets
//!
//! Each enum lists exactly the exceptions the service documents for one
//! operation. `ServerException` and `InvalidParameterException` are shared by
//! every operation.

use super::ServiceError;
use std::fmt;

macro_rules! operation_error {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $code:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub enum $name {
            /// Server-side failure
            Server(String),
            /// A parameter was rejected by the service
            InvalidParameter(String),
            $( $(#[$vmeta])* $variant(String), )+
        }

        impl ServiceError for $name {
            fn from_code(code: &str, message: String) -> Option<Self> {
                match code {
                    "ServerException" => Some($name::Server(message)),
                    "InvalidParameterException" => Some($name::InvalidParameter(message)),
                    $( $code => Some($name::$variant(message)), )+
                    _ => None,
                }
            }

            fn code(&self) -> &'static str {
                match self {
                    $name::Server(_) => "ServerException",
                    $name::InvalidParameter(_) => "InvalidParameterException",
                    $( $name::$variant(_) => $code, )+
                }
            }

            fn message(&self) -> &str {
                match self {
                    $name::Server(message) | $name::InvalidParameter(message) => message.as_str(),
                    $( $name::$variant(message) => message.as_str(), )+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.message().is_empty() {
                    write!(f, "{}", self.code())
                } else {
                    write!(f, "{}: {}", self.code(), self.message())
                }
            }
        }

        impl std::error::Error for $name {}
    };
    (
        $(#[$meta:meta])*
        $name:ident {}
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub enum $name {
            /// Server-side failure
            Server(String),
            /// A parameter was rejected by the service
            InvalidParameter(String),
        }

        impl ServiceError for $name {
            fn from_code(code: &str, message: String) -> Option<Self> {
                match code {
                    "ServerException" => Some($name::Server(message)),
                    "InvalidParameterException" => Some($name::InvalidParameter(message)),
                    _ => None,
                }
            }

            fn code(&self) -> &'static str {
                match self {
                    $name::Server(_) => "ServerException",
                    $name::InvalidParameter(_) => "InvalidParameterException",
                }
            }

            fn message(&self) -> &str {
                match self {
                    $name::Server(message) | $name::InvalidParameter(message) => message.as_str(),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.message().is_empty() {
                    write!(f, "{}", self.code())
                } else {
                    write!(f, "{}: {}", self.code(), self.message())
                }
            }
        }

        impl std::error::Error for $name {}
    };
}

operation_error! {
    /// Errors returned by `BatchCheckLayerAvailability`
    BatchCheckLayerAvailabilityError {
        RepositoryNotFound => "RepositoryNotFoundException",
    }
}

operation_error! {
    /// Errors returned by `BatchDeleteImage`
    BatchDeleteImageError {
        RepositoryNotFound => "RepositoryNotFoundException",
    }
}

operation_error! {
    /// Errors returned by `BatchGetImage`
    BatchGetImageError {
        RepositoryNotFound => "RepositoryNotFoundException",
    }
}

operation_error! {
    /// Errors returned by `CompleteLayerUpload`
    CompleteLayerUploadError {
        RepositoryNotFound => "RepositoryNotFoundException",
        /// The upload ID is unknown or has expired
        UploadNotFound => "UploadNotFoundException",
        /// The layer digest does not match the uploaded content
        InvalidLayer => "InvalidLayerException",
        LayerPartTooSmall => "LayerPartTooSmallException",
        LayerAlreadyExists => "LayerAlreadyExistsException",
        /// No parts were uploaded before completion
        EmptyUpload => "EmptyUploadException",
    }
}

operation_error! {
    /// Errors returned by `CreateRepository`
    CreateRepositoryError {
        RepositoryAlreadyExists => "RepositoryAlreadyExistsException",
        LimitExceeded => "LimitExceededException",
    }
}

operation_error! {
    /// Errors returned by `DeleteRepository`
    DeleteRepositoryError {
        RepositoryNotFound => "RepositoryNotFoundException",
        /// The repository still holds images and `force` was not set
        RepositoryNotEmpty => "RepositoryNotEmptyException",
    }
}

operation_error! {
    /// Errors returned by `DeleteRepositoryPolicy`
    DeleteRepositoryPolicyError {
        RepositoryNotFound => "RepositoryNotFoundException",
        RepositoryPolicyNotFound => "RepositoryPolicyNotFoundException",
    }
}

operation_error! {
    /// Errors returned by `DescribeImages`
    DescribeImagesError {
        RepositoryNotFound => "RepositoryNotFoundException",
        ImageNotFound => "ImageNotFoundException",
    }
}

operation_error! {
    /// Errors returned by `DescribeRepositories`
    DescribeRepositoriesError {
        RepositoryNotFound => "RepositoryNotFoundException",
    }
}

operation_error! {
    /// Errors returned by `GetAuthorizationToken`
    GetAuthorizationTokenError {}
}

operation_error! {
    /// Errors returned by `GetDownloadUrlForLayer`
    GetDownloadUrlForLayerError {
        LayersNotFound => "LayersNotFoundException",
        LayerInaccessible => "LayerInaccessibleException",
        RepositoryNotFound => "RepositoryNotFoundException",
    }
}

operation_error! {
    /// Errors returned by `GetRepositoryPolicy`
    GetRepositoryPolicyError {
        RepositoryNotFound => "RepositoryNotFoundException",
        RepositoryPolicyNotFound => "RepositoryPolicyNotFoundException",
    }
}

operation_error! {
    /// Errors returned by `InitiateLayerUpload`
    InitiateLayerUploadError {
        RepositoryNotFound => "RepositoryNotFoundException",
    }
}

operation_error! {
    /// Errors returned by `ListImages`
    ListImagesError {
        RepositoryNotFound => "RepositoryNotFoundException",
    }
}

operation_error! {
    /// Errors returned by `PutImage`
    PutImageError {
        RepositoryNotFound => "RepositoryNotFoundException",
        ImageAlreadyExists => "ImageAlreadyExistsException",
        LayersNotFound => "LayersNotFoundException",
        LimitExceeded => "LimitExceededException",
    }
}

operation_error! {
    /// Errors returned by `SetRepositoryPolicy`
    SetRepositoryPolicyError {
        RepositoryNotFound => "RepositoryNotFoundException",
    }
}

operation_error! {
    /// Errors returned by `UploadLayerPart`
    UploadLayerPartError {
        /// Part ranges are out of order or overlap
        InvalidLayerPart => "InvalidLayerPartException",
        RepositoryNotFound => "RepositoryNotFoundException",
        UploadNotFound => "UploadNotFoundException",
        LimitExceeded => "LimitExceededException",
    }
}

operation_error! {
    /// Errors returned by `GetLifecyclePolicy`
    GetLifecyclePolicyError {
        RepositoryNotFound => "RepositoryNotFoundException",
        LifecyclePolicyNotFound => "LifecyclePolicyNotFoundException",
    }
}

operation_error! {
    /// Errors returned by `PutLifecyclePolicy`
    PutLifecyclePolicyError {
        RepositoryNotFound => "RepositoryNotFoundException",
    }
}

operation_error! {
    /// Errors returned by `DeleteLifecyclePolicy`
    DeleteLifecyclePolicyError {
        RepositoryNotFound => "RepositoryNotFoundException",
        LifecyclePolicyNotFound => "LifecyclePolicyNotFoundException",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes_map_to_variants() {
        let err = CreateRepositoryError::from_code(
            "RepositoryAlreadyExistsException",
            "The repository already exists".to_string(),
        );
        assert_eq!(
            err,
            Some(CreateRepositoryError::RepositoryAlreadyExists(
                "The repository already exists".to_string()
            ))
        );
    }

    #[test]
    fn test_shared_codes_apply_to_every_operation() {
        assert!(matches!(
            GetAuthorizationTokenError::from_code("ServerException", String::new()),
            Some(GetAuthorizationTokenError::Server(_))
        ));
        assert!(matches!(
            PutImageError::from_code("InvalidParameterException", String::new()),
            Some(PutImageError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_code_outside_set_is_rejected() {
        assert!(CreateRepositoryError::from_code("RepositoryNotFoundException", String::new()).is_none());
        assert!(GetAuthorizationTokenError::from_code("ThrottlingException", String::new()).is_none());
    }

    #[test]
    fn test_display_includes_code_and_message() {
        let err = UploadLayerPartError::UploadNotFound("upload abc expired".to_string());
        assert_eq!(err.to_string(), "UploadNotFoundException: upload abc expired");
        assert_eq!(err.code(), "UploadNotFoundException");
        assert_eq!(err.message(), "upload abc expired");

        let bare = DeleteRepositoryError::RepositoryNotEmpty(String::new());
        assert_eq!(bare.to_string(), "RepositoryNotEmptyException");
    }
}
