//! Turning failed HTTP responses into typed errors

use super::{RegistryError, ServiceError, UnknownError};
use crate::registry::transport::HttpResponse;
use serde::Deserialize;

/// Header carrying the error type when the body does not
const ERROR_TYPE_HEADER: &str = "x-amzn-errortype";

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(rename = "__type")]
    error_type: Option<String>,
    #[serde(alias = "Message", alias = "errorMessage")]
    message: Option<String>,
}

/// Standard handler for error responses of the JSON protocol
pub struct HttpErrorHandler;

impl HttpErrorHandler {
    /// Parse a non-2xx response into the operation's typed error, falling back
    /// to [`RegistryError::Unknown`] for codes outside its error set.
    pub fn parse_error<E: ServiceError>(response: &HttpResponse) -> RegistryError<E> {
        let body_text = String::from_utf8_lossy(&response.body).into_owned();
        let body: ErrorBody = serde_json::from_slice(&response.body).unwrap_or_default();

        let code = body
            .error_type
            .as_deref()
            .or_else(|| response.header(ERROR_TYPE_HEADER))
            .map(Self::normalize_code)
            .filter(|code| !code.is_empty());

        if let Some(code) = code.as_deref() {
            let message = body.message.clone().unwrap_or_default();
            if let Some(err) = E::from_code(code, message) {
                return RegistryError::Service(err);
            }
        }

        RegistryError::Unknown(UnknownError {
            status: response.status,
            code,
            message: body.message,
            body: body_text,
        })
    }

    /// Strip the `namespace#` prefix and `:detail` suffix from an error type,
    /// e.g. `com.amazonaws.ecr#RepositoryNotFoundException:http://...`
    pub fn normalize_code(raw: &str) -> String {
        let without_prefix = raw.rsplit('#').next().unwrap_or(raw);
        let without_suffix = without_prefix.split(':').next().unwrap_or(without_prefix);
        without_suffix.trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CreateRepositoryError, DeleteRepositoryError};
    use std::collections::BTreeMap;

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: BTreeMap::new(),
            body: body.as_bytes().to_vec(),
        }
    }

    #[test]
    fn test_normalize_code() {
        assert_eq!(
            HttpErrorHandler::normalize_code("com.amazonaws.ecr#RepositoryNotFoundException"),
            "RepositoryNotFoundException"
        );
        assert_eq!(
            HttpErrorHandler::normalize_code("LimitExceededException:http://internal.amazon.com/"),
            "LimitExceededException"
        );
        assert_eq!(HttpErrorHandler::normalize_code("ServerException"), "ServerException");
    }

    #[test]
    fn test_typed_error_from_body() {
        let resp = response(
            400,
            r#"{"__type":"RepositoryAlreadyExistsException","message":"The repository with name 'app' already exists"}"#,
        );
        match HttpErrorHandler::parse_error::<CreateRepositoryError>(&resp) {
            RegistryError::Service(CreateRepositoryError::RepositoryAlreadyExists(message)) => {
                assert_eq!(message, "The repository with name 'app' already exists");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_capitalized_message_field() {
        let resp = response(
            400,
            r#"{"__type":"com.amazonaws.ecr#RepositoryNotEmptyException","Message":"has images"}"#,
        );
        let err = HttpErrorHandler::parse_error::<DeleteRepositoryError>(&resp);
        assert!(matches!(
            err,
            RegistryError::Service(DeleteRepositoryError::RepositoryNotEmpty(ref m)) if m == "has images"
        ));
    }

    #[test]
    fn test_error_type_header_fallback() {
        let mut resp = response(500, "");
        resp.headers.insert(
            "x-amzn-errortype".to_string(),
            "ServerException:http://internal.amazon.com/".to_string(),
        );
        let err = HttpErrorHandler::parse_error::<CreateRepositoryError>(&resp);
        assert!(matches!(err, RegistryError::Service(CreateRepositoryError::Server(_))));
    }

    #[test]
    fn test_unlisted_code_is_unknown() {
        let resp = response(400, r#"{"__type":"ThrottlingException","message":"Rate exceeded"}"#);
        match HttpErrorHandler::parse_error::<CreateRepositoryError>(&resp) {
            RegistryError::Unknown(unknown) => {
                assert_eq!(unknown.status, 400);
                assert_eq!(unknown.code.as_deref(), Some("ThrottlingException"));
                assert_eq!(unknown.message.as_deref(), Some("Rate exceeded"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_non_json_body_is_unknown() {
        let resp = response(502, "<html>Bad Gateway</html>");
        match HttpErrorHandler::parse_error::<CreateRepositoryError>(&resp) {
            RegistryError::Unknown(unknown) => {
                assert_eq!(unknown.code, None);
                assert_eq!(unknown.body, "<html>Bad Gateway</html>");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
