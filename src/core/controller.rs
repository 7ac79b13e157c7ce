use std::sync::Arc;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use tracing::error;
use crate::catalog::domain::CatalogService;
use crate::catalog::factory;
use crate::core::command::CommandError;
use crate::core::domain::Configuration;

// store and runtime details are logged, never sent to clients
const DATABASE_FAILURE: &str = "database failure";
const SERVICE_UNAVAILABLE: &str = "service temporarily unavailable";
const INTERNAL_FAILURE: &str = "internal failure";

#[derive(Clone)]
pub struct AppState {
    pub(crate) catalog_service: Arc<dyn CatalogService>,
}

impl AppState {
    pub async fn new(config: &Configuration) -> AppState {
        AppState {
            catalog_service: factory::create_catalog_service(config).await,
        }
    }
}

// ErrorResponse is the uniform body of every failed request that carries a body
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub errors: Vec<String>,
}

// ServerError renders as its status alone when there are no messages, e.g. not-found.
#[derive(Debug)]
pub struct ServerError {
    pub status: StatusCode,
    pub errors: Vec<String>,
}

impl ServerError {
    pub fn new(status: StatusCode, errors: Vec<String>) -> Self {
        ServerError { status, errors }
    }

    pub fn bad_request(message: &str) -> Self {
        ServerError::new(StatusCode::BAD_REQUEST, vec![message.to_string()])
    }

    pub fn not_found() -> Self {
        ServerError::new(StatusCode::NOT_FOUND, vec![])
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        if self.errors.is_empty() {
            self.status.into_response()
        } else {
            (self.status, Json(ErrorResponse { errors: self.errors })).into_response()
        }
    }
}

impl From<CommandError> for ServerError {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::Database { message, .. } => {
                error!(reason = message.as_str(), "database failure");
                ServerError::new(StatusCode::INTERNAL_SERVER_ERROR, vec![DATABASE_FAILURE.to_string()])
            }
            CommandError::DuplicateKey { message } => {
                ServerError::new(StatusCode::CONFLICT, vec![message])
            }
            CommandError::NotFound { .. } => {
                ServerError::not_found()
            }
            CommandError::Runtime { message, retryable, .. } => {
                error!(reason = message.as_str(), retryable, "runtime failure");
                if retryable {
                    ServerError::new(StatusCode::SERVICE_UNAVAILABLE, vec![SERVICE_UNAVAILABLE.to_string()])
                } else {
                    ServerError::new(StatusCode::INTERNAL_SERVER_ERROR, vec![INTERNAL_FAILURE.to_string()])
                }
            }
            CommandError::Serialization { message } => {
                ServerError::new(StatusCode::BAD_REQUEST, vec![message])
            }
            CommandError::Validation { messages } => {
                ServerError::new(StatusCode::BAD_REQUEST, messages)
            }
            CommandError::BusinessRule { message } => {
                ServerError::new(StatusCode::BAD_REQUEST, vec![message])
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::header::CONTENT_TYPE;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use crate::core::command::CommandError;
    use crate::core::controller::ServerError;
    use crate::core::library::LibraryError;

    #[tokio::test]
    async fn test_should_map_business_rule_to_bad_request() {
        let err = ServerError::from(CommandError::BusinessRule { message: "ISBN already exists".to_string() });
        assert_eq!(StatusCode::BAD_REQUEST, err.status);
        assert_eq!(vec!["ISBN already exists".to_string()], err.errors);
    }

    #[tokio::test]
    async fn test_should_map_validation_to_bad_request() {
        let err = ServerError::from(CommandError::Validation {
            messages: vec!["title must not be empty".to_string(), "isbn must not be empty".to_string()]
        });
        assert_eq!(StatusCode::BAD_REQUEST, err.status);
        assert_eq!(2, err.errors.len());
    }

    #[tokio::test]
    async fn test_should_map_failures_to_server_errors() {
        let err = ServerError::from(CommandError::Database { message: "down".to_string(), reason_code: None, retryable: false });
        assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, err.status);
        let err = ServerError::from(CommandError::Runtime { message: "throttled".to_string(), reason_code: None, retryable: true });
        assert_eq!(StatusCode::SERVICE_UNAVAILABLE, err.status);
    }

    #[tokio::test]
    async fn test_should_map_rejected_ddb_request_to_server_error() {
        let err = ServerError::from(CommandError::from(
            LibraryError::database_or_unavailable("ResourceNotFoundException", Some("400 Bad Request".to_string()), false)));
        assert!(err.status.is_server_error());
        assert_eq!(vec!["database failure".to_string()], err.errors);
    }

    #[tokio::test]
    async fn test_should_map_throttled_ddb_request_to_unavailable() {
        let err = ServerError::from(CommandError::from(
            LibraryError::database_or_unavailable("ProvisionedThroughputExceededException", None, true)));
        assert_eq!(StatusCode::SERVICE_UNAVAILABLE, err.status);
        assert!(!err.errors[0].contains("ProvisionedThroughputExceededException"));
    }

    #[tokio::test]
    async fn test_should_render_not_found_without_body() {
        let response = ServerError::from(CommandError::NotFound { message: "missing".to_string() }).into_response();
        assert_eq!(StatusCode::NOT_FOUND, response.status());
        assert!(response.headers().get(CONTENT_TYPE).is_none());
    }

    #[tokio::test]
    async fn test_should_render_errors_as_json() {
        let response = ServerError::bad_request("ISBN already exists").into_response();
        assert_eq!(StatusCode::BAD_REQUEST, response.status());
        assert_eq!("application/json", response.headers().get(CONTENT_TYPE).expect("content type"));
    }
}
