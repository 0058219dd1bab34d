use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::Method,
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Environment;
use crate::error::ApiError;

/// Creates the complete middleware stack for the application
pub fn create_middleware_stack() -> ServiceBuilder<
    tower::layer::util::Stack<
        TimeoutLayer,
        tower::layer::util::Stack<
            CorsLayer,
            tower::layer::util::Stack<
                TraceLayer<
                    tower_http::classify::SharedClassifier<tower_http::classify::ServerErrorsAsFailures>,
                    DefaultMakeSpan,
                    DefaultOnRequest,
                    DefaultOnResponse,
                >,
                tower::layer::util::Identity,
            >,
        >,
    >,
> {
    ServiceBuilder::new()
        // Request/response logging with tracing
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // CORS configuration for cross-origin requests
        .layer(create_cors_layer())
        // Request timeout handling (30 seconds)
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
}

/// Creates CORS layer configuration
fn create_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
        .allow_credentials(false)
}

/// Initialize structured logging. Production gets JSON output for log
/// aggregation; local runs get compact human-readable lines.
pub fn init_tracing(environment: &Environment) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    if environment.is_production() {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_span_list(true)
                    .with_target(true),
            )
            .try_init()?;
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().compact())
            .try_init()?;
    }

    Ok(())
}

/// Declares which body fields a request payload requires. Checked by
/// `ValidatedJson` before the payload is deserialized.
pub trait RequiredFields {
    const REQUIRED: &'static [&'static str];
}

/// Checks a parsed JSON body for required fields. A field is missing when it
/// is absent, `null`, or an empty string; the first missing field
/// short-circuits with a validation error naming it. Numeric zero and
/// `false` count as present.
pub fn require_fields(body: &Value, fields: &[&str]) -> Result<(), ApiError> {
    for field in fields {
        let missing = match body.get(field) {
            None | Some(Value::Null) => true,
            Some(Value::String(s)) => s.is_empty(),
            Some(_) => false,
        };

        if missing {
            return Err(ApiError::validation(format!("Missing field: {}", field)));
        }
    }

    Ok(())
}

/// JSON extractor that runs the required-field check before deserializing,
/// so handlers behind it never see an incomplete body.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + RequiredFields,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let value = match Json::<Value>::from_request(req, state).await {
            Ok(Json(value)) => value,
            // A body-less or non-JSON request behaves like an empty object,
            // so the client still gets the missing-field message.
            Err(JsonRejection::MissingJsonContentType(_)) => Value::Object(Default::default()),
            Err(rejection) => {
                return Err(ApiError::validation(format!("Invalid JSON body: {}", rejection)))
            }
        };

        require_fields(&value, T::REQUIRED)?;

        let payload = serde_json::from_value(value)
            .map_err(|err| ApiError::validation(format!("Invalid request body: {}", err)))?;

        Ok(ValidatedJson(payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::CreateUserRequest;
    use axum::body::Body;
    use axum::http::header;
    use serde_json::json;

    #[test]
    fn test_require_fields_all_present() {
        let body = json!({ "user_id": 1, "description": "Run 5k", "points": 10 });
        assert!(require_fields(&body, &["user_id", "description", "points"]).is_ok());
    }

    #[test]
    fn test_require_fields_absent_field() {
        let body = json!({ "user_id": 1 });
        let err = require_fields(&body, &["user_id", "description", "points"]).unwrap_err();
        match err {
            ApiError::Validation(message) => assert_eq!(message, "Missing field: description"),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_require_fields_null_and_empty_string_are_missing() {
        let body = json!({ "username": null });
        assert!(require_fields(&body, &["username"]).is_err());

        let body = json!({ "username": "" });
        assert!(require_fields(&body, &["username"]).is_err());
    }

    #[test]
    fn test_require_fields_zero_and_false_are_present() {
        let body = json!({ "points": 0, "active": false });
        assert!(require_fields(&body, &["points", "active"]).is_ok());
    }

    #[test]
    fn test_require_fields_names_first_missing_field() {
        let body = json!({});
        let err = require_fields(&body, &["user_id", "details"]).unwrap_err();
        match err {
            ApiError::Validation(message) => assert_eq!(message, "Missing field: user_id"),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    fn json_request(body: &str) -> Request {
        Request::builder()
            .method("POST")
            .uri("/users")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_validated_json_accepts_complete_body() {
        let req = json_request(r#"{"username":"alice"}"#);

        let ValidatedJson(payload) =
            ValidatedJson::<CreateUserRequest>::from_request(req, &())
                .await
                .expect("complete body should extract");

        assert_eq!(payload.username, "alice");
    }

    #[tokio::test]
    async fn test_validated_json_rejects_missing_field() {
        let req = json_request(r#"{}"#);

        let err = ValidatedJson::<CreateUserRequest>::from_request(req, &())
            .await
            .err()
            .expect("empty body should be rejected");

        match err {
            ApiError::Validation(message) => assert_eq!(message, "Missing field: username"),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_validated_json_treats_missing_body_as_empty_object() {
        let req = Request::builder()
            .method("POST")
            .uri("/users")
            .body(Body::empty())
            .unwrap();

        let err = ValidatedJson::<CreateUserRequest>::from_request(req, &())
            .await
            .err()
            .expect("body-less request should be rejected");

        match err {
            ApiError::Validation(message) => assert_eq!(message, "Missing field: username"),
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}
