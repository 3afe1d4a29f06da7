//! JSON extractor that also runs `validator::Validate`
//!
//! Malformed JSON is answered with 400, values that fail validation with
//! 422. Nested errors are flattened into dotted paths such as
//! `tax_rules.hourly_prices[0].end_hour`.

use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use super::ApiResponse;

/// Like `axum::Json<T>`, but `T` is guaranteed to pass validation.
pub struct ValidatedJson<T>(pub T);

pub enum ValidatedJsonRejection {
    JsonError(JsonRejection),
    ValidationError(ValidationErrors),
}

impl IntoResponse for ValidatedJsonRejection {
    fn into_response(self) -> Response {
        match self {
            Self::JsonError(rejection) => {
                let body = ApiResponse::<()>::error(format!("Invalid JSON: {}", rejection));
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            Self::ValidationError(errors) => {
                let mut messages = Vec::new();
                flatten_errors("", &errors, &mut messages);
                messages.sort();

                let message = if messages.is_empty() {
                    "Validation failed".to_string()
                } else {
                    messages.join("; ")
                };

                let body = ApiResponse::<()>::error(message);
                (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
            }
        }
    }
}

fn flatten_errors(prefix: &str, errors: &ValidationErrors, out: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };
        match kind {
            ValidationErrorsKind::Field(errs) => {
                for e in errs {
                    let msg = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string());
                    out.push(format!("{}: {}", path, msg));
                }
            }
            ValidationErrorsKind::Struct(inner) => flatten_errors(&path, inner, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    flatten_errors(&format!("{}[{}]", path, index), inner, out);
                }
            }
        }
    }
}

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidatedJsonRejection;

    async fn from_request(
        req: axum::extract::Request,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(ValidatedJsonRejection::JsonError)?;

        value
            .validate()
            .map_err(ValidatedJsonRejection::ValidationError)?;

        Ok(ValidatedJson(value))
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::routing::post;
    use axum::Router;
    use serde::Deserialize;
    use tower::ServiceExt;

    use crate::domain::TaxRule;

    #[derive(Debug, Deserialize, Validate)]
    struct RulesBody {
        #[validate(length(max = 3))]
        dates: Vec<String>,
        #[validate(nested)]
        #[serde(default)]
        tax_rules: TaxRule,
    }

    async fn handler(ValidatedJson(body): ValidatedJson<RulesBody>) -> String {
        body.dates.len().to_string()
    }

    async fn send(body: impl Into<Body>) -> (StatusCode, serde_json::Value) {
        let app = Router::new().route("/rules", post(handler));
        let req = Request::builder()
            .method("POST")
            .uri("/rules")
            .header("content-type", "application/json")
            .body(body.into())
            .unwrap();

        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn valid_body_passes_through() {
        let body = serde_json::json!({"dates": ["a", "b"]});
        let (status, _) = send(serde_json::to_vec(&body).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn invalid_json_returns_400() {
        let (status, json) = send("not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);
    }

    #[tokio::test]
    async fn nested_rule_errors_carry_their_path() {
        let body = serde_json::json!({
            "dates": [],
            "tax_rules": {
                "hourly_prices": [{"start_hour": 6, "end_hour": 24, "rate": 8}],
                "excluded_months": [13]
            }
        });
        let (status, json) = send(serde_json::to_vec(&body).unwrap()).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let error = json["error"].as_str().unwrap();
        assert!(error.contains("tax_rules.hourly_prices[0].end_hour"), "{error}");
        assert!(error.contains("tax_rules.excluded_months"), "{error}");
    }

    #[tokio::test]
    async fn too_many_dates_returns_422() {
        let body = serde_json::json!({"dates": ["a", "b", "c", "d"]});
        let (status, json) = send(serde_json::to_vec(&body).unwrap()).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(json["error"].as_str().unwrap().starts_with("dates:"));
    }
}
