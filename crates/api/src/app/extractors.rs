//! Request validator: content-type check, JSON object body extraction and
//! record ids taken from the path.
//!
//! Runs before any handler touches the store, so a rejected request never
//! reaches persistence.

use core::str::FromStr;

use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::{header::CONTENT_TYPE, request::Parts, HeaderMap, StatusCode},
};
use serde_json::{Map, Value};

use trivia_core::DomainError;

use crate::app::errors::ApiError;

/// A single record id from the path, e.g. `/questions/:question_id`.
///
/// Anything that does not decode to an id is a route that cannot match: 404.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PathId<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequestParts<S> for PathId<T>
where
    S: Send + Sync,
    T: FromStr<Err = DomainError> + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::not_found())?;
        Ok(Self(raw.parse()?))
    }
}

/// A JSON object body sent with an acceptable `Content-Type`.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonObject(pub Map<String, Value>);

#[axum::async_trait]
impl<S> FromRequest<S> for JsonObject
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        check_json_content_type(req.headers())?;

        let body = Bytes::from_request(req, state).await.map_err(|rejection| {
            if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                ApiError::payload_too_large(rejection.body_text())
            } else {
                ApiError::bad_request(rejection.body_text())
            }
        })?;

        match serde_json::from_slice::<Value>(&body) {
            Ok(Value::Object(map)) => Ok(Self(map)),
            Ok(_) => Err(ApiError::bad_request("request body is not a JSON object")),
            Err(_) => Err(ApiError::bad_request("request body is not valid JSON")),
        }
    }
}

impl JsonObject {
    /// A field that must be present and non-null.
    pub fn required(&self, field: &str) -> Result<&Value, ApiError> {
        match self.0.get(field) {
            None | Some(Value::Null) => Err(ApiError::bad_request(format!("{field} is missing"))),
            Some(value) => Ok(value),
        }
    }

    /// A field where absent and `null` both mean "not given".
    pub fn optional(&self, field: &str) -> Option<&Value> {
        self.0.get(field).filter(|v| !v.is_null())
    }
}

/// Accept exactly `application/json`, optionally with `; charset=utf-8`.
pub fn check_json_content_type(headers: &HeaderMap) -> Result<(), ApiError> {
    let raw = headers
        .get(CONTENT_TYPE)
        .ok_or_else(|| ApiError::bad_request("content_type header is missing"))?;
    let raw = raw
        .to_str()
        .map_err(|_| ApiError::bad_request("content_type header is not application/json"))?;
    parse_content_type(raw)
}

fn parse_content_type(raw: &str) -> Result<(), ApiError> {
    let not_json = || ApiError::bad_request("content_type header is not application/json");

    let rest = raw.strip_prefix("application/json").ok_or_else(not_json)?;
    if rest.is_empty() {
        return Ok(());
    }
    let charset = rest.strip_prefix("; charset=").ok_or_else(not_json)?;
    if charset != "utf-8" {
        return Err(ApiError::bad_request("content_type header charset is not utf-8"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::HeaderValue;
    use serde_json::json;

    fn message(result: Result<(), ApiError>) -> String {
        result.unwrap_err().to_string()
    }

    #[test]
    fn accepts_plain_and_utf8_json() {
        assert!(parse_content_type("application/json").is_ok());
        assert!(parse_content_type("application/json; charset=utf-8").is_ok());
    }

    #[test]
    fn rejects_other_media_types() {
        assert_eq!(
            message(parse_content_type("text/plain")),
            "content_type header is not application/json"
        );
        assert_eq!(
            message(parse_content_type("application/jsonp")),
            "content_type header is not application/json"
        );
        assert_eq!(
            message(parse_content_type("application/json;charset=utf-8")),
            "content_type header is not application/json"
        );
    }

    #[test]
    fn rejects_other_charsets() {
        assert_eq!(
            message(parse_content_type("application/json; charset=latin-1")),
            "content_type header charset is not utf-8"
        );
        assert_eq!(
            message(parse_content_type("application/json; charset=")),
            "content_type header charset is not utf-8"
        );
    }

    #[test]
    fn missing_header_is_reported() {
        assert_eq!(
            message(check_json_content_type(&HeaderMap::new())),
            "content_type header is missing"
        );

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        assert!(check_json_content_type(&headers).is_ok());
    }

    #[test]
    fn null_fields_count_as_missing() {
        let body = match json!({"question": null, "answer": "42"}) {
            Value::Object(map) => JsonObject(map),
            _ => unreachable!(),
        };
        assert_eq!(
            body.required("question").unwrap_err(),
            ApiError::bad_request("question is missing")
        );
        assert_eq!(body.required("answer").unwrap(), &json!("42"));
        assert!(body.optional("question").is_none());
        assert!(body.optional("quiz_category_id").is_none());
    }

    #[tokio::test]
    async fn oversized_body_keeps_payload_too_large() {
        let req = Request::builder()
            .method("POST")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(vec![b' '; 3 * 1024 * 1024]))
            .unwrap();

        let err = JsonObject::from_request(req, &()).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(err.category(), "payload too large");
    }

    #[tokio::test]
    async fn empty_body_is_not_valid_json() {
        let req = Request::builder()
            .method("POST")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::empty())
            .unwrap();

        let err = JsonObject::from_request(req, &()).await.unwrap_err();
        assert_eq!(err, ApiError::bad_request("request body is not valid JSON"));
    }
}
