//! Request validation middleware
//!
//! Three adapters run the schema validator on one part of a request:
//!
//! - `validate_body`: JSON body. On success the body is replaced by the
//!   sanitized record, so handlers reading `Json<Record>` only see declared
//!   fields.
//! - `validate_query`: query string. The sanitized record is attached as a
//!   `ValidatedQuery` extension.
//! - `validate_params`: path parameters. The sanitized record is attached as
//!   a `ValidatedParams` extension.
//!
//! Any rejection short-circuits with 400 and the joined error message.
//! Query and path values are text; number and boolean rules accept their
//! textual forms.
//!
//! Attach with `axum::middleware::from_fn_with_state(request_schema, validate_body)`.

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::extract::{Path, Query, Request, State};
use axum::http::{header, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use axum::RequestPartsExt;
use serde_json::Value;
use tracing::debug;

use super::errors::{HttpError, HttpResult};
use crate::schema::{Record, Schema, SchemaRegistry, SchemaResult, SchemaValidator};

/// Schema bound to one route, used as middleware state
#[derive(Debug, Clone)]
pub struct RequestSchema {
    name: Arc<str>,
    schema: Arc<Schema>,
    body_limit: usize,
}

impl RequestSchema {
    pub fn new(name: &str, schema: Arc<Schema>, body_limit: usize) -> Self {
        Self {
            name: Arc::from(name),
            schema,
            body_limit,
        }
    }

    /// Looks up `name` in the registry.
    pub fn from_registry(registry: &SchemaRegistry, name: &str, body_limit: usize) -> SchemaResult<Self> {
        Ok(Self::new(name, registry.require(name)?, body_limit))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn check(&self, part: &'static str, data: &Record) -> HttpResult<Record> {
        SchemaValidator::new(&self.schema).validate(data).map_err(|errors| {
            debug!(schema = %self.name, part, errors = %errors, "request rejected");
            HttpError::Validation(errors)
        })
    }
}

/// Sanitized query string record
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedQuery(pub Record);

/// Sanitized path parameter record
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedParams(pub Record);

/// Validates the JSON body and replaces it with the sanitized record.
///
/// An empty body is an empty record.
pub async fn validate_body(
    State(target): State<RequestSchema>,
    request: Request,
    next: Next,
) -> HttpResult<Response> {
    let (mut parts, body) = request.into_parts();
    let bytes = to_bytes(body, target.body_limit)
        .await
        .map_err(|e| HttpError::InvalidBody(format!("failed to read request body: {}", e)))?;

    let data = if bytes.is_empty() {
        Record::new()
    } else {
        match serde_json::from_slice::<Value>(&bytes) {
            Ok(Value::Object(record)) => record,
            Ok(_) => return Err(HttpError::InvalidBody("request body must be a JSON object".into())),
            Err(e) => return Err(HttpError::InvalidBody(format!("malformed JSON body: {}", e))),
        }
    };

    let sanitized = target.check("body", &data)?;
    let bytes = serde_json::to_vec(&sanitized).map_err(|e| HttpError::Internal(e.to_string()))?;

    parts.headers.remove(header::CONTENT_LENGTH);
    parts
        .headers
        .insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
    parts.headers.insert(header::CONTENT_LENGTH, HeaderValue::from(bytes.len()));

    Ok(next.run(Request::from_parts(parts, Body::from(bytes))).await)
}

/// Validates the query string and attaches `ValidatedQuery`.
pub async fn validate_query(
    State(target): State<RequestSchema>,
    request: Request,
    next: Next,
) -> HttpResult<Response> {
    let (mut parts, body) = request.into_parts();
    let Query(raw) = Query::<HashMap<String, String>>::try_from_uri(&parts.uri)
        .map_err(|e| HttpError::InvalidQuery(e.body_text()))?;

    let sanitized = target.check("query", &text_record(raw))?;
    parts.extensions.insert(ValidatedQuery(sanitized));

    Ok(next.run(Request::from_parts(parts, body)).await)
}

/// Validates path parameters and attaches `ValidatedParams`.
pub async fn validate_params(
    State(target): State<RequestSchema>,
    request: Request,
    next: Next,
) -> HttpResult<Response> {
    let (mut parts, body) = request.into_parts();
    let Path(raw) = parts
        .extract::<Path<HashMap<String, String>>>()
        .await
        .map_err(|e| HttpError::InvalidParams(e.body_text()))?;

    let sanitized = target.check("params", &text_record(raw))?;
    parts.extensions.insert(ValidatedParams(sanitized));

    Ok(next.run(Request::from_parts(parts, body)).await)
}

fn text_record(raw: HashMap<String, String>) -> Record {
    raw.into_iter().map(|(k, v)| (k, Value::String(v))).collect()
}
