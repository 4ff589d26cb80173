//! HTTP adapter mapping for domain errors.
//!
//! Purpose: keep the domain error type HTTP-agnostic while allowing Actix
//! handlers to turn domain failures into the `{status: "error", ...}`
//! envelope and a matching status code.

use actix_web::error::{JsonPayloadError, QueryPayloadError};
use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::error;
use utoipa::ToSchema;

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::schemas::ErrorCodeSchema;
use crate::middleware::trace::TRACE_ID_HEADER;

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

const INTERNAL_MESSAGE: &str = "Internal server error";

/// Wire form of a failed request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    /// Always `"error"`.
    #[schema(example = "error")]
    pub status: String,
    /// Stable machine-readable error code.
    #[schema(value_type = ErrorCodeSchema, example = "not_found")]
    pub code: ErrorCode,
    /// Human-readable message.
    #[schema(example = "No pending grievances found")]
    pub message: String,
    /// Correlation identifier, echoed in the `trace-id` header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
    /// Supplementary details; never present on internal errors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl From<&Error> for ErrorEnvelope {
    fn from(error: &Error) -> Self {
        let internal = matches!(error.code(), ErrorCode::InternalError);
        Self {
            status: "error".to_owned(),
            code: error.code(),
            message: if internal {
                INTERNAL_MESSAGE.to_owned()
            } else {
                error.message().to_owned()
            },
            trace_id: error.trace_id().map(str::to_owned),
            details: if internal {
                None
            } else {
                error.details().cloned()
            },
        }
    }
}

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        if matches!(self.code(), ErrorCode::InternalError) {
            error!(
                error = %self,
                trace_id = self.trace_id().unwrap_or_default(),
                "request failed with internal error"
            );
        }
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        builder.json(ErrorEnvelope::from(self))
    }
}

/// Map a JSON body rejection to an `invalid_request` envelope.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    Error::invalid_request("request body must be a JSON object")
        .with_details(json!({ "reason": err.to_string() }))
        .into()
}

/// Map a query string rejection to an `invalid_request` envelope.
pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    Error::invalid_request("query string could not be parsed")
        .with_details(json!({ "reason": err.to_string() }))
        .into()
}
