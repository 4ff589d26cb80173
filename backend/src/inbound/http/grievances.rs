//! Grievance HTTP handlers.
//!
//! ```text
//! POST /save_grievance
//! GET  /api/get-latest-grievance
//! GET  /get_grievance/{user_id}
//! POST /api/update-grievance-status
//! GET  /api/grievances?status=&user_id=
//! ```
//!
//! Paths and payload keys are fixed by existing callers (the filing agent
//! and the browser extension), hence the mix of snake_case and camelCase.

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::error;
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    Error, GrievanceDraft, GrievanceFilter, GrievanceId, GrievanceRecord, GrievanceStatus,
    StatusUpdate,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::ErrorEnvelope;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, require_text};

const SUCCESS: &str = "success";

/// Descriptive fields of a new grievance. Every field is optional.
///
/// Descriptive values are stored as sent, whatever their JSON type.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct SaveGrievanceRequest {
    /// Filing user; `UNKNOWN` when omitted. Non-string ids are kept as text.
    #[serde(default, deserialize_with = "crate::domain::grievance::lenient_text")]
    #[schema(example = "USER123")]
    pub user_id: Option<String>,
    pub state: Option<Value>,
    pub city: Option<Value>,
    pub sector: Option<Value>,
    pub category: Option<Value>,
    pub company: Option<Value>,
    pub grievance: Option<Value>,
    #[serde(rename = "productValue")]
    #[schema(example = "10000-25000")]
    pub product_value: Option<Value>,
    #[serde(rename = "dealerInfo")]
    pub dealer_info: Option<Value>,
}

impl From<SaveGrievanceRequest> for GrievanceDraft {
    fn from(value: SaveGrievanceRequest) -> Self {
        Self {
            user_id: value.user_id,
            state: value.state,
            city: value.city,
            sector: value.sector,
            category: value.category,
            company: value.company,
            grievance: value.grievance,
            product_value: value.product_value,
            dealer_info: value.dealer_info,
        }
    }
}

/// Acknowledgement of a stored grievance.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SaveGrievanceResponse {
    #[schema(example = "success")]
    pub status: String,
    #[schema(example = "Grievance saved successfully")]
    pub message: String,
    #[schema(example = "GRV_0001")]
    pub grievance_id: String,
}

/// Full view of a stored grievance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GrievanceResponse {
    #[schema(example = "GRV_0001")]
    pub id: String,
    pub user_id: String,
    pub state: Option<Value>,
    pub city: Option<Value>,
    pub sector: Option<Value>,
    pub category: Option<Value>,
    pub company: Option<Value>,
    pub grievance: Option<Value>,
    #[serde(rename = "productValue")]
    pub product_value: Option<Value>,
    #[serde(rename = "dealerInfo")]
    pub dealer_info: Option<Value>,
    /// `null` for records whose status was never set.
    #[schema(example = "pending")]
    pub status: Option<String>,
    #[schema(example = "2026-10-17T09:30:00.123456Z")]
    pub created_at: String,
    pub updated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submission_data: Option<Value>,
}

impl From<GrievanceRecord> for GrievanceResponse {
    fn from(value: GrievanceRecord) -> Self {
        Self {
            id: value.id.as_str().to_owned(),
            user_id: value.user_id,
            state: value.state,
            city: value.city,
            sector: value.sector,
            category: value.category,
            company: value.company,
            grievance: value.grievance,
            product_value: value.product_value,
            dealer_info: value.dealer_info,
            status: value.status.as_str().map(str::to_owned),
            created_at: value.created_at.as_str().to_owned(),
            updated_at: value.updated_at.as_str().to_owned(),
            submission_data: value.submission_data,
        }
    }
}

/// Latest pending grievance wrapped in the success envelope.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LatestGrievanceResponse {
    #[schema(example = "success")]
    pub status: String,
    pub data: GrievanceResponse,
}

/// Descriptive fields only, as the legacy per-user endpoint returns them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LegacyGrievanceView {
    pub state: Option<Value>,
    pub city: Option<Value>,
    pub sector: Option<Value>,
    pub category: Option<Value>,
    pub company: Option<Value>,
    pub grievance: Option<Value>,
    #[serde(rename = "productValue")]
    pub product_value: Option<Value>,
    #[serde(rename = "dealerInfo")]
    pub dealer_info: Option<Value>,
}

impl From<GrievanceRecord> for LegacyGrievanceView {
    fn from(value: GrievanceRecord) -> Self {
        Self {
            state: value.state,
            city: value.city,
            sector: value.sector,
            category: value.category,
            company: value.company,
            grievance: value.grievance,
            product_value: value.product_value,
            dealer_info: value.dealer_info,
        }
    }
}

/// Requested status transition.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateStatusRequest {
    #[schema(example = "GRV_0001")]
    pub grievance_id: Option<String>,
    /// New status, stored as sent. An omitted or `null` status leaves the
    /// record with no status, which no longer counts as pending.
    #[serde(default, deserialize_with = "crate::domain::grievance::lenient_text")]
    #[schema(example = "submitted")]
    pub status: Option<String>,
    /// Arbitrary payload recorded with the transition; `{}` when omitted.
    pub submission_data: Option<Value>,
}

const GRIEVANCE_ID_FIELD: FieldName = FieldName::new("grievance_id");

fn parse_status_update(payload: UpdateStatusRequest) -> Result<StatusUpdate, Error> {
    let grievance_id = require_text(payload.grievance_id, GRIEVANCE_ID_FIELD)?;
    Ok(StatusUpdate {
        grievance_id: GrievanceId::new(grievance_id),
        status: payload
            .status
            .map_or_else(GrievanceStatus::default, GrievanceStatus::new),
        submission_data: payload.submission_data.unwrap_or_else(|| json!({})),
    })
}

/// Generic success acknowledgement.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "success")]
    pub status: String,
    pub message: String,
}

impl MessageResponse {
    pub(crate) fn success(message: impl Into<String>) -> Self {
        Self {
            status: SUCCESS.to_owned(),
            message: message.into(),
        }
    }
}

/// Optional list filters; empty values are ignored.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListGrievancesQuery {
    /// Only grievances with this status.
    pub status: Option<String>,
    /// Only grievances filed by this user.
    pub user_id: Option<String>,
}

/// Filtered grievances, newest first.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GrievanceListResponse {
    #[schema(example = "success")]
    pub status: String,
    pub count: usize,
    pub grievances: Vec<GrievanceResponse>,
}

/// Store a new pending grievance.
#[utoipa::path(
    post,
    path = "/save_grievance",
    request_body = SaveGrievanceRequest,
    responses(
        (status = 200, description = "Grievance stored", body = SaveGrievanceResponse),
        (status = 400, description = "Body is not a JSON object", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["grievances"],
    operation_id = "saveGrievance"
)]
#[post("/save_grievance")]
pub async fn save_grievance(
    state: web::Data<HttpState>,
    payload: web::Json<SaveGrievanceRequest>,
) -> ApiResult<HttpResponse> {
    let record = state
        .grievances
        .submit(GrievanceDraft::from(payload.into_inner()))
        .await?;
    Ok(HttpResponse::Ok().json(SaveGrievanceResponse {
        status: SUCCESS.to_owned(),
        message: "Grievance saved successfully".to_owned(),
        grievance_id: record.id.as_str().to_owned(),
    }))
}

/// Fetch the most recently created pending grievance across all users.
#[utoipa::path(
    get,
    path = "/api/get-latest-grievance",
    responses(
        (status = 200, description = "Latest pending grievance", body = LatestGrievanceResponse),
        (status = 404, description = "No pending grievances", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["grievances"],
    operation_id = "getLatestGrievance"
)]
#[get("/api/get-latest-grievance")]
pub async fn get_latest_grievance(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let record = state
        .grievances_query
        .latest_pending()
        .await?
        .ok_or_else(|| Error::not_found("No pending grievances found"))?;
    Ok(HttpResponse::Ok().json(LatestGrievanceResponse {
        status: SUCCESS.to_owned(),
        data: GrievanceResponse::from(record),
    }))
}

/// Fetch a user's latest pending grievance in the legacy flat shape.
///
/// Answers `{}` with 200 when the user has no pending grievance and `{}`
/// with 500 on an internal fault; existing callers rely on both.
#[utoipa::path(
    get,
    path = "/get_grievance/{user_id}",
    params(("user_id" = String, Path, description = "Filing user")),
    responses(
        (
            status = 200,
            description = "Descriptive fields, or an empty object when none is pending",
            body = LegacyGrievanceView
        ),
        (status = 500, description = "Empty object on internal fault")
    ),
    tags = ["grievances"],
    operation_id = "getGrievanceForUser"
)]
#[get("/get_grievance/{user_id}")]
pub async fn get_grievance_for_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> HttpResponse {
    let user_id = path.into_inner();
    match state.grievances_query.latest_pending_for_user(&user_id).await {
        Ok(Some(record)) => HttpResponse::Ok().json(LegacyGrievanceView::from(record)),
        Ok(None) => HttpResponse::Ok().json(json!({})),
        Err(err) => {
            error!(error = %err, user_id = %user_id, "legacy grievance lookup failed");
            HttpResponse::InternalServerError().json(json!({}))
        }
    }
}

/// Move a grievance to a new status.
#[utoipa::path(
    post,
    path = "/api/update-grievance-status",
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = MessageResponse),
        (status = 400, description = "Missing or blank grievance_id", body = ErrorEnvelope),
        (status = 404, description = "Unknown grievance", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["grievances"],
    operation_id = "updateGrievanceStatus"
)]
#[post("/api/update-grievance-status")]
pub async fn update_grievance_status(
    state: web::Data<HttpState>,
    payload: web::Json<UpdateStatusRequest>,
) -> ApiResult<HttpResponse> {
    let update = parse_status_update(payload.into_inner())?;
    state
        .grievances
        .update_status(update)
        .await?
        .ok_or_else(|| Error::not_found("Grievance not found"))?;
    Ok(HttpResponse::Ok().json(MessageResponse::success("Grievance status updated")))
}

/// List grievances, optionally filtered by status and user.
#[utoipa::path(
    get,
    path = "/api/grievances",
    params(ListGrievancesQuery),
    responses(
        (status = 200, description = "Matching grievances", body = GrievanceListResponse),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["grievances"],
    operation_id = "listGrievances"
)]
#[get("/api/grievances")]
pub async fn list_grievances(
    state: web::Data<HttpState>,
    query: web::Query<ListGrievancesQuery>,
) -> ApiResult<HttpResponse> {
    let ListGrievancesQuery { status, user_id } = query.into_inner();
    let records = state
        .grievances_query
        .list(GrievanceFilter::new(status, user_id))
        .await?;
    let grievances: Vec<GrievanceResponse> =
        records.into_iter().map(GrievanceResponse::from).collect();
    Ok(HttpResponse::Ok().json(GrievanceListResponse {
        status: SUCCESS.to_owned(),
        count: grievances.len(),
        grievances,
    }))
}

#[cfg(test)]
#[path = "grievances_tests.rs"]
mod tests;
