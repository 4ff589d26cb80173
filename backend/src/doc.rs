//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every grievance, health, and index endpoint together
//! with the request and response bodies they exchange. The error code enum is
//! documented through [`ErrorCodeSchema`] so the domain type stays free of
//! utoipa derives.
//!
//! The generated document is served by Swagger UI in debug builds.

use crate::inbound::http::error::ErrorEnvelope;
use crate::inbound::http::grievances::{
    GrievanceListResponse, GrievanceResponse, LatestGrievanceResponse, LegacyGrievanceView,
    MessageResponse, SaveGrievanceRequest, SaveGrievanceResponse, UpdateStatusRequest,
};
use crate::inbound::http::health::HealthReport;
use crate::inbound::http::index::ServiceIndex;
use crate::inbound::http::schemas::ErrorCodeSchema;
use utoipa::OpenApi;

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Consumer Grievance API",
        description = "Intake, lookup, and status tracking for consumer grievances."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::index::index,
        crate::inbound::http::grievances::save_grievance,
        crate::inbound::http::grievances::get_latest_grievance,
        crate::inbound::http::grievances::get_grievance_for_user,
        crate::inbound::http::grievances::update_grievance_status,
        crate::inbound::http::grievances::list_grievances,
        crate::inbound::http::test_data::create_test_data,
        crate::inbound::http::health::health,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorEnvelope,
        ErrorCodeSchema,
        SaveGrievanceRequest,
        SaveGrievanceResponse,
        GrievanceResponse,
        LatestGrievanceResponse,
        LegacyGrievanceView,
        UpdateStatusRequest,
        MessageResponse,
        GrievanceListResponse,
        HealthReport,
        ServiceIndex,
    )),
    tags(
        (name = "grievances", description = "Grievance intake and status tracking"),
        (name = "health", description = "Endpoints for health checks"),
        (name = "meta", description = "Service discovery")
    )
)]
pub struct ApiDoc;
