//! Service index listing the public endpoints.

use std::collections::BTreeMap;

use actix_web::{HttpResponse, get};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

const ENDPOINTS: [(&str, &str); 6] = [
    ("save_grievance", "POST /save_grievance"),
    ("get_latest_grievance", "GET /api/get-latest-grievance"),
    ("get_grievance", "GET /get_grievance/<user_id>"),
    ("update_status", "POST /api/update-grievance-status"),
    ("list_grievances", "GET /api/grievances"),
    ("health", "GET /health"),
];

/// Name, version and endpoint map of the service.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ServiceIndex {
    #[schema(example = "Consumer Grievance API Server")]
    pub message: String,
    pub version: String,
    /// Endpoint name to `METHOD path`.
    pub endpoints: BTreeMap<String, String>,
}

impl ServiceIndex {
    fn current() -> Self {
        Self {
            message: "Consumer Grievance API Server".to_owned(),
            version: env!("CARGO_PKG_VERSION").to_owned(),
            endpoints: ENDPOINTS
                .iter()
                .map(|(name, route)| ((*name).to_owned(), (*route).to_owned()))
                .collect(),
        }
    }
}

/// Describe the service.
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Service index", body = ServiceIndex)),
    tags = ["meta"],
    operation_id = "serviceIndex"
)]
#[get("/")]
pub async fn index() -> HttpResponse {
    HttpResponse::Ok().json(ServiceIndex::current())
}
