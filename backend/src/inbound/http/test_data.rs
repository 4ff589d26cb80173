//! Sample data seeding for manual and end-to-end testing.
//!
//! Registered only when `GRIEVANCE_TEST_DATA_ENABLED` is set; see
//! [`crate::inbound::http::configure`].

use actix_web::{HttpResponse, post, web};

use crate::domain::GrievanceDraft;
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::ErrorEnvelope;
use crate::inbound::http::grievances::MessageResponse;
use crate::inbound::http::state::HttpState;

/// User that owns seeded grievances.
pub const SAMPLE_USER_ID: &str = "USER123";

/// The grievances created by one seeding request.
pub fn sample_drafts() -> Vec<GrievanceDraft> {
    vec![GrievanceDraft {
        user_id: Some(SAMPLE_USER_ID.to_owned()),
        state: Some("Karnataka".into()),
        city: Some("Bangalore".into()),
        sector: Some("E-Commerce".into()),
        category: Some("Defective Product".into()),
        company: Some("ABC Electronics".into()),
        grievance: Some(
            "Product received was damaged and company is not responding to refund \
             requests. The smartphone I ordered had a cracked screen and the seller \
             is avoiding my calls."
                .into(),
        ),
        product_value: Some("10000-25000".into()),
        dealer_info: Some(
            "XYZ Electronics Store, MG Road, Bangalore - 560001. Contact: 9876543210"
                .into(),
        ),
    }]
}

/// Create the sample grievances through the normal submission path.
#[utoipa::path(
    post,
    path = "/api/test-data",
    responses(
        (status = 200, description = "Sample grievances created", body = MessageResponse),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["grievances"],
    operation_id = "createTestData"
)]
#[post("/api/test-data")]
pub async fn create_test_data(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let drafts = sample_drafts();
    let count = drafts.len();
    for draft in drafts {
        state.grievances.submit(draft).await?;
    }
    Ok(HttpResponse::Ok().json(MessageResponse::success(format!(
        "Created {count} test grievances"
    ))))
}
