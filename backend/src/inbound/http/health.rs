//! Health endpoints: the service summary plus liveness and readiness probes
//! for orchestrators and load balancers.

use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::{HttpResponse, get, http::header, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Timestamp;
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::ErrorEnvelope;
use crate::inbound::http::state::HttpState;

/// Shared health state for readiness and liveness checks.
pub struct HealthState {
    ready: AtomicBool,
    live: AtomicBool,
}

impl Default for HealthState {
    fn default() -> Self {
        Self {
            ready: AtomicBool::new(false),
            live: AtomicBool::new(true),
        }
    }
}

impl HealthState {
    /// Create a new health state starting as not ready but live.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the service as ready.
    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    /// Flag the service as draining so liveness checks fail fast.
    pub fn mark_unhealthy(&self) {
        self.live.store(false, Ordering::Release);
    }

    /// Return readiness state.
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Return liveness state.
    pub fn is_alive(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    fn probe_response(probe_ok: bool) -> HttpResponse {
        let mut response = if probe_ok {
            HttpResponse::Ok()
        } else {
            HttpResponse::ServiceUnavailable()
        };

        response
            .insert_header((header::CACHE_CONTROL, "no-store"))
            .finish()
    }
}

/// Service summary returned by `GET /health`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthReport {
    #[schema(example = "healthy")]
    pub status: String,
    #[schema(example = "2026-10-17T09:30:00.123456Z")]
    pub timestamp: String,
    pub total_grievances: usize,
    pub pending_grievances: usize,
}

/// Report service health with grievance counts.
#[utoipa::path(
    get,
    path = "/health",
    tags = ["health"],
    responses(
        (status = 200, description = "Service is healthy", body = HealthReport),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    )
)]
#[get("/health")]
pub async fn health(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let stats = state.grievances_query.stats().await?;
    Ok(HttpResponse::Ok()
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .json(HealthReport {
            status: "healthy".to_owned(),
            timestamp: Timestamp::from_datetime(state.clock.utc())
                .as_str()
                .to_owned(),
            total_grievances: stats.total,
            pending_grievances: stats.pending,
        }))
}

/// Readiness probe. Return 200 once the server is bound; 503 otherwise.
#[utoipa::path(
    get,
    path = "/health/ready",
    tags = ["health"],
    responses(
        (status = 200, description = "Server is ready to handle traffic"),
        (status = 503, description = "Server is not ready")
    )
)]
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    HealthState::probe_response(state.is_ready())
}

/// Liveness probe. Return 200 while the process is alive and 503 once draining.
#[utoipa::path(
    get,
    path = "/health/live",
    tags = ["health"],
    responses(
        (status = 200, description = "Server is alive"),
        (status = 503, description = "Server is shutting down")
    )
)]
#[get("/health/live")]
pub async fn live(state: web::Data<HealthState>) -> HttpResponse {
    HealthState::probe_response(state.is_alive())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{App, http::StatusCode, test as actix_test};
    use chrono::{TimeZone, Utc};
    use mockable::Clock;
    use rstest::rstest;

    use super::*;
    use crate::domain::GrievanceStats;
    use crate::domain::ports::{MockGrievanceCommand, MockGrievanceQuery};
    use crate::domain::Error;
    use crate::test_support::SteppingClock;

    fn state_with(query: MockGrievanceQuery) -> HttpState {
        let start = Utc
            .with_ymd_and_hms(2026, 10, 17, 9, 30, 0)
            .single()
            .expect("valid fixture instant");
        let clock: Arc<dyn Clock> = Arc::new(SteppingClock::fixed(start));
        HttpState::new(Arc::new(MockGrievanceCommand::new()), Arc::new(query), clock)
    }

    #[actix_web::test]
    async fn health_reports_counts_and_timestamp() {
        let mut query = MockGrievanceQuery::new();
        query
            .expect_stats()
            .times(1)
            .return_once(|| Ok(GrievanceStats { total: 4, pending: 3 }));
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state_with(query)))
                .service(health),
        )
        .await;

        let req = actix_test::TestRequest::get().uri("/health").to_request();
        let report: HealthReport = actix_test::call_and_read_body_json(&app, req).await;

        assert_eq!(report.status, "healthy");
        assert_eq!(report.timestamp, "2026-10-17T09:30:00.000000Z");
        assert_eq!(report.total_grievances, 4);
        assert_eq!(report.pending_grievances, 3);
    }

    #[actix_web::test]
    async fn health_fault_is_internal_error() {
        let mut query = MockGrievanceQuery::new();
        query
            .expect_stats()
            .return_once(|| Err(Error::internal("store unavailable")));
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state_with(query)))
                .service(health),
        )
        .await;

        let req = actix_test::TestRequest::get().uri("/health").to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[rstest]
    #[case(false, true, StatusCode::SERVICE_UNAVAILABLE, StatusCode::OK)]
    #[case(true, true, StatusCode::OK, StatusCode::OK)]
    #[case(true, false, StatusCode::OK, StatusCode::SERVICE_UNAVAILABLE)]
    #[actix_web::test]
    async fn probes_follow_state(
        #[case] mark_ready: bool,
        #[case] alive: bool,
        #[case] ready_status: StatusCode,
        #[case] live_status: StatusCode,
    ) {
        let health_state = web::Data::new(HealthState::new());
        if mark_ready {
            health_state.mark_ready();
        }
        if !alive {
            health_state.mark_unhealthy();
        }
        let app = actix_test::init_service(
            App::new()
                .app_data(health_state.clone())
                .service(ready)
                .service(live),
        )
        .await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/health/ready").to_request(),
        )
        .await;
        assert_eq!(res.status(), ready_status);
        assert_eq!(
            res.headers().get(header::CACHE_CONTROL).map(|v| v.as_bytes()),
            Some(b"no-store".as_slice())
        );

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/health/live").to_request(),
        )
        .await;
        assert_eq!(res.status(), live_status);
    }
}
