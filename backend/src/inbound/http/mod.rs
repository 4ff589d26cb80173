//! HTTP inbound adapter exposing the grievance REST endpoints.

pub mod error;
pub mod fallback;
pub mod grievances;
pub mod health;
pub mod index;
pub mod schemas;
pub mod state;
pub mod test_data;
mod validation;

use actix_web::web;

pub use error::ApiResult;

/// Route switches decided at startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouteOptions {
    /// Register `POST /api/test-data`.
    pub test_data_enabled: bool,
}

/// Register every grievance, index and health route plus the extractor
/// error handlers and the fallback service.
///
/// Expects [`state::HttpState`] and [`health::HealthState`] to be provided
/// as app data.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use grievance_backend::inbound::http::{RouteOptions, configure};
///
/// let app = App::new().configure(|cfg| configure(cfg, RouteOptions::default()));
/// ```
pub fn configure(cfg: &mut web::ServiceConfig, options: RouteOptions) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(error::query_error_handler))
        .service(index::index)
        .service(grievances::save_grievance)
        .service(grievances::get_latest_grievance)
        .service(grievances::get_grievance_for_user)
        .service(grievances::update_grievance_status)
        .service(grievances::list_grievances)
        .service(health::health)
        .service(health::ready)
        .service(health::live);
    if options.test_data_enabled {
        cfg.service(test_data::create_test_data);
    }
    cfg.default_service(web::to(fallback::fallback));
}
