//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use grievance_backend::Trace;
#[cfg(debug_assertions)]
use grievance_backend::doc::ApiDoc;
use grievance_backend::inbound::http::health::HealthState;
use grievance_backend::inbound::http::state::HttpState;
use grievance_backend::inbound::http::{RouteOptions, configure};
use grievance_backend::middleware::cors::Cors;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    cors_allow_origin: String,
    routes: RouteOptions,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        cors_allow_origin,
        routes,
    } = deps;

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // Trace runs outermost so preflight responses also carry a trace id.
    app.configure(|cfg| configure(cfg, routes))
        .wrap(Cors::new(&cors_allow_origin))
        .wrap(Trace)
}

/// Construct an Actix HTTP server using the provided state and configuration.
///
/// # Parameters
/// - `health_state`: shared readiness state updated once the server is bound.
/// - `http_state`: grievance ports shared by every worker.
/// - `config`: binding, CORS, and optional route settings.
///
/// # Returns
/// A spawned [`Server`] that must be awaited to drive the listener.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let ServerConfig {
        bind_addr,
        cors_allow_origin,
        routes,
    } = config;
    let deps = AppDependencies {
        health_state: health_state.clone(),
        http_state,
        cors_allow_origin,
        routes,
    };

    let server = HttpServer::new(move || build_app(deps.clone()))
        .bind(bind_addr)?
        .run();

    health_state.mark_ready();
    Ok(server)
}
