//! Cross-origin headers for browser callers.
//!
//! The browser extension that fills government complaint forms reads the
//! legacy endpoints from page context, so every response carries CORS
//! headers and preflight `OPTIONS` requests are answered with
//! `204 No Content` before routing.

use std::rc::Rc;
use std::task::{Context, Poll};

use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{self, HeaderMap, HeaderValue};
use actix_web::http::Method;
use actix_web::{Error, HttpResponse};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::warn;

/// Methods advertised to preflight requests.
pub const ALLOWED_METHODS: &str = "GET, POST, OPTIONS";

/// Headers advertised to preflight requests.
pub const ALLOWED_HEADERS: &str = "Content-Type";

/// CORS middleware allowing a single configured origin (or `*`).
///
/// # Examples
/// ```
/// use actix_web::App;
/// use grievance_backend::middleware::cors::Cors;
///
/// let app = App::new().wrap(Cors::new("*"));
/// ```
#[derive(Clone)]
pub struct Cors {
    allow_origin: Rc<str>,
}

impl Cors {
    /// Allow requests from `allow_origin`.
    pub fn new(allow_origin: &str) -> Self {
        Self {
            allow_origin: Rc::from(allow_origin),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for Cors
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = CorsMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(CorsMiddleware {
            service,
            allow_origin: self.allow_origin.clone(),
        }))
    }
}

/// Service wrapper produced by [`Cors`].
pub struct CorsMiddleware<S> {
    service: S,
    allow_origin: Rc<str>,
}

fn insert_cors_headers(headers: &mut HeaderMap, allow_origin: &str) {
    match HeaderValue::from_str(allow_origin) {
        Ok(value) => {
            headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, value);
        }
        Err(error) => {
            warn!(%error, allow_origin, "configured CORS origin is not a valid header value");
        }
    }
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOWED_HEADERS),
    );
}

impl<S, B> Service<ServiceRequest> for CorsMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let allow_origin = self.allow_origin.clone();
        if req.method() == Method::OPTIONS {
            let mut res = req
                .into_response(HttpResponse::NoContent().finish())
                .map_into_right_body();
            insert_cors_headers(res.headers_mut(), &allow_origin);
            return Box::pin(ready(Ok(res)));
        }

        let fut = self.service.call(req);
        Box::pin(async move {
            let mut res = fut.await?.map_into_left_body();
            insert_cors_headers(res.headers_mut(), &allow_origin);
            Ok(res)
        })
    }
}
