//! Handler for requests no route matched.

use actix_web::HttpRequest;
use actix_web::HttpResponse;

use crate::domain::Error;
use crate::inbound::http::ApiResult;

/// Default service answering unknown paths with a `not_found` envelope.
pub async fn fallback(req: HttpRequest) -> ApiResult<HttpResponse> {
    Err(Error::not_found(format!(
        "no route for {} {}",
        req.method(),
        req.path()
    )))
}
