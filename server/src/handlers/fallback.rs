use actix_web::{HttpRequest, HttpResponse};

use crate::error::{BffError, Result};

/// Default service for anything no route matched.
pub async fn not_found(req: HttpRequest) -> Result<HttpResponse> {
    Err(BffError::RouteNotFound {
        method: req.method().to_string(),
        path: req.uri().to_string(),
    })
}
