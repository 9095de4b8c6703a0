use actix_web::{
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
    web, HttpResponse,
};
use serde_json::json;

use crate::config::AppConfig;
use crate::error::{BffError, ErrorBody};

/// Renders an escalated error. `expose_detail` adds the internal detail
/// under `error`; production keeps it off.
pub fn render_error(err: &actix_web::Error, expose_detail: bool) -> HttpResponse {
    let status = err.as_response_error().status_code();

    let body = match err.as_error::<BffError>() {
        Some(bff) => ErrorBody::new(
            status,
            bff.public_message(),
            expose_detail.then(|| bff.detail()),
        ),
        None => ErrorBody::new(
            status,
            err.to_string(),
            expose_detail.then(|| json!({ "kind": "http", "cause": format!("{:?}", err) })),
        ),
    };

    body.into_response()
}

/// Rewrites every error response through [`render_error`], honouring the
/// configured environment.
pub async fn error_page_middleware(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, actix_web::Error> {
    let expose_detail = req
        .app_data::<web::Data<AppConfig>>()
        .map(|config| !config.environment.is_production())
        .unwrap_or(false);

    let res = next.call(req).await?;

    let rendered = res
        .response()
        .error()
        .map(|err| render_error(err, expose_detail));

    Ok(match rendered {
        Some(page) => {
            if page.status().is_server_error() {
                log::error!(
                    "{} {} failed with {}",
                    res.request().method(),
                    res.request().path(),
                    page.status()
                );
            }
            res.into_response(page)
        }
        None => res.map_into_boxed_body(),
    })
}
