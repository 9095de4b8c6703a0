use actix_web::{
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    error::ErrorInternalServerError,
    middleware::Next,
    web, HttpMessage,
};

use crate::session::{SessionCookies, SessionStore};

/// Attaches a [`Session`](crate::session::Session) to every request and
/// issues the signed cookie once a new session has stored something.
pub async fn session_middleware(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, actix_web::Error> {
    let store = req
        .app_data::<web::Data<SessionStore>>()
        .cloned()
        .ok_or_else(|| ErrorInternalServerError("Session store not available"))?;

    let cookies = req
        .app_data::<web::Data<SessionCookies>>()
        .cloned()
        .ok_or_else(|| ErrorInternalServerError("Session cookies not configured"))?;

    let session_id = req
        .cookie(cookies.name())
        .and_then(|cookie| cookies.verify(cookie.value()));

    let session = store.open(session_id.as_deref());
    req.extensions_mut().insert(session.clone());

    let mut res = next.call(req).await?;

    if session.is_new() && store.contains(session.id()) {
        log::debug!("Issuing cookie for new session {}", session.id());
        res.response_mut()
            .add_cookie(&cookies.build(session.id()))
            .map_err(ErrorInternalServerError)?;
    }

    Ok(res)
}
