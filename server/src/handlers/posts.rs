use actix_web::{get, web, HttpResponse};

use crate::{error::Result, lifecycle::TokenLifecycle, session::Session};

pub const MY_POSTS_PATH: &str = "/posts/my";

/// Upstream path for a hashtag search. The hashtag is percent-encoded here
/// and nowhere else.
pub fn hashtag_path(hashtag: &str) -> String {
    format!("/posts/hashtag/{}", urlencoding::encode(hashtag))
}

#[get("/mypost")]
pub async fn my_posts(
    lifecycle: web::Data<TokenLifecycle>,
    session: web::ReqData<Session>,
) -> Result<HttpResponse> {
    let mut session = session.into_inner();
    let payload = lifecycle.fetch_resource(&mut session, MY_POSTS_PATH).await?;

    Ok(HttpResponse::Ok().json(payload))
}

#[get("/search/{hashtag}")]
pub async fn search_hashtag(
    hashtag: web::Path<String>,
    lifecycle: web::Data<TokenLifecycle>,
    session: web::ReqData<Session>,
) -> Result<HttpResponse> {
    let mut session = session.into_inner();
    let path = hashtag_path(&hashtag);
    let payload = lifecycle.fetch_resource(&mut session, &path).await?;

    Ok(HttpResponse::Ok().json(payload))
}
