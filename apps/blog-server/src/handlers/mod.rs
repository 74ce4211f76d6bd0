//! HTTP handlers and route configuration.

mod comments;
mod health;
mod posts;
mod presenter;
mod share;

#[cfg(test)]
mod tests;

use actix_web::web;
use uuid::Uuid;

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        // an unparseable post id or date cannot address a post
        web::PathConfig::default()
            .error_handler(|err, _| AppError::NotFound(err.to_string()).into()),
    )
    .app_data(
        web::FormConfig::default()
            .error_handler(|err, _| AppError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _| AppError::BadRequest(err.to_string()).into()),
    )
    .route("/health", web::get().to(health::health_check))
    .route("/", web::get().to(posts::post_list))
    .route("/search/", web::get().to(posts::post_search))
    .route("/tag/{tag_slug}/", web::get().to(posts::post_list_by_tag))
    .route("/{post_id}/comment/", web::post().to(comments::post_comment))
    .service(
        web::resource("/{post_id}/share/")
            .route(web::get().to(share::share_form))
            .route(web::post().to(share::share_post)),
    )
    .route(
        "/{year}/{month}/{day}/{slug}/",
        web::get().to(posts::post_detail),
    );
}

/// Body of a form posted to a post's endpoint.
///
/// A body that failed to decode is only reported once the target post is
/// known to be published, so a missing post stays a 404.
async fn form_for_post<T>(
    state: &AppState,
    post_id: Uuid,
    form: Result<web::Form<T>, actix_web::Error>,
) -> AppResult<T> {
    match form {
        Ok(form) => Ok(form.into_inner()),
        Err(err) => {
            state.blog.published_post(post_id).await?;
            Err(AppError::BadRequest(err.to_string()))
        }
    }
}
