//! Share a post by email.

use actix_web::{HttpResponse, web};
use quill_core::forms::EmailPostForm;
use quill_shared::dto::{FormField, ShareFormResponse, ShareResponse};
use uuid::Uuid;

use super::{form_for_post, presenter};
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// Inputs of the share form.
fn share_fields() -> Vec<FormField> {
    vec![
        FormField::new("name", "text", true, Some(25)),
        FormField::new("email", "email", true, None),
        FormField::new("to", "email", true, None),
        FormField::new("comments", "textarea", false, None),
    ]
}

/// GET /{post_id}/share/
pub async fn share_form(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = state.blog.published_post(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ShareFormResponse {
        post: presenter::post(&state.blog, post),
        fields: share_fields(),
    }))
}

/// POST /{post_id}/share/
pub async fn share_post(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    form: Result<web::Form<EmailPostForm>, actix_web::Error>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let form = form_for_post(&state, post_id, form).await?;
    let outcome = state.blog.share_post(post_id, form).await?;

    Ok(HttpResponse::Ok().json(ShareResponse {
        sent: outcome.sent,
        recipient: outcome.recipient,
        post_url: outcome.post_url,
    }))
}
