//! Reader comments.

use actix_web::{HttpResponse, web};
use quill_core::forms::CommentForm;
use quill_shared::ApiResponse;
use uuid::Uuid;

use super::{form_for_post, presenter};
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// Attach a comment to a published post.
///
/// POST /{post_id}/comment/
pub async fn post_comment(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    form: Result<web::Form<CommentForm>, actix_web::Error>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let form = form_for_post(&state, post_id, form).await?;
    let comment = state.blog.add_comment(post_id, form).await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok_with_message(
        presenter::comment(comment),
        "Your comment has been added.",
    )))
}
