//! Public reading endpoints: listings, post detail and search.

use actix_web::{HttpResponse, web};
use quill_shared::dto::{ListQuery, PostDetailResponse, PostListResponse, SearchParams, SearchResponse};

use super::presenter;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /
pub async fn post_list(
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> AppResult<HttpResponse> {
    list(&state, None, query.into_inner()).await
}

/// GET /tag/{tag_slug}/
pub async fn post_list_by_tag(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<ListQuery>,
) -> AppResult<HttpResponse> {
    list(&state, Some(path.into_inner()), query.into_inner()).await
}

async fn list(state: &AppState, tag: Option<String>, query: ListQuery) -> AppResult<HttpResponse> {
    let page = state
        .blog
        .list_posts(tag.as_deref(), query.page.as_deref())
        .await?;

    let (posts, page) = presenter::page(&state.blog, page);
    Ok(HttpResponse::Ok().json(PostListResponse { posts, page, tag }))
}

/// GET /{year}/{month}/{day}/{slug}/
pub async fn post_detail(
    state: web::Data<AppState>,
    path: web::Path<(i32, u32, u32, String)>,
) -> AppResult<HttpResponse> {
    let (year, month, day, slug) = path.into_inner();
    let detail = state.blog.post_detail(year, month, day, &slug).await?;
    let blog = &state.blog;

    Ok(HttpResponse::Ok().json(PostDetailResponse {
        post: presenter::post(blog, detail.post),
        comments: detail.comments.into_iter().map(presenter::comment).collect(),
        similar_posts: detail
            .similar
            .into_iter()
            .map(|s| presenter::similar(blog, s))
            .collect(),
    }))
}

/// GET /search/?query=<text>
pub async fn post_search(
    state: web::Data<AppState>,
    params: web::Query<SearchParams>,
) -> AppResult<HttpResponse> {
    let query = params.into_inner().query.unwrap_or_default();
    let hits = state.blog.search(Some(query.as_str())).await?;
    let results: Vec<_> = hits
        .into_iter()
        .map(|hit| presenter::search_hit(&state.blog, hit))
        .collect();

    Ok(HttpResponse::Ok().json(SearchResponse {
        query: query.trim().to_string(),
        count: results.len(),
        results,
    }))
}
