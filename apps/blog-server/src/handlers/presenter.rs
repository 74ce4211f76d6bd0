//! Domain to wire conversions.

use quill_core::BlogService;
use quill_core::domain::{Comment, Post};
use quill_core::query::{Page, SearchHit, SimilarPost};
use quill_shared::dto::{
    CommentResponse, PageMeta, PostResponse, SearchResultResponse, SimilarPostResponse,
    TagResponse,
};

pub fn post(blog: &BlogService, post: Post) -> PostResponse {
    let url = blog.post_url(&post);
    let tags = post
        .tag_list()
        .into_iter()
        .map(|tag| TagResponse {
            name: tag.name,
            slug: tag.slug,
        })
        .collect();

    PostResponse {
        id: post.id,
        title: post.title,
        slug: post.slug,
        author_id: post.author_id,
        body: post.body,
        publish: post.publish,
        tags,
        url,
    }
}

pub fn comment(comment: Comment) -> CommentResponse {
    CommentResponse {
        id: comment.id,
        post_id: comment.post_id,
        name: comment.name,
        body: comment.body,
        created_at: comment.created_at,
    }
}

pub fn similar(blog: &BlogService, similar: SimilarPost) -> SimilarPostResponse {
    SimilarPostResponse {
        post: post(blog, similar.post),
        same_tags: similar.same_tags,
    }
}

pub fn search_hit(blog: &BlogService, hit: SearchHit) -> SearchResultResponse {
    SearchResultResponse {
        post: post(blog, hit.post),
        rank: hit.rank,
    }
}

/// Split a page into its wire items and pagination metadata.
pub fn page(blog: &BlogService, page: Page<Post>) -> (Vec<PostResponse>, PageMeta) {
    let meta = PageMeta {
        number: page.number,
        num_pages: page.num_pages,
        count: page.count,
        has_next: page.has_next(),
        has_previous: page.has_previous(),
        next_page: page.next_page_number(),
        previous_page: page.previous_page_number(),
    };
    let posts = page.map(|p| post(blog, p)).items;
    (posts, meta)
}
