use std::sync::Arc;

use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use actix_web::http::header::ContentType;
use actix_web::{App, test, web};
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;
use uuid::Uuid;

use quill_core::domain::{Post, PostStatus};
use quill_core::forms::PostForm;
use quill_infra::{ConsoleMailer, InMemoryBlogStore};

use super::configure_routes;
use crate::state::AppState;

const SITE: &str = "https://blog.example.com";

struct Fixture {
    state: AppState,
    mailer: Arc<ConsoleMailer>,
}

fn fixture() -> Fixture {
    let mailer = Arc::new(ConsoleMailer::new());
    let state = AppState::in_memory(Arc::new(InMemoryBlogStore::new()), mailer.clone(), SITE);
    Fixture { state, mailer }
}

fn at(days_ago: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap() - Duration::days(days_ago)
}

async fn create(
    f: &Fixture,
    title: &str,
    body: &str,
    status: PostStatus,
    tags: &[&str],
    days_ago: i64,
) -> Post {
    f.state
        .blog
        .create_post(
            Uuid::new_v4(),
            PostForm {
                title: title.to_string(),
                body: body.to_string(),
                tags: tags.iter().map(|t| t.to_string()).collect(),
                status,
                publish: Some(at(days_ago)),
                ..Default::default()
            },
        )
        .await
        .unwrap()
}

async fn call(f: &Fixture, req: test::TestRequest) -> ServiceResponse {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(f.state.clone()))
            .configure(configure_routes),
    )
    .await;
    test::call_service(&app, req.to_request()).await
}

async fn get_json(f: &Fixture, uri: &str) -> (StatusCode, Value) {
    let res = call(f, test::TestRequest::get().uri(uri)).await;
    let status = res.status();
    (status, test::read_body_json(res).await)
}

async fn post_form(f: &Fixture, uri: &str, form: &[(&str, &str)]) -> (StatusCode, Value) {
    let res = call(f, test::TestRequest::post().uri(uri).set_form(form)).await;
    let status = res.status();
    (status, test::read_body_json(res).await)
}

#[actix_web::test]
async fn test_health_reports_storage() {
    let f = fixture();
    let (status, body) = get_json(&f, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["storage"], "memory");
}

#[actix_web::test]
async fn test_list_paginates_published_posts() {
    let f = fixture();
    for (i, title) in ["One", "Two", "Three", "Four"].iter().enumerate() {
        create(&f, title, "Text", PostStatus::Published, &[], i as i64).await;
    }
    create(&f, "Hidden", "Text", PostStatus::Draft, &[], 0).await;

    let (status, body) = get_json(&f, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page"]["count"], 4);
    assert_eq!(body["page"]["num_pages"], 2);
    assert_eq!(body["page"]["next_page"], 2);
    let titles: Vec<&str> = body["posts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["One", "Two", "Three"]);

    let (_, second) = get_json(&f, "/?page=2").await;
    assert_eq!(second["posts"][0]["title"], "Four");
    assert_eq!(second["page"]["has_next"], false);
}

#[actix_web::test]
async fn test_list_clamps_invalid_pages() {
    let f = fixture();
    for (i, title) in ["One", "Two", "Three", "Four"].iter().enumerate() {
        create(&f, title, "Text", PostStatus::Published, &[], i as i64).await;
    }

    let (status, body) = get_json(&f, "/?page=abc").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page"]["number"], 1);

    let (_, body) = get_json(&f, "/?page=0").await;
    assert_eq!(body["page"]["number"], 1);

    let (status, body) = get_json(&f, "/?page=99").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page"]["number"], 2);
}

#[actix_web::test]
async fn test_list_by_tag() {
    let f = fixture();
    create(&f, "Tagged", "Text", PostStatus::Published, &["Rust Lang"], 1).await;
    create(&f, "Untagged", "Text", PostStatus::Published, &[], 2).await;

    let (status, body) = get_json(&f, "/tag/rust-lang/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tag"], "rust-lang");
    assert_eq!(body["page"]["count"], 1);
    assert_eq!(body["posts"][0]["title"], "Tagged");
    assert_eq!(body["posts"][0]["tags"][0]["slug"], "rust-lang");

    let (status, body) = get_json(&f, "/tag/unknown/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page"]["count"], 0);
}

#[actix_web::test]
async fn test_detail_includes_comments_and_similar_posts() {
    let f = fixture();
    let post = create(&f, "Test", "Text", PostStatus::Published, &["news"], 1).await;
    let other = create(&f, "Other", "Text", PostStatus::Published, &["news"], 2).await;
    let path = format!("/{}/comment/", post.id);
    post_form(&f, &path, &[("name", "Ada"), ("email", "ada@example.com"), ("body", "Hi")]).await;

    let (status, body) = get_json(&f, &post.absolute_url()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["post"]["title"], "Test");
    assert_eq!(
        body["post"]["url"],
        format!("{}{}", SITE, post.absolute_url())
    );
    assert_eq!(body["comments"][0]["name"], "Ada");
    assert!(body["comments"][0].get("email").is_none());
    assert_eq!(body["similar_posts"][0]["post"]["id"], other.id.to_string());
    assert_eq!(body["similar_posts"][0]["same_tags"], 1);
}

#[actix_web::test]
async fn test_detail_not_found_cases() {
    let f = fixture();
    let draft = create(&f, "Secret", "Text", PostStatus::Draft, &[], 1).await;
    let post = create(&f, "Visible", "Text", PostStatus::Published, &[], 1).await;

    let (status, body) = get_json(&f, &draft.absolute_url()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], 404);

    let wrong_day = post.absolute_url().replace("/29/", "/28/");
    let (status, _) = get_json(&f, &wrong_day).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = get_json(&f, "/2024/13/1/visible/").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = get_json(&f, "/year/6/29/visible/").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_comment_created() {
    let f = fixture();
    let post = create(&f, "Test", "Text", PostStatus::Published, &[], 1).await;

    let (status, body) = post_form(
        &f,
        &format!("/{}/comment/", post.id),
        &[("name", " Ada "), ("email", "ada@example.com"), ("body", "Nice post")],
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["name"], "Ada");
    assert_eq!(body["data"]["post_id"], post.id.to_string());
}

#[actix_web::test]
async fn test_comment_validation_errors() {
    let f = fixture();
    let post = create(&f, "Test", "Text", PostStatus::Published, &[], 1).await;

    let (status, body) = post_form(
        &f,
        &format!("/{}/comment/", post.id),
        &[("name", ""), ("email", "nope"), ("body", "Hi")],
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["errors"]["name"][0], "This field is required.");
    assert_eq!(body["errors"]["email"][0], "Enter a valid email address.");
    assert!(body["errors"].get("body").is_none());

    let comments = f.state.blog.active_comments(post.id).await.unwrap();
    assert!(comments.is_empty());
}

#[actix_web::test]
async fn test_comment_on_draft_or_unknown_post_is_not_found() {
    let f = fixture();
    let draft = create(&f, "Draft", "Text", PostStatus::Draft, &[], 1).await;
    let valid = [("name", "Ada"), ("email", "ada@example.com"), ("body", "Hi")];

    let (status, _) = post_form(&f, &format!("/{}/comment/", draft.id), &valid).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = post_form(&f, &format!("/{}/comment/", Uuid::new_v4()), &valid).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = post_form(&f, "/not-a-uuid/comment/", &valid).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_share_form_describes_fields() {
    let f = fixture();
    let post = create(&f, "Test", "Text", PostStatus::Published, &[], 1).await;

    let (status, body) = get_json(&f, &format!("/{}/share/", post.id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["post"]["title"], "Test");
    let names: Vec<&str> = body["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|field| field["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["name", "email", "to", "comments"]);
    assert_eq!(body["fields"][0]["max_length"], 25);
}

#[actix_web::test]
async fn test_share_sends_email() {
    let f = fixture();
    let post = create(&f, "Test", "Text", PostStatus::Published, &[], 1).await;

    let (status, body) = post_form(
        &f,
        &format!("/{}/share/", post.id),
        &[
            ("name", "Ada"),
            ("email", "ada@example.com"),
            ("to", "bob@example.com"),
            ("comments", "Worth it"),
        ],
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sent"], true);
    assert_eq!(body["recipient"], "bob@example.com");

    let outbox = f.mailer.outbox().await;
    assert_eq!(outbox.len(), 1);
    assert_eq!(outbox[0].subject, "Ada recommends you read Test");
    assert!(outbox[0].body.contains(&format!("{}{}", SITE, post.absolute_url())));
    assert!(outbox[0].body.contains("Worth it"));
}

#[actix_web::test]
async fn test_share_invalid_recipient_sends_nothing() {
    let f = fixture();
    let post = create(&f, "Test", "Text", PostStatus::Published, &[], 1).await;

    let (status, body) = post_form(
        &f,
        &format!("/{}/share/", post.id),
        &[("name", "Ada"), ("email", "ada@example.com"), ("to", "bob")],
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["errors"].get("to").is_some());
    assert!(f.mailer.outbox().await.is_empty());
}

#[actix_web::test]
async fn test_share_draft_is_not_found() {
    let f = fixture();
    let draft = create(&f, "Draft", "Text", PostStatus::Draft, &[], 1).await;

    let (status, _) = get_json(&f, &format!("/{}/share/", draft.id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_search() {
    let f = fixture();
    create(&f, "Async Rust", "Futures and executors", PostStatus::Published, &[], 1).await;
    create(&f, "Gardening", "Tomatoes need sun", PostStatus::Published, &[], 2).await;
    create(&f, "Rust draft", "Unfinished", PostStatus::Draft, &[], 3).await;

    let (status, body) = get_json(&f, "/search/?query=rust").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["query"], "rust");
    assert_eq!(body["count"], 1);
    assert_eq!(body["results"][0]["post"]["title"], "Async Rust");
    assert!(body["results"][0]["rank"].as_f64().unwrap() > 0.0);

    let (_, body) = get_json(&f, "/search/?query=submarine").await;
    assert_eq!(body["count"], 0);

    let (status, body) = get_json(&f, "/search/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 0);
}

async fn post_text(f: &Fixture, uri: &str) -> StatusCode {
    let req = test::TestRequest::post()
        .uri(uri)
        .insert_header(ContentType::plaintext())
        .set_payload("not a form");
    call(f, req).await.status()
}

#[actix_web::test]
async fn test_undecodable_form_checks_post_first() {
    let f = fixture();
    let post = create(&f, "Test", "Text", PostStatus::Published, &[], 1).await;
    let draft = create(&f, "Draft", "Text", PostStatus::Draft, &[], 1).await;

    for action in ["comment", "share"] {
        let status = post_text(&f, &format!("/{}/{}/", post.id, action)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{} on published post", action);

        let status = post_text(&f, &format!("/{}/{}/", draft.id, action)).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{} on draft", action);

        let status = post_text(&f, &format!("/{}/{}/", Uuid::new_v4(), action)).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{} on unknown post", action);
    }
    assert!(f.mailer.outbox().await.is_empty());
}

#[actix_web::test]
async fn test_oversized_tag_is_a_field_error() {
    let f = fixture();
    let result = f
        .state
        .blog
        .create_post(
            Uuid::new_v4(),
            PostForm {
                title: "Tagged".to_string(),
                body: "Text".to_string(),
                tags: vec!["t".repeat(101)],
                ..Default::default()
            },
        )
        .await;
    let err = crate::middleware::error::AppError::from(result.unwrap_err());
    assert_eq!(
        actix_web::ResponseError::status_code(&err),
        StatusCode::UNPROCESSABLE_ENTITY
    );
}
