//! Integration tests for categories, articles, comments and media

mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use sefr_api::create_app;
use serde_json::{json, Value};

use common::{bearer, send, verified_account, TestContext};

fn authed(method: test::TestRequest, uri: &str, token: &str) -> test::TestRequest {
    method.uri(uri).insert_header(bearer(token))
}

fn article_body(title: &str, category: &Value) -> Value {
    json!({
        "title": title,
        "content": "Long form content about the subject.",
        "category": category,
    })
}

#[actix_web::test]
async fn test_content_requires_authentication() {
    let ctx = TestContext::new();
    let app = test::init_service(create_app(ctx.state.clone())).await;

    for uri in ["/api/categories/", "/api/articles/", "/api/comments/", "/api/media/", "/api/users/"] {
        let (status, body) = send(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", uri);
        assert_eq!(body["code"], "missing_token");
    }

    let (status, body) = send(
        &app,
        test::TestRequest::get()
            .uri("/api/articles/")
            .insert_header(("Authorization", "Bearer not-a-jwt"))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "token_invalid");
}

#[actix_web::test]
async fn test_category_crud_and_parent_filter() {
    let ctx = TestContext::new();
    let app = test::init_service(create_app(ctx.state.clone())).await;
    let (token, _) = verified_account(&app, "sara@example.com", "sara").await;

    let (status, parent) = send(
        &app,
        authed(test::TestRequest::post(), "/api/categories/", &token)
            .set_json(json!({ "name": "Science News" }))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(parent["slug"], "science-news");

    let (status, child) = send(
        &app,
        authed(test::TestRequest::post(), "/api/categories/", &token)
            .set_json(json!({ "name": "Physics", "parent": parent["id"] }))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &app,
        authed(test::TestRequest::post(), "/api/categories/", &token)
            .set_json(json!({ "name": "Science News" }))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT, "{}", body);

    let uri = format!("/api/categories/?parent={}", parent["id"]);
    let (status, page) = send(&app, authed(test::TestRequest::get(), &uri, &token).to_request()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["count"], 1);
    assert_eq!(page["results"][0]["id"], child["id"]);

    let uri = format!("/api/categories/{}/", child["id"]);
    let (status, updated) = send(
        &app,
        authed(test::TestRequest::put(), &uri, &token)
            .set_json(json!({ "name": "Quantum Physics", "parent": parent["id"] }))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Quantum Physics");

    let (status, _) = send(&app, authed(test::TestRequest::delete(), &uri, &token).to_request()).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, authed(test::TestRequest::get(), &uri, &token).to_request()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");
}

#[actix_web::test]
async fn test_article_slugs_likes_views_and_detail() {
    let ctx = TestContext::new();
    let app = test::init_service(create_app(ctx.state.clone())).await;
    let (token, _) = verified_account(&app, "sara@example.com", "sara").await;

    let (_, category) = send(
        &app,
        authed(test::TestRequest::post(), "/api/categories/", &token)
            .set_json(json!({ "name": "Essays" }))
            .to_request(),
    )
    .await;

    let (status, first) = send(
        &app,
        authed(test::TestRequest::post(), "/api/articles/", &token)
            .set_json(article_body("Hello Sefr World", &category["id"]))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["slug"], "hello-sefr-world");
    assert_eq!(first["status"], "draft");

    let (_, second) = send(
        &app,
        authed(test::TestRequest::post(), "/api/articles/", &token)
            .set_json(article_body("Hello Sefr World", &category["id"]))
            .to_request(),
    )
    .await;
    assert_eq!(second["slug"], "hello-sefr-world-2");

    let like = "/api/articles/hello-sefr-world/like/";
    let (status, body) = send(&app, authed(test::TestRequest::post(), like, &token).to_request()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "liked");
    let (_, body) = send(&app, authed(test::TestRequest::post(), like, &token).to_request()).await;
    assert_eq!(body["status"], "already liked");

    let view = "/api/articles/hello-sefr-world/view/";
    for _ in 0..2 {
        let (status, body) = send(&app, authed(test::TestRequest::post(), view, &token).to_request()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "viewed");
    }

    let (status, detail) = send(
        &app,
        authed(test::TestRequest::get(), "/api/articles/hello-sefr-world/", &token).to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["likes_count"], 1);
    assert_eq!(detail["views_count"], 1);
    assert_eq!(detail["view_count"], 1);
    assert!(detail["media"].as_array().map(Vec::is_empty).unwrap_or(false));

    let (status, page) = send(
        &app,
        authed(test::TestRequest::get(), "/api/articles/?status=draft&page_size=1", &token).to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["count"], 2);
    assert_eq!(page["total_pages"], 2);
    assert_eq!(page["results"].as_array().map(Vec::len), Some(1));
}

#[actix_web::test]
async fn test_only_author_or_staff_may_modify_article() {
    let ctx = TestContext::new();
    let app = test::init_service(create_app(ctx.state.clone())).await;
    let (author, _) = verified_account(&app, "sara@example.com", "sara").await;
    let (other, _) = verified_account(&app, "reza@example.com", "reza").await;

    let (_, category) = send(
        &app,
        authed(test::TestRequest::post(), "/api/categories/", &author)
            .set_json(json!({ "name": "Essays" }))
            .to_request(),
    )
    .await;
    send(
        &app,
        authed(test::TestRequest::post(), "/api/articles/", &author)
            .set_json(article_body("An Essay On Rust", &category["id"]))
            .to_request(),
    )
    .await;

    let uri = "/api/articles/an-essay-on-rust/";
    let mut edit = article_body("An Essay On Rust", &category["id"]);
    edit["status"] = json!("published");

    let (status, body) = send(
        &app,
        authed(test::TestRequest::put(), uri, &other).set_json(&edit).to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "FORBIDDEN");

    ctx.make_staff("reza@example.com").await;
    let (status, body) = send(
        &app,
        authed(test::TestRequest::put(), uri, &other).set_json(&edit).to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "published");
    assert!(body["published_at"].is_string());

    let (status, _) = send(&app, authed(test::TestRequest::delete(), uri, &author).to_request()).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[actix_web::test]
async fn test_comments_and_media_on_an_article() {
    let ctx = TestContext::new();
    let app = test::init_service(create_app(ctx.state.clone())).await;
    let (author, _) = verified_account(&app, "sara@example.com", "sara").await;
    let (reader, _) = verified_account(&app, "reza@example.com", "reza").await;

    let (_, category) = send(
        &app,
        authed(test::TestRequest::post(), "/api/categories/", &author)
            .set_json(json!({ "name": "Essays" }))
            .to_request(),
    )
    .await;
    let (_, article) = send(
        &app,
        authed(test::TestRequest::post(), "/api/articles/", &author)
            .set_json(article_body("Commented Article", &category["id"]))
            .to_request(),
    )
    .await;

    let (status, body) = send(
        &app,
        authed(test::TestRequest::post(), "/api/comments/", &reader)
            .set_json(json!({ "article": article["id"], "content": "short" }))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);

    let (status, comment) = send(
        &app,
        authed(test::TestRequest::post(), "/api/comments/", &reader)
            .set_json(json!({ "article": article["id"], "content": "A thoughtful response." }))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(comment["is_approved"], false);

    let comment_uri = format!("/api/comments/{}/", comment["id"]);
    let (status, _) = send(
        &app,
        authed(test::TestRequest::put(), &comment_uri, &author)
            .set_json(json!({ "content": "Rewritten by someone else." }))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let uri = format!("/api/comments/?article={}", article["id"].as_str().unwrap_or_default());
    let (_, page) = send(&app, authed(test::TestRequest::get(), &uri, &reader).to_request()).await;
    assert_eq!(page["count"], 1);

    let media = json!({
        "article": article["id"],
        "media_type": "image",
        "url": "https://cdn.example.com/cover.png",
        "alt_text": "Cover",
    });
    let (status, _) = send(
        &app,
        authed(test::TestRequest::post(), "/api/media/", &reader).set_json(&media).to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, created) = send(
        &app,
        authed(test::TestRequest::post(), "/api/media/", &author).set_json(&media).to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["media_type"], "image");

    let (_, page) = send(
        &app,
        authed(test::TestRequest::get(), "/api/media/?media_type=video", &author).to_request(),
    )
    .await;
    assert_eq!(page["count"], 0);

    let (_, detail) = send(
        &app,
        authed(test::TestRequest::get(), "/api/articles/commented-article/", &reader).to_request(),
    )
    .await;
    assert_eq!(detail["media"].as_array().map(Vec::len), Some(1));
    assert_eq!(detail["comments"].as_array().map(Vec::len), Some(1));
}

#[actix_web::test]
async fn test_media_put_and_patch() {
    let ctx = TestContext::new();
    let app = test::init_service(create_app(ctx.state.clone())).await;
    let (author, _) = verified_account(&app, "sara@example.com", "sara").await;
    let (reader, _) = verified_account(&app, "reza@example.com", "reza").await;

    let (_, category) = send(
        &app,
        authed(test::TestRequest::post(), "/api/categories/", &author)
            .set_json(json!({ "name": "Essays" }))
            .to_request(),
    )
    .await;
    let (_, article) = send(
        &app,
        authed(test::TestRequest::post(), "/api/articles/", &author)
            .set_json(article_body("Illustrated Article", &category["id"]))
            .to_request(),
    )
    .await;
    let (status, created) = send(
        &app,
        authed(test::TestRequest::post(), "/api/media/", &author)
            .set_json(json!({
                "article": article["id"],
                "media_type": "image",
                "url": "https://cdn.example.com/cover.png",
                "alt_text": "Cover",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let uri = format!("/api/media/{}/", created["id"]);

    let (status, _) = send(
        &app,
        authed(test::TestRequest::patch(), &uri, &reader)
            .set_json(json!({ "alt_text": "Hijacked" }))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        authed(test::TestRequest::patch(), &uri, &author)
            .set_json(json!({ "url": "not a url" }))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, patched) = send(
        &app,
        authed(test::TestRequest::patch(), &uri, &author)
            .set_json(json!({ "alt_text": "Front cover" }))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", patched);
    assert_eq!(patched["alt_text"], "Front cover");
    assert_eq!(patched["media_type"], "image");

    // PUT replaces every field; a missing alt text clears it
    let (status, replaced) = send(
        &app,
        authed(test::TestRequest::put(), &uri, &author)
            .set_json(json!({
                "article": article["id"],
                "media_type": "video",
                "url": "https://cdn.example.com/intro.mp4",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", replaced);
    assert_eq!(replaced["media_type"], "video");
    assert_eq!(replaced["url"], "https://cdn.example.com/intro.mp4");
    assert!(replaced["alt_text"].is_null());

    ctx.make_staff("reza@example.com").await;
    let (status, _) = send(
        &app,
        authed(test::TestRequest::patch(), &uri, &reader)
            .set_json(json!({ "alt_text": "Moderated" }))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}
