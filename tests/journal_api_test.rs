use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use chrono::Utc;
use serde_json::{Value, json};
use tower::util::ServiceExt;

use revvere_api::config::Config;
use revvere_api::{AppState, app, db};

async fn setup_app() -> Router {
    let pool = db::init_db("sqlite::memory:")
        .await
        .expect("failed to open test database");
    db::migrate(&pool).await.expect("failed to run migrations");
    app(AppState::new(pool, Config::default())).await
}

async fn request(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref());
            Body::from(serde_json::to_vec(&value).unwrap())
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(json!({}));
    (status, json)
}

#[tokio::test]
async fn new_entry_lists_first_with_fresh_id_and_todays_date() {
    let app = setup_app().await;

    let (status, older) = request(
        &app,
        Method::POST,
        "/journal/entries",
        Some(json!({ "title": "Older", "content": "earlier thoughts" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, created) = request(
        &app,
        Method::POST,
        "/journal/entries",
        Some(json!({ "title": "Morning", "content": "Felt good", "tags": [], "mood": "😊" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(created["id"].as_str().is_some());
    assert_ne!(created["id"], older["id"]);
    assert_eq!(created["mood"], "😊");

    let today = Utc::now().date_naive().to_string();
    assert!(
        created["date"].as_str().unwrap().starts_with(&today),
        "expected today's date, got {}",
        created["date"]
    );

    let (status, list) = request(&app, Method::GET, "/journal/entries", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 2);
    assert_eq!(list[0]["id"], created["id"]);
}

#[tokio::test]
async fn blank_title_or_content_is_rejected() {
    let app = setup_app().await;

    let (status, body) = request(
        &app,
        Method::POST,
        "/journal/entries",
        Some(json!({ "title": "  ", "content": "something" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("title cannot be empty"));

    let (status, body) = request(
        &app,
        Method::POST,
        "/journal/entries",
        Some(json!({ "title": "A title", "content": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("content cannot be empty"));

    let (_, list) = request(&app, Method::GET, "/journal/entries", None).await;
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn update_preserves_identity_and_unspecified_fields() {
    let app = setup_app().await;

    let (_, created) = request(
        &app,
        Method::POST,
        "/journal/entries",
        Some(json!({ "title": "Original", "content": "body", "tags": ["#work"] })),
    )
    .await;
    let id = created["id"].as_str().unwrap().to_string();

    let (status, updated) = request(
        &app,
        Method::PUT,
        &format!("/journal/entries/{id}"),
        Some(json!({ "content": "rewritten" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["id"], created["id"]);
    assert_eq!(updated["title"], "Original");
    assert_eq!(updated["content"], "rewritten");
    assert_eq!(updated["tags"], json!(["#work"]));
    assert_eq!(updated["date"], created["date"]);

    let (status, _) = request(
        &app,
        Method::PUT,
        "/journal/entries/does-not-exist",
        Some(json!({ "content": "anything" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_is_a_noop_for_absent_ids() {
    let app = setup_app().await;

    let (_, created) = request(
        &app,
        Method::POST,
        "/journal/entries",
        Some(json!({ "title": "Ephemeral", "content": "soon gone" })),
    )
    .await;
    let id = created["id"].as_str().unwrap().to_string();

    let (status, _) = request(&app, Method::DELETE, "/journal/entries/missing", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = request(&app, Method::DELETE, &format!("/journal/entries/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // Repeated delete of the same id is still a no-op.
    let (status, _) = request(&app, Method::DELETE, &format!("/journal/entries/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, list) = request(&app, Method::GET, "/journal/entries", None).await;
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn listing_combines_search_tag_and_date_filters() {
    let app = setup_app().await;

    request(
        &app,
        Method::POST,
        "/journal/entries",
        Some(json!({
            "title": "Morning Walk",
            "content": "sunshine and coffee",
            "tags": ["#selfcare"],
        })),
    )
    .await;
    request(
        &app,
        Method::POST,
        "/journal/entries",
        Some(json!({
            "title": "Work notes",
            "content": "deadline stress",
            "tags": ["#work"],
        })),
    )
    .await;

    let (_, hits) = request(&app, Method::GET, "/journal/entries?search=SUNSHINE", None).await;
    assert_eq!(hits.as_array().unwrap().len(), 1);
    assert_eq!(hits[0]["title"], "Morning Walk");

    let (_, hits) = request(&app, Method::GET, "/journal/entries?tags=%23work", None).await;
    assert_eq!(hits.as_array().unwrap().len(), 1);
    assert_eq!(hits[0]["title"], "Work notes");

    // Predicates are a conjunction.
    let (_, hits) = request(
        &app,
        Method::GET,
        "/journal/entries?search=sunshine&tags=%23work",
        None,
    )
    .await;
    assert!(hits.as_array().unwrap().is_empty());

    let today = Utc::now().date_naive().to_string();
    let (_, hits) = request(
        &app,
        Method::GET,
        &format!("/journal/entries?date={today}"),
        None,
    )
    .await;
    assert_eq!(hits.as_array().unwrap().len(), 2);

    let (_, hits) = request(&app, Method::GET, "/journal/entries?date=1999-01-01", None).await;
    assert!(hits.as_array().unwrap().is_empty());

    let (_, tags) = request(&app, Method::GET, "/journal/tags", None).await;
    assert_eq!(tags, json!(["#selfcare", "#work"]));
}

#[tokio::test]
async fn comments_can_be_added_and_liked() {
    let app = setup_app().await;

    let (status, comment) = request(
        &app,
        Method::POST,
        "/videos/1/comments",
        Some(json!({ "userName": "Sarah M.", "text": "So calming" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(comment["videoId"], "1");
    assert_eq!(comment["likes"], 0);
    let id = comment["id"].as_str().unwrap().to_string();

    let (status, body) = request(&app, Method::POST, &format!("/comments/{id}/like"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["likes"], 1);

    let (_, body) = request(&app, Method::POST, &format!("/comments/{id}/like"), None).await;
    assert_eq!(body["likes"], 2);

    let (status, _) = request(&app, Method::POST, "/comments/missing/like", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = request(
        &app,
        Method::POST,
        "/videos/1/comments",
        Some(json!({ "userName": "Sarah M.", "text": "  " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("comment text"));

    // Comments belong to their video.
    let (_, other) = request(&app, Method::GET, "/videos/2/comments", None).await;
    assert!(other.as_array().unwrap().is_empty());
    let (_, listed) = request(&app, Method::GET, "/videos/1/comments", None).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["likes"], 2);
}
