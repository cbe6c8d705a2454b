use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use sqlx::SqlitePool;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};

pub mod auth;
pub mod comments;
pub mod config;
pub mod db;
pub mod error;
pub mod journal;
pub mod models;
pub mod plans;
pub mod stripe;

use auth::resolve_session;
use comments::CommentBoard;
use config::Config;
use error::ApiError;
use journal::JournalStore;
use models::{
    CheckoutRequest, CheckoutResponse, Comment, CreateCommentPayload, CreateEntryPayload,
    CreatePaymentPayload, EntryFilterParams, JournalEntry, PaymentRecord, Plan,
    UpdateEntryPayload,
};
use stripe::{SessionParams, StripeClient};

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub journal: Arc<RwLock<JournalStore>>,
    pub comments: Arc<RwLock<CommentBoard>>,
    pub config: Arc<Config>,
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(db: SqlitePool, config: Config) -> Self {
        AppState {
            db,
            journal: Arc::new(RwLock::new(JournalStore::new())),
            comments: Arc::new(RwLock::new(CommentBoard::new())),
            config: Arc::new(config),
            http: reqwest::Client::new(),
        }
    }
}

/// Builds the application router. Kept separate from `main` so integration
/// tests can drive it with `tower::ServiceExt::oneshot`.
pub async fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/journal/entries", get(list_entries).post(create_entry))
        .route(
            "/journal/entries/:id",
            get(get_entry).put(update_entry).delete(delete_entry),
        )
        .route("/journal/tags", get(journal_tags))
        .route(
            "/videos/:video_id/comments",
            get(video_comments).post(add_comment),
        )
        .route("/comments/:id/like", post(like_comment))
        .route("/plans", get(list_plans))
        .route("/payments", post(create_payment))
        .route("/payments/:id", get(get_payment))
        .route("/create-checkout", post(create_checkout))
        .route("/payment-success", get(payment_success))
        .route("/payment-cancel", get(payment_cancel))
        .layer(cors)
        .with_state(state)
}

async fn root() -> &'static str {
    "🌸 revvere wellness API"
}

// --- journal ---

async fn list_entries(
    State(state): State<AppState>,
    Query(params): Query<EntryFilterParams>,
) -> Json<Vec<JournalEntry>> {
    let search = params.search.unwrap_or_default();
    let tags: Vec<String> = params
        .tags
        .map(|t| {
            t.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let journal = state.journal.read().await;
    Json(journal.filter(&search, &tags, params.date))
}

async fn create_entry(
    State(state): State<AppState>,
    Json(payload): Json<CreateEntryPayload>,
) -> Result<(StatusCode, Json<JournalEntry>), ApiError> {
    let mut journal = state.journal.write().await;
    let entry = journal.create(payload)?;
    Ok((StatusCode::CREATED, Json(entry)))
}

async fn get_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<JournalEntry>, ApiError> {
    let journal = state.journal.read().await;
    journal.get(&id).cloned().map(Json).ok_or(ApiError::NotFound)
}

async fn update_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateEntryPayload>,
) -> Result<Json<JournalEntry>, ApiError> {
    let mut journal = state.journal.write().await;
    journal.update(&id, payload).map(Json)
}

/// Deleting an absent entry is a no-op, so this always answers 204.
async fn delete_entry(State(state): State<AppState>, Path(id): Path<String>) -> StatusCode {
    let mut journal = state.journal.write().await;
    journal.delete(&id);
    StatusCode::NO_CONTENT
}

async fn journal_tags(State(state): State<AppState>) -> Json<Vec<String>> {
    let journal = state.journal.read().await;
    Json(journal.tags_in_use())
}

// --- video comments ---

async fn video_comments(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> Json<Vec<Comment>> {
    let board = state.comments.read().await;
    Json(board.for_video(&video_id))
}

async fn add_comment(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
    Json(payload): Json<CreateCommentPayload>,
) -> Result<(StatusCode, Json<Comment>), ApiError> {
    let mut board = state.comments.write().await;
    let comment = board.add(&video_id, &payload.user_name, &payload.text)?;
    Ok((StatusCode::CREATED, Json(comment)))
}

async fn like_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut board = state.comments.write().await;
    let likes = board.like(&id).ok_or(ApiError::NotFound)?;
    Ok(Json(json!({ "likes": likes })))
}

// --- plans & payment records ---

async fn list_plans() -> Json<&'static [Plan]> {
    Json(plans::PLANS)
}

/// Creates the `pending` payment record a purchase attempt starts from.
async fn create_payment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreatePaymentPayload>,
) -> Result<(StatusCode, Json<PaymentRecord>), ApiError> {
    let plan = plans::find(&payload.plan_id).ok_or(ApiError::NotFound)?;
    let session = resolve_session(&state.http, &state.config, bearer(&headers)).await;

    let record = db::create_payment(
        &state.db,
        &session.user_id,
        plan.price * 100,
        "usd",
        plan.name,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn get_payment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PaymentRecord>, ApiError> {
    db::get_payment(&state.db, &id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

// --- checkout ---

/// Resolves the caller, finds or creates the billing customer, and issues a
/// subscription checkout session. Single attempt: any failure aborts the
/// whole operation and the payment record stays `pending`.
async fn create_checkout(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CheckoutRequest>,
) -> Result<Json<CheckoutResponse>, ApiError> {
    let secret_key = state
        .config
        .stripe_secret_key
        .clone()
        .ok_or_else(|| ApiError::Config("STRIPE_SECRET_KEY is not set".into()))?;

    tracing::info!(
        plan_id = %request.plan_id,
        payment_id = %request.payment_id,
        "creating checkout session"
    );

    let session = resolve_session(&state.http, &state.config, bearer(&headers)).await;
    let stripe = StripeClient::new(
        state.http.clone(),
        state.config.stripe_api_base.clone(),
        secret_key,
    );

    let customer = match stripe.find_customer(&session.email).await? {
        Some(customer) => customer,
        None => stripe.create_customer(&session.email, &session.user_id).await?,
    };

    let origin = headers
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .unwrap_or(&state.config.fallback_origin);

    let checkout = stripe
        .create_checkout_session(&SessionParams {
            customer_id: &customer.id,
            plan_id: &request.plan_id,
            plan_name: &request.plan_name,
            price: request.price,
            payment_id: &request.payment_id,
            user_id: &session.user_id,
            origin,
        })
        .await?;

    tracing::info!(session_id = %checkout.id, "checkout session created");

    let url = checkout
        .url
        .ok_or_else(|| ApiError::Stripe("checkout session has no redirect url".into()))?;
    Ok(Json(CheckoutResponse { url }))
}

// --- payment callbacks ---

#[derive(Deserialize, Debug)]
struct SuccessParams {
    session_id: Option<String>,
    payment_id: Option<String>,
}

#[derive(Deserialize, Debug)]
struct CancelParams {
    payment_id: Option<String>,
}

/// Success redirect target. The record update is best-effort: failures are
/// logged and the confirmation page renders regardless.
async fn payment_success(
    State(state): State<AppState>,
    Query(params): Query<SuccessParams>,
) -> Html<&'static str> {
    if let Some(payment_id) = &params.payment_id {
        match db::mark_completed(&state.db, payment_id, params.session_id.as_deref()).await {
            Ok(true) => tracing::info!(%payment_id, "payment completed"),
            Ok(false) => tracing::warn!(%payment_id, "no payment record to complete"),
            Err(err) => tracing::error!(%payment_id, error = %err, "error updating payment"),
        }
    }
    Html(
        "<h1>Payment Successful!</h1>\
         <p>Thank you for your purchase. Your wellness journey begins now.</p>",
    )
}

async fn payment_cancel(
    State(state): State<AppState>,
    Query(params): Query<CancelParams>,
) -> Html<&'static str> {
    if let Some(payment_id) = &params.payment_id {
        match db::mark_cancelled(&state.db, payment_id).await {
            Ok(true) => tracing::info!(%payment_id, "payment cancelled"),
            Ok(false) => tracing::warn!(%payment_id, "no payment record to cancel"),
            Err(err) => tracing::error!(%payment_id, error = %err, "error updating payment"),
        }
    }
    Html(
        "<h1>Payment Cancelled</h1>\
         <p>Your payment was not completed. No charges were made to your account.</p>",
    )
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    auth::bearer_token(
        headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok()),
    )
}
