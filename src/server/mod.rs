//! Publish server
//!
//! `POST /api/publish` writes a post to the content repository and
//! `POST /api/preview` renders a draft the way the editor shows it. Both
//! require the shared writer key.

use anyhow::Result;
use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Json},
    routing::post,
    Router,
};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::{EnvSecrets, SecretStore};
use crate::content::{render_markdown, Draft, SearchPreview};
use crate::helpers::{count_words, extract_headings, generate_slug, Heading, SeoReport};
use crate::publish::{PublishError, PublishReceipt, PublishRequest, Publisher, WRITER_KEY_HEADER};
use crate::Writer;

/// Server state
pub struct AppState {
    pub publisher: Publisher,
    pub secrets: Arc<dyn SecretStore>,
}

impl AppState {
    pub fn new(publisher: Publisher, secrets: Arc<dyn SecretStore>) -> Self {
        Self { publisher, secrets }
    }
}

/// Everything the editor derives from a draft
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewResponse {
    pub slug: String,
    pub html: String,
    pub headings: Vec<Heading>,
    pub word_count: usize,
    pub seo: SeoReport,
    pub search: SearchPreview,
    pub markdown: String,
    pub structured_data: String,
}

/// Build the application router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/publish", post(publish_handler))
        .route("/api/preview", post(preview_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the publish server
pub async fn start(writer: &Writer, ip: &str, port: u16) -> Result<()> {
    let publisher = Publisher::github(writer.config.clone());
    let state = Arc::new(AppState::new(publisher, Arc::new(EnvSecrets)));
    let app = router(state);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let repository = &writer.config.repository;
    println!("Publish server running at http://{}:{}", ip, port);
    println!(
        "Writing to {}/{} ({}) under {}",
        repository.owner, repository.name, repository.branch, repository.posts_path
    );
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Compare the writer key header with the configured secret
///
/// With no secret configured every request is rejected.
fn authorize(secrets: &dyn SecretStore, headers: &HeaderMap) -> Result<(), PublishError> {
    let expected = secrets.writer_key().ok_or(PublishError::Authentication)?;
    let presented = headers
        .get(WRITER_KEY_HEADER)
        .and_then(|v| v.to_str().ok());

    match presented {
        Some(key) if key == expected => Ok(()),
        _ => Err(PublishError::Authentication),
    }
}

/// Create or update a post file
async fn publish_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<PublishReceipt>, PublishError> {
    let token = state
        .secrets
        .github_token()
        .ok_or_else(PublishError::missing_token)?;
    authorize(state.secrets.as_ref(), &headers)?;

    let request: PublishRequest =
        serde_json::from_slice(&body).map_err(|e| PublishError::Unknown(e.to_string()))?;

    let receipt = state.publisher.publish(&token, request).await?;
    Ok(Json(receipt))
}

/// Render a draft without publishing it
async fn preview_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, PublishError> {
    authorize(state.secrets.as_ref(), &headers)?;

    let draft: Draft =
        serde_json::from_slice(&body).map_err(|e| PublishError::Validation(e.to_string()))?;

    let config = state.publisher.config();
    let date = config.today();
    let slug = generate_slug(&draft.title);

    Ok(Json(PreviewResponse {
        html: render_markdown(&draft.body),
        headings: extract_headings(&draft.body),
        word_count: count_words(&draft.body),
        seo: SeoReport::evaluate(&draft.title, &draft.description, &draft.body, &draft.faqs),
        search: SearchPreview::new(config, &draft, &slug),
        markdown: draft.to_markdown_document(date),
        structured_data: draft.structured_data_json(&config.author, date),
        slug,
    }))
}
