//! HTTP inference service for entity recognition.
//!
//! Loads a model once at startup (custom artifact first, heuristic default
//! on load failure) and serves it read-only for the process lifetime.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::State;
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use entitag_core::{count_labels, ModelSource, RecognizedEntity, Recognizer};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

/// Model artifact directory produced by the trainer.
const MODEL_DIR: &str = "./custom_ner_model";

const BIND_ADDR: &str = "0.0.0.0:8000";

/// Shared read-only state; the recognizer is never reloaded or mutated.
struct AppState {
    recognizer: Recognizer,
}

#[derive(Deserialize)]
struct AnalyzeRequest {
    text: String,
}

#[derive(Serialize)]
struct AnalyzeResponse {
    entities: Vec<RecognizedEntity>,
    counts: BTreeMap<String, usize>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // A failure here (fallback unavailable) aborts startup.
    let recognizer = Recognizer::load(MODEL_DIR)?;
    match recognizer.source() {
        ModelSource::CustomLoaded => info!(dir = MODEL_DIR, "serving custom model"),
        ModelSource::DefaultLoaded => info!("serving default heuristic recognizer"),
    }
    let state = Arc::new(AppState { recognizer });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/analyze", post(analyze_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(BIND_ADDR).await?;
    info!(addr = BIND_ADDR, "inference service listening");
    axum::serve(listener, app).await?;
    Ok(())
}

/// Run the model on submitted text, returning spans and per-label counts.
async fn analyze_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnalyzeRequest>,
) -> Json<AnalyzeResponse> {
    let entities = state.recognizer.analyze(&req.text);
    let counts = count_labels(&entities);
    Json(AnalyzeResponse { entities, counts })
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "healthy" }))
}
