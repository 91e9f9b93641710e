//! HTTP API server for integration with other systems.
//!
//! Provides REST endpoints for retrieval-augmented and whole-corpus answers
//! and for inspecting the index.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use crate::rag::{Answer, AnswerAssembler, CorpusAnswerer};
use crate::vector_store::{EntryMetadata, VectorStore};
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

/// Shared application state.
struct AppState {
    assembler: AnswerAssembler,
    corpus_answerer: CorpusAnswerer,
    vector_store: Arc<dyn VectorStore>,
}

/// Run the HTTP API server.
pub async fn run_serve(
    host: Option<String>,
    port: Option<u16>,
    no_index: bool,
    settings: Settings,
) -> anyhow::Result<()> {
    if let Err(e) = preflight::check(Operation::Ask, &settings.llm) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let host = host.unwrap_or_else(|| settings.server.host.clone());
    let port = port.unwrap_or(settings.server.port);
    let index_on_startup = settings.server.index_on_startup && !no_index;

    let orchestrator = Orchestrator::new(settings)?;
    let corpus = orchestrator.load_corpus(None)?;

    if index_on_startup {
        let spinner = Output::spinner(&format!("Indexing {} corpus entries...", corpus.len()));
        let result = orchestrator.build_index(&corpus, false).await;
        spinner.finish_and_clear();
        let report = result?;
        Output::success(&format!(
            "Indexed {} entries ({} skipped)",
            report.indexed, report.skipped
        ));
    }

    let state = Arc::new(AppState {
        assembler: orchestrator.answer_assembler(),
        corpus_answerer: orchestrator.corpus_answerer(&corpus),
        vector_store: orchestrator.vector_store(),
    });

    let app = router(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("Husk API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET  /health");
    Output::kv("Ask (RAG)", "POST /ask");
    Output::kv("Ask (whole corpus)", "POST /ask_cag");
    Output::kv("List index", "GET  /list_data");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}

fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/ask", post(ask))
        .route("/ask_cag", post(ask_cag))
        .route("/list_data", get(list_data))
        .layer(cors)
        .with_state(state)
}

// === Request/Response Types ===

#[derive(Deserialize)]
struct AskRequest {
    query: String,
}

#[derive(Serialize)]
struct ListDataResponse {
    ids: Vec<String>,
    metadatas: Vec<EntryMetadata>,
    total: usize,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

fn internal_error(e: impl std::fmt::Display) -> axum::response::Response {
    error!("Request failed: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
        .into_response()
}

fn answer_response(result: crate::error::Result<Answer>) -> axum::response::Response {
    match result {
        Ok(answer) => Json(answer).into_response(),
        Err(e) => internal_error(e),
    }
}

// === Handlers ===

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn ask(State(state): State<Arc<AppState>>, Json(req): Json<AskRequest>) -> impl IntoResponse {
    info!("POST /ask");
    answer_response(state.assembler.ask(&req.query).await)
}

async fn ask_cag(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AskRequest>,
) -> impl IntoResponse {
    info!("POST /ask_cag");
    answer_response(state.corpus_answerer.ask(&req.query).await)
}

async fn list_data(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.vector_store.list_all().await {
        Ok(entries) => {
            let total = entries.len();
            let (ids, metadatas): (Vec<String>, Vec<EntryMetadata>) = entries.into_iter().map(|e| (e.id, e.metadata)).unzip();
            Json(ListDataResponse {
                ids,
                metadatas,
                total,
            })
            .into_response()
        }
        Err(e) => internal_error(e),
    }
}
