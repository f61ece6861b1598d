// SPDX-FileCopyrightText: 2026 Charla Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `charla serve` command implementation.
//!
//! Wires the SQLite document store, Cohere provider and embedder, Qdrant
//! search, WASender gateway, and the transcription chain into the inbound
//! pipeline, then runs the axum webhook server until a shutdown signal.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::post;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use charla_agent::{InboundHandler, MessageAggregator, MessageProcessor, shutdown};
use charla_cohere::{CohereEmbedder, CohereProvider};
use charla_config::model::CharlaConfig;
use charla_core::traits::transcriber::TranscriberAdapter;
use charla_core::{CharlaError, DocumentStore};
use charla_qdrant::QdrantSearch;
use charla_rag::{ContextRetriever, EmbeddingCache, ReplyOrchestrator};
use charla_store::{ChatHistory, SqliteDocumentStore};
use charla_transcribe::{GroqTranscriber, TranscriptionChain, WitTranscriber, spawn_sweeper};
use charla_wasender::{WasenderGateway, WebhookEvent, extract_inbound};

/// Shared state behind the webhook route.
pub struct AppState {
    handler: InboundHandler,
    webhook_token: String,
}

impl AppState {
    pub fn new(handler: InboundHandler, webhook_token: impl Into<String>) -> Self {
        Self {
            handler,
            webhook_token: webhook_token.into(),
        }
    }
}

/// Builds the webhook router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/webhooks/{token}", post(handle_webhook))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Webhook endpoint handler.
///
/// The path token is the only authentication. Callers get a bare status:
/// 401 for a bad token, 400 for a body that is not a webhook event, 500
/// when processing fails, 200 otherwise (including ignored events).
async fn handle_webhook(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
    body: String,
) -> StatusCode {
    if token != state.webhook_token {
        warn!("webhook called with invalid token");
        return StatusCode::UNAUTHORIZED;
    }

    let event: WebhookEvent = match serde_json::from_str(&body) {
        Ok(event) => event,
        Err(e) => {
            warn!(error = %e, "malformed webhook body");
            return StatusCode::BAD_REQUEST;
        }
    };

    let Some(inbound) = extract_inbound(event) else {
        return StatusCode::OK;
    };

    match state
        .handler
        .handle_inbound(&inbound.recipient, inbound.content)
        .await
    {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            error!(recipient = %inbound.recipient, error = %e, "inbound processing failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Runs the `charla serve` command.
pub async fn run_serve(config: CharlaConfig) -> Result<(), CharlaError> {
    init_tracing(&config.agent.log_level);
    info!("starting charla serve");

    let webhook_token = config
        .server
        .webhook_token
        .clone()
        .ok_or_else(|| CharlaError::Config("server.webhook_token is required for serve".into()))?;
    let cohere_key = config
        .cohere
        .api_key
        .clone()
        .ok_or_else(|| CharlaError::Config("cohere.api_key is required for serve".into()))?;
    let wasender_key = config
        .wasender
        .api_key
        .clone()
        .ok_or_else(|| CharlaError::Config("wasender.api_key is required for serve".into()))?;

    // Document store and conversation history.
    let store = Arc::new(SqliteDocumentStore::new(config.store.clone()));
    store.initialize().await?;
    let history = Arc::new(ChatHistory::new(
        store.clone(),
        config.store.history_collection.clone(),
    ));

    // Cohere provider and embedder share the API key.
    let provider = Arc::new(CohereProvider::new(&cohere_key)?);
    let embedder = Arc::new(CohereEmbedder::new(
        &cohere_key,
        config.cohere.embed_model.clone(),
    )?);

    // Qdrant similarity search.
    let search = Arc::new(QdrantSearch::new(
        config.qdrant.url.clone(),
        config.qdrant.api_key.as_deref(),
    )?);

    let orchestrator = ReplyOrchestrator::new(
        EmbeddingCache::new(store, embedder, config.store.cache_collection.clone()),
        ContextRetriever::new(search, config.qdrant.collection.clone(), config.qdrant.top_k),
        provider,
        config.cohere.chat_model.clone(),
        config.cohere.max_tokens,
        config.agent.system_prompt.clone(),
    );

    // WASender gateway for outbound delivery and media decryption.
    let gateway = Arc::new(WasenderGateway::new(&wasender_key, config.wasender.base_url.clone())?);

    // Transcription fallback chain: Groq first, then Wit.ai.
    let groq = GroqTranscriber::new(
        config.transcription.groq_api_key.clone(),
        config.transcription.temp_dir.as_deref(),
    )?;
    let wit = WitTranscriber::new(config.transcription.wit_ai_token.clone())?;
    let transcription = Arc::new(TranscriptionChain::new(
        vec![
            Arc::new(groq) as Arc<dyn TranscriberAdapter>,
            Arc::new(wit) as Arc<dyn TranscriberAdapter>,
        ],
        config.transcription.language.clone(),
    ));
    if !transcription.any_available() {
        warn!("no transcription credentials configured, voice notes will use the placeholder");
    }

    // Flush pipeline and debounced aggregation.
    let processor = MessageProcessor::new(
        history.clone(),
        orchestrator,
        gateway.clone(),
        Duration::from_secs(config.queue.call_timeout_secs),
    );
    let aggregator = MessageAggregator::new(
        Arc::new(processor),
        Duration::from_millis(config.queue.debounce_ms),
    );

    let handler = InboundHandler::new(history, gateway, transcription, aggregator.clone());

    // Staged-audio sweep, a backstop for files orphaned by crashes.
    let temp_dir = config
        .transcription
        .temp_dir
        .as_ref()
        .map_or_else(std::env::temp_dir, PathBuf::from);
    let sweeper = spawn_sweeper(temp_dir);

    let state = Arc::new(AppState::new(handler, webhook_token));
    let app = build_router(state);

    let addr = format!("{}:{}", config.server.bind_address, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| CharlaError::Internal(format!("failed to bind {addr}: {e}")))?;
    info!(%addr, "webhook server listening");

    let cancel = shutdown::install_signal_handler();
    axum::serve(listener, app)
        .with_graceful_shutdown(cancel.cancelled_owned())
        .await
        .map_err(|e| CharlaError::Internal(format!("server error: {e}")))?;

    sweeper.abort();
    shutdown::drain_aggregator(&aggregator);
    info!("charla serve shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("charla={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
