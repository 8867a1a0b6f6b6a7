use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use axum::Router;
use axum::http::{Request, Response};
use axum::routing::{delete, get, post};
use opentelemetry::KeyValue;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::{MakeSpan, OnResponse, TraceLayer},
};
use tracing::Span;

mod config;
mod domain;
mod error;
mod export;
mod llm;
mod prompt;
mod routes;
mod session;
mod store;
mod telemetry;

use config::Config;
use session::Workspace;
use store::{ReportRepository, SledStore};
use telemetry::{HTTP_REQUEST_DURATION, HTTP_REQUESTS_TOTAL, init_telemetry};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub llm: Arc<llm::LlmClient>,
    workspace: Arc<Mutex<Workspace>>,
}

impl AppState {
    /// The workspace lock is held only for synchronous mutations, never
    /// across the generation call.
    pub fn workspace(&self) -> MutexGuard<'_, Workspace> {
        self.workspace.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Clone)]
struct HttpMakeSpan;

impl<B> MakeSpan<B> for HttpMakeSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        let method = request.method().as_str();
        let path = request.uri().path();

        tracing::info_span!(
            "HTTP request",
            otel.name = %format!("{} {}", method, path),
            http.method = %method,
            http.route = %path,
            http.target = %request.uri(),
            http.scheme = "http",
            http.flavor = ?request.version(),
            http.user_agent = request.headers()
                .get("user-agent")
                .and_then(|v| v.to_str().ok())
                .unwrap_or(""),
            http.response.status_code = tracing::field::Empty,
            otel.status_code = tracing::field::Empty,
        )
    }
}

#[derive(Clone)]
struct HttpOnResponse;

impl<B> OnResponse<B> for HttpOnResponse {
    fn on_response(self, response: &Response<B>, latency: Duration, span: &Span) {
        let status = response.status().as_u16();

        span.record("http.response.status_code", status as i64);

        if status >= 500 {
            span.record("otel.status_code", "ERROR");
        } else {
            span.record("otel.status_code", "OK");
        }

        let latency_ms = latency.as_secs_f64() * 1000.0;
        let status_class = format!("{}xx", status / 100);

        HTTP_REQUESTS_TOTAL.add(
            1,
            &[
                KeyValue::new("http.status_code", status.to_string()),
                KeyValue::new("http.status_class", status_class.clone()),
            ],
        );

        HTTP_REQUEST_DURATION.record(
            latency_ms,
            &[
                KeyValue::new("http.status_code", status.to_string()),
                KeyValue::new("http.status_class", status_class),
            ],
        );

        tracing::info!(
            http.response.status_code = status,
            latency_ms = latency_ms,
            "finished processing request"
        );
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();

    let telemetry_guard = init_telemetry(&config)?;

    tracing::info!(
        port = config.port,
        environment = %config.environment,
        "Starting smart-secretary"
    );

    let store = Arc::new(SledStore::open(&config.data_dir)?);
    let repo = ReportRepository::load(store);
    let workspace = Arc::new(Mutex::new(Workspace::new(repo)));

    let provider: Arc<dyn llm::Provider> = match config.llm_provider.as_str() {
        "anthropic" => Arc::new(llm::anthropic::AnthropicProvider::new(
            config.anthropic_api_key.as_deref().unwrap_or(""),
        )),
        "openai" => Arc::new(llm::openai::OpenAIProvider::new(
            config.openai_api_key.as_deref().unwrap_or(""),
        )),
        "ollama" => Arc::new(llm::openai::OpenAIProvider::new_ollama(
            &config.ollama_base_url,
        )),
        _ => Arc::new(llm::openai::OpenAIProvider::new_google(
            config.google_api_key.as_deref().unwrap_or(""),
        )),
    };

    tracing::info!(
        provider = %config.llm_provider,
        model = %config.llm_model,
        "Generation client initialized"
    );

    let llm = Arc::new(llm::LlmClient {
        provider,
        provider_name: config.llm_provider.clone(),
    });

    let state = AppState {
        config: config.clone(),
        llm,
        workspace,
    };

    let app = Router::new()
        .route("/api/health", get(routes::health::health))
        .route("/api/session", get(routes::session::session_info))
        .route("/api/reports", get(routes::reports::list_reports))
        .route("/api/reports", post(routes::reports::create_report))
        .route("/api/reports/close", post(routes::reports::close_report))
        .route("/api/reports/{id}", get(routes::reports::get_report))
        .route("/api/reports/{id}", delete(routes::reports::delete_report))
        .route("/api/reports/{id}/open", post(routes::reports::open_report))
        .route(
            "/api/reports/{id}/refine",
            post(routes::reports::refine_report),
        )
        .route(
            "/api/reports/{id}/export",
            get(routes::reports::export_report),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(HttpMakeSpan)
                .on_response(HttpOnResponse),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;

    tracing::info!(%addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    telemetry_guard.shutdown();

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
