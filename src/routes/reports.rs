use std::time::Instant;

use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header, HeaderValue},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::AppState;
use crate::domain::{Language, Report, ReportConfig, locale};
use crate::error::{AppError, AppResult};
use crate::export;
use crate::llm::{self, GenerateRequest};
use crate::prompt::{self, DraftRequest};
use crate::telemetry::metrics::{
    DOCUMENTS_DRAFTED, DOCUMENTS_EXPORTED, DOCUMENTS_REFINED, DRAFT_DURATION,
};

#[derive(Debug, Deserialize)]
pub struct RefineBody {
    pub feedback: String,
}

pub async fn list_reports(State(state): State<AppState>) -> Json<Vec<Report>> {
    Json(state.workspace().repo.reports().to_vec())
}

pub async fn get_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Report>> {
    let ws = state.workspace();
    let report = ws
        .repo
        .get(&id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("Report {id} not found")))?;
    Ok(Json(report))
}

#[tracing::instrument(
    name = "document draft",
    skip_all,
    fields(document.language, document.type, report.id)
)]
pub async fn create_report(
    State(state): State<AppState>,
    Json(config): Json<ReportConfig>,
) -> AppResult<Json<Report>> {
    // Fail fast: no request is ever sent for an incomplete configuration.
    let request = prompt::initial_draft(&config)?;
    let language = config.language;

    let span = tracing::Span::current();
    span.record("document.language", locale::style_name(language));
    span.record("document.type", locale::type_label(Language::English, config.kind));

    {
        let mut ws = state.workspace();
        ws.session.begin_generation()?;
        ws.repo.remember_sender(&config.sender_name);
    }

    let result = run_generation(&state, request, "draft").await;

    let mut ws = state.workspace();
    match result {
        Ok(content) => {
            let content = llm::content_or_fallback(content, language);
            let report = Report::from_config(config, content);
            ws.repo.add(report.clone());
            ws.session.finish_generation(Some(report.id.clone()));

            DOCUMENTS_DRAFTED.add(1, &[]);
            span.record("report.id", report.id.as_str());
            tracing::info!(report.id = %report.id, "Document drafted");
            Ok(Json(report))
        }
        Err(e) => {
            // No partial report enters the repository; the form state returns.
            ws.session.finish_generation(None);
            tracing::error!(error = %e, "Draft generation failed");
            Err(AppError::Generation(
                locale::generation_failed_message(language).to_string(),
            ))
        }
    }
}

#[tracing::instrument(name = "document refine", skip_all, fields(report.id = %id))]
pub async fn refine_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<RefineBody>,
) -> AppResult<Json<Report>> {
    let (request, language) = {
        let mut ws = state.workspace();
        let report = ws
            .repo
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Report {id} not found")))?;
        let request = prompt::refinement(&report, &body.feedback)?;
        ws.session.begin_refinement(&id)?;
        (request, report.language)
    };

    let result = run_generation(&state, request, "refine").await;

    let mut ws = state.workspace();
    ws.session.finish_refinement();
    match result {
        Ok(content) => {
            let mut updated = ws
                .repo
                .get(&id)
                .cloned()
                .ok_or_else(|| AppError::Internal(format!("report {id} vanished mid-refinement")))?;
            updated.content = llm::content_or_fallback(content, language);
            let stored = ws
                .repo
                .replace(&id, updated)
                .ok_or_else(|| AppError::Internal(format!("report {id} vanished mid-refinement")))?;

            DOCUMENTS_REFINED.add(1, &[]);
            tracing::info!(report.id = %stored.id, "Document refined");
            Ok(Json(stored))
        }
        Err(e) => {
            // Prior content stays untouched.
            tracing::error!(error = %e, "Refinement failed");
            Err(AppError::Generation(
                locale::refinement_failed_message(language).to_string(),
            ))
        }
    }
}

/// One in-flight call against the generation service; any failure collapses
/// into the caller's generic alert.
async fn run_generation(
    state: &AppState,
    request: DraftRequest,
    stage: &str,
) -> anyhow::Result<String> {
    let start = Instant::now();
    let result = state
        .llm
        .generate(&GenerateRequest {
            model: state.config.llm_model.clone(),
            system: request.system,
            prompt: request.prompt,
            temperature: state.config.temperature,
            max_tokens: state.config.max_tokens,
            stage: stage.to_string(),
        })
        .await;
    DRAFT_DURATION.record(start.elapsed().as_secs_f64(), &[]);
    result.map(|resp| resp.content)
}

pub async fn open_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Report>> {
    let mut ws = state.workspace();
    let report = ws
        .repo
        .get(&id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("Report {id} not found")))?;
    ws.session.open(&id)?;
    Ok(Json(report))
}

pub async fn close_report(State(state): State<AppState>) -> AppResult<StatusCode> {
    state.workspace().session.close()?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let mut ws = state.workspace();
    ws.session.ensure_not_busy()?;
    ws.repo.remove(&id);
    ws.session.note_removed(&id);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn export_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let report = state
        .workspace()
        .repo
        .get(&id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("Report {id} not found")))?;

    let doc = export::to_word_doc(&report);
    DOCUMENTS_EXPORTED.add(1, &[]);
    tracing::info!(report.id = %report.id, filename = %doc.filename, "Document exported");

    let disposition = content_disposition(&doc.filename);
    let headers = [
        (
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/msword"),
        ),
        (
            header::CONTENT_DISPOSITION,
            HeaderValue::from_str(&disposition)
                .map_err(|e| AppError::Internal(format!("invalid download filename: {e}")))?,
        ),
    ];
    Ok((headers, doc.bytes).into_response())
}

/// ASCII-safe plus RFC 5987 variant, so Arabic and Somali titles download
/// with their real names on modern clients.
fn content_disposition(filename: &str) -> String {
    let ascii_name: String = filename
        .chars()
        .map(|c| {
            if c.is_ascii() && c != '"' && c != '\\' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!(
        "attachment; filename=\"{ascii_name}\"; filename*=UTF-8''{}",
        export::encode_rfc5987(filename)
    )
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::config::Config;
    use crate::llm::{GenerateResponse, LlmClient, Provider};
    use crate::session::{Phase, Workspace};
    use crate::store::{MemoryStore, ReportRepository};

    struct FailingProvider;

    #[async_trait::async_trait]
    impl Provider for FailingProvider {
        async fn generate(&self, _req: &GenerateRequest) -> anyhow::Result<GenerateResponse> {
            anyhow::bail!("503 service unavailable")
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    fn test_state(provider: Arc<dyn Provider>) -> AppState {
        let repo = ReportRepository::load(Arc::new(MemoryStore::new()));
        AppState {
            config: Config {
                port: 0,
                environment: "test".to_string(),
                data_dir: "data".to_string(),
                llm_provider: "failing".to_string(),
                llm_model: "test-model".to_string(),
                ollama_base_url: String::new(),
                openai_api_key: None,
                anthropic_api_key: None,
                google_api_key: None,
                otel_service_name: "test".to_string(),
                otel_exporter_endpoint: String::new(),
                temperature: 0.65,
                max_tokens: 256,
            },
            llm: Arc::new(LlmClient {
                provider,
                provider_name: "failing".to_string(),
            }),
            workspace: Arc::new(Mutex::new(Workspace::new(repo))),
        }
    }

    fn sample_config() -> ReportConfig {
        serde_json::from_str(
            r#"{"topic": "Budget Review", "recipient": "Finance Dept", "senderName": "A. Noor"}"#,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_failure_adds_no_partial_report() {
        let state = test_state(Arc::new(FailingProvider));

        let result = create_report(State(state.clone()), Json(sample_config())).await;

        assert!(matches!(result, Err(AppError::Generation(_))));
        let ws = state.workspace();
        assert!(ws.repo.reports().is_empty());
        assert_eq!(ws.session.phase(), Phase::Idle);
        assert_eq!(ws.session.active_id(), None);
    }

    #[tokio::test]
    async fn test_refine_failure_leaves_content_untouched() {
        let state = test_state(Arc::new(FailingProvider));
        let report = Report::from_config(sample_config(), "Original body".to_string());
        let id = report.id.clone();
        {
            let mut ws = state.workspace();
            ws.repo.add(report);
            ws.session.open(&id).unwrap();
        }

        let result = refine_report(
            State(state.clone()),
            Path(id.clone()),
            Json(RefineBody {
                feedback: "make it shorter".to_string(),
            }),
        )
        .await;

        assert!(matches!(result, Err(AppError::Generation(_))));
        let ws = state.workspace();
        assert_eq!(ws.repo.get(&id).unwrap().content, "Original body");
        assert_eq!(ws.session.phase(), Phase::Viewing);
        assert_eq!(ws.session.active_id(), Some(id.as_str()));
    }

    #[test]
    fn test_refine_body_deserialize() {
        let body: RefineBody = serde_json::from_str(r#"{"feedback": "make it shorter"}"#).unwrap();
        assert_eq!(body.feedback, "make it shorter");
    }

    #[test]
    fn test_create_body_uses_domain_defaults() {
        let config: ReportConfig = serde_json::from_str(
            r#"{"topic": "Budget Review", "recipient": "Finance Dept", "senderName": "A. Noor"}"#,
        )
        .unwrap();
        assert_eq!(config.language, Language::Arabic);
        assert!(config.logo_url.is_none());
    }

    #[test]
    fn test_content_disposition_ascii_name() {
        let value = content_disposition("Budget_Review_March 15, 2024.doc");
        assert!(value.starts_with("attachment; filename=\"Budget_Review_March 15, 2024.doc\""));
        assert!(value.contains("filename*=UTF-8''Budget_Review_March%2015%2C%202024.doc"));
        assert!(value.is_ascii());
    }

    #[test]
    fn test_content_disposition_non_ascii_name() {
        let value = content_disposition("تقرير.doc");
        assert!(value.is_ascii());
        assert!(value.contains("filename=\"_____.doc\""));
        assert!(value.contains("filename*=UTF-8''%D8%AA%D9%82%D8%B1%D9%8A%D8%B1.doc"));
    }
}
