use anyhow::Result;
use axum::{extract::{Path, Query, State}, http::{HeaderMap, HeaderValue, StatusCode}, routing::{get, post}, Json, Router};
use parking_lot::RwLock;
use sentrank_core::persist::{load_engine, IndexPaths};
use sentrank_core::{AnswerOptions, Engine, FILE_MATCHES, SENTENCE_MATCHES};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

const MAX_MATCHES: usize = 100;

#[derive(Deserialize)]
pub struct AnswerParams {
    pub q: String,
    #[serde(default = "default_files")]
    pub files: usize,
    #[serde(default = "default_sentences")]
    pub sentences: usize,
}
fn default_files() -> usize { FILE_MATCHES }
fn default_sentences() -> usize { SENTENCE_MATCHES }

#[derive(Serialize)]
pub struct AnswerResponse {
    pub query: String,
    pub terms: Vec<String>,
    pub took_s: f64,
    pub files: Vec<FileHit>,
    pub sentences: Vec<SentenceHit>,
}

#[derive(Serialize)]
pub struct FileHit {
    pub id: String,
    pub score: f64,
}

#[derive(Serialize)]
pub struct SentenceHit {
    pub text: String,
    pub idf_sum: f64,
    pub density: f64,
    pub highlighted: String,
}

/// Loads an engine from `corpus`: a snapshot directory if it has one, plain
/// `.txt` files otherwise.
pub fn open_engine(corpus: &std::path::Path) -> Result<Engine> {
    let paths = IndexPaths::new(corpus);
    if paths.exists() {
        return load_engine(&paths);
    }
    Ok(Engine::from_directory(corpus)?)
}

#[derive(Clone)]
pub struct AppState {
    pub corpus: PathBuf,
    /// The current engine. Handlers clone the `Arc` and drop the lock before
    /// scoring; reload swaps in a new engine.
    pub engine: Arc<RwLock<Arc<Engine>>>,
    pub admin_token: Option<String>,
}

impl AppState {
    fn engine(&self) -> Arc<Engine> {
        self.engine.read().clone()
    }
}

/// Builds the router with the admin token taken from `ADMIN_TOKEN`.
pub fn build_app(corpus: PathBuf) -> Result<Router> {
    build_app_with_token(corpus, std::env::var("ADMIN_TOKEN").ok())
}

pub fn build_app_with_token(corpus: PathBuf, admin_token: Option<String>) -> Result<Router> {
    let engine = open_engine(&corpus)?;
    let app_state = AppState { corpus, engine: Arc::new(RwLock::new(Arc::new(engine))), admin_token };

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/answer", get(answer_handler))
        .route("/doc/:doc_id", get(doc_handler))
        .route("/admin/reload", post(reload_handler))
        .with_state(app_state)
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http());
    Ok(app)
}

/// Origins from `CORS_ALLOW_ORIGIN` (comma-separated); any origin when unset or
/// when nothing in it parses.
fn cors_layer() -> CorsLayer {
    let origins: Vec<HeaderValue> = std::env::var("CORS_ALLOW_ORIGIN")
        .map(|val| val.split(',').filter_map(|s| s.trim().parse().ok()).collect())
        .unwrap_or_default();
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(origins))
    }
}

pub async fn answer_handler(
    State(state): State<AppState>,
    Query(params): Query<AnswerParams>,
) -> Result<Json<AnswerResponse>, (StatusCode, String)> {
    let start = std::time::Instant::now();
    let options = AnswerOptions {
        files: params.files.clamp(1, MAX_MATCHES),
        sentences: params.sentences.clamp(1, MAX_MATCHES),
    };
    let engine = state.engine();
    let answer = engine.answer(&params.q, options).map_err(|e| {
        tracing::error!(error = %e, query = %params.q, "answering failed");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    let files = answer.files.iter().map(|f| FileHit { id: f.id.to_string(), score: f.score }).collect();
    let sentences = answer
        .sentences
        .iter()
        .map(|s| SentenceHit {
            text: s.text.clone(),
            idf_sum: s.score.idf_sum,
            density: s.score.density,
            highlighted: highlight_terms(&s.text, &answer.terms),
        })
        .collect();

    let elapsed = start.elapsed();
    Ok(Json(AnswerResponse { query: params.q, terms: answer.terms, took_s: elapsed.as_secs_f64(), files, sentences }))
}

pub async fn doc_handler(
    State(state): State<AppState>,
    Path(doc_id): Path<String>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)> {
    let engine = state.engine();
    match engine.document(&doc_id) {
        Some(text) => Ok(Json(serde_json::json!({ "id": doc_id, "text": text }))),
        None => Err((StatusCode::NOT_FOUND, Json(serde_json::json!({ "error": "not found" })))),
    }
}

/// Wrap case-insensitive occurrences of each term in `<em>`. Terms are already
/// normalized, so they match the lowercased form of the sentence words.
fn highlight_terms(sentence: &str, terms: &[String]) -> String {
    let alternatives: Vec<String> = terms.iter().filter(|t| !t.trim().is_empty()).map(|t| regex::escape(t)).collect();
    if alternatives.is_empty() {
        return sentence.to_string();
    }
    let pattern = format!(r"\b(?:{})\b", alternatives.join("|"));
    match regex::RegexBuilder::new(&pattern).case_insensitive(true).build() {
        Ok(re) => re.replace_all(sentence, |caps: &regex::Captures| format!("<em>{}</em>", &caps[0])).into_owned(),
        Err(_) => sentence.to_string(),
    }
}

// --- Admin endpoints ---
async fn reload_handler(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    authorize(&state, &headers)?;
    let corpus = state.corpus.clone();
    let engine = tokio::task::spawn_blocking(move || open_engine(&corpus))
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, format!("{e:#}")))?;
    let num_docs = engine.num_documents();
    *state.engine.write() = Arc::new(engine);
    tracing::info!(num_docs, corpus = %state.corpus.display(), "engine reloaded");
    Ok(Json(serde_json::json!({ "num_docs": num_docs })))
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), (StatusCode, String)> {
    let required = match &state.admin_token {
        Some(t) => t,
        None => return Err((StatusCode::UNAUTHORIZED, "ADMIN_TOKEN not set".into())),
    };
    let provided = headers.get("X-ADMIN-TOKEN").and_then(|v| v.to_str().ok()).unwrap_or("");
    if provided == required {
        Ok(())
    } else {
        Err((StatusCode::UNAUTHORIZED, "invalid admin token".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn highlights_whole_words_case_insensitively() {
        let terms = vec!["python".to_string(), "1991".to_string()];
        assert_eq!(
            highlight_terms("Python was released in 1991; pythonic code followed.", &terms),
            "<em>Python</em> was released in <em>1991</em>; pythonic code followed."
        );
    }

    #[test]
    fn no_terms_leaves_sentence_alone() {
        assert_eq!(highlight_terms("A dog.", &[]), "A dog.");
    }
}
