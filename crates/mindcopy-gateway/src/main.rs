//! MindCopy Gateway: local host for the journal page at 127.0.0.1:8000.
//! Owns the state document, answers panel and mutation requests, and serves every
//! static asset through the offline cache worker.

use axum::{
    body::{Body, Bytes},
    extract::{DefaultBodyLimit, Form, Path, State},
    http::{header, Method, Request, StatusCode, Uri},
    middleware::Next,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use mindcopy_core::{
    render_doc_panel, AssetFetcher, CacheWorker, CachedResponse, DirFetcher, DocBoard,
    EntryFields, HttpFetcher, MindController, MindcopyConfig, MindcopyError, ModeFlag,
    ProfileFields, Region, ShellHost, SledCacheStorage, StateStore, SurfaceSettings,
    AUX_DOCUMENTS,
};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Clone)]
struct AppState {
    controller: Arc<Mutex<MindController>>,
    worker: Arc<CacheWorker>,
    docs: Arc<RwLock<DocBoard>>,
    shell: Arc<ShellHost>,
}

#[derive(Deserialize)]
struct LevelForm {
    value: i64,
}

#[tokio::main]
async fn main() {
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("[mindcopy-gateway] .env not loaded: {} (using system environment)", e);
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match MindcopyConfig::load() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(target: "mindcopy::gateway", error = %e, "config load failed");
            std::process::exit(1);
        }
    };

    let state = match boot(&config).await {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(target: "mindcopy::gateway", error = %e, "boot failed");
            std::process::exit(1);
        }
    };
    spawn_doc_loads(&state);
    let entry = state.shell.entry_url().to_string();

    let app = router(state).layer(axum::middleware::from_fn(log_request));

    let addr = config.bind_addr();
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!(target: "mindcopy::gateway", addr = %addr, error = %e, "bind failed");
            std::process::exit(1);
        }
    };
    tracing::info!(
        target: "mindcopy::gateway",
        version = mindcopy_core::version(),
        entry = %format!("http://{}/{}", addr, entry),
        "{} listening",
        config.app_name
    );

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(target: "mindcopy::gateway", error = %e, "server stopped");
    }
}

/// Open the state slot, paint the page, bring the cache worker up, and load the shell
/// surface. A failed install keeps whatever older cache exists.
async fn boot(config: &MindcopyConfig) -> Result<AppState, MindcopyError> {
    let store = StateStore::open_keyed(config.state_db_path(), &config.state_key)?;
    let controller = MindController::boot(store).with_export_file_name(&config.export_file_name);

    let storage = SledCacheStorage::open(config.cache_db_path())?;
    let network: Arc<dyn AssetFetcher> = match &config.upstream_url {
        Some(url) => Arc::new(HttpFetcher::new(url)),
        None => Arc::new(DirFetcher::new(&config.assets_dir)),
    };
    let worker = CacheWorker::new(
        config.cache_version.clone(),
        config.asset_manifest.clone(),
        Arc::new(storage),
        network,
    );
    if let Err(e) = worker.start().await {
        tracing::warn!(target: "mindcopy::gateway", error = %e, "cache worker not active");
    }

    Ok(AppState {
        controller: Arc::new(Mutex::new(controller)),
        worker: Arc::new(worker),
        docs: Arc::new(RwLock::new(DocBoard::default())),
        shell: Arc::new(ShellHost::launch(
            config.entry_path.clone(),
            SurfaceSettings::default(),
        )),
    })
}

/// One independent task per auxiliary document; each updates only its own panel.
fn spawn_doc_loads(state: &AppState) {
    for (slot, path) in AUX_DOCUMENTS {
        let worker = Arc::clone(&state.worker);
        let docs = Arc::clone(&state.docs);
        tokio::spawn(async move {
            let outcome = worker.fetch(path).await.map(|(res, _)| res);
            docs.write().await.apply(slot, outcome);
        });
    }
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/", get(serve_entry))
        .route("/panels/modes", get(modes_panel))
        .route("/panels/profile", get(profile_panel))
        .route("/panels/entries", get(entries_panel))
        .route("/panels/entry-form", get(entry_form_panel))
        .route("/panels/docs/:slot", get(doc_panel))
        .route("/modes/level", post(set_level))
        .route("/modes/toggle/:flag", post(toggle_flag))
        .route("/profile", post(update_profile))
        .route("/entries", post(append_entry))
        .route("/export", get(export_state))
        .route(
            "/import",
            post(import_state).layer(DefaultBodyLimit::disable()),
        )
        .fallback(serve_asset)
        .with_state(state)
}

async fn log_request(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let response = next.run(request).await;
    tracing::info!(
        target: "mindcopy::gateway",
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        "request"
    );
    response
}

async fn health() -> &'static str {
    "OK"
}

fn error_response(e: MindcopyError) -> (StatusCode, String) {
    match e.user_alert() {
        Some(alert) => (StatusCode::BAD_REQUEST, alert.to_string()),
        None => match e {
            MindcopyError::UnknownMode(_) => (StatusCode::NOT_FOUND, e.to_string()),
            other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
        },
    }
}

fn asset_response(res: CachedResponse) -> Response {
    let status = StatusCode::from_u16(res.status).unwrap_or(StatusCode::BAD_GATEWAY);
    (status, [(header::CONTENT_TYPE, res.content_type)], res.body).into_response()
}

async fn fetch_asset(state: &AppState, path: &str) -> Response {
    match state.worker.fetch(path).await {
        Ok((res, _)) => asset_response(res),
        Err(e) => {
            tracing::warn!(target: "mindcopy::gateway", path, error = %e, "asset fetch failed");
            (StatusCode::BAD_GATEWAY, e.to_string()).into_response()
        }
    }
}

/// Entry page the shell loaded, through the cache like every other asset.
async fn serve_entry(State(state): State<AppState>) -> Response {
    fetch_asset(&state, state.shell.entry_url()).await
}

/// Any other same-origin GET: cache first, then the asset directory.
async fn serve_asset(State(state): State<AppState>, method: Method, uri: Uri) -> Response {
    if method != Method::GET {
        return StatusCode::NOT_FOUND.into_response();
    }
    fetch_asset(&state, uri.path()).await
}

async fn region(state: &AppState, region: Region) -> Html<String> {
    Html(state.controller.lock().await.region(region).to_string())
}

async fn modes_panel(State(state): State<AppState>) -> Html<String> {
    region(&state, Region::Modes).await
}

async fn profile_panel(State(state): State<AppState>) -> Html<String> {
    region(&state, Region::Profile).await
}

async fn entries_panel(State(state): State<AppState>) -> Html<String> {
    region(&state, Region::Entries).await
}

async fn entry_form_panel(State(state): State<AppState>) -> Html<String> {
    region(&state, Region::EntryForm).await
}

async fn doc_panel(
    State(state): State<AppState>,
    Path(slot): Path<String>,
) -> Result<Html<String>, StatusCode> {
    let docs = state.docs.read().await;
    let panel = docs.panel(&slot).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Html(render_doc_panel(panel)))
}

async fn set_level(
    State(state): State<AppState>,
    Form(form): Form<LevelForm>,
) -> Result<Html<String>, (StatusCode, String)> {
    let mut c = state.controller.lock().await;
    c.set_level(form.value).map_err(error_response)?;
    Ok(Html(c.region(Region::Modes).to_string()))
}

async fn toggle_flag(
    State(state): State<AppState>,
    Path(flag): Path<String>,
) -> Result<Html<String>, (StatusCode, String)> {
    let flag: ModeFlag = flag.parse().map_err(error_response)?;
    let mut c = state.controller.lock().await;
    c.toggle_flag(flag).map_err(error_response)?;
    Ok(Html(c.region(Region::Modes).to_string()))
}

async fn update_profile(
    State(state): State<AppState>,
    Form(fields): Form<ProfileFields>,
) -> Result<Html<String>, (StatusCode, String)> {
    let mut c = state.controller.lock().await;
    c.update_profile(fields).map_err(error_response)?;
    Ok(Html(c.region(Region::Profile).to_string()))
}

async fn append_entry(
    State(state): State<AppState>,
    Form(fields): Form<EntryFields>,
) -> Result<Html<String>, (StatusCode, String)> {
    let mut c = state.controller.lock().await;
    c.append_entry(fields).map_err(error_response)?;
    Ok(Html(c.region(Region::Entries).to_string()))
}

async fn export_state(State(state): State<AppState>) -> Result<Response, (StatusCode, String)> {
    let file = state.controller.lock().await.export().map_err(error_response)?;
    Ok((
        [
            (header::CONTENT_TYPE, file.content_type.to_string()),
            (header::CONTENT_DISPOSITION, file.content_disposition()),
        ],
        file.body,
    )
        .into_response())
}

/// Replaces the whole document. On success the client reloads every panel. The route
/// has no body limit, so any export can be imported back.
async fn import_state(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    let mut c = state.controller.lock().await;
    c.import_bytes(&body).map_err(error_response)?;
    Ok(Json(serde_json::json!({
        "status": "imported",
        "entries": c.document().entries.len(),
        "reload": true,
    })))
}
