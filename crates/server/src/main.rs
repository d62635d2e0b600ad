use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{Path, State, WebSocketUpgrade},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use portal_api::{
    dashboard::{load_dashboard, DashboardView},
    flows::{
        report::{report_outcome, spawn_report_submission, SubmittedReport},
        schedule::{schedule_outcome, spawn_pickup_scheduling, ScheduledPickup},
        tracking::{detail_outcome, search_outcome, spawn_tracking_load, spawn_tracking_search},
    },
    tracker::KnownPickup,
    uploads::StageOutcome,
    ApiContext, FileStaging, PortalError, SimulatedTransport, TrackingView,
};
use serde::Serialize;
use shared::{
    error::{ApiError, ErrorCode},
    protocol::{
        Activity, FlowOutcome, Notification, Report, SchedulePickupRequest, StagedFile,
        StoreEvent, SubmitReportRequest, TrackSearchRequest,
    },
};
use storage::ReportProvider;
use tokio::sync::broadcast::{self, error::RecvError};
use tower_http::limit::RequestBodyLimitLayer;
use tracing::{error, info, warn};

mod config;

use crate::config::load_settings;

#[derive(Clone)]
struct AppState {
    api: ApiContext,
    /// Owns the session data; `api.store` only holds a weak handle to it.
    provider: Arc<ReportProvider>,
}

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ApiError>)>;
type FlowResult<T> = Result<Json<T>, (StatusCode, Json<FlowFailure>)>;

/// A completed flow along with the notification and redirect a client shows.
#[derive(Debug, Serialize)]
struct FlowResponse<T> {
    result: T,
    outcome: FlowOutcome,
}

/// Error body for flows: the `{code, message}` pair plus whatever the flow
/// wants the client to show or navigate to.
#[derive(Debug, Serialize)]
struct FlowFailure {
    #[serde(flatten)]
    error: ApiError,
    #[serde(flatten)]
    outcome: FlowOutcome,
}

#[derive(Debug, Serialize)]
struct UploadCheckResponse {
    outcome: StageOutcome,
    notifications: Vec<Notification>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = load_settings()?;
    tracing_subscriber::fmt()
        .with_env_filter(settings.log_filter.as_str())
        .init();

    let provider = if settings.seed_sample_data {
        ReportProvider::new()
    } else {
        ReportProvider::empty()
    };
    let transport =
        SimulatedTransport::new(settings.submit_latency(), settings.lookup_latency());
    let api = ApiContext::new(provider.store(), Arc::new(transport))
        .with_upload_policy(settings.uploads.clone());

    let state = AppState {
        api,
        provider: Arc::new(provider),
    };
    let app = build_router(Arc::new(state)).layer(RequestBodyLimitLayer::new(
        settings.max_body_bytes,
    ));

    let addr: SocketAddr = settings.bind_addr.parse()?;
    info!(%addr, "portal server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/reports", get(http_list_reports).post(http_submit_report))
        .route("/activities", get(http_list_activities))
        .route("/pickups", post(http_schedule_pickup))
        .route("/track", get(http_known_pickups))
        .route("/track/search", post(http_search_tracking))
        .route("/track/:id", get(http_track_pickup))
        .route("/dashboard", get(http_dashboard))
        .route("/uploads/check", post(http_check_uploads))
        .route("/ws", get(ws_handler))
        .with_state(state)
}

fn reject(err: PortalError) -> (StatusCode, Json<ApiError>) {
    let status = match err.code() {
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Configuration | ErrorCode::Cancelled | ErrorCode::Internal => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    if status.is_server_error() {
        error!(%err, "request failed");
    }
    (status, Json(err.into()))
}

fn reject_flow(err: PortalError, outcome: FlowOutcome) -> (StatusCode, Json<FlowFailure>) {
    let (status, Json(error)) = reject(err);
    (status, Json(FlowFailure { error, outcome }))
}

async fn healthz() -> &'static str {
    "ok"
}

async fn http_list_reports(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Report>> {
    let reports = state
        .api
        .store
        .reports()
        .await
        .map_err(|e| reject(e.into()))?;
    Ok(Json(reports))
}

async fn http_list_activities(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Activity>> {
    let activities = state
        .api
        .store
        .activities()
        .await
        .map_err(|e| reject(e.into()))?;
    Ok(Json(activities))
}

// Dropping the handler future (client went away) drops the pending
// submission, which aborts it before anything is stored.
async fn http_submit_report(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SubmitReportRequest>,
) -> FlowResult<FlowResponse<SubmittedReport>> {
    let result = spawn_report_submission(state.api.clone(), req).wait().await;
    let outcome = report_outcome(&result);
    match result {
        Ok(submitted) => Ok(Json(FlowResponse {
            result: submitted,
            outcome,
        })),
        Err(err) => Err(reject_flow(err, outcome)),
    }
}

async fn http_schedule_pickup(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SchedulePickupRequest>,
) -> FlowResult<FlowResponse<ScheduledPickup>> {
    let result = spawn_pickup_scheduling(state.api.clone(), req).wait().await;
    let outcome = schedule_outcome(&result);
    match result {
        Ok(scheduled) => Ok(Json(FlowResponse {
            result: scheduled,
            outcome,
        })),
        Err(err) => Err(reject_flow(err, outcome)),
    }
}

async fn http_known_pickups(State(state): State<Arc<AppState>>) -> Json<Vec<KnownPickup>> {
    Json(state.api.tracker.known_ids())
}

async fn http_search_tracking(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TrackSearchRequest>,
) -> FlowResult<FlowOutcome> {
    let result = spawn_tracking_search(state.api.clone(), req).wait().await;
    let outcome = search_outcome(&result);
    match result {
        Ok(_) => Ok(Json(outcome)),
        Err(err) => Err(reject_flow(err, outcome)),
    }
}

async fn http_track_pickup(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> FlowResult<TrackingView> {
    let result = spawn_tracking_load(state.api.clone(), id).wait().await;
    let outcome = detail_outcome(&result);
    match result {
        Ok(view) => Ok(Json(view)),
        Err(err) => Err(reject_flow(err, outcome)),
    }
}

async fn http_dashboard(State(state): State<Arc<AppState>>) -> ApiResult<DashboardView> {
    let view = load_dashboard(&state.api).await.map_err(reject)?;
    Ok(Json(view))
}

/// Runs a batch of file descriptors through the upload limits without
/// storing anything.
async fn http_check_uploads(
    State(state): State<Arc<AppState>>,
    Json(files): Json<Vec<StagedFile>>,
) -> Json<UploadCheckResponse> {
    let mut staging = FileStaging::new(state.api.uploads.clone());
    let outcome = staging.stage(files);
    let notifications = outcome.notifications();
    Json(UploadCheckResponse {
        outcome,
        notifications,
    })
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| ws_connection(state, socket))
}

async fn ws_connection(state: Arc<AppState>, socket: axum::extract::ws::WebSocket) {
    use axum::extract::ws::Message;
    use futures::{SinkExt, StreamExt};

    let (mut sender, mut receiver) = socket.split();
    let mut events_rx = state.provider.subscribe();

    let send_task = tokio::spawn(async move {
        while let Some(text) = next_event_frame(&mut events_rx).await {
            if sender.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
    });

    while let Some(Ok(_msg)) = receiver.next().await {}

    send_task.abort();
}

/// Next store event as a JSON text frame. A subscriber that fell behind skips
/// what it missed; `None` once the provider is gone.
async fn next_event_frame(events: &mut broadcast::Receiver<StoreEvent>) -> Option<String> {
    loop {
        match events.recv().await {
            Ok(event) => match serde_json::to_string(&event) {
                Ok(text) => return Some(text),
                Err(err) => warn!(%err, "failed to encode store event"),
            },
            Err(RecvError::Lagged(skipped)) => {
                warn!(skipped, "websocket subscriber lagged behind store events");
            }
            Err(RecvError::Closed) => return None,
        }
    }
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
