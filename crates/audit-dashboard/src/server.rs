//! HTTP server implementation using axum.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use axum::Router;
use futures_util::stream::StreamExt;
use futures_util::SinkExt;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tracing::{debug, info, warn};

use audit_core::{
    ActivityEntry, ApiResponse, BridgeLink, ExportFormat, ExportType, HealthStatus, MediaProof,
    OverviewSnapshot, SecurityNode, ThreatEvent, VerificationResult,
};
use audit_export::RenderedExport;
use audit_telemetry::Metrics;

use crate::config::DashboardConfig;
use crate::state::DashboardState;
use crate::types::{ExportQuery, ExportReceipt, MediaQuery};

/// Connection limiter to prevent too many concurrent WebSocket connections.
pub struct ConnectionLimiter {
    current: AtomicUsize,
    max: usize,
}

impl ConnectionLimiter {
    pub fn new(max: usize) -> Self {
        Self {
            current: AtomicUsize::new(0),
            max,
        }
    }

    pub fn try_acquire(self: &Arc<Self>) -> Option<ConnectionGuard> {
        loop {
            let current = self.current.load(Ordering::Acquire);
            if current >= self.max {
                return None;
            }
            if self
                .current
                .compare_exchange(current, current + 1, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                return Some(ConnectionGuard {
                    limiter: self.clone(),
                });
            }
        }
    }

    pub fn current_count(&self) -> usize {
        self.current.load(Ordering::Relaxed)
    }
}

/// Releases its connection slot on drop.
pub struct ConnectionGuard {
    limiter: Arc<ConnectionLimiter>,
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.limiter.current.fetch_sub(1, Ordering::Release);
    }
}

/// Shared application state for axum handlers.
#[derive(Clone)]
pub struct AppState {
    dashboard_state: DashboardState,
    broadcast_tx: broadcast::Sender<String>,
    connection_limiter: Arc<ConnectionLimiter>,
}

impl AppState {
    pub fn new(
        dashboard_state: DashboardState,
        broadcast_tx: broadcast::Sender<String>,
        config: &DashboardConfig,
    ) -> Self {
        Self {
            dashboard_state,
            broadcast_tx,
            connection_limiter: Arc::new(ConnectionLimiter::new(config.max_connections)),
        }
    }
}

/// Create the axum router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/overview", get(get_overview))
        .route("/api/security/nodes", get(get_security_nodes))
        .route("/api/security/threats", get(get_security_threats))
        .route("/api/media", get(get_media_proofs))
        .route("/api/bridge/health", get(get_bridge_health))
        .route("/api/bridge/flow", get(get_bridge_flow))
        .route("/api/verify/{hash}", get(verify_on_chain))
        .route("/api/activity", get(get_activity))
        .route(
            "/api/export/{export_type}",
            get(download_export).post(save_export),
        )
        .route("/metrics", get(get_metrics))
        .route("/ws", get(ws_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn get_overview(State(state): State<AppState>) -> Json<ApiResponse<OverviewSnapshot>> {
    Json(state.dashboard_state.generator().fetch_overview().await)
}

async fn get_security_nodes(
    State(state): State<AppState>,
) -> Json<ApiResponse<Vec<SecurityNode>>> {
    Json(state.dashboard_state.generator().fetch_security_nodes().await)
}

async fn get_security_threats(
    State(state): State<AppState>,
) -> Json<ApiResponse<Vec<ThreatEvent>>> {
    Json(state.dashboard_state.generator().fetch_security_threats().await)
}

async fn get_media_proofs(
    State(state): State<AppState>,
    Query(query): Query<MediaQuery>,
) -> Json<ApiResponse<Vec<MediaProof>>> {
    Json(
        state
            .dashboard_state
            .generator()
            .fetch_media_proofs(query.campaign.as_deref())
            .await,
    )
}

async fn get_bridge_health(
    State(state): State<AppState>,
) -> Json<ApiResponse<BTreeMap<String, HealthStatus>>> {
    Json(state.dashboard_state.generator().fetch_bridge_health().await)
}

async fn get_bridge_flow(State(state): State<AppState>) -> Json<ApiResponse<Vec<BridgeLink>>> {
    Json(state.dashboard_state.generator().fetch_bridge_flow().await)
}

async fn verify_on_chain(
    State(state): State<AppState>,
    Path(hash): Path<String>,
) -> Json<ApiResponse<VerificationResult>> {
    Json(state.dashboard_state.generator().verify_on_chain(&hash).await)
}

async fn get_activity(State(state): State<AppState>) -> Json<ApiResponse<Vec<ActivityEntry>>> {
    let generator = state.dashboard_state.generator();
    Json(ApiResponse::ok(
        state.dashboard_state.live_feed().recent(),
        generator.clock().now(),
    ))
}

async fn get_metrics() -> Response {
    match Metrics::gather_text() {
        Ok(text) => text.into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

/// Parse the export path/query pair. Format defaults to JSON.
fn parse_export_request(
    export_type: &str,
    query: &ExportQuery,
) -> Result<(ExportType, ExportFormat), Response> {
    let export_type = export_type
        .parse::<ExportType>()
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()).into_response())?;
    let format = query
        .format
        .as_deref()
        .unwrap_or("json")
        .parse::<ExportFormat>()
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()).into_response())?;
    Ok((export_type, format))
}

/// Render an export, mapping refusal to `204` and failures to `500`.
fn render_export(
    state: &AppState,
    export_type: ExportType,
    format: ExportFormat,
) -> Result<RenderedExport, Response> {
    let payload = state.dashboard_state.build_payload(export_type);
    match audit_export::render(&payload, format) {
        Ok(Some(rendered)) => Ok(rendered),
        Ok(None) => Err(StatusCode::NO_CONTENT.into_response()),
        Err(e) => {
            warn!(error = %e, %export_type, %format, "Export rendering failed");
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response())
        }
    }
}

/// Stream an export back as a file attachment.
async fn download_export(
    State(state): State<AppState>,
    Path(export_type): Path<String>,
    Query(query): Query<ExportQuery>,
) -> Response {
    let (export_type, format) = match parse_export_request(&export_type, &query) {
        Ok(parsed) => parsed,
        Err(resp) => return resp,
    };
    let rendered = match render_export(&state, export_type, format) {
        Ok(rendered) => rendered,
        Err(resp) => return resp,
    };

    info!(filename = %rendered.filename, bytes = rendered.content.len(), "Export downloaded");
    (
        [
            (header::CONTENT_TYPE, rendered.mime_type),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", rendered.filename),
            ),
        ],
        rendered.content,
    )
        .into_response()
}

/// Deliver an export through the configured sink.
async fn save_export(
    State(state): State<AppState>,
    Path(export_type): Path<String>,
    Query(query): Query<ExportQuery>,
) -> Response {
    let (export_type, format) = match parse_export_request(&export_type, &query) {
        Ok(parsed) => parsed,
        Err(resp) => return resp,
    };
    let rendered = match render_export(&state, export_type, format) {
        Ok(rendered) => rendered,
        Err(resp) => return resp,
    };

    match state.dashboard_state.export_sink().deliver(&rendered) {
        Ok(delivery) => {
            let receipt = ExportReceipt {
                filename: rendered.filename,
                location: delivery.location,
                bytes: delivery.bytes,
            };
            let now = state.dashboard_state.generator().clock().now();
            Json(ApiResponse::ok(receipt, now)).into_response()
        }
        Err(e) => {
            warn!(error = %e, filename = %rendered.filename, "Export delivery failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

/// WebSocket upgrade handler.
async fn ws_handler(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    let guard = match state.connection_limiter.try_acquire() {
        Some(guard) => guard,
        None => {
            warn!(
                current = state.connection_limiter.current_count(),
                "WebSocket connection limit reached"
            );
            return (StatusCode::SERVICE_UNAVAILABLE, "Too many connections").into_response();
        }
    };

    info!(
        connections = state.connection_limiter.current_count(),
        "New WebSocket connection"
    );

    ws.on_upgrade(move |socket| handle_ws_connection(socket, state, guard))
}

/// Handle a WebSocket connection.
async fn handle_ws_connection(socket: WebSocket, state: AppState, _guard: ConnectionGuard) {
    let (mut sender, mut receiver) = socket.split();

    // Subscribe before sending the snapshot so no entry falls in between.
    let mut broadcast_rx = state.broadcast_tx.subscribe();

    let initial_msg = state.dashboard_state.activity_snapshot();
    if let Ok(json) = serde_json::to_string(&initial_msg) {
        if sender.send(Message::Text(json.into())).await.is_err() {
            debug!("Failed to send initial snapshot, client disconnected");
            return;
        }
    }

    // Spawn task to handle incoming messages (for ping/pong and close)
    let mut incoming_task = tokio::spawn(async move {
        while let Some(result) = receiver.next().await {
            match result {
                Ok(Message::Close(_)) => {
                    debug!("Client sent close frame");
                    break;
                }
                Err(e) => {
                    debug!(error = %e, "WebSocket receive error");
                    break;
                }
                _ => {}
            }
        }
    });

    loop {
        tokio::select! {
            result = broadcast_rx.recv() => {
                match result {
                    Ok(msg) => {
                        if sender.send(Message::Text(msg.into())).await.is_err() {
                            debug!("Failed to send message, client disconnected");
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!(skipped = n, "WebSocket client lagged, catching up");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        debug!("Broadcast channel closed");
                        break;
                    }
                }
            }
            _ = &mut incoming_task => {
                debug!("Incoming task completed, closing connection");
                break;
            }
        }
    }

    incoming_task.abort();
    info!(
        connections = state.connection_limiter.current_count().saturating_sub(1),
        "WebSocket connection closed"
    );
}

/// Run the dashboard HTTP server until `shutdown` is cancelled.
pub async fn run_server(
    dashboard_state: DashboardState,
    config: DashboardConfig,
    shutdown: CancellationToken,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Live feed ticks every few seconds; 32 leaves ample room for slow clients.
    let (broadcast_tx, _) = broadcast::channel::<String>(32);

    let state = AppState::new(dashboard_state.clone(), broadcast_tx.clone(), &config);
    let app = create_router(state);

    tokio::spawn(crate::broadcast::run_broadcaster(
        dashboard_state,
        broadcast_tx,
        shutdown.clone(),
    ));

    let addr = config.listen_addr();
    info!(addr = %addr, "Starting dashboard server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await?;

    info!("Dashboard server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Method, Request};
    use tower::ServiceExt;

    use audit_export::{ExportSink, MemorySink};
    use audit_mock::{Clock, LiveFeed, ManualClock, MockConfig, MockGenerator, TelemetryStore};
    use chrono::{TimeZone, Utc};

    fn test_app() -> (Router, DashboardState, Arc<MemorySink>) {
        test_app_with(MockGenerator::new(MockConfig::deterministic(8)))
    }

    fn test_app_with(generator: MockGenerator) -> (Router, DashboardState, Arc<MemorySink>) {
        let generator = Arc::new(generator);
        let live_feed = Arc::new(LiveFeed::new(5, Some(8), generator.clock()));
        let sink = Arc::new(MemorySink::new());
        let dashboard_state =
            DashboardState::new(generator, live_feed, sink.clone() as Arc<dyn ExportSink>);
        let (tx, _) = broadcast::channel(4);
        let state = AppState::new(dashboard_state.clone(), tx, &DashboardConfig::default());
        (create_router(state), dashboard_state, sink)
    }

    async fn send(app: Router, method: Method, uri: &str) -> (StatusCode, Vec<(String, String)>, String) {
        let resp = app
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = resp.status();
        let headers = resp
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_string()))
            .collect();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, headers, String::from_utf8(body.to_vec()).unwrap())
    }

    fn header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
        headers
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_connection_limiter() {
        let limiter = Arc::new(ConnectionLimiter::new(1));
        let guard = limiter.try_acquire();
        assert!(guard.is_some());
        assert!(limiter.try_acquire().is_none());
        drop(guard);
        assert_eq!(limiter.current_count(), 0);
        assert!(limiter.try_acquire().is_some());
    }

    #[tokio::test]
    async fn test_overview_envelope() {
        let (app, _, _) = test_app();
        let (status, _, body) = send(app, Method::GET, "/api/overview").await;
        assert_eq!(status, StatusCode::OK);

        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["total_scans"], 15_847);
        assert!(json["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_media_filter_query() {
        let (app, _, _) = test_app();
        let (_, _, body) = send(app, Method::GET, "/api/media?campaign=WINTER").await;
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        let data = json["data"].as_array().unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0]["campaign"], "Winter Promotion");
    }

    #[tokio::test]
    async fn test_verify_route() {
        let (app, _, _) = test_app();
        let (_, _, body) = send(app, Method::GET, "/api/verify/0xdead").await;
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["data"]["verified"], true);
        assert!(json["data"]["explorer_url"]
            .as_str()
            .unwrap()
            .ends_with("0xdead"));
    }

    #[tokio::test]
    async fn test_download_csv_export() {
        let (app, _, _) = test_app();
        let (status, headers, body) =
            send(app, Method::GET, "/api/export/bridge?format=csv").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(header(&headers, "content-type"), Some("text/csv"));
        let disposition = header(&headers, "content-disposition").unwrap();
        assert!(disposition.starts_with("attachment; filename=\"audit-bridge-"));
        assert!(disposition.ends_with(".csv\""));
        assert!(body.starts_with("\"from\",\"to\",\"status\",\"latency_ms\",\"updated_at\""));
        assert_eq!(body.lines().count(), 5);
    }

    #[tokio::test]
    async fn test_security_csv_includes_threat_fields() {
        let (app, _, _) = test_app();
        let (status, _, body) = send(app, Method::GET, "/api/export/security?format=csv").await;

        assert_eq!(status, StatusCode::OK);
        let header_row = body.lines().next().unwrap();
        assert!(header_row.contains("\"latency_ms\""));
        assert!(header_row.contains("\"threat_type\",\"severity\""));
        // 4 nodes, then 3 threats.
        assert_eq!(body.lines().count(), 8);
        assert!(body.contains("\"brute_force\",\"high\""));
    }

    #[tokio::test]
    async fn test_empty_csv_export_is_no_content() {
        let now = Utc.with_ymd_and_hms(2024, 5, 20, 14, 0, 0).unwrap();
        let clock = Arc::new(ManualClock::new(now));
        let generator = MockGenerator::with_parts(
            MockConfig::deterministic(8),
            TelemetryStore::empty(clock.now()),
            clock,
        );
        let (app, _, sink) = test_app_with(generator);

        let (status, _, body) =
            send(app.clone(), Method::GET, "/api/export/bridge?format=csv").await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(body.is_empty());

        let (status, _, _) = send(app, Method::POST, "/api/export/bridge?format=csv").await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(sink.delivered().is_empty());
    }

    #[tokio::test]
    async fn test_export_defaults_to_json() {
        let (app, _, _) = test_app();
        let (status, headers, body) = send(app, Method::GET, "/api/export/overview").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(header(&headers, "content-type"), Some("application/json"));

        let payload = audit_export::decode_structured(&body).unwrap();
        assert_eq!(payload.export_type, ExportType::Overview);
        assert_eq!(payload.metadata.record_count, 1);
    }

    #[tokio::test]
    async fn test_export_rejects_unknown_type_and_format() {
        let (app, _, _) = test_app();
        let (status, _, _) = send(app.clone(), Method::GET, "/api/export/ledger").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _, _) = send(app, Method::GET, "/api/export/media?format=xml").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_save_export_uses_sink() {
        let (app, _, sink) = test_app();
        let (status, _, body) =
            send(app, Method::POST, "/api/export/security?format=txt").await;
        assert_eq!(status, StatusCode::OK);

        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["data"]["location"], "memory:0");

        let delivered = sink.take();
        assert_eq!(delivered.len(), 1);
        assert!(delivered[0].content.contains("AUDIT SECURITY REPORT"));
    }

    #[tokio::test]
    async fn test_activity_lists_feed() {
        let (app, dashboard_state, _) = test_app();
        dashboard_state.live_feed().tick();
        dashboard_state.live_feed().tick();

        let (_, _, body) = send(app, Method::GET, "/api/activity").await;
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["data"].as_array().unwrap().len(), 2);
    }
}
