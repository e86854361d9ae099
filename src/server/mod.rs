use crate::chain::{JsonRpcLedger, ScoreLedger};
use crate::config::{LEADERBOARD_PAGE, ServerConfig};
use crate::core::network;
use crate::error::AppError;
use crate::game::judgment::score_taps;
use crate::game::timing::build_beat_grid;
use crate::leaderboard::Leaderboard;
use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use log::info;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::error::Error;
use std::sync::Arc;
use tokio::task;

/// Every authoritative submission records exactly one transaction.
const TX_COUNT: u64 = 1;

/// Shared per-process state: configuration, the volatile leaderboard and the
/// ledger seam. Cheap to clone into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub leaderboard: Arc<Leaderboard>,
    pub agent: ureq::Agent,
    pub ledger: Arc<dyn ScoreLedger>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        let agent = network::get_agent();
        let ledger = Arc::new(JsonRpcLedger::new(agent.clone(), &config));
        Self {
            config: Arc::new(config),
            leaderboard: Arc::new(Leaderboard::new()),
            agent,
            ledger,
        }
    }

    /// Same state with the ledger swapped out, for tests and dry runs.
    pub fn with_ledger(config: ServerConfig, ledger: Arc<dyn ScoreLedger>) -> Self {
        Self {
            ledger,
            ..Self::new(config)
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/submit", post(submit_score))
        .route("/leaderboard", get(local_leaderboard))
        .route("/mgid-leaderboard", get(remote_leaderboard))
        .route("/submit-onchain", post(submit_onchain))
        .with_state(state)
}

pub async fn run(state: AppState) -> Result<(), Box<dyn Error>> {
    let addr = state.config.bind_addr.clone();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);
    axum::serve(listener, router(state)).await?;
    Ok(())
}

/// `POST /submit` — append a score to the local leaderboard.
async fn submit_score(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, AppError> {
    let score = body
        .get("score")
        .and_then(Value::as_f64)
        .ok_or_else(|| AppError::BadRequest("bad score".to_string()))?;
    let username = body.get("username").and_then(Value::as_str).unwrap_or("");
    let address = body
        .get("address")
        .and_then(Value::as_str)
        .map(str::to_string);

    state
        .leaderboard
        .submit(username, address, score)
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    Ok(Json(json!({ "ok": true })))
}

/// `GET /leaderboard` — the top page of the local leaderboard.
async fn local_leaderboard(State(state): State<AppState>) -> Json<Value> {
    Json(json!(state.leaderboard.top(LEADERBOARD_PAGE)))
}

/// `GET /mgid-leaderboard` — relay the remote leaderboard service, body and
/// status verbatim.
async fn remote_leaderboard(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let game_id = params
        .get("gameId")
        .cloned()
        .unwrap_or_else(|| state.config.remote_game_id.clone());
    let page = params.get("page").cloned().unwrap_or_else(|| "1".to_string());
    let sort_by = params
        .get("sortBy")
        .cloned()
        .unwrap_or_else(|| "scores".to_string());

    let agent = state.agent.clone();
    let base_url = state.config.remote_leaderboard_url.clone();
    let (status, body) = task::spawn_blocking(move || {
        network::fetch_remote_leaderboard(&agent, &base_url, &game_id, &page, &sort_by)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    let status = StatusCode::from_u16(status).map_err(|_| AppError::Upstream)?;
    Ok((
        status,
        [(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")],
        Json(body),
    ))
}

/// `POST /submit-onchain` — recompute the score from the raw taps and record
/// it on the ledger. The client's displayed score is never trusted; the grid
/// is rebuilt from `t0` with the same constants the session engine uses.
async fn submit_onchain(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, AppError> {
    let player = body
        .get("player")
        .and_then(Value::as_str)
        .filter(|p| !p.is_empty());
    let raw_taps = body.get("taps").and_then(Value::as_array);
    let t0 = body.get("t0").and_then(Value::as_f64);
    let (Some(player), Some(raw_taps), Some(t0)) = (player, raw_taps, t0) else {
        return Err(AppError::BadRequest("bad payload".to_string()));
    };
    let taps: Vec<f64> = raw_taps
        .iter()
        .map(Value::as_f64)
        .collect::<Option<_>>()
        .ok_or_else(|| AppError::BadRequest("bad payload".to_string()))?;

    let beats = build_beat_grid(t0);
    let (score, _) = score_taps(&taps, &beats);
    info!("Authoritative score for {}: {}", player, score);

    let ledger = state.ledger.clone();
    let player = player.to_string();
    let tx = task::spawn_blocking(move || ledger.record_score(&player, score as u64, TX_COUNT))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(Json(json!({
        "ok": true,
        "tx": tx,
        "score": score,
        "txCount": TX_COUNT,
    })))
}
