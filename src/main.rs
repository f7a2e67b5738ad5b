use axum::{
  extract::{Query, State, WebSocketUpgrade},
  http::Method,
  response::IntoResponse,
  routing::get,
  Json, Router,
};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::EnvFilter;

mod config;
mod game;
mod protocol;
mod runtime;
mod shared;
mod transport;

use config::ServerConfig;
use game::manager::GameManager;
use game::types::{GridSize, PlayerStats};
use runtime::GameServer;

const DEFAULT_LIMIT: usize = 10;
const MAX_LIMIT: usize = 50;

#[derive(Debug, Serialize)]
struct HealthResponse {
  ok: bool,
  #[serde(rename = "playerCount")]
  player_count: usize,
  sequence: u64,
  #[serde(rename = "totalSessions")]
  total_sessions: usize,
}

#[derive(Debug, Serialize)]
struct LeaderboardResponse {
  players: Vec<PlayerStats>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .init();

  let config = ServerConfig::from_env()?;
  tracing::info!(
    width = config.grid_width,
    height = config.grid_height,
    tick_ms = config.tick_ms,
    ai = config.enable_ai,
    seed = config.rng_seed,
    "starting game server"
  );

  let manager = GameManager::new(
    GridSize {
      width: config.grid_width,
      height: config.grid_height,
    },
    config.rng_seed,
    config.enable_ai,
  );
  let server = Arc::new(GameServer::new(manager, config.tick_ms));
  server.spawn_tick_loop();

  let cors = CorsLayer::new()
    .allow_origin(Any)
    .allow_methods([Method::GET])
    .allow_headers(Any);

  let app: Router = Router::new()
    .route("/api/health", get(health))
    .route("/api/leaderboard", get(leaderboard))
    .route("/api/ws", get(ws_handler))
    .layer(cors)
    .with_state(server);

  let address = format!("0.0.0.0:{}", config.port);
  tracing::info!("listening on {address}");

  let listener = tokio::net::TcpListener::bind(&address).await?;
  axum::serve(listener, app).await?;

  Ok(())
}

async fn health(State(server): State<Arc<GameServer>>) -> impl IntoResponse {
  let stats = server.stats().await;
  Json(HealthResponse {
    ok: true,
    player_count: stats.player_count,
    sequence: stats.sequence,
    total_sessions: stats.total_sessions,
  })
}

async fn leaderboard(
  State(server): State<Arc<GameServer>>,
  Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
  let limit = params
    .get("limit")
    .and_then(|value| value.parse::<usize>().ok())
    .unwrap_or(DEFAULT_LIMIT)
    .clamp(1, MAX_LIMIT);
  let players = server.leaderboard(limit).await;
  Json(LeaderboardResponse { players })
}

async fn ws_handler(
  ws: WebSocketUpgrade,
  State(server): State<Arc<GameServer>>,
) -> impl IntoResponse {
  ws.on_upgrade(move |socket| transport::ws_session::handle_socket(socket, server))
}
