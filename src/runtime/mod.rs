use crate::game::manager::{GameManager, ProfileUpdate};
use crate::game::types::PlayerStats;
use crate::protocol::{self, ClientMessage, ServerMessage};
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use uuid::Uuid;

#[derive(Debug)]
struct SessionEntry {
  sender: UnboundedSender<String>,
  player_id: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct ServerStats {
  pub player_count: usize,
  pub sequence: u64,
  pub total_sessions: usize,
}

/// Binds sockets to the single `GameManager` and drives its clock.
#[derive(Debug)]
pub struct GameServer {
  manager: Mutex<GameManager>,
  sessions: DashMap<String, SessionEntry>,
  tick_ms: u64,
}

impl GameServer {
  pub fn new(manager: GameManager, tick_ms: u64) -> Self {
    Self {
      manager: Mutex::new(manager),
      sessions: DashMap::new(),
      tick_ms,
    }
  }

  pub fn add_session(&self, sender: UnboundedSender<String>) -> String {
    let session_id = Uuid::new_v4().to_string();
    self.sessions.insert(
      session_id.clone(),
      SessionEntry {
        sender,
        player_id: None,
      },
    );
    session_id
  }

  /// Bindings only change under the manager lock.
  pub async fn remove_session(&self, session_id: &str) {
    let mut manager = self.manager.lock().await;
    let Some((_, entry)) = self.sessions.remove(session_id) else { return };
    let Some(player_id) = entry.player_id else { return };
    if self.is_player_bound(&player_id) {
      return;
    }
    manager.remove_player(&player_id);
    drop(manager);
    tracing::info!(player_id = %player_id, "player left");
  }

  pub async fn handle_text_message(&self, session_id: &str, text: &str) {
    let Some(message) = protocol::decode_client_message(text) else { return };
    self.handle_client_message(session_id, message).await;
  }

  async fn handle_client_message(&self, session_id: &str, message: ClientMessage) {
    match message {
      ClientMessage::Connect {
        player_id,
        name,
        color,
      } => {
        let player_id = player_id.unwrap_or_else(|| Uuid::new_v4().to_string());
        self.handle_connect(session_id, player_id, &name, &color).await;
      }
      ClientMessage::Input { dx, dy } => {
        let Some(player_id) = self.session_player_id(session_id) else { return };
        self.manager.lock().await.set_player_input(&player_id, dx, dy);
      }
      ClientMessage::UpdateProfile { name, color } => {
        let Some(player_id) = self.session_player_id(session_id) else { return };
        self.manager.lock().await.queue_profile_update(ProfileUpdate {
          player_id,
          name,
          color,
        });
      }
    }
  }

  async fn handle_connect(&self, session_id: &str, player_id: String, name: &str, color: &str) {
    let mut manager = self.manager.lock().await;
    let previous = match self.sessions.get_mut(session_id) {
      Some(mut entry) => entry.player_id.replace(player_id.clone()),
      None => return,
    };

    if let Some(previous) = previous.filter(|previous| *previous != player_id) {
      if !self.is_player_bound(&previous) {
        manager.remove_player(&previous);
      }
    }
    manager.add_player(&player_id, name, color);
    if !manager.player_stats().contains_key(&player_id) {
      if let Some(mut entry) = self.sessions.get_mut(session_id) {
        entry.player_id = None;
      }
      return;
    }

    let payload = protocol::encode_server_message(&ServerMessage::Init {
      player_id: &player_id,
      state: manager.game_state(),
    });
    drop(manager);
    tracing::info!(player_id = %player_id, "player connected");

    let Some(payload) = payload else { return };
    if let Some(entry) = self.sessions.get(session_id) {
      let _ = entry.sender.send(payload);
    }
  }

  /// Runs one tick and broadcasts the snapshot. Returns false when the
  /// manager had nothing to simulate.
  pub async fn tick(&self) -> bool {
    let mut manager = self.manager.lock().await;
    let Some(state) = manager.run_game_tick() else { return false };
    let payload = protocol::encode_server_message(&ServerMessage::State { state });
    drop(manager);

    let Some(payload) = payload else { return false };
    self.broadcast(payload).await;
    true
  }

  async fn broadcast(&self, payload: String) {
    let mut stale = Vec::new();
    for entry in self.sessions.iter() {
      if entry.sender.send(payload.clone()).is_err() {
        stale.push(entry.key().clone());
      }
    }
    for session_id in stale {
      tracing::warn!(session_id = %session_id, "dropping closed session");
      self.remove_session(&session_id).await;
    }
  }

  pub fn spawn_tick_loop(self: &Arc<Self>) -> JoinHandle<()> {
    let server = Arc::clone(self);
    tokio::spawn(async move {
      let mut interval = tokio::time::interval(Duration::from_millis(server.tick_ms));
      interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
      loop {
        interval.tick().await;
        server.tick().await;
      }
    })
  }

  pub async fn stats(&self) -> ServerStats {
    let manager = self.manager.lock().await;
    ServerStats {
      player_count: manager.player_count(),
      sequence: manager.game_state().sequence,
      total_sessions: self.sessions.len(),
    }
  }

  pub async fn leaderboard(&self, limit: usize) -> Vec<PlayerStats> {
    let manager = self.manager.lock().await;
    let mut entries: Vec<PlayerStats> = manager.player_stats().values().cloned().collect();
    drop(manager);
    entries.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.name.cmp(&b.name)));
    entries.truncate(limit);
    entries
  }

  fn session_player_id(&self, session_id: &str) -> Option<String> {
    self
      .sessions
      .get(session_id)
      .and_then(|entry| entry.player_id.clone())
  }

  fn is_player_bound(&self, player_id: &str) -> bool {
    self
      .sessions
      .iter()
      .any(|entry| entry.player_id.as_deref() == Some(player_id))
  }
}
