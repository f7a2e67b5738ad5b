use super::ai::choose_direction;
use super::constants::{AI_PLAYER_COLOR, AI_PLAYER_ID, AI_PLAYER_NAME, COLOR_POOL};
use super::engine::update_game;
use super::input::parse_direction;
use super::types::{Direction, GameState, GridSize, PlayerStats};
use crate::shared::colors::normalize_hex_color;
use crate::shared::names::{parse_player_name, sanitize_player_name};
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileUpdate {
  pub player_id: String,
  pub name: String,
  pub color: String,
}

/// Owns the canonical state. External events only touch the player registry
/// and the pending buffers; the state itself changes only inside a tick.
#[derive(Debug)]
pub struct GameManager {
  state: GameState,
  players: BTreeMap<String, PlayerStats>,
  pending_inputs: BTreeMap<String, Direction>,
  pending_profile_updates: VecDeque<ProfileUpdate>,
}

impl GameManager {
  pub fn new(grid_size: GridSize, rng_seed: u32, with_ai: bool) -> Self {
    let mut players = BTreeMap::new();
    if with_ai {
      players.insert(
        AI_PLAYER_ID.to_string(),
        PlayerStats::new(
          AI_PLAYER_ID.to_string(),
          AI_PLAYER_NAME.to_string(),
          AI_PLAYER_COLOR.to_string(),
        ),
      );
    }
    let mut state = GameState::new(grid_size, rng_seed, now_millis());
    state.player_stats = players.clone();
    state.player_count = players.len();
    Self {
      state,
      players,
      pending_inputs: BTreeMap::new(),
      pending_profile_updates: VecDeque::new(),
    }
  }

  pub fn add_player(&mut self, id: &str, name: &str, color: &str) {
    if id.is_empty() || id == AI_PLAYER_ID {
      return;
    }
    let name = sanitize_player_name(name, "Player");

    if let Some(stats) = self.players.get_mut(id) {
      // Reconnects keep the colour chosen on first join.
      stats.name = name;
      stats.is_connected = true;
      tracing::debug!(player_id = id, "player reconnected");
      return;
    }

    let color = normalize_hex_color(color)
      .unwrap_or_else(|| COLOR_POOL[self.players.len() % COLOR_POOL.len()].to_string());
    self
      .players
      .insert(id.to_string(), PlayerStats::new(id.to_string(), name, color));
    tracing::debug!(player_id = id, "player joined");
  }

  pub fn remove_player(&mut self, id: &str) {
    if id == AI_PLAYER_ID {
      return;
    }
    let Some(stats) = self.players.get_mut(id) else { return };
    stats.is_connected = false;
    self.pending_inputs.remove(id);
    tracing::debug!(player_id = id, "player disconnected");
  }

  pub fn set_player_input(&mut self, id: &str, dx: f64, dy: f64) {
    let Some(direction) = parse_direction(dx, dy) else { return };
    if !self.players.contains_key(id) {
      return;
    }
    self.pending_inputs.insert(id.to_string(), direction);
  }

  pub fn queue_profile_update(&mut self, update: ProfileUpdate) {
    self.pending_profile_updates.push_back(update);
  }

  pub fn run_game_tick(&mut self) -> Option<&GameState> {
    self.run_game_tick_at(now_millis())
  }

  /// Drains queued profile updates, then advances the simulation once if
  /// anyone is eligible to play. Returns the snapshot to broadcast.
  pub fn run_game_tick_at(&mut self, now: i64) -> Option<&GameState> {
    self.apply_profile_updates();

    let eligible = self.eligible_ids();
    if eligible.is_empty() {
      self.pending_inputs.clear();
      return None;
    }

    let mut inputs = std::mem::take(&mut self.pending_inputs);
    if self.players.contains_key(AI_PLAYER_ID) {
      if let Some(direction) = choose_direction(&self.state, AI_PLAYER_ID) {
        inputs.insert(AI_PLAYER_ID.to_string(), direction);
      }
    }

    self.state.player_stats = self.players.clone();
    let next = update_game(&self.state, &inputs, now, &eligible);
    self.players = next.player_stats.clone();
    self.state = next;
    Some(&self.state)
  }

  pub fn game_state(&self) -> &GameState {
    &self.state
  }

  pub fn player_stats(&self) -> &BTreeMap<String, PlayerStats> {
    &self.players
  }

  pub fn player_count(&self) -> usize {
    self.players.values().filter(|stats| stats.is_connected).count()
  }

  fn eligible_ids(&self) -> BTreeSet<String> {
    self
      .players
      .values()
      .filter(|stats| stats.is_connected)
      .map(|stats| stats.id.clone())
      .collect()
  }

  fn apply_profile_updates(&mut self) {
    while let Some(update) = self.pending_profile_updates.pop_front() {
      let Some(stats) = self.players.get_mut(&update.player_id) else {
        tracing::debug!(player_id = %update.player_id, "profile update for unknown player dropped");
        continue;
      };
      let (Some(name), Some(color)) = (
        parse_player_name(&update.name),
        normalize_hex_color(&update.color),
      ) else {
        tracing::debug!(player_id = %update.player_id, "invalid profile update dropped");
        continue;
      };
      stats.name = name;
      stats.color = color;
    }
  }
}

pub fn now_millis() -> i64 {
  SystemTime::now()
    .duration_since(UNIX_EPOCH)
    .unwrap_or_default()
    .as_millis() as i64
}
