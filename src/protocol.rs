use crate::game::types::GameState;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum JsonClientMessage {
  #[serde(rename = "connect")]
  Connect {
    id: Option<String>,
    name: Option<String>,
    color: Option<String>,
  },
  #[serde(rename = "input")]
  Input { dx: f64, dy: f64 },
  #[serde(rename = "updateProfile")]
  UpdateProfile { name: String, color: String },
}

/// Inbound events after transport-level decoding. Disconnects are not
/// frames; the socket closing produces them.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientMessage {
  Connect {
    player_id: Option<String>,
    name: String,
    color: String,
  },
  Input {
    dx: f64,
    dy: f64,
  },
  UpdateProfile {
    name: String,
    color: String,
  },
}

pub fn decode_client_message(text: &str) -> Option<ClientMessage> {
  let message = serde_json::from_str::<JsonClientMessage>(text).ok()?;
  Some(match message {
    JsonClientMessage::Connect { id, name, color } => ClientMessage::Connect {
      player_id: id
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty()),
      name: name.unwrap_or_default(),
      color: color.unwrap_or_default(),
    },
    JsonClientMessage::Input { dx, dy } => ClientMessage::Input { dx, dy },
    JsonClientMessage::UpdateProfile { name, color } => ClientMessage::UpdateProfile { name, color },
  })
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum ServerMessage<'a> {
  #[serde(rename = "init")]
  Init {
    #[serde(rename = "playerId")]
    player_id: &'a str,
    state: &'a GameState,
  },
  #[serde(rename = "state")]
  State { state: &'a GameState },
}

pub fn encode_server_message(message: &ServerMessage<'_>) -> Option<String> {
  match serde_json::to_string(message) {
    Ok(payload) => Some(payload),
    Err(error) => {
      tracing::warn!(?error, "failed to encode server message");
      None
    }
  }
}
