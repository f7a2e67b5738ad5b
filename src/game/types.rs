use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Point {
  pub x: i32,
  pub y: i32,
}

impl Point {
  pub fn new(x: i32, y: i32) -> Self {
    Self { x, y }
  }

  pub fn step(self, direction: Direction) -> Point {
    let (dx, dy) = direction.delta();
    Point::new(self.x + dx, self.y + dy)
  }

  pub fn manhattan(self, other: Point) -> i32 {
    (self.x - other.x).abs() + (self.y - other.y).abs()
  }
}

/// One of the four cardinal unit vectors. Serialized as `{x, y}` so the
/// snapshot carries the raw vector the client expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "Point", try_from = "Point")]
pub enum Direction {
  Up,
  Down,
  Left,
  Right,
}

impl Direction {
  pub const ALL: [Direction; 4] = [
    Direction::Up,
    Direction::Right,
    Direction::Down,
    Direction::Left,
  ];

  pub fn delta(self) -> (i32, i32) {
    match self {
      Direction::Up => (0, -1),
      Direction::Down => (0, 1),
      Direction::Left => (-1, 0),
      Direction::Right => (1, 0),
    }
  }

  pub fn from_delta(dx: i64, dy: i64) -> Option<Self> {
    match (dx, dy) {
      (0, -1) => Some(Direction::Up),
      (0, 1) => Some(Direction::Down),
      (-1, 0) => Some(Direction::Left),
      (1, 0) => Some(Direction::Right),
      _ => None,
    }
  }

  pub fn opposite(self) -> Self {
    match self {
      Direction::Up => Direction::Down,
      Direction::Down => Direction::Up,
      Direction::Left => Direction::Right,
      Direction::Right => Direction::Left,
    }
  }
}

impl From<Direction> for Point {
  fn from(direction: Direction) -> Self {
    let (x, y) = direction.delta();
    Point { x, y }
  }
}

impl TryFrom<Point> for Direction {
  type Error = String;

  fn try_from(value: Point) -> Result<Self, Self::Error> {
    Direction::from_delta(value.x as i64, value.y as i64)
      .ok_or_else(|| format!("({}, {}) is not a unit direction", value.x, value.y))
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PowerUpType {
  Speed,
  Slow,
  Invincibility,
  DoubleScore,
}

impl PowerUpType {
  pub const ALL: [PowerUpType; 4] = [
    PowerUpType::Speed,
    PowerUpType::Slow,
    PowerUpType::Invincibility,
    PowerUpType::DoubleScore,
  ];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snake {
  pub id: String,
  pub color: String,
  pub body: VecDeque<Point>,
  pub direction: Direction,
  pub score: u64,
  #[serde(rename = "activePowerUps")]
  pub active_power_ups: Vec<PowerUpType>,
  pub alive: bool,
  #[serde(rename = "pendingGrowth")]
  pub pending_growth: u32,
  pub speed: f64,
  #[serde(rename = "moveBudget")]
  pub move_budget: f64,
}

impl Snake {
  pub fn new(id: String, color: String, body: VecDeque<Point>, direction: Direction) -> Self {
    Self {
      id,
      color,
      body,
      direction,
      score: 0,
      active_power_ups: Vec::new(),
      alive: true,
      pending_growth: 0,
      speed: 1.0,
      move_budget: 0.0,
    }
  }

  pub fn head(&self) -> Option<Point> {
    self.body.front().copied()
  }

  pub fn tail(&self) -> Option<Point> {
    self.body.back().copied()
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Food {
  pub position: Point,
  pub value: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerUp {
  pub id: u64,
  #[serde(rename = "type")]
  pub kind: PowerUpType,
  pub position: Point,
  #[serde(rename = "expiresAt")]
  pub expires_at: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivePowerUp {
  #[serde(rename = "type")]
  pub kind: PowerUpType,
  #[serde(rename = "playerId")]
  pub player_id: String,
  #[serde(rename = "expiresAt")]
  pub expires_at: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
  pub id: String,
  pub name: String,
  pub color: String,
  pub score: u64,
  pub deaths: u32,
  #[serde(rename = "isConnected")]
  pub is_connected: bool,
}

impl PlayerStats {
  pub fn new(id: String, name: String, color: String) -> Self {
    Self {
      id,
      name,
      color,
      score: 0,
      deaths: 0,
      is_connected: true,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSize {
  pub width: i32,
  pub height: i32,
}

impl GridSize {
  pub fn contains(&self, point: Point) -> bool {
    point.x >= 0 && point.x < self.width && point.y >= 0 && point.y < self.height
  }

  pub fn cell_count(&self) -> usize {
    (self.width.max(0) as usize) * (self.height.max(0) as usize)
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
  pub snakes: Vec<Snake>,
  pub food: Vec<Food>,
  #[serde(rename = "powerUps")]
  pub power_ups: Vec<PowerUp>,
  #[serde(rename = "activePowerUps")]
  pub active_power_ups: Vec<ActivePowerUp>,
  #[serde(rename = "gridSize")]
  pub grid_size: GridSize,
  pub timestamp: i64,
  pub sequence: u64,
  #[serde(rename = "rngSeed")]
  pub rng_seed: u32,
  #[serde(rename = "playerCount")]
  pub player_count: usize,
  #[serde(rename = "powerUpCounter")]
  pub power_up_counter: u64,
  #[serde(rename = "playerStats")]
  pub player_stats: BTreeMap<String, PlayerStats>,
}

impl GameState {
  pub fn new(grid_size: GridSize, rng_seed: u32, timestamp: i64) -> Self {
    Self {
      snakes: Vec::new(),
      food: Vec::new(),
      power_ups: Vec::new(),
      active_power_ups: Vec::new(),
      grid_size,
      timestamp,
      sequence: 0,
      rng_seed,
      player_count: 0,
      power_up_counter: 0,
      player_stats: BTreeMap::new(),
    }
  }

  pub fn snake(&self, id: &str) -> Option<&Snake> {
    self.snakes.iter().find(|snake| snake.id == id)
  }
}
