pub const DEFAULT_GRID_WIDTH: i32 = 40;
pub const DEFAULT_GRID_HEIGHT: i32 = 30;
pub const MIN_GRID_SIDE: i32 = 8;
pub const TICK_MS: u64 = 150;

pub const INITIAL_SNAKE_LENGTH: usize = 3;
pub const GROWTH_PER_FOOD: u32 = 1;
pub const FOOD_VALUE: u32 = 10;
pub const MIN_FOOD: usize = 1;
pub const MAX_FOOD: usize = 5;
pub const FOOD_SPAWN_CHANCE: f64 = 0.3;

pub const MAX_POWER_UPS: usize = 2;
pub const POWER_UP_SPAWN_INTERVAL_TICKS: u64 = 20;
pub const POWER_UP_SPAWN_CHANCE: f64 = 0.5;
pub const POWER_UP_LIFETIME_MS: i64 = 10_000;
pub const POWER_UP_EFFECT_MS: i64 = 5_000;
pub const SPEED_MULTIPLIER: f64 = 2.0;
pub const SLOW_MULTIPLIER: f64 = 0.5;
pub const DOUBLE_SCORE_MULTIPLIER: u32 = 2;
pub const MAX_STEPS_PER_TICK: u32 = 2;

pub const MAX_PLACEMENT_ATTEMPTS: usize = 100;

pub const AI_PLAYER_ID: &str = "ai-snake";
pub const AI_PLAYER_NAME: &str = "AI Snake";
pub const AI_PLAYER_COLOR: &str = "#9B59B6";

pub const COLOR_POOL: [&str; 8] = [
  "#FF6B6B",
  "#FFD166",
  "#06D6A0",
  "#4DABF7",
  "#F06595",
  "#845EF7",
  "#20C997",
  "#FCC419",
];
