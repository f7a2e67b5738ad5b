use crate::game::constants::{DEFAULT_GRID_HEIGHT, DEFAULT_GRID_WIDTH, MIN_GRID_SIDE, TICK_MS};
use anyhow::bail;
use std::env;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub tick_ms: u64,
    pub grid_width: i32,
    pub grid_height: i32,
    pub enable_ai: bool,
    pub rng_seed: u32,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        Self {
            port: lookup("PORT")
                .and_then(|value| value.trim().parse::<u16>().ok())
                .unwrap_or(8787),
            tick_ms: lookup("TICK_MS")
                .and_then(|value| value.trim().parse::<u64>().ok())
                .unwrap_or(TICK_MS),
            grid_width: lookup("GRID_WIDTH")
                .and_then(|value| value.trim().parse::<i32>().ok())
                .unwrap_or(DEFAULT_GRID_WIDTH),
            grid_height: lookup("GRID_HEIGHT")
                .and_then(|value| value.trim().parse::<i32>().ok())
                .unwrap_or(DEFAULT_GRID_HEIGHT),
            enable_ai: lookup("ENABLE_AI")
                .map(|value| !matches!(value.trim(), "0" | "false" | "FALSE"))
                .unwrap_or(true),
            rng_seed: lookup("RNG_SEED")
                .and_then(|value| value.trim().parse::<u32>().ok())
                .unwrap_or_else(rand::random::<u32>),
        }
        .validate()
    }

    fn validate(self) -> anyhow::Result<Self> {
        if self.tick_ms == 0 {
            bail!("TICK_MS must be greater than zero");
        }
        if self.grid_width < MIN_GRID_SIDE || self.grid_height < MIN_GRID_SIDE {
            bail!(
                "grid must be at least {MIN_GRID_SIDE}x{MIN_GRID_SIDE}, got {}x{}",
                self.grid_width,
                self.grid_height
            );
        }
        Ok(self)
    }
}
