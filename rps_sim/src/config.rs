//! Simulation configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use rps_tournament::{
    Coins, Contestant, ContestantId, MAX_CONTESTANTS, MIN_CONTESTANTS, SettlementMode,
    TournamentConfig,
};

const DEFAULT_PLAYERS: &str = "Joe,Joan,Bob";

/// Complete simulation configuration loaded from environment variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimConfig {
    /// Display names, one contestant each, IDs assigned in order from 1
    pub players: Vec<String>,
    /// Starting balance for every contestant
    pub starting_balance: Coins,
    pub bet: Coins,
    /// Rounds to play, `None` plays until one contestant is left
    pub round_limit: Option<u32>,
    pub draw_tax: Coins,
    pub draw_tax_rate: u32,
    /// Hard cap on rounds
    pub max_rounds: Option<u32>,
    pub settlement: SettlementMode,
    /// Seed for reproducible hands
    pub seed: Option<u64>,
}

/// Values given on the command line, taking precedence over the environment
#[derive(Debug, Clone, Default)]
pub struct SimOverrides {
    pub players: Option<String>,
    pub starting_balance: Option<Coins>,
    pub bet: Option<Coins>,
    pub round_limit: Option<u32>,
    pub draw_tax: Option<Coins>,
    pub draw_tax_rate: Option<u32>,
    pub max_rounds: Option<u32>,
    pub settlement: Option<SettlementMode>,
    pub seed: Option<u64>,
}

impl SimConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns error if a variable is set but can't be parsed
    pub fn from_env(overrides: SimOverrides) -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok(), overrides)
    }

    /// Load configuration through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup<F>(lookup: F, overrides: SimOverrides) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let players = overrides
            .players
            .or_else(|| lookup("RPS_PLAYERS"))
            .unwrap_or_else(|| DEFAULT_PLAYERS.to_string());
        let players = players
            .split(',')
            .map(|name| name.trim().to_string())
            .collect();

        Ok(SimConfig {
            players,
            starting_balance: or_parse(
                overrides.starting_balance,
                &lookup,
                "RPS_STARTING_BALANCE",
                500,
            )?,
            bet: or_parse(overrides.bet, &lookup, "RPS_BET", 20)?,
            round_limit: or_parse_opt(overrides.round_limit, &lookup, "RPS_ROUND_LIMIT")?,
            draw_tax: or_parse(overrides.draw_tax, &lookup, "RPS_DRAW_TAX", 10)?,
            draw_tax_rate: or_parse(overrides.draw_tax_rate, &lookup, "RPS_DRAW_TAX_RATE", 0)?,
            max_rounds: or_parse_opt(overrides.max_rounds, &lookup, "RPS_MAX_ROUNDS")?,
            settlement: or_parse(
                overrides.settlement,
                &lookup,
                "RPS_SETTLEMENT",
                SettlementMode::Pooled,
            )?,
            seed: or_parse_opt(overrides.seed, &lookup, "RPS_SEED")?,
        })
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_CONTESTANTS..=MAX_CONTESTANTS).contains(&self.players.len()) {
            return Err(ConfigError::Invalid {
                var: "RPS_PLAYERS".to_string(),
                reason: format!(
                    "Need {MIN_CONTESTANTS} or {MAX_CONTESTANTS} players, got {}",
                    self.players.len()
                ),
            });
        }

        if self.players.iter().any(String::is_empty) {
            return Err(ConfigError::Invalid {
                var: "RPS_PLAYERS".to_string(),
                reason: "Player names must not be empty".to_string(),
            });
        }

        if self.starting_balance <= 0 {
            return Err(ConfigError::Invalid {
                var: "RPS_STARTING_BALANCE".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.bet < 0 {
            return Err(ConfigError::Invalid {
                var: "RPS_BET".to_string(),
                reason: "Must not be negative".to_string(),
            });
        }

        if self.draw_tax < 0 {
            return Err(ConfigError::Invalid {
                var: "RPS_DRAW_TAX".to_string(),
                reason: "Must not be negative".to_string(),
            });
        }

        Ok(())
    }

    pub fn tournament_config(&self) -> TournamentConfig {
        TournamentConfig {
            round_limit: self.round_limit,
            max_rounds: self.max_rounds,
            ..TournamentConfig::new(self.bet)
                .with_draw_tax(self.draw_tax, self.draw_tax_rate)
                .with_settlement(self.settlement)
        }
    }

    pub fn contestants(&self) -> Vec<Contestant> {
        self.players
            .iter()
            .zip(1..)
            .map(|(name, id): (&String, ContestantId)| {
                Contestant::new(id, self.starting_balance).with_name(name.as_str())
            })
            .collect()
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Use `value` if given on the command line. Otherwise parse `key`,
/// falling back to `default` when it isn't set.
fn or_parse<T, F>(value: Option<T>, lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match value {
        Some(value) => Ok(value),
        None => Ok(parse_opt(lookup, key)?.unwrap_or(default)),
    }
}

fn or_parse_opt<T, F>(value: Option<T>, lookup: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match value {
        Some(value) => Ok(Some(value)),
        None => parse_opt(lookup, key),
    }
}

fn parse_opt<T, F>(lookup: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid {
                var: key.to_string(),
                reason: format!("Could not parse {raw:?}"),
            }),
    }
}
