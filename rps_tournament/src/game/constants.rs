use super::entities::Coins;

/// Fewest contestants a tournament can start with.
pub const MIN_CONTESTANTS: usize = 2;

/// Most contestants a tournament can seat at once.
pub const MAX_CONTESTANTS: usize = 3;

/// Balance given to a contestant when the caller doesn't pick one.
pub const DEFAULT_STARTING_BALANCE: Coins = 100;

/// Bet used when a tournament is created without configuration.
pub const DEFAULT_BET: Coins = 1;
