use crate::model::deck::DECK_SIZE;
use crate::model::player::PLAYER_COUNT;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_MIN_BET: u32 = 50;
pub const DEFAULT_MAX_BET: u32 = 120;
pub const DEFAULT_BET_INCREMENT: u32 = 5;
pub const DEFAULT_LOCKOUT_THRESHOLD: i32 = 100;
pub const DEFAULT_WINNING_SCORE: i32 = 200;

/// Table constants for a match. Every field has a default so partial
/// overrides deserialize cleanly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameRules {
    pub min_bet: u32,
    pub max_bet: u32,
    pub bet_increment: u32,
    pub lockout_threshold: i32,
    pub winning_score: i32,
    pub cards_per_hand: usize,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            min_bet: DEFAULT_MIN_BET,
            max_bet: DEFAULT_MAX_BET,
            bet_increment: DEFAULT_BET_INCREMENT,
            lockout_threshold: DEFAULT_LOCKOUT_THRESHOLD,
            winning_score: DEFAULT_WINNING_SCORE,
            cards_per_hand: DECK_SIZE / PLAYER_COUNT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RulesError {
    #[error("bet increment must be greater than zero")]
    ZeroIncrement,
    #[error("minimum bet {min} exceeds maximum bet {max}")]
    InvertedRange { min: u32, max: u32 },
    #[error("{field} ({value}) is not a multiple of the bet increment {increment}")]
    Misaligned {
        field: &'static str,
        value: u32,
        increment: u32,
    },
    #[error("minimum bet must be positive")]
    ZeroMinimum,
    #[error("winning score must be positive, got {0}")]
    NonPositiveWinningScore(i32),
    #[error("{0} cards per hand cannot be dealt from a 40-card deck to four players")]
    BadHandSize(usize),
}

impl GameRules {
    pub fn validate(&self) -> Result<(), RulesError> {
        if self.bet_increment == 0 {
            return Err(RulesError::ZeroIncrement);
        }
        if self.min_bet == 0 {
            return Err(RulesError::ZeroMinimum);
        }
        if self.min_bet > self.max_bet {
            return Err(RulesError::InvertedRange {
                min: self.min_bet,
                max: self.max_bet,
            });
        }
        for (field, value) in [("min_bet", self.min_bet), ("max_bet", self.max_bet)] {
            if value % self.bet_increment != 0 {
                return Err(RulesError::Misaligned {
                    field,
                    value,
                    increment: self.bet_increment,
                });
            }
        }
        if self.winning_score <= 0 {
            return Err(RulesError::NonPositiveWinningScore(self.winning_score));
        }
        if self.cards_per_hand == 0 || self.cards_per_hand * PLAYER_COUNT > DECK_SIZE {
            return Err(RulesError::BadHandSize(self.cards_per_hand));
        }
        Ok(())
    }

    /// All bid amounts the table allows, ascending.
    pub fn bid_ladder(&self) -> impl Iterator<Item = u32> {
        bid_ladder(self.min_bet, self.max_bet, self.bet_increment)
    }
}

/// Amounts from `min` to `max` inclusive in steps of `increment`.
pub fn bid_ladder(min: u32, max: u32, increment: u32) -> impl Iterator<Item = u32> {
    (min..=max).step_by(increment.max(1) as usize)
}
