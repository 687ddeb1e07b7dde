use super::match_state::{MatchState, RestoreError};
use crate::model::player::{PLAYER_COUNT, Team};
use crate::model::round::RoundState;
use crate::model::rules::GameRules;
use crate::model::score::ScoreBoard;
use serde::{Deserialize, Serialize};

/// Everything needed to resume a match: totals, the round in progress
/// (hands, bids, trump, current trick) and the seed the deals come from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchSnapshot {
    pub seed: u64,
    pub round_number: u32,
    #[serde(default)]
    pub rules: GameRules,
    pub names: [String; PLAYER_COUNT],
    pub scores: [i32; 2],
    pub round: RoundState,
    #[serde(default)]
    pub winner: Option<Team>,
}

impl MatchSnapshot {
    pub fn capture(state: &MatchState) -> Self {
        MatchSnapshot {
            seed: state.seed(),
            round_number: state.round_number(),
            rules: *state.rules(),
            names: state.names().clone(),
            scores: *state.scores().standings(),
            round: state.round().clone(),
            winner: state.winner(),
        }
    }

    /// Rebuilds the match. Fails when the rules are invalid, when the saved
    /// round was dealt under other rules, or when the round number is out of
    /// range.
    pub fn restore(self) -> Result<MatchState, RestoreError> {
        let mut scores = ScoreBoard::new();
        scores.set_totals(self.scores);
        MatchState::from_parts(
            self.rules,
            self.names,
            self.seed,
            self.round_number,
            scores,
            self.round,
            self.winner,
        )
    }

    pub fn to_json(state: &MatchState) -> serde_json::Result<String> {
        let snapshot = Self::capture(state);
        serde_json::to_string_pretty(&snapshot)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
