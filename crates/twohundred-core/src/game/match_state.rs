use crate::model::deck::Deck;
use crate::model::player::{PLAYER_COUNT, PlayerPosition, Team};
use crate::model::round::{RoundPhase, RoundState};
use crate::model::rules::{GameRules, RulesError};
use crate::model::score::{RoundScore, ScoreBoard};
use rand::SeedableRng;
use rand::rngs::StdRng;
use thiserror::Error;
use tracing::{Level, event};

/// Upper bound on the round number a saved match may claim. Restoring
/// replays one shuffle per round, so the bound also caps that work.
pub const MAX_ROUND_NUMBER: u32 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RestoreError {
    #[error(transparent)]
    Rules(#[from] RulesError),
    #[error("round was dealt under different rules than the match")]
    RulesMismatch,
    #[error("round number {found} is outside 1..={max}", max = MAX_ROUND_NUMBER)]
    RoundOutOfRange { found: u32 },
}

/// One match: team totals plus the round in progress. Round `n` is dealt
/// from the `n`-th shuffle of the seeded generator, so the seed and round
/// number are enough to rebuild the generator.
#[derive(Debug, Clone)]
pub struct MatchState {
    rules: GameRules,
    names: [String; PLAYER_COUNT],
    scores: ScoreBoard,
    round_number: u32,
    current_round: RoundState,
    winner: Option<Team>,
    rng: StdRng,
    seed: u64,
}

impl MatchState {
    pub fn new(names: [String; PLAYER_COUNT], dealer: PlayerPosition) -> Result<Self, RulesError> {
        let seed: u64 = rand::random();
        Self::with_seed(GameRules::default(), names, dealer, seed)
    }

    pub fn with_seed(
        rules: GameRules,
        names: [String; PLAYER_COUNT],
        dealer: PlayerPosition,
        seed: u64,
    ) -> Result<Self, RulesError> {
        rules.validate()?;
        let mut rng = StdRng::seed_from_u64(seed);
        let deck = Deck::shuffled(&mut rng);
        let current_round = RoundState::deal(rules, &deck, dealer, &names);

        Ok(Self {
            rules,
            names,
            scores: ScoreBoard::new(),
            round_number: 1,
            current_round,
            winner: None,
            rng,
            seed,
        })
    }

    /// Rebuilds a match around an already-dealt round, replaying the
    /// generator to the position it held after dealing `round_number`.
    /// The round must use the match rules.
    pub fn from_parts(
        rules: GameRules,
        names: [String; PLAYER_COUNT],
        seed: u64,
        round_number: u32,
        scores: ScoreBoard,
        current_round: RoundState,
        winner: Option<Team>,
    ) -> Result<Self, RestoreError> {
        rules.validate()?;
        if *current_round.rules() != rules {
            return Err(RestoreError::RulesMismatch);
        }
        if !(1..=MAX_ROUND_NUMBER).contains(&round_number) {
            return Err(RestoreError::RoundOutOfRange {
                found: round_number,
            });
        }
        let mut rng = StdRng::seed_from_u64(seed);
        for _ in 0..round_number {
            let _ = Deck::shuffled(&mut rng);
        }

        Ok(Self {
            rules,
            names,
            scores,
            round_number,
            current_round,
            winner,
            rng,
            seed,
        })
    }

    pub fn rules(&self) -> &GameRules {
        &self.rules
    }

    pub fn names(&self) -> &[String; PLAYER_COUNT] {
        &self.names
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn scores(&self) -> &ScoreBoard {
        &self.scores
    }

    pub fn scores_mut(&mut self) -> &mut ScoreBoard {
        &mut self.scores
    }

    pub fn round(&self) -> &RoundState {
        &self.current_round
    }

    pub fn round_mut(&mut self) -> &mut RoundState {
        &mut self.current_round
    }

    pub fn round_number(&self) -> u32 {
        self.round_number
    }

    pub fn dealer(&self) -> PlayerPosition {
        self.current_round.dealer()
    }

    pub fn winner(&self) -> Option<Team> {
        self.winner
    }

    pub fn is_over(&self) -> bool {
        self.winner.is_some()
    }

    pub fn is_round_ready_for_scoring(&self) -> bool {
        self.current_round.phase() == RoundPhase::Complete && !self.current_round.is_scored()
    }

    /// Scores the finished round into the match totals. Returns `None` while
    /// the round is still in progress, once it has been scored, or once the
    /// match is decided.
    pub fn finish_round(&mut self) -> Option<RoundScore> {
        if self.is_over() || self.current_round.is_scored() {
            return None;
        }
        let result = self.current_round.result()?;
        let scored = self.scores.apply_round(&result, &self.rules);
        self.current_round.mark_scored();
        self.winner = self.scores.winner(&self.rules);

        event!(
            target: "twohundred_core::match",
            Level::INFO,
            round = self.round_number,
            bidder = %result.winning_bid.seat,
            bid = result.winning_bid.amount,
            bid_made = scored.bid_made,
            team_one = self.scores.score(Team::One),
            team_two = self.scores.score(Team::Two),
            winner = ?self.winner,
            "round scored"
        );
        Some(scored)
    }

    /// Rotates the dealer and deals a fresh round.
    pub fn start_next_round(&mut self) {
        self.round_number += 1;
        let dealer = self.current_round.dealer().next();
        let deck = Deck::shuffled(&mut self.rng);
        self.current_round = RoundState::deal(self.rules, &deck, dealer, &self.names);
    }
}
