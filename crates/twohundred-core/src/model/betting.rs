use crate::model::player::{BettingStatus, PLAYER_COUNT, PlayerPosition};
use crate::model::rules::GameRules;
use core::fmt;
use serde::{Deserialize, Serialize};
use std::array;
use thiserror::Error;
use tracing::{Level, event};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BetAction {
    Pass,
    Bid(u32),
}

impl fmt::Display for BetAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BetAction::Pass => f.write_str("pass"),
            BetAction::Bid(amount) => write!(f, "bid {amount}"),
        }
    }
}

/// One entry of the bidding history. `forced` marks actions the engine took
/// on a player's behalf (the fallback minimum bid and the passes triggered by
/// a maximum bid).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidRecord {
    pub seat: PlayerPosition,
    pub action: BetAction,
    pub forced: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinningBid {
    pub seat: PlayerPosition,
    pub amount: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BettingOutcome {
    Continue { next: PlayerPosition },
    Complete(WinningBid),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BettingError {
    #[error("betting is already complete")]
    BettingClosed,
    #[error("expected {expected} to bet next but got {actual}")]
    OutOfTurn {
        expected: PlayerPosition,
        actual: PlayerPosition,
    },
    #[error("{0} has already passed")]
    AlreadyPassed(PlayerPosition),
    #[error("bid {amount} is outside {min}..={max}")]
    OutOfRange { amount: u32, min: u32, max: u32 },
    #[error("bid {amount} is not a multiple of {increment}")]
    BadIncrement { amount: u32, increment: u32 },
    #[error("bid {0} has already been made this round")]
    DuplicateBid(u32),
    #[error("betting closed without a standing bid")]
    NoStandingBid,
}

/// Bid/pass state machine for one round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BettingRound {
    rules: GameRules,
    dealer: PlayerPosition,
    current: PlayerPosition,
    seats: [BettingStatus; PLAYER_COUNT],
    history: Vec<BidRecord>,
    winner: Option<WinningBid>,
}

impl BettingRound {
    pub fn new(rules: GameRules, dealer: PlayerPosition) -> Self {
        Self {
            rules,
            dealer,
            current: dealer.next(),
            seats: array::from_fn(|_| BettingStatus::default()),
            history: Vec::new(),
            winner: None,
        }
    }

    pub fn dealer(&self) -> PlayerPosition {
        self.dealer
    }

    pub fn rules(&self) -> &GameRules {
        &self.rules
    }

    /// Seat whose decision is awaited, or `None` once betting is complete.
    pub fn current_player(&self) -> Option<PlayerPosition> {
        if self.is_complete() {
            None
        } else {
            Some(self.current)
        }
    }

    pub fn is_complete(&self) -> bool {
        self.winner.is_some()
    }

    pub fn winner(&self) -> Option<WinningBid> {
        self.winner
    }

    pub fn status(&self, seat: PlayerPosition) -> &BettingStatus {
        &self.seats[seat.index()]
    }

    pub fn statuses(&self) -> &[BettingStatus; PLAYER_COUNT] {
        &self.seats
    }

    pub fn history(&self) -> &[BidRecord] {
        &self.history
    }

    /// Standing bid per seat; passed seats and seats yet to bid hold `None`.
    pub fn standing_bids(&self) -> [Option<u32>; PLAYER_COUNT] {
        array::from_fn(|idx| self.seats[idx].current_bid)
    }

    /// Every amount bid so far this round, including withdrawn ones.
    pub fn taken_bids(&self) -> Vec<u32> {
        self.history
            .iter()
            .filter_map(|record| match record.action {
                BetAction::Bid(amount) => Some(amount),
                BetAction::Pass => None,
            })
            .collect()
    }

    /// Legal bid amounts that remain untaken, ascending.
    pub fn available_bids(&self) -> Vec<u32> {
        let taken = self.taken_bids();
        self.rules
            .bid_ladder()
            .filter(|amount| !taken.contains(amount))
            .collect()
    }

    pub fn passed_count(&self) -> usize {
        self.seats.iter().filter(|status| status.has_passed).count()
    }

    pub fn validate_bid(&self, amount: u32) -> Result<(), BettingError> {
        let GameRules {
            min_bet,
            max_bet,
            bet_increment,
            ..
        } = self.rules;
        if amount < min_bet || amount > max_bet {
            return Err(BettingError::OutOfRange {
                amount,
                min: min_bet,
                max: max_bet,
            });
        }
        if amount % bet_increment != 0 {
            return Err(BettingError::BadIncrement {
                amount,
                increment: bet_increment,
            });
        }
        if self.taken_bids().contains(&amount) {
            return Err(BettingError::DuplicateBid(amount));
        }
        Ok(())
    }

    /// Applies one decision from `seat`. Rejected input leaves the state
    /// untouched.
    pub fn apply(
        &mut self,
        seat: PlayerPosition,
        action: BetAction,
    ) -> Result<BettingOutcome, BettingError> {
        if self.is_complete() {
            return Err(BettingError::BettingClosed);
        }
        if self.seats[seat.index()].has_passed {
            return Err(BettingError::AlreadyPassed(seat));
        }
        if seat != self.current {
            return Err(BettingError::OutOfTurn {
                expected: self.current,
                actual: seat,
            });
        }

        match action {
            BetAction::Pass => self.apply_pass(seat),
            BetAction::Bid(amount) => {
                self.validate_bid(amount)?;
                self.apply_bid(seat, amount)
            }
        }
    }

    fn apply_pass(&mut self, seat: PlayerPosition) -> Result<BettingOutcome, BettingError> {
        self.record_pass(seat, false);

        if self.passed_count() < PLAYER_COUNT - 1 {
            return Ok(self.advance_from(seat));
        }

        if self.seats.iter().all(|status| status.current_bid.is_none()) {
            let forced = self.next_active_after(seat);
            let amount = self.rules.min_bet;
            self.record_bid(forced, amount, true);
            event!(
                target: "twohundred_core::betting",
                Level::DEBUG,
                seat = %forced,
                amount,
                "forced minimum bid"
            );
        }

        self.finish()
    }

    fn apply_bid(
        &mut self,
        seat: PlayerPosition,
        amount: u32,
    ) -> Result<BettingOutcome, BettingError> {
        self.record_bid(seat, amount, false);

        if amount == self.rules.max_bet {
            for other in seat.rotation().skip(1) {
                if !self.seats[other.index()].has_passed {
                    self.record_pass(other, true);
                }
            }
            return self.finish();
        }

        Ok(self.advance_from(seat))
    }

    fn record_pass(&mut self, seat: PlayerPosition, forced: bool) {
        let status = &mut self.seats[seat.index()];
        status.has_passed = true;
        status.current_bid = None;
        self.history.push(BidRecord {
            seat,
            action: BetAction::Pass,
            forced,
        });
    }

    fn record_bid(&mut self, seat: PlayerPosition, amount: u32, forced: bool) {
        let status = &mut self.seats[seat.index()];
        status.has_bet = true;
        status.current_bid = Some(amount);
        self.history.push(BidRecord {
            seat,
            action: BetAction::Bid(amount),
            forced,
        });
    }

    fn advance_from(&mut self, seat: PlayerPosition) -> BettingOutcome {
        self.current = self.next_active_after(seat);
        BettingOutcome::Continue { next: self.current }
    }

    /// First seat after `seat` that has not passed. Falls back to the plain
    /// successor when everyone else has passed.
    fn next_active_after(&self, seat: PlayerPosition) -> PlayerPosition {
        seat.rotation()
            .skip(1)
            .find(|candidate| !self.seats[candidate.index()].has_passed)
            .unwrap_or(seat.next())
    }

    fn finish(&mut self) -> Result<BettingOutcome, BettingError> {
        let winner = PlayerPosition::LOOP
            .iter()
            .copied()
            .filter_map(|seat| {
                self.seats[seat.index()]
                    .current_bid
                    .map(|amount| WinningBid { seat, amount })
            })
            .max_by_key(|bid| bid.amount)
            .ok_or(BettingError::NoStandingBid)?;

        self.winner = Some(winner);
        self.current = winner.seat;
        event!(
            target: "twohundred_core::betting",
            Level::DEBUG,
            seat = %winner.seat,
            amount = winner.amount,
            actions = self.history.len(),
            "betting complete"
        );
        Ok(BettingOutcome::Complete(winner))
    }
}
