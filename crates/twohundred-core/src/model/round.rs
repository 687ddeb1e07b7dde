use crate::model::betting::{BetAction, BettingError, BettingOutcome, BettingRound, WinningBid};
use crate::model::card::Card;
use crate::model::deck::Deck;
use crate::model::hand::Hand;
use crate::model::player::{PLAYER_COUNT, Player, PlayerPosition, Team};
use crate::model::ranking::{is_playable, legal_cards};
use crate::model::rules::GameRules;
use crate::model::score::RoundResult;
use crate::model::suit::Suit;
use crate::model::trick::{Trick, TrickError};
use serde::{Deserialize, Serialize};
use std::array;
use thiserror::Error;
use tracing::{Level, event};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    Betting,
    TrumpSelection,
    Playing,
    Complete,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedTrick {
    pub trick: Trick,
    pub winner: PlayerPosition,
    pub points: u32,
}

/// Everything one round owns: the players' hands and betting records, the
/// bidding state machine, trump, and the trick in progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundState {
    rules: GameRules,
    dealer: PlayerPosition,
    players: [Player; PLAYER_COUNT],
    betting: BettingRound,
    trump: Option<Suit>,
    phase: RoundPhase,
    current_trick: Trick,
    trick_history: Vec<CompletedTrick>,
    team_points: [u32; 2],
    /// Set once the result has been added to the match totals.
    #[serde(default)]
    scored: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    Played {
        next: PlayerPosition,
    },
    TrickCompleted {
        winner: PlayerPosition,
        points: u32,
        round_complete: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlayError {
    #[error("cards can only be played once trump is chosen")]
    NotInPlayPhase,
    #[error("{0} is not in the hand")]
    CardNotInHand(Card),
    #[error("card index {index} is outside a hand of {len} cards")]
    IndexOutOfBounds { index: usize, len: usize },
    #[error("expected {expected} to play next but got {actual}")]
    OutOfTurn {
        expected: PlayerPosition,
        actual: PlayerPosition,
    },
    #[error("{card} does not follow the leading suit {leading}")]
    MustFollowSuit { card: Card, leading: Suit },
    #[error(transparent)]
    Trick(#[from] TrickError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrumpError {
    #[error("trump can only be chosen right after betting")]
    NotInTrumpSelection,
    #[error("only the bid winner {winner} may choose trump, not {actual}")]
    NotBidWinner {
        winner: PlayerPosition,
        actual: PlayerPosition,
    },
}

impl RoundState {
    /// Deals `rules.cards_per_hand` cards to each seat, starting left of the
    /// dealer, and opens betting.
    pub fn deal(
        rules: GameRules,
        deck: &Deck,
        dealer: PlayerPosition,
        names: &[String; PLAYER_COUNT],
    ) -> Self {
        let mut players: [Player; PLAYER_COUNT] =
            array::from_fn(|idx| Player::new(names[idx].clone()));

        let first = dealer.next();
        let dealt = rules.cards_per_hand * PLAYER_COUNT;
        for (offset, card) in deck.cards().iter().take(dealt).enumerate() {
            let seat = (first.index() + offset) % PLAYER_COUNT;
            players[seat].hand_mut().add(*card);
        }

        Self::from_players(rules, dealer, players)
    }

    /// Builds a round in the betting phase from pre-arranged hands.
    pub fn with_hands(
        rules: GameRules,
        dealer: PlayerPosition,
        hands: [Hand; PLAYER_COUNT],
    ) -> Self {
        let mut hands = hands.into_iter();
        let players = array::from_fn(|idx| {
            let mut player = Player::new(PlayerPosition::LOOP[idx].to_string());
            if let Some(hand) = hands.next() {
                *player.hand_mut() = hand;
            }
            player
        });
        Self::from_players(rules, dealer, players)
    }

    fn from_players(
        rules: GameRules,
        dealer: PlayerPosition,
        players: [Player; PLAYER_COUNT],
    ) -> Self {
        Self {
            rules,
            dealer,
            players,
            betting: BettingRound::new(rules, dealer),
            trump: None,
            phase: RoundPhase::Betting,
            current_trick: Trick::new(dealer.next()),
            trick_history: Vec::new(),
            team_points: [0; 2],
            scored: false,
        }
    }

    pub fn rules(&self) -> &GameRules {
        &self.rules
    }

    pub fn dealer(&self) -> PlayerPosition {
        self.dealer
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn is_scored(&self) -> bool {
        self.scored
    }

    pub(crate) fn mark_scored(&mut self) {
        self.scored = true;
    }

    pub fn player(&self, seat: PlayerPosition) -> &Player {
        &self.players[seat.index()]
    }

    pub fn players(&self) -> &[Player; PLAYER_COUNT] {
        &self.players
    }

    pub fn hand(&self, seat: PlayerPosition) -> &Hand {
        self.players[seat.index()].hand()
    }

    pub fn betting(&self) -> &BettingRound {
        &self.betting
    }

    pub fn winning_bid(&self) -> Option<WinningBid> {
        self.betting.winner()
    }

    pub fn trump(&self) -> Option<Suit> {
        self.trump
    }

    pub fn current_trick(&self) -> &Trick {
        &self.current_trick
    }

    pub fn trick_history(&self) -> &[CompletedTrick] {
        &self.trick_history
    }

    pub fn tricks_completed(&self) -> usize {
        self.trick_history.len()
    }

    pub fn team_points(&self, team: Team) -> u32 {
        self.team_points[team.index()]
    }

    /// Seat whose decision the round is waiting for, if any.
    pub fn to_act(&self) -> Option<PlayerPosition> {
        match self.phase {
            RoundPhase::Betting => self.betting.current_player(),
            RoundPhase::TrumpSelection => self.betting.winner().map(|bid| bid.seat),
            RoundPhase::Playing => Some(self.current_trick.expected_position()),
            RoundPhase::Complete => None,
        }
    }

    pub fn submit_bet(
        &mut self,
        seat: PlayerPosition,
        action: BetAction,
    ) -> Result<BettingOutcome, BettingError> {
        if self.phase != RoundPhase::Betting {
            return Err(BettingError::BettingClosed);
        }

        let outcome = self.betting.apply(seat, action)?;
        for (player, status) in self.players.iter_mut().zip(self.betting.statuses()) {
            *player.betting_mut() = *status;
        }

        if let BettingOutcome::Complete(winner) = outcome {
            self.phase = RoundPhase::TrumpSelection;
            self.current_trick = Trick::new(winner.seat);
        }
        Ok(outcome)
    }

    pub fn choose_trump(&mut self, seat: PlayerPosition, suit: Suit) -> Result<(), TrumpError> {
        let winner = match (self.phase, self.betting.winner()) {
            (RoundPhase::TrumpSelection, Some(winner)) => winner,
            _ => return Err(TrumpError::NotInTrumpSelection),
        };
        if winner.seat != seat {
            return Err(TrumpError::NotBidWinner {
                winner: winner.seat,
                actual: seat,
            });
        }

        self.trump = Some(suit);
        self.phase = RoundPhase::Playing;
        self.current_trick = Trick::new(seat);
        event!(
            target: "twohundred_core::round",
            Level::DEBUG,
            seat = %seat,
            trump = %suit,
            bid = winner.amount,
            "trump selected"
        );
        Ok(())
    }

    /// Cards `seat` may legally play onto the current trick.
    pub fn legal_cards(&self, seat: PlayerPosition) -> Vec<Card> {
        legal_cards(self.hand(seat), self.current_trick.lead_suit())
    }

    pub fn play_index(
        &mut self,
        seat: PlayerPosition,
        index: usize,
    ) -> Result<PlayOutcome, PlayError> {
        let hand = self.hand(seat);
        let card = hand.get(index).ok_or(PlayError::IndexOutOfBounds {
            index,
            len: hand.len(),
        })?;
        self.play_card(seat, card)
    }

    pub fn play_card(
        &mut self,
        seat: PlayerPosition,
        card: Card,
    ) -> Result<PlayOutcome, PlayError> {
        let trump = match (self.phase, self.trump) {
            (RoundPhase::Playing, Some(trump)) => trump,
            _ => return Err(PlayError::NotInPlayPhase),
        };

        let expected = self.current_trick.expected_position();
        if expected != seat {
            return Err(PlayError::OutOfTurn {
                expected,
                actual: seat,
            });
        }

        let hand = self.players[seat.index()].hand();
        if !hand.contains(card) {
            return Err(PlayError::CardNotInHand(card));
        }

        let leading = self.current_trick.lead_suit();
        if !is_playable(card, leading, hand) {
            // `is_playable` only fails once something has been led.
            let leading = leading.unwrap_or(card.suit());
            return Err(PlayError::MustFollowSuit { card, leading });
        }

        self.current_trick.play(seat, card)?;
        self.players[seat.index()].hand_mut().remove(card);

        if !self.current_trick.is_complete() {
            return Ok(PlayOutcome::Played {
                next: self.current_trick.expected_position(),
            });
        }

        let winner = self
            .current_trick
            .winner(trump)
            .unwrap_or(self.current_trick.leader());
        let points = self.current_trick.points();
        self.team_points[winner.team().index()] += points;

        let finished = std::mem::replace(&mut self.current_trick, Trick::new(winner));
        self.trick_history.push(CompletedTrick {
            trick: finished,
            winner,
            points,
        });

        let round_complete = self.players.iter().all(|player| player.hand().is_empty());
        if round_complete {
            self.phase = RoundPhase::Complete;
        }

        event!(
            target: "twohundred_core::round",
            Level::TRACE,
            winner = %winner,
            points,
            trick = self.trick_history.len(),
            round_complete,
            "trick completed"
        );

        Ok(PlayOutcome::TrickCompleted {
            winner,
            points,
            round_complete,
        })
    }

    /// Scoring input, available once every trick has been played.
    pub fn result(&self) -> Option<RoundResult> {
        if self.phase != RoundPhase::Complete {
            return None;
        }
        let winning_bid = self.betting.winner()?;
        let team_placed_bid = Team::BOTH.map(|team| {
            team.seats()
                .iter()
                .any(|seat| self.players[seat.index()].betting().has_bet)
        });
        Some(RoundResult {
            team_points: self.team_points,
            winning_bid,
            team_placed_bid,
        })
    }
}
