use crate::model::betting::{BetAction, BettingError};
use crate::model::card::Card;
use crate::model::hand::Hand;
use crate::model::player::{PLAYER_COUNT, PlayerPosition};
use crate::model::ranking::legal_cards;
use crate::model::round::{PlayError, TrumpError};
use crate::model::rules::{RulesError, bid_ladder};
use crate::model::suit::Suit;
use crate::model::trick::Play;
use thiserror::Error;

/// Recoverable rejections surfaced to whoever supplied the decision.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error(transparent)]
    Betting(#[from] BettingError),
    #[error(transparent)]
    Trump(#[from] TrumpError),
    #[error(transparent)]
    Play(#[from] PlayError),
    #[error(transparent)]
    Rules(#[from] RulesError),
    #[error("round finished without a scorable result")]
    RoundIncomplete,
    #[error("match is already over")]
    MatchOver,
}

#[derive(Debug, Clone, Copy)]
pub struct BetRequest<'a> {
    pub seat: PlayerPosition,
    pub hand: &'a Hand,
    pub min: u32,
    pub max: u32,
    pub increment: u32,
    /// Amounts already bid this round; none of them may be repeated.
    pub taken: &'a [u32],
    /// Standing bid per seat, `None` for seats that passed or have not bid.
    pub standing: [Option<u32>; PLAYER_COUNT],
}

impl BetRequest<'_> {
    pub fn available_bids(&self) -> Vec<u32> {
        bid_ladder(self.min, self.max, self.increment)
            .filter(|amount| !self.taken.contains(amount))
            .collect()
    }

    pub fn is_legal(&self, action: BetAction) -> bool {
        match action {
            BetAction::Pass => true,
            BetAction::Bid(amount) => self.available_bids().contains(&amount),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TrumpRequest<'a> {
    pub seat: PlayerPosition,
    pub hand: &'a Hand,
    pub bid: u32,
}

#[derive(Debug, Clone, Copy)]
pub struct CardRequest<'a> {
    pub seat: PlayerPosition,
    pub hand: &'a Hand,
    pub leading: Option<Suit>,
    pub trump: Suit,
    pub trick: &'a [Play],
}

impl CardRequest<'_> {
    pub fn legal_cards(&self) -> Vec<Card> {
        legal_cards(self.hand, self.leading)
    }
}

/// Source of decisions for one seat: a human adapter or an AI.
///
/// Responses only need to be well formed; legality is checked by the engine,
/// which calls [`InputProvider::rejected`] and asks again on failure.
pub trait InputProvider {
    fn get_bet(&mut self, request: &BetRequest<'_>) -> BetAction;

    fn get_trump(&mut self, request: &TrumpRequest<'_>) -> Suit;

    /// Index into `request.hand` of the card to play.
    fn get_card(&mut self, request: &CardRequest<'_>) -> usize;

    fn rejected(&mut self, _seat: PlayerPosition, _error: &EngineError) {}
}

impl<P: InputProvider + ?Sized> InputProvider for Box<P> {
    fn get_bet(&mut self, request: &BetRequest<'_>) -> BetAction {
        (**self).get_bet(request)
    }

    fn get_trump(&mut self, request: &TrumpRequest<'_>) -> Suit {
        (**self).get_trump(request)
    }

    fn get_card(&mut self, request: &CardRequest<'_>) -> usize {
        (**self).get_card(request)
    }

    fn rejected(&mut self, seat: PlayerPosition, error: &EngineError) {
        (**self).rejected(seat, error);
    }
}
