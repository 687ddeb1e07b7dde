use super::Policy;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use twohundred_core::game::input::{BetRequest, CardRequest, TrumpRequest};
use twohundred_core::model::betting::BetAction;
use twohundred_core::model::card::Card;
use twohundred_core::model::suit::Suit;

const PASS_PROBABILITY: f64 = 0.5;

/// Coin-flip bidder that otherwise picks uniformly among legal options.
#[derive(Debug, Clone)]
pub struct BasicPolicy {
    rng: StdRng,
}

impl BasicPolicy {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for BasicPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl Policy for BasicPolicy {
    fn decide_bet(&mut self, request: &BetRequest<'_>) -> BetAction {
        if self.rng.gen_bool(PASS_PROBABILITY) {
            return BetAction::Pass;
        }
        request
            .available_bids()
            .choose(&mut self.rng)
            .map_or(BetAction::Pass, |amount| BetAction::Bid(*amount))
    }

    fn select_trump(&mut self, _request: &TrumpRequest<'_>) -> Suit {
        Suit::ALL[self.rng.gen_range(0..Suit::ALL.len())]
    }

    fn choose_card(&mut self, request: &CardRequest<'_>) -> Option<Card> {
        request.legal_cards().choose(&mut self.rng).copied()
    }
}
