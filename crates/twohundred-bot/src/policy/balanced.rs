use super::Policy;
use crate::bot::eval::{
    closest_bid, hand_strength, play_strength, suit_counts, suit_face_totals, winning_candidates,
};
use std::cmp::Reverse;
use twohundred_core::game::input::{BetRequest, CardRequest, TrumpRequest};
use twohundred_core::model::betting::BetAction;
use twohundred_core::model::card::Card;
use twohundred_core::model::suit::Suit;

/// Minimum strength and target bid for each band, strongest first.
const BID_BANDS: [(u32, u32); 3] = [(95, 85), (80, 70), (65, 55)];

/// Bids from raw hand strength and plays the cheapest card that still wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct BalancedPolicy;

impl BalancedPolicy {
    pub fn new() -> Self {
        Self
    }

    /// Bid this hand is worth, or `None` below the lowest band.
    pub fn target_bid(strength: u32) -> Option<u32> {
        BID_BANDS
            .iter()
            .find(|(floor, _)| strength >= *floor)
            .map(|(_, target)| *target)
    }
}

impl Policy for BalancedPolicy {
    fn decide_bet(&mut self, request: &BetRequest<'_>) -> BetAction {
        let Some(target) = Self::target_bid(hand_strength(request.hand)) else {
            return BetAction::Pass;
        };
        closest_bid(&request.available_bids(), target).map_or(BetAction::Pass, BetAction::Bid)
    }

    fn select_trump(&mut self, request: &TrumpRequest<'_>) -> Suit {
        let counts = suit_counts(request.hand);
        let faces = suit_face_totals(request.hand);
        Suit::ALL
            .iter()
            .copied()
            .max_by_key(|suit| {
                let idx = suit.index();
                (counts[idx], faces[idx], Reverse(idx))
            })
            .unwrap_or(Suit::Clubs)
    }

    fn choose_card(&mut self, request: &CardRequest<'_>) -> Option<Card> {
        let mut legal = request.legal_cards();
        legal.sort_by_key(|card| (play_strength(card), card.suit()));

        if request.trick.is_empty() {
            return legal.get(legal.len() / 2).copied();
        }

        winning_candidates(&legal, request.trick, request.trump)
            .into_iter()
            .min_by_key(|card| (card.face_value(), card.point_value()))
            .or_else(|| legal.first().copied())
    }
}
