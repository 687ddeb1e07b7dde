use super::Policy;
use crate::bot::eval::{
    closest_bid, discard_key, hand_strength, high_cards_in, long_suit_excess, suit_counts,
    suit_face_totals, trick_points, winning_candidates,
};
use twohundred_core::game::input::{BetRequest, CardRequest, TrumpRequest};
use twohundred_core::model::betting::BetAction;
use twohundred_core::model::card::Card;
use twohundred_core::model::hand::Hand;
use twohundred_core::model::player::PlayerPosition;
use twohundred_core::model::suit::Suit;
use twohundred_core::model::trick::Play;

const BID_BANDS: [(u32, u32); 5] = [(110, 105), (100, 90), (90, 75), (80, 65), (70, 55)];
const HIGH_CARD_BONUS: u32 = 5;
const LENGTH_BONUS: u32 = 5;
/// Points already in a trick before it is worth contesting.
const CONTEST_THRESHOLD: u32 = 10;

/// Position-aware player that sizes bids against the opponents' standing bids.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdvancedPolicy;

impl AdvancedPolicy {
    pub fn new() -> Self {
        Self
    }

    pub fn strength(hand: &Hand) -> u32 {
        hand_strength(hand)
            + high_cards_in(hand, None) as u32 * HIGH_CARD_BONUS
            + long_suit_excess(hand) as u32 * LENGTH_BONUS
    }

    pub fn target_bid(strength: u32) -> Option<u32> {
        BID_BANDS
            .iter()
            .find(|(floor, _)| strength >= *floor)
            .map(|(_, target)| *target)
    }

    fn trump_score(hand: &Hand, suit: Suit) -> u32 {
        let idx = suit.index();
        suit_counts(hand)[idx] as u32 * 10
            + suit_face_totals(hand)[idx]
            + high_cards_in(hand, Some(suit)) as u32 * HIGH_CARD_BONUS
    }

    fn lead(legal: &[Card], trump: Suit) -> Option<Card> {
        let mut probes: Vec<Card> = legal
            .iter()
            .copied()
            .filter(|card| card.suit() != trump)
            .collect();
        if probes.is_empty() {
            probes = legal.to_vec();
        }
        probes.sort_by_key(|card| std::cmp::Reverse((card.face_value(), card.suit())));
        probes.get(1).or_else(|| probes.first()).copied()
    }
}

/// Whether `seat`'s partner currently holds the trick. Partner tracking is
/// not modelled yet, so this never defers.
fn partner_is_winning(_seat: PlayerPosition, _trick: &[Play], _trump: Suit) -> bool {
    false
}

impl Policy for AdvancedPolicy {
    fn decide_bet(&mut self, request: &BetRequest<'_>) -> BetAction {
        let Some(target) = Self::target_bid(Self::strength(request.hand)) else {
            return BetAction::Pass;
        };

        let opposing = request
            .seat
            .team()
            .opponent()
            .seats()
            .iter()
            .filter_map(|seat| request.standing[seat.index()])
            .max()
            .unwrap_or(0);
        if opposing >= target {
            return BetAction::Pass;
        }

        let candidates: Vec<u32> = request
            .available_bids()
            .into_iter()
            .filter(|amount| *amount > opposing)
            .collect();
        closest_bid(&candidates, target).map_or(BetAction::Pass, BetAction::Bid)
    }

    fn select_trump(&mut self, request: &TrumpRequest<'_>) -> Suit {
        Suit::ALL
            .iter()
            .copied()
            .max_by_key(|suit| {
                (
                    Self::trump_score(request.hand, *suit),
                    std::cmp::Reverse(suit.index()),
                )
            })
            .unwrap_or(Suit::Clubs)
    }

    fn choose_card(&mut self, request: &CardRequest<'_>) -> Option<Card> {
        let legal = request.legal_cards();
        if request.trick.is_empty() {
            return Self::lead(&legal, request.trump);
        }

        let dump = legal.iter().copied().min_by_key(discard_key);
        let deferring = request.trick.len() < 3
            && partner_is_winning(request.seat, request.trick, request.trump);
        if deferring || trick_points(request.trick) < CONTEST_THRESHOLD {
            return dump;
        }

        winning_candidates(&legal, request.trick, request.trump)
            .into_iter()
            .min_by_key(|card| (card.face_value(), card.point_value()))
            .or(dump)
    }
}
