use twohundred_core::model::card::Card;
use twohundred_core::model::hand::Hand;
use twohundred_core::model::ranking::wins;
use twohundred_core::model::suit::Suit;
use twohundred_core::model::trick::{Play, winning_play};

/// Face value at or above which a card counts as high (Queen and up).
pub const HIGH_CARD_FACE: u8 = 8;

/// Sum of point and face values over the hand.
pub fn hand_strength(hand: &Hand) -> u32 {
    hand.iter()
        .map(|card| card.point_value() as u32 + card.face_value() as u32)
        .sum()
}

pub fn suit_counts(hand: &Hand) -> [usize; 4] {
    let mut counts = [0usize; 4];
    for card in hand.iter() {
        counts[card.suit().index()] += 1;
    }
    counts
}

pub fn suit_face_totals(hand: &Hand) -> [u32; 4] {
    let mut totals = [0u32; 4];
    for card in hand.iter() {
        totals[card.suit().index()] += card.face_value() as u32;
    }
    totals
}

pub fn high_cards_in(hand: &Hand, suit: Option<Suit>) -> usize {
    hand.iter()
        .filter(|card| suit.is_none_or(|suit| card.suit() == suit))
        .filter(|card| card.face_value() >= HIGH_CARD_FACE)
        .count()
}

/// Cards held beyond three in each suit, summed.
pub fn long_suit_excess(hand: &Hand) -> usize {
    suit_counts(hand)
        .iter()
        .map(|count| count.saturating_sub(3))
        .sum()
}

/// The bid nearest `target`; ties go to the lower amount.
pub fn closest_bid(available: &[u32], target: u32) -> Option<u32> {
    available
        .iter()
        .copied()
        .min_by_key(|amount| (amount.abs_diff(target), *amount))
}

/// Ordering used when a card is being thrown away: points first, then face.
pub fn discard_key(card: &Card) -> (u8, u8) {
    (card.point_value(), card.face_value())
}

pub fn play_strength(card: &Card) -> u8 {
    card.point_value() + card.face_value()
}

/// Legal cards that would take the trick from its current winner.
pub fn winning_candidates(legal: &[Card], trick: &[Play], trump: Suit) -> Vec<Card> {
    let Some(lead) = trick.first() else {
        return legal.to_vec();
    };
    let leading = lead.card.suit();
    let Some(best) = winning_play(trick, trump, leading) else {
        return legal.to_vec();
    };
    legal
        .iter()
        .copied()
        .filter(|card| wins(*card, best.card, trump, leading))
        .collect()
}

pub fn trick_points(trick: &[Play]) -> u32 {
    trick.iter().map(|play| play.card.point_value() as u32).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use twohundred_core::model::face::Face;
    use twohundred_core::model::player::PlayerPosition;

    fn card(face: Face, suit: Suit) -> Card {
        Card::new(face, suit)
    }

    #[test]
    fn strength_adds_points_and_faces() {
        let hand = Hand::with_cards(vec![
            card(Face::Ace, Suit::Hearts),
            card(Face::Five, Suit::Clubs),
            card(Face::Seven, Suit::Spades),
        ]);
        // Ace 10+10, Five 5+1, Seven 0+3
        assert_eq!(hand_strength(&hand), 29);
    }

    #[test]
    fn suit_shape_helpers() {
        let hand = Hand::with_cards(vec![
            card(Face::Ace, Suit::Hearts),
            card(Face::King, Suit::Hearts),
            card(Face::Queen, Suit::Hearts),
            card(Face::Six, Suit::Hearts),
            card(Face::Five, Suit::Hearts),
            card(Face::Jack, Suit::Clubs),
        ]);
        assert_eq!(suit_counts(&hand), [1, 0, 5, 0]);
        assert_eq!(suit_face_totals(&hand), [7, 0, 10 + 9 + 8 + 2 + 1, 0]);
        assert_eq!(high_cards_in(&hand, None), 3);
        assert_eq!(high_cards_in(&hand, Some(Suit::Clubs)), 0);
        assert_eq!(long_suit_excess(&hand), 2);
    }

    #[test]
    fn closest_bid_prefers_lower_on_ties() {
        assert_eq!(closest_bid(&[50, 60, 80], 70), Some(60));
        assert_eq!(closest_bid(&[50, 85, 120], 85), Some(85));
        assert_eq!(closest_bid(&[], 85), None);
    }

    #[test]
    fn winning_candidates_respect_trump() {
        let trick = [Play {
            position: PlayerPosition::North,
            card: card(Face::King, Suit::Hearts),
        }];
        let legal = [
            card(Face::Ace, Suit::Hearts),
            card(Face::Queen, Suit::Hearts),
        ];
        assert_eq!(
            winning_candidates(&legal, &trick, Suit::Spades),
            vec![card(Face::Ace, Suit::Hearts)]
        );

        let void = [card(Face::Five, Suit::Spades), card(Face::Ace, Suit::Clubs)];
        assert_eq!(
            winning_candidates(&void, &trick, Suit::Spades),
            vec![card(Face::Five, Suit::Spades)]
        );
        assert_eq!(trick_points(&trick), 0);
    }
}
