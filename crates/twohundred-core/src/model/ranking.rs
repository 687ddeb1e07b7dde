//! Card comparison under a trump suit and a leading suit.

use crate::model::card::Card;
use crate::model::hand::Hand;
use crate::model::suit::Suit;

/// Returns true when `challenger` takes the trick away from `incumbent`.
///
/// A single trump beats everything else. Among cards of the same category the
/// one following the leading suit wins, and a card that is neither trump nor
/// of the leading suit can never win.
pub fn wins(challenger: Card, incumbent: Card, trump: Suit, leading: Suit) -> bool {
    let challenger_trump = challenger.suit() == trump;
    let incumbent_trump = incumbent.suit() == trump;

    match (challenger_trump, incumbent_trump) {
        (true, false) => true,
        (false, true) => false,
        (true, true) => challenger.face_value() > incumbent.face_value(),
        (false, false) => {
            let challenger_leads = challenger.suit() == leading;
            let incumbent_leads = incumbent.suit() == leading;
            match (challenger_leads, incumbent_leads) {
                (true, true) => challenger.face_value() > incumbent.face_value(),
                (true, false) => true,
                _ => false,
            }
        }
    }
}

/// A card is playable when nothing has been led yet, when it follows the
/// leading suit, or when the hand is void in the leading suit.
pub fn is_playable(card: Card, leading: Option<Suit>, hand: &Hand) -> bool {
    match leading {
        None => true,
        Some(suit) => card.suit() == suit || !hand.has_suit(suit),
    }
}

/// Every card of `hand` that may legally be played onto the current trick.
pub fn legal_cards(hand: &Hand, leading: Option<Suit>) -> Vec<Card> {
    hand.iter()
        .copied()
        .filter(|&card| is_playable(card, leading, hand))
        .collect()
}
