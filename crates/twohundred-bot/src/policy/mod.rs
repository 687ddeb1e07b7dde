mod advanced;
mod balanced;
mod basic;

pub use advanced::AdvancedPolicy;
pub use balanced::BalancedPolicy;
pub use basic::BasicPolicy;

use twohundred_core::game::input::{BetRequest, CardRequest, TrumpRequest};
use twohundred_core::model::betting::BetAction;
use twohundred_core::model::card::Card;
use twohundred_core::model::suit::Suit;

/// Decision contract shared by every AI tier.
///
/// Implementations must only return legal answers: a bid from
/// [`BetRequest::available_bids`] (or a pass when none remain), and a card
/// from [`CardRequest::legal_cards`]. `choose_card` yields `None` only for an
/// empty hand.
pub trait Policy: Send {
    fn decide_bet(&mut self, request: &BetRequest<'_>) -> BetAction;

    fn select_trump(&mut self, request: &TrumpRequest<'_>) -> Suit;

    fn choose_card(&mut self, request: &CardRequest<'_>) -> Option<Card>;
}
