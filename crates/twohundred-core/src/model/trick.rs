use crate::model::card::Card;
use crate::model::player::{PLAYER_COUNT, PlayerPosition};
use crate::model::ranking::wins;
use crate::model::suit::Suit;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trick {
    leader: PlayerPosition,
    plays: Vec<Play>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Play {
    pub position: PlayerPosition,
    pub card: Card,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrickError {
    #[error("trick already complete")]
    TrickComplete,
    #[error("expected {expected} to play next but got {actual}")]
    OutOfTurn {
        expected: PlayerPosition,
        actual: PlayerPosition,
    },
    #[error("{0} has already played this trick")]
    AlreadyPlayed(PlayerPosition),
}

impl Trick {
    pub fn new(leader: PlayerPosition) -> Self {
        Self {
            leader,
            plays: Vec::with_capacity(PLAYER_COUNT),
        }
    }

    pub fn leader(&self) -> PlayerPosition {
        self.leader
    }

    pub fn plays(&self) -> &[Play] {
        &self.plays
    }

    pub fn is_empty(&self) -> bool {
        self.plays.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.plays.len() == PLAYER_COUNT
    }

    pub fn lead_suit(&self) -> Option<Suit> {
        self.plays.first().map(|play| play.card.suit())
    }

    pub fn play(&mut self, position: PlayerPosition, card: Card) -> Result<(), TrickError> {
        if self.is_complete() {
            return Err(TrickError::TrickComplete);
        }

        if self.plays.iter().any(|play| play.position == position) {
            return Err(TrickError::AlreadyPlayed(position));
        }

        let expected = self.expected_position();
        if expected != position {
            return Err(TrickError::OutOfTurn {
                expected,
                actual: position,
            });
        }

        self.plays.push(Play { position, card });
        Ok(())
    }

    /// Best play so far; on a complete trick this is the winner.
    pub fn current_winner(&self, trump: Suit) -> Option<Play> {
        let leading = self.lead_suit()?;
        winning_play(&self.plays, trump, leading)
    }

    pub fn winner(&self, trump: Suit) -> Option<PlayerPosition> {
        if !self.is_complete() {
            return None;
        }
        self.current_winner(trump).map(|play| play.position)
    }

    pub fn points(&self) -> u32 {
        self.plays
            .iter()
            .map(|play| play.card.point_value() as u32)
            .sum()
    }

    pub fn expected_position(&self) -> PlayerPosition {
        self.plays
            .last()
            .map(|play| play.position.next())
            .unwrap_or(self.leader)
    }
}

/// Folds [`wins`] over `plays`, starting from the first play as the
/// provisional winner.
pub fn winning_play(plays: &[Play], trump: Suit, leading: Suit) -> Option<Play> {
    let (first, rest) = plays.split_first()?;
    Some(rest.iter().fold(*first, |best, play| {
        if wins(play.card, best.card, trump, leading) {
            *play
        } else {
            best
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::{Play, Trick, TrickError, winning_play};
    use crate::model::card::Card;
    use crate::model::deck::Deck;
    use crate::model::face::Face;
    use crate::model::player::PlayerPosition;
    use crate::model::suit::Suit;

    fn full_trick(leader: PlayerPosition, cards: [Card; 4]) -> Trick {
        let mut trick = Trick::new(leader);
        for (seat, card) in leader.rotation().zip(cards) {
            trick.play(seat, card).unwrap();
        }
        trick
    }

    #[test]
    fn plays_follow_turn_order() {
        let mut trick = Trick::new(PlayerPosition::North);
        assert!(
            trick
                .play(PlayerPosition::North, Card::new(Face::Six, Suit::Clubs))
                .is_ok()
        );
        assert!(matches!(
            trick.play(PlayerPosition::South, Card::new(Face::Seven, Suit::Clubs)),
            Err(TrickError::OutOfTurn { .. })
        ));
    }

    #[test]
    fn sole_trump_beats_every_leading_card() {
        let trick = full_trick(
            PlayerPosition::North,
            [
                Card::new(Face::Five, Suit::Hearts),
                Card::new(Face::Ten, Suit::Hearts),
                Card::new(Face::Ace, Suit::Hearts),
                Card::new(Face::King, Suit::Spades),
            ],
        );
        assert_eq!(trick.lead_suit(), Some(Suit::Hearts));
        assert_eq!(trick.winner(Suit::Spades), Some(PlayerPosition::West));
        assert_eq!(trick.points(), 25);
    }

    #[test]
    fn highest_leading_card_wins_without_trump() {
        let trick = full_trick(
            PlayerPosition::East,
            [
                Card::new(Face::Ten, Suit::Clubs),
                Card::new(Face::Queen, Suit::Clubs),
                Card::new(Face::Ace, Suit::Diamonds),
                Card::new(Face::Six, Suit::Clubs),
            ],
        );
        assert_eq!(trick.winner(Suit::Hearts), Some(PlayerPosition::South));
    }

    #[test]
    fn incomplete_trick_has_no_winner() {
        let mut trick = Trick::new(PlayerPosition::North);
        trick
            .play(PlayerPosition::North, Card::new(Face::Ace, Suit::Clubs))
            .unwrap();
        assert_eq!(trick.winner(Suit::Hearts), None);
        assert_eq!(
            trick.current_winner(Suit::Hearts).map(|p| p.position),
            Some(PlayerPosition::North)
        );
        assert!(matches!(
            trick.play(PlayerPosition::North, Card::new(Face::Six, Suit::Clubs)),
            Err(TrickError::AlreadyPlayed(PlayerPosition::North))
        ));
    }

    #[test]
    fn winner_is_independent_of_replay_order() {
        let plays = [
            Play {
                position: PlayerPosition::North,
                card: Card::new(Face::Nine, Suit::Diamonds),
            },
            Play {
                position: PlayerPosition::East,
                card: Card::new(Face::Ace, Suit::Clubs),
            },
            Play {
                position: PlayerPosition::South,
                card: Card::new(Face::Seven, Suit::Hearts),
            },
            Play {
                position: PlayerPosition::West,
                card: Card::new(Face::King, Suit::Diamonds),
            },
        ];
        let leading = plays[0].card.suit();
        for trump in Suit::ALL {
            let expected = winning_play(&plays, trump, leading).map(|p| p.position);
            let mut permuted = plays;
            for rotation in 0..4 {
                permuted.rotate_left(1);
                for swap in 0..3 {
                    permuted.swap(swap, swap + 1);
                    let got = winning_play(&permuted, trump, leading).map(|p| p.position);
                    assert_eq!(got, expected, "trump {trump} rotation {rotation}");
                }
            }
        }
    }

    #[test]
    fn random_tricks_have_order_independent_winners() {
        let mut orders = Vec::new();
        for a in 0..4 {
            for b in (0..4).filter(|b| *b != a) {
                for c in (0..4).filter(|c| *c != a && *c != b) {
                    orders.push([a, b, c, 6 - a - b - c]);
                }
            }
        }
        assert_eq!(orders.len(), 24);

        for seed in 0..300u64 {
            let deck = Deck::shuffled_with_seed(seed);
            let plays: Vec<Play> = PlayerPosition::LOOP
                .iter()
                .zip(deck.cards())
                .map(|(position, card)| Play {
                    position: *position,
                    card: *card,
                })
                .collect();
            let leading = plays[0].card.suit();
            let trump = Suit::ALL[seed as usize % 4];
            let expected = winning_play(&plays, trump, leading).map(|p| p.position);

            for order in &orders {
                let permuted: Vec<Play> = order.iter().map(|idx| plays[*idx]).collect();
                let got = winning_play(&permuted, trump, leading).map(|p| p.position);
                assert_eq!(got, expected, "seed {seed} order {order:?}");
            }
        }
    }
}
