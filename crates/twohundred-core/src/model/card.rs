use crate::model::face::Face;
use crate::model::suit::Suit;
use core::fmt;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An immutable playing card. Face value and point value are derived from
/// the face, so every `Card` in circulation satisfies the point mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    face: Face,
    suit: Suit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CardError {
    #[error("face value {0} is outside 1..=10")]
    FaceValueOutOfRange(u8),
    #[error("point value {0} is not one of 0, 5 or 10")]
    PointValueOutOfRange(u8),
    #[error("{face} carries face value {expected}, got {actual}")]
    FaceValueMismatch { face: Face, expected: u8, actual: u8 },
    #[error("{face} is worth {expected} points, got {actual}")]
    PointValueMismatch { face: Face, expected: u8, actual: u8 },
}

impl Card {
    pub const fn new(face: Face, suit: Suit) -> Self {
        Self { face, suit }
    }

    /// Builds a card from explicit values, rejecting any combination that
    /// disagrees with the face.
    pub fn with_values(
        face: Face,
        suit: Suit,
        face_value: u8,
        point_value: u8,
    ) -> Result<Self, CardError> {
        if !(1..=10).contains(&face_value) {
            return Err(CardError::FaceValueOutOfRange(face_value));
        }
        if !matches!(point_value, 0 | 5 | 10) {
            return Err(CardError::PointValueOutOfRange(point_value));
        }
        if face.value() != face_value {
            return Err(CardError::FaceValueMismatch {
                face,
                expected: face.value(),
                actual: face_value,
            });
        }
        if face.points() != point_value {
            return Err(CardError::PointValueMismatch {
                face,
                expected: face.points(),
                actual: point_value,
            });
        }
        Ok(Self { face, suit })
    }

    pub const fn face(self) -> Face {
        self.face
    }

    pub const fn suit(self) -> Suit {
        self.suit
    }

    pub const fn face_value(self) -> u8 {
        self.face.value()
    }

    pub const fn point_value(self) -> u8 {
        self.face.points()
    }

    pub const fn is_point_card(self) -> bool {
        self.face.points() > 0
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.face, self.suit)
    }
}
