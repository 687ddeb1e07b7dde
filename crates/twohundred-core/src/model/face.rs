use core::fmt;
use serde::{Deserialize, Serialize};

/// The ten faces of the 40-card deck, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[repr(u8)]
pub enum Face {
    Five = 1,
    Six = 2,
    Seven = 3,
    Eight = 4,
    Nine = 5,
    Ten = 6,
    Jack = 7,
    Queen = 8,
    King = 9,
    Ace = 10,
}

impl Face {
    pub const ORDERED: [Face; 10] = [
        Face::Five,
        Face::Six,
        Face::Seven,
        Face::Eight,
        Face::Nine,
        Face::Ten,
        Face::Jack,
        Face::Queen,
        Face::King,
        Face::Ace,
    ];

    pub const fn from_value(value: u8) -> Option<Self> {
        match value {
            1 => Some(Face::Five),
            2 => Some(Face::Six),
            3 => Some(Face::Seven),
            4 => Some(Face::Eight),
            5 => Some(Face::Nine),
            6 => Some(Face::Ten),
            7 => Some(Face::Jack),
            8 => Some(Face::Queen),
            9 => Some(Face::King),
            10 => Some(Face::Ace),
            _ => None,
        }
    }

    /// Comparison rank in `1..=10`.
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Points the face is worth when captured in a trick.
    pub const fn points(self) -> u8 {
        match self {
            Face::Five => 5,
            Face::Ten | Face::Ace => 10,
            _ => 0,
        }
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Face::Five => "5",
            Face::Six => "6",
            Face::Seven => "7",
            Face::Eight => "8",
            Face::Nine => "9",
            Face::Ten => "10",
            Face::Jack => "J",
            Face::Queen => "Q",
            Face::King => "K",
            Face::Ace => "A",
        };
        f.write_str(text)
    }
}
