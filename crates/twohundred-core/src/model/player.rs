use crate::model::hand::Hand;
use core::fmt;
use serde::{Deserialize, Serialize};

pub const PLAYER_COUNT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum PlayerPosition {
    North = 0,
    East = 1,
    South = 2,
    West = 3,
}

impl PlayerPosition {
    pub const LOOP: [PlayerPosition; PLAYER_COUNT] = [
        PlayerPosition::North,
        PlayerPosition::East,
        PlayerPosition::South,
        PlayerPosition::West,
    ];

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(PlayerPosition::North),
            1 => Some(PlayerPosition::East),
            2 => Some(PlayerPosition::South),
            3 => Some(PlayerPosition::West),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn next(self) -> PlayerPosition {
        match self {
            PlayerPosition::North => PlayerPosition::East,
            PlayerPosition::East => PlayerPosition::South,
            PlayerPosition::South => PlayerPosition::West,
            PlayerPosition::West => PlayerPosition::North,
        }
    }

    /// The seat across the table, which is always the partner.
    pub const fn partner(self) -> PlayerPosition {
        match self {
            PlayerPosition::North => PlayerPosition::South,
            PlayerPosition::East => PlayerPosition::West,
            PlayerPosition::South => PlayerPosition::North,
            PlayerPosition::West => PlayerPosition::East,
        }
    }

    /// Even seats play for team one, odd seats for team two.
    pub const fn team(self) -> Team {
        if self.index() % 2 == 0 {
            Team::One
        } else {
            Team::Two
        }
    }

    /// Seats in play order starting from `self`.
    pub fn rotation(self) -> impl Iterator<Item = PlayerPosition> {
        let start = self.index();
        (0..PLAYER_COUNT)
            .filter_map(move |offset| Self::from_index((start + offset) % PLAYER_COUNT))
    }
}

impl fmt::Display for PlayerPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PlayerPosition::North => "North",
            PlayerPosition::East => "East",
            PlayerPosition::South => "South",
            PlayerPosition::West => "West",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    One,
    Two,
}

impl Team {
    pub const BOTH: [Team; 2] = [Team::One, Team::Two];

    pub const fn index(self) -> usize {
        match self {
            Team::One => 0,
            Team::Two => 1,
        }
    }

    pub const fn seats(self) -> [PlayerPosition; 2] {
        match self {
            Team::One => [PlayerPosition::North, PlayerPosition::South],
            Team::Two => [PlayerPosition::East, PlayerPosition::West],
        }
    }

    pub const fn opponent(self) -> Team {
        match self {
            Team::One => Team::Two,
            Team::Two => Team::One,
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Team::One => f.write_str("Team One"),
            Team::Two => f.write_str("Team Two"),
        }
    }
}

/// Per-round betting record of a single player. `current_bid == None` after a
/// pass stands for the withdrawn bid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BettingStatus {
    pub has_bet: bool,
    pub has_passed: bool,
    pub current_bid: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    name: String,
    hand: Hand,
    betting: BettingStatus,
}

impl Player {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hand: Hand::new(),
            betting: BettingStatus::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn hand(&self) -> &Hand {
        &self.hand
    }

    pub fn hand_mut(&mut self) -> &mut Hand {
        &mut self.hand
    }

    pub fn betting(&self) -> &BettingStatus {
        &self.betting
    }

    pub fn betting_mut(&mut self) -> &mut BettingStatus {
        &mut self.betting
    }

    /// Clears the hand and betting record ahead of a new deal.
    pub fn reset_for_round(&mut self) {
        self.hand.clear();
        self.betting = BettingStatus::default();
    }
}
