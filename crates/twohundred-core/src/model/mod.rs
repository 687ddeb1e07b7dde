pub mod betting;
pub mod card;
pub mod deck;
pub mod face;
pub mod hand;
pub mod player;
pub mod ranking;
pub mod round;
pub mod rules;
pub mod score;
pub mod suit;
pub mod trick;
