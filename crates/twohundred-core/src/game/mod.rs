pub mod engine;
pub mod events;
pub mod input;
pub mod match_state;
pub mod serialization;
