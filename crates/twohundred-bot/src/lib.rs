pub mod bot;
pub mod policy;

pub use bot::{BotDifficulty, BotPlayer, UnknownDifficulty};
pub use policy::{AdvancedPolicy, BalancedPolicy, BasicPolicy, Policy};
