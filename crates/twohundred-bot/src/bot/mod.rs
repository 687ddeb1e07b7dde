pub mod eval;

use crate::policy::{AdvancedPolicy, BalancedPolicy, BasicPolicy, Policy};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use tracing::{Level, event};
use twohundred_core::game::input::{
    BetRequest, CardRequest, EngineError, InputProvider, TrumpRequest,
};
use twohundred_core::model::betting::BetAction;
use twohundred_core::model::card::Card;
use twohundred_core::model::player::PlayerPosition;
use twohundred_core::model::suit::Suit;

const DIFFICULTY_ENV: &str = "TH_BOT_DIFFICULTY";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BotDifficulty {
    Basic,
    #[default]
    Balanced,
    Advanced,
}

impl BotDifficulty {
    pub const ALL: [BotDifficulty; 3] = [
        BotDifficulty::Basic,
        BotDifficulty::Balanced,
        BotDifficulty::Advanced,
    ];

    /// Reads `TH_BOT_DIFFICULTY` once per process; unknown values fall back
    /// to the default.
    pub fn from_env() -> Self {
        static CACHED: OnceLock<BotDifficulty> = OnceLock::new();
        *CACHED.get_or_init(|| Self::from_reader(|key| std::env::var(key).ok()))
    }

    fn from_reader<F>(mut read: F) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        read(DIFFICULTY_ENV)
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default()
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            BotDifficulty::Basic => "basic",
            BotDifficulty::Balanced => "balanced",
            BotDifficulty::Advanced => "advanced",
        }
    }

    /// Builds the policy for this tier. Only the basic tier draws on `seed`.
    pub fn policy(self, seed: u64) -> Box<dyn Policy> {
        match self {
            BotDifficulty::Basic => Box::new(BasicPolicy::with_seed(seed)),
            BotDifficulty::Balanced => Box::new(BalancedPolicy::new()),
            BotDifficulty::Advanced => Box::new(AdvancedPolicy::new()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDifficulty(pub String);

impl fmt::Display for UnknownDifficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown bot difficulty '{}'", self.0)
    }
}

impl std::error::Error for UnknownDifficulty {}

impl FromStr for BotDifficulty {
    type Err = UnknownDifficulty;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "basic" | "easy" | "random" => Ok(BotDifficulty::Basic),
            "balanced" | "normal" | "heuristic" => Ok(BotDifficulty::Balanced),
            "advanced" | "hard" => Ok(BotDifficulty::Advanced),
            _ => Err(UnknownDifficulty(raw.to_string())),
        }
    }
}

impl fmt::Display for BotDifficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Seats a [`Policy`] at the table by answering the engine's requests.
pub struct BotPlayer {
    difficulty: BotDifficulty,
    policy: Box<dyn Policy>,
    rejections: usize,
}

impl BotPlayer {
    pub fn new(difficulty: BotDifficulty, seed: u64) -> Self {
        Self::with_policy(difficulty, difficulty.policy(seed))
    }

    pub fn with_policy(difficulty: BotDifficulty, policy: Box<dyn Policy>) -> Self {
        Self {
            difficulty,
            policy,
            rejections: 0,
        }
    }

    pub fn difficulty(&self) -> BotDifficulty {
        self.difficulty
    }

    /// Decisions the engine has turned down. Stays at zero for a sound policy.
    pub fn rejections(&self) -> usize {
        self.rejections
    }
}

impl InputProvider for BotPlayer {
    fn get_bet(&mut self, request: &BetRequest<'_>) -> BetAction {
        let action = self.policy.decide_bet(request);
        log_bet_decision(request, self.difficulty, action);
        action
    }

    fn get_trump(&mut self, request: &TrumpRequest<'_>) -> Suit {
        let suit = self.policy.select_trump(request);
        if tracing::enabled!(target: "twohundred_bot::trump", Level::DEBUG) {
            event!(
                target: "twohundred_bot::trump",
                Level::DEBUG,
                seat = %request.seat,
                difficulty = %self.difficulty,
                bid = request.bid,
                trump = %suit,
            );
        }
        suit
    }

    fn get_card(&mut self, request: &CardRequest<'_>) -> usize {
        let chosen = self.policy.choose_card(request);
        let index = chosen
            .and_then(|card| request.hand.position(card))
            .unwrap_or(0);
        log_play_decision(request, self.difficulty, chosen);
        index
    }

    fn rejected(&mut self, seat: PlayerPosition, error: &EngineError) {
        self.rejections += 1;
        event!(
            target: "twohundred_bot::play",
            Level::WARN,
            seat = %seat,
            difficulty = %self.difficulty,
            error = %error,
            "policy produced an illegal decision"
        );
    }
}

fn log_bet_decision(request: &BetRequest<'_>, difficulty: BotDifficulty, action: BetAction) {
    if !tracing::enabled!(target: "twohundred_bot::bet", Level::INFO) {
        return;
    }

    event!(
        target: "twohundred_bot::bet",
        Level::INFO,
        seat = %request.seat,
        difficulty = %difficulty,
        hand_strength = eval::hand_strength(request.hand),
        available = request.available_bids().len(),
        taken = ?request.taken,
        action = %action,
    );
}

fn log_play_decision(
    request: &CardRequest<'_>,
    difficulty: BotDifficulty,
    chosen: Option<Card>,
) {
    if !tracing::enabled!(target: "twohundred_bot::play", Level::INFO) {
        return;
    }

    let legal = request.legal_cards();
    let legal_preview = if legal.len() <= 6 {
        legal
            .iter()
            .map(|card| card.to_string())
            .collect::<Vec<_>>()
            .join(",")
    } else {
        format!("{} moves", legal.len())
    };
    let choice = chosen.map_or_else(|| "none".to_string(), |card| card.to_string());

    event!(
        target: "twohundred_bot::play",
        Level::INFO,
        seat = %request.seat,
        difficulty = %difficulty,
        trump = %request.trump,
        legal_count = legal.len(),
        legal_moves = %legal_preview,
        chosen = %choice,
        trick_cards = request.trick.len(),
    );
}

#[cfg(test)]
mod tests {
    use super::{BotDifficulty, BotPlayer};
    use twohundred_core::game::input::{CardRequest, EngineError, InputProvider};
    use twohundred_core::model::card::Card;
    use twohundred_core::model::face::Face;
    use twohundred_core::model::hand::Hand;
    use twohundred_core::model::player::PlayerPosition;
    use twohundred_core::model::suit::Suit;

    #[test]
    fn difficulty_parses_aliases() {
        assert_eq!("easy".parse::<BotDifficulty>(), Ok(BotDifficulty::Basic));
        assert_eq!(" Normal ".parse::<BotDifficulty>(), Ok(BotDifficulty::Balanced));
        assert_eq!("HARD".parse::<BotDifficulty>(), Ok(BotDifficulty::Advanced));
        assert!("expert".parse::<BotDifficulty>().is_err());
        for difficulty in BotDifficulty::ALL {
            assert_eq!(difficulty.as_str().parse::<BotDifficulty>(), Ok(difficulty));
        }
    }

    #[test]
    fn default_difficulty_is_balanced() {
        assert_eq!(BotDifficulty::default(), BotDifficulty::Balanced);
    }

    #[test]
    fn difficulty_from_env_reads_the_variable() {
        let read = |value: &'static str| {
            move |key: &str| (key == "TH_BOT_DIFFICULTY").then(|| value.to_string())
        };
        assert_eq!(BotDifficulty::from_reader(read("hard")), BotDifficulty::Advanced);
        assert_eq!(BotDifficulty::from_reader(read("easy")), BotDifficulty::Basic);
        assert_eq!(BotDifficulty::from_reader(read("expert")), BotDifficulty::Balanced);
        assert_eq!(BotDifficulty::from_reader(|_| None), BotDifficulty::Balanced);
    }

    #[test]
    fn card_choice_maps_to_hand_index() {
        let hand = Hand::with_cards(vec![
            Card::new(Face::Five, Suit::Clubs),
            Card::new(Face::Ace, Suit::Hearts),
            Card::new(Face::Six, Suit::Hearts),
        ]);
        let request = CardRequest {
            seat: PlayerPosition::East,
            hand: &hand,
            leading: Some(Suit::Hearts),
            trump: Suit::Spades,
            trick: &[],
        };
        for difficulty in BotDifficulty::ALL {
            let mut bot = BotPlayer::new(difficulty, 5);
            let index = bot.get_card(&request);
            let card = hand.get(index).unwrap();
            assert_eq!(card.suit(), Suit::Hearts);
        }
    }

    #[test]
    fn rejections_are_counted() {
        let mut bot = BotPlayer::new(BotDifficulty::Advanced, 0);
        assert_eq!(bot.rejections(), 0);
        bot.rejected(PlayerPosition::North, &EngineError::RoundIncomplete);
        assert_eq!(bot.rejections(), 1);
        assert_eq!(bot.difficulty(), BotDifficulty::Advanced);
    }
}
