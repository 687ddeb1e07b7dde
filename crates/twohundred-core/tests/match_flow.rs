use std::collections::VecDeque;
use std::sync::mpsc;
use twohundred_core::game::engine::{GameEngine, Seats};
use twohundred_core::game::events::{ChannelSink, EventLog, GameEvent, NullSink};
use twohundred_core::game::input::{BetRequest, CardRequest, InputProvider, TrumpRequest};
use twohundred_core::game::match_state::MatchState;
use twohundred_core::game::serialization::MatchSnapshot;
use twohundred_core::model::betting::{BetAction, WinningBid};
use twohundred_core::model::player::{PlayerPosition, Team};
use twohundred_core::model::round::RoundPhase;
use twohundred_core::model::rules::GameRules;
use twohundred_core::model::suit::Suit;

/// Replays queued bets, then passes. Always names `trump` and plays the
/// highest legal card.
struct Scripted {
    bets: VecDeque<BetAction>,
    trump: Suit,
}

impl Scripted {
    fn passing() -> Self {
        Self::with_bets(&[])
    }

    fn with_bets(bets: &[BetAction]) -> Self {
        Self {
            bets: bets.iter().copied().collect(),
            trump: Suit::Spades,
        }
    }
}

impl InputProvider for Scripted {
    fn get_bet(&mut self, _request: &BetRequest<'_>) -> BetAction {
        self.bets.pop_front().unwrap_or(BetAction::Pass)
    }

    fn get_trump(&mut self, _request: &TrumpRequest<'_>) -> Suit {
        self.trump
    }

    fn get_card(&mut self, request: &CardRequest<'_>) -> usize {
        let legal = request.legal_cards();
        let best = legal
            .iter()
            .max_by_key(|card| card.face_value())
            .copied()
            .unwrap_or(request.hand.cards()[0]);
        request.hand.position(best).unwrap_or(0)
    }
}

fn passing_seats() -> Seats {
    [
        Box::new(Scripted::passing()),
        Box::new(Scripted::passing()),
        Box::new(Scripted::passing()),
        Box::new(Scripted::passing()),
    ]
}

fn names() -> [String; 4] {
    ["North", "East", "South", "West"].map(String::from)
}

#[test]
fn all_pass_forces_the_dealer_to_open_at_minimum() {
    let mut state =
        MatchState::with_seed(GameRules::default(), names(), PlayerPosition::West, 2024).unwrap();
    let mut seats = passing_seats();
    let mut engine = GameEngine::new(EventLog::new());

    engine.play_round(&mut state, &mut seats).unwrap();

    let completed = engine.sink().events().iter().find_map(|event| match event {
        GameEvent::BettingCompleted { winner, .. } => Some(*winner),
        _ => None,
    });
    assert_eq!(
        completed,
        Some(WinningBid {
            seat: PlayerPosition::West,
            amount: 50
        })
    );
    assert!(state.round().players()[3].betting().has_bet);
}

#[test]
fn contested_bidding_goes_to_the_highest_standing_bid() {
    let mut state =
        MatchState::with_seed(GameRules::default(), names(), PlayerPosition::North, 8).unwrap();
    let mut seats: Seats = [
        Box::new(Scripted::with_bets(&[BetAction::Bid(80)])),
        Box::new(Scripted::with_bets(&[BetAction::Bid(60)])),
        Box::new(Scripted::passing()),
        Box::new(Scripted::with_bets(&[BetAction::Bid(70)])),
    ];
    let mut engine = GameEngine::new(EventLog::new());

    let scored = engine.play_round(&mut state, &mut seats).unwrap();

    assert_eq!(
        state.round().winning_bid(),
        Some(WinningBid {
            seat: PlayerPosition::North,
            amount: 80
        })
    );
    assert_eq!(state.round().trump(), Some(Suit::Spades));
    let team_one = state.round().team_points(Team::One) as i32;
    if scored.bid_made {
        assert_eq!(scored.deltas[Team::One.index()], team_one);
    } else {
        assert_eq!(scored.deltas[Team::One.index()], -80);
    }
}

#[test]
fn full_match_streams_events_over_a_channel() {
    let (tx, rx) = mpsc::channel();
    let mut state =
        MatchState::with_seed(GameRules::default(), names(), PlayerPosition::South, 31).unwrap();
    let mut seats = passing_seats();
    let mut engine = GameEngine::new(ChannelSink::new(tx));

    let winner = engine.play_match(&mut state, &mut seats).unwrap();
    drop(engine);

    let events: Vec<GameEvent> = rx.iter().collect();
    assert!(matches!(
        events.first(),
        Some(GameEvent::RoundStarted { round: 1, .. })
    ));
    assert_eq!(
        events.last(),
        Some(&GameEvent::GameOver {
            winner,
            totals: *state.scores().standings(),
        })
    );

    let rounds = events
        .iter()
        .filter(|event| matches!(event, GameEvent::ScoreUpdated { .. }))
        .count();
    assert_eq!(rounds as u32, state.round_number());

    let mut dealers = events.iter().filter_map(|event| match event {
        GameEvent::RoundStarted { dealer, .. } => Some(*dealer),
        _ => None,
    });
    let first = dealers.next().unwrap();
    assert_eq!(first, PlayerPosition::South);
    let mut expected = first;
    for dealer in dealers {
        expected = expected.next();
        assert_eq!(dealer, expected);
    }
}

#[test]
fn match_resumes_from_a_mid_trick_snapshot() {
    let mut state =
        MatchState::with_seed(GameRules::default(), names(), PlayerPosition::East, 55).unwrap();
    {
        let round = state.round_mut();
        while round.phase() == RoundPhase::Betting {
            let seat = round.to_act().unwrap();
            round.submit_bet(seat, BetAction::Pass).unwrap();
        }
        let bidder = round.to_act().unwrap();
        round.choose_trump(bidder, Suit::Hearts).unwrap();
        let seat = round.to_act().unwrap();
        let card = round.legal_cards(seat)[0];
        round.play_card(seat, card).unwrap();
    }

    let json = MatchSnapshot::to_json(&state).unwrap();
    let mut resumed = MatchSnapshot::from_json(&json).unwrap().restore().unwrap();
    assert_eq!(resumed.round(), state.round());

    let mut seats = passing_seats();
    let mut engine = GameEngine::new(NullSink);
    let scored = engine.play_round(&mut resumed, &mut seats).unwrap();

    assert_eq!(resumed.round().tricks_completed(), 10);
    assert_eq!(resumed.round().trump(), Some(Suit::Hearts));
    assert_eq!(resumed.scores().standings(), &scored.deltas);
}
