//! Drives a match by soliciting decisions from the four seats.

use crate::game::events::{EventSink, GameEvent};
use crate::game::input::{BetRequest, CardRequest, EngineError, InputProvider, TrumpRequest};
use crate::game::match_state::MatchState;
use crate::model::betting::BettingOutcome;
use crate::model::player::{PLAYER_COUNT, PlayerPosition, Team};
use crate::model::round::{PlayOutcome, RoundPhase};
use crate::model::score::RoundScore;
use tracing::{Level, event};

pub type Seats = [Box<dyn InputProvider>; PLAYER_COUNT];

pub struct GameEngine<S: EventSink> {
    sink: S,
}

impl<S: EventSink> GameEngine<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Plays rounds until a team reaches the winning score. A round already
    /// under way (for example one restored from a snapshot) is resumed where
    /// it stands.
    pub fn play_match(
        &mut self,
        state: &mut MatchState,
        seats: &mut Seats,
    ) -> Result<Team, EngineError> {
        if state.is_over() {
            return Err(EngineError::MatchOver);
        }
        if is_fresh_round(state) {
            self.announce_round(state);
        }

        loop {
            self.play_round(state, seats)?;
            if let Some(winner) = state.winner() {
                self.sink.emit(GameEvent::GameOver {
                    winner,
                    totals: *state.scores().standings(),
                });
                return Ok(winner);
            }
        }
    }

    /// Completes the current round from whatever phase it is in and scores it.
    /// When the current round has already been scored the next one is dealt
    /// and played instead.
    pub fn play_round(
        &mut self,
        state: &mut MatchState,
        seats: &mut Seats,
    ) -> Result<RoundScore, EngineError> {
        if state.is_over() {
            return Err(EngineError::MatchOver);
        }
        if state.round().is_scored() {
            state.start_next_round();
            self.announce_round(state);
        }

        loop {
            match state.round().phase() {
                RoundPhase::Betting => self.solicit_bet(state, seats),
                RoundPhase::TrumpSelection => self.solicit_trump(state, seats),
                RoundPhase::Playing => self.solicit_card(state, seats),
                RoundPhase::Complete => break,
            }
        }

        let scored = state.finish_round().ok_or(EngineError::RoundIncomplete)?;
        self.sink.emit(GameEvent::ScoreUpdated {
            round: state.round_number(),
            deltas: scored.deltas,
            totals: *state.scores().standings(),
            locked_out: scored.locked_out,
            bid_made: scored.bid_made,
        });
        Ok(scored)
    }

    fn announce_round(&mut self, state: &MatchState) {
        self.sink.emit(GameEvent::RoundStarted {
            round: state.round_number(),
            dealer: state.dealer(),
        });
        let round = state.round();
        self.sink.emit(GameEvent::CardsDealt {
            hand_sizes: PlayerPosition::LOOP.map(|seat| round.hand(seat).len()),
        });
    }

    fn solicit_bet(&mut self, state: &mut MatchState, seats: &mut Seats) {
        let round = state.round();
        let Some(seat) = round.betting().current_player() else {
            return;
        };
        let taken = round.betting().taken_bids();
        let rules = *round.rules();
        let request = BetRequest {
            seat,
            hand: round.hand(seat),
            min: rules.min_bet,
            max: rules.max_bet,
            increment: rules.bet_increment,
            taken: &taken,
            standing: round.betting().standing_bids(),
        };
        let action = seats[seat.index()].get_bet(&request);

        let recorded_before = round.betting().history().len();
        match state.round_mut().submit_bet(seat, action) {
            Ok(outcome) => {
                let round = state.round();
                for record in &round.betting().history()[recorded_before..] {
                    self.sink.emit(GameEvent::BettingAction {
                        seat: record.seat,
                        action: record.action,
                        forced: record.forced,
                    });
                }
                if let BettingOutcome::Complete(winner) = outcome {
                    self.sink.emit(GameEvent::BettingCompleted {
                        winner,
                        bids: round.betting().standing_bids(),
                        history: round.betting().history().to_vec(),
                    });
                }
            }
            Err(err) => reject(seats, seat, err.into()),
        }
    }

    fn solicit_trump(&mut self, state: &mut MatchState, seats: &mut Seats) {
        let round = state.round();
        let Some(bid) = round.winning_bid() else {
            return;
        };
        let request = TrumpRequest {
            seat: bid.seat,
            hand: round.hand(bid.seat),
            bid: bid.amount,
        };
        let suit = seats[bid.seat.index()].get_trump(&request);

        match state.round_mut().choose_trump(bid.seat, suit) {
            Ok(()) => self.sink.emit(GameEvent::TrumpSelected {
                seat: bid.seat,
                suit,
            }),
            Err(err) => reject(seats, bid.seat, err.into()),
        }
    }

    fn solicit_card(&mut self, state: &mut MatchState, seats: &mut Seats) {
        let round = state.round();
        let (Some(seat), Some(trump)) = (round.to_act(), round.trump()) else {
            return;
        };
        let trick_number = round.tricks_completed() + 1;
        self.sink.emit(GameEvent::PlayerTurn {
            seat,
            trick: trick_number,
        });

        loop {
            let round = state.round();
            let trick = round.current_trick();
            let request = CardRequest {
                seat,
                hand: round.hand(seat),
                leading: trick.lead_suit(),
                trump,
                trick: trick.plays(),
            };
            let index = seats[seat.index()].get_card(&request);
            let card = round.hand(seat).get(index);

            match state.round_mut().play_index(seat, index) {
                Ok(outcome) => {
                    if let Some(card) = card {
                        self.sink.emit(GameEvent::CardPlayed { seat, card });
                    }
                    if let PlayOutcome::TrickCompleted { winner, points, .. } = outcome {
                        self.sink.emit(GameEvent::TrickCompleted {
                            winner,
                            points,
                            trick: trick_number,
                        });
                    }
                    return;
                }
                Err(err) => reject(seats, seat, err.into()),
            }
        }
    }
}

fn is_fresh_round(state: &MatchState) -> bool {
    let round = state.round();
    round.phase() == RoundPhase::Betting && round.betting().history().is_empty()
}

fn reject(seats: &mut Seats, seat: PlayerPosition, error: EngineError) {
    event!(
        target: "twohundred_core::engine",
        Level::WARN,
        seat = %seat,
        error = %error,
        "decision rejected"
    );
    seats[seat.index()].rejected(seat, &error);
}

#[cfg(test)]
mod tests {
    use super::{GameEngine, Seats};
    use crate::game::events::{EventLog, GameEvent};
    use crate::game::input::{BetRequest, CardRequest, EngineError, InputProvider, TrumpRequest};
    use crate::game::match_state::MatchState;
    use crate::game::serialization::MatchSnapshot;
    use crate::model::betting::BetAction;
    use crate::model::player::PlayerPosition;
    use crate::model::rules::GameRules;
    use crate::model::suit::Suit;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Passes, picks the first suit it holds and the first legal card.
    struct FirstLegal;

    impl InputProvider for FirstLegal {
        fn get_bet(&mut self, _request: &BetRequest<'_>) -> BetAction {
            BetAction::Pass
        }

        fn get_trump(&mut self, request: &TrumpRequest<'_>) -> Suit {
            request.hand.cards()[0].suit()
        }

        fn get_card(&mut self, request: &CardRequest<'_>) -> usize {
            let legal = request.legal_cards();
            request.hand.position(legal[0]).unwrap_or(0)
        }
    }

    /// Tries an illegal bid and an out-of-range card index once each before
    /// behaving like [`FirstLegal`].
    struct Clumsy {
        rejections: Rc<RefCell<usize>>,
        tried_bid: bool,
        tried_card: bool,
    }

    impl InputProvider for Clumsy {
        fn get_bet(&mut self, _request: &BetRequest<'_>) -> BetAction {
            if !self.tried_bid {
                self.tried_bid = true;
                return BetAction::Bid(51);
            }
            BetAction::Pass
        }

        fn get_trump(&mut self, request: &TrumpRequest<'_>) -> Suit {
            FirstLegal.get_trump(request)
        }

        fn get_card(&mut self, request: &CardRequest<'_>) -> usize {
            if !self.tried_card {
                self.tried_card = true;
                return 99;
            }
            FirstLegal.get_card(request)
        }

        fn rejected(&mut self, _seat: PlayerPosition, _error: &EngineError) {
            *self.rejections.borrow_mut() += 1;
        }
    }

    fn seats_with(first: Box<dyn InputProvider>) -> Seats {
        [
            first,
            Box::new(FirstLegal),
            Box::new(FirstLegal),
            Box::new(FirstLegal),
        ]
    }

    fn names() -> [String; 4] {
        ["N", "E", "S", "W"].map(String::from)
    }

    #[test]
    fn round_emits_events_in_order() {
        let mut state =
            MatchState::with_seed(GameRules::default(), names(), PlayerPosition::West, 9).unwrap();
        let mut seats = seats_with(Box::new(FirstLegal));
        let mut engine = GameEngine::new(EventLog::new());

        let scored = engine.play_round(&mut state, &mut seats).unwrap();
        let events = engine.sink().events();

        let forced = events.iter().find_map(|event| match event {
            GameEvent::BettingAction {
                seat,
                action: BetAction::Bid(50),
                forced: true,
            } => Some(*seat),
            _ => None,
        });
        assert_eq!(forced, Some(PlayerPosition::West));

        let plays = events
            .iter()
            .filter(|event| matches!(event, GameEvent::CardPlayed { .. }))
            .count();
        let tricks = events
            .iter()
            .filter(|event| matches!(event, GameEvent::TrickCompleted { .. }))
            .count();
        assert_eq!(plays, 40);
        assert_eq!(tricks, 10);
        assert!(matches!(
            events.last(),
            Some(GameEvent::ScoreUpdated { round: 1, .. })
        ));
        assert_eq!(state.scores().standings(), &scored.deltas);
    }

    #[test]
    fn illegal_decisions_are_resolicited() {
        let rejections = Rc::new(RefCell::new(0));
        let clumsy = Clumsy {
            rejections: Rc::clone(&rejections),
            tried_bid: false,
            tried_card: false,
        };
        let mut state =
            MatchState::with_seed(GameRules::default(), names(), PlayerPosition::West, 4).unwrap();
        let mut seats = seats_with(Box::new(clumsy));
        let mut engine = GameEngine::new(EventLog::new());

        engine.play_round(&mut state, &mut seats).unwrap();
        assert_eq!(*rejections.borrow(), 2);
        assert_eq!(state.round().tricks_completed(), 10);
    }

    #[test]
    fn match_runs_to_completion() {
        let mut state =
            MatchState::with_seed(GameRules::default(), names(), PlayerPosition::North, 21)
                .unwrap();
        let mut seats = seats_with(Box::new(FirstLegal));
        let mut engine = GameEngine::new(EventLog::new());

        let winner = engine.play_match(&mut state, &mut seats).unwrap();
        assert_eq!(state.winner(), Some(winner));
        assert!(state.scores().score(winner) >= 200);
        assert!(matches!(
            engine.sink().events().last(),
            Some(GameEvent::GameOver { .. })
        ));
        assert_eq!(
            engine.play_match(&mut state, &mut seats),
            Err(EngineError::MatchOver)
        );
    }

    #[test]
    fn scored_round_is_never_scored_twice() {
        let mut state =
            MatchState::with_seed(GameRules::default(), names(), PlayerPosition::West, 2024)
                .unwrap();
        let mut seats = seats_with(Box::new(FirstLegal));
        let mut engine = GameEngine::new(EventLog::new());

        let first = engine.play_round(&mut state, &mut seats).unwrap();
        assert_eq!(state.scores().standings(), &first.deltas);

        let second = engine.play_round(&mut state, &mut seats).unwrap();
        assert_eq!(state.round_number(), 2);
        assert_eq!(state.dealer(), PlayerPosition::North);
        assert_eq!(
            state.scores().standings(),
            &[
                first.deltas[0] + second.deltas[0],
                first.deltas[1] + second.deltas[1]
            ]
        );
        assert!(engine.sink().events().iter().any(|event| matches!(
            event,
            GameEvent::RoundStarted {
                round: 2,
                dealer: PlayerPosition::North
            }
        )));
    }

    #[test]
    fn resuming_a_scored_round_deals_the_next_one() {
        let mut state =
            MatchState::with_seed(GameRules::default(), names(), PlayerPosition::West, 2024)
                .unwrap();
        let mut seats = seats_with(Box::new(FirstLegal));
        let mut engine = GameEngine::new(EventLog::new());
        engine.play_round(&mut state, &mut seats).unwrap();
        let saved = *state.scores().standings();

        let json = MatchSnapshot::to_json(&state).unwrap();
        let mut resumed = MatchSnapshot::from_json(&json).unwrap().restore().unwrap();
        let mut replay = GameEngine::new(EventLog::new());
        let next = replay.play_round(&mut resumed, &mut seats).unwrap();

        assert_eq!(resumed.round_number(), 2);
        assert_eq!(
            resumed.scores().standings(),
            &[saved[0] + next.deltas[0], saved[1] + next.deltas[1]]
        );

        // the original continues identically
        let expected = engine.play_round(&mut state, &mut seats).unwrap();
        assert_eq!(next, expected);
        assert_eq!(resumed.round(), state.round());
    }

    #[test]
    fn play_round_after_match_end_reports_match_over() {
        let mut state =
            MatchState::with_seed(GameRules::default(), names(), PlayerPosition::East, 13)
                .unwrap();
        let mut seats = seats_with(Box::new(FirstLegal));
        let mut engine = GameEngine::new(EventLog::new());
        engine.play_match(&mut state, &mut seats).unwrap();

        assert_eq!(
            engine.play_round(&mut state, &mut seats),
            Err(EngineError::MatchOver)
        );
    }
}
