//! Notifications raised by the engine. Sinks are fire-and-forget: the engine
//! never waits on a consumer and never reads anything back.

use crate::model::betting::{BetAction, BidRecord, WinningBid};
use crate::model::card::Card;
use crate::model::player::{PLAYER_COUNT, PlayerPosition, Team};
use crate::model::suit::Suit;
use serde::{Deserialize, Serialize};
use std::sync::mpsc::Sender;
use tracing::{Level, event};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    RoundStarted {
        round: u32,
        dealer: PlayerPosition,
    },
    CardsDealt {
        hand_sizes: [usize; PLAYER_COUNT],
    },
    BettingAction {
        seat: PlayerPosition,
        action: BetAction,
        forced: bool,
    },
    BettingCompleted {
        winner: WinningBid,
        bids: [Option<u32>; PLAYER_COUNT],
        history: Vec<BidRecord>,
    },
    TrumpSelected {
        seat: PlayerPosition,
        suit: Suit,
    },
    PlayerTurn {
        seat: PlayerPosition,
        trick: usize,
    },
    CardPlayed {
        seat: PlayerPosition,
        card: Card,
    },
    TrickCompleted {
        winner: PlayerPosition,
        points: u32,
        trick: usize,
    },
    ScoreUpdated {
        round: u32,
        deltas: [i32; 2],
        totals: [i32; 2],
        locked_out: [bool; 2],
        bid_made: bool,
    },
    GameOver {
        winner: Team,
        totals: [i32; 2],
    },
}

pub trait EventSink {
    fn emit(&mut self, event: GameEvent);
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn emit(&mut self, event: GameEvent) {
        (**self).emit(event);
    }
}

impl<S: EventSink + ?Sized> EventSink for Box<S> {
    fn emit(&mut self, event: GameEvent) {
        (**self).emit(event);
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: GameEvent) {}
}

/// Buffers events in memory until drained.
#[derive(Debug, Default)]
pub struct EventLog {
    queue: Vec<GameEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.queue
    }

    pub fn drain(&mut self) -> impl Iterator<Item = GameEvent> + '_ {
        self.queue.drain(..)
    }
}

impl EventSink for EventLog {
    fn emit(&mut self, event: GameEvent) {
        self.queue.push(event);
    }
}

/// Forwards events over an unbounded channel. A dropped receiver is ignored.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: Sender<GameEvent>,
}

impl ChannelSink {
    pub fn new(sender: Sender<GameEvent>) -> Self {
        Self { sender }
    }
}

impl EventSink for ChannelSink {
    fn emit(&mut self, event: GameEvent) {
        let _ = self.sender.send(event);
    }
}

/// Writes every event to `tracing` at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&mut self, game_event: GameEvent) {
        if !tracing::enabled!(target: "twohundred_core::events", Level::DEBUG) {
            return;
        }
        event!(
            target: "twohundred_core::events",
            Level::DEBUG,
            event = ?game_event
        );
    }
}

#[cfg(test)]
mod tests {
    use super::{ChannelSink, EventLog, EventSink, GameEvent, NullSink};
    use crate::model::player::PlayerPosition;
    use std::sync::mpsc;

    fn started() -> GameEvent {
        GameEvent::RoundStarted {
            round: 1,
            dealer: PlayerPosition::North,
        }
    }

    #[test]
    fn event_log_buffers_and_drains() {
        let mut log = EventLog::new();
        log.emit(started());
        assert_eq!(log.events().len(), 1);
        let drained: Vec<_> = log.drain().collect();
        assert_eq!(drained, vec![started()]);
        assert!(log.events().is_empty());
    }

    #[test]
    fn channel_sink_forwards_and_survives_dropped_receiver() {
        let (tx, rx) = mpsc::channel();
        let mut sink = ChannelSink::new(tx);
        sink.emit(started());
        assert_eq!(rx.recv().unwrap(), started());
        drop(rx);
        sink.emit(started());
    }

    fn emit_twice<S: EventSink>(mut sink: S) {
        sink.emit(started());
        sink.emit(started());
    }

    #[test]
    fn sinks_compose_through_references() {
        let mut log = EventLog::new();
        emit_twice(&mut log);
        let boxed: Box<dyn EventSink> = Box::new(NullSink);
        emit_twice(boxed);
        assert_eq!(log.events().len(), 2);
    }
}
