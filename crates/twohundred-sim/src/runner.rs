use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use rand::{RngCore, SeedableRng, rngs::StdRng};
use serde::Serialize;
use thiserror::Error;
use tracing::{Level, event};
use twohundred_bot::{BotDifficulty, BotPlayer};
use twohundred_core::game::engine::{GameEngine, Seats};
use twohundred_core::game::events::{EventSink, GameEvent};
use twohundred_core::game::input::{EngineError, InputProvider};
use twohundred_core::game::match_state::MatchState;
use twohundred_core::model::player::{PLAYER_COUNT, PlayerPosition, Team};
use twohundred_core::model::rules::RulesError;

use crate::config::{ResolvedOutputs, SimConfig, ValidationError};

/// Plays the configured number of bot matches and records the results.
pub struct MatchRunner {
    config: SimConfig,
    outputs: ResolvedOutputs,
    lineup: [BotDifficulty; PLAYER_COUNT],
}

/// Summary details returned after a run.
#[derive(Debug)]
pub struct RunSummary {
    pub matches_played: usize,
    pub matches_decided: usize,
    pub rows_written: usize,
    pub jsonl_path: PathBuf,
    pub summary_path: PathBuf,
    pub standings: TeamTally,
}

impl MatchRunner {
    /// Build a runner from a validated configuration.
    pub fn new(config: SimConfig, outputs: ResolvedOutputs) -> Result<Self, RunnerError> {
        if config.seats.len() != PLAYER_COUNT {
            return Err(RunnerError::SeatCount {
                found: config.seats.len(),
            });
        }
        let mut lineup = [BotDifficulty::default(); PLAYER_COUNT];
        for (slot, seat) in lineup.iter_mut().zip(&config.seats) {
            *slot = seat.difficulty()?;
        }

        Ok(Self {
            config,
            outputs,
            lineup,
        })
    }

    /// Execute every match, streaming one JSONL row per match to disk.
    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        ensure_parent(self.outputs.jsonl.parent())?;
        ensure_parent(self.outputs.summary_md.parent())?;

        let mut writer = BufWriter::new(File::create(&self.outputs.jsonl)?);
        let mut rng = StdRng::seed_from_u64(self.config.matches.seed.unwrap_or(0));
        let mut tally = TeamTally::default();
        let mut rows_written = 0usize;

        for match_index in 0..self.config.matches.count {
            let match_seed = rng.next_u64();
            let outcome = self.play_match(match_index, match_seed)?;
            tally.record(&outcome);

            let row = MatchLogRow::new(&self.config, match_index, match_seed, &outcome);
            serde_json::to_writer(&mut writer, &row)?;
            writer.write_all(b"\n")?;
            rows_written += 1;
        }

        writer.flush()?;
        tally.write_markdown(&self.config, &self.outputs.summary_md)?;

        Ok(RunSummary {
            matches_played: self.config.matches.count,
            matches_decided: tally.decided(),
            rows_written,
            jsonl_path: self.outputs.jsonl.clone(),
            summary_path: self.outputs.summary_md.clone(),
            standings: tally,
        })
    }

    fn play_match(
        &self,
        match_index: usize,
        match_seed: u64,
    ) -> Result<MatchOutcome, RunnerError> {
        let dealer = PlayerPosition::LOOP[match_index % PLAYER_COUNT];
        let mut state = MatchState::with_seed(
            self.config.rules,
            self.config.seat_names(),
            dealer,
            match_seed,
        )?;
        let mut seats = self.build_seats(match_seed);
        let mut engine = GameEngine::new(MatchStats::default());

        for _ in 0..self.config.matches.max_rounds {
            engine.play_round(&mut state, &mut seats)?;
            if state.is_over() {
                break;
            }
        }

        let stats = engine.into_sink();
        let outcome = MatchOutcome {
            dealer,
            winner: state.winner(),
            rounds: state.round_number(),
            totals: *state.scores().standings(),
            stats,
        };

        event!(
            target: "twohundred_sim::runner",
            Level::INFO,
            run_id = %self.config.run_id,
            match_index,
            match_seed,
            rounds = outcome.rounds,
            winner = ?outcome.winner,
            team_one = outcome.totals[0],
            team_two = outcome.totals[1],
            "match finished"
        );
        Ok(outcome)
    }

    fn build_seats(&self, match_seed: u64) -> Seats {
        let seat = |idx: usize| -> Box<dyn InputProvider> {
            Box::new(BotPlayer::new(
                self.lineup[idx],
                match_seed.wrapping_add(idx as u64),
            ))
        };
        [seat(0), seat(1), seat(2), seat(3)]
    }
}

fn ensure_parent(path: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

/// Per-team counters gathered from the engine's event stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MatchStats {
    pub contracts: [u32; 2],
    pub contracts_made: [u32; 2],
    pub forced_bids: u32,
    pub lockouts: [u32; 2],
    #[serde(skip)]
    bidder: Option<Team>,
}

impl EventSink for MatchStats {
    fn emit(&mut self, event: GameEvent) {
        match event {
            GameEvent::BettingAction { forced: true, .. } => {
                self.forced_bids += 1;
            }
            GameEvent::BettingCompleted { winner, .. } => {
                let team = winner.seat.team();
                self.contracts[team.index()] += 1;
                self.bidder = Some(team);
            }
            GameEvent::ScoreUpdated {
                bid_made,
                locked_out,
                ..
            } => {
                if let (Some(team), true) = (self.bidder.take(), bid_made) {
                    self.contracts_made[team.index()] += 1;
                }
                for team in Team::BOTH {
                    if locked_out[team.index()] {
                        self.lockouts[team.index()] += 1;
                    }
                }
            }
            _ => {}
        }
    }
}

struct MatchOutcome {
    dealer: PlayerPosition,
    winner: Option<Team>,
    rounds: u32,
    totals: [i32; 2],
    stats: MatchStats,
}

#[derive(Serialize)]
struct SeatRow {
    seat: String,
    name: String,
    difficulty: String,
    team: String,
}

#[derive(Serialize)]
struct MatchLogRow {
    run_id: String,
    match_id: String,
    match_index: usize,
    match_seed: u64,
    dealer: String,
    seats: Vec<SeatRow>,
    winner: Option<String>,
    rounds: u32,
    totals: [i32; 2],
    stats: MatchStats,
}

impl MatchLogRow {
    fn new(
        config: &SimConfig,
        match_index: usize,
        match_seed: u64,
        outcome: &MatchOutcome,
    ) -> Self {
        let seats = PlayerPosition::LOOP
            .iter()
            .zip(&config.seats)
            .map(|(position, seat)| SeatRow {
                seat: position.to_string(),
                name: seat.name.clone(),
                difficulty: seat.difficulty.to_ascii_lowercase(),
                team: position.team().to_string(),
            })
            .collect();

        Self {
            run_id: config.run_id.clone(),
            match_id: format!("M{match_index:05}"),
            match_index,
            match_seed,
            dealer: outcome.dealer.to_string(),
            seats,
            winner: outcome.winner.map(|team| team.to_string()),
            rounds: outcome.rounds,
            totals: outcome.totals,
            stats: outcome.stats,
        }
    }
}

/// Aggregate results across a run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamTally {
    pub wins: [usize; 2],
    pub undecided: usize,
    pub total_score: [i64; 2],
    pub contracts: [u32; 2],
    pub contracts_made: [u32; 2],
    pub rounds: u64,
    pub matches: usize,
}

impl TeamTally {
    fn record(&mut self, outcome: &MatchOutcome) {
        self.matches += 1;
        self.rounds += outcome.rounds as u64;
        match outcome.winner {
            Some(team) => self.wins[team.index()] += 1,
            None => self.undecided += 1,
        }
        for team in Team::BOTH {
            let idx = team.index();
            self.total_score[idx] += outcome.totals[idx] as i64;
            self.contracts[idx] += outcome.stats.contracts[idx];
            self.contracts_made[idx] += outcome.stats.contracts_made[idx];
        }
    }

    pub fn decided(&self) -> usize {
        self.wins.iter().sum()
    }

    fn write_markdown(&self, config: &SimConfig, path: &Path) -> Result<(), RunnerError> {
        let matches = self.matches.max(1) as f64;
        let mut rows = String::new();
        rows.push_str("# Simulation Summary\n\n");
        rows.push_str(&format!(
            "Run `{}`: {} matches, {:.1} rounds on average, {} undecided\n\n",
            config.run_id,
            self.matches,
            self.rounds as f64 / matches,
            self.undecided
        ));
        rows.push_str("| Team | Seats | Wins | Win % | Avg final score | Contracts | Made % |\n");
        rows.push_str("|------|-------|------|-------|-----------------|-----------|--------|\n");

        for team in Team::BOTH {
            let idx = team.index();
            let lineup = team
                .seats()
                .iter()
                .filter_map(|seat| config.seats.get(seat.index()))
                .map(|seat| format!("{} ({})", seat.name, seat.difficulty))
                .collect::<Vec<_>>()
                .join(", ");
            let made_rate = if self.contracts[idx] == 0 {
                0.0
            } else {
                self.contracts_made[idx] as f64 / self.contracts[idx] as f64
            };

            rows.push_str(&format!(
                "| {team} | {lineup} | {wins} | {win:.1}% | {avg:.1} | {contracts} | {made:.1}% |\n",
                wins = self.wins[idx],
                win = self.wins[idx] as f64 / matches * 100.0,
                avg = self.total_score[idx] as f64 / matches,
                contracts = self.contracts[idx],
                made = made_rate * 100.0,
            ));
        }

        fs::write(path, rows)?;
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("failed to serialize log row: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
    #[error("configuration requires exactly 4 seats but found {found}")]
    SeatCount { found: usize },
    #[error(transparent)]
    Config(#[from] ValidationError),
    #[error("invalid rules: {0}")]
    Rules(#[from] RulesError),
    #[error("game execution failed: {0}")]
    Game(#[from] EngineError),
}
