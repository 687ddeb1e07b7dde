use crate::model::betting::WinningBid;
use crate::model::player::Team;
use crate::model::rules::GameRules;
use serde::{Deserialize, Serialize};

/// What a finished round hands to the scoring engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResult {
    /// Trick points captured per team, indexed by [`Team::index`].
    pub team_points: [u32; 2],
    pub winning_bid: WinningBid,
    /// Whether either member of the team placed a bid this round.
    pub team_placed_bid: [bool; 2],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundScore {
    pub deltas: [i32; 2],
    pub locked_out: [bool; 2],
    pub bid_made: bool,
}

/// Computes per-team deltas for a round against the totals standing before it.
pub fn score_round(totals: [i32; 2], result: &RoundResult, rules: &GameRules) -> RoundScore {
    let bidding_team = result.winning_bid.seat.team();
    let bid = result.winning_bid.amount;
    let bid_made = result.team_points[bidding_team.index()] >= bid;

    let mut deltas = [0i32; 2];
    let mut locked_out = [false; 2];

    for team in Team::BOTH {
        let idx = team.index();
        if totals[idx] >= rules.lockout_threshold && !result.team_placed_bid[idx] {
            locked_out[idx] = true;
            continue;
        }

        let points = result.team_points[idx] as i32;
        deltas[idx] = if team == bidding_team && !bid_made {
            -(bid as i32)
        } else {
            points
        };
    }

    RoundScore {
        deltas,
        locked_out,
        bid_made,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreBoard {
    totals: [i32; 2],
}

impl ScoreBoard {
    pub const fn new() -> Self {
        Self { totals: [0; 2] }
    }

    pub fn score(&self, team: Team) -> i32 {
        self.totals[team.index()]
    }

    pub fn standings(&self) -> &[i32; 2] {
        &self.totals
    }

    pub fn set_totals(&mut self, totals: [i32; 2]) {
        self.totals = totals;
    }

    pub fn apply_round(&mut self, result: &RoundResult, rules: &GameRules) -> RoundScore {
        let scored = score_round(self.totals, result, rules);
        for team in Team::BOTH {
            self.totals[team.index()] += scored.deltas[team.index()];
        }
        scored
    }

    /// The first team, in seat order, whose total reached the winning score.
    pub fn winner(&self, rules: &GameRules) -> Option<Team> {
        Team::BOTH
            .iter()
            .copied()
            .find(|team| self.score(*team) >= rules.winning_score)
    }
}

#[cfg(test)]
mod tests {
    use super::{RoundResult, ScoreBoard, score_round};
    use crate::model::betting::WinningBid;
    use crate::model::player::{PlayerPosition, Team};
    use crate::model::rules::GameRules;

    fn result(points: [u32; 2], seat: PlayerPosition, amount: u32, bid: [bool; 2]) -> RoundResult {
        RoundResult {
            team_points: points,
            winning_bid: WinningBid { seat, amount },
            team_placed_bid: bid,
        }
    }

    #[test]
    fn made_bid_scores_trick_points() {
        let rules = GameRules::default();
        let scored = score_round(
            [0, 0],
            &result([75, 45], PlayerPosition::North, 70, [true, false]),
            &rules,
        );
        assert!(scored.bid_made);
        assert_eq!(scored.deltas, [75, 45]);
    }

    #[test]
    fn failed_bid_costs_the_bid_amount() {
        let rules = GameRules::default();
        let scored = score_round(
            [30, 20],
            &result([40, 80], PlayerPosition::East, 90, [false, true]),
            &rules,
        );
        assert!(!scored.bid_made);
        assert_eq!(scored.deltas, [40, -90]);
    }

    #[test]
    fn non_bidding_team_is_never_penalised() {
        let rules = GameRules::default();
        let scored = score_round(
            [0, 0],
            &result([0, 120], PlayerPosition::East, 50, [true, true]),
            &rules,
        );
        assert_eq!(scored.deltas, [0, 120]);
    }

    #[test]
    fn locked_out_team_scores_nothing() {
        let rules = GameRules::default();
        let scored = score_round(
            [110, 40],
            &result([70, 50], PlayerPosition::East, 50, [false, true]),
            &rules,
        );
        assert_eq!(scored.locked_out, [true, false]);
        assert_eq!(scored.deltas, [0, 50]);
    }

    #[test]
    fn bidding_member_lifts_lockout() {
        let rules = GameRules::default();
        let scored = score_round(
            [150, 100],
            &result([30, 90], PlayerPosition::West, 80, [true, true]),
            &rules,
        );
        assert_eq!(scored.locked_out, [false, false]);
        assert_eq!(scored.deltas, [30, 90]);
    }

    #[test]
    fn apply_round_accumulates_and_detects_winner() {
        let rules = GameRules::default();
        let mut board = ScoreBoard::new();
        board.set_totals([150, 195]);
        let scored = board.apply_round(
            &result([60, 60], PlayerPosition::North, 55, [true, true]),
            &rules,
        );
        assert_eq!(scored.deltas, [60, 60]);
        assert_eq!(board.standings(), &[210, 255]);
        assert_eq!(board.winner(&rules), Some(Team::One));
    }

    #[test]
    fn no_winner_below_threshold() {
        let rules = GameRules::default();
        let mut board = ScoreBoard::new();
        board.set_totals([199, -40]);
        assert_eq!(board.winner(&rules), None);
        assert_eq!(board.score(Team::Two), -40);
    }
}
