//! Metrics collection and output for AI simulation results.

use serde::Serialize;

use crate::simulator::GameResult;

/// Complete game metrics for output.
#[derive(Debug, Clone, Serialize)]
pub struct GameMetrics {
    pub game_id: u32,
    pub seed: u64,
    pub timestamp: String,
    pub config: SimConfig,
    pub result: GameResultMetrics,
    pub player_metrics: Vec<PlayerMetrics>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimConfig {
    pub ai_types: Vec<String>,
    pub mode: String,
    pub total_games: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct GameResultMetrics {
    pub winner: u8,
    pub winner_ai: String,
    pub rounds_played: u32,
    pub duration_ms: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerMetrics {
    pub seat: u8,
    pub ai_type: String,
    pub won: bool,
    pub bids_placed: u32,
    pub challenges_called: u32,
    pub challenges_won: u32,
    pub challenge_win_pct: f64,
    pub exact_claims_called: u32,
    pub exact_claims_won: u32,
    pub cards_played: u32,
    pub dice_lost: u32,
    pub avg_decision_ms: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eliminated_in_round: Option<u32>,
}

/// Build metrics from one finished game.
pub fn build_game_metrics(
    game_id: u32,
    seed: u64,
    ai_types: &[String],
    mode: &str,
    total_games: u32,
    result: &GameResult,
    duration_ms: f64,
) -> GameMetrics {
    let timestamp = time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| String::from("unknown"));

    let player_metrics = result
        .seats
        .iter()
        .enumerate()
        .map(|(seat, stats)| {
            let win_pct = if stats.challenges_called > 0 {
                (stats.challenges_won as f64 / stats.challenges_called as f64) * 100.0
            } else {
                0.0
            };
            let avg_decision_ms = if stats.decisions_made > 0 {
                stats.decision_time_ms / stats.decisions_made as f64
            } else {
                0.0
            };
            PlayerMetrics {
                seat: seat as u8,
                ai_type: ai_types
                    .get(seat)
                    .cloned()
                    .unwrap_or_else(|| String::from("unknown")),
                won: result.winner as usize == seat,
                bids_placed: stats.bids_placed,
                challenges_called: stats.challenges_called,
                challenges_won: stats.challenges_won,
                challenge_win_pct: win_pct,
                exact_claims_called: stats.exact_claims_called,
                exact_claims_won: stats.exact_claims_won,
                cards_played: stats.cards_played,
                dice_lost: stats.dice_lost,
                avg_decision_ms,
                eliminated_in_round: stats.eliminated_in_round,
            }
        })
        .collect();

    let winner_ai = ai_types
        .get(result.winner as usize)
        .cloned()
        .unwrap_or_else(|| String::from("unknown"));

    GameMetrics {
        game_id,
        seed,
        timestamp,
        config: SimConfig {
            ai_types: ai_types.to_vec(),
            mode: mode.to_string(),
            total_games,
        },
        result: GameResultMetrics {
            winner: result.winner,
            winner_ai,
            rounds_played: result.rounds_played,
            duration_ms,
        },
        player_metrics,
    }
}

/// CSV summary row for quick analysis. Seat count varies per run, so the
/// summary stays per-game rather than per-seat-column.
#[derive(Debug, Serialize)]
pub struct CsvSummaryRow {
    pub game_id: u32,
    pub seed: u64,
    pub players: usize,
    pub winner: u8,
    pub winner_ai: String,
    pub rounds_played: u32,
    pub duration_ms: f64,
}

impl From<&GameMetrics> for CsvSummaryRow {
    fn from(metrics: &GameMetrics) -> Self {
        CsvSummaryRow {
            game_id: metrics.game_id,
            seed: metrics.seed,
            players: metrics.player_metrics.len(),
            winner: metrics.result.winner,
            winner_ai: metrics.result.winner_ai.clone(),
            rounds_played: metrics.result.rounds_played,
            duration_ms: metrics.result.duration_ms,
        }
    }
}
