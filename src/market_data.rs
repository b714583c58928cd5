//! Odds and statistics payloads, and the seam used to fetch them
//!
//! Every field is optional: the proxy endpoints return whatever the
//! provider had, and a missing field simply contributes nothing downstream.

use serde::{Deserialize, Serialize};
use std::future::Future;

use crate::services::upstream_errors::UpstreamError;
use crate::types::ParsedBet;

/// Source label used when no live odds could be loaded
pub const CALCULATED_ODDS_SOURCE: &str = "Calculated (No Live Odds)";

/// Odds for the game a bet refers to
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OddsSnapshot {
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub bookmaker: Option<String>,
    /// Point spread from the home side's perspective
    #[serde(default)]
    pub spread: Option<f64>,
    #[serde(default)]
    pub total: Option<f64>,
    #[serde(default)]
    pub moneyline: Option<Moneyline>,
}

/// American moneyline prices
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Moneyline {
    #[serde(default)]
    pub home: Option<f64>,
    #[serde(default)]
    pub away: Option<f64>,
}

impl OddsSnapshot {
    /// Placeholder used when live odds are unavailable
    pub fn calculated() -> Self {
        Self {
            source: Some(CALCULATED_ODDS_SOURCE.to_string()),
            ..Default::default()
        }
    }

    /// True when the odds came from a live provider rather than a placeholder
    pub fn is_live(&self) -> bool {
        match self.source.as_deref() {
            Some(source) => !source.to_lowercase().contains("calculated"),
            None => false,
        }
    }
}

/// Where a stats payload came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsSource {
    /// Licensed provider data (e.g. Sportradar)
    Professional,
    /// Numbers derived from odds or recent results
    Estimated,
    Generic,
}

/// Statistics for the participants of a bet
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub player: Option<PlayerStats>,
    #[serde(default)]
    pub teams: Vec<TeamStats>,
    /// Free-text remark from the provider
    #[serde(default)]
    pub note: Option<String>,
}

impl StatsSnapshot {
    pub fn source_kind(&self) -> StatsSource {
        let source = self.source.as_deref().unwrap_or_default().to_lowercase();
        if ["sportradar", "professional", "official"].iter().any(|s| source.contains(s)) {
            StatsSource::Professional
        } else if ["estimate", "calculated", "derived"].iter().any(|s| source.contains(s)) {
            StatsSource::Estimated
        } else {
            StatsSource::Generic
        }
    }
}

/// Season figures for one player.
///
/// Percentages may be given as fractions (0.312) or as percent values (31.2).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStats {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub games_played: Option<u32>,
    #[serde(default)]
    pub points_per_game: Option<f64>,
    #[serde(default)]
    pub rebounds_per_game: Option<f64>,
    #[serde(default)]
    pub assists_per_game: Option<f64>,
    #[serde(default)]
    pub threes_per_game: Option<f64>,
    #[serde(default)]
    pub usage_rate: Option<f64>,
    #[serde(default)]
    pub field_goal_pct: Option<f64>,
    #[serde(default)]
    pub passing_yards_per_game: Option<f64>,
    #[serde(default)]
    pub rushing_yards_per_game: Option<f64>,
    #[serde(default)]
    pub receiving_yards_per_game: Option<f64>,
    #[serde(default)]
    pub receptions_per_game: Option<f64>,
    #[serde(default)]
    pub touchdowns: Option<u32>,
    #[serde(default)]
    pub batting_average: Option<f64>,
    #[serde(default)]
    pub hits_per_game: Option<f64>,
    #[serde(default)]
    pub home_runs: Option<u32>,
    #[serde(default)]
    pub rbis: Option<u32>,
    #[serde(default)]
    pub strikeouts_per_game: Option<f64>,
    #[serde(default)]
    pub goals: Option<u32>,
    #[serde(default)]
    pub goals_per_game: Option<f64>,
    #[serde(default)]
    pub assists: Option<u32>,
    #[serde(default)]
    pub shots_per_game: Option<f64>,
    #[serde(default)]
    pub saves_per_game: Option<f64>,
    #[serde(default)]
    pub injury_status: Option<String>,
}

/// Season figures for one team
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamStats {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub wins: Option<u32>,
    #[serde(default)]
    pub losses: Option<u32>,
    #[serde(default)]
    pub win_pct: Option<f64>,
    #[serde(default)]
    pub offensive_rating: Option<f64>,
    #[serde(default)]
    pub defensive_rating: Option<f64>,
    #[serde(default)]
    pub points_per_game: Option<f64>,
    #[serde(default)]
    pub injuries: Option<u32>,
}

/// Source of odds and statistics for a parsed bet
pub trait MarketData {
    fn fetch_odds(
        &self,
        bet: &ParsedBet,
    ) -> impl Future<Output = Result<OddsSnapshot, UpstreamError>> + Send;

    fn fetch_stats(
        &self,
        bet: &ParsedBet,
    ) -> impl Future<Output = Result<StatsSnapshot, UpstreamError>> + Send;
}
