//! Core types for the betting assistant

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::sports::{self, SportConfig};

/// Sports the assistant knows how to look up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sport {
    Nba,
    Nfl,
    Mlb,
    Nhl,
    Ncaab,
    Ncaaf,
    Epl,
}

impl Sport {
    pub const ALL: [Sport; 7] = [
        Sport::Nba,
        Sport::Nfl,
        Sport::Mlb,
        Sport::Nhl,
        Sport::Ncaab,
        Sport::Ncaaf,
        Sport::Epl,
    ];

    /// Short code used in cache keys, config and the reference table
    pub fn code(&self) -> &'static str {
        match self {
            Sport::Nba => "nba",
            Sport::Nfl => "nfl",
            Sport::Mlb => "mlb",
            Sport::Nhl => "nhl",
            Sport::Ncaab => "ncaab",
            Sport::Ncaaf => "ncaaf",
            Sport::Epl => "epl",
        }
    }

    /// Reference data for this sport
    pub fn config(&self) -> &'static SportConfig {
        sports::config_for(*self)
    }
}

impl fmt::Display for Sport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Sport {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        sports::lookup(s)
            .map(|config| config.sport)
            .ok_or_else(|| format!("unknown sport code: {}", s))
    }
}

/// Wager category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BetType {
    Team,
    Player,
    Prop,
    Total,
    Straight,
}

impl fmt::Display for BetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BetType::Team => "team",
            BetType::Player => "player",
            BetType::Prop => "prop",
            BetType::Total => "total",
            BetType::Straight => "straight",
        };
        write!(f, "{}", s)
    }
}

/// The side of a wager. Serialized as `over`, `under`, `spread` or `<team>_win`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum BetSide {
    Over,
    Under,
    Spread,
    Win(String),
}

impl BetSide {
    pub fn is_over_under(&self) -> bool {
        matches!(self, BetSide::Over | BetSide::Under)
    }
}

impl fmt::Display for BetSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BetSide::Over => write!(f, "over"),
            BetSide::Under => write!(f, "under"),
            BetSide::Spread => write!(f, "spread"),
            BetSide::Win(team) => write!(f, "{}_win", team),
        }
    }
}

impl From<BetSide> for String {
    fn from(side: BetSide) -> Self {
        side.to_string()
    }
}

impl TryFrom<String> for BetSide {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "over" => Ok(BetSide::Over),
            "under" => Ok(BetSide::Under),
            "spread" => Ok(BetSide::Spread),
            other => match other.strip_suffix("_win") {
                Some(team) if !team.is_empty() => Ok(BetSide::Win(team.to_string())),
                _ => Err(format!("unrecognized bet side: {}", other)),
            },
        }
    }
}

/// Stat category of a player prop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropMarket {
    Points,
    Rebounds,
    Assists,
    ThreePointers,
    PassingYards,
    RushingYards,
    ReceivingYards,
    Receptions,
    Touchdowns,
    Hits,
    HomeRuns,
    Strikeouts,
    Rbis,
    Goals,
    Shots,
    Saves,
}

impl PropMarket {
    /// Human readable label used in key factors
    pub fn label(&self) -> &'static str {
        match self {
            PropMarket::Points => "points",
            PropMarket::Rebounds => "rebounds",
            PropMarket::Assists => "assists",
            PropMarket::ThreePointers => "three-pointers",
            PropMarket::PassingYards => "passing yards",
            PropMarket::RushingYards => "rushing yards",
            PropMarket::ReceivingYards => "receiving yards",
            PropMarket::Receptions => "receptions",
            PropMarket::Touchdowns => "touchdowns",
            PropMarket::Hits => "hits",
            PropMarket::HomeRuns => "home runs",
            PropMarket::Strikeouts => "strikeouts",
            PropMarket::Rbis => "RBIs",
            PropMarket::Goals => "goals",
            PropMarket::Shots => "shots",
            PropMarket::Saves => "saves",
        }
    }
}

impl fmt::Display for PropMarket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Structured intent extracted from a bet description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedBet {
    pub sport: Option<Sport>,
    #[serde(rename = "type")]
    pub bet_type: BetType,
    /// One entry for a single-team bet, two (in input order) for a matchup
    pub teams: Option<Vec<String>>,
    pub player: Option<String>,
    pub line: Option<f64>,
    pub bet_on: Option<BetSide>,
    pub confidence: f64,
    pub specific_bet_type: Option<PropMarket>,
}

impl ParsedBet {
    /// Check that `bet_type` agrees with which participants were detected.
    ///
    /// A player bet must be `player` or `prop`; a team bet without a player
    /// must be `team`, `total` or `straight`.
    pub fn has_consistent_type(&self) -> bool {
        if self.player.is_some() {
            matches!(self.bet_type, BetType::Player | BetType::Prop)
        } else if self.teams.is_some() {
            matches!(self.bet_type, BetType::Team | BetType::Total | BetType::Straight)
        } else {
            true
        }
    }

    /// Stable description of who the bet is about, used for cache keys
    /// and upstream queries. `None` when the sport is unknown.
    pub fn subject_key(&self) -> Option<String> {
        let sport = self.sport?;
        let subject = match (&self.player, &self.teams) {
            (Some(player), _) => player.to_lowercase(),
            (None, Some(teams)) => teams.join("-"),
            (None, None) => "any".to_string(),
        };
        Some(format!("{}:{}", sport.code(), subject))
    }
}
