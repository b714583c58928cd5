//! Key factor summaries
//!
//! Turns a parsed bet plus odds and stats into a short list of reasons shown
//! next to a recommendation. Always between 3 and 5 entries.

use serde::Serialize;

use crate::market_data::{OddsSnapshot, PlayerStats, StatsSnapshot, StatsSource, TeamStats};
use crate::types::{ParsedBet, PropMarket, Sport};

pub const MIN_FACTORS: usize = 3;
pub const MAX_FACTORS: usize = 5;

const GENERIC_FACTORS: &[&str] = &[
    "Recent form and head-to-head history should be weighed against the line",
    "Check final injury reports before the game starts",
    "Line movement close to game time can signal where sharp money is going",
];

/// Ordered explanatory strings, always 3 to 5 long
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct KeyFactors(Vec<String>);

impl KeyFactors {
    /// Pad with generic factors up to the minimum and cut at the maximum
    fn from_raw(mut factors: Vec<String>) -> Self {
        let mut fillers = GENERIC_FACTORS.iter().cycle();
        while factors.len() < MIN_FACTORS {
            if let Some(filler) = fillers.next() {
                factors.push(filler.to_string());
            }
        }
        factors.truncate(MAX_FACTORS);
        Self(factors)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl<'a> IntoIterator for &'a KeyFactors {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Build the key factors for a bet
pub fn summarize(bet: &ParsedBet, odds: &OddsSnapshot, stats: &StatsSnapshot) -> KeyFactors {
    let mut factors = odds_factors(odds);

    match stats.source_kind() {
        StatsSource::Professional => match &stats.player {
            Some(player) if bet.player.is_some() => {
                factors.extend(professional_player_factors(bet, player));
            }
            _ => factors.extend(professional_team_factors(&stats.teams)),
        },
        StatsSource::Estimated => factors.extend(estimated_factors(bet, stats)),
        StatsSource::Generic => {
            if let Some(note) = stats.note.as_deref().filter(|n| !n.trim().is_empty()) {
                factors.push(note.trim().to_string());
            }
        }
    }

    KeyFactors::from_raw(factors)
}

fn odds_factors(odds: &OddsSnapshot) -> Vec<String> {
    if !odds.is_live() {
        return vec!["No live odds available - analysis uses calculated estimates".to_string()];
    }

    let mut factors = Vec::new();
    let source = odds.source.as_deref().unwrap_or("provider");
    match odds.bookmaker.as_deref() {
        Some(book) => factors.push(format!("Live odds from {} ({})", source, book)),
        None => factors.push(format!("Live odds from {}", source)),
    }

    if let Some(spread) = odds.spread {
        factors.push(format!("Point spread: {}", signed(spread)));
    }
    if let Some(total) = odds.total {
        factors.push(format!("Game total: {}", total));
    }
    if let Some(moneyline) = &odds.moneyline {
        match (moneyline.home, moneyline.away) {
            (Some(home), Some(away)) => {
                factors.push(format!("Moneyline: home {} / away {}", signed(home), signed(away)))
            }
            (Some(home), None) => factors.push(format!("Moneyline: home {}", signed(home))),
            (None, Some(away)) => factors.push(format!("Moneyline: away {}", signed(away))),
            (None, None) => {}
        }
    }

    factors
}

fn professional_player_factors(bet: &ParsedBet, player: &PlayerStats) -> Vec<String> {
    let mut factors = Vec::new();
    let name = bet
        .player
        .as_deref()
        .or(player.name.as_deref())
        .unwrap_or("Player");

    let market = bet.specific_bet_type.or_else(|| default_market(bet.sport));
    if let Some((label, average)) = market.and_then(|m| season_average(player, m)) {
        factors.push(format!("{} is averaging {} {} this season", name, average, label));
        if let Some(line) = bet.line {
            let comparison = if average > line {
                "above"
            } else if average < line {
                "below"
            } else {
                "level with"
            };
            factors.push(format!("Season average sits {} the {} line", comparison, line));
        }
    }

    if let Some(usage) = player.usage_rate {
        factors.push(format!("Usage rate: {}", percent(usage)));
    }
    if let Some(fg) = player.field_goal_pct {
        factors.push(format!("Field goal percentage: {}", percent(fg)));
    }
    if let Some(avg) = player.batting_average {
        factors.push(format!("Batting average: {:.3}", avg));
    }
    if let Some(hr) = player.home_runs {
        factors.push(format!("{} home runs this season", hr));
    }
    if let Some(td) = player.touchdowns {
        factors.push(format!("{} touchdowns this season", td));
    }
    if let Some(games) = player.games_played {
        factors.push(format!("{} games played this season", games));
    }
    if let Some(status) = player.injury_status.as_deref().filter(|s| !s.is_empty()) {
        factors.push(format!("Injury status: {}", status));
    }

    factors
}

fn professional_team_factors(teams: &[TeamStats]) -> Vec<String> {
    let mut factors = Vec::new();

    for (index, team) in teams.iter().take(2).enumerate() {
        let name = team
            .name
            .clone()
            .unwrap_or_else(|| if index == 0 { "Home team".to_string() } else { "Away team".to_string() });

        if let (Some(off), Some(def)) = (team.offensive_rating, team.defensive_rating) {
            factors.push(format!("{} offensive rating {} / defensive rating {}", name, off, def));
        } else if let Some(off) = team.offensive_rating {
            factors.push(format!("{} offensive rating: {}", name, off));
        } else if let Some(def) = team.defensive_rating {
            factors.push(format!("{} defensive rating: {}", name, def));
        }

        if let Some(pct) = team.win_pct {
            factors.push(format!("{} win rate: {}", name, percent(pct)));
        } else if let (Some(wins), Some(losses)) = (team.wins, team.losses) {
            factors.push(format!("{} record: {}-{}", name, wins, losses));
        }

        if let Some(injuries) = team.injuries.filter(|n| *n > 0) {
            factors.push(format!("{} has {} players on the injury report", name, injuries));
        }
    }

    factors
}

fn estimated_factors(bet: &ParsedBet, stats: &StatsSnapshot) -> Vec<String> {
    let mut factors = Vec::new();

    if let (Some(player), Some(name)) = (&stats.player, bet.player.as_deref()) {
        let market = bet.specific_bet_type.or_else(|| default_market(bet.sport));
        if let Some((label, average)) = market.and_then(|m| season_average(player, m)) {
            factors.push(format!("Estimated {} average for {}: {}", label, name, average));
        }
        if let Some(usage) = player.usage_rate {
            factors.push(format!("Estimated usage rate: {}", percent(usage)));
        }
    }

    for team in stats.teams.iter().take(2) {
        if let (Some(name), Some(pct)) = (team.name.as_deref(), team.win_pct) {
            factors.push(format!("Estimated win probability for {}: {}", name, percent(pct)));
        }
        if let (Some(name), Some(ppg)) = (team.name.as_deref(), team.points_per_game) {
            factors.push(format!("{} projected scoring: {} per game", name, ppg));
        }
    }

    if factors.is_empty() {
        factors.push("Statistics are estimated from recent results, not official data".to_string());
    }

    factors
}

/// Stat most bets on a sport are about when the description did not say
fn default_market(sport: Option<Sport>) -> Option<PropMarket> {
    match sport? {
        Sport::Nba | Sport::Ncaab => Some(PropMarket::Points),
        Sport::Nfl | Sport::Ncaaf => Some(PropMarket::PassingYards),
        Sport::Mlb => Some(PropMarket::Hits),
        Sport::Nhl | Sport::Epl => Some(PropMarket::Goals),
    }
}

fn season_average(player: &PlayerStats, market: PropMarket) -> Option<(&'static str, f64)> {
    let value = match market {
        PropMarket::Points => player.points_per_game,
        PropMarket::Rebounds => player.rebounds_per_game,
        PropMarket::Assists => player.assists_per_game,
        PropMarket::ThreePointers => player.threes_per_game,
        PropMarket::PassingYards => player.passing_yards_per_game,
        PropMarket::RushingYards => player.rushing_yards_per_game,
        PropMarket::ReceivingYards => player.receiving_yards_per_game,
        PropMarket::Receptions => player.receptions_per_game,
        PropMarket::Hits => player.hits_per_game,
        PropMarket::Strikeouts => player.strikeouts_per_game,
        PropMarket::Goals => player.goals_per_game,
        PropMarket::Shots => player.shots_per_game,
        PropMarket::Saves => player.saves_per_game,
        // Season totals, surfaced separately
        PropMarket::Touchdowns | PropMarket::HomeRuns | PropMarket::Rbis => None,
    }?;
    Some((market.label(), value))
}

/// Round a percentage to a whole number; fractions are scaled up first
fn percent(value: f64) -> String {
    let pct = if value.abs() <= 1.0 { value * 100.0 } else { value };
    format!("{}%", pct.round())
}

/// American odds and spreads read better with an explicit plus sign
fn signed(value: f64) -> String {
    if value > 0.0 {
        format!("+{}", value)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::Moneyline;
    use crate::parser::FallbackParser;

    fn parse(description: &str) -> ParsedBet {
        FallbackParser::default().parse(description)
    }

    fn professional(player: Option<PlayerStats>, teams: Vec<TeamStats>) -> StatsSnapshot {
        StatsSnapshot {
            source: Some("Sportradar".to_string()),
            player,
            teams,
            note: None,
        }
    }

    #[test]
    fn test_calculated_odds_and_unknown_stats_are_padded() {
        let bet = parse("LeBron James over 25.5 points");
        let odds = OddsSnapshot {
            source: Some("Calculated (No Live Odds)".to_string()),
            ..Default::default()
        };
        let stats = StatsSnapshot {
            source: Some("unknown".to_string()),
            ..Default::default()
        };

        let factors = summarize(&bet, &odds, &stats);
        assert_eq!(factors.len(), 3);
        assert!(factors.as_slice()[0].starts_with("No live odds"));
        assert_eq!(factors.as_slice()[1], GENERIC_FACTORS[0]);
        assert_eq!(factors.as_slice()[2], GENERIC_FACTORS[1]);
    }

    #[test]
    fn test_live_odds_figures() {
        let bet = parse("Chiefs vs Bills spread -3.5");
        let odds = OddsSnapshot {
            source: Some("The Odds API".to_string()),
            bookmaker: Some("DraftKings".to_string()),
            spread: Some(-3.5),
            total: Some(47.5),
            moneyline: Some(Moneyline {
                home: Some(-170.0),
                away: Some(145.0),
            }),
        };

        let factors = summarize(&bet, &odds, &StatsSnapshot::default());
        assert_eq!(
            factors.as_slice(),
            &[
                "Live odds from The Odds API (DraftKings)".to_string(),
                "Point spread: -3.5".to_string(),
                "Game total: 47.5".to_string(),
                "Moneyline: home -170 / away +145".to_string(),
            ]
        );
    }

    #[test]
    fn test_professional_player_stats() {
        let bet = parse("LeBron James over 25.5 points");
        let stats = professional(
            Some(PlayerStats {
                points_per_game: Some(27.1),
                usage_rate: Some(31.4),
                field_goal_pct: Some(0.538),
                ..Default::default()
            }),
            Vec::new(),
        );

        let factors = summarize(&bet, &OddsSnapshot::calculated(), &stats);
        assert_eq!(factors.len(), MAX_FACTORS);
        assert_eq!(factors.as_slice()[1], "LeBron James is averaging 27.1 points this season");
        assert_eq!(factors.as_slice()[2], "Season average sits above the 25.5 line");
        assert_eq!(factors.as_slice()[3], "Usage rate: 31%");
        assert_eq!(factors.as_slice()[4], "Field goal percentage: 54%");
    }

    #[test]
    fn test_batting_average_has_three_decimals() {
        let bet = parse("Judge over 1.5 hits");
        let stats = professional(
            Some(PlayerStats {
                batting_average: Some(0.3),
                home_runs: Some(41),
                ..Default::default()
            }),
            Vec::new(),
        );

        let factors = summarize(&bet, &OddsSnapshot::calculated(), &stats);
        assert!(factors.iter().any(|f| f == "Batting average: 0.300"));
        assert!(factors.iter().any(|f| f == "41 home runs this season"));
        assert_eq!(factors.len(), 3);
    }

    #[test]
    fn test_professional_team_stats() {
        let bet = parse("Celtics vs Knicks under 215.5 total");
        let stats = professional(
            None,
            vec![
                TeamStats {
                    name: Some("Celtics".to_string()),
                    offensive_rating: Some(122.2),
                    defensive_rating: Some(110.6),
                    win_pct: Some(0.756),
                    injuries: Some(2),
                    ..Default::default()
                },
                TeamStats {
                    name: Some("Knicks".to_string()),
                    wins: Some(50),
                    losses: Some(32),
                    injuries: Some(0),
                    ..Default::default()
                },
            ],
        );

        let factors = summarize(&bet, &OddsSnapshot::calculated(), &stats);
        assert_eq!(
            factors.as_slice(),
            &[
                "No live odds available - analysis uses calculated estimates".to_string(),
                "Celtics offensive rating 122.2 / defensive rating 110.6".to_string(),
                "Celtics win rate: 76%".to_string(),
                "Celtics has 2 players on the injury report".to_string(),
                "Knicks record: 50-32".to_string(),
            ]
        );
    }

    #[test]
    fn test_estimated_stats() {
        let bet = parse("Lakers vs Nuggets");
        let stats = StatsSnapshot {
            source: Some("Estimated".to_string()),
            teams: vec![TeamStats {
                name: Some("Lakers".to_string()),
                win_pct: Some(45.6),
                ..Default::default()
            }],
            ..Default::default()
        };

        let factors = summarize(&bet, &OddsSnapshot::calculated(), &stats);
        assert_eq!(factors.as_slice()[1], "Estimated win probability for Lakers: 46%");
        assert_eq!(factors.len(), 3);
    }

    #[test]
    fn test_generic_stats_note() {
        let bet = parse("");
        let stats = StatsSnapshot {
            note: Some("Season just started ".to_string()),
            ..Default::default()
        };

        let factors = summarize(&bet, &OddsSnapshot::default(), &stats);
        assert_eq!(factors.as_slice()[1], "Season just started");
        assert_eq!(factors.len(), 3);
    }

    #[test]
    fn test_length_always_in_bounds() {
        let bets = [parse(""), parse("LeBron James over 25.5 points"), parse("Chiefs vs Bills spread -3.5")];
        let full_player = PlayerStats {
            points_per_game: Some(27.0),
            usage_rate: Some(0.3),
            field_goal_pct: Some(0.5),
            batting_average: Some(0.25),
            home_runs: Some(10),
            touchdowns: Some(3),
            games_played: Some(60),
            injury_status: Some("Probable".to_string()),
            ..Default::default()
        };
        let odds = [
            OddsSnapshot::default(),
            OddsSnapshot {
                source: Some("Book".to_string()),
                spread: Some(1.5),
                total: Some(200.0),
                moneyline: Some(Moneyline::default()),
                ..Default::default()
            },
        ];
        let stats = [
            StatsSnapshot::default(),
            professional(Some(full_player), vec![TeamStats::default(), TeamStats::default()]),
        ];

        for bet in &bets {
            for o in &odds {
                for s in &stats {
                    let factors = summarize(bet, o, s);
                    assert!((MIN_FACTORS..=MAX_FACTORS).contains(&factors.len()));
                }
            }
        }
    }
}
