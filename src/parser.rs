//! Fallback bet description parser
//!
//! Keyword and regex heuristics used when the primary AI parser is not
//! available. Parsing never fails: text with no recognizable signal still
//! yields a `ParsedBet`, just with most fields empty.
//!
//! Matching is plain substring containment on the lower-cased text, with two
//! ordering quirks kept on purpose:
//! - within a sport, the *last* matching prop keyword in table order decides
//!   `specific_bet_type`;
//! - the spread check runs after the moneyline check and overwrites it.

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use crate::types::{BetSide, BetType, ParsedBet, PropMarket, Sport};

/// Static weight reported for every fallback parse
pub const FALLBACK_CONFIDENCE: f64 = 0.7;

struct SportKeywords {
    sport: Sport,
    /// League names, teams and star players
    keywords: &'static [&'static str],
    /// Stat words shared across sports; only consulted when no sport matched
    /// on `keywords`
    stat_terms: &'static [&'static str],
    markets: &'static [(&'static str, PropMarket)],
}

const BASKETBALL_MARKETS: &[(&str, PropMarket)] = &[
    ("points", PropMarket::Points),
    ("rebounds", PropMarket::Rebounds),
    ("assists", PropMarket::Assists),
    ("threes", PropMarket::ThreePointers),
    ("three-pointers", PropMarket::ThreePointers),
];

const FOOTBALL_MARKETS: &[(&str, PropMarket)] = &[
    ("passing yards", PropMarket::PassingYards),
    ("rushing yards", PropMarket::RushingYards),
    ("receiving yards", PropMarket::ReceivingYards),
    ("receptions", PropMarket::Receptions),
    ("touchdown", PropMarket::Touchdowns),
];

const SOCCER_MARKETS: &[(&str, PropMarket)] = &[
    ("goals", PropMarket::Goals),
    ("assists", PropMarket::Assists),
    ("shots", PropMarket::Shots),
];

/// Checked in order. A keyword match in any sport beats a stat-term match,
/// and within each pass the first sport wins.
const SPORT_KEYWORDS: &[SportKeywords] = &[
    SportKeywords {
        sport: Sport::Ncaab,
        keywords: &["ncaab", "college basketball", "march madness"],
        stat_terms: &[],
        markets: BASKETBALL_MARKETS,
    },
    SportKeywords {
        sport: Sport::Ncaaf,
        keywords: &["ncaaf", "college football"],
        stat_terms: &[],
        markets: FOOTBALL_MARKETS,
    },
    SportKeywords {
        sport: Sport::Nba,
        keywords: &[
            "nba", "basketball", "lakers", "celtics", "warriors", "nuggets", "bucks", "knicks",
            "lebron", "curry", "jokic", "giannis", "tatum",
        ],
        stat_terms: &["points", "rebounds", "assists", "threes", "three-pointers"],
        markets: BASKETBALL_MARKETS,
    },
    SportKeywords {
        sport: Sport::Nfl,
        keywords: &[
            "nfl", "football", "chiefs", "bills", "eagles", "cowboys", "49ers", "ravens",
            "packers", "mahomes", "josh allen", "kelce",
        ],
        stat_terms: &["touchdown", "passing yards", "rushing yards", "receiving yards", "receptions"],
        markets: FOOTBALL_MARKETS,
    },
    SportKeywords {
        sport: Sport::Mlb,
        keywords: &[
            "mlb", "baseball", "yankees", "dodgers", "red sox", "astros", "braves", "judge",
            "ohtani",
        ],
        stat_terms: &["home run", "strikeouts", "rbi"],
        markets: &[
            ("hits", PropMarket::Hits),
            ("home run", PropMarket::HomeRuns),
            ("strikeouts", PropMarket::Strikeouts),
            ("rbi", PropMarket::Rbis),
        ],
    },
    SportKeywords {
        sport: Sport::Epl,
        keywords: &[
            "premier league", "epl", "soccer", "arsenal", "liverpool", "man city", "manchester",
            "chelsea", "tottenham", "haaland", "salah",
        ],
        stat_terms: &[],
        markets: SOCCER_MARKETS,
    },
    SportKeywords {
        sport: Sport::Nhl,
        keywords: &[
            "nhl", "hockey", "puck", "bruins", "maple leafs", "oilers", "mcdavid", "ovechkin",
        ],
        stat_terms: &["goals", "saves"],
        markets: &[
            ("goals", PropMarket::Goals),
            ("assists", PropMarket::Assists),
            ("shots", PropMarket::Shots),
            ("saves", PropMarket::Saves),
        ],
    },
];

/// Words that can sit next to `vs`/`@` without naming a team
const BET_TERMS: &[&str] = &[
    "to", "win", "ml", "moneyline", "over", "under", "spread", "total",
];

/// Known players as (match key, display name). First entry in this order wins.
const PLAYER_ROSTER: &[(&str, &str)] = &[
    ("lebron", "LeBron James"),
    ("curry", "Stephen Curry"),
    ("jokic", "Nikola Jokic"),
    ("giannis", "Giannis Antetokounmpo"),
    ("tatum", "Jayson Tatum"),
    ("mahomes", "Patrick Mahomes"),
    ("josh allen", "Josh Allen"),
    ("kelce", "Travis Kelce"),
    ("judge", "Aaron Judge"),
    ("ohtani", "Shohei Ohtani"),
    ("haaland", "Erling Haaland"),
    ("salah", "Mohamed Salah"),
    ("mcdavid", "Connor McDavid"),
    ("ovechkin", "Alex Ovechkin"),
];

static TEAM_PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\w+)\s+(?:vs\.?|@)\s+(\w+)").expect("team pair pattern is valid")
});

static SINGLE_TEAM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\w+)\s+(?:to win|moneyline|ml)\b").expect("single team pattern is valid")
});

static MONEYLINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bmoneyline\b|\bml\b|to win").expect("moneyline pattern is valid")
});

static NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d+(?:\.\d+)?").expect("number pattern is valid")
});

/// Heuristic parser used when no primary parser result is available
#[derive(Debug, Clone)]
pub struct FallbackParser {
    /// Sport assumed when participants were found but no sport keyword was
    default_sport: Option<Sport>,
}

impl Default for FallbackParser {
    fn default() -> Self {
        Self::new(Some(Sport::Nba))
    }
}

impl FallbackParser {
    pub fn new(default_sport: Option<Sport>) -> Self {
        Self { default_sport }
    }

    /// Parse a free-text bet description
    pub fn parse(&self, description: &str) -> ParsedBet {
        let text = description.to_lowercase();

        let mut bet_type = BetType::Straight;
        let mut bet_on: Option<BetSide> = None;
        let mut line: Option<f64> = None;

        let (mut sport, specific_bet_type) = match detect_sport(&text) {
            Some((sport, market)) => (Some(sport), market),
            None => (None, None),
        };

        let player = detect_player(&text);
        if player.is_some() {
            bet_type = BetType::Player;
        }

        let teams = detect_teams(&text);

        let mentions_over = text.contains("over");
        let mentions_under = text.contains("under");
        if mentions_over {
            bet_on = Some(BetSide::Over);
        } else if mentions_under {
            bet_on = Some(BetSide::Under);
        }

        if MONEYLINE.is_match(&text) {
            if let Some(team) = teams.as_ref().and_then(|t| t.first()) {
                bet_on = Some(BetSide::Win(team.clone()));
                bet_type = BetType::Team;
            }
        }

        let spread_signal = text.contains("spread") || text.contains('-') || text.contains('+');
        if spread_signal {
            bet_on = Some(BetSide::Spread);
            bet_type = BetType::Team;
        }

        if let Some(value) = first_number(&text) {
            if player.is_some() {
                line = Some(value);
                if !bet_on.as_ref().is_some_and(BetSide::is_over_under) {
                    bet_on = Some(if mentions_under && !mentions_over {
                        BetSide::Under
                    } else {
                        BetSide::Over
                    });
                }
            } else if teams.is_some() && (text.contains("total") || mentions_over || mentions_under) {
                line = Some(value);
            } else if teams.is_some() && spread_signal {
                line = Some(if text.contains('-') { -value } else { value });
            }
        }

        bet_type = match (&player, &teams, &bet_on) {
            (Some(_), _, Some(side)) if side.is_over_under() => BetType::Prop,
            (Some(_), _, _) => BetType::Player,
            (None, Some(_), Some(side)) if side.is_over_under() => BetType::Total,
            (None, _, Some(BetSide::Spread | BetSide::Win(_))) => BetType::Straight,
            _ => bet_type,
        };

        if sport.is_none() && (player.is_some() || teams.is_some()) {
            sport = self.default_sport;
            if let Some(default) = sport {
                debug!("No sport keyword in description, assuming {}", default);
            }
        }

        let parsed = ParsedBet {
            sport,
            bet_type,
            teams,
            player,
            line,
            bet_on,
            confidence: FALLBACK_CONFIDENCE,
            specific_bet_type,
        };

        debug!(
            sport = ?parsed.sport,
            bet_type = %parsed.bet_type,
            player = ?parsed.player,
            line = ?parsed.line,
            "Fallback parse complete"
        );

        parsed
    }
}

fn detect_sport(text: &str) -> Option<(Sport, Option<PropMarket>)> {
    let any_in = |terms: &[&str]| terms.iter().any(|kw| text.contains(kw));
    let entry = SPORT_KEYWORDS
        .iter()
        .find(|entry| any_in(entry.keywords))
        .or_else(|| SPORT_KEYWORDS.iter().find(|entry| any_in(entry.stat_terms)))?;

    let market = entry
        .markets
        .iter()
        .filter(|(kw, _)| text.contains(kw))
        .last()
        .map(|(_, market)| *market);

    Some((entry.sport, market))
}

fn detect_player(text: &str) -> Option<String> {
    PLAYER_ROSTER
        .iter()
        .find(|(key, _)| text.contains(key))
        .map(|(_, name)| name.to_string())
}

fn detect_teams(text: &str) -> Option<Vec<String>> {
    if let Some(caps) = TEAM_PAIR.captures(text) {
        let (left, right) = (caps.get(1)?, caps.get(2)?);
        let home = team_words(&text[..left.end()]).next_back();
        let away = team_words(&text[right.start()..]).next();
        if let (Some(home), Some(away)) = (home, away) {
            return Some(vec![home.to_string(), away.to_string()]);
        }
    }

    SINGLE_TEAM
        .captures(text)
        .map(|caps| vec![caps[1].to_string()])
}

/// Words that could name a team: bet terms and bare numbers are skipped
fn team_words(text: &str) -> impl DoubleEndedIterator<Item = &str> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|word| !word.is_empty())
        .filter(|word| !BET_TERMS.iter().any(|term| term == word))
        .filter(|word| !word.chars().all(|c| c.is_ascii_digit()))
}

fn first_number(text: &str) -> Option<f64> {
    NUMBER
        .find(text)
        .and_then(|m| m.as_str().parse::<f64>().ok())
}
