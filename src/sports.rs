//! Sport reference table
//!
//! Maps short sport codes to the key the odds provider expects and the
//! name shown to users. Static for the lifetime of the process.

use crate::types::Sport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SportConfig {
    pub sport: Sport,
    pub provider_key: &'static str,
    pub display_name: &'static str,
}

pub const SPORTS_CONFIG: &[SportConfig] = &[
    SportConfig { sport: Sport::Nba, provider_key: "basketball_nba", display_name: "NBA" },
    SportConfig { sport: Sport::Nfl, provider_key: "americanfootball_nfl", display_name: "NFL" },
    SportConfig { sport: Sport::Mlb, provider_key: "baseball_mlb", display_name: "MLB" },
    SportConfig { sport: Sport::Nhl, provider_key: "icehockey_nhl", display_name: "NHL" },
    SportConfig { sport: Sport::Ncaab, provider_key: "basketball_ncaab", display_name: "NCAA Basketball" },
    SportConfig { sport: Sport::Ncaaf, provider_key: "americanfootball_ncaaf", display_name: "NCAA Football" },
    SportConfig { sport: Sport::Epl, provider_key: "soccer_epl", display_name: "Premier League" },
];

/// Look up a sport by its short code (case-insensitive)
pub fn lookup(code: &str) -> Option<&'static SportConfig> {
    let code = code.trim().to_lowercase();
    SPORTS_CONFIG.iter().find(|c| c.sport.code() == code)
}

pub(crate) fn config_for(sport: Sport) -> &'static SportConfig {
    SPORTS_CONFIG
        .iter()
        .find(|c| c.sport == sport)
        .unwrap_or(&SPORTS_CONFIG[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_sport_has_an_entry() {
        for sport in Sport::ALL {
            assert_eq!(sport.config().sport, sport);
        }
    }

    #[test]
    fn test_lookup() {
        let nfl = lookup("NFL").unwrap();
        assert_eq!(nfl.provider_key, "americanfootball_nfl");
        assert_eq!(nfl.display_name, "NFL");
        assert!(lookup("cricket").is_none());
    }
}
