//! Bet analysis pipeline
//!
//! Parses a description (primary parser first when one is installed, the
//! heuristic fallback otherwise), loads odds and stats through the shared
//! cache, and summarizes key factors. Upstream failures never fail the
//! analysis: they are normalized into notices and replaced by placeholders.

use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::market_data::{MarketData, OddsSnapshot, StatsSnapshot};
use crate::parser::FallbackParser;
use crate::services::cache::{CacheCategory, ResponseCache};
use crate::services::metrics::Metrics;
use crate::services::upstream_errors::{normalize, UpstreamError};
use crate::summarizer::{summarize, KeyFactors};
use crate::types::ParsedBet;

/// Language-model parser tried before the heuristic fallback
pub trait PrimaryParser {
    fn parse(&self, description: &str) -> impl Future<Output = Result<ParsedBet, UpstreamError>> + Send;
}

/// Placeholder for analyzers without a primary parser
#[derive(Debug, Clone, Copy)]
pub enum NoPrimaryParser {}

impl PrimaryParser for NoPrimaryParser {
    async fn parse(&self, _description: &str) -> Result<ParsedBet, UpstreamError> {
        match *self {}
    }
}

/// Which parser produced the bet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseSource {
    Primary,
    Cached,
    Fallback,
}

/// Combined result returned to the request handler
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BetAnalysis {
    pub bet: ParsedBet,
    pub parsed_with: ParseSource,
    pub key_factors: KeyFactors,
    pub live_odds: bool,
    /// User-facing messages for anything that degraded the analysis
    pub notices: Vec<String>,
}

pub struct BetAnalyzer<D, P = NoPrimaryParser> {
    data: D,
    primary: Option<P>,
    fallback: FallbackParser,
    cache: Arc<ResponseCache>,
    metrics: Metrics,
}

impl<D: MarketData> BetAnalyzer<D, NoPrimaryParser> {
    pub fn new(data: D, cache: Arc<ResponseCache>, fallback: FallbackParser) -> Self {
        Self {
            data,
            primary: None,
            fallback,
            cache,
            metrics: Metrics::new(),
        }
    }
}

impl<D: MarketData, P: PrimaryParser> BetAnalyzer<D, P> {
    /// Install a primary parser
    pub fn with_primary<Q: PrimaryParser>(self, primary: Q) -> BetAnalyzer<D, Q> {
        BetAnalyzer {
            data: self.data,
            primary: Some(primary),
            fallback: self.fallback,
            cache: self.cache,
            metrics: self.metrics,
        }
    }

    /// Share a metrics collector with the caller
    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn cache(&self) -> &Arc<ResponseCache> {
        &self.cache
    }

    /// Analyze a bet description
    pub async fn analyze(&self, description: &str) -> BetAnalysis {
        self.metrics.inc_analyses();
        let mut notices = Vec::new();

        let (bet, parsed_with) = self.parse(description, &mut notices).await;
        let odds = self.odds_for(&bet, &mut notices).await;
        let stats = self.stats_for(&bet, &mut notices).await;

        let key_factors = summarize(&bet, &odds, &stats);
        let live_odds = odds.is_live();

        info!(
            parsed_with = ?parsed_with,
            sport = ?bet.sport,
            live_odds,
            notices = notices.len(),
            "Bet analyzed"
        );

        BetAnalysis {
            bet,
            parsed_with,
            key_factors,
            live_odds,
            notices,
        }
    }

    async fn parse(&self, description: &str, notices: &mut Vec<String>) -> (ParsedBet, ParseSource) {
        let Some(primary) = &self.primary else {
            return self.parse_fallback(description);
        };

        let key = format!("parse:{}", description.trim().to_lowercase());
        if let Some(bet) = self.cache.get_as::<ParsedBet>(&key) {
            self.metrics.inc_parses_cached();
            return (bet, ParseSource::Cached);
        }

        match primary.parse(description).await {
            Ok(bet) if bet.has_consistent_type() => {
                self.cache.set_from(&key, &bet, CacheCategory::AiParsing);
                self.metrics.inc_parses_primary();
                (bet, ParseSource::Primary)
            }
            Ok(bet) => {
                warn!(
                    "Primary parser returned type {} inconsistent with its participants, using fallback",
                    bet.bet_type
                );
                self.parse_fallback(description)
            }
            Err(e) => {
                let message = normalize(&e, "parse your bet");
                self.metrics.inc_upstream_error(message.kind);
                notices.push(message.message);
                self.parse_fallback(description)
            }
        }
    }

    fn parse_fallback(&self, description: &str) -> (ParsedBet, ParseSource) {
        self.metrics.inc_parses_fallback();
        (self.fallback.parse(description), ParseSource::Fallback)
    }

    async fn odds_for(&self, bet: &ParsedBet, notices: &mut Vec<String>) -> OddsSnapshot {
        let Some(subject) = bet.subject_key() else {
            debug!("No sport detected, skipping odds lookup");
            return OddsSnapshot::calculated();
        };

        let key = format!("odds:{}", subject);
        match self
            .cache
            .get_or_fetch(&key, CacheCategory::Odds, || self.data.fetch_odds(bet))
            .await
        {
            Ok(odds) => odds,
            Err(e) => {
                let message = normalize(&e, "fetch odds");
                self.metrics.inc_upstream_error(message.kind);
                notices.push(message.message);
                OddsSnapshot::calculated()
            }
        }
    }

    async fn stats_for(&self, bet: &ParsedBet, notices: &mut Vec<String>) -> StatsSnapshot {
        let Some(subject) = bet.subject_key() else {
            debug!("No sport detected, skipping stats lookup");
            return StatsSnapshot::default();
        };

        let key = format!("stats:{}", subject);
        match self
            .cache
            .get_or_fetch(&key, CacheCategory::Stats, || self.data.fetch_stats(bet))
            .await
        {
            Ok(stats) => stats,
            Err(e) => {
                let message = normalize(&e, "fetch statistics");
                self.metrics.inc_upstream_error(message.kind);
                notices.push(message.message);
                StatsSnapshot::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::PlayerStats;
    use crate::types::{BetSide, BetType, Sport};
    use std::sync::atomic::{AtomicU32, Ordering};

    #[derive(Default)]
    struct FakeData {
        odds_calls: AtomicU32,
        stats_calls: AtomicU32,
        odds_error: Option<UpstreamError>,
    }

    impl MarketData for FakeData {
        async fn fetch_odds(&self, _bet: &ParsedBet) -> Result<OddsSnapshot, UpstreamError> {
            self.odds_calls.fetch_add(1, Ordering::SeqCst);
            match &self.odds_error {
                Some(e) => Err(e.clone()),
                None => Ok(OddsSnapshot {
                    source: Some("DraftKings".to_string()),
                    spread: Some(-3.5),
                    ..Default::default()
                }),
            }
        }

        async fn fetch_stats(&self, _bet: &ParsedBet) -> Result<StatsSnapshot, UpstreamError> {
            self.stats_calls.fetch_add(1, Ordering::SeqCst);
            Ok(StatsSnapshot {
                source: Some("Sportradar".to_string()),
                player: Some(PlayerStats {
                    points_per_game: Some(27.1),
                    ..Default::default()
                }),
                ..Default::default()
            })
        }
    }

    struct FailingPrimary;

    impl PrimaryParser for FailingPrimary {
        async fn parse(&self, _description: &str) -> Result<ParsedBet, UpstreamError> {
            Err(UpstreamError::Unavailable("OpenAI completion endpoint".to_string()))
        }
    }

    struct FixedPrimary {
        calls: AtomicU32,
        bet: ParsedBet,
    }

    impl PrimaryParser for FixedPrimary {
        async fn parse(&self, _description: &str) -> Result<ParsedBet, UpstreamError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.bet.clone())
        }
    }

    fn analyzer(data: FakeData) -> BetAnalyzer<FakeData> {
        BetAnalyzer::new(data, Arc::new(ResponseCache::default()), FallbackParser::default())
    }

    #[tokio::test(start_paused = true)]
    async fn test_fallback_analysis_uses_live_data() {
        let analyzer = analyzer(FakeData::default());
        let analysis = analyzer.analyze("LeBron James over 25.5 points").await;

        assert_eq!(analysis.parsed_with, ParseSource::Fallback);
        assert_eq!(analysis.bet.bet_type, BetType::Prop);
        assert!(analysis.live_odds);
        assert!(analysis.notices.is_empty());
        assert_eq!(analysis.key_factors.as_slice()[0], "Live odds from DraftKings");
        assert!(analysis
            .key_factors
            .iter()
            .any(|f| f == "LeBron James is averaging 27.1 points this season"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeat_analysis_hits_cache() {
        let analyzer = analyzer(FakeData::default());
        analyzer.analyze("Chiefs vs Bills spread -3.5").await;
        analyzer.analyze("Chiefs vs Bills spread -3.5").await;

        assert_eq!(analyzer.data.odds_calls.load(Ordering::SeqCst), 1);
        assert_eq!(analyzer.data.stats_calls.load(Ordering::SeqCst), 1);

        // Odds expire before stats
        tokio::time::advance(std::time::Duration::from_secs(121)).await;
        analyzer.analyze("Chiefs vs Bills spread -3.5").await;
        assert_eq!(analyzer.data.odds_calls.load(Ordering::SeqCst), 2);
        assert_eq!(analyzer.data.stats_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_odds_failure_becomes_notice() {
        let analyzer = analyzer(FakeData {
            odds_error: Some(UpstreamError::from_response("odds", 429, "slow down")),
            ..Default::default()
        });

        let analysis = analyzer.analyze("Chiefs vs Bills spread -3.5").await;
        assert!(!analysis.live_odds);
        assert_eq!(analysis.notices.len(), 1);
        assert!(analysis.notices[0].contains("Too many requests"));
        assert!(analysis.key_factors.as_slice()[0].starts_with("No live odds"));
        assert_eq!(analyzer.metrics().snapshot().upstream_rate_limited, 1);

        // Failures are not cached
        analyzer.analyze("Chiefs vs Bills spread -3.5").await;
        assert_eq!(analyzer.data.odds_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_sport_skips_lookups() {
        let analyzer = BetAnalyzer::new(
            FakeData::default(),
            Arc::new(ResponseCache::default()),
            FallbackParser::new(None),
        );

        let analysis = analyzer.analyze("Sharks @ Jets").await;
        assert_eq!(analysis.bet.sport, None);
        assert_eq!(analyzer.data.odds_calls.load(Ordering::SeqCst), 0);
        assert_eq!(analyzer.data.stats_calls.load(Ordering::SeqCst), 0);
        assert_eq!(analysis.key_factors.len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_primary_failure_falls_back() {
        let analyzer = analyzer(FakeData::default()).with_primary(FailingPrimary);
        let analysis = analyzer.analyze("Chiefs vs Bills spread -3.5").await;

        assert_eq!(analysis.parsed_with, ParseSource::Fallback);
        assert_eq!(analysis.bet.bet_on, Some(BetSide::Spread));
        assert_eq!(analysis.notices.len(), 1);
        assert!(analysis.notices[0].contains("basic bet parsing"));

        let snapshot = analyzer.metrics().snapshot();
        assert_eq!(snapshot.parses_fallback, 1);
        assert_eq!(snapshot.upstream_ai_unavailable, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_primary_result_is_cached() {
        let bet = ParsedBet {
            sport: Some(Sport::Nfl),
            bet_type: BetType::Straight,
            teams: Some(vec!["chiefs".to_string(), "bills".to_string()]),
            player: None,
            line: Some(-3.0),
            bet_on: Some(BetSide::Spread),
            confidence: 0.95,
            specific_bet_type: None,
        };
        let analyzer = analyzer(FakeData::default()).with_primary(FixedPrimary {
            calls: AtomicU32::new(0),
            bet: bet.clone(),
        });

        let first = analyzer.analyze("Chiefs -3 vs Bills").await;
        assert_eq!(first.parsed_with, ParseSource::Primary);
        assert_eq!(first.bet, bet);

        let second = analyzer.analyze("  chiefs -3 VS bills ").await;
        assert_eq!(second.parsed_with, ParseSource::Cached);
        assert_eq!(second.bet, bet);
        assert_eq!(analyzer.primary.as_ref().unwrap().calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_inconsistent_primary_result_is_discarded() {
        let bad = ParsedBet {
            sport: Some(Sport::Nba),
            bet_type: BetType::Total,
            teams: None,
            player: Some("LeBron James".to_string()),
            line: Some(25.5),
            bet_on: Some(BetSide::Over),
            confidence: 0.9,
            specific_bet_type: None,
        };
        let analyzer = analyzer(FakeData::default()).with_primary(FixedPrimary {
            calls: AtomicU32::new(0),
            bet: bad,
        });

        let analysis = analyzer.analyze("LeBron James over 25.5 points").await;
        assert_eq!(analysis.parsed_with, ParseSource::Fallback);
        assert_eq!(analysis.bet.bet_type, BetType::Prop);
        assert!(analysis.notices.is_empty());
    }
}
