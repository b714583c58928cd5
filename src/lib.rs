//! Sports Betting Assistant Library
//!
//! Turns a free-text bet description into a structured bet and a short list
//! of key factors:
//!
//! 1. **Parsing**: a keyword/regex fallback parser detects sport, player,
//!    teams, line and side. An optional primary parser is tried first and
//!    its results are cached.
//!
//! 2. **Market data**: odds and statistics are loaded from proxy endpoints
//!    through a TTL cache. Failures degrade to calculated placeholders and
//!    user-safe notices.
//!
//! 3. **Summary**: odds and stats are condensed into 3 to 5 key factors.

pub mod analysis;
pub mod config;
pub mod market_data;
pub mod parser;
pub mod services;
pub mod sports;
pub mod summarizer;
pub mod types;

pub use analysis::{BetAnalysis, BetAnalyzer, NoPrimaryParser, ParseSource, PrimaryParser};
pub use config::Config;
pub use market_data::{MarketData, OddsSnapshot, StatsSnapshot};
pub use parser::FallbackParser;
pub use services::{ResponseCache, SportsDataClient};
pub use summarizer::{summarize, KeyFactors};
pub use types::{BetSide, BetType, ParsedBet, PropMarket, Sport};
