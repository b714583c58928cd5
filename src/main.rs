//! Sports Betting Assistant CLI
//!
//! Parses bet descriptions and summarizes odds and statistics for them.

use anyhow::{Context, Result};
use bet_assistant::sports::SPORTS_CONFIG;
use bet_assistant::{
    summarize, BetAnalyzer, Config, FallbackParser, OddsSnapshot, ResponseCache, SportsDataClient,
    StatsSnapshot,
};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bet-assistant")]
#[command(about = "Parse sports bets and summarize the factors behind them")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a bet description and print the structured bet as JSON
    Parse {
        /// Free-text bet, e.g. "LeBron James over 25.5 points"
        description: String,
    },

    /// Summarize key factors from odds and stats given on the command line
    Factors {
        description: String,

        /// Odds payload as JSON
        #[arg(long)]
        odds: Option<String>,

        /// Stats payload as JSON
        #[arg(long)]
        stats: Option<String>,
    },

    /// Run the full analysis against the odds/stats proxy
    Analyze {
        description: String,

        /// Print the analysis as JSON
        #[arg(long)]
        json: bool,
    },

    /// List supported sports
    Sports,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging. RUST_LOG overrides the default level.
    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    // Load configuration
    let config = Config::from_env()?;
    debug!("Loaded config: {:?}", config);

    match cli.command {
        Commands::Parse { description } => parse_bet(&config, &description)?,
        Commands::Factors { description, odds, stats } => {
            show_factors(&config, &description, odds.as_deref(), stats.as_deref())?
        }
        Commands::Analyze { description, json } => analyze_bet(&config, &description, json).await?,
        Commands::Sports => list_sports(),
    }

    Ok(())
}

fn parse_bet(config: &Config, description: &str) -> Result<()> {
    let parser = FallbackParser::new(config.fallback_default_sport);
    let bet = parser.parse(description);
    println!("{}", serde_json::to_string_pretty(&bet)?);
    Ok(())
}

fn show_factors(config: &Config, description: &str, odds: Option<&str>, stats: Option<&str>) -> Result<()> {
    let bet = FallbackParser::new(config.fallback_default_sport).parse(description);

    let odds = match odds {
        Some(raw) => serde_json::from_str::<OddsSnapshot>(raw).context("Invalid --odds JSON")?,
        None => OddsSnapshot::calculated(),
    };
    let stats = match stats {
        Some(raw) => serde_json::from_str::<StatsSnapshot>(raw).context("Invalid --stats JSON")?,
        None => StatsSnapshot::default(),
    };

    print_header(description);
    print_factors(&summarize(&bet, &odds, &stats).into_vec());
    Ok(())
}

async fn analyze_bet(config: &Config, description: &str, json: bool) -> Result<()> {
    let client = SportsDataClient::from_config(config).context("Failed to build proxy client")?;
    let cache = Arc::new(ResponseCache::new(config.cache_ttls));
    let analyzer = BetAnalyzer::new(client, cache, FallbackParser::new(config.fallback_default_sport));

    let analysis = analyzer.analyze(description).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
        return Ok(());
    }

    print_header(description);

    let bet = &analysis.bet;
    println!(
        "Sport: {} | Type: {} | Parsed with: {:?}",
        bet.sport.map(|s| s.config().display_name).unwrap_or("Unknown"),
        bet.bet_type,
        analysis.parsed_with
    );
    if let Some(player) = &bet.player {
        println!("Player: {}", player);
    }
    if let Some(teams) = &bet.teams {
        println!("Teams: {}", teams.join(" vs "));
    }
    match (bet.line, &bet.bet_on) {
        (Some(line), Some(side)) => println!("Line: {} ({})", line, side),
        (Some(line), None) => println!("Line: {}", line),
        (None, Some(side)) => println!("Side: {}", side),
        (None, None) => {}
    }
    println!("Live odds: {}", if analysis.live_odds { "YES" } else { "NO" });

    print_factors(analysis.key_factors.as_slice());

    if !analysis.notices.is_empty() {
        println!("\n{}", "-".repeat(70));
        for notice in &analysis.notices {
            println!("  ! {}", notice);
        }
    }

    let metrics = analyzer.metrics().snapshot();
    debug!("Metrics: {:?}", metrics);

    Ok(())
}

fn list_sports() {
    println!("\n{}", "=".repeat(70));
    println!("  SUPPORTED SPORTS");
    println!("{}\n", "=".repeat(70));

    println!("{:<8} {:<24} {}", "Code", "Provider Key", "Name");
    println!("{}", "-".repeat(70));
    for config in SPORTS_CONFIG {
        println!("{:<8} {:<24} {}", config.sport.code(), config.provider_key, config.display_name);
    }
}

fn print_header(description: &str) {
    println!("\n{}", "=".repeat(70));
    println!("  BET: {}", description);
    println!("{}\n", "=".repeat(70));
}

fn print_factors(factors: &[String]) {
    println!("\nKey factors:");
    for (i, factor) in factors.iter().enumerate() {
        println!("  {}. {}", i + 1, factor);
    }
}
