//! Sports data client - fetches odds and statistics from the app's proxy endpoints
//!
//! The proxy forwards to the actual data providers; this client only issues
//! `GET {base}/odds` and `GET {base}/stats` with the bet's sport and
//! participants as query parameters.

use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use super::retry::{with_retry, RetryConfig};
use super::upstream_errors::UpstreamError;
use crate::config::Config;
use crate::market_data::{MarketData, OddsSnapshot, StatsSnapshot};
use crate::types::ParsedBet;

/// HTTP client for the odds/stats proxy
#[derive(Debug, Clone)]
pub struct SportsDataClient {
    client: Client,
    base_url: String,
    retry: RetryConfig,
}

impl SportsDataClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration, retry: RetryConfig) -> Result<Self, UpstreamError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| UpstreamError::Unavailable(format!("HTTP client ({})", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            retry,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, UpstreamError> {
        Self::new(
            config.data_proxy_url.clone(),
            Duration::from_secs(config.request_timeout_secs),
            config.retry.clone(),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Query parameters describing the bet
    fn query_for(bet: &ParsedBet) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(sport) = bet.sport {
            query.push(("sport", sport.config().provider_key.to_string()));
        }
        if let Some(player) = &bet.player {
            query.push(("player", player.clone()));
        }
        if let Some(teams) = &bet.teams {
            query.push(("teams", teams.join(",")));
        }
        if let Some(market) = bet.specific_bet_type {
            query.push(("market", market.label().to_string()));
        }
        query
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &'static str, bet: &ParsedBet) -> Result<T, UpstreamError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let query = Self::query_for(bet);
        let (client, url, query) = (&self.client, &url, &query);

        with_retry(&self.retry, endpoint, move || async move {
            debug!("GET {} {:?}", url, query);

            let response = client
                .get(url)
                .query(query)
                .send()
                .await
                .map_err(|e| UpstreamError::from_network_error(endpoint, &e))?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(UpstreamError::from_response(endpoint, status.as_u16(), &body));
            }

            response
                .json::<T>()
                .await
                .map_err(|e| UpstreamError::Decode {
                    endpoint: endpoint.to_string(),
                    reason: e.to_string(),
                })
        })
        .await
    }
}

impl MarketData for SportsDataClient {
    async fn fetch_odds(&self, bet: &ParsedBet) -> Result<OddsSnapshot, UpstreamError> {
        self.get_json("odds", bet).await
    }

    async fn fetch_stats(&self, bet: &ParsedBet) -> Result<StatsSnapshot, UpstreamError> {
        self.get_json("stats", bet).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::FallbackParser;

    #[test]
    fn test_query_for_player_prop() {
        let bet = FallbackParser::default().parse("LeBron James over 25.5 points");
        let query = SportsDataClient::query_for(&bet);
        assert_eq!(
            query,
            vec![
                ("sport", "basketball_nba".to_string()),
                ("player", "LeBron James".to_string()),
                ("market", "points".to_string()),
            ]
        );
    }

    #[test]
    fn test_query_for_matchup() {
        let bet = FallbackParser::default().parse("Chiefs vs Bills spread -3.5");
        let query = SportsDataClient::query_for(&bet);
        assert_eq!(
            query,
            vec![
                ("sport", "americanfootball_nfl".to_string()),
                ("teams", "chiefs,bills".to_string()),
            ]
        );
    }

    #[test]
    fn test_base_url_is_trimmed() {
        let client = SportsDataClient::new("http://localhost:3000/api/", Duration::from_secs(5), RetryConfig::default()).unwrap();
        assert_eq!(client.base_url(), "http://localhost:3000/api");
    }
}
