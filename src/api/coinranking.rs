// ============================================================================
// API Client : Coinranking
// ============================================================================
// Récupère les métadonnées et l'historique de prix depuis l'API Coinranking v2
//
// - GET {base}/coin/{uuid}                         -> CoinRecord
// - GET {base}/coin/{uuid}/history?timePeriod=7d   -> CoinHistory
//
// CONCEPTS RUST :
// 1. async/await : requêtes non bloquantes
// 2. Génériques + serde : une seule enveloppe pour toutes les réponses
// 3. #[instrument] : span tracing avec les paramètres de la fonction
// ============================================================================

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::DateTime;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, error, info, instrument, warn};

use crate::api::{CoinDataProvider, TtlCache};
use crate::models::{CoinHistory, CoinRecord, HistoryPoint, TimePeriod};

/// URL par défaut de l'API
pub const DEFAULT_BASE_URL: &str = "https://api.coinranking.com/v2";

/// Header portant la clé API
const API_KEY_HEADER: &str = "x-access-token";

// ============================================================================
// Structures pour parser la réponse JSON
// ============================================================================
// Toutes les réponses ont la forme :
// { "status": "success", "data": { ... } }
// { "status": "fail", "type": "COIN_NOT_FOUND", "message": "Coin not found" }
// ============================================================================

/// Enveloppe commune
///
/// CONCEPT RUST : Struct générique
/// - T est le contenu de "data" (différent selon l'endpoint)
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    status: String,
    data: Option<T>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CoinData {
    coin: CoinRecord,
}

#[derive(Debug, Deserialize)]
struct HistoryData {
    change: Option<serde_json::Value>,
    #[serde(default)]
    history: Vec<RawHistoryPoint>,
}

/// Point brut : le prix peut être null (pas de cotation à cet instant)
#[derive(Debug, Deserialize)]
struct RawHistoryPoint {
    price: Option<serde_json::Value>,
    timestamp: i64,
}

/// Convertit un nombre JSON ou une chaîne numérique en f64
fn json_number(value: Option<&serde_json::Value>) -> Option<f64> {
    match value? {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite())
}

// ============================================================================
// Parsing (fonctions pures, testables sans réseau)
// ============================================================================

/// Extrait `data` de l'enveloppe, ou renvoie le message d'erreur de l'API
fn unwrap_envelope<T: DeserializeOwned>(body: &str) -> Result<T> {
    let response: ApiResponse<T> =
        serde_json::from_str(body).context("Échec du parsing JSON de la réponse Coinranking")?;

    if response.status != "success" {
        anyhow::bail!(
            "Coinranking a retourné une erreur : {}",
            response.message.unwrap_or(response.status)
        );
    }

    response
        .data
        .context("Réponse Coinranking sans champ data")
}

/// Parse la réponse de /coin/{uuid}
pub fn parse_coin_details(body: &str) -> Result<CoinRecord> {
    let data: CoinData = unwrap_envelope(body)?;
    Ok(data.coin)
}

/// Parse la réponse de /coin/{uuid}/history
///
/// CONCEPT : Données manquantes
/// - Les points sans prix sont ignorés
/// - L'API renvoie du plus récent au plus ancien : CoinHistory::new trie
pub fn parse_coin_history(body: &str, period: TimePeriod) -> Result<CoinHistory> {
    let data: HistoryData = unwrap_envelope(body)?;

    let total = data.history.len();
    let mut skipped_count = 0;
    let mut points = Vec::with_capacity(total);

    for raw in data.history {
        let price = match json_number(raw.price.as_ref()) {
            Some(price) => price,
            None => {
                skipped_count += 1;
                continue;
            }
        };

        let timestamp = DateTime::from_timestamp(raw.timestamp, 0)
            .context("Timestamp invalide dans l'historique")?;

        points.push(HistoryPoint::new(timestamp, price));
    }

    if skipped_count > 0 {
        warn!(skipped = skipped_count, total, "Skipped history points with missing price");
    }

    Ok(CoinHistory::new(period, json_number(data.change.as_ref()), points))
}

// ============================================================================
// Client HTTP
// ============================================================================

/// Client Coinranking avec cache par clé
pub struct CoinrankingClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    details_cache: TtlCache<String, CoinRecord>,
    history_cache: TtlCache<(String, TimePeriod), CoinHistory>,
}

impl CoinrankingClient {
    /// Crée le client
    ///
    /// # Arguments
    /// * `base_url` - ex: "https://api.coinranking.com/v2"
    /// * `api_key` - clé optionnelle (quota plus élevé)
    /// * `cache_ttl` - durée de vie des réponses en cache
    pub fn new(base_url: &str, api_key: Option<String>, cache_ttl: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("coinview/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(20))
            .build()
            .context("Échec de la création du client HTTP")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            details_cache: TtlCache::new(cache_ttl),
            history_cache: TtlCache::new(cache_ttl),
        })
    }

    fn coin_url(&self, coin_id: &str) -> String {
        format!("{}/coin/{}", self.base_url, urlencoding::encode(coin_id))
    }

    fn history_url(&self, coin_id: &str, period: TimePeriod) -> String {
        format!(
            "{}/coin/{}/history?timePeriod={}",
            self.base_url,
            urlencoding::encode(coin_id),
            period.token()
        )
    }

    /// Envoie un GET et renvoie le corps de la réponse
    async fn get_body(&self, url: &str) -> Result<String> {
        let mut request = self.http.get(url);
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }

        debug!(url = %url, "Sending HTTP request to Coinranking");
        let response = request
            .send()
            .await
            .context("Échec de la requête HTTP vers Coinranking")?;

        let status = response.status();
        debug!(status = %status, "Received HTTP response");

        if !status.is_success() {
            error!(status = %status, "Coinranking returned error status");
            anyhow::bail!("Coinranking a retourné une erreur : HTTP {}", status);
        }

        response
            .text()
            .await
            .context("Échec de la lecture de la réponse Coinranking")
    }
}

#[async_trait]
impl CoinDataProvider for CoinrankingClient {
    #[instrument(skip(self))]
    async fn coin_details(&self, coin_id: &str) -> Result<CoinRecord> {
        if let Some(cached) = self.details_cache.get(&coin_id.to_string()) {
            debug!("Coin details served from cache");
            return Ok(cached);
        }

        let body = self.get_body(&self.coin_url(coin_id)).await?;
        let coin = parse_coin_details(&body)?;

        info!(name = %coin.name, symbol = %coin.symbol, "Successfully fetched coin details");
        self.details_cache.insert(coin_id.to_string(), coin.clone());
        Ok(coin)
    }

    #[instrument(skip(self, period), fields(period = %period))]
    async fn coin_history(&self, coin_id: &str, period: TimePeriod) -> Result<CoinHistory> {
        let key = (coin_id.to_string(), period);
        if let Some(cached) = self.history_cache.get(&key) {
            debug!("Coin history served from cache");
            return Ok(cached);
        }

        let body = self.get_body(&self.history_url(coin_id, period)).await?;
        let history = parse_coin_history(&body, period)?;

        info!(points = history.len(), "Successfully fetched coin history");
        self.history_cache.insert(key, history.clone());
        Ok(history)
    }

    fn invalidate(&self, coin_id: &str) {
        self.details_cache.retain(|id| id != coin_id);
        self.history_cache.retain(|(id, _)| id != coin_id);
        debug!(coin_id, "Cache invalidated");
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> CoinrankingClient {
        CoinrankingClient::new("https://example.test/v2/", None, Duration::from_secs(60)).unwrap()
    }

    #[test]
    fn test_build_urls() {
        let client = client();
        assert_eq!(client.coin_url("Qwsogvtv82FCd"), "https://example.test/v2/coin/Qwsogvtv82FCd");
        assert_eq!(
            client.history_url("Qwsogvtv82FCd", TimePeriod::ThirtyDays),
            "https://example.test/v2/coin/Qwsogvtv82FCd/history?timePeriod=30d"
        );
    }

    #[test]
    fn test_coin_id_encoded_in_path() {
        let client = client();
        assert_eq!(client.coin_url("a/b?c"), "https://example.test/v2/coin/a%2Fb%3Fc");
        assert_eq!(
            client.history_url("../x", TimePeriod::SevenDays),
            "https://example.test/v2/coin/..%2Fx/history?timePeriod=7d"
        );
    }

    #[test]
    fn test_blank_api_key_ignored() {
        let client = CoinrankingClient::new(DEFAULT_BASE_URL, Some("  ".to_string()), Duration::ZERO).unwrap();
        assert!(client.api_key.is_none());
    }

    #[test]
    fn test_parse_coin_details() {
        let body = r#"{
            "status": "success",
            "data": { "coin": { "uuid": "razxDUgYGNAdQ", "name": "Ethereum", "symbol": "ETH", "price": "3120.55" } }
        }"#;
        let coin = parse_coin_details(body).unwrap();
        assert_eq!(coin.symbol, "ETH");
        assert_eq!(coin.price, Some(3120.55));
    }

    #[test]
    fn test_parse_fail_status() {
        let body = r#"{ "status": "fail", "type": "COIN_NOT_FOUND", "message": "Coin not found" }"#;
        let err = parse_coin_details(body).unwrap_err();
        assert!(err.to_string().contains("Coin not found"));
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(parse_coin_details("<html>rate limited</html>").is_err());
    }

    #[test]
    fn test_parse_history_sorted_and_skips_null() {
        let body = r#"{
            "status": "success",
            "data": {
                "change": "-2.10",
                "history": [
                    { "price": "300.5", "timestamp": 1700000300 },
                    { "price": null, "timestamp": 1700000200 },
                    { "price": "100.5", "timestamp": 1700000100 }
                ]
            }
        }"#;
        let history = parse_coin_history(body, TimePeriod::ThreeHours).unwrap();
        assert_eq!(history.period, TimePeriod::ThreeHours);
        assert_eq!(history.change, Some(-2.10));
        assert_eq!(history.len(), 2);
        assert_eq!(history.first().unwrap().price, 100.5);
        assert_eq!(history.last().unwrap().price, 300.5);
    }

    #[tokio::test]
    async fn test_cached_details_skip_network() {
        // Base URL injoignable : seul le cache peut répondre
        let client = CoinrankingClient::new("http://127.0.0.1:9", None, Duration::from_secs(60)).unwrap();
        client
            .details_cache
            .insert("abc".to_string(), CoinRecord::new("abc", "Cached", "CCH"));

        let coin = client.coin_details("abc").await.unwrap();
        assert_eq!(coin.name, "Cached");

        client.invalidate("abc");
        assert!(client.details_cache.is_empty());
    }

    #[tokio::test]
    async fn test_cached_history_per_period() {
        let client = CoinrankingClient::new("http://127.0.0.1:9", None, Duration::from_secs(60)).unwrap();
        let history = CoinHistory::new(TimePeriod::OneYear, Some(10.0), Vec::new());
        client
            .history_cache
            .insert(("abc".to_string(), TimePeriod::OneYear), history.clone());

        let cached = client.coin_history("abc", TimePeriod::OneYear).await.unwrap();
        assert_eq!(cached, history);

        client.invalidate("abc");
        assert!(client.history_cache.is_empty());
    }
}
