// ============================================================================
// Structure : CoinRecord
// ============================================================================
// Snapshot des métadonnées d'une cryptomonnaie au moment du fetch
//
// CONCEPTS RUST :
// 1. #[serde(rename_all = "camelCase")] : "marketCap" (JSON) -> market_cap (Rust)
// 2. deserialize_with : parsing tolérant (l'API envoie les nombres en String)
// 3. Option<T> + #[serde(default)] : tout champ peut manquer sans erreur
// ============================================================================

use serde::{Deserialize, Deserializer, Serialize};

/// Métadonnées complètes d'une cryptomonnaie
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinRecord {
    /// Identifiant Coinranking (ex: "Qwsogvtv82FCd" pour Bitcoin)
    #[serde(default)]
    pub uuid: String,

    /// Nom complet (ex: "Bitcoin")
    #[serde(default)]
    pub name: String,

    /// Symbole (ex: "BTC")
    #[serde(default)]
    pub symbol: String,

    /// Prix en USD
    #[serde(default, deserialize_with = "lenient_f64")]
    pub price: Option<f64>,

    #[serde(default, deserialize_with = "lenient_u64")]
    pub rank: Option<u64>,

    /// Volume sur 24h en USD
    /// CONCEPT : rename explicite car un identifiant Rust ne commence pas par un chiffre
    #[serde(rename = "24hVolume", default, deserialize_with = "lenient_f64")]
    pub volume_24h: Option<f64>,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub market_cap: Option<f64>,

    /// Variation sur 24h en pourcentage
    #[serde(default, deserialize_with = "lenient_f64")]
    pub change: Option<f64>,

    #[serde(default)]
    pub all_time_high: Option<AllTimeHigh>,

    #[serde(default)]
    pub supply: Option<Supply>,

    #[serde(default, deserialize_with = "lenient_u64")]
    pub number_of_markets: Option<u64>,

    #[serde(default, deserialize_with = "lenient_u64")]
    pub number_of_exchanges: Option<u64>,

    /// Description en HTML (à nettoyer avant affichage)
    #[serde(default)]
    pub description: Option<String>,

    /// Couleur de la marque (ex: "#f7931A")
    #[serde(default)]
    pub color: Option<String>,

    #[serde(default)]
    pub icon_url: Option<String>,

    #[serde(default)]
    pub website_url: Option<String>,

    /// Liens officiels, dans l'ordre fourni par l'API
    /// CONCEPT : deserialize_with pour accepter `null` comme liste vide
    #[serde(default, deserialize_with = "null_as_empty")]
    pub links: Vec<CoinLink>,
}

/// Plus haut historique (moyenne journalière)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllTimeHigh {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub price: Option<f64>,

    #[serde(default, deserialize_with = "lenient_i64")]
    pub timestamp: Option<i64>,
}

/// Informations sur l'offre (supply)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supply {
    /// Offre vérifiée par Coinranking
    #[serde(default, deserialize_with = "lenient_bool")]
    pub confirmed: bool,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub total: Option<f64>,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub circulating: Option<f64>,
}

/// Lien externe (site web, explorer, réseaux sociaux...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinLink {
    #[serde(default)]
    pub name: String,

    /// Type de lien (ex: "website", "github", "reddit")
    /// CONCEPT : `type` est un mot-clé Rust, d'où le rename
    #[serde(rename = "type", default)]
    pub kind: String,

    #[serde(default)]
    pub url: String,
}

impl CoinRecord {
    /// Crée un record minimal (utile pour les tests et les fakes)
    pub fn new(uuid: impl Into<String>, name: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            uuid: uuid.into(),
            name: name.into(),
            symbol: symbol.into(),
            price: None,
            rank: None,
            volume_24h: None,
            market_cap: None,
            change: None,
            all_time_high: None,
            supply: None,
            number_of_markets: None,
            number_of_exchanges: None,
            description: None,
            color: None,
            icon_url: None,
            website_url: None,
            links: Vec::new(),
        }
    }

    /// Prix du plus haut historique, s'il est connu
    pub fn all_time_high_price(&self) -> Option<f64> {
        self.all_time_high.as_ref().and_then(|ath| ath.price)
    }
}

// ============================================================================
// Désérialisation tolérante
// ============================================================================
// CONCEPT RUST : #[serde(untagged)]
// - Serde essaie chaque variant dans l'ordre jusqu'à ce qu'un match
// - Permet d'accepter 42, "42", null ou "abc" pour le même champ
// - Une chaîne non numérique devient None au lieu d'une erreur
// ============================================================================

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl NumberOrString {
    fn into_f64(self) -> Option<f64> {
        match self {
            NumberOrString::Number(n) => Some(n),
            NumberOrString::Text(s) => s.trim().parse::<f64>().ok(),
            NumberOrString::Other(_) => None,
        }
        .filter(|n| n.is_finite())
    }
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<NumberOrString>::deserialize(deserializer)?.and_then(NumberOrString::into_f64))
}

fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_f64(deserializer)?
        .filter(|n| *n >= 0.0 && n.fract() == 0.0)
        .map(|n| n as u64))
}

fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_f64(deserializer)?
        .filter(|n| n.fract() == 0.0)
        .map(|n| n as i64))
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(matches!(
        Option::<serde_json::Value>::deserialize(deserializer)?,
        Some(serde_json::Value::Bool(true))
    ))
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

// ============================================================================
// Tests unitaires
// ============================================================================
