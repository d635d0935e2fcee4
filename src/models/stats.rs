// ============================================================================
// Dérivation des statistiques
// ============================================================================
// Transforme un CoinRecord en deux listes ordonnées d'entrées affichables :
// - primaires : prix, rang, volume, market cap, plus haut historique
// - secondaires : marchés, exchanges, supply vérifiée, supply totale/circulante
//
// CONCEPTS RUST :
// 1. Fonction pure : aucune I/O, aucun état, recalculée à chaque rendu
// 2. Option en entrée et en sortie : None = "pas encore prêt"
// 3. Enum avec données : StatValue::Text(String) vs StatValue::Glyph(Glyph)
// ============================================================================

use crate::models::format::{format_abbreviated, format_count, format_currency};
use crate::models::CoinRecord;

/// Icône associée à une statistique
///
/// CONCEPT : Tag indépendant du rendu
/// - Le modèle ne connaît pas le terminal
/// - L'UI choisit le symbole à dessiner pour chaque tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconKey {
    DollarCircle,
    Number,
    Thunderbolt,
    Trophy,
    Fund,
    MoneyCollect,
    ExclamationCircle,
}

/// Glyphe dérivé d'un booléen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    Confirmed,
    Unconfirmed,
}

impl Glyph {
    pub fn from_flag(flag: bool) -> Self {
        if flag {
            Glyph::Confirmed
        } else {
            Glyph::Unconfirmed
        }
    }
}

/// Valeur affichée d'une statistique
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatValue {
    /// Texte déjà formaté ("$ 1.23M", "42", ou vide)
    Text(String),
    /// Glyphe (jamais un nombre)
    Glyph(Glyph),
}

impl StatValue {
    /// Texte si la valeur en est un
    pub fn as_text(&self) -> Option<&str> {
        match self {
            StatValue::Text(text) => Some(text.as_str()),
            StatValue::Glyph(_) => None,
        }
    }
}

/// Une statistique affichable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatEntry {
    pub label: &'static str,
    pub value: StatValue,
    pub icon: IconKey,
}

impl StatEntry {
    fn text(label: &'static str, value: String, icon: IconKey) -> Self {
        Self {
            label,
            value: StatValue::Text(value),
            icon,
        }
    }
}

/// Les deux panneaux de statistiques
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoinStats {
    pub primary: Vec<StatEntry>,
    pub secondary: Vec<StatEntry>,
}

// ============================================================================
// Libellés (ordre fixe)
// ============================================================================

pub const PRIMARY_LABELS: [&str; 5] = [
    "Price to USD",
    "Rank",
    "24h Volume",
    "Market Cap",
    "All-time-high(daily avg.)",
];

pub const SECONDARY_LABELS: [&str; 5] = [
    "Number Of Markets",
    "Number Of Exchanges",
    "Approved Supply",
    "Total Supply",
    "Circulating Supply",
];

/// Dérive les statistiques d'un record
///
/// CONCEPT RUST : Option<&T> -> Option<U>
/// - `?` sur une Option fait un early return None
/// - Un record partiel produit toujours 5 + 5 entrées
///
/// # Retourne
/// * `None` si le record n'est pas encore chargé
pub fn derive_stats(record: Option<&CoinRecord>) -> Option<CoinStats> {
    let coin = record?;

    let primary = vec![
        StatEntry::text(PRIMARY_LABELS[0], format_currency(coin.price), IconKey::DollarCircle),
        StatEntry::text(PRIMARY_LABELS[1], format_count(coin.rank), IconKey::Number),
        StatEntry::text(PRIMARY_LABELS[2], format_currency(coin.volume_24h), IconKey::Thunderbolt),
        StatEntry::text(PRIMARY_LABELS[3], format_currency(coin.market_cap), IconKey::DollarCircle),
        StatEntry::text(
            PRIMARY_LABELS[4],
            format_currency(coin.all_time_high_price()),
            IconKey::Trophy,
        ),
    ];

    // Supply absente : non vérifiée, quantités vides
    let supply = coin.supply.as_ref();
    let confirmed = supply.map(|s| s.confirmed).unwrap_or(false);

    let secondary = vec![
        StatEntry::text(SECONDARY_LABELS[0], format_count(coin.number_of_markets), IconKey::Fund),
        StatEntry::text(
            SECONDARY_LABELS[1],
            format_count(coin.number_of_exchanges),
            IconKey::MoneyCollect,
        ),
        StatEntry {
            label: SECONDARY_LABELS[2],
            value: StatValue::Glyph(Glyph::from_flag(confirmed)),
            icon: IconKey::ExclamationCircle,
        },
        StatEntry::text(
            SECONDARY_LABELS[3],
            format_abbreviated(supply.and_then(|s| s.total)),
            IconKey::ExclamationCircle,
        ),
        StatEntry::text(
            SECONDARY_LABELS[4],
            format_abbreviated(supply.and_then(|s| s.circulating)),
            IconKey::ExclamationCircle,
        ),
    ];

    Some(CoinStats { primary, secondary })
}

// ============================================================================
// Tests unitaires
// ============================================================================
