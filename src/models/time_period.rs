// ============================================================================
// Enum : TimePeriod
// ============================================================================
// Fenêtre de temps demandée à l'API pour l'historique de prix
//
// CONCEPTS RUST :
// 1. Enum fermé : le compilateur garantit qu'on ne sort jamais des 8 valeurs
// 2. FromStr / Display : conversion texte <-> enum (CLI, logs, API)
// 3. Serde avec rename : le JSON utilise les tokens "3h", "24h", etc.
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Période d'historique sélectionnable par l'utilisateur
///
/// L'ordre des variants est l'ordre du sélecteur affiché dans l'UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimePeriod {
    #[serde(rename = "3h")]
    ThreeHours,
    #[serde(rename = "24h")]
    TwentyFourHours,
    #[serde(rename = "7d")]
    SevenDays,
    #[serde(rename = "30d")]
    ThirtyDays,
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "3m")]
    ThreeMonths,
    #[serde(rename = "3y")]
    ThreeYears,
    #[serde(rename = "5y")]
    FiveYears,
}

/// Ordre du sélecteur
const ALL_PERIODS: [TimePeriod; 8] = [
    TimePeriod::ThreeHours,
    TimePeriod::TwentyFourHours,
    TimePeriod::SevenDays,
    TimePeriod::ThirtyDays,
    TimePeriod::OneYear,
    TimePeriod::ThreeMonths,
    TimePeriod::ThreeYears,
    TimePeriod::FiveYears,
];

impl TimePeriod {
    /// Token utilisé par l'API (paramètre `timePeriod`)
    ///
    /// CONCEPT RUST : &'static str
    /// - Chaîne littérale stockée dans le binaire, aucune allocation
    pub fn token(&self) -> &'static str {
        match self {
            TimePeriod::ThreeHours => "3h",
            TimePeriod::TwentyFourHours => "24h",
            TimePeriod::SevenDays => "7d",
            TimePeriod::ThirtyDays => "30d",
            TimePeriod::OneYear => "1y",
            TimePeriod::ThreeMonths => "3m",
            TimePeriod::ThreeYears => "3y",
            TimePeriod::FiveYears => "5y",
        }
    }

    /// Toutes les périodes dans l'ordre du sélecteur
    pub fn all() -> &'static [TimePeriod] {
        &ALL_PERIODS
    }

    /// Position dans le sélecteur (0..8)
    pub fn index(&self) -> usize {
        ALL_PERIODS
            .iter()
            .position(|p| p == self)
            .unwrap_or(0)
    }

    /// Période à la position donnée (touches 1 à 8)
    pub fn from_index(index: usize) -> Option<TimePeriod> {
        ALL_PERIODS.get(index).copied()
    }

    /// Période suivante dans le sélecteur (boucle à la fin)
    pub fn next(&self) -> TimePeriod {
        ALL_PERIODS[(self.index() + 1) % ALL_PERIODS.len()]
    }

    /// Période précédente dans le sélecteur (boucle au début)
    pub fn previous(&self) -> TimePeriod {
        let len = ALL_PERIODS.len();
        ALL_PERIODS[(self.index() + len - 1) % len]
    }

    /// Vrai pour les périodes de moins d'un jour
    ///
    /// Utilisé par le graphique pour choisir heures vs dates sur l'axe X
    pub fn is_intraday(&self) -> bool {
        matches!(self, TimePeriod::ThreeHours | TimePeriod::TwentyFourHours)
    }

    /// Format chrono des labels de l'axe X
    pub fn axis_format(&self) -> &'static str {
        match self {
            TimePeriod::ThreeHours | TimePeriod::TwentyFourHours => "%H:%M",
            TimePeriod::SevenDays | TimePeriod::ThirtyDays => "%d/%m",
            TimePeriod::ThreeMonths | TimePeriod::OneYear => "%d/%m/%y",
            TimePeriod::ThreeYears | TimePeriod::FiveYears => "%m/%Y",
        }
    }
}

impl Default for TimePeriod {
    fn default() -> Self {
        TimePeriod::SevenDays
    }
}

impl fmt::Display for TimePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

// ============================================================================
// Parsing depuis la ligne de commande
// ============================================================================
// CONCEPT RUST : Trait FromStr
// - Permet "7d".parse::<TimePeriod>()
// - Clap l'utilise automatiquement pour --period
// ============================================================================

impl FromStr for TimePeriod {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ALL_PERIODS
            .iter()
            .copied()
            .find(|p| p.token() == wanted)
            .ok_or_else(|| {
                let valid: Vec<&str> = ALL_PERIODS.iter().map(|p| p.token()).collect();
                anyhow::anyhow!(
                    "Période inconnue '{}' (valeurs possibles : {})",
                    s,
                    valid.join(", ")
                )
            })
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_seven_days() {
        assert_eq!(TimePeriod::default(), TimePeriod::SevenDays);
        assert_eq!(TimePeriod::default().token(), "7d");
    }

    #[test]
    fn test_selector_order() {
        let tokens: Vec<&str> = TimePeriod::all().iter().map(|p| p.token()).collect();
        assert_eq!(tokens, vec!["3h", "24h", "7d", "30d", "1y", "3m", "3y", "5y"]);
    }

    #[test]
    fn test_parse_tokens() {
        for period in TimePeriod::all() {
            let parsed: TimePeriod = period.token().parse().unwrap();
            assert_eq!(parsed, *period);
        }
        assert_eq!("24H".parse::<TimePeriod>().unwrap(), TimePeriod::TwentyFourHours);
        assert!("2w".parse::<TimePeriod>().is_err());
    }

    #[test]
    fn test_cycle_wraps() {
        assert_eq!(TimePeriod::FiveYears.next(), TimePeriod::ThreeHours);
        assert_eq!(TimePeriod::ThreeHours.previous(), TimePeriod::FiveYears);
        assert_eq!(TimePeriod::SevenDays.next(), TimePeriod::ThirtyDays);
    }

    #[test]
    fn test_from_index() {
        assert_eq!(TimePeriod::from_index(0), Some(TimePeriod::ThreeHours));
        assert_eq!(TimePeriod::from_index(7), Some(TimePeriod::FiveYears));
        assert_eq!(TimePeriod::from_index(8), None);
    }

    #[test]
    fn test_serde_uses_tokens() {
        let json = serde_json::to_string(&TimePeriod::ThirtyDays).unwrap();
        assert_eq!(json, "\"30d\"");
        let back: TimePeriod = serde_json::from_str("\"3m\"").unwrap();
        assert_eq!(back, TimePeriod::ThreeMonths);
    }
}
