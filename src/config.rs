// ============================================================================
// Configuration : arguments de ligne de commande
// ============================================================================
// CONCEPT RUST : clap derive
// - #[derive(Parser)] génère le parsing depuis la définition de la struct
// - env = "..." : valeur lue depuis une variable d'environnement si absente
// - value_parser : réutilise FromStr de TimePeriod pour --period
// ============================================================================

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::api::coinranking::DEFAULT_BASE_URL;
use crate::models::TimePeriod;

/// Identifiant Coinranking de Bitcoin
pub const DEFAULT_COIN_ID: &str = "Qwsogvtv82FCd";

/// Affiche la page de détail d'une cryptomonnaie dans le terminal
#[derive(Debug, Clone, Parser)]
#[command(name = "coinview", version)]
pub struct Config {
    /// Identifiant Coinranking de la crypto (uuid)
    #[arg(default_value = DEFAULT_COIN_ID)]
    pub coin_id: String,

    /// Période initiale de l'historique (3h, 24h, 7d, 30d, 1y, 3m, 3y, 5y)
    #[arg(long, short = 'p', default_value = "7d", value_parser = parse_period)]
    pub period: TimePeriod,

    /// URL de base de l'API Coinranking
    #[arg(long, env = "COINRANKING_API_URL", default_value = DEFAULT_BASE_URL)]
    pub api_url: String,

    /// Clé API Coinranking (optionnelle)
    #[arg(long, env = "COINRANKING_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Durée de vie du cache des réponses, en secondes
    #[arg(long, default_value_t = 60)]
    pub cache_ttl: u64,

    /// Répertoire des fichiers de logs
    #[arg(long)]
    pub log_dir: Option<PathBuf>,
}

fn parse_period(value: &str) -> Result<TimePeriod, String> {
    value.parse::<TimePeriod>().map_err(|e| e.to_string())
}

impl Config {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl)
    }

    /// Répertoire de logs effectif
    ///
    /// - --log-dir si fourni
    /// - sinon ~/.local/share/coinview/logs (Linux), équivalent ailleurs
    /// - sinon ./logs
    pub fn log_dir(&self) -> PathBuf {
        self.log_dir.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .map(|dir| dir.join("coinview").join("logs"))
                .unwrap_or_else(|| PathBuf::from("./logs"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["coinview"]).unwrap();
        assert_eq!(config.coin_id, DEFAULT_COIN_ID);
        assert_eq!(config.period, TimePeriod::SevenDays);
        assert_eq!(config.cache_ttl(), Duration::from_secs(60));
    }

    #[test]
    fn test_custom_values() {
        let config = Config::try_parse_from([
            "coinview",
            "razxDUgYGNAdQ",
            "--period",
            "1y",
            "--cache-ttl",
            "5",
            "--log-dir",
            "/tmp/coinview-logs",
        ])
        .unwrap();
        assert_eq!(config.coin_id, "razxDUgYGNAdQ");
        assert_eq!(config.period, TimePeriod::OneYear);
        assert_eq!(config.cache_ttl, 5);
        assert_eq!(config.log_dir(), PathBuf::from("/tmp/coinview-logs"));
    }

    #[test]
    fn test_invalid_period_rejected() {
        assert!(Config::try_parse_from(["coinview", "--period", "2w"]).is_err());
    }
}
