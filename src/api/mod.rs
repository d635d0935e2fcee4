// ============================================================================
// Module : api
// ============================================================================
// Fournisseurs de données : métadonnées d'une crypto et historique de prix
//
// CONCEPT RUST : Trait comme point d'extension
// - Le worker ne connaît que le trait CoinDataProvider
// - Coinranking en est une implémentation, les tests en utilisent une autre
// ============================================================================

pub mod cache;       // Cache mémoire avec TTL
pub mod coinranking; // Client API Coinranking

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{CoinHistory, CoinRecord, TimePeriod};

/// Source de données pour la page de détail
///
/// CONCEPT RUST : #[async_trait]
/// - Les traits ne supportent pas directement `async fn` avec dyn
/// - La macro transforme chaque méthode en Box<dyn Future + Send>
/// - Send + Sync : le provider est partagé entre tâches tokio via Arc
#[async_trait]
pub trait CoinDataProvider: Send + Sync {
    /// Récupère les métadonnées d'une crypto
    async fn coin_details(&self, coin_id: &str) -> Result<CoinRecord>;

    /// Récupère l'historique de prix pour une période
    async fn coin_history(&self, coin_id: &str, period: TimePeriod) -> Result<CoinHistory>;

    /// Oublie les données en cache pour cette crypto (rafraîchissement forcé)
    fn invalidate(&self, _coin_id: &str) {}
}

// Re-export des éléments principaux
pub use cache::TtlCache;
pub use coinranking::{parse_coin_details, parse_coin_history, CoinrankingClient};
