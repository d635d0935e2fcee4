// ============================================================================
// Module : models
// ============================================================================
// Structures de données et transformations pures (aucune I/O ici)
//
// CONCEPT RUST : Modules et visibilité
// - "pub mod" : sous-module accessible depuis l'extérieur du crate
// - "pub use" : re-export pour raccourcir les imports
// ============================================================================

pub mod coin;        // CoinRecord (métadonnées)
pub mod description; // Nettoyage du HTML de la description
pub mod format;      // Abréviation K/M/B
pub mod history;     // Historique de prix
pub mod stats;       // Dérivation des statistiques
pub mod time_period; // Périodes sélectionnables

// Au lieu de : use coinview::models::coin::CoinRecord;
// On peut faire : use coinview::models::CoinRecord;
pub use coin::{AllTimeHigh, CoinLink, CoinRecord, Supply};
pub use history::{CoinHistory, HistoryPoint};
pub use stats::{derive_stats, CoinStats, Glyph, IconKey, StatEntry, StatValue};
pub use time_period::TimePeriod;
