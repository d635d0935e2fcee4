// ============================================================================
// coinview - Library
// ============================================================================
// Expose les modules publics pour le binaire et les tests
// ============================================================================

pub mod api;       // Client Coinranking + cache
pub mod app;       // Contrôleur de vue
pub mod config;    // Arguments CLI
pub mod models;    // Structures de données et dérivations pures
pub mod ui;        // Interface utilisateur
pub mod view;      // Assemblage de la page de détail
pub mod worker;    // Lookups async en arrière-plan
