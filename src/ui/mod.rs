// ============================================================================
// Module : ui
// ============================================================================
// Gère toute l'interface utilisateur (Terminal User Interface)
// ============================================================================

pub mod events;  // Gestion des événements clavier
pub mod details; // Rendu de la page de détail
pub mod chart;   // Rendu du graphique de prix

// Re-exports pour simplifier les imports
pub use details::render;
pub use events::{Event, EventHandler};
