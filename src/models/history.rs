// ============================================================================
// Structure : CoinHistory
// ============================================================================
// Série de prix ordonnée dans le temps pour une période donnée
//
// CONCEPTS RUST :
// 1. DateTime<Utc> : timestamp typé (chrono)
// 2. Tri avec sort_by_key : l'API renvoie du plus récent au plus ancien
// 3. Iterators + fold : min/max en une seule passe
// ============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::TimePeriod;

/// Un point de l'historique de prix
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
}

impl HistoryPoint {
    pub fn new(timestamp: DateTime<Utc>, price: f64) -> Self {
        Self { timestamp, price }
    }
}

/// Historique complet pour une période
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinHistory {
    /// Période demandée
    pub period: TimePeriod,

    /// Variation sur la période en pourcentage (fournie par l'API)
    pub change: Option<f64>,

    /// Points triés par timestamp croissant
    pub points: Vec<HistoryPoint>,
}

impl CoinHistory {
    /// Crée un historique et garantit l'ordre chronologique
    ///
    /// CONCEPT RUST : Ownership
    /// - `points` est moved dans la fonction puis trié en place
    pub fn new(period: TimePeriod, change: Option<f64>, mut points: Vec<HistoryPoint>) -> Self {
        points.sort_by_key(|p| p.timestamp);
        Self {
            period,
            change,
            points,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&HistoryPoint> {
        self.points.first()
    }

    /// Point le plus récent
    pub fn last(&self) -> Option<&HistoryPoint> {
        self.points.last()
    }

    pub fn min_price(&self) -> Option<f64> {
        self.points.iter().map(|p| p.price).reduce(f64::min)
    }

    pub fn max_price(&self) -> Option<f64> {
        self.points.iter().map(|p| p.price).reduce(f64::max)
    }
}
