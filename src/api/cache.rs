// ============================================================================
// Cache mémoire avec durée de vie (TTL)
// ============================================================================
// Chaque lookup est "cacheable par clé" : détails par coin id,
// historique par (coin id, période). Une entrée expirée n'est jamais renvoyée.
//
// CONCEPTS RUST :
// 1. Génériques avec bornes : K: Eq + Hash, V: Clone
// 2. Mutex : mutabilité intérieure partagée entre tâches tokio
// 3. Instant : horloge monotone (insensible aux changements d'heure)
// ============================================================================

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Cache clé/valeur thread-safe avec expiration
pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: Mutex<HashMap<K, (Instant, V)>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Verrouille la map
    ///
    /// CONCEPT : Mutex empoisonné
    /// - Si un thread a paniqué en tenant le verrou, les données restent
    ///   cohérentes ici (insertions atomiques), on récupère donc la garde
    fn lock(&self) -> MutexGuard<'_, HashMap<K, (Instant, V)>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Renvoie une copie de la valeur si elle n'a pas expiré
    pub fn get(&self, key: &K) -> Option<V> {
        let mut entries = self.lock();
        let lookup = entries
            .get(key)
            .map(|(stored_at, value)| (stored_at.elapsed() < self.ttl, value.clone()));

        match lookup {
            Some((true, value)) => Some(value),
            Some((false, _)) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Insère ou remplace une valeur
    pub fn insert(&self, key: K, value: V) {
        self.lock().insert(key, (Instant::now(), value));
    }

    /// Garde uniquement les entrées dont la clé satisfait le prédicat
    pub fn retain<F>(&self, mut keep: F)
    where
        F: FnMut(&K) -> bool,
    {
        self.lock().retain(|key, _| keep(key));
    }

    /// Nombre d'entrées stockées (expirées comprises)
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_fresh_value() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.insert("btc".to_string(), 42);
        assert_eq!(cache.get(&"btc".to_string()), Some(42));
        assert_eq!(cache.get(&"eth".to_string()), None);
    }

    #[test]
    fn test_expired_value_is_evicted() {
        let cache = TtlCache::new(Duration::ZERO);
        cache.insert(1u8, "value");
        assert_eq!(cache.get(&1), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_insert_replaces() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.insert(1u8, "old");
        cache.insert(1u8, "new");
        assert_eq!(cache.get(&1), Some("new"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_retain() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.insert(("btc".to_string(), 1), 1.0);
        cache.insert(("btc".to_string(), 2), 2.0);
        cache.insert(("eth".to_string(), 1), 3.0);

        cache.retain(|(coin, _)| coin != "btc");
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&("eth".to_string(), 1)), Some(3.0));
    }
}
