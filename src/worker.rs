// ============================================================================
// Background Worker
// ============================================================================
// Exécute les lookups async (détails, historique) hors du thread UI
//
// CONCEPT RUST : Command pattern avec channels
// - L'event loop envoie des AppCommand au worker (command_tx)
// - Le worker renvoie des AppResult (result_tx)
// - Une tâche tokio par commande : détails et historique peuvent être
//   en vol en même temps
// ============================================================================

use std::sync::{mpsc, Arc};
use std::thread::JoinHandle;

use tracing::{debug, error, info};

use crate::api::CoinDataProvider;
use crate::models::{CoinHistory, CoinRecord, TimePeriod};

/// Commandes envoyées au worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    /// Charger les métadonnées d'une crypto
    LoadCoinDetails { coin_id: String },

    /// Charger l'historique pour une période
    /// - request_id : jeton permettant d'ignorer les réponses périmées
    LoadHistory {
        coin_id: String,
        period: TimePeriod,
        request_id: u64,
    },

    /// Vider le cache pour cette crypto
    Invalidate { coin_id: String },
}

/// Type de lookup (pour les messages d'erreur)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKind {
    Details,
    History,
}

/// Résultats renvoyés par le worker
#[derive(Debug)]
pub enum AppResult {
    /// Métadonnées chargées
    CoinDetailsLoaded(CoinRecord),

    /// Historique chargé, étiqueté avec le jeton de la requête
    HistoryLoaded { request_id: u64, history: CoinHistory },

    /// Échec d'un lookup
    /// - request_id : jeton de la requête d'historique (None pour les détails)
    LoadError {
        what: LookupKind,
        request_id: Option<u64>,
        error: String,
    },
}

/// Lance le worker dans un thread OS dédié
///
/// CONCEPT RUST : Thread + runtime async
/// - std::thread::spawn() : thread OS séparé de l'UI
/// - tokio::runtime::Runtime : exécute les futures dans ce thread
/// - runtime.spawn() : chaque commande devient une tâche indépendante
///
/// Le thread se termine quand command_tx est droppé (channel fermé).
///
/// # Arguments
/// * `provider` - source de données partagée entre les tâches
/// * `command_rx` - commandes venant de l'event loop
/// * `result_tx` - résultats vers l'event loop
pub fn spawn_background_worker(
    provider: Arc<dyn CoinDataProvider>,
    command_rx: mpsc::Receiver<AppCommand>,
    result_tx: mpsc::Sender<AppResult>,
) -> JoinHandle<()> {
    std::thread::spawn(move || {
        let runtime = match tokio::runtime::Runtime::new() {
            Ok(runtime) => runtime,
            Err(e) => {
                error!(error = ?e, "Failed to create tokio runtime, worker stopped");
                return;
            }
        };

        // CONCEPT : Command processing loop
        // - recv() bloque ce thread (pas l'UI) jusqu'à la prochaine commande
        // - Err = channel fermé : on sort
        while let Ok(command) = command_rx.recv() {
            info!(?command, "Worker received command");

            match command {
                AppCommand::Invalidate { coin_id } => {
                    provider.invalidate(&coin_id);
                }

                AppCommand::LoadCoinDetails { coin_id } => {
                    let provider = Arc::clone(&provider);
                    let result_tx = result_tx.clone();
                    runtime.spawn(async move {
                        let result = match provider.coin_details(&coin_id).await {
                            Ok(coin) => AppResult::CoinDetailsLoaded(coin),
                            Err(e) => {
                                error!(coin_id = %coin_id, error = ?e, "Failed to load coin details");
                                AppResult::LoadError {
                                    what: LookupKind::Details,
                                    request_id: None,
                                    error: format!("{:#}", e),
                                }
                            }
                        };
                        // L'UI a pu quitter entre-temps : on ignore l'erreur d'envoi
                        let _ = result_tx.send(result);
                    });
                }

                AppCommand::LoadHistory {
                    coin_id,
                    period,
                    request_id,
                } => {
                    let provider = Arc::clone(&provider);
                    let result_tx = result_tx.clone();
                    runtime.spawn(async move {
                        let result = match provider.coin_history(&coin_id, period).await {
                            Ok(history) => {
                                debug!(request_id, period = %period, points = history.len(), "History loaded");
                                AppResult::HistoryLoaded {
                                    request_id,
                                    history,
                                }
                            }
                            Err(e) => {
                                error!(coin_id = %coin_id, period = %period, error = ?e, "Failed to load coin history");
                                AppResult::LoadError {
                                    what: LookupKind::History,
                                    request_id: Some(request_id),
                                    error: format!("{:#}", e),
                                }
                            }
                        };
                        let _ = result_tx.send(result);
                    });
                }
            }
        }

        info!("Worker thread exiting (channel closed)");
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use anyhow::Result;
    use async_trait::async_trait;

    use crate::app::App;
    use crate::models::{CoinHistory, HistoryPoint};

    /// Provider en mémoire : l'historique 3h est lent, les autres immédiats
    struct FakeProvider {
        history_calls: AtomicUsize,
        invalidations: AtomicUsize,
    }

    impl FakeProvider {
        fn new() -> Self {
            Self {
                history_calls: AtomicUsize::new(0),
                invalidations: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl CoinDataProvider for FakeProvider {
        async fn coin_details(&self, coin_id: &str) -> Result<CoinRecord> {
            if coin_id == "missing" {
                anyhow::bail!("Coin not found");
            }
            let mut coin = CoinRecord::new(coin_id, "Bitcoin", "BTC");
            coin.price = Some(1234567.0);
            Ok(coin)
        }

        async fn coin_history(&self, coin_id: &str, period: TimePeriod) -> Result<CoinHistory> {
            self.history_calls.fetch_add(1, Ordering::SeqCst);
            if coin_id == "missing" {
                anyhow::bail!("HTTP 500");
            }
            if period == TimePeriod::ThreeHours {
                tokio::time::sleep(Duration::from_millis(300)).await;
            }
            let point = HistoryPoint::new(chrono::Utc::now(), 1.0);
            Ok(CoinHistory::new(period, None, vec![point]))
        }

        fn invalidate(&self, _coin_id: &str) {
            self.invalidations.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn start(provider: Arc<FakeProvider>) -> (mpsc::Sender<AppCommand>, mpsc::Receiver<AppResult>, JoinHandle<()>) {
        let (command_tx, command_rx) = mpsc::channel();
        let (result_tx, result_rx) = mpsc::channel();
        let handle = spawn_background_worker(provider, command_rx, result_tx);
        (command_tx, result_rx, handle)
    }

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[test]
    fn test_details_loaded() {
        let (command_tx, result_rx, _handle) = start(Arc::new(FakeProvider::new()));
        command_tx
            .send(AppCommand::LoadCoinDetails { coin_id: "btc".to_string() })
            .unwrap();

        match result_rx.recv_timeout(TIMEOUT).unwrap() {
            AppResult::CoinDetailsLoaded(coin) => assert_eq!(coin.uuid, "btc"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_details_error_reported() {
        let (command_tx, result_rx, _handle) = start(Arc::new(FakeProvider::new()));
        command_tx
            .send(AppCommand::LoadCoinDetails { coin_id: "missing".to_string() })
            .unwrap();

        match result_rx.recv_timeout(TIMEOUT).unwrap() {
            AppResult::LoadError {
                what,
                request_id,
                error,
            } => {
                assert_eq!(what, LookupKind::Details);
                assert_eq!(request_id, None);
                assert!(error.contains("Coin not found"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_history_error_carries_request_id() {
        let (command_tx, result_rx, _handle) = start(Arc::new(FakeProvider::new()));
        command_tx
            .send(AppCommand::LoadHistory {
                coin_id: "missing".to_string(),
                period: TimePeriod::OneYear,
                request_id: 7,
            })
            .unwrap();

        match result_rx.recv_timeout(TIMEOUT).unwrap() {
            AppResult::LoadError {
                what, request_id, ..
            } => {
                assert_eq!(what, LookupKind::History);
                assert_eq!(request_id, Some(7));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_invalidate_forwarded() {
        let provider = Arc::new(FakeProvider::new());
        let (command_tx, _result_rx, handle) = start(Arc::clone(&provider));
        command_tx
            .send(AppCommand::Invalidate { coin_id: "btc".to_string() })
            .unwrap();

        // Fermer le channel termine le worker après la commande
        drop(command_tx);
        handle.join().unwrap();
        assert_eq!(provider.invalidations.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_slow_stale_history_is_discarded() {
        let provider = Arc::new(FakeProvider::new());
        let (command_tx, result_rx, _handle) = start(Arc::clone(&provider));

        let mut app = App::new("btc".to_string());
        let mut coin = CoinRecord::new("btc", "Bitcoin", "BTC");
        coin.price = Some(1.0);
        app.apply_coin_details(coin);

        // 3h (lent) puis 24h (rapide) : la réponse 3h arrive en dernier
        let slow = app.select_time_period(TimePeriod::ThreeHours).unwrap();
        let fast = app.select_time_period(TimePeriod::TwentyFourHours).unwrap();
        command_tx.send(slow).unwrap();
        command_tx.send(fast).unwrap();

        let mut applied = Vec::new();
        for _ in 0..2 {
            match result_rx.recv_timeout(TIMEOUT).unwrap() {
                AppResult::HistoryLoaded { request_id, history } => {
                    let period = history.period;
                    applied.push((period, app.apply_history(request_id, history)));
                }
                other => panic!("unexpected result: {:?}", other),
            }
        }

        assert_eq!(provider.history_calls.load(Ordering::SeqCst), 2);
        assert_eq!(
            applied,
            vec![(TimePeriod::TwentyFourHours, true), (TimePeriod::ThreeHours, false)]
        );
        assert_eq!(app.history.as_ref().unwrap().period, TimePeriod::TwentyFourHours);
        assert_eq!(app.time_period, TimePeriod::TwentyFourHours);
    }
}
