// ============================================================================
// Structure : App
// ============================================================================
// Contrôleur de vue : état de la page de détail d'une crypto
//
// CONCEPTS RUST :
// 1. State Management : tout l'état mutable est dans une seule structure
// 2. Mutabilité contrôlée : &mut self, uniquement depuis le thread UI
// 3. Remplacement complet : un nouveau record/historique écrase l'ancien
//
// PATTERN : Cette structure suit le pattern "Application State"
// - L'UI lit depuis App
// - Les résultats du worker passent par apply_*()
// - Les actions utilisateur renvoient des AppCommand à envoyer au worker
// ============================================================================

use tracing::{debug, info};

use crate::models::{derive_stats, CoinHistory, CoinRecord, CoinStats, TimePeriod};
use crate::view::DetailView;
use crate::worker::{AppCommand, LookupKind};

// ============================================================================
// Enum : ViewState
// ============================================================================
// CONCEPT RUST : Enums pour state machines
// - Deux états seulement : en chargement ou prêt
// - Dérivé de la présence du record (pas stocké séparément)
// ============================================================================

/// État d'affichage de la page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    /// Record pas encore reçu : seul l'indicateur de chargement est affiché
    Loading,

    /// Record disponible : statistiques, graphique et description affichés
    Ready,
}

/// État principal de l'application
pub struct App {
    /// Indique si l'application doit continuer à tourner
    pub running: bool,

    /// Identifiant de la crypto affichée
    pub coin_id: String,

    /// Période sélectionnée pour l'historique
    pub time_period: TimePeriod,

    /// Dernier record reçu (None tant que le premier fetch n'a pas abouti)
    pub coin_record: Option<CoinRecord>,

    /// Dernier historique accepté
    pub history: Option<CoinHistory>,

    /// Jeton de la dernière requête d'historique émise
    /// CONCEPT : Request token
    /// - Chaque sélection de période incrémente le compteur
    /// - Une réponse portant un ancien jeton est ignorée
    history_request: u64,

    /// Une requête d'historique est en vol
    pub history_pending: bool,

    /// Two-step quit (première pression de 'q' = confirmation)
    pub confirm_quit: bool,

    /// Index du lien sélectionné dans la liste
    pub selected_link: usize,

    /// Défilement vertical de la description
    pub description_scroll: u16,

    /// Dernier message d'état (erreur de fetch, lien ouvert...)
    pub status_message: Option<String>,
}

impl App {
    /// Crée l'état initial pour une crypto, période par défaut (7d)
    pub fn new(coin_id: String) -> Self {
        Self::with_period(coin_id, TimePeriod::default())
    }

    /// Crée l'état initial avec une période choisie (--period)
    pub fn with_period(coin_id: String, time_period: TimePeriod) -> Self {
        Self {
            running: true,
            coin_id,
            time_period,
            coin_record: None,
            history: None,
            history_request: 0,
            history_pending: false,
            confirm_quit: false,
            selected_link: 0,
            description_scroll: 0,
            status_message: None,
        }
    }

    // ========================================================================
    // Lookups
    // ========================================================================

    /// Commandes à envoyer au démarrage
    ///
    /// - détails : une fois par coin id
    /// - historique : une fois pour la période courante
    pub fn initial_commands(&mut self) -> Vec<AppCommand> {
        vec![
            AppCommand::LoadCoinDetails {
                coin_id: self.coin_id.clone(),
            },
            self.issue_history_request(),
        ]
    }

    /// Nouveau jeton + commande d'historique pour la période courante
    fn issue_history_request(&mut self) -> AppCommand {
        self.history_request += 1;
        self.history_pending = true;
        AppCommand::LoadHistory {
            coin_id: self.coin_id.clone(),
            period: self.time_period,
            request_id: self.history_request,
        }
    }

    /// Sélectionne une période d'historique
    ///
    /// CONCEPT RUST : Option<AppCommand> en retour
    /// - None : rien à faire (record absent, le sélecteur n'est pas affiché)
    /// - Some(cmd) : exactement une requête d'historique pour la nouvelle période
    pub fn select_time_period(&mut self, period: TimePeriod) -> Option<AppCommand> {
        if self.coin_record.is_none() {
            debug!(period = %period, "Ignoring period selection while loading");
            return None;
        }

        info!(period = %period, "Time period selected");
        self.time_period = period;
        Some(self.issue_history_request())
    }

    /// Période suivante du sélecteur (touche 'l')
    pub fn next_period(&mut self) -> Option<AppCommand> {
        self.select_time_period(self.time_period.next())
    }

    /// Période précédente du sélecteur (touche 'h')
    pub fn previous_period(&mut self) -> Option<AppCommand> {
        self.select_time_period(self.time_period.previous())
    }

    /// Recharge tout en ignorant le cache (touche 'r')
    pub fn refresh(&mut self) -> Vec<AppCommand> {
        info!(coin_id = %self.coin_id, "Refresh requested");
        self.status_message = None;
        let mut commands = vec![AppCommand::Invalidate {
            coin_id: self.coin_id.clone(),
        }];
        commands.extend(self.initial_commands());
        commands
    }

    // ========================================================================
    // Résultats du worker
    // ========================================================================

    /// Remplace le record (jamais de fusion)
    pub fn apply_coin_details(&mut self, record: CoinRecord) {
        info!(name = %record.name, symbol = %record.symbol, "Coin details updated");

        // La liste de liens peut avoir raccourci
        if self.selected_link >= record.links.len() {
            self.selected_link = 0;
        }
        self.coin_record = Some(record);
    }

    /// Applique un historique s'il répond à la dernière requête
    ///
    /// # Retourne
    /// * `true` si l'historique a été appliqué, `false` s'il était périmé
    pub fn apply_history(&mut self, request_id: u64, history: CoinHistory) -> bool {
        if request_id != self.history_request {
            debug!(
                request_id,
                latest = self.history_request,
                period = %history.period,
                "Discarding stale history response"
            );
            return false;
        }

        info!(period = %history.period, points = history.len(), "History updated");
        self.history = Some(history);
        self.history_pending = false;
        true
    }

    /// Enregistre un échec de lookup (affiché dans le footer)
    ///
    /// N'affecte jamais l'état Loading/Ready. Un échec d'historique portant
    /// un ancien jeton est ignoré : la dernière requête est toujours en vol.
    ///
    /// # Retourne
    /// * `true` si l'erreur a été enregistrée, `false` si elle était périmée
    pub fn apply_error(&mut self, what: LookupKind, request_id: Option<u64>, message: String) -> bool {
        if what == LookupKind::History {
            if request_id != Some(self.history_request) {
                debug!(
                    ?request_id,
                    latest = self.history_request,
                    error = %message,
                    "Discarding stale history error"
                );
                return false;
            }
            self.history_pending = false;
        }
        let prefix = match what {
            LookupKind::Details => "Détails indisponibles",
            LookupKind::History => "Historique indisponible",
        };
        self.status_message = Some(format!("{} : {}", prefix, message));
        true
    }

    // ========================================================================
    // Lecture de l'état
    // ========================================================================

    pub fn view_state(&self) -> ViewState {
        if self.coin_record.is_some() {
            ViewState::Ready
        } else {
            ViewState::Loading
        }
    }

    pub fn is_ready(&self) -> bool {
        self.view_state() == ViewState::Ready
    }

    /// Statistiques recalculées à chaque appel (pas de cache)
    pub fn stats(&self) -> Option<CoinStats> {
        derive_stats(self.coin_record.as_ref())
    }

    /// Vue assemblée pour le rendu, None pendant le chargement
    pub fn detail_view(&self) -> Option<DetailView> {
        self.coin_record
            .as_ref()
            .map(|record| DetailView::assemble(record, self.history.as_ref()))
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    // ========================================================================
    // Quit (two-step)
    // ========================================================================

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn request_quit(&mut self) {
        self.confirm_quit = true;
    }

    pub fn cancel_quit(&mut self) {
        self.confirm_quit = false;
    }

    pub fn is_awaiting_quit_confirmation(&self) -> bool {
        self.confirm_quit
    }

    // ========================================================================
    // Navigation liens / description
    // ========================================================================

    fn link_count(&self) -> usize {
        self.coin_record.as_ref().map(|r| r.links.len()).unwrap_or(0)
    }

    /// CONCEPT RUST : Saturating arithmetic
    /// - saturating_sub() ne descend jamais sous 0
    pub fn select_previous_link(&mut self) {
        self.selected_link = self.selected_link.saturating_sub(1);
    }

    pub fn select_next_link(&mut self) {
        let max_index = self.link_count().saturating_sub(1);
        self.selected_link = (self.selected_link + 1).min(max_index);
    }

    pub fn scroll_description_down(&mut self, lines: u16) {
        self.description_scroll = self.description_scroll.saturating_add(lines);
    }

    pub fn scroll_description_up(&mut self, lines: u16) {
        self.description_scroll = self.description_scroll.saturating_sub(lines);
    }

    pub fn set_status(&mut self, message: String) {
        self.status_message = Some(message);
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CoinLink;

    fn ready_app() -> App {
        let mut app = App::new("Qwsogvtv82FCd".to_string());
        let mut coin = CoinRecord::new("Qwsogvtv82FCd", "Bitcoin", "BTC");
        coin.price = Some(1234567.0);
        app.apply_coin_details(coin);
        app
    }

    fn history_request_of(command: &AppCommand) -> (TimePeriod, u64) {
        match command {
            AppCommand::LoadHistory {
                period, request_id, ..
            } => (*period, *request_id),
            other => panic!("expected LoadHistory, got {:?}", other),
        }
    }

    #[test]
    fn test_app_creation() {
        let app = App::new("abc".to_string());
        assert!(app.is_running());
        assert_eq!(app.time_period, TimePeriod::SevenDays);
        assert_eq!(app.view_state(), ViewState::Loading);
        assert!(app.stats().is_none());
        assert!(app.detail_view().is_none());
    }

    #[test]
    fn test_initial_commands() {
        let mut app = App::new("abc".to_string());
        let commands = app.initial_commands();
        assert_eq!(commands.len(), 2);
        assert_eq!(
            commands[0],
            AppCommand::LoadCoinDetails {
                coin_id: "abc".to_string()
            }
        );
        assert_eq!(history_request_of(&commands[1]).0, TimePeriod::SevenDays);
        assert!(app.history_pending);
    }

    #[test]
    fn test_select_period_while_loading_is_noop() {
        for period in TimePeriod::all() {
            let mut app = App::new("abc".to_string());
            assert!(app.select_time_period(*period).is_none());
            assert_eq!(app.time_period, TimePeriod::SevenDays);
            assert!(app.stats().is_none());
            assert!(!app.history_pending);
        }
    }

    #[test]
    fn test_select_period_issues_one_lookup() {
        for period in TimePeriod::all() {
            let mut app = ready_app();
            let command = app.select_time_period(*period).unwrap();
            match command {
                AppCommand::LoadHistory {
                    coin_id,
                    period: requested,
                    ..
                } => {
                    assert_eq!(coin_id, "Qwsogvtv82FCd");
                    assert_eq!(requested, *period);
                }
                other => panic!("expected LoadHistory, got {:?}", other),
            }
            assert_eq!(app.time_period, *period);
        }
    }

    #[test]
    fn test_next_previous_period() {
        let mut app = ready_app();
        let (period, _) = history_request_of(&app.next_period().unwrap());
        assert_eq!(period, TimePeriod::ThirtyDays);
        let (period, _) = history_request_of(&app.previous_period().unwrap());
        assert_eq!(period, TimePeriod::SevenDays);
    }

    #[test]
    fn test_stale_history_discarded() {
        let mut app = ready_app();
        let (_, first) = history_request_of(&app.select_time_period(TimePeriod::ThreeHours).unwrap());
        let (_, second) = history_request_of(&app.select_time_period(TimePeriod::OneYear).unwrap());
        assert!(second > first);

        // La réponse la plus récente arrive d'abord
        let latest = CoinHistory::new(TimePeriod::OneYear, None, Vec::new());
        assert!(app.apply_history(second, latest));
        assert!(!app.history_pending);

        // La réponse périmée arrive ensuite : ignorée
        let stale = CoinHistory::new(TimePeriod::ThreeHours, None, Vec::new());
        assert!(!app.apply_history(first, stale));
        assert_eq!(app.history.as_ref().unwrap().period, TimePeriod::OneYear);
    }

    #[test]
    fn test_stale_history_error_discarded() {
        let mut app = ready_app();
        let (_, first) = history_request_of(&app.select_time_period(TimePeriod::ThreeHours).unwrap());
        let (_, second) = history_request_of(&app.select_time_period(TimePeriod::OneYear).unwrap());

        // L'échec de la requête 3h arrive alors que 1y est encore en vol
        assert!(!app.apply_error(LookupKind::History, Some(first), "HTTP 500 for 3h".to_string()));
        assert!(app.history_pending);
        assert!(app.status_message.is_none());

        // L'échec de la dernière requête, lui, est affiché
        assert!(app.apply_error(LookupKind::History, Some(second), "HTTP 500 for 1y".to_string()));
        assert!(!app.history_pending);
        assert!(app.status_message.as_ref().unwrap().contains("1y"));
    }

    #[test]
    fn test_coin_details_replaced_wholesale() {
        let mut app = ready_app();
        let mut replacement = CoinRecord::new("Qwsogvtv82FCd", "Bitcoin", "BTC");
        replacement.rank = Some(1);
        app.apply_coin_details(replacement.clone());

        // Le prix de l'ancien record n'est pas conservé
        assert_eq!(app.coin_record, Some(replacement));
        assert!(app.coin_record.as_ref().unwrap().price.is_none());
    }

    #[test]
    fn test_error_keeps_loading_state() {
        let mut app = App::new("abc".to_string());
        assert!(app.apply_error(LookupKind::Details, None, "HTTP 429".to_string()));
        assert_eq!(app.view_state(), ViewState::Loading);
        assert!(app.status_message.as_ref().unwrap().contains("HTTP 429"));
    }

    #[test]
    fn test_refresh_invalidates_first() {
        let mut app = ready_app();
        let commands = app.refresh();
        assert_eq!(commands.len(), 3);
        assert!(matches!(commands[0], AppCommand::Invalidate { .. }));
        assert!(matches!(commands[1], AppCommand::LoadCoinDetails { .. }));
        assert!(matches!(commands[2], AppCommand::LoadHistory { .. }));
    }

    #[test]
    fn test_link_navigation() {
        let mut app = App::new("abc".to_string());
        let mut coin = CoinRecord::new("abc", "Coin", "CN");
        coin.links = vec![
            CoinLink { name: "a".into(), kind: "website".into(), url: "https://a".into() },
            CoinLink { name: "b".into(), kind: "github".into(), url: "https://b".into() },
        ];
        app.apply_coin_details(coin);

        app.select_next_link();
        assert_eq!(app.selected_link, 1);
        app.select_next_link();
        assert_eq!(app.selected_link, 1);
        app.select_previous_link();
        app.select_previous_link();
        assert_eq!(app.selected_link, 0);
    }

    #[test]
    fn test_app_quit() {
        let mut app = App::new("abc".to_string());
        app.request_quit();
        assert!(app.is_awaiting_quit_confirmation());
        app.cancel_quit();
        assert!(!app.is_awaiting_quit_confirmation());
        app.quit();
        assert!(!app.is_running());
    }
}
