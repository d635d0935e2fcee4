// ============================================================================
// coinview - Page de détail d'une cryptomonnaie dans le terminal
// ============================================================================
// Programme TUI : statistiques, graphique de prix par période, description
// et liens d'une crypto, chargés depuis l'API Coinranking
//
// CONCEPTS RUST CLÉS :
// 1. Terminal raw mode : contrôle total du terminal
// 2. Event loop : boucle qui gère résultats, rendering et événements
// 3. Worker thread : les appels API ne bloquent jamais l'UI
// 4. Ownership : App appartient au thread UI, le worker ne la touche pas
// ============================================================================

use std::io;
use std::path::Path;
use std::sync::{mpsc, Arc};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{debug, error, info, warn};

use coinview::api::{CoinDataProvider, CoinrankingClient};
use coinview::app::App;
use coinview::config::Config;
use coinview::ui::events::{self, Event, EventHandler};
use coinview::ui::render;
use coinview::worker::{spawn_background_worker, AppCommand, AppResult};

/// Lignes défilées par PageUp/PageDown
const SCROLL_STEP: u16 = 5;

// ============================================================================
// Initialisation du logging
// ============================================================================
// CONCEPT : Logging dans une app TUI
// - Les println! ne fonctionnent pas une fois le TUI lancé
// - On log vers un fichier à la place, avec rotation quotidienne
// ============================================================================

/// Initialise le système de logging vers fichier
///
/// Les logs sont écrits dans le répertoire donné par Config::log_dir()
///
/// # Utilisation
/// ```bash
/// tail -f ~/.local/share/coinview/logs/coinview.log.*
/// RUST_LOG=coinview=trace coinview
/// ```
fn init_logging(log_dir: &Path) -> Result<()> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    std::fs::create_dir_all(log_dir).context("Échec de la création du répertoire de logs")?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, "coinview.log");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true)
                .with_line_number(true),
        )
        .with(
            // Par défaut : debug pour coinview, info pour les dépendances
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "coinview=debug,info".into()),
        )
        .init();

    info!(?log_dir, "Logging initialisé");
    Ok(())
}

// ============================================================================
// Point d'entrée du programme
// ============================================================================

fn main() -> Result<()> {
    let config = Config::parse();

    // Logging avant tout le reste, mais un échec n'empêche pas de démarrer
    init_logging(&config.log_dir()).unwrap_or_else(|e| {
        eprintln!("⚠️  Warning: Failed to initialize logging: {:#}", e);
        eprintln!("   Continuing without logging...");
    });

    info!(coin_id = %config.coin_id, period = %config.period, api_url = %config.api_url, "coinview starting up");

    let client = CoinrankingClient::new(&config.api_url, config.api_key.clone(), config.cache_ttl())
        .context("Impossible de créer le client Coinranking")?;
    let provider: Arc<dyn CoinDataProvider> = Arc::new(client);

    // CONCEPT RUST : mpsc channels
    // - command_tx/rx : UI -> worker
    // - result_tx/rx : worker -> UI
    let (command_tx, command_rx) = mpsc::channel::<AppCommand>();
    let (result_tx, result_rx) = mpsc::channel::<AppResult>();

    info!("Spawning background worker thread");
    spawn_background_worker(provider, command_rx, result_tx);

    // App appartient au thread UI : pas de Mutex
    let mut app = App::with_period(config.coin_id.clone(), config.period);
    for command in app.initial_commands() {
        send_command(&command_tx, command);
    }

    debug!("Setting up terminal");
    let mut terminal = setup_terminal()?;

    let events = EventHandler::new();

    info!("Starting event loop");
    let result = run(&mut terminal, &mut app, &events, &command_tx, &result_rx);

    // Restaure le terminal (même en cas d'erreur)
    debug!("Restoring terminal");
    restore_terminal(&mut terminal)?;

    match &result {
        Ok(_) => info!("Application exited normally"),
        Err(e) => error!(error = ?e, "Application exited with error"),
    }

    result
}

/// Envoie une commande au worker
///
/// Un échec signifie que le worker est mort : on le log, l'UI continue
fn send_command(command_tx: &mpsc::Sender<AppCommand>, command: AppCommand) {
    debug!(?command, "Sending command to worker");
    if let Err(e) = command_tx.send(command) {
        error!(error = %e, "Failed to send command to worker");
    }
}

// ============================================================================
// Event loop
// ============================================================================
// 0. RÉSULTATS : applique ce que le worker a renvoyé
// 1. RENDER : dessine l'interface
// 2. INPUT : traite un événement (ou un tick)
// ============================================================================

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
    command_tx: &mpsc::Sender<AppCommand>,
    result_rx: &mpsc::Receiver<AppResult>,
) -> Result<()> {
    let mut worker_alive = true;

    while app.is_running() {
        // ========================================
        // 0. RÉSULTATS
        // ========================================
        // CONCEPT : try_recv non bloquant, on vide tout ce qui est arrivé
        loop {
            match result_rx.try_recv() {
                Ok(result) => apply_result(app, result),
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    if worker_alive {
                        error!("Worker thread disconnected!");
                        app.set_status("Background worker stopped".to_string());
                        worker_alive = false;
                    }
                    break;
                }
            }
        }

        // ========================================
        // 1. RENDER
        // ========================================
        terminal.draw(|frame| render(frame, app))?;

        // ========================================
        // 2. INPUT
        // ========================================
        match events.next() {
            Ok(event) => handle_event(app, event, command_tx),
            Err(e) => warn!(error = ?e, "Failed to read terminal event"),
        }
    }

    Ok(())
}

/// Applique un résultat du worker à l'état
fn apply_result(app: &mut App, result: AppResult) {
    match result {
        AppResult::CoinDetailsLoaded(record) => app.apply_coin_details(record),
        AppResult::HistoryLoaded {
            request_id,
            history,
        } => {
            app.apply_history(request_id, history);
        }
        AppResult::LoadError {
            what,
            request_id,
            error,
        } => {
            error!(?what, ?request_id, error = %error, "Lookup failed");
            app.apply_error(what, request_id, error);
        }
    }
}

// ============================================================================
// Gestion des événements
// ============================================================================

/// Traite un événement et met à jour l'état de l'application
///
/// CONCEPT RUST : Pattern matching avec guards
/// - Chaque helper de ui::events teste une touche
/// - Les actions qui déclenchent un lookup renvoient des AppCommand
fn handle_event(app: &mut App, event: Event, command_tx: &mpsc::Sender<AppCommand>) {
    if matches!(event, Event::Tick) {
        return;
    }

    // Two-step quit : seconde pression de 'q' = quitter, autre touche = annuler
    if app.is_awaiting_quit_confirmation() {
        if events::is_quit_event(&event) {
            info!("Quit confirmed");
            app.quit();
        } else {
            debug!("Quit cancelled");
            app.cancel_quit();
        }
        return;
    }

    match event {
        _ if events::is_quit_event(&event) => {
            app.request_quit();
        }
        _ if events::is_next_period_event(&event) => {
            if let Some(command) = app.next_period() {
                send_command(command_tx, command);
            }
        }
        _ if events::is_previous_period_event(&event) => {
            if let Some(command) = app.previous_period() {
                send_command(command_tx, command);
            }
        }
        _ if events::is_refresh_event(&event) => {
            for command in app.refresh() {
                send_command(command_tx, command);
            }
        }
        _ if events::is_up_event(&event) => app.select_previous_link(),
        _ if events::is_down_event(&event) => app.select_next_link(),
        _ if events::is_page_down_event(&event) => app.scroll_description_down(SCROLL_STEP),
        _ if events::is_page_up_event(&event) => app.scroll_description_up(SCROLL_STEP),
        _ if events::is_enter_event(&event) => open_selected_link(app),
        _ => {
            if let Some(period) = events::period_from_event(&event) {
                if let Some(command) = app.select_time_period(period) {
                    send_command(command_tx, command);
                }
            }
        }
    }
}

/// Ouvre le lien sélectionné dans le navigateur externe
fn open_selected_link(app: &mut App) {
    let link = app
        .detail_view()
        .and_then(|view| view.links.get(app.selected_link).cloned());

    let Some(link) = link else {
        return;
    };

    match link.open() {
        Ok(()) => app.set_status(format!("Opened {}", link.url)),
        Err(e) => {
            error!(url = %link.url, error = ?e, "Failed to open link");
            app.set_status(format!("{:#}", e));
        }
    }
}

// ============================================================================
// Setup et restauration du terminal
// ============================================================================
// IMPORTANT : Toujours restaurer le terminal avant de quitter !
// ============================================================================

/// Configure le terminal en mode TUI
///
/// - Raw mode : on reçoit les touches directement
/// - Alternate screen : l'écran précédent est restauré en sortie
fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(|e| e.into())
}

/// Restaure le terminal à son état normal
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
