mod config;
mod controller;
mod error;
mod logging;
mod media;
mod model;
mod session;
mod view;

use std::io;
use std::sync::Arc;
use anyhow::Result;
use std::time::Duration;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use config::AppConfig;
use controller::AppController;
use media::{MpvLauncher, YtDlpFetcher, YtDlpResolver};
use model::{AppModel, Settings, SettingsStore};
use session::PlayerSession;
use view::AppView;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::from_env();

    if let Err(e) = logging::init_logging(&config.log_dir()) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    tracing::info!(
        data_dir = %config.data_dir.display(),
        player = %config.player_program,
        downloader = %config.downloader_program,
        "=== tunes-rs starting ==="
    );

    // Step 1: Settings document
    let store = SettingsStore::new(config.settings_path());
    let (settings, load_error) = match store.load() {
        Ok(settings) => (settings, None),
        Err(e) => {
            tracing::error!(error = %e, path = %store.path().display(), "Could not load settings, using defaults");
            (Settings::default(), Some(e))
        }
    };
    tracing::debug!(
        theme = %settings.theme,
        volume = settings.volume,
        playlist = settings.playlist.len(),
        "Settings loaded"
    );

    // Step 2: Player session over yt-dlp and mpv
    let (session, events) = PlayerSession::new(
        Arc::new(YtDlpResolver::new(config.downloader_program.clone())),
        Arc::new(YtDlpFetcher::new(config.downloader_program.clone(), config.cache_dir())),
        Arc::new(MpvLauncher::new(config.player_program.clone())),
    );

    let model = Arc::new(AppModel::new(settings));
    if let Some(e) = load_error {
        model.set_error(format!("Settings could not be read, using defaults: {e}")).await;
    }
    model.push_status("Ready. Type a song and press Enter, H for help.").await;

    let controller = AppController::new(model.clone(), session.clone(), store);
    controller.start_session_event_listener(events);

    tracing::info!("Starting TUI...");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, model, session.clone(), controller).await;

    // Never leave a player running behind the terminal
    session.stop().await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = ?err, "Application error");
    }

    tracing::info!("tunes-rs shutting down");
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    model: Arc<AppModel>,
    session: PlayerSession,
    controller: AppController,
) -> io::Result<()> {
    loop {
        // Auto-clear old errors (after 5 seconds)
        model.auto_clear_old_errors().await;

        // Get current state
        let ui_state = model.get_ui_state().await;
        let settings = model.get_settings().await;
        let snapshot = session.snapshot().await;
        let should_quit = model.should_quit().await;

        // Draw UI
        terminal.draw(|f| {
            AppView::render(f, &ui_state, &settings, &snapshot);
        })?;

        if should_quit {
            break;
        }

        // Handle input with shorter poll time for smoother UI updates
        if event::poll(Duration::from_millis(50))?
            && let Event::Key(key) = event::read()?
            && let Err(e) = controller.handle_key_event(key).await
        {
            tracing::error!(error = %e, "Key handling failed");
        }
    }

    Ok(())
}
