mod backend;
mod config;
mod controller;
mod error;
mod logging;
mod model;
mod view;

use std::io;
use std::sync::Arc;
use anyhow::Result;
use std::time::Duration;
use tokio::sync::Mutex;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use view::AppView;
use backend::demo::{DemoLibrary, DemoPlayer};
use config::Settings;
use controller::AppController;
use model::AppModel;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load()?;

    if let Err(e) = logging::init_logging(&settings) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    tracing::info!("=== tunedeck starting ===");

    let latency = settings.simulated_latency();
    let library = match &settings.library_path {
        Some(path) => DemoLibrary::from_file(path, latency)?,
        None => DemoLibrary::builtin(latency),
    };
    let (player, player_events) = DemoPlayer::new(latency);

    let model = Arc::new(Mutex::new(AppModel::new()));
    let notice_timeout = settings.notice_timeout();
    let controller = AppController::new(model.clone(), Arc::new(player), Arc::new(library), settings);

    controller.bootstrap().await;
    controller.start_player_event_listener(player_events);

    tracing::info!("Starting TUI...");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, model, controller, notice_timeout).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = ?err, "Application error");
    }

    tracing::info!("tunedeck shutting down");
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    model: Arc<Mutex<AppModel>>,
    controller: AppController,
    notice_timeout: chrono::Duration,
) -> io::Result<()> {
    loop {
        let (snapshot, should_quit) = {
            let mut model_guard = model.lock().await;
            model_guard.expire_notice(chrono::Utc::now(), notice_timeout);
            (model_guard.snapshot(), model_guard.should_quit())
        };

        if should_quit {
            break;
        }

        terminal.draw(|f| {
            AppView::render(f, &snapshot);
        })?;

        // Short poll keeps backend resolutions visible without a keypress
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                let _ = controller.handle_key_event(key).await;
            }
        }
    }

    Ok(())
}
