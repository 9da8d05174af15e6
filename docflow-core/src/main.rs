//! src/main.rs
//! Document exchange TUI: startup, main loop and terminal lifecycle

use std::{
    io::{self, Stdout},
    panic::PanicHookInfo,
    sync::Arc,
};

use anyhow::{Context, Result};
use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::{Notify, mpsc};
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;

use docflow_core::{
    AppState, Logger,
    config::Config,
    controller::{
        action_dispatcher::{ActionDispatcher, DispatchResult},
        event_loop::{EventLoop, TaskResult},
    },
    view::{theme, ui::UIRenderer},
};

type AppTerminal = Terminal<CrosstermBackend<Stdout>>;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> Result<()> {
    setup_panic_handler();

    let app = App::new()
        .await
        .context("Failed to initialize application")?;
    app.run().await.context("Application runtime error")?;

    info!("Application exited cleanly");
    Ok(())
}

struct App {
    terminal: AppTerminal,
    state: AppState,
    event_loop: EventLoop,
    dispatcher: ActionDispatcher,
    renderer: UIRenderer,
    shutdown: Arc<Notify>,
    _log_guard: Option<WorkerGuard>,
}

impl App {
    async fn new() -> Result<Self> {
        let (config, config_error) = match Config::load().await {
            Ok(config) => (config, None),
            Err(e) => (Config::default(), Some(e)),
        };

        // The file writer is optional; the UI works without it.
        let log_guard = match Logger::init_tracing(&config.logging) {
            Ok(guard) => Some(guard),
            Err(e) => {
                eprintln!("Logging disabled: {e}");
                None
            }
        };
        info!("Starting docflow");
        if let Some(e) = config_error {
            warn!("Failed to load config, using defaults: {e}");
        }
        theme::init_theme();

        let terminal = setup_terminal().context("Failed to initialize terminal")?;

        let (task_tx, task_rx) = mpsc::unbounded_channel::<TaskResult>();

        let state = AppState::new(Arc::new(config));
        let dispatcher = ActionDispatcher::new(task_tx);
        let event_loop = EventLoop::new(task_rx);

        info!("Application initialized successfully");

        Ok(Self {
            terminal,
            state,
            event_loop,
            dispatcher,
            renderer: UIRenderer::new(),
            shutdown: Arc::new(Notify::new()),
            _log_guard: log_guard,
        })
    }

    async fn run(mut self) -> Result<()> {
        self.setup_shutdown_handler();
        info!("Entering event loop");

        loop {
            if self.state.ui.needs_redraw() {
                self.render()?;
            }

            tokio::select! {
                _ = self.shutdown.notified() => {
                    info!("Shutdown signal received");
                    break;
                }

                maybe_action = self.event_loop.next_action(&self.state) => {
                    let Some(action) = maybe_action else {
                        info!("Event sources closed");
                        break;
                    };
                    if self.dispatcher.handle(&mut self.state, action) == DispatchResult::Terminate {
                        break;
                    }
                }
            }
        }

        let released = self.state.shutdown();
        let stats = self.renderer.stats();
        info!(
            released_previews = released,
            live_previews = self.state.previews.live(),
            frames = stats.frames,
            slow_frames = stats.slow,
            "Event loop terminated cleanly"
        );
        Ok(())
    }

    fn render(&mut self) -> Result<()> {
        let Self {
            terminal,
            state,
            renderer,
            ..
        } = self;
        terminal
            .draw(|frame| renderer.render(frame, state))
            .context("Failed to draw frame")?;
        state.ui.clear_redraw();
        Ok(())
    }

    fn setup_shutdown_handler(&self) {
        let shutdown = self.shutdown.clone();

        tokio::spawn(async move {
            #[cfg(unix)]
            {
                use tokio::signal::unix::{SignalKind, signal};

                let (mut sigterm, mut sigint) =
                    match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
                        (Ok(term), Ok(int)) => (term, int),
                        (Err(e), _) | (_, Err(e)) => {
                            warn!("Failed to install signal handlers: {e}");
                            return;
                        }
                    };

                tokio::select! {
                    _ = sigterm.recv() => info!("Received SIGTERM"),
                    _ = sigint.recv() => info!("Received SIGINT"),
                }
            }

            #[cfg(not(unix))]
            {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    warn!("Failed to listen for Ctrl+C: {}", e);
                    return;
                }
                info!("Received Ctrl+C");
            }

            shutdown.notify_one();
        });
    }
}

impl Drop for App {
    fn drop(&mut self) {
        if let Err(e) = cleanup_terminal(&mut self.terminal) {
            warn!("Failed to cleanup terminal: {}", e);
        }
    }
}

fn setup_terminal() -> Result<AppTerminal> {
    enable_raw_mode().context("Failed to enable raw mode")?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)
        .context("Failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;

    info!("Terminal setup complete");
    Ok(terminal)
}

fn cleanup_terminal(terminal: &mut AppTerminal) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), DisableBracketedPaste, LeaveAlternateScreen)
        .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    info!("Terminal cleanup complete");
    Ok(())
}

fn setup_panic_handler() {
    let original_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info: &PanicHookInfo<'_>| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), DisableBracketedPaste, LeaveAlternateScreen);

        error!("Application panicked: {}", panic_info);
        original_hook(panic_info);
    }));
}
