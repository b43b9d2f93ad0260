use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use trino_dash::api::{DashboardApi, HttpApi};
use trino_dash::config::{Overrides, Settings};
use trino_dash::source::FeedEvent;
use trino_dash::{events, ui, ApiSource, App, DashboardState, DataSource, RefreshScheduler};

/// Settings file read when `--config` is not given.
const DEFAULT_CONFIG_FILE: &str = "trino-dash.toml";

#[derive(Parser, Debug)]
#[command(name = "trino-dash")]
#[command(about = "Terminal dashboard for Trino/Presto gateway clusters")]
struct Args {
    /// Settings file (TOML). Missing file is ignored.
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Admin API base URL
    #[arg(long)]
    endpoint: Option<String>,

    /// Polling period (e.g., "2s", "500ms")
    #[arg(short, long)]
    refresh: Option<String>,

    /// Per-request timeout (e.g., "10s")
    #[arg(long)]
    timeout: Option<String>,

    /// Write logs to this file (the TUI owns the terminal)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Fetch once, export the state to a JSON file and exit
    #[arg(short, long, conflicts_with = "check")]
    export: Option<PathBuf>,

    /// Probe the admin API health endpoint and exit
    #[arg(long)]
    check: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let settings = Settings::load(Some(args.config.as_path()))?.override_with(Overrides {
        endpoint: args.endpoint,
        refresh_interval: args.refresh,
        request_timeout: args.timeout,
        log_file: args.log_file,
    })?;

    let interactive = args.export.is_none() && !args.check;
    init_tracing(settings.log_file.as_deref(), interactive)?;

    let rt = tokio::runtime::Runtime::new()?;
    let guard = rt.enter();

    let api = HttpApi::builder()
        .endpoint(settings.endpoint.clone())
        .timeout(settings.timeout()?)
        .build()?;

    if args.check {
        return rt.block_on(check_health(&api));
    }

    if let Some(export_path) = args.export {
        return rt.block_on(export_to_file(&api, &export_path));
    }

    let source = ApiSource::spawn(Arc::new(api), RefreshScheduler::new(settings.refresh_period()?));
    let refresh = source.refresh_handle();

    let result = run_tui(Box::new(source));

    refresh.stop();
    drop(guard);
    rt.shutdown_timeout(Duration::from_millis(500));
    result
}

/// Install the log subscriber.
///
/// In TUI mode logs only go to a file, if one is configured. Otherwise
/// they go to stderr.
fn init_tracing(log_file: Option<&Path>, interactive: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trino_dash=info"));

    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("opening log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None if !interactive => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::stderr)
                .init();
        }
        None => {}
    }
    Ok(())
}

/// Probe `/api/health`; a non-2xx answer or transport error fails the run.
async fn check_health(api: &HttpApi) -> Result<()> {
    api.health()
        .await
        .with_context(|| format!("{} is not healthy", api.endpoint()))?;
    println!("{}: ok", api.endpoint());
    Ok(())
}

/// Fetch stats and clusters once and write them as JSON.
async fn export_to_file(api: &HttpApi, export_path: &Path) -> Result<()> {
    let (stats, clusters) = tokio::join!(api.stats(), api.list_clusters());
    if let (Err(e), Err(_)) = (&stats, &clusters) {
        anyhow::bail!("{} unreachable: {}", api.endpoint(), e);
    }

    let now = Utc::now();
    let mut state = DashboardState::new();
    for event in [FeedEvent::Stats(stats), FeedEvent::Clusters(clusters)] {
        if let Some(notice) = state.apply(event, now) {
            warn!(message = %notice.message, "partial export");
        }
    }

    let json = serde_json::to_string_pretty(&state.export_json(Some(api.endpoint()), now))?;
    std::fs::write(export_path, json)
        .with_context(|| format!("writing {}", export_path.display()))?;

    println!("Exported dashboard state to: {}", export_path.display());
    Ok(())
}

/// Run the TUI with the given data source
fn run_tui(source: Box<dyn DataSource>) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic);
    }));

    let mut app = App::new(source);
    info!(source = app.source_description(), "dashboard started");

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    while app.running {
        app.reload_data();

        terminal.draw(|frame| ui::draw(frame, app))?;

        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Mouse(mouse) => events::handle_mouse_event(app, mouse, ui::TABLE_HEADER_ROW),
                Event::Resize(_, _) => {
                    // Terminal will redraw on next iteration
                }
                _ => {}
            }
        }
    }

    info!("dashboard stopped");
    Ok(())
}
