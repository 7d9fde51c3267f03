use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_subscriber::EnvFilter;

use soilwatch::data::alert::notify_latest;
use soilwatch::ui::Theme;
use soilwatch::{
    events, export, ui, ApiClient, App, DataSource, ExportFormat, FileSource, HttpSource,
    LogNotifier, Reading, Settings,
};

/// Export format selection on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    Xlsx,
    Pdf,
    Csv,
    /// Every supported format.
    All,
}

impl FormatArg {
    fn formats(self) -> Vec<ExportFormat> {
        match self {
            FormatArg::Xlsx => vec![ExportFormat::Xlsx],
            FormatArg::Pdf => vec![ExportFormat::Pdf],
            FormatArg::Csv => vec![ExportFormat::Csv],
            FormatArg::All => ExportFormat::ALL.to_vec(),
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "soilwatch")]
#[command(about = "Terminal dashboard for soil moisture, pH, humidity and temperature sensors")]
struct Args {
    /// Settings file; format from the extension (.toml, .yaml, .json), TOML if none
    #[arg(short, long, default_value = "soilwatch.toml")]
    config: PathBuf,

    /// Readings endpoint, overrides api.readings_url
    #[arg(long)]
    endpoint: Option<String>,

    /// Pump status endpoint, overrides api.pump_url
    #[arg(long)]
    pump_endpoint: Option<String>,

    /// Poll interval in seconds, overrides api.poll_interval_secs
    #[arg(short, long)]
    refresh: Option<u64>,

    /// Replay readings from a JSON file instead of polling the API
    #[arg(short, long, conflicts_with = "endpoint")]
    file: Option<PathBuf>,

    /// Time zone for displayed and exported timestamps (e.g. "Asia/Jakarta")
    #[arg(long)]
    timezone: Option<String>,

    /// Write logs here while the dashboard is running
    #[arg(long, default_value = "soilwatch.log")]
    log_file: PathBuf,

    /// Fetch once, export into this directory and exit
    #[arg(short, long)]
    export: Option<PathBuf>,

    /// Export format (used with --export)
    #[arg(long, value_enum, default_value = "all", requires = "export")]
    format: FormatArg,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Handle export mode (non-interactive), logging to stderr
    if let Some(ref dir) = args.export {
        init_tracing(None)?;
        let settings = load_settings(&args)?;
        return export_to_dir(&args, &settings, dir);
    }

    init_tracing(Some(&args.log_file))?;
    let settings = load_settings(&args)?;

    // The runtime drives the polling task while the UI runs on this thread
    let rt = tokio::runtime::Runtime::new()?;
    let _guard = rt.enter();

    let source: Box<dyn DataSource> = match args.file {
        Some(ref path) => Box::new(FileSource::new(path)),
        None => {
            let client = ApiClient::new(&settings.api)?;
            Box::new(HttpSource::spawn(client, settings.api.poll_interval()))
        }
    };

    let app = App::new(source, settings.alerts.clone())
        .with_page_size(settings.history.page_size)
        .with_timezone(settings.history.tz()?)
        .with_theme(Theme::auto_detect());

    run_tui(app)
}

/// Settings file and environment, then command-line overrides.
fn load_settings(args: &Args) -> Result<Settings> {
    let mut settings = Settings::load(Some(args.config.as_path()))
        .with_context(|| format!("Failed to load settings from {}", args.config.display()))?;

    if let Some(ref url) = args.endpoint {
        settings.api.readings_url = url.clone();
    }
    if let Some(ref url) = args.pump_endpoint {
        settings.api.pump_url = url.clone();
    }
    if let Some(secs) = args.refresh {
        settings.api.poll_interval_secs = secs;
    }
    if let Some(ref tz) = args.timezone {
        settings.history.timezone = tz.clone();
    }
    settings.validate()?;
    Ok(settings)
}

/// Log to `log_file` when given (the terminal belongs to the UI), else stderr.
fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("soilwatch=info"));

    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::stderr)
                .init();
        }
    }
    Ok(())
}

/// Run the TUI until the user quits
fn run_tui(mut app: App) -> Result<()> {
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

    info!(source = app.source_description(), "Dashboard started");
    app.reload_data();

    // Run the main loop
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
    // Minimum terminal size for usable display
    const MIN_WIDTH: u16 = 70;
    const MIN_HEIGHT: u16 = 16;

    while app.running {
        // Draw UI
        terminal.draw(|frame| {
            let area = frame.area();

            // Check for minimum terminal size
            if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
                let msg = format!(
                    "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
                    area.width, area.height, MIN_WIDTH, MIN_HEIGHT
                );
                let paragraph = ratatui::widgets::Paragraph::new(msg)
                    .alignment(ratatui::layout::Alignment::Center)
                    .style(ratatui::style::Style::default().fg(ratatui::style::Color::Yellow));
                let centered = ratatui::layout::Rect::new(
                    0,
                    (area.height / 2).saturating_sub(2),
                    area.width,
                    5u16.min(area.height),
                );
                frame.render_widget(paragraph, centered);
                return;
            }

            ui::draw(frame, app);
        })?;

        // Poll for events with a short timeout
        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Mouse(mouse) => {
                    let height = terminal.size()?.height;
                    events::handle_mouse_event(app, mouse, height);
                }
                Event::Resize(_, _) => {
                    // Terminal will redraw on next iteration
                }
                _ => {}
            }
        }

        // Apply whatever the source has produced since the last frame
        app.reload_data();
        app.toasts.prune();
    }

    info!("Dashboard stopped");
    Ok(())
}

/// Fetch the reading list once, log its alerts and write the export files
fn export_to_dir(args: &Args, settings: &Settings, dir: &Path) -> Result<()> {
    let readings: Vec<Reading> = match args.file {
        Some(ref path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse {}", path.display()))?
        }
        None => {
            let client = ApiClient::new(&settings.api)?;
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(client.fetch_readings())
                .with_context(|| format!("Failed to fetch {}", settings.api.readings_url))?
        }
    };

    notify_latest(&readings, &settings.alerts, &mut LogNotifier);

    let tz = settings.history.tz()?;
    for format in args.format.formats() {
        let path = export::export(&readings, format, dir, tz)?;
        println!("Exported {} readings to: {}", readings.len(), path.display());
    }
    Ok(())
}
