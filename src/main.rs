use std::io;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::{info, warn};

use tokenboard::app::{App, InputMode, StatusLevel};
use tokenboard::config::{self, ApiConfig, Credential, CREDENTIAL_ENV};
use tokenboard::core::Coordinator;
use tokenboard::domain::{NetworkId, QueryKind};
use tokenboard::infrastructure::{
    Endpoints, Executor, FetchError, RuntimeBridge, RuntimeCommand, RuntimeEvent,
};
use tokenboard::logging;
use tokenboard::modules::export::ExportFormat;
use tokenboard::ui;

#[derive(Debug, Parser)]
#[command(
    name = "tokenboard",
    version,
    about = "Tokenboard: a terminal dashboard for The Graph Token API"
)]
struct Args {
    /// Network id (mainnet, bsc, base, arbitrum-one, optimism, matic)
    #[arg(long)]
    network: Option<NetworkId>,

    /// Initial wallet address (Balances, Transfers)
    #[arg(long)]
    wallet: Option<String>,

    /// Initial token address (Token Info, Holders, OHLC)
    #[arg(long)]
    token: Option<String>,

    /// Transfers page size (1-1000)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=1000))]
    page_size: Option<u32>,

    /// Token API base URL
    #[arg(long)]
    base_url: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init().context("failed to initialise logging")?;

    let config = config::load();
    let credential = Credential::from_env();
    if credential.is_none() {
        warn!("{CREDENTIAL_ENV} is not set; every fetch will fail");
    }

    let mut api = ApiConfig::from_config(&config, credential);
    if let Some(base_url) = args.base_url.as_deref() {
        api = api.with_base_url(base_url);
    }
    info!(base_url = %api.base_url, credential = ?api.credential, timeout = ?api.timeout, "starting");

    let executor = Executor::http(api.timeout).context("failed to build HTTP client")?;
    let page_size = args.page_size.unwrap_or_else(|| config.page_size());
    let coordinator = Coordinator::new(Endpoints::new(api), page_size);

    let mut app = App::new(
        coordinator,
        args.network.unwrap_or_else(|| config.network()),
        args.wallet.unwrap_or_else(|| config.wallet()),
        args.token.unwrap_or_else(|| config.token()),
    )
    .with_top_n(config.top_n());
    if !app.credential_configured {
        app.set_status(FetchError::MissingCredential.to_string(), StatusLevel::Warn);
    }

    let runtime = RuntimeBridge::new(executor).context("failed to start runtime worker")?;

    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = restore_terminal();
        logging::log_panic(panic);
        default_hook(panic);
    }));

    let mut stdout = io::stdout();
    enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app, runtime);

    restore_terminal()?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("{err:?}");
    }

    Ok(())
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
    runtime: RuntimeBridge,
) -> Result<()> {
    let tick_rate = Duration::from_millis(200);
    let mut last_tick = Instant::now();

    loop {
        pump_background(&mut app, &runtime);
        terminal.draw(|f| ui::draw(f, &app))?;
        if app.should_quit {
            let _ = runtime.send(RuntimeCommand::Shutdown);
            return Ok(());
        }

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                handle_key(&mut app, key);
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.on_tick();
            last_tick = Instant::now();
        }

        pump_background(&mut app, &runtime);
    }
}

fn pump_background(app: &mut App, runtime: &RuntimeBridge) {
    for event in runtime.poll_events() {
        app.apply_event(event);
    }

    for pending in app.take_pending_fetches() {
        let ticket = pending.ticket;
        if let Err(err) = runtime.send(pending) {
            // Settle locally so the tab does not stay loading forever
            app.apply_event(RuntimeEvent::Settled {
                ticket,
                outcome: Err(FetchError::TransportError {
                    cause: err.to_string(),
                }),
            });
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if app.help_open {
        if matches!(key.code, KeyCode::Char('?') | KeyCode::Char('q') | KeyCode::Esc) {
            app.help_open = false;
        }
        return;
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key),
        InputMode::Command => handle_command_mode(app, key),
        InputMode::EditAddress => handle_edit_mode(app, key),
    }
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    match (key.code, key.modifiers) {
        (KeyCode::Char('c'), mods) if mods.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true
        }
        (KeyCode::Char('q'), _) => app.should_quit = true,
        (KeyCode::Char('?'), _) => app.help_open = true,
        (KeyCode::Char(':'), _) => app.enter_command(),
        (KeyCode::Char(ch @ '1'..='5'), _) => {
            if let Some(kind) = QueryKind::from_shortcut(ch) {
                app.select_tab(kind);
            }
        }
        (KeyCode::Tab, _) => app.cycle_tab(true),
        (KeyCode::BackTab, _) => app.cycle_tab(false),
        (KeyCode::Char('['), _) => app.cycle_network(false),
        (KeyCode::Char(']'), _) => app.cycle_network(true),
        (KeyCode::Char('e'), _) => app.begin_edit(),
        (KeyCode::Char('f'), _) | (KeyCode::Enter, _) => app.fetch_active(),
        (KeyCode::Char('n'), _) => app.next_page(),
        (KeyCode::Char('p'), _) => app.previous_page(),
        (KeyCode::Char('j'), _) | (KeyCode::Down, _) => app.move_selection_down(),
        (KeyCode::Char('k'), _) | (KeyCode::Up, _) => app.move_selection_up(),
        (KeyCode::Char('y'), _) => handle_copy_to_clipboard(app),
        (KeyCode::Char('x'), _) => app.export(ExportFormat::Csv),
        (KeyCode::Char('X'), _) => app.export(ExportFormat::Json),
        _ => {}
    }
}

fn handle_command_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.exit_command(),
        KeyCode::Enter => app.apply_command(),
        KeyCode::Backspace => {
            app.command.input.pop();
        }
        KeyCode::Char(ch) => {
            if key.modifiers.contains(KeyModifiers::CONTROL) {
                return;
            }
            app.command.input.push(ch);
        }
        _ => {}
    }
}

fn handle_edit_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.cancel_edit(),
        KeyCode::Enter => app.apply_edit(),
        KeyCode::Backspace => {
            app.edit_buffer.pop();
        }
        KeyCode::Char(ch) => {
            if key.modifiers.contains(KeyModifiers::CONTROL) {
                return;
            }
            app.edit_buffer.push(ch);
        }
        _ => {}
    }
}

fn handle_copy_to_clipboard(app: &mut App) {
    use arboard::Clipboard;

    let Some(text) = app.selected_key() else {
        app.set_status("Nothing to copy", StatusLevel::Warn);
        return;
    };

    match Clipboard::new() {
        Ok(mut clipboard) => {
            if clipboard.set_text(&text).is_ok() {
                let shown: String = text.chars().take(20).collect();
                let ellipsis = if text.chars().count() > 20 { "..." } else { "" };
                app.set_status(format!("Copied: {shown}{ellipsis}"), StatusLevel::Info);
            } else {
                app.set_status("Failed to copy to clipboard", StatusLevel::Error);
            }
        }
        Err(_) => {
            app.set_status("Clipboard not available", StatusLevel::Error);
        }
    }
}
