use std::{
    error::Error,
    io::{self, stdin},
    process,
    sync::Arc,
};

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use qcoin::{
    app::{self, App},
    cli::{run_once, Cli, Settings},
    client::{RandomSourceClient, ReqwestTransport},
    engine::{DumpSource, EntropySource, FlipEngine},
    logging,
    runtime::{CrosstermEventSource, FixedTicker, Runner},
    session::SessionState,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::error;

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let settings = Settings::from(&cli);
    logging::init(settings.interactive);

    match &settings.load {
        Some(path) => launch(
            FlipEngine::new(DumpSource::new(path), settings.timeout),
            &settings,
        ),
        None => {
            let client =
                RandomSourceClient::new(ReqwestTransport::new()?, settings.endpoints.clone());
            launch(FlipEngine::new(client, settings.timeout), &settings)
        }
    }
}

fn launch<S: EntropySource>(
    engine: FlipEngine<S>,
    settings: &Settings,
) -> Result<(), Box<dyn Error>> {
    if settings.interactive {
        start_tui(engine, settings)
    } else {
        flip_once(engine, settings);
        Ok(())
    }
}

fn flip_once<S: EntropySource>(engine: FlipEngine<S>, settings: &Settings) {
    let stdout = io::stdout();
    if let Err(err) = run_once(&engine, settings, &mut stdout.lock()) {
        error!(error = %err, "flip aborted");
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn start_tui<S: EntropySource>(
    engine: FlipEngine<S>,
    settings: &Settings,
) -> Result<(), Box<dyn Error>> {
    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    let mut terminal = restore_on_err(
        execute!(stdout, EnterAlternateScreen)
            .and_then(|()| Terminal::new(CrosstermBackend::new(stdout))),
        || {
            let _ = disable_raw_mode();
        },
    )?;

    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());
    let session = SessionState::new(settings.source, settings.labels.clone());
    let mut app = App::new(session, Arc::new(engine), runner.sender());
    let outcome = app::run(&mut terminal, &mut app, &runner);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen,)?;
    terminal.show_cursor()?;

    // any flip still in flight is abandoned with the process
    outcome?;
    Ok(())
}

/// Run `restore` when terminal setup failed part way through.
fn restore_on_err<T, E>(result: Result<T, E>, restore: impl FnOnce()) -> Result<T, E> {
    if result.is_err() {
        restore();
    }
    result
}
