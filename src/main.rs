use anyhow::{Context, Result};
use lore_radio::app::RadioApp;
use lore_radio::config::{self, Config};
use lore_radio::menu::Menu;
use lore_radio::player::Player;
use std::io;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    init_logging();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let base = config::base_dir();
    let config = Config::load_from(&base)
        .with_context(|| format!("failed to load configuration from {}", base.display()))?;

    let player = Player::new().context("failed to initialise audio")?;
    let mut app = RadioApp::open(&config, player).context("failed to load radio")?;

    app.resume_last();

    let stdin = io::stdin();
    let mut menu = Menu::new(stdin.lock(), io::stdout(), config.clear_screen);
    menu.run(&mut app).context("failed to save state")?;
    Ok(())
}

fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .with_writer(io::stderr)
        .init();
}
