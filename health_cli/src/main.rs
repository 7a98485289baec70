mod menu;
mod render;

use clap::Parser;
use health_core::{Config, Result, Tracker};
use menu::Session;
use render::Palette;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "health-alert")]
#[command(about = "Personal health symptom tracker", long_about = None)]
struct Cli {
    /// Override data directory
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Read configuration from this file instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

fn main() -> ExitCode {
    // Initialize logging
    health_core::logging::init();

    let cli = Cli::parse();
    let no_color = cli.no_color;

    // Colors stay on for config errors unless stderr says otherwise
    let (config_color, result) = match load_config(&cli) {
        Ok(config) => (config.ui.color, run(cli, config)),
        Err(e) => (true, Err(e)),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            let palette = Palette {
                color: config_color && !no_color && io::stderr().is_terminal(),
            };
            let _ = render::fatal(&mut io::stderr().lock(), palette, &e);
            ExitCode::FAILURE
        }
    }
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(data_dir) = &cli.data_dir {
        config.data.data_dir = data_dir.clone();
    }
    Ok(config)
}

fn run(cli: Cli, config: Config) -> Result<()> {
    tracing::debug!("Using data directory {:?}", config.data.data_dir);

    let tracker = Tracker::open(&config.data)?;

    let stdout = io::stdout();
    let palette = Palette {
        color: config.ui.color && !cli.no_color && stdout.is_terminal(),
    };

    Session::new(&tracker, io::stdin().lock(), stdout.lock())
        .with_palette(palette)
        .with_pause(config.ui.pause_after_action)
        .run()
}
