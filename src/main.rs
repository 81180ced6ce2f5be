use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod app;

use app::{App, DemoOptions};
use stepper::config::Config;
use stepper::logging;
use stepper::menu::{MenuStyle, StepperType};
use stepper::ui::install_panic_hook;

#[derive(Parser)]
#[command(name = "stepper")]
#[command(about = "Wizard step indicator demo for the terminal")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file path
    #[arg(short, long)]
    config: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Stepper type, overriding the config
    #[arg(short = 't', long = "type", value_enum)]
    kind: Option<StepperType>,

    /// Fleet duration in milliseconds, overriding the config
    #[arg(long)]
    fleet_duration: Option<u64>,

    /// Run without the in-memory route stack
    #[arg(long)]
    no_nav: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the effective configuration as TOML
    Config {
        /// Also write it to this path
        #[arg(long)]
        save: Option<PathBuf>,
    },

    /// List the stepper types and their default sizes
    Types,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (needed for logging setup)
    let config = Config::load(cli.config.as_deref())?;

    let is_tui_mode = cli.command.is_none();
    let logging_handle = logging::init_logging(&config, is_tui_mode, cli.debug)?;

    match cli.command {
        Some(Commands::Config { save }) => {
            cmd_config(&config, save)?;
        }
        Some(Commands::Types) => {
            cmd_types();
        }
        None => {
            let options = DemoOptions {
                kind: cli.kind,
                fleet_duration_ms: cli.fleet_duration,
                navigation: !cli.no_nav,
            };
            run_tui(config, &options, logging_handle.log_file_path)?;
        }
    }

    Ok(())
}

fn run_tui(config: Config, options: &DemoOptions, log_file_path: Option<PathBuf>) -> Result<()> {
    install_panic_hook();

    let mut app = App::new(config, options)?;
    let result = app.run();

    // Print log file path on exit if logs were written
    if let Some(log_path) = log_file_path {
        if let Ok(metadata) = log_path.metadata() {
            if metadata.len() > 0 {
                eprintln!("Session log: {}", log_path.display());
            }
        }
    }

    result
}

fn cmd_config(config: &Config, save: Option<PathBuf>) -> Result<()> {
    print!("{}", config.to_toml()?);
    if let Some(path) = save {
        config.save_to(&path)?;
        eprintln!("Saved to {}", path.display());
    }
    Ok(())
}

fn cmd_types() {
    println!("{:<14} {:>4} {:>6} {:>6}", "TYPE", "ID", "ICON", "TEXT");
    println!("{}", "─".repeat(33));
    for kind in StepperType::all() {
        println!(
            "{:<14} {:>#4x} {:>6} {:>6}",
            kind.as_str(),
            kind.identifier(),
            MenuStyle::default_icon_size(*kind),
            MenuStyle::default_text_size(*kind),
        );
    }
}
