pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "flowbot",
    about = "Configuration-driven conversational bot engine",
    after_help = "Examples:\n  flowbot validate --config bot.json\n  flowbot chat --config bot.json --database-url sqlite://bot.db"
)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        default_value = "info",
        help = "Log level (trace, debug, info, warn, error)"
    )]
    log_level: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Parse a bot definition and run every configuration check")]
    Validate {
        #[arg(long, help = "Path to the bot definition JSON")]
        config: PathBuf,
    },
    #[command(about = "Run the bot interactively on stdin/stdout")]
    Chat {
        #[arg(long, help = "Path to the bot definition JSON")]
        config: PathBuf,
        #[arg(long, help = "Sqlite url for jdbc states, e.g. sqlite://bot.db")]
        database_url: Option<String>,
    },
}

pub async fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    match cli.command {
        Command::Validate { config } => {
            let result = commands::validate::run(&config);
            println!("{}", result.output);
            ExitCode::from(result.exit_code)
        }
        Command::Chat { config, database_url } => {
            match commands::chat::run(&config, database_url.as_deref()).await {
                Ok(()) => ExitCode::SUCCESS,
                Err(error) => {
                    eprintln!("{error:#}");
                    ExitCode::FAILURE
                }
            }
        }
    }
}

fn init_logging(level: &str) {
    let level = level.parse::<tracing::Level>().unwrap_or(tracing::Level::INFO);
    tracing_subscriber::fmt().with_target(false).with_max_level(level).compact().init();
}
