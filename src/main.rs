use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use owo_colors::OwoColorize;
use std::io::{IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use thiserror::Error;

use rpcdiag::error::{
    classify, get_user_message, to_display_string, ErrorCategory, RawTransportError,
    TransportCode, TRANSPORT_CODE_TABLE,
};
use rpcdiag::logging::init_logging;
use rpcdiag::settings::DiagnosticsConfig;

/// What `classify` prints
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum OutputFormat {
    /// The message to show an end user
    #[default]
    User,
    /// The technical rendering used in logs
    Display,
    /// The classified error as JSON
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "rpcdiag")]
#[command(version)]
#[command(about = "Classify remote call errors and route diagnostics")]
struct Cli {
    /// Diagnostics configuration file (TOML)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Disable colors (also respects NO_COLOR environment variable)
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Classify a JSON error object read from FILE or stdin
    Classify {
        /// File holding the error object (defaults to stdin)
        file: Option<PathBuf>,

        /// Output format
        #[arg(long, short = 'f', default_value = "user", value_enum)]
        format: OutputFormat,

        /// Also write the error to the configured diagnostic sinks
        #[arg(long)]
        log: bool,
    },
    /// List transport codes and the category each maps to
    Codes,
}

/// Errors reading the error object to classify.
#[derive(Debug, Error)]
enum InputError {
    #[error("failed to read {0}: {1}")]
    Io(String, #[source] std::io::Error),

    #[error("invalid error object: {0}")]
    Json(#[from] serde_json::Error),
}

/// Exit code for unreadable or malformed input
const EXIT_INVALID_INPUT: u8 = 2;

fn read_input(file: Option<&Path>) -> Result<RawTransportError, InputError> {
    let text = match file {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|err| InputError::Io(path.display().to_string(), err))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|err| InputError::Io("stdin".to_string(), err))?;
            buf
        }
    };
    Ok(serde_json::from_str(&text)?)
}

fn paint_category(category: ErrorCategory, use_color: bool) -> String {
    if !use_color {
        return category.to_string();
    }
    match category {
        ErrorCategory::None => category.dimmed().to_string(),
        ErrorCategory::Connection | ErrorCategory::Unavailable => category.yellow().to_string(),
        ErrorCategory::Unauthorized => category.magenta().to_string(),
        ErrorCategory::Protocol => category.cyan().to_string(),
        ErrorCategory::Execution | ErrorCategory::Transmission => category.red().to_string(),
    }
}

fn print_codes(use_color: bool) {
    for code in TransportCode::ALL {
        let category = TRANSPORT_CODE_TABLE
            .iter()
            .find(|mapping| mapping.transport == code)
            .map(|mapping| mapping.category)
            .unwrap_or(ErrorCategory::None);
        println!(
            "{:>3}  {:<20} {}",
            code.code(),
            code.name(),
            paint_category(category, use_color)
        );
    }
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let settings = match DiagnosticsConfig::load_or_default(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("error: {}", err);
            return Ok(ExitCode::FAILURE);
        }
    };
    init_logging(settings.logging_config().with_verbosity(cli.verbose));

    let use_color =
        !cli.no_color && std::env::var("NO_COLOR").is_err() && std::io::stdout().is_terminal();

    match cli.command {
        Commands::Codes => {
            print_codes(use_color);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Classify { file, format, log } => {
            let raw = match read_input(file.as_deref()) {
                Ok(raw) => raw,
                Err(err) => {
                    eprintln!("error: {}", err);
                    return Ok(ExitCode::from(EXIT_INVALID_INPUT));
                }
            };

            let classified = classify(&raw);
            if log {
                settings.build_debug().log_error(&classified);
            }

            match format {
                OutputFormat::User => println!("{}", get_user_message(&classified)),
                OutputFormat::Display => {
                    let rendered = to_display_string(&classified);
                    if rendered.ends_with('\n') {
                        print!("{}", rendered);
                    } else {
                        println!("{}", rendered);
                    }
                }
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&classified)?);
                }
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}
