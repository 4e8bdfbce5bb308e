use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::runtime::Runtime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use marketscope::cli::commands::analyze::AnalyzeOptions;
use marketscope::pipeline::WorkflowStatus;

#[derive(Parser)]
#[command(name = "marketscope")]
#[command(
    version,
    about = "AI market research reports from web search and LLM analysis"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, global = true)]
    verbose: bool,

    #[arg(long, short, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Research a company and propose AI use cases with resources
    Analyze {
        #[arg(help = "Company name")]
        company: String,
        #[arg(long, help = "Skip resource collection, use canned resources")]
        fast: bool,
        #[arg(long = "ultra-fast", help = "Skip company research, use templates")]
        ultra_fast: bool,
        #[arg(long, short, help = "Root directory for reports/ and output/")]
        output: Option<PathBuf>,
        #[arg(long = "no-summary", help = "Do not write the markdown summary")]
        no_summary: bool,
        #[arg(
            long = "use-cases",
            help = "JSON file of {name, description} entries to map instead of generated use cases"
        )]
        use_cases: Option<PathBuf>,
    },

    /// Parse generated use-case text into records
    Parse {
        #[arg(help = "File holding use-case text")]
        file: PathBuf,
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            help = "Output format: text, json"
        )]
        format: String,
    },

    /// Find reference datasets for one use case
    Datasets {
        #[arg(help = "Use case title")]
        title: String,
        #[arg(long, short, default_value = "", help = "Use case description")]
        description: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration (merged from all sources)
    Show {
        #[arg(
            short = 'f',
            long,
            default_value = "toml",
            help = "Output format: toml, json, yaml"
        )]
        format: String,
    },
    /// Show configuration file paths
    Path,
    /// Write a default project configuration
    Init {
        #[arg(long, help = "Overwrite existing config")]
        force: bool,
    },
}

/// Set up panic handler for graceful error reporting
fn setup_panic_handler() {
    let default_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        eprintln!("\n\x1b[1;31m━━━ PANIC ━━━\x1b[0m");
        eprintln!("\x1b[31mMarketScope encountered an unexpected error:\x1b[0m");
        eprintln!("  {}", message);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "\x1b[90mLocation: {}:{}:{}\x1b[0m",
                location.file(),
                location.line(),
                location.column()
            );
        }
        eprintln!();

        // Call default hook for backtrace (if RUST_BACKTRACE=1)
        default_hook(panic_info);
    }));
}

fn main() -> ExitCode {
    setup_panic_handler();

    match run_cli() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("\x1b[31mError:\x1b[0m {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Analyze {
            company,
            fast,
            ultra_fast,
            output,
            no_summary,
            use_cases,
        } => {
            let rt = Runtime::new()?;
            let status = rt.block_on(marketscope::cli::commands::analyze::run(AnalyzeOptions {
                company,
                fast,
                ultra_fast,
                output,
                no_summary,
                use_cases,
            }))?;
            if status == WorkflowStatus::Failed {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Parse { file, format } => {
            marketscope::cli::commands::parse::run(&file, &format)?;
        }
        Commands::Datasets { title, description } => {
            let rt = Runtime::new()?;
            rt.block_on(marketscope::cli::commands::datasets::run(
                &title,
                &description,
            ))?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show { format } => {
                marketscope::cli::commands::config::show(&format)?;
            }
            ConfigAction::Path => {
                marketscope::cli::commands::config::path()?;
            }
            ConfigAction::Init { force } => {
                marketscope::cli::commands::config::init(force)?;
            }
        },
    }

    Ok(ExitCode::SUCCESS)
}
