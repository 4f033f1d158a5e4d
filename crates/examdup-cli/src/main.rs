//! Examdup CLI - Duplicate exam question detection

mod commands;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::AppContext;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Examdup - Find previously uploaded exam questions in new scans
#[derive(Parser)]
#[command(name = "examdup")]
#[command(author = "Lalo Morales <lalomorales22@github.com>")]
#[command(version)]
#[command(about = "Detect duplicate exam questions in scanned images", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Keep config and data under this directory instead of the platform defaults
    #[arg(long, global = true, env = "EXAMDUP_HOME")]
    home: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize examdup (create config, data directories and database)
    Init,

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Manage exam codes
    #[command(subcommand)]
    Exam(ExamCommands),

    /// OCR question scans and store them under an exam code
    Upload {
        /// Exam code the questions belong to
        exam_code: String,

        /// Image file or directory of images
        path: PathBuf,
    },

    /// List stored questions for an exam code
    Questions {
        /// Exam code
        exam_code: String,
    },

    /// Show details of a stored question
    Show {
        /// Question ID (or unique prefix)
        id: String,
    },

    /// Compare a scan against stored questions
    Compare {
        /// Image to check
        image: PathBuf,

        /// Minimum similarity (0-1) for a match (default: from config)
        #[arg(short, long)]
        threshold: Option<f64>,

        /// Only compare against questions of this exam code
        #[arg(short, long)]
        exam: Option<String>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,

        /// Show per-metric scores for each match
        #[arg(long)]
        explain: bool,
    },

    /// Delete a stored question and its image
    Delete {
        /// Question ID (or unique prefix)
        id: String,
    },

    /// Show exam and question counts
    Stats,
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., matching.default_threshold)
        key: String,

        /// Value to set
        value: String,
    },
}

#[derive(Subcommand)]
enum ExamCommands {
    /// Register a new exam code
    Create {
        /// Exam code
        code: String,
    },

    /// List exam codes with question counts
    List,
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("examdup=debug,info"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("examdup=info,warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let ctx = AppContext::load(cli.home.as_deref())?;

    match cli.command {
        Commands::Init => commands::init::run(&ctx),
        Commands::Config(cmd) => match cmd {
            ConfigCommands::Show => commands::config::show(&ctx),
            ConfigCommands::Set { key, value } => commands::config::set(&ctx, &key, &value),
        },
        Commands::Exam(cmd) => match cmd {
            ExamCommands::Create { code } => commands::exam::create(&ctx, &code),
            ExamCommands::List => commands::exam::list(&ctx),
        },
        Commands::Upload { exam_code, path } => commands::upload::run(&ctx, &exam_code, &path),
        Commands::Questions { exam_code } => commands::questions::run(&ctx, &exam_code),
        Commands::Show { id } => commands::show::run(&ctx, &id),
        Commands::Compare {
            image,
            threshold,
            exam,
            json,
            explain,
        } => commands::compare::run(
            &ctx,
            &image,
            commands::compare::CompareOptions {
                threshold,
                exam,
                json,
                explain,
            },
        ),
        Commands::Delete { id } => commands::delete::run(&ctx, &id),
        Commands::Stats => commands::stats::run(&ctx),
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}
