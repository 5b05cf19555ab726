//! quizbook CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(
    name = "quizbook",
    version,
    about = "Multiple-choice quizzes and student score records"
)]
struct Cli {
    /// Directory holding students.json and quizzes.json
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Do not add the demo quizzes and students to an empty system
    #[arg(long, global = true)]
    no_seed: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive menu (the default)
    Menu,

    /// Attempt a quiz, reading answers from stdin
    Attempt {
        /// Student ID
        #[arg(long)]
        student: u64,

        /// Quiz title
        #[arg(long)]
        quiz: String,
    },

    /// Print every student's results
    Report {
        /// Output format: table, text, json, markdown
        #[arg(long, default_value = "table")]
        format: String,

        /// Also write the report as JSON to this file
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// List available quizzes
    Quizzes,

    /// Register a new student
    Register {
        /// Student name
        #[arg(long)]
        name: String,
    },

    /// Import quizzes from a .toml file or directory
    Import {
        /// Path to quiz file or directory
        #[arg(long)]
        file: PathBuf,
    },

    /// Validate quiz TOML files without importing them
    Validate {
        /// Path to quiz file or directory
        #[arg(long)]
        file: PathBuf,
    },

    /// Create starter config and example quiz file
    Init,
}

/// Options shared by every command that opens the quiz system.
pub struct Settings {
    pub data_dir: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub no_seed: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("quizbook_core=info,quizbook=info")),
        )
        .init();

    let cli = Cli::parse();
    let settings = Settings {
        data_dir: cli.data_dir,
        config: cli.config,
        no_seed: cli.no_seed,
    };

    let result = match cli.command.unwrap_or(Commands::Menu) {
        Commands::Menu => commands::menu::execute(&settings),
        Commands::Attempt { student, quiz } => commands::attempt::execute(&settings, student, quiz),
        Commands::Report { format, output } => {
            commands::report::execute(&settings, format, output)
        }
        Commands::Quizzes => commands::quizzes::execute(&settings),
        Commands::Register { name } => commands::register::execute(&settings, name),
        Commands::Import { file } => commands::import::execute(&settings, file),
        Commands::Validate { file } => commands::validate::execute(file),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
