//! slidegrade CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "slidegrade",
    version,
    about = "Rubric grader for presentation documents"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score one document against an exam
    Score {
        /// Path to .toml or .json exam definition
        #[arg(long)]
        exam: PathBuf,

        /// Document snapshot (.json)
        #[arg(long)]
        document: PathBuf,

        /// Grade a single question instead of the whole exam
        #[arg(long)]
        question: Option<String>,

        /// Output format: text, json, markdown
        #[arg(long, default_value = "text")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Run a single knowledge-point check
    Detect {
        /// Document snapshot (.json)
        #[arg(long)]
        document: PathBuf,

        /// Knowledge type tag or display name
        #[arg(long)]
        knowledge_type: String,

        /// Parameter as Name=Value (repeatable)
        #[arg(long = "param", value_name = "NAME=VALUE")]
        params: Vec<String>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Score many documents concurrently and write a report
    Batch {
        /// Path to .toml or .json exam definition
        #[arg(long)]
        exam: PathBuf,

        /// Document snapshots or directories of them
        #[arg(required = true)]
        documents: Vec<PathBuf>,

        /// Max concurrent documents (overrides config)
        #[arg(long)]
        parallelism: Option<usize>,

        /// Output directory
        #[arg(long, default_value = "./slidegrade-results")]
        output: PathBuf,

        /// Output format: json, markdown, all
        #[arg(long, default_value = "json")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate an exam definition
    Validate {
        /// Path to .toml or .json exam definition
        #[arg(long)]
        exam: PathBuf,
    },

    /// Create starter config, example exam and example document
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("slidegrade=info")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Score {
            exam,
            document,
            question,
            format,
            config,
        } => commands::score::execute(exam, document, question, format, config),
        Commands::Detect {
            document,
            knowledge_type,
            params,
            format,
            config,
        } => commands::detect::execute(document, knowledge_type, params, format, config),
        Commands::Batch {
            exam,
            documents,
            parallelism,
            output,
            format,
            config,
        } => commands::batch::execute(exam, documents, parallelism, output, format, config).await,
        Commands::Validate { exam } => commands::validate::execute(exam),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
