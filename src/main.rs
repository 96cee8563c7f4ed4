use anyhow::Result;
use clap::{Parser, Subcommand};
use sales_advisor::commands::{advise_rep, ask_question, index_records, show_status};
use sales_advisor::config::{Config, run_interactive_config, show_config};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sales-advisor")]
#[command(about = "Retrieval-augmented sales advisory over CSV sales records")]
#[command(version)]
struct Cli {
    /// Directory holding config.toml and the default vector store
    #[arg(long, global = true, env = "SALES_ADVISOR_CONFIG_DIR")]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the CSV records, embed them and store them in the vector store
    Index {
        /// Sales rep CSV (defaults to data.sales_reps from the config)
        #[arg(long)]
        sales_reps: Option<PathBuf>,
        /// Customer CSV (defaults to data.customers from the config)
        #[arg(long)]
        customers: Option<PathBuf>,
    },
    /// Generate an advisory for a sales rep (default command)
    Advise {
        /// Sales rep id, e.g. REP_1; prompted for when omitted
        rep_id: Option<String>,
    },
    /// Ask a free-form sales question
    Ask {
        /// Question text; prompted for when omitted
        question: Option<String>,
    },
    /// Show service endpoints and vector store status
    Status,
    /// Configure embedding, LLM and retrieval settings
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config_dir = match cli.config_dir {
        Some(dir) => dir,
        None => Config::config_dir()?,
    };

    match cli.command.unwrap_or(Commands::Advise { rep_id: None }) {
        Commands::Config { show } => {
            if show {
                show_config(&config_dir)?;
            } else {
                run_interactive_config(&config_dir)?;
            }
        }
        Commands::Index {
            sales_reps,
            customers,
        } => {
            let config = Config::load(&config_dir)?;
            index_records(&config, sales_reps, customers).await?;
        }
        Commands::Advise { rep_id } => {
            let config = Config::load(&config_dir)?;
            advise_rep(&config, rep_id).await?;
        }
        Commands::Ask { question } => {
            let config = Config::load(&config_dir)?;
            ask_question(&config, question).await?;
        }
        Commands::Status => {
            let config = Config::load(&config_dir)?;
            show_status(&config).await?;
        }
    }

    Ok(())
}
