//! CLI entry point for the lectern retrieval backend (for dev and testing).

use std::path::PathBuf;

use clap::Parser;
use lectern_core::{app_data_dir, load_config, set_corpus_root, status, Retriever};

#[derive(Parser)]
#[command(name = "lectern")]
#[command(about = "lectern: retrieval over a lecture corpus")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Show backend status and the active configuration (for dev).
    Status,
    /// Show where lectern stores its config and corpus database.
    DataDir,
    /// Ingest a corpus directory: chunk, embed, and (re)build the store.
    Ingest {
        /// Root directory of plain-text lecture files.
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },
    /// Retrieve the passages most relevant to a question.
    Query {
        /// The question to retrieve context for.
        question: String,
        /// How many passages to return (default from config).
        #[arg(short)]
        k: Option<usize>,
        /// Print the assembled context block instead of one passage per line.
        #[arg(long)]
        context: bool,
        /// Print results as a JSON array.
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Status) {
        Commands::Status => {
            let config = load_config();
            println!("lectern backend");
            println!("  core: {}", status());
            println!("  embed model: {}", config.embed_model);
            println!("  storage: {:?}", config.storage);
            if let Some(root) = &config.corpus_root {
                println!("  corpus root: {}", root);
            }
            match Retriever::from_config(&config) {
                Ok(r) => match r.stored_passages() {
                    Ok(n) => println!("  stored passages: {}", n),
                    Err(e) => eprintln!("  store error: {}", e),
                },
                Err(e) => eprintln!("  setup error: {}", e),
            }
        }
        Commands::DataDir => match app_data_dir() {
            Some(p) => println!("{}", p.display()),
            None => eprintln!("Could not determine app data directory."),
        },
        Commands::Ingest { path } => {
            let config = load_config();
            let mut retriever = match Retriever::from_config(&config) {
                Ok(r) => r,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    return;
                }
            };
            match retriever.ingest(&path).await {
                Ok(report) => {
                    if let Err(e) = set_corpus_root(&path) {
                        eprintln!("Warning: could not persist corpus root: {}", e);
                    }
                    println!(
                        "Ingested {} passage(s) from {} document(s) under {}",
                        report.passages,
                        report.documents,
                        path.display()
                    );
                }
                Err(e) => eprintln!("Error: {}", e),
            }
        }
        Commands::Query {
            question,
            k,
            context,
            json,
        } => {
            let config = load_config();
            let k = k.unwrap_or(config.top_k);
            let retriever = match Retriever::from_config(&config) {
                Ok(r) => r,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    return;
                }
            };
            if context {
                match retriever.retrieve_context(&question, k).await {
                    Ok(ctx) => println!("{}", ctx),
                    Err(e) => eprintln!("Error: {}", e),
                }
            } else {
                match retriever.retrieve(&question, k).await {
                    Ok(passages) if json => match serde_json::to_string_pretty(&passages) {
                        Ok(s) => println!("{}", s),
                        Err(e) => eprintln!("Error: {}", e),
                    },
                    Ok(passages) => {
                        if passages.is_empty() {
                            eprintln!("No passages stored; run `lectern ingest <PATH>` first.");
                        }
                        for (i, p) in passages.iter().enumerate() {
                            println!("{}. {}", i + 1, p);
                        }
                    }
                    Err(e) => eprintln!("Error: {}", e),
                }
            }
        }
    }
}
