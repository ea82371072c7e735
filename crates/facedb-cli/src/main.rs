use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use facedb_core::{FaceRecord, OnnxFaceEncoder};
use facedb_store::FaceStore;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod config;
mod ingest;

use config::Config;

#[derive(Parser)]
#[command(name = "facedb", about = "Known-faces database: reset the store and ingest photos")]
struct Cli {
    /// SQLite database file (overrides FACEDB_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    /// Directory holding det_10g.onnx and w600k_r50.onnx (overrides FACEDB_MODEL_DIR)
    #[arg(long, global = true)]
    model_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Drop and recreate the known_faces table (deletes every stored face)
    Init,
    /// Store one face encoding per photo found in a directory
    Ingest {
        /// Directory of .jpg/.jpeg/.png photos of one person (not searched recursively)
        directory: PathBuf,
        /// Name to store every face under
        #[arg(short, long)]
        name: String,
    },
    /// List stored faces
    List {
        /// Only show faces stored under this name
        #[arg(short, long)]
        name: Option<String>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let mut config = Config::from_env();
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    if let Some(dir) = cli.model_dir {
        config.model_dir = dir;
    }

    match cli.command {
        Commands::Init => {
            let store = FaceStore::open(&config.db_path)?;
            store.reset_schema()?;
            store.close()?;
            println!("Face database created and reset: {}", config.db_path.display());
        }
        Commands::Ingest { directory, name } => {
            let mut encoder = OnnxFaceEncoder::load(
                &config.scrfd_model_path(),
                &config.arcface_model_path(),
                config.detection_threshold,
                config.inference_threads,
            )
            .with_context(|| format!("loading models from {}", config.model_dir.display()))?;

            let summary = ingest::run(&config.db_path, &mut encoder, &directory, &name)?;
            println!(
                "Done adding faces for {name}: {} stored, {} without a face, {} failed",
                summary.records_written, summary.files_skipped_no_face, summary.files_failed
            );
        }
        Commands::List { name, json } => {
            let store = FaceStore::open(&config.db_path)?;
            store.ensure_schema()?;
            let records = store.list(name.as_deref())?;
            store.close()?;

            if json {
                let rows: Vec<_> = records.iter().map(FaceRecord::summary).collect();
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else if records.is_empty() {
                println!("No faces stored");
            } else {
                println!("{:>6}  {:<24}  {:>6}", "ID", "NAME", "BYTES");
                for r in &records {
                    println!("{:>6}  {:<24}  {:>6}", r.id, r.name, r.encoding.len());
                }
            }
        }
    }

    Ok(())
}
