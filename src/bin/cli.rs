use bloomguard::{
    Filter, GuardConfig, Verdict, common::bits2hr, compute_size,
    format_verdict, ingest::read_keys,
};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::{
    io::{self, BufWriter, Write},
    path::PathBuf,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a filter from known keys and check query keys against it
    Check {
        /// Delimited file with the known keys (first row is a header)
        #[arg(short, long)]
        known: PathBuf,

        /// Delimited file with the keys to check (first row is a header)
        #[arg(short, long)]
        queries: PathBuf,

        /// False positive rate (between 0 and 1), overrides BLOOMGUARD_FPR
        #[arg(short, long)]
        fpr: Option<f64>,

        /// Field delimiter, overrides BLOOMGUARD_DELIMITER
        #[arg(short, long)]
        delimiter: Option<char>,

        /// Print one JSON object per query key
        #[arg(long)]
        json: bool,
    },

    /// Show the filter size for an expected number of keys
    Size {
        /// Expected number of keys
        #[arg(short = 'n', long)]
        items: usize,

        /// False positive rate (between 0 and 1), overrides BLOOMGUARD_FPR
        #[arg(short, long)]
        fpr: Option<f64>,
    },
}

#[derive(Serialize)]
struct VerdictLine<'a> {
    key: &'a str,
    verdict: Verdict,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let env_config = GuardConfig::from_env()?;

    match cli.command {
        Commands::Check {
            known,
            queries,
            fpr,
            delimiter,
            json,
        } => {
            let fpr = fpr.unwrap_or(env_config.false_positive_rate);
            let delimiter = delimiter.unwrap_or(env_config.delimiter);

            let known_keys = read_keys(&known, delimiter)?;
            let filter = Filter::from_keys(&known_keys, fpr)?;
            let params = filter.params();
            info!(
                keys = known_keys.len(),
                bits = params.bit_vector_size,
                hashes = params.num_hashes,
                "filter ready"
            );

            let query_keys = read_keys(&queries, delimiter)?;
            let mut out = BufWriter::new(io::stdout().lock());
            let mut absent = 0usize;
            for key in &query_keys {
                let verdict = filter.check(key.as_bytes())?;
                if verdict.is_absent() {
                    absent += 1;
                }
                if json {
                    serde_json::to_writer(
                        &mut out,
                        &VerdictLine { key, verdict },
                    )?;
                    writeln!(out)?;
                } else {
                    writeln!(out, "{}", format_verdict(key, verdict))?;
                }
            }
            out.flush()?;

            info!(
                queries = query_keys.len(),
                absent,
                possibly_present = query_keys.len() - absent,
                "check finished"
            );
        }
        Commands::Size { items, fpr } => {
            let fpr = fpr.unwrap_or(env_config.false_positive_rate);
            let params = compute_size(items, fpr)?;

            println!("Bloom Filter Size:");
            println!("  Expected keys: {items}");
            println!("  False positive rate: {fpr}");
            println!("  Bit vector size: {}", params.bit_vector_size);
            println!("  Number of hash functions: {}", params.num_hashes);
            println!("  Memory: {}", bits2hr(params.bit_vector_size));
        }
    }

    Ok(())
}
