mod config;
mod corpus;
mod error;
mod graph;
mod listing;
mod parser;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::Settings;

#[derive(Parser)]
#[command(name = "product_graph", about = "Build a product knowledge graph from saved product pages")]
struct Cli {
    /// Settings file (TOML); PRODUCT_GRAPH_* environment variables override it
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract every page in a folder and write the graph as JSON
    Build {
        /// Folder of saved product pages
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Output JSON file
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },
    /// Print the records extracted from a single page
    Inspect {
        file: PathBuf,
        /// Identifier to give the product
        #[arg(long, default_value = "1")]
        id: u32,
    },
    /// List product URLs (and their page file names) from a saved search-results page
    Links { file: PathBuf },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let mut settings = Settings::load(cli.config.as_deref()).context("Failed to load settings")?;

    let result = match cli.command {
        Commands::Build { input, output, pretty } => {
            if let Some(input) = input {
                settings.input_dir = input;
            }
            if let Some(output) = output {
                settings.output = output;
            }
            settings.pretty |= pretty;
            build(&settings)
        }
        Commands::Inspect { file, id } => {
            let records = corpus::extract_file(&file, id, &settings)?;
            println!("{}", serde_json::to_string_pretty(&records)?);
            Ok(())
        }
        Commands::Links { file } => links(&file, &settings),
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn build(settings: &Settings) -> anyhow::Result<()> {
    println!("Building graph from {}...", settings.input_dir.display());

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")?
            .progress_chars("#>-"),
    );

    let run = corpus::build_graph(&settings.input_dir, settings, &pb)?;
    run.graph.write(&settings.output, settings.pretty)?;
    run.stats.print();
    println!("Graph written to {}", settings.output.display());
    Ok(())
}

fn links(file: &Path, settings: &Settings) -> anyhow::Result<()> {
    let selectors = parser::fields::CompiledSelectors::compile(&settings.selectors)?;
    let html = corpus::read_document(file)?;
    let urls = listing::extract_product_urls(&html, &selectors, &settings.base_url);
    if urls.is_empty() {
        println!("No product links found.");
        return Ok(());
    }
    for url in &urls {
        println!("{}\t{}", url, listing::page_file_name(url));
    }
    println!("\n{} product links", urls.len());
    Ok(())
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
