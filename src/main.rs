//! crychunk CLI - Command-line tool for inspecting CryEngine chunk files.
//!
//! This is the main entry point for the crychunk command-line application.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crychunk::prelude::*;

/// crychunk - CryEngine chunk-file inspection tool
#[derive(Parser)]
#[command(name = "crychunk")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the header summary of a chunk file
    Info {
        /// Path to the chunk file
        #[arg(env = "CRYCHUNK_INPUT")]
        input: PathBuf,
    },

    /// List the chunk table of a chunk file
    Chunks {
        /// Path to the chunk file
        #[arg(env = "CRYCHUNK_INPUT")]
        input: PathBuf,

        /// Keep legacy per-chunk headers instead of stripping them
        #[arg(short, long)]
        raw: bool,

        /// Print JSON instead of a table
        #[arg(short, long)]
        json: bool,
    },

    /// Write every chunk payload to a separate file
    Extract {
        /// Path to the chunk file
        #[arg(env = "CRYCHUNK_INPUT")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long)]
        output: PathBuf,

        /// Keep legacy per-chunk headers instead of stripping them
        #[arg(short, long)]
        raw: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Info { input } => {
            cmd_info(&input)?;
        }
        Commands::Chunks { input, raw, json } => {
            cmd_chunks(&input, raw, json)?;
        }
        Commands::Extract { input, output, raw } => {
            cmd_extract(&input, &output, raw)?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn,crychunk=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn open(path: &Path, raw: bool, load_data: bool) -> Result<ChunkFile> {
    let options = ReadOptions {
        strip_legacy_headers: !raw,
        load_data,
    };
    ChunkFile::open_with(path, options)
        .with_context(|| format!("Failed to read chunk file {}", path.display()))
}

fn cmd_info(input: &Path) -> Result<()> {
    let file = open(input, false, false)?;
    let info = file.info();

    println!("File:         {}", input.display());
    println!("Version:      {:#x}", info.version.as_u32());
    if let Some(file_type) = info.file_type {
        println!("File type:    {:?}", file_type);
    }
    println!("Chunk table:  offset {}", info.chunk_table_offset);
    println!("Chunks:       {}", info.chunk_count);

    let swapped = file.chunks().iter().filter(|c| c.needs_byte_swap).count();
    if swapped > 0 {
        println!("Byte-swapped: {}", swapped);
    }

    Ok(())
}

fn cmd_chunks(input: &Path, raw: bool, json: bool) -> Result<()> {
    let file = open(input, raw, false)?;

    if json {
        let value = serde_json::json!({
            "info": file.info(),
            "chunks": file.chunks(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!(
        "{:>8} {:<26} {:>8} {:>12} {:>12} {:>5}",
        "id", "type", "version", "offset", "size", "swap"
    );
    for chunk in file.chunks() {
        println!(
            "{:>8} {:<26} {:>#8x} {:>12} {:>12} {:>5}",
            chunk.chunk_id,
            chunk.chunk_type.to_string(),
            chunk.chunk_version,
            chunk.file_offset,
            chunk.size,
            if chunk.needs_byte_swap { "yes" } else { "no" }
        );
    }

    Ok(())
}

fn cmd_extract(input: &Path, output: &Path, raw: bool) -> Result<()> {
    let start = Instant::now();
    let file = open(input, raw, true)?;
    info!(chunks = file.len(), elapsed = ?start.elapsed(), "loaded chunk file");

    fs::create_dir_all(output)?;

    let pb = ProgressBar::new(file.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );

    for chunk in file.chunks() {
        let name = format!("{}_{}.bin", chunk.chunk_id, chunk.chunk_type);
        let data = chunk.data().unwrap_or_default();
        fs::write(output.join(&name), data).with_context(|| format!("Failed to write {}", name))?;
        pb.inc(1);
    }

    pb.finish_with_message("Done");
    println!("Extracted {} chunks in {:?}", file.len(), start.elapsed());

    Ok(())
}
