// src/main.rs
// shardcast: erasure-coded file transfer.
// Entry point for the Command Line Interface.
// Wires the CLI to the pipeline and reports progress to the operator.

mod cli;

use crate::cli::{Cli, CodingOpts, Commands};
use shardcast::coder::ReedSolomonCoder;
use shardcast::config::PipelineConfig;
use shardcast::pipeline;
use shardcast::transport::LocalTransport;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};

fn build_coder(coding: &CodingOpts) -> Result<ReedSolomonCoder> {
    ReedSolomonCoder::new(coding.data, coding.coding)
        .map_err(|e| anyhow::anyhow!("Failed to initialize Reed-Solomon coder: {e}"))
}

fn build_config(coding: &CodingOpts, splits: &str, encoded: &str, decoded: &str) -> PipelineConfig {
    PipelineConfig {
        data_len: coding.data_len,
        data_shards: coding.data,
        coding_shards: coding.coding,
        splits_dir: PathBuf::from(splits),
        encoded_dir: PathBuf::from(encoded),
        decoded_dir: PathBuf::from(decoded),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // CONCURRENCY CONFIGURATION
    rayon::ThreadPoolBuilder::new()
        .num_threads(cli.jobs)
        .build_global()
        .map_err(|e| anyhow::anyhow!("Failed to configure thread pool: {}", e))?;

    let num_threads = rayon::current_num_threads();
    if num_threads == 1 {
        println!("[i] Mode: SEQUENTIAL (Single-threaded)");
    } else {
        println!("[i] Mode: PARALLEL ({} threads active)", num_threads);
    }

    match &cli.command {
        Commands::Encode { input, encoded_dir, splits_dir, coding } => {
            let config = build_config(coding, splits_dir, encoded_dir, "decoded");
            let coder = build_coder(coding)?;
            println!("[*] Encoding {} (RS {}+{}, block {} bytes)...",
                     input, coding.data, coding.coding, config.block_len());

            let meta = pipeline::encode_file(&config, &coder, Path::new(input))
                .context(format!("Failed to encode {}", input))?;

            println!("[✔] Encoding Finished.");
            println!("--------------------------------------------------");
            println!("    Blocks Created:  {}", meta.num_blocks);
            println!("    Padding:         {} bytes", meta.padding_bytes);
            println!("    Shard Tree:      {}", config.encoded_dir.join(&meta.original_name).display());
            println!("--------------------------------------------------");
        }

        Commands::Send { input, dest, encoded_dir, splits_dir, coding } => {
            let config = build_config(coding, splits_dir, encoded_dir, "decoded");
            let coder = build_coder(coding)?;
            let transport = LocalTransport::new(&config.encoded_dir, dest);
            println!("[*] Encoding and sending {} to {}...", input, dest);

            let report = pipeline::send_file(&config, &coder, &transport, Path::new(input))
                .context(format!("Failed to send {}", input))?;

            println!("[✔] Transfer Finished.");
            println!("--------------------------------------------------");
            println!("    Input:           {} bytes", report.size_bytes);
            println!("    Blocks Sent:     {}", report.num_blocks);
            println!("    Padding:         {} bytes", report.padding_bytes);
            println!("    Delivered To:    {}", dest);
            println!("--------------------------------------------------");
        }

        Commands::Decode { decoded_dir, name, coding } => {
            let config = build_config(coding, "splits", "encoded", decoded_dir);
            let coder = build_coder(coding)?;
            println!("[*] Reconstructing from shards in {}...", decoded_dir);

            let report = match name {
                Some(name) => pipeline::reconstruct_file(&config, &coder, name),
                None => {
                    let transport = LocalTransport::new(&config.encoded_dir, &config.decoded_dir);
                    pipeline::receive_file(&config, &coder, &transport)
                }
            }
            .context("Failed to reconstruct file")?;

            println!("[✔] Restoration Complete.");
            println!("--------------------------------------------------");
            println!("    Blocks:          {}", report.num_blocks);
            println!("    Output:          {} ({} bytes)", report.output_path.display(), report.size_bytes);
            println!("--------------------------------------------------");
        }

        Commands::Damage { name, decoded_dir, dropout } => {
            let config = PipelineConfig {
                decoded_dir: PathBuf::from(decoded_dir),
                ..PipelineConfig::default()
            };
            println!("[*] Simulating {}% shard dropout for {}...", dropout, name);

            let (total, dropped) = pipeline::damage_file(&config, name, f64::from(*dropout) / 100.0)
                .context(format!("Failed to damage {}", name))?;

            println!("[!] Dropped {} of {} shards in {}.", dropped, total, config.decoded_dir.join(name).display());
        }
    }
    Ok(())
}
