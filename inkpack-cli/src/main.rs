//! inkpack CLI - pack and compress integer streams in ISF bit layout

mod commands;

use clap::{Parser, Subcommand};
use inkpack_core::codec::CodecConfig;
use serde::Serialize;
use std::fmt::Display;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "inkpack", version, about = "ISF bit stream packing tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pack unsigned values with a fixed bit width
    Pack {
        /// Bit width of every value (1-32)
        #[arg(short, long)]
        width: u32,
        /// Store each value least significant byte first
        #[arg(long)]
        reverse: bool,
        /// Output file
        #[arg(short, long)]
        output: PathBuf,
        /// Values to pack
        #[arg(required = true)]
        values: Vec<u32>,
    },
    /// Unpack values written by `pack`
    Unpack {
        /// Packed file
        file: PathBuf,
        /// Bit width of every value (1-32)
        #[arg(short, long)]
        width: u32,
        /// Values were packed least significant byte first
        #[arg(long)]
        reverse: bool,
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
    /// Compress signed packet data
    Compress {
        /// Output file
        #[arg(short, long)]
        output: PathBuf,
        /// Never apply the delta-delta transform
        #[arg(long)]
        no_delta: bool,
        /// Reject data that needs more bits per value
        #[arg(long, default_value_t = 32)]
        max_bits: u8,
        /// Values to compress
        #[arg(required = true, allow_negative_numbers = true)]
        values: Vec<i32>,
    },
    /// Decompress a file written by `compress`
    Decompress {
        /// Compressed file
        file: PathBuf,
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Pack {
            width,
            reverse,
            output,
            values,
        } => commands::pack(&values, width, reverse, &output)?,
        Commands::Unpack {
            file,
            width,
            reverse,
            json,
        } => print_report(&commands::unpack(&file, width, reverse)?, json)?,
        Commands::Compress {
            output,
            no_delta,
            max_bits,
            values,
        } => {
            let config = CodecConfig {
                delta_delta: !no_delta,
                max_bit_count: max_bits,
            };
            debug!("Codec config: {:?}", config);
            commands::compress(&values, config, &output)?
        }
        Commands::Decompress { file, json } => {
            print_report(&commands::decompress(&file)?, json)?
        }
    }

    Ok(())
}

fn print_report<T: Serialize + Display>(report: &commands::Report<T>, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        for value in &report.values {
            println!("{}", value);
        }
    }
    Ok(())
}
