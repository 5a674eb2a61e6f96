//! membuff CLI
//!
//! Command-line interface for packing, unpacking and inspecting byte buffers.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use membuff::{Buff, Compression, Config, Result};
use tracing_subscriber::{fmt, EnvFilter};

/// membuff CLI
#[derive(Parser, Debug)]
#[command(name = "membuff-cli")]
#[command(about = "Inspect and convert buffers through the compression envelope")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compress a file
    Pack {
        /// Raw input file
        input: PathBuf,

        /// Compressed output file
        output: PathBuf,

        /// Compression kind (none, gzip, zlib)
        #[arg(short, long, default_value = "gzip")]
        compression: Compression,

        /// Compression level (0-9)
        #[arg(short, long, default_value = "6")]
        level: u32,
    },

    /// Decompress a file
    Unpack {
        /// Compressed input file
        input: PathBuf,

        /// Raw output file
        output: PathBuf,

        /// Compression kind (none, gzip, zlib)
        #[arg(short, long, default_value = "gzip")]
        compression: Compression,
    },

    /// Print a range of a file as hex
    Slice {
        /// Input file
        input: PathBuf,

        /// Start offset
        #[arg(short, long, default_value = "0")]
        offset: u64,

        /// Number of bytes (0 = rest of the file)
        #[arg(short = 'n', long, default_value = "0")]
        limit: u64,

        /// Compression kind of the input (none, gzip, zlib)
        #[arg(short, long, default_value = "none")]
        compression: Compression,
    },

    /// Print length and CRC32 of a file's contents
    Info {
        /// Input file
        input: PathBuf,

        /// Compression kind of the input (none, gzip, zlib)
        #[arg(short, long, default_value = "none")]
        compression: Compression,
    },
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,membuff=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run(args.command) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Pack {
            input,
            output,
            compression,
            level,
        } => {
            let config = Config::builder()
                .compression(compression)
                .compression_level(level)
                .build();

            let buff = Buff::from_reader(BufReader::new(File::open(&input)?))?;
            let mut writer = BufWriter::new(File::create(&output)?);
            let n = buff.store(&config, &mut writer)?;
            writer.flush()?;
            tracing::info!("Packed {} bytes into {}", n, output.display());
        }

        Commands::Unpack {
            input,
            output,
            compression,
        } => {
            let buff = Buff::read_archive(compression, BufReader::new(File::open(&input)?))?;
            let mut writer = BufWriter::new(File::create(&output)?);
            let n = buff.write_to(&mut writer)?;
            writer.flush()?;
            tracing::info!("Unpacked {} bytes into {}", n, output.display());
        }

        Commands::Slice {
            input,
            offset,
            limit,
            compression,
        } => {
            let shared = Buff::read_archive(compression, BufReader::new(File::open(&input)?))?
                .share();
            let mut view = shared.range(offset, limit)?;

            let size = view.remaining().min(shared.len()? as u64) as usize;
            let mut bytes = vec![0u8; size];
            let n = view.read(&mut bytes)?;

            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            for (row, chunk) in bytes[..n].chunks(16).enumerate() {
                let hex: Vec<String> = chunk.iter().map(|b| format!("{:02x}", b)).collect();
                writeln!(out, "{:08x}  {}", offset + (row * 16) as u64, hex.join(" "))?;
            }
        }

        Commands::Info { input, compression } => {
            let buff = Buff::read_archive(compression, BufReader::new(File::open(&input)?))?;
            println!("length:   {}", buff.len());
            println!("crc32:    {:08x}", buff.checksum());
        }
    }

    Ok(())
}
