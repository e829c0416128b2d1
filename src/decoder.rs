mod cli;

use std::fs::{self, File};
use std::io::BufReader;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, error, info};

use huffman_coding::{Node, ReverseCodeTable, decode, read_table};

use crate::cli::{FileSymbol, SymbolKind, read_bitstream};

/// Decode a bitstream written by `encode`, using its code table.
#[derive(Parser, Debug)]
#[command(name = "decode", version)]
struct Args {
    /// Bitstream to decode.
    input: PathBuf,

    /// Code table written alongside the bitstream.
    codes: PathBuf,

    /// Where to write the decoded data.
    output: PathBuf,

    #[arg(short, long, value_enum, default_value_t = SymbolKind::Bytes)]
    symbols: SymbolKind,

    /// Read the bitstream as '0'/'1' text instead of packed bytes.
    #[arg(long)]
    text: bool,
}

fn decode_file<S: FileSymbol>(args: &Args) -> Result<()> {
    info!("--- Start Decoding ---");

    let codes_file = File::open(&args.codes)
        .with_context(|| format!("cannot open {}", args.codes.display()))?;
    let table: ReverseCodeTable<S> = read_table(BufReader::new(codes_file))
        .with_context(|| format!("cannot load code table {}", args.codes.display()))?;
    let tree = Node::from_codes(&table)?;
    debug!("Decode tree ready ({} symbols)", tree.leaf_count());

    let bits = read_bitstream(&args.input, args.text)?;
    let symbols = decode(&bits, &tree)?;
    let symbol_count = symbols.len();

    info!("Writing decoded output to file: {}", args.output.display());
    let decoded = S::to_raw(symbols);
    fs::write(&args.output, &decoded)
        .with_context(|| format!("cannot write {}", args.output.display()))?;

    println!(
        "\r\n✅ Decoding successful.\n\
         📂 Input file:  {} ({} bits)\n\
         📖 Codes:       {} ({} distinct symbols)\n\
         💾 Output file: {} ({} bytes, {} symbols)",
        args.input.display(),
        bits.len(),
        args.codes.display(),
        table.len(),
        args.output.display(),
        decoded.len(),
        symbol_count
    );

    info!("--- End ---");
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let result = match args.symbols {
        SymbolKind::Bytes => decode_file::<u8>(&args),
        SymbolKind::Chars => decode_file::<char>(&args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
