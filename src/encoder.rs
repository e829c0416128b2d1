mod cli;

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, ensure};
use clap::Parser;
use log::{error, info};

use huffman_coding::{
    FrequencyTable, build_code_table, build_huffman_tree, decode, encode, write_table,
};

use crate::cli::{FileSymbol, SymbolKind, write_bitstream};

/// Huffman-encode a file into a bitstream and a code table.
#[derive(Parser, Debug)]
#[command(name = "encode", version)]
struct Args {
    /// File to encode.
    input: PathBuf,

    /// Where to write the bitstream.
    #[arg(short, long, default_value = "compressed.bin")]
    output: PathBuf,

    /// Where to write the code table.
    #[arg(short, long, default_value = "codes.txt")]
    codes: PathBuf,

    #[arg(short, long, value_enum, default_value_t = SymbolKind::Bytes)]
    symbols: SymbolKind,

    /// Write the bitstream as '0'/'1' text instead of packed bytes.
    #[arg(long)]
    text: bool,

    /// Decode the result again and check it matches the input.
    #[arg(long)]
    verify: bool,
}

fn encode_file<S: FileSymbol>(args: &Args) -> Result<()> {
    info!("Encoding {} as {:?}", args.input.display(), args.symbols);

    let raw_data = fs::read(&args.input)
        .with_context(|| format!("cannot read {}", args.input.display()))?;
    let original_len = raw_data.len() as u64;
    let symbols = S::from_raw(raw_data)?;

    let freq: FrequencyTable<S> = symbols.iter().cloned().collect();
    let tree = build_huffman_tree(&freq)?;
    let (table, _) = build_code_table(&tree);
    let bits = encode(&symbols, &table)?;

    let codes_file = File::create(&args.codes)
        .with_context(|| format!("cannot create {}", args.codes.display()))?;
    write_table(&table, BufWriter::new(codes_file))?;
    let output_size = write_bitstream(&args.output, &bits, args.text)?;

    if args.verify {
        let decoded = decode(&bits, &tree)?;
        ensure!(decoded == symbols, "decoded data does not match the input");
        info!("Verification passed: {} symbols decoded back", decoded.len());
    }

    let avg_code_len = bits.len() as f64 / symbols.len() as f64;
    let ratio = 100.0 * (1.0 - (output_size as f64) / (original_len as f64));

    println!(
        "\r\n✅ Encoding successful.\n\
         📂  Input:       {} ({} bytes, {} symbols)\n\
         💾  Output:      {} ({} bytes, {} bits)\n\
         📖  Codes:       {} ({} distinct symbols)\n\
         ℹ️  Entropy:     {:.4} bits/symbol (average code {:.4} bits)\n\
         🗜️  Ratio:       {:.2}%",
        args.input.display(),
        original_len,
        symbols.len(),
        args.output.display(),
        output_size,
        bits.len(),
        args.codes.display(),
        table.len(),
        freq.entropy(),
        avg_code_len,
        ratio
    );
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let result = match args.symbols {
        SymbolKind::Bytes => encode_file::<u8>(&args),
        SymbolKind::Chars => encode_file::<char>(&args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
