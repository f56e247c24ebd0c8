use clap::Parser;
use log::debug;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::process;

use recfloat::literal::{parse_literal, to_hex};
use recfloat::{
    ieee_to_recoded, ieee_to_recoded_with, recoded_to_ieee, recoded_to_recoded, ConvertError,
    ConvertResult, FormatRegistry,
};

/// recfloat - convert raw values between IEEE 754 and recoded float encodings
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Conversion to perform.
    #[arg(value_parser = ["recfntoieee", "ieeetorecfn", "widen"])]
    command: String,

    /// Values to convert, as hexadecimal literals (underscores allowed).
    #[arg(required = true)]
    values: Vec<String>,

    /// Source format label; defaults to recf65 for recfntoieee, f64 for
    /// ieeetorecfn and recf33 for widen.
    #[arg(long)]
    format: Option<String>,

    /// Destination format label for widen.
    #[arg(long, default_value = "recf65")]
    to: String,

    /// Fill infinity payload bits with pseudo-random values when encoding.
    #[arg(long)]
    random_payload: bool,

    /// Seed for --random-payload; unseeded runs draw from the OS.
    #[arg(long)]
    seed: Option<u64>,
}

fn lookup_recoded(
    registry: &FormatRegistry,
    label: &str,
) -> ConvertResult<recfloat::RecodedFormat> {
    registry.recoded(label).ok_or_else(|| {
        ConvertError::InvalidArgument(format!("unknown recoded format label {:?}", label))
    })
}

fn convert_one(
    args: &Args,
    registry: &FormatRegistry,
    rng: &mut ChaCha8Rng,
    text: &str,
) -> ConvertResult<u128> {
    let value = parse_literal(text)?;
    match args.command.as_str() {
        "recfntoieee" => {
            let label = args.format.as_deref().unwrap_or("recf65");
            let format = lookup_recoded(registry, label)?;
            recoded_to_ieee(value, &format)
        }
        "ieeetorecfn" => {
            let label = args.format.as_deref().unwrap_or("f64");
            let format = registry.ieee(label).ok_or_else(|| {
                ConvertError::InvalidArgument(format!("unknown IEEE format label {:?}", label))
            })?;
            if args.random_payload {
                ieee_to_recoded_with(value, &format, rng)
            } else {
                ieee_to_recoded(value, &format)
            }
        }
        "widen" => {
            let label = args.format.as_deref().unwrap_or("recf33");
            let from = lookup_recoded(registry, label)?;
            let to = lookup_recoded(registry, &args.to)?;
            Ok(recoded_to_recoded(value, &from, &to))
        }
        _ => unreachable!("command is validated by clap"),
    }
}

fn main() {
    env_logger::init();

    let args = Args::parse();
    let registry = FormatRegistry::with_standard_formats();
    let mut rng = match args.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };

    let mut exit_code = 0;
    for text in &args.values {
        match convert_one(&args, &registry, &mut rng, text) {
            Ok(result) => {
                debug!("{} {} -> {:#x}", args.command, text, result);
                println!("{}", to_hex(result));
            }
            Err(e) => {
                exit_code = 1;
                eprintln!("{}: {}", text, e);
            }
        }
    }

    process::exit(exit_code);
}
