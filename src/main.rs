use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use log::debug;
use totp::{hotp, secret_bytes, Algorithm, Totp};

/// Generate a TOTP code from a base32 secret.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Base32-encoded secret, prompted for on stdin when omitted
    #[arg(short, long)]
    secret: Option<String>,

    /// Time step in seconds
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
    step: u64,

    /// Number of digits in the code
    #[arg(short, long, default_value_t = 6, value_parser = clap::value_parser!(u32).range(1..=9))]
    digits: u32,

    /// HMAC hash function: SHA1, SHA256 or SHA512
    #[arg(short, long, default_value_t = Algorithm::Sha1)]
    algorithm: Algorithm,

    /// Compute an HOTP code for this counter instead of using the clock
    #[arg(short, long)]
    counter: Option<u64>,

    /// Log debug output to stderr
    #[arg(long)]
    debug: bool,
}

fn prompt_secret() -> io::Result<String> {
    let mut stderr = io::stderr();
    write!(stderr, "Secret (base32): ")?;
    stderr.flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line)
}

fn run(cli: &Cli) -> Result<String> {
    let secret_text = match &cli.secret {
        Some(secret) if !secret.is_empty() => secret.clone(),
        _ => prompt_secret()?,
    };
    let secret = secret_bytes(&secret_text)?;

    let code = match cli.counter {
        Some(counter) => hotp(&secret, counter, cli.digits, cli.algorithm)?,
        None => {
            let totp = Totp::new(cli.step, cli.digits).with_algorithm(cli.algorithm);
            debug!("using {} second steps", totp.step);
            totp.code(&secret)?
        }
    };
    Ok(code)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut log_builder = env_logger::Builder::from_default_env();
    if cli.debug {
        log_builder.filter(None, log::LevelFilter::Debug);
    } else {
        log_builder.filter(None, log::LevelFilter::Error);
    }
    log_builder.target(env_logger::Target::Stderr);
    log_builder.init();

    match run(&cli) {
        Ok(code) => {
            println!("{}", code);
            ExitCode::SUCCESS
        }
        Err(err) => {
            debug!("failed: {:?}", err);
            eprintln!("Error: {}.", err);
            ExitCode::FAILURE
        }
    }
}
