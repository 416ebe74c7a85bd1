use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use num_bigint_dig::BigUint;

use dsasign::artifact::{sign_file, verify_file};
use dsasign::math::is_probable_prime;
use dsasign::security::{Digest, RawParameters};
use dsasign::{logger, DsaConfig};

#[derive(Parser, Debug)]
#[command(name = "dsasign", version, about = "Sign and check files with toy DSA over SHA-1")]
struct Cli {
    /// More log output on stderr (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Miller-Rabin rounds used to check P and Q.
    #[arg(long, global = true, default_value_t = dsasign::math::DEFAULT_ROUNDS)]
    rounds: usize,

    /// Seed for Miller-Rabin witnesses (random when omitted).
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct KeyArgs {
    /// Prime Q, the subgroup order.
    #[arg(long)]
    q: String,
    /// Prime P with Q dividing (P - 1).
    #[arg(long)]
    p: String,
    /// Generator seed H in [2, P - 2].
    #[arg(long)]
    h: String,
    /// Private key X in [1, Q - 1].
    #[arg(long)]
    x: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write <stem>(signed).txt next to FILE with an appended "r,s" line.
    Sign {
        file: PathBuf,
        #[command(flatten)]
        key: KeyArgs,
        /// Nonce K in [1, Q - 1]; use a fresh one for every signature.
        #[arg(long)]
        k: String,
    },

    /// Recompute v for a signed file and compare it with r.
    Verify {
        file: PathBuf,
        #[command(flatten)]
        key: KeyArgs,
    },

    /// Print the SHA-1 digest of FILE in hex and decimal.
    Digest { file: PathBuf },

    /// Run the Miller-Rabin check on a decimal number.
    Prime { n: String },
}

impl KeyArgs {
    fn into_raw(self, k: Option<String>) -> RawParameters {
        RawParameters {
            q: self.q,
            p: self.p,
            h: self.h,
            x: self.x,
            k,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = logger::init(logger::level_for_verbosity(cli.verbose)) {
        eprintln!("warning: logging disabled: {e}");
    }

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = DsaConfig {
        primality_rounds: cli.rounds,
        seed: cli.seed,
    };

    match cli.command {
        Command::Sign { file, key, k } => {
            let inputs = key.into_raw(Some(k)).validate_for_signing(&config)?;
            let signed = sign_file(&file, &inputs.params, &inputs.key, &inputs.nonce)?;
            println!("{}", signed.outcome.signature);
            println!("Hash: {}", signed.outcome.digest);
            println!("File signed successfully: {}", signed.path.display());
            Ok(ExitCode::SUCCESS)
        }
        Command::Verify { file, key } => {
            let inputs = key.into_raw(None).validate_for_verification(&config)?;
            let check = verify_file(&file, &inputs.params, &inputs.key)?;
            if check.is_valid() {
                println!("{}=={}", check.r, check.v);
                println!("File wasn't changed");
                println!("{}", check.digest);
                Ok(ExitCode::SUCCESS)
            } else {
                println!("{}!={}", check.r, check.v);
                println!("File was changed");
                println!("{}", check.digest);
                Ok(ExitCode::FAILURE)
            }
        }
        Command::Digest { file } => {
            let bytes = std::fs::read(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let digest = Digest::of(&bytes);
            println!("{}", digest.to_hex());
            println!("{}", digest);
            Ok(ExitCode::SUCCESS)
        }
        Command::Prime { n } => {
            let value = Some(n.as_str())
                .filter(|s| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()))
                .and_then(|s| BigUint::parse_bytes(s.as_bytes(), 10))
                .with_context(|| format!("{n:?} is not a non-negative decimal integer"))?;
            if is_probable_prime(&value, config.effective_rounds(), config.seed) {
                println!("{value} is probably prime");
                Ok(ExitCode::SUCCESS)
            } else {
                println!("{value} is composite");
                Ok(ExitCode::FAILURE)
            }
        }
    }
}
